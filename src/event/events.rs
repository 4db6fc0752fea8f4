use serde::{Deserialize, Serialize};

/// Broadcast events delivered to every subscriber of a room.
///
/// Events are facts about state that already changed; subscribers cannot
/// reject them. Errors never appear here - they go back to the requesting
/// connection only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RoomEvent {
    /// Roster changed; carries the full ordered list of display names so
    /// late subscribers converge on the same view
    PlayerUpdate { players: Vec<String> },

    /// Every member signalled readiness; the round begins. No payload.
    GameStart,

    /// A ballot was recorded but quorum is not yet reached
    VoteUpdate { votes: usize },

    /// Voting resolved; carries the winning theme
    VoteResult { theme: String },

    /// Opaque drawing payload, relayed verbatim to the whole room
    Draw { payload: serde_json::Value },
}

impl RoomEvent {
    /// Wire name of the event as the client protocol spells it
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::PlayerUpdate { .. } => "player_update",
            RoomEvent::GameStart => "game_start",
            RoomEvent::VoteUpdate { .. } => "vote_update",
            RoomEvent::VoteResult { .. } => "vote_result",
            RoomEvent::Draw { .. } => "draw",
        }
    }
}

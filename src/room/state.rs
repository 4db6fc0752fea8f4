use std::collections::HashMap;

/// Maximum number of players in a single room
pub const ROOM_CAPACITY: usize = 5;

/// Themes offered by the client UI. Votes are not validated against this
/// list; any theme string a client sends is tallied as-is.
pub const THEMES: [&str; 4] = ["random", "halloween", "christmas", "easter"];

/// A player as seen by the room: stable id plus display name
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: String,
    pub name: String,
}

/// Result of attempting to join a room
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// Player was added; carries the full ordered roster of display names
    Joined { players: Vec<String> },
    /// Room is at capacity (5 players); membership unchanged
    RoomFull,
}

/// Result of marking a player ready
#[derive(Debug, Clone, PartialEq)]
pub enum ReadyOutcome {
    /// Every current member is ready; the caller must broadcast game start.
    /// Returned at most once per room.
    AllReady,
    /// At least one member is still not ready (or the game already started)
    WaitingOnOthers,
    /// The player is not a member of this room
    PlayerNotFound,
}

/// Result of casting a theme vote
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// Quorum not yet reached; carries the running ballot count
    Tally { votes: usize },
    /// Quorum reached; carries the winning theme. The session is destroyed.
    Resolved { theme: String },
}

/// One round of theme voting, scoped to a single room.
///
/// Ballots are kept in first-vote order so tie-breaking is deterministic:
/// the winner is the first theme to reach the maximum count, in the order
/// votes were recorded. A re-vote overwrites the player's ballot in place.
#[derive(Debug)]
pub struct VoteSession {
    expected_voters: usize,
    ballots: Vec<(String, String)>, // (player id, theme), first-vote order
}

impl VoteSession {
    fn new(expected_voters: usize) -> Self {
        Self {
            expected_voters,
            ballots: Vec::new(),
        }
    }

    /// Records or overwrites a ballot; last write wins per player
    fn record(&mut self, player_id: &str, theme: &str) {
        match self.ballots.iter_mut().find(|(p, _)| p == player_id) {
            Some((_, existing)) => *existing = theme.to_string(),
            None => self
                .ballots
                .push((player_id.to_string(), theme.to_string())),
        }
    }

    fn ballot_count(&self) -> usize {
        self.ballots.len()
    }

    fn quorum_reached(&self) -> bool {
        self.ballots.len() >= self.expected_voters
    }

    /// First theme to reach the maximum ballot count, in recorded order
    fn winning_theme(&self) -> String {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for (_, theme) in &self.ballots {
            match counts.iter_mut().find(|(t, _)| t == theme) {
                Some((_, n)) => *n += 1,
                None => counts.push((theme, 1)),
            }
        }

        let mut winner: (&str, usize) = ("", 0);
        for (theme, count) in counts {
            if count > winner.1 {
                winner = (theme, count);
            }
        }
        winner.0.to_string()
    }
}

/// Mutable state of one live room.
///
/// All operations are synchronous read-modify-write sequences; the registry
/// runs them under the room's own lock so each call is one atomic unit and
/// two rooms never contend with each other.
#[derive(Debug)]
pub struct Room {
    pub id: String,
    members: Vec<Member>,         // join order
    ready: HashMap<String, bool>, // player id -> readiness; keys ⊆ members
    vote: Option<VoteSession>,
    started: bool,
}

impl Room {
    pub fn new(id: String) -> Self {
        Self {
            id,
            members: Vec::new(),
            ready: HashMap::new(),
            vote: None,
            started: false,
        }
    }

    /// Adds a player with readiness=false, capacity permitting.
    ///
    /// On success returns the full ordered roster of display names so the
    /// caller can broadcast a consistent `player_update` (full roster, not a
    /// delta, so late subscribers converge on the same view).
    pub fn join(&mut self, player_id: String, name: String) -> JoinOutcome {
        if self.members.len() >= ROOM_CAPACITY {
            return JoinOutcome::RoomFull;
        }

        self.ready.insert(player_id.clone(), false);
        self.members.push(Member {
            id: player_id,
            name,
        });

        JoinOutcome::Joined {
            players: self.roster(),
        }
    }

    /// Marks a player ready and checks the start quorum in the same step.
    ///
    /// Idempotent: re-marking an already-ready player is a no-op. `AllReady`
    /// is returned exactly once per room, by whichever call completes the
    /// quorum, so a game start is never signalled twice.
    pub fn set_ready(&mut self, player_id: &str) -> ReadyOutcome {
        let Some(flag) = self.ready.get_mut(player_id) else {
            return ReadyOutcome::PlayerNotFound;
        };
        *flag = true;

        let all_ready = self
            .members
            .iter()
            .all(|m| self.ready.get(&m.id).copied().unwrap_or(false));

        if all_ready && !self.started {
            self.started = true;
            ReadyOutcome::AllReady
        } else {
            ReadyOutcome::WaitingOnOthers
        }
    }

    /// Records a theme vote, creating the session on the first ballot.
    ///
    /// A room with no active session starts one seeded with the current
    /// member count as the expected voter count. When the ballot count
    /// reaches that quorum the session resolves and is destroyed, so the
    /// next vote starts a fresh round.
    pub fn cast_vote(&mut self, player_id: &str, theme: &str) -> VoteOutcome {
        let member_count = self.members.len();
        let session = self
            .vote
            .get_or_insert_with(|| VoteSession::new(member_count));

        session.record(player_id, theme);

        if session.quorum_reached() {
            let theme = session.winning_theme();
            self.vote = None;
            VoteOutcome::Resolved { theme }
        } else {
            VoteOutcome::Tally {
                votes: session.ballot_count(),
            }
        }
    }

    /// Ordered display names of all current members
    pub fn roster(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn has_member(&self, player_id: &str) -> bool {
        self.members.iter().any(|m| m.id == player_id)
    }

    pub fn has_active_vote(&self) -> bool {
        self.vote.is_some()
    }
}

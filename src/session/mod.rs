// Binds connections to (room, player) pairs and routes their events.
//
// All room mutations funnel through here: the manager consults the durable
// store first (outside any room lock), applies the in-memory operation as
// one atomic unit, then fans the resulting broadcast out after the room
// lock is released. Errors are returned to the caller and never broadcast.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::event::{EventBus, RoomEvent};
use crate::room::registry::RoomRegistry;
use crate::room::state::{JoinOutcome, ReadyOutcome, VoteOutcome, ROOM_CAPACITY};
use crate::shared::AppError;
use crate::store::GameStore;

/// Result of creating a game: the new room plus the host's player id
#[derive(Debug, Clone)]
pub struct GameCreated {
    pub room_id: String,
    pub player_id: String,
}

/// Result of joining a game
#[derive(Debug, Clone)]
pub struct GameJoined {
    pub room_id: String,
    pub player_id: String,
    pub players: Vec<String>,
}

/// Readiness as reported back to the requesting player
#[derive(Debug, Clone, PartialEq)]
pub enum ReadyStatus {
    /// Everyone is ready; `game_start` has been broadcast
    AllReady,
    /// Still waiting on at least one other member
    Waiting,
}

/// Coordinates room operations, the durable store, and event fan-out
pub struct SessionManager {
    registry: Arc<RoomRegistry>,
    store: Arc<dyn GameStore>,
    event_bus: EventBus,
}

impl SessionManager {
    pub fn new(
        registry: Arc<RoomRegistry>,
        store: Arc<dyn GameStore>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            registry,
            store,
            event_bus,
        }
    }

    /// Creates a game: a durable record, a host player record, and a live
    /// room with the host as its first member.
    ///
    /// The room id is not disclosed until every step succeeds, so a store
    /// failure only needs to retract the not-yet-visible room.
    #[instrument(skip(self))]
    pub async fn create_game(&self, host_name: &str) -> Result<GameCreated, AppError> {
        let room_id = self.registry.create_room().await;

        if let Err(e) = self.store.create_game(&room_id).await {
            self.registry.remove_room(&room_id).await;
            return Err(e);
        }

        let player_id = match self.store.create_player(host_name, &room_id).await {
            Ok(id) => id,
            Err(e) => {
                self.registry.remove_room(&room_id).await;
                return Err(e);
            }
        };

        self.registry
            .with_room(&room_id, |room| {
                room.join(player_id.clone(), host_name.to_string())
            })
            .await?;

        info!(room_id = %room_id, host_name = %host_name, "Game created");
        Ok(GameCreated { room_id, player_id })
    }

    /// Joins a player into an existing game.
    ///
    /// Store checks and the player insert happen before the in-memory join,
    /// so a `Store` failure leaves room state untouched. The live room's
    /// capacity check is authoritative.
    #[instrument(skip(self))]
    pub async fn join_game(&self, room_id: &str, name: &str) -> Result<GameJoined, AppError> {
        if !self.store.game_exists(room_id).await? || !self.registry.room_exists(room_id).await {
            return Err(AppError::RoomNotFound(room_id.to_string()));
        }

        if self.store.count_members(room_id).await? >= ROOM_CAPACITY as i64 {
            return Err(AppError::RoomFull(room_id.to_string()));
        }

        let player_id = self.store.create_player(name, room_id).await?;

        let outcome = self
            .registry
            .with_room(room_id, |room| {
                room.join(player_id.clone(), name.to_string())
            })
            .await?;

        let players = match outcome {
            JoinOutcome::Joined { players } => players,
            JoinOutcome::RoomFull => return Err(AppError::RoomFull(room_id.to_string())),
        };

        self.event_bus
            .emit_to_room(
                room_id,
                RoomEvent::PlayerUpdate {
                    players: players.clone(),
                },
            )
            .await;

        info!(room_id = %room_id, name = %name, "Player joined game");
        Ok(GameJoined {
            room_id: room_id.to_string(),
            player_id,
            players,
        })
    }

    /// Marks a player ready; broadcasts `game_start` exactly once, when the
    /// last member readies up.
    #[instrument(skip(self))]
    pub async fn mark_ready(
        &self,
        room_id: &str,
        player_id: &str,
    ) -> Result<ReadyStatus, AppError> {
        let outcome = self
            .registry
            .with_room(room_id, |room| room.set_ready(player_id))
            .await?;

        match outcome {
            ReadyOutcome::PlayerNotFound => Err(AppError::PlayerNotFound(player_id.to_string())),
            ReadyOutcome::AllReady => {
                self.event_bus
                    .emit_to_room(room_id, RoomEvent::GameStart)
                    .await;
                info!(room_id = %room_id, "All players ready, game started");
                Ok(ReadyStatus::AllReady)
            }
            ReadyOutcome::WaitingOnOthers => Ok(ReadyStatus::Waiting),
        }
    }

    /// Casts a theme vote; broadcasts the running tally, or the result when
    /// the vote resolves.
    #[instrument(skip(self))]
    pub async fn cast_vote(
        &self,
        room_id: &str,
        player_id: &str,
        theme: &str,
    ) -> Result<VoteOutcome, AppError> {
        let outcome = self
            .registry
            .with_room(room_id, |room| room.cast_vote(player_id, theme))
            .await?;

        match &outcome {
            VoteOutcome::Tally { votes } => {
                self.event_bus
                    .emit_to_room(room_id, RoomEvent::VoteUpdate { votes: *votes })
                    .await;
            }
            VoteOutcome::Resolved { theme } => {
                info!(room_id = %room_id, theme = %theme, "Vote resolved");
                self.event_bus
                    .emit_to_room(
                        room_id,
                        RoomEvent::VoteResult {
                            theme: theme.clone(),
                        },
                    )
                    .await;
            }
        }

        Ok(outcome)
    }

    /// Relays an opaque drawing payload to the whole room, sender included.
    /// No state is touched.
    pub async fn relay_draw(
        &self,
        room_id: &str,
        payload: serde_json::Value,
    ) -> Result<(), AppError> {
        if !self.registry.room_exists(room_id).await {
            return Err(AppError::RoomNotFound(room_id.to_string()));
        }

        self.event_bus
            .emit_to_room(room_id, RoomEvent::Draw { payload })
            .await;
        Ok(())
    }

    /// Re-broadcasts the current roster, e.g. when a connection announces
    /// itself with a `join` message.
    pub async fn broadcast_roster(&self, room_id: &str) -> Result<(), AppError> {
        let players = self
            .registry
            .with_room(room_id, |room| room.roster())
            .await?;

        self.event_bus
            .emit_to_room(room_id, RoomEvent::PlayerUpdate { players })
            .await;
        Ok(())
    }

    /// Current roster snapshot for one caller (no broadcast)
    pub async fn roster(&self, room_id: &str) -> Result<Vec<String>, AppError> {
        self.registry.with_room(room_id, |room| room.roster()).await
    }

    /// Whether a player is currently a member of a room
    pub async fn is_member(&self, room_id: &str, player_id: &str) -> Result<bool, AppError> {
        self.registry
            .with_room(room_id, |room| room.has_member(player_id))
            .await
    }

    /// Tears down a live room and its broadcast channel. Idempotent.
    #[instrument(skip(self))]
    pub async fn teardown_room(&self, room_id: &str) {
        self.registry.remove_room(room_id).await;
        self.event_bus.drop_room(room_id).await;
    }
}

// Durable game/player records - the only persistent collaborator.
//
// The store is consulted synchronously at room creation and join time,
// always outside any room lock, and always before the matching in-memory
// mutation so a store failure never requires in-memory rollback.

// Public API - what other modules can use
pub use memory::InMemoryGameStore;
pub use postgres::PostgresGameStore;

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::shared::AppError;

/// Durable record of one game, keyed by its room id
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub room_id: String,
    pub theme: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
}

impl GameRecord {
    /// Fresh record with the defaults every game starts from
    pub fn new(room_id: String) -> Self {
        Self {
            room_id,
            theme: "Default".to_string(),
            status: "drawing".to_string(),
            started_at: Utc::now(),
        }
    }
}

/// Durable record of one player within a game
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub role: String,
    pub room_id: String,
}

impl PlayerRecord {
    pub fn new(name: String, room_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            role: "drawer".to_string(), // every player draws in this game mode
            room_id,
        }
    }
}

/// Trait for the durable game store
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Inserts the game record for a freshly created room
    async fn create_game(&self, room_id: &str) -> Result<(), AppError>;

    /// Inserts a player into a game and returns the allocated player id
    async fn create_player(&self, name: &str, room_id: &str) -> Result<String, AppError>;

    /// Number of players recorded for a game
    async fn count_members(&self, room_id: &str) -> Result<i64, AppError>;

    /// Whether a game record exists for this room id
    async fn game_exists(&self, room_id: &str) -> Result<bool, AppError>;
}

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::{GameRecord, GameStore, PlayerRecord};
use crate::shared::AppError;

/// In-memory implementation of GameStore for development and testing.
///
/// Data is lost on restart; that matches the coordination layer, which is
/// in-memory anyway.
pub struct InMemoryGameStore {
    games: Mutex<HashMap<String, GameRecord>>,
    players: Mutex<Vec<PlayerRecord>>,
}

impl Default for InMemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
            players: Mutex::new(Vec::new()),
        }
    }

    /// Returns the current number of game records (useful in tests)
    pub fn game_count(&self) -> usize {
        self.games.lock().unwrap().len()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    #[instrument(skip(self))]
    async fn create_game(&self, room_id: &str) -> Result<(), AppError> {
        debug!(room_id = %room_id, "Creating game record in memory");

        let mut games = self.games.lock().unwrap();
        if games.contains_key(room_id) {
            warn!(room_id = %room_id, "Game record already exists");
            return Err(AppError::Store("Game already exists".to_string()));
        }
        games.insert(room_id.to_string(), GameRecord::new(room_id.to_string()));

        debug!(room_id = %room_id, "Game record created in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_player(&self, name: &str, room_id: &str) -> Result<String, AppError> {
        debug!(room_id = %room_id, name = %name, "Creating player record in memory");

        let record = PlayerRecord::new(name.to_string(), room_id.to_string());
        let player_id = record.id.clone();
        self.players.lock().unwrap().push(record);

        debug!(room_id = %room_id, player_id = %player_id, "Player record created in memory");
        Ok(player_id)
    }

    #[instrument(skip(self))]
    async fn count_members(&self, room_id: &str) -> Result<i64, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players.iter().filter(|p| p.room_id == room_id).count() as i64)
    }

    #[instrument(skip(self))]
    async fn game_exists(&self, room_id: &str) -> Result<bool, AppError> {
        Ok(self.games.lock().unwrap().contains_key(room_id))
    }
}

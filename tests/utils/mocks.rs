//! Mock collaborators for workflow tests

use async_trait::async_trait;

use sketchparty::{AppError, GameStore};

/// Store that rejects every write - simulates the durable collaborator
/// being down
pub struct UnavailableGameStore;

#[async_trait]
impl GameStore for UnavailableGameStore {
    async fn create_game(&self, _room_id: &str) -> Result<(), AppError> {
        Err(AppError::Store("store unavailable".to_string()))
    }

    async fn create_player(&self, _name: &str, _room_id: &str) -> Result<String, AppError> {
        Err(AppError::Store("store unavailable".to_string()))
    }

    async fn count_members(&self, _room_id: &str) -> Result<i64, AppError> {
        Ok(0)
    }

    async fn game_exists(&self, _room_id: &str) -> Result<bool, AppError> {
        Ok(true)
    }
}

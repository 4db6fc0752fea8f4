use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::event::EventBus;
use crate::room::registry::RoomRegistry;
use crate::session::SessionManager;
use crate::store::GameStore;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub game_store: Arc<dyn GameStore>,
    pub event_bus: EventBus,
    pub session_manager: Arc<SessionManager>,
}

impl AppState {
    pub fn new(game_store: Arc<dyn GameStore>) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let event_bus = EventBus::new();
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&registry),
            Arc::clone(&game_store),
            event_bus.clone(),
        ));

        Self {
            registry,
            game_store,
            event_bus,
            session_manager,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Room is full: {0}")]
    RoomFull(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::RoomNotFound(room_id) => {
                (StatusCode::NOT_FOUND, format!("Room not found: {room_id}"))
            }
            AppError::RoomFull(room_id) => {
                (StatusCode::CONFLICT, format!("Room is full: {room_id}"))
            }
            AppError::PlayerNotFound(player_id) => (
                StatusCode::NOT_FOUND,
                format!("Player not found: {player_id}"),
            ),
            AppError::Store(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store error: {msg}"),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::store::{GameStore, InMemoryGameStore};
    use async_trait::async_trait;

    /// Game store whose writes always fail - for store-failure tests
    pub struct FailingGameStore;

    #[async_trait]
    impl GameStore for FailingGameStore {
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

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        game_store: Option<Arc<dyn GameStore>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self { game_store: None }
        }

        pub fn with_game_store(mut self, store: Arc<dyn GameStore>) -> Self {
            self.game_store = Some(store);
            self
        }

        pub fn build(self) -> AppState {
            let game_store = self
                .game_store
                .unwrap_or_else(|| Arc::new(InMemoryGameStore::new()));
            AppState::new(game_store)
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}

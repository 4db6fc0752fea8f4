// Library crate for the drawing-party coordination server
// This file exposes the public API for integration tests

pub mod event;
pub mod room;
pub mod session;
pub mod shared;
pub mod store;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use event::{EventBus, RoomEvent};
pub use room::registry::RoomRegistry;
pub use room::state::{JoinOutcome, ReadyOutcome, Room, VoteOutcome, ROOM_CAPACITY, THEMES};
pub use session::{GameCreated, GameJoined, ReadyStatus, SessionManager};
pub use shared::{AppError, AppState};
pub use store::{GameStore, InMemoryGameStore, PostgresGameStore};
pub use websockets::{InboundMessageRouter, MessageHandler, MessageType, WebSocketMessage};

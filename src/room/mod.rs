// Public API - what other modules can use
pub use handlers::{create_game, join_game, ready_up};

// Internal modules
mod handlers;
pub mod registry;
pub mod state;
pub mod types;

// WebSocket transport: wire messages, the connection loop, and the upgrade
// endpoint that binds a connection to its (room, player) pair.

// Public API - what other modules can use
pub use handler::{websocket_handler, InboundMessageRouter};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};

// Internal modules
mod handler;
mod messages;
mod socket;

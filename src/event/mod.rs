// Per-room event broadcast infrastructure.
//
// The bus decouples room logic from the transport: session code emits
// domain events, websocket connections subscribe and translate them into
// wire messages.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::RoomEvent;

// Internal modules
mod bus;
mod events;

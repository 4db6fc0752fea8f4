use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::RoomEvent;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    // Client -> Server
    Join,
    Ready,
    Vote,

    // Both directions: inbound stroke, relayed outbound verbatim
    Draw,

    // Server -> Client
    PlayerUpdate,
    GameStart,
    VoteUpdate,
    VoteResult,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePayload {
    pub theme: String,
}

/// Server-to-Client payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerUpdatePayload {
    /// Full ordered roster of display names, never a delta
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteUpdatePayload {
    pub votes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResultPayload {
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create a player_update message carrying the full roster
    pub fn player_update(players: Vec<String>) -> Self {
        let payload = PlayerUpdatePayload { players };
        Self::new(
            MessageType::PlayerUpdate,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an error message; only ever sent to one connection
    pub fn error(message: String) -> Self {
        let payload = ErrorPayload { message };
        Self::new(MessageType::Error, serde_json::to_value(payload).unwrap())
    }

    /// Translate a broadcast event into its wire message
    pub fn from_room_event(event: RoomEvent) -> Self {
        match event {
            RoomEvent::PlayerUpdate { players } => Self::player_update(players),
            RoomEvent::GameStart => Self::new(MessageType::GameStart, serde_json::json!({})),
            RoomEvent::VoteUpdate { votes } => Self::new(
                MessageType::VoteUpdate,
                serde_json::to_value(VoteUpdatePayload { votes }).unwrap(),
            ),
            RoomEvent::VoteResult { theme } => Self::new(
                MessageType::VoteResult,
                serde_json::to_value(VoteResultPayload { theme }).unwrap(),
            ),
            RoomEvent::Draw { payload } => Self::new(MessageType::Draw, payload),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Request payload for creating a new game
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub username: String,
}

/// Response for game creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub room_id: String,
    pub player_id: String,
}

/// Request payload for joining a game
#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    pub username: String,
}

/// Response for joining a game
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinGameResponse {
    pub room_id: String,
    pub player_id: String,
    /// Full ordered roster of display names after the join
    pub players: Vec<String>,
}

/// Request payload for readying up
#[derive(Debug, Deserialize)]
pub struct ReadyRequest {
    pub player_id: String,
}

/// Response for readying up
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub all_ready: bool,
    pub message: String,
}

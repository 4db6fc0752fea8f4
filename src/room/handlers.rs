use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{
    CreateGameRequest, CreateGameResponse, JoinGameRequest, JoinGameResponse, ReadyRequest,
    ReadyResponse,
};
use crate::session::ReadyStatus;
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new game
///
/// POST /game
/// Creates the durable game and host player records plus the live room,
/// and returns both generated ids.
#[instrument(name = "create_game", skip(state))]
pub async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    if request.username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }

    let created = state.session_manager.create_game(&request.username).await?;

    info!(
        room_id = %created.room_id,
        username = %request.username,
        "Game created successfully"
    );

    Ok(Json(CreateGameResponse {
        room_id: created.room_id,
        player_id: created.player_id,
    }))
}

/// HTTP handler for joining an existing game
///
/// POST /game/:room_id/join
/// Validates existence and capacity against the store, records the player,
/// seats them in the room, and broadcasts the updated roster.
#[instrument(name = "join_game", skip(state))]
pub async fn join_game(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, AppError> {
    if request.username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }

    let joined = state
        .session_manager
        .join_game(&room_id, &request.username)
        .await?;

    info!(
        room_id = %room_id,
        username = %request.username,
        player_count = joined.players.len(),
        "Player joined successfully"
    );

    Ok(Json(JoinGameResponse {
        room_id: joined.room_id,
        player_id: joined.player_id,
        players: joined.players,
    }))
}

/// HTTP handler for readying up
///
/// POST /game/:room_id/ready
/// Marks the player ready; when the last member readies up the room is
/// told to start via a single `game_start` broadcast.
#[instrument(name = "ready_up", skip(state))]
pub async fn ready_up(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<ReadyRequest>,
) -> Result<Json<ReadyResponse>, AppError> {
    let status = state
        .session_manager
        .mark_ready(&room_id, &request.player_id)
        .await?;

    let response = match status {
        ReadyStatus::AllReady => ReadyResponse {
            all_ready: true,
            message: "All players are ready. Game started!".to_string(),
        },
        ReadyStatus::Waiting => ReadyResponse {
            all_ready: false,
            message: "Player is ready. Waiting for others.".to_string(),
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{AppStateBuilder, FailingGameStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/game", post(create_game))
            .route("/game/:room_id/join", post(join_game))
            .route("/game/:room_id/ready", post(ready_up))
            .with_state(state)
    }

    fn json_request(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json<T: serde::de::DeserializeOwned>(
        response: axum::response::Response,
    ) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_game_handler() {
        let app = app(AppStateBuilder::new().build());

        let request = json_request("/game", r#"{"username": "alice"}"#.to_string());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let created: CreateGameResponse = response_json(response).await;
        assert!(!created.room_id.is_empty());
        assert!(!created.player_id.is_empty());
    }

    #[tokio::test]
    async fn test_create_game_requires_username() {
        let app = app(AppStateBuilder::new().build());

        let request = json_request("/game", r#"{"username": ""}"#.to_string());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_game_surfaces_store_failure() {
        let state = AppStateBuilder::new()
            .with_game_store(Arc::new(FailingGameStore))
            .build();
        let app = app(state);

        let request = json_request("/game", r#"{"username": "alice"}"#.to_string());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_join_game_handler() {
        let state = AppStateBuilder::new().build();
        let app = app(state.clone());

        let created: CreateGameResponse = response_json(
            app.clone()
                .oneshot(json_request("/game", r#"{"username": "alice"}"#.to_string()))
                .await
                .unwrap(),
        )
        .await;

        let response = app
            .oneshot(json_request(
                &format!("/game/{}/join", created.room_id),
                r#"{"username": "bob"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let joined: JoinGameResponse = response_json(response).await;
        assert_eq!(joined.players, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[tokio::test]
    async fn test_join_unknown_room_is_not_found() {
        let app = app(AppStateBuilder::new().build());

        let response = app
            .oneshot(json_request(
                "/game/no-such-room/join",
                r#"{"username": "bob"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sixth_join_conflicts() {
        let state = AppStateBuilder::new().build();
        let app = app(state.clone());

        let created: CreateGameResponse = response_json(
            app.clone()
                .oneshot(json_request("/game", r#"{"username": "alice"}"#.to_string()))
                .await
                .unwrap(),
        )
        .await;

        for name in ["bob", "carol", "dave", "erin"] {
            let response = app
                .clone()
                .oneshot(json_request(
                    &format!("/game/{}/join", created.room_id),
                    format!(r#"{{"username": "{name}"}}"#),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(json_request(
                &format!("/game/{}/join", created.room_id),
                r#"{"username": "frank"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_ready_up_reports_waiting_then_started() {
        let state = AppStateBuilder::new().build();
        let app = app(state.clone());

        let created: CreateGameResponse = response_json(
            app.clone()
                .oneshot(json_request("/game", r#"{"username": "alice"}"#.to_string()))
                .await
                .unwrap(),
        )
        .await;
        let joined: JoinGameResponse = response_json(
            app.clone()
                .oneshot(json_request(
                    &format!("/game/{}/join", created.room_id),
                    r#"{"username": "bob"}"#.to_string(),
                ))
                .await
                .unwrap(),
        )
        .await;

        let first: ReadyResponse = response_json(
            app.clone()
                .oneshot(json_request(
                    &format!("/game/{}/ready", created.room_id),
                    format!(r#"{{"player_id": "{}"}}"#, created.player_id),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert!(!first.all_ready);

        let second: ReadyResponse = response_json(
            app.oneshot(json_request(
                    &format!("/game/{}/ready", created.room_id),
                    format!(r#"{{"player_id": "{}"}}"#, joined.player_id),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert!(second.all_ready);
    }

    #[tokio::test]
    async fn test_ready_up_unknown_player_is_not_found() {
        let state = AppStateBuilder::new().build();
        let app = app(state.clone());

        let created: CreateGameResponse = response_json(
            app.clone()
                .oneshot(json_request("/game", r#"{"username": "alice"}"#.to_string()))
                .await
                .unwrap(),
        )
        .await;

        let response = app
            .oneshot(json_request(
                &format!("/game/{}/ready", created.room_id),
                r#"{"player_id": "ghost"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

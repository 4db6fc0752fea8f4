use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::event::RoomEvent;
use crate::session::SessionManager;
use crate::shared::{AppError, AppState};
use crate::websockets::messages::{MessageType, VotePayload, WebSocketMessage};

use super::socket::{Connection, MessageHandler};

/// Routes inbound wire messages to the session manager.
///
/// `join` re-broadcasts the roster, `ready` and `vote` mutate room state,
/// `draw` is relayed untouched. Anything else is logged and dropped.
pub struct InboundMessageRouter {
    session_manager: Arc<SessionManager>,
}

impl InboundMessageRouter {
    pub fn new(session_manager: Arc<SessionManager>) -> Self {
        Self { session_manager }
    }
}

#[async_trait]
impl MessageHandler for InboundMessageRouter {
    async fn handle_message(
        &self,
        player_id: &str,
        room_id: &str,
        message: String,
    ) -> Result<(), AppError> {
        debug!(
            player_id = %player_id,
            room_id = %room_id,
            message = %message,
            "Received message"
        );

        let ws_message: WebSocketMessage = serde_json::from_str(&message).map_err(|e| {
            warn!(
                player_id = %player_id,
                room_id = %room_id,
                error = %e,
                "Failed to parse WebSocket message"
            );
            AppError::BadRequest(format!("malformed message: {e}"))
        })?;

        match ws_message.message_type {
            MessageType::Join => self.session_manager.broadcast_roster(room_id).await,
            MessageType::Ready => {
                self.session_manager.mark_ready(room_id, player_id).await?;
                Ok(())
            }
            MessageType::Vote => {
                let vote: VotePayload = serde_json::from_value(ws_message.payload)
                    .map_err(|e| AppError::BadRequest(format!("malformed vote payload: {e}")))?;
                self.session_manager
                    .cast_vote(room_id, player_id, &vote.theme)
                    .await?;
                Ok(())
            }
            MessageType::Draw => {
                self.session_manager
                    .relay_draw(room_id, ws_message.payload)
                    .await
            }
            other => {
                debug!(message_type = ?other, "Unhandled message type");
                Ok(())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WsConnectParams {
    pub player_id: String,
}

/// WebSocket endpoint binding one connection to a (room, player) pair.
///
/// GET /ws/:room_id?player_id=... - the player must already be a member of
/// the room (via the HTTP join endpoint); display names are trusted as-is,
/// there is no authentication.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    Query(params): Query<WsConnectParams>,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    info!(
        room_id = %room_id,
        player_id = %params.player_id,
        "WebSocket connection requested"
    );

    let is_member = app_state
        .session_manager
        .is_member(&room_id, &params.player_id)
        .await?;
    if !is_member {
        warn!(
            room_id = %room_id,
            player_id = %params.player_id,
            "Player is not a room member, rejecting WebSocket connection"
        );
        return Err(AppError::PlayerNotFound(params.player_id));
    }

    Ok(ws.on_upgrade(move |socket| {
        handle_websocket_connection(socket, room_id, params.player_id, app_state)
    }))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    room_id: String,
    player_id: String,
    app_state: AppState,
) {
    info!(
        room_id = %room_id,
        player_id = %player_id,
        "WebSocket connection established"
    );

    // Subscribe to room broadcasts before sending the initial snapshot so
    // no event can slip between the two.
    let event_receiver = app_state.event_bus.subscribe_to_room(&room_id).await;

    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    // Send the current roster directly to the new subscriber
    if let Ok(players) = app_state.session_manager.roster(&room_id).await {
        let snapshot = WebSocketMessage::player_update(players);
        if let Ok(json) = serde_json::to_string(&snapshot) {
            let _ = outbound_sender.send(json);
        }
    }

    // Forward room broadcasts into this connection's outbound queue
    let forward_room_id = room_id.clone();
    let forwarder = tokio::spawn(async move {
        forward_room_events(forward_room_id, event_receiver, outbound_sender).await;
    });

    let router = Arc::new(InboundMessageRouter::new(Arc::clone(
        &app_state.session_manager,
    )));
    let connection = Connection::new(
        player_id.clone(),
        room_id.clone(),
        Box::new(socket),
        outbound_receiver,
        router,
    );

    if let Err(e) = connection.run().await {
        debug!(
            room_id = %room_id,
            player_id = %player_id,
            error = ?e,
            "WebSocket connection ended with error"
        );
    }

    forwarder.abort();
    info!(
        room_id = %room_id,
        player_id = %player_id,
        "WebSocket connection closed"
    );
}

/// Pumps room events to one connection until either side goes away.
///
/// A lagged receiver skips missed events and keeps going: delivery is
/// best-effort per subscriber, and one slow client never blocks the room.
async fn forward_room_events(
    room_id: String,
    mut events: broadcast::Receiver<RoomEvent>,
    outbound: mpsc::UnboundedSender<String>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let message = WebSocketMessage::from_room_event(event);
                let Ok(json) = serde_json::to_string(&message) else {
                    continue;
                };
                if outbound.send(json).is_err() {
                    break; // Connection is gone
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(room_id = %room_id, skipped = skipped, "Subscriber lagged, skipping events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

//! Shared helpers for the room workflow integration tests
#![allow(dead_code)] // Test utilities may not all be used in every test

pub mod mocks;

use std::sync::Arc;
use tokio::sync::broadcast;

use sketchparty::{
    EventBus, GameStore, InMemoryGameStore, InboundMessageRouter, MessageHandler, RoomEvent,
    RoomRegistry, SessionManager,
};

/// Everything a workflow test needs: a wired session manager plus direct
/// access to the event bus for observing broadcasts.
pub struct TestSetup {
    pub session: Arc<SessionManager>,
    pub event_bus: EventBus,
    pub registry: Arc<RoomRegistry>,
    pub router: InboundMessageRouter,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryGameStore::new()))
    }

    pub fn with_store(store: Arc<dyn GameStore>) -> Self {
        let event_bus = EventBus::new();
        let registry = Arc::new(RoomRegistry::new());
        let session = Arc::new(SessionManager::new(
            Arc::clone(&registry),
            store,
            event_bus.clone(),
        ));
        let router = InboundMessageRouter::new(Arc::clone(&session));

        Self {
            session,
            event_bus,
            registry,
            router,
        }
    }

    /// Creates a game with a host and joins the named extra players.
    /// Returns the room id and all player ids, host first.
    pub async fn game_with_players(&self, host: &str, extras: &[&str]) -> (String, Vec<String>) {
        let created = self.session.create_game(host).await.unwrap();
        let mut player_ids = vec![created.player_id];
        for name in extras {
            let joined = self.session.join_game(&created.room_id, name).await.unwrap();
            player_ids.push(joined.player_id);
        }
        (created.room_id, player_ids)
    }

    /// Subscribes an observer to a room's broadcasts
    pub async fn observe(&self, room_id: &str) -> EventObserver {
        EventObserver {
            receiver: self.event_bus.subscribe_to_room(room_id).await,
        }
    }

    /// Feeds a raw wire message through the inbound router, as if it had
    /// arrived on a connection bound to (room, player)
    pub async fn send_raw(
        &self,
        player_id: &str,
        room_id: &str,
        raw: &str,
    ) -> Result<(), sketchparty::AppError> {
        self.router
            .handle_message(player_id, room_id, raw.to_string())
            .await
    }

    pub async fn send_ready(
        &self,
        player_id: &str,
        room_id: &str,
    ) -> Result<(), sketchparty::AppError> {
        self.send_raw(player_id, room_id, r#"{"type":"ready"}"#).await
    }

    pub async fn send_vote(
        &self,
        player_id: &str,
        room_id: &str,
        theme: &str,
    ) -> Result<(), sketchparty::AppError> {
        self.send_raw(
            player_id,
            room_id,
            &format!(r#"{{"type":"vote","payload":{{"theme":"{theme}"}}}}"#),
        )
        .await
    }

    pub async fn send_draw(
        &self,
        player_id: &str,
        room_id: &str,
        payload: &str,
    ) -> Result<(), sketchparty::AppError> {
        self.send_raw(
            player_id,
            room_id,
            &format!(r#"{{"type":"draw","payload":{payload}}}"#),
        )
        .await
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains and inspects the broadcasts one subscriber saw
pub struct EventObserver {
    receiver: broadcast::Receiver<RoomEvent>,
}

impl EventObserver {
    /// All events received so far, in delivery order
    pub fn drain(&mut self) -> Vec<RoomEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn count_of(&mut self, expected: &RoomEvent) -> usize {
        self.drain().iter().filter(|e| *e == expected).count()
    }

    pub fn assert_no_events(&mut self) {
        let events = self.drain();
        assert!(events.is_empty(), "expected no broadcasts, got {events:?}");
    }
}

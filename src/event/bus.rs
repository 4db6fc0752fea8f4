use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::RoomEvent;

/// Per-room broadcast capability.
///
/// Each room gets its own `tokio::sync::broadcast` channel, created lazily
/// on first emit or subscribe. Delivery is fire-and-forget per subscriber:
/// a slow receiver lags and drops events rather than blocking anyone, and a
/// disconnected receiver is simply skipped. Within one room events arrive
/// in emit order; across rooms there is no ordering.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// room_id -> sender
    room_channels: Arc<RwLock<HashMap<String, broadcast::Sender<RoomEvent>>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            room_channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Emits an event to all current subscribers of a room
    pub async fn emit_to_room(&self, room_id: &str, event: RoomEvent) {
        let sender = self.channel_for(room_id).await;
        let event_type = event.event_type();
        match sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    room_id = %room_id,
                    event = event_type,
                    receivers = receiver_count,
                    "Room event emitted"
                );
            }
            Err(_) => {
                debug!(room_id = %room_id, event = event_type, "Room event emitted with no receivers");
            }
        }
    }

    /// Subscribes to all future events of a room
    pub async fn subscribe_to_room(&self, room_id: &str) -> broadcast::Receiver<RoomEvent> {
        self.channel_for(room_id).await.subscribe()
    }

    /// Drops a room's channel when the room is torn down; idempotent
    pub async fn drop_room(&self, room_id: &str) {
        let mut room_channels = self.room_channels.write().await;
        if room_channels.remove(room_id).is_some() {
            debug!(room_id = %room_id, "Room channel dropped");
        }
    }

    async fn channel_for(&self, room_id: &str) -> broadcast::Sender<RoomEvent> {
        {
            let room_channels = self.room_channels.read().await;
            if let Some(sender) = room_channels.get(room_id) {
                return sender.clone();
            }
        }

        let mut room_channels = self.room_channels.write().await;
        room_channels
            .entry(room_id.to_string())
            .or_insert_with(|| {
                debug!(room_id = %room_id, "Creating room channel");
                broadcast::channel(100).0
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_every_subscriber_in_emit_order() {
        let bus = EventBus::new();
        let mut rx_a = bus.subscribe_to_room("room-1").await;
        let mut rx_b = bus.subscribe_to_room("room-1").await;

        bus.emit_to_room("room-1", RoomEvent::VoteUpdate { votes: 1 })
            .await;
        bus.emit_to_room("room-1", RoomEvent::GameStart).await;

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(rx.try_recv().unwrap(), RoomEvent::VoteUpdate { votes: 1 });
            assert_eq!(rx.try_recv().unwrap(), RoomEvent::GameStart);
        }
    }

    #[tokio::test]
    async fn rooms_are_isolated_from_each_other() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_to_room("room-1").await;

        bus.emit_to_room("room-2", RoomEvent::GameStart).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn emitting_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.emit_to_room("empty-room", RoomEvent::GameStart).await;
    }
}

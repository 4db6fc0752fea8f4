use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::state::Room;
use crate::shared::AppError;

/// Process-wide map from room id to live room state.
///
/// The registry owns every room exclusively. Mutations go through
/// [`RoomRegistry::with_room`], which locks only the addressed room, so two
/// rooms never contend and a slow operation in one room cannot stall
/// another. Callers must compute broadcast payloads inside the closure and
/// fan out after it returns, keeping the critical section short.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Mutex<Room>>>>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Allocates a fresh empty room, installs it, and returns its id.
    ///
    /// Ids are generated pet names; regenerated on the off chance of a
    /// collision, so every call produces a fresh independent room.
    #[instrument(skip(self))]
    pub async fn create_room(&self) -> String {
        let mut rooms = self.rooms.write().await;

        let mut room_id = petname::Petnames::default().generate_one(2, "-");
        while rooms.contains_key(&room_id) {
            room_id = petname::Petnames::default().generate_one(2, "-");
        }

        rooms.insert(
            room_id.clone(),
            Arc::new(Mutex::new(Room::new(room_id.clone()))),
        );

        info!(room_id = %room_id, "Room created");
        room_id
    }

    pub async fn room_exists(&self, room_id: &str) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    /// Runs `f` under the room's own lock as one atomic unit.
    ///
    /// Fails with `RoomNotFound` for unknown or removed ids. The closure is
    /// synchronous on purpose: nothing can await while the room is locked.
    pub async fn with_room<T>(
        &self,
        room_id: &str,
        f: impl FnOnce(&mut Room) -> T,
    ) -> Result<T, AppError> {
        let room = {
            let rooms = self.rooms.read().await;
            rooms
                .get(room_id)
                .cloned()
                .ok_or_else(|| AppError::RoomNotFound(room_id.to_string()))?
        };

        let mut room = room.lock().unwrap();
        Ok(f(&mut room))
    }

    /// Removes a room. Idempotent: removing an absent room is a no-op.
    #[instrument(skip(self))]
    pub async fn remove_room(&self, room_id: &str) {
        let mut rooms = self.rooms.write().await;
        if rooms.remove(room_id).is_some() {
            info!(room_id = %room_id, "Room removed");
        } else {
            debug!(room_id = %room_id, "Room already absent");
        }
    }
}

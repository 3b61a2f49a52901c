//! An in-memory implementation of the storage traits.

use std::sync::Mutex;

use indexmap::IndexMap;
use warren_core::{GameTime, RoomName, StorageError};
use warren_engine::{GlobalStore, RoomStore};
use warren_model::{GlobalSnapshot, RoomSnapshot};
use warren_mutation::{GlobalBatch, MutationBatch, StatRecord};

/// Storage backed by maps, for engine and scenario tests.
///
/// Committed room batches are applied to the stored snapshots (and the
/// tick's intents cleared), so a multi-tick test can drive the engine
/// tick after tick and observe state evolve. Every commit is also
/// recorded verbatim for assertions.
#[derive(Default)]
pub struct MemoryStore {
    rooms: Mutex<IndexMap<RoomName, RoomSnapshot>>,
    global: Mutex<Option<GlobalSnapshot>>,
    room_commits: Mutex<Vec<(MutationBatch, Vec<StatRecord>)>>,
    global_commits: Mutex<Vec<(GlobalBatch, Vec<StatRecord>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or replace) one room's stored state.
    pub fn put_room(&self, snapshot: RoomSnapshot) {
        let mut rooms = self.lock_rooms();
        rooms.insert(snapshot.room.clone(), snapshot);
    }

    /// Seed the cross-room state.
    pub fn put_global(&self, snapshot: GlobalSnapshot) {
        *self.lock(&self.global) = Some(snapshot);
    }

    /// A copy of one room's current stored state.
    pub fn room(&self, name: &RoomName) -> Option<RoomSnapshot> {
        self.lock_rooms().get(name).cloned()
    }

    /// Every committed room batch, in commit order.
    pub fn room_commits(&self) -> Vec<(MutationBatch, Vec<StatRecord>)> {
        self.lock(&self.room_commits).clone()
    }

    /// Every committed global batch, in commit order.
    pub fn global_commits(&self) -> Vec<(GlobalBatch, Vec<StatRecord>)> {
        self.lock(&self.global_commits).clone()
    }

    fn lock_rooms(&self) -> std::sync::MutexGuard<'_, IndexMap<RoomName, RoomSnapshot>> {
        self.lock(&self.rooms)
    }

    fn lock<'a, T>(&self, m: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RoomStore for MemoryStore {
    fn load_room(&self, room: &RoomName, tick: GameTime) -> Result<RoomSnapshot, StorageError> {
        let rooms = self.lock_rooms();
        let mut snapshot = rooms
            .get(room)
            .cloned()
            .ok_or_else(|| StorageError::Missing {
                what: format!("room {room}"),
            })?;
        snapshot.game_time = tick;
        Ok(snapshot)
    }

    fn commit_room(
        &self,
        batch: MutationBatch,
        stats: Vec<StatRecord>,
    ) -> Result<(), StorageError> {
        if let Some(room) = &batch.room {
            let mut rooms = self.lock_rooms();
            if let Some(stored) = rooms.get(room) {
                let mut next = crate::apply_batch(stored, &batch);
                // submitted intents are consumed by the tick
                next.intents.clear();
                rooms.insert(room.clone(), next);
            }
        }
        self.lock(&self.room_commits).push((batch, stats));
        Ok(())
    }
}

impl GlobalStore for MemoryStore {
    fn load_global(&self, tick: GameTime) -> Result<GlobalSnapshot, StorageError> {
        let mut snapshot = self
            .lock(&self.global)
            .clone()
            .unwrap_or_else(|| GlobalSnapshot::empty(tick));
        snapshot.game_time = tick;
        Ok(snapshot)
    }

    fn commit_global(
        &self,
        batch: GlobalBatch,
        stats: Vec<StatRecord>,
    ) -> Result<(), StorageError> {
        self.lock(&self.global_commits).push((batch, stats));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_core::ObjectId;
    use warren_mutation::RoomWriter;

    #[test]
    fn commits_fold_into_the_stored_snapshot() {
        let store = MemoryStore::new();
        let mut snap = crate::room("W1N1", 1);
        let room_name = snap.room.clone();
        crate::insert(
            &mut snap,
            crate::structure(
                "r1",
                warren_model::ObjectKind::Road,
                crate::pos(5, 5),
                &room_name,
            ),
        );
        store.put_room(snap);

        let mut writer = RoomWriter::new(room_name.clone());
        writer.remove(ObjectId::from("r1"));
        store.commit_room(writer.into_batch(), Vec::new()).unwrap();

        let stored = store.room(&room_name).unwrap();
        assert!(stored.objects.is_empty());
        assert_eq!(store.room_commits().len(), 1);
    }

    #[test]
    fn missing_room_is_a_typed_error() {
        let store = MemoryStore::new();
        let err = store
            .load_room(&RoomName::from("W9N9"), GameTime(1))
            .unwrap_err();
        assert!(matches!(err, StorageError::Missing { .. }));
    }
}

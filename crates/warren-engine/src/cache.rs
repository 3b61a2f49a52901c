//! Per-tick snapshot memoization.

use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;
use warren_core::{GameTime, RoomName};
use warren_model::RoomSnapshot;

/// Memoizes loaded room snapshots per `(room, tick)`.
///
/// A room that fails its tick retries next tick from a fresh snapshot;
/// the cache exists so that retries and repeated reads within one tick
/// do not hit storage twice. Entries for stale ticks are replaced on
/// insert. The lock is held only around the check-and-set, never across
/// storage I/O.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: Mutex<IndexMap<RoomName, (GameTime, Arc<RoomSnapshot>)>>,
}

impl SnapshotCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<RoomName, (GameTime, Arc<RoomSnapshot>)>> {
        // A poisoned map is still structurally valid; every entry was
        // inserted whole.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The cached snapshot of `room`, if one exists for exactly `tick`.
    pub fn get(&self, room: &RoomName, tick: GameTime) -> Option<Arc<RoomSnapshot>> {
        let entries = self.lock();
        let (cached_tick, snapshot) = entries.get(room)?;
        (*cached_tick == tick).then(|| Arc::clone(snapshot))
    }

    /// Cache a freshly loaded snapshot, replacing any stale entry for
    /// the same room, and return it shared.
    pub fn insert(&self, snapshot: RoomSnapshot) -> Arc<RoomSnapshot> {
        let shared = Arc::new(snapshot);
        let mut entries = self.lock();
        entries.insert(
            shared.room.clone(),
            (shared.game_time, Arc::clone(&shared)),
        );
        shared
    }

    /// Evict the entry for `room`, if any. Called after a successful
    /// commit; the snapshot no longer describes the stored state.
    pub fn invalidate(&self, room: &RoomName) {
        self.lock().shift_remove(room);
    }

    /// Number of cached rooms.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(room: &str, tick: u64) -> RoomSnapshot {
        RoomSnapshot::empty(RoomName::from(room), GameTime(tick))
    }

    #[test]
    fn hit_requires_the_exact_tick() {
        let cache = SnapshotCache::new();
        cache.insert(snapshot("W1N1", 10));
        assert!(cache.get(&RoomName::from("W1N1"), GameTime(10)).is_some());
        assert!(cache.get(&RoomName::from("W1N1"), GameTime(11)).is_none());
        assert!(cache.get(&RoomName::from("W2N1"), GameTime(10)).is_none());
    }

    #[test]
    fn insert_replaces_the_stale_entry() {
        let cache = SnapshotCache::new();
        cache.insert(snapshot("W1N1", 10));
        cache.insert(snapshot("W1N1", 11));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&RoomName::from("W1N1"), GameTime(10)).is_none());
        assert!(cache.get(&RoomName::from("W1N1"), GameTime(11)).is_some());
    }

    #[test]
    fn invalidate_evicts() {
        let cache = SnapshotCache::new();
        cache.insert(snapshot("W1N1", 10));
        cache.invalidate(&RoomName::from("W1N1"));
        assert!(cache.is_empty());
        assert!(cache.get(&RoomName::from("W1N1"), GameTime(10)).is_none());
    }
}

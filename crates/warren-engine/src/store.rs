//! The storage seam.
//!
//! The engine never talks to a database directly; it loads frozen
//! snapshots and commits finished batches through these traits. A
//! commit is all-or-nothing: the engine hands over a complete batch or
//! nothing at all, so implementations never see a half-written tick.

use warren_core::{GameTime, RoomName, StorageError};
use warren_model::{GlobalSnapshot, RoomSnapshot};
use warren_mutation::{GlobalBatch, MutationBatch, StatRecord};

/// Loads room snapshots and commits room batches.
pub trait RoomStore: Send + Sync {
    /// Build the frozen snapshot of `room` for `tick`.
    fn load_room(&self, room: &RoomName, tick: GameTime) -> Result<RoomSnapshot, StorageError>;

    /// Atomically apply one room's finished batch and stats.
    fn commit_room(&self, batch: MutationBatch, stats: Vec<StatRecord>)
        -> Result<(), StorageError>;
}

/// Loads the cross-room snapshot and commits the global batch.
pub trait GlobalStore: Send + Sync {
    /// Build the frozen cross-room snapshot for `tick`.
    fn load_global(&self, tick: GameTime) -> Result<GlobalSnapshot, StorageError>;

    /// Atomically apply the global pass's batch and stats.
    fn commit_global(&self, batch: GlobalBatch, stats: Vec<StatRecord>)
        -> Result<(), StorageError>;
}

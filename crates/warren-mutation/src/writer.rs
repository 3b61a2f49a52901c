//! The write half of a room tick.
//!
//! Steps never touch storage; they record intentions here. The writer
//! deliberately exposes no read access to what was recorded, so a step
//! cannot observe another step's (or its own) pending writes — reads go
//! through the snapshot, always.

use crate::batch::{MapView, MutationBatch, RoomEvent, RoomInfoPatch};
use crate::patch::ObjectPatch;
use std::error::Error;
use std::fmt;
use warren_core::{ObjectId, RoomName};
use warren_model::RoomObjectSnapshot;

/// A side payload was recorded twice in one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidePayloadAlreadySet {
    /// Which payload ("roomInfo", "eventLog", "mapView").
    pub what: &'static str,
}

impl fmt::Display for SidePayloadAlreadySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "side payload '{}' was already recorded this tick", self.what)
    }
}

impl Error for SidePayloadAlreadySet {}

/// Collects one room's mutations for the tick.
///
/// Consumed by [`into_batch`](RoomWriter::into_batch), so a batch can
/// only ever be flushed once; dropping the writer instead abandons every
/// recorded write.
#[derive(Debug, Default)]
pub struct RoomWriter {
    batch: MutationBatch,
}

impl RoomWriter {
    /// A writer for `room`.
    pub fn new(room: RoomName) -> Self {
        Self {
            batch: MutationBatch {
                room: Some(room),
                ..MutationBatch::default()
            },
        }
    }

    /// Record a whole new or replacement object.
    pub fn upsert(&mut self, object: RoomObjectSnapshot) {
        self.batch.upserts.push(object);
    }

    /// Record a sparse patch. Patches to the same id accumulate
    /// field-wise rather than replacing each other.
    pub fn patch(&mut self, id: ObjectId, patch: ObjectPatch) {
        if patch.is_empty() {
            return;
        }
        match self.batch.patches.get_mut(&id) {
            Some(existing) => existing.merge(patch),
            None => {
                self.batch.patches.insert(id, patch);
            }
        }
    }

    /// Record an object removal. A removal also voids any patch already
    /// recorded for the same id.
    pub fn remove(&mut self, id: ObjectId) {
        self.batch.patches.shift_remove(&id);
        self.batch.removals.insert(id);
    }

    /// Record the room-metadata patch. At most once per tick.
    pub fn set_room_info(&mut self, patch: RoomInfoPatch) -> Result<(), SidePayloadAlreadySet> {
        if self.batch.room_info.is_some() {
            return Err(SidePayloadAlreadySet { what: "roomInfo" });
        }
        self.batch.room_info = Some(patch);
        Ok(())
    }

    /// Record the tick's event log. At most once per tick.
    pub fn set_event_log(&mut self, events: Vec<RoomEvent>) -> Result<(), SidePayloadAlreadySet> {
        if self.batch.event_log.is_some() {
            return Err(SidePayloadAlreadySet { what: "eventLog" });
        }
        self.batch.event_log = Some(events);
        Ok(())
    }

    /// Record the tick's map view. At most once per tick.
    pub fn set_map_view(&mut self, view: MapView) -> Result<(), SidePayloadAlreadySet> {
        if self.batch.map_view.is_some() {
            return Err(SidePayloadAlreadySet { what: "mapView" });
        }
        self.batch.map_view = Some(view);
        Ok(())
    }

    /// Number of object operations recorded so far (for metrics only).
    pub fn op_count(&self) -> usize {
        self.batch.len()
    }

    /// Finish the tick and hand the batch to storage.
    pub fn into_batch(self) -> MutationBatch {
        self.batch
    }
}

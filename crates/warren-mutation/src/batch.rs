//! Per-room mutation batches.
//!
//! A batch is everything one room's tick wants persisted: object
//! upserts, accumulated sparse patches, removals, and the at-most-once
//! side payloads (room-info patch, event log, map view). Batches are
//! built through a [`RoomWriter`](crate::RoomWriter) and flushed to
//! storage whole; abandoning a batch before flush is the rollback path.

use crate::patch::ObjectPatch;
use indexmap::{IndexMap, IndexSet};
use warren_core::{GameTime, ObjectId, ResourceKind, RoomName, UserId};
use warren_model::{RoomObjectSnapshot, RoomStatus};

/// Kinds of room event visible to players in the event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Melee or ranged damage dealt.
    Attack,
    /// A controller attacked (downgrade acceleration).
    AttackController,
    /// Construction progress added.
    Build,
    /// Healing applied.
    Heal,
    /// Energy or mineral harvested.
    Harvest,
    /// An object destroyed.
    ObjectDestroyed,
    /// Repair progress added.
    Repair,
    /// A controller reserved.
    Reserve,
    /// Controller progress added.
    UpgradeController,
    /// A creep crossed a room border.
    Exit,
    /// Power processed at a power spawn.
    Power,
    /// A resource transferred between stores.
    Transfer,
}

/// One entry in a room's per-tick event log.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomEvent {
    /// What happened.
    pub kind: EventKind,
    /// The acting object.
    pub object: ObjectId,
    /// The object acted on, when there is one.
    pub target: Option<ObjectId>,
    /// Magnitude (damage, progress, units moved), when meaningful.
    pub amount: Option<u32>,
    /// Resource involved, for transfer-like events.
    pub resource: Option<ResourceKind>,
}

/// One object's contribution to the world-map overview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapViewEntry {
    /// Tile x.
    pub x: u8,
    /// Tile y.
    pub y: u8,
    /// Owner, when the object is owned.
    pub user: Option<UserId>,
}

/// The room's world-map overview for one tick, grouped by display
/// channel ("creep", "spawn", "wall", ...).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapView {
    /// Channel name → entries.
    pub channels: IndexMap<String, Vec<MapViewEntry>>,
}

/// Sparse patch for room metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomInfoPatch {
    /// New lifecycle status.
    pub status: Option<RoomStatus>,
    /// Novice window expiry; `Some(None)` clears it.
    pub novice_until: Option<Option<GameTime>>,
    /// Respawn window expiry; `Some(None)` clears it.
    pub respawn_until: Option<Option<GameTime>>,
    /// Whether the room stays in the active set next tick.
    pub active: Option<bool>,
}

/// Everything one room's tick wants persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationBatch {
    /// The room the batch belongs to.
    pub room: Option<RoomName>,
    /// Whole new or replacement objects.
    pub upserts: Vec<RoomObjectSnapshot>,
    /// Accumulated sparse patches, keyed by object id.
    pub patches: IndexMap<ObjectId, ObjectPatch>,
    /// Objects to delete.
    pub removals: IndexSet<ObjectId>,
    /// Room metadata patch, at most one per tick.
    pub room_info: Option<RoomInfoPatch>,
    /// Event log for the tick, at most one per tick.
    pub event_log: Option<Vec<RoomEvent>>,
    /// Map view for the tick, at most one per tick.
    pub map_view: Option<MapView>,
}

impl MutationBatch {
    /// Whether the batch carries nothing.
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty()
            && self.patches.is_empty()
            && self.removals.is_empty()
            && self.room_info.is_none()
            && self.event_log.is_none()
            && self.map_view.is_none()
    }

    /// Total number of object-level operations.
    pub fn len(&self) -> usize {
        self.upserts.len() + self.patches.len() + self.removals.len()
    }
}

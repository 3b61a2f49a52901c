//! Shared step state: the context handed to every step and the tick
//! ledger, the only sanctioned cross-step channel.

use indexmap::IndexMap;
use warren_core::{GameTime, ObjectId, RoomPosition};
use warren_intent::ValidationOutcome;
use warren_model::{RoomObjectSnapshot, RoomSnapshot, Store};
use warren_mutation::{RoomEvent, RoomWriter, StatsSink};

/// Same-tick facts later steps are contractually allowed to see.
///
/// Steps never read each other's pending writes; the three quantities
/// the fixed step order depends on flow through here instead: energy
/// already spoken for (spawning draws from spawns and extensions),
/// accumulated hit-point deltas (lifecycle must see combat deaths), and
/// post-move positions (combat re-checks range after movement).
#[derive(Debug, Default)]
pub struct TickLedger {
    energy_claimed: IndexMap<ObjectId, u32>,
    hits_delta: IndexMap<ObjectId, i64>,
    positions: IndexMap<ObjectId, RoomPosition>,
}

impl TickLedger {
    /// A fresh ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `amount` energy of an object's store is spoken for.
    pub fn claim_energy(&mut self, id: &ObjectId, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.energy_claimed.entry(id.clone()).or_insert(0) += amount;
    }

    /// Energy of an object's store already spoken for this tick.
    pub fn energy_claimed(&self, id: &ObjectId) -> u32 {
        self.energy_claimed.get(id).copied().unwrap_or(0)
    }

    /// An object's energy minus what is already spoken for.
    pub fn unclaimed_energy(&self, obj: &RoomObjectSnapshot) -> u32 {
        obj.energy().saturating_sub(self.energy_claimed(&obj.id))
    }

    /// Accumulate a hit-point delta (damage negative, healing positive).
    pub fn add_hits_delta(&mut self, id: &ObjectId, delta: i64) {
        if delta == 0 {
            return;
        }
        *self.hits_delta.entry(id.clone()).or_insert(0) += delta;
    }

    /// The accumulated delta for one object.
    pub fn hits_delta(&self, id: &ObjectId) -> i64 {
        self.hits_delta.get(id).copied().unwrap_or(0)
    }

    /// Snapshot hits plus the accumulated delta, clamped to
    /// `0..=hits_max`. `None` for objects without hit points.
    pub fn effective_hits(&self, obj: &RoomObjectSnapshot) -> Option<u32> {
        let hits = i64::from(obj.hits?);
        let max = obj.hits_max.map(i64::from).unwrap_or(i64::MAX);
        let effective = (hits + self.hits_delta(&obj.id)).clamp(0, max);
        Some(effective as u32)
    }

    /// Whether the object had hits and combat drove them to zero.
    pub fn died_this_tick(&self, obj: &RoomObjectSnapshot) -> bool {
        matches!((obj.hits, self.effective_hits(obj)), (Some(h), Some(0)) if h > 0)
    }

    /// Record a post-move position.
    pub fn record_position(&mut self, id: &ObjectId, pos: RoomPosition) {
        self.positions.insert(id.clone(), pos);
    }

    /// The object's position after this tick's movement.
    pub fn position_of(&self, obj: &RoomObjectSnapshot) -> RoomPosition {
        self.positions.get(&obj.id).copied().unwrap_or(obj.pos)
    }

    /// Objects with a nonzero accumulated hits delta, in first-touch
    /// order.
    pub fn damaged_ids(&self) -> impl Iterator<Item = &ObjectId> + '_ {
        self.hits_delta
            .iter()
            .filter(|(_, d)| **d != 0)
            .map(|(id, _)| id)
    }
}

/// A step-local working copy of stores.
///
/// Several intents inside one step may touch the same store (two creeps
/// filling one spawn); the scratch serializes them without the writer
/// ever being read back. Finished steps fold the changed stores into
/// patches.
#[derive(Debug, Default)]
pub struct StoreScratch {
    changed: IndexMap<ObjectId, Store>,
}

impl StoreScratch {
    /// A fresh scratch.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current working store for an object: the scratch copy if the
    /// step already touched it, otherwise the snapshot's.
    pub fn current(&self, snapshot: &RoomSnapshot, id: &ObjectId) -> Option<Store> {
        if let Some(store) = self.changed.get(id) {
            return Some(store.clone());
        }
        snapshot.object(id).and_then(|o| o.store.clone())
    }

    /// Replace the working store for an object.
    pub fn put(&mut self, id: &ObjectId, store: Store) {
        self.changed.insert(id.clone(), store);
    }

    /// Fold every changed store into the writer as patches.
    pub fn flush(self, writer: &mut RoomWriter) {
        for (id, store) in self.changed {
            writer.patch(
                id,
                warren_mutation::ObjectPatch {
                    store: Some(store),
                    ..Default::default()
                },
            );
        }
    }
}

/// Everything a room step may read and write during one tick.
pub struct StepContext<'a> {
    /// The frozen room state.
    pub snapshot: &'a RoomSnapshot,
    /// Validated intents for the tick.
    pub intents: &'a ValidationOutcome,
    /// The room's mutation writer.
    pub writer: &'a mut RoomWriter,
    /// The per-user stats side channel.
    pub stats: &'a mut StatsSink,
    /// The cross-step ledger.
    pub ledger: &'a mut TickLedger,
    /// Event-log rows accumulated across steps; the processor records
    /// them on the writer once, after the last step.
    pub events: &'a mut Vec<RoomEvent>,
}

impl StepContext<'_> {
    /// The tick being processed.
    pub fn now(&self) -> GameTime {
        self.snapshot.game_time
    }
}

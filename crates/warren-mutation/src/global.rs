//! Cross-room mutation batching for the global processor.
//!
//! Global steps may retry, so every write here is absolute — derived
//! from snapshot state, never a relative increment. Replaying a global
//! batch builder is therefore idempotent.

use crate::patch::ObjectPatch;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use warren_core::{GameTime, ObjectId, OrderId, ResourceKind, RoomName, UserId};
use warren_model::{MarketOrder, RoomObjectSnapshot};

/// Sparse patch for one market order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderPatch {
    /// New remaining amount.
    pub remaining: Option<u32>,
    /// New active flag.
    pub active: Option<bool>,
    /// New unit price.
    pub price: Option<f64>,
}

impl OrderPatch {
    /// Fold `later` into `self`, field-wise.
    pub fn merge(&mut self, later: OrderPatch) {
        if later.remaining.is_some() {
            self.remaining = later.remaining;
        }
        if later.active.is_some() {
            self.active = later.active;
        }
        if later.price.is_some() {
            self.price = later.price;
        }
    }

    /// Apply to an order value (in-memory store and tests).
    pub fn apply(&self, order: &mut MarketOrder) {
        if let Some(remaining) = self.remaining {
            order.remaining = remaining;
        }
        if let Some(active) = self.active {
            order.active = active;
        }
        if let Some(price) = self.price {
            order.price = price;
        }
    }
}

/// Sparse, absolute patch for one user's account.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPatch {
    /// New credit balance.
    pub money: Option<f64>,
    /// New accumulated power.
    pub power: Option<f64>,
    /// New per-resource account balances (absolute values, not deltas).
    pub resources: IndexMap<ResourceKind, i64>,
}

impl UserPatch {
    /// Fold `later` into `self`; resource entries from `later` override
    /// same-resource entries already present.
    pub fn merge(&mut self, later: UserPatch) {
        if later.money.is_some() {
            self.money = later.money;
        }
        if later.power.is_some() {
            self.power = later.power;
        }
        for (resource, value) in later.resources {
            self.resources.insert(resource, value);
        }
    }
}

/// One row of the market transaction log.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionLogEntry {
    /// Tick of the transaction.
    pub time: GameTime,
    /// Sending user, if the sender was owned.
    pub sender: Option<UserId>,
    /// Receiving user, if the recipient was owned.
    pub recipient: Option<UserId>,
    /// Resource moved.
    pub resource: ResourceKind,
    /// Units moved.
    pub amount: u32,
    /// Origin room.
    pub from_room: RoomName,
    /// Destination room.
    pub to_room: RoomName,
    /// Free-text description from the send intent, if any.
    pub description: Option<String>,
    /// The order this deal filled, for market deals.
    pub order: Option<OrderId>,
}

impl fmt::Display for TransactionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t{} {} x{} {} -> {}",
            self.time, self.resource, self.amount, self.from_room, self.to_room
        )
    }
}

/// Everything one tick of global processing wants persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalBatch {
    /// Whole new or replacement power creeps.
    pub power_creep_upserts: Vec<RoomObjectSnapshot>,
    /// Power-creep patches, keyed by object id.
    pub power_creep_patches: IndexMap<ObjectId, ObjectPatch>,
    /// Power creeps to delete.
    pub power_creep_removals: IndexSet<ObjectId>,
    /// Whole new or replacement market orders.
    pub order_upserts: Vec<MarketOrder>,
    /// Order patches, keyed by order id.
    pub order_patches: IndexMap<OrderId, OrderPatch>,
    /// Orders to delete.
    pub order_removals: IndexSet<OrderId>,
    /// Absolute account patches, keyed by user.
    pub user_patches: IndexMap<UserId, UserPatch>,
    /// Room-object upserts (creeps arriving through exits), grouped by
    /// destination room.
    pub object_upserts: IndexMap<RoomName, Vec<RoomObjectSnapshot>>,
    /// Room-object patches (terminal stores after a send), keyed by id.
    pub object_patches: IndexMap<ObjectId, ObjectPatch>,
    /// Room objects to delete (creeps that left their origin room).
    pub object_removals: IndexSet<ObjectId>,
    /// Transaction-log inserts.
    pub transactions: Vec<TransactionLogEntry>,
    /// Rooms that must be in the active set next tick.
    pub active_rooms: IndexSet<RoomName>,
}

impl GlobalBatch {
    /// Whether the batch carries nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Collects the global tick's mutations. Same contract as the room
/// writer: no read access to pending writes, consumed on flush.
#[derive(Debug, Default)]
pub struct GlobalWriter {
    batch: GlobalBatch,
}

impl GlobalWriter {
    /// A fresh writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a whole power creep.
    pub fn upsert_power_creep(&mut self, creep: RoomObjectSnapshot) {
        self.batch.power_creep_upserts.push(creep);
    }

    /// Record a power-creep patch; accumulates per id.
    pub fn patch_power_creep(&mut self, id: ObjectId, patch: ObjectPatch) {
        if patch.is_empty() {
            return;
        }
        match self.batch.power_creep_patches.get_mut(&id) {
            Some(existing) => existing.merge(patch),
            None => {
                self.batch.power_creep_patches.insert(id, patch);
            }
        }
    }

    /// Record a power-creep deletion.
    pub fn remove_power_creep(&mut self, id: ObjectId) {
        self.batch.power_creep_patches.shift_remove(&id);
        self.batch.power_creep_removals.insert(id);
    }

    /// Record a whole market order.
    pub fn upsert_order(&mut self, order: MarketOrder) {
        self.batch.order_upserts.push(order);
    }

    /// Record an order patch; accumulates per id.
    pub fn patch_order(&mut self, id: OrderId, patch: OrderPatch) {
        match self.batch.order_patches.get_mut(&id) {
            Some(existing) => existing.merge(patch),
            None => {
                self.batch.order_patches.insert(id, patch);
            }
        }
    }

    /// Record an order deletion.
    pub fn remove_order(&mut self, id: OrderId) {
        self.batch.order_patches.shift_remove(&id);
        self.batch.order_removals.insert(id);
    }

    /// Record a user-account patch; accumulates per user. Values must be
    /// absolute (state-derived), never deltas.
    pub fn patch_user(&mut self, user: UserId, patch: UserPatch) {
        match self.batch.user_patches.get_mut(&user) {
            Some(existing) => existing.merge(patch),
            None => {
                self.batch.user_patches.insert(user, patch);
            }
        }
    }

    /// Record a room-object upsert into `room`.
    pub fn upsert_object(&mut self, room: RoomName, object: RoomObjectSnapshot) {
        self.batch.object_upserts.entry(room).or_default().push(object);
    }

    /// Record a room-object patch; accumulates per id.
    pub fn patch_object(&mut self, id: ObjectId, patch: ObjectPatch) {
        if patch.is_empty() {
            return;
        }
        match self.batch.object_patches.get_mut(&id) {
            Some(existing) => existing.merge(patch),
            None => {
                self.batch.object_patches.insert(id, patch);
            }
        }
    }

    /// Record a room-object deletion.
    pub fn remove_object(&mut self, id: ObjectId) {
        self.batch.object_patches.shift_remove(&id);
        self.batch.object_removals.insert(id);
    }

    /// Append a transaction-log row.
    pub fn log_transaction(&mut self, entry: TransactionLogEntry) {
        self.batch.transactions.push(entry);
    }

    /// Mark a room active for the next tick.
    pub fn mark_room_active(&mut self, room: RoomName) {
        self.batch.active_rooms.insert(room);
    }

    /// Finish the tick and hand the batch to storage.
    pub fn into_batch(self) -> GlobalBatch {
        self.batch
    }
}

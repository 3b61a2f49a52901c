//! Test utilities for Warren development.
//!
//! Provides snapshot and object builders, an in-memory implementation
//! of the storage traits ([`MemoryStore`]), and the JSON reference
//! fixture format ([`fixture`]) for reproducing recorded room ticks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixture;
pub mod memory;

pub use memory::MemoryStore;

use warren_core::{
    BodyPart, BodyPartKind, GameTime, ObjectId, ResourceKind, RoomName, RoomPosition, UserId,
    BODYPART_HITS,
};
use warren_model::{ObjectKind, RoomObjectSnapshot, RoomSnapshot, Store, UserState};
use warren_mutation::MutationBatch;

/// An empty room snapshot at the given tick.
pub fn room(name: &str, time: u64) -> RoomSnapshot {
    RoomSnapshot::empty(RoomName::from(name), GameTime(time))
}

/// A position known to be in bounds.
///
/// # Panics
///
/// Panics if `x` or `y` is out of the room grid. Test-only.
pub fn pos(x: u8, y: u8) -> RoomPosition {
    RoomPosition::new(x, y).unwrap_or_else(|| panic!("position ({x},{y}) out of bounds"))
}

/// A full-health creep with the given body, owned by `user`.
///
/// Carry capacity follows the body (50 per carry part).
pub fn creep(
    id: &str,
    user: &str,
    at: RoomPosition,
    parts: &[(BodyPartKind, usize)],
    room_name: &RoomName,
) -> RoomObjectSnapshot {
    let mut c = RoomObjectSnapshot::new(
        ObjectId::from(id),
        ObjectKind::Creep,
        room_name.clone(),
        at,
    );
    c.user = Some(UserId::from(user));
    let mut carry = 0u32;
    for &(kind, count) in parts {
        for _ in 0..count {
            c.body.push(BodyPart {
                kind,
                hits: BODYPART_HITS,
                boost: None,
            });
        }
        if kind == BodyPartKind::Carry {
            carry += count as u32;
        }
    }
    let total = (c.body.len() as u32) * BODYPART_HITS;
    c.hits = Some(total);
    c.hits_max = Some(total);
    c.store = Some(Store::with_total_capacity(carry * 50));
    c
}

/// A bare structure of the given kind.
pub fn structure(
    id: &str,
    kind: ObjectKind,
    at: RoomPosition,
    room_name: &RoomName,
) -> RoomObjectSnapshot {
    RoomObjectSnapshot::new(ObjectId::from(id), kind, room_name.clone(), at)
}

/// Add resources to an object's store, growing an unbounded store if it
/// has none.
///
/// # Panics
///
/// Panics if the store cannot hold the amount. Test-only.
pub fn give(obj: &mut RoomObjectSnapshot, resource: ResourceKind, amount: u32) {
    let store = obj
        .store
        .take()
        .unwrap_or(Store::with_total_capacity(u32::MAX));
    obj.store = Some(
        store
            .with_added(resource, amount)
            .unwrap_or_else(|e| panic!("fixture store overflow: {e}")),
    );
}

/// Insert an object and register its owner as an active user.
pub fn insert(snap: &mut RoomSnapshot, obj: RoomObjectSnapshot) {
    if let Some(user) = &obj.user {
        snap.users
            .entry(user.clone())
            .or_insert_with(|| UserState::new(user.clone()));
    }
    snap.objects.insert(obj.id.clone(), obj);
}

/// Apply a batch to a snapshot copy, the way storage would.
pub fn apply_batch(snapshot: &RoomSnapshot, batch: &MutationBatch) -> RoomSnapshot {
    let mut next = snapshot.clone();
    for obj in &batch.upserts {
        next.objects.insert(obj.id.clone(), obj.clone());
    }
    for (id, patch) in &batch.patches {
        if let Some(obj) = next.objects.get_mut(id) {
            patch.apply(obj);
        }
    }
    for id in &batch.removals {
        next.objects.shift_remove(id);
    }
    next
}

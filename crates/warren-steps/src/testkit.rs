//! Test-only fixtures shared by the step tests.

use crate::context::{StepContext, TickLedger};
use crate::step::RoomStep;
use warren_core::{
    BodyPart, BodyPartKind, GameTime, ObjectId, ResourceKind, RoomName, RoomPosition, UserId,
    BODYPART_HITS,
};
use warren_intent::{ValidationOutcome, ValidatorPipeline};
use warren_model::{ObjectKind, RoomObjectSnapshot, RoomSnapshot, Store};
use warren_mutation::{MutationBatch, RoomEvent, RoomWriter, StatRecord, StatsSink};

pub fn room(name: &str, time: u64) -> RoomSnapshot {
    RoomSnapshot::empty(RoomName::from(name), GameTime(time))
}

pub fn pos(x: u8, y: u8) -> RoomPosition {
    RoomPosition::new(x, y).unwrap()
}

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

pub fn structure(
    id: &str,
    kind: ObjectKind,
    at: RoomPosition,
    room_name: &RoomName,
) -> RoomObjectSnapshot {
    RoomObjectSnapshot::new(ObjectId::from(id), kind, room_name.clone(), at)
}

pub fn give(obj: &mut RoomObjectSnapshot, resource: ResourceKind, amount: u32) {
    let store = obj.store.take().unwrap_or(Store::with_total_capacity(u32::MAX));
    obj.store = Some(store.with_added(resource, amount).unwrap());
}

pub fn insert(snap: &mut RoomSnapshot, obj: RoomObjectSnapshot) {
    snap.objects.insert(obj.id.clone(), obj);
}

/// Everything one (or several chained) step runs produced.
pub struct StepRun {
    pub batch: MutationBatch,
    pub events: Vec<RoomEvent>,
    pub stats: Vec<StatRecord>,
    pub ledger: TickLedger,
    pub outcome: ValidationOutcome,
}

/// Validate the snapshot's envelopes and run the given steps in order
/// over one shared ledger and writer.
pub fn run_steps(steps: &[&dyn RoomStep], snapshot: &RoomSnapshot) -> StepRun {
    let outcome = ValidatorPipeline::standard().validate_room(snapshot);
    let mut writer = RoomWriter::new(snapshot.room.clone());
    let mut stats = StatsSink::new();
    let mut ledger = TickLedger::new();
    let mut events = Vec::new();
    for step in steps {
        let mut ctx = StepContext {
            snapshot,
            intents: &outcome,
            writer: &mut writer,
            stats: &mut stats,
            ledger: &mut ledger,
            events: &mut events,
        };
        step.run(&mut ctx).unwrap();
    }
    StepRun {
        batch: writer.into_batch(),
        events,
        stats: stats.drain(),
        ledger,
        outcome,
    }
}

pub fn run_step(step: &dyn RoomStep, snapshot: &RoomSnapshot) -> StepRun {
    run_steps(&[step], snapshot)
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

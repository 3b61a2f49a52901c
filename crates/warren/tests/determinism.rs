//! Determinism and conservation properties.
//!
//! The ordering contract: identical snapshots produce identical
//! batches, however many times and on however many threads the tick is
//! replayed.

use proptest::prelude::*;
use warren::prelude::*;
use warren::model::{ObjectKind, SourceState};
use warren::types::{IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord};
use warren_test_utils::{apply_batch, creep, give, insert, pos, room, structure};

fn order(snap: &mut warren::model::RoomSnapshot, name: &str, actor: &str, arg: IntentArgument) {
    let user = snap
        .object(&ObjectId::from(actor))
        .and_then(|o| o.user.clone())
        .expect("actor must be owned");
    let mut envelope = IntentEnvelope::for_user(user);
    envelope.push_intent(ObjectId::from(actor), IntentRecord::single(name, arg));
    snap.intents.push(envelope);
}

/// A room with harvesting, hauling, and combat all in flight.
fn busy_room() -> warren::model::RoomSnapshot {
    let mut snap = room("W1N1", 100);
    let name = snap.room.clone();

    let mut source = structure("s1", ObjectKind::Source, pos(10, 20), &name);
    source.source = Some(SourceState {
        energy: 3000,
        energy_capacity: 3000,
        next_regen: None,
    });
    insert(&mut snap, source);

    let miner = creep(
        "miner",
        "u1",
        pos(11, 20),
        &[(BodyPartKind::Work, 2), (BodyPartKind::Carry, 1)],
        &name,
    );
    insert(&mut snap, miner);

    let mut hauler = creep(
        "hauler",
        "u1",
        pos(12, 20),
        &[(BodyPartKind::Carry, 2), (BodyPartKind::Move, 1)],
        &name,
    );
    give(&mut hauler, ResourceKind::Energy, 60);
    insert(&mut snap, hauler);

    let mut spawn = structure("sp", ObjectKind::Spawn, pos(13, 20), &name);
    spawn.user = Some(UserId::from("u1"));
    spawn.store = Some(Store::with_total_capacity(300));
    insert(&mut snap, spawn);

    let brawler = creep(
        "brawler",
        "u2",
        pos(12, 21),
        &[(BodyPartKind::Attack, 2), (BodyPartKind::Move, 1)],
        &name,
    );
    insert(&mut snap, brawler);

    order(
        &mut snap,
        "harvest",
        "miner",
        IntentArgument::default().with("id", IntentFieldValue::Text("s1".into())),
    );
    order(
        &mut snap,
        "transfer",
        "hauler",
        IntentArgument::default()
            .with("id", IntentFieldValue::Text("sp".into()))
            .with("resourceType", IntentFieldValue::Text("energy".into()))
            .with("amount", IntentFieldValue::Number(50.0)),
    );
    order(
        &mut snap,
        "attack",
        "brawler",
        IntentArgument::default().with("id", IntentFieldValue::Text("hauler".into())),
    );
    snap
}

#[test]
fn identical_snapshots_produce_identical_batches() {
    let snap = busy_room();
    let processor = RoomProcessor::standard();
    let first = processor.process(&snap, &CancelToken::new()).unwrap();
    for _ in 0..10 {
        let again = processor.process(&snap, &CancelToken::new()).unwrap();
        assert_eq!(first.batch, again.batch);
        assert_eq!(first.stats, again.stats);
    }
}

#[test]
fn validation_is_idempotent() {
    let snap = busy_room();
    let pipeline = ValidatorPipeline::standard();
    let first = pipeline.validate_room(&snap);
    let again = pipeline.validate_room(&snap);
    assert_eq!(first.accepted.len(), again.accepted.len());
    assert_eq!(first.rejections.len(), again.rejections.len());
    for (a, b) in first.accepted.iter().zip(again.accepted.iter()) {
        assert_eq!(a.actor, b.actor);
        assert_eq!(a.name, b.name);
    }
}

proptest! {
    /// Transfers never create or destroy energy, whatever the amount
    /// asked for.
    #[test]
    fn transfer_conserves_energy(held in 0u32..=100, asked in 0u32..=400, free in 0u32..=300) {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        let mut c = creep("c", "u1", pos(10, 10), &[(BodyPartKind::Carry, 2)], &name);
        give(&mut c, ResourceKind::Energy, held);
        insert(&mut snap, c);
        let mut spawn = structure("sp", ObjectKind::Spawn, pos(11, 10), &name);
        spawn.user = Some(UserId::from("u1"));
        spawn.store = Some(Store::with_total_capacity(free));
        insert(&mut snap, spawn);
        order(
            &mut snap,
            "transfer",
            "c",
            IntentArgument::default()
                .with("id", IntentFieldValue::Text("sp".into()))
                .with("resourceType", IntentFieldValue::Text("energy".into()))
                .with("amount", IntentFieldValue::Number(f64::from(asked))),
        );

        let report = RoomProcessor::standard()
            .process(&snap, &CancelToken::new())
            .unwrap();
        let next = apply_batch(&snap, &report.batch);
        let before: u32 = snap.objects.values().map(|o| o.energy()).sum();
        let after: u32 = next.objects.values().map(|o| o.energy()).sum();
        prop_assert_eq!(before, after);
    }

    /// Range is symmetric: if A can reach B, B can reach A.
    #[test]
    fn range_is_symmetric(ax in 0u8..50, ay in 0u8..50, bx in 0u8..50, by in 0u8..50) {
        let a = RoomPosition::new(ax, ay).unwrap();
        let b = RoomPosition::new(bx, by).unwrap();
        prop_assert_eq!(a.range_to(b), b.range_to(a));
    }
}

//! Replaying recorded JSON fixtures through the room processor.

use warren::prelude::*;
use warren::mutation::{EventKind, StatKind};
use warren_test_utils::fixture;

const HARVEST_TICK: &str = r#"{
    "room": "W1N1",
    "gameTime": 250,
    "users": [ { "id": "u1", "cpu": 100 } ],
    "objects": [
        { "id": "s1", "type": "source", "x": 10, "y": 20,
          "source": { "energy": 3000, "energyCapacity": 3000 } },
        { "id": "c1", "type": "creep", "x": 11, "y": 20, "user": "u1",
          "hits": 400, "hitsMax": 400,
          "body": ["work", "work", "carry", "move"],
          "store": { "capacity": 50 } }
    ],
    "intents": [
        { "user": "u1",
          "objects": { "c1": [ { "name": "harvest", "args": { "id": "s1" } } ] } }
    ]
}"#;

#[test]
fn recorded_harvest_tick_replays_deterministically() {
    let snap = fixture::room_from_json(HARVEST_TICK).unwrap();
    let processor = RoomProcessor::standard();
    let report = processor.process(&snap, &CancelToken::new()).unwrap();

    assert_eq!(report.accepted, 1);
    let patch = &report.batch.patches[&ObjectId::from("c1")];
    assert_eq!(patch.store.as_ref().unwrap().energy(), 4);

    let log = report.batch.event_log.as_ref().unwrap();
    assert!(log
        .iter()
        .any(|e| e.kind == EventKind::Harvest && e.amount == Some(4)));
    assert!(report
        .stats
        .iter()
        .any(|s| s.kind == StatKind::EnergyHarvested && s.amount == 4));

    // replaying the same fixture gives the same batch
    let again = processor.process(&snap, &CancelToken::new()).unwrap();
    assert_eq!(report.batch, again.batch);
}

#[test]
fn fixture_with_unknown_intent_is_counted_not_fatal() {
    let text = HARVEST_TICK.replace("\"harvest\"", "\"teleport\"");
    let snap = fixture::room_from_json(&text).unwrap();
    let report = RoomProcessor::standard()
        .process(&snap, &CancelToken::new())
        .unwrap();
    assert_eq!(report.accepted, 0);
    assert_eq!(report.unknown_dropped, 1);
}

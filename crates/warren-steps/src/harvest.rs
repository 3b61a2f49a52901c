//! Harvesting energy from sources and minerals through extractors.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use indexmap::IndexMap;
use warren_core::{
    active_parts, BodyPartKind, GameTime, ObjectId, ResourceKind, StepFault, ENERGY_REGEN_TIME,
    EXTRACTOR_COOLDOWN, HARVEST_MINERAL_POWER, HARVEST_POWER, MINERAL_REGEN_TIME,
};
use warren_model::{MineralState, ObjectKind, SourceState};
use warren_mutation::{EventKind, ObjectPatch, RoomEvent, StatKind};

/// Applies harvest intents.
pub struct HarvestStep;

impl RoomStep for HarvestStep {
    fn name(&self) -> &'static str {
        "harvest"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();
        // several harvesters may share one deposit; drain a working copy
        let mut source_left: IndexMap<ObjectId, u32> = IndexMap::new();
        let mut mineral_left: IndexMap<ObjectId, u32> = IndexMap::new();
        let mut extractor_used: IndexMap<ObjectId, ()> = IndexMap::new();

        let harvests: Vec<_> = ctx.intents.named("harvest").cloned().collect();
        for intent in harvests {
            let (Some(actor), Some(target)) = (
                ctx.snapshot.object(&intent.actor),
                intent
                    .argument
                    .target_id()
                    .and_then(|id| ctx.snapshot.object(&id)),
            ) else {
                continue;
            };
            let parts = active_parts(&actor.body, BodyPartKind::Work);
            if parts == 0 {
                continue;
            }
            let Some(store) = stores.current(ctx.snapshot, &actor.id) else {
                continue;
            };

            match (&target.source, &target.mineral) {
                (Some(source), _) => {
                    let left = source_left
                        .entry(target.id.clone())
                        .or_insert(source.energy);
                    let mined = (parts * HARVEST_POWER)
                        .min(*left)
                        .min(store.free_capacity(ResourceKind::Energy));
                    if mined == 0 {
                        continue;
                    }
                    *left -= mined;
                    let store = store
                        .with_added(ResourceKind::Energy, mined)
                        .map_err(|e| StepFault::StoreViolation {
                            object: actor.id.to_string(),
                            reason: e.to_string(),
                        })?;
                    stores.put(&actor.id, store);
                    if let Some(user) = &intent.user {
                        ctx.stats.record(user, StatKind::EnergyHarvested, u64::from(mined));
                    }
                    ctx.events.push(RoomEvent {
                        kind: EventKind::Harvest,
                        object: actor.id.clone(),
                        target: Some(target.id.clone()),
                        amount: Some(mined),
                        resource: Some(ResourceKind::Energy),
                    });
                }
                (None, Some(mineral)) => {
                    // mineral mining requires a ready extractor on the tile
                    let Some(extractor) = ctx
                        .snapshot
                        .objects_at(target.pos)
                        .find(|o| o.kind == ObjectKind::Extractor)
                    else {
                        continue;
                    };
                    if !extractor.cooldown_ready(ctx.now()) {
                        continue;
                    }
                    let left = mineral_left
                        .entry(target.id.clone())
                        .or_insert(mineral.amount);
                    let mined = (parts * HARVEST_MINERAL_POWER)
                        .min(*left)
                        .min(store.free_capacity(mineral.kind));
                    if mined == 0 {
                        continue;
                    }
                    *left -= mined;
                    extractor_used.insert(extractor.id.clone(), ());
                    let store = store.with_added(mineral.kind, mined).map_err(|e| {
                        StepFault::StoreViolation {
                            object: actor.id.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    stores.put(&actor.id, store);
                    ctx.events.push(RoomEvent {
                        kind: EventKind::Harvest,
                        object: actor.id.clone(),
                        target: Some(target.id.clone()),
                        amount: Some(mined),
                        resource: Some(mineral.kind),
                    });
                }
                _ => {}
            }
        }

        // settle drained deposits
        for (id, left) in source_left {
            let Some(obj) = ctx.snapshot.object(&id) else {
                continue;
            };
            let Some(source) = &obj.source else { continue };
            if left == source.energy {
                continue;
            }
            let next_regen = if left == 0 && source.next_regen.is_none() {
                Some(GameTime(ctx.now().0 + ENERGY_REGEN_TIME))
            } else {
                source.next_regen
            };
            ctx.writer.patch(
                id,
                ObjectPatch {
                    source: Some(SourceState {
                        energy: left,
                        next_regen,
                        ..source.clone()
                    }),
                    ..Default::default()
                },
            );
        }
        for (id, left) in mineral_left {
            let Some(obj) = ctx.snapshot.object(&id) else {
                continue;
            };
            let Some(mineral) = &obj.mineral else { continue };
            if left == mineral.amount {
                continue;
            }
            let next_regen = if left == 0 && mineral.next_regen.is_none() {
                Some(GameTime(ctx.now().0 + MINERAL_REGEN_TIME))
            } else {
                mineral.next_regen
            };
            ctx.writer.patch(
                id,
                ObjectPatch {
                    mineral: Some(MineralState {
                        amount: left,
                        next_regen,
                        ..mineral.clone()
                    }),
                    ..Default::default()
                },
            );
        }
        for (id, ()) in extractor_used {
            ctx.writer.patch(
                id,
                ObjectPatch {
                    cooldown_until: Some(Some(GameTime(ctx.now().0 + EXTRACTOR_COOLDOWN))),
                    ..Default::default()
                },
            );
        }

        stores.flush(ctx.writer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{creep, insert, pos, room, run_step};
    use warren_core::{
        IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, RoomName, UserId,
    };
    use warren_model::RoomObjectSnapshot;

    fn source(id: &str, energy: u32, room_name: &RoomName) -> RoomObjectSnapshot {
        let mut s = RoomObjectSnapshot::new(
            ObjectId::from(id),
            ObjectKind::Source,
            room_name.clone(),
            pos(11, 10),
        );
        s.source = Some(SourceState {
            energy,
            energy_capacity: 3000,
            next_regen: None,
        });
        s
    }

    fn harvest_order(snap: &mut warren_model::RoomSnapshot, actor: &str, target: &str) {
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(
            ObjectId::from(actor),
            IntentRecord::single(
                "harvest",
                IntentArgument::default().with("id", IntentFieldValue::Text(target.into())),
            ),
        );
        snap.intents.push(env);
    }

    #[test]
    fn two_work_parts_harvest_four_energy() {
        let mut snap = room("W1N1", 50);
        let name = snap.room.clone();
        insert(
            &mut snap,
            creep(
                "h",
                "u1",
                pos(10, 10),
                &[(BodyPartKind::Work, 2), (BodyPartKind::Carry, 1)],
                &name,
            ),
        );
        insert(&mut snap, source("s", 3000, &name));
        harvest_order(&mut snap, "h", "s");
        let run = run_step(&HarvestStep, &snap);
        assert_eq!(
            run.batch.patches[&ObjectId::from("h")]
                .store
                .as_ref()
                .unwrap()
                .energy(),
            4
        );
        assert_eq!(
            run.batch.patches[&ObjectId::from("s")]
                .source
                .as_ref()
                .unwrap()
                .energy,
            2996
        );
        assert_eq!(run.stats[0].kind, StatKind::EnergyHarvested);
        assert_eq!(run.stats[0].amount, 4);
    }

    #[test]
    fn draining_the_source_arms_the_regen_timer() {
        let mut snap = room("W1N1", 50);
        let name = snap.room.clone();
        insert(
            &mut snap,
            creep(
                "h",
                "u1",
                pos(10, 10),
                &[(BodyPartKind::Work, 2), (BodyPartKind::Carry, 1)],
                &name,
            ),
        );
        insert(&mut snap, source("s", 3, &name));
        harvest_order(&mut snap, "h", "s");
        let run = run_step(&HarvestStep, &snap);
        let state = run.batch.patches[&ObjectId::from("s")]
            .source
            .as_ref()
            .unwrap();
        assert_eq!(state.energy, 0);
        assert_eq!(state.next_regen, Some(GameTime(50 + ENERGY_REGEN_TIME)));
    }

    #[test]
    fn two_harvesters_share_a_nearly_empty_source() {
        let mut snap = room("W1N1", 50);
        let name = snap.room.clone();
        for (id, at) in [("h1", (10u8, 10u8)), ("h2", (12, 10))] {
            insert(
                &mut snap,
                creep(
                    id,
                    "u1",
                    pos(at.0, at.1),
                    &[(BodyPartKind::Work, 2), (BodyPartKind::Carry, 1)],
                    &name,
                ),
            );
        }
        insert(&mut snap, source("s", 6, &name));
        harvest_order(&mut snap, "h1", "s");
        harvest_order(&mut snap, "h2", "s");
        let run = run_step(&HarvestStep, &snap);
        let h1 = run.batch.patches[&ObjectId::from("h1")].store.as_ref().unwrap();
        let h2 = run.batch.patches[&ObjectId::from("h2")].store.as_ref().unwrap();
        assert_eq!(h1.energy() + h2.energy(), 6); // never over-drained
    }

    #[test]
    fn full_creep_harvests_nothing() {
        let mut snap = room("W1N1", 50);
        let name = snap.room.clone();
        let mut full = creep(
            "h",
            "u1",
            pos(10, 10),
            &[(BodyPartKind::Work, 2), (BodyPartKind::Carry, 1)],
            &name,
        );
        crate::testkit::give(&mut full, ResourceKind::Energy, 50);
        insert(&mut snap, full);
        insert(&mut snap, source("s", 3000, &name));
        harvest_order(&mut snap, "h", "s");
        let run = run_step(&HarvestStep, &snap);
        assert!(run.batch.is_empty());
    }
}

//! Scheduled structure decay and dropped-resource evaporation.

use crate::context::StepContext;
use crate::step::RoomStep;
use warren_core::{
    GameTime, StepFault, CONTAINER_DECAY_AMOUNT, CONTAINER_DECAY_TIME,
    CONTAINER_DECAY_TIME_OWNED, ENERGY_DECAY_DIVISOR, RAMPART_DECAY_AMOUNT, RAMPART_DECAY_TIME,
    ROAD_DECAY_AMOUNT, ROAD_DECAY_TIME,
};
use warren_model::ObjectKind;
use warren_mutation::{EventKind, ObjectPatch, RoomEvent};

/// Applies decay schedules to roads, ramparts, containers and dropped
/// resources.
pub struct StructureDecayStep;

fn decay_schedule(ctx: &StepContext<'_>, kind: ObjectKind) -> Option<(u32, u64)> {
    match kind {
        ObjectKind::Road => Some((ROAD_DECAY_AMOUNT, ROAD_DECAY_TIME)),
        ObjectKind::Rampart => Some((RAMPART_DECAY_AMOUNT, RAMPART_DECAY_TIME)),
        ObjectKind::Container => {
            let owned = ctx
                .snapshot
                .controller()
                .is_some_and(|c| c.user.is_some());
            let period = if owned {
                CONTAINER_DECAY_TIME_OWNED
            } else {
                CONTAINER_DECAY_TIME
            };
            Some((CONTAINER_DECAY_AMOUNT, period))
        }
        _ => None,
    }
}

impl RoomStep for StructureDecayStep {
    fn name(&self) -> &'static str {
        "structureDecay"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        for obj in ctx.snapshot.objects.values() {
            if obj.kind == ObjectKind::Resource {
                let Some(store) = &obj.store else { continue };
                let total = store.total();
                if total == 0 {
                    ctx.writer.remove(obj.id.clone());
                    continue;
                }
                let mut store = store.clone();
                let held: Vec<_> = store.amounts().collect();
                for (resource, amount) in held {
                    let lost = amount.div_ceil(ENERGY_DECAY_DIVISOR);
                    store = store
                        .with_removed(resource, lost.min(amount))
                        .map_err(|e| StepFault::StoreViolation {
                            object: obj.id.to_string(),
                            reason: e.to_string(),
                        })?;
                }
                if store.total() == 0 {
                    ctx.writer.remove(obj.id.clone());
                } else {
                    ctx.writer.patch(
                        obj.id.clone(),
                        ObjectPatch {
                            store: Some(store),
                            ..Default::default()
                        },
                    );
                }
                continue;
            }

            let Some((amount, period)) = decay_schedule(ctx, obj.kind) else {
                continue;
            };
            let Some(hits) = obj.hits else { continue };
            match obj.next_decay {
                None => {
                    // first sighting: arm the schedule
                    ctx.writer.patch(
                        obj.id.clone(),
                        ObjectPatch {
                            next_decay: Some(Some(GameTime(now.0 + period))),
                            ..Default::default()
                        },
                    );
                }
                Some(due) if due <= now => {
                    if hits <= amount {
                        ctx.writer.remove(obj.id.clone());
                        ctx.events.push(RoomEvent {
                            kind: EventKind::ObjectDestroyed,
                            object: obj.id.clone(),
                            target: None,
                            amount: None,
                            resource: None,
                        });
                    } else {
                        ctx.writer.patch(
                            obj.id.clone(),
                            ObjectPatch {
                                hits: Some(hits - amount),
                                next_decay: Some(Some(GameTime(now.0 + period))),
                                ..Default::default()
                            },
                        );
                    }
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{give, insert, pos, room, run_step, structure};
    use warren_core::{ObjectId, ResourceKind, RoomName};
    use warren_model::RoomObjectSnapshot;

    fn road(hits: u32, due: u64, room_name: &RoomName) -> RoomObjectSnapshot {
        let mut r = structure("road", ObjectKind::Road, pos(10, 10), room_name);
        r.hits = Some(hits);
        r.hits_max = Some(5000);
        r.next_decay = Some(GameTime(due));
        r
    }

    #[test]
    fn due_road_loses_hits_and_reschedules() {
        let mut snap = room("W1N1", 2000);
        let name = snap.room.clone();
        insert(&mut snap, road(4000, 2000, &name));
        let run = run_step(&StructureDecayStep, &snap);
        let patch = &run.batch.patches[&ObjectId::from("road")];
        assert_eq!(patch.hits, Some(3900));
        assert_eq!(patch.next_decay, Some(Some(GameTime(2000 + ROAD_DECAY_TIME))));
    }

    #[test]
    fn decayed_out_road_is_removed() {
        let mut snap = room("W1N1", 2000);
        let name = snap.room.clone();
        insert(&mut snap, road(80, 1999, &name));
        let run = run_step(&StructureDecayStep, &snap);
        assert!(run.batch.removals.contains(&ObjectId::from("road")));
    }

    #[test]
    fn unscheduled_rampart_gets_a_timer_without_damage() {
        let mut snap = room("W1N1", 2000);
        let name = snap.room.clone();
        let mut ramp = structure("ramp", ObjectKind::Rampart, pos(12, 12), &name);
        ramp.hits = Some(10_000);
        ramp.hits_max = Some(300_000);
        insert(&mut snap, ramp);
        let run = run_step(&StructureDecayStep, &snap);
        let patch = &run.batch.patches[&ObjectId::from("ramp")];
        assert_eq!(patch.hits, None);
        assert_eq!(
            patch.next_decay,
            Some(Some(GameTime(2000 + RAMPART_DECAY_TIME)))
        );
    }

    #[test]
    fn dropped_energy_evaporates_proportionally() {
        let mut snap = room("W1N1", 2000);
        let name = snap.room.clone();
        let mut pile = RoomObjectSnapshot::new(
            ObjectId::from("pile"),
            ObjectKind::Resource,
            name.clone(),
            pos(20, 20),
        );
        pile.store = Some(warren_model::Store::empty(
            warren_model::StoreCapacity::Unbounded,
        ));
        give(&mut pile, ResourceKind::Energy, 2500);
        insert(&mut snap, pile);
        let run = run_step(&StructureDecayStep, &snap);
        assert_eq!(
            run.batch.patches[&ObjectId::from("pile")]
                .store
                .as_ref()
                .unwrap()
                .energy(),
            2497
        );
    }

    #[test]
    fn exhausted_pile_is_removed() {
        let mut snap = room("W1N1", 2000);
        let name = snap.room.clone();
        let mut pile = RoomObjectSnapshot::new(
            ObjectId::from("pile"),
            ObjectKind::Resource,
            name.clone(),
            pos(20, 20),
        );
        pile.store = Some(warren_model::Store::empty(
            warren_model::StoreCapacity::Unbounded,
        ));
        give(&mut pile, ResourceKind::Energy, 1);
        insert(&mut snap, pile);
        let run = run_step(&StructureDecayStep, &snap);
        assert!(run.batch.removals.contains(&ObjectId::from("pile")));
    }
}

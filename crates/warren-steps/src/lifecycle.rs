//! Creep death: old age and this tick's combat losses.

use crate::context::StepContext;
use crate::step::RoomStep;
use warren_core::{ObjectId, StepFault};
use warren_model::{ObjectKind, RoomObjectSnapshot, Store, StoreCapacity};
use warren_mutation::{EventKind, RoomEvent, StatKind};

/// Removes dead creeps and drops what they carried.
pub struct CreepLifecycleStep;

impl RoomStep for CreepLifecycleStep {
    fn name(&self) -> &'static str {
        "creepLifecycle"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        let suicides: Vec<ObjectId> = ctx
            .intents
            .named("suicide")
            .map(|i| i.actor.clone())
            .collect();
        let dead: Vec<_> = ctx
            .snapshot
            .objects
            .values()
            .filter(|o| {
                o.kind == ObjectKind::Creep
                    && !o.spawning
                    && (o.age_time.is_some_and(|t| t <= now)
                        || ctx.ledger.died_this_tick(o)
                        || suicides.contains(&o.id))
            })
            .cloned()
            .collect();

        for creep in dead {
            let at = ctx.ledger.position_of(&creep);
            if let Some(store) = &creep.store {
                if store.total() > 0 {
                    let pile_id = ObjectId::from(format!("{}-tomb", creep.id).as_str());
                    let mut pile = RoomObjectSnapshot::new(
                        pile_id,
                        ObjectKind::Resource,
                        ctx.snapshot.room.clone(),
                        at,
                    );
                    let mut cargo = Store::empty(StoreCapacity::Unbounded);
                    for (resource, amount) in store.amounts() {
                        cargo = cargo.with_added(resource, amount).map_err(|e| {
                            StepFault::StoreViolation {
                                object: creep.id.to_string(),
                                reason: e.to_string(),
                            }
                        })?;
                    }
                    pile.store = Some(cargo);
                    ctx.writer.upsert(pile);
                }
            }
            ctx.writer.remove(creep.id.clone());
            if let Some(user) = &creep.user {
                ctx.stats.record(user, StatKind::CreepsLost, 1);
            }
            ctx.events.push(RoomEvent {
                kind: EventKind::ObjectDestroyed,
                object: creep.id.clone(),
                target: None,
                amount: None,
                resource: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{creep, give, insert, pos, room, run_step};
    use warren_core::{BodyPartKind, GameTime, ResourceKind, UserId};

    #[test]
    fn aged_out_creep_dies_and_drops_its_cargo() {
        let mut snap = room("W1N1", 3000);
        let name = snap.room.clone();
        let mut c = creep(
            "c",
            "u1",
            pos(10, 10),
            &[(BodyPartKind::Carry, 2), (BodyPartKind::Move, 1)],
            &name,
        );
        c.age_time = Some(GameTime(3000));
        give(&mut c, ResourceKind::Energy, 80);
        insert(&mut snap, c);
        let run = run_step(&CreepLifecycleStep, &snap);
        assert!(run.batch.removals.contains(&warren_core::ObjectId::from("c")));
        let pile = &run.batch.upserts[0];
        assert_eq!(pile.kind, ObjectKind::Resource);
        assert_eq!(pile.pos, pos(10, 10));
        assert_eq!(pile.store.as_ref().unwrap().energy(), 80);
        assert_eq!(run.stats[0].user, UserId::from("u1"));
        assert_eq!(run.stats[0].kind, StatKind::CreepsLost);
    }

    #[test]
    fn suicide_is_honored_immediately() {
        let mut snap = room("W1N1", 3000);
        let name = snap.room.clone();
        let mut c = creep("c", "u1", pos(10, 10), &[(BodyPartKind::Move, 1)], &name);
        c.age_time = Some(GameTime(9999));
        insert(&mut snap, c);
        let mut env = warren_core::IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(
            warren_core::ObjectId::from("c"),
            warren_core::IntentRecord::single("suicide", warren_core::IntentArgument::default()),
        );
        snap.intents.push(env);
        let run = run_step(&CreepLifecycleStep, &snap);
        assert!(run.batch.removals.contains(&warren_core::ObjectId::from("c")));
    }

    #[test]
    fn creep_with_life_left_survives() {
        let mut snap = room("W1N1", 3000);
        let name = snap.room.clone();
        let mut c = creep("c", "u1", pos(10, 10), &[(BodyPartKind::Move, 1)], &name);
        c.age_time = Some(GameTime(3001));
        insert(&mut snap, c);
        let run = run_step(&CreepLifecycleStep, &snap);
        assert!(run.batch.is_empty());
    }

    #[test]
    fn spawning_creep_never_ages_out() {
        let mut snap = room("W1N1", 3000);
        let name = snap.room.clone();
        let mut c = creep("c", "u1", pos(10, 10), &[(BodyPartKind::Move, 1)], &name);
        c.spawning = true;
        c.age_time = Some(GameTime(10));
        insert(&mut snap, c);
        let run = run_step(&CreepLifecycleStep, &snap);
        assert!(run.batch.is_empty());
    }
}

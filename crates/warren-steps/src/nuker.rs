//! Nuke launches.

use crate::context::StepContext;
use crate::step::RoomStep;
use warren_core::{
    GameTime, ObjectId, ResourceKind, RoomName, RoomPosition, StepFault, NUKER_COOLDOWN,
    NUKER_ENERGY_COST, NUKER_GHODIUM_COST, NUKE_LAND_TIME,
};
use warren_model::{NukeState, ObjectKind, RoomObjectSnapshot, Store, StoreCapacity};
use warren_mutation::ObjectPatch;

/// Applies `launchNuke` intents.
pub struct NukerStep;

impl RoomStep for NukerStep {
    fn name(&self) -> &'static str {
        "nuker"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let launches: Vec<_> = ctx.intents.named("launchNuke").cloned().collect();
        for intent in launches {
            let Some(nuker) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if nuker.kind != ObjectKind::Nuker || !nuker.cooldown_ready(ctx.now()) {
                continue;
            }
            let Some(store) = &nuker.store else { continue };
            if store.energy() < NUKER_ENERGY_COST
                || store.get(ResourceKind::Ghodium) < NUKER_GHODIUM_COST
            {
                continue;
            }
            let (Some(target_room), Some(x), Some(y)) = (
                intent.argument.text("roomName"),
                intent.argument.amount("x"),
                intent.argument.amount("y"),
            ) else {
                continue;
            };
            let Some(landing) = u8::try_from(x)
                .ok()
                .zip(u8::try_from(y).ok())
                .and_then(|(x, y)| RoomPosition::new(x, y))
            else {
                continue;
            };

            let target_room = RoomName::from(target_room);
            let nuke_id = ObjectId::from(format!("{}-nuke-{}", nuker.id, ctx.now().0).as_str());
            let mut nuke = RoomObjectSnapshot::new(
                nuke_id,
                ObjectKind::Nuke,
                target_room,
                landing,
            );
            nuke.user = nuker.user.clone();
            nuke.nuke = Some(NukeState {
                land_time: GameTime(ctx.now().0 + NUKE_LAND_TIME),
                launch_room: ctx.snapshot.room.clone(),
            });
            ctx.writer.upsert(nuke);
            ctx.writer.patch(
                nuker.id.clone(),
                ObjectPatch {
                    store: Some(Store::empty(StoreCapacity::PerResource(
                        [
                            (ResourceKind::Energy, NUKER_ENERGY_COST),
                            (ResourceKind::Ghodium, NUKER_GHODIUM_COST),
                        ]
                        .into_iter()
                        .collect(),
                    ))),
                    cooldown_until: Some(Some(GameTime(ctx.now().0 + NUKER_COOLDOWN))),
                    ..Default::default()
                },
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{give, insert, pos, room, run_step, structure};
    use warren_core::{IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, UserId};

    fn loaded_nuker(room_name: &RoomName) -> RoomObjectSnapshot {
        let mut n = structure("nk", ObjectKind::Nuker, pos(10, 10), room_name);
        n.user = Some(UserId::from("u1"));
        n.store = Some(Store::empty(StoreCapacity::PerResource(
            [
                (ResourceKind::Energy, NUKER_ENERGY_COST),
                (ResourceKind::Ghodium, NUKER_GHODIUM_COST),
            ]
            .into_iter()
            .collect(),
        )));
        give(&mut n, ResourceKind::Energy, NUKER_ENERGY_COST);
        give(&mut n, ResourceKind::Ghodium, NUKER_GHODIUM_COST);
        n
    }

    fn launch_order(snap: &mut warren_model::RoomSnapshot, target: &str, x: u32, y: u32) {
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(
            ObjectId::from("nk"),
            IntentRecord::single(
                "launchNuke",
                IntentArgument::default()
                    .with("roomName", IntentFieldValue::Text(target.into()))
                    .with("x", IntentFieldValue::Number(f64::from(x)))
                    .with("y", IntentFieldValue::Number(f64::from(y))),
            ),
        );
        snap.intents.push(env);
    }

    #[test]
    fn launch_empties_the_nuker_and_upserts_a_nuke_in_flight() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        insert(&mut snap, loaded_nuker(&name));
        launch_order(&mut snap, "W2N1", 25, 25);
        let run = run_step(&NukerStep, &snap);
        let nuke = &run.batch.upserts[0];
        assert_eq!(nuke.kind, ObjectKind::Nuke);
        assert_eq!(nuke.room, RoomName::from("W2N1"));
        assert_eq!(nuke.pos, pos(25, 25));
        let state = nuke.nuke.as_ref().unwrap();
        assert_eq!(state.land_time, GameTime(1000 + NUKE_LAND_TIME));
        assert_eq!(state.launch_room, name);
        let patch = &run.batch.patches[&ObjectId::from("nk")];
        assert_eq!(patch.store.as_ref().unwrap().total(), 0);
        assert_eq!(patch.cooldown_until, Some(Some(GameTime(1000 + NUKER_COOLDOWN))));
    }

    #[test]
    fn half_loaded_nuker_does_not_fire() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        let mut n = loaded_nuker(&name);
        n.store = Some(Store::single(ResourceKind::Energy, NUKER_ENERGY_COST));
        insert(&mut snap, n);
        launch_order(&mut snap, "W2N1", 25, 25);
        let run = run_step(&NukerStep, &snap);
        assert!(run.batch.is_empty());
    }
}

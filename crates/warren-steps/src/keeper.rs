//! Keeper lair spawning.

use crate::context::StepContext;
use crate::step::RoomStep;
use smallvec::smallvec;
use warren_core::{
    BodyPart, BodyPartKind, GameTime, ObjectId, StepFault, BODYPART_HITS, CREEP_LIFE_TIME,
    KEEPER_SPAWN_DELAY,
};
use warren_model::{ObjectKind, RoomObjectSnapshot, Store};
use warren_mutation::ObjectPatch;

/// Spawns an unowned keeper at each ready lair.
pub struct KeeperLairStep;

fn keeper_body() -> warren_core::Body {
    let mut body = smallvec![];
    for _ in 0..17 {
        body.push(BodyPart::new(BodyPartKind::Tough));
    }
    for _ in 0..13 {
        body.push(BodyPart::new(BodyPartKind::Move));
    }
    for _ in 0..10 {
        body.push(BodyPart::new(BodyPartKind::Attack));
    }
    for _ in 0..10 {
        body.push(BodyPart::new(BodyPartKind::RangedAttack));
    }
    body
}

impl RoomStep for KeeperLairStep {
    fn name(&self) -> &'static str {
        "keeperLair"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        for lair in ctx.snapshot.objects.values() {
            if lair.kind != ObjectKind::KeeperLair || !lair.cooldown_ready(now) {
                continue;
            }
            let keeper_id = ObjectId::from(format!("{}-keeper-{}", lair.id, now.0).as_str());
            let body = keeper_body();
            let mut keeper = RoomObjectSnapshot::new(
                keeper_id,
                ObjectKind::Creep,
                ctx.snapshot.room.clone(),
                lair.pos,
            );
            keeper.hits = Some(body.len() as u32 * BODYPART_HITS);
            keeper.hits_max = keeper.hits;
            keeper.body = body;
            keeper.age_time = Some(GameTime(now.0 + CREEP_LIFE_TIME));
            keeper.store = Some(Store::with_total_capacity(0));
            ctx.writer.upsert(keeper);
            ctx.writer.patch(
                lair.id.clone(),
                ObjectPatch {
                    cooldown_until: Some(Some(GameTime(now.0 + KEEPER_SPAWN_DELAY))),
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
    use crate::testkit::{insert, pos, room, run_step, structure};

    #[test]
    fn ready_lair_spawns_an_unowned_keeper_and_rearms() {
        let mut snap = room("W5N5", 700);
        let name = snap.room.clone();
        insert(&mut snap, structure("lair", ObjectKind::KeeperLair, pos(20, 20), &name));
        let run = run_step(&KeeperLairStep, &snap);
        let keeper = &run.batch.upserts[0];
        assert_eq!(keeper.kind, ObjectKind::Creep);
        assert!(keeper.user.is_none());
        assert_eq!(keeper.pos, pos(20, 20));
        assert_eq!(keeper.hits, Some(5000));
        assert_eq!(
            run.batch.patches[&ObjectId::from("lair")].cooldown_until,
            Some(Some(GameTime(700 + KEEPER_SPAWN_DELAY)))
        );
    }

    #[test]
    fn cooling_lair_waits() {
        let mut snap = room("W5N5", 700);
        let name = snap.room.clone();
        let mut lair = structure("lair", ObjectKind::KeeperLair, pos(20, 20), &name);
        lair.cooldown_until = Some(GameTime(900));
        insert(&mut snap, lair);
        let run = run_step(&KeeperLairStep, &snap);
        assert!(run.batch.is_empty());
    }
}

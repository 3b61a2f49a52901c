//! Nuke impacts.

use crate::context::StepContext;
use crate::damage::settle_hits;
use crate::step::RoomStep;
use indexmap::IndexSet;
use warren_core::{ObjectId, StepFault, NUKE_DAMAGE_CENTER, NUKE_DAMAGE_RING, NUKE_RANGE};
use warren_model::ObjectKind;

/// Detonates nukes whose landing tick has arrived.
pub struct NukeLandingStep;

impl RoomStep for NukeLandingStep {
    fn name(&self) -> &'static str {
        "nukeLanding"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        let mut touched: IndexSet<ObjectId> = IndexSet::new();

        let landing: Vec<_> = ctx
            .snapshot
            .objects
            .values()
            .filter(|o| {
                o.kind == ObjectKind::Nuke
                    && o.nuke.as_ref().is_some_and(|n| n.land_time <= now)
            })
            .cloned()
            .collect();
        for nuke in landing {
            for obj in ctx.snapshot.objects.values() {
                if obj.hits.is_none() || obj.kind == ObjectKind::Nuke {
                    continue;
                }
                let range = nuke.pos.range_to(obj.pos);
                let damage = if range == 0 {
                    NUKE_DAMAGE_CENTER
                } else if range <= NUKE_RANGE {
                    NUKE_DAMAGE_RING
                } else {
                    continue;
                };
                ctx.ledger.add_hits_delta(&obj.id, -i64::from(damage));
                touched.insert(obj.id.clone());
            }
            ctx.writer.remove(nuke.id.clone());
        }

        settle_hits(ctx, &touched);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{creep, insert, pos, room, run_step, structure};
    use warren_core::{BodyPartKind, GameTime, RoomName};
    use warren_model::{NukeState, RoomObjectSnapshot};

    fn nuke(at: (u8, u8), land: u64, room_name: &RoomName) -> RoomObjectSnapshot {
        let mut n = RoomObjectSnapshot::new(
            ObjectId::from("nuke"),
            ObjectKind::Nuke,
            room_name.clone(),
            pos(at.0, at.1),
        );
        n.nuke = Some(NukeState {
            land_time: GameTime(land),
            launch_room: RoomName::from("W9N9"),
        });
        n
    }

    #[test]
    fn impact_flattens_ground_zero_and_bruises_the_ring() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        insert(&mut snap, nuke((25, 25), 1000, &name));
        let mut wall = structure("wall", ObjectKind::Wall, pos(25, 25), &name);
        wall.hits = Some(20_000_000);
        wall.hits_max = Some(300_000_000);
        insert(&mut snap, wall);
        let mut rampart = structure("ramp", ObjectKind::Rampart, pos(27, 25), &name);
        rampart.hits = Some(8_000_000);
        rampart.hits_max = Some(300_000_000);
        insert(&mut snap, rampart);
        insert(
            &mut snap,
            creep("c", "u1", pos(26, 25), &[(BodyPartKind::Tough, 10)], &name),
        );
        let run = run_step(&NukeLandingStep, &snap);
        assert_eq!(run.batch.patches[&ObjectId::from("wall")].hits, Some(10_000_000));
        assert_eq!(run.batch.patches[&ObjectId::from("ramp")].hits, Some(3_000_000));
        // the creep is obliterated but lifecycle owns creep removal
        assert_eq!(run.batch.patches[&ObjectId::from("c")].hits, Some(0));
        assert!(run.batch.removals.contains(&ObjectId::from("nuke")));
    }

    #[test]
    fn nuke_still_in_flight_does_nothing() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        insert(&mut snap, nuke((25, 25), 5000, &name));
        let run = run_step(&NukeLandingStep, &snap);
        assert!(run.batch.is_empty());
    }
}

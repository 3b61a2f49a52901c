//! Source and mineral regeneration.

use crate::context::StepContext;
use crate::step::RoomStep;
use warren_core::StepFault;
use warren_model::{MineralState, SourceState};
use warren_mutation::ObjectPatch;

/// Mineral amount granted per cycle for each density class (1..=4).
pub fn mineral_regen_amount(density: u32) -> u32 {
    match density {
        1 => 15_000,
        2 => 35_000,
        3 => 70_000,
        _ => 100_000,
    }
}

/// Refills sources and mineral deposits whose regeneration tick has
/// arrived.
pub struct RegenerationStep;

impl RoomStep for RegenerationStep {
    fn name(&self) -> &'static str {
        "regeneration"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        for obj in ctx.snapshot.objects.values() {
            if let Some(source) = &obj.source {
                if source.next_regen.is_some_and(|t| t <= now) {
                    ctx.writer.patch(
                        obj.id.clone(),
                        ObjectPatch {
                            source: Some(SourceState {
                                energy: source.energy_capacity,
                                next_regen: None,
                                ..source.clone()
                            }),
                            ..Default::default()
                        },
                    );
                }
            }
            if let Some(mineral) = &obj.mineral {
                if mineral.next_regen.is_some_and(|t| t <= now) {
                    ctx.writer.patch(
                        obj.id.clone(),
                        ObjectPatch {
                            mineral: Some(MineralState {
                                amount: mineral_regen_amount(mineral.density),
                                next_regen: None,
                                ..mineral.clone()
                            }),
                            ..Default::default()
                        },
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{insert, pos, room, run_step};
    use warren_core::{GameTime, ObjectId, ResourceKind};
    use warren_model::{ObjectKind, RoomObjectSnapshot};

    #[test]
    fn due_source_refills_and_clears_its_timer() {
        let mut snap = room("W1N1", 400);
        let name = snap.room.clone();
        let mut s = RoomObjectSnapshot::new(
            ObjectId::from("s"),
            ObjectKind::Source,
            name.clone(),
            pos(11, 10),
        );
        s.source = Some(SourceState {
            energy: 0,
            energy_capacity: 3000,
            next_regen: Some(GameTime(400)),
        });
        insert(&mut snap, s);
        let run = run_step(&RegenerationStep, &snap);
        let state = run.batch.patches[&ObjectId::from("s")].source.as_ref().unwrap();
        assert_eq!(state.energy, 3000);
        assert_eq!(state.next_regen, None);
    }

    #[test]
    fn mineral_regrows_to_its_density_amount() {
        let mut snap = room("W1N1", 400);
        let name = snap.room.clone();
        let mut m = RoomObjectSnapshot::new(
            ObjectId::from("m"),
            ObjectKind::Mineral,
            name.clone(),
            pos(30, 30),
        );
        m.mineral = Some(MineralState {
            kind: ResourceKind::Utrium,
            amount: 0,
            density: 3,
            next_regen: Some(GameTime(399)),
        });
        insert(&mut snap, m);
        let run = run_step(&RegenerationStep, &snap);
        let state = run.batch.patches[&ObjectId::from("m")].mineral.as_ref().unwrap();
        assert_eq!(state.amount, 70_000);
        assert_eq!(state.next_regen, None);
    }

    #[test]
    fn undrained_source_is_untouched() {
        let mut snap = room("W1N1", 400);
        let name = snap.room.clone();
        let mut s = RoomObjectSnapshot::new(
            ObjectId::from("s"),
            ObjectKind::Source,
            name.clone(),
            pos(11, 10),
        );
        s.source = Some(SourceState {
            energy: 3000,
            energy_capacity: 3000,
            next_regen: None,
        });
        insert(&mut snap, s);
        let run = run_step(&RegenerationStep, &snap);
        assert!(run.batch.is_empty());
    }
}

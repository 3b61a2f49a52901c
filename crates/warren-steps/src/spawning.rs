//! Spawn job completion.

use crate::context::StepContext;
use crate::step::RoomStep;
use warren_core::{
    active_parts, BodyPartKind, GameTime, StepFault, CREEP_CLAIM_LIFE_TIME, CREEP_LIFE_TIME,
};
use warren_model::ObjectKind;
use warren_mutation::{ObjectPatch, StatKind};

/// Releases creeps whose spawn job has finished.
pub struct SpawnSpawningStep;

impl RoomStep for SpawnSpawningStep {
    fn name(&self) -> &'static str {
        "spawnSpawning"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        for spawn in ctx.snapshot.objects.values() {
            if spawn.kind != ObjectKind::Spawn {
                continue;
            }
            let Some(job) = &spawn.spawn_job else { continue };
            if job.ends_at > now {
                continue;
            }
            let Some(creep) = ctx.snapshot.object(&job.creep) else {
                // the creep vanished mid-spawn, just clear the job
                ctx.writer.patch(
                    spawn.id.clone(),
                    ObjectPatch {
                        spawn_job: Some(None),
                        ..Default::default()
                    },
                );
                continue;
            };
            let life = if active_parts(&creep.body, BodyPartKind::Claim) > 0 {
                CREEP_CLAIM_LIFE_TIME
            } else {
                CREEP_LIFE_TIME
            };
            ctx.writer.patch(
                creep.id.clone(),
                ObjectPatch {
                    spawning: Some(false),
                    age_time: Some(Some(GameTime(now.0 + life))),
                    ..Default::default()
                },
            );
            ctx.writer.patch(
                spawn.id.clone(),
                ObjectPatch {
                    spawn_job: Some(None),
                    ..Default::default()
                },
            );
            if let Some(user) = &creep.user {
                ctx.stats.record(user, StatKind::CreepsProduced, 1);
            }
        }
        Ok(())
    }
}

//! Power processing in power spawns.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use warren_core::{ResourceKind, StepFault, POWER_SPAWN_ENERGY_RATIO};
use warren_model::ObjectKind;
use warren_mutation::{EventKind, RoomEvent, StatKind};

/// Applies `processPower` intents. One unit of power plus fifty energy
/// is destroyed per tick per power spawn.
pub struct PowerSpawnStep;

impl RoomStep for PowerSpawnStep {
    fn name(&self) -> &'static str {
        "powerSpawn"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();

        let intents: Vec<_> = ctx.intents.named("processPower").cloned().collect();
        for intent in intents {
            let Some(spawn) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if spawn.kind != ObjectKind::PowerSpawn {
                continue;
            }
            let Some(store) = stores.current(ctx.snapshot, &spawn.id) else {
                continue;
            };
            if store.get(ResourceKind::Power) < 1 || store.energy() < POWER_SPAWN_ENERGY_RATIO {
                continue;
            }
            let store = store
                .with_removed(ResourceKind::Power, 1)
                .and_then(|s| s.with_removed(ResourceKind::Energy, POWER_SPAWN_ENERGY_RATIO))
                .map_err(|e| StepFault::StoreViolation {
                    object: spawn.id.to_string(),
                    reason: e.to_string(),
                })?;
            stores.put(&spawn.id, store);
            if let Some(user) = &intent.user {
                ctx.stats.record(user, StatKind::PowerProcessed, 1);
            }
            ctx.events.push(RoomEvent {
                kind: EventKind::Power,
                object: spawn.id.clone(),
                target: None,
                amount: Some(1),
                resource: Some(ResourceKind::Power),
            });
        }

        stores.flush(ctx.writer);
        Ok(())
    }
}

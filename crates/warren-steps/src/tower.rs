//! Tower actions: attack, heal and repair with range falloff.

use crate::context::{StepContext, StoreScratch};
use crate::damage::settle_hits;
use crate::step::RoomStep;
use indexmap::IndexSet;
use warren_core::{
    ResourceKind, StepFault, TOWER_ENERGY_COST, TOWER_FALLOFF_PERCENT, TOWER_FALLOFF_RANGE,
    TOWER_OPTIMAL_RANGE, TOWER_POWER_ATTACK, TOWER_POWER_HEAL, TOWER_POWER_REPAIR,
};
use warren_model::ObjectKind;
use warren_mutation::{EventKind, RoomEvent};

/// Applies tower intents.
pub struct TowerStep;

/// Tower power after range falloff: full up to the optimal range,
/// dropping linearly to 25% at the falloff range and beyond.
pub fn tower_power(base: u32, range: u32) -> u32 {
    if range <= TOWER_OPTIMAL_RANGE {
        return base;
    }
    let over = range.min(TOWER_FALLOFF_RANGE) - TOWER_OPTIMAL_RANGE;
    let span = TOWER_FALLOFF_RANGE - TOWER_OPTIMAL_RANGE;
    base - base * TOWER_FALLOFF_PERCENT * over / (100 * span)
}

impl RoomStep for TowerStep {
    fn name(&self) -> &'static str {
        "tower"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();
        let mut touched: IndexSet<warren_core::ObjectId> = IndexSet::new();

        for (name, base, event) in [
            ("attack", TOWER_POWER_ATTACK, EventKind::Attack),
            ("heal", TOWER_POWER_HEAL, EventKind::Heal),
            ("repair", TOWER_POWER_REPAIR, EventKind::Repair),
        ] {
            let intents: Vec<_> = ctx
                .intents
                .named(name)
                .filter(|i| {
                    ctx.snapshot
                        .object(&i.actor)
                        .is_some_and(|o| o.kind == ObjectKind::Tower)
                })
                .cloned()
                .collect();
            for intent in intents {
                let (Some(tower), Some(target)) = (
                    ctx.snapshot.object(&intent.actor),
                    intent
                        .argument
                        .target_id()
                        .and_then(|id| ctx.snapshot.object(&id)),
                ) else {
                    continue;
                };
                let Some(store) = stores.current(ctx.snapshot, &tower.id) else {
                    continue;
                };
                if store.energy() < TOWER_ENERGY_COST {
                    continue;
                }
                let range = tower.pos.range_to(ctx.ledger.position_of(target));
                let power = tower_power(base, range);
                let delta = match name {
                    "attack" => -i64::from(power),
                    _ => {
                        if ctx.ledger.effective_hits(target) == Some(0) {
                            continue;
                        }
                        i64::from(power)
                    }
                };
                let store = store
                    .with_removed(ResourceKind::Energy, TOWER_ENERGY_COST)
                    .map_err(|e| StepFault::StoreViolation {
                        object: tower.id.to_string(),
                        reason: e.to_string(),
                    })?;
                stores.put(&tower.id, store);
                ctx.ledger.add_hits_delta(&target.id, delta);
                touched.insert(target.id.clone());
                ctx.events.push(RoomEvent {
                    kind: event,
                    object: tower.id.clone(),
                    target: Some(target.id.clone()),
                    amount: Some(power),
                    resource: None,
                });
            }
        }

        stores.flush(ctx.writer);
        settle_hits(ctx, &touched);
        Ok(())
    }
}

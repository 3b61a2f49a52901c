//! Power creep abilities: `usePower` applications, cooldown expiry and
//! effect decay.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use warren_core::{GameTime, ResourceKind, StepFault};
use warren_model::{Effect, ObjectKind, PowerCreepState, PowerKind, PowerLevel};
use warren_mutation::{EventKind, ObjectPatch, RoomEvent};

/// Applies `usePower` intents.
pub struct PowerAbilityStep;

impl RoomStep for PowerAbilityStep {
    fn name(&self) -> &'static str {
        "powerAbility"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();
        let now = ctx.now();

        let intents: Vec<_> = ctx.intents.named("usePower").cloned().collect();
        for intent in intents {
            let Some(actor) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            let Some(state) = &actor.power_creep else {
                continue;
            };
            let Some(power) = intent.argument.amount("power").and_then(PowerKind::from_code)
            else {
                continue;
            };
            let Some(learned) = state.powers.get(&power) else {
                continue;
            };
            if learned.cooldown_until.is_some_and(|t| t > now) {
                continue;
            }
            let cost = power.ops_cost();
            let Some(store) = stores.current(ctx.snapshot, &actor.id) else {
                continue;
            };
            if store.get(ResourceKind::Ops) < cost {
                continue;
            }

            match power {
                PowerKind::GenerateOps => {
                    let generated = learned.level;
                    let room = store.free_capacity(ResourceKind::Ops).min(generated);
                    if room == 0 {
                        continue;
                    }
                    let store = store.with_added(ResourceKind::Ops, room).map_err(|e| {
                        StepFault::StoreViolation {
                            object: actor.id.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    stores.put(&actor.id, store);
                }
                _ => {
                    let Some(target) = intent
                        .argument
                        .target_id()
                        .and_then(|id| ctx.snapshot.object(&id))
                    else {
                        continue;
                    };
                    if target.active_effect(power, now).is_some() {
                        continue;
                    }
                    let store = store.with_removed(ResourceKind::Ops, cost).map_err(|e| {
                        StepFault::StoreViolation {
                            object: actor.id.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    stores.put(&actor.id, store);
                    let mut effects = target.effects.clone();
                    effects.retain(|e| e.kind != power);
                    effects.push(Effect {
                        kind: power,
                        level: learned.level,
                        ends_at: GameTime(now.0 + power.effect_duration()),
                    });
                    ctx.writer.patch(
                        target.id.clone(),
                        ObjectPatch {
                            effects: Some(effects),
                            ..Default::default()
                        },
                    );
                    ctx.events.push(RoomEvent {
                        kind: EventKind::Power,
                        object: actor.id.clone(),
                        target: Some(target.id.clone()),
                        amount: Some(learned.level),
                        resource: None,
                    });
                }
            }

            let mut powers = state.powers.clone();
            powers.insert(
                power,
                PowerLevel {
                    level: learned.level,
                    cooldown_until: Some(GameTime(now.0 + power.cooldown())),
                },
            );
            ctx.writer.patch(
                actor.id.clone(),
                ObjectPatch {
                    power_creep: Some(PowerCreepState {
                        powers,
                        ..state.clone()
                    }),
                    ..Default::default()
                },
            );
        }

        stores.flush(ctx.writer);
        Ok(())
    }
}

/// Clears expired power cooldowns so deployed creeps carry clean state.
pub struct PowerCooldownStep;

impl RoomStep for PowerCooldownStep {
    fn name(&self) -> &'static str {
        "powerAbilityCooldown"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        for obj in ctx.snapshot.objects.values() {
            let Some(state) = &obj.power_creep else {
                continue;
            };
            let expired: Vec<PowerKind> = state
                .powers
                .iter()
                .filter(|(_, l)| l.cooldown_until.is_some_and(|t| t <= now))
                .map(|(k, _)| *k)
                .collect();
            if expired.is_empty() {
                continue;
            }
            let mut powers = state.powers.clone();
            for kind in expired {
                if let Some(l) = powers.get_mut(&kind) {
                    l.cooldown_until = None;
                }
            }
            ctx.writer.patch(
                obj.id.clone(),
                ObjectPatch {
                    power_creep: Some(PowerCreepState {
                        powers,
                        ..state.clone()
                    }),
                    ..Default::default()
                },
            );
        }
        Ok(())
    }
}

/// Strips effects whose expiry tick has passed.
pub struct EffectDecayStep;

impl RoomStep for EffectDecayStep {
    fn name(&self) -> &'static str {
        "powerEffectDecay"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        for obj in ctx.snapshot.objects.values() {
            if obj.effects.iter().all(|e| e.ends_at > now) {
                continue;
            }
            let kept: Vec<Effect> = obj
                .effects
                .iter()
                .filter(|e| e.ends_at > now)
                .cloned()
                .collect();
            ctx.writer.patch(
                obj.id.clone(),
                ObjectPatch {
                    effects: Some(kept),
                    ..Default::default()
                },
            );
        }
        Ok(())
    }
}

//! Resource validation: source stores hold what the intent moves or
//! spends, destination stores have room for it.

use crate::meta::{IntentSpec, StoreRule, TargetRule};
use crate::validator::{IntentValidator, PendingIntent, ValidationContext};
use warren_core::{ResourceKind, ValidationError};
use warren_model::RoomObjectSnapshot;

/// Checks store balances against the intent's store rule.
pub struct ResourceValidator;

fn requested_resource(intent: &PendingIntent) -> ResourceKind {
    intent.argument.resource().unwrap_or(ResourceKind::Energy)
}

fn target_of<'a>(
    ctx: &ValidationContext<'a>,
    intent: &PendingIntent,
) -> Option<&'a RoomObjectSnapshot> {
    intent
        .argument
        .target_id()
        .and_then(|id| ctx.snapshot.object(&id))
}

impl IntentValidator for ResourceValidator {
    fn name(&self) -> &'static str {
        "resource"
    }

    fn check(
        &self,
        ctx: &ValidationContext<'_>,
        spec: &IntentSpec,
        intent: &PendingIntent,
    ) -> Result<(), ValidationError> {
        if spec.store == StoreRule::None {
            return Ok(());
        }
        let Some(actor) = ctx.snapshot.object(&intent.actor) else {
            return Ok(()); // state stage reports the not-found code
        };
        let Some(actor_store) = &actor.store else {
            return Ok(());
        };

        match spec.store {
            StoreRule::None => Ok(()),
            StoreRule::ActorEnergy => {
                if actor_store.energy() == 0 {
                    Err(ValidationError::InsufficientEnergy)
                } else {
                    Ok(())
                }
            }
            StoreRule::ActorProvides => {
                let resource = requested_resource(intent);
                let have = actor_store.get(resource);
                let want = intent.argument.amount("amount").unwrap_or(have);
                if have == 0 || want > have {
                    return Err(ValidationError::InsufficientResource);
                }
                if matches!(spec.target, TargetRule::Required { .. }) {
                    if let Some(target) = target_of(ctx, intent) {
                        if let Some(store) = &target.store {
                            if store.free_capacity(resource) == 0 {
                                return Err(ValidationError::TargetCapacityFull);
                            }
                        }
                    }
                }
                Ok(())
            }
            StoreRule::ActorReceives => {
                let Some(target) = target_of(ctx, intent) else {
                    return Ok(());
                };
                let Some(target_store) = &target.store else {
                    return Ok(());
                };
                // pickup has no resourceType field; take whatever the
                // pile holds.
                let resource = intent
                    .argument
                    .resource()
                    .or(target.resource_kind)
                    .unwrap_or(ResourceKind::Energy);
                if target_store.get(resource) == 0 {
                    return Err(ValidationError::InsufficientResource);
                }
                if actor_store.free_capacity(resource) == 0 {
                    return Err(ValidationError::ActorCapacityFull);
                }
                Ok(())
            }
        }
    }
}

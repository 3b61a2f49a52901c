//! Creep combat: melee, ranged, mass attack, and healing.
//!
//! Runs immediately after movement and re-checks every range against
//! post-move positions from the ledger; an attack whose target walked
//! away this tick lands on nothing. Damage and healing accumulate in
//! the ledger so the lifecycle step sees combat deaths.

use crate::context::StepContext;
use crate::damage::settle_hits;
use crate::step::RoomStep;
use indexmap::IndexSet;
use warren_core::{
    active_parts, BodyPartKind, ObjectId, StepFault, ATTACK_POWER, HEAL_POWER,
    RANGED_ATTACK_POWER, RANGED_HEAL_POWER,
};
use warren_intent::ValidatedIntent;
use warren_model::{ObjectKind, RoomObjectSnapshot};
use warren_mutation::{EventKind, RoomEvent};

/// Mass-attack damage per ranged part, indexed by range − 1.
const MASS_ATTACK_FALLOFF: [u32; 3] = [10, 4, 1];

/// Applies creep-driven combat intents.
pub struct CombatStep;

fn creep_actor<'a>(
    ctx: &StepContext<'a>,
    intent: &ValidatedIntent,
) -> Option<&'a RoomObjectSnapshot> {
    let actor = ctx.snapshot.object(&intent.actor)?;
    matches!(actor.kind, ObjectKind::Creep).then_some(actor)
}

fn target_of<'a>(
    ctx: &StepContext<'a>,
    intent: &ValidatedIntent,
) -> Option<&'a RoomObjectSnapshot> {
    intent
        .argument
        .target_id()
        .and_then(|id| ctx.snapshot.object(&id))
}

fn in_post_move_range(
    ctx: &StepContext<'_>,
    actor: &RoomObjectSnapshot,
    target: &RoomObjectSnapshot,
    range: u32,
) -> bool {
    ctx.ledger
        .position_of(actor)
        .in_range_of(ctx.ledger.position_of(target), range)
}

impl CombatStep {
    fn direct(
        &self,
        ctx: &mut StepContext<'_>,
        name: &str,
        part: BodyPartKind,
        power: u32,
        range: u32,
        healing: bool,
        touched: &mut IndexSet<ObjectId>,
    ) {
        let intents: Vec<ValidatedIntent> = ctx.intents.named(name).cloned().collect();
        for intent in intents {
            let Some(actor) = creep_actor(ctx, &intent) else {
                continue;
            };
            let Some(target) = target_of(ctx, &intent) else {
                continue;
            };
            if !in_post_move_range(ctx, actor, target, range) {
                continue;
            }
            if target.hits.is_none() {
                continue;
            }
            let amount = active_parts(&actor.body, part) * power;
            if amount == 0 {
                continue;
            }
            let delta = if healing {
                i64::from(amount)
            } else {
                -i64::from(amount)
            };
            ctx.ledger.add_hits_delta(&target.id, delta);
            touched.insert(target.id.clone());
            ctx.events.push(RoomEvent {
                kind: if healing {
                    EventKind::Heal
                } else {
                    EventKind::Attack
                },
                object: actor.id.clone(),
                target: Some(target.id.clone()),
                amount: Some(amount),
                resource: None,
            });
        }
    }

    fn mass_attack(&self, ctx: &mut StepContext<'_>, touched: &mut IndexSet<ObjectId>) {
        let intents: Vec<ValidatedIntent> =
            ctx.intents.named("rangedMassAttack").cloned().collect();
        for intent in intents {
            let Some(actor) = creep_actor(ctx, &intent) else {
                continue;
            };
            let parts = active_parts(&actor.body, BodyPartKind::RangedAttack);
            if parts == 0 {
                continue;
            }
            let origin = ctx.ledger.position_of(actor);
            let victims: Vec<(ObjectId, u32)> = ctx
                .snapshot
                .objects
                .values()
                .filter(|o| o.hits.is_some() && o.id != actor.id)
                .filter(|o| o.user != actor.user)
                .filter(|o| o.kind != ObjectKind::Controller)
                .filter_map(|o| {
                    let range = origin.range_to(ctx.ledger.position_of(o));
                    (1..=3).contains(&range).then(|| {
                        (o.id.clone(), parts * MASS_ATTACK_FALLOFF[(range - 1) as usize])
                    })
                })
                .collect();
            for (id, damage) in victims {
                ctx.ledger.add_hits_delta(&id, -i64::from(damage));
                touched.insert(id.clone());
                ctx.events.push(RoomEvent {
                    kind: EventKind::Attack,
                    object: actor.id.clone(),
                    target: Some(id),
                    amount: Some(damage),
                    resource: None,
                });
            }
        }
    }
}

impl RoomStep for CombatStep {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut touched = IndexSet::new();
        self.direct(ctx, "attack", BodyPartKind::Attack, ATTACK_POWER, 1, false, &mut touched);
        self.direct(
            ctx,
            "rangedAttack",
            BodyPartKind::RangedAttack,
            RANGED_ATTACK_POWER,
            3,
            false,
            &mut touched,
        );
        self.mass_attack(ctx, &mut touched);
        self.direct(ctx, "heal", BodyPartKind::Heal, HEAL_POWER, 1, true, &mut touched);
        self.direct(
            ctx,
            "rangedHeal",
            BodyPartKind::Heal,
            RANGED_HEAL_POWER,
            3,
            true,
            &mut touched,
        );
        settle_hits(ctx, &touched);
        Ok(())
    }
}

//! Lab reactions and creep boosting.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use warren_core::{
    BodyPart, BodyPartKind, GameTime, ObjectId, ResourceKind, StepFault, LAB_BOOST_ENERGY,
    LAB_BOOST_MINERAL, LAB_COOLDOWN, LAB_REACTION_AMOUNT,
};
use warren_model::ObjectKind;
use warren_mutation::ObjectPatch;

/// The closed reaction table: (input, input) → output.
pub const REACTIONS: &[(ResourceKind, ResourceKind, ResourceKind)] = &[
    (ResourceKind::Hydrogen, ResourceKind::Oxygen, ResourceKind::Hydroxide),
    (ResourceKind::Zynthium, ResourceKind::Keanium, ResourceKind::ZynthiumKeanite),
    (ResourceKind::Utrium, ResourceKind::Lemergium, ResourceKind::UtriumLemergite),
    (
        ResourceKind::ZynthiumKeanite,
        ResourceKind::UtriumLemergite,
        ResourceKind::Ghodium,
    ),
    (ResourceKind::Utrium, ResourceKind::Hydrogen, ResourceKind::UtriumHydride),
    (ResourceKind::Utrium, ResourceKind::Oxygen, ResourceKind::UtriumOxide),
    (ResourceKind::Keanium, ResourceKind::Hydrogen, ResourceKind::KeaniumHydride),
    (ResourceKind::Keanium, ResourceKind::Oxygen, ResourceKind::KeaniumOxide),
    (ResourceKind::Lemergium, ResourceKind::Hydrogen, ResourceKind::LemergiumHydride),
    (ResourceKind::Lemergium, ResourceKind::Oxygen, ResourceKind::LemergiumOxide),
    (ResourceKind::Zynthium, ResourceKind::Hydrogen, ResourceKind::ZynthiumHydride),
    (ResourceKind::Zynthium, ResourceKind::Oxygen, ResourceKind::ZynthiumOxide),
    (ResourceKind::Ghodium, ResourceKind::Hydrogen, ResourceKind::GhodiumHydride),
    (ResourceKind::Ghodium, ResourceKind::Oxygen, ResourceKind::GhodiumOxide),
];

/// The product of reacting two inputs, order-insensitive.
pub fn reaction_product(a: ResourceKind, b: ResourceKind) -> Option<ResourceKind> {
    REACTIONS
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, out)| *out)
}

/// The body part a boost compound strengthens.
pub fn boosted_part(compound: ResourceKind) -> Option<BodyPartKind> {
    match compound {
        ResourceKind::UtriumHydride => Some(BodyPartKind::Attack),
        ResourceKind::UtriumOxide => Some(BodyPartKind::Work),
        ResourceKind::KeaniumHydride => Some(BodyPartKind::Carry),
        ResourceKind::KeaniumOxide => Some(BodyPartKind::RangedAttack),
        ResourceKind::LemergiumHydride => Some(BodyPartKind::Work),
        ResourceKind::LemergiumOxide => Some(BodyPartKind::Heal),
        ResourceKind::ZynthiumHydride => Some(BodyPartKind::Move),
        ResourceKind::ZynthiumOxide => Some(BodyPartKind::Work),
        ResourceKind::GhodiumHydride => Some(BodyPartKind::Work),
        ResourceKind::GhodiumOxide => Some(BodyPartKind::Tough),
        _ => None,
    }
}

/// Applies lab intents.
pub struct LabStep;

fn violation(id: &ObjectId, err: impl std::fmt::Display) -> StepFault {
    StepFault::StoreViolation {
        object: id.to_string(),
        reason: err.to_string(),
    }
}

/// The single non-energy mineral a lab holds, if any.
fn lab_mineral(store: &warren_model::Store) -> Option<(ResourceKind, u32)> {
    store
        .amounts()
        .find(|(r, amount)| *r != ResourceKind::Energy && *amount > 0)
}

impl RoomStep for LabStep {
    fn name(&self) -> &'static str {
        "lab"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();
        let now = ctx.now();

        let reactions: Vec<_> = ctx.intents.named("runReaction").cloned().collect();
        for intent in reactions {
            let Some(output) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if output.kind != ObjectKind::Lab || !output.cooldown_ready(now) {
                continue;
            }
            let (Some(lab1), Some(lab2)) = (
                intent
                    .argument
                    .text("lab1")
                    .and_then(|id| ctx.snapshot.object(&ObjectId::from(id))),
                intent
                    .argument
                    .text("lab2")
                    .and_then(|id| ctx.snapshot.object(&ObjectId::from(id))),
            ) else {
                continue;
            };
            if lab1.kind != ObjectKind::Lab
                || lab2.kind != ObjectKind::Lab
                || !output.pos.in_range_of(lab1.pos, 2)
                || !output.pos.in_range_of(lab2.pos, 2)
            {
                continue;
            }
            let (Some(s1), Some(s2), Some(so)) = (
                stores.current(ctx.snapshot, &lab1.id),
                stores.current(ctx.snapshot, &lab2.id),
                stores.current(ctx.snapshot, &output.id),
            ) else {
                continue;
            };
            let (Some((r1, have1)), Some((r2, have2))) = (lab_mineral(&s1), lab_mineral(&s2))
            else {
                continue;
            };
            let Some(product) = reaction_product(r1, r2) else {
                continue;
            };
            if have1 < LAB_REACTION_AMOUNT
                || have2 < LAB_REACTION_AMOUNT
                || so.free_capacity(product) < LAB_REACTION_AMOUNT
            {
                continue;
            }
            let s1 = s1
                .with_removed(r1, LAB_REACTION_AMOUNT)
                .map_err(|e| violation(&lab1.id, e))?;
            let s2 = s2
                .with_removed(r2, LAB_REACTION_AMOUNT)
                .map_err(|e| violation(&lab2.id, e))?;
            let so = so
                .with_added(product, LAB_REACTION_AMOUNT)
                .map_err(|e| violation(&output.id, e))?;
            stores.put(&lab1.id, s1);
            stores.put(&lab2.id, s2);
            stores.put(&output.id, so);
            ctx.writer.patch(
                output.id.clone(),
                ObjectPatch {
                    cooldown_until: Some(Some(GameTime(now.0 + LAB_COOLDOWN))),
                    ..Default::default()
                },
            );
        }

        let boosts: Vec<_> = ctx.intents.named("boostCreep").cloned().collect();
        for intent in boosts {
            let Some(lab) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if lab.kind != ObjectKind::Lab {
                continue;
            }
            let Some(creep) = intent
                .argument
                .target_id()
                .and_then(|id| ctx.snapshot.object(&id))
            else {
                continue;
            };
            let Some(store) = stores.current(ctx.snapshot, &lab.id) else {
                continue;
            };
            let Some((compound, have)) = lab_mineral(&store) else {
                continue;
            };
            let Some(part_kind) = boosted_part(compound) else {
                continue;
            };
            let unboosted = creep
                .body
                .iter()
                .filter(|p| p.kind == part_kind && p.boost.is_none())
                .count() as u32;
            let affordable = (have / LAB_BOOST_MINERAL)
                .min(store.energy() / LAB_BOOST_ENERGY)
                .min(unboosted);
            let count = intent
                .argument
                .amount("bodyPartsCount")
                .unwrap_or(affordable)
                .min(affordable);
            if count == 0 {
                continue;
            }
            let store = store
                .with_removed(compound, count * LAB_BOOST_MINERAL)
                .and_then(|s| s.with_removed(ResourceKind::Energy, count * LAB_BOOST_ENERGY))
                .map_err(|e| violation(&lab.id, e))?;
            stores.put(&lab.id, store);
            let mut body = creep.body.clone();
            let mut remaining = count;
            for part in body.iter_mut() {
                if remaining == 0 {
                    break;
                }
                if part.kind == part_kind && part.boost.is_none() {
                    *part = BodyPart {
                        boost: Some(compound),
                        ..*part
                    };
                    remaining -= 1;
                }
            }
            ctx.writer.patch(
                creep.id.clone(),
                ObjectPatch {
                    body: Some(body),
                    ..Default::default()
                },
            );
        }

        let unboosts: Vec<_> = ctx.intents.named("unboostCreep").cloned().collect();
        for intent in unboosts {
            let Some(creep) = intent
                .argument
                .target_id()
                .and_then(|id| ctx.snapshot.object(&id))
            else {
                continue;
            };
            if creep.body.iter().all(|p| p.boost.is_none()) {
                continue;
            }
            let mut body = creep.body.clone();
            for part in body.iter_mut() {
                part.boost = None;
            }
            ctx.writer.patch(
                creep.id.clone(),
                ObjectPatch {
                    body: Some(body),
                    ..Default::default()
                },
            );
        }

        stores.flush(ctx.writer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{creep, insert, pos, room, run_step, structure};
    use warren_core::{
        IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, RoomName, UserId,
    };
    use warren_model::{RoomObjectSnapshot, Store};

    fn lab(id: &str, at: (u8, u8), room_name: &RoomName, contents: &[(ResourceKind, u32)]) -> RoomObjectSnapshot {
        let mut l = structure(id, ObjectKind::Lab, pos(at.0, at.1), room_name);
        l.user = Some(UserId::from("u1"));
        let mut store = Store::with_total_capacity(3000);
        for &(r, n) in contents {
            store = store.with_added(r, n).unwrap();
        }
        l.store = Some(store);
        l
    }

    fn order(snap: &mut warren_model::RoomSnapshot, name: &str, actor: &str, arg: IntentArgument) {
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(ObjectId::from(actor), IntentRecord::single(name, arg));
        snap.intents.push(env);
    }

    #[test]
    fn reaction_consumes_inputs_and_produces_compound() {
        let mut snap = room("W1N1", 100);
        let name = snap.room.clone();
        insert(&mut snap, lab("out", (10, 10), &name, &[]));
        insert(&mut snap, lab("l1", (11, 10), &name, &[(ResourceKind::Hydrogen, 100)]));
        insert(&mut snap, lab("l2", (10, 11), &name, &[(ResourceKind::Oxygen, 100)]));
        order(
            &mut snap,
            "runReaction",
            "out",
            IntentArgument::default()
                .with("lab1", IntentFieldValue::Text("l1".into()))
                .with("lab2", IntentFieldValue::Text("l2".into())),
        );
        let run = run_step(&LabStep, &snap);
        let out = run.batch.patches[&ObjectId::from("out")].store.as_ref().unwrap();
        assert_eq!(out.get(ResourceKind::Hydroxide), LAB_REACTION_AMOUNT);
        assert_eq!(
            run.batch.patches[&ObjectId::from("l1")].store.as_ref().unwrap().get(ResourceKind::Hydrogen),
            95
        );
        assert_eq!(
            run.batch.patches[&ObjectId::from("out")].cooldown_until,
            Some(Some(GameTime(100 + LAB_COOLDOWN)))
        );
    }

    #[test]
    fn unknown_recipe_does_nothing() {
        let mut snap = room("W1N1", 100);
        let name = snap.room.clone();
        insert(&mut snap, lab("out", (10, 10), &name, &[]));
        insert(&mut snap, lab("l1", (11, 10), &name, &[(ResourceKind::Hydrogen, 100)]));
        insert(&mut snap, lab("l2", (10, 11), &name, &[(ResourceKind::Ghodium, 100)]));
        order(
            &mut snap,
            "runReaction",
            "out",
            IntentArgument::default()
                .with("lab1", IntentFieldValue::Text("l1".into()))
                .with("lab2", IntentFieldValue::Text("l2".into())),
        );
        let run = run_step(&LabStep, &snap);
        assert!(run.batch.is_empty());
    }

    #[test]
    fn boost_marks_parts_and_drains_the_lab() {
        let mut snap = room("W1N1", 100);
        let name = snap.room.clone();
        insert(
            &mut snap,
            lab(
                "lab",
                (10, 10),
                &name,
                &[(ResourceKind::UtriumHydride, 90), (ResourceKind::Energy, 100)],
            ),
        );
        insert(
            &mut snap,
            creep("c", "u1", pos(11, 10), &[(BodyPartKind::Attack, 3)], &name),
        );
        order(
            &mut snap,
            "boostCreep",
            "lab",
            IntentArgument::default().with("id", IntentFieldValue::Text("c".into())),
        );
        let run = run_step(&LabStep, &snap);
        let body = run.batch.patches[&ObjectId::from("c")].body.as_ref().unwrap();
        let boosted = body
            .iter()
            .filter(|p| p.boost == Some(ResourceKind::UtriumHydride))
            .count();
        assert_eq!(boosted, 3); // 90 mineral / 30 per part
        let store = run.batch.patches[&ObjectId::from("lab")].store.as_ref().unwrap();
        assert_eq!(store.get(ResourceKind::UtriumHydride), 0);
        assert_eq!(store.energy(), 40);
    }

    #[test]
    fn product_lookup_is_order_insensitive() {
        assert_eq!(
            reaction_product(ResourceKind::Oxygen, ResourceKind::Hydrogen),
            Some(ResourceKind::Hydroxide)
        );
        assert_eq!(
            reaction_product(ResourceKind::Energy, ResourceKind::Hydrogen),
            None
        );
    }
}

//! Store-to-store resource movement: transfer, withdraw, pickup, drop.
//!
//! All four share one store scratch, so chained intents inside a tick
//! (two creeps filling one spawn) serialize correctly without any step
//! reading the writer back.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use warren_core::{ObjectId, ResourceKind, StepFault};
use warren_intent::ValidatedIntent;
use warren_model::{ObjectKind, RoomObjectSnapshot, Store, StoreCapacity};
use warren_mutation::{EventKind, RoomEvent};

/// Applies transfer, withdraw, pickup, and drop intents.
pub struct TransferStep;

fn violation(id: &ObjectId, err: impl std::fmt::Display) -> StepFault {
    StepFault::StoreViolation {
        object: id.to_string(),
        reason: err.to_string(),
    }
}

/// Move `amount` of `resource` between two scratch stores; the moved
/// amount is clamped to what the source holds and the sink accepts.
fn move_between(
    stores: &mut StoreScratch,
    ctx: &StepContext<'_>,
    from: &ObjectId,
    to: &ObjectId,
    resource: ResourceKind,
    amount: Option<u32>,
) -> Result<u32, StepFault> {
    let (Some(src), Some(dst)) = (
        stores.current(ctx.snapshot, from),
        stores.current(ctx.snapshot, to),
    ) else {
        return Ok(0);
    };
    let moved = amount
        .unwrap_or(u32::MAX)
        .min(src.get(resource))
        .min(dst.free_capacity(resource));
    if moved == 0 {
        return Ok(0);
    }
    let src = src
        .with_removed(resource, moved)
        .map_err(|e| violation(from, e))?;
    let dst = dst.with_added(resource, moved).map_err(|e| violation(to, e))?;
    stores.put(from, src);
    stores.put(to, dst);
    Ok(moved)
}

impl TransferStep {
    fn pair<'a>(
        ctx: &StepContext<'a>,
        intent: &ValidatedIntent,
    ) -> Option<(&'a RoomObjectSnapshot, &'a RoomObjectSnapshot)> {
        let actor = ctx.snapshot.object(&intent.actor)?;
        let target = intent
            .argument
            .target_id()
            .and_then(|id| ctx.snapshot.object(&id))?;
        Some((actor, target))
    }

    fn record(
        ctx: &mut StepContext<'_>,
        actor: &ObjectId,
        target: Option<&ObjectId>,
        resource: ResourceKind,
        moved: u32,
    ) {
        if moved > 0 {
            ctx.events.push(RoomEvent {
                kind: EventKind::Transfer,
                object: actor.clone(),
                target: target.cloned(),
                amount: Some(moved),
                resource: Some(resource),
            });
        }
    }
}

impl RoomStep for TransferStep {
    fn name(&self) -> &'static str {
        "transfer"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();
        let mut piles: Vec<RoomObjectSnapshot> = Vec::new();
        let mut emptied_piles: Vec<ObjectId> = Vec::new();

        let transfers: Vec<_> = ctx.intents.named("transfer").cloned().collect();
        for intent in transfers {
            let Some((actor, target)) = Self::pair(ctx, &intent) else {
                continue;
            };
            let Some(resource) = intent.argument.resource() else {
                continue;
            };
            let amount = intent.argument.amount("amount");
            let moved = move_between(&mut stores, ctx, &actor.id, &target.id, resource, amount)?;
            Self::record(ctx, &intent.actor, Some(&target.id), resource, moved);
        }

        let withdraws: Vec<_> = ctx.intents.named("withdraw").cloned().collect();
        for intent in withdraws {
            let Some((actor, target)) = Self::pair(ctx, &intent) else {
                continue;
            };
            let Some(resource) = intent.argument.resource() else {
                continue;
            };
            let amount = intent.argument.amount("amount");
            let moved = move_between(&mut stores, ctx, &target.id, &actor.id, resource, amount)?;
            Self::record(ctx, &intent.actor, Some(&target.id), resource, moved);
        }

        let pickups: Vec<_> = ctx.intents.named("pickup").cloned().collect();
        for intent in pickups {
            let Some((actor, pile)) = Self::pair(ctx, &intent) else {
                continue;
            };
            if pile.kind != ObjectKind::Resource {
                continue;
            }
            let resource = pile.resource_kind.unwrap_or(ResourceKind::Energy);
            let moved = move_between(&mut stores, ctx, &pile.id, &actor.id, resource, None)?;
            if moved > 0 {
                if let Some(store) = stores.current(ctx.snapshot, &pile.id) {
                    if store.total() == 0 {
                        emptied_piles.push(pile.id.clone());
                    }
                }
            }
            Self::record(ctx, &intent.actor, Some(&pile.id), resource, moved);
        }

        let drops: Vec<_> = ctx.intents.named("drop").cloned().collect();
        for intent in drops {
            let Some(actor) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            let Some(resource) = intent.argument.resource() else {
                continue;
            };
            let Some(store) = stores.current(ctx.snapshot, &actor.id) else {
                continue;
            };
            let dropped = intent
                .argument
                .amount("amount")
                .unwrap_or(u32::MAX)
                .min(store.get(resource));
            if dropped == 0 {
                continue;
            }
            let store = store
                .with_removed(resource, dropped)
                .map_err(|e| violation(&actor.id, e))?;
            stores.put(&actor.id, store);
            // merge with an existing pile of the same resource on the tile
            let at = ctx.ledger.position_of(actor);
            let existing = ctx
                .snapshot
                .objects_at(at)
                .find(|o| o.kind == ObjectKind::Resource && o.resource_kind == Some(resource));
            if let Some(pile) = existing {
                let Some(pile_store) = stores.current(ctx.snapshot, &pile.id) else {
                    continue;
                };
                let pile_store = pile_store
                    .with_added(resource, dropped)
                    .map_err(|e| violation(&pile.id, e))?;
                stores.put(&pile.id, pile_store);
            } else {
                let id = ObjectId(format!("{}-drop-{}", actor.id, resource));
                let mut pile = RoomObjectSnapshot::new(
                    id,
                    ObjectKind::Resource,
                    actor.room.clone(),
                    at,
                );
                pile.resource_kind = Some(resource);
                pile.store = Some({
                    let s = Store::empty(StoreCapacity::Unbounded);
                    s.with_added(resource, dropped)
                        .map_err(|e| violation(&actor.id, e))?
                });
                piles.push(pile);
            }
            Self::record(ctx, &intent.actor, None, resource, dropped);
        }

        stores.flush(ctx.writer);
        // removal voids the emptied pile's store patch
        for id in emptied_piles {
            ctx.writer.remove(id);
        }
        for pile in piles {
            ctx.writer.upsert(pile);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{apply_batch, creep, give, insert, pos, room, run_step, structure};
    use warren_core::{
        BodyPartKind, IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, UserId,
    };

    fn order(snap: &mut warren_model::RoomSnapshot, name: &str, actor: &str, arg: IntentArgument) {
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(ObjectId::from(actor), IntentRecord::single(name, arg));
        snap.intents.push(env);
    }

    fn transfer_arg(target: &str, resource: &str, amount: u32) -> IntentArgument {
        IntentArgument::default()
            .with("id", IntentFieldValue::Text(target.into()))
            .with("resourceType", IntentFieldValue::Text(resource.into()))
            .with("amount", IntentFieldValue::Number(f64::from(amount)))
    }

    #[test]
    fn transfer_moves_fifty_energy_into_a_spawn() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        let mut c = creep("c", "u1", pos(10, 10), &[(BodyPartKind::Carry, 2)], &name);
        give(&mut c, ResourceKind::Energy, 50);
        insert(&mut snap, c);
        let mut spawn = structure("sp", ObjectKind::Spawn, pos(11, 10), &name);
        spawn.user = Some(UserId::from("u1"));
        spawn.store = Some(
            Store::with_total_capacity(300)
                .with_added(ResourceKind::Energy, 200)
                .unwrap(),
        );
        insert(&mut snap, spawn);
        order(&mut snap, "transfer", "c", transfer_arg("sp", "energy", 50));
        let run = run_step(&TransferStep, &snap);
        let sp = run.batch.patches[&ObjectId::from("sp")].store.as_ref().unwrap();
        let c = run.batch.patches[&ObjectId::from("c")].store.as_ref().unwrap();
        assert_eq!(sp.energy(), 250);
        assert_eq!(c.energy(), 0);
    }

    #[test]
    fn transfer_conserves_total_across_stores() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        let mut c = creep("c", "u1", pos(10, 10), &[(BodyPartKind::Carry, 2)], &name);
        give(&mut c, ResourceKind::Energy, 80);
        insert(&mut snap, c);
        let mut container = structure("box", ObjectKind::Container, pos(11, 10), &name);
        container.store = Some(
            Store::with_total_capacity(2000)
                .with_added(ResourceKind::Energy, 1990)
                .unwrap(),
        );
        insert(&mut snap, container);
        order(&mut snap, "transfer", "c", transfer_arg("box", "energy", 80));
        let run = run_step(&TransferStep, &snap);
        let next = apply_batch(&snap, &run.batch);
        let total: u32 = next.objects.values().map(|o| o.energy()).sum();
        let before: u32 = snap.objects.values().map(|o| o.energy()).sum();
        assert_eq!(total, before); // clamped to the 10 free, nothing lost
        assert_eq!(
            next.object(&ObjectId::from("box")).unwrap().energy(),
            2000
        );
    }

    #[test]
    fn withdraw_pulls_from_a_container() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        insert(
            &mut snap,
            creep("c", "u1", pos(10, 10), &[(BodyPartKind::Carry, 1)], &name),
        );
        let mut container = structure("box", ObjectKind::Container, pos(11, 10), &name);
        container.store = Some(
            Store::with_total_capacity(2000)
                .with_added(ResourceKind::Energy, 300)
                .unwrap(),
        );
        insert(&mut snap, container);
        order(&mut snap, "withdraw", "c", transfer_arg("box", "energy", 40));
        let run = run_step(&TransferStep, &snap);
        assert_eq!(
            run.batch.patches[&ObjectId::from("c")].store.as_ref().unwrap().energy(),
            40
        );
        assert_eq!(
            run.batch.patches[&ObjectId::from("box")].store.as_ref().unwrap().energy(),
            260
        );
    }

    #[test]
    fn pickup_consumes_the_pile() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        insert(
            &mut snap,
            creep("c", "u1", pos(10, 10), &[(BodyPartKind::Carry, 1)], &name),
        );
        let mut pile = structure("pile", ObjectKind::Resource, pos(11, 10), &name);
        pile.resource_kind = Some(ResourceKind::Energy);
        pile.store = Some(Store::single(ResourceKind::Energy, 30));
        insert(&mut snap, pile);
        order(
            &mut snap,
            "pickup",
            "c",
            IntentArgument::default().with("id", IntentFieldValue::Text("pile".into())),
        );
        let run = run_step(&TransferStep, &snap);
        assert!(run.batch.removals.contains(&ObjectId::from("pile")));
        assert_eq!(
            run.batch.patches[&ObjectId::from("c")].store.as_ref().unwrap().energy(),
            30
        );
    }

    #[test]
    fn drop_creates_a_pile_on_the_tile() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        let mut c = creep("c", "u1", pos(10, 10), &[(BodyPartKind::Carry, 1)], &name);
        give(&mut c, ResourceKind::Energy, 50);
        insert(&mut snap, c);
        order(
            &mut snap,
            "drop",
            "c",
            IntentArgument::default()
                .with("resourceType", IntentFieldValue::Text("energy".into()))
                .with("amount", IntentFieldValue::Number(20.0)),
        );
        let run = run_step(&TransferStep, &snap);
        assert_eq!(run.batch.upserts.len(), 1);
        let pile = &run.batch.upserts[0];
        assert_eq!(pile.kind, ObjectKind::Resource);
        assert_eq!(pile.pos, pos(10, 10));
        assert_eq!(pile.energy(), 20);
        assert_eq!(
            run.batch.patches[&ObjectId::from("c")].store.as_ref().unwrap().energy(),
            30
        );
    }
}

//! Spawn order intake, creep renewal and recycling.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use indexmap::IndexMap;
use warren_core::{
    active_parts, body_cost, Body, BodyPart, BodyPartKind, GameTime, ObjectId, ResourceKind,
    StepFault, UserId, CREEP_LIFE_TIME, CREEP_SPAWN_TIME, MAX_CREEP_SIZE,
};
use warren_model::{ObjectKind, RoomObjectSnapshot, SpawnJob, Store};
use warren_mutation::{EventKind, ObjectPatch, RoomEvent, StatKind};

/// Applies spawn orders plus `renewCreep` and `recycleCreep` intents.
pub struct SpawnStep;

/// Energy sources a spawn may draw on: the spawn itself first, then the
/// owner's extensions in snapshot order.
fn energy_pool<'a>(
    ctx: &StepContext<'a>,
    spawn: &RoomObjectSnapshot,
) -> Vec<&'a RoomObjectSnapshot> {
    let mut pool = vec![];
    if let Some(s) = ctx.snapshot.object(&spawn.id) {
        pool.push(s);
    }
    for obj in ctx.snapshot.objects.values() {
        if obj.kind == ObjectKind::Extension && obj.user == spawn.user {
            pool.push(obj);
        }
    }
    pool
}

/// Draws `cost` energy across the pool through the ledger, charging the
/// spawn first. Returns the per-object charges, or `None` if the pool
/// cannot cover the cost.
fn claim_across(
    ctx: &mut StepContext<'_>,
    pool: &[&RoomObjectSnapshot],
    cost: u32,
) -> Option<IndexMap<ObjectId, u32>> {
    let available: u32 = pool.iter().map(|o| ctx.ledger.unclaimed_energy(o)).sum();
    if available < cost {
        return None;
    }
    let mut charges = IndexMap::new();
    let mut remaining = cost;
    for obj in pool {
        if remaining == 0 {
            break;
        }
        let take = ctx.ledger.unclaimed_energy(obj).min(remaining);
        if take == 0 {
            continue;
        }
        ctx.ledger.claim_energy(&obj.id, take);
        charges.insert(obj.id.clone(), take);
        remaining -= take;
    }
    Some(charges)
}

fn debit_charges(
    ctx: &mut StepContext<'_>,
    stores: &mut StoreScratch,
    charges: IndexMap<ObjectId, u32>,
) -> Result<(), StepFault> {
    for (id, amount) in charges {
        let Some(store) = stores.current(ctx.snapshot, &id) else {
            continue;
        };
        let store = store
            .with_removed(ResourceKind::Energy, amount)
            .map_err(|e| StepFault::StoreViolation {
                object: id.to_string(),
                reason: e.to_string(),
            })?;
        stores.put(&id, store);
    }
    Ok(())
}

impl RoomStep for SpawnStep {
    fn name(&self) -> &'static str {
        "spawn"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();
        // one order per spawn per tick, first envelope wins
        let mut busy: IndexMap<ObjectId, ()> = IndexMap::new();

        let orders: Vec<(Option<UserId>, ObjectId, _)> = ctx
            .snapshot
            .intents
            .iter()
            .flat_map(|env| {
                env.spawn_orders
                    .iter()
                    .map(|(id, order)| (env.user.clone(), id.clone(), order.clone()))
            })
            .collect();
        for (user, spawn_id, order) in orders {
            let Some(spawn) = ctx.snapshot.object(&spawn_id) else {
                continue;
            };
            if spawn.kind != ObjectKind::Spawn
                || spawn.spawn_job.is_some()
                || busy.contains_key(&spawn_id)
                || user.is_none()
                || spawn.user != user
            {
                continue;
            }
            if order.body.is_empty()
                || order.body.len() > MAX_CREEP_SIZE
                || order.creep_name.is_empty()
                || ctx.snapshot.object(&ObjectId::from(order.creep_name.as_str())).is_some()
            {
                continue;
            }
            let cost = body_cost(&order.body);
            let pool = energy_pool(ctx, spawn);
            let Some(charges) = claim_across(ctx, &pool, cost) else {
                continue;
            };
            debit_charges(ctx, &mut stores, charges)?;
            busy.insert(spawn_id.clone(), ());

            let body: Body = order.body.iter().map(|&k| BodyPart::new(k)).collect();
            let carry = active_parts(&body, BodyPartKind::Carry);
            let creep_id = ObjectId::from(order.creep_name.as_str());
            let mut creep = RoomObjectSnapshot::new(
                creep_id.clone(),
                ObjectKind::Creep,
                ctx.snapshot.room.clone(),
                spawn.pos,
            );
            creep.user = user.clone();
            creep.hits = Some(body.len() as u32 * warren_core::BODYPART_HITS);
            creep.hits_max = creep.hits;
            creep.body = body;
            creep.spawning = true;
            creep.store = Some(Store::with_total_capacity(carry * 50));
            ctx.writer.upsert(creep);

            let need_time = order.body.len() as u64 * CREEP_SPAWN_TIME;
            ctx.writer.patch(
                spawn_id.clone(),
                ObjectPatch {
                    spawn_job: Some(Some(SpawnJob {
                        creep: creep_id,
                        need_time,
                        ends_at: GameTime(ctx.now().0 + need_time),
                    })),
                    ..Default::default()
                },
            );
            if let Some(user) = &user {
                ctx.stats.record(user, StatKind::EnergyCreeps, u64::from(cost));
            }
        }

        let renews: Vec<_> = ctx.intents.named("renewCreep").cloned().collect();
        for intent in renews {
            let (Some(spawn), Some(creep)) = (
                ctx.snapshot.object(&intent.actor),
                intent
                    .argument
                    .target_id()
                    .and_then(|id| ctx.snapshot.object(&id)),
            ) else {
                continue;
            };
            if spawn.kind != ObjectKind::Spawn || creep.kind != ObjectKind::Creep {
                continue;
            }
            let (Some(age), false) = (creep.age_time, creep.spawning) else {
                continue;
            };
            if active_parts(&creep.body, BodyPartKind::Claim) > 0
                || creep.body.iter().any(|p| p.boost.is_some())
            {
                continue;
            }
            let parts = creep.body.len() as u32;
            let kinds: Vec<_> = creep.body.iter().map(|p| p.kind).collect();
            let gain = u64::from(600 / parts);
            // one renew tick costs two fifths of the per-part spawn cost
            let cost = (body_cost(&kinds) * 2).div_ceil(5 * parts);
            let Some(store) = stores.current(ctx.snapshot, &spawn.id) else {
                continue;
            };
            if store.energy() < cost {
                continue;
            }
            let store = store
                .with_removed(ResourceKind::Energy, cost)
                .map_err(|e| StepFault::StoreViolation {
                    object: spawn.id.to_string(),
                    reason: e.to_string(),
                })?;
            stores.put(&spawn.id, store);
            let renewed = GameTime((age.0 + gain).min(ctx.now().0 + CREEP_LIFE_TIME));
            ctx.writer.patch(
                creep.id.clone(),
                ObjectPatch {
                    age_time: Some(Some(renewed)),
                    ..Default::default()
                },
            );
        }

        let recycles: Vec<_> = ctx.intents.named("recycleCreep").cloned().collect();
        for intent in recycles {
            let (Some(spawn), Some(creep)) = (
                ctx.snapshot.object(&intent.actor),
                intent
                    .argument
                    .target_id()
                    .and_then(|id| ctx.snapshot.object(&id)),
            ) else {
                continue;
            };
            if spawn.kind != ObjectKind::Spawn
                || creep.kind != ObjectKind::Creep
                || creep.spawning
            {
                continue;
            }
            let kinds: Vec<_> = creep.body.iter().map(|p| p.kind).collect();
            let Some(store) = stores.current(ctx.snapshot, &spawn.id) else {
                continue;
            };
            let refund = (body_cost(&kinds) / 2).min(store.free_capacity(ResourceKind::Energy));
            if refund > 0 {
                let store = store
                    .with_added(ResourceKind::Energy, refund)
                    .map_err(|e| StepFault::StoreViolation {
                        object: spawn.id.to_string(),
                        reason: e.to_string(),
                    })?;
                stores.put(&spawn.id, store);
            }
            ctx.writer.remove(creep.id.clone());
            ctx.events.push(RoomEvent {
                kind: EventKind::ObjectDestroyed,
                object: creep.id.clone(),
                target: Some(spawn.id.clone()),
                amount: None,
                resource: None,
            });
        }

        stores.flush(ctx.writer);
        Ok(())
    }
}

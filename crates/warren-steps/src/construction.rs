//! Build, repair, and dismantle.

use crate::context::{StepContext, StoreScratch};
use crate::damage::settle_hits;
use crate::step::RoomStep;
use indexmap::{IndexMap, IndexSet};
use warren_core::{
    active_parts, BodyPartKind, ObjectId, ResourceKind, StepFault, BUILD_POWER,
    DISMANTLE_COST_DIVISOR, DISMANTLE_POWER, REPAIR_COST_DIVISOR, REPAIR_POWER,
};
use warren_model::{ConstructionState, ObjectKind, RoomObjectSnapshot};
use warren_mutation::{EventKind, ObjectPatch, RoomEvent, StatKind};

/// Starting hit points of a freshly built structure.
fn initial_hits(kind: ObjectKind) -> Option<u32> {
    match kind {
        ObjectKind::Rampart | ObjectKind::Wall => Some(1),
        ObjectKind::Road => Some(5000),
        ObjectKind::Container => Some(250_000),
        ObjectKind::Extension | ObjectKind::Spawn | ObjectKind::Tower | ObjectKind::Storage
        | ObjectKind::Link | ObjectKind::Extractor | ObjectKind::Lab | ObjectKind::Terminal
        | ObjectKind::Nuker | ObjectKind::Factory | ObjectKind::PowerSpawn
        | ObjectKind::Observer => Some(1000),
        _ => None,
    }
}

/// Applies build, repair, and dismantle intents.
pub struct ConstructionStep;

impl RoomStep for ConstructionStep {
    fn name(&self) -> &'static str {
        "construction"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();
        let mut site_progress: IndexMap<ObjectId, u32> = IndexMap::new();
        let mut touched = IndexSet::new();

        // build
        let builds: Vec<_> = ctx.intents.named("build").cloned().collect();
        for intent in builds {
            let (Some(actor), Some(site)) = (
                ctx.snapshot.object(&intent.actor),
                intent
                    .argument
                    .target_id()
                    .and_then(|id| ctx.snapshot.object(&id)),
            ) else {
                continue;
            };
            let Some(construction) = &site.construction else {
                continue;
            };
            let Some(store) = stores.current(ctx.snapshot, &actor.id) else {
                continue;
            };
            let parts = active_parts(&actor.body, BodyPartKind::Work);
            let done = site_progress.get(&site.id).copied().unwrap_or(construction.progress);
            let remaining = construction.progress_total.saturating_sub(done);
            let spend = (parts * BUILD_POWER)
                .min(store.get(ResourceKind::Energy))
                .min(remaining);
            if spend == 0 {
                continue;
            }
            let store = store
                .with_removed(ResourceKind::Energy, spend)
                .map_err(|e| StepFault::StoreViolation {
                    object: actor.id.to_string(),
                    reason: e.to_string(),
                })?;
            stores.put(&actor.id, store);
            site_progress.insert(site.id.clone(), done + spend);
            if let Some(user) = &intent.user {
                ctx.stats.record(user, StatKind::EnergyConstruction, u64::from(spend));
            }
            ctx.events.push(RoomEvent {
                kind: EventKind::Build,
                object: actor.id.clone(),
                target: Some(site.id.clone()),
                amount: Some(spend),
                resource: None,
            });
        }

        // settle construction sites: finished ones become structures
        for (site_id, progress) in site_progress {
            let Some(site) = ctx.snapshot.object(&site_id) else {
                continue;
            };
            let Some(construction) = &site.construction else {
                continue;
            };
            if progress >= construction.progress_total {
                ctx.writer.remove(site_id.clone());
                let mut built = RoomObjectSnapshot::new(
                    site_id.clone(),
                    construction.structure,
                    site.room.clone(),
                    site.pos,
                );
                built.user = site.user.clone();
                built.hits = initial_hits(construction.structure);
                built.hits_max = built.hits;
                ctx.writer.upsert(built);
            } else {
                ctx.writer.patch(
                    site_id,
                    ObjectPatch {
                        construction: Some(ConstructionState {
                            progress,
                            ..construction.clone()
                        }),
                        ..Default::default()
                    },
                );
            }
        }

        // repair
        let repairs: Vec<_> = ctx.intents.named("repair").cloned().collect();
        for intent in repairs {
            let (Some(actor), Some(target)) = (
                ctx.snapshot.object(&intent.actor),
                intent
                    .argument
                    .target_id()
                    .and_then(|id| ctx.snapshot.object(&id)),
            ) else {
                continue;
            };
            let (Some(_), Some(max)) = (target.hits, target.hits_max) else {
                continue;
            };
            let Some(store) = stores.current(ctx.snapshot, &actor.id) else {
                continue;
            };
            let parts = active_parts(&actor.body, BodyPartKind::Work);
            let effective = ctx.ledger.effective_hits(target).unwrap_or(0);
            let healable = max.saturating_sub(effective);
            let mut restored = (parts * REPAIR_POWER).min(healable);
            let cost_cap = store.get(ResourceKind::Energy) * REPAIR_COST_DIVISOR;
            restored = restored.min(cost_cap);
            if restored == 0 {
                continue;
            }
            let energy = restored.div_ceil(REPAIR_COST_DIVISOR);
            let store = store
                .with_removed(ResourceKind::Energy, energy)
                .map_err(|e| StepFault::StoreViolation {
                    object: actor.id.to_string(),
                    reason: e.to_string(),
                })?;
            stores.put(&actor.id, store);
            ctx.ledger.add_hits_delta(&target.id, i64::from(restored));
            touched.insert(target.id.clone());
            ctx.events.push(RoomEvent {
                kind: EventKind::Repair,
                object: actor.id.clone(),
                target: Some(target.id.clone()),
                amount: Some(restored),
                resource: None,
            });
        }

        // dismantle
        let dismantles: Vec<_> = ctx.intents.named("dismantle").cloned().collect();
        for intent in dismantles {
            let (Some(actor), Some(target)) = (
                ctx.snapshot.object(&intent.actor),
                intent
                    .argument
                    .target_id()
                    .and_then(|id| ctx.snapshot.object(&id)),
            ) else {
                continue;
            };
            if !target.kind.is_structure() {
                continue;
            }
            let effective = ctx.ledger.effective_hits(target).unwrap_or(0);
            let parts = active_parts(&actor.body, BodyPartKind::Work);
            let damage = (parts * DISMANTLE_POWER).min(effective);
            if damage == 0 {
                continue;
            }
            ctx.ledger.add_hits_delta(&target.id, -i64::from(damage));
            touched.insert(target.id.clone());
            // dismantling returns a fraction of the removed hits as energy
            let refund = damage / DISMANTLE_COST_DIVISOR;
            if refund > 0 {
                if let Some(store) = stores.current(ctx.snapshot, &actor.id) {
                    let free = store.free_capacity(ResourceKind::Energy);
                    if free > 0 {
                        let store = store
                            .with_added(ResourceKind::Energy, refund.min(free))
                            .map_err(|e| StepFault::StoreViolation {
                                object: actor.id.to_string(),
                                reason: e.to_string(),
                            })?;
                        stores.put(&actor.id, store);
                    }
                }
            }
        }

        // rampart publicity toggles
        let toggles: Vec<_> = ctx.intents.named("setPublic").cloned().collect();
        for intent in toggles {
            let Some(rampart) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            let Some(public) = intent.argument.get("isPublic").and_then(|v| v.as_bool())
            else {
                continue;
            };
            if rampart.kind != ObjectKind::Rampart || rampart.is_public == Some(public) {
                continue;
            }
            ctx.writer.patch(
                rampart.id.clone(),
                ObjectPatch {
                    is_public: Some(public),
                    ..Default::default()
                },
            );
        }

        // construction-site self removal
        let removals: Vec<_> = ctx.intents.named("remove").cloned().collect();
        for intent in removals {
            let Some(site) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if site.kind == ObjectKind::ConstructionSite {
                ctx.writer.remove(site.id.clone());
            }
        }

        stores.flush(ctx.writer);
        settle_hits(ctx, &touched);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{creep, give, insert, pos, room, run_step};
    use warren_core::{
        IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, RoomName, UserId,
    };

    fn worker(id: &str, room_name: &RoomName) -> RoomObjectSnapshot {
        let mut c = creep(
            id,
            "u1",
            pos(10, 10),
            &[(BodyPartKind::Work, 2), (BodyPartKind::Carry, 2)],
            room_name,
        );
        give(&mut c, ResourceKind::Energy, 80);
        c
    }

    fn order(snap: &mut warren_model::RoomSnapshot, name: &str, actor: &str, target: &str) {
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(
            ObjectId::from(actor),
            IntentRecord::single(
                name,
                IntentArgument::default().with("id", IntentFieldValue::Text(target.into())),
            ),
        );
        snap.intents.push(env);
    }

    fn site(id: &str, progress: u32, total: u32, room_name: &RoomName) -> RoomObjectSnapshot {
        let mut s = RoomObjectSnapshot::new(
            ObjectId::from(id),
            ObjectKind::ConstructionSite,
            room_name.clone(),
            pos(12, 10),
        );
        s.user = Some(UserId::from("u1"));
        s.construction = Some(ConstructionState {
            structure: ObjectKind::Extension,
            progress,
            progress_total: total,
        });
        s
    }

    #[test]
    fn build_adds_five_progress_per_work_part() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        insert(&mut snap, worker("w", &name));
        insert(&mut snap, site("s", 0, 3000, &name));
        order(&mut snap, "build", "w", "s");
        let run = run_step(&ConstructionStep, &snap);
        let patch = &run.batch.patches[&ObjectId::from("s")];
        assert_eq!(patch.construction.as_ref().unwrap().progress, 10);
        assert_eq!(
            run.batch.patches[&ObjectId::from("w")]
                .store
                .as_ref()
                .unwrap()
                .energy(),
            70
        );
        assert_eq!(run.stats[0].kind, StatKind::EnergyConstruction);
        assert_eq!(run.stats[0].amount, 10);
    }

    #[test]
    fn finished_site_becomes_a_structure() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        insert(&mut snap, worker("w", &name));
        insert(&mut snap, site("s", 2995, 3000, &name));
        order(&mut snap, "build", "w", "s");
        let run = run_step(&ConstructionStep, &snap);
        assert!(run.batch.removals.contains(&ObjectId::from("s")));
        assert_eq!(run.batch.upserts.len(), 1);
        let built = &run.batch.upserts[0];
        assert_eq!(built.kind, ObjectKind::Extension);
        assert_eq!(built.hits, Some(1000));
        // spent only the 5 missing progress
        assert_eq!(
            run.batch.patches[&ObjectId::from("w")]
                .store
                .as_ref()
                .unwrap()
                .energy(),
            75
        );
    }

    #[test]
    fn repair_restores_hits_and_charges_energy() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        insert(&mut snap, worker("w", &name));
        let mut road = RoomObjectSnapshot::new(
            ObjectId::from("r"),
            ObjectKind::Road,
            name.clone(),
            pos(11, 10),
        );
        road.hits = Some(4000);
        road.hits_max = Some(5000);
        insert(&mut snap, road);
        order(&mut snap, "repair", "w", "r");
        let run = run_step(&ConstructionStep, &snap);
        assert_eq!(run.batch.patches[&ObjectId::from("r")].hits, Some(4200));
        assert_eq!(
            run.batch.patches[&ObjectId::from("w")]
                .store
                .as_ref()
                .unwrap()
                .energy(),
            78
        );
    }

    #[test]
    fn dismantle_destroys_and_refunds_energy() {
        let mut snap = room("W1N1", 5);
        let name = snap.room.clone();
        let mut w = creep(
            "w",
            "u1",
            pos(10, 10),
            &[(BodyPartKind::Work, 2), (BodyPartKind::Carry, 1)],
            &name,
        );
        w.user = Some(UserId::from("u1"));
        insert(&mut snap, w);
        let mut road = RoomObjectSnapshot::new(
            ObjectId::from("r"),
            ObjectKind::Road,
            name.clone(),
            pos(11, 10),
        );
        road.hits = Some(80);
        road.hits_max = Some(5000);
        road.user = None;
        insert(&mut snap, road);
        order(&mut snap, "dismantle", "w", "r");
        let run = run_step(&ConstructionStep, &snap);
        assert!(run.batch.removals.contains(&ObjectId::from("r")));
        assert!(run
            .events
            .iter()
            .any(|e| e.kind == EventKind::ObjectDestroyed));
    }

    #[test]
    fn set_public_patches_only_when_the_flag_changes() {
        let mut snap = room("W1N1", 10);
        let name = snap.room.clone();
        let mut rampart = RoomObjectSnapshot::new(
            ObjectId::from("rp"),
            ObjectKind::Rampart,
            name.clone(),
            pos(12, 10),
        );
        rampart.user = Some(UserId::from("u1"));
        rampart.hits = Some(10_000);
        rampart.hits_max = Some(10_000);

        let toggle = |snap: &mut warren_model::RoomSnapshot, public: bool| {
            let mut env = IntentEnvelope::for_user(UserId::from("u1"));
            env.push_intent(
                ObjectId::from("rp"),
                IntentRecord::single(
                    "setPublic",
                    IntentArgument::default().with("isPublic", IntentFieldValue::Bool(public)),
                ),
            );
            snap.intents.push(env);
        };

        // unset flag, asked to open: patched
        insert(&mut snap, rampart.clone());
        toggle(&mut snap, true);
        let run = run_step(&ConstructionStep, &snap);
        assert_eq!(run.batch.patches[&ObjectId::from("rp")].is_public, Some(true));

        // already open, asked to open again: no-op
        let mut snap = room("W1N1", 10);
        rampart.is_public = Some(true);
        insert(&mut snap, rampart);
        toggle(&mut snap, true);
        let run = run_step(&ConstructionStep, &snap);
        assert!(run.batch.patches.is_empty());
    }
}

//! Controller interaction: upgrade, claim, unclaim, reserve, attack,
//! sign, and safe-mode generation/activation.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use warren_core::{
    active_parts, BodyPartKind, GameTime, ResourceKind, StepFault, CONTROLLER_DOWNGRADE,
    CONTROLLER_DOWNGRADE_RESTORE, CONTROLLER_LEVELS, CONTROLLER_RESERVE, CONTROLLER_RESERVE_MAX,
    SAFE_MODE_COST, SAFE_MODE_DURATION, UPGRADE_CONTROLLER_POWER,
};
use warren_model::{ControllerState, Reservation, Sign};
use warren_mutation::{EventKind, ObjectPatch, RoomEvent, StatKind};

/// Applies controller intents.
pub struct ControllerStep;

fn violation(object: &warren_core::ObjectId, err: impl std::fmt::Display) -> StepFault {
    StepFault::StoreViolation {
        object: object.to_string(),
        reason: err.to_string(),
    }
}

impl RoomStep for ControllerStep {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let Some(controller) = ctx.snapshot.controller() else {
            return Ok(());
        };
        let controller_id = controller.id.clone();
        let mut state = controller
            .controller
            .clone()
            .unwrap_or_default();
        let mut owner = controller.user.clone();
        let mut dirty = false;
        let mut stores = StoreScratch::new();
        let now = ctx.now();

        let upgrades: Vec<_> = ctx.intents.named("upgradeController").cloned().collect();
        for intent in upgrades {
            let Some(actor) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            let Some(store) = stores.current(ctx.snapshot, &actor.id) else {
                continue;
            };
            let parts = active_parts(&actor.body, BodyPartKind::Work);
            let spend = (parts * UPGRADE_CONTROLLER_POWER).min(store.energy());
            if spend == 0 {
                continue;
            }
            let store = store
                .with_removed(ResourceKind::Energy, spend)
                .map_err(|e| violation(&actor.id, e))?;
            stores.put(&actor.id, store);
            state.progress += spend;
            // upgrading pushes the downgrade deadline back toward its cap
            if state.level > 0 {
                let cap = now.0 + CONTROLLER_DOWNGRADE[state.level as usize];
                let bumped = state
                    .downgrade_time
                    .map(|t| t.0 + CONTROLLER_DOWNGRADE_RESTORE)
                    .unwrap_or(cap)
                    .min(cap);
                state.downgrade_time = Some(GameTime(bumped));
            }
            while state.level < 8 && state.progress >= CONTROLLER_LEVELS[state.level as usize] {
                state.progress -= CONTROLLER_LEVELS[state.level as usize];
                state.level += 1;
                state.downgrade_time =
                    Some(GameTime(now.0 + CONTROLLER_DOWNGRADE[state.level as usize]));
            }
            dirty = true;
            if let Some(user) = &intent.user {
                ctx.stats.record(user, StatKind::EnergyControl, u64::from(spend));
            }
            ctx.events.push(RoomEvent {
                kind: EventKind::UpgradeController,
                object: intent.actor.clone(),
                target: Some(controller_id.clone()),
                amount: Some(spend),
                resource: None,
            });
        }

        let claims: Vec<_> = ctx.intents.named("claimController").cloned().collect();
        for intent in claims {
            let Some(actor) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if owner.is_some() || active_parts(&actor.body, BodyPartKind::Claim) == 0 {
                continue;
            }
            if let Some(reservation) = &state.reservation {
                if Some(&reservation.user) != intent.user.as_ref() {
                    continue;
                }
            }
            owner = intent.user.clone();
            state.level = 1;
            state.progress = 0;
            state.reservation = None;
            state.downgrade_time = Some(GameTime(now.0 + CONTROLLER_DOWNGRADE[1]));
            dirty = true;
        }

        if ctx.intents.named("unclaim").any(|i| i.actor == controller_id) {
            owner = None;
            state = ControllerState::default();
            dirty = true;
        }

        let reserves: Vec<_> = ctx.intents.named("reserveController").cloned().collect();
        for intent in reserves {
            let Some(actor) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if owner.is_some() {
                continue;
            }
            let Some(user) = intent.user.clone() else {
                continue;
            };
            let parts = u64::from(active_parts(&actor.body, BodyPartKind::Claim));
            if parts == 0 {
                continue;
            }
            match &mut state.reservation {
                Some(r) if r.user == user => {
                    let cap = now.0 + CONTROLLER_RESERVE_MAX;
                    r.ends_at = GameTime((r.ends_at.0 + parts * CONTROLLER_RESERVE).min(cap));
                }
                Some(_) => continue, // reserved by someone else
                None => {
                    state.reservation = Some(Reservation {
                        user,
                        ends_at: GameTime(now.0 + parts * CONTROLLER_RESERVE),
                    });
                }
            }
            dirty = true;
            ctx.events.push(RoomEvent {
                kind: EventKind::Reserve,
                object: intent.actor.clone(),
                target: Some(controller_id.clone()),
                amount: None,
                resource: None,
            });
        }

        let attacks: Vec<_> = ctx.intents.named("attackController").cloned().collect();
        for intent in attacks {
            let Some(actor) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            let parts = u64::from(active_parts(&actor.body, BodyPartKind::Claim));
            if parts == 0 {
                continue;
            }
            if let Some(r) = &mut state.reservation {
                let reduced = r.ends_at.0.saturating_sub(parts * 300);
                if reduced <= now.0 {
                    state.reservation = None;
                } else {
                    r.ends_at = GameTime(reduced);
                }
                dirty = true;
            } else if let Some(t) = state.downgrade_time {
                state.downgrade_time = Some(GameTime(t.0.saturating_sub(parts * 300)));
                dirty = true;
            }
            ctx.events.push(RoomEvent {
                kind: EventKind::AttackController,
                object: intent.actor.clone(),
                target: Some(controller_id.clone()),
                amount: None,
                resource: None,
            });
        }

        let signs: Vec<_> = ctx.intents.named("signController").cloned().collect();
        for intent in signs {
            let (Some(user), Some(text)) = (intent.user.clone(), intent.argument.text("sign"))
            else {
                continue;
            };
            state.sign = Some(Sign {
                user,
                text: text.to_string(),
                time: now,
            });
            dirty = true;
        }

        let generates: Vec<_> = ctx.intents.named("generateSafeMode").cloned().collect();
        for intent in generates {
            let Some(actor) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            let Some(store) = stores.current(ctx.snapshot, &actor.id) else {
                continue;
            };
            if store.get(ResourceKind::Ghodium) < SAFE_MODE_COST {
                continue;
            }
            let store = store
                .with_removed(ResourceKind::Ghodium, SAFE_MODE_COST)
                .map_err(|e| violation(&actor.id, e))?;
            stores.put(&actor.id, store);
            state.safe_modes_available += 1;
            dirty = true;
        }

        if ctx
            .intents
            .named("activateSafeMode")
            .any(|i| i.actor == controller_id)
            && state.safe_modes_available > 0
            && state
                .safe_mode_until
                .map(|t| t <= now)
                .unwrap_or(true)
        {
            state.safe_modes_available -= 1;
            state.safe_mode_until = Some(GameTime(now.0 + SAFE_MODE_DURATION));
            dirty = true;
        }

        if dirty {
            ctx.writer.patch(
                controller_id,
                ObjectPatch {
                    user: Some(owner),
                    controller: Some(state),
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
    use crate::testkit::{creep, give, insert, pos, room, run_step};
    use warren_core::{
        IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, ObjectId, RoomName,
        UserId,
    };
    use warren_model::{ObjectKind, RoomObjectSnapshot};

    fn controller(room_name: &RoomName, user: Option<&str>, state: ControllerState) -> RoomObjectSnapshot {
        let mut c = RoomObjectSnapshot::new(
            ObjectId::from("ctrl"),
            ObjectKind::Controller,
            room_name.clone(),
            pos(12, 10),
        );
        c.user = user.map(UserId::from);
        c.controller = Some(state);
        c
    }

    fn order(snap: &mut warren_model::RoomSnapshot, user: &str, name: &str, actor: &str, arg: IntentArgument) {
        let mut env = IntentEnvelope::for_user(UserId::from(user));
        env.push_intent(ObjectId::from(actor), IntentRecord::single(name, arg));
        snap.intents.push(env);
    }

    fn id_arg(target: &str) -> IntentArgument {
        IntentArgument::default().with("id", IntentFieldValue::Text(target.into()))
    }

    #[test]
    fn three_work_parts_upgrade_three_progress() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        let mut c = creep(
            "u",
            "u1",
            pos(10, 10),
            &[(BodyPartKind::Work, 3), (BodyPartKind::Carry, 2)],
            &name,
        );
        give(&mut c, ResourceKind::Energy, 100);
        insert(&mut snap, c);
        insert(
            &mut snap,
            controller(
                &name,
                Some("u1"),
                ControllerState {
                    level: 2,
                    progress: 100,
                    downgrade_time: Some(GameTime(4000)),
                    ..Default::default()
                },
            ),
        );
        order(&mut snap, "u1", "upgradeController", "u", id_arg("ctrl"));
        let run = run_step(&ControllerStep, &snap);
        let patch = &run.batch.patches[&ObjectId::from("ctrl")];
        let state = patch.controller.as_ref().unwrap();
        assert_eq!(state.progress, 103);
        assert_eq!(state.downgrade_time, Some(GameTime(4100)));
        assert_eq!(
            run.batch.patches[&ObjectId::from("u")].store.as_ref().unwrap().energy(),
            97
        );
        assert_eq!(run.stats[0].kind, StatKind::EnergyControl);
        assert_eq!(run.stats[0].amount, 3);
    }

    #[test]
    fn crossing_the_threshold_levels_up() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        let mut c = creep(
            "u",
            "u1",
            pos(10, 10),
            &[(BodyPartKind::Work, 3), (BodyPartKind::Carry, 2)],
            &name,
        );
        give(&mut c, ResourceKind::Energy, 100);
        insert(&mut snap, c);
        insert(
            &mut snap,
            controller(
                &name,
                Some("u1"),
                ControllerState {
                    level: 1,
                    progress: 199, // threshold for level 1 is 200
                    downgrade_time: Some(GameTime(20_000)),
                    ..Default::default()
                },
            ),
        );
        order(&mut snap, "u1", "upgradeController", "u", id_arg("ctrl"));
        let run = run_step(&ControllerStep, &snap);
        let state = run.batch.patches[&ObjectId::from("ctrl")]
            .controller
            .as_ref()
            .unwrap();
        assert_eq!(state.level, 2);
        assert_eq!(state.progress, 2);
        assert_eq!(
            state.downgrade_time,
            Some(GameTime(1000 + CONTROLLER_DOWNGRADE[2]))
        );
    }

    #[test]
    fn claim_takes_an_unowned_controller() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        insert(
            &mut snap,
            creep(
                "c",
                "u1",
                pos(11, 10),
                &[(BodyPartKind::Claim, 1), (BodyPartKind::Move, 1)],
                &name,
            ),
        );
        insert(&mut snap, controller(&name, None, ControllerState::default()));
        order(&mut snap, "u1", "claimController", "c", id_arg("ctrl"));
        let run = run_step(&ControllerStep, &snap);
        let patch = &run.batch.patches[&ObjectId::from("ctrl")];
        assert_eq!(patch.user, Some(Some(UserId::from("u1"))));
        assert_eq!(patch.controller.as_ref().unwrap().level, 1);
    }

    #[test]
    fn reservation_accumulates_per_claim_part() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        insert(
            &mut snap,
            creep(
                "c",
                "u1",
                pos(11, 10),
                &[(BodyPartKind::Claim, 2), (BodyPartKind::Move, 1)],
                &name,
            ),
        );
        insert(&mut snap, controller(&name, None, ControllerState::default()));
        order(&mut snap, "u1", "reserveController", "c", id_arg("ctrl"));
        let run = run_step(&ControllerStep, &snap);
        let state = run.batch.patches[&ObjectId::from("ctrl")]
            .controller
            .as_ref()
            .unwrap();
        let r = state.reservation.as_ref().unwrap();
        assert_eq!(r.user, UserId::from("u1"));
        assert_eq!(r.ends_at, GameTime(1000 + 2 * CONTROLLER_RESERVE));
    }

    #[test]
    fn generate_safe_mode_banks_a_charge() {
        let mut snap = room("W1N1", 1000);
        let name = snap.room.clone();
        let mut c = creep(
            "c",
            "u1",
            pos(11, 10),
            &[(BodyPartKind::Carry, 25), (BodyPartKind::Move, 1)],
            &name,
        );
        give(&mut c, ResourceKind::Ghodium, 1000);
        insert(&mut snap, c);
        insert(
            &mut snap,
            controller(&name, Some("u1"), ControllerState::default()),
        );
        order(&mut snap, "u1", "generateSafeMode", "c", id_arg("ctrl"));
        let run = run_step(&ControllerStep, &snap);
        let state = run.batch.patches[&ObjectId::from("ctrl")]
            .controller
            .as_ref()
            .unwrap();
        assert_eq!(state.safe_modes_available, 1);
        assert_eq!(
            run.batch.patches[&ObjectId::from("c")]
                .store
                .as_ref()
                .unwrap()
                .get(ResourceKind::Ghodium),
            0
        );
    }
}

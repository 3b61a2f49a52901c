//! Link-to-link energy transfers.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use warren_core::{GameTime, ResourceKind, StepFault, LINK_COOLDOWN_PER_RANGE, LINK_LOSS_PERCENT};
use warren_model::ObjectKind;
use warren_mutation::{EventKind, ObjectPatch, RoomEvent};

/// Applies `transferEnergy` intents between links.
pub struct LinkStep;

impl RoomStep for LinkStep {
    fn name(&self) -> &'static str {
        "link"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();

        let sends: Vec<_> = ctx.intents.named("transferEnergy").cloned().collect();
        for intent in sends {
            let (Some(from), Some(to)) = (
                ctx.snapshot.object(&intent.actor),
                intent
                    .argument
                    .target_id()
                    .and_then(|id| ctx.snapshot.object(&id)),
            ) else {
                continue;
            };
            if from.kind != ObjectKind::Link
                || to.kind != ObjectKind::Link
                || !from.cooldown_ready(ctx.now())
            {
                continue;
            }
            let (Some(src), Some(dst)) = (
                stores.current(ctx.snapshot, &from.id),
                stores.current(ctx.snapshot, &to.id),
            ) else {
                continue;
            };
            let requested = intent.argument.amount("amount").unwrap_or_else(|| src.energy());
            let sent = requested
                .min(src.energy())
                .min(dst.free_capacity(ResourceKind::Energy));
            if sent == 0 {
                continue;
            }
            let lost = (sent * LINK_LOSS_PERCENT).div_ceil(100);
            let fault = |id: &warren_core::ObjectId, e: warren_model::StoreArithmeticError| {
                StepFault::StoreViolation {
                    object: id.to_string(),
                    reason: e.to_string(),
                }
            };
            let src = src
                .with_removed(ResourceKind::Energy, sent)
                .map_err(|e| fault(&from.id, e))?;
            let dst = dst
                .with_added(ResourceKind::Energy, sent - lost)
                .map_err(|e| fault(&to.id, e))?;
            stores.put(&from.id, src);
            stores.put(&to.id, dst);
            let cooldown = u64::from(from.pos.range_to(to.pos)) * LINK_COOLDOWN_PER_RANGE;
            ctx.writer.patch(
                from.id.clone(),
                ObjectPatch {
                    cooldown_until: Some(Some(GameTime(ctx.now().0 + cooldown))),
                    ..Default::default()
                },
            );
            ctx.events.push(RoomEvent {
                kind: EventKind::Transfer,
                object: from.id.clone(),
                target: Some(to.id.clone()),
                amount: Some(sent - lost),
                resource: Some(ResourceKind::Energy),
            });
        }

        stores.flush(ctx.writer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{give, insert, pos, room, run_step, structure};
    use warren_core::{
        IntentArgument, IntentEnvelope, IntentFieldValue, IntentRecord, ObjectId, RoomName,
        UserId,
    };
    use warren_model::{RoomObjectSnapshot, Store};

    fn link(id: &str, at: (u8, u8), energy: u32, room_name: &RoomName) -> RoomObjectSnapshot {
        let mut l = structure(id, ObjectKind::Link, pos(at.0, at.1), room_name);
        l.user = Some(UserId::from("u1"));
        l.store = Some(Store::with_total_capacity(800));
        give(&mut l, ResourceKind::Energy, energy);
        l
    }

    fn send_order(snap: &mut warren_model::RoomSnapshot, from: &str, to: &str, amount: u32) {
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(
            ObjectId::from(from),
            IntentRecord::single(
                "transferEnergy",
                IntentArgument::default()
                    .with("id", IntentFieldValue::Text(to.into()))
                    .with("amount", IntentFieldValue::Number(f64::from(amount))),
            ),
        );
        snap.intents.push(env);
    }

    #[test]
    fn transfer_loses_three_percent_and_arms_cooldown() {
        let mut snap = room("W1N1", 200);
        let name = snap.room.clone();
        insert(&mut snap, link("a", (10, 10), 400, &name));
        insert(&mut snap, link("b", (20, 10), 0, &name));
        send_order(&mut snap, "a", "b", 400);
        let run = run_step(&LinkStep, &snap);
        let a = run.batch.patches[&ObjectId::from("a")].store.as_ref().unwrap();
        let b = run.batch.patches[&ObjectId::from("b")].store.as_ref().unwrap();
        assert_eq!(a.energy(), 0);
        assert_eq!(b.energy(), 388); // 400 − ceil(12)
        assert_eq!(
            run.batch.patches[&ObjectId::from("a")].cooldown_until,
            Some(Some(GameTime(200 + 10))) // range 10, one tick per tile
        );
    }

    #[test]
    fn transfer_clamps_to_receiver_capacity() {
        let mut snap = room("W1N1", 200);
        let name = snap.room.clone();
        insert(&mut snap, link("a", (10, 10), 400, &name));
        insert(&mut snap, link("b", (12, 10), 750, &name));
        send_order(&mut snap, "a", "b", 400);
        let run = run_step(&LinkStep, &snap);
        let a = run.batch.patches[&ObjectId::from("a")].store.as_ref().unwrap();
        assert_eq!(a.energy(), 350); // only 50 fit
    }

    #[test]
    fn cooling_link_sends_nothing() {
        let mut snap = room("W1N1", 200);
        let name = snap.room.clone();
        let mut a = link("a", (10, 10), 400, &name);
        a.cooldown_until = Some(GameTime(250));
        insert(&mut snap, a);
        insert(&mut snap, link("b", (12, 10), 0, &name));
        send_order(&mut snap, "a", "b", 400);
        let run = run_step(&LinkStep, &snap);
        assert!(run.batch.is_empty());
    }
}

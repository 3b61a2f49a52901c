//! State validation: the actor and target exist, are alive, are not
//! mid-spawn, and have the stores the intent manipulates.

use crate::meta::{IntentSpec, StoreRule, TargetRule};
use crate::validator::{IntentValidator, PendingIntent, ValidationContext};
use warren_core::ValidationError;

/// Checks actor and target liveness and store presence.
pub struct StateValidator;

impl IntentValidator for StateValidator {
    fn name(&self) -> &'static str {
        "state"
    }

    fn check(
        &self,
        ctx: &ValidationContext<'_>,
        spec: &IntentSpec,
        intent: &PendingIntent,
    ) -> Result<(), ValidationError> {
        let actor = ctx
            .snapshot
            .object(&intent.actor)
            .ok_or(ValidationError::ActorNotFound)?;
        if !actor.is_alive() {
            return Err(ValidationError::ActorDead);
        }
        if actor.spawning {
            return Err(ValidationError::ActorSpawning);
        }
        if matches!(
            spec.store,
            StoreRule::ActorProvides | StoreRule::ActorReceives | StoreRule::ActorEnergy
        ) && actor.store.is_none()
        {
            return Err(ValidationError::ActorNoStore);
        }

        if let TargetRule::Required { .. } = spec.target {
            let target_id = intent
                .argument
                .target_id()
                .ok_or(ValidationError::MissingRequiredField)?;
            if target_id == intent.actor {
                return Err(ValidationError::TargetSameAsActor);
            }
            let target = ctx
                .snapshot
                .object(&target_id)
                .ok_or(ValidationError::TargetNotFound)?;
            if target.spawning {
                return Err(ValidationError::TargetSpawning);
            }
            if spec.target_has_hits && target.hits.is_none() {
                return Err(ValidationError::TargetNoHits);
            }
            if matches!(
                spec.store,
                StoreRule::ActorProvides | StoreRule::ActorReceives
            ) && target.store.is_none()
            {
                return Err(ValidationError::TargetNoStore);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::intent_spec;
    use warren_core::{
        GameTime, IntentArgument, IntentFieldValue, ObjectId, RoomName, RoomPosition, UserId,
    };
    use warren_model::{ObjectKind, RoomObjectSnapshot, RoomSnapshot, Store};

    fn creep(id: &str, room: &RoomName) -> RoomObjectSnapshot {
        let mut c = RoomObjectSnapshot::new(
            ObjectId::from(id),
            ObjectKind::Creep,
            room.clone(),
            RoomPosition::new(10, 10).unwrap(),
        );
        c.hits = Some(100);
        c.hits_max = Some(100);
        c.store = Some(Store::with_total_capacity(50));
        c
    }

    fn run(snap: &RoomSnapshot, name: &str, actor: &str, target: &str) -> Result<(), ValidationError> {
        let intent = PendingIntent {
            user: Some(UserId::from("u1")),
            actor: ObjectId::from(actor),
            name: name.into(),
            argument: IntentArgument::default()
                .with("id", IntentFieldValue::Text(target.into()))
                .with("resourceType", IntentFieldValue::Text("energy".into())),
        };
        StateValidator.check(
            &ValidationContext { snapshot: snap },
            intent_spec(name).unwrap(),
            &intent,
        )
    }

    #[test]
    fn absent_actor_rejected() {
        let snap = RoomSnapshot::empty(RoomName::from("W1N1"), GameTime(1));
        assert_eq!(
            run(&snap, "attack", "ghost", "t"),
            Err(ValidationError::ActorNotFound)
        );
    }

    #[test]
    fn dead_actor_rejected() {
        let room = RoomName::from("W1N1");
        let mut snap = RoomSnapshot::empty(room.clone(), GameTime(1));
        let mut c = creep("a", &room);
        c.hits = Some(0);
        snap.objects.insert(c.id.clone(), c);
        assert_eq!(
            run(&snap, "attack", "a", "t"),
            Err(ValidationError::ActorDead)
        );
    }

    #[test]
    fn spawning_actor_rejected() {
        let room = RoomName::from("W1N1");
        let mut snap = RoomSnapshot::empty(room.clone(), GameTime(1));
        let mut c = creep("a", &room);
        c.spawning = true;
        snap.objects.insert(c.id.clone(), c);
        assert_eq!(
            run(&snap, "attack", "a", "t"),
            Err(ValidationError::ActorSpawning)
        );
    }

    #[test]
    fn self_target_rejected() {
        let room = RoomName::from("W1N1");
        let mut snap = RoomSnapshot::empty(room.clone(), GameTime(1));
        let c = creep("a", &room);
        snap.objects.insert(c.id.clone(), c);
        assert_eq!(
            run(&snap, "attack", "a", "a"),
            Err(ValidationError::TargetSameAsActor)
        );
    }

    #[test]
    fn transfer_to_storeless_target_rejected() {
        let room = RoomName::from("W1N1");
        let mut snap = RoomSnapshot::empty(room.clone(), GameTime(1));
        let a = creep("a", &room);
        let mut t = creep("t", &room);
        t.store = None;
        snap.objects.insert(a.id.clone(), a);
        snap.objects.insert(t.id.clone(), t);
        assert_eq!(
            run(&snap, "transfer", "a", "t"),
            Err(ValidationError::TargetNoStore)
        );
    }

    #[test]
    fn live_pair_accepted() {
        let room = RoomName::from("W1N1");
        let mut snap = RoomSnapshot::empty(room.clone(), GameTime(1));
        let a = creep("a", &room);
        let t = creep("t", &room);
        snap.objects.insert(a.id.clone(), a);
        snap.objects.insert(t.id.clone(), t);
        assert_eq!(run(&snap, "attack", "a", "t"), Ok(()));
    }
}

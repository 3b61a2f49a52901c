//! The fixed five-stage validator pipeline.
//!
//! Stage order is part of the engine's behavior (rejection codes depend
//! on which stage fires first), so the standard pipeline is built in
//! one place and its order is asserted by test.

use crate::meta::intent_spec;
use crate::permission::PermissionValidator;
use crate::range::RangeValidator;
use crate::resource::ResourceValidator;
use crate::schema::SchemaValidator;
use crate::state::StateValidator;
use crate::validator::{IntentValidator, PendingIntent, ValidationContext};
use warren_core::{IntentArgument, ObjectId, UserId, ValidationError};
use warren_model::RoomSnapshot;

/// Stage names of the standard pipeline, in execution order.
pub const STAGE_ORDER: [&str; 5] = ["schema", "range", "state", "resource", "permission"];

/// An intent that passed every stage.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedIntent {
    /// The submitting user.
    pub user: Option<UserId>,
    /// The acting object.
    pub actor: ObjectId,
    /// Intent name.
    pub name: String,
    /// The argument set.
    pub argument: IntentArgument,
}

/// An intent dropped by some stage, with the first failing code.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    /// The submitting user.
    pub user: Option<UserId>,
    /// The acting object.
    pub actor: ObjectId,
    /// Intent name.
    pub intent: String,
    /// Why it was dropped.
    pub error: ValidationError,
}

/// The result of validating one room's envelopes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationOutcome {
    /// Intents that passed, in submission order.
    pub accepted: Vec<ValidatedIntent>,
    /// Intents that were dropped, in submission order.
    pub rejections: Vec<Rejection>,
    /// Records whose name has no metadata row.
    pub unknown_dropped: u32,
}

impl ValidationOutcome {
    /// Accepted intents with the given name, in submission order.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ValidatedIntent> + 'a {
        self.accepted.iter().filter(move |i| i.name == name)
    }

    /// Accepted intents for one actor, in submission order.
    pub fn for_actor<'a>(
        &'a self,
        actor: &'a ObjectId,
    ) -> impl Iterator<Item = &'a ValidatedIntent> + 'a {
        self.accepted.iter().filter(move |i| &i.actor == actor)
    }
}

/// The ordered stage list.
pub struct ValidatorPipeline {
    stages: Vec<Box<dyn IntentValidator>>,
}

impl ValidatorPipeline {
    /// The standard five stages in their fixed order.
    pub fn standard() -> Self {
        Self {
            stages: vec![
                Box::new(SchemaValidator),
                Box::new(RangeValidator),
                Box::new(StateValidator),
                Box::new(ResourceValidator),
                Box::new(PermissionValidator),
            ],
        }
    }

    /// Stage names, in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over one intent; the first rejection wins.
    ///
    /// Returns `None` when the intent's name has no metadata row (the
    /// record is dropped without a rejection).
    pub fn check(
        &self,
        ctx: &ValidationContext<'_>,
        intent: &PendingIntent,
    ) -> Option<Result<(), ValidationError>> {
        let spec = intent_spec(&intent.name)?;
        for stage in &self.stages {
            if let Err(err) = stage.check(ctx, spec, intent) {
                return Some(Err(err));
            }
        }
        Some(Ok(()))
    }

    /// Validate every object intent in the snapshot's envelopes.
    ///
    /// Pure with respect to the snapshot: the same snapshot always
    /// yields the same outcome, in the same order.
    pub fn validate_room(&self, snapshot: &RoomSnapshot) -> ValidationOutcome {
        let ctx = ValidationContext { snapshot };
        let mut outcome = ValidationOutcome::default();
        for envelope in &snapshot.intents {
            for (actor, records) in &envelope.object_intents {
                for record in records {
                    for argument in &record.arguments {
                        let pending = PendingIntent {
                            user: envelope.user.clone(),
                            actor: actor.clone(),
                            name: record.name.clone(),
                            argument: argument.clone(),
                        };
                        match self.check(&ctx, &pending) {
                            None => outcome.unknown_dropped += 1,
                            Some(Ok(())) => outcome.accepted.push(ValidatedIntent {
                                user: pending.user,
                                actor: pending.actor,
                                name: pending.name,
                                argument: pending.argument,
                            }),
                            Some(Err(error)) => outcome.rejections.push(Rejection {
                                user: pending.user,
                                actor: pending.actor,
                                intent: pending.name,
                                error,
                            }),
                        }
                    }
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_core::{
        GameTime, IntentEnvelope, IntentFieldValue, IntentRecord, ResourceKind, RoomName,
        RoomPosition,
    };
    use warren_model::{ObjectKind, RoomObjectSnapshot, Store};

    fn creep(id: &str, room: &RoomName, x: u8, y: u8, user: &str) -> RoomObjectSnapshot {
        let mut c = RoomObjectSnapshot::new(
            ObjectId::from(id),
            ObjectKind::Creep,
            room.clone(),
            RoomPosition::new(x, y).unwrap(),
        );
        c.user = Some(UserId::from(user));
        c.hits = Some(100);
        c.hits_max = Some(100);
        c.store = Some(
            Store::with_total_capacity(50)
                .with_added(ResourceKind::Energy, 25)
                .unwrap(),
        );
        c
    }

    fn snapshot_with_attack(distance: u8) -> RoomSnapshot {
        let room = RoomName::from("W1N1");
        let mut snap = RoomSnapshot::empty(room.clone(), GameTime(1));
        let a = creep("a", &room, 10, 10, "u1");
        let t = creep("t", &room, 10 + distance, 10, "u2");
        snap.objects.insert(a.id.clone(), a);
        snap.objects.insert(t.id.clone(), t);
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(
            ObjectId::from("a"),
            IntentRecord::single(
                "attack",
                IntentArgument::default().with("id", IntentFieldValue::Text("t".into())),
            ),
        );
        snap.intents.push(env);
        snap
    }

    #[test]
    fn standard_stage_order_is_fixed() {
        assert_eq!(ValidatorPipeline::standard().stage_names(), STAGE_ORDER);
    }

    #[test]
    fn adjacent_attack_accepted() {
        let snap = snapshot_with_attack(1);
        let outcome = ValidatorPipeline::standard().validate_room(&snap);
        assert_eq!(outcome.accepted.len(), 1);
        assert!(outcome.rejections.is_empty());
    }

    #[test]
    fn distance_two_attack_rejected_not_in_range() {
        let snap = snapshot_with_attack(2);
        let outcome = ValidatorPipeline::standard().validate_room(&snap);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejections.len(), 1);
        assert_eq!(outcome.rejections[0].error, ValidationError::NotInRange);
        assert_eq!(outcome.rejections[0].intent, "attack");
    }

    #[test]
    fn unknown_intent_dropped_silently() {
        let mut snap = snapshot_with_attack(1);
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        env.push_intent(
            ObjectId::from("a"),
            IntentRecord::single("teleport", IntentArgument::default()),
        );
        snap.intents.push(env);
        let outcome = ValidatorPipeline::standard().validate_room(&snap);
        assert_eq!(outcome.unknown_dropped, 1);
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn validation_is_idempotent() {
        let snap = snapshot_with_attack(2);
        let pipeline = ValidatorPipeline::standard();
        let first = pipeline.validate_room(&snap);
        let second = pipeline.validate_room(&snap);
        assert_eq!(first, second);
    }

    #[test]
    fn named_filter_preserves_order() {
        let room = RoomName::from("W1N1");
        let mut snap = RoomSnapshot::empty(room.clone(), GameTime(1));
        for (id, x) in [("a", 10u8), ("b", 12)] {
            let c = creep(id, &room, x, 10, "u1");
            snap.objects.insert(c.id.clone(), c);
        }
        let mut env = IntentEnvelope::for_user(UserId::from("u1"));
        for actor in ["a", "b"] {
            env.push_intent(
                ObjectId::from(actor),
                IntentRecord::single("suicide", IntentArgument::default()),
            );
        }
        snap.intents.push(env);
        let outcome = ValidatorPipeline::standard().validate_room(&snap);
        let actors: Vec<_> = outcome.named("suicide").map(|i| i.actor.0.clone()).collect();
        assert_eq!(actors, ["a", "b"]);
    }
}

//! The validator trait and the units flowing through the pipeline.

use crate::meta::IntentSpec;
use warren_core::{IntentArgument, ObjectId, UserId, ValidationError};
use warren_model::RoomSnapshot;

/// One intent awaiting validation: the envelope context plus one
/// argument set of one record.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingIntent {
    /// The submitting user, when the envelope was authenticated.
    pub user: Option<UserId>,
    /// The acting object.
    pub actor: ObjectId,
    /// Intent name.
    pub name: String,
    /// The argument set.
    pub argument: IntentArgument,
}

/// Read-only context shared by all validators for one room tick.
#[derive(Clone, Copy, Debug)]
pub struct ValidationContext<'a> {
    /// The frozen room state being validated against.
    pub snapshot: &'a RoomSnapshot,
}

/// One stage of the validator pipeline.
///
/// Stages run in a fixed order and the first rejection short-circuits
/// the rest, so each stage may assume everything earlier stages verify.
/// A stage must be a pure function of (snapshot, intent).
pub trait IntentValidator: Send + Sync {
    /// Stable name, for rejection reporting and pipeline assertions.
    fn name(&self) -> &'static str;

    /// Accept or reject one intent.
    fn check(
        &self,
        ctx: &ValidationContext<'_>,
        spec: &IntentSpec,
        intent: &PendingIntent,
    ) -> Result<(), ValidationError>;
}

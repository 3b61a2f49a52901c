//! Range validation: the target must stand within the intent's
//! Chebyshev radius of the actor.
//!
//! Existence is the state stage's concern; when the actor or target is
//! absent from the snapshot this stage passes and lets the state stage
//! produce the precise not-found code.

use crate::meta::{IntentSpec, TargetRule};
use crate::validator::{IntentValidator, PendingIntent, ValidationContext};
use warren_core::ValidationError;
use warren_model::ObjectKind;

/// Checks actor-to-target distance.
pub struct RangeValidator;

impl IntentValidator for RangeValidator {
    fn name(&self) -> &'static str {
        "range"
    }

    fn check(
        &self,
        ctx: &ValidationContext<'_>,
        spec: &IntentSpec,
        intent: &PendingIntent,
    ) -> Result<(), ValidationError> {
        let TargetRule::Required { range } = spec.target else {
            return Ok(());
        };
        let Some(target_id) = intent.argument.target_id() else {
            return Ok(()); // schema already required the field
        };
        let (Some(actor), Some(target)) = (
            ctx.snapshot.object(&intent.actor),
            ctx.snapshot.object(&target_id),
        ) else {
            return Ok(());
        };
        // towers act room-wide; falloff is the processor's concern
        if actor.kind == ObjectKind::Tower {
            return Ok(());
        }
        if actor.pos.in_range_of(target.pos, range) {
            Ok(())
        } else {
            Err(ValidationError::NotInRange)
        }
    }
}

//! Schema validation: field presence, value kinds, amount and resource
//! well-formedness. Runs first; later stages assume the argument set is
//! shaped correctly.

use crate::meta::{FieldKind, IntentSpec};
use crate::validator::{IntentValidator, PendingIntent, ValidationContext};
use warren_core::ValidationError;

/// Checks the argument set against the intent's field schema.
pub struct SchemaValidator;

impl IntentValidator for SchemaValidator {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn check(
        &self,
        _ctx: &ValidationContext<'_>,
        spec: &IntentSpec,
        intent: &PendingIntent,
    ) -> Result<(), ValidationError> {
        for field in spec.fields {
            match intent.argument.get(field.name) {
                None if field.required => return Err(ValidationError::MissingRequiredField),
                None => {}
                Some(value) => {
                    if !field.kind.matches(value) {
                        return Err(ValidationError::InvalidFieldType);
                    }
                    if field.kind == FieldKind::Number
                        && intent.argument.amount(field.name).is_none()
                    {
                        return Err(ValidationError::NegativeAmount);
                    }
                }
            }
        }
        // resourceType values come from a closed set.
        if intent.argument.text("resourceType").is_some() && intent.argument.resource().is_none() {
            return Err(ValidationError::InvalidResourceType);
        }
        Ok(())
    }
}

//! Intent validation for the Warren tick engine.
//!
//! Player-submitted intents pass through a fixed five-stage pipeline
//! (schema, range, state, resource, permission) before any processor
//! step sees them. Validation is a pure function of the room snapshot
//! and the intent: the first failing stage produces the rejection code
//! and nothing downstream runs. The per-intent rules live in a single
//! metadata table rather than in per-intent code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod meta;
pub mod permission;
pub mod pipeline;
pub mod range;
pub mod resource;
pub mod schema;
pub mod state;
pub mod validator;

pub use meta::{intent_spec, FieldKind, FieldSpec, IntentSpec, OwnerRule, StoreRule, TargetRule};
pub use permission::PermissionValidator;
pub use pipeline::{
    Rejection, ValidatedIntent, ValidationOutcome, ValidatorPipeline, STAGE_ORDER,
};
pub use range::RangeValidator;
pub use resource::ResourceValidator;
pub use schema::SchemaValidator;
pub use state::StateValidator;
pub use validator::{IntentValidator, PendingIntent, ValidationContext};

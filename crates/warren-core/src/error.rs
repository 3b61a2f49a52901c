//! Error taxonomy, one enum per failure domain.
//!
//! Validation errors are recoverable-and-local (the intent is dropped,
//! nothing else is affected). Step faults are room-fatal-for-the-tick.
//! Storage errors come from the external collaborator.

use std::error::Error;
use std::fmt;

/// Why an intent was rejected by the validator pipeline.
///
/// Pure function of (snapshot, intent): re-validating the same pair
/// always yields the same code. The first failing validator
/// short-circuits the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationError {
    // Schema
    /// A required field is absent.
    MissingRequiredField,
    /// A field is present with the wrong value kind.
    InvalidFieldType,
    /// A numeric amount is negative or fractional.
    NegativeAmount,
    /// A resource code outside the known set.
    InvalidResourceType,

    // Range
    /// Chebyshev distance to the target exceeds the intent's radius.
    NotInRange,

    // State — actor
    /// The acting object does not exist in the snapshot.
    ActorNotFound,
    /// The actor has zero hits.
    ActorDead,
    /// The actor is still being spawned.
    ActorSpawning,
    /// The intent manipulates a store the actor does not have.
    ActorNoStore,

    // State — target
    /// The target object does not exist in the snapshot.
    TargetNotFound,
    /// The target is the actor itself.
    TargetSameAsActor,
    /// The target is still being spawned.
    TargetSpawning,
    /// The target has no hit points to affect.
    TargetNoHits,
    /// The intent manipulates a store the target does not have.
    TargetNoStore,

    // Resource
    /// Not enough energy for a work-type action.
    InsufficientEnergy,
    /// Not enough of the named resource in the source store.
    InsufficientResource,
    /// The destination store has no remaining capacity.
    TargetCapacityFull,
    /// The actor's own store has no remaining capacity.
    ActorCapacityFull,

    // Permission
    /// The room's controller is owned by someone else.
    ControllerNotOwned,
    /// The room's controller is reserved, but not by the actor's user.
    ControllerNotReservedByActor,
    /// The structure belongs to neither the owner nor the reserver.
    NotOwnedOrReserved,
    /// Safe mode blocks hostile actions in this room.
    SafeModeActive,
    /// A private rampart blocks access to the target tile.
    RampartBlocking,
    /// The room is closed to this user entirely.
    HostileRoom,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingRequiredField => "required field missing",
            Self::InvalidFieldType => "field has wrong value kind",
            Self::NegativeAmount => "amount is negative or fractional",
            Self::InvalidResourceType => "unknown resource type",
            Self::NotInRange => "target not in range",
            Self::ActorNotFound => "actor not found",
            Self::ActorDead => "actor is dead",
            Self::ActorSpawning => "actor is still spawning",
            Self::ActorNoStore => "actor has no store",
            Self::TargetNotFound => "target not found",
            Self::TargetSameAsActor => "target is the actor",
            Self::TargetSpawning => "target is still spawning",
            Self::TargetNoHits => "target has no hit points",
            Self::TargetNoStore => "target has no store",
            Self::InsufficientEnergy => "insufficient energy",
            Self::InsufficientResource => "insufficient resource",
            Self::TargetCapacityFull => "target store is full",
            Self::ActorCapacityFull => "actor store is full",
            Self::ControllerNotOwned => "room controller not owned by actor",
            Self::ControllerNotReservedByActor => "room reserved by another user",
            Self::NotOwnedOrReserved => "structure not owned or reserved",
            Self::SafeModeActive => "safe mode blocks hostile actions",
            Self::RampartBlocking => "rampart blocks access",
            Self::HostileRoom => "room is hostile to this user",
        };
        f.write_str(msg)
    }
}

impl Error for ValidationError {}

/// An unexpected internal failure inside one processor step.
///
/// Distinct from [`ValidationError`]: a fault aborts the room's tick
/// (the mutation batch is discarded), a validation error only drops the
/// offending intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepFault {
    /// The step's invariants were violated by the data it read.
    ExecutionFailed {
        /// Human-readable description.
        reason: String,
    },
    /// A store arithmetic result would go negative or exceed capacity.
    StoreViolation {
        /// Which object's store.
        object: String,
        /// Description of the violation.
        reason: String,
    },
}

impl fmt::Display for StepFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::StoreViolation { object, reason } => {
                write!(f, "store violation on {object}: {reason}")
            }
        }
    }
}

impl Error for StepFault {}

/// Why a room (or global) tick did not complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// A processor step faulted; the batch was abandoned.
    StepFailed {
        /// Name of the failing step.
        name: String,
        /// The underlying fault.
        reason: StepFault,
    },
    /// Cancellation was requested between steps.
    Cancelled,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepFailed { name, reason } => write!(f, "step '{name}' failed: {reason}"),
            Self::Cancelled => write!(f, "tick cancelled"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StepFailed { reason, .. } => Some(reason),
            Self::Cancelled => None,
        }
    }
}

/// A failure reported by the storage collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store is unreachable or refused the operation.
    Unavailable {
        /// Description from the driver.
        reason: String,
    },
    /// Stored data failed to decode into the snapshot model.
    Corrupt {
        /// Description of the decode failure.
        reason: String,
    },
    /// A required document is absent.
    Missing {
        /// What was being loaded.
        what: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "storage unavailable: {reason}"),
            Self::Corrupt { reason } => write!(f, "stored data corrupt: {reason}"),
            Self::Missing { what } => write!(f, "missing stored data: {what}"),
        }
    }
}

impl Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_exposes_source() {
        let err = StepError::StepFailed {
            name: "harvest".into(),
            reason: StepFault::ExecutionFailed {
                reason: "boom".into(),
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("harvest"));
    }

    #[test]
    fn validation_errors_are_copy_and_displayable() {
        let e = ValidationError::NotInRange;
        let f = e; // Copy
        assert_eq!(e, f);
        assert_eq!(f.to_string(), "target not in range");
    }
}

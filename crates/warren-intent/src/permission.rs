//! Permission validation: room status, controller ownership and
//! reservation, safe mode, and rampart blocking. Runs last.

use crate::meta::{IntentSpec, OwnerRule};
use crate::validator::{IntentValidator, PendingIntent, ValidationContext};
use warren_core::ValidationError;
use warren_model::{RoomStatus, RoomSnapshot};

/// Checks ownership and hostility rules.
pub struct PermissionValidator;

fn safe_mode_blocks(
    ctx: &ValidationContext<'_>,
    intent: &PendingIntent,
) -> bool {
    let snapshot: &RoomSnapshot = ctx.snapshot;
    let Some(controller) = snapshot.controller() else {
        return false;
    };
    let Some(state) = &controller.controller else {
        return false;
    };
    let active = state
        .safe_mode_until
        .map(|until| until > snapshot.game_time)
        .unwrap_or(false);
    if !active {
        return false;
    }
    if controller.user.is_some() && controller.user == intent.user {
        return false; // the owner's own hostile acts are not blocked
    }
    // A hostile act against the actor's own object (e.g. dismantling
    // one's own structure in a foreign safe-mode room) stays legal.
    if let Some(target) = intent
        .argument
        .target_id()
        .and_then(|id| snapshot.object(&id))
    {
        if target.user.is_some() && target.user == intent.user {
            return false;
        }
    }
    true
}

fn rampart_blocks(ctx: &ValidationContext<'_>, intent: &PendingIntent) -> bool {
    let Some(target_id) = intent.argument.target_id() else {
        return false;
    };
    let Some(target) = ctx.snapshot.object(&target_id) else {
        return false;
    };
    let Some(rampart) = ctx.snapshot.rampart_at(target.pos) else {
        return false;
    };
    if rampart.id == target.id {
        return false; // the rampart itself is fair game
    }
    if rampart.is_public == Some(true) {
        return false;
    }
    rampart.user.is_some() && rampart.user != intent.user
}

impl IntentValidator for PermissionValidator {
    fn name(&self) -> &'static str {
        "permission"
    }

    fn check(
        &self,
        ctx: &ValidationContext<'_>,
        spec: &IntentSpec,
        intent: &PendingIntent,
    ) -> Result<(), ValidationError> {
        if let Some(info) = &ctx.snapshot.info {
            if info.status == RoomStatus::Closed {
                return Err(ValidationError::HostileRoom);
            }
        }

        match spec.owner {
            OwnerRule::None => {}
            OwnerRule::ControllerOwned => {
                let owned = ctx
                    .snapshot
                    .controller()
                    .map(|c| c.user.is_some() && c.user == intent.user)
                    .unwrap_or(false);
                if !owned {
                    return Err(ValidationError::ControllerNotOwned);
                }
            }
            OwnerRule::OwnedOrReserved => {
                if let Some(controller) = ctx.snapshot.controller() {
                    if controller.user.is_some() && controller.user != intent.user {
                        return Err(ValidationError::NotOwnedOrReserved);
                    }
                    if let Some(state) = &controller.controller {
                        if let Some(reservation) = &state.reservation {
                            if Some(&reservation.user) != intent.user.as_ref() {
                                return Err(ValidationError::ControllerNotReservedByActor);
                            }
                        }
                    }
                }
            }
        }

        if spec.hostile {
            if safe_mode_blocks(ctx, intent) {
                return Err(ValidationError::SafeModeActive);
            }
            if rampart_blocks(ctx, intent) {
                return Err(ValidationError::RampartBlocking);
            }
        }
        Ok(())
    }
}

//! Controller downgrade and reservation decay.

use crate::context::StepContext;
use crate::step::RoomStep;
use warren_core::{GameTime, StepFault, CONTROLLER_DOWNGRADE};
use warren_model::ControllerState;
use warren_mutation::ObjectPatch;

/// Downgrades neglected controllers and expires reservations.
pub struct ControllerDowngradeStep;

impl RoomStep for ControllerDowngradeStep {
    fn name(&self) -> &'static str {
        "controllerDowngrade"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        let Some(controller) = ctx.snapshot.controller() else {
            return Ok(());
        };
        let Some(state) = &controller.controller else {
            return Ok(());
        };
        let mut state = state.clone();
        let mut owner = controller.user.clone();
        let mut dirty = false;

        if owner.is_some() && state.downgrade_time.is_some_and(|t| t <= now) {
            if state.level <= 1 {
                owner = None;
                state = ControllerState::default();
            } else {
                state.level -= 1;
                state.progress = 0;
                state.safe_mode_until = None;
                state.downgrade_time = Some(GameTime(
                    now.0 + CONTROLLER_DOWNGRADE[state.level as usize] / 2,
                ));
            }
            dirty = true;
        }

        if state
            .reservation
            .as_ref()
            .is_some_and(|r| r.ends_at <= now)
        {
            state.reservation = None;
            dirty = true;
        }

        if dirty {
            ctx.writer.patch(
                controller.id.clone(),
                ObjectPatch {
                    user: Some(owner),
                    controller: Some(state),
                    ..Default::default()
                },
            );
        }
        Ok(())
    }
}

//! Inter-room creep transfers.

use crate::step::{GlobalContext, GlobalStep};
use warren_core::StepFault;

/// Moves creeps across room borders when the crossing is legal.
pub struct InterRoomTransferStep;

impl GlobalStep for InterRoomTransferStep {
    fn name(&self) -> &'static str {
        "interRoomTransfer"
    }

    fn run(&self, ctx: &mut GlobalContext<'_>) -> Result<(), StepFault> {
        for moving in &ctx.snapshot.moving_creeps {
            if !ctx.snapshot.exits.crossing_legal(&moving.from, &moving.to) {
                continue;
            }
            if !ctx.snapshot.accessible_rooms.contains_key(&moving.to) {
                continue;
            }
            let mut arrived = moving.object.clone();
            arrived.room = moving.to.clone();
            arrived.pos = moving.entry;
            ctx.writer.remove_object(moving.object.id.clone());
            ctx.writer.upsert_object(moving.to.clone(), arrived);
            ctx.writer.mark_room_active(moving.from.clone());
            ctx.writer.mark_room_active(moving.to.clone());
        }
        Ok(())
    }
}

//! The room step trait.

use crate::context::StepContext;
use warren_core::StepFault;

/// One stage of the room processor.
///
/// Steps run strictly sequentially in the pipeline's fixed order. A
/// step reads the frozen snapshot, the validated intents, and the tick
/// ledger; it writes mutations, stats, events, and ledger entries. A
/// returned fault abandons the room's whole batch for the tick.
pub trait RoomStep: Send + Sync {
    /// Stable step name, used in the order contract and fault reports.
    fn name(&self) -> &'static str;

    /// Execute the step for one room tick.
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault>;
}

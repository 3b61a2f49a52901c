//! The global step seam.

use warren_core::{GameTime, StepFault};
use warren_model::GlobalSnapshot;
use warren_mutation::{GlobalWriter, StatsSink};

/// Shared state handed to each global step.
pub struct GlobalContext<'a> {
    /// The frozen cross-room view.
    pub snapshot: &'a GlobalSnapshot,
    /// The tick's mutation collector.
    pub writer: &'a mut GlobalWriter,
    /// Per-user statistics sink.
    pub stats: &'a mut StatsSink,
}

impl GlobalContext<'_> {
    /// The tick being processed.
    pub fn now(&self) -> GameTime {
        self.snapshot.game_time
    }
}

/// One stage of the global pipeline. Steps must derive every write from
/// the snapshot so a retried tick lands on the same state.
pub trait GlobalStep: Send + Sync {
    /// Stable step name, used in the order contract and logs.
    fn name(&self) -> &'static str;

    /// Run the step against the frozen snapshot.
    fn run(&self, ctx: &mut GlobalContext<'_>) -> Result<(), StepFault>;
}

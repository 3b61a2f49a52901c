//! The room processor: validation, the fixed step pipeline, and batch
//! assembly for one room tick.

use warren_core::{StepError, StepFault};
use warren_intent::ValidatorPipeline;
use warren_model::RoomSnapshot;
use warren_mutation::{MutationBatch, RoomWriter, StatRecord, StatsSink};
use warren_steps::{standard_steps, RoomStep, StepContext, TickLedger};

use crate::cancel::CancelToken;

/// The finished product of one room tick.
#[derive(Debug)]
pub struct RoomTickReport {
    /// The room's complete mutation batch, ready to commit.
    pub batch: MutationBatch,
    /// Per-user stat increments accumulated across steps.
    pub stats: Vec<StatRecord>,
    /// Intents that passed validation.
    pub accepted: usize,
    /// Intents dropped by a validation stage.
    pub rejected: usize,
    /// Intent records whose name has no metadata row.
    pub unknown_dropped: u32,
}

/// Runs one room through validation and the fixed step pipeline.
///
/// Steps are strictly sequential; the cancel token is checked between
/// them. Any step fault abandons the whole batch — the writer is
/// dropped unflushed and the room retries next tick.
pub struct RoomProcessor {
    validators: ValidatorPipeline,
    steps: Vec<Box<dyn RoomStep>>,
}

impl RoomProcessor {
    /// The standard processor: the full validator pipeline and the
    /// fixed step order.
    pub fn standard() -> Self {
        Self::with_steps(standard_steps())
    }

    /// A processor with the standard validators and a custom step list.
    pub fn with_steps(steps: Vec<Box<dyn RoomStep>>) -> Self {
        Self {
            validators: ValidatorPipeline::standard(),
            steps,
        }
    }

    /// Process one room tick against a frozen snapshot.
    pub fn process(
        &self,
        snapshot: &RoomSnapshot,
        cancel: &CancelToken,
    ) -> Result<RoomTickReport, StepError> {
        let outcome = self.validators.validate_room(snapshot);
        let accepted = outcome.accepted.len();
        let rejected = outcome.rejections.len();
        let unknown_dropped = outcome.unknown_dropped;

        let mut writer = RoomWriter::new(snapshot.room.clone());
        let mut stats = StatsSink::new();
        let mut ledger = TickLedger::new();
        let mut events = Vec::new();

        for step in &self.steps {
            if cancel.is_cancelled() {
                return Err(StepError::Cancelled);
            }
            let mut ctx = StepContext {
                snapshot,
                intents: &outcome,
                writer: &mut writer,
                stats: &mut stats,
                ledger: &mut ledger,
                events: &mut events,
            };
            step.run(&mut ctx).map_err(|reason| StepError::StepFailed {
                name: step.name().to_string(),
                reason,
            })?;
        }

        // The processor is the sole event-log writer; steps only append
        // to the shared vec.
        if !events.is_empty() {
            writer
                .set_event_log(events)
                .map_err(|e| StepError::StepFailed {
                    name: "eventLog".to_string(),
                    reason: StepFault::ExecutionFailed {
                        reason: e.to_string(),
                    },
                })?;
        }

        Ok(RoomTickReport {
            batch: writer.into_batch(),
            stats: stats.drain(),
            accepted,
            rejected,
            unknown_dropped,
        })
    }
}

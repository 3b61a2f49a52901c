//! The global processor: the serialized cross-room pass.

use warren_core::StepError;
use warren_global::{standard_global_steps, GlobalContext, GlobalStep};
use warren_model::GlobalSnapshot;
use warren_mutation::{GlobalBatch, GlobalWriter, StatRecord, StatsSink};

use crate::cancel::CancelToken;

/// The finished product of one global pass.
#[derive(Debug)]
pub struct GlobalTickReport {
    /// The complete global batch, ready to commit.
    pub batch: GlobalBatch,
    /// Per-user stat increments accumulated across steps.
    pub stats: Vec<StatRecord>,
}

/// Runs the cross-room steps in their fixed order, serialized per
/// shard. Every global write is absolute, so a retried pass produces
/// the same batch from the same snapshot.
pub struct GlobalProcessor {
    steps: Vec<Box<dyn GlobalStep>>,
}

impl GlobalProcessor {
    /// The standard global pipeline.
    pub fn standard() -> Self {
        Self {
            steps: standard_global_steps(),
        }
    }

    /// Process one global pass against a frozen snapshot.
    pub fn process(
        &self,
        snapshot: &GlobalSnapshot,
        cancel: &CancelToken,
    ) -> Result<GlobalTickReport, StepError> {
        let mut writer = GlobalWriter::new();
        let mut stats = StatsSink::new();
        for step in &self.steps {
            if cancel.is_cancelled() {
                return Err(StepError::Cancelled);
            }
            let mut ctx = GlobalContext {
                snapshot,
                writer: &mut writer,
                stats: &mut stats,
            };
            step.run(&mut ctx).map_err(|reason| StepError::StepFailed {
                name: step.name().to_string(),
                reason,
            })?;
        }
        Ok(GlobalTickReport {
            batch: writer.into_batch(),
            stats: stats.drain(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_core::GameTime;

    #[test]
    fn empty_snapshot_yields_an_empty_batch() {
        let report = GlobalProcessor::standard()
            .process(&GlobalSnapshot::empty(GameTime(5)), &CancelToken::new())
            .unwrap();
        assert!(report.batch.is_empty());
        assert!(report.stats.is_empty());
    }

    #[test]
    fn cancelled_token_aborts_the_pass() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = GlobalProcessor::standard()
            .process(&GlobalSnapshot::empty(GameTime(5)), &cancel)
            .unwrap_err();
        assert_eq!(err, StepError::Cancelled);
    }
}

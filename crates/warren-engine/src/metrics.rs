//! Per-tick engine metrics.

/// Counters for one `run_tick` call.
///
/// Plain data; the caller decides what to export where.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Rooms whose batch was committed.
    pub rooms_processed: u64,
    /// Rooms abandoned this tick (step fault, load or commit failure).
    /// They retry next tick from a fresh snapshot.
    pub rooms_failed: u64,
    /// Rooms abandoned because cancellation was requested.
    pub rooms_cancelled: u64,
    /// Intents that passed all validation stages.
    pub intents_accepted: u64,
    /// Intents dropped by a validation stage.
    pub intents_rejected: u64,
    /// Intent records whose name has no metadata row.
    pub intents_unknown: u64,
    /// Mutation operations across all committed room batches.
    pub ops_committed: u64,
    /// Snapshot cache hits.
    pub cache_hits: u64,
    /// Snapshot cache misses (storage loads).
    pub cache_misses: u64,
}

impl TickMetrics {
    /// Fold another set of counters into this one.
    pub fn absorb(&mut self, other: &TickMetrics) {
        self.rooms_processed += other.rooms_processed;
        self.rooms_failed += other.rooms_failed;
        self.rooms_cancelled += other.rooms_cancelled;
        self.intents_accepted += other.intents_accepted;
        self.intents_rejected += other.intents_rejected;
        self.intents_unknown += other.intents_unknown;
        self.ops_committed += other.ops_committed;
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
    }
}

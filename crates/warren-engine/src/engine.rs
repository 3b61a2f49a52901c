//! Tick orchestration: the room worker pool and the global pass.

use crossbeam_channel::{bounded, unbounded};
use warren_core::{GameTime, RoomName, StepError};

use crate::cache::SnapshotCache;
use crate::cancel::CancelToken;
use crate::config::{ConfigError, EngineConfig};
use crate::global_proc::GlobalProcessor;
use crate::metrics::TickMetrics;
use crate::room::RoomProcessor;
use crate::store::{GlobalStore, RoomStore};

/// One room that did not commit this tick, with the reason. The room
/// retries next tick from a fresh snapshot.
#[derive(Clone, Debug)]
pub struct RoomFailure {
    /// The failing room.
    pub room: RoomName,
    /// What went wrong (step fault, load or commit failure).
    pub reason: String,
}

/// Everything `run_tick` has to say about one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Aggregated counters across all rooms and the global pass.
    pub metrics: TickMetrics,
    /// Rooms abandoned this tick.
    pub room_failures: Vec<RoomFailure>,
    /// Why the global pass was abandoned, if it was. Room commits are
    /// unaffected; the global pass retries next tick.
    pub global_failure: Option<String>,
}

struct RoomOutcome {
    metrics: TickMetrics,
    failure: Option<RoomFailure>,
}

/// Drives one shard: rooms in parallel over a worker pool, then the
/// serialized global pass.
///
/// Rooms are embarrassingly parallel — no two workers ever touch the
/// same room in one tick, and each room's batch commits independently.
/// A failed room never blocks its neighbours.
pub struct Engine<R, G> {
    config: EngineConfig,
    rooms: R,
    globals: G,
    cache: SnapshotCache,
    processor: RoomProcessor,
    global_processor: GlobalProcessor,
}

impl<R: RoomStore, G: GlobalStore> Engine<R, G> {
    /// Build an engine over the given stores, validating the config.
    pub fn new(config: EngineConfig, rooms: R, globals: G) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rooms,
            globals,
            cache: SnapshotCache::new(),
            processor: RoomProcessor::standard(),
            global_processor: GlobalProcessor::standard(),
        })
    }

    /// Evict a room's cached snapshot, forcing a fresh load next tick.
    pub fn invalidate_room(&self, room: &RoomName) {
        self.cache.invalidate(room);
    }

    /// The room storage collaborator.
    pub fn room_store(&self) -> &R {
        &self.rooms
    }

    /// The global storage collaborator.
    pub fn global_store(&self) -> &G {
        &self.globals
    }

    /// Process one tick: every room in `rooms`, then the global pass.
    ///
    /// Per-room failures are recorded in the report rather than
    /// propagated; the only contract is that a room either commits its
    /// whole batch or commits nothing.
    pub fn run_tick(&self, tick: GameTime, rooms: &[RoomName], cancel: &CancelToken) -> TickReport {
        let mut report = TickReport::default();
        let workers = self.config.resolved_worker_count().min(rooms.len().max(1));

        std::thread::scope(|scope| {
            let (job_tx, job_rx) = bounded::<RoomName>(self.config.room_queue_capacity);
            let (outcome_tx, outcome_rx) = unbounded::<RoomOutcome>();

            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let outcome_tx = outcome_tx.clone();
                let cancel = cancel.clone();
                scope.spawn(move || {
                    while let Ok(room) = job_rx.recv() {
                        let outcome = self.process_room(&room, tick, &cancel);
                        if outcome_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(outcome_tx);

            for room in rooms {
                if job_tx.send(room.clone()).is_err() {
                    break;
                }
            }
            drop(job_tx);

            for outcome in outcome_rx {
                report.metrics.absorb(&outcome.metrics);
                if let Some(failure) = outcome.failure {
                    report.room_failures.push(failure);
                }
            }
        });

        if !cancel.is_cancelled() {
            self.run_global(tick, cancel, &mut report);
        }
        report
    }

    fn run_global(&self, tick: GameTime, cancel: &CancelToken, report: &mut TickReport) {
        let snapshot = match self.globals.load_global(tick) {
            Ok(s) => s,
            Err(e) => {
                report.global_failure = Some(e.to_string());
                return;
            }
        };
        match self.global_processor.process(&snapshot, cancel) {
            Ok(pass) => {
                if let Err(e) = self.globals.commit_global(pass.batch, pass.stats) {
                    report.global_failure = Some(e.to_string());
                }
            }
            Err(StepError::Cancelled) => {}
            Err(e) => report.global_failure = Some(e.to_string()),
        }
    }

    fn process_room(&self, room: &RoomName, tick: GameTime, cancel: &CancelToken) -> RoomOutcome {
        let mut metrics = TickMetrics::default();
        let failed = |metrics: &mut TickMetrics, reason: String| {
            metrics.rooms_failed += 1;
            RoomOutcome {
                metrics: metrics.clone(),
                failure: Some(RoomFailure {
                    room: room.clone(),
                    reason,
                }),
            }
        };

        let snapshot = if self.config.use_snapshot_cache {
            match self.cache.get(room, tick) {
                Some(s) => {
                    metrics.cache_hits += 1;
                    s
                }
                None => {
                    metrics.cache_misses += 1;
                    match self.rooms.load_room(room, tick) {
                        Ok(s) => self.cache.insert(s),
                        Err(e) => return failed(&mut metrics, e.to_string()),
                    }
                }
            }
        } else {
            metrics.cache_misses += 1;
            match self.rooms.load_room(room, tick) {
                Ok(s) => std::sync::Arc::new(s),
                Err(e) => return failed(&mut metrics, e.to_string()),
            }
        };

        match self.processor.process(&snapshot, cancel) {
            Ok(tick_report) => {
                metrics.intents_accepted += tick_report.accepted as u64;
                metrics.intents_rejected += tick_report.rejected as u64;
                metrics.intents_unknown += u64::from(tick_report.unknown_dropped);
                let ops = tick_report.batch.len() as u64;
                match self.rooms.commit_room(tick_report.batch, tick_report.stats) {
                    Ok(()) => {
                        metrics.rooms_processed += 1;
                        metrics.ops_committed += ops;
                        // Committed state supersedes the snapshot.
                        self.cache.invalidate(room);
                        RoomOutcome {
                            metrics,
                            failure: None,
                        }
                    }
                    Err(e) => failed(&mut metrics, e.to_string()),
                }
            }
            Err(StepError::Cancelled) => {
                metrics.rooms_cancelled += 1;
                RoomOutcome {
                    metrics,
                    failure: None,
                }
            }
            Err(e) => failed(&mut metrics, e.to_string()),
        }
    }
}

//! Engine configuration, validation, and error types.

use std::error::Error;
use std::fmt;

// ── EngineConfig ───────────────────────────────────────────────────

/// Configuration for [`Engine`](crate::Engine).
///
/// Controls the room worker pool size, the job queue depth, and
/// whether loaded room snapshots are memoized across retries.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of room worker threads. `None` = auto-detect
    /// (`available_parallelism / 2`, clamped to `[2, 16]`).
    pub worker_count: Option<usize>,
    /// Maximum rooms buffered in the job queue. Default: 256.
    pub room_queue_capacity: usize,
    /// Whether to memoize loaded room snapshots per `(room, tick)`.
    /// Default: true.
    pub use_snapshot_cache: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            room_queue_capacity: 256,
            use_snapshot_cache: true,
        }
    }
}

impl EngineConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`. Zero workers would
    /// create an unusable engine (no threads to drain the room queue).
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / 2).clamp(2, 16)
            }
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_queue_capacity == 0 {
            return Err(ConfigError::QueueCapacityZero);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Room queue capacity is zero.
    QueueCapacityZero,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueCapacityZero => write!(f, "room_queue_capacity must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_queue_capacity_fails() {
        let cfg = EngineConfig {
            room_queue_capacity: 0,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::QueueCapacityZero));
    }

    #[test]
    fn resolved_worker_count_clamps_zero() {
        let cfg = EngineConfig {
            worker_count: Some(0),
            ..EngineConfig::default()
        };
        assert_eq!(cfg.resolved_worker_count(), 1);
    }

    #[test]
    fn resolved_worker_count_clamps_large() {
        let cfg = EngineConfig {
            worker_count: Some(200),
            ..EngineConfig::default()
        };
        assert_eq!(cfg.resolved_worker_count(), 64);
    }

    #[test]
    fn resolved_worker_count_auto() {
        let count = EngineConfig::default().resolved_worker_count();
        assert!((2..=16).contains(&count), "auto count {count} out of [2,16]");
    }
}

//! Tick orchestration for the Warren engine.
//!
//! One tick runs every active room through the fixed step pipeline in
//! parallel over a worker pool, commits each room's batch atomically,
//! and then runs the serialized cross-room pass. A room that faults
//! commits nothing and retries next tick from a fresh snapshot.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod cache;
mod cancel;
mod config;
mod engine;
mod global_proc;
mod metrics;
mod room;
mod store;

pub use cache::SnapshotCache;
pub use cancel::CancelToken;
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, RoomFailure, TickReport};
pub use global_proc::{GlobalProcessor, GlobalTickReport};
pub use metrics::TickMetrics;
pub use room::{RoomProcessor, RoomTickReport};
pub use store::{GlobalStore, RoomStore};

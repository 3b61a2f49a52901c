//! Mutation batching for the Warren tick engine.
//!
//! Room steps and global steps never write to storage directly. They
//! record intentions into a writer, the processor flushes the resulting
//! batch atomically after the last step, and dropping an unflushed
//! writer is the rollback path. This crate holds the batch and patch
//! value types, the room and global writers, and the stats side channel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod global;
pub mod patch;
pub mod stats;
pub mod writer;

pub use batch::{EventKind, MapView, MapViewEntry, MutationBatch, RoomEvent, RoomInfoPatch};
pub use global::{GlobalBatch, GlobalWriter, OrderPatch, TransactionLogEntry, UserPatch};
pub use patch::ObjectPatch;
pub use stats::{StatKind, StatRecord, StatsSink};
pub use writer::{RoomWriter, SidePayloadAlreadySet};

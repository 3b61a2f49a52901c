//! Warren: a server-side deterministic tick engine for a persistent
//! multiplayer strategy game.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Warren sub-crates. For most users, adding `warren` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use warren::prelude::*;
//! use warren::model::{ObjectKind, RoomObjectSnapshot, RoomSnapshot};
//!
//! // A room at tick 100 holding one creep whose lifetime expired.
//! let mut snapshot = RoomSnapshot::empty(RoomName::from("W1N1"), GameTime(100));
//! let mut creep = RoomObjectSnapshot::new(
//!     ObjectId::from("c1"),
//!     ObjectKind::Creep,
//!     snapshot.room.clone(),
//!     RoomPosition::new(10, 10).unwrap(),
//! );
//! creep.user = Some(UserId::from("u1"));
//! creep.hits = Some(100);
//! creep.hits_max = Some(100);
//! creep.age_time = Some(GameTime(90));
//! snapshot.objects.insert(creep.id.clone(), creep);
//!
//! // One room tick: validation, the fixed step pipeline, one batch.
//! let processor = RoomProcessor::standard();
//! let report = processor.process(&snapshot, &CancelToken::new()).unwrap();
//! assert!(report.batch.removals.contains(&ObjectId::from("c1")));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `warren-core` | IDs, positions, intents, constants, error types |
//! | [`model`] | `warren-model` | Snapshot types: rooms, objects, stores, users |
//! | [`mutation`] | `warren-mutation` | Batches, patches, writers, the stats sink |
//! | [`intent`] | `warren-intent` | The five-stage intent validation pipeline |
//! | [`steps`] | `warren-steps` | The fixed room step pipeline |
//! | [`global`] | `warren-global` | Cross-room steps: market, power creeps, transfers |
//! | [`engine`] | `warren-engine` | Tick orchestration, worker pool, storage seam |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// IDs, positions, intents, constants, and error types (`warren-core`).
pub use warren_core as types;

/// Snapshot types: rooms, objects, stores, users (`warren-model`).
///
/// Snapshots are immutable; processing emits patches and upserts
/// describing the next tick's values.
pub use warren_model as model;

/// Mutation batching (`warren-mutation`).
///
/// Steps record intentions into a [`mutation::RoomWriter`] or
/// [`mutation::GlobalWriter`]; the batch commits atomically or not at
/// all.
pub use warren_mutation as mutation;

/// The five-stage intent validation pipeline (`warren-intent`).
///
/// [`intent::ValidatorPipeline::standard`] runs schema, range, state,
/// resource, and permission checks; rejected intents are dropped
/// without affecting the rest of the tick.
pub use warren_intent as intent;

/// The fixed room step pipeline (`warren-steps`).
///
/// [`steps::standard_steps`] yields the steps in their contractual
/// order, movement first, spawn completion last.
pub use warren_steps as steps;

/// Cross-room processing (`warren-global`).
///
/// The market, power-creep accounts, and inter-room creep transfers,
/// run serialized after the room passes.
pub use warren_global as global;

/// Tick orchestration (`warren-engine`).
///
/// [`engine::Engine`] drives rooms in parallel over a worker pool
/// against the [`engine::RoomStore`] / [`engine::GlobalStore`] storage
/// seam.
pub use warren_engine as engine;

/// Common imports for typical Warren usage.
///
/// ```rust
/// use warren::prelude::*;
/// ```
pub mod prelude {
    pub use warren_core::{
        BodyPartKind, GameTime, ObjectId, ResourceKind, RoomName, RoomPosition, StepError,
        StepFault, StorageError, UserId, ValidationError,
    };
    pub use warren_engine::{
        CancelToken, Engine, EngineConfig, GlobalProcessor, GlobalStore, RoomProcessor, RoomStore,
        TickMetrics, TickReport,
    };
    pub use warren_global::GlobalStep;
    pub use warren_intent::ValidatorPipeline;
    pub use warren_model::{RoomSnapshot, Store};
    pub use warren_mutation::{MutationBatch, RoomWriter, StatsSink};
    pub use warren_steps::{standard_steps, RoomStep, StepContext};
}

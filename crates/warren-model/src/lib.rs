//! Immutable snapshot value types for the Warren tick engine.
//!
//! A snapshot is a frozen view of one room (or the cross-room world) at
//! one tick. Processor steps read snapshots and emit mutations; nothing
//! here has behavior beyond lookups and capacity-checked store
//! arithmetic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod global;
pub mod object;
pub mod room;
pub mod store;
pub mod user;

pub use global::{
    ExitTopology, GlobalSnapshot, GlobalUserIntents, MarketOrder, MarketSnapshot, MovingCreep,
    OrderKind, PendingSend,
};
pub use object::{
    ConstructionState, ControllerState, Effect, MineralState, NukeState, ObjectKind,
    PowerCreepState, PowerKind, PowerLevel, Reservation, RoomObjectSnapshot, Sign, SourceState,
    SpawnJob,
};
pub use room::{Flag, RoomInfo, RoomSnapshot, RoomStatus};
pub use store::{Store, StoreArithmeticError, StoreCapacity};
pub use user::UserState;

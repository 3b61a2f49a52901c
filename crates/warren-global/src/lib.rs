//! Global (cross-room) processing: the market, power-creep accounts,
//! and inter-room creep transfers.
//!
//! The global pass runs serialized per shard after the room passes.
//! Every write is absolute and state-derived, so a retried tick
//! produces the same batch from the same snapshot.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod market;
mod pipeline;
mod power_creep;
mod step;
mod transfer;

pub use market::{transfer_energy_cost, MarketStep};
pub use pipeline::{standard_global_steps, GLOBAL_STEP_ORDER};
pub use power_creep::PowerCreepStep;
pub use step::{GlobalContext, GlobalStep};
pub use transfer::InterRoomTransferStep;

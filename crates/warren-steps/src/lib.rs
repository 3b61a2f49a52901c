//! Room-processor steps: the per-room tick semantics.
//!
//! Each step reads the frozen [`warren_model::RoomSnapshot`] plus the
//! validated intents, and writes through a
//! [`warren_mutation::RoomWriter`]. Steps never observe each other's
//! same-tick writes; the [`TickLedger`] carries the few quantities the
//! ordering contract requires (claimed energy, hit deltas, post-move
//! positions).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod combat;
mod construction;
mod context;
mod controller;
mod damage;
mod decay;
mod downgrade;
mod factory;
mod harvest;
mod keeper;
mod lab;
mod lifecycle;
mod link;
mod movement;
mod nuke_landing;
mod nuker;
mod pipeline;
mod power_ability;
mod power_spawn;
mod regen;
mod spawn;
mod spawning;
mod step;
#[cfg(test)]
mod testkit;
mod tower;
mod transfer;

pub use combat::CombatStep;
pub use construction::ConstructionStep;
pub use context::{StepContext, StoreScratch, TickLedger};
pub use controller::ControllerStep;
pub use decay::StructureDecayStep;
pub use downgrade::ControllerDowngradeStep;
pub use factory::{factory_recipe, FactoryRecipe, FactoryStep, FACTORY_RECIPES};
pub use harvest::HarvestStep;
pub use keeper::KeeperLairStep;
pub use lab::{boosted_part, reaction_product, LabStep, REACTIONS};
pub use lifecycle::CreepLifecycleStep;
pub use link::LinkStep;
pub use movement::MovementStep;
pub use nuke_landing::NukeLandingStep;
pub use nuker::NukerStep;
pub use pipeline::{standard_steps, ROOM_STEP_ORDER};
pub use power_ability::{EffectDecayStep, PowerAbilityStep, PowerCooldownStep};
pub use power_spawn::PowerSpawnStep;
pub use regen::{mineral_regen_amount, RegenerationStep};
pub use spawn::SpawnStep;
pub use spawning::SpawnSpawningStep;
pub use step::RoomStep;
pub use tower::{tower_power, TowerStep};
pub use transfer::TransferStep;

//! The fixed room-step pipeline.
//!
//! Step order is a correctness contract: movement resolves before
//! combat reads positions, combat resolves before lifecycle reads
//! deaths, intake steps run before the passive bookkeeping steps.

use crate::step::RoomStep;
use crate::{
    combat::CombatStep,
    construction::ConstructionStep,
    controller::ControllerStep,
    decay::StructureDecayStep,
    downgrade::ControllerDowngradeStep,
    factory::FactoryStep,
    harvest::HarvestStep,
    keeper::KeeperLairStep,
    lab::LabStep,
    lifecycle::CreepLifecycleStep,
    link::LinkStep,
    movement::MovementStep,
    nuke_landing::NukeLandingStep,
    nuker::NukerStep,
    power_ability::{EffectDecayStep, PowerAbilityStep, PowerCooldownStep},
    power_spawn::PowerSpawnStep,
    regen::RegenerationStep,
    spawn::SpawnStep,
    spawning::SpawnSpawningStep,
    tower::TowerStep,
    transfer::TransferStep,
};

/// Names of the room steps, in execution order.
pub const ROOM_STEP_ORDER: &[&str] = &[
    "movement",
    "combat",
    "construction",
    "harvest",
    "transfer",
    "controller",
    "lab",
    "link",
    "nuker",
    "powerSpawn",
    "spawn",
    "tower",
    "factory",
    "powerAbility",
    "powerAbilityCooldown",
    "powerEffectDecay",
    "keeperLair",
    "nukeLanding",
    "regeneration",
    "controllerDowngrade",
    "structureDecay",
    "creepLifecycle",
    "spawnSpawning",
];

/// The standard pipeline, in `ROOM_STEP_ORDER` order.
pub fn standard_steps() -> Vec<Box<dyn RoomStep>> {
    vec![
        Box::new(MovementStep),
        Box::new(CombatStep),
        Box::new(ConstructionStep),
        Box::new(HarvestStep),
        Box::new(TransferStep),
        Box::new(ControllerStep),
        Box::new(LabStep),
        Box::new(LinkStep),
        Box::new(NukerStep),
        Box::new(PowerSpawnStep),
        Box::new(SpawnStep),
        Box::new(TowerStep),
        Box::new(FactoryStep),
        Box::new(PowerAbilityStep),
        Box::new(PowerCooldownStep),
        Box::new(EffectDecayStep),
        Box::new(KeeperLairStep),
        Box::new(NukeLandingStep),
        Box::new(RegenerationStep),
        Box::new(ControllerDowngradeStep),
        Box::new(StructureDecayStep),
        Box::new(CreepLifecycleStep),
        Box::new(SpawnSpawningStep),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_matches_the_order_contract() {
        let names: Vec<&str> = standard_steps().iter().map(|s| s.name()).collect();
        assert_eq!(names, ROOM_STEP_ORDER);
    }

    #[test]
    fn step_names_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for name in ROOM_STEP_ORDER {
            assert!(seen.insert(*name), "duplicate step name {name}");
        }
    }
}

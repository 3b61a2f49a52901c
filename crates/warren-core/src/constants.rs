//! Game-balance constants consumed by the processor steps and validators.
//!
//! Values mirror the reference rules the engine must reproduce
//! bit-for-bit. Grouped by the step family that consumes them.

// ── Harvest ────────────────────────────────────────────────────────

/// Energy harvested per active work part per tick from a source.
pub const HARVEST_POWER: u32 = 2;
/// Mineral harvested per active work part per tick from a deposit.
pub const HARVEST_MINERAL_POWER: u32 = 1;
/// Default source energy capacity.
pub const SOURCE_ENERGY_CAPACITY: u32 = 3000;
/// Ticks until a drained source refills.
pub const ENERGY_REGEN_TIME: u64 = 300;
/// Ticks until an exhausted mineral deposit regenerates.
pub const MINERAL_REGEN_TIME: u64 = 50_000;
/// Extractor cooldown between mineral harvest ticks.
pub const EXTRACTOR_COOLDOWN: u64 = 5;

// ── Build / repair / dismantle ─────────────────────────────────────

/// Construction progress per active work part per tick.
pub const BUILD_POWER: u32 = 5;
/// Hits restored per active work part per tick when repairing.
pub const REPAIR_POWER: u32 = 100;
/// Energy cost per hit repaired, as a reciprocal (1 energy per 100 hits).
pub const REPAIR_COST_DIVISOR: u32 = 100;
/// Hits removed per active work part per tick when dismantling.
pub const DISMANTLE_POWER: u32 = 50;
/// Energy returned per hit dismantled, as a reciprocal (1 per 200 hits).
pub const DISMANTLE_COST_DIVISOR: u32 = 200;

// ── Combat ─────────────────────────────────────────────────────────

/// Damage per active attack part.
pub const ATTACK_POWER: u32 = 30;
/// Damage per active ranged-attack part at range ≤ 1.
pub const RANGED_ATTACK_POWER: u32 = 10;
/// Hits healed per active heal part at range 1.
pub const HEAL_POWER: u32 = 12;
/// Hits healed per active heal part at range 2–3.
pub const RANGED_HEAL_POWER: u32 = 4;

// ── Controller ─────────────────────────────────────────────────────

/// Controller progress per active work part per tick.
pub const UPGRADE_CONTROLLER_POWER: u32 = 1;
/// Progress required to finish each controller level (index = level).
pub const CONTROLLER_LEVELS: [u32; 8] = [
    0, 200, 45_000, 135_000, 405_000, 1_215_000, 3_645_000, 10_935_000,
];
/// Downgrade timer granted per level when upgraded (index = level).
pub const CONTROLLER_DOWNGRADE: [u64; 9] = [
    0, 20_000, 10_000, 20_000, 40_000, 80_000, 120_000, 150_000, 200_000,
];
/// Downgrade timer restored per upgrade tick.
pub const CONTROLLER_DOWNGRADE_RESTORE: u64 = 100;
/// Reservation ticks added per claim part per reserve tick.
pub const CONTROLLER_RESERVE: u64 = 1;
/// Maximum reservation duration.
pub const CONTROLLER_RESERVE_MAX: u64 = 5000;
/// Ghodium consumed to bank one safe-mode activation.
pub const SAFE_MODE_COST: u32 = 1000;
/// Ticks one safe-mode activation lasts.
pub const SAFE_MODE_DURATION: u64 = 20_000;

// ── Spawning / lifecycle ───────────────────────────────────────────

/// Ticks of spawn time per body part.
pub const CREEP_SPAWN_TIME: u64 = 3;
/// Lifetime of a creep without claim parts.
pub const CREEP_LIFE_TIME: u64 = 1500;
/// Lifetime of a creep with claim parts.
pub const CREEP_CLAIM_LIFE_TIME: u64 = 600;
/// Maximum parts in one body.
pub const MAX_CREEP_SIZE: usize = 50;
/// Energy capacity of a spawn's own store.
pub const SPAWN_ENERGY_CAPACITY: u32 = 300;
/// Energy capacity of an extension at controller levels 1–6.
pub const EXTENSION_ENERGY_CAPACITY: u32 = 50;

// ── Towers ─────────────────────────────────────────────────────────

/// Energy cost of one tower action.
pub const TOWER_ENERGY_COST: u32 = 10;
/// Tower attack damage at optimal range.
pub const TOWER_POWER_ATTACK: u32 = 600;
/// Tower heal amount at optimal range.
pub const TOWER_POWER_HEAL: u32 = 400;
/// Tower repair amount at optimal range.
pub const TOWER_POWER_REPAIR: u32 = 800;
/// Range at or below which a tower acts at full power.
pub const TOWER_OPTIMAL_RANGE: u32 = 5;
/// Range at or beyond which tower power bottoms out.
pub const TOWER_FALLOFF_RANGE: u32 = 20;
/// Fraction of power lost at `TOWER_FALLOFF_RANGE` (numerator over 100).
pub const TOWER_FALLOFF_PERCENT: u32 = 75;

// ── Links / labs / terminal / factory / power ──────────────────────

/// Fraction of energy lost per link transfer (numerator over 100).
pub const LINK_LOSS_PERCENT: u32 = 3;
/// Cooldown ticks per tile of distance for a link transfer.
pub const LINK_COOLDOWN_PER_RANGE: u64 = 1;
/// Minimum resource amount consumed from each input lab per reaction.
pub const LAB_REACTION_AMOUNT: u32 = 5;
/// Cooldown after one lab reaction.
pub const LAB_COOLDOWN: u64 = 10;
/// Energy consumed per boosted body part.
pub const LAB_BOOST_ENERGY: u32 = 20;
/// Mineral consumed per boosted body part.
pub const LAB_BOOST_MINERAL: u32 = 30;
/// Cooldown after a terminal send.
pub const TERMINAL_COOLDOWN: u64 = 10;
/// Shape parameter of the terminal send-cost curve.
pub const TERMINAL_SEND_COST_SCALE: f64 = 30.0;
/// Energy consumed per power processed in a power spawn.
pub const POWER_SPAWN_ENERGY_RATIO: u32 = 50;
/// Cooldown after one factory production run.
pub const FACTORY_COOLDOWN: u64 = 10;

// ── Nukes / keeper lairs ───────────────────────────────────────────

/// Ticks a nuke spends in flight.
pub const NUKE_LAND_TIME: u64 = 50_000;
/// Damage at the nuke's ground-zero tile.
pub const NUKE_DAMAGE_CENTER: u32 = 10_000_000;
/// Damage on the surrounding blast ring (range ≤ 2).
pub const NUKE_DAMAGE_RING: u32 = 5_000_000;
/// Blast radius (Chebyshev).
pub const NUKE_RANGE: u32 = 2;
/// Energy cost of loading a nuke.
pub const NUKER_ENERGY_COST: u32 = 300_000;
/// Ghodium cost of loading a nuke.
pub const NUKER_GHODIUM_COST: u32 = 5000;
/// Nuker cooldown after launch.
pub const NUKER_COOLDOWN: u64 = 100_000;
/// Ticks between keeper spawns at a lair.
pub const KEEPER_SPAWN_DELAY: u64 = 300;

// ── Decay ──────────────────────────────────────────────────────────

/// Hits a road loses per decay event.
pub const ROAD_DECAY_AMOUNT: u32 = 100;
/// Ticks between road decay events.
pub const ROAD_DECAY_TIME: u64 = 1000;
/// Hits a rampart loses per decay event.
pub const RAMPART_DECAY_AMOUNT: u32 = 300;
/// Ticks between rampart decay events.
pub const RAMPART_DECAY_TIME: u64 = 100;
/// Hits a container loses per decay event.
pub const CONTAINER_DECAY_AMOUNT: u32 = 5000;
/// Ticks between container decay events in an owned room.
pub const CONTAINER_DECAY_TIME_OWNED: u64 = 500;
/// Ticks between container decay events elsewhere.
pub const CONTAINER_DECAY_TIME: u64 = 100;
/// Fraction of a dropped resource lost per tick (reciprocal).
pub const ENERGY_DECAY_DIVISOR: u32 = 1000;

// ── Power creeps ───────────────────────────────────────────────────

/// Maximum power-creep level.
pub const POWER_CREEP_MAX_LEVEL: u32 = 25;
/// Lifetime granted when a power creep spawns.
pub const POWER_CREEP_LIFE_TIME: u64 = 5000;
/// Experimentation window granted when a power creep is deleted.
pub const POWER_EXPERIMENTATION_TIME: u64 = 24 * 3600;

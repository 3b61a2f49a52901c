//! One game object as seen in a room snapshot.

use crate::store::Store;
use indexmap::IndexMap;
use std::fmt;
use warren_core::{Body, GameTime, ObjectId, ResourceKind, RoomName, RoomPosition, UserId};

/// The closed set of object type tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A mobile unit.
    Creep,
    /// A levelled account-bound unit with powers.
    PowerCreep,
    /// Creep factory.
    Spawn,
    /// Spawn energy extension.
    Extension,
    /// Defensive/offensive turret.
    Tower,
    /// Natural energy source.
    Source,
    /// Natural mineral deposit.
    Mineral,
    /// A dropped resource pile.
    Resource,
    /// An unfinished structure.
    ConstructionSite,
    /// Room ownership structure.
    Controller,
    /// Cross-room resource sender.
    Terminal,
    /// Bulk storage.
    Storage,
    /// Public walkable store.
    Container,
    /// Walkable movement-cost reducer.
    Road,
    /// Defensive barrier, walkable by its owner.
    Rampart,
    /// Constructed wall.
    Wall,
    /// Mineral harvest enabler.
    Extractor,
    /// Compound reaction vessel.
    Lab,
    /// In-room energy teleporter.
    Link,
    /// Intercontinental missile silo.
    Nuker,
    /// Power refinery.
    PowerSpawn,
    /// Remote room viewer.
    Observer,
    /// Commodity production line.
    Factory,
    /// Source-keeper den.
    KeeperLair,
    /// An inbound nuke in flight.
    Nuke,
}

impl ObjectKind {
    /// The wire/document type tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creep => "creep",
            Self::PowerCreep => "powerCreep",
            Self::Spawn => "spawn",
            Self::Extension => "extension",
            Self::Tower => "tower",
            Self::Source => "source",
            Self::Mineral => "mineral",
            Self::Resource => "energy",
            Self::ConstructionSite => "constructionSite",
            Self::Controller => "controller",
            Self::Terminal => "terminal",
            Self::Storage => "storage",
            Self::Container => "container",
            Self::Road => "road",
            Self::Rampart => "rampart",
            Self::Wall => "constructedWall",
            Self::Extractor => "extractor",
            Self::Lab => "lab",
            Self::Link => "link",
            Self::Nuker => "nuker",
            Self::PowerSpawn => "powerSpawn",
            Self::Observer => "observer",
            Self::Factory => "factory",
            Self::KeeperLair => "keeperLair",
            Self::Nuke => "nuke",
        }
    }

    /// Decode a wire/document type tag.
    pub fn parse(tag: &str) -> Option<Self> {
        [
            Self::Creep,
            Self::PowerCreep,
            Self::Spawn,
            Self::Extension,
            Self::Tower,
            Self::Source,
            Self::Mineral,
            Self::Resource,
            Self::ConstructionSite,
            Self::Controller,
            Self::Terminal,
            Self::Storage,
            Self::Container,
            Self::Road,
            Self::Rampart,
            Self::Wall,
            Self::Extractor,
            Self::Lab,
            Self::Link,
            Self::Nuker,
            Self::PowerSpawn,
            Self::Observer,
            Self::Factory,
            Self::KeeperLair,
            Self::Nuke,
        ]
        .into_iter()
        .find(|k| k.as_str() == tag)
    }

    /// Whether creeps can share a tile with this object.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            Self::Road
                | Self::Container
                | Self::Rampart
                | Self::Resource
                | Self::ConstructionSite
                | Self::Nuke
        )
    }

    /// Whether this is a player-built structure (ownership semantics
    /// apply to it).
    pub fn is_structure(self) -> bool {
        !matches!(
            self,
            Self::Creep
                | Self::PowerCreep
                | Self::Source
                | Self::Mineral
                | Self::Resource
                | Self::Nuke
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A power kind usable by power creeps, and the effect tag it leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerKind {
    /// Generate ops from nothing.
    GenerateOps,
    /// Accelerate a spawn.
    OperateSpawn,
    /// Overcharge a tower.
    OperateTower,
    /// Expand a storage.
    OperateStorage,
    /// Accelerate a lab.
    OperateLab,
    /// Overfill extensions.
    OperateExtension,
    /// Regenerate a source.
    RegenSource,
    /// Regenerate a mineral.
    RegenMineral,
    /// Project a damage shield.
    Shield,
}

impl PowerKind {
    /// Cooldown ticks after using this power.
    pub fn cooldown(self) -> u64 {
        match self {
            Self::GenerateOps => 50,
            Self::OperateSpawn => 300,
            Self::OperateTower => 10,
            Self::OperateStorage => 800,
            Self::OperateLab => 50,
            Self::OperateExtension => 50,
            Self::RegenSource => 100,
            Self::RegenMineral => 100,
            Self::Shield => 20,
        }
    }

    /// How long the applied effect lasts on the target.
    pub fn effect_duration(self) -> u64 {
        match self {
            Self::GenerateOps => 0,
            Self::OperateSpawn => 1000,
            Self::OperateTower => 100,
            Self::OperateStorage => 1000,
            Self::OperateLab => 1000,
            Self::OperateExtension => 50,
            Self::RegenSource => 300,
            Self::RegenMineral => 100,
            Self::Shield => 50,
        }
    }

    /// The wire code submitted in `usePower` intents.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::GenerateOps),
            2 => Some(Self::OperateSpawn),
            3 => Some(Self::OperateTower),
            4 => Some(Self::OperateStorage),
            5 => Some(Self::OperateLab),
            6 => Some(Self::OperateExtension),
            16 => Some(Self::RegenSource),
            17 => Some(Self::RegenMineral),
            19 => Some(Self::Shield),
            _ => None,
        }
    }

    /// Ops cost of one use.
    pub fn ops_cost(self) -> u32 {
        match self {
            Self::GenerateOps => 0,
            Self::OperateSpawn => 100,
            Self::OperateTower => 10,
            Self::OperateStorage => 100,
            Self::OperateLab => 10,
            Self::OperateExtension => 2,
            Self::RegenSource => 0,
            Self::RegenMineral => 0,
            Self::Shield => 100,
        }
    }
}

/// A timed power effect applied to an object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Effect {
    /// Which power produced it.
    pub kind: PowerKind,
    /// The power level it was applied at.
    pub level: u32,
    /// The tick at which the effect expires.
    pub ends_at: GameTime,
}

/// A spawn's in-progress creep production.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnJob {
    /// The creep object being produced.
    pub creep: ObjectId,
    /// Total ticks the job takes.
    pub need_time: u64,
    /// The tick at which production completes.
    pub ends_at: GameTime,
}

/// A controller reservation by a non-owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    /// The reserving user.
    pub user: UserId,
    /// The tick at which the reservation lapses.
    pub ends_at: GameTime,
}

/// A controller sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sign {
    /// The signing user.
    pub user: UserId,
    /// Sign text.
    pub text: String,
    /// When it was signed.
    pub time: GameTime,
}

/// Controller-specific state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// Current room control level (0 = unclaimed).
    pub level: u32,
    /// Progress toward the next level.
    pub progress: u32,
    /// Tick at which the controller downgrades a level.
    pub downgrade_time: Option<GameTime>,
    /// Tick until which safe mode is active.
    pub safe_mode_until: Option<GameTime>,
    /// Banked safe-mode activations.
    pub safe_modes_available: u32,
    /// Reservation, when unowned but reserved.
    pub reservation: Option<Reservation>,
    /// Sign, if any.
    pub sign: Option<Sign>,
}

/// Source-specific state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceState {
    /// Energy remaining this regeneration cycle.
    pub energy: u32,
    /// Energy granted per cycle.
    pub energy_capacity: u32,
    /// Tick at which the source refills, set when first drained.
    pub next_regen: Option<GameTime>,
}

/// Mineral-deposit state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MineralState {
    /// Which mineral.
    pub kind: ResourceKind,
    /// Amount remaining this cycle.
    pub amount: u32,
    /// Density class, decides the regenerated amount.
    pub density: u32,
    /// Tick at which the deposit regenerates, set when exhausted.
    pub next_regen: Option<GameTime>,
}

/// Construction-site state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructionState {
    /// What is being built.
    pub structure: ObjectKind,
    /// Build progress so far.
    pub progress: u32,
    /// Progress required to finish.
    pub progress_total: u32,
}

/// Nuke-in-flight state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NukeState {
    /// Tick at which the nuke lands.
    pub land_time: GameTime,
    /// Room it was launched from.
    pub launch_room: RoomName,
}

/// Power-creep account state carried on the object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerCreepState {
    /// Overall level.
    pub level: u32,
    /// Learned powers: kind → (level, cooldown-until).
    pub powers: IndexMap<PowerKind, PowerLevel>,
    /// Tick at which the creep despawns, set while deployed.
    pub expires: Option<GameTime>,
}

/// One learned power on a power creep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerLevel {
    /// Power level (1..=5).
    pub level: u32,
    /// Cooldown expiry, if the power was used recently.
    pub cooldown_until: Option<GameTime>,
}

/// One game object: identity, location, and the closed set of
/// type-specific optional fields.
///
/// Snapshots are immutable: processor steps never mutate one in place,
/// they emit patches/upserts describing the next tick's value.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomObjectSnapshot {
    /// Object identity.
    pub id: ObjectId,
    /// Type tag.
    pub kind: ObjectKind,
    /// Room the object is in.
    pub room: RoomName,
    /// Owning user, when owned.
    pub user: Option<UserId>,
    /// Tile position.
    pub pos: RoomPosition,
    /// Current hit points; `None` for types without health.
    pub hits: Option<u32>,
    /// Maximum hit points.
    pub hits_max: Option<u32>,
    /// Resource store; `None` for types without one.
    pub store: Option<Store>,
    /// Body parts, in order (creeps only; empty otherwise).
    pub body: Body,
    /// Whether a creep is still inside its spawn.
    pub spawning: bool,
    /// Creep death tick.
    pub age_time: Option<GameTime>,
    /// In-progress spawn job (spawns only).
    pub spawn_job: Option<SpawnJob>,
    /// Controller state (controllers only).
    pub controller: Option<ControllerState>,
    /// Source state (sources only).
    pub source: Option<SourceState>,
    /// Mineral state (minerals only).
    pub mineral: Option<MineralState>,
    /// Construction-site state.
    pub construction: Option<ConstructionState>,
    /// Nuke-in-flight state.
    pub nuke: Option<NukeState>,
    /// Power-creep state.
    pub power_creep: Option<PowerCreepState>,
    /// Dropped-resource kind (dropped piles only).
    pub resource_kind: Option<ResourceKind>,
    /// Generic cooldown expiry (lab, link, terminal, factory, nuker,
    /// keeper lair next-spawn).
    pub cooldown_until: Option<GameTime>,
    /// Next scheduled decay event (roads, ramparts, containers).
    pub next_decay: Option<GameTime>,
    /// Rampart publicity flag.
    pub is_public: Option<bool>,
    /// Active power effects.
    pub effects: Vec<Effect>,
}

impl RoomObjectSnapshot {
    /// A bare object with every optional field unset.
    pub fn new(id: ObjectId, kind: ObjectKind, room: RoomName, pos: RoomPosition) -> Self {
        Self {
            id,
            kind,
            room,
            user: None,
            pos,
            hits: None,
            hits_max: None,
            store: None,
            body: Body::new(),
            spawning: false,
            age_time: None,
            spawn_job: None,
            controller: None,
            source: None,
            mineral: None,
            construction: None,
            nuke: None,
            power_creep: None,
            resource_kind: None,
            cooldown_until: None,
            next_decay: None,
            is_public: None,
            effects: Vec::new(),
        }
    }

    /// Whether the object is alive: health-bearing types need
    /// `hits > 0`; others are always "alive".
    pub fn is_alive(&self) -> bool {
        self.hits.map(|h| h > 0).unwrap_or(true)
    }

    /// Whether the object is owned by `user`.
    pub fn owned_by(&self, user: &UserId) -> bool {
        self.user.as_ref() == Some(user)
    }

    /// Store energy, zero when there is no store.
    pub fn energy(&self) -> u32 {
        self.store.as_ref().map(Store::energy).unwrap_or(0)
    }

    /// The active effect of `kind`, if one has not expired by `now`.
    pub fn active_effect(&self, kind: PowerKind, now: GameTime) -> Option<&Effect> {
        self.effects
            .iter()
            .find(|e| e.kind == kind && e.ends_at > now)
    }

    /// Whether the object's cooldown has elapsed by `now`.
    pub fn cooldown_ready(&self, now: GameTime) -> bool {
        self.cooldown_until.map(|t| t <= now).unwrap_or(true)
    }
}

//! The single generic sparse object patch.
//!
//! One patch type covers every entity kind; only populated fields are
//! serialized/merged at the storage boundary, so there is no per-kind
//! patch-document builder anywhere in the engine.

use warren_core::{Body, GameTime, ObjectId, RoomName, RoomPosition, UserId};
use warren_model::{
    ConstructionState, ControllerState, Effect, MineralState, PowerCreepState,
    RoomObjectSnapshot, SourceState, SpawnJob, Store,
};

/// A sparse field delta for one object.
///
/// `None` means "leave the stored field untouched". Clearable optional
/// fields use a second `Option` layer: `Some(None)` clears the field,
/// `Some(Some(v))` sets it. Patches to the same object accumulate via
/// [`merge`](ObjectPatch::merge) — later writes win field-wise, they do
/// not replace the whole patch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectPatch {
    /// New position.
    pub pos: Option<RoomPosition>,
    /// New room (inter-room transfer).
    pub room: Option<RoomName>,
    /// New owner; `Some(None)` removes ownership.
    pub user: Option<Option<UserId>>,
    /// New hit points.
    pub hits: Option<u32>,
    /// Replacement store contents (absolute, state-derived).
    pub store: Option<Store>,
    /// Replacement body (boost application, part damage).
    pub body: Option<Body>,
    /// Spawning flag.
    pub spawning: Option<bool>,
    /// Creep death tick; `Some(None)` clears it.
    pub age_time: Option<Option<GameTime>>,
    /// Spawn production job; `Some(None)` clears it.
    pub spawn_job: Option<Option<SpawnJob>>,
    /// Replacement controller state.
    pub controller: Option<ControllerState>,
    /// Replacement source state.
    pub source: Option<SourceState>,
    /// Replacement mineral state.
    pub mineral: Option<MineralState>,
    /// Replacement construction-site state.
    pub construction: Option<ConstructionState>,
    /// Replacement power-creep state.
    pub power_creep: Option<PowerCreepState>,
    /// Cooldown expiry; `Some(None)` clears it.
    pub cooldown_until: Option<Option<GameTime>>,
    /// Next decay event; `Some(None)` clears it.
    pub next_decay: Option<Option<GameTime>>,
    /// Rampart publicity.
    pub is_public: Option<bool>,
    /// Replacement effect list.
    pub effects: Option<Vec<Effect>>,
}

impl ObjectPatch {
    /// Whether every field is unset.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Fold `later` into `self`, field-wise. Populated fields of
    /// `later` win; unset fields keep the earlier value.
    pub fn merge(&mut self, later: ObjectPatch) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if later.$field.is_some() {
                    self.$field = later.$field;
                })*
            };
        }
        take!(
            pos,
            room,
            user,
            hits,
            store,
            body,
            spawning,
            age_time,
            spawn_job,
            controller,
            source,
            mineral,
            construction,
            power_creep,
            cooldown_until,
            next_decay,
            is_public,
            effects,
        );
    }

    /// Apply the patch to an object value.
    ///
    /// This is what the storage collaborator conceptually does on flush;
    /// the engine itself uses it only in tests and the in-memory store.
    pub fn apply(&self, obj: &mut RoomObjectSnapshot) {
        if let Some(pos) = self.pos {
            obj.pos = pos;
        }
        if let Some(room) = &self.room {
            obj.room = room.clone();
        }
        if let Some(user) = &self.user {
            obj.user = user.clone();
        }
        if let Some(hits) = self.hits {
            obj.hits = Some(hits);
        }
        if let Some(store) = &self.store {
            obj.store = Some(store.clone());
        }
        if let Some(body) = &self.body {
            obj.body = body.clone();
        }
        if let Some(spawning) = self.spawning {
            obj.spawning = spawning;
        }
        if let Some(age_time) = self.age_time {
            obj.age_time = age_time;
        }
        if let Some(spawn_job) = &self.spawn_job {
            obj.spawn_job = spawn_job.clone();
        }
        if let Some(controller) = &self.controller {
            obj.controller = Some(controller.clone());
        }
        if let Some(source) = &self.source {
            obj.source = Some(source.clone());
        }
        if let Some(mineral) = &self.mineral {
            obj.mineral = Some(mineral.clone());
        }
        if let Some(construction) = &self.construction {
            obj.construction = Some(construction.clone());
        }
        if let Some(power_creep) = &self.power_creep {
            obj.power_creep = Some(power_creep.clone());
        }
        if let Some(cooldown_until) = self.cooldown_until {
            obj.cooldown_until = cooldown_until;
        }
        if let Some(next_decay) = self.next_decay {
            obj.next_decay = next_decay;
        }
        if let Some(is_public) = self.is_public {
            obj.is_public = Some(is_public);
        }
        if let Some(effects) = &self.effects {
            obj.effects = effects.clone();
        }
    }

    /// Builder shorthand: set the new store.
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Builder shorthand: set new hits.
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = Some(hits);
        self
    }
}

/// A removal marker, kept distinct from patches in the batch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Removal(pub ObjectId);

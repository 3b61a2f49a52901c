//! The per-room snapshot: everything one tick of room processing reads.

use crate::object::{ObjectKind, RoomObjectSnapshot};
use crate::user::UserState;
use indexmap::IndexMap;
use warren_core::{
    GameTime, IntentEnvelope, ObjectId, RoomName, RoomPosition, Terrain, TerrainError, UserId,
};

/// Lifecycle status of a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoomStatus {
    /// Open for normal play.
    #[default]
    Normal,
    /// Closed to all players.
    Closed,
    /// Inside a novice area window.
    Novice,
    /// Inside a respawn area window.
    Respawn,
}

/// Room metadata carried alongside the object set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomInfo {
    /// Lifecycle status.
    pub status: RoomStatus,
    /// Novice-area window expiry.
    pub novice_until: Option<GameTime>,
    /// Respawn-area window expiry.
    pub respawn_until: Option<GameTime>,
}

/// A player flag (purely cosmetic to the engine, carried through).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flag {
    /// Flag name, unique per user.
    pub name: String,
    /// Owning user.
    pub user: UserId,
    /// Position.
    pub pos: RoomPosition,
    /// Primary color code.
    pub color: u8,
    /// Secondary color code.
    pub secondary_color: u8,
}

/// An immutable view of one room at one tick.
///
/// Exclusively owned by the pipeline invocation that built it and never
/// mutated in place; every object referenced by an intent must exist in
/// `objects` (a miss is a validation failure, not a crash).
#[derive(Clone, Debug, PartialEq)]
pub struct RoomSnapshot {
    /// The room this snapshot describes.
    pub room: RoomName,
    /// The tick it was built for.
    pub game_time: GameTime,
    /// Room metadata, when known.
    pub info: Option<RoomInfo>,
    /// Object id → object. Iteration order is the determinism tiebreak
    /// for every order-sensitive rule, so this is an `IndexMap`.
    pub objects: IndexMap<ObjectId, RoomObjectSnapshot>,
    /// Users with a stake in this room.
    pub users: IndexMap<UserId, UserState>,
    /// Intents submitted for this tick, one envelope per user.
    pub intents: Vec<IntentEnvelope>,
    /// Packed terrain strings, keyed by room name (the own room plus
    /// any neighbours the processor needs for border checks).
    pub terrain: IndexMap<RoomName, String>,
    /// Player flags in the room.
    pub flags: Vec<Flag>,
}

impl RoomSnapshot {
    /// An empty snapshot for `room` at `game_time`.
    pub fn empty(room: RoomName, game_time: GameTime) -> Self {
        Self {
            room,
            game_time,
            info: None,
            objects: IndexMap::new(),
            users: IndexMap::new(),
            intents: Vec::new(),
            terrain: IndexMap::new(),
            flags: Vec::new(),
        }
    }

    /// Look up an object by id.
    pub fn object(&self, id: &ObjectId) -> Option<&RoomObjectSnapshot> {
        self.objects.get(id)
    }

    /// The room's controller, if present.
    pub fn controller(&self) -> Option<&RoomObjectSnapshot> {
        self.objects
            .values()
            .find(|o| o.kind == ObjectKind::Controller)
    }

    /// Decoded terrain for this room.
    pub fn terrain(&self) -> Result<Terrain, TerrainError> {
        match self.terrain.get(&self.room) {
            Some(packed) => Terrain::parse(packed),
            None => Ok(Terrain::open()),
        }
    }

    /// All objects standing on a tile, in snapshot order.
    pub fn objects_at(
        &self,
        pos: RoomPosition,
    ) -> impl Iterator<Item = &RoomObjectSnapshot> + '_ {
        self.objects.values().filter(move |o| o.pos == pos)
    }

    /// The rampart on a tile, if any.
    pub fn rampart_at(&self, pos: RoomPosition) -> Option<&RoomObjectSnapshot> {
        self.objects_at(pos).find(|o| o.kind == ObjectKind::Rampart)
    }
}

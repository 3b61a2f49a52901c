//! The cross-room snapshot read by the global processor steps.

use crate::object::RoomObjectSnapshot;
use crate::room::RoomInfo;
use crate::user::UserState;
use indexmap::IndexMap;
use smallvec::SmallVec;
use warren_core::{
    GameTime, IntentRecord, ObjectId, OrderId, ResourceKind, RoomName, RoomPosition, TerminalSend,
    UserId,
};

/// Buy or sell side of a market order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderKind {
    /// The order's owner buys; the dealer sells into it.
    Buy,
    /// The order's owner sells; the dealer buys from it.
    Sell,
}

/// One market order.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketOrder {
    /// Order identity.
    pub id: OrderId,
    /// Owning user.
    pub user: UserId,
    /// Buy or sell.
    pub kind: OrderKind,
    /// Traded resource.
    pub resource: ResourceKind,
    /// Credits per unit.
    pub price: f64,
    /// Units remaining on the order.
    pub remaining: u32,
    /// Room whose terminal backs the order.
    pub room: Option<RoomName>,
    /// Whether the order is currently fillable.
    pub active: bool,
    /// Tick the order was created.
    pub created: GameTime,
}

/// Global (room-less) intents submitted by one user this tick: market
/// deals, order management, power-creep lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalUserIntents {
    /// The submitting user.
    pub user: UserId,
    /// Intent records, in submission order.
    pub intents: Vec<IntentRecord>,
}

/// The market as seen by the global processor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketSnapshot {
    /// All orders, keyed by id.
    pub orders: IndexMap<OrderId, MarketOrder>,
    /// Account state for every user the global steps may touch.
    pub users: IndexMap<UserId, UserState>,
    /// All power creeps (deployed or not), keyed by object id.
    pub power_creeps: IndexMap<ObjectId, RoomObjectSnapshot>,
    /// Global intents, one entry per user.
    pub intents: Vec<GlobalUserIntents>,
}

/// Exit adjacency between rooms on the world map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExitTopology {
    /// Room → rooms reachable through its exits.
    pub adjacency: IndexMap<RoomName, SmallVec<[RoomName; 4]>>,
    /// (from, to) → number of open exit tiles on that border.
    pub exit_tiles: IndexMap<(RoomName, RoomName), u32>,
}

impl ExitTopology {
    /// Whether a border crossing from `from` to `to` is legal: the rooms
    /// are adjacent and at least one exit tile is open.
    pub fn crossing_legal(&self, from: &RoomName, to: &RoomName) -> bool {
        let adjacent = self
            .adjacency
            .get(from)
            .map(|ns| ns.iter().any(|n| n == to))
            .unwrap_or(false);
        if !adjacent {
            return false;
        }
        self.exit_tiles
            .get(&(from.clone(), to.clone()))
            .map(|&n| n > 0)
            .unwrap_or(true)
    }
}

/// A creep whose movement crossed a room border this tick.
#[derive(Clone, Debug, PartialEq)]
pub struct MovingCreep {
    /// The creep, as last seen in its origin room.
    pub object: RoomObjectSnapshot,
    /// Room it is leaving.
    pub from: RoomName,
    /// Room it is entering.
    pub to: RoomName,
    /// Entry tile in the destination room.
    pub entry: RoomPosition,
}

/// One pending terminal send collected from a room's intent envelopes.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSend {
    /// The sending terminal.
    pub terminal: ObjectId,
    /// The send order.
    pub send: TerminalSend,
}

/// An immutable cross-room view for one tick of global processing.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSnapshot {
    /// The tick this snapshot was built for.
    pub game_time: GameTime,
    /// Creeps mid inter-room transfer.
    pub moving_creeps: Vec<MovingCreep>,
    /// Rooms currently accessible, with their metadata.
    pub accessible_rooms: IndexMap<RoomName, RoomInfo>,
    /// Exit topology between rooms.
    pub exits: ExitTopology,
    /// Cross-room "special" objects (terminals, power spawns, observers,
    /// deployed power creeps), keyed by object id.
    pub special_objects: IndexMap<ObjectId, RoomObjectSnapshot>,
    /// The market view.
    pub market: MarketSnapshot,
    /// Per-room terminal sends for this tick.
    pub room_sends: IndexMap<RoomName, Vec<PendingSend>>,
}

impl GlobalSnapshot {
    /// An empty snapshot at `game_time`.
    pub fn empty(game_time: GameTime) -> Self {
        Self {
            game_time,
            moving_creeps: Vec::new(),
            accessible_rooms: IndexMap::new(),
            exits: ExitTopology::default(),
            special_objects: IndexMap::new(),
            market: MarketSnapshot::default(),
            room_sends: IndexMap::new(),
        }
    }

    /// The terminal standing in `room`, if any is among the special
    /// objects.
    pub fn terminal_in(&self, room: &RoomName) -> Option<&RoomObjectSnapshot> {
        self.special_objects
            .values()
            .find(|o| o.kind == crate::object::ObjectKind::Terminal && &o.room == room)
    }
}

//! The normalized in-memory intent model.
//!
//! Externally an intent arrives as a named action plus a flat field set
//! in whatever wire/document format the API layer speaks. The decoder
//! normalizes it into this closed tagged-union model; the typed core
//! never holds a dynamically-typed value.

use crate::body::BodyPartKind;
use crate::id::{ObjectId, RoomName, UserId};
use crate::pos::Direction;
use crate::resource::ResourceKind;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// One typed field value inside an intent argument set.
#[derive(Clone, Debug, PartialEq)]
pub enum IntentFieldValue {
    /// A text value (ids, names, descriptions).
    Text(String),
    /// A numeric value. Wire numbers are doubles; validators reject
    /// fractional or negative values where integers are required.
    Number(f64),
    /// A boolean flag.
    Bool(bool),
    /// A homogeneous array of text values.
    TextArray(Vec<String>),
    /// A homogeneous array of numbers.
    NumberArray(Vec<f64>),
    /// A homogeneous array of booleans.
    BoolArray(Vec<bool>),
    /// A body-part array (spawn and boost intents).
    BodyParts(Vec<BodyPartKind>),
}

impl IntentFieldValue {
    /// The text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean payload, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The body-part payload, if this is a body-part array.
    pub fn as_body_parts(&self) -> Option<&[BodyPartKind]> {
        match self {
            Self::BodyParts(parts) => Some(parts),
            _ => None,
        }
    }
}

/// One argument set: a mapping from field name to typed value.
///
/// Most intents carry exactly one argument set; a few (e.g. repeated
/// ranged attacks) carry several, applied in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntentArgument {
    /// Field name → value, in wire order.
    pub fields: IndexMap<String, IntentFieldValue>,
}

impl IntentArgument {
    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&IntentFieldValue> {
        self.fields.get(name)
    }

    /// Shorthand: text field by name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(IntentFieldValue::as_text)
    }

    /// Shorthand: numeric field by name.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(IntentFieldValue::as_number)
    }

    /// Shorthand: non-negative integral field by name.
    ///
    /// Returns `None` when absent, negative, fractional, or out of
    /// `u32` range — schema validation turns that into a typed error.
    pub fn amount(&self, name: &str) -> Option<u32> {
        let n = self.number(name)?;
        if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
            Some(n as u32)
        } else {
            None
        }
    }

    /// Shorthand: the target object id, under either conventional key.
    pub fn target_id(&self) -> Option<ObjectId> {
        self.text("targetId")
            .or_else(|| self.text("id"))
            .map(ObjectId::from)
    }

    /// Shorthand: the resource kind named by the `resourceType` field.
    pub fn resource(&self) -> Option<ResourceKind> {
        self.text("resourceType").and_then(ResourceKind::parse)
    }

    /// Builder-style field insertion, for tests and decoders.
    pub fn with(mut self, name: &str, value: IntentFieldValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

/// One player-submitted action: a name plus one or more argument sets.
#[derive(Clone, Debug, PartialEq)]
pub struct IntentRecord {
    /// The action name, e.g. `"attack"`, `"transfer"`, `"upgradeController"`.
    pub name: String,
    /// Argument sets, applied in order.
    pub arguments: Vec<IntentArgument>,
}

impl IntentRecord {
    /// A record with a single argument set.
    pub fn single(name: &str, argument: IntentArgument) -> Self {
        Self {
            name: name.to_string(),
            arguments: vec![argument],
        }
    }

    /// The first argument set, if any.
    pub fn first_argument(&self) -> Option<&IntentArgument> {
        self.arguments.first()
    }
}

/// A creep's single-slot movement order for the tick.
///
/// Mutually exclusive by construction: a creep has at most one move
/// target per tick, so this is a dedicated envelope slot rather than a
/// generic record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveCommand {
    /// The direction to step.
    pub direction: Direction,
}

/// A spawn's single-slot production order for the tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    /// Body parts in spawn order.
    pub body: SmallVec<[BodyPartKind; 8]>,
    /// Name for the new creep.
    pub creep_name: String,
}

/// A terminal's single-slot resource send for the tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TerminalSend {
    /// Destination room; its terminal receives the shipment.
    pub to_room: RoomName,
    /// Resource to send.
    pub resource: ResourceKind,
    /// Amount to send.
    pub amount: u32,
    /// Optional free-text description recorded in the transaction log.
    pub description: Option<String>,
}

/// All intents one user submitted for one room in one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntentEnvelope {
    /// The submitting user.
    pub user: Option<UserId>,
    /// Free-form object intents: object id → ordered records.
    pub object_intents: IndexMap<ObjectId, Vec<IntentRecord>>,
    /// Per-creep movement orders.
    pub moves: IndexMap<ObjectId, MoveCommand>,
    /// Per-spawn production orders.
    pub spawn_orders: IndexMap<ObjectId, SpawnOrder>,
    /// Per-terminal sends.
    pub sends: IndexMap<ObjectId, TerminalSend>,
}

impl IntentEnvelope {
    /// An empty envelope for `user`.
    pub fn for_user(user: UserId) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    /// Append a free-form record for an object.
    pub fn push_intent(&mut self, object: ObjectId, record: IntentRecord) {
        self.object_intents.entry(object).or_default().push(record);
    }

    /// Whether the envelope carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.object_intents.is_empty()
            && self.moves.is_empty()
            && self.spawn_orders.is_empty()
            && self.sends.is_empty()
    }
}

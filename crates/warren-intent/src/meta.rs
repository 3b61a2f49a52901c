//! The closed intent metadata table.
//!
//! Every intent the engine understands has exactly one entry here; the
//! validators are generic over this table, so adding an intent means
//! adding a row, not a validator. Records whose name has no row are
//! dropped silently before validation.

use warren_core::IntentFieldValue;

/// Expected value kind for one intent field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Text (ids, names, messages).
    Text,
    /// A number.
    Number,
    /// A boolean.
    Bool,
    /// A body-part array.
    BodyParts,
}

impl FieldKind {
    /// Whether a decoded value matches this kind.
    pub fn matches(self, value: &IntentFieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Text, IntentFieldValue::Text(_))
                | (FieldKind::Number, IntentFieldValue::Number(_))
                | (FieldKind::Bool, IntentFieldValue::Bool(_))
                | (FieldKind::BodyParts, IntentFieldValue::BodyParts(_))
        )
    }
}

/// One field of an intent's argument schema.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Field name on the wire.
    pub name: &'static str,
    /// Expected value kind.
    pub kind: FieldKind,
    /// Whether the field must be present.
    pub required: bool,
}

const fn req(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
    }
}

const fn opt(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
    }
}

/// Whether and how far away the intent's target may be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRule {
    /// No target object.
    None,
    /// A target id is required and must be within the given Chebyshev
    /// radius of the actor.
    Required {
        /// Maximum Chebyshev distance.
        range: u32,
    },
}

/// How the intent touches stores, for the resource validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreRule {
    /// No store precondition.
    None,
    /// The actor gives the named resource away; it must hold some.
    ActorProvides,
    /// The actor takes from the target; the target must hold some and
    /// the actor must have free capacity.
    ActorReceives,
    /// A work-type action fueled by the actor's energy.
    ActorEnergy,
}

/// Room-ownership precondition, for the permission validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerRule {
    /// No ownership precondition.
    None,
    /// The room's controller must be owned by the submitting user.
    ControllerOwned,
    /// The room must not be claimed or reserved by another user.
    OwnedOrReserved,
}

/// The full validation profile of one intent.
#[derive(Clone, Copy, Debug)]
pub struct IntentSpec {
    /// Intent name on the wire.
    pub name: &'static str,
    /// Argument schema.
    pub fields: &'static [FieldSpec],
    /// Target requirement.
    pub target: TargetRule,
    /// Store precondition.
    pub store: StoreRule,
    /// Whether the intent is hostile (safe mode and rampart checks).
    pub hostile: bool,
    /// Whether the target must have hit points.
    pub target_has_hits: bool,
    /// Room-ownership precondition.
    pub owner: OwnerRule,
}

const ID: &[FieldSpec] = &[req("id", FieldKind::Text)];
const ID_RES: &[FieldSpec] = &[
    req("id", FieldKind::Text),
    req("resourceType", FieldKind::Text),
    opt("amount", FieldKind::Number),
];

/// Every intent the room processor understands.
pub const INTENT_SPECS: &[IntentSpec] = &[
    IntentSpec {
        name: "harvest",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::OwnedOrReserved,
    },
    IntentSpec {
        name: "transfer",
        fields: ID_RES,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::ActorProvides,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "withdraw",
        fields: ID_RES,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::ActorReceives,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "pickup",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::ActorReceives,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "drop",
        fields: &[
            req("resourceType", FieldKind::Text),
            opt("amount", FieldKind::Number),
        ],
        target: TargetRule::None,
        store: StoreRule::ActorProvides,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "build",
        fields: ID,
        target: TargetRule::Required { range: 3 },
        store: StoreRule::ActorEnergy,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "repair",
        fields: ID,
        target: TargetRule::Required { range: 3 },
        store: StoreRule::ActorEnergy,
        hostile: false,
        target_has_hits: true,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "dismantle",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: true,
        target_has_hits: true,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "upgradeController",
        fields: ID,
        target: TargetRule::Required { range: 3 },
        store: StoreRule::ActorEnergy,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::ControllerOwned,
    },
    IntentSpec {
        name: "claimController",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "reserveController",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "attackController",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: true,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "signController",
        fields: &[req("id", FieldKind::Text), req("sign", FieldKind::Text)],
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "generateSafeMode",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::ControllerOwned,
    },
    IntentSpec {
        name: "activateSafeMode",
        fields: &[],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::ControllerOwned,
    },
    IntentSpec {
        name: "attack",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: true,
        target_has_hits: true,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "rangedAttack",
        fields: ID,
        target: TargetRule::Required { range: 3 },
        store: StoreRule::None,
        hostile: true,
        target_has_hits: true,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "rangedMassAttack",
        fields: &[],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: true,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "heal",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: true,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "rangedHeal",
        fields: ID,
        target: TargetRule::Required { range: 3 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: true,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "say",
        fields: &[
            req("message", FieldKind::Text),
            opt("isPublic", FieldKind::Bool),
        ],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "suicide",
        fields: &[],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "boostCreep",
        fields: &[req("id", FieldKind::Text), opt("bodyPartsCount", FieldKind::Number)],
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "unboostCreep",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "runReaction",
        fields: &[req("lab1", FieldKind::Text), req("lab2", FieldKind::Text)],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "reverseReaction",
        fields: &[req("lab1", FieldKind::Text), req("lab2", FieldKind::Text)],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "transferEnergy",
        fields: &[req("id", FieldKind::Text), opt("amount", FieldKind::Number)],
        target: TargetRule::None,
        store: StoreRule::ActorEnergy,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "launchNuke",
        fields: &[
            req("roomName", FieldKind::Text),
            req("x", FieldKind::Number),
            req("y", FieldKind::Number),
        ],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "processPower",
        fields: &[],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "produce",
        fields: &[req("resourceType", FieldKind::Text)],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "recycleCreep",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "renewCreep",
        fields: ID,
        target: TargetRule::Required { range: 1 },
        store: StoreRule::ActorEnergy,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "setPublic",
        fields: &[req("isPublic", FieldKind::Bool)],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "usePower",
        fields: &[req("power", FieldKind::Number), opt("id", FieldKind::Text)],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "remove",
        fields: &[],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::None,
    },
    IntentSpec {
        name: "unclaim",
        fields: &[],
        target: TargetRule::None,
        store: StoreRule::None,
        hostile: false,
        target_has_hits: false,
        owner: OwnerRule::ControllerOwned,
    },
];

/// Look up an intent's validation profile.
pub fn intent_spec(name: &str) -> Option<&'static IntentSpec> {
    INTENT_SPECS.iter().find(|s| s.name == name)
}

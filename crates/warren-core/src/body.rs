//! Creep body parts.

use crate::resource::ResourceKind;
use smallvec::SmallVec;
use std::fmt;

/// Hit points of a single undamaged body part.
pub const BODYPART_HITS: u32 = 100;

/// The eight body part kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyPartKind {
    /// Movement.
    Move,
    /// Harvest, build, repair, upgrade, dismantle.
    Work,
    /// Store capacity.
    Carry,
    /// Melee attack.
    Attack,
    /// Ranged attack.
    RangedAttack,
    /// Healing.
    Heal,
    /// Controller claim/reserve/attack.
    Claim,
    /// Damage soak; boostable for damage reduction.
    Tough,
}

impl BodyPartKind {
    /// The wire/document code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Work => "work",
            Self::Carry => "carry",
            Self::Attack => "attack",
            Self::RangedAttack => "ranged_attack",
            Self::Heal => "heal",
            Self::Claim => "claim",
            Self::Tough => "tough",
        }
    }

    /// Decode a wire/document code.
    pub fn parse(code: &str) -> Option<Self> {
        Some(match code {
            "move" => Self::Move,
            "work" => Self::Work,
            "carry" => Self::Carry,
            "attack" => Self::Attack,
            "ranged_attack" => Self::RangedAttack,
            "heal" => Self::Heal,
            "claim" => Self::Claim,
            "tough" => Self::Tough,
            _ => return None,
        })
    }

    /// Energy cost of spawning one part of this kind.
    pub fn spawn_cost(self) -> u32 {
        match self {
            Self::Move | Self::Carry => 50,
            Self::Work => 100,
            Self::Attack => 80,
            Self::RangedAttack => 150,
            Self::Heal => 250,
            Self::Claim => 600,
            Self::Tough => 10,
        }
    }
}

impl fmt::Display for BodyPartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One body part instance on a creep, in body order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyPart {
    /// The part kind.
    pub kind: BodyPartKind,
    /// Remaining hit points (`0..=100`); a part at 0 is inactive.
    pub hits: u32,
    /// Boost compound applied to this part, if any.
    pub boost: Option<ResourceKind>,
}

impl BodyPart {
    /// A fresh, unboosted part at full hits.
    pub fn new(kind: BodyPartKind) -> Self {
        Self {
            kind,
            hits: BODYPART_HITS,
            boost: None,
        }
    }
}

/// A creep body: ordered parts, inline up to eight.
pub type Body = SmallVec<[BodyPart; 8]>;

/// Count the active (non-zero-hits) parts of one kind.
pub fn active_parts(body: &Body, kind: BodyPartKind) -> u32 {
    body.iter()
        .filter(|p| p.kind == kind && p.hits > 0)
        .count() as u32
}

/// Total energy cost of spawning a body.
pub fn body_cost(parts: &[BodyPartKind]) -> u32 {
    parts.iter().map(|k| k.spawn_cost()).sum()
}

//! The closed set of tradeable resource kinds.

use std::fmt;

/// A resource kind that can appear in a store, an intent, or a market
/// order.
///
/// This is a closed set: anything outside it is rejected at intent
/// validation (`InvalidResourceType`), never carried as a free-form
/// string into the typed core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// The primary economy resource.
    Energy,
    /// Refined power, processed in power spawns.
    Power,
    /// Power-creep ability charge.
    Ops,
    /// Base mineral H.
    Hydrogen,
    /// Base mineral O.
    Oxygen,
    /// Base mineral U.
    Utrium,
    /// Base mineral L.
    Lemergium,
    /// Base mineral K.
    Keanium,
    /// Base mineral Z.
    Zynthium,
    /// Base mineral X.
    Catalyst,
    /// Lab product G (ZK + UL).
    Ghodium,
    /// Lab intermediate OH.
    Hydroxide,
    /// Lab intermediate ZK.
    ZynthiumKeanite,
    /// Lab intermediate UL.
    UtriumLemergite,
    /// Tier-1 attack boost.
    UtriumHydride,
    /// Tier-1 harvest boost.
    UtriumOxide,
    /// Tier-1 carry boost.
    KeaniumHydride,
    /// Tier-1 ranged-attack boost.
    KeaniumOxide,
    /// Tier-1 heal boost.
    LemergiumHydride,
    /// Tier-1 repair/build boost.
    LemergiumOxide,
    /// Tier-1 dismantle boost.
    ZynthiumHydride,
    /// Tier-1 upgrade boost.
    ZynthiumOxide,
    /// Tier-1 damage-reduction boost.
    GhodiumHydride,
    /// Tier-1 fatigue boost.
    GhodiumOxide,
    /// Factory-compressed energy.
    Battery,
}

impl ResourceKind {
    /// Every kind, in canonical order. Membership checks and iteration
    /// use this table so the order is stable.
    pub const ALL: &'static [ResourceKind] = &[
        Self::Energy,
        Self::Power,
        Self::Ops,
        Self::Hydrogen,
        Self::Oxygen,
        Self::Utrium,
        Self::Lemergium,
        Self::Keanium,
        Self::Zynthium,
        Self::Catalyst,
        Self::Ghodium,
        Self::Hydroxide,
        Self::ZynthiumKeanite,
        Self::UtriumLemergite,
        Self::UtriumHydride,
        Self::UtriumOxide,
        Self::KeaniumHydride,
        Self::KeaniumOxide,
        Self::LemergiumHydride,
        Self::LemergiumOxide,
        Self::ZynthiumHydride,
        Self::ZynthiumOxide,
        Self::GhodiumHydride,
        Self::GhodiumOxide,
        Self::Battery,
    ];

    /// The wire/document code for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Power => "power",
            Self::Ops => "ops",
            Self::Hydrogen => "H",
            Self::Oxygen => "O",
            Self::Utrium => "U",
            Self::Lemergium => "L",
            Self::Keanium => "K",
            Self::Zynthium => "Z",
            Self::Catalyst => "X",
            Self::Ghodium => "G",
            Self::Hydroxide => "OH",
            Self::ZynthiumKeanite => "ZK",
            Self::UtriumLemergite => "UL",
            Self::UtriumHydride => "UH",
            Self::UtriumOxide => "UO",
            Self::KeaniumHydride => "KH",
            Self::KeaniumOxide => "KO",
            Self::LemergiumHydride => "LH",
            Self::LemergiumOxide => "LO",
            Self::ZynthiumHydride => "ZH",
            Self::ZynthiumOxide => "ZO",
            Self::GhodiumHydride => "GH",
            Self::GhodiumOxide => "GO",
            Self::Battery => "battery",
        }
    }

    /// Decode a wire/document code. `None` for anything outside the set.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == code)
    }

    /// Whether this kind is a raw mineral extractable from a deposit.
    pub fn is_base_mineral(self) -> bool {
        matches!(
            self,
            Self::Hydrogen
                | Self::Oxygen
                | Self::Utrium
                | Self::Lemergium
                | Self::Keanium
                | Self::Zynthium
                | Self::Catalyst
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips() {
        for &kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert_eq!(ResourceKind::parse("plutonium"), None);
        assert_eq!(ResourceKind::parse(""), None);
    }

    #[test]
    fn base_minerals_classified() {
        assert!(ResourceKind::Utrium.is_base_mineral());
        assert!(!ResourceKind::Energy.is_base_mineral());
        assert!(!ResourceKind::Ghodium.is_base_mineral());
    }
}

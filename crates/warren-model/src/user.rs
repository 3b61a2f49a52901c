//! Per-user account snapshots.

use indexmap::IndexMap;
use warren_core::{GameTime, ResourceKind, UserId};

/// One user's account state at a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct UserState {
    /// Account identity.
    pub id: UserId,
    /// CPU allowance for the tick.
    pub cpu: u32,
    /// Accumulated processed power.
    pub power: f64,
    /// Market credit balance.
    pub money: f64,
    /// Whether the account is active (inactive users' intents are not
    /// processed).
    pub active: bool,
    /// Power-experimentation window expiry, granted on power-creep
    /// deletion.
    pub power_experimentation_until: Option<GameTime>,
    /// Free resource ledger (resources held outside any room object).
    pub resources: IndexMap<ResourceKind, i64>,
}

impl UserState {
    /// A minimal active account.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            cpu: 0,
            power: 0.0,
            money: 0.0,
            active: true,
            power_experimentation_until: None,
            resources: IndexMap::new(),
        }
    }

    /// Free-ledger amount of one resource.
    pub fn resource(&self, kind: ResourceKind) -> i64 {
        self.resources.get(&kind).copied().unwrap_or(0)
    }
}

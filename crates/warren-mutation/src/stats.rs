//! The per-user statistics side channel.
//!
//! Steps record counters as they execute; the processor drains the sink
//! exactly once after the batch flush. Stats never flow through the
//! mutation batch, so a stats write can never dirty room state.

use indexmap::IndexMap;
use warren_core::UserId;

/// Counter families recorded by processor steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// Energy mined from sources.
    EnergyHarvested,
    /// Energy sunk into construction sites.
    EnergyConstruction,
    /// Energy sunk into controller upgrades.
    EnergyControl,
    /// Energy spent spawning and renewing creeps.
    EnergyCreeps,
    /// Creeps finished spawning.
    CreepsProduced,
    /// Creeps that died.
    CreepsLost,
    /// Power processed at power spawns.
    PowerProcessed,
    /// Resource units sent through terminals.
    ResourcesSent,
}

impl StatKind {
    /// Wire name of the counter.
    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::EnergyHarvested => "energyHarvested",
            StatKind::EnergyConstruction => "energyConstruction",
            StatKind::EnergyControl => "energyControl",
            StatKind::EnergyCreeps => "energyCreeps",
            StatKind::CreepsProduced => "creepsProduced",
            StatKind::CreepsLost => "creepsLost",
            StatKind::PowerProcessed => "powerProcessed",
            StatKind::ResourcesSent => "resourcesSent",
        }
    }
}

/// One drained counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRecord {
    /// The user credited.
    pub user: UserId,
    /// Counter family.
    pub kind: StatKind,
    /// Accumulated amount for the tick.
    pub amount: u64,
}

/// Accumulates per-user counters for one tick.
#[derive(Debug, Default)]
pub struct StatsSink {
    counters: IndexMap<(UserId, StatKind), u64>,
}

impl StatsSink {
    /// A fresh sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a user's counter.
    pub fn record(&mut self, user: &UserId, kind: StatKind, amount: u64) {
        if amount == 0 {
            return;
        }
        *self
            .counters
            .entry((user.clone(), kind))
            .or_insert(0) += amount;
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Drain all counters, in first-recorded order. Consumes the sink so
    /// it can only be drained once per tick.
    pub fn drain(self) -> Vec<StatRecord> {
        self.counters
            .into_iter()
            .map(|((user, kind), amount)| StatRecord { user, kind, amount })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_counter_accumulates() {
        let mut sink = StatsSink::new();
        let u = UserId::from("u1");
        sink.record(&u, StatKind::EnergyHarvested, 4);
        sink.record(&u, StatKind::EnergyHarvested, 6);
        sink.record(&u, StatKind::CreepsLost, 1);
        let records = sink.drain();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, 10);
        assert_eq!(records[1].kind, StatKind::CreepsLost);
    }

    #[test]
    fn zero_amounts_are_ignored() {
        let mut sink = StatsSink::new();
        sink.record(&UserId::from("u1"), StatKind::EnergyControl, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn distinct_users_stay_distinct() {
        let mut sink = StatsSink::new();
        sink.record(&UserId::from("a"), StatKind::EnergyCreeps, 200);
        sink.record(&UserId::from("b"), StatKind::EnergyCreeps, 300);
        let records = sink.drain();
        assert_eq!(records[0].user, UserId::from("a"));
        assert_eq!(records[0].amount, 200);
        assert_eq!(records[1].user, UserId::from("b"));
        assert_eq!(records[1].amount, 300);
    }
}

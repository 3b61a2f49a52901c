//! Resource stores with capacity enforcement.

use indexmap::IndexMap;
use std::error::Error;
use std::fmt;
use warren_core::ResourceKind;

/// Error from store arithmetic.
///
/// Steps treat this as a fault: a validated intent should never produce
/// one, so hitting it means an invariant was violated upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreArithmeticError {
    /// Removal would take an amount below zero.
    Underflow {
        /// The resource involved.
        resource: ResourceKind,
        /// Amount present.
        have: u32,
        /// Amount requested.
        want: u32,
    },
    /// Addition would exceed the store's capacity.
    CapacityExceeded {
        /// The resource involved.
        resource: ResourceKind,
        /// Free capacity remaining.
        free: u32,
        /// Amount requested.
        want: u32,
    },
}

impl fmt::Display for StoreArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow {
                resource,
                have,
                want,
            } => write!(f, "removing {want} {resource} from a store holding {have}"),
            Self::CapacityExceeded {
                resource,
                free,
                want,
            } => write!(f, "adding {want} {resource} to a store with {free} free"),
        }
    }
}

impl Error for StoreArithmeticError {}

/// Capacity model for a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCapacity {
    /// No limit (dropped resources, tombstone-like piles).
    Unbounded,
    /// One shared limit across all resource kinds.
    Total(u32),
    /// Independent limit per resource kind; kinds absent from the map
    /// cannot be stored at all.
    PerResource(IndexMap<ResourceKind, u32>),
}

/// An object's resource store.
///
/// Invariant (holds after every mutation the engine applies): every
/// amount is ≥ 0 and the capacity model is respected. The mutating
/// helpers return a new store or an error; nothing saturates silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Store {
    amounts: IndexMap<ResourceKind, u32>,
    capacity: StoreCapacity,
}

impl Store {
    /// An empty store with the given capacity model.
    pub fn empty(capacity: StoreCapacity) -> Self {
        Self {
            amounts: IndexMap::new(),
            capacity,
        }
    }

    /// An empty store with one shared capacity.
    pub fn with_total_capacity(total: u32) -> Self {
        Self::empty(StoreCapacity::Total(total))
    }

    /// A store holding a single resource, unbounded.
    pub fn single(resource: ResourceKind, amount: u32) -> Self {
        let mut s = Self::empty(StoreCapacity::Unbounded);
        if amount > 0 {
            s.amounts.insert(resource, amount);
        }
        s
    }

    /// Amount of one resource.
    pub fn get(&self, resource: ResourceKind) -> u32 {
        self.amounts.get(&resource).copied().unwrap_or(0)
    }

    /// Shorthand for the energy amount.
    pub fn energy(&self) -> u32 {
        self.get(ResourceKind::Energy)
    }

    /// Sum of all amounts.
    pub fn total(&self) -> u32 {
        self.amounts.values().sum()
    }

    /// The capacity model.
    pub fn capacity(&self) -> &StoreCapacity {
        &self.capacity
    }

    /// All non-zero amounts, in insertion order.
    pub fn amounts(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.amounts
            .iter()
            .filter(|(_, &v)| v > 0)
            .map(|(&k, &v)| (k, v))
    }

    /// Free capacity for one resource kind.
    pub fn free_capacity(&self, resource: ResourceKind) -> u32 {
        match &self.capacity {
            StoreCapacity::Unbounded => u32::MAX,
            StoreCapacity::Total(total) => total.saturating_sub(self.total()),
            StoreCapacity::PerResource(caps) => caps
                .get(&resource)
                .map(|cap| cap.saturating_sub(self.get(resource)))
                .unwrap_or(0),
        }
    }

    /// A copy with `amount` of `resource` added.
    pub fn with_added(
        &self,
        resource: ResourceKind,
        amount: u32,
    ) -> Result<Store, StoreArithmeticError> {
        let free = self.free_capacity(resource);
        if amount > free {
            return Err(StoreArithmeticError::CapacityExceeded {
                resource,
                free,
                want: amount,
            });
        }
        let mut next = self.clone();
        *next.amounts.entry(resource).or_insert(0) += amount;
        Ok(next)
    }

    /// A copy with `amount` of `resource` removed.
    pub fn with_removed(
        &self,
        resource: ResourceKind,
        amount: u32,
    ) -> Result<Store, StoreArithmeticError> {
        let have = self.get(resource);
        if amount > have {
            return Err(StoreArithmeticError::Underflow {
                resource,
                have,
                want: amount,
            });
        }
        let mut next = self.clone();
        if let Some(v) = next.amounts.get_mut(&resource) {
            *v -= amount;
        }
        Ok(next)
    }
}

//! Sets of states with an order-independent cached hash

use super::StateId;
use hashbrown::HashSet;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};

/// An unordered set of [`StateId`]s usable as a map key
///
/// The hash is the XOR of a mixed value per member. It is updated on every
/// insertion, so hashing a set never walks its members and two sets holding
/// the same states hash equally regardless of insertion order.
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    states: HashSet<StateId, ahash::RandomState>,
    hash: u64,
}

/// splitmix64 finalizer, spreads consecutive ids over the whole word
#[inline]
const fn mix(id: StateId) -> u64 {
    let mut z = (id.0 as u64).wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl StateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn singleton(state: StateId) -> Self {
        let mut set = Self::new();
        set.insert(state);
        set
    }

    /// Insert a state; returns true if it was not present
    pub fn insert(&mut self, state: StateId) -> bool {
        let added = self.states.insert(state);
        if added {
            self.hash ^= mix(state);
        }
        added
    }

    /// Insert every state of `other`; returns true if anything was added
    pub fn union_with(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for &state in &other.states {
            changed |= self.insert(state);
        }
        changed
    }

    #[must_use]
    pub fn contains(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }

    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.len() <= self.len() && other.states.iter().all(|s| self.states.contains(s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Members in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().copied()
    }

    /// Members ordered by id
    #[must_use]
    pub fn sorted(&self) -> SmallVec<[StateId; 8]> {
        let mut states: SmallVec<[StateId; 8]> = self.iter().collect();
        states.sort_unstable();
        states
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.len() == other.len()
            && self.states.iter().all(|s| other.states.contains(s))
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::new();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

impl Extend<StateId> for StateSet {
    fn extend<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

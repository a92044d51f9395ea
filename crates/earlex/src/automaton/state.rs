//! Automaton states

use std::fmt;

/// State ID inside one automaton
///
/// IDs are arena indices assigned in creation order by the automaton that
/// owns the state. Uses u32 which is sufficient for all practical automaton
/// sizes; conversions to usize for indexing are lossless on supported targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct StateId(pub u32);

impl StateId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A state: identity plus the start/final flags
///
/// Equality is by identity only.
#[derive(Debug, Clone, Copy)]
pub struct State {
    pub id: StateId,
    pub is_start: bool,
    pub is_final: bool,
}

impl State {
    #[must_use]
    pub const fn new(id: StateId) -> Self {
        Self {
            id,
            is_start: false,
            is_final: false,
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl std::hash::Hash for State {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

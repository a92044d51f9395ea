//! Deterministic automaton

use super::{Automaton, State, StateId};
use crate::error::NoTransition;
use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Labels of one DFA state
///
/// Subset construction can merge final states of several token types into a
/// single DFA state, so a state keeps every label it inherited.
pub type Labels = SmallVec<[CompactString; 1]>;

/// Deterministic finite automaton over `char`
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<State>,
    start: StateId,
    alphabet: BTreeSet<char>,
    transitions: HashMap<(StateId, char), StateId, ahash::RandomState>,
    names: HashMap<StateId, Labels, ahash::RandomState>,
}

impl Dfa {
    /// Create an automaton holding a single start state
    #[must_use]
    pub(crate) fn new() -> Self {
        let mut start = State::new(StateId(0));
        start.is_start = true;
        Self {
            states: vec![start],
            start: start.id,
            alphabet: BTreeSet::new(),
            transitions: HashMap::default(),
            names: HashMap::default(),
        }
    }

    pub(crate) fn add_state(&mut self) -> StateId {
        let id = StateId::from_index(self.states.len());
        self.states.push(State::new(id));
        id
    }

    pub(crate) fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.alphabet.insert(symbol);
        self.transitions.insert((from, symbol), to);
    }

    pub(crate) fn set_final(&mut self, state: StateId, labels: Labels) {
        self.states[state.index()].is_final = true;
        self.names.insert(state, labels);
    }

    #[must_use]
    pub const fn start(&self) -> StateId {
        self.start
    }

    /// Target of the edge `state ─symbol→`, if any
    #[must_use]
    pub fn transition(&self, state: StateId, symbol: char) -> Option<StateId> {
        self.transitions.get(&(state, symbol)).copied()
    }

    #[must_use]
    pub fn is_final_state(&self, state: StateId) -> bool {
        self.states[state.index()].is_final
    }

    /// Labels of `state`, empty for non-final states
    #[must_use]
    pub fn labels(&self, state: StateId) -> &[CompactString] {
        self.names.get(&state).map_or(&[], |labels| labels.as_slice())
    }

    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }

    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

impl Automaton for Dfa {
    type Configuration = StateId;

    fn initial(&self) -> StateId {
        self.start
    }

    fn trigger(&self, config: &mut StateId, symbol: char) -> Result<(), NoTransition> {
        *config = self
            .transition(*config, symbol)
            .ok_or(NoTransition { symbol })?;
        Ok(())
    }

    fn is_final(&self, config: &StateId) -> bool {
        self.is_final_state(*config)
    }

    fn name<'a>(&'a self, config: &StateId) -> SmallVec<[&'a str; 2]> {
        self.labels(*config).iter().map(CompactString::as_str).collect()
    }

    fn state_count(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_deterministic_trigger() {
        let mut dfa = Dfa::new();
        let end = dfa.add_state();
        dfa.add_transition(dfa.start(), 'a', end);
        dfa.add_transition(end, 'a', end);
        dfa.set_final(end, smallvec!["as".into()]);

        let mut config = dfa.initial();
        assert!(!dfa.is_final(&config));
        assert!(dfa.trigger(&mut config, 'a').is_ok());
        assert_eq!(config, end);
        assert_eq!(
            dfa.trigger(&mut config, 'b'),
            Err(NoTransition { symbol: 'b' })
        );
        assert_eq!(config, end);
        assert_eq!(dfa.name(&config).as_slice(), &["as"]);
        assert!(dfa.accepts("aaa"));
        assert!(!dfa.accepts(""));
        assert!(dfa.labels(dfa.start()).is_empty());
    }
}

//! Nondeterministic automaton with incrementally maintained epsilon closures

use super::{Automaton, State, StateId, StateSet};
use crate::error::NoTransition;
use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Nondeterministic finite automaton over `char`
///
/// States are stored in an arena and referenced by [`StateId`]. Every state
/// owns its epsilon closure (the state itself plus everything reachable over
/// epsilon edges alone); [`Nfa::add_epsilon`] keeps all closures transitively
/// correct as edges are added.
///
/// Methods taking a [`StateId`] expect one allocated by this automaton.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    alphabet: BTreeSet<char>,
    transitions: HashMap<(StateId, char), StateSet, ahash::RandomState>,
    epsilon: Vec<SmallVec<[StateId; 2]>>,
    closures: Vec<StateSet>,
    /// `holders[s]` is every state whose closure contains `s`
    holders: Vec<StateSet>,
    names: HashMap<StateId, CompactString, ahash::RandomState>,
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfa {
    /// Create an automaton holding a single start state
    #[must_use]
    pub fn new() -> Self {
        let mut nfa = Self {
            states: Vec::new(),
            start: StateId(0),
            alphabet: BTreeSet::new(),
            transitions: HashMap::default(),
            epsilon: Vec::new(),
            closures: Vec::new(),
            holders: Vec::new(),
            names: HashMap::default(),
        };
        let start = nfa.add_state();
        nfa.states[start.index()].is_start = true;
        nfa
    }

    /// Allocate a fresh state with the next id
    pub fn add_state(&mut self) -> StateId {
        let id = StateId::from_index(self.states.len());
        self.states.push(State::new(id));
        self.epsilon.push(SmallVec::new());
        self.closures.push(StateSet::singleton(id));
        self.holders.push(StateSet::singleton(id));
        id
    }

    #[must_use]
    pub const fn start(&self) -> StateId {
        self.start
    }

    /// Move the start flag to `state`
    ///
    /// # Panics
    ///
    /// Panics if `state` was not allocated by this automaton.
    pub fn set_start(&mut self, state: StateId) {
        self.states[self.start.index()].is_start = false;
        self.states[state.index()].is_start = true;
        self.start = state;
    }

    /// Add the edge `from ─symbol→ to`
    ///
    /// # Panics
    ///
    /// Panics if either state was not allocated by this automaton.
    pub fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        assert!(
            from.index() < self.states.len() && to.index() < self.states.len(),
            "transition {from} -> {to} refers to a state outside the automaton"
        );
        self.alphabet.insert(symbol);
        self.transitions.entry((from, symbol)).or_default().insert(to);
    }

    /// Add the epsilon edge `from → to`
    ///
    /// Every state whose closure already contains `from` gains the closure
    /// of `to`, which keeps all closures transitively closed. Only those
    /// states are visited.
    ///
    /// # Panics
    ///
    /// Panics if either state was not allocated by this automaton.
    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        assert!(
            to.index() < self.states.len(),
            "epsilon edge {from} -> {to} refers to a state outside the automaton"
        );
        if from == to || self.epsilon[from.index()].contains(&to) {
            return;
        }
        self.epsilon[from.index()].push(to);

        let target = self.closures[to.index()].sorted();
        let sources = self.holders[from.index()].sorted();
        for source in sources {
            for &state in &target {
                if self.closures[source.index()].insert(state) {
                    self.holders[state.index()].insert(source);
                }
            }
        }
    }

    /// Re-run closure propagation until nothing changes
    ///
    /// Returns true if any closure grew. On an automaton built only through
    /// [`Nfa::add_epsilon`] this is always false.
    pub fn close_epsilon(&mut self) -> bool {
        let mut changed = false;
        loop {
            let mut round = false;
            for state in 0..self.closures.len() {
                let mut grown = self.closures[state].clone();
                for member in self.closures[state].iter() {
                    for &next in &self.epsilon[member.index()] {
                        round |= grown.union_with(&self.closures[next.index()]);
                    }
                }
                self.closures[state] = grown;
            }
            if !round {
                if changed {
                    self.rebuild_holders();
                }
                return changed;
            }
            changed = true;
        }
    }

    fn rebuild_holders(&mut self) {
        for holders in &mut self.holders {
            *holders = StateSet::new();
        }
        for (index, closure) in self.closures.iter().enumerate() {
            let source = StateId::from_index(index);
            for state in closure.iter() {
                self.holders[state.index()].insert(source);
            }
        }
    }

    /// Mark `state` final and label it
    ///
    /// # Panics
    ///
    /// Panics if `state` was not allocated by this automaton.
    pub fn set_final(&mut self, state: StateId, name: impl Into<CompactString>) {
        self.states[state.index()].is_final = true;
        self.names.insert(state, name.into());
    }

    /// # Panics
    ///
    /// Panics if `state` was not allocated by this automaton.
    #[must_use]
    pub fn is_final_state(&self, state: StateId) -> bool {
        self.states[state.index()].is_final
    }

    /// Label of a final state
    #[must_use]
    pub fn name_of(&self, state: StateId) -> Option<&str> {
        self.names.get(&state).map(CompactString::as_str)
    }

    /// Epsilon closure of `state`, including `state` itself
    ///
    /// # Panics
    ///
    /// Panics if `state` was not allocated by this automaton.
    #[must_use]
    pub fn closure(&self, state: StateId) -> &StateSet {
        &self.closures[state.index()]
    }

    /// Direct targets of `state` over `symbol`
    #[must_use]
    pub fn targets(&self, state: StateId, symbol: char) -> Option<&StateSet> {
        self.transitions.get(&(state, symbol))
    }

    /// Symbols appearing on any edge, in ascending order
    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }

    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(StateSet::len).sum()
    }

    /// Closure of everything reachable from `from` over one `symbol` edge
    pub(crate) fn step(&self, from: &StateSet, symbol: char) -> StateSet {
        let mut next = StateSet::new();
        for state in from.iter() {
            if let Some(targets) = self.transitions.get(&(state, symbol)) {
                for target in targets.iter() {
                    next.union_with(&self.closures[target.index()]);
                }
            }
        }
        next
    }

    /// Labels of the final states in `set`, ordered by state id
    pub(crate) fn labels<'a>(&'a self, set: &StateSet) -> SmallVec<[&'a str; 2]> {
        set.sorted()
            .into_iter()
            .filter_map(|state| self.name_of(state))
            .collect()
    }
}

impl Automaton for Nfa {
    type Configuration = StateSet;

    fn initial(&self) -> StateSet {
        self.closure(self.start).clone()
    }

    fn trigger(&self, config: &mut StateSet, symbol: char) -> Result<(), NoTransition> {
        let next = self.step(config, symbol);
        if next.is_empty() {
            return Err(NoTransition { symbol });
        }
        *config = next;
        Ok(())
    }

    fn is_final(&self, config: &StateSet) -> bool {
        config.iter().any(|state| self.is_final_state(state))
    }

    fn name<'a>(&'a self, config: &StateSet) -> SmallVec<[&'a str; 2]> {
        self.labels(config)
    }

    fn state_count(&self) -> usize {
        self.states.len()
    }
}

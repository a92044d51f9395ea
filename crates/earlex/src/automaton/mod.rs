//! # Automaton Module
//!
//! Finite automata over `char` used to recognize tokens.
//!
//! ## Overview
//!
//! - [`Nfa`]: nondeterministic automaton with epsilon edges. Epsilon closures
//!   are kept transitively closed as edges are added, so a step never has to
//!   search the epsilon graph.
//! - [`Dfa`]: deterministic automaton produced from an [`Nfa`] by subset
//!   construction ([`Nfa::to_dfa`]).
//! - [`Automaton`]: the capability set both share. A compiled automaton is
//!   immutable; the position inside it is an explicit configuration value
//!   (a [`StateSet`] for the NFA, a single [`StateId`] for the DFA).
//! - [`Cursor`]: an automaton paired with its current configuration, which is
//!   what the lexer drives one character at a time.
//!
//! Final states carry labels (token type names). A configuration may contain
//! several final states at once, so [`Automaton::name`] returns every label;
//! choosing between them is left to the lexer.
//!
//! ## Usage
//!
//! ```rust
//! use earlex::automaton::{Automaton, Cursor, Nfa};
//!
//! // a|b
//! let mut nfa = Nfa::new();
//! let start = nfa.start();
//! let accept = nfa.add_state();
//! nfa.add_transition(start, 'a', accept);
//! nfa.add_transition(start, 'b', accept);
//! nfa.set_final(accept, "ab");
//!
//! let mut cursor = Cursor::new(&nfa);
//! cursor.trigger('a')?;
//! assert!(cursor.is_final());
//! assert_eq!(cursor.name().as_slice(), &["ab"]);
//! assert!(cursor.trigger('c').is_err());
//!
//! let dfa = nfa.to_dfa();
//! assert!(dfa.accepts("b"));
//! assert!(!dfa.accepts("ab"));
//! # Ok::<(), earlex::error::NoTransition>(())
//! ```

pub mod dfa;
pub mod nfa;
pub mod state;
pub mod state_set;
mod subset;

pub use dfa::Dfa;
pub use nfa::Nfa;
pub use state::{State, StateId};
pub use state_set::StateSet;

use crate::error::NoTransition;
use smallvec::SmallVec;
use std::fmt;

/// Operations shared by [`Nfa`] and [`Dfa`]
pub trait Automaton {
    /// Position inside the automaton
    type Configuration: Clone + fmt::Debug;

    /// Configuration before any symbol has been read
    fn initial(&self) -> Self::Configuration;

    /// Advance `config` over `symbol`
    ///
    /// # Errors
    ///
    /// Returns [`NoTransition`] when no state of `config` has an edge for
    /// `symbol`. `config` is left unchanged in that case.
    fn trigger(&self, config: &mut Self::Configuration, symbol: char) -> Result<(), NoTransition>;

    /// Whether `config` contains a final state
    fn is_final(&self, config: &Self::Configuration) -> bool;

    /// Labels of the final states in `config`, ordered by state id
    fn name<'a>(&'a self, config: &Self::Configuration) -> SmallVec<[&'a str; 2]>;

    fn state_count(&self) -> usize;

    /// Run the whole of `input` from the initial configuration
    fn accepts(&self, input: &str) -> bool {
        let mut config = self.initial();
        input.chars().all(|c| self.trigger(&mut config, c).is_ok()) && self.is_final(&config)
    }
}

/// An automaton together with its current configuration
pub struct Cursor<'a, A: Automaton> {
    automaton: &'a A,
    config: A::Configuration,
}

impl<'a, A: Automaton> Cursor<'a, A> {
    /// Create a cursor in the initial configuration
    #[must_use]
    pub fn new(automaton: &'a A) -> Self {
        Self {
            config: automaton.initial(),
            automaton,
        }
    }

    /// Reset to the initial configuration
    pub fn initial(&mut self) {
        self.config = self.automaton.initial();
    }

    /// Advance over `symbol`
    ///
    /// # Errors
    ///
    /// Returns [`NoTransition`] without moving when there is no edge for `symbol`.
    pub fn trigger(&mut self, symbol: char) -> Result<(), NoTransition> {
        self.automaton.trigger(&mut self.config, symbol)
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.automaton.is_final(&self.config)
    }

    #[must_use]
    pub fn name(&self) -> SmallVec<[&'a str; 2]> {
        self.automaton.name(&self.config)
    }

    #[must_use]
    pub const fn configuration(&self) -> &A::Configuration {
        &self.config
    }

    #[must_use]
    pub const fn automaton(&self) -> &'a A {
        self.automaton
    }
}

impl<A: Automaton> Clone for Cursor<'_, A> {
    fn clone(&self) -> Self {
        Self {
            automaton: self.automaton,
            config: self.config.clone(),
        }
    }
}

impl<A: Automaton> fmt::Debug for Cursor<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

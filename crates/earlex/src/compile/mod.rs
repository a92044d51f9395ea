//! # Compile Module
//!
//! Turns token definitions into one automaton.
//!
//! Every expression is converted to postfix, reduced on a [`MachineStack`]
//! and labelled with its token type name. The fragments are then united into
//! a single [`Nfa`], optionally determinized.
//!
//! ```rust
//! use earlex::automaton::Automaton;
//! use earlex::compile::LexisBuilder;
//!
//! let lexis = LexisBuilder::new()
//!     .token("number", "[0-9]+")
//!     .token("word", "[a-z]+")
//!     .build_dfa()?;
//! assert!(lexis.automaton().accepts("123"));
//! assert!(!lexis.automaton().accepts("12a"));
//! # Ok::<(), earlex::error::InvalidRegex>(())
//! ```

pub mod machine_stack;

pub use machine_stack::{Fragment, MachineStack};

use crate::automaton::{Automaton, Dfa, Nfa};
use crate::error::InvalidRegex;
use crate::lexer::{Lexer, TokenDefinition, TokenTypes};
use tracing::debug;

/// A compiled lexis: the recognizing automaton and per type metadata
#[derive(Debug, Clone)]
pub struct Lexis<A: Automaton = Nfa> {
    automaton: A,
    types: TokenTypes,
}

impl<A: Automaton> Lexis<A> {
    #[must_use]
    pub const fn new(automaton: A, types: TokenTypes) -> Self {
        Self { automaton, types }
    }

    /// A lexer borrowing this lexis, with an empty source
    #[must_use]
    pub fn lexer(&self) -> Lexer<'_, A> {
        Lexer::new(&self.automaton, &self.types)
    }

    #[must_use]
    pub const fn automaton(&self) -> &A {
        &self.automaton
    }

    #[must_use]
    pub const fn types(&self) -> &TokenTypes {
        &self.types
    }
}

impl Lexis<Nfa> {
    /// Same lexis over the equivalent DFA
    #[must_use]
    pub fn determinize(&self) -> Lexis<Dfa> {
        Lexis::new(self.automaton.to_dfa(), self.types.clone())
    }
}

/// Collects token definitions and compiles them
#[derive(Debug, Clone, Default)]
pub struct LexisBuilder {
    definitions: Vec<TokenDefinition>,
}

impl LexisBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required token type with precedence 0
    #[must_use]
    pub fn token(self, name: &str, expression: &str) -> Self {
        self.definition(TokenDefinition::new(name, expression))
    }

    #[must_use]
    pub fn definition(mut self, definition: TokenDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    #[must_use]
    pub fn definitions(mut self, definitions: impl IntoIterator<Item = TokenDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Compile into an NFA-backed lexis
    ///
    /// # Errors
    ///
    /// Returns the [`InvalidRegex`] of the first malformed expression.
    pub fn build(self) -> Result<Lexis<Nfa>, InvalidRegex> {
        let mut stack = MachineStack::new();
        for definition in &self.definitions {
            stack.add_expression(definition.name.clone(), &definition.expression)?;
        }
        let nfa = stack.build();
        let types: TokenTypes = self.definitions.iter().collect();

        debug!(
            definitions = self.definitions.len(),
            token_types = types.len(),
            nfa_states = nfa.state_count(),
            alphabet = nfa.alphabet().count(),
            "lexis compiled"
        );
        Ok(Lexis::new(nfa, types))
    }

    /// Compile, then determinize
    ///
    /// # Errors
    ///
    /// Returns the [`InvalidRegex`] of the first malformed expression.
    pub fn build_dfa(self) -> Result<Lexis<Dfa>, InvalidRegex> {
        self.build().map(|lexis| lexis.determinize())
    }
}

/// Compile `definitions` into an NFA-backed lexis
///
/// # Errors
///
/// Returns the [`InvalidRegex`] of the first malformed expression.
pub fn compile_lexis(
    definitions: impl IntoIterator<Item = TokenDefinition>,
) -> Result<Lexis<Nfa>, InvalidRegex> {
    LexisBuilder::new().definitions(definitions).build()
}

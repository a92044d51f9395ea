use crate::error::GrammarError;
use compact_str::CompactString;
use lasso::Spur;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix that marks a terminal in textual productions
pub const TERMINAL_PREFIX: char = '$';

/// A grammar symbol
///
/// Terminals name a token type of the lexis; nonterminals name a rule of the
/// grammar. The textual form used by [`GrammarBuilder::rule`](super::GrammarBuilder::rule)
/// prefixes terminals with `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Symbol {
    Terminal(CompactString),
    NonTerminal(CompactString),
}

impl Symbol {
    #[must_use]
    pub fn terminal(name: impl Into<CompactString>) -> Self {
        Self::Terminal(name.into())
    }

    #[must_use]
    pub fn non_terminal(name: impl Into<CompactString>) -> Self {
        Self::NonTerminal(name.into())
    }

    /// Parse the textual form: `$name` is a terminal, `name` a nonterminal
    ///
    /// # Errors
    ///
    /// [`GrammarError::InvalidSymbol`] for an empty name.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let (symbol, name) = match text.strip_prefix(TERMINAL_PREFIX) {
            Some(name) => (Self::terminal(name), name),
            None => (Self::non_terminal(text), text),
        };
        if name.trim().is_empty() {
            return Err(GrammarError::InvalidSymbol {
                symbol: text.into(),
            });
        }
        Ok(symbol)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Terminal(name) | Self::NonTerminal(name) => name,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(name) => write!(f, "{TERMINAL_PREFIX}{name}"),
            Self::NonTerminal(name) => f.write_str(name),
        }
    }
}

/// Interned form of [`Symbol`] used inside a built grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SymbolId {
    Terminal(Spur),
    NonTerminal(Spur),
}

//! In-memory grammar description, as handed over by a loader

use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A start symbol and an ordered list of productions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct GrammarDefinition {
    pub start: CompactString,
    pub rules: Vec<RuleDefinition>,
}

/// One production: `name → production`
///
/// Symbols starting with `$` are terminals, the rest nonterminals. An empty
/// production derives the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct RuleDefinition {
    pub name: CompactString,
    #[cfg_attr(feature = "serialize", serde(default))]
    pub production: Vec<CompactString>,
}

impl RuleDefinition {
    #[must_use]
    pub fn new<I, S>(name: impl Into<CompactString>, production: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self {
            name: name.into(),
            production: production.into_iter().map(Into::into).collect(),
        }
    }
}

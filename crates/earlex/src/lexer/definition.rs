//! In-memory lexis description

use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// One token type of a lexis: a name, its regular expression and how the
/// lexer treats matches
///
/// # Example
///
/// ```rust
/// use earlex::lexer::TokenDefinition;
///
/// let keyword = TokenDefinition::new("keyword", "if|else").with_precedence(1);
/// let blank = TokenDefinition::new("whitespace", "\\s+").omitted();
/// assert_eq!(keyword.precedence, 1);
/// assert!(blank.omit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TokenDefinition {
    /// Token type name, referenced by grammars as `$name`
    pub name: CompactString,
    /// Regular expression recognizing the token
    pub expression: CompactString,
    /// Higher wins when several types match the same text
    #[cfg_attr(feature = "serialize", serde(default))]
    pub precedence: i32,
    /// Tokens of this type are produced but flagged as not required
    #[cfg_attr(feature = "serialize", serde(default))]
    pub omit: bool,
}

impl TokenDefinition {
    #[must_use]
    pub fn new(name: impl Into<CompactString>, expression: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            precedence: 0,
            omit: false,
        }
    }

    #[must_use]
    pub const fn with_precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Mark matches as not required by the parser
    #[must_use]
    pub const fn omitted(mut self) -> Self {
        self.omit = true;
        self
    }
}

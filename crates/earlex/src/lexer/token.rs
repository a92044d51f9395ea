use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token produced by the lexer.
///
/// Tokens are the unit exchanged between the lexer and the parser. Each one
/// records where it starts in the source (1-based line and column), the
/// token type that recognized it, the matched text, and whether the parser
/// needs it. Tokens of types defined with `omit` (whitespace, comments) are
/// produced with `required == false`.
///
/// # Example
///
/// ```rust
/// use earlex::lexer::Token;
///
/// let token = Token::new(1, 5, "number", "111", true);
/// assert_eq!(token.to_string(), "[Ln 1, Col 5] <number>: <111>");
/// assert!(token.is_type("number"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Token {
    /// Line of the first character, starting at 1
    pub line: u32,
    /// Column of the first character, starting at 1
    pub column: u32,
    /// Name of the token type that recognized the text
    pub token_type: CompactString,
    /// The matched source text
    pub value: CompactString,
    /// Whether the parser should see this token
    pub required: bool,
}

impl Token {
    #[must_use]
    pub fn new(
        line: u32,
        column: u32,
        token_type: impl Into<CompactString>,
        value: impl Into<CompactString>,
        required: bool,
    ) -> Self {
        Self {
            line,
            column,
            token_type: token_type.into(),
            value: value.into(),
            required,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_type(&self, token_type: &str) -> bool {
        self.token_type == token_type
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Ln {}, Col {}] <{}>: <{}>",
            self.line, self.column, self.token_type, self.value
        )
    }
}

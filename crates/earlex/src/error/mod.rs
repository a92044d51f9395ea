//! # Error Types
//!
//! Errors raised while compiling regular expressions, scanning source text,
//! building grammars and running the Earley parser.
//!
//! ## Overview
//!
//! Every stage owns its error type:
//!
//! - [`InvalidRegex`]: malformed token expression (brackets, ranges, operands)
//! - [`NoTransition`]: automaton has no edge for a symbol; used internally by the lexer
//! - [`LexError`]: unknown token or source ending in the middle of a token
//! - [`GrammarError`]: undefined start symbol, undefined nonterminals, unknown terminals
//! - [`ParseError`]: no valid continuation for the token sequence
//!
//! [`Error`] wraps all of them so a whole pipeline can be driven with `?`.
//!
//! ## Usage
//!
//! ```rust
//! use earlex::error::{Error, ParseError};
//! use earlex::lexer::{LexisBuilder, TokenDefinition};
//! use earlex::grammar::GrammarBuilder;
//! use earlex::earley::EarleyParser;
//!
//! # fn main() -> earlex::Result<()> {
//! let lexis = LexisBuilder::new()
//!     .definition(TokenDefinition::new("number", "[0-9]+"))
//!     .definition(TokenDefinition::new("plus", "\\+"))
//!     .build()?;
//! let grammar = GrammarBuilder::new()
//!     .start("Sum")
//!     .rule("Sum", ["$number", "$plus", "$number"])
//!     .build()?;
//!
//! let mut lexer = lexis.lexer();
//! lexer.set_source("1+");
//! let result = EarleyParser::new(&grammar).parse(lexer.required());
//! match result {
//!     Err(Error::Parse(ParseError::SequenceSyntax { expected, found: None })) => {
//!         assert_eq!(expected, ["number"]);
//!     }
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! and carry stable diagnostic codes.

pub mod diagnostics;

use crate::lexer::Token;
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Convenience alias for results carrying the crate-wide [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any error produced by the lexing and parsing pipeline.
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum Error {
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Regex(#[from] InvalidRegex),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Parse(#[from] ParseError),
}

impl Error {
    /// Render with a source snippet when the error points into `source`
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self {
            Self::Lex(err) => err.render(source),
            Self::Parse(err) => err.render(source),
            Self::Regex(_) | Self::Grammar(_) => self.to_string(),
        }
    }
}

/// A token expression that cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(
    feature = "diagnostics",
    diagnostic(code(regex::invalid), help("escape metacharacters with '\\'"))
)]
#[error("invalid regex `{pattern}`: {kind}")]
pub struct InvalidRegex {
    pub pattern: CompactString,
    #[source]
    pub kind: RegexErrorKind,
}

impl InvalidRegex {
    #[must_use]
    pub fn new(pattern: impl Into<CompactString>, kind: RegexErrorKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
        }
    }
}

/// Reasons a regular expression is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexErrorKind {
    #[error("regex cannot be empty")]
    Empty,

    #[error("bad brackets sequence")]
    BadBrackets,

    #[error("empty character class")]
    EmptyClass,

    #[error("invalid characters range '{from}'-'{to}'")]
    InvalidRange { from: char, to: char },

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("escape character at end of pattern")]
    DanglingEscape,

    #[error("operator '{operator}' is missing an operand")]
    MissingOperand { operator: char },

    #[error("{count} operands are not joined by any operator")]
    DanglingOperands { count: usize },
}

/// The automaton has no outgoing edge for `symbol` from its current configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no transition on {symbol:?}")]
pub struct NoTransition {
    pub symbol: char,
}

/// Errors raised while scanning source text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexError {
    #[error("unknown token `{text}` at line {line}, column {column} (no transition on {found:?})")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(lexer::unknown_token), help("no token type matches this text"))
    )]
    UnknownToken {
        /// Text consumed by the failed scan
        text: CompactString,
        /// Character that had no transition; it is part of `text` only when
        /// nothing else had been accumulated
        found: char,
        line: u32,
        column: u32,
    },

    #[error("unexpected end of source after `{text}` at line {line}, column {column}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unexpected_eof)))]
    UnexpectedEndOfSource {
        text: CompactString,
        line: u32,
        column: u32,
    },
}

impl LexError {
    /// Position of the first character of the rejected text
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        match self {
            Self::UnknownToken { line, column, .. } | Self::UnexpectedEndOfSource { line, column, .. } => {
                (*line, *column)
            }
        }
    }

    /// Render this error followed by the offending source line and a caret
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        let (line, column) = self.position();
        diagnostics::render_with_snippet(&self.to_string(), source, line, column)
    }
}

/// Errors raised while constructing a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("grammar has no start symbol")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::missing_start)))]
    MissingStart,

    #[error("start symbol `{name}` has no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::undefined_start)))]
    UndefinedStart { name: CompactString },

    #[error("nonterminal `{name}` referenced by `{referenced_by}` has no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::undefined_nonterminal)))]
    UndefinedNonTerminal {
        name: CompactString,
        referenced_by: CompactString,
    },

    #[error("terminal `{name}` is not defined by the lexis{}", suggestion_suffix(.suggestion.as_deref()))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::unknown_terminal)))]
    UnknownTerminal {
        name: CompactString,
        suggestion: Option<CompactString>,
    },

    #[error("invalid grammar symbol `{symbol}`")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::invalid_symbol)))]
    InvalidSymbol { symbol: CompactString },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean `{s}`?)"))
}

/// Errors raised by the Earley parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    /// No item in the chart can continue with the next token
    #[error("{}", sequence_message(.expected, .found.as_ref()))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::sequence_syntax)))]
    SequenceSyntax {
        /// Terminals that would have continued the parse, sorted and deduplicated
        expected: Vec<CompactString>,
        /// Offending token, `None` at end of input
        found: Option<Token>,
    },

    /// Internal invariant violation or a rejected configuration limit
    #[error("syntax error: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::syntax)))]
    Syntax { message: String },
}

fn sequence_message(expected: &[CompactString], found: Option<&Token>) -> String {
    let expected = format_expected_list(expected);
    match found {
        Some(token) => format!(
            "unexpected {} `{}` at line {}, column {}; expected {expected}",
            token.token_type, token.value, token.line, token.column
        ),
        None => format!("unexpected end of input; expected {expected}"),
    }
}

impl ParseError {
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Terminals expected at the failure point, empty for [`ParseError::Syntax`]
    #[must_use]
    pub fn expected(&self) -> &[CompactString] {
        match self {
            Self::SequenceSyntax { expected, .. } => expected,
            Self::Syntax { .. } => &[],
        }
    }

    /// Render this error with the source line of the offending token, if any
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self {
            Self::SequenceSyntax {
                found: Some(token), ..
            } => diagnostics::render_with_snippet(&self.to_string(), source, token.line, token.column),
            _ => self.to_string(),
        }
    }
}

/// Format a list of expected terminals as a human-readable string
#[must_use]
pub fn format_expected_list(expected: &[CompactString]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [one] => format!("`{one}`"),
        [a, b] => format!("`{a}` or `{b}`"),
        [init @ .., last] => {
            let mut result = init
                .iter()
                .map(|e| format!("`{e}`"))
                .collect::<Vec<_>>()
                .join(", ");
            result.push_str(", or `");
            result.push_str(last);
            result.push('`');
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_expected_list() {
        assert_eq!(format_expected_list(&[]), "nothing");
        assert_eq!(format_expected_list(&["a".into()]), "`a`");
        assert_eq!(format_expected_list(&["a".into(), "b".into()]), "`a` or `b`");
        assert_eq!(
            format_expected_list(&["a".into(), "b".into(), "c".into()]),
            "`a`, `b`, or `c`"
        );
    }

    #[test]
    fn test_sequence_syntax_message() {
        let error = ParseError::SequenceSyntax {
            expected: vec![")".into(), "type".into()],
            found: Some(Token::new(1, 12, "{", "{", true)),
        };
        assert_eq!(
            error.to_string(),
            "unexpected { `{` at line 1, column 12; expected `)` or `type`"
        );

        let eof = ParseError::SequenceSyntax {
            expected: vec!["number".into()],
            found: None,
        };
        assert_eq!(eof.to_string(), "unexpected end of input; expected `number`");
    }

    #[test]
    fn test_unknown_terminal_suggestion() {
        let error = GrammarError::UnknownTerminal {
            name: "identifer".into(),
            suggestion: Some("identifier".into()),
        };
        assert_eq!(
            error.to_string(),
            "terminal `identifer` is not defined by the lexis (did you mean `identifier`?)"
        );
    }

    #[test]
    fn test_error_conversion() {
        let error: Error = InvalidRegex::new("", RegexErrorKind::Empty).into();
        assert!(matches!(error, Error::Regex(_)));
        assert_eq!(error.to_string(), "invalid regex ``: regex cannot be empty");
    }
}

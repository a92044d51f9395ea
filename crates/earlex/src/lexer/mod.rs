//! # Lexer Module
//!
//! Tokenization of source text with a compiled lexis.
//!
//! ## Overview
//!
//! - [`TokenDefinition`]: one token type as supplied by the caller (name,
//!   regular expression, precedence, omit flag).
//! - [`TokenTypes`]: per type metadata kept after compilation, used to pick
//!   a winner when several types match the same text.
//! - [`Lexer`]: the pull tokenizer. It reads the longest text the automaton
//!   can follow and produces one [`Token`] per call.
//! - [`Token`]: position, type, text and the `required` flag.
//!
//! Types defined with `omit` still produce tokens, flagged with
//! `required == false`; [`Lexer::required`] filters them out.
//!
//! ## Usage
//!
//! ```rust
//! use earlex::lexer::TokenDefinition;
//! use earlex::compile::LexisBuilder;
//!
//! let lexis = LexisBuilder::new()
//!     .token("identifier", "[a-z]+")
//!     .token("number", "[0-9]+")
//!     .token("operator", "=|;")
//!     .definition(TokenDefinition::new("whitespace", "\\s+").omitted())
//!     .build()?;
//!
//! let mut lexer = lexis.lexer();
//! lexer.set_source("var 111 = 222;");
//! let values: Vec<_> = lexer
//!     .required()
//!     .map(|token| token.map(|t| t.value))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(values, ["var", "111", "=", "222", ";"]);
//! # Ok::<(), earlex::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! [`LexError::UnknownToken`](crate::error::LexError::UnknownToken) is
//! returned when a character can neither extend the current text nor start
//! a new token after a complete one.
//! [`LexError::UnexpectedEndOfSource`](crate::error::LexError::UnexpectedEndOfSource)
//! is returned when the source stops in the middle of a token. Both leave
//! the lexer past the offending text, so iteration can continue.

pub mod definition;
pub mod driver;
pub mod token;
pub mod types;

pub use definition::TokenDefinition;
pub use driver::{Lexer, LexerState};
pub use token::Token;
pub use types::{TokenType, TokenTypes};
pub use crate::compile::{Lexis, LexisBuilder, compile_lexis};

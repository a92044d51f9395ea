//! # Earley Module
//!
//! Chart parsing for arbitrary context-free grammars, with a forest that
//! keeps every derivation of ambiguous input.
//!
//! ## Overview
//!
//! The chart has one column per position in the token stream. Column `i` is
//! processed until no item is added: items expecting a nonterminal predict
//! its productions, completed items advance the items that waited for them.
//! Items expecting the current token's type are then scanned into column
//! `i + 1`. Tokens are pulled from the input only when the previous column
//! is finished, so a [`Lexer`](crate::lexer::Lexer) can feed the parser
//! directly.
//!
//! Predicting a nonterminal that derives the empty string also moves the
//! predicting item past it, so empty productions complete without
//! revisiting a column.
//!
//! After acceptance the chart is walked back into a [`ParseNode`] forest:
//! a node's `children` is one derivation and `alternatives` lists the other
//! derivations of the same symbol over the same tokens.
//!
//! ## Usage
//!
//! ```rust
//! use earlex::earley::{EarleyConfig, EarleyParser};
//! use earlex::grammar::GrammarBuilder;
//! use earlex::lexer::LexisBuilder;
//!
//! let lexis = LexisBuilder::new()
//!     .token("number", "[0-9]+")
//!     .token("plus", "\\+")
//!     .token("times", "\\*")
//!     .build()?;
//! let grammar = GrammarBuilder::new()
//!     .start("E")
//!     .rule("E", ["E", "$plus", "E"])
//!     .rule("E", ["E", "$times", "E"])
//!     .rule("E", ["$number"])
//!     .build()?;
//!
//! let mut lexer = lexis.lexer();
//! lexer.set_source("2+3*4");
//! let parser = EarleyParser::with_config(&grammar, EarleyConfig::new());
//! let forest = parser.parse(lexer.required())?;
//! assert_eq!(forest.derivations().count(), 2);
//! # Ok::<(), earlex::Error>(())
//! ```

pub mod chart;
mod config;
mod forest;
mod parser;

pub use chart::{Chart, ChartColumn, EarleyItem};
pub use config::EarleyConfig;
pub use forest::ParseNode;
pub use parser::{EarleyParser, Recognition};

//! # Earlex
//!
//! A compiler front-end toolkit: regular expressions compiled to finite
//! automata, a maximal-munch lexer driven by them, and an Earley parser that
//! keeps every derivation of ambiguous input.
//!
//! ## Overview
//!
//! - **Regex compiler**: token expressions are converted to postfix and
//!   reduced with Thompson's construction into one shared NFA, optionally
//!   determinized by subset construction.
//! - **Lexer**: a pull tokenizer with line/column tracking and
//!   precedence-based resolution when several token types match.
//! - **Earley parser**: handles any context-free grammar, including left
//!   recursive, ambiguous and empty productions, and pulls tokens lazily.
//! - **Parse forest**: shared nodes, each with one primary derivation and an
//!   explicit list of alternatives.
//!
//! ## Quick Start
//!
//! ```rust
//! use earlex::compile::LexisBuilder;
//! use earlex::earley::EarleyParser;
//! use earlex::grammar::GrammarBuilder;
//! use earlex::lexer::TokenDefinition;
//!
//! // 1. Token types, tried together; whitespace is produced but not required
//! let lexis = LexisBuilder::new()
//!     .token("number", "[0-9]+")
//!     .token("plus", "\\+")
//!     .token("times", "\\*")
//!     .definition(TokenDefinition::new("whitespace", "\\s+").omitted())
//!     .build()?;
//!
//! // 2. An ambiguous grammar; `$` marks terminals
//! let grammar = GrammarBuilder::new()
//!     .start("E")
//!     .rule("E", ["E", "$plus", "E"])
//!     .rule("E", ["E", "$times", "E"])
//!     .rule("E", ["$number"])
//!     .build()?;
//! grammar.check_terminals(lexis.types())?;
//!
//! // 3. The parser pulls tokens from the lexer one at a time
//! let mut lexer = lexis.lexer();
//! lexer.set_source("2 + 3 * 4");
//! let forest = EarleyParser::new(&grammar).parse(&mut lexer)?;
//!
//! // (2 + 3) * 4 and 2 + (3 * 4)
//! assert!(forest.is_ambiguous());
//! assert_eq!(forest.tree_count(), 2);
//! # Ok::<(), earlex::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`regex`] - Infix to postfix conversion of token expressions
//! - [`automaton`] - NFA, DFA and subset construction
//! - [`compile`] - Thompson construction and lexis compilation
//! - [`lexer`] - Tokens and the maximal-munch lexer
//! - [`grammar`] - Grammar definition and validation
//! - [`earley`] - Chart parser and parse forest
//! - [`error`] - Error types and diagnostics
//!
//! ## Feature Flags
//!
//! - `diagnostics`: errors implement `miette::Diagnostic`
//! - `serialize`: token and grammar descriptions implement serde traits

pub mod automaton;
pub mod compile;
pub mod earley;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod pipeline;
pub mod regex;

pub use automaton::{Automaton, Dfa, Nfa};
pub use compile::{Lexis, LexisBuilder, compile_lexis};
pub use earley::{EarleyConfig, EarleyParser, ParseNode};
pub use error::{Error, Result};
pub use grammar::{Grammar, GrammarBuilder, Symbol};
pub use lexer::{Lexer, Token, TokenDefinition};
pub use pipeline::Pipeline;

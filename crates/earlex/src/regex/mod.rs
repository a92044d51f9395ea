//! # Regex Module
//!
//! Regular expressions for token definitions.
//!
//! The dialect is deliberately small: concatenation (implicit, or explicit
//! with `.`), alternation `|`, the postfix operators `*`, `+` and `?`,
//! grouping with parentheses, bracket classes such as `[a-z_]`, and `\`
//! escapes. The escape codes `n`, `t`, `s`, `r` and `v` stand for newline,
//! tab, space, carriage return and vertical tab; any other escaped
//! character stands for itself.
//!
//! Expressions are converted to [`Postfix`] form and then reduced into an
//! automaton by [`crate::compile::MachineStack`].

pub mod postfix;

pub use postfix::{Postfix, PostfixToken, is_metacharacter, to_postfix, unescape};

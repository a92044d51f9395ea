//! # Grammar Module
//!
//! Context-free grammars for the Earley parser.
//!
//! ## Overview
//!
//! A [`Grammar`] maps nonterminals to ordered lists of productions and
//! records a start symbol. It is built once through a [`GrammarBuilder`],
//! validated, and immutable afterwards; symbol names are interned, so a
//! grammar can be shared across threads and parses by reference.
//!
//! - [`Symbol`]: terminal (a lexis token type) or nonterminal
//! - [`DottedRule`]: a production with a dot and an origin column, the
//!   Earley item
//! - [`GrammarDefinition`]: the in-memory description a loader hands over
//!
//! ## Usage
//!
//! ```rust
//! use earlex::grammar::GrammarBuilder;
//!
//! let grammar = GrammarBuilder::new()
//!     .start("E")
//!     .rule("E", ["E", "$plus", "E"])
//!     .rule("E", ["$number"])
//!     .build()?;
//!
//! assert_eq!(grammar.start(), "E");
//! assert_eq!(grammar.productions_of("E").count(), 2);
//! assert_eq!(grammar.to_string(), "E → E $plus E\nE → $number\n");
//! # Ok::<(), earlex::error::GrammarError>(())
//! ```

pub mod analysis;
pub mod builder;
pub mod definition;
pub mod symbol;
mod validate;

pub use builder::GrammarBuilder;
pub use definition::{GrammarDefinition, RuleDefinition};
pub use symbol::{Symbol, TERMINAL_PREFIX};

pub(crate) use symbol::SymbolId;

use hashbrown::{HashMap, HashSet};
use lasso::{RodeoReader, Spur};
use smallvec::SmallVec;
use std::fmt;

/// Index of a production inside its [`Grammar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One production `lhs → rhs`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub(crate) lhs: Spur,
    pub(crate) rhs: SmallVec<[SymbolId; 4]>,
}

impl Rule {
    /// Number of symbols on the right-hand side
    #[must_use]
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// Whether this is an empty production
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// A validated context-free grammar
#[derive(Debug)]
pub struct Grammar {
    names: RodeoReader,
    start: Spur,
    rules: Vec<Rule>,
    by_lhs: HashMap<Spur, SmallVec<[RuleId; 4]>, ahash::RandomState>,
    /// Nonterminals in order of their first production
    non_terminals: Vec<Spur>,
    nullable: HashSet<Spur, ahash::RandomState>,
}

impl Grammar {
    #[must_use]
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// Name of the start nonterminal
    #[must_use]
    pub fn start(&self) -> &str {
        self.names.resolve(&self.start)
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        (0..self.rules.len()).map(RuleId)
    }

    /// Name of the nonterminal `id` defines
    #[must_use]
    pub fn lhs(&self, id: RuleId) -> Option<&str> {
        self.rule(id).map(|rule| self.resolve(rule.lhs))
    }

    /// Right-hand side of `id`
    #[must_use]
    pub fn symbols(&self, id: RuleId) -> Vec<Symbol> {
        self.rule(id)
            .map(|rule| rule.rhs.iter().map(|&s| self.symbol(s)).collect())
            .unwrap_or_default()
    }

    /// Productions of `name` as fresh items: dot 0, origin 0
    pub fn productions_of<'g>(
        &'g self,
        name: &str,
    ) -> impl Iterator<Item = DottedRule> + use<'g> {
        self.names
            .get(name)
            .map(|key| self.rules_of(key))
            .unwrap_or_default()
            .iter()
            .map(|&rule| DottedRule::new(rule, 0, 0))
    }

    /// Whether `name` derives the empty string
    #[must_use]
    pub fn is_nullable(&self, name: &str) -> bool {
        self.names
            .get(name)
            .is_some_and(|key| self.nullable.contains(&key))
    }

    /// Nonterminal names in order of their first production
    #[must_use]
    pub fn non_terminals(&self) -> Vec<&str> {
        self.non_terminals.iter().map(|&key| self.resolve(key)).collect()
    }

    /// Terminal names referenced by any production, sorted
    #[must_use]
    pub fn terminals(&self) -> Vec<&str> {
        let mut terminals: Vec<&str> = self
            .rules
            .iter()
            .flat_map(|rule| rule.rhs.iter())
            .filter_map(|&symbol| match symbol {
                SymbolId::Terminal(key) => Some(self.resolve(key)),
                SymbolId::NonTerminal(_) => None,
            })
            .collect();
        terminals.sort_unstable();
        terminals.dedup();
        terminals
    }

    pub(crate) const fn start_key(&self) -> Spur {
        self.start
    }

    pub(crate) fn key(&self, name: &str) -> Option<Spur> {
        self.names.get(name)
    }

    pub(crate) fn resolve(&self, key: Spur) -> &str {
        self.names.resolve(&key)
    }

    pub(crate) fn symbol(&self, symbol: SymbolId) -> Symbol {
        match symbol {
            SymbolId::Terminal(key) => Symbol::terminal(self.resolve(key)),
            SymbolId::NonTerminal(key) => Symbol::non_terminal(self.resolve(key)),
        }
    }

    pub(crate) fn rules_of(&self, lhs: Spur) -> &[RuleId] {
        self.by_lhs.get(&lhs).map_or(&[], |rules| rules.as_slice())
    }

    pub(crate) fn is_nullable_key(&self, key: Spur) -> bool {
        self.nullable.contains(&key)
    }

    pub(crate) fn next_symbol(&self, item: &DottedRule) -> Option<SymbolId> {
        self.rules.get(item.rule.0)?.rhs.get(item.dot).copied()
    }

    pub(crate) fn lhs_key(&self, rule: RuleId) -> Option<Spur> {
        self.rules.get(rule.0).map(|rule| rule.lhs)
    }

    fn write_symbols(
        &self,
        f: &mut fmt::Formatter<'_>,
        rule: &Rule,
        dot: Option<usize>,
    ) -> fmt::Result {
        write!(f, "{} →", self.resolve(rule.lhs))?;
        if rule.rhs.is_empty() && dot.is_none() {
            return f.write_str(" ε");
        }
        for (position, &symbol) in rule.rhs.iter().enumerate() {
            if dot == Some(position) {
                f.write_str(" •")?;
            }
            write!(f, " {}", self.symbol(symbol))?;
        }
        if dot == Some(rule.rhs.len()) {
            f.write_str(" •")?;
        }
        Ok(())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            self.write_symbols(f, rule, None)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A production with a dot and the column its recognition started in
///
/// Equality covers all three fields; the same production at the same dot
/// started at two positions is two distinct items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DottedRule {
    pub rule: RuleId,
    pub dot: usize,
    pub origin: usize,
}

impl DottedRule {
    #[must_use]
    pub const fn new(rule: RuleId, dot: usize, origin: usize) -> Self {
        Self { rule, dot, origin }
    }

    /// Same production started at `origin`
    #[must_use]
    pub const fn at(self, origin: usize) -> Self {
        Self { origin, ..self }
    }

    /// Move the dot over one symbol
    #[must_use]
    pub const fn advance(self) -> Self {
        Self {
            dot: self.dot + 1,
            ..self
        }
    }

    /// Symbol right after the dot
    #[must_use]
    pub fn next_symbol(&self, grammar: &Grammar) -> Option<Symbol> {
        grammar.next_symbol(self).map(|s| grammar.symbol(s))
    }

    #[must_use]
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        grammar.rule(self.rule).is_none_or(|rule| self.dot >= rule.len())
    }

    /// `A → x • y, origin`
    #[must_use]
    pub const fn display<'g>(&self, grammar: &'g Grammar) -> DisplayDottedRule<'g> {
        DisplayDottedRule {
            item: *self,
            grammar,
        }
    }
}

/// [`Display`](fmt::Display) adapter returned by [`DottedRule::display`]
#[derive(Debug, Clone, Copy)]
pub struct DisplayDottedRule<'g> {
    item: DottedRule,
    grammar: &'g Grammar,
}

impl fmt::Display for DisplayDottedRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.grammar.rule(self.item.rule) {
            Some(rule) => {
                self.grammar.write_symbols(f, rule, Some(self.item.dot))?;
                write!(f, ", {}", self.item.origin)
            }
            None => write!(f, "<rule {}>, {}", self.item.rule.0, self.item.origin),
        }
    }
}

//! # Grammar Analysis
//!
//! Properties of a grammar computed once when it is built.

use super::{Grammar, SymbolId};
use hashbrown::HashSet;
use lasso::Spur;

/// Nonterminals that derive the empty string
///
/// Fixed point: a nonterminal is nullable when one of its productions
/// consists only of nullable nonterminals. Empty productions seed the set.
pub(super) fn nullable_set(grammar: &Grammar) -> HashSet<Spur, ahash::RandomState> {
    let mut nullable: HashSet<Spur, ahash::RandomState> = HashSet::default();
    let mut changed = true;
    while changed {
        changed = false;
        for rule in &grammar.rules {
            if nullable.contains(&rule.lhs) {
                continue;
            }
            let derives_empty = rule.rhs.iter().all(|symbol| match symbol {
                SymbolId::NonTerminal(key) => nullable.contains(key),
                SymbolId::Terminal(_) => false,
            });
            if derives_empty {
                nullable.insert(rule.lhs);
                changed = true;
            }
        }
    }
    nullable
}

//! Chart data structure for the Earley parser

use crate::grammar::{DottedRule, Grammar, SymbolId};
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use lasso::Spur;
use smallvec::SmallVec;

/// An Earley item: a dotted rule with its origin column
pub type EarleyItem = DottedRule;

type Positions = SmallVec<[usize; 4]>;

/// One set of the chart
///
/// Items are kept in insertion order and deduplicated. Three indexes point
/// back into the item list: by left-hand side, by the symbol after the dot
/// and, for completed items, by left-hand side again.
#[derive(Debug, Clone, Default)]
pub struct ChartColumn {
    items: Vec<EarleyItem>,
    seen: HashSet<EarleyItem, ahash::RandomState>,
    by_lhs: HashMap<Spur, Positions, ahash::RandomState>,
    by_next: HashMap<SymbolId, Positions, ahash::RandomState>,
    completed: HashMap<Spur, Positions, ahash::RandomState>,
}

impl ChartColumn {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless already present; returns whether it was added
    pub fn push(&mut self, item: EarleyItem, grammar: &Grammar) -> bool {
        let Some(lhs) = grammar.lhs_key(item.rule) else {
            return false;
        };
        if !self.seen.insert(item) {
            return false;
        }

        let position = self.items.len();
        self.items.push(item);
        self.by_lhs.entry(lhs).or_default().push(position);
        match grammar.next_symbol(&item) {
            Some(symbol) => self.by_next.entry(symbol).or_default().push(position),
            None => self.completed.entry(lhs).or_default().push(position),
        }
        true
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&EarleyItem> {
        self.items.get(position)
    }

    #[must_use]
    pub fn contains(&self, item: &EarleyItem) -> bool {
        self.seen.contains(item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EarleyItem> {
        self.items.iter()
    }

    /// Items whose left-hand side is the nonterminal `name`, complete or not
    pub fn items_of<'c>(
        &'c self,
        grammar: &Grammar,
        name: &str,
    ) -> impl Iterator<Item = &'c EarleyItem> + use<'c> {
        self.select(grammar.key(name).and_then(|lhs| self.by_lhs.get(&lhs)))
    }

    /// Items whose dot stands right before `symbol`
    pub(crate) fn waiting_on(&self, symbol: SymbolId) -> impl Iterator<Item = &EarleyItem> {
        self.select(self.by_next.get(&symbol))
    }

    /// Completed items whose left-hand side is `lhs`
    pub(crate) fn completed(&self, lhs: Spur) -> impl Iterator<Item = &EarleyItem> {
        self.select(self.completed.get(&lhs))
    }

    /// Names of the terminals some item expects next, sorted
    #[must_use]
    pub fn expected_terminals(&self, grammar: &Grammar) -> Vec<CompactString> {
        let mut expected: Vec<CompactString> = self
            .by_next
            .keys()
            .filter_map(|&symbol| match symbol {
                SymbolId::Terminal(key) => Some(grammar.resolve(key).into()),
                SymbolId::NonTerminal(_) => None,
            })
            .collect();
        expected.sort_unstable();
        expected.dedup();
        expected
    }

    fn select<'c>(
        &'c self,
        positions: Option<&'c Positions>,
    ) -> impl Iterator<Item = &'c EarleyItem> + use<'c> {
        positions
            .into_iter()
            .flatten()
            .filter_map(|&position| self.items.get(position))
    }
}

/// Every column of one parse; column `i` holds the items ending after `i`
/// tokens
#[derive(Debug, Clone, Default)]
pub struct Chart {
    columns: Vec<ChartColumn>,
}

impl Chart {
    /// A chart with one empty column
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: vec![ChartColumn::new()],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn column(&self, index: usize) -> Option<&ChartColumn> {
        self.columns.get(index)
    }

    pub fn columns(&self) -> impl Iterator<Item = &ChartColumn> {
        self.columns.iter()
    }

    /// Total number of items over all columns
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(ChartColumn::len).sum()
    }

    /// Column `index`, created empty when missing
    pub(crate) fn column_mut(&mut self, index: usize) -> &mut ChartColumn {
        if self.columns.len() <= index {
            self.columns.resize_with(index + 1, ChartColumn::new);
        }
        &mut self.columns[index]
    }

    pub(crate) fn contains(&self, index: usize, item: &EarleyItem) -> bool {
        self.column(index).is_some_and(|column| column.contains(item))
    }
}

//! Parse forest extraction
//!
//! Nodes are built from the finished chart, walking each completed item
//! right to left. Every consistent split of a production yields one
//! derivation; the first one is the node's children, the others become
//! alternatives of the same symbol over the same span. Nodes are memoized by
//! `(nonterminal, start, end)` and shared through [`Arc`], so the forest
//! stays polynomial even when the number of trees is not.
//!
//! Extraction and every walk over a finished forest use explicit stacks, so
//! a derivation as deep as the input is long never exhausts the call stack.

use super::chart::Chart;
use crate::error::ParseError;
use crate::grammar::{DottedRule, Grammar, RuleId, Symbol, SymbolId};
use crate::lexer::Token;
use hashbrown::{HashMap, HashSet};
use lasso::Spur;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// A node of the parse forest
///
/// `children` is one concrete derivation. `alternatives` holds the other
/// derivations of `symbol` over the same `span`; each alternative is a
/// complete node with no alternatives of its own.
#[derive(Debug, Clone)]
pub struct ParseNode {
    pub symbol: Symbol,
    /// The scanned token, for terminals
    pub token: Option<Token>,
    /// Half-open range of token indices covered by this node
    pub span: Range<usize>,
    pub children: Vec<Arc<ParseNode>>,
    pub alternatives: Vec<Arc<ParseNode>>,
}

impl ParseNode {
    fn leaf(symbol: Symbol, token: Token, index: usize) -> Self {
        Self {
            symbol,
            token: Some(token),
            span: index..index + 1,
            children: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    fn branch(symbol: Symbol, span: Range<usize>, children: Vec<Arc<ParseNode>>) -> Self {
        Self {
            symbol,
            token: None,
            span,
            children,
            alternatives: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.symbol.name()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.token.is_some()
    }

    /// This node followed by its alternatives
    pub fn derivations(&self) -> impl Iterator<Item = &ParseNode> {
        std::iter::once(self).chain(self.alternatives.iter().map(AsRef::as_ref))
    }

    /// Whether any node reachable from here has more than one derivation
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.tree_count() > 1
    }

    /// Number of distinct trees this forest encodes, saturating at `u128::MAX`
    #[must_use]
    pub fn tree_count(&self) -> u128 {
        let mut counts: HashMap<*const ParseNode, u128, ahash::RandomState> = HashMap::default();
        // post-order: a node is counted once all of its children are
        let mut stack: Vec<(&ParseNode, bool)> = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            let key: *const ParseNode = node;
            if expanded {
                let count = node.derivations().fold(0u128, |total, derivation| {
                    let product = derivation.children.iter().fold(1u128, |acc, child| {
                        let count = counts.get(&Arc::as_ptr(child)).copied().unwrap_or(0);
                        acc.saturating_mul(count)
                    });
                    total.saturating_add(product)
                });
                counts.insert(key, count);
            } else if !counts.contains_key(&key) {
                stack.push((node, true));
                for derivation in node.derivations() {
                    stack.extend(derivation.children.iter().map(|child| (child.as_ref(), false)));
                }
            }
        }
        let root: *const ParseNode = self;
        counts.get(&root).copied().unwrap_or(0)
    }

    /// Leaf tokens of the primary derivation, in source order
    #[must_use]
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(token) = &node.token {
                tokens.push(token);
            }
            stack.extend(node.children.iter().rev().map(AsRef::as_ref));
        }
        tokens
    }

    /// Concatenated values of [`tokens`](Self::tokens)
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens().into_iter().map(|t| t.value.as_str()).collect()
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(&ParseNode, usize, &str)> = vec![(self, 0, "")];
        while let Some((node, depth, marker)) = stack.pop() {
            write!(
                f,
                "{:indent$}{marker}{} [{}..{}]",
                "",
                node.symbol,
                node.span.start,
                node.span.end,
                indent = depth * 2
            )?;
            if let Some(token) = &node.token {
                write!(f, " {:?}", token.value.as_str())?;
            }
            writeln!(f)?;
            // children print before the alternatives of the same node
            stack.extend(node.alternatives.iter().rev().map(|alt| (alt.as_ref(), depth, "| ")));
            stack.extend(node.children.iter().rev().map(|child| (child.as_ref(), depth + 1, "")));
        }
        Ok(())
    }
}

impl PartialEq for ParseNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((left, right)) = pairs.pop() {
            if std::ptr::eq(left, right) {
                continue;
            }
            if left.symbol != right.symbol
                || left.token != right.token
                || left.span != right.span
                || left.children.len() != right.children.len()
                || left.alternatives.len() != right.alternatives.len()
            {
                return false;
            }
            pairs.extend(
                left.children
                    .iter()
                    .zip(&right.children)
                    .chain(left.alternatives.iter().zip(&right.alternatives))
                    .map(|(l, r)| (l.as_ref(), r.as_ref())),
            );
        }
        true
    }
}

impl Eq for ParseNode {}

impl Drop for ParseNode {
    // uniquely owned descendants are unlinked onto a worklist so dropping a
    // deep forest never recurses
    fn drop(&mut self) {
        let mut orphans = std::mem::take(&mut self.children);
        orphans.append(&mut self.alternatives);
        while let Some(node) = orphans.pop() {
            if let Some(mut node) = Arc::into_inner(node) {
                orphans.append(&mut node.children);
                orphans.append(&mut node.alternatives);
            }
        }
    }
}

type Derivation = Vec<Arc<ParseNode>>;
type NodeKey = (Spur, usize, usize);

/// Outcome of one extraction attempt; `Err` names the first child node that
/// has to be built before the attempt can succeed
type Attempt<T> = Result<T, NodeKey>;

/// Walks a recognized chart back into a [`ParseNode`] forest
pub(crate) struct ForestBuilder<'p> {
    grammar: &'p Grammar,
    chart: &'p Chart,
    tokens: &'p [Token],
    /// Derivations kept per node
    limit: usize,
    memo: HashMap<NodeKey, Option<Arc<ParseNode>>, ahash::RandomState>,
    in_progress: HashSet<NodeKey, ahash::RandomState>,
}

impl<'p> ForestBuilder<'p> {
    pub(crate) fn new(
        grammar: &'p Grammar,
        chart: &'p Chart,
        tokens: &'p [Token],
        max_alternatives: Option<usize>,
    ) -> Self {
        Self {
            grammar,
            chart,
            tokens,
            limit: max_alternatives.map_or(usize::MAX, |max| max.saturating_add(1)),
            memo: HashMap::default(),
            in_progress: HashSet::default(),
        }
    }

    /// Root node: the start symbol over the whole input
    pub(crate) fn build(mut self) -> Result<ParseNode, ParseError> {
        let root = (self.grammar.start_key(), 0, self.tokens.len());
        self.resolve(root);
        let node = self.memo.remove(&root).flatten();
        self.memo.clear();
        node.map(Arc::unwrap_or_clone)
            .ok_or_else(|| ParseError::syntax("accepted input has no derivation"))
    }

    /// Build `root` and every node it depends on
    ///
    /// `pending` is the chain of nodes under construction, each waiting on
    /// the one above it. A node that needs a missing child pushes that child
    /// and is attempted again once the child is memoized. A child already on
    /// the chain counts as having no derivation, which cuts the cycles of
    /// grammars such as `A → A`.
    fn resolve(&mut self, root: NodeKey) {
        let mut pending = vec![root];
        self.in_progress.insert(root);
        while let Some(&key) = pending.last() {
            match self.derivations(key) {
                Ok(derivations) => {
                    pending.pop();
                    self.in_progress.remove(&key);
                    let node = self.assemble(key, derivations);
                    self.memo.insert(key, node);
                }
                Err(child) => {
                    self.in_progress.insert(child);
                    pending.push(child);
                }
            }
        }
    }

    /// A finished node, or `None` for a node on the pending chain
    fn lookup(&self, key: NodeKey) -> Attempt<Option<Arc<ParseNode>>> {
        if let Some(node) = self.memo.get(&key) {
            return Ok(node.clone());
        }
        if self.in_progress.contains(&key) {
            return Ok(None);
        }
        Err(key)
    }

    /// Every derivation of `lhs` over `start..end`, up to the limit
    fn derivations(&self, (lhs, start, end): NodeKey) -> Attempt<Vec<Derivation>> {
        let items: SmallVec<[DottedRule; 4]> = self
            .chart
            .column(end)
            .map(|column| {
                column
                    .completed(lhs)
                    .filter(|item| item.origin == start)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        let mut derivations: Vec<Derivation> = Vec::new();
        for item in items {
            if derivations.len() >= self.limit {
                break;
            }
            let remaining = self.limit - derivations.len();
            derivations.extend(self.decompose(item.rule, item.dot, start, end, remaining)?);
        }
        Ok(derivations)
    }

    fn assemble(
        &self,
        (lhs, start, end): NodeKey,
        derivations: Vec<Derivation>,
    ) -> Option<Arc<ParseNode>> {
        let symbol = Symbol::non_terminal(self.grammar.resolve(lhs));
        let mut nodes = derivations
            .into_iter()
            .map(|children| ParseNode::branch(symbol.clone(), start..end, children));
        nodes.next().map(|mut primary| {
            primary.alternatives = nodes.map(Arc::new).collect();
            Arc::new(primary)
        })
    }

    /// Child sequences for the first `dot` symbols of `rule` over
    /// `origin..right`, at most `limit` of them
    ///
    /// Recursion here is bounded by the length of the rule.
    fn decompose(
        &self,
        rule: RuleId,
        dot: usize,
        origin: usize,
        right: usize,
        limit: usize,
    ) -> Attempt<Vec<Derivation>> {
        if dot == 0 {
            return Ok(if right == origin { vec![Vec::new()] } else { Vec::new() });
        }
        if right < origin || limit == 0 {
            return Ok(Vec::new());
        }
        let before = DottedRule::new(rule, dot - 1, origin);
        let Some(symbol) = self.grammar.next_symbol(&before) else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        match symbol {
            SymbolId::Terminal(key) => {
                let Some(index) = right.checked_sub(1) else {
                    return Ok(results);
                };
                let Some(token) = self.tokens.get(index) else {
                    return Ok(results);
                };
                if token.token_type != self.grammar.resolve(key) || !self.chart.contains(index, &before) {
                    return Ok(results);
                }
                let leaf = Arc::new(ParseNode::leaf(
                    self.grammar.symbol(symbol),
                    token.clone(),
                    index,
                ));
                for mut prefix in self.decompose(rule, dot - 1, origin, index, limit)? {
                    prefix.push(Arc::clone(&leaf));
                    results.push(prefix);
                }
            }
            SymbolId::NonTerminal(child) => {
                let mut splits: SmallVec<[usize; 4]> = self
                    .chart
                    .column(right)
                    .map(|column| {
                        column
                            .completed(child)
                            .map(|item| item.origin)
                            .filter(|&split| split >= origin && self.chart.contains(split, &before))
                            .collect()
                    })
                    .unwrap_or_default();
                splits.sort_unstable();
                splits.dedup();

                for split in splits {
                    if results.len() >= limit {
                        break;
                    }
                    let Some(node) = self.lookup((child, split, right))? else {
                        continue;
                    };
                    let remaining = limit - results.len();
                    for mut prefix in self.decompose(rule, dot - 1, origin, split, remaining)? {
                        prefix.push(Arc::clone(&node));
                        results.push(prefix);
                    }
                }
            }
        }
        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earley::{EarleyConfig, EarleyParser};
    use crate::grammar::GrammarBuilder;

    fn tokens(values: &[&str]) -> Vec<Token> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let token_type = match value {
                    "+" => "plus",
                    "*" => "times",
                    _ => "number",
                };
                Token::new(1, i as u32 + 1, token_type, value, true)
            })
            .collect()
    }

    fn arithmetic() -> Grammar {
        GrammarBuilder::new()
            .start("E")
            .rule("E", ["E", "$plus", "E"])
            .rule("E", ["E", "$times", "E"])
            .rule("E", ["$number"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_unambiguous_tree() {
        let grammar = arithmetic();
        let root = EarleyParser::new(&grammar)
            .parse_tokens(tokens(&["2", "+", "3"]))
            .unwrap();
        assert_eq!(root.name(), "E");
        assert_eq!(root.span, 0..3);
        assert_eq!(root.children.len(), 3);
        assert!(root.children[1].is_leaf());
        assert_eq!(root.tree_count(), 1);
        assert_eq!(root.text(), "2+3");
    }

    #[test]
    fn test_ambiguity_is_preserved() {
        let grammar = arithmetic();
        let root = EarleyParser::new(&grammar)
            .parse_tokens(tokens(&["2", "+", "3", "*", "4"]))
            .unwrap();
        assert_eq!(root.derivations().count(), 2);
        assert!(root.is_ambiguous());
        assert_eq!(root.tree_count(), 2);

        let operators: Vec<_> = root
            .derivations()
            .map(|d| d.children[1].token.as_ref().unwrap().value.clone())
            .collect();
        assert!(operators.contains(&"+".into()));
        assert!(operators.contains(&"*".into()));
        for derivation in root.derivations() {
            assert_eq!(derivation.text(), "2+3*4");
        }
    }

    #[test]
    fn test_catalan_tree_count() {
        let grammar = arithmetic();
        let root = EarleyParser::new(&grammar)
            .parse_tokens(tokens(&["1", "+", "2", "+", "3", "+", "4"]))
            .unwrap();
        // bracketings of four operands
        assert_eq!(root.tree_count(), 5);
    }

    #[test]
    fn test_max_alternatives() {
        let grammar = arithmetic();
        let parser =
            EarleyParser::with_config(&grammar, EarleyConfig::new().with_max_alternatives(Some(0)));
        let root = parser
            .parse_tokens(tokens(&["1", "+", "2", "+", "3", "+", "4"]))
            .unwrap();
        assert_eq!(root.tree_count(), 1);
        assert!(!root.is_ambiguous());
    }

    #[test]
    fn test_empty_productions_and_cycles() {
        let grammar = GrammarBuilder::new()
            .start("S")
            .rule("S", ["S"])
            .rule("S", ["Opt", "$x"])
            .rule("Opt", [] as [&str; 0])
            .rule("Opt", ["$y"])
            .build()
            .unwrap();
        let parser = EarleyParser::new(&grammar);

        let root = parser
            .parse_tokens(vec![Token::new(1, 1, "x", "x", true)])
            .unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name(), "Opt");
        assert_eq!(root.children[0].span, 0..0);
        assert!(root.children[0].children.is_empty());

        let root = parser
            .parse_tokens(vec![
                Token::new(1, 1, "y", "y", true),
                Token::new(1, 2, "x", "x", true),
            ])
            .unwrap();
        assert_eq!(root.text(), "yx");
    }

    fn chain(depth: usize) -> ParseNode {
        let mut node = ParseNode::leaf(
            Symbol::terminal("number"),
            Token::new(1, 1, "number", "7", true),
            0,
        );
        for _ in 0..depth {
            node = ParseNode::branch(Symbol::non_terminal("E"), 0..1, vec![Arc::new(node)]);
        }
        node
    }

    #[test]
    fn test_deep_chain_is_walked_without_recursion() {
        let node = chain(200_000);
        assert_eq!(node.tree_count(), 1);
        assert_eq!(node.text(), "7");
        assert_eq!(node, node.clone());
        drop(node);

        // indentation grows with depth, so keep the rendered chain shorter
        let node = chain(8_000);
        let rendered = node.to_string();
        assert_eq!(rendered.lines().count(), 8_001);
        assert!(rendered.ends_with("$number [0..1] \"7\"\n"));
    }

    #[test]
    fn test_display_marks_alternatives() {
        let grammar = arithmetic();
        let root = EarleyParser::new(&grammar)
            .parse_tokens(tokens(&["1", "+", "2", "*", "3"]))
            .unwrap();
        let rendered = root.to_string();
        assert!(rendered.starts_with("E [0..5]\n"));
        assert!(rendered.contains("$number [0..1] \"1\"\n"));
        assert!(rendered.contains("\n| E [0..5]\n"));
    }
}

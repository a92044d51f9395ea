//! Earley recognizer: predict, scan and complete over a lazily pulled
//! token stream

use super::chart::{Chart, EarleyItem};
use super::forest::ForestBuilder;
use super::{EarleyConfig, ParseNode};
use crate::error::{Error, ParseError};
use crate::grammar::{DottedRule, Grammar, SymbolId};
use crate::lexer::Token;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// General context-free parser
///
/// Handles any grammar the [`GrammarBuilder`](crate::grammar::GrammarBuilder)
/// accepts, including left recursive, ambiguous and empty productions. The
/// parser borrows its grammar; each parse owns its own chart, so one parser
/// can serve several threads.
///
/// # Example
///
/// ```rust
/// use earlex::earley::EarleyParser;
/// use earlex::grammar::GrammarBuilder;
/// use earlex::lexer::Token;
///
/// let grammar = GrammarBuilder::new()
///     .start("E")
///     .rule("E", ["E", "$plus", "E"])
///     .rule("E", ["$number"])
///     .build()?;
/// let tokens = [
///     Token::new(1, 1, "number", "1", true),
///     Token::new(1, 2, "plus", "+", true),
///     Token::new(1, 3, "number", "2", true),
/// ];
///
/// let tree = EarleyParser::new(&grammar).parse_tokens(tokens)?;
/// assert_eq!(tree.text(), "1+2");
/// assert!(!tree.is_ambiguous());
/// # Ok::<(), earlex::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EarleyParser<'g> {
    grammar: &'g Grammar,
    config: EarleyConfig,
}

/// Outcome of a successful recognition
#[derive(Debug, Clone)]
pub struct Recognition {
    pub chart: Chart,
    /// Tokens that reached the chart, in order
    pub tokens: Vec<Token>,
}

impl<'g> EarleyParser<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_config(grammar, EarleyConfig::default())
    }

    #[must_use]
    pub const fn with_config(grammar: &'g Grammar, config: EarleyConfig) -> Self {
        Self { grammar, config }
    }

    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    #[must_use]
    pub const fn config(&self) -> &EarleyConfig {
        &self.config
    }

    /// Parse a fallible token stream, typically a [`Lexer`](crate::lexer::Lexer)
    ///
    /// Tokens are pulled one at a time; an error from the stream stops the
    /// parse and is returned unchanged.
    ///
    /// # Errors
    ///
    /// The stream's own error, or [`ParseError`] when the tokens do not form
    /// a sentence of the grammar.
    pub fn parse<I, E>(&self, tokens: I) -> Result<ParseNode, Error>
    where
        I: IntoIterator<Item = Result<Token, E>>,
        E: Into<Error>,
    {
        self.run(tokens.into_iter().map(|token| token.map_err(Into::into)))
    }

    /// Parse an already tokenized input
    ///
    /// # Errors
    ///
    /// [`ParseError`] when the tokens do not form a sentence of the grammar.
    pub fn parse_tokens<I>(&self, tokens: I) -> Result<ParseNode, ParseError>
    where
        I: IntoIterator<Item = Token>,
    {
        self.run(tokens.into_iter().map(Ok))
    }

    /// Build the chart without extracting a forest
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn recognize<I, E>(&self, tokens: I) -> Result<Recognition, E>
    where
        I: IntoIterator<Item = Result<Token, E>>,
        E: From<ParseError>,
    {
        let mut chart = Chart::new();
        let mut accepted: Vec<Token> = Vec::new();
        let mut input = tokens.into_iter();

        let start = self.grammar.start_key();
        for &rule in self.grammar.rules_of(start) {
            chart.column_mut(0).push(DottedRule::new(rule, 0, 0), self.grammar);
        }

        loop {
            let position = accepted.len();
            let token = self.next_token(&mut input)?;
            if let (Some(limit), Some(_)) = (self.config.max_tokens, &token)
                && position >= limit
            {
                return Err(ParseError::syntax(format!("input exceeds {limit} tokens")).into());
            }

            self.process(&mut chart, position);
            let Some(token) = token else {
                break;
            };
            if !self.scan(&mut chart, position, &token) {
                let expected = self.expected_at(&chart, position);
                debug!(
                    position,
                    token_type = %token.token_type,
                    value = %token.value,
                    expected = expected.len(),
                    "no item accepts the token"
                );
                return Err(ParseError::SequenceSyntax {
                    expected,
                    found: Some(token),
                }
                .into());
            }
            accepted.push(token);
        }

        let end = accepted.len();
        let accepting = chart.column(end).is_some_and(|column| {
            column.completed(start).any(|item| item.origin == 0)
        });
        if !accepting {
            let expected = self.expected_at(&chart, end);
            debug!(tokens = end, expected = expected.len(), "input ended early");
            return Err(ParseError::SequenceSyntax {
                expected,
                found: None,
            }
            .into());
        }

        Ok(Recognition {
            chart,
            tokens: accepted,
        })
    }

    fn run<I, E>(&self, tokens: I) -> Result<ParseNode, E>
    where
        I: Iterator<Item = Result<Token, E>>,
        E: From<ParseError>,
    {
        let Recognition { chart, tokens } = self.recognize(tokens)?;
        let root = ForestBuilder::new(self.grammar, &chart, &tokens, self.config.max_alternatives)
            .build()?;
        debug!(
            columns = chart.len(),
            items = chart.item_count(),
            tokens = tokens.len(),
            ambiguous = root.is_ambiguous(),
            "input accepted"
        );
        Ok(root)
    }

    /// Next token that should reach the chart
    fn next_token<I, E>(&self, input: &mut I) -> Result<Option<Token>, E>
    where
        I: Iterator<Item = Result<Token, E>>,
    {
        for token in input.by_ref() {
            let token = token?;
            if token.required || !self.config.skip_optional_tokens {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    /// Run predict and complete over column `position` until no item is added
    fn process(&self, chart: &mut Chart, position: usize) {
        let grammar = self.grammar;
        let mut cursor = 0;
        while let Some(item) = chart.column(position).and_then(|c| c.get(cursor)).copied() {
            match grammar.next_symbol(&item) {
                Some(SymbolId::NonTerminal(next)) => self.predict(chart, position, item, next),
                Some(SymbolId::Terminal(_)) => {}
                None => self.complete(chart, position, item),
            }
            cursor += 1;
        }
        trace!(
            column = position,
            items = chart.column(position).map_or(0, |c| c.len()),
            "column processed"
        );
    }

    fn predict(&self, chart: &mut Chart, position: usize, item: EarleyItem, next: lasso::Spur) {
        let column = chart.column_mut(position);
        for &rule in self.grammar.rules_of(next) {
            column.push(DottedRule::new(rule, 0, position), self.grammar);
        }
        if self.grammar.is_nullable_key(next) {
            column.push(item.advance(), self.grammar);
        }
    }

    fn complete(&self, chart: &mut Chart, position: usize, item: EarleyItem) {
        let Some(lhs) = self.grammar.lhs_key(item.rule) else {
            return;
        };
        let waiting: SmallVec<[EarleyItem; 8]> = chart
            .column(item.origin)
            .map(|column| column.waiting_on(SymbolId::NonTerminal(lhs)).copied().collect())
            .unwrap_or_default();
        let column = chart.column_mut(position);
        for parent in waiting {
            column.push(parent.advance(), self.grammar);
        }
    }

    /// Advance every item expecting the token's type into the next column
    fn scan(&self, chart: &mut Chart, position: usize, token: &Token) -> bool {
        let scanned: SmallVec<[EarleyItem; 8]> = self
            .grammar
            .key(&token.token_type)
            .and_then(|key| {
                chart
                    .column(position)
                    .map(|column| column.waiting_on(SymbolId::Terminal(key)).copied().collect())
            })
            .unwrap_or_default();

        let next = chart.column_mut(position + 1);
        for item in &scanned {
            next.push(item.advance(), self.grammar);
        }
        !next.is_empty()
    }

    fn expected_at(&self, chart: &Chart, position: usize) -> Vec<compact_str::CompactString> {
        chart
            .column(position)
            .map(|column| column.expected_terminals(self.grammar))
            .unwrap_or_default()
    }
}

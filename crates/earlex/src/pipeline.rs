//! Lexis, grammar and parser configuration bundled for one-call parsing

use crate::automaton::{Automaton, Nfa};
use crate::compile::{Lexis, LexisBuilder};
use crate::earley::{EarleyConfig, EarleyParser, ParseNode};
use crate::error::{Error, GrammarError, LexError};
use crate::grammar::{Grammar, GrammarBuilder, GrammarDefinition};
use crate::lexer::{Token, TokenDefinition};
use tracing::debug;

/// A compiled lexis and a grammar checked against it
///
/// [`parse`](Self::parse) runs the pull pipeline: the parser asks the lexer
/// for one token at a time, tokens of omitted types are dropped, and the
/// first lexer or parser error ends the run.
///
/// ```rust
/// use earlex::Pipeline;
/// use earlex::grammar::{GrammarDefinition, RuleDefinition};
/// use earlex::lexer::TokenDefinition;
///
/// let pipeline = Pipeline::from_definitions(
///     [
///         TokenDefinition::new("identifier", "[a-z]+"),
///         TokenDefinition::new("number", "[0-9]+"),
///         TokenDefinition::new("operator", "=|;"),
///         TokenDefinition::new("whitespace", "\\s+").omitted(),
///     ],
///     &GrammarDefinition {
///         start: "Assign".into(),
///         rules: vec![RuleDefinition::new(
///             "Assign",
///             ["$identifier", "$operator", "$number", "$operator"],
///         )],
///     },
/// )?;
///
/// let tree = pipeline.parse("var = 222;")?;
/// assert_eq!(tree.text(), "var=222;");
/// assert!(pipeline.parse("var = ;").is_err());
/// # Ok::<(), earlex::Error>(())
/// ```
#[derive(Debug)]
pub struct Pipeline<A: Automaton = Nfa> {
    lexis: Lexis<A>,
    grammar: Grammar,
    config: EarleyConfig,
}

impl Pipeline<Nfa> {
    /// Compile token and grammar descriptions
    ///
    /// # Errors
    ///
    /// [`Error::Regex`] for a malformed token expression, [`Error::Grammar`]
    /// for an invalid grammar or a terminal the lexis does not define.
    pub fn from_definitions(
        tokens: impl IntoIterator<Item = TokenDefinition>,
        grammar: &GrammarDefinition,
    ) -> Result<Self, Error> {
        let lexis = LexisBuilder::new().definitions(tokens).build()?;
        let grammar = GrammarBuilder::new().definition(grammar).build()?;
        Ok(Self::new(lexis, grammar)?)
    }
}

impl<A: Automaton> Pipeline<A> {
    /// Bundle `lexis` and `grammar`
    ///
    /// # Errors
    ///
    /// [`GrammarError::UnknownTerminal`] when a terminal of `grammar` is not
    /// a token type of `lexis`.
    pub fn new(lexis: Lexis<A>, grammar: Grammar) -> Result<Self, GrammarError> {
        grammar.check_terminals(lexis.types())?;
        debug!(
            token_types = lexis.types().len(),
            automaton_states = lexis.automaton().state_count(),
            rules = grammar.rule_count(),
            "pipeline ready"
        );
        Ok(Self {
            lexis,
            grammar,
            config: EarleyConfig::default(),
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: EarleyConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn lexis(&self) -> &Lexis<A> {
        &self.lexis
    }

    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[must_use]
    pub const fn config(&self) -> &EarleyConfig {
        &self.config
    }

    #[must_use]
    pub fn parser(&self) -> EarleyParser<'_> {
        EarleyParser::with_config(&self.grammar, self.config.clone())
    }

    /// Every token of `source`, required or not
    ///
    /// # Errors
    ///
    /// The first [`LexError`].
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = self.lexis.lexer();
        lexer.set_source(source);
        lexer.tokenize()
    }

    /// Lex and parse `source`
    ///
    /// # Errors
    ///
    /// [`Error::Lex`] or [`Error::Parse`], whichever happens first.
    pub fn parse(&self, source: &str) -> Result<ParseNode, Error> {
        let mut lexer = self.lexis.lexer();
        lexer.set_source(source);
        self.parser().parse(&mut lexer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::RuleDefinition;

    fn tokens() -> Vec<TokenDefinition> {
        vec![
            TokenDefinition::new("number", "[0-9]+"),
            TokenDefinition::new("plus", "\\+"),
            TokenDefinition::new("space", " +").omitted(),
        ]
    }

    fn sum() -> GrammarDefinition {
        GrammarDefinition {
            start: "Sum".into(),
            rules: vec![
                RuleDefinition::new("Sum", ["Sum", "$plus", "$number"]),
                RuleDefinition::new("Sum", ["$number"]),
            ],
        }
    }

    #[test]
    fn test_lex_error_surfaces_unchanged() {
        let pipeline = Pipeline::from_definitions(tokens(), &sum()).unwrap();
        let err = pipeline.parse("1 + x").unwrap_err();
        assert!(matches!(
            err,
            Error::Lex(LexError::UnknownToken { found: 'x', column: 5, .. })
        ));
        assert!(err.render("1 + x").contains("^"));
    }

    #[test]
    fn test_unknown_terminal_is_rejected() {
        let mut grammar = sum();
        grammar.rules.push(RuleDefinition::new("Sum", ["$minus"]));
        let err = Pipeline::from_definitions(tokens(), &grammar).unwrap_err();
        assert!(matches!(
            err,
            Error::Grammar(GrammarError::UnknownTerminal { ref name, .. }) if name == "minus"
        ));
    }

    #[test]
    fn test_dfa_pipeline() {
        let lexis = LexisBuilder::new().definitions(tokens()).build_dfa().unwrap();
        let grammar = GrammarBuilder::new().definition(&sum()).build().unwrap();
        let pipeline = Pipeline::new(lexis, grammar).unwrap();

        let tree = pipeline.parse("1 + 22 + 333").unwrap();
        assert_eq!(tree.text(), "1+22+333");
        assert_eq!(tree.span, 0..5);
        assert_eq!(pipeline.tokenize("1 + 2").unwrap().len(), 5);
    }

    #[test]
    fn test_parse_error_carries_token() {
        let pipeline = Pipeline::from_definitions(tokens(), &sum()).unwrap();
        let err = pipeline.parse("1 + + 2").unwrap_err();
        let Error::Parse(parse) = &err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert_eq!(parse.expected(), ["number"]);
        assert!(err.render("1 + + 2").contains("1 + + 2"));
    }
}

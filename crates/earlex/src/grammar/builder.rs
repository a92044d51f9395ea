use super::{Grammar, GrammarDefinition, Rule, RuleId, Symbol, SymbolId, analysis, validate};
use crate::error::GrammarError;
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use lasso::Rodeo;
use smallvec::SmallVec;
use tracing::debug;

/// Builder for [`Grammar`]
///
/// Productions are kept in the order they are added. A production added
/// twice for the same nonterminal is kept once. Errors in textual symbols
/// are reported by [`build`](Self::build).
///
/// ```rust
/// use earlex::grammar::{GrammarBuilder, Symbol};
///
/// let grammar = GrammarBuilder::new()
///     .start("Call")
///     .rule("Call", ["$name", "$lparen", "Args", "$rparen"])
///     .production("Args", vec![Symbol::terminal("name")])
///     .rule("Args", [] as [&str; 0])
///     .build()?;
/// assert!(grammar.is_nullable("Args"));
/// # Ok::<(), earlex::error::GrammarError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    start: Option<CompactString>,
    rules: Vec<(CompactString, Vec<Symbol>)>,
    error: Option<GrammarError>,
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start(mut self, name: impl Into<CompactString>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Add `name → symbols`, where `$`-prefixed symbols are terminals
    #[must_use]
    pub fn rule<I, S>(mut self, name: impl Into<CompactString>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed: Result<Vec<Symbol>, GrammarError> = symbols
            .into_iter()
            .map(|symbol| Symbol::parse(symbol.as_ref()))
            .collect();
        match parsed {
            Ok(production) => self.rules.push((name.into(), production)),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// Add `name → production` from already typed symbols
    #[must_use]
    pub fn production(mut self, name: impl Into<CompactString>, production: Vec<Symbol>) -> Self {
        self.rules.push((name.into(), production));
        self
    }

    /// Take the start symbol and every rule of `definition`
    #[must_use]
    pub fn definition(self, definition: &GrammarDefinition) -> Self {
        definition
            .rules
            .iter()
            .fold(self.start(definition.start.clone()), |builder, rule| {
                builder.rule(rule.name.clone(), &rule.production)
            })
    }

    /// Intern, deduplicate and validate the productions
    ///
    /// # Errors
    ///
    /// - [`GrammarError::InvalidSymbol`] for a malformed textual symbol
    /// - [`GrammarError::MissingStart`] when no start symbol was set
    /// - [`GrammarError::UndefinedStart`] when the start symbol has no production
    /// - [`GrammarError::UndefinedNonTerminal`] for a referenced nonterminal
    ///   without productions
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let start = self.start.ok_or(GrammarError::MissingStart)?;

        let mut names = Rodeo::new();
        let start = names.get_or_intern(start.as_str());
        let mut rules: Vec<Rule> = Vec::with_capacity(self.rules.len());
        let mut by_lhs: HashMap<_, SmallVec<[RuleId; 4]>, ahash::RandomState> = HashMap::default();
        let mut non_terminals = Vec::new();
        let mut seen: HashSet<Rule, ahash::RandomState> = HashSet::default();

        for (lhs, production) in &self.rules {
            let lhs = names.get_or_intern(lhs.as_str());
            let rhs = production
                .iter()
                .map(|symbol| match symbol {
                    Symbol::Terminal(name) => SymbolId::Terminal(names.get_or_intern(name.as_str())),
                    Symbol::NonTerminal(name) => {
                        SymbolId::NonTerminal(names.get_or_intern(name.as_str()))
                    }
                })
                .collect();
            let rule = Rule { lhs, rhs };
            if !seen.insert(rule.clone()) {
                continue;
            }

            let productions = by_lhs.entry(lhs).or_default();
            if productions.is_empty() {
                non_terminals.push(lhs);
            }
            productions.push(RuleId(rules.len()));
            rules.push(rule);
        }

        let mut grammar = Grammar {
            names: names.into_reader(),
            start,
            rules,
            by_lhs,
            non_terminals,
            nullable: HashSet::default(),
        };
        validate::validate(&grammar)?;
        grammar.nullable = analysis::nullable_set(&grammar);

        debug!(
            start = grammar.start(),
            rules = grammar.rule_count(),
            duplicates = self.rules.len() - grammar.rule_count(),
            non_terminals = grammar.non_terminals.len(),
            nullable = grammar.nullable.len(),
            "grammar built"
        );
        Ok(grammar)
    }
}

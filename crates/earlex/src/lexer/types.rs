//! Per token type metadata: precedence, required flag and definition order

use super::TokenDefinition;
use compact_str::CompactString;
use hashbrown::HashMap;

/// How the lexer treats one token type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenType {
    pub precedence: i32,
    pub required: bool,
    /// Position of the first definition of this type
    pub order: usize,
}

/// Token types of a lexis, keyed by name
#[derive(Debug, Clone, Default)]
pub struct TokenTypes {
    types: HashMap<CompactString, TokenType, ahash::RandomState>,
}

impl TokenTypes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition
    ///
    /// A name defined again keeps its original order; precedence and the
    /// required flag follow the latest definition.
    pub fn insert(&mut self, definition: &TokenDefinition) {
        let order = self.types.len();
        let entry = self
            .types
            .entry(definition.name.clone())
            .or_insert(TokenType {
                precedence: 0,
                required: true,
                order,
            });
        entry.precedence = definition.precedence;
        entry.required = !definition.omit;
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TokenType> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Whether tokens of `name` reach the parser; unknown names are required
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.get(name).is_none_or(|t| t.required)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Type names in definition order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<(&str, usize)> = self
            .types
            .iter()
            .map(|(name, t)| (name.as_str(), t.order))
            .collect();
        names.sort_unstable_by_key(|&(_, order)| order);
        names.into_iter().map(|(name, _)| name).collect()
    }

    /// Pick the winning type among `candidates`
    ///
    /// Highest precedence wins; equal precedence goes to the type defined
    /// first. Names without metadata rank below every known type.
    #[must_use]
    pub fn resolve<'n>(&self, candidates: &[&'n str]) -> Option<&'n str> {
        candidates
            .iter()
            .copied()
            .max_by_key(|name| {
                self.get(name).map_or((false, i32::MIN, std::cmp::Reverse(usize::MAX)), |t| {
                    (true, t.precedence, std::cmp::Reverse(t.order))
                })
            })
    }
}

impl<'d> FromIterator<&'d TokenDefinition> for TokenTypes {
    fn from_iter<I: IntoIterator<Item = &'d TokenDefinition>>(iter: I) -> Self {
        let mut types = Self::new();
        for definition in iter {
            types.insert(definition);
        }
        types
    }
}

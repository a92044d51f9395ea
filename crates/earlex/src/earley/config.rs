//! Configuration for the Earley parser

/// Configuration options for the Earley parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarleyConfig {
    /// Drop tokens whose `required` flag is false before they reach the chart
    pub skip_optional_tokens: bool,

    /// Alternative derivations kept per forest node, `None` keeps all
    pub max_alternatives: Option<usize>,

    /// Longest accepted input, in tokens reaching the chart
    pub max_tokens: Option<usize>,
}

impl Default for EarleyConfig {
    fn default() -> Self {
        Self {
            skip_optional_tokens: true,
            max_alternatives: None,
            max_tokens: None,
        }
    }
}

impl EarleyConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_skip_optional_tokens(mut self, skip: bool) -> Self {
        self.skip_optional_tokens = skip;
        self
    }

    /// Keep at most `limit` alternatives per node
    #[must_use]
    pub const fn with_max_alternatives(mut self, limit: Option<usize>) -> Self {
        self.max_alternatives = limit;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, limit: Option<usize>) -> Self {
        self.max_tokens = limit;
        self
    }
}

use super::{Grammar, SymbolId};
use crate::error::GrammarError;
use crate::error::diagnostics::did_you_mean;
use crate::lexer::TokenTypes;

/// Check that the start symbol and every referenced nonterminal have
/// productions
pub(super) fn validate(grammar: &Grammar) -> Result<(), GrammarError> {
    if grammar.rules_of(grammar.start_key()).is_empty() {
        return Err(GrammarError::UndefinedStart {
            name: grammar.start().into(),
        });
    }

    for rule in &grammar.rules {
        for &symbol in &rule.rhs {
            if let SymbolId::NonTerminal(key) = symbol
                && grammar.rules_of(key).is_empty()
            {
                return Err(GrammarError::UndefinedNonTerminal {
                    name: grammar.resolve(key).into(),
                    referenced_by: grammar.resolve(rule.lhs).into(),
                });
            }
        }
    }
    Ok(())
}

impl Grammar {
    /// Verify every terminal against the token types of a lexis
    ///
    /// # Errors
    ///
    /// [`GrammarError::UnknownTerminal`] for the first terminal, in name
    /// order, that the lexis does not define, with the closest defined name
    /// as suggestion.
    pub fn check_terminals(&self, types: &TokenTypes) -> Result<(), GrammarError> {
        match self.terminals().into_iter().find(|name| !types.contains(name)) {
            None => Ok(()),
            Some(name) => Err(GrammarError::UnknownTerminal {
                name: name.into(),
                suggestion: did_you_mean(name, types.names()).map(Into::into),
            }),
        }
    }
}

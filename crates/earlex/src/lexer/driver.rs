//! Maximal-munch tokenizer over a compiled automaton

use super::{Token, TokenTypes};
use crate::automaton::{Automaton, Cursor, Nfa};
use crate::error::{LexError, NoTransition};
use compact_str::CompactString;
use tracing::trace;

/// Where the lexer is between two calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerState {
    /// Inside the source, no token produced since the last restart
    Scanning,
    /// The last call produced a token
    TokenReady,
    /// The source is consumed
    Exhausted,
}

/// Pull tokenizer
///
/// Characters are fed one at a time to the automaton. When a character has
/// no transition the token ends right before it, provided the configuration
/// reached so far is final; the character is then the first one of the next
/// token. Token type ambiguity is resolved through [`TokenTypes::resolve`].
///
/// The lexer borrows a compiled automaton, so any number of lexers can run
/// over the same [`Lexis`](crate::compile::Lexis) at once.
///
/// ```rust
/// use earlex::compile::LexisBuilder;
///
/// let lexis = LexisBuilder::new()
///     .token("word", "[a-z]+")
///     .token("number", "[0-9]+")
///     .build()?;
/// let mut lexer = lexis.lexer();
/// lexer.set_source("abc42");
///
/// let tokens = lexer.tokenize()?;
/// assert_eq!(tokens[0].value, "abc");
/// assert_eq!(tokens[1].token_type, "number");
/// assert_eq!(tokens[1].column, 4);
/// # Ok::<(), earlex::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a, A: Automaton = Nfa> {
    cursor: Cursor<'a, A>,
    types: &'a TokenTypes,
    source: String,
    /// Byte offset of the next unread character
    position: usize,
    line: u32,
    column: u32,
    state: LexerState,
}

impl<'a, A: Automaton> Lexer<'a, A> {
    /// Create a lexer with an empty source
    #[must_use]
    pub fn new(automaton: &'a A, types: &'a TokenTypes) -> Self {
        Self {
            cursor: Cursor::new(automaton),
            types,
            source: String::new(),
            position: 0,
            line: 1,
            column: 1,
            state: LexerState::Exhausted,
        }
    }

    /// Restart on `source`
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.position = 0;
        self.line = 1;
        self.column = 1;
        self.state = LexerState::Scanning;
        self.cursor.initial();
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn state(&self) -> LexerState {
        self.state
    }

    /// Line and column of the next unread character
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Recognize the next token, or `None` once the source is consumed
    ///
    /// # Errors
    ///
    /// - [`LexError::UnknownToken`] when a character cannot extend the
    ///   current text and the text is not a complete token. The text stays
    ///   consumed; when it is empty the offending character is consumed, so
    ///   calling again resumes after it.
    /// - [`LexError::UnexpectedEndOfSource`] when the source ends inside a
    ///   token.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.position >= self.source.len() {
            self.state = LexerState::Exhausted;
            return Ok(None);
        }

        self.cursor.initial();
        let start = self.position;
        let (line, column) = (self.line, self.column);

        loop {
            let Some(c) = self.source[self.position..].chars().next() else {
                if self.cursor.is_final() {
                    return self.finish(start, line, column).map(Some);
                }
                self.state = LexerState::Exhausted;
                return Err(LexError::UnexpectedEndOfSource {
                    text: self.source[start..].into(),
                    line,
                    column,
                });
            };

            match self.cursor.trigger(c) {
                Ok(()) => self.advance(c),
                Err(NoTransition { .. }) if self.position > start && self.cursor.is_final() => {
                    return self.finish(start, line, column).map(Some);
                }
                Err(NoTransition { symbol }) => {
                    if self.position == start {
                        self.advance(symbol);
                    }
                    self.state = LexerState::Scanning;
                    return Err(LexError::UnknownToken {
                        text: self.source[start..self.position].into(),
                        found: symbol,
                        line,
                        column,
                    });
                }
            }
        }
    }

    /// Collect every remaining token, required or not
    ///
    /// # Errors
    ///
    /// Stops at the first [`LexError`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.by_ref().collect()
    }

    /// Iterate only the tokens the parser needs
    pub fn required(&mut self) -> impl Iterator<Item = Result<Token, LexError>> + '_ {
        self.by_ref()
            .filter(|result| result.as_ref().map_or(true, |token| token.required))
    }

    fn advance(&mut self, c: char) {
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn finish(&mut self, start: usize, line: u32, column: u32) -> Result<Token, LexError> {
        let text = &self.source[start..self.position];
        let labels = self.cursor.name();
        let Some(token_type) = self.types.resolve(&labels) else {
            return Err(LexError::UnknownToken {
                text: text.into(),
                found: text.chars().last().unwrap_or_default(),
                line,
                column,
            });
        };

        let token = Token::new(
            line,
            column,
            CompactString::from(token_type),
            text,
            self.types.is_required(token_type),
        );
        trace!(
            token_type = %token.token_type,
            value = %token.value,
            line,
            column,
            required = token.required,
            "token"
        );
        self.state = LexerState::TokenReady;
        Ok(token)
    }
}

impl<A: Automaton> Iterator for Lexer<'_, A> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

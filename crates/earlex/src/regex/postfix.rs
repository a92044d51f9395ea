//! Infix regular expression to postfix conversion
//!
//! The conversion runs in three passes over a small lexeme stream:
//!
//! 1. bracket classes are expanded into parenthesized alternations,
//! 2. explicit concatenation operators are inserted between adjacent atoms,
//! 3. the shunting-yard algorithm reorders the result into postfix form.

use crate::error::{InvalidRegex, RegexErrorKind};
use smallvec::SmallVec;
use std::fmt;

/// One element of a postfix regular expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixToken {
    /// A literal input symbol
    Symbol(char),
    /// `.`, binary concatenation
    Concat,
    /// `|`, binary alternation
    Union,
    /// `*`, zero or more
    Star,
    /// `+`, one or more
    Plus,
    /// `?`, zero or one
    Optional,
}

impl PostfixToken {
    /// Operator character, `None` for symbols
    #[must_use]
    pub const fn operator(self) -> Option<char> {
        match self {
            Self::Symbol(_) => None,
            Self::Concat => Some('.'),
            Self::Union => Some('|'),
            Self::Star => Some('*'),
            Self::Plus => Some('+'),
            Self::Optional => Some('?'),
        }
    }

    /// Number of operands consumed from the machine stack
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Symbol(_) => 0,
            Self::Star | Self::Plus | Self::Optional => 1,
            Self::Concat | Self::Union => 2,
        }
    }
}

impl fmt::Display for PostfixToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(c) => match escape_code(*c) {
                Some(code) => write!(f, "\\{code}"),
                None => write!(f, "{c}"),
            },
            op => match op.operator() {
                Some(c) => write!(f, "{c}"),
                None => Ok(()),
            },
        }
    }
}

/// A regular expression in postfix order, ready for the machine stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postfix(Vec<PostfixToken>);

impl Postfix {
    #[must_use]
    pub fn tokens(&self) -> &[PostfixToken] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Postfix {
    type Item = &'a PostfixToken;
    type IntoIter = std::slice::Iter<'a, PostfixToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|token| write!(f, "{token}"))
    }
}

/// Characters with a meaning of their own in a regular expression
const METACHARACTERS: &[char] = &['(', ')', '[', ']', '|', '.', '+', '?', '*', '-', '\\'];

/// Translate the character following `\` into the symbol it stands for
#[must_use]
pub const fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        's' => ' ',
        other => other,
    }
}

/// Inverse of [`unescape`] for symbols that need an escape to be printed back
const fn escape_code(c: char) -> Option<char> {
    match c {
        '\n' => Some('n'),
        '\r' => Some('r'),
        '\t' => Some('t'),
        '\u{b}' => Some('v'),
        ' ' => Some('s'),
        '(' | ')' | '[' | ']' | '|' | '.' | '+' | '?' | '*' | '-' | '\\' => Some(c),
        _ => None,
    }
}

/// Infix lexeme after class expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Atom(char),
    Open,
    Close,
    Op(PostfixToken),
}

impl Lexeme {
    /// Nothing following this lexeme implies a concatenation
    const fn blocks_concat_after(self) -> bool {
        matches!(
            self,
            Self::Open | Self::Op(PostfixToken::Union | PostfixToken::Concat)
        )
    }

    /// This lexeme cannot be the right operand of an implicit concatenation
    const fn blocks_concat_before(self) -> bool {
        matches!(
            self,
            Self::Close
                | Self::Op(
                    PostfixToken::Union
                        | PostfixToken::Concat
                        | PostfixToken::Star
                        | PostfixToken::Plus
                        | PostfixToken::Optional
                )
        )
    }

    /// Operator-stack precedence, `(` lowest
    const fn precedence(self) -> u8 {
        match self {
            Self::Open | Self::Close => 1,
            Self::Op(PostfixToken::Union) => 2,
            Self::Op(PostfixToken::Concat) => 3,
            Self::Op(PostfixToken::Star | PostfixToken::Plus | PostfixToken::Optional) => 4,
            Self::Op(PostfixToken::Symbol(_)) | Self::Atom(_) => 6,
        }
    }
}

/// Convert an infix regular expression to postfix form
///
/// # Example
///
/// ```rust
/// use earlex::regex::to_postfix;
///
/// assert_eq!(to_postfix("ab|c")?.to_string(), "ab.c|");
/// assert_eq!(to_postfix("a(bb)+c")?.to_string(), "abb.+.c.");
/// assert_eq!(to_postfix("[a-c]")?.to_string(), "ab|c|");
/// # Ok::<(), earlex::error::InvalidRegex>(())
/// ```
///
/// # Errors
///
/// Returns [`InvalidRegex`] for an empty pattern, malformed bracket classes,
/// unbalanced parentheses or a trailing escape character.
pub fn to_postfix(regex: &str) -> Result<Postfix, InvalidRegex> {
    let fail = |kind| InvalidRegex::new(regex, kind);

    if regex.is_empty() {
        return Err(fail(RegexErrorKind::Empty));
    }

    let infix = expand(regex).map_err(fail)?;
    let explicit = insert_concatenation(&infix);
    shunting_yard(&explicit).map_err(fail)
}

/// First pass: resolve escapes and expand `[...]` classes into alternations
fn expand(regex: &str) -> Result<Vec<Lexeme>, RegexErrorKind> {
    let mut out = Vec::with_capacity(regex.len());
    let mut chars = regex.chars();

    while let Some(c) = chars.next() {
        let lexeme = match c {
            '\\' => Lexeme::Atom(unescape(chars.next().ok_or(RegexErrorKind::DanglingEscape)?)),
            '[' => {
                let class = read_class(&mut chars)?;
                out.push(Lexeme::Open);
                for (i, member) in class.into_iter().enumerate() {
                    if i > 0 {
                        out.push(Lexeme::Op(PostfixToken::Union));
                    }
                    out.push(Lexeme::Atom(member));
                }
                Lexeme::Close
            }
            ']' => return Err(RegexErrorKind::BadBrackets),
            '(' => Lexeme::Open,
            ')' => Lexeme::Close,
            '|' => Lexeme::Op(PostfixToken::Union),
            '.' => Lexeme::Op(PostfixToken::Concat),
            '*' => Lexeme::Op(PostfixToken::Star),
            '+' => Lexeme::Op(PostfixToken::Plus),
            '?' => Lexeme::Op(PostfixToken::Optional),
            other => Lexeme::Atom(other),
        };
        out.push(lexeme);
    }

    Ok(out)
}

/// Read the members of a bracket class; the opening `[` is already consumed
fn read_class(chars: &mut std::str::Chars<'_>) -> Result<SmallVec<[char; 16]>, RegexErrorKind> {
    // (character, came from an escape)
    let mut raw: SmallVec<[(char, bool); 16]> = SmallVec::new();
    loop {
        match chars.next() {
            None => return Err(RegexErrorKind::BadBrackets),
            Some(']') => break,
            Some('[') => return Err(RegexErrorKind::BadBrackets),
            Some('\\') => {
                let escaped = chars.next().ok_or(RegexErrorKind::DanglingEscape)?;
                raw.push((unescape(escaped), true));
            }
            Some(c) => raw.push((c, false)),
        }
    }

    if raw.is_empty() {
        return Err(RegexErrorKind::EmptyClass);
    }

    let mut members: SmallVec<[char; 16]> = SmallVec::new();
    let mut i = 0;
    while i < raw.len() {
        let (from, _) = raw[i];
        if i + 2 < raw.len() && raw[i + 1] == ('-', false) {
            let (to, _) = raw[i + 2];
            if from > to {
                return Err(RegexErrorKind::InvalidRange { from, to });
            }
            members.extend(from..=to);
            i += 3;
        } else {
            members.push(from);
            i += 1;
        }
    }

    Ok(members)
}

/// Second pass: make every concatenation explicit
fn insert_concatenation(infix: &[Lexeme]) -> Vec<Lexeme> {
    let mut out = Vec::with_capacity(infix.len() * 2);
    for (i, &lexeme) in infix.iter().enumerate() {
        if i > 0 {
            let previous = infix[i - 1];
            if !previous.blocks_concat_after() && !lexeme.blocks_concat_before() {
                out.push(Lexeme::Op(PostfixToken::Concat));
            }
        }
        out.push(lexeme);
    }
    out
}

/// Third pass: shunting-yard over the explicit infix form
fn shunting_yard(infix: &[Lexeme]) -> Result<Postfix, RegexErrorKind> {
    let mut stack: SmallVec<[Lexeme; 16]> = SmallVec::new();
    let mut postfix = Vec::with_capacity(infix.len());

    let emit = |lexeme: Lexeme, postfix: &mut Vec<PostfixToken>| match lexeme {
        Lexeme::Atom(c) => postfix.push(PostfixToken::Symbol(c)),
        Lexeme::Op(op) => postfix.push(op),
        Lexeme::Open | Lexeme::Close => {}
    };

    for &lexeme in infix {
        match lexeme {
            Lexeme::Open => stack.push(lexeme),
            Lexeme::Close => loop {
                match stack.pop() {
                    Some(Lexeme::Open) => break,
                    Some(top) => emit(top, &mut postfix),
                    None => return Err(RegexErrorKind::UnbalancedParentheses),
                }
            },
            _ => {
                while let Some(&top) = stack.last() {
                    if top.precedence() < lexeme.precedence() {
                        break;
                    }
                    stack.pop();
                    emit(top, &mut postfix);
                }
                stack.push(lexeme);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Lexeme::Open {
            return Err(RegexErrorKind::UnbalancedParentheses);
        }
        emit(top, &mut postfix);
    }

    Ok(Postfix(postfix))
}

/// Whether `c` has to be escaped to be matched literally
#[must_use]
pub fn is_metacharacter(c: char) -> bool {
    METACHARACTERS.contains(&c)
}

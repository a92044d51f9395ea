//! Thompson construction over a stack of automaton fragments

use crate::automaton::{Nfa, StateId};
use crate::error::{InvalidRegex, RegexErrorKind};
use crate::regex::{PostfixToken, to_postfix};
use compact_str::CompactString;
use smallvec::{SmallVec, smallvec};
use tracing::trace;

/// A partial automaton: entry state and accepting state
///
/// Fragments never own states; they point into the arena of the
/// [`MachineStack`] that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub accept: StateId,
}

/// A stacked fragment and, while it is still a bare symbol set, its symbols
///
/// A symbol set fragment is `start ─c→ accept` for each of its symbols with
/// no epsilon edges touching either state.
#[derive(Debug, Clone)]
struct Entry {
    fragment: Fragment,
    symbols: Option<SmallVec<[char; 4]>>,
}

impl Entry {
    const fn compound(fragment: Fragment) -> Self {
        Self {
            fragment,
            symbols: None,
        }
    }
}

/// Stack of fragments driven by postfix regular expressions
///
/// All fragments share one [`Nfa`], so combining two fragments only adds the
/// connecting states and epsilon edges. Expressions are reduced one after
/// another on top of the fragments of the expressions already finished; an
/// operator can never reach below the expression it belongs to.
///
/// The union of two symbol sets, which is what an expanded bracket class
/// reduces to, stays a single two-state fragment with one edge per symbol.
#[derive(Debug, Clone)]
pub struct MachineStack {
    nfa: Nfa,
    stack: Vec<Entry>,
    floor: usize,
}

impl Default for MachineStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nfa: Nfa::new(),
            stack: Vec::new(),
            floor: 0,
        }
    }

    /// Number of fragments on the stack
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn peek(&self) -> Option<Fragment> {
        self.stack.last().map(|entry| entry.fragment)
    }

    #[must_use]
    pub const fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// Push `start ─symbol→ accept`
    pub fn push_symbol(&mut self, symbol: char) {
        let start = self.nfa.add_state();
        let accept = self.nfa.add_state();
        self.nfa.add_transition(start, symbol, accept);
        self.stack.push(Entry {
            fragment: Fragment { start, accept },
            symbols: Some(smallvec![symbol]),
        });
    }

    /// Sequential concatenation of the two topmost fragments
    ///
    /// # Errors
    ///
    /// Fails when fewer than two fragments belong to the current expression.
    pub fn concatenate(&mut self) -> Result<(), RegexErrorKind> {
        let (left, right) = self.pop_pair('.')?;
        let (left, right) = (left.fragment, right.fragment);
        let (start, accept) = self.fresh_pair();
        self.nfa.add_epsilon(start, left.start);
        self.nfa.add_epsilon(left.accept, right.start);
        self.nfa.add_epsilon(right.accept, accept);
        self.push_compound(start, accept);
        Ok(())
    }

    /// Parallel union of the two topmost fragments
    ///
    /// # Errors
    ///
    /// Fails when fewer than two fragments belong to the current expression.
    pub fn unite(&mut self) -> Result<(), RegexErrorKind> {
        let (left, right) = self.pop_pair('|')?;
        let united = match (left.symbols, right.symbols) {
            (Some(mut symbols), Some(others)) => {
                let Fragment { start, accept } = left.fragment;
                for &symbol in &others {
                    self.nfa.add_transition(start, symbol, accept);
                }
                symbols.extend(others);
                Entry {
                    fragment: left.fragment,
                    symbols: Some(symbols),
                }
            }
            _ => Entry::compound(self.union_of(left.fragment, right.fragment)),
        };
        self.stack.push(united);
        Ok(())
    }

    /// Kleene star of the topmost fragment
    ///
    /// # Errors
    ///
    /// Fails when the current expression has no fragment.
    pub fn iterate(&mut self) -> Result<(), RegexErrorKind> {
        let inner = self.pop_one('*')?.fragment;
        let (start, accept) = self.fresh_pair();
        self.nfa.add_epsilon(start, accept);
        self.nfa.add_epsilon(start, inner.start);
        self.nfa.add_epsilon(inner.accept, accept);
        self.nfa.add_epsilon(accept, start);
        self.push_compound(start, accept);
        Ok(())
    }

    /// One or more repetitions of the topmost fragment
    ///
    /// # Errors
    ///
    /// Fails when the current expression has no fragment.
    pub fn at_least(&mut self) -> Result<(), RegexErrorKind> {
        let inner = self.pop_one('+')?.fragment;
        let (start, accept) = self.fresh_pair();
        self.nfa.add_epsilon(start, inner.start);
        self.nfa.add_epsilon(inner.accept, accept);
        self.nfa.add_epsilon(accept, start);
        self.push_compound(start, accept);
        Ok(())
    }

    /// Zero or one occurrence of the topmost fragment
    ///
    /// # Errors
    ///
    /// Fails when the current expression has no fragment.
    pub fn maybe(&mut self) -> Result<(), RegexErrorKind> {
        let inner = self.pop_one('?')?.fragment;
        let (start, accept) = self.fresh_pair();
        self.nfa.add_epsilon(start, accept);
        self.nfa.add_epsilon(start, inner.start);
        self.nfa.add_epsilon(inner.accept, accept);
        self.push_compound(start, accept);
        Ok(())
    }

    /// Apply one postfix token
    ///
    /// # Errors
    ///
    /// Fails when an operator lacks operands.
    pub fn apply(&mut self, token: PostfixToken) -> Result<(), RegexErrorKind> {
        match token {
            PostfixToken::Symbol(c) => {
                self.push_symbol(c);
                Ok(())
            }
            PostfixToken::Concat => self.concatenate(),
            PostfixToken::Union => self.unite(),
            PostfixToken::Star => self.iterate(),
            PostfixToken::Plus => self.at_least(),
            PostfixToken::Optional => self.maybe(),
        }
    }

    /// Compile `regex` on top of the stack and label its accepting state
    ///
    /// On failure the fragments of the rejected expression are discarded and
    /// the stack is left as it was before the call.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRegex`] for malformed expressions.
    pub fn add_expression(
        &mut self,
        name: impl Into<CompactString>,
        regex: &str,
    ) -> Result<Fragment, InvalidRegex> {
        let postfix = to_postfix(regex)?;
        self.floor = self.stack.len();

        let reduced = postfix
            .tokens()
            .iter()
            .try_for_each(|&token| self.apply(token))
            .and_then(|()| match self.stack.len() - self.floor {
                0 => Err(RegexErrorKind::Empty),
                1 => Ok(()),
                count => Err(RegexErrorKind::DanglingOperands { count }),
            });

        if let Err(kind) = reduced {
            self.stack.truncate(self.floor);
            return Err(InvalidRegex::new(regex, kind));
        }

        self.floor = self.stack.len();
        let Some(entry) = self.stack.last_mut() else {
            return Err(InvalidRegex::new(regex, RegexErrorKind::Empty));
        };
        // a finished expression is never merged into another symbol set
        entry.symbols = None;
        let fragment = entry.fragment;
        let name = name.into();
        trace!(name = %name, postfix = %postfix, start = %fragment.start, accept = %fragment.accept, "compiled expression");
        self.nfa.set_final(fragment.accept, name);
        Ok(fragment)
    }

    /// Unite every remaining fragment into one automaton
    #[must_use]
    pub fn build(mut self) -> Nfa {
        self.floor = 0;
        while self.stack.len() > 1 {
            let (Some(right), Some(left)) = (self.stack.pop(), self.stack.pop()) else {
                break;
            };
            let united = self.union_of(left.fragment, right.fragment);
            self.stack.push(Entry::compound(united));
        }
        if let Some(root) = self.stack.pop() {
            let entry = self.nfa.start();
            self.nfa.add_epsilon(entry, root.fragment.start);
        }
        self.nfa
    }

    fn union_of(&mut self, left: Fragment, right: Fragment) -> Fragment {
        let (start, accept) = self.fresh_pair();
        self.nfa.add_epsilon(start, left.start);
        self.nfa.add_epsilon(start, right.start);
        self.nfa.add_epsilon(left.accept, accept);
        self.nfa.add_epsilon(right.accept, accept);
        Fragment { start, accept }
    }

    fn push_compound(&mut self, start: StateId, accept: StateId) {
        self.stack.push(Entry::compound(Fragment { start, accept }));
    }

    fn fresh_pair(&mut self) -> (StateId, StateId) {
        (self.nfa.add_state(), self.nfa.add_state())
    }

    fn available(&self) -> usize {
        self.stack.len().saturating_sub(self.floor)
    }

    fn pop_one(&mut self, operator: char) -> Result<Entry, RegexErrorKind> {
        if self.available() < 1 {
            return Err(RegexErrorKind::MissingOperand { operator });
        }
        self.stack
            .pop()
            .ok_or(RegexErrorKind::MissingOperand { operator })
    }

    /// Pop `(left, right)` where `right` was on top
    fn pop_pair(&mut self, operator: char) -> Result<(Entry, Entry), RegexErrorKind> {
        if self.available() < 2 {
            return Err(RegexErrorKind::MissingOperand { operator });
        }
        let right = self.pop_one(operator)?;
        let left = self.pop_one(operator)?;
        Ok((left, right))
    }
}

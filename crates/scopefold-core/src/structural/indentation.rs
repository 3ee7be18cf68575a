//! Logical indentation levels
//!
//! Derives one nesting level per token from scope names alone, ignoring
//! physical whitespace. A level rises on the line *after* an opening
//! construct (its body), a dedent token lowers its whole line, a redent
//! (`else`) closes and reopens on the same depth, and a continuation token
//! defers commitment of a pending opener by one more line.

use tracing::debug;

use crate::config::Selectors;
use crate::token::Token;

/// How a single token affects nesting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TokenClass {
    /// Weighted indentation match; >0 opens, <0 closes
    delta: i32,
    redent: bool,
    continuation: bool,
}

impl TokenClass {
    fn is_indent(self) -> bool {
        self.delta > 0
    }

    fn is_dedent(self) -> bool {
        self.delta < 0
    }

    fn is_declaration(self) -> bool {
        self.is_indent() || self.redent
    }
}

/// Per-parse scan state, threaded through the token walk by value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct IndentationState {
    /// An opener is waiting for its body
    declaration: bool,
    /// The logical line continues onto the next physical line
    continuation: bool,
    /// Pending level change of the open declaration
    delta: i32,
    /// Line of the previous token
    line: usize,
    /// Committed nesting depth
    level: i32,
}

impl IndentationState {
    /// Consume one token. `emitted` are the tokens whose levels are already
    /// in `levels`; a dedent patches the ones sharing its line.
    fn step(mut self, token: &Token, class: TokenClass, emitted: &[Token], levels: &mut [i32]) -> Self {
        if !self.declaration {
            if class.is_dedent() {
                self.level += class.delta;
                emitted
                    .iter()
                    .zip(levels.iter_mut())
                    .rev()
                    .take_while(|(prior, _)| prior.line == token.line)
                    .for_each(|(_, level)| *level += class.delta);
            }
            if class.is_declaration() {
                self.delta += class.delta.abs();
            }
        }

        // chained openers on the declaration line accumulate; a redent
        // inside an open declaration leaves it untouched
        if self.declaration && !class.redent {
            self.delta += class.delta;
        }

        self.declaration |= class.is_declaration();
        self.continuation |= class.continuation;

        if self.declaration && token.line > self.line {
            if self.continuation {
                self.continuation = false;
            } else {
                self.level += self.delta;
                self.delta = 0;
                self.declaration = false;
            }
        }

        self.line = token.line;
        self
    }
}

/// Computes logical levels for a token stream
#[derive(Debug, Clone, Copy)]
pub struct IndentationEngine<'a> {
    selectors: &'a Selectors,
}

impl<'a> IndentationEngine<'a> {
    pub fn new(selectors: &'a Selectors) -> Self {
        Self { selectors }
    }

    fn classify(&self, token: &Token) -> TokenClass {
        let scopes = token.scopes.as_slice();
        TokenClass {
            delta: self.selectors.indentation.value(scopes),
            redent: self.selectors.dedentation.matches(scopes),
            continuation: self.selectors.continuation.matches(scopes),
        }
    }

    /// One level per token, excluding the trailing end-of-stream token.
    ///
    /// Levels are not clamped: a stray dedent can drive them negative.
    pub fn levels(&self, tokens: &[Token]) -> Vec<i32> {
        let stream = &tokens[..tokens.len().saturating_sub(1)];
        let mut levels: Vec<i32> = Vec::with_capacity(stream.len());
        let mut state = IndentationState::default();

        for (index, token) in stream.iter().enumerate() {
            let class = self.classify(token);
            state = state.step(token, class, &stream[..index], &mut levels);
            levels.push(state.level);
        }

        debug!(
            "Computed {} levels (final level {}, pending declaration: {})",
            levels.len(),
            state.level,
            state.declaration
        );

        levels
    }
}

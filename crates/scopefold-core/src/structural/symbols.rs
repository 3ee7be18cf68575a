//! Symbol merging
//!
//! Joins runs of assignment-like tokens on one line (`a.b.c`, multi-token
//! constants) into a single token so outline consumers see one symbol.

use tracing::debug;

use crate::config::Selectors;
use crate::token::Token;

/// Merges adjacent assignment tokens
#[derive(Debug, Clone, Copy)]
pub struct SymbolMerger<'a> {
    selectors: &'a Selectors,
}

impl<'a> SymbolMerger<'a> {
    pub fn new(selectors: &'a Selectors) -> Self {
        Self { selectors }
    }

    /// Merged copy of the stream, without the end-of-stream token
    pub fn merge(&self, tokens: &[Token]) -> Vec<Token> {
        let stream = &tokens[..tokens.len().saturating_sub(1)];
        let mut output = Vec::with_capacity(stream.len());
        let mut index = 0;

        while index < stream.len() {
            let mut token = stream[index].clone();
            while let Some(next) = stream.get(index + 1) {
                if next.line != token.line || !self.joins(&token, next) {
                    break;
                }
                token.end_index = next.end_index;
                token.text.push_str(&next.text);
                index += 1;
            }
            output.push(token);
            index += 1;
        }

        debug!("Merged {} tokens into {} symbols", stream.len(), output.len());
        output
    }

    /// `token` keeps the scopes of the first token of its run
    fn joins(&self, token: &Token, next: &Token) -> bool {
        let assignment = &self.selectors.assignment;
        let current = token.scopes.as_slice();
        let following = next.scopes.as_slice();

        (assignment.single.matches(current) && assignment.single.matches(following))
            || (assignment.multiple.matches(current)
                && assignment.multiple.matches(following)
                && !assignment.separator.matches(following))
    }
}

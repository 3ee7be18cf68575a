//! Tokenizer contract and document tokenization
//!
//! The grammar engine itself lives outside this crate. It is called once
//! per line with the engine state returned for the previous line, so
//! tokenization is strictly sequential.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::token::Token;

/// A token as reported by the grammar engine, before line tagging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToken {
    pub start_index: usize,
    pub end_index: usize,
    pub scopes: Vec<String>,
}

/// Result of tokenizing one line
#[derive(Debug, Clone)]
pub struct LineTokens<S> {
    pub tokens: Vec<RawToken>,
    /// Engine state to carry into the next line
    pub state: S,
}

/// A scope-based grammar engine
pub trait Tokenizer {
    /// Engine state threaded between lines
    type State: Clone;
    /// Failure reported by the engine
    type Error: std::error::Error + Send + Sync + 'static;

    /// State before the first line
    fn initial_state(&self) -> Self::State;

    /// Tokenize one line of text
    fn tokenize_line(
        &mut self,
        text: &str,
        state: &Self::State,
    ) -> std::result::Result<LineTokens<Self::State>, Self::Error>;
}

/// Tokenize a whole document into a scope stream
///
/// Every token is tagged with its line, text, most specific scope and the
/// physical indentation level of its line. The stream ends with a synthetic
/// end-of-stream token. A tokenizer failure aborts the whole document.
pub fn tokenize_document<T: Tokenizer>(document: &Document, tokenizer: &mut T) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut state = tokenizer.initial_state();
    let mut indent_unit = 0;

    for (line_number, text) in document.lines().enumerate() {
        let leading = first_non_whitespace(text);
        if indent_unit == 0 && leading > 0 {
            indent_unit = leading;
        }
        let indent = if indent_unit == 0 { 0 } else { leading / indent_unit };

        let result = tokenizer
            .tokenize_line(text, &state)
            .map_err(|source| Error::Tokenizer {
                line: line_number,
                source: Box::new(source),
            })?;
        state = result.state;

        for raw in result.tokens {
            let text = char_slice(text, raw.start_index, raw.end_index);
            tokens.push(
                Token::new(line_number, raw.start_index, raw.end_index, text, raw.scopes)
                    .with_indent(indent),
            );
        }
    }

    let last_line = document.last_line();
    let column = document.line(last_line).map_or(0, |line| line.chars().count());
    tokens.push(Token::end_of_stream(last_line, column));

    debug!(
        "Tokenized {} lines into {} tokens (indent unit {})",
        document.line_count(),
        tokens.len() - 1,
        indent_unit
    );

    Ok(tokens)
}

/// Char index of the first non-whitespace char; the line length when blank
fn first_non_whitespace(text: &str) -> usize {
    text.chars()
        .position(|c| !c.is_whitespace())
        .unwrap_or_else(|| text.chars().count())
}

/// Substring by char offsets, clamped to the line
fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// A raw token recorded with its line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedToken {
    pub line: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub scopes: Vec<String>,
}

/// Replays tokens recorded from a grammar engine
///
/// The state is the index of the next line to replay. Records for lines
/// the document does not have are never replayed.
#[derive(Debug, Clone, Default)]
pub struct PretokenizedTokenizer {
    lines: BTreeMap<usize, Vec<RawToken>>,
}

impl PretokenizedTokenizer {
    /// Group recorded tokens by line, in (line, start) order
    pub fn from_records(mut records: Vec<RecordedToken>) -> Self {
        records.sort_by_key(|record| (record.line, record.start_index));
        let mut lines: BTreeMap<usize, Vec<RawToken>> = BTreeMap::new();
        for record in records {
            lines.entry(record.line).or_default().push(RawToken {
                start_index: record.start_index,
                end_index: record.end_index,
                scopes: record.scopes,
            });
        }
        Self { lines }
    }
}

impl Tokenizer for PretokenizedTokenizer {
    type State = usize;
    type Error = std::convert::Infallible;

    fn initial_state(&self) -> usize {
        0
    }

    fn tokenize_line(
        &mut self,
        _text: &str,
        state: &usize,
    ) -> std::result::Result<LineTokens<usize>, Self::Error> {
        Ok(LineTokens {
            tokens: self.lines.get(state).cloned().unwrap_or_default(),
            state: state + 1,
        })
    }
}

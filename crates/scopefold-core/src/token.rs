//! Scope-classified tokens

use serde::{Deserialize, Serialize};

/// One lexical unit of a document, as produced by a scope-based tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Line number, zero-indexed
    pub line: usize,
    /// Start offset within the line (chars)
    pub start_index: usize,
    /// End offset within the line (chars, exclusive)
    pub end_index: usize,
    /// Covered text
    pub text: String,
    /// Scope names, least to most specific
    pub scopes: Vec<String>,
    /// Most specific scope name (last of `scopes`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Physical indentation level of the token's line
    #[serde(default)]
    pub indent: usize,
}

impl Token {
    /// Build a token; `kind` is taken from the last scope
    pub fn new(
        line: usize,
        start_index: usize,
        end_index: usize,
        text: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        let kind = scopes.last().cloned().unwrap_or_default();
        Self {
            line,
            start_index,
            end_index,
            text: text.into(),
            scopes,
            kind,
            indent: 0,
        }
    }

    /// Synthetic marker closing a token stream
    pub fn end_of_stream(line: usize, column: usize) -> Self {
        Self::new(line, column, column, String::new(), Vec::new())
    }

    /// True for the synthetic end-of-stream marker
    pub fn is_end_of_stream(&self) -> bool {
        self.scopes.is_empty() && self.start_index == self.end_index
    }

    /// Set the physical indentation level
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

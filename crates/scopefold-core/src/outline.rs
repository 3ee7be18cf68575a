//! Outline contract
//!
//! Section extraction is done by an external outline service. Header
//! folding only needs each entry's line, nesting level and anchor token.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::token::Token;

/// Classification of an outline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A section header; delimits header folding ranges
    Section,
    /// Any other symbol
    #[default]
    Symbol,
}

/// One outline node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Line of the entry, zero-indexed
    pub line: usize,
    /// Logical nesting level of the entry's declaration
    pub level: i32,
    /// Index of the token where the entry's declaration sits
    pub anchor: usize,
    #[serde(default, rename = "type")]
    pub kind: EntryKind,
}

impl OutlineEntry {
    /// Create a section entry
    pub fn section(line: usize, level: i32, anchor: usize) -> Self {
        Self {
            line,
            level,
            anchor,
            kind: EntryKind::Section,
        }
    }

    /// True when the entry delimits header folding
    pub fn is_section(&self) -> bool {
        self.kind == EntryKind::Section
    }
}

/// Produces the outline of a document
pub trait OutlineProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    fn outline(&self, document: &Document, tokens: &[Token]) -> Result<Vec<OutlineEntry>, Self::Error>;
}

/// Provider with no outline at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutline;

impl OutlineProvider for NoOutline {
    type Error = std::convert::Infallible;

    fn outline(&self, _document: &Document, _tokens: &[Token]) -> Result<Vec<OutlineEntry>, Self::Error> {
        Ok(Vec::new())
    }
}

/// Provider returning a fixed list of entries
#[derive(Debug, Clone, Default)]
pub struct StaticOutline {
    entries: Vec<OutlineEntry>,
}

impl StaticOutline {
    pub fn new(entries: Vec<OutlineEntry>) -> Self {
        Self { entries }
    }
}

impl OutlineProvider for StaticOutline {
    type Error = std::convert::Infallible;

    fn outline(&self, _document: &Document, _tokens: &[Token]) -> Result<Vec<OutlineEntry>, Self::Error> {
        Ok(self.entries.clone())
    }
}

//! Structural analysis of scope streams
//!
//! This module derives document structure without a syntax tree:
//! - Logical indentation levels per token
//! - Folding ranges (regions, outline headers, level blocks)
//! - Merged assignment symbols
//!
//! [`StructuralAnalyzer`] runs the whole pipeline for one document:
//! tokenize → levels → outline → folding ranges. Each call recomputes from
//! scratch; nothing is kept between documents.

pub mod folding;
pub mod indentation;
pub mod symbols;

pub use folding::{
    match_markers, FoldPass, FoldingEngine, FoldingMarker, FoldingRange, FoldingRangeKind,
    FoldingReport, MarkerMatch, UnmatchedMarker, RANGE_LIMIT,
};
pub use indentation::IndentationEngine;
pub use symbols::SymbolMerger;

use serde::Serialize;
use tracing::debug;

use crate::config::{Selectors, Settings};
use crate::document::Document;
use crate::error::{ConfigError, Error, Result};
use crate::outline::{OutlineEntry, OutlineProvider};
use crate::token::Token;
use crate::tokenizer::{tokenize_document, Tokenizer};

/// Everything derived for one document version
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub levels: Vec<i32>,
    pub outline: Vec<OutlineEntry>,
    pub folding: FoldingReport,
}

/// Runs the structural engines with one set of selectors
#[derive(Debug, Clone)]
pub struct StructuralAnalyzer {
    selectors: Selectors,
}

impl StructuralAnalyzer {
    pub fn new(selectors: Selectors) -> Self {
        Self { selectors }
    }

    /// Compile settings into an analyzer
    pub fn from_settings(settings: &Settings) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(settings.compile()?))
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    /// Logical level per token (end-of-stream excluded)
    pub fn levels(&self, tokens: &[Token]) -> Vec<i32> {
        IndentationEngine::new(&self.selectors).levels(tokens)
    }

    /// Capped folding ranges for an already tokenized document
    pub fn folding_ranges(
        &self,
        document: &Document,
        tokens: &[Token],
        levels: &[i32],
        outline: &[OutlineEntry],
    ) -> Vec<FoldingRange> {
        FoldingEngine::new(&self.selectors).folding_ranges(document, tokens, levels, outline)
    }

    /// Assignment-merged symbol tokens
    pub fn symbols(&self, tokens: &[Token]) -> Vec<Token> {
        SymbolMerger::new(&self.selectors).merge(tokens)
    }

    /// Tokenize, compute levels, fetch the outline and fold.
    ///
    /// Fails only when a collaborator fails.
    pub fn analyze<T, O>(&self, document: &Document, tokenizer: &mut T, outline: &O) -> Result<Analysis>
    where
        T: Tokenizer,
        O: OutlineProvider,
    {
        let tokens = tokenize_document(document, tokenizer)?;
        let levels = self.levels(&tokens);
        let outline = outline
            .outline(document, &tokens)
            .map_err(|err| Error::Outline(Box::new(err)))?;
        let folding =
            FoldingEngine::new(&self.selectors).folding_report(document, &tokens, &levels, &outline);

        debug!(
            "Analyzed {} lines: {} tokens, {} outline entries, {} folding ranges",
            document.line_count(),
            levels.len(),
            outline.len(),
            folding.ranges.len()
        );

        Ok(Analysis {
            tokens,
            levels,
            outline,
            folding,
        })
    }
}

//! scopefold-core - structure from scope streams
//!
//! Infers logical nesting depth and folding ranges from the flat token
//! stream of a TextMate-style grammar engine, using only scope names and
//! line positions:
//! - Indentation levels per token (openers, dedents, redents, continuations)
//! - Folding ranges for region comments, outline sections and level blocks
//! - Assignment symbol merging
//!
//! # Example
//!
//! ```
//! use scopefold_core::{Document, Settings, StructuralAnalyzer, Token};
//!
//! let analyzer = StructuralAnalyzer::from_settings(&Settings::default()).unwrap();
//! let document = Document::from_text("fn main() {\n    body();\n}");
//! let scoped = |line, scope: &str| Token::new(line, 0, 1, "", vec![scope.to_string()]);
//! let tokens = vec![
//!     scoped(0, "punctuation.section.block.begin"),
//!     scoped(1, "source"),
//!     scoped(2, "punctuation.section.block.end"),
//!     Token::end_of_stream(2, 1),
//! ];
//!
//! let levels = analyzer.levels(&tokens);
//! assert_eq!(levels, vec![0, 1, 0]);
//!
//! let ranges = analyzer.folding_ranges(&document, &tokens, &levels, &[]);
//! assert_eq!((ranges[0].start, ranges[0].end), (0, 1));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod outline;
pub mod selector;
pub mod structural;
pub mod token;
pub mod tokenizer;

// Re-export main types and functions
pub use config::{Selectors, Settings};
pub use document::Document;
pub use error::{ConfigError, Error, Result, SelectorError};
pub use outline::{EntryKind, NoOutline, OutlineEntry, OutlineProvider, StaticOutline};
pub use selector::{ScopeSelector, ScopeSelectorMap};
pub use structural::{
    Analysis, FoldingEngine, FoldingRange, FoldingRangeKind, FoldingReport, IndentationEngine,
    StructuralAnalyzer, SymbolMerger, UnmatchedMarker, RANGE_LIMIT,
};
pub use token::Token;
pub use tokenizer::{tokenize_document, LineTokens, PretokenizedTokenizer, RawToken, RecordedToken, Tokenizer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

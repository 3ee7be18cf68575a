//! Error types for scopefold.
//!
//! The structural engines themselves never fail. Errors only come from
//! loading configuration and from the external collaborators (tokenizer,
//! outline provider), and they abort the computation for that document.

use thiserror::Error;

/// Result type for scopefold operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed collaborator error
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while parsing a scope selector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A character outside the selector grammar
    #[error("unexpected character '{found}' at offset {offset} in selector \"{selector}\"")]
    UnexpectedChar {
        selector: String,
        found: char,
        offset: usize,
    },

    /// Nothing between two union operators
    #[error("empty alternative in selector \"{0}\"")]
    EmptyAlternative(String),

    /// A `-` with no path after it
    #[error("exclusion without a scope path in selector \"{0}\"")]
    DanglingExclusion(String),
}

/// Errors raised while loading or compiling configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error while reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A selector that does not parse
    #[error("invalid selector for `{key}`: {source}")]
    Selector {
        key: String,
        #[source]
        source: SelectorError,
    },

    /// A marker pattern that does not compile
    #[error("invalid pattern for `{key}`: {source}")]
    Regex {
        key: String,
        #[source]
        source: regex::Error,
    },
}

/// Top-level error for a document analysis
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The tokenizer failed on a line
    #[error("tokenizer failed on line {line}: {source}")]
    Tokenizer {
        line: usize,
        #[source]
        source: BoxError,
    },

    /// The outline provider failed
    #[error("outline provider failed: {0}")]
    Outline(#[source] BoxError),
}

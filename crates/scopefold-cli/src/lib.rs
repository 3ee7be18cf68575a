//! scopefold CLI - Command-line interface library
//!
//! This library provides the CLI functionality for scopefold, including:
//! - Levels: logical nesting level per token
//! - Fold: folding ranges, optionally with unmatched-marker diagnostics
//! - Symbols: tokens with assignment symbols merged
//! - Config: the default configuration as TOML
//!
//! # Library Usage
//!
//! ```ignore
//! use scopefold_cli::{fold_command, OutputFormat};
//!
//! let json = fold_command(&input, &tokens, None, None, OutputFormat::Json, true)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Folding ranges from a recorded token stream
//! scopefold fold main.c --tokens main.tokens.json --diagnostics
//!
//! # Levels as JSON, with a custom configuration
//! scopefold levels main.c --tokens main.tokens.json --config scopefold.toml --format json
//!
//! # Start a configuration file
//! scopefold config > scopefold.toml
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{config_command, fold_command, levels_command, symbols_command};
pub use app::{run_cli, OutputFormat};

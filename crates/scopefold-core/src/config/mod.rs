//! Configuration
//!
//! Settings are loaded from `scopefold.toml` and compiled into the
//! [`Selectors`] consumed by the structural engines:
//!
//! ```toml
//! [selectors]
//! indentation = { "punctuation.section.block.begin" = 1, "punctuation.section.block.end" = -1, "punctuation.section.braces.begin" = 1, "punctuation.section.braces.end" = -1 }
//! dedentation = "keyword.control.else"
//! comments = "comment"
//! imports = "meta.import"
//!
//! [selectors.punctuation]
//! continuation = "punctuation.separator.continuation"
//!
//! [selectors.markers]
//! start = '^\s*(?://|#|--)?\s*#?region\b'
//! end = '^\s*(?://|#|--)?\s*#?endregion\b'
//!
//! [selectors.assignment]
//! single = "variable.other.constant"
//! multiple = "variable.other.object, punctuation.accessor, variable.other.property"
//! separator = "punctuation.separator"
//! ```
//!
//! The values above are the defaults. Missing sections fall back to them.

mod selectors;
mod settings;


pub use selectors::{AssignmentSelectors, Selectors};
pub use settings::{
    AssignmentSettings, MarkerSettings, PunctuationSettings, SelectorSettings, Settings,
    CONFIG_FILE_NAME,
};

//! Configuration settings
//!
//! Plain serde structures mirroring `scopefold.toml`. Nothing is validated
//! until [`Settings::compile`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::selectors::Selectors;
use crate::error::ConfigError;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "scopefold.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Scope selectors for every semantic role
    pub selectors: SelectorSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Render settings as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse every selector and compile the marker patterns
    pub fn compile(&self) -> Result<Selectors, ConfigError> {
        Selectors::compile(&self.selectors)
    }
}

/// Selector configuration, one entry per semantic role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    /// Selector → level delta; positive opens a level, negative closes one
    pub indentation: BTreeMap<String, i32>,
    /// Tokens that close and reopen a level on the same depth (`else`)
    pub dedentation: String,
    /// Classifies block folds as comments
    pub comments: String,
    /// Classifies block folds as imports
    pub imports: String,
    pub punctuation: PunctuationSettings,
    pub markers: MarkerSettings,
    pub assignment: AssignmentSettings,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            indentation: default_indentation(),
            dedentation: "keyword.control.else".to_string(),
            comments: "comment".to_string(),
            imports: "meta.import".to_string(),
            punctuation: PunctuationSettings::default(),
            markers: MarkerSettings::default(),
            assignment: AssignmentSettings::default(),
        }
    }
}

fn default_indentation() -> BTreeMap<String, i32> {
    [
        ("punctuation.section.block.begin", 1),
        ("punctuation.section.block.end", -1),
        ("punctuation.section.braces.begin", 1),
        ("punctuation.section.braces.end", -1),
    ]
    .into_iter()
    .map(|(selector, delta)| (selector.to_string(), delta))
    .collect()
}

/// Punctuation roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PunctuationSettings {
    /// Tokens that leave the logical line open (trailing operator, `\`)
    pub continuation: String,
}

impl Default for PunctuationSettings {
    fn default() -> Self {
        Self {
            continuation: "punctuation.separator.continuation".to_string(),
        }
    }
}

/// Region marker patterns, matched against comment token text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub start: String,
    pub end: String,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            start: r"^\s*(?://|#|--)?\s*#?region\b".to_string(),
            end: r"^\s*(?://|#|--)?\s*#?endregion\b".to_string(),
        }
    }
}

/// Selectors used when merging assignment-like tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentSettings {
    /// Tokens that join with neighbours of the same role
    pub single: String,
    /// Tokens that join into dotted chains
    pub multiple: String,
    /// Tokens that break a `multiple` chain
    pub separator: String,
}

impl Default for AssignmentSettings {
    fn default() -> Self {
        Self {
            single: "variable.other.constant".to_string(),
            multiple: "variable.other.object, punctuation.accessor, variable.other.property"
                .to_string(),
            separator: "punctuation.separator".to_string(),
        }
    }
}

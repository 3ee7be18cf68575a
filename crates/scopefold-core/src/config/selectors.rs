//! Compiled selector roles

use regex::Regex;

use super::settings::SelectorSettings;
use crate::error::ConfigError;
use crate::selector::{ScopeSelector, ScopeSelectorMap};
use crate::token::Token;

/// Compiled selectors, one per semantic role
///
/// Immutable once built; the engines only borrow it.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub indentation: ScopeSelectorMap,
    pub dedentation: ScopeSelector,
    pub continuation: ScopeSelector,
    pub comments: ScopeSelector,
    pub imports: ScopeSelector,
    /// `None` when the pattern is empty (no region markers)
    pub region_start: Option<Regex>,
    pub region_end: Option<Regex>,
    pub assignment: AssignmentSelectors,
}

/// Roles used by symbol merging
#[derive(Debug, Clone, Default)]
pub struct AssignmentSelectors {
    pub single: ScopeSelector,
    pub multiple: ScopeSelector,
    pub separator: ScopeSelector,
}

impl Selectors {
    pub(super) fn compile(settings: &SelectorSettings) -> Result<Self, ConfigError> {
        let mut indentation = ScopeSelectorMap::new();
        for (source, delta) in &settings.indentation {
            let selector = ScopeSelector::parse(source).map_err(|source_err| ConfigError::Selector {
                key: format!("selectors.indentation.\"{}\"", source),
                source: source_err,
            })?;
            indentation.insert(selector, *delta);
        }

        Ok(Self {
            indentation,
            dedentation: selector("selectors.dedentation", &settings.dedentation)?,
            continuation: selector(
                "selectors.punctuation.continuation",
                &settings.punctuation.continuation,
            )?,
            comments: selector("selectors.comments", &settings.comments)?,
            imports: selector("selectors.imports", &settings.imports)?,
            region_start: pattern("selectors.markers.start", &settings.markers.start)?,
            region_end: pattern("selectors.markers.end", &settings.markers.end)?,
            assignment: AssignmentSelectors {
                single: selector("selectors.assignment.single", &settings.assignment.single)?,
                multiple: selector("selectors.assignment.multiple", &settings.assignment.multiple)?,
                separator: selector(
                    "selectors.assignment.separator",
                    &settings.assignment.separator,
                )?,
            },
        })
    }

    /// Token carries a comment scope
    pub fn is_comment(&self, token: &Token) -> bool {
        self.comments.matches(token.scopes.as_slice())
    }

    /// Comment token whose text opens a region
    pub fn is_region_start(&self, token: &Token) -> bool {
        self.region_start
            .as_ref()
            .is_some_and(|re| re.is_match(&token.text))
    }

    /// Comment token whose text closes a region
    pub fn is_region_end(&self, token: &Token) -> bool {
        self.region_end
            .as_ref()
            .is_some_and(|re| re.is_match(&token.text))
    }

    /// Comment token carrying a region start or end marker
    pub fn is_region(&self, token: &Token) -> bool {
        self.is_comment(token) && (self.is_region_start(token) || self.is_region_end(token))
    }
}

fn selector(key: &str, source: &str) -> Result<ScopeSelector, ConfigError> {
    ScopeSelector::parse(source).map_err(|source| ConfigError::Selector {
        key: key.to_string(),
        source,
    })
}

fn pattern(key: &str, source: &str) -> Result<Option<Regex>, ConfigError> {
    if source.is_empty() {
        return Ok(None);
    }
    Regex::new(source)
        .map(Some)
        .map_err(|source| ConfigError::Regex {
            key: key.to_string(),
            source,
        })
}

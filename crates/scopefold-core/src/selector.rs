//! TextMate-style scope selectors
//!
//! A selector tests the ordered scope list of a token (least to most
//! specific). Supported syntax:
//! - `comment` matches any scope equal to `comment` or starting with `comment.`
//! - `meta.block keyword` matches `keyword` somewhere after `meta.block`
//! - `a, b` or `a | b` is a union
//! - `source.js -comment` excludes tokens whose scopes match `comment`
//!
//! An empty selector matches nothing.

use std::fmt;
use std::str::FromStr;

use crate::error::SelectorError;

/// Ordered list of scope prefixes that must appear as a subsequence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ScopePath {
    items: Vec<String>,
}

impl ScopePath {
    /// Depth reached by the last item (1-based), or `None` when unmatched.
    /// An empty path matches everything at depth 0.
    fn rank<S: AsRef<str>>(&self, scopes: &[S]) -> Option<usize> {
        let mut cursor = 0;
        for item in &self.items {
            let found = scopes[cursor..]
                .iter()
                .position(|scope| prefix_matches(item, scope.as_ref()))?;
            cursor += found + 1;
        }
        Some(cursor)
    }
}

/// `keyword.control` matches `keyword.control` and `keyword.control.if`,
/// but not `keyword.controlflow`
fn prefix_matches(item: &str, scope: &str) -> bool {
    scope == item || (scope.starts_with(item) && scope.as_bytes().get(item.len()) == Some(&b'.'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Alternative {
    path: ScopePath,
    exclusions: Vec<ScopePath>,
}

impl Alternative {
    fn rank<S: AsRef<str>>(&self, scopes: &[S]) -> Option<usize> {
        if self.exclusions.iter().any(|path| path.rank(scopes).is_some()) {
            return None;
        }
        self.path.rank(scopes)
    }
}

/// A compiled scope selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeSelector {
    source: String,
    alternatives: Vec<Alternative>,
}

impl ScopeSelector {
    /// Parse a selector expression
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        Parser::new(source).parse()
    }

    /// Selector that never matches
    pub fn never() -> Self {
        Self::default()
    }

    /// The selector text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the selector has no alternatives (matches nothing)
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Test an ordered scope list
    pub fn matches<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        self.rank(scopes).is_some()
    }

    /// Test a single scope name
    pub fn matches_scope(&self, scope: &str) -> bool {
        self.matches(&[scope])
    }

    /// Specificity of the best matching alternative: the 1-based depth of
    /// the deepest scope reached, or `None` if nothing matches
    pub fn rank<S: AsRef<str>>(&self, scopes: &[S]) -> Option<usize> {
        self.alternatives
            .iter()
            .filter_map(|alternative| alternative.rank(scopes))
            .max()
    }
}

impl FromStr for ScopeSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScopeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    source: &'a str,
    alternatives: Vec<Alternative>,
    path: Vec<String>,
    exclusions: Vec<ScopePath>,
    /// Items of the exclusion currently being read, if a `-` was seen
    exclusion: Option<Vec<String>>,
    word: String,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            alternatives: Vec::new(),
            path: Vec::new(),
            exclusions: Vec::new(),
            exclusion: None,
            word: String::new(),
        }
    }

    fn parse(mut self) -> Result<ScopeSelector, SelectorError> {
        if self.source.trim().is_empty() {
            return Ok(ScopeSelector {
                source: self.source.to_string(),
                alternatives: Vec::new(),
            });
        }

        for (offset, c) in self.source.char_indices() {
            match c {
                c if c.is_whitespace() => self.flush_word(),
                ',' | '|' => {
                    self.flush_word();
                    self.finish_alternative()?;
                }
                '-' if self.word.is_empty() => {
                    self.finish_exclusion()?;
                    self.exclusion = Some(Vec::new());
                }
                c if is_scope_char(c) => self.word.push(c),
                found => {
                    return Err(SelectorError::UnexpectedChar {
                        selector: self.source.to_string(),
                        found,
                        offset,
                    })
                }
            }
        }
        self.flush_word();
        self.finish_alternative()?;

        Ok(ScopeSelector {
            source: self.source.to_string(),
            alternatives: self.alternatives,
        })
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.word);
        match self.exclusion.as_mut() {
            Some(items) => items.push(word),
            None => self.path.push(word),
        }
    }

    fn finish_exclusion(&mut self) -> Result<(), SelectorError> {
        if let Some(items) = self.exclusion.take() {
            if items.is_empty() {
                return Err(SelectorError::DanglingExclusion(self.source.to_string()));
            }
            self.exclusions.push(ScopePath { items });
        }
        Ok(())
    }

    fn finish_alternative(&mut self) -> Result<(), SelectorError> {
        self.finish_exclusion()?;
        if self.path.is_empty() && self.exclusions.is_empty() {
            return Err(SelectorError::EmptyAlternative(self.source.to_string()));
        }
        self.alternatives.push(Alternative {
            path: ScopePath {
                items: std::mem::take(&mut self.path),
            },
            exclusions: std::mem::take(&mut self.exclusions),
        });
        Ok(())
    }
}

fn is_scope_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | '+' | '#' | '$' | '@' | '*')
}

/// Selector → signed weight table
///
/// Used for the indentation role: positive weights open a level, negative
/// weights close one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeSelectorMap {
    entries: Vec<(ScopeSelector, i32)>,
}

impl ScopeSelectorMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(selector, weight)` pairs, parsing each selector
    pub fn from_entries<I, K>(entries: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = (K, i32)>,
        K: AsRef<str>,
    {
        let mut map = Self::new();
        for (selector, weight) in entries {
            map.insert(ScopeSelector::parse(selector.as_ref())?, weight);
        }
        Ok(map)
    }

    /// Append an entry
    pub fn insert(&mut self, selector: ScopeSelector, weight: i32) {
        self.entries.push((selector, weight));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of the most specific matching entry, 0 when nothing matches.
    /// Ties go to the earliest entry.
    pub fn value<S: AsRef<str>>(&self, scopes: &[S]) -> i32 {
        let mut best: Option<(usize, i32)> = None;
        for (selector, weight) in &self.entries {
            if let Some(rank) = selector.rank(scopes) {
                if best.is_none_or(|(best_rank, _)| rank > best_rank) {
                    best = Some((rank, *weight));
                }
            }
        }
        best.map_or(0, |(_, weight)| weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(source: &str) -> ScopeSelector {
        ScopeSelector::parse(source).unwrap()
    }

    #[test]
    fn test_prefix_match() {
        let selector = sel("comment");
        assert!(selector.matches(&["source.js", "comment.line.double-slash.js"]));
        assert!(selector.matches_scope("comment"));
        assert!(!selector.matches_scope("commentary.line"));
        assert!(!selector.matches(&["source.js", "string.quoted"]));
    }

    #[test]
    fn test_descendant_path_is_ordered() {
        let selector = sel("meta.block keyword.control");
        assert!(selector.matches(&["source.c", "meta.block.c", "keyword.control.if.c"]));
        assert!(!selector.matches(&["source.c", "keyword.control.if.c", "meta.block.c"]));
    }

    #[test]
    fn test_union_and_exclusion() {
        let selector = sel("string, comment -comment.block");
        assert!(selector.matches_scope("string.quoted"));
        assert!(selector.matches_scope("comment.line"));
        assert!(!selector.matches_scope("comment.block.documentation"));

        let piped = sel("string | constant");
        assert!(piped.matches_scope("constant.numeric"));
    }

    #[test]
    fn test_exclusion_only_matches_everything_else() {
        let selector = sel("-comment");
        assert!(selector.matches(&["source.js", "keyword"]));
        assert!(!selector.matches(&["source.js", "comment.line"]));
    }

    #[test]
    fn test_hyphen_inside_scope_name() {
        let selector = sel("comment.line.double-slash");
        assert!(selector.matches_scope("comment.line.double-slash.js"));
        assert_eq!(selector.alternatives.len(), 1);
        assert!(selector.alternatives[0].exclusions.is_empty());
    }

    #[test]
    fn test_empty_selector_matches_nothing() {
        let selector = sel("   ");
        assert!(selector.is_empty());
        assert!(!selector.matches(&["source.js"]));
        assert!(!ScopeSelector::never().matches_scope("comment"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            ScopeSelector::parse("a,,b"),
            Err(SelectorError::EmptyAlternative("a,,b".to_string()))
        );
        assert_eq!(
            ScopeSelector::parse("source -"),
            Err(SelectorError::DanglingExclusion("source -".to_string()))
        );
        assert!(matches!(
            ScopeSelector::parse("(source)"),
            Err(SelectorError::UnexpectedChar { found: '(', offset: 0, .. })
        ));
    }

    #[test]
    fn test_rank_reports_deepest_scope() {
        let scopes = ["source.c", "meta.block.c", "punctuation.section.block.begin.c"];
        assert_eq!(sel("source").rank(&scopes), Some(1));
        assert_eq!(sel("punctuation.section").rank(&scopes), Some(3));
        assert_eq!(sel("string").rank(&scopes), None);
    }

    #[test]
    fn test_map_prefers_most_specific_entry() {
        let map = ScopeSelectorMap::from_entries([
            ("meta.block", 5),
            ("punctuation.section.block.begin", 1),
            ("punctuation.section.block.end", -1),
        ])
        .unwrap();

        let open = ["source.c", "meta.block.c", "punctuation.section.block.begin.c"];
        let close = ["source.c", "meta.block.c", "punctuation.section.block.end.c"];
        let inner = ["source.c", "meta.block.c", "variable.other.c"];

        assert_eq!(map.value(&open), 1);
        assert_eq!(map.value(&close), -1);
        assert_eq!(map.value(&inner), 5);
        assert_eq!(map.value(&["source.c"]), 0);
    }

    #[test]
    fn test_map_ties_go_to_first_entry() {
        let map = ScopeSelectorMap::from_entries([("keyword", 2), ("keyword.control", 3)]).unwrap();
        // both reach depth 1
        assert_eq!(map.value(&["keyword.control.if"]), 2);
    }
}

//! Folding range generation from scope streams
//!
//! Three independent passes, concatenated in this order and capped at
//! [`RANGE_LIMIT`]:
//! - Regions: comment tokens carrying region start/end markers
//! - Headers: outline sections, cut short at structural dedents
//! - Blocks: boundaries where the logical level changes
//!
//! Unbalanced markers are never an error. They are dropped from the ranges
//! and reported as [`UnmatchedMarker`] diagnostics.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Selectors;
use crate::document::Document;
use crate::outline::OutlineEntry;
use crate::token::Token;

/// Hard cap on the number of ranges returned for one document
pub const RANGE_LIMIT: usize = 5000;

/// Semantic kind of a folding range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldingRangeKind {
    Region,
    Comment,
    Imports,
}

/// A collapsible span of lines (zero-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoldingRange {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FoldingRangeKind>,
}

impl FoldingRange {
    pub fn new(start: usize, end: usize, kind: Option<FoldingRangeKind>) -> Self {
        Self { start, end, kind }
    }
}

/// A start or close point fed to stack matching
#[derive(Debug, Clone, Copy)]
pub struct FoldingMarker<'t> {
    pub is_start: bool,
    pub level: i32,
    pub line: usize,
    pub token: &'t Token,
}

/// The pass a diagnostic came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldPass {
    Regions,
    Blocks,
}

/// A marker that did not take part in any range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedMarker {
    pub pass: FoldPass,
    pub line: usize,
    pub is_start: bool,
}

/// Ranges together with the markers that were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldingReport {
    pub ranges: Vec<FoldingRange>,
    pub diagnostics: Vec<UnmatchedMarker>,
}

/// Outcome of one stack walk
#[derive(Debug)]
pub struct MarkerMatch<'t> {
    pub ranges: Vec<FoldingRange>,
    pub unmatched: Vec<FoldingMarker<'t>>,
}

/// Pair start and close markers with a stack.
///
/// A start is pushed; a close pops the innermost open start and `emit`
/// turns the pair into a range. A close with nothing open, and any start
/// left open at the end, is returned as unmatched.
pub fn match_markers<'t, I, F>(markers: I, mut emit: F) -> MarkerMatch<'t>
where
    I: IntoIterator<Item = FoldingMarker<'t>>,
    F: FnMut(&FoldingMarker<'t>, &FoldingMarker<'t>) -> FoldingRange,
{
    let mut stack: Vec<FoldingMarker<'t>> = Vec::new();
    let mut ranges = Vec::new();
    let mut unmatched = Vec::new();

    for marker in markers {
        if marker.is_start {
            stack.push(marker);
        } else if let Some(open) = stack.pop() {
            ranges.push(emit(&open, &marker));
        } else {
            // invalid nesting, e.g. [end, start] or [start, end, end]
            unmatched.push(marker);
        }
    }

    unmatched.extend(stack);
    MarkerMatch { ranges, unmatched }
}

/// Folding range engine
#[derive(Debug, Clone, Copy)]
pub struct FoldingEngine<'a> {
    selectors: &'a Selectors,
}

impl<'a> FoldingEngine<'a> {
    pub fn new(selectors: &'a Selectors) -> Self {
        Self { selectors }
    }

    /// All folding ranges, capped at [`RANGE_LIMIT`]
    pub fn folding_ranges(
        &self,
        document: &Document,
        tokens: &[Token],
        levels: &[i32],
        outline: &[OutlineEntry],
    ) -> Vec<FoldingRange> {
        self.folding_report(document, tokens, levels, outline).ranges
    }

    /// Folding ranges plus the markers each pass had to drop
    pub fn folding_report(
        &self,
        document: &Document,
        tokens: &[Token],
        levels: &[i32],
        outline: &[OutlineEntry],
    ) -> FoldingReport {
        let regions = self.match_regions(tokens, levels);
        let headers = self.headers(document, tokens, levels, outline);
        let blocks = self.match_blocks(tokens, levels);

        debug!(
            "Folding: {} regions, {} headers, {} blocks",
            regions.ranges.len(),
            headers.len(),
            blocks.ranges.len()
        );

        let mut ranges = regions.ranges;
        ranges.extend(headers);
        ranges.extend(blocks.ranges);
        if ranges.len() > RANGE_LIMIT {
            debug!("Truncating {} folding ranges to {}", ranges.len(), RANGE_LIMIT);
            ranges.truncate(RANGE_LIMIT);
        }

        let mut diagnostics = unmatched_diagnostics(FoldPass::Regions, &regions.unmatched);
        diagnostics.extend(unmatched_diagnostics(FoldPass::Blocks, &blocks.unmatched));

        FoldingReport { ranges, diagnostics }
    }

    /// Ranges between region start and end comments
    pub fn regions(&self, tokens: &[Token], levels: &[i32]) -> Vec<FoldingRange> {
        self.match_regions(tokens, levels).ranges
    }

    fn match_regions<'t>(&self, tokens: &'t [Token], levels: &[i32]) -> MarkerMatch<'t> {
        let markers = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| self.selectors.is_region(token))
            .map(|(index, token)| FoldingMarker {
                is_start: self.selectors.is_region_start(token),
                level: levels.get(index).copied().unwrap_or_default(),
                line: token.line,
                token,
            });

        match_markers(markers, |start, end| {
            FoldingRange::new(start.line, end.line, Some(FoldingRangeKind::Region))
        })
    }

    /// Ranges for outline sections.
    ///
    /// Each section after the first folds up to the line before the next
    /// section (or the end of the document), stops before any token that
    /// dedents below the section's level, then gives back trailing blank
    /// lines while keeping at least one line after the header.
    ///
    /// The outline is expected in line order. A section that shares its
    /// line with the next one, or comes after it, yields no range.
    pub fn headers(
        &self,
        document: &Document,
        tokens: &[Token],
        levels: &[i32],
        outline: &[OutlineEntry],
    ) -> Vec<FoldingRange> {
        let sections: Vec<&OutlineEntry> = outline.iter().filter(|entry| entry.is_section()).collect();
        let scan_limit = tokens.len().min(levels.len());
        let mut ranges = Vec::new();

        for (index, section) in sections.iter().enumerate().skip(1) {
            let next = sections.get(index + 1);
            let start = section.line;
            let mut end = match next {
                Some(next) => next.line.saturating_sub(1),
                None => document.last_line(),
            };

            let scan_start = section.anchor + 1;
            let scan_end = next.map_or(scan_limit, |next| next.anchor.min(scan_limit));
            if scan_start < scan_end {
                let dedent = tokens[scan_start..scan_end]
                    .iter()
                    .zip(&levels[scan_start..scan_end])
                    .find(|(token, level)| token.line > start && token.line < end && **level < section.level);
                if let Some((token, _)) = dedent {
                    end = token.line - 1;
                }
            }

            while end > start + 1 && document.is_empty_or_whitespace(end) {
                end -= 1;
            }

            // repeated or out-of-order sections
            if end < start {
                continue;
            }

            ranges.push(FoldingRange::new(start, end, None));
        }

        ranges
    }

    /// Ranges between logical level changes
    pub fn blocks(&self, tokens: &[Token], levels: &[i32]) -> Vec<FoldingRange> {
        self.match_blocks(tokens, levels).ranges
    }

    fn match_blocks<'t>(&self, tokens: &'t [Token], levels: &[i32]) -> MarkerMatch<'t> {
        let count = tokens.len().min(levels.len());
        // the last level has no successor, so it always closes
        let markers = (0..count)
            .filter(|&index| levels.get(index + 1) != Some(&levels[index]))
            .map(|index| FoldingMarker {
                is_start: levels.get(index + 1).is_some_and(|next| *next > levels[index]),
                level: levels[index],
                line: tokens[index].line,
                token: &tokens[index],
            });

        let mut matched = match_markers(markers, |open, close| {
            let mut start = open.line;
            let mut end = close.line;

            // A top-level opener not on line 0 sits one line early: levels
            // rise on the token after it, which begins the next line.
            if open.level == 0 && open.line != 0 {
                start += 1;
                end += 1;
            }

            FoldingRange::new(start, end, self.range_kind(close.token))
        });

        // The close after the last token is implicit. With nothing left
        // open it is not a nesting error.
        if count > 0 && levels.get(count).is_none() {
            let terminal = &tokens[count - 1];
            matched
                .unmatched
                .retain(|marker| marker.is_start || !std::ptr::eq(marker.token, terminal));
        }

        matched
    }

    /// Kind of a block range, from its closing token
    fn range_kind(&self, token: &Token) -> Option<FoldingRangeKind> {
        let scopes = token.scopes.as_slice();
        if self.selectors.comments.matches(scopes) {
            Some(FoldingRangeKind::Comment)
        } else if self.selectors.imports.matches(scopes) {
            Some(FoldingRangeKind::Imports)
        } else {
            None
        }
    }
}

fn unmatched_diagnostics(pass: FoldPass, unmatched: &[FoldingMarker<'_>]) -> Vec<UnmatchedMarker> {
    unmatched
        .iter()
        .map(|marker| {
            trace!(
                "Dropped unmatched {} marker on line {} ({:?})",
                if marker.is_start { "start" } else { "close" },
                marker.line,
                pass
            );
            UnmatchedMarker {
                pass,
                line: marker.line,
                is_start: marker.is_start,
            }
        })
        .collect()
}

//! Line-oriented view of a text document

/// A document split into lines
///
/// Lines are separated by `\n`; a trailing `\r` is dropped. Like an editor
/// buffer, an empty text has one (empty) line and a text ending in a newline
/// has a final empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split text into lines
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    /// Number of lines (always at least 1)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the last line
    pub fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    /// Text of a line without its terminator
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// All lines in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// True for blank lines. Lines past the end count as blank.
    pub fn is_empty_or_whitespace(&self, index: usize) -> bool {
        self.line(index).is_none_or(|line| line.trim().is_empty())
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

//! Line-level types consumed by classification.

use serde::{Deserialize, Serialize};

/// A single normalized text line within a page.
///
/// Text is whitespace-collapsed and trimmed. Lines are ephemeral: created
/// during normalization, consumed by classification, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Normalized text content
    pub text: String,

    /// Origin page index (1-indexed, matching PDF page numbering)
    pub page: u32,

    /// Origin order index within the page
    pub index: usize,
}

impl Line {
    /// Create a new line.
    pub fn new(text: impl Into<String>, page: u32, index: usize) -> Self {
        Self {
            text: text.into(),
            page,
            index,
        }
    }
}

/// Classification tag for a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    /// Footer artifact, page number, contact info: dropped before assembly.
    Noise,

    /// Short, heading-looking line. Never also a bullet.
    Heading,

    /// Line starting with a recognized bullet glyph; carries the content
    /// text with the marker stripped.
    Bullet {
        /// Bullet payload, trimmed, marker glyph excluded
        text: String,
    },

    /// Continuation text appended to the currently open bullet.
    Plain,
}

/// A line plus its classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedLine {
    /// The underlying line
    pub line: Line,

    /// Classification tag
    pub kind: LineKind,
}

impl ClassifiedLine {
    /// Create a classified line.
    pub fn new(line: Line, kind: LineKind) -> Self {
        Self { line, kind }
    }

    /// Check if this line was classified as noise.
    pub fn is_noise(&self) -> bool {
        matches!(self.kind, LineKind::Noise)
    }

    /// Check if this line was classified as a bullet marker.
    pub fn is_bullet(&self) -> bool {
        matches!(self.kind, LineKind::Bullet { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_line_predicates() {
        let line = Line::new("• item", 1, 0);
        let classified = ClassifiedLine::new(
            line,
            LineKind::Bullet {
                text: "item".to_string(),
            },
        );
        assert!(classified.is_bullet());
        assert!(!classified.is_noise());
    }
}

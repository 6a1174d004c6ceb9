//! Page extraction layer.
//!
//! [`PageSource`] is the pipeline's only view of the source document: a page
//! index yields ordered text lines plus positioned glyph lines for
//! bullet-marker detection. The concrete PDF implementation lives in
//! [`pdf`]; the trait keeps the classifier, level inference and assembler
//! free of any PDF library types.

mod pdf;

pub use pdf::PdfSource;

use crate::error::Result;

/// A positioned run of glyphs within a text line.
#[derive(Debug, Clone)]
pub struct GlyphSpan {
    /// Decoded text content
    pub text: String,
    /// X position of the span's left edge
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated span width
    pub width: f32,
}

/// A text line reconstructed from spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct GlyphLine {
    /// Leftmost X position
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Spans sorted by X position
    pub spans: Vec<GlyphSpan>,
}

impl GlyphLine {
    /// Build a line from spans, sorting them left to right.
    pub fn from_spans(mut spans: Vec<GlyphSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        Self { x, y, spans }
    }

    /// Combined text of all spans, inserting a space where the horizontal
    /// gap between adjacent spans is wide enough to read as one.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.width);
                let char_count = span.text.chars().count().max(1);
                let avg_char_width = if span.width > 0.0 {
                    span.width / char_count as f32
                } else {
                    6.0
                };
                if gap > avg_char_width * 0.2
                    && !result.ends_with(' ')
                    && !span.text.starts_with(' ')
                {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }
        result
    }
}

/// Abstract source of page text and glyph geometry.
///
/// Contract: `page` is 1-indexed. `page_lines` returns the page's text split
/// into visual lines in reading order; `page_glyph_lines` returns the same
/// lines with coordinates, and may fail independently of the text channel
/// (callers recover by treating the page as having no usable geometry).
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Ordered raw text lines of a page.
    fn page_lines(&self, page: u32) -> Result<Vec<String>>;

    /// Ordered glyph lines with coordinates for bullet-marker detection.
    fn page_glyph_lines(&self, page: u32) -> Result<Vec<GlyphLine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_line_text_joins_spans() {
        let line = GlyphLine::from_spans(vec![
            GlyphSpan {
                text: "world".to_string(),
                x: 40.0,
                y: 0.0,
                width: 30.0,
            },
            GlyphSpan {
                text: "hello".to_string(),
                x: 0.0,
                y: 0.0,
                width: 30.0,
            },
        ]);
        // Sorted by x; 10pt gap between the spans reads as a space
        assert_eq!(line.text(), "hello world");
        assert_eq!(line.x, 0.0);
    }

    #[test]
    fn test_glyph_line_no_space_for_adjacent_spans() {
        let line = GlyphLine::from_spans(vec![
            GlyphSpan {
                text: "hel".to_string(),
                x: 0.0,
                y: 0.0,
                width: 18.0,
            },
            GlyphSpan {
                text: "lo".to_string(),
                x: 18.0,
                y: 0.0,
                width: 12.0,
            },
        ]);
        assert_eq!(line.text(), "hello");
    }
}

//! Rendered paragraph stream types.
//!
//! [`DocParagraph`] is the unit the renderer emits and the postprocessor and
//! remapper operate on. Neither of those stages sees the semantic outline;
//! they re-derive role and level from formatting alone, so the predicates
//! here (`is_bold_line`, `is_list`, `level`) are the only channel through
//! which structure survives rendering.

use serde::{Deserialize, Serialize};

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Run styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a plain run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                ..Default::default()
            },
        }
    }

    /// Check if the run contains no non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Run styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Font family
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,
}

/// Reference to a template-owned numbering definition.
///
/// List paragraphs reference numbering by (definition id, level) instead of
/// re-specifying indents; the remapper never invents definitions, it only
/// varies the level of one pre-existing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingRef {
    /// Numbering definition id (w:numId)
    pub num_id: u32,

    /// List level (w:ilvl), 0-based
    pub level: u8,
}

/// A paragraph in the rendered output stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocParagraph {
    /// Text runs
    pub runs: Vec<TextRun>,

    /// Paragraph style name (e.g., "List Bullet 2"), if any
    pub style_name: Option<String>,

    /// Direct left indent in points, if set
    pub left_indent: Option<f32>,

    /// Direct first-line indent in points; negative means hanging
    pub first_line_indent: Option<f32>,

    /// Bound numbering definition, if any
    pub numbering: Option<NumberingRef>,
}

impl DocParagraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.runs.push(TextRun::new(text));
        p
    }

    /// Append a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Check if the paragraph carries a list style name.
    pub fn is_list(&self) -> bool {
        self.style_name
            .as_deref()
            .is_some_and(|name| name.starts_with("List"))
    }

    /// Heading heuristic: non-blank, not list-styled, and every non-empty
    /// run bold.
    pub fn is_bold_line(&self) -> bool {
        if self.is_blank() || self.is_list() {
            return false;
        }
        let mut any_nonempty = false;
        for run in &self.runs {
            if !run.is_blank() {
                any_nonempty = true;
                if !run.style.bold {
                    return false;
                }
            }
        }
        any_nonempty
    }

    /// Bullet level encoded in the style name the renderer produces:
    /// "List Bullet" is 0, "List Bullet 2" is 1, "List Bullet 3" is 2.
    pub fn level_from_style_name(&self) -> u8 {
        match self.style_name.as_deref() {
            Some("List Bullet 2") => 1,
            Some("List Bullet 3") => 2,
            _ => 0,
        }
    }

    /// Set level-encoding indents from the config scheme.
    pub fn apply_level_indent(&mut self, level: u8, config: &crate::config::FormatConfig) {
        self.left_indent = Some(config.indent_for_level(level));
        self.first_line_indent = Some(-config.hang_indent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;

    #[test]
    fn test_paragraph_text() {
        let mut p = DocParagraph::new();
        p.add_run(TextRun::new("Hello "));
        p.add_run(TextRun::bold("world"));
        assert_eq!(p.text(), "Hello world");
        assert!(!p.is_blank());
    }

    #[test]
    fn test_bold_line_requires_all_runs_bold() {
        let mut p = DocParagraph::new();
        p.add_run(TextRun::bold("Heading"));
        assert!(p.is_bold_line());

        p.add_run(TextRun::new("tail"));
        assert!(!p.is_bold_line());
    }

    #[test]
    fn test_bold_line_excludes_list_styles() {
        let mut p = DocParagraph::new();
        p.add_run(TextRun::bold("styled"));
        p.style_name = Some("List Bullet".to_string());
        assert!(!p.is_bold_line());
        assert!(p.is_list());
    }

    #[test]
    fn test_blank_paragraph_is_neither() {
        let p = DocParagraph::with_text("   ");
        assert!(p.is_blank());
        assert!(!p.is_bold_line());
    }

    #[test]
    fn test_level_from_style_name() {
        let mut p = DocParagraph::with_text("x");
        p.style_name = Some("List Bullet".to_string());
        assert_eq!(p.level_from_style_name(), 0);
        p.style_name = Some("List Bullet 2".to_string());
        assert_eq!(p.level_from_style_name(), 1);
        p.style_name = Some("List Bullet 3".to_string());
        assert_eq!(p.level_from_style_name(), 2);
    }

    #[test]
    fn test_apply_level_indent() {
        let config = FormatConfig::default();
        let mut p = DocParagraph::with_text("x");
        p.apply_level_indent(1, &config);
        assert_eq!(p.left_indent, Some(36.0));
        assert_eq!(p.first_line_indent, Some(-18.0));
    }
}

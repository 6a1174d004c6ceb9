//! Line classification: noise filtering, bullet grammar, heading heuristics.
//!
//! Classification is a pure function of a line's text; it never reorders
//! lines and has no cross-line state.

use regex::Regex;

use crate::model::{ClassifiedLine, Line, LineKind};

/// Bullet marker glyphs recognized in extracted slide text, in match order.
pub const BULLET_CHARS: &[char] = &[
    '➣', '➤', '➢', '➔', '•', '◦', '·', '∙', '‣', '⁃', '▪', '■', '◼', '◾', '◻', '□', '-', '–', '—',
];

/// Maximum line length for any heading signal.
const HEADING_MAX_LEN: usize = 80;
/// Maximum length for the all-caps heading signal.
const UPPER_MAX_LEN: usize = 60;
/// Maximum length for the capitalized-words heading signal.
const TITLE_CASE_MAX_LEN: usize = 70;
/// Minimum share of capitalized alphabetic words for the title-case signal.
const TITLE_CASE_RATIO: f64 = 0.7;

/// Check if the first non-space character of `text` is a bullet glyph.
pub fn is_bullet_start(text: &str) -> bool {
    text.trim_start()
        .chars()
        .next()
        .is_some_and(|c| BULLET_CHARS.contains(&c))
}

/// Line classifier with pre-compiled patterns.
pub struct LineClassifier {
    bullet_re: Regex,
    numeric_re: Regex,
    word_re: Regex,
}

impl LineClassifier {
    /// Compile the classifier's patterns.
    pub fn new() -> Self {
        let alternatives: Vec<String> = BULLET_CHARS
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let bullet_pattern = format!(r"^\s*(?:{})\s+(.*\S)\s*$", alternatives.join("|"));

        Self {
            bullet_re: Regex::new(&bullet_pattern).unwrap(),
            numeric_re: Regex::new(r"^\d+$").unwrap(),
            word_re: Regex::new(r"[A-Za-z']+").unwrap(),
        }
    }

    /// Normalize raw page text into classification-ready [`Line`]s:
    /// whitespace collapsed, trimmed, noise dropped. Each surviving line
    /// keeps its origin page and its order index in the raw text.
    pub fn normalize_lines(&self, page: u32, text: &str) -> Vec<Line> {
        text.lines()
            .enumerate()
            .map(|(i, ln)| (i, ln.split_whitespace().collect::<Vec<_>>().join(" ")))
            .filter(|(_, ln)| !ln.is_empty() && !self.is_noise(ln))
            .map(|(i, ln)| Line::new(ln, page, i))
            .collect()
    }

    /// Footer/artifact detection: empty, purely numeric (page numbers),
    /// contact info ("@"), or a known footer keyword.
    pub fn is_noise(&self, line: &str) -> bool {
        let l = line.trim();
        if l.is_empty() {
            return true;
        }
        if self.numeric_re.is_match(l) {
            return true;
        }
        if l.contains('@') {
            return true;
        }
        l.to_lowercase().starts_with("further reading")
    }

    /// Return the bullet payload if the line matches the bullet grammar:
    /// optional leading whitespace, one recognized glyph, at least one
    /// whitespace separator, then non-empty content.
    pub fn bullet_text(&self, line: &str) -> Option<String> {
        self.bullet_re
            .captures(line)
            .map(|caps| caps[1].trim().to_string())
    }

    /// Heading heuristic. Bullet lines are never headings, and lines longer
    /// than 80 characters are never headings regardless of other signals.
    pub fn looks_like_heading(&self, line: &str) -> bool {
        let l = line.trim();
        if l.is_empty() || self.bullet_re.is_match(l) {
            return false;
        }

        let len = l.chars().count();
        if len > HEADING_MAX_LEN {
            return false;
        }

        if l.ends_with(':') {
            return true;
        }

        let words: Vec<&str> = self.word_re.find_iter(l).map(|m| m.as_str()).collect();
        if words.is_empty() {
            return false;
        }

        if is_all_uppercase(l) && len <= UPPER_MAX_LEN {
            return true;
        }

        let capitalized = words
            .iter()
            .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
            .count();
        let ratio = capitalized as f64 / words.len().max(1) as f64;
        ratio >= TITLE_CASE_RATIO && len <= TITLE_CASE_MAX_LEN
    }

    /// Classify a single normalized line's text.
    pub fn classify(&self, line: &str) -> LineKind {
        if self.is_noise(line) {
            return LineKind::Noise;
        }
        if let Some(text) = self.bullet_text(line) {
            return LineKind::Bullet { text };
        }
        if self.looks_like_heading(line) {
            return LineKind::Heading;
        }
        LineKind::Plain
    }

    /// Attach a classification tag to a normalized line.
    pub fn classify_line(&self, line: Line) -> ClassifiedLine {
        let kind = self.classify(&line.text);
        ClassifiedLine::new(line, kind)
    }

    /// Normalize and classify one page of raw text in a single pass.
    pub fn classify_page(&self, page: u32, text: &str) -> Vec<ClassifiedLine> {
        self.normalize_lines(page, text)
            .into_iter()
            .map(|line| self.classify_line(line))
            .collect()
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// All cased characters uppercase, with at least one alphabetic character.
fn is_all_uppercase(s: &str) -> bool {
    s.chars().any(char::is_alphabetic) && !s.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_text_strips_marker() {
        let c = LineClassifier::new();
        assert_eq!(c.bullet_text("• First point"), Some("First point".into()));
        assert_eq!(c.bullet_text("  ➤  spaced out  "), Some("spaced out".into()));
        assert_eq!(c.bullet_text("- dash bullet"), Some("dash bullet".into()));
        assert_eq!(c.bullet_text("– en dash"), Some("en dash".into()));
    }

    #[test]
    fn test_bullet_requires_separator_and_content() {
        let c = LineClassifier::new();
        // Glyph glued to text is not a bullet
        assert_eq!(c.bullet_text("-nogap"), None);
        // Marker with no content is not a bullet
        assert_eq!(c.bullet_text("• "), None);
        assert_eq!(c.bullet_text("plain text"), None);
    }

    #[test]
    fn test_every_recognized_glyph_matches() {
        let c = LineClassifier::new();
        for glyph in BULLET_CHARS {
            let line = format!("{glyph} content here");
            assert_eq!(
                c.bullet_text(&line),
                Some("content here".to_string()),
                "glyph {glyph:?} should match"
            );
        }
    }

    #[test]
    fn test_noise_detection() {
        let c = LineClassifier::new();
        assert!(c.is_noise(""));
        assert!(c.is_noise("   "));
        assert!(c.is_noise("42"));
        assert!(c.is_noise("contact me@example.com"));
        assert!(c.is_noise("Further Reading: chapter 9"));
        assert!(!c.is_noise("Regular content line"));
    }

    #[test]
    fn test_heading_colon() {
        let c = LineClassifier::new();
        assert!(c.looks_like_heading("Topics covered:"));
    }

    #[test]
    fn test_heading_all_caps() {
        let c = LineClassifier::new();
        assert!(c.looks_like_heading("MEMORY MANAGEMENT"));
        // Past both length caps, neither the all-caps nor the
        // capitalized-words signal applies.
        let long_caps = "A".repeat(71);
        assert!(!c.looks_like_heading(&long_caps));
    }

    #[test]
    fn test_heading_title_case_ratio() {
        let c = LineClassifier::new();
        assert!(c.looks_like_heading("Virtual Memory And Paging"));
        assert!(!c.looks_like_heading("only one Word capitalized here today"));
    }

    #[test]
    fn test_heading_length_cap_is_absolute() {
        let c = LineClassifier::new();
        let shouted = format!("{}:", "Very Long Heading Words ".repeat(5));
        assert!(shouted.chars().count() > 80);
        assert!(!c.looks_like_heading(&shouted));
    }

    #[test]
    fn test_bullet_never_heading() {
        let c = LineClassifier::new();
        assert!(!c.looks_like_heading("• Important Point:"));
        assert!(matches!(
            c.classify("• Important Point:"),
            LineKind::Bullet { .. }
        ));
    }

    #[test]
    fn test_classify_order() {
        let c = LineClassifier::new();
        assert_eq!(c.classify("17"), LineKind::Noise);
        assert_eq!(c.classify("Overview:"), LineKind::Heading);
        assert_eq!(c.classify("lowercase continuation text"), LineKind::Plain);
    }

    #[test]
    fn test_normalize_lines() {
        let c = LineClassifier::new();
        let raw = "Title   Line\n\n  12  \n•   spaced   bullet\nfoo@bar.com\n";
        let lines = c.normalize_lines(3, raw);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Title Line", "• spaced bullet"]);
        // Order indexes point into the raw text, page survives.
        assert_eq!(lines[0].page, 3);
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 3);
    }

    #[test]
    fn test_classify_page_tags_every_surviving_line() {
        let c = LineClassifier::new();
        let classified = c.classify_page(1, "Overview:\n• one\nplain text here\n42\n");
        let kinds: Vec<&LineKind> = classified.iter().map(|cl| &cl.kind).collect();
        assert_eq!(classified.len(), 3);
        assert_eq!(kinds[0], &LineKind::Heading);
        assert!(classified[1].is_bullet());
        assert_eq!(kinds[2], &LineKind::Plain);
        assert_eq!(classified[2].line.index, 2);
    }
}

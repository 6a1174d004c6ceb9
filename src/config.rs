//! Output formatting configuration.
//!
//! Every rendering stage takes a [`FormatConfig`] instead of compiled-in
//! constants, so tests can substitute values without touching logic.

use serde::{Deserialize, Serialize};

/// Formatting constants threaded through rendering, postprocessing and
/// remapping.
///
/// Indent values are in points. The indent scheme encodes bullet nesting:
/// a level-L bullet gets `base_indent + indent_step * L` of left indent and
/// a hanging first-line indent of `hang_indent`, and the remapper inverts
/// exactly that encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Canonical font family applied to every run.
    pub font_family: String,

    /// Canonical font size in points.
    pub font_size: f32,

    /// Left indent of a level-0 bullet, in points.
    pub base_indent: f32,

    /// Additional left indent per nesting level, in points.
    pub indent_step: f32,

    /// Hanging indent so wrapped text aligns under the bullet glyph.
    pub hang_indent: f32,

    /// Numbering definition id in the template that list paragraphs bind to.
    pub numbering_id: u32,

    /// Name of the template's list paragraph style.
    pub list_style_name: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            font_family: "Aptos (Body)".to_string(),
            font_size: 12.0,
            base_indent: 18.0,
            indent_step: 18.0,
            hang_indent: 18.0,
            numbering_id: 1,
            list_style_name: "List Paragraph".to_string(),
        }
    }
}

impl FormatConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canonical font family.
    pub fn with_font(mut self, family: impl Into<String>, size: f32) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    /// Set the indent scheme (base, step, hang), in points.
    pub fn with_indents(mut self, base: f32, step: f32, hang: f32) -> Self {
        self.base_indent = base;
        self.indent_step = step;
        self.hang_indent = hang;
        self
    }

    /// Set the template numbering definition id.
    pub fn with_numbering_id(mut self, id: u32) -> Self {
        self.numbering_id = id;
        self
    }

    /// Set the template list paragraph style name.
    pub fn with_list_style(mut self, name: impl Into<String>) -> Self {
        self.list_style_name = name.into();
        self
    }

    /// Left indent for a bullet at `level`, in points.
    pub fn indent_for_level(&self, level: u8) -> f32 {
        self.base_indent + self.indent_step * f32::from(level.min(crate::levels::MAX_LEVEL))
    }

    /// Invert [`Self::indent_for_level`]: recover the level encoded by a
    /// left indent, clamped to the supported range.
    pub fn level_from_indent(&self, left_indent: f32) -> u8 {
        if self.indent_step <= 0.0 {
            return 0;
        }
        let raw = ((left_indent - self.base_indent) / self.indent_step).round();
        raw.clamp(0.0, f32::from(crate::levels::MAX_LEVEL)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_round_trip() {
        let config = FormatConfig::default();
        for level in 0..=2u8 {
            let indent = config.indent_for_level(level);
            assert_eq!(config.level_from_indent(indent), level);
        }
    }

    #[test]
    fn test_indent_for_level_caps() {
        let config = FormatConfig::default();
        assert_eq!(config.indent_for_level(7), config.indent_for_level(2));
    }

    #[test]
    fn test_level_from_indent_clamps() {
        let config = FormatConfig::default();
        assert_eq!(config.level_from_indent(0.0), 0);
        assert_eq!(config.level_from_indent(36.0), 1);
        assert_eq!(config.level_from_indent(500.0), 2);
    }
}

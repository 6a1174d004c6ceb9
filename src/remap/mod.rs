//! Numbering remap: rebind a document's lists to a template's numbering.
//!
//! Takes a source .docx built around direct indents, decides which
//! paragraphs are list entries, recovers each entry's level from its left
//! indent, and rewrites everything into a copy of the template package so
//! the lists render with the template's own numbering definition.

pub mod reader;
pub mod template;

pub use reader::read_docx;
pub use template::Template;

use std::path::Path;

use crate::config::FormatConfig;
use crate::error::Result;
use crate::model::{DocParagraph, NumberingRef, TextRun};

/// List membership test for source paragraphs: either the paragraph style
/// says so, or the indent shape does (hanging first line under a positive
/// left indent).
pub fn is_list_like(para: &DocParagraph) -> bool {
    if para.is_list() {
        return true;
    }
    matches!(
        (para.first_line_indent, para.left_indent),
        (Some(first), Some(left)) if first < 0.0 && left > 0.0
    )
}

fn remap_run(run: &TextRun, config: &FormatConfig) -> TextRun {
    let mut out = run.clone();
    out.style.bold = false;
    out.style.font_name = Some(config.font_family.clone());
    out.style.font_size = Some(config.font_size);
    out
}

/// Rebuild one source paragraph for the template.
///
/// List entries get the template's list style (when it has one) and a
/// numbering binding at the level their indent encoded. Direct paragraph
/// formatting is cleared on every output paragraph; it can fight the
/// template's numbering. Direct bold is dropped everywhere; italic and
/// underline survive.
fn remap_paragraph(
    para: &DocParagraph,
    config: &FormatConfig,
    has_list_style: bool,
) -> DocParagraph {
    let mut out = DocParagraph::new();
    out.runs = para.runs.iter().map(|r| remap_run(r, config)).collect();

    if is_list_like(para) {
        let level = config.level_from_indent(para.left_indent.unwrap_or(0.0));
        if has_list_style {
            out.style_name = Some(config.list_style_name.clone());
        }
        out.numbering = Some(NumberingRef {
            num_id: config.numbering_id,
            level,
        });
    }
    out
}

/// Remap a paragraph stream: blanks are dropped, everything else is
/// rebuilt via [`remap_paragraph`].
pub fn remap_paragraphs(
    source: &[DocParagraph],
    config: &FormatConfig,
    has_list_style: bool,
) -> Vec<DocParagraph> {
    source
        .iter()
        .filter(|p| !p.is_blank())
        .map(|p| remap_paragraph(p, config, has_list_style))
        .collect()
}

/// Remap `source` into a copy of `template`, writing the result to `out`.
pub fn remap(
    source: impl AsRef<Path>,
    template: impl AsRef<Path>,
    out: impl AsRef<Path>,
    config: &FormatConfig,
) -> Result<()> {
    let template = Template::load(template, config)?;
    let source_paras = read_docx(source)?;
    let remapped = remap_paragraphs(&source_paras, config, template.has_list_style());
    log::info!("remapped {} paragraph(s)", remapped.len());
    template.write_with_body(&remapped, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indent_para(text: &str, left: f32, first: f32) -> DocParagraph {
        let mut p = DocParagraph::with_text(text);
        p.left_indent = Some(left);
        p.first_line_indent = Some(first);
        p
    }

    #[test]
    fn test_is_list_like_by_style() {
        let mut p = DocParagraph::with_text("x");
        p.style_name = Some("List Bullet".to_string());
        assert!(is_list_like(&p));
    }

    #[test]
    fn test_is_list_like_by_indent_shape() {
        assert!(is_list_like(&indent_para("x", 36.0, -18.0)));
        // First-line indent without hang is prose, not a list.
        assert!(!is_list_like(&indent_para("x", 36.0, 9.0)));
        assert!(!is_list_like(&DocParagraph::with_text("x")));
    }

    #[test]
    fn test_remap_recovers_level_from_indent() {
        let config = FormatConfig::default();
        let source = vec![
            indent_para("top", 18.0, -18.0),
            indent_para("nested", 36.0, -18.0),
            indent_para("deep", 54.0, -18.0),
        ];
        let out = remap_paragraphs(&source, &config, true);
        let levels: Vec<u8> = out
            .iter()
            .map(|p| p.numbering.as_ref().map(|n| n.level).unwrap_or(99))
            .collect();
        assert_eq!(levels, vec![0, 1, 2]);
        assert!(out
            .iter()
            .all(|p| p.style_name.as_deref() == Some("List Paragraph")));
        assert!(out
            .iter()
            .all(|p| p.numbering.map(|n| n.num_id) == Some(config.numbering_id)));
    }

    #[test]
    fn test_remap_list_paragraph_has_no_direct_indents() {
        let config = FormatConfig::default();
        let out = remap_paragraphs(&[indent_para("x", 36.0, -18.0)], &config, true);
        assert!(out[0].left_indent.is_none());
        assert!(out[0].first_line_indent.is_none());
        assert_eq!(out[0].numbering.map(|n| n.level), Some(1));
    }

    #[test]
    fn test_remap_drops_bold_keeps_italic() {
        let config = FormatConfig::default();
        let mut p = indent_para("x", 18.0, -18.0);
        p.runs[0].style.bold = true;
        p.runs[0].style.italic = true;
        let out = remap_paragraphs(&[p], &config, true);
        assert!(!out[0].runs[0].style.bold);
        assert!(out[0].runs[0].style.italic);
        assert_eq!(out[0].runs[0].style.font_name.as_deref(), Some("Aptos (Body)"));
        assert_eq!(out[0].runs[0].style.font_size, Some(12.0));
    }

    #[test]
    fn test_remap_drops_blank_paragraphs() {
        let config = FormatConfig::default();
        let source = vec![
            DocParagraph::with_text("keep"),
            DocParagraph::new(),
            DocParagraph::with_text("   "),
        ];
        let out = remap_paragraphs(&source, &config, true);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text(), "keep");
    }

    #[test]
    fn test_remap_without_list_style_uses_numbering_only() {
        let config = FormatConfig::default();
        let out = remap_paragraphs(&[indent_para("x", 18.0, -18.0)], &config, false);
        assert!(out[0].style_name.is_none());
        assert!(out[0].numbering.is_some());
    }

    #[test]
    fn test_non_list_paragraph_loses_direct_formatting() {
        let config = FormatConfig::default();
        let mut p = DocParagraph::with_text("prose");
        p.left_indent = Some(72.0);
        let out = remap_paragraphs(&[p], &config, true);
        assert!(out[0].left_indent.is_none());
        assert!(out[0].numbering.is_none());
        assert!(out[0].style_name.is_none());
    }
}

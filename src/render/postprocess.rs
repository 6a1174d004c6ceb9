//! Structural cleanup of rendered paragraphs.
//!
//! Two passes over the paragraph list:
//!
//! 1. Remove orphan headings: a bold line followed by no list paragraph
//!    before the next bold line (or end of document) carries no content
//!    and is dropped.
//! 2. Promote surviving headings into level-0 list entries (keeping their
//!    bold runs) and shift the bullets under them one level deeper, then
//!    normalize every list paragraph to the unified bullet style with
//!    explicit indents.
//!
//! The result is stable: running the pass again leaves the paragraphs
//! unchanged, because promoted headings are list paragraphs afterwards
//! and levels are re-read from the explicit indents they were given.

use crate::config::FormatConfig;
use crate::levels::MAX_LEVEL;
use crate::model::DocParagraph;

/// Unified style every bullet ends up with after postprocessing.
pub const UNIFIED_BULLET_STYLE: &str = "List Bullet";

fn remove_orphan_headings(paragraphs: &mut Vec<DocParagraph>) {
    let mut keep = vec![true; paragraphs.len()];
    for (i, para) in paragraphs.iter().enumerate() {
        if !para.is_bold_line() {
            continue;
        }
        let mut has_list = false;
        for follower in &paragraphs[i + 1..] {
            if follower.is_bold_line() {
                break;
            }
            if follower.is_list() {
                has_list = true;
                break;
            }
        }
        if !has_list {
            keep[i] = false;
        }
    }
    let mut it = keep.into_iter();
    paragraphs.retain(|_| it.next().unwrap_or(true));
}

/// Current bullet level of a list paragraph. An explicit left indent wins
/// over the style name, so already-normalized paragraphs keep their level.
fn list_level(para: &DocParagraph, config: &FormatConfig) -> u8 {
    match para.left_indent {
        Some(left) => config.level_from_indent(left),
        None => para.level_from_style_name(),
    }
}

fn enforce_font(para: &mut DocParagraph, config: &FormatConfig) {
    for run in &mut para.runs {
        run.style.font_name = Some(config.font_family.clone());
        run.style.font_size = Some(config.font_size);
    }
}

/// Run both cleanup passes in place.
pub fn postprocess(paragraphs: &mut Vec<DocParagraph>, config: &FormatConfig) {
    remove_orphan_headings(paragraphs);

    let mut in_heading_block = false;
    for para in paragraphs.iter_mut() {
        if para.is_bold_line() {
            // Promote to a bullet, bold runs intact.
            para.style_name = Some(UNIFIED_BULLET_STYLE.to_string());
            para.apply_level_indent(0, config);
            in_heading_block = true;
        } else if para.is_list() {
            let mut level = list_level(para, config);
            if in_heading_block {
                level = (level + 1).min(MAX_LEVEL);
            }
            para.style_name = Some(UNIFIED_BULLET_STYLE.to_string());
            para.apply_level_indent(level, config);
        } else {
            in_heading_block = false;
        }
        enforce_font(para, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    fn bold_para(text: &str) -> DocParagraph {
        let mut p = DocParagraph::new();
        p.add_run(TextRun::bold(text));
        p
    }

    fn bullet_para(text: &str, style: &str) -> DocParagraph {
        let mut p = DocParagraph::new();
        p.style_name = Some(style.to_string());
        p.add_run(TextRun::new(text));
        p
    }

    fn plain_para(text: &str) -> DocParagraph {
        DocParagraph::with_text(text)
    }

    #[test]
    fn test_orphan_heading_removed() {
        let config = FormatConfig::default();
        let mut paras = vec![
            bold_para("Title With Nothing Under It"),
            plain_para(""),
            bold_para("Real Heading"),
            bullet_para("point", "List Bullet"),
        ];
        postprocess(&mut paras, &config);
        assert!(!paras.iter().any(|p| p.text() == "Title With Nothing Under It"));
        assert!(paras.iter().any(|p| p.text() == "Real Heading"));
    }

    #[test]
    fn test_heading_promoted_and_children_shifted() {
        let config = FormatConfig::default();
        let mut paras = vec![
            bold_para("Section"),
            bullet_para("child", "List Bullet"),
            bullet_para("grandchild", "List Bullet 2"),
        ];
        postprocess(&mut paras, &config);

        // Heading became a level-0 bullet, bold kept.
        assert_eq!(paras[0].style_name.as_deref(), Some(UNIFIED_BULLET_STYLE));
        assert_eq!(paras[0].left_indent, Some(config.indent_for_level(0)));
        assert!(paras[0].runs[0].style.bold);

        // Children shifted one level deeper.
        assert_eq!(paras[1].left_indent, Some(config.indent_for_level(1)));
        assert_eq!(paras[2].left_indent, Some(config.indent_for_level(2)));
        assert_eq!(paras[1].first_line_indent, Some(-config.hang_indent));
    }

    #[test]
    fn test_blank_ends_heading_block() {
        let config = FormatConfig::default();
        let mut paras = vec![
            bold_para("Section"),
            bullet_para("child", "List Bullet"),
            plain_para(""),
            bullet_para("later", "List Bullet"),
        ];
        postprocess(&mut paras, &config);
        assert_eq!(paras[1].left_indent, Some(config.indent_for_level(1)));
        // After the blank the block is over; no shift.
        assert_eq!(paras[3].left_indent, Some(config.indent_for_level(0)));
    }

    #[test]
    fn test_level_shift_caps_at_deepest() {
        let config = FormatConfig::default();
        let mut paras = vec![
            bold_para("Section"),
            bullet_para("deep", "List Bullet 3"),
        ];
        postprocess(&mut paras, &config);
        assert_eq!(
            paras[1].left_indent,
            Some(config.indent_for_level(MAX_LEVEL))
        );
    }

    #[test]
    fn test_postprocess_is_idempotent() {
        let config = FormatConfig::default();
        let mut paras = vec![
            bold_para("Section"),
            bullet_para("child", "List Bullet"),
            plain_para(""),
            bullet_para("flat", "List Bullet 2"),
        ];
        postprocess(&mut paras, &config);
        let first = paras.clone();
        postprocess(&mut paras, &config);
        assert_eq!(paras, first);
    }

    #[test]
    fn test_fonts_enforced_everywhere() {
        let config = FormatConfig::default();
        let mut paras = vec![bold_para("Section"), bullet_para("child", "List Bullet")];
        postprocess(&mut paras, &config);
        for p in &paras {
            for r in &p.runs {
                assert_eq!(r.style.font_name.as_deref(), Some("Aptos (Body)"));
                assert_eq!(r.style.font_size, Some(12.0));
            }
        }
    }
}

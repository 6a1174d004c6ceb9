//! Outline → paragraph translation.

use crate::config::FormatConfig;
use crate::model::{DocParagraph, Outline, OutlineNode, TextRun, TextStyle};

/// Built-in list style for a bullet level ("List Bullet", "List Bullet 2",
/// "List Bullet 3"). Levels beyond 2 clamp to the deepest style.
pub fn bullet_style_name(level: u8) -> &'static str {
    match level {
        0 => "List Bullet",
        1 => "List Bullet 2",
        _ => "List Bullet 3",
    }
}

fn base_style(config: &FormatConfig) -> TextStyle {
    TextStyle {
        font_name: Some(config.font_family.clone()),
        font_size: Some(config.font_size),
        ..TextStyle::default()
    }
}

fn styled_run(text: &str, style: TextStyle) -> TextRun {
    TextRun {
        text: text.to_string(),
        style,
    }
}

fn bold_paragraph(text: &str, config: &FormatConfig) -> DocParagraph {
    let style = TextStyle {
        bold: true,
        ..base_style(config)
    };
    let mut para = DocParagraph::new();
    para.add_run(styled_run(text, style));
    para
}

/// Render outline nodes into styled paragraphs.
///
/// Titles and headings become bold plain paragraphs; bullets become list
/// paragraphs whose style encodes the level; separators become empty
/// paragraphs.
pub fn render_outline(outline: &Outline, config: &FormatConfig) -> Vec<DocParagraph> {
    let mut paragraphs = Vec::with_capacity(outline.len());
    for node in &outline.nodes {
        match node {
            OutlineNode::Title { text } | OutlineNode::Heading { text } => {
                paragraphs.push(bold_paragraph(text, config));
            }
            OutlineNode::Bullet { text, level } => {
                let mut para = DocParagraph::new();
                para.style_name = Some(bullet_style_name(*level).to_string());
                para.add_run(styled_run(text, base_style(config)));
                paragraphs.push(para);
            }
            OutlineNode::Separator => {
                paragraphs.push(DocParagraph::new());
            }
        }
    }
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline_of(nodes: Vec<OutlineNode>) -> Outline {
        let mut o = Outline::new();
        for n in nodes {
            o.push(n);
        }
        o
    }

    #[test]
    fn test_bullet_style_names() {
        assert_eq!(bullet_style_name(0), "List Bullet");
        assert_eq!(bullet_style_name(1), "List Bullet 2");
        assert_eq!(bullet_style_name(2), "List Bullet 3");
        assert_eq!(bullet_style_name(7), "List Bullet 3");
    }

    #[test]
    fn test_title_renders_bold() {
        let outline = outline_of(vec![OutlineNode::Title {
            text: "Intro".to_string(),
        }]);
        let paras = render_outline(&outline, &FormatConfig::default());
        assert_eq!(paras.len(), 1);
        assert!(paras[0].is_bold_line());
        assert_eq!(paras[0].text(), "Intro");
        assert_eq!(
            paras[0].runs[0].style.font_name.as_deref(),
            Some("Aptos (Body)")
        );
    }

    #[test]
    fn test_bullets_map_to_list_styles() {
        let outline = outline_of(vec![
            OutlineNode::Bullet {
                text: "top".to_string(),
                level: 0,
            },
            OutlineNode::Bullet {
                text: "nested".to_string(),
                level: 1,
            },
        ]);
        let paras = render_outline(&outline, &FormatConfig::default());
        assert_eq!(paras[0].style_name.as_deref(), Some("List Bullet"));
        assert_eq!(paras[1].style_name.as_deref(), Some("List Bullet 2"));
        assert!(paras.iter().all(|p| p.is_list()));
        assert!(!paras[0].runs[0].style.bold);
    }

    #[test]
    fn test_separator_is_blank_paragraph() {
        let outline = outline_of(vec![OutlineNode::Separator]);
        let paras = render_outline(&outline, &FormatConfig::default());
        assert_eq!(paras.len(), 1);
        assert!(paras[0].is_blank());
    }
}

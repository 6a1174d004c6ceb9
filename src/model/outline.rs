//! Outline tree types produced by the assembler.

use serde::{Deserialize, Serialize};

/// One node of the reconstructed outline.
///
/// Nodes are emitted in reading order; each emitted page contributes zero or
/// one `Title`, any number of `Heading`/`Bullet` nodes, and one trailing
/// `Separator` for visual spacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutlineNode {
    /// Page title, rendered as a bold line.
    Title {
        /// Resolved title text
        text: String,
    },

    /// Section heading within a page, rendered as a bold line.
    Heading {
        /// Heading text
        text: String,
    },

    /// A bullet with its nesting level (0 = outermost, capped at 2).
    Bullet {
        /// Bullet text, continuations folded in
        text: String,
        /// Nesting level 0..=2
        level: u8,
    },

    /// Blank spacing paragraph between pages.
    Separator,
}

impl OutlineNode {
    /// Text content of the node, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            OutlineNode::Title { text }
            | OutlineNode::Heading { text }
            | OutlineNode::Bullet { text, .. } => Some(text),
            OutlineNode::Separator => None,
        }
    }
}

/// The full reconstructed outline of a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Ordered nodes across all emitted pages
    pub nodes: Vec<OutlineNode>,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node.
    pub fn push(&mut self, node: OutlineNode) {
        self.nodes.push(node);
    }

    /// Number of nodes, separators included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the outline has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Count bullet nodes.
    pub fn bullet_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, OutlineNode::Bullet { .. }))
            .count()
    }

    /// Plain-text view, one line per non-separator node, bullets indented
    /// by level. Debug aid only; the renderer is the real output path.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                OutlineNode::Title { text } | OutlineNode::Heading { text } => {
                    out.push_str(text);
                    out.push('\n');
                }
                OutlineNode::Bullet { text, level } => {
                    for _ in 0..*level {
                        out.push_str("  ");
                    }
                    out.push_str("- ");
                    out.push_str(text);
                    out.push('\n');
                }
                OutlineNode::Separator => out.push('\n'),
            }
        }
        out
    }
}

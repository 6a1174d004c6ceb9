//! Outline assembly: classified lines + inferred levels → outline nodes.
//!
//! Assembly is page-local. The accumulator below is the explicit form of
//! the "currently open bullet" state: a bullet stays open across
//! continuation lines and is flushed when anything else starts.

use serde::{Deserialize, Serialize};

use crate::model::{ClassifiedLine, LineKind, Outline, OutlineNode};

/// Counters collected while assembling a document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConvertStats {
    /// Pages that produced outline nodes
    pub pages_emitted: u32,

    /// Pages skipped by the title rule ("Outline"/"Summary")
    pub pages_skipped: u32,

    /// Title nodes emitted
    pub titles: u32,

    /// Heading nodes emitted
    pub headings: u32,

    /// Bullet nodes emitted
    pub bullets: u32,

    /// Continuation lines discarded because no bullet was open
    pub dropped_continuations: u32,
}

/// Accumulator state for the bullet under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AccState {
    Idle,
    Building { text: String, level: u8 },
}

/// Explicit finite-state accumulator for bullet construction.
///
/// States: `Idle` (no open bullet) and `Building` (a bullet is open and
/// accepting continuations).
#[derive(Debug)]
pub struct BulletAccumulator {
    state: AccState,
    dropped: u32,
}

impl BulletAccumulator {
    /// Start in the idle state.
    pub fn new() -> Self {
        Self {
            state: AccState::Idle,
            dropped: 0,
        }
    }

    /// Open a new bullet. The caller must flush first; opening while
    /// building replaces the held bullet, which would lose text.
    pub fn open(&mut self, text: impl Into<String>, level: u8) {
        self.state = AccState::Building {
            text: text.into(),
            level,
        };
    }

    /// Append a continuation to the open bullet. Returns `false` (and
    /// counts the line as dropped) when no bullet is open: a continuation
    /// that arrives before any bullet cannot be reattached.
    pub fn append(&mut self, text: &str) -> bool {
        match &mut self.state {
            AccState::Building { text: held, .. } => {
                held.push(' ');
                held.push_str(text);
                true
            }
            AccState::Idle => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Close the open bullet, returning its text and level, and go idle.
    pub fn flush(&mut self) -> Option<(String, u8)> {
        match std::mem::replace(&mut self.state, AccState::Idle) {
            AccState::Building { text, level } => Some((text.trim().to_string(), level)),
            AccState::Idle => None,
        }
    }

    /// Check if a bullet is currently open.
    pub fn is_building(&self) -> bool {
        matches!(self.state, AccState::Building { .. })
    }

    /// Number of continuation lines discarded so far.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for BulletAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

fn flush_bullet(
    acc: &mut BulletAccumulator,
    nodes: &mut Vec<OutlineNode>,
    stats: &mut ConvertStats,
) {
    if let Some((text, level)) = acc.flush() {
        nodes.push(OutlineNode::Bullet { text, level });
        stats.bullets += 1;
    }
}

/// Per-page outline assembler.
pub struct Assembler {
    all_bullets: bool,
}

impl Assembler {
    /// Create an assembler. When `all_bullets` is set, every plain line
    /// becomes its own level-0 bullet instead of a continuation.
    pub fn new(all_bullets: bool) -> Self {
        Self { all_bullets }
    }

    /// Choose the page title: the first non-noise line that is not a
    /// bullet and is either a heading or at most 60 characters.
    pub fn pick_title(&self, lines: &[ClassifiedLine]) -> Option<String> {
        lines
            .iter()
            .find(|cl| {
                !cl.is_noise()
                    && !cl.is_bullet()
                    && (cl.kind == LineKind::Heading || cl.line.text.chars().count() <= 60)
            })
            .map(|cl| cl.line.text.clone())
    }

    /// Assemble one page of classified lines into outline nodes.
    ///
    /// `levels` is the page's coordinate-derived level sequence in reading
    /// order; when it runs out (or is empty), bullets default to level 0.
    /// Pages titled "Outline" or "Summary" contribute nothing at all.
    pub fn assemble_page(
        &self,
        lines: &[ClassifiedLine],
        levels: &[u8],
        stats: &mut ConvertStats,
    ) -> Vec<OutlineNode> {
        if lines.is_empty() {
            return Vec::new();
        }

        let title = self.pick_title(lines);

        if let Some(t) = &title {
            let lowered = t.trim().to_lowercase();
            if lowered == "outline" || lowered == "summary" {
                stats.pages_skipped += 1;
                return Vec::new();
            }
        }

        let mut nodes = Vec::new();
        let mut acc = BulletAccumulator::new();
        let mut level_cursor = 0usize;

        if let Some(t) = &title {
            nodes.push(OutlineNode::Title { text: t.clone() });
            stats.titles += 1;
        }

        for cl in lines {
            if title.as_deref() == Some(cl.line.text.as_str()) {
                continue;
            }

            match &cl.kind {
                LineKind::Noise => continue,
                LineKind::Bullet { text } => {
                    flush_bullet(&mut acc, &mut nodes, stats);
                    let level = levels.get(level_cursor).copied().unwrap_or(0);
                    level_cursor += 1;
                    acc.open(text.clone(), level);
                }
                LineKind::Heading => {
                    flush_bullet(&mut acc, &mut nodes, stats);
                    nodes.push(OutlineNode::Heading {
                        text: cl.line.text.clone(),
                    });
                    stats.headings += 1;
                }
                LineKind::Plain if self.all_bullets => {
                    flush_bullet(&mut acc, &mut nodes, stats);
                    acc.open(cl.line.text.clone(), 0);
                }
                LineKind::Plain => {
                    acc.append(&cl.line.text);
                }
            }
        }

        flush_bullet(&mut acc, &mut nodes, stats);

        let dropped = acc.dropped();
        if dropped > 0 {
            let page = lines.first().map(|cl| cl.line.page).unwrap_or(0);
            log::warn!("page {page}: {dropped} unattached continuation line(s) dropped");
        }
        stats.dropped_continuations += dropped;

        nodes.push(OutlineNode::Separator);
        stats.pages_emitted += 1;
        nodes
    }

    /// Assemble a whole document from per-page (lines, levels) pairs.
    pub fn assemble(&self, pages: &[(Vec<ClassifiedLine>, Vec<u8>)]) -> (Outline, ConvertStats) {
        let mut outline = Outline::new();
        let mut stats = ConvertStats::default();
        for (lines, levels) in pages {
            for node in self.assemble_page(lines, levels, &mut stats) {
                outline.push(node);
            }
        }
        (outline, stats)
    }
}

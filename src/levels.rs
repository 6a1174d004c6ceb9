//! Coordinate-based bullet level inference.
//!
//! Bullet nesting on a slide is encoded visually: deeper bullets sit further
//! right. This module clusters the horizontal positions of bullet-marker
//! glyphs on a page into indentation columns and maps each bullet, in
//! reading order, to a level. Everything here is deterministic for a fixed
//! input: ordering uses `f32::total_cmp`, never map iteration order.

use crate::classify::is_bullet_start;
use crate::extract::GlyphLine;

/// Horizontal clustering tolerance, in page units (points).
pub const CLUSTER_TOLERANCE: f32 = 4.0;

/// Deepest supported nesting level; further nesting collapses into it.
pub const MAX_LEVEL: u8 = 2;

/// Horizontal offsets of bullet-marker glyphs on a page, in reading order
/// (top line first, left-most first within a line).
///
/// For each glyph line whose first non-space character is a bullet glyph,
/// the offset is the left edge of the span containing that glyph, falling
/// back to the line's own left edge when span detection fails.
pub fn bullet_offsets(lines: &[GlyphLine]) -> Vec<f32> {
    let mut hits: Vec<(f32, f32, f32)> = Vec::new();

    for line in lines {
        if !is_bullet_start(&line.text()) {
            continue;
        }

        let bullet_x = line
            .spans
            .iter()
            .find(|s| is_bullet_start(&s.text))
            .map(|s| s.x)
            .unwrap_or(line.x);

        hits.push((line.y, line.x, bullet_x));
    }

    // Reading order: PDF y grows upward, so top-of-page first means
    // descending y; ties break left to right.
    hits.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.total_cmp(&b.1)));
    hits.into_iter().map(|(_, _, bx)| bx).collect()
}

/// Cluster offsets into columns within `tol`, returning centroids sorted
/// ascending. Input order does not matter; the multiset determines the
/// result.
pub fn cluster_offsets(offsets: &[f32], tol: f32) -> Vec<f32> {
    if offsets.is_empty() {
        return Vec::new();
    }

    let mut sorted = offsets.to_vec();
    sorted.sort_by(f32::total_cmp);

    let mut clusters: Vec<Vec<f32>> = vec![vec![sorted[0]]];
    for &x in &sorted[1..] {
        let last = clusters.last_mut().unwrap();
        if (x - *last.last().unwrap()).abs() <= tol {
            last.push(x);
        } else {
            clusters.push(vec![x]);
        }
    }

    let mut centers: Vec<f32> = clusters
        .iter()
        .map(|c| c.iter().sum::<f32>() / c.len() as f32)
        .collect();
    centers.sort_by(f32::total_cmp);
    centers
}

/// Map bullet offsets (in reading order) to levels 0..=2 by nearest cluster
/// centroid: leftmost column is level 0, the next level 1, and so on,
/// capped at [`MAX_LEVEL`].
pub fn levels_from_offsets(offsets: &[f32]) -> Vec<u8> {
    if offsets.is_empty() {
        return Vec::new();
    }

    let centers = cluster_offsets(offsets, CLUSTER_TOLERANCE);
    offsets
        .iter()
        .map(|&x| {
            let mut best = 0usize;
            let mut best_dist = f32::INFINITY;
            for (i, &c) in centers.iter().enumerate() {
                let dist = (x - c).abs();
                if dist < best_dist {
                    best = i;
                    best_dist = dist;
                }
            }
            (best as u8).min(MAX_LEVEL)
        })
        .collect()
}

/// Infer the level sequence for a page's bullet lines, in reading order.
///
/// An empty result means the page had no bullet glyphs in its geometry; the
/// assembler then defaults every bullet on the page to level 0.
pub fn infer_levels(lines: &[GlyphLine]) -> Vec<u8> {
    levels_from_offsets(&bullet_offsets(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::GlyphSpan;

    fn line(text: &str, x: f32, y: f32) -> GlyphLine {
        GlyphLine {
            x,
            y,
            spans: vec![GlyphSpan {
                text: text.to_string(),
                x,
                y,
                width: text.chars().count() as f32 * 6.0,
            }],
        }
    }

    #[test]
    fn test_cluster_within_tolerance() {
        let centers = cluster_offsets(&[50.0, 50.3, 90.0], CLUSTER_TOLERANCE);
        assert_eq!(centers.len(), 2);
        assert!((centers[0] - 50.15).abs() < 0.01);
        assert!((centers[1] - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_cluster_order_independent() {
        let a = cluster_offsets(&[50.0, 50.3, 90.0, 89.5], CLUSTER_TOLERANCE);
        let b = cluster_offsets(&[90.0, 50.3, 89.5, 50.0], CLUSTER_TOLERANCE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_levels_from_offsets() {
        assert_eq!(levels_from_offsets(&[50.0, 50.3, 90.0]), vec![0, 0, 1]);
    }

    #[test]
    fn test_levels_cap_at_two() {
        let offsets = [10.0, 40.0, 70.0, 100.0, 130.0];
        assert_eq!(levels_from_offsets(&offsets), vec![0, 1, 2, 2, 2]);
    }

    #[test]
    fn test_empty_page_yields_empty_sequence() {
        assert!(infer_levels(&[]).is_empty());
        assert!(levels_from_offsets(&[]).is_empty());
    }

    #[test]
    fn test_bullet_offsets_reading_order() {
        // y grows upward: 700 is above 650
        let lines = vec![
            line("• lower", 90.0, 650.0),
            line("• upper", 50.0, 700.0),
            line("no marker here", 50.0, 675.0),
        ];
        assert_eq!(bullet_offsets(&lines), vec![50.0, 90.0]);
    }

    #[test]
    fn test_bullet_offsets_span_fallback() {
        // No span starts with the glyph after trimming (glyph split from
        // text), so the line's own left edge is used.
        let l = GlyphLine {
            x: 42.0,
            y: 500.0,
            spans: vec![GlyphSpan {
                text: "  ".to_string(),
                x: 42.0,
                y: 500.0,
                width: 4.0,
            }],
        };
        // Line text is blank, not a bullet start: skipped entirely.
        assert!(bullet_offsets(&[l]).is_empty());
    }

    #[test]
    fn test_infer_levels_two_columns() {
        let lines = vec![
            line("• outer", 50.0, 700.0),
            line("◦ inner", 90.0, 680.0),
            line("• outer again", 50.3, 660.0),
        ];
        assert_eq!(infer_levels(&lines), vec![0, 1, 0]);
    }
}

//! Greedy label placement to the right of the graph.
//!
//! Labels are placed one node at a time in ideal-Y order, so earlier entries claim the preferred
//! column. The result is order dependent and not globally optimal.

use crate::model::LayoutNode;
use crate::settings::LabelSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelCandidate {
    /// 0 is the ideal column; higher columns sit further right.
    pub column: usize,
    pub x: f64,
    pub y: f64,
}

/// The ideal slot followed by an above/below pair for each extra column.
pub fn label_candidates(base_x: f64, ideal_y: f64, settings: &LabelSettings) -> Vec<LabelCandidate> {
    let mut out = Vec::with_capacity(1 + settings.extra_columns * 2);
    out.push(LabelCandidate {
        column: 0,
        x: base_x,
        y: ideal_y,
    });
    for column in 1..=settings.extra_columns {
        let x = base_x + column as f64 * settings.column_width;
        for y in [
            ideal_y - settings.vertical_nudge,
            ideal_y + settings.vertical_nudge,
        ] {
            out.push(LabelCandidate { column, x, y });
        }
    }
    out
}

fn conflicts(candidate: &LabelCandidate, placed: &[(f64, f64)], settings: &LabelSettings) -> bool {
    let min_dx = settings.column_width * settings.overlap_ratio;
    placed.iter().any(|&(px, py)| {
        (candidate.x - px).abs() < min_dx && (candidate.y - py).abs() < settings.height
    })
}

fn score(candidate: &LabelCandidate, ideal_y: f64, settings: &LabelSettings) -> f64 {
    (candidate.y - ideal_y).abs() + candidate.column as f64 * settings.column_penalty
}

/// Returns `nodes` with `label_x`/`label_y` filled in.
///
/// When every candidate collides, the node keeps the ideal slot and the labels overlap.
pub fn calculate_label_positions(
    mut nodes: Vec<LayoutNode>,
    settings: &LabelSettings,
) -> Vec<LayoutNode> {
    let Some(rightmost) = nodes.iter().map(|n| n.x).reduce(f64::max) else {
        return nodes;
    };
    let base_x = rightmost + settings.base_offset;

    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| nodes[a].mid_y().total_cmp(&nodes[b].mid_y()));

    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(nodes.len());
    for i in order {
        let ideal_y = nodes[i].mid_y();
        let candidates = label_candidates(base_x, ideal_y, settings);

        let mut best: Option<(f64, LabelCandidate)> = None;
        for c in &candidates {
            if conflicts(c, &placed, settings) {
                continue;
            }
            let s = score(c, ideal_y, settings);
            if best.is_none_or(|(best_score, _)| s < best_score) {
                best = Some((s, *c));
            }
        }

        let chosen = match best {
            Some((_, c)) => c,
            None => {
                tracing::warn!(entry = %nodes[i].id, "no free label slot; overlapping ideal slot");
                candidates[0]
            }
        };
        placed.push((chosen.x, chosen.y));
        nodes[i].label_x = Some(chosen.x);
        nodes[i].label_y = Some(chosen.y);
    }
    nodes
}

use crate::model::{EdgeKind, GraphEdge, LayoutNode, MAIN_ID};
use crate::path::create_connection_path;
use crate::settings::PathStyle;
use careergraph_core::{MergeAnchor, MergeTargetKind};
use rustc_hash::FxHashMap;

/// Where the trunk is drawn and how it is colored.
#[derive(Debug, Clone, Copy)]
pub struct Trunk<'a> {
    pub x: f64,
    pub start_y: f64,
    pub end_y: f64,
    pub color: &'a str,
}

/// Builds every connector of the graph: the trunk, then per node its lane, branch, implicit merge
/// (closed entries only) and declared merge targets.
///
/// Branches start one arc radius above the entry's start so the arc lands exactly on it; merges
/// leave at the entry's end and land one arc radius lower on the target lane.
pub fn build_edges(nodes: &[LayoutNode], trunk: Trunk<'_>, style: &PathStyle) -> Vec<GraphEdge> {
    let by_id: FxHashMap<&str, &LayoutNode> =
        nodes.iter().rev().map(|n| (n.id.trim(), n)).collect();
    let lane_x = |id: Option<&str>| -> (String, f64) {
        match id.and_then(|p| by_id.get(p.trim())) {
            Some(parent) => (parent.id.clone(), parent.x),
            None => (MAIN_ID.to_string(), trunk.x),
        }
    };
    let rise = style.arc_radius;

    let mut edges = Vec::with_capacity(nodes.len() * 3 + 1);
    edges.push(GraphEdge {
        kind: EdgeKind::Trunk,
        from: MAIN_ID.to_string(),
        to: MAIN_ID.to_string(),
        color: trunk.color.to_string(),
        d: create_connection_path(trunk.x, trunk.start_y, trunk.end_y),
    });

    for n in nodes {
        edges.push(GraphEdge {
            kind: EdgeKind::Lane,
            from: n.id.clone(),
            to: n.id.clone(),
            color: n.color.clone(),
            d: create_connection_path(n.x, n.start_y, n.end_y),
        });

        let (parent_id, parent_x) = lane_x(n.parent_id.as_deref());
        edges.push(GraphEdge {
            kind: EdgeKind::Branch,
            from: parent_id.clone(),
            to: n.id.clone(),
            color: n.color.clone(),
            d: style.branch_path(parent_x, n.start_y - rise, n.x, n.start_y),
        });

        if !n.ongoing {
            edges.push(GraphEdge {
                kind: EdgeKind::Merge,
                from: n.id.clone(),
                to: parent_id,
                color: n.color.clone(),
                d: style.merge_path(n.x, n.end_y, parent_x, n.end_y + rise),
            });
        }

        for target in &n.merge_targets {
            let (to, target_x) = match target.kind {
                MergeTargetKind::Main => (MAIN_ID.to_string(), trunk.x),
                MergeTargetKind::Entry => {
                    let Some(t) = target.id.as_deref().and_then(|t| by_id.get(t.trim())) else {
                        tracing::warn!(
                            entry = %n.id,
                            target = ?target.id,
                            "skipping unknown merge target"
                        );
                        continue;
                    };
                    (t.id.clone(), t.x)
                }
            };
            let y = match target.at {
                MergeAnchor::Start => n.start_y,
                MergeAnchor::End => n.end_y,
            };
            edges.push(GraphEdge {
                kind: EdgeKind::MergeTarget,
                from: n.id.clone(),
                to,
                color: n.color.clone(),
                d: style.merge_path(n.x, y, target_x, y + rise),
            });
        }
    }
    edges
}

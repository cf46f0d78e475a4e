use careergraph_core::MergeTarget;
use serde::{Deserialize, Serialize};

/// Endpoint id used for edges that start or end on the main trunk.
pub const MAIN_ID: &str = "main";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn padded(&self, padding: f64) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One positioned career entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    pub organization: String,
    pub role: String,
    /// Display range such as `Jan 2020 - Present`.
    pub date_range: String,
    pub x: f64,
    pub start_y: f64,
    pub end_y: f64,
    pub lane: usize,
    pub color: String,
    /// Effective parent: `None` for roots and for entries whose parent could not be resolved.
    pub parent_id: Option<String>,
    pub ongoing: bool,
    #[serde(default)]
    pub label_x: Option<f64>,
    #[serde(default)]
    pub label_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_targets: Vec<MergeTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LayoutNode {
    pub fn mid_y(&self) -> f64 {
        (self.start_y + self.end_y) / 2.0
    }

    pub fn label_anchor(&self) -> Option<(f64, f64)> {
        Some((self.label_x?, self.label_y?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// The main trunk line.
    Trunk,
    /// The vertical extent of one entry on its lane.
    Lane,
    /// Fork from the parent lane (or trunk) into the entry's start.
    Branch,
    /// Implicit merge from the entry's end back into its parent lane (or trunk).
    Merge,
    /// Extra merge line declared through `mergeTargets`.
    MergeTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub kind: EdgeKind,
    pub from: String,
    pub to: String,
    pub color: String,
    /// SVG path data.
    pub d: String,
}

/// Render knobs the SVG writer needs alongside the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphTheme {
    pub main_color: String,
    pub node_radius: f64,
    pub font_family: String,
    pub font_size: f64,
    pub label_width: f64,
    pub label_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerGraphLayout {
    pub bounds: Option<Bounds>,
    pub main_line_x: f64,
    pub trunk_start_y: f64,
    pub trunk_end_y: f64,
    /// Number of lanes in use (deepest level).
    pub lane_count: usize,
    pub theme: GraphTheme,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<GraphEdge>,
}

impl CareerGraphLayout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

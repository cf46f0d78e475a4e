#![forbid(unsafe_code)]

//! Headless Git-graph layout + SVG rendering for career timelines.
//!
//! The pipeline is synchronous and pure: entries -> branch tree -> colors -> positioned nodes ->
//! label anchors -> connector paths. Identical input always produces identical output.

pub mod color;
pub mod edges;
pub mod label;
pub mod layout;
pub mod model;
pub mod path;
pub mod settings;
pub mod svg;
pub mod tree;

use crate::edges::{Trunk, build_edges};
use careergraph_core::{CareerEntry, GraphConfig};
use chrono::NaiveDate;
use serde_json::Value;

pub use color::assign_branch_colors;
pub use label::calculate_label_positions;
pub use layout::compute_layout;
pub use model::{Bounds, CareerGraphLayout, EdgeKind, GraphEdge, GraphTheme, LayoutNode};
pub use path::{create_branch_path, create_connection_path, create_merge_path};
pub use settings::LayoutSettings;
pub use svg::{SvgRenderOptions, render_career_graph_svg};
pub use tree::build_branch_tree;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] careergraph_core::Error),
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub config: GraphConfig,
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Pins the end date used for ongoing entries by writing `layout.presentDate` into the
    /// current config. A later [`with_config`](Self::with_config) replaces it.
    pub fn with_present_date(mut self, present_date: NaiveDate) -> Result<Self> {
        self.config.set(
            "layout.presentDate",
            Value::String(present_date.format("%Y-%m-%d").to_string()),
        )?;
        Ok(self)
    }

    pub fn settings(&self) -> Result<LayoutSettings> {
        LayoutSettings::from_config(&self.config)
    }
}

/// Runs the full pipeline for `entries`.
///
/// Only configuration problems are errors; malformed entries degrade instead (see
/// [`careergraph_core::validate_entries`] for the pre-flight check).
pub fn layout_career_graph(
    entries: &[CareerEntry],
    options: &LayoutOptions,
) -> Result<CareerGraphLayout> {
    let settings = options.settings()?;
    Ok(layout_with_settings(entries, &settings))
}

pub fn layout_with_settings(entries: &[CareerEntry], settings: &LayoutSettings) -> CareerGraphLayout {
    let nodes = compute_layout(entries, settings);
    let nodes = calculate_label_positions(nodes, &settings.labels);

    let trunk_start_y = settings.top_padding;
    let trunk_end_y = nodes
        .iter()
        .map(|n| n.end_y + settings.paths.arc_radius)
        .fold(trunk_start_y, f64::max);
    let edges = build_edges(
        &nodes,
        Trunk {
            x: settings.main_line_x,
            start_y: trunk_start_y,
            end_y: trunk_end_y,
            color: settings.palette.main(),
        },
        &settings.paths,
    );

    let bounds = graph_bounds(&nodes, settings, trunk_end_y);
    let lane_count = nodes.iter().map(|n| n.lane).max().unwrap_or(0);

    CareerGraphLayout {
        bounds,
        main_line_x: settings.main_line_x,
        trunk_start_y,
        trunk_end_y,
        lane_count,
        theme: GraphTheme {
            main_color: settings.palette.main().to_string(),
            node_radius: settings.node_radius,
            font_family: settings.font_family.clone(),
            font_size: settings.font_size,
            label_width: settings.labels.column_width,
            label_height: settings.labels.height,
        },
        nodes,
        edges,
    }
}

/// Serializes a layout as JSON for external renderers.
pub fn layout_to_json(layout: &CareerGraphLayout, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    };
    Ok(text)
}

fn graph_bounds(nodes: &[LayoutNode], settings: &LayoutSettings, trunk_end_y: f64) -> Option<Bounds> {
    let r = settings.node_radius;
    let half_h = settings.labels.height / 2.0;
    let trunk = [
        (settings.main_line_x - r, 0.0),
        (settings.main_line_x + r, trunk_end_y),
    ];
    let node_points = nodes.iter().flat_map(|n| {
        let mut pts = vec![(n.x - r, n.start_y - r), (n.x + r, n.end_y + r)];
        if let Some((lx, ly)) = n.label_anchor() {
            pts.push((lx, ly - half_h));
            pts.push((lx + settings.labels.column_width, ly + half_h));
        }
        pts
    });
    let b = Bounds::from_points(trunk.into_iter().chain(node_points))?;
    Some(Bounds {
        max_y: b.max_y + settings.bottom_padding,
        ..b
    })
}

use crate::Result;
use careergraph_core::GraphConfig;
use careergraph_core::config::{DEFAULT_MAIN_COLOR, DEFAULT_PALETTE, DEFAULT_PRESENT_DATE};
use careergraph_core::date::parse_iso_date;
use chrono::NaiveDate;

const TOP_PADDING: f64 = 40.0;
const BOTTOM_PADDING: f64 = 40.0;
const PIXELS_PER_YEAR: f64 = 80.0;
const MAIN_LINE_X: f64 = 30.0;
const LANE_WIDTH: f64 = 40.0;
const SIBLING_OFFSET: f64 = 20.0;

const LABEL_BASE_OFFSET: f64 = 40.0;
const LABEL_COLUMN_WIDTH: f64 = 200.0;
const LABEL_HEIGHT: f64 = 48.0;
const LABEL_VERTICAL_NUDGE: f64 = 30.0;
const LABEL_COLUMN_PENALTY: f64 = 30.0;
const LABEL_EXTRA_COLUMNS: usize = 4;
const LABEL_OVERLAP_RATIO: f64 = 0.8;

const ARC_RADIUS: f64 = 12.0;
const STRAIGHT_THRESHOLD: f64 = 5.0;

const NODE_RADIUS: f64 = 6.0;
const FONT_SIZE: f64 = 12.0;
const FONT_FAMILY: &str = "\"trebuchet ms\", verdana, arial, sans-serif";

pub fn default_present_date() -> NaiveDate {
    parse_iso_date(DEFAULT_PRESENT_DATE).expect("valid default present date")
}

fn cfg_f64(cfg: &GraphConfig, key: &str, fallback: f64) -> f64 {
    cfg.get_f64(key).unwrap_or(fallback)
}

/// Branch colors: a cycling palette plus the reserved trunk color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
    main: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            main: DEFAULT_MAIN_COLOR.to_string(),
        }
    }
}

impl Palette {
    /// An empty `colors` list falls back to the default palette.
    pub fn new(colors: Vec<String>, main: impl Into<String>) -> Self {
        let colors = if colors.is_empty() {
            Self::default().colors
        } else {
            colors
        };
        Self {
            colors,
            main: main.into(),
        }
    }

    pub fn from_config(cfg: &GraphConfig) -> Self {
        let colors: Vec<String> = cfg
            .get_str_list("theme.palette")
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        let main = cfg.get_str("theme.mainColor").unwrap_or(DEFAULT_MAIN_COLOR);
        Self::new(colors, main)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Palette entry for a monotonically growing cursor.
    pub fn color(&self, cursor: usize) -> &str {
        &self.colors[cursor % self.colors.len()]
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn main(&self) -> &str {
        &self.main
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSettings {
    /// Gap between the rightmost node column and the first label column.
    pub base_offset: f64,
    pub column_width: f64,
    pub height: f64,
    pub vertical_nudge: f64,
    pub column_penalty: f64,
    pub extra_columns: usize,
    pub overlap_ratio: f64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            base_offset: LABEL_BASE_OFFSET,
            column_width: LABEL_COLUMN_WIDTH,
            height: LABEL_HEIGHT,
            vertical_nudge: LABEL_VERTICAL_NUDGE,
            column_penalty: LABEL_COLUMN_PENALTY,
            extra_columns: LABEL_EXTRA_COLUMNS,
            overlap_ratio: LABEL_OVERLAP_RATIO,
        }
    }
}

impl LabelSettings {
    pub fn from_config(cfg: &GraphConfig) -> Self {
        let d = Self::default();
        Self {
            base_offset: cfg_f64(cfg, "labels.baseOffset", d.base_offset),
            column_width: cfg_f64(cfg, "labels.columnWidth", d.column_width).max(1.0),
            height: cfg_f64(cfg, "labels.height", d.height).max(1.0),
            vertical_nudge: cfg_f64(cfg, "labels.verticalNudge", d.vertical_nudge),
            column_penalty: cfg_f64(cfg, "labels.columnPenalty", d.column_penalty),
            extra_columns: cfg
                .get_usize("labels.extraColumns")
                .unwrap_or(d.extra_columns),
            overlap_ratio: cfg_f64(cfg, "labels.overlapRatio", d.overlap_ratio),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub arc_radius: f64,
    /// Horizontal distances below this always produce a straight segment.
    pub straight_threshold: f64,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            arc_radius: ARC_RADIUS,
            straight_threshold: STRAIGHT_THRESHOLD,
        }
    }
}

impl PathStyle {
    pub fn from_config(cfg: &GraphConfig) -> Self {
        let d = Self::default();
        Self {
            arc_radius: cfg_f64(cfg, "paths.arcRadius", d.arc_radius).max(0.0),
            straight_threshold: cfg_f64(cfg, "paths.straightThreshold", d.straight_threshold),
        }
    }
}

/// Typed view of [`GraphConfig`] used by every layout stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    pub top_padding: f64,
    pub bottom_padding: f64,
    pub pixels_per_year: f64,
    pub main_line_x: f64,
    pub lane_width: f64,
    pub sibling_offset: f64,
    /// End date assumed for ongoing entries.
    pub present_date: NaiveDate,
    pub palette: Palette,
    pub labels: LabelSettings,
    pub paths: PathStyle,
    pub node_radius: f64,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self::resolve(&GraphConfig::empty_object(), default_present_date())
    }
}

impl LayoutSettings {
    pub fn from_config(cfg: &GraphConfig) -> Result<Self> {
        let present = cfg.present_date()?;
        Ok(Self::resolve(cfg, present))
    }

    fn resolve(cfg: &GraphConfig, present_date: NaiveDate) -> Self {
        Self {
            top_padding: cfg_f64(cfg, "layout.topPadding", TOP_PADDING),
            bottom_padding: cfg_f64(cfg, "layout.bottomPadding", BOTTOM_PADDING),
            pixels_per_year: cfg_f64(cfg, "layout.pixelsPerYear", PIXELS_PER_YEAR).max(0.0),
            main_line_x: cfg_f64(cfg, "layout.mainLineX", MAIN_LINE_X),
            lane_width: cfg_f64(cfg, "layout.laneWidth", LANE_WIDTH),
            sibling_offset: cfg_f64(cfg, "layout.siblingOffset", SIBLING_OFFSET),
            present_date,
            palette: Palette::from_config(cfg),
            labels: LabelSettings::from_config(cfg),
            paths: PathStyle::from_config(cfg),
            node_radius: cfg_f64(cfg, "theme.nodeRadius", NODE_RADIUS).max(0.0),
            font_family: cfg
                .get_str("theme.fontFamily")
                .unwrap_or(FONT_FAMILY)
                .to_string(),
            font_size: cfg_f64(cfg, "theme.fontSize", FONT_SIZE),
        }
    }
}

#![forbid(unsafe_code)]

use crate::render::{CareerGraphLayout, SvgRenderOptions, render_career_graph_svg};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse SVG: {0}")]
    SvgParse(String),
    #[error("invalid scale {0}; expected a positive finite number")]
    InvalidScale(f32),
    #[error("invalid background color {0:?}")]
    InvalidBackground(String),
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// `None` keeps a transparent canvas.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: Some("white".to_string()),
        }
    }
}

/// Renders a computed layout straight to PNG bytes.
pub fn layout_to_png(
    layout: &CareerGraphLayout,
    svg_options: &SvgRenderOptions,
    raster: &RasterOptions,
) -> Result<Vec<u8>> {
    let svg = render_career_graph_svg(layout, svg_options);
    svg_to_png(&svg, raster)
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    if !(options.scale.is_finite() && options.scale > 0.0) {
        return Err(RasterError::InvalidScale(options.scale));
    }
    let background = match options.background.as_deref() {
        Some(raw) => Some(
            parse_tiny_skia_color(raw).ok_or_else(|| RasterError::InvalidBackground(raw.to_string()))?,
        ),
        None => None,
    };

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RasterError::SvgParse(e.to_string()))?;

    // usvg already maps the root viewBox onto (0,0)-(width,height).
    let size = tree.size();
    let width = (size.width() * options.scale).ceil().max(1.0) as u32;
    let height = (size.height() * options.scale).ceil().max(1.0) as u32;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;
    if let Some(color) = background {
        pixmap.fill(color);
    }

    tracing::debug!(width, height, scale = options.scale, "rasterizing career graph");
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(options.scale, options.scale),
        &mut pixmap.as_mut(),
    );
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

/// Accepts `transparent`, `white`, `black` and `#rgb`/`#rgba`/`#rrggbb`/`#rrggbbaa`.
pub fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::TRANSPARENT),
        "white" => return Some(tiny_skia::Color::WHITE),
        "black" => return Some(tiny_skia::Color::BLACK),
        _ => {}
    }

    let digits: Vec<u8> = s
        .strip_prefix('#')?
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    let channels: Vec<u8> = match digits.len() {
        3 | 4 => digits.iter().map(|&d| (d << 4) | d).collect(),
        6 | 8 => digits.chunks_exact(2).map(|p| (p[0] << 4) | p[1]).collect(),
        _ => return None,
    };
    let alpha = channels.get(3).copied().unwrap_or(255);
    Some(tiny_skia::Color::from_rgba8(
        channels[0],
        channels[1],
        channels[2],
        alpha,
    ))
}

//! SVG output for a computed [`CareerGraphLayout`].

use crate::model::{Bounds, CareerGraphLayout, EdgeKind, GraphTheme, LayoutNode};
use crate::path::fmt_num as fmt;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id; also scopes the generated CSS.
    pub diagram_id: Option<String>,
    /// Accessible title emitted as `<title>`.
    pub title: Option<String>,
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    /// Draws a dashed leader from each entry to its label.
    pub include_leaders: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            title: None,
            viewbox_padding: 8.0,
            include_leaders: true,
        }
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub fn escape_xml_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

/// Keeps a user-supplied CSS value inside its declaration and the surrounding `<style>` element.
fn css_value(raw: &str) -> String {
    let kept: String = raw.chars().filter(|c| !matches!(c, '{' | '}' | ';')).collect();
    escape_xml(&kept)
}

fn career_css(diagram_id: &str, theme: &GraphTheme) -> String {
    let id = escape_xml(diagram_id);
    let mut css = String::new();
    let _ = write!(
        &mut css,
        "#{id}{{font-family:{font};font-size:{size}px;}}",
        font = css_value(&theme.font_family),
        size = fmt(theme.font_size),
    );
    let _ = write!(
        &mut css,
        "#{id} .career-edge{{fill:none;stroke-width:3px;stroke-linecap:round;}}\
         #{id} .career-trunk{{stroke-width:4px;}}\
         #{id} .career-commit{{stroke:#ffffff;stroke-width:2px;}}\
         #{id} .career-commit.ongoing{{fill:#ffffff;stroke-width:3px;}}\
         #{id} .career-leader{{stroke:#d1d5db;stroke-width:1px;stroke-dasharray:3 3;}}\
         #{id} .career-org{{font-weight:bold;fill:#111827;}}\
         #{id} .career-role{{fill:#374151;}}\
         #{id} .career-dates{{fill:#6b7280;font-size:{small}px;}}",
        small = fmt(theme.font_size * 0.85),
    );
    css
}

fn edge_class(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Trunk => "career-edge career-trunk",
        EdgeKind::Lane => "career-edge career-lane",
        EdgeKind::Branch => "career-edge career-branch",
        EdgeKind::Merge => "career-edge career-merge",
        EdgeKind::MergeTarget => "career-edge career-merge-target",
    }
}

fn write_commit(out: &mut String, node: &LayoutNode, theme: &GraphTheme) {
    let color = escape_xml(&node.color);
    let _ = write!(
        out,
        r#"<g class="career-entry" data-id="{id}"><circle class="career-commit" cx="{x}" cy="{y}" r="{r}" fill="{color}">"#,
        id = escape_xml(&node.id),
        x = fmt(node.x),
        y = fmt(node.start_y),
        r = fmt(theme.node_radius),
    );
    out.push_str("<title>");
    escape_xml_into(out, &format!("{} - {}", node.organization, node.role));
    if let Some(d) = node.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push('\n');
        escape_xml_into(out, d);
    }
    out.push_str("</title></circle>");

    let (class, fill) = if node.ongoing {
        ("career-commit ongoing", "#ffffff".to_string())
    } else {
        ("career-commit", color.clone())
    };
    let _ = write!(
        out,
        r#"<circle class="{class}" cx="{x}" cy="{y}" r="{r}" fill="{fill}" stroke="{color}"/>"#,
        x = fmt(node.x),
        y = fmt(node.end_y),
        r = fmt(theme.node_radius),
    );
    out.push_str("</g>");
}

fn write_label(out: &mut String, node: &LayoutNode, theme: &GraphTheme, leader: bool) {
    let Some((lx, ly)) = node.label_anchor() else {
        return;
    };
    if leader {
        let _ = write!(
            out,
            r#"<path class="career-leader" d="M {} {} L {} {}"/>"#,
            fmt(node.x + theme.node_radius),
            fmt(node.mid_y()),
            fmt(lx - 4.0),
            fmt(ly),
        );
    }
    let line = theme.font_size * 1.25;
    let _ = write!(
        out,
        r#"<text class="career-label" x="{x}" y="{y}" dominant-baseline="middle">"#,
        x = fmt(lx),
        y = fmt(ly - line),
    );
    let lines = [
        ("career-org", node.organization.as_str()),
        ("career-role", node.role.as_str()),
        ("career-dates", node.date_range.as_str()),
    ];
    for (i, (class, text)) in lines.into_iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { line };
        let _ = write!(
            out,
            r#"<tspan class="{class}" x="{x}" dy="{dy}">"#,
            x = fmt(lx),
            dy = fmt(dy),
        );
        escape_xml_into(out, text);
        out.push_str("</tspan>");
    }
    out.push_str("</text>");
}

/// Serializes `layout` into a standalone SVG document.
///
/// Paint order is edges, then commit circles, then labels, so labels are never hidden behind lines.
pub fn render_career_graph_svg(layout: &CareerGraphLayout, options: &SvgRenderOptions) -> String {
    let diagram_id = options.diagram_id.as_deref().unwrap_or("careergraph");
    let diagram_id_esc = escape_xml(diagram_id);

    let bounds = layout
        .bounds
        .clone()
        .unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        })
        .padded(options.viewbox_padding);
    let vb_w = bounds.width().max(1.0);
    let vb_h = bounds.height().max(1.0);

    let mut out = String::new();
    let aria = if options.title.is_some() {
        format!(r#" aria-labelledby="chart-title-{diagram_id_esc}""#)
    } else {
        String::new()
    };
    let _ = write!(
        &mut out,
        r#"<svg id="{diagram_id_esc}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="{x} {y} {w} {h}" style="background-color: white;" role="graphics-document document" aria-roledescription="careergraph"{aria}>"#,
        x = fmt(bounds.min_x),
        y = fmt(bounds.min_y),
        w = fmt(vb_w),
        h = fmt(vb_h),
    );
    if let Some(t) = options.title.as_deref() {
        let _ = write!(
            &mut out,
            r#"<title id="chart-title-{diagram_id_esc}">{}</title>"#,
            escape_xml(t)
        );
    }
    let _ = write!(
        &mut out,
        "<style>{}</style>",
        career_css(diagram_id, &layout.theme)
    );

    out.push_str(r#"<g class="career-edges">"#);
    for edge in &layout.edges {
        let _ = write!(
            &mut out,
            r#"<path class="{class}" d="{d}" stroke="{stroke}" data-from="{from}" data-to="{to}"/>"#,
            class = edge_class(edge.kind),
            d = edge.d,
            stroke = escape_xml(&edge.color),
            from = escape_xml(&edge.from),
            to = escape_xml(&edge.to),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="career-commits">"#);
    for node in &layout.nodes {
        write_commit(&mut out, node, &layout.theme);
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="career-labels">"#);
    for node in &layout.nodes {
        write_label(&mut out, node, &layout.theme, options.include_leaders);
    }
    out.push_str("</g></svg>\n");
    out
}

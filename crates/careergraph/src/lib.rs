#![forbid(unsafe_code)]

//! `careergraph` draws a career history as a Git-style branch graph.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`careergraph::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use careergraph_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use careergraph_render::model::CareerGraphLayout;
    pub use careergraph_render::settings::LayoutSettings;
    pub use careergraph_render::{
        Error as RenderError, LayoutOptions, SvgRenderOptions, layout_career_graph, layout_to_json,
        render_career_graph_svg,
    };

    use careergraph_core::{
        CareerEntry, SortOrder, TimelineItem, ValidationIssue, chronological_timeline,
        validate_entries,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Load(#[from] careergraph_core::Error),
        #[error(transparent)]
        Render(#[from] careergraph_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// What a UI should show for a set of entries.
    #[derive(Debug, Clone, PartialEq)]
    pub enum CareerView {
        Graph(Box<CareerGraphLayout>),
        /// Validation failed; show the issues next to a plain list.
        Timeline {
            issues: Vec<ValidationIssue>,
            items: Vec<TimelineItem>,
        },
    }

    impl CareerView {
        pub fn is_graph(&self) -> bool {
            matches!(self, Self::Graph(_))
        }
    }

    /// Validates `entries` and lays out the graph, or falls back to a chronological list.
    pub fn layout_or_fallback(
        entries: &[CareerEntry],
        options: &LayoutOptions,
        fallback_order: SortOrder,
    ) -> Result<CareerView> {
        let issues = validate_entries(entries);
        if !issues.is_empty() {
            tracing::warn!(
                issues = issues.len(),
                "career entries failed validation; using timeline fallback"
            );
            return Ok(CareerView::Timeline {
                issues,
                items: chronological_timeline(entries, fallback_order),
            });
        }
        Ok(CareerView::Graph(Box::new(layout_career_graph(
            entries, options,
        )?)))
    }

    /// Parses entries JSON and renders it straight to SVG, skipping validation.
    pub fn render_svg_from_json(
        text: &str,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let entries = careergraph_core::load_entries_json(text)?;
        let layout = layout_career_graph(&entries, layout_options)?;
        Ok(render_career_graph_svg(&layout, svg_options))
    }

    /// Converts an arbitrary string into a conservative SVG `id` token, so several graphs can be
    /// inlined into one document without their internal ids colliding.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        let mut out = String::with_capacity(raw.len() + 3);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }
        if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.insert_str(0, "cg-");
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_end_matches('-');
        if out.is_empty() || out == "cg" {
            return "cg-untitled".to_string();
        }
        out.to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn entry(id: &str, parent: Option<&str>) -> CareerEntry {
            let e = CareerEntry::new(id, "2020-01-01", Some("2021-01-01"))
                .with_titles("Acme", "Engineer");
            match parent {
                Some(p) => e.with_parent(p),
                None => e,
            }
        }

        #[test]
        fn valid_entries_produce_a_graph() {
            let view = layout_or_fallback(
                &[entry("a", None), entry("b", Some("a"))],
                &LayoutOptions::default(),
                SortOrder::NewestFirst,
            )
            .unwrap();
            assert!(view.is_graph());
        }

        #[test]
        fn invalid_entries_fall_back_to_timeline() {
            let view = layout_or_fallback(
                &[entry("a", Some("b")), entry("b", Some("a"))],
                &LayoutOptions::default(),
                SortOrder::OldestFirst,
            )
            .unwrap();
            let CareerView::Timeline { issues, items } = view else {
                panic!("expected timeline fallback");
            };
            assert_eq!(issues.len(), 2);
            assert_eq!(items.len(), 2);
        }

        #[test]
        fn json_renders_to_svg() {
            let svg = render_svg_from_json(
                r#"{"entries":[{"id":"a","organization":"Acme","role":"Dev","startDate":"2020-01-01"}]}"#,
                &LayoutOptions::default(),
                &SvgRenderOptions::default(),
            )
            .unwrap();
            assert!(svg.contains("Acme"));
        }

        #[test]
        fn svg_ids_are_sanitized() {
            assert_eq!(sanitize_svg_id("My Career!"), "My-Career");
            assert_eq!(sanitize_svg_id("  2024 cv "), "cg-2024-cv");
            assert_eq!(sanitize_svg_id("%%"), "cg-untitled");
        }
    }
}

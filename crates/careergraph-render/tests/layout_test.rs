use careergraph_core::date::parse_iso_date;
use careergraph_core::{CareerEntry, GraphConfig};
use careergraph_render::layout::{Span, overlap_groups, resolve_spans};
use careergraph_render::{LayoutOptions, LayoutSettings, compute_layout, layout_career_graph};
use serde_json::json;

fn entry(id: &str, start: &str, end: Option<&str>) -> CareerEntry {
    CareerEntry::new(id, start, end).with_titles("Acme", "Engineer")
}

fn date(raw: &str) -> chrono::NaiveDate {
    parse_iso_date(raw).expect("valid test date")
}

fn expected_y(settings: &LayoutSettings, origin: &str, at: chrono::NaiveDate) -> f64 {
    settings.top_padding + (at - date(origin)).num_days() as f64 / 365.25 * settings.pixels_per_year
}

#[test]
fn single_ongoing_root_runs_to_present() {
    let settings = LayoutSettings::default();
    let nodes = compute_layout(&[entry("a", "2020-01-01", None)], &settings);
    assert_eq!(nodes.len(), 1);

    let a = &nodes[0];
    assert_eq!(a.lane, 1);
    assert_eq!(a.x, settings.main_line_x + settings.lane_width);
    assert_eq!(a.start_y, settings.top_padding);
    assert_eq!(a.end_y, expected_y(&settings, "2020-01-01", date("2030-12-31")));
    assert!(a.ongoing);
    assert_eq!(a.parent_id, None);
    assert_eq!(a.date_range, "Jan 2020 - Present");
}

#[test]
fn child_sits_one_lane_to_the_right() {
    let settings = LayoutSettings::default();
    let entries = vec![
        entry("a", "2020-01-01", Some("2022-01-01")),
        entry("b", "2021-01-01", Some("2021-06-01")).with_parent("a"),
    ];
    let nodes = compute_layout(&entries, &settings);
    assert_eq!(nodes[0].lane, 1);
    assert_eq!(nodes[1].lane, 2);
    assert_eq!(nodes[1].x - nodes[0].x, settings.lane_width);
    assert_eq!(nodes[1].parent_id.as_deref(), Some("a"));
    assert!(!nodes[1].ongoing);
}

#[test]
fn overlapping_siblings_are_offset() {
    let settings = LayoutSettings::default();
    let entries = vec![
        entry("p", "2019-01-01", Some("2024-01-01")),
        entry("s1", "2020-01-01", Some("2021-01-01")).with_parent("p"),
        entry("s2", "2020-06-01", Some("2020-09-01")).with_parent("p"),
        entry("s3", "2022-01-01", Some("2023-01-01")).with_parent("p"),
    ];
    let nodes = compute_layout(&entries, &settings);
    let base = settings.main_line_x + 2.0 * settings.lane_width;
    assert_eq!(nodes[1].x, base);
    assert_eq!(nodes[2].x, base + settings.sibling_offset);
    assert_eq!(nodes[3].x, base);
}

#[test]
fn touching_ranges_do_not_overlap() {
    let a = Span {
        start: date("2020-01-01"),
        end: date("2021-01-01"),
    };
    let b = Span {
        start: date("2021-01-01"),
        end: date("2022-01-01"),
    };
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
    assert_eq!(overlap_groups(&[0, 1], &[a, b]), vec![vec![0], vec![1]]);
}

#[test]
fn overlap_groups_merge_through_a_bridging_sibling() {
    let span = |s: &str, e: &str| Span {
        start: date(s),
        end: date(e),
    };
    let spans = [
        span("2020-01-01", "2020-06-01"),
        span("2020-05-01", "2020-12-01"),
        span("2020-11-01", "2021-03-01"),
        span("2019-01-01", "2019-06-01"),
        span("2018-06-01", "2020-02-01"),
    ];
    assert_eq!(
        overlap_groups(&[0, 1, 2, 3], &spans),
        vec![vec![0, 1, 2], vec![3]]
    );
    // The last sibling bridges both groups, which collapse into the earlier one.
    assert_eq!(
        overlap_groups(&[0, 1, 2, 3, 4], &spans),
        vec![vec![0, 1, 2, 3, 4]]
    );
    assert_eq!(
        overlap_groups(&[3, 0, 4], &spans),
        vec![vec![3, 0, 4]]
    );
}

#[test]
fn overlapping_siblings_never_share_x() {
    let settings = LayoutSettings::default();
    let entries = vec![
        entry("p", "2019-01-01", None),
        entry("a", "2020-01-01", Some("2022-01-01")).with_parent("p"),
        entry("b", "2023-01-01", Some("2025-01-01")).with_parent("p"),
        entry("d", "2024-01-01", Some("2026-01-01")).with_parent("p"),
        entry("c", "2021-01-01", Some("2025-01-01")).with_parent("p"),
    ];
    let nodes = compute_layout(&entries, &settings);
    let (spans, _) = resolve_spans(&entries, &settings);

    for i in 1..entries.len() {
        for j in (i + 1)..entries.len() {
            if spans[i].overlaps(&spans[j]) {
                assert!(
                    (nodes[i].x - nodes[j].x).abs() >= settings.sibling_offset,
                    "{} and {} overlap but sit at x={} and x={}",
                    nodes[i].id,
                    nodes[j].id,
                    nodes[i].x,
                    nodes[j].x
                );
            }
        }
    }
    assert_ne!(nodes[3].x, nodes[4].x);
}

#[test]
fn unparsable_dates_degrade() {
    let settings = LayoutSettings::default();
    let entries = vec![
        entry("a", "2020-01-01", Some("2021-01-01")),
        entry("b", "garbage", Some("also garbage")),
        entry("c", "2022-01-01", Some("2021-01-01")),
    ];
    let (spans, scale) = resolve_spans(&entries, &settings);
    assert_eq!(scale.min_date, date("2020-01-01"));
    assert_eq!(spans[1].start, date("2020-01-01"));
    assert_eq!(spans[1].end, settings.present_date);
    assert_eq!(spans[2].end, spans[2].start);

    let nodes = compute_layout(&entries, &settings);
    assert!(nodes.iter().all(|n| n.end_y >= n.start_y));
    assert!(nodes[1].ongoing);
}

#[test]
fn shared_end_dates_align_to_the_lowest_end() {
    let settings = LayoutSettings::default();
    let entries = vec![
        entry("early", "2015-01-01", Some("2019-01-01")),
        entry("clamped", "2020-01-01", Some("2019-01-01")),
    ];
    let nodes = compute_layout(&entries, &settings);
    assert_eq!(nodes[0].end_y, nodes[1].end_y);
    assert_eq!(nodes[1].end_y, nodes[1].start_y);
}

#[test]
fn present_date_comes_from_config_or_override() {
    let cfg = GraphConfig::with_overrides(&json!({ "layout": { "presentDate": "2025-06-30" } }));
    let entries = vec![entry("a", "2020-01-01", None)];

    let layout = layout_career_graph(&entries, &LayoutOptions::new().with_config(cfg.clone()))
        .expect("layout");
    let settings = LayoutSettings::from_config(&cfg).expect("settings");
    assert_eq!(
        layout.nodes[0].end_y,
        expected_y(&settings, "2020-01-01", date("2025-06-30"))
    );

    let pinned = LayoutOptions::new()
        .with_config(cfg)
        .with_present_date(date("2024-01-01"))
        .expect("present date");
    let layout = layout_career_graph(&entries, &pinned).expect("layout");
    assert_eq!(
        layout.nodes[0].end_y,
        expected_y(&settings, "2020-01-01", date("2024-01-01"))
    );
}

#[test]
fn invalid_present_date_is_a_config_error() {
    let cfg = GraphConfig::with_overrides(&json!({ "layout": { "presentDate": "soon" } }));
    let err = layout_career_graph(&[], &LayoutOptions::new().with_config(cfg)).unwrap_err();
    assert!(err.to_string().contains("layout.presentDate"), "{err}");
}

#[test]
fn config_overrides_geometry() {
    let cfg = GraphConfig::with_overrides(&json!({
        "layout": { "mainLineX": 100, "laneWidth": 50, "pixelsPerYear": 120 }
    }));
    let settings = LayoutSettings::from_config(&cfg).expect("settings");
    let nodes = compute_layout(
        &[
            entry("a", "2020-01-01", Some("2021-01-01")),
            entry("b", "2020-01-01", Some("2021-01-01")).with_parent("a"),
        ],
        &settings,
    );
    assert_eq!(nodes[0].x, 150.0);
    assert_eq!(nodes[1].x, 200.0);
    assert_eq!(nodes[0].end_y, expected_y(&settings, "2020-01-01", date("2021-01-01")));
}

#[test]
fn full_layout_is_deterministic() {
    let entries = vec![
        entry("a", "2016-03-01", Some("2019-08-31")),
        entry("b", "2017-01-01", Some("2018-01-01")).with_parent("a"),
        entry("c", "2017-06-01", None).with_parent("a"),
        entry("d", "2019-09-01", None),
    ];
    let options = LayoutOptions::default();
    let first = layout_career_graph(&entries, &options).expect("layout");
    let second = layout_career_graph(&entries, &options).expect("layout");
    assert_eq!(first, second);
    assert_eq!(first.lane_count, 2);
    assert!(first.bounds.is_some());
    assert!(first.trunk_end_y >= first.nodes.iter().map(|n| n.end_y).fold(0.0, f64::max));
}

#[test]
fn empty_input_produces_empty_layout() {
    let layout = layout_career_graph(&[], &LayoutOptions::default()).expect("layout");
    assert!(layout.nodes.is_empty());
    assert_eq!(layout.edges.len(), 1);
    assert_eq!(layout.lane_count, 0);
}

use careergraph_render::LayoutNode;
use careergraph_render::calculate_label_positions;
use careergraph_render::label::label_candidates;
use careergraph_render::settings::LabelSettings;

fn node(id: &str, x: f64, start_y: f64, end_y: f64) -> LayoutNode {
    LayoutNode {
        id: id.to_string(),
        organization: "Acme".to_string(),
        role: "Engineer".to_string(),
        date_range: "Jan 2020 - Present".to_string(),
        x,
        start_y,
        end_y,
        lane: 1,
        color: "#3b82f6".to_string(),
        parent_id: None,
        ongoing: false,
        label_x: None,
        label_y: None,
        merge_targets: Vec::new(),
        description: None,
    }
}

#[test]
fn candidates_cover_ideal_then_alternating_columns() {
    let settings = LabelSettings::default();
    let c = label_candidates(100.0, 50.0, &settings);
    assert_eq!(c.len(), 9);
    assert_eq!((c[0].column, c[0].x, c[0].y), (0, 100.0, 50.0));
    assert_eq!((c[1].column, c[1].x, c[1].y), (1, 300.0, 20.0));
    assert_eq!((c[2].column, c[2].x, c[2].y), (1, 300.0, 80.0));
    assert_eq!(c[8].x, 900.0);
}

#[test]
fn lone_label_takes_the_ideal_slot() {
    let out = calculate_label_positions(vec![node("a", 70.0, 40.0, 120.0)], &LabelSettings::default());
    assert_eq!(out[0].label_anchor(), Some((110.0, 80.0)));
}

#[test]
fn colliding_label_moves_to_next_column_above() {
    let nodes = vec![node("a", 70.0, 40.0, 120.0), node("b", 50.0, 60.0, 100.0)];
    let out = calculate_label_positions(nodes, &LabelSettings::default());
    assert_eq!(out[0].label_anchor(), Some((110.0, 80.0)));
    assert_eq!(out[1].label_anchor(), Some((310.0, 50.0)));
}

#[test]
fn labels_are_placed_in_vertical_order() {
    let nodes = vec![node("late", 70.0, 200.0, 240.0), node("early", 70.0, 40.0, 80.0)];
    let out = calculate_label_positions(nodes, &LabelSettings::default());
    assert_eq!(out[0].id, "late");
    assert_eq!(out[0].label_anchor(), Some((110.0, 220.0)));
    assert_eq!(out[1].label_anchor(), Some((110.0, 60.0)));
}

#[test]
fn no_free_slot_falls_back_to_ideal() {
    let settings = LabelSettings {
        extra_columns: 0,
        ..LabelSettings::default()
    };
    let nodes = vec![node("a", 70.0, 40.0, 120.0), node("b", 70.0, 40.0, 120.0)];
    let out = calculate_label_positions(nodes, &settings);
    assert_eq!(out[0].label_anchor(), out[1].label_anchor());
}

#[test]
fn empty_input_is_untouched() {
    assert!(calculate_label_positions(Vec::new(), &LabelSettings::default()).is_empty());
}

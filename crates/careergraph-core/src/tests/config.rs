use crate::*;
use serde_json::json;

#[test]
fn default_config_exposes_layout_constants() {
    let cfg = default_config();
    assert_eq!(cfg.get_f64("layout.pixelsPerYear"), Some(80.0));
    assert_eq!(cfg.get_f64("layout.siblingOffset"), Some(20.0));
    assert_eq!(cfg.get_usize("labels.extraColumns"), Some(4));
    assert_eq!(cfg.get_str_list("theme.palette").map(|p| p.len()), Some(10));
    assert_eq!(
        cfg.present_date().unwrap(),
        chrono::NaiveDate::from_ymd_opt(2030, 12, 31).unwrap()
    );
}

#[test]
fn overrides_deep_merge_onto_defaults() {
    let cfg = GraphConfig::with_overrides(&json!({
        "layout": { "laneWidth": 64, "presentDate": "2026-01-01" },
        "theme": { "palette": ["#000000", "#ffffff"] }
    }));
    assert_eq!(cfg.get_f64("layout.laneWidth"), Some(64.0));
    assert_eq!(cfg.get_f64("layout.mainLineX"), Some(30.0));
    assert_eq!(
        cfg.get_str_list("theme.palette").unwrap(),
        vec!["#000000".to_string(), "#ffffff".to_string()]
    );
    assert_eq!(
        cfg.present_date().unwrap(),
        chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    );
}

#[test]
fn invalid_present_date_is_a_config_error() {
    let mut cfg = default_config();
    cfg.set("layout.presentDate", json!("soon")).unwrap();
    let err = cfg.present_date().unwrap_err().to_string();
    assert_eq!(
        err,
        "Invalid config (layout.presentDate): expected a YYYY-MM-DD date, got \"soon\""
    );
}

#[test]
fn set_creates_missing_tables() {
    let mut cfg = GraphConfig::empty_object();
    cfg.set("labels.height", json!(10.0)).unwrap();
    cfg.set("rootKey", json!("x")).unwrap();
    assert_eq!(
        cfg.as_value(),
        &json!({ "labels": { "height": 10.0 }, "rootKey": "x" })
    );
}

#[test]
fn set_refuses_to_clobber_scalars() {
    let mut cfg = GraphConfig::with_overrides(&json!({ "layout": 5 }));
    let err = cfg.set("layout.presentDate", json!("2024-01-01")).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { ref key, .. } if key == "layout.presentDate"));
    assert_eq!(cfg.get_f64("layout"), Some(5.0));

    let mut scalar = GraphConfig::from_value(json!(3));
    assert!(scalar.set("labels.height", json!(1)).is_err());
}

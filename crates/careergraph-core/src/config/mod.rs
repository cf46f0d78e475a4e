use crate::date::parse_iso_date;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value, json};

/// Fallback "present" cutoff for ongoing entries.
///
/// A fixed date (never the wall clock) keeps layouts stable between renders.
pub const DEFAULT_PRESENT_DATE: &str = "2030-12-31";

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#6366f1", "#84cc16",
];

pub const DEFAULT_MAIN_COLOR: &str = "#9ca3af";

/// Built-in defaults. User configs are deep-merged on top of this object.
pub fn default_config() -> GraphConfig {
    GraphConfig(json!({
        "layout": {
            "topPadding": 40.0,
            "bottomPadding": 40.0,
            "pixelsPerYear": 80.0,
            "mainLineX": 30.0,
            "laneWidth": 40.0,
            "siblingOffset": 20.0,
            "presentDate": DEFAULT_PRESENT_DATE,
        },
        "labels": {
            "baseOffset": 40.0,
            "columnWidth": 200.0,
            "height": 48.0,
            "verticalNudge": 30.0,
            "columnPenalty": 30.0,
            "extraColumns": 4,
            "overlapRatio": 0.8,
        },
        "paths": {
            "arcRadius": 12.0,
            "straightThreshold": 5.0,
        },
        "theme": {
            "palette": DEFAULT_PALETTE,
            "mainColor": DEFAULT_MAIN_COLOR,
            "nodeRadius": 6.0,
            "fontFamily": "\"trebuchet ms\", verdana, arial, sans-serif",
            "fontSize": 12.0,
        },
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig(Value);

impl Default for GraphConfig {
    fn default() -> Self {
        default_config()
    }
}

impl GraphConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut cfg = default_config();
        cfg.deep_merge(overrides);
        cfg
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn get_usize(&self, dotted_path: &str) -> Option<usize> {
        let v = self.lookup(dotted_path)?.as_u64()?;
        usize::try_from(v).ok()
    }

    /// String array at `dotted_path`; non-string items are skipped.
    pub fn get_str_list(&self, dotted_path: &str) -> Option<Vec<String>> {
        let items = self.lookup(dotted_path)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
        )
    }

    /// The configured "present" cutoff used for ongoing entries.
    pub fn present_date(&self) -> Result<NaiveDate> {
        let raw = self
            .get_str("layout.presentDate")
            .unwrap_or(DEFAULT_PRESENT_DATE);
        parse_iso_date(raw).ok_or_else(|| Error::InvalidConfig {
            key: "layout.presentDate".to_string(),
            message: format!("expected a YYYY-MM-DD date, got {raw:?}"),
        })
    }

    /// Writes `value` at `dotted_path`, creating missing intermediate objects.
    ///
    /// Fails instead of overwriting when a segment along the path already holds a non-object.
    pub fn set(&mut self, dotted_path: &str, value: Value) -> Result<()> {
        let not_an_object = || Error::InvalidConfig {
            key: dotted_path.to_string(),
            message: "cannot set a key below a non-object value".to_string(),
        };
        let (parents, leaf) = match dotted_path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, dotted_path),
        };
        let mut table = self.0.as_object_mut().ok_or_else(not_an_object)?;
        for segment in parents.into_iter().flat_map(|p| p.split('.')) {
            table = table
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
                .ok_or_else(not_an_object)?;
        }
        table.insert(leaf.to_string(), value);
        Ok(())
    }

    /// Merges `overrides` into this config. Objects merge key by key; any other value replaces
    /// what was there.
    pub fn deep_merge(&mut self, overrides: &Value) {
        merge_into(&mut self.0, overrides);
    }
}

fn merge_into(target: &mut Value, overrides: &Value) {
    if !(target.is_object() && overrides.is_object()) {
        *target = overrides.clone();
        return;
    }
    if let (Value::Object(target_map), Value::Object(override_map)) = (target, overrides) {
        for (key, value) in override_map {
            match target_map.get_mut(key) {
                Some(slot) => merge_into(slot, value),
                None => {
                    target_map.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

//! SVG path data for lane connectors.
//!
//! Branches leave the parent lane horizontally and bend into the child lane with a quarter-circle
//! arc; merges are the mirror image. Small horizontal distances collapse to straight lines.

use crate::settings::PathStyle;

/// Formats a coordinate with at most 3 fractional digits (`1.50` -> `1.5`, `-0` -> `0`).
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut s = format!("{r:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

fn straight(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!(
        "M {} {} L {} {}",
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2)
    )
}

fn direction(delta: f64) -> f64 {
    if delta < 0.0 { -1.0 } else { 1.0 }
}

impl PathStyle {
    fn arc_radius_for(&self, dx: f64, dy: f64) -> f64 {
        self.arc_radius.min(dx.abs()).min(dy.abs())
    }

    /// Fork: horizontal along `parent_y`, then an arc turning into the child lane.
    pub fn branch_path(&self, parent_x: f64, parent_y: f64, child_x: f64, child_y: f64) -> String {
        let dx = child_x - parent_x;
        let dy = child_y - parent_y;
        let r = self.arc_radius_for(dx, dy);
        if dx.abs() < self.straight_threshold || r <= 0.0 {
            return straight(parent_x, parent_y, child_x, child_y);
        }
        let sx = direction(dx);
        let sy = direction(dy);
        let sweep = if sx * sy > 0.0 { 1 } else { 0 };
        format!(
            "M {} {} L {} {} A {r} {r} 0 0 {sweep} {} {} L {} {}",
            fmt_num(parent_x),
            fmt_num(parent_y),
            fmt_num(child_x - sx * r),
            fmt_num(parent_y),
            fmt_num(child_x),
            fmt_num(parent_y + sy * r),
            fmt_num(child_x),
            fmt_num(child_y),
            r = fmt_num(r),
            sweep = sweep,
        )
    }

    /// Merge: vertical along the child lane, then an arc turning onto `parent_y`.
    pub fn merge_path(&self, child_x: f64, child_y: f64, parent_x: f64, parent_y: f64) -> String {
        let dx = parent_x - child_x;
        let dy = parent_y - child_y;
        let r = self.arc_radius_for(dx, dy);
        if dx.abs() < self.straight_threshold || r <= 0.0 {
            return straight(child_x, child_y, parent_x, parent_y);
        }
        let sx = direction(dx);
        let sy = direction(dy);
        let sweep = if sx * sy < 0.0 { 1 } else { 0 };
        format!(
            "M {} {} L {} {} A {r} {r} 0 0 {sweep} {} {} L {} {}",
            fmt_num(child_x),
            fmt_num(child_y),
            fmt_num(child_x),
            fmt_num(parent_y - sy * r),
            fmt_num(child_x + sx * r),
            fmt_num(parent_y),
            fmt_num(parent_x),
            fmt_num(parent_y),
            r = fmt_num(r),
            sweep = sweep,
        )
    }
}

pub fn create_branch_path(parent_x: f64, parent_y: f64, child_x: f64, child_y: f64) -> String {
    PathStyle::default().branch_path(parent_x, parent_y, child_x, child_y)
}

pub fn create_merge_path(child_x: f64, child_y: f64, parent_x: f64, parent_y: f64) -> String {
    PathStyle::default().merge_path(child_x, child_y, parent_x, parent_y)
}

/// Vertical line along one lane.
pub fn create_connection_path(x: f64, y1: f64, y2: f64) -> String {
    straight(x, y1, x, y2)
}

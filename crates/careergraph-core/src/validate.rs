//! Pre-flight validation of career entries.
//!
//! The layout engine never rejects input; callers run [`validate_entries`] first and switch to the
//! plain chronological timeline when it reports anything.

use crate::date::{is_iso_date_shape, parse_iso_date};
use crate::entities::{CareerEntry, MergeTargetKind};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingField,
    InvalidDate,
    InvalidParent,
    InvalidMergeTarget,
    CircularReference,
    DuplicateId,
    InvalidDateRange,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidDate => "invalid_date",
            Self::InvalidParent => "invalid_parent",
            Self::InvalidMergeTarget => "invalid_merge_target",
            Self::CircularReference => "circular_reference",
            Self::DuplicateId => "duplicate_id",
            Self::InvalidDateRange => "invalid_date_range",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub entry_id: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    fn new(entry_id: &str, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Label used for an entry in issue records; entries without an id get their input position.
fn entry_label(entry: &CareerEntry, index: usize) -> String {
    let id = entry.id.trim();
    if id.is_empty() {
        format!("#{index}")
    } else {
        id.to_string()
    }
}

fn check_date(label: &str, field: &str, raw: &str, issues: &mut Vec<ValidationIssue>) {
    if !is_iso_date_shape(raw) {
        issues.push(ValidationIssue::new(
            label,
            IssueKind::InvalidDate,
            format!("{field} {raw:?} is not in YYYY-MM-DD format"),
        ));
    } else if parse_iso_date(raw).is_none() {
        issues.push(ValidationIssue::new(
            label,
            IssueKind::InvalidDate,
            format!("{field} {raw:?} is not a valid calendar date"),
        ));
    }
}

/// Runs every check and returns the issues in entry order.
///
/// Per-entry field checks come first, followed by the cross-entry cycle report.
pub fn validate_entries(entries: &[CareerEntry]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut ids: FxHashSet<&str> = FxHashSet::default();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for e in entries {
        let id = e.id.trim();
        if !id.is_empty() {
            ids.insert(id);
        }
    }

    for (index, e) in entries.iter().enumerate() {
        let label = entry_label(e, index);

        for (field, value) in [
            ("id", e.id.as_str()),
            ("organization", e.organization.as_str()),
            ("role", e.role.as_str()),
            ("startDate", e.start_date.as_str()),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    &label,
                    IssueKind::MissingField,
                    format!("required field `{field}` is missing"),
                ));
            }
        }

        let id = e.id.trim();
        if !id.is_empty() && !seen.insert(id) {
            issues.push(ValidationIssue::new(
                &label,
                IssueKind::DuplicateId,
                format!("id {id:?} is used by more than one entry"),
            ));
        }

        if !e.start_date.trim().is_empty() {
            check_date(&label, "startDate", &e.start_date, &mut issues);
        }
        if let Some(end) = e.end_date.as_deref().filter(|s| !s.trim().is_empty()) {
            check_date(&label, "endDate", end, &mut issues);
        }
        if let (Some(start), Some(end)) = (e.start(), e.end()) {
            if start > end {
                issues.push(ValidationIssue::new(
                    &label,
                    IssueKind::InvalidDateRange,
                    format!("startDate {start} is after endDate {end}"),
                ));
            }
        }

        if let Some(parent) = e.parent() {
            if !ids.contains(parent) {
                issues.push(ValidationIssue::new(
                    &label,
                    IssueKind::InvalidParent,
                    format!("parentId {parent:?} does not match any entry"),
                ));
            }
        }

        for (i, target) in e.merge_targets.iter().enumerate() {
            if target.kind != MergeTargetKind::Entry {
                continue;
            }
            match target.id.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                None => issues.push(ValidationIssue::new(
                    &label,
                    IssueKind::InvalidMergeTarget,
                    format!("mergeTargets[{i}] has type `entry` but no id"),
                )),
                Some(t) if !ids.contains(t) => issues.push(ValidationIssue::new(
                    &label,
                    IssueKind::InvalidMergeTarget,
                    format!("mergeTargets[{i}] references unknown entry {t:?}"),
                )),
                Some(_) => {}
            }
        }
    }

    for index in find_cycle_members(entries) {
        let e = &entries[index];
        let label = entry_label(e, index);
        issues.push(ValidationIssue::new(
            &label,
            IssueKind::CircularReference,
            format!("entry {label:?} is its own ancestor through parentId"),
        ));
    }

    issues
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Fresh,
    OnStack,
    Done,
}

/// Indices (ascending) of entries that sit on a parent-chain cycle.
///
/// Every entry has at most one parent, so the DFS from each entry is a walk up its chain with the
/// current path acting as the recursion stack. Entries that merely lead into a cycle are not
/// reported.
pub fn find_cycle_members(entries: &[CareerEntry]) -> Vec<usize> {
    let mut index_by_id: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, e) in entries.iter().enumerate() {
        index_by_id.entry(e.id.trim()).or_insert(i);
    }
    let parent_of: Vec<Option<usize>> = entries
        .iter()
        .map(|e| e.parent().and_then(|p| index_by_id.get(p).copied()))
        .collect();

    let mut state = vec![Visit::Fresh; entries.len()];
    let mut on_cycle = vec![false; entries.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..entries.len() {
        if state[start] != Visit::Fresh {
            continue;
        }
        path.clear();
        let mut cur = start;
        loop {
            match state[cur] {
                Visit::Done => break,
                Visit::OnStack => {
                    if let Some(pos) = path.iter().position(|&n| n == cur) {
                        for &n in &path[pos..] {
                            on_cycle[n] = true;
                        }
                    }
                    break;
                }
                Visit::Fresh => {
                    state[cur] = Visit::OnStack;
                    path.push(cur);
                    match parent_of[cur] {
                        Some(p) => cur = p,
                        None => break,
                    }
                }
            }
        }
        for &n in &path {
            state[n] = Visit::Done;
        }
    }

    on_cycle
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| c.then_some(i))
        .collect()
}

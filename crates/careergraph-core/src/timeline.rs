//! Plain chronological list used when the graph view cannot be drawn.

use crate::date::format_date_range;
use crate::entities::CareerEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            Self::NewestFirst => Self::OldestFirst,
            Self::OldestFirst => Self::NewestFirst,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub id: String,
    pub organization: String,
    pub role: String,
    pub date_range: String,
    pub ongoing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Entries sorted by start date.
///
/// The sort is stable on the raw `startDate` string in either direction: valid ISO dates order
/// correctly, and entries sharing a start date keep their input order.
pub fn chronological_timeline(entries: &[CareerEntry], order: SortOrder) -> Vec<TimelineItem> {
    let mut sorted: Vec<&CareerEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        let (a, b) = (a.start_date.trim(), b.start_date.trim());
        match order {
            SortOrder::OldestFirst => a.cmp(b),
            SortOrder::NewestFirst => b.cmp(a),
        }
    });

    sorted
        .into_iter()
        .map(|e| TimelineItem {
            id: e.id.clone(),
            organization: e.organization.clone(),
            role: e.role.clone(),
            date_range: format_date_range(&e.start_date, e.end_date.as_deref()),
            ongoing: e.is_ongoing(),
            description: e.description.clone(),
        })
        .collect()
}

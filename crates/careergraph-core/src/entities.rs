use crate::date::parse_iso_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One career position as loaded from the portfolio data file.
///
/// Required text fields deserialize to empty strings when absent so that the validation pass can
/// report `missing_field` instead of the loader failing on the first gap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_targets: Vec<MergeTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CareerEntry {
    pub fn new(
        id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            start_date: start_date.into(),
            end_date: end_date.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_titles(mut self, organization: impl Into<String>, role: impl Into<String>) -> Self {
        self.organization = organization.into();
        self.role = role.into();
        self
    }

    pub fn with_merge_target(mut self, target: MergeTarget) -> Self {
        self.merge_targets.push(target);
        self
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.start_date)
    }

    /// `None` both for ongoing entries and for unparsable end dates.
    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_iso_date)
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_date
            .as_deref()
            .is_none_or(|raw| raw.trim().is_empty())
    }

    /// The parent id with blank strings treated as "no parent".
    pub fn parent(&self) -> Option<&str> {
        self.parent_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeTargetKind {
    Entry,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeAnchor {
    Start,
    #[default]
    End,
}

/// An extra merge line drawn in addition to the implicit end-of-entry merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeTarget {
    #[serde(rename = "type")]
    pub kind: MergeTargetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub at: MergeAnchor,
}

impl MergeTarget {
    pub fn main(at: MergeAnchor) -> Self {
        Self {
            kind: MergeTargetKind::Main,
            id: None,
            at,
        }
    }

    pub fn entry(id: impl Into<String>, at: MergeAnchor) -> Self {
        Self {
            kind: MergeTargetKind::Entry,
            id: Some(id.into()),
            at,
        }
    }
}

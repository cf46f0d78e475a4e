#![forbid(unsafe_code)]

//! Career entry model, validation and configuration for Git-graph career timelines.
//!
//! Design goals:
//! - deterministic, testable outputs (the "present" cutoff is configuration, never the clock)
//! - validation is a separate pre-flight pass; nothing here panics on malformed entries
//! - no I/O: callers hand in JSON text and get typed records back

pub mod config;
pub mod date;
pub mod entities;
pub mod error;
pub mod timeline;
pub mod validate;

pub use config::{GraphConfig, default_config};
pub use entities::{CareerEntry, MergeAnchor, MergeTarget, MergeTargetKind};
pub use error::{Error, Result};
pub use timeline::{SortOrder, TimelineItem, chronological_timeline};
pub use validate::{IssueKind, ValidationIssue, validate_entries};

use serde_json::Value;

/// Parses career entries from JSON text.
///
/// Accepts either a bare array or an object with an `entries` array (the shape of the portfolio
/// data file).
pub fn load_entries_json(text: &str) -> Result<Vec<CareerEntry>> {
    let value: Value = serde_json::from_str(text)?;
    load_entries_value(value)
}

pub fn load_entries_value(value: Value) -> Result<Vec<CareerEntry>> {
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("entries") {
            Some(list @ Value::Array(_)) => list,
            _ => return Err(Error::UnexpectedEntriesShape),
        },
        _ => return Err(Error::UnexpectedEntriesShape),
    };
    let entries: Vec<CareerEntry> = serde_json::from_value(list)?;
    tracing::debug!(count = entries.len(), "loaded career entries");
    Ok(entries)
}

#[cfg(test)]
mod tests;

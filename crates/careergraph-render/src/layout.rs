//! Temporal layout: dates to Y, tree depth plus sibling overlap to X.

use crate::color::assign_branch_colors;
use crate::model::LayoutNode;
use crate::settings::LayoutSettings;
use crate::tree::{BranchTree, build_branch_tree};
use careergraph_core::CareerEntry;
use careergraph_core::date::{format_date_range, years_between};
use chrono::NaiveDate;
use indexmap::IndexMap;

/// Linear date-to-pixel mapping anchored at the earliest start date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub top_padding: f64,
    pub pixels_per_year: f64,
}

impl TimeScale {
    pub fn y(&self, date: NaiveDate) -> f64 {
        self.top_padding + years_between(date, self.min_date) * self.pixels_per_year
    }

    pub fn bottom(&self) -> f64 {
        self.y(self.max_date)
    }
}

/// Resolved `[start, end]` interval of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Span {
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Resolves every entry's interval and the overall scale.
///
/// Ongoing entries end at `settings.present_date`. Unparsable start dates fall back to the
/// earliest valid start, unparsable end dates are treated as ongoing, and an end before the start
/// is clamped to the start so spans never run backwards.
pub fn resolve_spans(entries: &[CareerEntry], settings: &LayoutSettings) -> (Vec<Span>, TimeScale) {
    let present = settings.present_date;
    let starts: Vec<Option<NaiveDate>> = entries.iter().map(CareerEntry::start).collect();
    let min_date = starts.iter().flatten().min().copied().unwrap_or(present);

    let spans: Vec<Span> = entries
        .iter()
        .zip(&starts)
        .map(|(e, start)| {
            let start = start.unwrap_or_else(|| {
                tracing::warn!(entry = %e.id, start = %e.start_date, "unparsable startDate");
                min_date
            });
            let end = match (e.is_ongoing(), e.end()) {
                (false, Some(end)) => end,
                (false, None) => {
                    tracing::warn!(entry = %e.id, "unparsable endDate; treating entry as ongoing");
                    present
                }
                (true, _) => present,
            };
            Span {
                start,
                end: end.max(start),
            }
        })
        .collect();

    let max_date = spans.iter().map(|s| s.end).max().unwrap_or(present);
    let scale = TimeScale {
        min_date,
        max_date,
        top_padding: settings.top_padding,
        pixels_per_year: settings.pixels_per_year,
    };
    (spans, scale)
}

/// Splits siblings into overlap groups.
///
/// Siblings are visited in order. A sibling overlapping members of several groups merges them all
/// into the earliest one, so every overlapping pair ends up in the same group. Members stay in
/// input order; two members of one group may only be connected through a chain of overlaps.
pub fn overlap_groups(siblings: &[usize], spans: &[Span]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<(usize, usize)>> = Vec::new();
    for (pos, &i) in siblings.iter().enumerate() {
        let hits: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.iter().any(|&(_, j)| spans[i].overlaps(&spans[j])))
            .map(|(k, _)| k)
            .collect();
        let Some((&first, rest)) = hits.split_first() else {
            groups.push(vec![(pos, i)]);
            continue;
        };
        for &k in rest.iter().rev() {
            let absorbed = groups.remove(k);
            groups[first].extend(absorbed);
        }
        groups[first].sort_unstable_by_key(|&(p, _)| p);
        groups[first].push((pos, i));
    }
    groups
        .into_iter()
        .map(|g| g.into_iter().map(|(_, i)| i).collect())
        .collect()
}

/// Horizontal displacement per entry (indexed by input position).
pub fn sibling_offsets(tree: &BranchTree<'_>, spans: &[Span], sibling_offset: f64) -> Vec<f64> {
    let mut offsets = vec![0.0; tree.len()];
    let sibling_lists = std::iter::once(tree.roots()).chain(
        tree.nodes()
            .iter()
            .map(|n| n.children.as_slice())
            .filter(|c| !c.is_empty()),
    );
    for siblings in sibling_lists {
        for group in overlap_groups(siblings, spans) {
            if group.len() < 2 {
                continue;
            }
            for (k, &i) in group.iter().enumerate() {
                offsets[i] = k as f64 * sibling_offset;
            }
        }
    }
    offsets
}

/// Computes one [`LayoutNode`] per entry, in input order, without label anchors.
pub fn compute_layout(entries: &[CareerEntry], settings: &LayoutSettings) -> Vec<LayoutNode> {
    let tree = build_branch_tree(entries);
    let colors = assign_branch_colors(&tree, &settings.palette);
    let (spans, scale) = resolve_spans(entries, settings);
    let offsets = sibling_offsets(&tree, &spans, settings.sibling_offset);

    let mut end_ys: Vec<f64> = spans.iter().map(|s| scale.y(s.end)).collect();
    align_shared_end_dates(entries, &mut end_ys);

    tracing::debug!(
        entries = entries.len(),
        lanes = tree.max_level(),
        min_date = %scale.min_date,
        max_date = %scale.max_date,
        "computed career layout"
    );

    tree.nodes()
        .iter()
        .map(|node| {
            let e = node.entry;
            let i = node.index;
            let start_y = scale.y(spans[i].start);
            LayoutNode {
                id: e.id.clone(),
                organization: e.organization.clone(),
                role: e.role.clone(),
                date_range: format_date_range(&e.start_date, e.end_date.as_deref()),
                x: settings.main_line_x + node.level as f64 * settings.lane_width + offsets[i],
                start_y,
                end_y: end_ys[i].max(start_y),
                lane: node.level,
                color: colors[i].clone(),
                parent_id: tree.parent_of(i).map(|p| p.id().to_string()),
                ongoing: e.end().is_none(),
                label_x: None,
                label_y: None,
                merge_targets: e.merge_targets.clone(),
                description: e.description.clone(),
            }
        })
        .collect()
}

/// Entries with the same literal `endDate` share the largest `endY` among them.
fn align_shared_end_dates(entries: &[CareerEntry], end_ys: &mut [f64]) {
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (i, e) in entries.iter().enumerate() {
        if let Some(end) = e.end_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            groups.entry(end).or_default().push(i);
        }
    }
    for members in groups.values().filter(|m| m.len() > 1) {
        let max = members
            .iter()
            .map(|&i| end_ys[i])
            .fold(f64::NEG_INFINITY, f64::max);
        for &i in members {
            end_ys[i] = max;
        }
    }
}

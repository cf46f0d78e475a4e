//! Branch tree: the parent/child structure behind the graph lanes.
//!
//! Nodes live in a flat arena indexed by input position. Parents are plain indices, so the tree
//! never holds two owning edges between the same pair of nodes.

use careergraph_core::CareerEntry;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct BranchNode<'a> {
    pub entry: &'a CareerEntry,
    /// Position of the entry in the input slice.
    pub index: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Depth in the tree; roots are 1 (0 is reserved for the main trunk).
    pub level: usize,
}

impl BranchNode<'_> {
    pub fn id(&self) -> &str {
        self.entry.id.trim()
    }
}

#[derive(Debug, Clone)]
pub struct BranchTree<'a> {
    nodes: Vec<BranchNode<'a>>,
    by_id: IndexMap<&'a str, usize>,
    roots: Vec<usize>,
}

impl<'a> BranchTree<'a> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[BranchNode<'a>] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &BranchNode<'a> {
        &self.nodes[index]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Looks a branch up by entry id. With duplicate ids the first entry wins.
    pub fn get(&self, id: &str) -> Option<&BranchNode<'a>> {
        self.by_id.get(id.trim()).map(|&i| &self.nodes[i])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id.trim()).copied()
    }

    /// Every branch keyed by id, in input order.
    pub fn all_branches(&self) -> impl Iterator<Item = (&'a str, &BranchNode<'a>)> + '_ {
        self.by_id.iter().map(|(&id, &i)| (id, &self.nodes[i]))
    }

    pub fn parent_of(&self, index: usize) -> Option<&BranchNode<'a>> {
        self.nodes[index].parent.map(|p| &self.nodes[p])
    }

    pub fn max_level(&self) -> usize {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }

    fn assign_levels(&mut self, index: usize, level: usize) {
        self.nodes[index].level = level;
        let children = self.nodes[index].children.clone();
        for child in children {
            self.assign_levels(child, level + 1);
        }
    }
}

/// Builds the branch tree for `entries`.
///
/// Entries whose `parentId` is blank or unknown become roots. Parent cycles cannot come from
/// validated input, but they are still broken here (the first unreachable entry in input order is
/// detached and promoted to a root) so that every node ends up with a level.
pub fn build_branch_tree(entries: &[CareerEntry]) -> BranchTree<'_> {
    let mut by_id: IndexMap<&str, usize> = IndexMap::with_capacity(entries.len());
    for (i, e) in entries.iter().enumerate() {
        by_id.entry(e.id.trim()).or_insert(i);
    }

    let mut nodes: Vec<BranchNode<'_>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| BranchNode {
            entry,
            index,
            parent: None,
            children: Vec::new(),
            level: 0,
        })
        .collect();

    let mut roots = Vec::new();
    for (i, e) in entries.iter().enumerate() {
        let Some(parent_id) = e.parent() else {
            roots.push(i);
            continue;
        };
        match by_id.get(parent_id).copied() {
            Some(p) => {
                nodes[i].parent = Some(p);
                nodes[p].children.push(i);
            }
            None => {
                tracing::warn!(
                    entry = %e.id,
                    parent = %parent_id,
                    "unknown parentId; treating entry as unparented"
                );
                roots.push(i);
            }
        }
    }

    let mut tree = BranchTree {
        nodes,
        by_id,
        roots,
    };
    for r in tree.roots.clone() {
        tree.assign_levels(r, 1);
    }

    for i in 0..tree.nodes.len() {
        if tree.nodes[i].level != 0 {
            continue;
        }
        if let Some(p) = tree.nodes[i].parent.take() {
            tree.nodes[p].children.retain(|&c| c != i);
        }
        tracing::warn!(entry = %tree.nodes[i].entry.id, "parent cycle detected; detaching entry");
        tree.roots.push(i);
        tree.assign_levels(i, 1);
    }

    tree
}

use crate::settings::Palette;
use crate::tree::BranchTree;

/// Monotonic palette position shared by the whole depth-first walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCursor {
    pub next: usize,
}

impl ColorCursor {
    /// Picks the next palette color not in `adjacent`, advancing past every color it tries.
    ///
    /// After a full palette cycle without a free color, the last candidate is kept.
    pub fn pick<'p>(&mut self, palette: &'p Palette, adjacent: &[&str]) -> &'p str {
        let mut candidate = palette.color(self.next);
        for _ in 0..palette.len() {
            candidate = palette.color(self.next);
            self.next += 1;
            if !adjacent.contains(&candidate) {
                return candidate;
            }
        }
        candidate
    }
}

/// Assigns one color per branch, indexed like [`BranchTree::nodes`].
///
/// Each branch avoids its parent's color and the colors of siblings colored before it. Roots
/// treat the trunk color as their parent color.
pub fn assign_branch_colors(tree: &BranchTree<'_>, palette: &Palette) -> Vec<String> {
    let mut colors = vec![String::new(); tree.len()];
    let mut cursor = ColorCursor::default();
    assign_siblings(
        tree,
        tree.roots(),
        palette.main(),
        palette,
        &mut cursor,
        &mut colors,
    );
    colors
}

fn assign_siblings(
    tree: &BranchTree<'_>,
    siblings: &[usize],
    parent_color: &str,
    palette: &Palette,
    cursor: &mut ColorCursor,
    colors: &mut [String],
) {
    let mut taken: Vec<String> = Vec::with_capacity(siblings.len());
    for &index in siblings {
        let color = {
            let mut adjacent: Vec<&str> = Vec::with_capacity(taken.len() + 1);
            adjacent.push(parent_color);
            adjacent.extend(taken.iter().map(String::as_str));
            cursor.pick(palette, &adjacent).to_string()
        };
        colors[index] = color.clone();
        assign_siblings(
            tree,
            &tree.node(index).children,
            &color,
            palette,
            cursor,
            colors,
        );
        taken.push(color);
    }
}

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Display;

use super::{NodeRef, RedBlackTreeMap};

/// One label on the canvas.
struct Cell {
    label: Vec<char>,
    depth: usize,
    column: usize,
    left: Option<usize>,
    right: Option<usize>,
}

impl Cell {
    fn center(&self) -> usize {
        self.column + self.label.len().saturating_sub(1) / 2
    }
}

impl<K: Display, V> RedBlackTreeMap<K, V> {
    /// Renders the tree as ASCII art, one level per pair of lines.
    ///
    /// Each key gets its own columns in key order, so labels never overlap;
    /// parents are joined to their children with `_`, `/` and `\`. An empty
    /// map renders as an empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let map = RedBlackTreeMap::from([(2, ()), (1, ()), (3, ())]);
    /// assert_eq!(map.to_ascii_drawing(), " _2_\n/   \\\n1   3");
    /// ```
    #[must_use]
    pub fn to_ascii_drawing(&self) -> String {
        self.root().map(draw).unwrap_or_default()
    }
}

/// Lays the tree out using nothing but the public node view.
fn draw<K: Display, V>(root: NodeRef<'_, K, V>) -> String {
    let cells = layout(root);

    let width = cells.iter().map(|cell| cell.column + cell.label.len()).max().unwrap_or(0);
    let depth = cells.iter().map(|cell| cell.depth).max().unwrap_or(0);
    let mut canvas = vec![vec![' '; width]; 2 * depth + 1];

    for cell in &cells {
        let row = 2 * cell.depth;
        canvas[row][cell.column..cell.column + cell.label.len()].copy_from_slice(&cell.label);

        if let Some(left) = cell.left {
            let target = cells[left].center();
            canvas[row][target + 1..cell.column].fill('_');
            canvas[row + 1][target] = '/';
        }
        if let Some(right) = cell.right {
            let target = cells[right].center();
            canvas[row][cell.column + cell.label.len()..target].fill('_');
            canvas[row + 1][target] = '\\';
        }
    }

    let lines: Vec<String> = canvas
        .into_iter()
        .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
        .collect();
    lines.join("\n")
}

/// Assigns every node a cell: depth from its position, columns from its rank
/// in key order. Cells are created in pre-order and placed during an in-order
/// walk.
fn layout<K: Display, V>(root: NodeRef<'_, K, V>) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();
    let mut stack: Vec<(NodeRef<'_, K, V>, usize)> = Vec::new();
    let mut column = 0;

    // (node, depth, parent cell and whether we hang to its left)
    let mut descend = Some((root, 0, None::<(usize, bool)>));
    loop {
        while let Some((node, depth, parent)) = descend {
            let index = cells.len();
            cells.push(Cell {
                label: node.key().to_string().chars().collect(),
                depth,
                column: 0,
                left: None,
                right: None,
            });
            match parent {
                Some((parent, true)) => cells[parent].left = Some(index),
                Some((parent, false)) => cells[parent].right = Some(index),
                None => {}
            }
            stack.push((node, index));
            descend = node.left().map(|left| (left, depth + 1, Some((index, true))));
        }

        let Some((node, index)) = stack.pop() else {
            break;
        };
        cells[index].column = column;
        column += cells[index].label.len() + 1;
        descend = node.right().map(|right| (right, cells[index].depth + 1, Some((index, false))));
    }

    cells
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_map_draws_nothing() {
        let map: RedBlackTreeMap<i32, ()> = RedBlackTreeMap::new();
        assert_eq!(map.to_ascii_drawing(), "");
    }

    #[test]
    fn single_entry() {
        let map = RedBlackTreeMap::from([("root", 1)]);
        assert_eq!(map.to_ascii_drawing(), "root");
    }

    #[test]
    fn five_entries() {
        let map = RedBlackTreeMap::from([(5, ()), (2, ()), (8, ()), (1, ()), (3, ())]);
        let expected = ["   ___5_", "  /     \\", " _2_    8", "/   \\", "1   3"].join("\n");
        assert_eq!(map.to_ascii_drawing(), expected);
    }

    #[test]
    fn wide_labels_are_centered_over_connectors() {
        let map = RedBlackTreeMap::from([(200, ()), (100, ()), (300, ())]);
        let expected = ["  __200__", " /       \\", "100     300"].join("\n");
        assert_eq!(map.to_ascii_drawing(), expected);
    }
}

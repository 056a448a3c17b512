//! Read-only structural analytics over the raw tree.
//!
//! Every walk keeps its own stack instead of recursing, so a degenerate shape
//! (reachable only by misuse, since insertion keeps the tree balanced) costs
//! heap, not call depth.

use alloc::vec::Vec;

use smallvec::{SmallVec, smallvec};

use super::handle::Handle;
use super::node::Node;
use super::raw_rbtree_map::RawRedBlackTreeMap;

/// Height is bounded by 2 * log2(n + 1), so walks of a balanced tree rarely spill.
type Stack<T> = SmallVec<[T; 64]>;

/// Height and diameter of one subtree, produced bottom-up in a single pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Shape {
    /// Edges on the longest downward path; `-1` for an absent subtree.
    pub(crate) height: isize,
    /// Edges on the longest path between two nodes of the subtree.
    pub(crate) diameter: usize,
}

impl Shape {
    pub(crate) const ABSENT: Self = Self {
        height: -1,
        diameter: 0,
    };

    /// Combines the shapes of a node's two subtrees into the node's own.
    fn join(left: Self, right: Self) -> Self {
        let through = (left.height + right.height + 2).unsigned_abs();
        Self {
            height: 1 + left.height.max(right.height),
            diameter: through.max(left.diameter).max(right.diameter),
        }
    }
}

impl<K, V> RawRedBlackTreeMap<K, V> {
    /// Visits every node in pre-order together with its depth (root = 0).
    fn for_each_with_depth<F>(&self, mut visit: F)
    where
        F: FnMut(&Node<K, V>, usize),
    {
        let Some(root) = self.root() else {
            return;
        };

        let mut stack: Stack<(Handle, usize)> = smallvec![(root, 0)];
        while let Some((handle, depth)) = stack.pop() {
            let node = self.node(handle);
            visit(node, depth);
            if let Some(right) = node.right() {
                stack.push((right, depth + 1));
            }
            if let Some(left) = node.left() {
                stack.push((left, depth + 1));
            }
        }
    }

    /// Height and diameter of the whole tree in one post-order pass.
    pub(crate) fn shape(&self) -> Shape {
        let Some(root) = self.root() else {
            return Shape::ABSENT;
        };

        let mut pending: Stack<(Handle, bool)> = smallvec![(root, false)];
        let mut finished: Stack<Shape> = SmallVec::new();

        while let Some((handle, children_done)) = pending.pop() {
            let node = self.node(handle);
            if children_done {
                // The left subtree was pushed last, so its result sits on top.
                let left = node.left().and_then(|_| finished.pop()).unwrap_or(Shape::ABSENT);
                let right = node.right().and_then(|_| finished.pop()).unwrap_or(Shape::ABSENT);
                finished.push(Shape::join(left, right));
            } else {
                pending.push((handle, true));
                if let Some(left) = node.left() {
                    pending.push((left, false));
                }
                if let Some(right) = node.right() {
                    pending.push((right, false));
                }
            }
        }

        finished.pop().unwrap_or(Shape::ABSENT)
    }

    pub(crate) fn height(&self) -> isize {
        let mut deepest: Option<usize> = None;
        self.for_each_with_depth(|_, depth| deepest = deepest.max(Some(depth)));
        deepest.map_or(-1, |depth| depth.cast_signed())
    }

    pub(crate) fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        self.for_each_with_depth(|node, _| leaves += usize::from(node.is_leaf()));
        leaves
    }

    pub(crate) fn internal_node_count(&self) -> usize {
        let mut internal = 0;
        self.for_each_with_depth(|node, _| internal += usize::from(!node.is_leaf()));
        internal
    }

    /// Number of nodes on each level, indexed by depth.
    pub(crate) fn level_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        self.for_each_with_depth(|_, depth| {
            if widths.len() <= depth {
                widths.resize(depth + 1, 0);
            }
            widths[depth] += 1;
        });
        widths
    }

    /// Absent-child positions reachable from the root; an empty tree is one.
    pub(crate) fn null_count(&self) -> usize {
        if self.root().is_none() {
            return 1;
        }
        let mut nulls = 0;
        self.for_each_with_depth(|node, _| nulls += node.absent_children());
        nulls
    }

    /// Sum of the depths of all nodes.
    pub(crate) fn sum_levels(&self) -> usize {
        let mut sum = 0;
        self.for_each_with_depth(|_, depth| sum += depth);
        sum
    }

    /// Sum of the depths of all absent-child positions. The lone absent root
    /// of an empty tree sits at depth 0.
    pub(crate) fn sum_null_levels(&self) -> usize {
        let mut sum = 0;
        self.for_each_with_depth(|node, depth| sum += node.absent_children() * (depth + 1));
        sum
    }

    /// Black nodes on any path from the root down to an absent position,
    /// not counting the root itself.
    pub(crate) fn black_height(&self) -> usize {
        let mut blacks = 0;
        let mut current = self.root().and_then(|root| self.node(root).left());
        while let Some(handle) = current {
            let node = self.node(handle);
            blacks += usize::from(node.color().is_black());
            current = node.left();
        }
        blacks
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::node::Side;
    use proptest::prelude::*;

    fn build(keys: &[i32]) -> RawRedBlackTreeMap<i32, ()> {
        let mut tree = RawRedBlackTreeMap::new();
        for &key in keys {
            let _ = tree.insert(None, key, ());
        }
        tree
    }

    /// Recursive reference versions, mirroring the textbook definitions.
    fn reference_height(tree: &RawRedBlackTreeMap<i32, ()>, handle: Option<Handle>) -> isize {
        handle.map_or(-1, |h| {
            let node = tree.node(h);
            1 + reference_height(tree, node.left()).max(reference_height(tree, node.right()))
        })
    }

    fn reference_diameter(tree: &RawRedBlackTreeMap<i32, ()>, handle: Option<Handle>) -> isize {
        handle.map_or(0, |h| {
            let node = tree.node(h);
            let through = reference_height(tree, node.left()) + reference_height(tree, node.right()) + 2;
            through
                .max(reference_diameter(tree, node.left()))
                .max(reference_diameter(tree, node.right()))
        })
    }

    #[test]
    fn empty_tree_metrics() {
        let tree = build(&[]);
        assert_eq!(tree.shape(), Shape::ABSENT);
        assert_eq!(tree.height(), -1);
        assert_eq!(tree.leaf_count(), 0);
        assert_eq!(tree.internal_node_count(), 0);
        assert!(tree.level_widths().is_empty());
        assert_eq!(tree.null_count(), 1);
        assert_eq!(tree.sum_levels(), 0);
        assert_eq!(tree.sum_null_levels(), 0);
        assert_eq!(tree.black_height(), 0);
    }

    #[test]
    fn single_node_metrics() {
        let tree = build(&[1]);
        assert_eq!(tree.shape(), Shape { height: 0, diameter: 0 });
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_node_count(), 0);
        assert_eq!(tree.level_widths(), [1]);
        assert_eq!(tree.null_count(), 2);
        assert_eq!(tree.sum_null_levels(), 2);
    }

    #[test]
    fn small_example_metrics() {
        //        5
        //      /   \
        //     2     8
        //    / \
        //   1   3
        let tree = build(&[5, 2, 8, 1, 3]);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.shape(), Shape { height: 2, diameter: 3 });
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.internal_node_count(), 2);
        assert_eq!(tree.level_widths(), [1, 2, 2]);
        assert_eq!(tree.null_count(), 6);
        assert_eq!(tree.sum_levels(), 6);
        // Two nulls under 8 at depth 2, four under 1 and 3 at depth 3.
        assert_eq!(tree.sum_null_levels(), 16);
        assert_eq!(tree.black_height(), 1);
    }

    #[test]
    fn diameter_need_not_pass_through_root() {
        // Skew the tree by hand so the longest path lives in the left subtree.
        let mut tree = build(&[8, 4, 12, 2, 6, 1, 3, 5, 7]);
        let root = tree.root().unwrap();
        if tree.node(root).left().is_some() {
            tree.rotate(root, Side::Right);
        }
        let root = tree.root();
        assert_eq!(tree.shape().diameter.cast_signed(), reference_diameter(&tree, root));
        assert_eq!(tree.shape().height, reference_height(&tree, root));
    }

    proptest! {
        #[test]
        fn single_pass_shape_matches_reference(keys in prop::collection::vec(0i32..2000, 0..400)) {
            let tree = build(&keys);
            let shape = tree.shape();
            prop_assert_eq!(shape.height, reference_height(&tree, tree.root()));
            prop_assert_eq!(shape.height, tree.height());
            prop_assert_eq!(shape.diameter.cast_signed(), reference_diameter(&tree, tree.root()));
        }

        #[test]
        fn counting_identities(keys in prop::collection::vec(0i32..2000, 1..400)) {
            let tree = build(&keys);
            let one_child = {
                let mut count = 0;
                tree.for_each_with_depth(|node, _| count += usize::from(node.absent_children() == 1));
                count
            };

            prop_assert_eq!(tree.leaf_count() + tree.internal_node_count(), tree.len());
            prop_assert_eq!(tree.null_count(), tree.leaf_count() * 2 + one_child);
            prop_assert_eq!(tree.null_count(), tree.len() + 1);
            prop_assert_eq!(tree.level_widths().iter().sum::<usize>(), tree.len());
            prop_assert_eq!(tree.level_widths().len().cast_signed() - 1, tree.height());
        }
    }
}

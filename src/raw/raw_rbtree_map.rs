use core::borrow::Borrow;
use core::cmp::Ordering;

use log::trace;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use crate::{Color, TreeError};

/// The core red-black tree backing `RedBlackTreeMap`.
pub(crate) struct RawRedBlackTreeMap<K, V> {
    /// Arena storing all tree nodes. Every slot is reachable from `root`.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

impl<K, V> RawRedBlackTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Releases every node at once.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Returns a mutable reference to a node by handle.
    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Absent children count as black.
    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.nodes.get(h).color().is_red())
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).set_color(color);
    }

    /// Returns the node with the smallest key in the subtree rooted at `handle`.
    pub(crate) fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left() {
            handle = left;
        }
        handle
    }

    /// Returns the node with the largest key in the subtree rooted at `handle`.
    pub(crate) fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right() {
            handle = right;
        }
        handle
    }

    /// Returns the node with the smallest key in the tree.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Returns the node with the largest key in the tree.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.rightmost(root))
    }

    /// Returns the in-order successor of `handle`, or `None` if it holds the largest key.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Right)
    }

    /// Returns the in-order predecessor of `handle`, or `None` if it holds the smallest key.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Left)
    }

    /// Steps one entry towards `side` in key order.
    ///
    /// With a subtree on that side the answer is its extreme node on the other side.
    /// Otherwise climb until we leave a subtree hanging on the opposite side of its
    /// parent; that parent is the neighbor, or there is none once the root is passed.
    fn neighbor(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.nodes.get(handle).child(side) {
            return Some(match side {
                Side::Right => self.leftmost(child),
                Side::Left => self.rightmost(child),
            });
        }

        let mut child = handle;
        let mut parent = self.nodes.get(handle).parent();
        while let Some(p) = parent {
            let node = self.nodes.get(p);
            if node.child(side) != Some(child) {
                break;
            }
            child = p;
            parent = node.parent();
        }
        parent
    }

    /// Promotes the child of `x` opposite to `direction` into `x`'s place.
    ///
    /// `rotate(x, Side::Left)` is the classic left rotation: `x`'s right child `y`
    /// takes `x`'s position, `x` becomes `y`'s left child, and `y`'s former left
    /// subtree moves under `x`. In-order key sequence is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `x` has no child on the promoted side.
    pub(crate) fn rotate(&mut self, x: Handle, direction: Side) {
        let lifted = direction.opposite();
        let y = self
            .nodes
            .get(x)
            .child(lifted)
            .expect("`RawRedBlackTreeMap::rotate()` - no child to promote!");
        trace!("rotate {direction:?} at {x:?}, promoting {y:?}");

        // The inner subtree of `y` changes hands to `x`.
        let inner = self.nodes.get(y).child(direction);
        self.nodes.get_mut(x).set_child(lifted, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(x));
        }

        // `y` takes `x`'s slot under the old parent (or as root).
        let parent = self.nodes.get(x).parent();
        self.nodes.get_mut(y).set_parent(parent);
        self.replace_child(parent, x, Some(y));

        let (x_node, y_node) = self.nodes.get_pair_mut(x, y);
        y_node.set_child(direction, Some(x));
        x_node.set_parent(Some(y));
    }

    /// Points whichever link referenced `old` (a child slot of `parent`, or the
    /// root when `parent` is `None`) at `new` instead.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = self.nodes.get_mut(p);
                let side = node
                    .side_of(old)
                    .expect("`RawRedBlackTreeMap::replace_child()` - parent link is inconsistent!");
                node.set_child(side, new);
            }
        }
    }

    /// Restores the red-black properties after `z` was attached as a red leaf.
    fn insert_fixup(&mut self, mut z: Handle) {
        while let Some(parent) = self.nodes.get(z).parent().filter(|&p| self.is_red(Some(p))) {
            // A red node is never the root, so its parent exists.
            let Some(grandparent) = self.nodes.get(parent).parent() else {
                break;
            };
            let Some(side) = self.nodes.get(grandparent).side_of(parent) else {
                break;
            };
            let uncle = self.nodes.get(grandparent).child(side.opposite());

            if self.is_red(uncle) {
                // Red uncle: push the violation two levels up.
                trace!("fixup at {z:?}: red uncle, recoloring around {grandparent:?}");
                self.set_color(parent, Color::Black);
                if let Some(uncle) = uncle {
                    self.set_color(uncle, Color::Black);
                }
                self.set_color(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.nodes.get(parent).child(side.opposite()) == Some(z) {
                // Inner grandchild: turn it into an outer one.
                trace!("fixup at {z:?}: inner child, rotating {parent:?}");
                self.rotate(parent, side);
                z = parent;
                parent = self.nodes.get(z).parent().unwrap_or(grandparent);
            }

            // Outer grandchild: one rotation at the grandparent resolves it.
            trace!("fixup at {z:?}: outer child, rotating {grandparent:?}");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }
}

impl<K: Ord, V> RawRedBlackTreeMap<K, V> {
    /// Searches for a key and returns the node holding it.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns true if `key` lies strictly inside the key interval that the
    /// ancestors of `handle` impose on its subtree.
    fn subtree_admits(&self, handle: Handle, key: &K) -> bool {
        let mut child = handle;
        while let Some(parent) = self.nodes.get(child).parent() {
            let node = self.nodes.get(parent);
            let admitted = match node.side_of(child) {
                Some(Side::Left) => key < node.key(),
                Some(Side::Right) => key > node.key(),
                None => false,
            };
            if !admitted {
                return false;
            }
            child = parent;
        }
        true
    }

    /// Inserts a key-value pair, descending from `hint` when it can hold `key`
    /// and from the root otherwise.
    ///
    /// Returns the handle of the new node, or hands the key back if it is already
    /// present, in which case nothing is modified.
    pub(crate) fn insert(&mut self, hint: Option<Handle>, key: K, value: V) -> Result<Handle, TreeError<K>> {
        let start = match hint {
            Some(handle) if self.subtree_admits(handle, &key) => Some(handle),
            _ => self.root,
        };

        // Find the absent slot the key belongs in.
        let mut slot: Option<(Handle, Side)> = None;
        let mut current = start;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let side = match key.cmp(node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Err(TreeError::DuplicateKey(key)),
            };
            slot = Some((handle, side));
            current = node.child(side);
        }

        let handle = self.nodes.alloc(Node::new(key, value, slot.map(|(parent, _)| parent)));
        match slot {
            None => self.root = Some(handle),
            Some((parent, side)) => self.nodes.get_mut(parent).set_child(side, Some(handle)),
        }
        self.len += 1;
        debug_assert_eq!(self.len, self.nodes.len(), "every arena slot is a live entry");

        self.insert_fixup(handle);
        Ok(handle)
    }
}

impl<K: Clone, V: Clone> Clone for RawRedBlackTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Ord + core::fmt::Debug, V> RawRedBlackTreeMap<K, V> {
        /// Validates all red-black invariants. Panics listing every violation found.
        /// This is intended for use in tests to catch tree corruption.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "Empty tree should have len 0");
                return;
            };

            let mut errors: Vec<String> = Vec::new();

            if self.nodes.get(root).parent().is_some() {
                errors.push(alloc::format!("Root {root:?} has a parent"));
            }
            if self.nodes.get(root).color() != Color::Black {
                errors.push(alloc::format!("Root {root:?} is not black"));
            }

            let mut count = 0;
            self.validate_node(root, None, None, &mut count, &mut errors);

            if self.len != count {
                errors.push(alloc::format!("len mismatch: self.len={}, reachable={}", self.len, count));
            }
            if self.nodes.len() != count {
                errors.push(alloc::format!("arena holds {} nodes but {} are reachable", self.nodes.len(), count));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the black-height of the subtree (absent positions count as one).
        fn validate_node(
            &self,
            handle: Handle,
            lower: Option<&K>,
            upper: Option<&K>,
            count: &mut usize,
            errors: &mut Vec<String>,
        ) -> usize {
            *count += 1;
            let node = self.nodes.get(handle);

            if lower.is_some_and(|lower| node.key() <= lower) || upper.is_some_and(|upper| node.key() >= upper) {
                errors.push(alloc::format!("Key {:?} at {handle:?} breaks search order", node.key()));
            }

            let mut heights = [1usize; 2];
            for (i, side) in [Side::Left, Side::Right].into_iter().enumerate() {
                let Some(child) = node.child(side) else {
                    continue;
                };
                let child_node = self.nodes.get(child);
                if child_node.parent() != Some(handle) {
                    errors.push(alloc::format!("Child {child:?} of {handle:?} has parent {:?}", child_node.parent()));
                }
                if node.color().is_red() && child_node.color().is_red() {
                    errors.push(alloc::format!("Red node {handle:?} has red child {child:?}"));
                }
                let (lower, upper) = match side {
                    Side::Left => (lower, Some(node.key())),
                    Side::Right => (Some(node.key()), upper),
                };
                heights[i] = self.validate_node(child, lower, upper, count, errors);
            }

            if heights[0] != heights[1] {
                errors.push(alloc::format!(
                    "Black-height mismatch at {handle:?}: left={}, right={}",
                    heights[0],
                    heights[1]
                ));
            }
            heights[0] + usize::from(node.color().is_black())
        }

        fn keys_in_order(&self) -> Vec<&K> {
            let mut keys = Vec::with_capacity(self.len);
            let mut current = self.first();
            while let Some(handle) = current {
                keys.push(self.nodes.get(handle).key());
                current = self.successor(handle);
            }
            keys
        }
    }

    fn build(keys: &[i32]) -> RawRedBlackTreeMap<i32, i32> {
        let mut tree = RawRedBlackTreeMap::new();
        for &key in keys {
            let _ = tree.insert(None, key, key * 10);
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: RawRedBlackTreeMap<i32, i32> = RawRedBlackTreeMap::new();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.search(&1), None);
    }

    #[test]
    fn small_example_shape() {
        let tree = build(&[5, 2, 8, 1, 3]);
        tree.validate_invariants();

        let root = tree.node(tree.root().unwrap());
        assert_eq!(*root.key(), 5);
        assert_eq!(root.color(), Color::Black);
        assert_eq!(*tree.node(root.left().unwrap()).key(), 2);
        assert_eq!(*tree.node(root.right().unwrap()).key(), 8);
        assert_eq!(tree.keys_in_order(), [&1, &2, &3, &5, &8]);
    }

    #[test]
    fn ascending_insertions_rotate_left() {
        let tree = build(&[1, 2, 3]);
        tree.validate_invariants();

        let root = tree.node(tree.root().unwrap());
        assert_eq!(*root.key(), 2);
        assert_eq!(tree.node(root.left().unwrap()).color(), Color::Red);
        assert_eq!(tree.node(root.right().unwrap()).color(), Color::Red);
    }

    #[test]
    fn inner_child_takes_double_rotation() {
        let tree = build(&[3, 1, 2]);
        tree.validate_invariants();
        assert_eq!(*tree.node(tree.root().unwrap()).key(), 2);
    }

    #[test]
    fn duplicate_leaves_tree_untouched() {
        let mut tree = build(&[5, 2, 8]);
        let before: Vec<i32> = tree.keys_in_order().into_iter().copied().collect();

        assert_eq!(tree.insert(None, 2, 0), Err(TreeError::DuplicateKey(2)));
        assert_eq!(tree.len(), 3);
        assert_eq!(*tree.node(tree.search(&2).unwrap()).value(), 20);
        assert_eq!(tree.keys_in_order(), before.iter().collect::<Vec<_>>());
        tree.validate_invariants();
    }

    #[test]
    fn hint_outside_subtree_falls_back_to_root() {
        let mut tree = build(&[50, 20, 80, 10, 30]);
        let hint = tree.search(&10);

        // 60 can't live under 10; the descent must restart at the root.
        let handle = tree.insert(hint, 60, 600).unwrap();
        tree.validate_invariants();
        assert_eq!(tree.search(&60), Some(handle));

        // A duplicate elsewhere in the tree is still caught through a bad hint.
        assert_eq!(tree.insert(hint, 80, 0), Err(TreeError::DuplicateKey(80)));
    }

    #[test]
    fn hint_inside_subtree_is_used() {
        let mut tree = build(&[50, 20, 80, 10, 30]);
        let hint = tree.search(&20);

        let handle = tree.insert(hint, 25, 250).unwrap();
        tree.validate_invariants();
        assert_eq!(tree.search(&25), Some(handle));
        assert_eq!(tree.insert(hint, 30, 0), Err(TreeError::DuplicateKey(30)));
    }

    #[test]
    fn rotation_preserves_order_and_links() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let root = tree.root().unwrap();

        tree.rotate(root, Side::Left);
        assert_eq!(*tree.node(tree.root().unwrap()).key(), 6);
        assert_eq!(tree.node(root).parent(), tree.root());
        assert_eq!(tree.keys_in_order(), [&1, &2, &3, &4, &5, &6, &7]);

        tree.rotate(tree.root().unwrap(), Side::Right);
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.node(root).parent(), None);
        assert_eq!(tree.keys_in_order(), [&1, &2, &3, &4, &5, &6, &7]);
    }

    #[test]
    #[should_panic(expected = "`RawRedBlackTreeMap::rotate()` - no child to promote!")]
    fn rotation_without_child_panics() {
        let mut tree = build(&[1]);
        let root = tree.root().unwrap();
        tree.rotate(root, Side::Right);
    }

    #[test]
    fn neighbors_walk_both_directions() {
        let tree = build(&[40, 20, 60, 10, 30, 50, 70]);
        let mut backwards = Vec::new();
        let mut current = tree.last();
        while let Some(handle) = current {
            backwards.push(*tree.node(handle).key());
            current = tree.predecessor(handle);
        }
        assert_eq!(backwards, [70, 60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn clear_releases_everything() {
        let mut tree = build(&[1, 2, 3, 4]);
        tree.clear();
        tree.validate_invariants();
        assert_eq!(tree.root(), None);
        assert_eq!(tree.len(), 0);
    }

    proptest! {
        #[test]
        fn invariants_hold_after_every_insert(keys in prop::collection::vec(-500i32..500, 0..300)) {
            let mut tree = RawRedBlackTreeMap::new();
            let mut model = alloc::collections::BTreeSet::new();

            for key in keys {
                let result = tree.insert(None, key, ());
                prop_assert_eq!(result.is_ok(), model.insert(key));
                tree.validate_invariants();
            }

            let expected: Vec<&i32> = model.iter().collect();
            prop_assert_eq!(tree.keys_in_order(), expected);
        }

        #[test]
        fn hinted_inserts_keep_invariants(keys in prop::collection::vec(0u16..1000, 1..200), picks in prop::collection::vec(any::<usize>(), 1..200)) {
            let mut tree = RawRedBlackTreeMap::new();
            let mut handles: Vec<Handle> = Vec::new();

            for (key, pick) in keys.into_iter().zip(picks.into_iter().cycle()) {
                let hint = if handles.is_empty() { None } else { Some(handles[pick % handles.len()]) };
                if let Ok(handle) = tree.insert(hint, key, ()) {
                    handles.push(handle);
                }
                tree.validate_invariants();
            }
            prop_assert_eq!(tree.len(), handles.len());
        }
    }
}

use crate::Color;

use super::handle::Handle;

/// Which child slot of a node is meant.
///
/// Fixup and rotation are written once in terms of a `Side` and its
/// [`opposite`](Side::opposite) instead of twice with left and right swapped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A single entry of the tree together with its links.
///
/// `left` and `right` are owning in the logical sense (the subtree hangs off
/// this node). `parent` is a back-reference used only for rotations and
/// successor walks; it is `None` exactly for the root.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// Creates a detached red node, the state every node is born in.
    pub(crate) fn new(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns true if neither child is present.
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of absent child slots (0, 1 or 2).
    #[inline]
    pub(crate) fn absent_children(&self) -> usize {
        usize::from(self.left.is_none()) + usize::from(self.right.is_none())
    }

    /// Returns the side on which `child` hangs, if it is a child of this node.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// The color tag carried by every node of a [`RedBlackTreeMap`](crate::RedBlackTreeMap).
///
/// Absent children are treated as [`Color::Black`] for balancing purposes.
///
/// # Examples
///
/// ```
/// use rb_tree::{Color, RedBlackTreeMap};
///
/// let mut map = RedBlackTreeMap::new();
/// map.insert(1, "one").unwrap();
///
/// // The root is recolored black once fixup finishes.
/// assert_eq!(map.root().map(|node| node.color()), Some(Color::Black));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Color::Red)
    }

    #[inline]
    #[must_use]
    pub const fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }
}

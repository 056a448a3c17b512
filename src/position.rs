use crate::raw::Handle;

/// A location in a [`RedBlackTreeMap`](crate::RedBlackTreeMap): either an
/// entry or the end-of-sequence marker.
///
/// Positions are only produced by the map itself ([`begin`], [`end`],
/// [`find`], [`insert`], [`advance`]). Since entries are never removed, a
/// position keeps naming the same entry across later insertions; using a
/// position obtained from a different map is a logic error and may panic or
/// resolve to an unrelated entry.
///
/// [`begin`]: crate::RedBlackTreeMap::begin
/// [`end`]: crate::RedBlackTreeMap::end
/// [`find`]: crate::RedBlackTreeMap::find
/// [`insert`]: crate::RedBlackTreeMap::insert
/// [`advance`]: crate::RedBlackTreeMap::advance
///
/// # Examples
///
/// ```
/// use rb_tree::RedBlackTreeMap;
///
/// let map = RedBlackTreeMap::from([(2, 'b'), (1, 'a')]);
///
/// let first = map.begin();
/// assert_eq!(map.key_at(first), Some(&1));
/// assert!(map.find(&9).is_end());
/// assert_eq!(map.find(&9), map.end());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(Option<Handle>);

impl Position {
    pub(crate) const END: Self = Self(None);

    #[inline]
    pub(crate) const fn at(handle: Handle) -> Self {
        Self(Some(handle))
    }

    #[inline]
    pub(crate) const fn from_handle(handle: Option<Handle>) -> Self {
        Self(handle)
    }

    #[inline]
    pub(crate) const fn handle(self) -> Option<Handle> {
        self.0
    }

    /// Returns true if this is the end-of-sequence marker.
    #[inline]
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }
}

use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use log::warn;

use crate::raw::{Handle, Node, RawRedBlackTreeMap};
use crate::{Color, Position, TreeError};

mod drawing;
mod metrics;

/// An ordered map based on a [red-black tree].
///
/// Keys must implement [`Ord`]; entries are kept in ascending key order and
/// every search, insertion and single iteration step takes O(log n) time
/// regardless of the order keys arrive in.
///
/// Entries are only ever added: there is no removal of individual keys, and
/// [`insert`](Self::insert) refuses to overwrite an existing key, reporting
/// [`TreeError::DuplicateKey`] instead. Besides the usual map operations the
/// tree exposes a cursor API ([`begin`](Self::begin),
/// [`end`](Self::end), [`advance`](Self::advance)) and a family of read-only
/// shape metrics such as [`height`](Self::height) and
/// [`diameter`](Self::diameter).
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key changes while it is in the map. The
/// behavior resulting from such a logic error is not specified, but will be
/// encapsulated to the map that observed it and not result in undefined
/// behavior.
///
/// # Examples
///
/// ```
/// use rb_tree::RedBlackTreeMap;
///
/// let mut capitals = RedBlackTreeMap::new();
/// capitals.insert("Norway", "Oslo").unwrap();
/// capitals.insert("Chile", "Santiago").unwrap();
/// capitals.insert("Kenya", "Nairobi").unwrap();
///
/// // Keys can't be overwritten.
/// assert!(capitals.insert("Chile", "Valparaiso").is_err());
/// assert_eq!(capitals.get(&"Chile"), Some(&"Santiago"));
///
/// // Iteration is in key order.
/// let countries: Vec<_> = capitals.keys().copied().collect();
/// assert_eq!(countries, ["Chile", "Kenya", "Norway"]);
///
/// assert_eq!(capitals.height(), 1);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RedBlackTreeMap<K, V> {
    raw: RawRedBlackTreeMap<K, V>,
}

/// A read-only view of one node, used to inspect the tree's structure.
///
/// Obtained from [`RedBlackTreeMap::root`]; children and parent are reached
/// through the view itself.
///
/// # Examples
///
/// ```
/// use rb_tree::{Color, RedBlackTreeMap};
///
/// let map = RedBlackTreeMap::from([(2, "two"), (1, "one"), (3, "three")]);
/// let root = map.root().unwrap();
///
/// assert_eq!(*root.key(), 2);
/// assert_eq!(root.color(), Color::Black);
/// assert_eq!(root.left().map(|node| *node.value()), Some("one"));
/// assert_eq!(root.right().and_then(|node| node.parent()).map(|node| *node.key()), Some(2));
/// ```
pub struct NodeRef<'a, K, V> {
    raw: &'a RawRedBlackTreeMap<K, V>,
    handle: Handle,
}

/// An iterator over the entries of a `RedBlackTreeMap`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`RedBlackTreeMap`].
///
/// [`iter`]: RedBlackTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    raw: &'a RawRedBlackTreeMap<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An iterator over the keys of a `RedBlackTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RedBlackTreeMap`].
///
/// [`keys`]: RedBlackTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RedBlackTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RedBlackTreeMap`].
///
/// [`values`]: RedBlackTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> RedBlackTreeMap<K, V> {
    /// Makes a new, empty `RedBlackTreeMap`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawRedBlackTreeMap::new(),
        }
    }

    /// Makes a new, empty `RedBlackTreeMap` with room for at least `capacity`
    /// entries before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawRedBlackTreeMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let mut a = RedBlackTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a").unwrap();
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, releasing every node at once.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a view of the root node, or `None` if the map is empty.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.raw.root().map(|handle| self.node_ref(handle))
    }

    fn node_ref(&self, handle: Handle) -> NodeRef<'_, K, V> {
        NodeRef { raw: &self.raw, handle }
    }

    fn node_at(&self, position: Position) -> Option<&Node<K, V>> {
        position.handle().map(|handle| self.raw.node(handle))
    }

    /// Returns the position of the smallest key, or [`end`](Self::end) if the
    /// map is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        Position::from_handle(self.raw.first())
    }

    /// Returns the end-of-sequence marker.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// Returns the position following `position` in ascending key order.
    ///
    /// Advancing from the last entry yields [`end`](Self::end); advancing from
    /// `end` wraps around to the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTraversal`] when advancing from `end` on an
    /// empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::{RedBlackTreeMap, TreeError};
    ///
    /// let map = RedBlackTreeMap::from([(1, 'a'), (2, 'b')]);
    /// let second = map.advance(map.begin()).unwrap();
    /// assert_eq!(map.key_at(second), Some(&2));
    /// assert_eq!(map.advance(second), Ok(map.end()));
    /// assert_eq!(map.advance(map.end()), Ok(map.begin()));
    ///
    /// let empty: RedBlackTreeMap<i32, char> = RedBlackTreeMap::new();
    /// assert_eq!(empty.advance(empty.end()), Err(TreeError::EmptyTraversal));
    /// ```
    pub fn advance(&self, position: Position) -> Result<Position, TreeError<K>> {
        match position.handle() {
            Some(handle) => Ok(Position::from_handle(self.raw.successor(handle))),
            None => self.raw.first().map(Position::at).ok_or(TreeError::EmptyTraversal),
        }
    }

    /// Returns the key stored at `position`, or `None` for the end marker.
    #[must_use]
    pub fn key_at(&self, position: Position) -> Option<&K> {
        self.node_at(position).map(Node::key)
    }

    /// Returns the value stored at `position`, or `None` for the end marker.
    #[must_use]
    pub fn value_at(&self, position: Position) -> Option<&V> {
        self.node_at(position).map(Node::value)
    }

    /// Returns the entry stored at `position`, or `None` for the end marker.
    #[must_use]
    pub fn entry_at(&self, position: Position) -> Option<(&K, &V)> {
        self.node_at(position).map(|node| (node.key(), node.value()))
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at(self.begin())
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at(Position::from_handle(self.raw.last()))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let map = RedBlackTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Ord, V> RedBlackTreeMap<K, V> {
    /// Inserts a key-value pair into the map and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] carrying the key if it is already
    /// present. The map is left exactly as it was and the existing value is
    /// kept.
    ///
    /// # Panics
    ///
    /// Panics if the map already holds the maximum number of entries its node
    /// handles can address.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::{RedBlackTreeMap, TreeError};
    ///
    /// let mut map = RedBlackTreeMap::new();
    /// let at = map.insert(37, "a").unwrap();
    /// assert_eq!(map.entry_at(at), Some((&37, &"a")));
    ///
    /// assert_eq!(map.insert(37, "b"), Err(TreeError::DuplicateKey(37)));
    /// assert_eq!(map[&37], "a");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Position, TreeError<K>> {
        self.insert_at(Position::END, key, value)
    }

    /// Inserts a key-value pair, starting the search for its slot at `hint`.
    ///
    /// When `hint` is [`end`](Self::end), or names an entry whose subtree can't
    /// hold `key`, the search starts at the root instead. A good hint only saves
    /// comparisons; the result is the same as [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if the key is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let mut map = RedBlackTreeMap::new();
    /// let mut hint = map.end();
    /// for key in [10, 20, 30, 40] {
    ///     hint = map.insert_at(hint, key, ()).unwrap();
    /// }
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [10, 20, 30, 40]);
    /// ```
    pub fn insert_at(&mut self, hint: Position, key: K, value: V) -> Result<Position, TreeError<K>> {
        self.raw.insert(hint.handle(), key, value).map(Position::at)
    }

    /// Inserts every pair from `elements`, skipping keys that are already
    /// present. Each skipped key is reported with a `warn!` log record.
    ///
    /// Returns the number of pairs actually inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let mut map = RedBlackTreeMap::new();
    /// let inserted = map.insert_elements([(1, "a"), (2, "b"), (1, "c")]);
    /// assert_eq!(inserted, 2);
    /// assert_eq!(map[&1], "a");
    /// ```
    pub fn insert_elements<I>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
    {
        let mut inserted = 0;
        for (key, value) in elements {
            match self.insert(key, value) {
                Ok(_) => inserted += 1,
                Err(err) => warn!("{err}"),
            }
        }
        inserted
    }

    /// Returns the position of `key`, or [`end`](Self::end) if it is absent.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let map = RedBlackTreeMap::from([(5, 'x'), (2, 'y')]);
    /// assert_eq!(map.value_at(map.find(&2)), Some(&'y'));
    /// assert_eq!(map.find(&99), map.end());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Position::from_handle(self.raw.search(key))
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.value_at(self.find(key))
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entry_at(self.find(key))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Values don't take part in ordering, so they may be changed in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let mut map = RedBlackTreeMap::from([(1, 10)]);
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 5;
    /// }
    /// assert_eq!(map[&1], 15);
    /// ```
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        Some(self.raw.node_mut(handle).value_mut())
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }
}

impl<'a, K, V> NodeRef<'a, K, V> {
    fn node(&self) -> &'a Node<K, V> {
        self.raw.node(self.handle)
    }

    fn related(&self, handle: Option<Handle>) -> Option<Self> {
        handle.map(|handle| Self { raw: self.raw, handle })
    }

    #[must_use]
    pub fn key(&self) -> &'a K {
        self.node().key()
    }

    #[must_use]
    pub fn value(&self) -> &'a V {
        self.node().value()
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.node().color()
    }

    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.related(self.node().left())
    }

    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.related(self.node().right())
    }

    /// Returns the parent node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.related(self.node().parent())
    }

    /// Returns `true` if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Returns the cursor position of this node.
    #[must_use]
    pub fn position(&self) -> Position {
        Position::at(self.handle)
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("color", &self.color())
            .finish()
    }
}

impl<K: Clone, V: Clone> Clone for RedBlackTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RedBlackTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RedBlackTreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RedBlackTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a map, skipping (and logging) duplicate keys after the first.
impl<K: Ord + fmt::Display, V> FromIterator<(K, V)> for RedBlackTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.insert_elements(iter);
        map
    }
}

impl<K: Ord + fmt::Display, V> Extend<(K, V)> for RedBlackTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.insert_elements(iter);
    }
}

impl<K: Ord + fmt::Display, V, const N: usize> From<[(K, V); N]> for RedBlackTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        let mut map = Self::with_capacity(N);
        map.insert_elements(arr);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a RedBlackTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, Q, V> Index<&Q> for RedBlackTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        let node = self.raw.node(handle);
        self.front = self.raw.successor(handle);
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<(&'a K, &'a V)> {
        self.next_back()
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        let node = self.raw.node(handle);
        self.back = self.raw.predecessor(handle);
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

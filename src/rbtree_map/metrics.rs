use super::RedBlackTreeMap;

/// Shape metrics. None of these touch the tree; they only describe it.
impl<K, V> RedBlackTreeMap<K, V> {
    /// Returns the number of edges on the longest path from the root to a leaf.
    ///
    /// An empty map has height `-1` and a single entry has height `0`.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let mut map = RedBlackTreeMap::new();
    /// assert_eq!(map.height(), -1);
    ///
    /// map.insert(1, ()).unwrap();
    /// assert_eq!(map.height(), 0);
    ///
    /// // Sorted input doesn't degrade the tree into a list.
    /// map.insert_elements((2..=1000).map(|key| (key, ())));
    /// assert!(map.height() <= 2 * 10);
    /// ```
    #[must_use]
    pub fn height(&self) -> isize {
        self.raw.height()
    }

    /// Returns the number of entries with no children.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.raw.leaf_count()
    }

    /// Returns the number of entries with at least one child.
    ///
    /// Together with [`leaf_count`](Self::leaf_count) this accounts for every
    /// entry exactly once.
    #[must_use]
    pub fn internal_node_count(&self) -> usize {
        self.raw.internal_node_count()
    }

    /// Returns the number of edges on the longest path between any two leaves.
    ///
    /// The path does not have to pass through the root. Height and diameter
    /// are computed together bottom-up, so this is a single O(n) pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let map = RedBlackTreeMap::from([(5, ()), (2, ()), (8, ()), (1, ()), (3, ())]);
    /// // 1 -> 2 -> 5 -> 8
    /// assert_eq!(map.diameter(), 3);
    /// ```
    #[must_use]
    pub fn diameter(&self) -> usize {
        self.raw.shape().diameter
    }

    /// Returns the number of entries at depth `level` (the root is level 0).
    #[must_use]
    pub fn width(&self, level: usize) -> usize {
        self.raw.level_widths().get(level).copied().unwrap_or(0)
    }

    /// Returns the largest number of entries found on any single level.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let map = RedBlackTreeMap::from([(5, ()), (2, ()), (8, ()), (1, ()), (3, ())]);
    /// assert_eq!(map.width(0), 1);
    /// assert_eq!(map.max_width(), 2);
    /// ```
    #[must_use]
    pub fn max_width(&self) -> usize {
        self.raw.level_widths().into_iter().max().unwrap_or(0)
    }

    /// Returns the number of absent child positions reachable from the root.
    ///
    /// Each leaf contributes two, each entry with one child contributes one,
    /// and an empty map has exactly one (the missing root).
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.raw.null_count()
    }

    /// Returns the sum of the depths of all entries.
    #[must_use]
    pub fn sum_levels(&self) -> usize {
        self.raw.sum_levels()
    }

    /// Returns the sum of the depths of all absent child positions.
    #[must_use]
    pub fn sum_null_levels(&self) -> usize {
        self.raw.sum_null_levels()
    }

    /// Returns the average number of entries visited by a lookup of a key
    /// that is present, or `0.0` for an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_tree::RedBlackTreeMap;
    ///
    /// let map = RedBlackTreeMap::from([(2, ()), (1, ()), (3, ())]);
    /// // One probe for the root, two for either child.
    /// assert!((map.successful_search_cost() - 5.0 / 3.0).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn successful_search_cost(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        1.0 + self.sum_levels() as f64 / self.len() as f64
    }

    /// Returns the average depth of the absent position a lookup of a missing
    /// key ends at.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unsuccessful_search_cost(&self) -> f64 {
        self.sum_null_levels() as f64 / self.null_count() as f64
    }

    /// Returns the number of black entries on every path from the root down to
    /// an absent position, not counting the root itself.
    #[must_use]
    pub fn black_height(&self) -> usize {
        self.raw.black_height()
    }
}

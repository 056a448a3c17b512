use core::fmt;

/// Errors reported by [`RedBlackTreeMap`](crate::RedBlackTreeMap).
///
/// # Examples
///
/// ```
/// use rb_tree::{RedBlackTreeMap, TreeError};
///
/// let mut map = RedBlackTreeMap::new();
/// map.insert(5, "five").unwrap();
///
/// let err = map.insert(5, "again").unwrap_err();
/// assert_eq!(err, TreeError::DuplicateKey(5));
/// assert_eq!(err.to_string(), "Attempt to insert duplicate key '5'.");
/// ```
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TreeError<K> {
    /// The key is already present. The map was left untouched and the
    /// rejected key is handed back.
    DuplicateKey(K),
    /// An attempt was made to advance from the end position of an empty map,
    /// which has no first element to move to.
    EmptyTraversal,
}

impl<K> TreeError<K> {
    /// Returns the rejected key of a [`TreeError::DuplicateKey`].
    #[must_use]
    pub fn into_key(self) -> Option<K> {
        match self {
            TreeError::DuplicateKey(key) => Some(key),
            TreeError::EmptyTraversal => None,
        }
    }
}

impl<K: fmt::Display> fmt::Display for TreeError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::DuplicateKey(key) => write!(f, "Attempt to insert duplicate key '{key}'."),
            TreeError::EmptyTraversal => f.write_str("cannot advance past the end of an empty tree"),
        }
    }
}

impl<K: fmt::Debug + fmt::Display> core::error::Error for TreeError<K> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(TreeError::DuplicateKey("apple").to_string(), "Attempt to insert duplicate key 'apple'.");
        assert_eq!(
            TreeError::<i32>::EmptyTraversal.to_string(),
            "cannot advance past the end of an empty tree"
        );
    }

    #[test]
    fn into_key() {
        assert_eq!(TreeError::DuplicateKey(3).into_key(), Some(3));
        assert_eq!(TreeError::<i32>::EmptyTraversal.into_key(), None);
    }
}

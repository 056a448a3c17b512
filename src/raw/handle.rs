use core::num::NonZero;

// Test builds use a narrow handle so that arena exhaustion is reachable.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Stable index of a node in the arena.
///
/// The stored value is the slot index plus one, so `Option<Handle>` (every
/// parent and child link) is the same size as the handle itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Number of distinct slots a handle can address.
    pub(crate) const LIMIT: usize = RawHandle::MAX as usize;

    /// Returns the handle for slot `index`, or `None` if the slot lies past
    /// [`Handle::LIMIT`].
    #[inline]
    pub(crate) const fn try_from_index(index: usize) -> Option<Self> {
        if index >= Self::LIMIT {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((index + 1) as RawHandle) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    fn last_addressable_slot() {
        let last = Handle::try_from_index(Handle::LIMIT - 1).unwrap();
        assert_eq!(last.to_index(), Handle::LIMIT - 1);
        assert_eq!(Handle::try_from_index(Handle::LIMIT), None);
        assert_eq!(Handle::try_from_index(usize::MAX), None);
    }

    #[test]
    fn first_slot_is_not_the_niche() {
        let first = Handle::try_from_index(0);
        assert!(first.is_some());
        assert_ne!(first, None::<Handle>);
    }

    proptest! {
        #[test]
        fn slot_index_is_preserved(index in 0..Handle::LIMIT) {
            let handle = Handle::try_from_index(index);
            prop_assert_eq!(handle.map(Handle::to_index), Some(index));
        }

        #[test]
        fn distinct_slots_get_distinct_handles(a in 0..Handle::LIMIT, b in 0..Handle::LIMIT) {
            let (x, y) = (Handle::try_from_index(a).unwrap(), Handle::try_from_index(b).unwrap());
            prop_assert_eq!(x == y, a == b);
        }
    }
}

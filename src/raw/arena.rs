use alloc::vec::Vec;

use super::handle::Handle;

/// Append-only node storage.
///
/// Entries are never removed one at a time: the map has no deletion, so a
/// handle handed out by [`Arena::alloc`] stays valid until [`Arena::clear`]
/// (or drop) releases everything at once.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<T>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(Handle::LIMIT)),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        let Some(handle) = Handle::try_from_index(self.slots.len()) else {
            panic!("`Arena::alloc()` - arena is at maximum capacity ({})", Handle::LIMIT);
        };
        self.slots.push(element);
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots.get(handle.to_index()).expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots.get_mut(handle.to_index()).expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns mutable references to two distinct slots at once.
    pub(crate) fn get_pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (i, j) = (a.to_index(), b.to_index());
        assert!(i != j, "`Arena::get_pair_mut()` - handles alias the same slot!");
        if i < j {
            let (low, high) = self.slots.split_at_mut(j);
            (&mut low[i], &mut high[0])
        } else {
            let (low, high) = self.slots.split_at_mut(i);
            (&mut high[0], &mut low[j])
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}

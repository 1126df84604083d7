use alloc::vec::Vec;

use super::handle::Handle;
use crate::Error;

/// Slot storage addressed by [`Handle`]. Freed slots are recycled before the backing vector
/// grows, so a handle stays valid until its own slot is taken.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes room for `additional` more elements so the next `additional` calls to
    /// [`Arena::alloc`] cannot fail or reallocate.
    ///
    /// The free list is grown alongside the slots so that [`Arena::take`] never allocates.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let Some(needed) = additional.checked_sub(self.free.len()).filter(|&n| n > 0) else {
            return Ok(());
        };
        let total = self.slots.len().checked_add(needed).ok_or(Error::CapacityOverflow)?;
        if !Handle::fits(total) {
            log::debug!("arena refused {needed} slot(s): handle space exhausted at {}", Handle::SLOTS);
            return Err(Error::CapacityOverflow);
        }

        let old_capacity = self.slots.capacity();
        self.slots.try_reserve(needed).map_err(|_| Error::OutOfMemory)?;
        self.free.try_reserve(total.saturating_sub(self.free.len())).map_err(|_| Error::OutOfMemory)?;
        if self.slots.capacity() != old_capacity {
            log::trace!("arena grew from {old_capacity} to {} slots", self.slots.capacity());
        }
        Ok(())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            assert!(
                Handle::fits(self.slots.len() + 1),
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::SLOTS
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    /// Returns a mutable reference to every slot, indexed by [`Handle::to_index`].
    ///
    /// Each reference is disjoint, so callers can hand them out one at a time in any order.
    pub(crate) fn slots_mut(&mut self) -> Vec<Option<&mut T>> {
        self.slots.iter_mut().map(Option::as_mut).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

use core::num::NonZero;

// Narrow under test so the arena-exhaustion paths can be reached with a few thousand inserts.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node or value slot in an [`Arena`](super::arena::Arena).
///
/// Stored off-by-one in a `NonZero` so that `Option<Handle>` (the type of every parent and
/// child link) costs no more than the handle itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The largest slot index a handle can address.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// The number of slots a handle can address, and so the most entries a map can hold.
    pub(crate) const SLOTS: usize = Self::MAX + 1;

    /// Returns `true` if an arena of `slots` slots can be fully addressed.
    #[inline]
    pub(crate) const fn fits(slots: usize) -> bool {
        slots <= Self::SLOTS
    }

    /// Returns the handle for slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than [`Handle::MAX`]. The arena checks [`Handle::fits`]
    /// before growing, so a tree never reaches this.
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    /// Returns the slot index this handle addresses.
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
    use static_assertions::{assert_eq_size, const_assert_eq};

    // Tree links are `Option<Handle>`; they must not grow past the raw index.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);
    const_assert_eq!(Handle::SLOTS, u16::MAX as usize);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn index_past_max_panics() {
        let _ = Handle::from_index(Handle::SLOTS);
    }

    #[test]
    fn first_and_last_slot() {
        assert_eq!(Handle::from_index(0).to_index(), 0);
        assert_eq!(Handle::from_index(Handle::MAX).to_index(), Handle::MAX);
        assert_ne!(Handle::from_index(0), Handle::from_index(1));
    }

    #[test]
    fn fits_stops_at_slot_count() {
        assert!(Handle::fits(0));
        assert!(Handle::fits(Handle::SLOTS));
        assert!(!Handle::fits(Handle::SLOTS + 1));
    }

    proptest! {
        #[test]
        fn every_slot_index_survives_the_niche(index in 0..=Handle::MAX) {
            let link = Some(Handle::from_index(index));
            prop_assert_eq!(link.map(Handle::to_index), Some(index));
        }
    }
}

use super::RbTreeMap;
use crate::raw::RawRbTreeMap;
use crate::{Error, Natural};

impl<K, V> RbTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails or `capacity` exceeds the number of entries a node
    /// handle can address. See [`RbTreeMap::try_with_capacity`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let map: RbTreeMap<i32, i32> = RbTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(map) => map,
            Err(err) => panic!("`RbTreeMap::with_capacity()` - {err}"),
        }
    }

    /// Creates an empty map with room for at least `capacity` entries, reporting failure
    /// instead of panicking.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the allocation fails, [`Error::CapacityOverflow`] if
    /// `capacity` is more than a node handle can address.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::try_with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> RbTreeMap<K, V, C> {
    /// Creates an empty map ordered by `comparator` with room for at least `capacity` entries.
    ///
    /// # Errors
    ///
    /// Same as [`RbTreeMap::try_with_capacity`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::{Error, RbTreeMap};
    ///
    /// let map = RbTreeMap::<u8, u8, _>::try_with_capacity_and_comparator(8, |a: &u8, b: &u8| b.cmp(a))?;
    /// assert!(map.capacity() >= 8);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_with_capacity_and_comparator(capacity: usize, comparator: C) -> Result<Self, Error> {
        let mut raw = RawRbTreeMap::new();
        raw.try_reserve(capacity)?;
        Ok(RbTreeMap { raw, comparator })
    }

    /// Returns the number of entries the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more entries, so that the next `additional`
    /// insertions of new keys cannot fail.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the allocation fails, [`Error::CapacityOverflow`] if the map
    /// would need more entries than a node handle can address. The map is unchanged either
    /// way.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert("a", 1);
    /// map.try_reserve(10)?;
    /// assert!(map.capacity() >= 11);
    /// # Ok::<(), wlf_map::Error>(())
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.raw.try_reserve(additional)
    }
}

use core::fmt;

use super::RbTreeMap;
use crate::raw::{Handle, RawRbTreeMap};

/// A forward cursor over the entries of an `RbTreeMap`, in ascending key order.
///
/// Unlike [`Iter`](super::Iter), a cursor separates looking at the current entry from moving
/// past it: [`key`](Cursor::key) and [`value`](Cursor::value) can be read any number of times
/// before [`move_next`](Cursor::move_next). Once past the end, every accessor returns `None`
/// and moving further does nothing.
///
/// The cursor borrows the map, so the map cannot be modified while the cursor is alive.
///
/// This `struct` is created by the [`cursor`](RbTreeMap::cursor) method on [`RbTreeMap`].
///
/// # Examples
///
/// ```
/// use wlf_map::RbTreeMap;
///
/// let map = RbTreeMap::from([(2, "b"), (1, "a")]);
/// let mut cursor = map.cursor();
///
/// assert!(cursor.has_next());
/// assert_eq!(cursor.key(), Some(&1));
/// cursor.move_next();
/// assert_eq!(cursor.entry(), Some((&2, &"b")));
/// cursor.move_next();
/// assert!(!cursor.has_next());
/// assert_eq!(cursor.value(), None);
/// ```
pub struct Cursor<'a, K, V> {
    tree: &'a RawRbTreeMap<K, V>,
    current: Option<Handle>,
}

impl<K, V, C> RbTreeMap<K, V, C> {
    /// Returns a cursor positioned on the entry with the smallest key, or past the end if the
    /// map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor {
            tree: &self.raw,
            current: self.raw.first(),
        }
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Returns `true` if the cursor points at an entry.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current.is_some()
    }

    /// Advances to the next entry in key order. Does nothing once past the end.
    ///
    /// # Complexity
    ///
    /// Amortized O(1); O(log n) worst case.
    pub fn move_next(&mut self) {
        if let Some(handle) = self.current {
            self.current = self.tree.successor(handle);
        }
    }

    /// Returns the key of the current entry, or `None` past the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(key, _)| key)
    }

    /// Returns the value of the current entry, or `None` past the end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, value)| value)
    }

    /// Returns the current key and value, or `None` past the end.
    #[must_use]
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        self.current.map(|handle| tree.entry(handle))
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Cursor {
            tree: self.tree,
            current: self.current,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.entry()).finish()
    }
}

use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{ControlFlow, Index};

use alloc::vec::Vec;

use crate::raw::{Arena, Handle, Node, RawRbTreeMap};
use crate::{Comparator, InsertError, Natural};

mod capacity;
mod cursor;

pub use cursor::Cursor;

/// An ordered map based on a [red-black tree].
///
/// Entries are kept sorted by a [`Comparator`] chosen when the map is built. The default,
/// [`Natural`], uses the key's [`Ord`] implementation; any `Fn(&K, &K) -> Ordering` closure can
/// be supplied instead with [`RbTreeMap::with_comparator`]. Keys that compare equal are the
/// same key: inserting one again overwrites the stored value and keeps the stored key.
///
/// Every insert, lookup and removal takes O(log n) comparisons; the tree never grows taller
/// than 2·log<sub>2</sub>(n + 1). Iterators such as [`RbTreeMap::iter`] yield entries in
/// ascending key order.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to
/// any other key, as determined by the comparator, changes while it is in the map. The
/// behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `RbTreeMap` that observed it and not result in undefined behavior.
///
/// Entries are owned by the map. Overwriting returns the previous value to the caller, removal
/// returns the removed entry, and dropping or clearing the map drops every entry. To run
/// clean-up code per entry, use [`RbTreeMap::clear_with`] or [`RbTreeMap::dispose_with`].
///
/// # Examples
///
/// ```
/// use wlf_map::RbTreeMap;
///
/// let mut settings = RbTreeMap::new();
///
/// settings.insert("timeout", 30);
/// settings.insert("retries", 3);
/// settings.insert("backoff", 2);
///
/// // Overwriting keeps a single entry and hands back the old value.
/// assert_eq!(settings.insert("timeout", 60), Some(30));
/// assert_eq!(settings.len(), 3);
///
/// assert_eq!(settings.get("timeout"), Some(&60));
/// assert!(!settings.contains_key("verbose"));
///
/// let keys: Vec<_> = settings.keys().copied().collect();
/// assert_eq!(keys, ["backoff", "retries", "timeout"]);
///
/// assert_eq!(settings.remove("retries"), Some(3));
/// ```
///
/// With a custom comparator:
///
/// ```
/// use wlf_map::RbTreeMap;
///
/// let mut by_len = RbTreeMap::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// by_len.insert("three", 3);
/// by_len.insert("one", 1);
/// by_len.insert("eleven", 11);
///
/// // "two" has the same length as "one", so it replaces that entry's value.
/// assert_eq!(by_len.insert("two", 2), Some(1));
/// assert_eq!(by_len.get(&"six"), Some(&2));
///
/// let values: Vec<_> = by_len.values().copied().collect();
/// assert_eq!(values, [2, 3, 11]);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTreeMap<K, V, C = Natural> {
    raw: RawRbTreeMap<K, V>,
    comparator: C,
}

/// An iterator over the entries of an `RbTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RbTreeMap`]. See its
/// documentation for more.
///
/// [`iter`]: RbTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawRbTreeMap<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// A mutable iterator over the entries of an `RbTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`RbTreeMap`]. See its
/// documentation for more.
///
/// [`iter_mut`]: RbTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    // One slot per value handle; each reference is taken exactly once.
    values: Vec<Option<&'a mut V>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An owning iterator over the entries of an `RbTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RbTreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `RbTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RbTreeMap`].
///
/// [`keys`]: RbTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `RbTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RbTreeMap`].
///
/// [`values`]: RbTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of an `RbTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`RbTreeMap`].
///
/// [`values_mut`]: RbTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An owning iterator over the keys of an `RbTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`RbTreeMap`].
///
/// [`into_keys`]: RbTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of an `RbTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`RbTreeMap`].
///
/// [`into_values`]: RbTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

impl<K, V> RbTreeMap<K, V> {
    /// Makes a new, empty `RbTreeMap` ordered by the keys' [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> RbTreeMap<K, V> {
        RbTreeMap::with_comparator(Natural)
    }
}

impl<K, V, C> RbTreeMap<K, V, C> {
    /// Makes a new, empty `RbTreeMap` ordered by `comparator`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::{RbTreeMap, Reversed, Natural};
    ///
    /// let mut map = RbTreeMap::with_comparator(Reversed(Natural));
    /// map.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// assert_eq!(map.first_key_value(), Some((&3, &'c')));
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        RbTreeMap {
            raw: RawRbTreeMap::new(),
            comparator,
        }
    }

    /// Returns a reference to the map's comparator.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of elements in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: the number of nodes on the longest path from the root
    /// to a leaf, or 0 for an empty map.
    ///
    /// The red-black invariants keep this at or below 2·log<sub>2</sub>(len + 1).
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let map: RbTreeMap<u32, ()> = (1..=1000).map(|k| (k, ())).collect();
    /// assert!(map.height() <= 20);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Clears the map, dropping all elements. The comparator is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Clears the map, passing every key and value to `dispose` exactly once.
    ///
    /// Entries are visited in post-order: both subtrees of a node before the node itself.
    /// The map is empty afterwards and can be reused with the same comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut released = 0;
    /// map.clear_with(|_key, _value| released += 1);
    /// assert_eq!(released, 3);
    /// assert!(map.is_empty());
    /// ```
    pub fn clear_with<F>(&mut self, dispose: F)
    where
        F: FnMut(K, V),
    {
        self.raw.drain_post_order(dispose);
    }

    /// Destroys the map, passing every key and value to `dispose` exactly once, in the same
    /// post-order as [`RbTreeMap::clear_with`].
    ///
    /// Simply dropping the map drops every entry; use this when entries need explicit
    /// release.
    pub fn dispose_with<F>(mut self, dispose: F)
    where
        F: FnMut(K, V),
    {
        self.raw.drain_post_order(dispose);
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.raw.entry(handle))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.raw.entry(handle))
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let handle = self.raw.first()?;
        Some(self.raw.remove_node(handle))
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let handle = self.raw.last()?;
        Some(self.raw.remove_node(handle))
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map: RbTreeMap<i32, i32> = (0..8).map(|x| (x, x*10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n) worst case
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(f);
    }

    /// Calls `f` on each entry in ascending key order until it returns
    /// [`ControlFlow::Break`].
    ///
    /// Returns the `Break` value that stopped the walk, or `Continue(())` if every entry was
    /// visited. No further calls are made once `f` breaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::ControlFlow;
    /// use wlf_map::RbTreeMap;
    ///
    /// let map: RbTreeMap<u32, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    ///
    /// let mut visited = 0;
    /// let found = map.for_each_until(|&key, &value| {
    ///     visited += 1;
    ///     if key == 2 { ControlFlow::Break(value) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(found, ControlFlow::Break("b"));
    /// assert_eq!(visited, 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) for a full walk.
    pub fn for_each_until<B, F>(&self, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        self.iter().try_for_each(|(key, value)| f(key, value))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; amortized O(1) per step.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::from([
    ///    ("a", 1),
    ///    ("b", 2),
    ///    ("c", 3),
    /// ]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) to create the iterator; amortized O(1) per step.
    ///
    /// # Memory
    ///
    /// Creating the iterator allocates one pointer-sized slot per value slot the map has ever
    /// used (live entries plus slots freed by removals and not yet reused). The table is
    /// released when the iterator is dropped. [`RbTreeMap::for_each_until`] and
    /// [`RbTreeMap::cursor`] walk the map without allocating.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let (front, back, remaining) = (self.raw.first(), self.raw.last(), self.raw.len());
        let (nodes, values) = self.raw.split_values_mut();
        IterMut {
            nodes,
            values,
            front,
            back,
            remaining,
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

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::new();
    /// a.insert(1, String::from("hello"));
    /// a.insert(2, String::from("goodbye"));
    ///
    /// for value in a.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = a.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"), String::from("goodbye!")]);
    /// ```
    ///
    /// # Memory
    ///
    /// Allocates like [`RbTreeMap::iter_mut`].
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this.
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }
}

impl<K, V, C> RbTreeMap<K, V, C> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, as long as the comparator can
    /// order that form consistently with the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get(key, &self.comparator)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// Useful when equal keys are not identical, e.g. under a comparator that only looks at
    /// part of the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_key_value(key, &self.comparator)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_mut(key, &self.comparator)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key, &self.comparator).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated, and the old value is
    /// returned. The key is not updated, though; the tree structure is untouched, so
    /// iterators and cursors created before the overwrite would still see the same entries.
    ///
    /// # Panics
    ///
    /// Panics if memory for the new entry cannot be allocated or the map already holds as many
    /// entries as a node handle can address. Use [`RbTreeMap::try_insert`] to handle these
    /// cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        C: Comparator<K>,
    {
        match self.try_insert(key, value) {
            Ok(old) => old,
            Err(err) => panic!("`RbTreeMap::insert()` - {err}"),
        }
    }

    /// Inserts a key-value pair into the map, reporting allocation failure instead of
    /// panicking.
    ///
    /// On success this behaves like [`RbTreeMap::insert`]. On failure the map is unchanged
    /// and the key and value are returned inside the [`InsertError`].
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the allocator refuses to grow the
    /// map, [`Error::CapacityOverflow`](crate::Error::CapacityOverflow) if the map is full.
    /// Overwriting an existing key never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert_eq!(map.try_insert("a", 1)?, None);
    /// assert_eq!(map.try_insert("a", 2)?, Some(1));
    /// # Ok::<(), wlf_map::InsertError<&str, i32>>(())
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, InsertError<K, V>>
    where
        C: Comparator<K>,
    {
        self.raw.try_insert(key, value, &self.comparator)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove_entry(key, &self.comparator)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RbTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        RbTreeMap {
            raw: self.raw.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for RbTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

// Comparators are not compared: two maps are equal when they hold equal entries in the same
// order.
impl<K: PartialEq, V: PartialEq, C> PartialEq for RbTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RbTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RbTreeMap<K, V, C> {
    fn default() -> Self {
        RbTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RbTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RbTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RbTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Comparator<K>> Extend<(&'a K, &'a V)> for RbTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut RbTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for RbTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wlf_map::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for RbTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.front?;
        self.front = self.tree.successor(handle);
        self.remaining -= 1;
        Some(self.tree.entry(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.back?;
        self.back = self.tree.predecessor(handle);
        self.remaining -= 1;
        Some(self.tree.entry(handle))
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
        Iter {
            tree: self.tree,
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

impl<'a, K, V> IterMut<'a, K, V> {
    fn yield_entry(&mut self, handle: Handle) -> Option<(&'a K, &'a mut V)> {
        let node = self.nodes.get(handle);
        let value = self.values.get_mut(node.value().to_index())?.take()?;
        Some((node.key(), value))
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.front?;
        self.front = self.nodes.successor(handle);
        self.remaining -= 1;
        self.yield_entry(handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.back?;
        self.back = self.nodes.predecessor(handle);
        self.remaining -= 1;
        self.yield_entry(handle)
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish_non_exhaustive()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
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
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
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
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish_non_exhaustive()
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

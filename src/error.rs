use core::fmt;

/// The error type for fallible allocation in [`RbTreeMap`](crate::RbTreeMap).
///
/// Lookups and removals never fail: a missing key is reported as `None`, not as an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The allocator refused to provide memory for a new node or value slot.
    OutOfMemory,
    /// The map already holds the largest number of entries a node handle can address.
    CapacityOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfMemory => f.write_str("memory allocation failed"),
            Error::CapacityOverflow => f.write_str("capacity overflow: too many entries for the node handle width"),
        }
    }
}

impl core::error::Error for Error {}

/// The error returned by [`RbTreeMap::try_insert`](crate::RbTreeMap::try_insert).
///
/// The map is left exactly as it was before the call; the rejected key and value are handed
/// back so the caller keeps ownership of them.
///
/// # Examples
///
/// ```
/// use wlf_map::{Error, InsertError};
///
/// fn recover(err: InsertError<&str, u32>) -> (&str, u32) {
///     assert!(matches!(err.error(), Error::OutOfMemory | Error::CapacityOverflow));
///     err.into_inner()
/// }
/// ```
pub struct InsertError<K, V> {
    key: K,
    value: V,
    error: Error,
}

impl<K, V> InsertError<K, V> {
    pub(crate) const fn new(key: K, value: V, error: Error) -> Self {
        InsertError { key, value, error }
    }

    /// Returns the reason the insertion was refused.
    #[must_use]
    pub const fn error(&self) -> Error {
        self.error
    }

    /// Returns a reference to the key that was not inserted.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns a reference to the value that was not inserted.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the error, returning the key and value that were not inserted.
    #[must_use]
    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }
}

// Key and value are omitted so `InsertError` is `Debug` for any `K` and `V`.
impl<K, V> fmt::Debug for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError").field("error", &self.error).finish_non_exhaustive()
    }
}

impl<K, V> fmt::Display for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to insert entry: {}", self.error)
    }
}

impl<K, V> core::error::Error for InsertError<K, V> {}

impl<K, V> From<InsertError<K, V>> for Error {
    fn from(err: InsertError<K, V>) -> Self {
        err.error
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(Error::OutOfMemory.to_string(), "memory allocation failed");
        let err = InsertError::new("k", 1, Error::CapacityOverflow);
        assert_eq!(
            err.to_string(),
            "failed to insert entry: capacity overflow: too many entries for the node handle width"
        );
    }

    #[test]
    fn insert_error_hands_back_entry() {
        let err = InsertError::new(7, "seven", Error::OutOfMemory);
        assert_eq!(*err.key(), 7);
        assert_eq!(*err.value(), "seven");
        assert_eq!(format!("{err:?}"), "InsertError { error: OutOfMemory, .. }");
        assert_eq!(err.into_inner(), (7, "seven"));
    }

    #[test]
    fn insert_error_converts_to_error() {
        let err: Error = InsertError::new((), (), Error::OutOfMemory).into();
        assert_eq!(err, Error::OutOfMemory);
    }
}

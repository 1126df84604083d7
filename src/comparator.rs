use core::cmp::Ordering;

/// A total order over keys, used by [`RbTreeMap`](crate::RbTreeMap) to arrange its entries.
///
/// `compare(a, b)` must return [`Ordering::Less`], [`Ordering::Equal`] or
/// [`Ordering::Greater`] when `a` sorts before, equal to, or after `b`. The order must be
/// total and must not change while the keys are stored in a map; violating either is a logic
/// error whose effects (wrong lookups, unsorted iteration) stay confined to that map.
///
/// Any closure or function of type `Fn(&K, &K) -> Ordering` is a comparator.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use wlf_map::{Comparator, Natural, Reversed};
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"ab", &"c"), Ordering::Greater);
///
/// assert_eq!(Natural.compare(&1, &2), Ordering::Less);
/// assert_eq!(Reversed(Natural).compare(&1, &2), Ordering::Greater);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K, F> Comparator<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Orders keys by their [`Ord`] implementation. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: ?Sized + Ord> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the order of the wrapped comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn by_abs(a: &i32, b: &i32) -> Ordering {
        a.unsigned_abs().cmp(&b.unsigned_abs())
    }

    #[test]
    fn fn_items_are_comparators() {
        assert_eq!(by_abs.compare(&-3, &2), Ordering::Greater);
        assert_eq!(by_abs.compare(&-2, &2), Ordering::Equal);
    }

    #[test]
    fn natural_handles_unsized_keys() {
        assert_eq!(Natural.compare("apple", "banana"), Ordering::Less);
    }

    proptest! {
        #[test]
        fn reversed_flips_natural(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(Reversed(Natural).compare(&a, &b), b.cmp(&a));
            prop_assert_eq!(Reversed(Reversed(Natural)).compare(&a, &b), a.cmp(&b));
        }
    }
}

//! Orderings used to arrange the elements of an [`OrderedSet`](crate::OrderedSet).
//!
//! Every structural decision the set makes goes through [`Comparator::compare`]. A comparator
//! must be a total order that gives the same answer for the same pair every time it is asked.
//! The set cannot check this. A comparator that breaks the rule leaves the set's ordering
//! unspecified (elements may become unreachable or appear twice), but never causes undefined
//! behavior.

use core::cmp::Ordering;

/// A total order over `T`.
///
/// Any `Fn(&T, &T) -> Ordering` closure or function is a comparator:
///
/// ```
/// use rbset::OrderedSet;
///
/// let mut set = OrderedSet::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// set.insert("three");
/// set.insert("a");
/// set.insert("to");
///
/// // "of" is as long as "to", so it takes its place.
/// assert_eq!(set.insert("of"), Some("to"));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "of", "three"]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The element type's own [`Ord`] implementation.
///
/// This is the default comparator of [`OrderedSet`](crate::OrderedSet).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
///
/// ```
/// use rbset::OrderedSet;
/// use rbset::comparator::{Natural, Reverse};
///
/// let mut set = OrderedSet::with_comparator(Reverse(Natural));
/// set.extend([1, 3, 2]);
/// assert_eq!(set.first(), Some(&3));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// IEEE 754 `totalOrder` for floats, via `total_cmp`.
///
/// `-0.0` sorts before `+0.0`, and NaNs sort to the ends according to their sign bit, so every
/// value has a place.
///
/// ```
/// use rbset::OrderedSet;
/// use rbset::comparator::TotalOrder;
///
/// let mut set = OrderedSet::with_comparator(TotalOrder);
/// set.extend([2.5_f64, f64::NAN, -1.0, 0.0]);
/// assert_eq!(set.first(), Some(&-1.0));
/// assert!(set.last().is_some_and(|x| x.is_nan()));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct TotalOrder;

impl Comparator<f32> for TotalOrder {
    #[inline]
    fn compare(&self, a: &f32, b: &f32) -> Ordering {
        a.total_cmp(b)
    }
}

impl Comparator<f64> for TotalOrder {
    #[inline]
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use core::cmp::Ordering::{Equal, Greater, Less};

    #[test]
    fn natural_matches_ord() {
        assert_eq!(Natural.compare(&1, &2), Less);
        assert_eq!(Natural.compare("b", "a"), Greater);
        assert_eq!(Natural.compare(&'x', &'x'), Equal);
    }

    #[test]
    fn reverse_flips() {
        assert_eq!(Reverse(Natural).compare(&1, &2), Greater);
        assert_eq!(Reverse(Reverse(Natural)).compare(&1, &2), Less);
        assert_eq!(Reverse(Natural).compare(&7, &7), Equal);
    }

    #[test]
    fn closures_are_comparators() {
        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        assert_eq!(by_abs.compare(&-3, &2), Greater);
        assert_eq!(by_abs.compare(&-2, &2), Equal);
    }

    #[test]
    fn total_order_places_every_float() {
        assert_eq!(TotalOrder.compare(&-0.0_f64, &0.0), Less);
        assert_eq!(TotalOrder.compare(&f64::NAN, &f64::INFINITY), Greater);
        assert_eq!(TotalOrder.compare(&1.5_f32, &1.5), Equal);
    }
}

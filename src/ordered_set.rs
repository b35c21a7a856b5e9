use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use log::trace;

use crate::comparator::{Comparator, Natural};
use crate::raw::{RawIter, RawRbTree};

mod capacity;

/// An ordered set based on a red-black tree.
///
/// Elements are unique and kept in the order given by the comparator `C`, which defaults to the
/// element type's [`Ord`] implementation ([`Natural`]). Two elements are the same element
/// exactly when the comparator says they are [`Equal`](Ordering::Equal). [`PartialEq`] is never
/// consulted.
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the comparator, changes while it is in the set, or for the
/// comparator to not be a total order. This is normally only possible through [`Cell`],
/// [`RefCell`], global state, I/O, or unsafe code. The behavior resulting from such a logic error
/// is not specified, but will be encapsulated to the `OrderedSet` that observed the logic error
/// and not result in undefined behavior. This could include panics, incorrect results, lost or
/// duplicated elements.
///
/// Iterators returned by [`OrderedSet::iter`] and [`OrderedSet::into_iter`] produce their items in
/// order. Each call to `iter` starts a fresh traversal that does not modify the set.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use rbset::OrderedSet;
///
/// // Type inference lets us omit an explicit type signature (which
/// // would be `OrderedSet<&str>` in this example).
/// let mut books = OrderedSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains(&"The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove(&"The Odyssey");
///
/// // Iterate over everything.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A `OrderedSet` with a known list of items can be initialized from an array:
///
/// ```
/// use rbset::OrderedSet;
///
/// let set = OrderedSet::from([1, 2, 3]);
/// ```
pub struct OrderedSet<T, C = Natural> {
    raw: RawRbTree<T>,
    cmp: C,
}

/// An iterator over the items of a `OrderedSet`.
///
/// This `struct` is created by the [`iter`] method on [`OrderedSet`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbset::OrderedSet;
///
/// let set = OrderedSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// ```
///
/// [`iter`]: OrderedSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: RawIter<'a, T>,
}

/// An owning iterator over the items of a `OrderedSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedSet`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbset::OrderedSet;
///
/// let set = OrderedSet::from([1, 2, 3]);
/// let mut iter = set.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// ```
///
/// [`into_iter`]: OrderedSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> OrderedSet<T> {
    /// Makes a new, empty `OrderedSet` ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    ///
    /// // entries can now be inserted into the empty set
    /// set.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> OrderedSet<T> {
        OrderedSet::with_comparator(Natural)
    }
}

impl<T, C> OrderedSet<T, C> {
    /// Makes a new, empty `OrderedSet` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// set.extend([1, 2, 3]);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn with_comparator(cmp: C) -> OrderedSet<T, C> {
        OrderedSet {
            raw: RawRbTree::new(),
            cmp,
        }
    }

    /// Returns a reference to the set's comparator.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut v = OrderedSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1), plus dropping the elements.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first element in the set, if any.
    /// This is the minimum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&2));
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns the last element in the set, if any.
    /// This is the maximum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert_eq!(set.last(), None);
    /// set.insert(1);
    /// assert_eq!(set.last(), Some(&1));
    /// set.insert(2);
    /// assert_eq!(set.last(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Removes and returns the first element in the set.
    /// The first element is the minimum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// while let Some(n) = set.pop_first() {
    ///     assert!(set.iter().all(|&k| k > n));
    /// }
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.pop_first()
    }

    /// Removes and returns the last element in the set.
    /// The last element is the maximum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// while let Some(n) = set.pop_last() {
    ///     assert!(set.iter().all(|&k| k < n));
    /// }
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.pop_last()
    }

    /// Gets an iterator that visits the elements in the `OrderedSet` in ascending
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let set = OrderedSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), Some(&3));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized and the iterator holds at
    /// most two root-to-leaf paths.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut a = OrderedSet::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1);
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut a = OrderedSet::new();
    /// assert!(a.is_empty());
    /// a.insert(1);
    /// assert!(!a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl<T, C: Comparator<T>> OrderedSet<T, C> {
    /// Returns `true` if the set contains an element equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains(&self, value: &T) -> bool {
        self.raw.contains(value, &self.cmp)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3]);
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get(&self, value: &T) -> Option<&T> {
        self.raw.get(value, &self.cmp)
    }

    /// Adds a value to the set, replacing the existing element, if any, that is
    /// equal to the value. Returns the replaced element.
    ///
    /// A replacement leaves the set's length unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    ///
    /// assert_eq!(set.insert(2), None);
    /// assert_eq!(set.insert(2), Some(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> Option<T> {
        self.raw.insert(value, &self.cmp)
    }

    /// If the set contains an element equal to the value, removes it from the
    /// set and drops it. Returns whether such an element was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(2);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.raw.remove(value, &self.cmp)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` for which `f(&e)` returns `false`.
    /// The elements are visited in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = (0..8).collect();
    /// // Keep only the elements with even-numbered values.
    /// set.retain(|&k| k % 2 == 0);
    /// assert!(set.into_iter().eq(vec![0, 2, 4, 6]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n): the kept elements are reinserted into a fresh tree.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.raw.len();
        for value in self.raw.drain_to_vec() {
            if f(&value) {
                self.raw.insert(value, &self.cmp);
            }
        }
        trace!("retain kept {} of {} elements", self.raw.len(), before);
    }
}

impl<T: Hash, C> Hash for OrderedSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: PartialEq, C> PartialEq for OrderedSet<T, C> {
    fn eq(&self, other: &OrderedSet<T, C>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for OrderedSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for OrderedSet<T, C> {
    fn partial_cmp(&self, other: &OrderedSet<T, C>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, C> Ord for OrderedSet<T, C> {
    fn cmp(&self, other: &OrderedSet<T, C>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Clone, C: Clone> Clone for OrderedSet<T, C> {
    fn clone(&self) -> Self {
        OrderedSet {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrderedSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C> fmt::Display for OrderedSet<T, C> {
    /// Summarizes the set as its size and, when non-empty, its extremes.
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert_eq!(set.to_string(), "OrderedSet<Size: 0>");
    /// set.extend([100, 50, 150]);
    /// assert_eq!(set.to_string(), "OrderedSet<Size: 3, First: 50, Last: 150>");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderedSet<Size: {}", self.len())?;
        if let Some(first) = self.first() {
            write!(f, ", First: {first}")?;
        }
        if let Some(last) = self.last() {
            write!(f, ", Last: {last}")?;
        }
        f.write_str(">")
    }
}

impl<T, C: Default> Default for OrderedSet<T, C> {
    fn default() -> Self {
        OrderedSet::with_comparator(C::default())
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for OrderedSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::default();
        set.extend(iter);
        set
    }
}

impl<T, C: Comparator<T>> Extend<T> for OrderedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Copy, C: Comparator<T>> Extend<&'a T> for OrderedSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OrderedSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T, C> IntoIterator for OrderedSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `OrderedSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<alloc::vec::Vec<_>>()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `ordered_set::Iter`.
    ///
    /// ```
    /// # use rbset::ordered_set;
    /// let iter: ordered_set::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            inner: RawIter::empty(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("inner", &self.inner).finish()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `ordered_set::IntoIter`.
    ///
    /// ```
    /// # use rbset::ordered_set;
    /// let iter: ordered_set::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use static_assertions::assert_impl_all;

    assert_impl_all!(OrderedSet<i32>: Send, Sync, Clone, Default);
    assert_impl_all!(Iter<'static, i32>: Send, Sync, Clone);

    #[test]
    fn iter_debug_lists_remaining() {
        let set = OrderedSet::from([3, 1, 2]);
        let mut iter = set.iter();
        iter.next();
        assert_eq!(format!("{iter:?}"), "Iter([2, 3])");
    }

    #[test]
    fn display_on_empty_and_filled() {
        let mut set: OrderedSet<&str> = OrderedSet::new();
        assert_eq!(set.to_string(), "OrderedSet<Size: 0>");
        set.insert("b");
        assert_eq!(set.to_string(), "OrderedSet<Size: 1, First: b, Last: b>");
    }

    #[test]
    fn retain_keeps_tree_valid() {
        let mut set: OrderedSet<i32> = (0..100).collect();
        let mut seen = Vec::new();
        set.retain(|&v| {
            seen.push(v);
            v % 3 == 0
        });
        set.raw.validate(&set.cmp);
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
        assert_eq!(set.len(), 34);
    }

    #[test]
    fn clone_is_independent() {
        let mut a = OrderedSet::from([1, 2, 3]);
        let b = a.clone();
        a.remove(&2);
        a.raw.validate(&a.cmp);
        b.raw.validate(&b.cmp);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_ne!(a, b);
    }
}

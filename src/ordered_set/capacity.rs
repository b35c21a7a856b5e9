use super::OrderedSet;
use crate::comparator::Natural;
use crate::raw::RawRbTree;

impl<T> OrderedSet<T> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedSet::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T, C> OrderedSet<T, C> {
    /// Creates an empty set ordered by `cmp`, with capacity for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    /// use rbset::comparator::{Natural, Reverse};
    ///
    /// let mut set = OrderedSet::with_capacity_and_comparator(8, Reverse(Natural));
    /// set.extend([1, 2]);
    /// assert_eq!(set.first(), Some(&2));
    /// assert!(set.capacity() >= 8);
    /// ```
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        OrderedSet {
            raw: RawRbTree::with_capacity(capacity),
            cmp,
        }
    }

    /// Returns the number of elements the set can hold without reallocating.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::with_capacity(32);
    /// assert_eq!(set.capacity(), 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// Slots freed by earlier removals count towards the reservation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = OrderedSet::new();
    /// set.reserve(10);
    /// assert!(set.capacity() >= 10);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }
}

//! An ordered set backed by a red-black tree.
//!
//! This crate provides [`OrderedSet`], a collection of unique elements kept in the order given
//! by a [`Comparator`] chosen when the set is built. Insertion, removal, membership tests and
//! min/max lookups are O(log n), and iteration is in ascending order.
//!
//! # Example
//!
//! ```
//! use rbset::OrderedSet;
//!
//! let mut set = OrderedSet::new();
//! set.insert(100);
//! set.insert(50);
//! set.insert(150);
//!
//! assert_eq!(set.first(), Some(&50));
//! assert_eq!(set.last(), Some(&150));
//! assert!(set.contains(&100));
//! assert!(set.remove(&100));
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.to_string(), "OrderedSet<Size: 2, First: 50, Last: 150>");
//! ```
//!
//! Any total order can be used in place of [`Ord`]:
//!
//! ```
//! use rbset::OrderedSet;
//!
//! let mut words = OrderedSet::with_comparator(|a: &&str, b: &&str| {
//!     a.to_lowercase().cmp(&b.to_lowercase())
//! });
//! words.insert("banana");
//! words.insert("Apple");
//!
//! // Equal under the comparator, so the stored element is replaced.
//! assert_eq!(words.insert("APPLE"), Some("Apple"));
//! assert_eq!(words.iter().copied().collect::<Vec<_>>(), ["APPLE", "banana"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Replace-on-duplicate** - [`insert`](OrderedSet::insert) hands back the element it displaced
//! - **Pluggable ordering** - closures, [`Natural`], [`Reverse`](comparator::Reverse) and
//!   [`TotalOrder`](comparator::TotalOrder) for floats
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other by index. Child links decide which
//! nodes are reachable and parent links are only used to walk back up, so rotations and
//! deletions never need unsafe code. A reserved sentinel index stands in for every absent child;
//! it always reads as black and is never written. Iteration uses explicit stacks instead of
//! recursion, so its memory use stays proportional to the height of the tree.
//!
//! The set does no internal locking. Mutation takes `&mut self`, so shared access across threads
//! needs an external lock around the whole set.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod comparator;
mod raw;

pub mod ordered_set;

pub use comparator::{Comparator, Natural};
pub use ordered_set::OrderedSet;

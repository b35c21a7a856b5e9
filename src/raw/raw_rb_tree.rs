use alloc::vec::Vec;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::mem;

use log::trace;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::iter::RawIter;
use super::node::{Color, Node, Side};
use crate::comparator::Comparator;

/// The red-black tree backing `OrderedSet`.
///
/// The tree does not own a comparator; every ordered operation borrows one from the caller so the
/// set can keep it next to the tree.
///
/// After every public method returns:
/// 1. an in-order walk yields strictly ascending elements under the comparator;
/// 2. absent children are [`Handle::NIL`], which reads as black;
/// 3. no red node has a red parent;
/// 4. every path from a node down to `NIL` crosses the same number of black nodes;
/// 5. the root is black;
/// 6. `len` equals the number of reachable nodes, which equals the number of live arena slots.
#[derive(Clone)]
pub(crate) struct RawRbTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, `NIL` when the tree is empty.
    root: Handle,
    /// Number of elements in the tree.
    len: usize,
}

impl<T> RawRbTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: Handle::NIL,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` elements.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: Handle::NIL,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Drops every element and resets the tree to empty.
    pub(crate) fn clear(&mut self) {
        trace!("clearing red-black tree of {} elements", self.len);
        self.nodes.clear();
        self.root = Handle::NIL;
        self.len = 0;
    }

    /// Returns an in-order iterator over the elements.
    pub(crate) fn iter(&self) -> RawIter<'_, T> {
        RawIter::new(&self.nodes, self.root, self.len)
    }

    /// Moves every element out in ascending order, leaving the tree empty.
    ///
    /// This is O(n): it walks the tree once with an explicit stack and never rebalances.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        trace!("draining red-black tree of {} elements", self.len);
        let mut result = Vec::with_capacity(self.len);
        let mut stack: SmallVec<[Handle; 32]> = SmallVec::new();
        let mut current = self.root;

        loop {
            while !current.is_nil() {
                stack.push(current);
                current = self.nodes.get(current).left();
            }
            let Some(handle) = stack.pop() else {
                break;
            };
            // The left subtree is already drained, so the node can leave the arena now.
            let node = self.nodes.take(handle);
            current = node.right();
            result.push(node.into_element());
        }

        self.clear();
        result
    }

    // ─── Sentinel-aware accessors ───────────────────────────────────────────

    #[inline]
    fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    /// The color of `handle`, with `NIL` reading as black.
    #[inline]
    fn color(&self, handle: Handle) -> Color {
        if handle.is_nil() { Color::Black } else { self.node(handle).color() }
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        debug_assert!(!handle.is_nil(), "`RawRbTree::set_color()` - the sentinel is immutable!");
        self.node_mut(handle).set_color(color);
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Handle {
        self.node(handle).parent()
    }

    /// Points `child` back at `parent`, unless `child` is the sentinel.
    #[inline]
    fn attach_parent(&mut self, child: Handle, parent: Handle) {
        if !child.is_nil() {
            self.node_mut(child).set_parent(parent);
        }
    }

    #[inline]
    fn child(&self, handle: Handle, side: Side) -> Handle {
        self.node(handle).child(side)
    }

    /// Which side of its parent `handle` hangs from. `handle` must not be the root.
    #[inline]
    fn side_of(&self, handle: Handle) -> Side {
        if self.child(self.parent(handle), Side::Left) == handle { Side::Left } else { Side::Right }
    }

    /// Puts `new` where `old` hangs from `parent`, or makes it the root when `parent` is `NIL`.
    fn replace_child(&mut self, parent: Handle, old: Handle, new: Handle) {
        if parent.is_nil() {
            self.root = new;
        } else {
            let side = if self.child(parent, Side::Left) == old { Side::Left } else { Side::Right };
            self.node_mut(parent).set_child(side, new);
        }
    }

    /// The last node reached by following `side` children from `from`.
    fn extreme(&self, side: Side, mut from: Handle) -> Handle {
        if from.is_nil() {
            return from;
        }
        loop {
            let next = self.child(from, side);
            if next.is_nil() {
                return from;
            }
            from = next;
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Finds the node holding an element equal to `element`.
    fn find<C: Comparator<T>>(&self, element: &T, cmp: &C) -> Option<Handle> {
        let mut current = self.root;
        while !current.is_nil() {
            let node = self.node(current);
            current = match cmp.compare(element, node.element()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return Some(current),
            };
        }
        None
    }

    pub(crate) fn get<C: Comparator<T>>(&self, element: &T, cmp: &C) -> Option<&T> {
        self.find(element, cmp).map(|handle| self.node(handle).element())
    }

    pub(crate) fn contains<C: Comparator<T>>(&self, element: &T, cmp: &C) -> bool {
        self.find(element, cmp).is_some()
    }

    pub(crate) fn first(&self) -> Option<&T> {
        let handle = self.extreme(Side::Left, self.root);
        (!handle.is_nil()).then(|| self.node(handle).element())
    }

    pub(crate) fn last(&self) -> Option<&T> {
        let handle = self.extreme(Side::Right, self.root);
        (!handle.is_nil()).then(|| self.node(handle).element())
    }

    // ─── Rotation ───────────────────────────────────────────────────────────

    /// Rotates `pivot` down towards `side`, promoting its child from the opposite side.
    ///
    /// `rotate(x, Side::Left)` is the classic left rotation: `x`'s right child takes `x`'s
    /// place and `x` becomes its left child. The promoted child's inner subtree moves across to
    /// `x`. Colors are untouched.
    fn rotate(&mut self, pivot: Handle, side: Side) {
        let other = side.opposite();
        let promoted = self.child(pivot, other);
        debug_assert!(!promoted.is_nil(), "`RawRbTree::rotate()` - nothing to promote!");

        let inner = self.child(promoted, side);
        self.node_mut(pivot).set_child(other, inner);
        self.attach_parent(inner, pivot);

        let parent = self.parent(pivot);
        self.node_mut(promoted).set_parent(parent);
        self.replace_child(parent, pivot, promoted);

        self.node_mut(promoted).set_child(side, pivot);
        self.node_mut(pivot).set_parent(promoted);
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Inserts `element`, or replaces the stored element that compares equal to it.
    ///
    /// Returns the replaced element. A replacement leaves the shape and `len` unchanged.
    pub(crate) fn insert<C: Comparator<T>>(&mut self, element: T, cmp: &C) -> Option<T> {
        let mut parent = Handle::NIL;
        let mut side = Side::Left;
        let mut current = self.root;

        while !current.is_nil() {
            parent = current;
            let node = self.node_mut(current);
            match cmp.compare(&element, node.element()) {
                Less => side = Side::Left,
                Greater => side = Side::Right,
                Equal => return Some(mem::replace(node.element_mut(), element)),
            }
            current = node.child(side);
        }

        let handle = self.nodes.alloc(Node::new(element, parent));
        if parent.is_nil() {
            self.root = handle;
        } else {
            self.node_mut(parent).set_child(side, handle);
        }
        self.len += 1;

        self.insert_fixup(handle);
        None
    }

    /// Restores the red-black invariants after `node` was attached as a red leaf.
    fn insert_fixup(&mut self, mut node: Handle) {
        // A red parent is never the root, so the grandparent exists.
        while self.color(self.parent(node)) == Color::Red {
            let mut parent = self.parent(node);
            let grandparent = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                // Push the red up to the grandparent and look again from there.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.child(parent, side.opposite()) == node {
                // Inner grandchild: turn it into an outer one first.
                self.rotate(parent, side);
                node = parent;
                parent = self.parent(node);
            }

            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    // ─── Deletion ───────────────────────────────────────────────────────────

    /// Removes the element equal to `element` and returns it.
    pub(crate) fn remove<C: Comparator<T>>(&mut self, element: &T, cmp: &C) -> Option<T> {
        let handle = self.find(element, cmp)?;
        Some(self.remove_node(handle))
    }

    pub(crate) fn pop_first(&mut self) -> Option<T> {
        let handle = self.extreme(Side::Left, self.root);
        (!handle.is_nil()).then(|| self.remove_node(handle))
    }

    pub(crate) fn pop_last(&mut self) -> Option<T> {
        let handle = self.extreme(Side::Right, self.root);
        (!handle.is_nil()).then(|| self.remove_node(handle))
    }

    /// Unlinks the element held by `target` and returns it.
    ///
    /// When `target` has a right subtree, its in-order successor is spliced out instead and the
    /// successor's element moves into `target`.
    fn remove_node(&mut self, target: Handle) -> T {
        let right = self.child(target, Side::Right);
        let spliced = if right.is_nil() { target } else { self.extreme(Side::Left, right) };

        // `spliced` has at most one child.
        let left = self.child(spliced, Side::Left);
        let child = if left.is_nil() { self.child(spliced, Side::Right) } else { left };
        let parent = self.parent(spliced);

        self.attach_parent(child, parent);
        self.replace_child(parent, spliced, child);

        let node = self.nodes.take(spliced);
        self.len -= 1;
        debug_assert_eq!(self.nodes.len(), self.len, "`RawRbTree::remove_node()` - arena out of sync!");

        let color = node.color();
        let removed = if spliced == target {
            node.into_element()
        } else {
            mem::replace(self.node_mut(target).element_mut(), node.into_element())
        };

        if color == Color::Black {
            if self.color(child) == Color::Red {
                self.set_color(child, Color::Black);
            } else {
                self.remove_fixup(child, parent);
            }
        }

        removed
    }

    /// Repairs the missing black on every path through `node`, whose parent is `parent`.
    ///
    /// `node` may be the sentinel, which has no parent link of its own, so the parent is carried
    /// alongside it.
    fn remove_fixup(&mut self, mut node: Handle, mut parent: Handle) {
        while node != self.root && self.color(node) == Color::Black {
            // The sibling subtree holds at least one black node, so the sibling is real.
            let side = if self.child(parent, Side::Left) == node { Side::Left } else { Side::Right };
            let mut sibling = self.child(parent, side.opposite());

            if self.color(sibling) == Color::Red {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, side.opposite());
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());

            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                self.set_color(sibling, Color::Red);
                node = parent;
                parent = self.parent(node);
                continue;
            }

            if self.color(far) == Color::Black {
                // Inner nephew is red: rotate it to the outside.
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.child(parent, side.opposite());
            }

            let parent_color = self.color(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            let far = self.child(sibling, side.opposite());
            self.set_color(far, Color::Black);
            self.rotate(parent, side);
            node = self.root;
            break;
        }

        if !node.is_nil() {
            self.set_color(node, Color::Black);
        }
    }
}

#[cfg(test)]
impl<T> RawRbTree<T> {
    /// Checks every red-black invariant, panicking with a description of the first violation.
    pub(crate) fn validate<C: Comparator<T>>(&self, cmp: &C) {
        assert!(self.root.is_nil() || self.parent(self.root).is_nil(), "root has a parent");
        assert_eq!(self.color(self.root), Color::Black, "root is red");

        let (_, count) = self.validate_subtree(self.root, cmp);
        assert_eq!(count, self.len, "reachable nodes != len");
        assert_eq!(self.nodes.len(), self.len, "live arena slots != len");

        let walked: Vec<&T> = {
            let mut iter = self.iter();
            core::iter::from_fn(|| iter.next()).collect()
        };
        assert_eq!(walked.len(), self.len, "in-order walk length != len");
        for pair in walked.windows(2) {
            assert_eq!(cmp.compare(pair[0], pair[1]), Less, "in-order walk is not strictly ascending");
        }
    }

    /// Returns the black height and node count of the subtree at `handle`.
    fn validate_subtree<C: Comparator<T>>(&self, handle: Handle, cmp: &C) -> (usize, usize) {
        if handle.is_nil() {
            return (1, 0);
        }

        let node = self.node(handle);
        let mut heights = [0; 2];
        let mut count = 1;
        for (i, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            let child = node.child(side);
            if !child.is_nil() {
                let child_node = self.node(child);
                assert_eq!(child_node.parent(), handle, "child does not point back at its parent");
                let expected = if side == Side::Left { Greater } else { Less };
                assert_eq!(cmp.compare(node.element(), child_node.element()), expected, "child on the wrong side");
                if node.color() == Color::Red {
                    assert_eq!(child_node.color(), Color::Black, "red node has a red child");
                }
            }
            let (height, subtree_count) = self.validate_subtree(child, cmp);
            heights[i] = height;
            count += subtree_count;
        }

        assert_eq!(heights[0], heights[1], "black heights differ");
        (heights[0] + usize::from(node.color() == Color::Black), count)
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        fn go<T>(tree: &RawRbTree<T>, handle: Handle) -> usize {
            if handle.is_nil() {
                0
            } else {
                1 + go(tree, tree.child(handle, Side::Left)).max(go(tree, tree.child(handle, Side::Right)))
            }
        }
        go(self, self.root)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::comparator::{Natural, Reverse};
    use alloc::collections::BTreeSet;
    use proptest::prelude::*;

    fn collect<T: Clone>(tree: &RawRbTree<T>) -> Vec<T> {
        let mut iter = tree.iter();
        core::iter::from_fn(|| iter.next().cloned()).collect()
    }

    fn build(values: &[i32]) -> RawRbTree<i32> {
        let mut tree = RawRbTree::new();
        for &value in values {
            tree.insert(value, &Natural);
            tree.validate(&Natural);
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: RawRbTree<i32> = RawRbTree::new();
        tree.validate(&Natural);
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert!(!tree.contains(&1, &Natural));
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn first_insert_becomes_black_root() {
        let tree = build(&[7]);
        assert_eq!(tree.color(tree.root), Color::Black);
        assert_eq!(tree.first(), Some(&7));
        assert_eq!(tree.last(), Some(&7));
    }

    #[test]
    fn red_uncle_recolors() {
        // 20 black, 10 and 30 red; 5 makes the uncle case.
        let tree = build(&[20, 10, 30, 5]);
        assert_eq!(*tree.node(tree.root).element(), 20);
        assert_eq!(tree.color(tree.child(tree.root, Side::Left)), Color::Black);
        assert_eq!(tree.color(tree.child(tree.root, Side::Right)), Color::Black);
    }

    #[test]
    fn outer_grandchild_rotates_once() {
        let tree = build(&[1, 2, 3]);
        assert_eq!(*tree.node(tree.root).element(), 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn inner_grandchild_rotates_twice() {
        let tree = build(&[3, 1, 2]);
        assert_eq!(*tree.node(tree.root).element(), 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn rotation_round_trip_restores_shape() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let root = tree.root;
        let before = collect(&tree);

        tree.rotate(root, Side::Left);
        assert_eq!(*tree.node(tree.root).element(), 6);
        assert_eq!(tree.parent(root), tree.root);
        assert_eq!(*tree.node(tree.child(root, Side::Right)).element(), 5);
        assert_eq!(collect(&tree), before);

        tree.rotate(tree.root, Side::Right);
        assert_eq!(tree.root, root);
        assert_eq!(collect(&tree), before);
        tree.validate(&Natural);
    }

    #[test]
    fn duplicate_replaces_without_growing() {
        let mut tree = build(&[1]);
        assert_eq!(tree.insert(1, &Natural), Some(1));
        assert_eq!(tree.len(), 1);
        tree.validate(&Natural);
    }

    #[test]
    fn remove_leaf_root_and_internal() {
        let mut tree = build(&[50, 25, 75, 10, 30, 60, 90]);

        // Leaf.
        assert_eq!(tree.remove(&10, &Natural), Some(10));
        tree.validate(&Natural);
        // Two children: the successor moves up.
        assert_eq!(tree.remove(&50, &Natural), Some(50));
        tree.validate(&Natural);
        assert_eq!(*tree.node(tree.root).element(), 60);
        // Absent.
        assert_eq!(tree.remove(&50, &Natural), None);

        assert_eq!(collect(&tree), [25, 30, 60, 75, 90]);
    }

    #[test]
    fn remove_until_empty() {
        let mut tree = build(&[3, 1, 4, 5, 9, 2, 6, 8, 7]);
        for value in [4, 1, 9, 3, 7, 5, 2, 8, 6] {
            assert_eq!(tree.remove(&value, &Natural), Some(value));
            tree.validate(&Natural);
        }
        assert!(tree.is_empty());
        assert!(tree.root.is_nil());
    }

    #[test]
    fn ascending_removals_keep_invariants() {
        let mut tree = build(&(1..=10).collect::<Vec<_>>());
        for value in 1..=10 {
            assert_eq!(tree.remove(&value, &Natural), Some(value));
            tree.validate(&Natural);
            assert!(!tree.contains(&value, &Natural));
            assert_eq!(tree.len(), (10 - value) as usize);
        }
    }

    #[test]
    fn pop_ends() {
        let mut tree = build(&[5, 3, 8, 1, 4]);
        assert_eq!(tree.pop_first(), Some(1));
        assert_eq!(tree.pop_last(), Some(8));
        tree.validate(&Natural);
        assert_eq!(collect(&tree), [3, 4, 5]);
    }

    #[test]
    fn iter_from_both_ends_meets_in_the_middle() {
        let tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&7));
        assert_eq!(iter.next_back(), Some(&6));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&4));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn drain_yields_sorted_and_empties() {
        let mut tree = build(&[9, 2, 7, 4, 5]);
        assert_eq!(tree.drain_to_vec(), [2, 4, 5, 7, 9]);
        assert!(tree.is_empty());
        tree.validate(&Natural);

        // The arena is reusable afterwards.
        tree.insert(1, &Natural);
        tree.validate(&Natural);
    }

    #[test]
    fn custom_comparator_orders_tree() {
        let cmp = Reverse(Natural);
        let mut tree = RawRbTree::new();
        for value in 0..64 {
            tree.insert(value, &cmp);
            tree.validate(&cmp);
        }
        assert_eq!(tree.first(), Some(&63));
        assert_eq!(tree.last(), Some(&0));
    }

    #[test]
    fn height_stays_logarithmic() {
        let tree = build(&(0..4096).collect::<Vec<_>>());
        // 2 * log2(4097) < 25
        assert!(tree.height() <= 24, "height {} too large", tree.height());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Every insert and remove keeps the invariants and agrees with a model.
        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec((any::<bool>(), 0i32..128), 0..512)) {
            let mut tree = RawRbTree::new();
            let mut model = BTreeSet::new();

            for (insert, value) in ops {
                if insert {
                    let replaced = tree.insert(value, &Natural);
                    prop_assert_eq!(replaced.is_some(), !model.insert(value));
                } else {
                    let removed = tree.remove(&value, &Natural);
                    prop_assert_eq!(removed.is_some(), model.remove(&value));
                }
                tree.validate(&Natural);
                prop_assert_eq!(tree.len(), model.len());
            }

            prop_assert_eq!(collect(&tree), model.into_iter().collect::<Vec<_>>());
        }

        /// Any insertion order produces the same traversal.
        #[test]
        fn traversal_is_order_independent(values in Just((0i32..200).collect::<Vec<_>>()).prop_shuffle()) {
            let tree = build(&values);
            prop_assert_eq!(collect(&tree), (0i32..200).collect::<Vec<_>>());
        }

        /// Draining pops from both ends alternately keeps the tree valid.
        #[test]
        fn pops_keep_invariants(values in prop::collection::vec(any::<i32>(), 0..256)) {
            let mut tree = build(&values);
            let mut expected: Vec<i32> = values.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

            let mut from_front = true;
            while !expected.is_empty() {
                let (popped, wanted) = if from_front {
                    (tree.pop_first(), expected.remove(0))
                } else {
                    (tree.pop_last(), expected.pop().unwrap())
                };
                prop_assert_eq!(popped, Some(wanted));
                tree.validate(&Natural);
                from_front = !from_front;
            }
            prop_assert!(tree.is_empty());
        }
    }
}

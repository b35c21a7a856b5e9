use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// Inline depth of the traversal stacks. A red-black tree with `n` elements is at most
/// `2 * log2(n + 1)` deep; deeper (or corrupted) trees spill to the heap.
const STACK_DEPTH: usize = 32;

type Stack = SmallVec<[Handle; STACK_DEPTH]>;

/// In-order cursor over a tree, walking from both ends with explicit stacks.
///
/// Each stack holds the chain of ancestors whose element has not been yielded yet from that end.
/// `remaining` stops the two ends from crossing.
pub(crate) struct RawIter<'a, T> {
    nodes: Option<&'a Arena<Node<T>>>,
    front: Stack,
    back: Stack,
    remaining: usize,
}

impl<'a, T> RawIter<'a, T> {
    pub(crate) fn new(nodes: &'a Arena<Node<T>>, root: Handle, len: usize) -> Self {
        let mut iter = Self {
            nodes: Some(nodes),
            front: Stack::new(),
            back: Stack::new(),
            remaining: len,
        };
        iter.descend(Side::Left, root);
        iter.descend(Side::Right, root);
        iter
    }

    /// Creates an iterator over nothing.
    pub(crate) fn empty() -> Self {
        Self {
            nodes: None,
            front: Stack::new(),
            back: Stack::new(),
            remaining: 0,
        }
    }

    /// Pushes `from` and its chain of `side` children onto the stack for that end.
    fn descend(&mut self, side: Side, mut from: Handle) {
        let Some(nodes) = self.nodes else {
            return;
        };
        let stack = match side {
            Side::Left => &mut self.front,
            Side::Right => &mut self.back,
        };
        while !from.is_nil() {
            stack.push(from);
            from = nodes.get(from).child(side);
        }
    }

    fn step(&mut self, side: Side) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes?;
        let stack = match side {
            Side::Left => &mut self.front,
            Side::Right => &mut self.back,
        };
        let handle = stack.pop()?;
        let node = nodes.get(handle);
        self.remaining -= 1;
        self.descend(side, node.child(side.opposite()));
        Some(node.element())
    }

    pub(crate) fn next(&mut self) -> Option<&'a T> {
        self.step(Side::Left)
    }

    pub(crate) fn next_back(&mut self) -> Option<&'a T> {
        self.step(Side::Right)
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> Clone for RawIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

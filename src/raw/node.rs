use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a node. Mirrored fixup cases are written once in terms of a `Side`
/// and its opposite.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A red-black tree node.
///
/// `left` and `right` decide what is reachable from the root; `parent` is only a way back up.
/// Absent relations are [`Handle::NIL`].
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    element: T,
    color: Color,
    parent: Handle,
    left: Handle,
    right: Handle,
}

impl<T> Node<T> {
    /// Creates a red leaf hanging off `parent`.
    pub(crate) fn new(element: T, parent: Handle) -> Self {
        Self {
            element,
            color: Color::Red,
            parent,
            left: Handle::NIL,
            right: Handle::NIL,
        }
    }

    #[inline]
    pub(crate) fn element(&self) -> &T {
        &self.element
    }

    #[inline]
    pub(crate) fn element_mut(&mut self) -> &mut T {
        &mut self.element
    }

    #[inline]
    pub(crate) fn into_element(self) -> T {
        self.element
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Handle {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Handle) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Handle {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Handle {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Handle {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Handle) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_red_leaf() {
        let parent = Handle::from_index(3);
        let node = Node::new('x', parent);

        assert_eq!(node.color(), Color::Red);
        assert_eq!(node.parent(), parent);
        assert!(node.left().is_nil());
        assert!(node.right().is_nil());
        assert_eq!(*node.element(), 'x');
    }

    #[test]
    fn child_slots_follow_side() {
        let mut node = Node::new(0u8, Handle::NIL);
        let a = Handle::from_index(1);
        let b = Handle::from_index(2);

        node.set_child(Side::Left, a);
        node.set_child(Side::Right.opposite().opposite(), b);

        assert_eq!(node.left(), a);
        assert_eq!(node.right(), b);
        assert_eq!(node.child(Side::Left.opposite()), b);
    }
}

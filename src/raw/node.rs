use super::arena::Arena;
use super::handle::Handle;

/// Node color. An absent child (a leaf boundary) counts as [`Color::Black`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a node. Lets the balancing code handle a case and its mirror image
/// with one body.
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

// Red-black tree node. The value lives in its own arena and is referenced by handle so the
// node arena stays dense for traversal.
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: K,
    value: Handle,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a new red, childless node hanging below `parent`.
    pub(crate) const fn new(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns which side `child` hangs on. `child` must be a child of this node; an absent
    /// child is reported on whichever side is empty, left first.
    #[inline]
    pub(crate) fn side_of(&self, child: Option<Handle>) -> Side {
        if self.left == child { Side::Left } else { Side::Right }
    }

    /// Consumes the node, returning its key and value handle.
    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }
}

// In-order navigation only needs the node arena, so it lives here rather than on the tree.
// That lets `IterMut` walk the nodes while it holds the value arena mutably.
impl<K> Arena<Node<K>> {
    /// Returns the outermost node on `side` in the subtree rooted at `handle`.
    pub(crate) fn outermost(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.get(handle).child(side) {
            handle = child;
        }
        handle
    }

    /// Returns the in-order neighbour of `handle` in the direction of `side`: the successor
    /// for [`Side::Right`], the predecessor for [`Side::Left`].
    pub(crate) fn step(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.get(handle).child(side) {
            return Some(self.outermost(child, side.opposite()));
        }

        // Climb while we are the `side` child; the first ancestor reached from the other
        // side is the neighbour.
        let mut current = handle;
        while let Some(parent) = self.get(current).parent() {
            if self.get(parent).child(side) != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    #[inline]
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Right)
    }

    #[inline]
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Left)
    }
}

use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::{Comparator, Error, InsertError};

/// The red-black tree backing `RbTreeMap`.
///
/// Invariants between public calls:
/// - in-order traversal visits keys in strictly ascending comparator order;
/// - the root is black and no red node has a red child;
/// - every path from a node down to an absent child crosses the same number of black nodes.
#[derive(Clone)]
pub(crate) struct RawRbTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes for cache efficiency).
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

impl<K, V> RawRbTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries the tree can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().min(self.values.capacity())
    }

    /// Reserves room for `additional` more entries in both arenas.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.nodes.try_reserve(additional)?;
        self.values.try_reserve(additional)
    }

    /// Clears all elements from the tree.
    pub(crate) fn clear(&mut self) {
        log::trace!("clearing tree of {} entries", self.len);
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    /// Removes every entry in post-order (left subtree, right subtree, node), handing each
    /// key and value to `dispose` exactly once.
    pub(crate) fn drain_post_order<F>(&mut self, mut dispose: F)
    where
        F: FnMut(K, V),
    {
        log::trace!("disposing of {} entries in post-order", self.len);
        let mut current = self.root.take();

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if let Some(child) = node.left().or(node.right()) {
                current = Some(child);
                continue;
            }

            // `handle` is now childless: unhook it so its parent becomes a leaf in turn.
            let parent = node.parent();
            if let Some(parent) = parent {
                let parent_node = self.nodes.get_mut(parent);
                let side = parent_node.side_of(Some(handle));
                parent_node.set_child(side, None);
            }

            let (key, value_handle) = self.nodes.take(handle).into_parts();
            let value = self.values.take(value_handle);
            self.len -= 1;
            dispose(key, value);
            current = parent;
        }

        self.clear();
    }

    /// Drains all key-value pairs from the tree in ascending key order.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len);
        let mut current = self.first();

        // Collect handles first: taking a node would cut the links the walk relies on.
        while let Some(handle) = current {
            current = self.nodes.successor(handle);
            result.push(handle);
        }

        let entries = result
            .into_iter()
            .map(|handle| {
                let (key, value_handle) = self.nodes.take(handle).into_parts();
                (key, self.values.take(value_handle))
            })
            .collect();

        self.clear();
        entries
    }

    /// Returns the handle of the smallest entry, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.nodes.outermost(root, Side::Left))
    }

    /// Returns the handle of the largest entry, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.nodes.outermost(root, Side::Right))
    }

    /// Returns the in-order successor of `handle`.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.nodes.successor(handle)
    }

    /// Returns the in-order predecessor of `handle`.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.nodes.predecessor(handle)
    }

    /// Returns the key and value stored at `handle`.
    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get(node.value()))
    }

    /// Returns the key and a mutable value stored at `handle`.
    pub(crate) fn entry_mut(&mut self, handle: Handle) -> (&K, &mut V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get_mut(node.value()))
    }

    /// Splits the tree into the node arena (for navigation) and one disjoint mutable
    /// reference per value slot, indexed by value handle.
    pub(crate) fn split_values_mut(&mut self) -> (&Arena<Node<K>>, Vec<Option<&mut V>>) {
        (&self.nodes, self.values.slots_mut())
    }

    /// Returns the number of nodes on the longest path from the root down to a leaf.
    pub(crate) fn height(&self) -> usize {
        // Red-black height is at most 2 * log2(n + 1), so 64 levels cover any `u32` handle.
        let mut stack: SmallVec<[(Handle, usize); 64]> = SmallVec::new();
        let mut height = 0;

        if let Some(root) = self.root {
            stack.push((root, 1));
        }

        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            stack.extend([node.left(), node.right()].into_iter().flatten().map(|child| (child, depth + 1)));
        }

        height
    }

    /// Keeps only the entries for which `keep` returns true, visiting them in ascending
    /// order.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut current = self.first();

        while let Some(handle) = current {
            // Removal relinks nodes instead of moving entries, so the successor handle stays valid.
            current = self.nodes.successor(handle);
            let (key, value) = self.entry_mut(handle);
            if !keep(key, value) {
                drop(self.remove_node(handle));
            }
        }
    }

    /// Removes the node at `handle`, returning its key and value.
    pub(crate) fn remove_node(&mut self, handle: Handle) -> (K, V) {
        let node = self.nodes.get(handle);
        let (left, right, parent, color) = (node.left(), node.right(), node.parent(), node.color());

        // `removed_color` is the color that vanished from the tree position that shrank;
        // `child` (possibly absent) now occupies that position below `child_parent`.
        let (removed_color, child, child_parent) = match (left, right) {
            (None, only) | (only, None) => {
                self.transplant(handle, only);
                (color, only, parent)
            }
            (Some(left), Some(right)) => {
                let successor = self.nodes.outermost(right, Side::Left);
                let successor_node = self.nodes.get(successor);
                let successor_color = successor_node.color();
                let child = successor_node.right();

                let child_parent = if successor == right {
                    Some(successor)
                } else {
                    let successor_parent = successor_node.parent();
                    self.transplant(successor, child);
                    self.node_mut(successor).set_child(Side::Right, Some(right));
                    self.node_mut(right).set_parent(Some(successor));
                    successor_parent
                };

                self.transplant(handle, Some(successor));
                self.node_mut(successor).set_child(Side::Left, Some(left));
                self.node_mut(left).set_parent(Some(successor));
                self.node_mut(successor).set_color(color);

                (successor_color, child, child_parent)
            }
        };

        if removed_color == Color::Black {
            self.remove_fixup(child, child_parent);
        }

        self.len -= 1;
        let (key, value_handle) = self.nodes.take(handle).into_parts();
        (key, self.values.take(value_handle))
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.nodes.get(h).color() == Color::Red)
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).set_color(color);
    }

    /// Points whatever referenced `old` (its parent's child slot, or the root) at `new`.
    /// `old`'s own links are left untouched.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.nodes.get(old).parent();
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent_node = self.node_mut(parent);
                let side = parent_node.side_of(Some(old));
                parent_node.set_child(side, new);
            }
        }
        if let Some(new) = new {
            self.node_mut(new).set_parent(parent);
        }
    }

    /// Rotates the subtree rooted at `handle` towards `side`: the child on the opposite side
    /// takes `handle`'s place and `handle` becomes its `side` child.
    ///
    /// `rotate(n, Side::Left)` is the classic left rotation. Colors are not touched.
    fn rotate(&mut self, handle: Handle, side: Side) {
        let pivot = self
            .nodes
            .get(handle)
            .child(side.opposite())
            .expect("`RawRbTreeMap::rotate()` - rotation pivot is missing!");

        let inner = self.nodes.get(pivot).child(side);
        self.node_mut(handle).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(handle));
        }

        self.transplant(handle, Some(pivot));
        self.node_mut(pivot).set_child(side, Some(handle));
        self.node_mut(handle).set_parent(Some(pivot));
    }

    /// Restores the red-black invariants after `handle` was attached as a red leaf.
    fn insert_fixup(&mut self, mut handle: Handle) {
        while let Some(mut parent) = self.nodes.get(handle).parent().filter(|&p| self.is_red(Some(p))) {
            // A red node is never the root, so the grandparent exists.
            let Some(grandparent) = self.nodes.get(parent).parent() else {
                break;
            };
            let side = self.nodes.get(grandparent).side_of(Some(parent));
            let uncle = self.nodes.get(grandparent).child(side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.is_red(Some(u))) {
                // Red uncle: push the blackness down from the grandparent and continue there.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                handle = grandparent;
                continue;
            }

            if self.nodes.get(parent).child(side.opposite()) == Some(handle) {
                // Inner grandchild: rotate it to the outside first.
                self.rotate(parent, side);
                core::mem::swap(&mut handle, &mut parent);
            }

            // Outer grandchild: rotate the grandparent away and swap colors.
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Restores the black-height invariant after a black node left the position now held by
    /// `child` (possibly absent) below `parent`.
    fn remove_fixup(&mut self, mut child: Option<Handle>, mut parent: Option<Handle>) {
        while child != self.root && !self.is_red(child) {
            let Some(p) = parent else {
                break;
            };
            let side = self.nodes.get(p).side_of(child);

            // `child` is short one black node, so its sibling subtree has black-height >= 1.
            let mut sibling = self.sibling(p, side);

            if self.is_red(Some(sibling)) {
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling = self.sibling(p, side);
            }

            let near = self.nodes.get(sibling).child(side);
            let far = self.nodes.get(sibling).child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                // Both nephews black: move the deficit up one level.
                self.set_color(sibling, Color::Red);
                child = Some(p);
                parent = self.nodes.get(p).parent();
                continue;
            }

            if !self.is_red(far) {
                // Near nephew red: rotate it into the far position.
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(p, side);
            }

            // Far nephew red: one rotation at the parent settles the deficit.
            let parent_color = self.nodes.get(p).color();
            self.set_color(sibling, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far) = self.nodes.get(sibling).child(side.opposite()) {
                self.set_color(far, Color::Black);
            }
            self.rotate(p, side);
            child = self.root;
            break;
        }

        if let Some(child) = child {
            self.set_color(child, Color::Black);
        }
    }

    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        self.nodes
            .get(parent)
            .child(side.opposite())
            .expect("`RawRbTreeMap::sibling()` - black-height violated: sibling is missing!")
    }
}

impl<K, V> RawRbTreeMap<K, V> {
    /// Searches for a key and returns the handle of its node if found.
    pub(crate) fn search<Q, C>(&self, key: &Q, comparator: &C) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match comparator.compare(key, node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }

        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q, C>(&self, key: &Q, comparator: &C) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key, comparator)?;
        Some(self.entry(handle).1)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q, C>(&mut self, key: &Q, comparator: &C) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key, comparator)?;
        Some(self.entry_mut(handle).1)
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q, C>(&self, key: &Q, comparator: &C) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key, comparator)?;
        Some(self.entry(handle))
    }

    /// Removes a key from the tree, returning the stored key and value.
    pub(crate) fn remove_entry<Q, C>(&mut self, key: &Q, comparator: &C) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key, comparator)?;
        Some(self.remove_node(handle))
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// Returns the old value if the key was already present; the stored key is kept and the
    /// new `key` is dropped. On allocation failure the tree is untouched and the key and value
    /// are returned inside the error.
    pub(crate) fn try_insert<C>(&mut self, key: K, value: V, comparator: &C) -> Result<Option<V>, InsertError<K, V>>
    where
        C: Comparator<K>,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            side = match comparator.compare(&key, node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    // Key exists, replace value in place; the shape does not change.
                    let value_handle = node.value();
                    return Ok(Some(core::mem::replace(self.values.get_mut(value_handle), value)));
                }
            };
            parent = Some(handle);
            current = node.child(side);
        }

        // Reserve before linking anything so a failure leaves no partial node behind.
        if let Err(error) = self.try_reserve(1) {
            return Err(InsertError::new(key, value, error));
        }

        let value_handle = self.values.alloc(value);
        let handle = self.nodes.alloc(Node::new(key, value_handle, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.node_mut(parent).set_child(side, Some(handle)),
        }
        self.len += 1;

        self.insert_fixup(handle);
        Ok(None)
    }
}

#[cfg(test)]
impl<K, V> RawRbTreeMap<K, V> {
    /// Returns the handle of the root node, if any.
    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Checks every ordering, color, link and size invariant, returning the black-height.
    pub(crate) fn assert_invariants<C: Comparator<K>>(&self, comparator: &C) -> usize {
        assert_eq!(self.nodes.len(), self.len, "node count does not match len");
        assert_eq!(self.values.len(), self.len, "value count does not match len");

        let Some(root) = self.root else {
            assert_eq!(self.len, 0, "empty tree with non-zero len");
            return 0;
        };
        assert_eq!(self.nodes.get(root).parent(), None, "root has a parent");
        assert_eq!(self.nodes.get(root).color(), Color::Black, "root is red");

        let (count, black_height) = self.check_subtree(root, comparator);
        assert_eq!(count, self.len, "reachable nodes do not match len");

        // height <= 2 * ceil(log2(len + 1))
        let bound = 2 * (usize::BITS - self.len.leading_zeros()) as usize;
        assert!(self.height() <= bound, "height {} exceeds {bound}", self.height());

        black_height
    }

    // Returns (node count, black-height) for the subtree rooted at `handle`.
    fn check_subtree<C: Comparator<K>>(&self, handle: Handle, comparator: &C) -> (usize, usize) {
        let node = self.nodes.get(handle);
        let mut count = 1;
        let mut heights = [0, 0];

        for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            let Some(child) = node.child(side) else {
                continue;
            };
            let child_node = self.nodes.get(child);
            assert_eq!(child_node.parent(), Some(handle), "broken parent link");
            assert!(
                !(node.color() == Color::Red && child_node.color() == Color::Red),
                "red node has a red child"
            );
            let expected = match side {
                Side::Left => Ordering::Less,
                Side::Right => Ordering::Greater,
            };
            assert_eq!(comparator.compare(child_node.key(), node.key()), expected, "ordering violated");
            // Every key in the subtree must respect this node, not just the direct child.
            let extreme = self.nodes.outermost(child, side.opposite());
            assert_eq!(comparator.compare(self.nodes.get(extreme).key(), node.key()), expected, "ordering violated");

            let (child_count, child_height) = self.check_subtree(child, comparator);
            count += child_count;
            heights[slot] = child_height;
        }

        assert_eq!(heights[0], heights[1], "black-height mismatch");
        let own = usize::from(node.color() == Color::Black);
        (count, heights[0] + own)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Natural;
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn build(keys: impl IntoIterator<Item = i32>) -> RawRbTreeMap<i32, i32> {
        let mut tree = RawRbTreeMap::new();
        for key in keys {
            tree.try_insert(key, key * 10, &Natural).unwrap();
            tree.assert_invariants(&Natural);
        }
        tree
    }

    fn keys_in_order(tree: &RawRbTreeMap<i32, i32>) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut current = tree.first();
        while let Some(handle) = current {
            keys.push(*tree.entry(handle).0);
            current = tree.successor(handle);
        }
        keys
    }

    #[test]
    fn empty_tree() {
        let tree: RawRbTreeMap<i32, i32> = RawRbTreeMap::new();
        assert_eq!(tree.assert_invariants(&Natural), 0);
        assert_eq!(tree.search(&1, &Natural), None);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn single_insert_makes_black_root() {
        let tree = build([5]);
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).color(), Color::Black);
        assert_eq!(tree.assert_invariants(&Natural), 1);
    }

    #[test]
    fn ascending_insert_rotates_left() {
        let tree = build([1, 2, 3]);
        let root = tree.root().unwrap();
        assert_eq!(*tree.node(root).key(), 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn descending_insert_rotates_right() {
        let tree = build([3, 2, 1]);
        assert_eq!(*tree.node(tree.root().unwrap()).key(), 2);
    }

    #[test]
    fn inner_grandchild_double_rotation() {
        let tree = build([3, 1, 2]);
        assert_eq!(*tree.node(tree.root().unwrap()).key(), 2);
        let tree = build([1, 3, 2]);
        assert_eq!(*tree.node(tree.root().unwrap()).key(), 2);
    }

    #[test]
    fn red_uncle_recolors() {
        // 1 and 3 are red children of 2; inserting 4 recolors them black.
        let tree = build([2, 1, 3, 4]);
        let root = tree.root().unwrap();
        let left = tree.node(root).left().unwrap();
        let right = tree.node(root).right().unwrap();
        assert_eq!(tree.node(left).color(), Color::Black);
        assert_eq!(tree.node(right).color(), Color::Black);
        assert_eq!(tree.assert_invariants(&Natural), 2);
    }

    #[test]
    fn overwrite_keeps_shape() {
        let mut tree = build([10, 5, 15]);
        let root = tree.root();
        assert_eq!(tree.try_insert(5, 99, &Natural).ok(), Some(Some(50)));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root(), root);
        assert_eq!(tree.get(&5, &Natural), Some(&99));
    }

    #[test]
    fn remove_only_node() {
        let mut tree = build([7]);
        assert_eq!(tree.remove_entry(&7, &Natural), Some((7, 70)));
        assert_eq!(tree.root(), None);
        assert!(tree.is_empty());
        tree.assert_invariants(&Natural);
    }

    #[test]
    fn remove_node_with_two_children() {
        let mut tree = build(1..=15);
        let root_key = *tree.node(tree.root().unwrap()).key();
        assert_eq!(tree.remove_entry(&root_key, &Natural), Some((root_key, root_key * 10)));
        tree.assert_invariants(&Natural);
        let expected: Vec<i32> = (1..=15).filter(|&k| k != root_key).collect();
        assert_eq!(keys_in_order(&tree), expected);
    }

    #[test]
    fn remove_missing_key() {
        let mut tree = build([1, 2, 3]);
        assert_eq!(tree.remove_entry(&4, &Natural), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn remove_every_key_ascending_and_descending() {
        for descending in [false, true] {
            let mut tree = build(0..200);
            let mut order: Vec<i32> = (0..200).collect();
            if descending {
                order.reverse();
            }
            for key in order {
                assert_eq!(tree.remove_entry(&key, &Natural), Some((key, key * 10)));
                tree.assert_invariants(&Natural);
            }
            assert!(tree.is_empty());
        }
    }

    #[test]
    fn ascending_thousand_stays_shallow() {
        let tree = build(1..=1000);
        assert_eq!(tree.len(), 1000);
        assert!(tree.height() <= 20);
        assert_eq!(keys_in_order(&tree), (1..=1000).collect::<Vec<_>>());
    }

    #[test]
    fn predecessor_walk_matches_reverse_order() {
        let tree = build([8, 3, 10, 1, 6, 14, 4, 7, 13]);
        let mut keys = Vec::new();
        let mut current = tree.last();
        while let Some(handle) = current {
            keys.push(*tree.entry(handle).0);
            current = tree.predecessor(handle);
        }
        assert_eq!(keys, [14, 13, 10, 8, 7, 6, 4, 3, 1]);
    }

    #[test]
    fn drain_post_order_visits_children_first() {
        let mut tree = build([2, 1, 3]);
        let mut seen = Vec::new();
        tree.drain_post_order(|k, v| seen.push((k, v)));
        assert_eq!(seen, [(1, 10), (3, 30), (2, 20)]);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        tree.assert_invariants(&Natural);
    }

    #[test]
    fn drain_to_vec_is_sorted() {
        let mut tree = build([5, 3, 9, 1]);
        assert_eq!(tree.drain_to_vec(), [(1, 10), (3, 30), (5, 50), (9, 90)]);
        assert!(tree.is_empty());
    }

    #[test]
    fn retain_removes_rejected_entries() {
        let mut tree = build(0..100);
        tree.retain(|k, v| {
            *v += 1;
            k % 3 == 0
        });
        tree.assert_invariants(&Natural);
        assert_eq!(keys_in_order(&tree), (0..100).filter(|k| k % 3 == 0).collect::<Vec<_>>());
        assert_eq!(tree.get(&3, &Natural), Some(&31));
    }

    #[test]
    fn custom_comparator_reverses_order() {
        let reverse = |a: &i32, b: &i32| b.cmp(a);
        let mut tree = RawRbTreeMap::new();
        for key in [1, 2] {
            tree.try_insert(key, (), &reverse).unwrap();
        }
        tree.assert_invariants(&reverse);
        assert_eq!(*tree.entry(tree.first().unwrap()).0, 2);
        assert_eq!(*tree.entry(tree.last().unwrap()).0, 1);
    }

    #[test]
    fn exhausted_handle_space_leaves_tree_unchanged() {
        // Handles are `u16` under test.
        let mut tree = RawRbTreeMap::new();
        for key in 0..=Handle::MAX {
            tree.try_insert(key, (), &Natural).unwrap();
        }
        let err = tree.try_insert(usize::MAX, (), &Natural).unwrap_err();
        assert_eq!(err.error(), Error::CapacityOverflow);
        assert_eq!(err.into_inner(), (usize::MAX, ()));
        assert_eq!(tree.len(), Handle::SLOTS);
        assert_eq!(tree.search(&usize::MAX, &Natural), None);

        // Overwrites need no allocation and still succeed.
        assert_eq!(tree.try_insert(0, (), &Natural).ok(), Some(Some(())));

        // Freeing one slot makes room again.
        tree.remove_entry(&0, &Natural);
        assert!(tree.try_insert(usize::MAX, (), &Natural).is_ok());
        tree.assert_invariants(&Natural);
    }

    // ─── Model-based checks ─────────────────────────────────────────────────

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i16, u32),
        Remove(i16),
        PopFirst,
        PopLast,
        Retain(i16),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            10 => (any::<i16>().prop_map(|k| k % 512), any::<u32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
            6 => any::<i16>().prop_map(|k| Operation::Remove(k % 512)),
            1 => Just(Operation::PopFirst),
            1 => Just(Operation::PopLast),
            1 => (2..8i16).prop_map(Operation::Retain),
        ]
    }

    proptest! {
        #[test]
        fn tree_behaves_like_btreemap(operations in prop::collection::vec(strategy(), 0..512)) {
            let mut model: BTreeMap<i16, u32> = BTreeMap::new();
            let mut tree: RawRbTreeMap<i16, u32> = RawRbTreeMap::new();

            for operation in operations {
                match operation {
                    Operation::Insert(k, v) => {
                        prop_assert_eq!(tree.try_insert(k, v, &Natural).ok(), Some(model.insert(k, v)));
                    }
                    Operation::Remove(k) => {
                        prop_assert_eq!(tree.remove_entry(&k, &Natural), model.remove_entry(&k));
                    }
                    Operation::PopFirst => {
                        let popped = tree.first().map(|h| tree.remove_node(h));
                        prop_assert_eq!(popped, model.pop_first());
                    }
                    Operation::PopLast => {
                        let popped = tree.last().map(|h| tree.remove_node(h));
                        prop_assert_eq!(popped, model.pop_last());
                    }
                    Operation::Retain(m) => {
                        tree.retain(|k, _| k % m != 0);
                        model.retain(|k, _| k % m != 0);
                    }
                }

                tree.assert_invariants(&Natural);
                prop_assert_eq!(tree.len(), model.len());

                let mut entries = Vec::new();
                let mut current = tree.first();
                while let Some(handle) = current {
                    let (k, v) = tree.entry(handle);
                    entries.push((*k, *v));
                    current = tree.successor(handle);
                }
                prop_assert_eq!(entries, model.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>());
            }
        }

        #[test]
        fn any_insertion_order_sorts(keys in prop::collection::hash_set(any::<i32>(), 0..300)) {
            let keys: Vec<i32> = keys.into_iter().collect();
            let mut tree = RawRbTreeMap::new();
            for &key in &keys {
                tree.try_insert(key, (), &Natural).unwrap();
            }
            tree.assert_invariants(&Natural);

            let mut sorted = keys.clone();
            sorted.sort_unstable();
            let mut seen = Vec::new();
            let mut current = tree.first();
            while let Some(handle) = current {
                seen.push(*tree.entry(handle).0);
                current = tree.successor(handle);
            }
            prop_assert_eq!(seen, sorted);
        }
    }
}

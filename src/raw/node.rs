use super::arena::Arena;
use super::handle::Handle;
use crate::Key;
use crate::value_list::ValueList;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

// BST vertex. `left`/`right` own their subtrees (the raw tree frees them);
// `parent` is only ever used to climb.
#[derive(Clone)]
pub(crate) struct Node<V> {
    key: Key,
    values: ValueList<V>,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<V> Node<V> {
    /// Creates a detached node holding one payload.
    pub(crate) fn new(key: Key, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            values: ValueList::with_item(value),
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> Key {
        self.key
    }

    #[inline]
    pub(crate) fn values(&self) -> &ValueList<V> {
        &self.values
    }

    #[inline]
    pub(crate) fn values_mut(&mut self) -> &mut ValueList<V> {
        &mut self.values
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the slot holding `child`, if `child` is one of this node's children.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// The child to descend into when looking for `key`, or `None` on a match.
    #[inline]
    pub(crate) fn direction(&self, key: Key) -> Option<Side> {
        match key.cmp(&self.key) {
            core::cmp::Ordering::Less => Some(Side::Left),
            core::cmp::Ordering::Greater => Some(Side::Right),
            core::cmp::Ordering::Equal => None,
        }
    }

    /// The sole child of a node with at most one child.
    ///
    /// Left wins if, contrary to the caller's expectation, both are present.
    pub(crate) fn only_child(&self) -> Option<Handle> {
        self.left.or(self.right)
    }

    /// Overwrites key and payloads, returning the payloads that were replaced.
    ///
    /// Links are untouched; the caller is responsible for ordering.
    pub(crate) fn replace_entry(&mut self, key: Key, values: ValueList<V>) -> ValueList<V> {
        self.key = key;
        core::mem::replace(&mut self.values, values)
    }

    pub(crate) fn into_entry(self) -> (Key, ValueList<V>) {
        (self.key, self.values)
    }
}

/// Follows `left` links from `start` to the smallest key of that subtree.
pub(crate) fn leftmost<V>(nodes: &Arena<Node<V>>, start: Handle) -> Handle {
    let mut current = start;
    while let Some(left) = nodes.get(current).left() {
        current = left;
    }
    current
}

/// Follows `right` links from `start` to the largest key of that subtree.
pub(crate) fn rightmost<V>(nodes: &Arena<Node<V>>, start: Handle) -> Handle {
    let mut current = start;
    while let Some(right) = nodes.get(current).right() {
        current = right;
    }
    current
}

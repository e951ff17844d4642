use core::fmt;
use core::iter::FusedIterator;

use crate::Key;
use crate::error::{Error, Result};
use crate::raw::{Arena, Handle, Node, RawLinkedTree, leftmost};

/// A resumable, non-recursive walk over the keys of a [`LinkedTree`](crate::LinkedTree).
///
/// A cursor holds only a position in the tree. Each call to
/// [`next_key`](KeyCursor::next_key) yields the key at that position and moves it
/// using the tree's child and parent links, so a traversal can be paused and
/// resumed at any point without an explicit stack.
///
/// Every cursor is also an [`Iterator`], which is usually the more convenient way
/// to drive one.
pub trait KeyCursor {
    /// Returns `true` if [`next_key`](KeyCursor::next_key) would yield a key.
    ///
    /// Never moves the cursor.
    fn has_next(&self) -> bool;

    /// Yields the current key and advances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IterationExhausted`] once the traversal is complete.
    fn next_key(&mut self) -> Result<Key>;
}

/// Preorder cursor: each node before its left subtree, then its right subtree.
///
/// This `struct` is created by [`LinkedTree::preorder`](crate::LinkedTree::preorder).
///
/// # Examples
///
/// ```
/// use linked_tree::{KeyCursor, LinkedTree};
///
/// let tree: LinkedTree<()> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
/// let mut cursor = tree.preorder();
///
/// assert_eq!(cursor.next_key(), Ok(2));
/// assert_eq!(cursor.next_key(), Ok(1));
/// assert!(cursor.has_next());
/// assert_eq!(cursor.next_key(), Ok(3));
/// assert!(!cursor.has_next());
/// assert!(cursor.next_key().is_err());
/// ```
pub struct Preorder<'a, V> {
    nodes: &'a Arena<Node<V>>,
    next: Option<Handle>,
}

/// Inorder cursor: keys in ascending order.
///
/// This `struct` is created by [`LinkedTree::inorder`](crate::LinkedTree::inorder).
///
/// # Examples
///
/// ```
/// use linked_tree::LinkedTree;
///
/// let tree: LinkedTree<()> = [(5, ()), (2, ()), (8, ()), (3, ())].into_iter().collect();
/// assert_eq!(tree.inorder().collect::<Vec<_>>(), [2, 3, 5, 8]);
/// ```
pub struct Inorder<'a, V> {
    nodes: &'a Arena<Node<V>>,
    next: Option<Handle>,
}

impl<'a, V> Preorder<'a, V> {
    pub(crate) fn new(raw: &'a RawLinkedTree<V>) -> Self {
        Self {
            nodes: raw.nodes(),
            next: raw.root(),
        }
    }

    /// The preorder successor of `current`.
    ///
    /// Children come first. From a leaf, climb until reaching an ancestor whose
    /// right child exists and is not the node just climbed out of.
    fn successor(&self, current: Handle) -> Option<Handle> {
        let node = self.nodes.get(current);
        if let Some(next) = node.left().or(node.right()) {
            return Some(next);
        }

        let mut child = current;
        let mut parent = node.parent();
        while let Some(p) = parent {
            let parent_node = self.nodes.get(p);
            match parent_node.right() {
                Some(right) if right != child => return Some(right),
                _ => {
                    child = p;
                    parent = parent_node.parent();
                }
            }
        }
        None
    }
}

impl<'a, V> Inorder<'a, V> {
    pub(crate) fn new(raw: &'a RawLinkedTree<V>) -> Self {
        Self {
            nodes: raw.nodes(),
            next: raw.min(),
        }
    }

    /// The inorder successor of `current`.
    ///
    /// Either the leftmost node of the right subtree, or the first ancestor
    /// reached by climbing out of a left subtree.
    fn successor(&self, current: Handle) -> Option<Handle> {
        let node = self.nodes.get(current);
        if let Some(right) = node.right() {
            return Some(leftmost(self.nodes, right));
        }

        let mut child = current;
        let mut parent = node.parent();
        while let Some(p) = parent {
            let parent_node = self.nodes.get(p);
            if parent_node.right() != Some(child) {
                return Some(p);
            }
            child = p;
            parent = parent_node.parent();
        }
        None
    }

    /// Advances past the current node and returns it.
    pub(crate) fn next_handle(&mut self) -> Option<Handle> {
        let current = self.next?;
        self.next = self.successor(current);
        Some(current)
    }

    pub(crate) fn nodes(&self) -> &'a Arena<Node<V>> {
        self.nodes
    }
}

impl<V> KeyCursor for Preorder<'_, V> {
    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn next_key(&mut self) -> Result<Key> {
        let current = self.next.ok_or(Error::IterationExhausted)?;
        self.next = self.successor(current);
        Ok(self.nodes.get(current).key())
    }
}

impl<V> KeyCursor for Inorder<'_, V> {
    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn next_key(&mut self) -> Result<Key> {
        let current = self.next_handle().ok_or(Error::IterationExhausted)?;
        Ok(self.nodes.get(current).key())
    }
}

impl<V> Iterator for Preorder<'_, V> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        self.next_key().ok()
    }
}

impl<V> Iterator for Inorder<'_, V> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        self.next_key().ok()
    }
}

impl<V> FusedIterator for Preorder<'_, V> {}

impl<V> FusedIterator for Inorder<'_, V> {}

impl<V> Clone for Preorder<'_, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
        }
    }
}

impl<V> Clone for Inorder<'_, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
        }
    }
}

impl<V> fmt::Debug for Preorder<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preorder").field("next", &self.next.map(|h| self.nodes.get(h).key())).finish()
    }
}

impl<V> fmt::Debug for Inorder<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inorder").field("next", &self.next.map(|h| self.nodes.get(h).key())).finish()
    }
}

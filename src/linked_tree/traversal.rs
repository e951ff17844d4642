use alloc::collections::VecDeque;
use core::fmt;
use core::iter::FusedIterator;

use crate::Key;
use crate::raw::{Arena, Handle, Node, RawLinkedTree};

/// The four orders in which a tree's keys can be listed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Traversal {
    /// Node, then left subtree, then right subtree.
    Preorder,
    /// Left subtree, node, right subtree: ascending keys.
    Inorder,
    /// Left subtree, right subtree, then node.
    Postorder,
    /// Breadth first, shallowest level first, left to right within a level.
    LevelOrder,
}

/// Postorder iterator over keys.
///
/// Walks parent links like the cursors do, so it needs neither recursion nor a
/// stack and is safe on degenerate trees of any height.
///
/// This `struct` is created by [`LinkedTree::postorder`](crate::LinkedTree::postorder).
pub struct Postorder<'a, V> {
    nodes: &'a Arena<Node<V>>,
    next: Option<Handle>,
}

impl<'a, V> Postorder<'a, V> {
    pub(crate) fn new(raw: &'a RawLinkedTree<V>) -> Self {
        Self {
            nodes: raw.nodes(),
            next: raw.root().map(|root| first_in_postorder(raw.nodes(), root)),
        }
    }

    fn successor(&self, current: Handle) -> Option<Handle> {
        let parent = self.nodes.get(current).parent()?;
        let parent_node = self.nodes.get(parent);
        match parent_node.right() {
            Some(right) if parent_node.left() == Some(current) => Some(first_in_postorder(self.nodes, right)),
            _ => Some(parent),
        }
    }
}

// Deepest node reached by preferring left, then right: the first postorder visit.
fn first_in_postorder<V>(nodes: &Arena<Node<V>>, start: Handle) -> Handle {
    let mut current = start;
    loop {
        let node = nodes.get(current);
        match node.left().or(node.right()) {
            Some(child) => current = child,
            None => return current,
        }
    }
}

impl<V> Iterator for Postorder<'_, V> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        let current = self.next?;
        self.next = self.successor(current);
        Some(self.nodes.get(current).key())
    }
}

impl<V> FusedIterator for Postorder<'_, V> {}

impl<V> Clone for Postorder<'_, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
        }
    }
}

impl<V> fmt::Debug for Postorder<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Postorder").field("next", &self.next.map(|h| self.nodes.get(h).key())).finish()
    }
}

/// Level-order iterator yielding `(depth, key)` pairs.
///
/// Depths never decrease; a larger depth than the previous item marks the start
/// of a new level.
///
/// This `struct` is created by [`LinkedTree::level_order`](crate::LinkedTree::level_order).
///
/// # Examples
///
/// ```
/// use linked_tree::LinkedTree;
///
/// let tree: LinkedTree<()> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
/// assert_eq!(tree.level_order().collect::<Vec<_>>(), [(0, 2), (1, 1), (1, 3)]);
/// ```
pub struct LevelOrder<'a, V> {
    nodes: &'a Arena<Node<V>>,
    queue: VecDeque<(Handle, usize)>,
}

impl<'a, V> LevelOrder<'a, V> {
    pub(crate) fn new(raw: &'a RawLinkedTree<V>) -> Self {
        let mut queue = VecDeque::new();
        if let Some(root) = raw.root() {
            queue.push_back((root, 0));
        }
        Self {
            nodes: raw.nodes(),
            queue,
        }
    }
}

impl<V> Iterator for LevelOrder<'_, V> {
    type Item = (usize, Key);

    fn next(&mut self) -> Option<Self::Item> {
        let (handle, depth) = self.queue.pop_front()?;
        let node = self.nodes.get(handle);
        for child in [node.left(), node.right()].into_iter().flatten() {
            self.queue.push_back((child, depth + 1));
        }
        Some((depth, node.key()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), None)
    }
}

impl<V> FusedIterator for LevelOrder<'_, V> {}

impl<V> Clone for LevelOrder<'_, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            queue: self.queue.clone(),
        }
    }
}

impl<V> fmt::Debug for LevelOrder<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelOrder").field("pending", &self.queue.len()).finish()
    }
}

/// Writes `keys` separated by single spaces.
pub(crate) fn write_flat<W: fmt::Write>(out: &mut W, keys: impl Iterator<Item = Key>) -> fmt::Result {
    for (i, key) in keys.enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        write!(out, "{key}")?;
    }
    Ok(())
}

/// Writes one line per level, keys within a level separated by single spaces.
pub(crate) fn write_levels<W: fmt::Write>(out: &mut W, items: impl Iterator<Item = (usize, Key)>) -> fmt::Result {
    let mut level = None;
    for (depth, key) in items {
        match level {
            None => {}
            Some(current) if depth > current => out.write_char('\n')?,
            Some(_) => out.write_char(' ')?,
        }
        level = Some(depth);
        write!(out, "{key}")?;
    }
    Ok(())
}

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::Key;
use crate::error::{Error, Result};
use crate::raw::RawLinkedTree;
use crate::value_list::ValueList;

mod capacity;
mod cursor;
mod traversal;

pub use cursor::{Inorder, KeyCursor, Preorder};
pub use traversal::{LevelOrder, Postorder, Traversal};

/// An ordered multimap from `i64` keys to lists of payloads, stored as an
/// unbalanced binary search tree.
///
/// Each key owns one node and every payload ever inserted under it, newest first.
/// Nodes carry a link to their parent as well as their children, which lets the
/// [`preorder`](LinkedTree::preorder), [`inorder`](LinkedTree::inorder) and
/// [`postorder`](LinkedTree::postorder) iterators walk the tree one step at a time
/// without recursion or an auxiliary stack.
///
/// The tree never rebalances. Keys inserted in sorted order produce a chain, and
/// every operation is O(height). Only the recursive visitors
/// ([`for_each_preorder`](LinkedTree::for_each_preorder) and friends),
/// [`depth`](LinkedTree::depth) and [`sum_evens`](LinkedTree::sum_evens) recurse.
/// Prefer the iterators and [`depth_iter`](LinkedTree::depth_iter) on trees that
/// may be very tall.
///
/// # Examples
///
/// ```
/// use linked_tree::LinkedTree;
///
/// let mut tree = LinkedTree::new();
/// for key in [37, 26, 42, 13, 35, 56, 30, 47, 70] {
///     tree.insert(key, format!("data for key {key}"));
/// }
///
/// assert_eq!(tree.depth(13), Some(2));
/// assert_eq!(tree.depth(50), None);
/// assert_eq!(tree.inorder().collect::<Vec<_>>(), [13, 26, 30, 35, 37, 42, 47, 56, 70]);
///
/// tree.insert(13, "more data".to_string());
/// let list = tree.search(13).unwrap();
/// assert_eq!(list.first().map(String::as_str), Some("more data"));
/// assert_eq!(list.len(), 2);
///
/// assert_eq!(tree.delete_max(), Some(70));
/// assert_eq!(tree.to_string(), "37\n26 42\n13 35 56\n30 47");
/// ```
pub struct LinkedTree<V> {
    raw: RawLinkedTree<V>,
}

impl<V> LinkedTree<V> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        LinkedTree {
            raw: RawLinkedTree::new(),
        }
    }

    /// Builds a tree from parallel key and value sequences.
    ///
    /// Pairs are inserted in order, so a repeated key collects its values newest
    /// first just as repeated [`insert`](LinkedTree::insert) calls would.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] without building anything if the two
    /// sequences differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_tree::{Error, LinkedTree};
    ///
    /// let tree = LinkedTree::from_parallel(&[2, 1, 2], vec!["a", "b", "c"]).unwrap();
    /// assert_eq!(tree.search(2).unwrap().iter().copied().collect::<Vec<_>>(), ["c", "a"]);
    ///
    /// let err = LinkedTree::from_parallel(&[1, 2], vec!["a"]).unwrap_err();
    /// assert_eq!(err, Error::LengthMismatch { keys: 2, values: 1 });
    /// ```
    pub fn from_parallel(keys: &[Key], values: Vec<V>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut tree = Self::with_capacity(keys.len());
        for (&key, value) in keys.iter().zip(values) {
            tree.insert(key, value);
        }
        log::debug!("built tree of {} keys from {} pairs", tree.len(), keys.len());
        Ok(tree)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every key and payload.
    pub fn clear(&mut self) {
        log::debug!("clearing tree of {} keys", self.len());
        self.raw.clear();
    }

    /// Inserts `value` under `key`.
    ///
    /// If `key` is already present, `value` is added at the front of its list and
    /// the tree's shape does not change. Returns `true` if `key` was new.
    pub fn insert(&mut self, key: Key, value: V) -> bool {
        self.raw.insert(key, value)
    }

    /// Returns the payloads stored under `key`, newest first.
    #[must_use]
    pub fn search(&self, key: Key) -> Option<&ValueList<V>> {
        self.raw.search(key)
    }

    /// Inserts `value` at position `index` of the list stored under `key`.
    ///
    /// Index `0` is the same as [`insert`](LinkedTree::insert) on an existing key.
    /// Returns `None`, dropping `value`, if `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index` is past the end of the list.
    pub fn add_value(&mut self, key: Key, value: V, index: usize) -> Option<Result<()>> {
        self.raw.add_value(key, value, index)
    }

    /// Removes the payload at position `index` under `key`.
    ///
    /// Removing a key's last payload removes the key itself, exactly as
    /// [`delete`](LinkedTree::delete) would. Returns `None` if `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index` is not a valid position.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_tree::LinkedTree;
    ///
    /// let mut tree = LinkedTree::new();
    /// tree.insert(5, "old");
    /// tree.insert(5, "new");
    ///
    /// assert_eq!(tree.remove_value(5, 1), Some(Ok("old")));
    /// assert!(tree.contains_key(5));
    /// assert_eq!(tree.remove_value(5, 0), Some(Ok("new")));
    /// assert!(!tree.contains_key(5));
    /// assert_eq!(tree.remove_value(5, 0), None);
    /// ```
    pub fn remove_value(&mut self, key: Key, index: usize) -> Option<Result<V>> {
        self.raw.remove_value(key, index)
    }

    #[must_use]
    pub fn contains_key(&self, key: Key) -> bool {
        self.raw.find(key).is_some()
    }

    /// Removes `key` and returns all of its payloads.
    ///
    /// A key with two children is replaced by its in-order successor, the
    /// smallest key of its right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_tree::LinkedTree;
    ///
    /// let mut tree = LinkedTree::new();
    /// tree.insert(1, 'a');
    /// tree.insert(1, 'b');
    ///
    /// let removed = tree.delete(1).unwrap();
    /// assert_eq!(removed.into_iter().collect::<String>(), "ba");
    /// assert!(tree.delete(1).is_none());
    /// ```
    pub fn delete(&mut self, key: Key) -> Option<ValueList<V>> {
        self.raw.delete(key)
    }

    /// Removes the largest key and returns it.
    ///
    /// Returns `None` on an empty tree. A lone root leaves the tree empty, and a
    /// root without a right subtree hands the root position to its left child.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_tree::LinkedTree;
    ///
    /// let mut tree: LinkedTree<()> = [(7, ()), (3, ())].into_iter().collect();
    /// assert_eq!(tree.delete_max(), Some(7));
    /// assert_eq!(tree.delete_max(), Some(3));
    /// assert_eq!(tree.delete_max(), None);
    /// ```
    pub fn delete_max(&mut self) -> Option<Key> {
        self.raw.pop_max().map(|(key, _)| key)
    }

    /// Removes the largest key and returns it with its payloads.
    pub fn pop_max(&mut self) -> Option<(Key, ValueList<V>)> {
        self.raw.pop_max()
    }

    #[must_use]
    pub fn min_key(&self) -> Option<Key> {
        self.raw.min().map(|h| self.raw.node(h).key())
    }

    #[must_use]
    pub fn max_key(&self) -> Option<Key> {
        self.raw.max().map(|h| self.raw.node(h).key())
    }

    /// Returns the zero-based depth of `key`, or `None` if it is absent.
    ///
    /// Recurses once per level of the search path, so a chain of many thousands
    /// of keys can exhaust the stack. [`depth_iter`](LinkedTree::depth_iter) is the
    /// loop form.
    #[must_use]
    pub fn depth(&self, key: Key) -> Option<usize> {
        self.raw.depth_recursive(key)
    }

    /// Returns the same result as [`depth`](LinkedTree::depth) using a loop.
    #[must_use]
    pub fn depth_iter(&self, key: Key) -> Option<usize> {
        self.raw.depth_iterative(key)
    }

    /// Returns the depth of the deepest node, or `None` for an empty tree.
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.level_order().last().map(|(depth, _)| depth)
    }

    /// Returns the sum of all even keys, or `0` for an empty tree.
    ///
    /// Recurses over both subtrees of every node, so stack use grows with the
    /// height of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_tree::LinkedTree;
    ///
    /// let tree: LinkedTree<()> = [4, 1, 3, 6, 5, 2].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(tree.sum_evens(), 12);
    /// ```
    #[must_use]
    pub fn sum_evens(&self) -> i128 {
        self.raw.sum_evens()
    }

    /// Calls `f` with each key in preorder, recursing over the tree.
    pub fn for_each_preorder<F: FnMut(Key)>(&self, mut f: F) {
        self.raw.visit_preorder(self.raw.root(), &mut f);
    }

    /// Calls `f` with each key in ascending order, recursing over the tree.
    pub fn for_each_inorder<F: FnMut(Key)>(&self, mut f: F) {
        self.raw.visit_inorder(self.raw.root(), &mut f);
    }

    /// Calls `f` with each key in postorder, recursing over the tree.
    pub fn for_each_postorder<F: FnMut(Key)>(&self, mut f: F) {
        self.raw.visit_postorder(self.raw.root(), &mut f);
    }

    /// Returns a cursor over the keys in preorder.
    pub fn preorder(&self) -> Preorder<'_, V> {
        Preorder::new(&self.raw)
    }

    /// Returns a cursor over the keys in ascending order.
    pub fn inorder(&self) -> Inorder<'_, V> {
        Inorder::new(&self.raw)
    }

    /// Returns an iterator over the keys in postorder.
    pub fn postorder(&self) -> Postorder<'_, V> {
        Postorder::new(&self.raw)
    }

    /// Returns an iterator over `(depth, key)` in breadth-first order.
    pub fn level_order(&self) -> LevelOrder<'_, V> {
        LevelOrder::new(&self.raw)
    }

    /// Returns the keys grouped by depth, root level first.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_tree::LinkedTree;
    ///
    /// let tree: LinkedTree<()> = [5, 3, 8, 1].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(tree.levels(), vec![vec![5], vec![3, 8], vec![1]]);
    /// ```
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<Key>> {
        let mut levels: Vec<Vec<Key>> = Vec::new();
        for (depth, key) in self.level_order() {
            if depth == levels.len() {
                levels.push(Vec::new());
            }
            levels[depth].push(key);
        }
        levels
    }

    /// Writes the keys in the given order, separated by single spaces.
    ///
    /// [`Traversal::LevelOrder`] puts each level on its own line.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn write_keys<W: fmt::Write>(&self, order: Traversal, out: &mut W) -> fmt::Result {
        match order {
            Traversal::Preorder => traversal::write_flat(out, self.preorder()),
            Traversal::Inorder => traversal::write_flat(out, self.inorder()),
            Traversal::Postorder => traversal::write_flat(out, self.postorder()),
            Traversal::LevelOrder => traversal::write_levels(out, self.level_order()),
        }
    }

    /// Returns an iterator over `(key, payloads)` in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.inorder(),
            remaining: self.len(),
        }
    }
}

impl LinkedTree<String> {
    /// Inserts each key with the payload `"data for key {key}"`.
    ///
    /// Handy for building fixtures where only the shape of the tree matters.
    pub fn insert_keys(&mut self, keys: &[Key]) {
        for &key in keys {
            self.insert(key, alloc::format!("data for key {key}"));
        }
    }
}

/// An iterator over the entries of a [`LinkedTree`] in ascending key order.
///
/// This `struct` is created by the [`iter`](LinkedTree::iter) method.
pub struct Iter<'a, V> {
    inner: Inorder<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a ValueList<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.inner.next_handle()?;
        self.remaining -= 1;
        let node = self.inner.nodes().get(handle);
        Some((node.key(), node.values()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> IntoIterator for &'a LinkedTree<V> {
    type Item = (Key, &'a ValueList<V>);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V: Clone> Clone for LinkedTree<V> {
    fn clone(&self) -> Self {
        LinkedTree { raw: self.raw.clone() }
    }
}

impl<V> Default for LinkedTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for LinkedTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Writes the level-order form: one line per level.
impl<V> fmt::Display for LinkedTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_keys(Traversal::LevelOrder, f)
    }
}

impl<V> FromIterator<(Key, V)> for LinkedTree<V> {
    fn from_iter<I: IntoIterator<Item = (Key, V)>>(iter: I) -> Self {
        let mut tree = LinkedTree::new();
        tree.extend(iter);
        tree
    }
}

impl<V> Extend<(Key, V)> for LinkedTree<V> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V, const N: usize> From<[(Key, V); N]> for LinkedTree<V> {
    fn from(entries: [(Key, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

use super::arena::Arena;
use super::handle::Handle;
use super::node::{self, Node, Side};
use crate::Key;
use crate::error::Result;
use crate::value_list::ValueList;

/// The unbalanced BST backing `LinkedTree`.
///
/// Every mutation here keeps two things in step: the downward `left`/`right`
/// links that define the tree, and the upward `parent` links the cursors climb.
#[derive(Clone)]
pub(crate) struct RawLinkedTree<V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<V>>,
    /// The node with no parent, if the tree is non-empty.
    root: Option<Handle>,
}

impl<V> RawLinkedTree<V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Number of distinct keys.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<V>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<V> {
        self.nodes.get(handle)
    }

    /// Walks from the root to the node holding `key`.
    pub(crate) fn find(&self, key: Key) -> Option<Handle> {
        let mut trav = self.root;
        while let Some(handle) = trav {
            let node = self.nodes.get(handle);
            match node.direction(key) {
                None => return Some(handle),
                Some(side) => trav = node.child(side),
            }
        }
        None
    }

    pub(crate) fn search(&self, key: Key) -> Option<&ValueList<V>> {
        self.find(key).map(|h| self.nodes.get(h).values())
    }

    /// Inserts `value` at `index` in the list stored under `key`.
    ///
    /// Returns `None` if `key` is absent.
    pub(crate) fn add_value(&mut self, key: Key, value: V, index: usize) -> Option<Result<()>> {
        let handle = self.find(key)?;
        Some(self.nodes.get_mut(handle).values_mut().add_item(value, index))
    }

    /// Removes the payload at `index` under `key`.
    ///
    /// Taking the last payload removes the key's node as well, so no node is ever
    /// left with an empty list. Returns `None` if `key` is absent.
    pub(crate) fn remove_value(&mut self, key: Key, index: usize) -> Option<Result<V>> {
        let handle = self.find(key)?;
        let values = self.nodes.get_mut(handle).values_mut();
        let value = match values.remove_item(index) {
            Ok(value) => value,
            Err(err) => return Some(Err(err)),
        };
        if values.is_empty() {
            let (removed_key, _) = self.remove_node(handle);
            debug_assert_eq!(removed_key, key);
            log::trace!("removed key {key} with its last payload");
        }
        Some(Ok(value))
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing key gets `value` at the front of its list and the shape of the
    /// tree is unchanged. Otherwise a new leaf is attached below the last node
    /// visited. Returns `true` if a node was created.
    pub(crate) fn insert(&mut self, key: Key, value: V) -> bool {
        let mut parent: Option<(Handle, Side)> = None;
        let mut trav = self.root;

        while let Some(handle) = trav {
            let node = self.nodes.get_mut(handle);
            match node.direction(key) {
                None => {
                    node.values_mut().push_front(value);
                    return false;
                }
                Some(side) => {
                    parent = Some((handle, side));
                    trav = node.child(side);
                }
            }
        }

        let handle = self.nodes.alloc(Node::new(key, value, parent.map(|(p, _)| p)));
        match parent {
            None => self.root = Some(handle),
            Some((p, side)) => self.nodes.get_mut(p).set_child(side, Some(handle)),
        }
        log::trace!("attached key {key} at {handle:?} below {parent:?}");
        true
    }

    /// Removes `key`, returning every payload stored under it.
    pub(crate) fn delete(&mut self, key: Key) -> Option<ValueList<V>> {
        let target = self.find(key)?;
        let (removed_key, values) = self.remove_node(target);
        debug_assert_eq!(removed_key, key);
        Some(values)
    }

    /// Removes the node at `target` and returns its entry.
    ///
    /// With two children the in-order successor's entry is moved into `target`
    /// and the successor's own node is spliced out instead.
    fn remove_node(&mut self, target: Handle) -> (Key, ValueList<V>) {
        let node = self.nodes.get(target);
        let (Some(_), Some(right)) = (node.left(), node.right()) else {
            return self.splice_out(target).into_entry();
        };

        let (successor, successor_parent) = self.leftmost_with_parent(right, target);
        debug_assert_eq!(self.nodes.get(successor).parent(), Some(successor_parent));
        let (key, values) = self.splice_out(successor).into_entry();
        let target_node = self.nodes.get_mut(target);
        let removed_key = target_node.key();
        let removed = target_node.replace_entry(key, values);
        log::trace!("replaced key {removed_key} at {target:?} with successor {key}");
        (removed_key, removed)
    }

    /// Unlinks a node with at most one child, promoting that child into its place.
    fn splice_out(&mut self, handle: Handle) -> Node<V> {
        let node = self.nodes.get(handle);
        debug_assert!(node.left().is_none() || node.right().is_none(), "splice_out on a node with two children");
        let parent = node.parent();
        let child = node.only_child();

        match parent {
            None => self.root = child,
            Some(p) => {
                let parent_node = self.nodes.get_mut(p);
                let side = parent_node.side_of(handle).expect("`RawLinkedTree::splice_out()` - parent link is stale!");
                parent_node.set_child(side, child);
            }
        }
        if let Some(c) = child {
            self.nodes.get_mut(c).set_parent(parent);
        }

        log::trace!("spliced out {handle:?}, promoted {child:?} under {parent:?}");
        self.nodes.take(handle)
    }

    /// Descends `left` links from `start`, tracking the parent of each step.
    ///
    /// `start_parent` is the parent of `start`.
    fn leftmost_with_parent(&self, start: Handle, start_parent: Handle) -> (Handle, Handle) {
        let mut parent = start_parent;
        let mut current = start;
        while let Some(left) = self.nodes.get(current).left() {
            parent = current;
            current = left;
        }
        (current, parent)
    }

    pub(crate) fn min(&self) -> Option<Handle> {
        self.root.map(|root| node::leftmost(&self.nodes, root))
    }

    pub(crate) fn max(&self) -> Option<Handle> {
        self.root.map(|root| node::rightmost(&self.nodes, root))
    }

    /// Removes the largest key.
    ///
    /// The maximum never has a right child, so it is always a plain splice: its
    /// left subtree (if any) takes its place, which covers a lone root and a root
    /// with only a left subtree the same way as a deep maximum.
    pub(crate) fn pop_max(&mut self) -> Option<(Key, ValueList<V>)> {
        let max = self.max()?;
        let entry = self.splice_out(max).into_entry();
        log::trace!("removed maximum key {}", entry.0);
        Some(entry)
    }

    /// Depth of `key` by recursive descent.
    pub(crate) fn depth_recursive(&self, key: Key) -> Option<usize> {
        self.root.and_then(|root| self.depth_in(root, key))
    }

    fn depth_in(&self, handle: Handle, key: Key) -> Option<usize> {
        let node = self.nodes.get(handle);
        match node.direction(key) {
            None => Some(0),
            Some(side) => node.child(side).and_then(|child| self.depth_in(child, key)).map(|d| d + 1),
        }
    }

    /// Depth of `key` by walking the search path with a counter.
    pub(crate) fn depth_iterative(&self, key: Key) -> Option<usize> {
        let mut trav = self.root;
        let mut depth = 0;
        while let Some(handle) = trav {
            let node = self.nodes.get(handle);
            match node.direction(key) {
                None => return Some(depth),
                Some(side) => trav = node.child(side),
            }
            depth += 1;
        }
        None
    }

    pub(crate) fn sum_evens(&self) -> i128 {
        self.sum_evens_in(self.root)
    }

    fn sum_evens_in(&self, subtree: Option<Handle>) -> i128 {
        let Some(handle) = subtree else {
            return 0;
        };
        let node = self.nodes.get(handle);
        let left = self.sum_evens_in(node.left());
        let right = self.sum_evens_in(node.right());
        let own = if node.key() % 2 == 0 { i128::from(node.key()) } else { 0 };
        left + right + own
    }

    pub(crate) fn visit_preorder<F: FnMut(Key)>(&self, subtree: Option<Handle>, f: &mut F) {
        if let Some(handle) = subtree {
            let node = self.nodes.get(handle);
            f(node.key());
            self.visit_preorder(node.left(), f);
            self.visit_preorder(node.right(), f);
        }
    }

    pub(crate) fn visit_inorder<F: FnMut(Key)>(&self, subtree: Option<Handle>, f: &mut F) {
        if let Some(handle) = subtree {
            let node = self.nodes.get(handle);
            self.visit_inorder(node.left(), f);
            f(node.key());
            self.visit_inorder(node.right(), f);
        }
    }

    pub(crate) fn visit_postorder<F: FnMut(Key)>(&self, subtree: Option<Handle>, f: &mut F) {
        if let Some(handle) = subtree {
            let node = self.nodes.get(handle);
            self.visit_postorder(node.left(), f);
            self.visit_postorder(node.right(), f);
            f(node.key());
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::manual_assert, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use crate::error::Error;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<V> RawLinkedTree<V> {
        /// Checks ordering, parent links, key uniqueness, non-empty lists and the
        /// node count. Panics listing every violation found.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut reachable = 0;

            if let Some(root) = self.root {
                if let Some(parent) = self.nodes.get(root).parent() {
                    errors.push(alloc::format!("root {root:?} has parent {parent:?}"));
                }
                self.validate_subtree(root, None, None, &mut reachable, &mut errors);
            }

            if reachable != self.nodes.len() {
                errors.push(alloc::format!("arena holds {} nodes but {} are reachable", self.nodes.len(), reachable));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        fn validate_subtree(
            &self,
            handle: Handle,
            lower: Option<Key>,
            upper: Option<Key>,
            reachable: &mut usize,
            errors: &mut Vec<String>,
        ) {
            *reachable += 1;
            let node = self.nodes.get(handle);
            let key = node.key();

            if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
                errors.push(alloc::format!("key {key} at {handle:?} outside ({lower:?}, {upper:?})"));
            }
            if node.values().is_empty() {
                errors.push(alloc::format!("key {key} has an empty value list"));
            }

            for (child, lo, hi) in [(node.left(), lower, Some(key)), (node.right(), Some(key), upper)] {
                if let Some(child) = child {
                    let back = self.nodes.get(child).parent();
                    if back != Some(handle) {
                        errors.push(alloc::format!("child {child:?} of {handle:?} points back to {back:?}"));
                    }
                    self.validate_subtree(child, lo, hi, reachable, errors);
                }
            }
        }

        fn inorder_keys(&self) -> Vec<Key> {
            let mut keys = Vec::new();
            self.visit_inorder(self.root, &mut |k| keys.push(k));
            keys
        }

        fn preorder_keys(&self) -> Vec<Key> {
            let mut keys = Vec::new();
            self.visit_preorder(self.root, &mut |k| keys.push(k));
            keys
        }
    }

    fn tree_from(keys: &[Key]) -> RawLinkedTree<Key> {
        let mut tree = RawLinkedTree::new();
        for &k in keys {
            tree.insert(k, k * 10);
        }
        tree
    }

    const SAMPLE: [Key; 9] = [37, 26, 42, 13, 35, 56, 30, 47, 70];

    #[test]
    fn empty_tree_queries() {
        let mut tree: RawLinkedTree<i32> = RawLinkedTree::new();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.search(1), None);
        assert_eq!(tree.delete(1), None);
        assert_eq!(tree.pop_max().map(|(k, _)| k), None);
        assert_eq!(tree.depth_recursive(1), None);
        assert_eq!(tree.depth_iterative(1), None);
        assert_eq!(tree.sum_evens(), 0);
    }

    #[test]
    fn duplicate_insert_prepends_without_new_node() {
        let mut tree = RawLinkedTree::new();
        assert!(tree.insert(5, "first"));
        assert!(!tree.insert(5, "second"));
        assert_eq!(tree.len(), 1);
        let list = tree.search(5).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["second", "first"]);
        tree.validate_invariants();
    }

    #[test]
    fn insert_sets_parent_links() {
        let tree = tree_from(&SAMPLE);
        tree.validate_invariants();
        let thirty = tree.find(30).unwrap();
        let thirty_five = tree.find(35).unwrap();
        assert_eq!(tree.node(thirty).parent(), Some(thirty_five));
        assert_eq!(tree.node(thirty_five).left(), Some(thirty));
    }

    #[test]
    fn delete_leaf() {
        let mut tree = tree_from(&SAMPLE);
        assert_eq!(tree.delete(30).map(|l| l.into_iter().collect::<Vec<_>>()), Some(alloc::vec![300]));
        tree.validate_invariants();
        assert_eq!(tree.node(tree.find(35).unwrap()).left(), None);
        assert_eq!(tree.preorder_keys(), [37, 26, 13, 35, 42, 56, 47, 70]);
    }

    #[test]
    fn delete_with_one_child_promotes_it() {
        let mut tree = tree_from(&SAMPLE);
        // 42 has only a right child (56).
        tree.delete(42);
        tree.validate_invariants();
        let root = tree.root().unwrap();
        let fifty_six = tree.find(56).unwrap();
        assert_eq!(tree.node(root).right(), Some(fifty_six));
        assert_eq!(tree.node(fifty_six).parent(), Some(root));
    }

    #[test]
    fn delete_with_two_children_uses_right_minimum() {
        let mut tree = tree_from(&SAMPLE);
        let root = tree.root().unwrap();
        let removed = tree.delete(37).unwrap();
        assert_eq!(removed.first(), Some(&370));
        tree.validate_invariants();
        // 42 is the smallest key in the right subtree and moves into the root slot.
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.node(root).key(), 42);
        assert_eq!(tree.search(42).and_then(ValueList::first), Some(&420));
        assert_eq!(tree.preorder_keys(), [42, 26, 13, 35, 30, 56, 47, 70]);
    }

    #[test]
    fn delete_two_children_when_successor_is_right_child() {
        let mut tree = tree_from(&[50, 30, 70, 80]);
        tree.delete(50);
        tree.validate_invariants();
        assert_eq!(tree.preorder_keys(), [70, 30, 80]);
    }

    #[test]
    fn delete_two_children_with_successor_right_subtree() {
        // Successor 55 has a right child 57 that must be re-parented onto 60.
        let mut tree = tree_from(&[50, 30, 60, 55, 57, 70]);
        tree.delete(50);
        tree.validate_invariants();
        let fifty_seven = tree.find(57).unwrap();
        let sixty = tree.find(60).unwrap();
        assert_eq!(tree.node(fifty_seven).parent(), Some(sixty));
        assert_eq!(tree.preorder_keys(), [55, 30, 60, 57, 70]);
    }

    #[test]
    fn delete_root_with_single_child() {
        let mut tree = tree_from(&[10, 5, 2]);
        tree.delete(10);
        tree.validate_invariants();
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).key(), 5);
        assert_eq!(tree.node(root).parent(), None);
    }

    #[test]
    fn pop_max_boundaries() {
        let mut single = tree_from(&[7]);
        assert_eq!(single.pop_max().map(|(k, _)| k), Some(7));
        assert!(single.is_empty());
        single.validate_invariants();

        let mut left_only = tree_from(&[7, 3, 1, 5]);
        assert_eq!(left_only.pop_max().map(|(k, _)| k), Some(7));
        left_only.validate_invariants();
        let root = left_only.root().unwrap();
        assert_eq!(left_only.node(root).key(), 3);
        assert_eq!(left_only.node(root).parent(), None);

        let mut deep = tree_from(&[10, 20, 30, 25, 22]);
        assert_eq!(deep.pop_max().map(|(k, _)| k), Some(30));
        deep.validate_invariants();
        assert_eq!(deep.preorder_keys(), [10, 20, 25, 22]);
    }

    #[test]
    fn depth_and_sum_on_sample() {
        let tree = tree_from(&SAMPLE);
        assert_eq!(tree.depth_recursive(13), Some(2));
        assert_eq!(tree.depth_iterative(37), Some(0));
        assert_eq!(tree.depth_iterative(47), Some(3));
        assert_eq!(tree.depth_recursive(50), None);
        assert_eq!(tree_from(&[4, 1, 3, 6, 5, 2]).sum_evens(), 12);
        assert_eq!(tree_from(&[-4, -3, 0]).sum_evens(), -4);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut tree = tree_from(&SAMPLE);
        let before = tree.capacity();
        for &k in &SAMPLE {
            tree.delete(k);
            tree.validate_invariants();
        }
        assert!(tree.is_empty());
        for &k in SAMPLE.iter().rev() {
            tree.insert(k, k);
        }
        tree.validate_invariants();
        assert_eq!(tree.capacity(), before);
    }

    #[test]
    fn removing_last_value_removes_leaf() {
        let mut tree = RawLinkedTree::new();
        tree.insert(5, "only");
        assert_eq!(tree.remove_value(5, 0), Some(Ok("only")));
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.search(5), None);
        assert_eq!(tree.delete(5), None);
    }

    #[test]
    fn removing_last_value_of_inner_node_splices_it() {
        let mut tree = tree_from(&SAMPLE);
        tree.insert(42, 421);
        assert_eq!(tree.remove_value(42, 1), Some(Ok(420)));
        assert_eq!(tree.len(), SAMPLE.len());
        assert_eq!(tree.remove_value(42, 0), Some(Ok(421)));
        tree.validate_invariants();
        assert_eq!(tree.len(), SAMPLE.len() - 1);
        assert_eq!(tree.find(42), None);

        // 26 has two children, so its successor moves into its slot.
        assert_eq!(tree.remove_value(26, 0), Some(Ok(260)));
        tree.validate_invariants();
        assert_eq!(tree.preorder_keys(), [37, 30, 13, 35, 56, 47, 70]);
    }

    #[test]
    fn value_index_errors_leave_tree_unchanged() {
        let mut tree = tree_from(&SAMPLE);
        assert_eq!(tree.remove_value(13, 1), Some(Err(Error::IndexOutOfBounds { index: 1, len: 1 })));
        assert_eq!(tree.add_value(13, 7, 2), Some(Err(Error::IndexOutOfBounds { index: 2, len: 1 })));
        assert_eq!(tree.remove_value(99, 0), None);
        assert_eq!(tree.add_value(99, 7, 0), None);
        tree.validate_invariants();
        assert_eq!(tree.len(), SAMPLE.len());
        assert_eq!(tree.add_value(13, 7, 1), Some(Ok(())));
        assert_eq!(tree.search(13).unwrap().iter().copied().collect::<Vec<_>>(), [130, 7]);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(Key, u32),
        Delete(Key),
        PopMax,
        RemoveValue(Key, usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (-200i64..200, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            3 => (-200i64..200).prop_map(Op::Delete),
            1 => Just(Op::PopMax),
            2 => (-200i64..200, 0usize..3).prop_map(|(k, i)| Op::RemoveValue(k, i)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawLinkedTree<u32> = RawLinkedTree::new();
            let mut model: BTreeMap<Key, Vec<u32>> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(k, v) => {
                        let created = tree.insert(k, v);
                        let entry = model.entry(k).or_default();
                        prop_assert_eq!(created, entry.is_empty());
                        entry.insert(0, v);
                    }
                    Op::Delete(k) => {
                        let removed = tree.delete(k).map(|l| l.into_iter().collect::<Vec<_>>());
                        prop_assert_eq!(removed, model.remove(&k));
                    }
                    Op::PopMax => {
                        let removed = tree.pop_max().map(|(k, l)| (k, l.into_iter().collect::<Vec<_>>()));
                        prop_assert_eq!(removed, model.pop_last());
                    }
                    Op::RemoveValue(k, i) => {
                        let removed = tree.remove_value(k, i).map(|r| r.ok());
                        let expected = model.get_mut(&k).map(|list| (i < list.len()).then(|| list.remove(i)));
                        if model.get(&k).is_some_and(Vec::is_empty) {
                            model.remove(&k);
                        }
                        prop_assert_eq!(removed, expected);
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            prop_assert_eq!(tree.inorder_keys(), model.keys().copied().collect::<Vec<_>>());
        }

        #[test]
        fn depth_variants_agree(keys in prop::collection::vec(-100i64..100, 0..120), lookups in prop::collection::vec(-120i64..120, 1..40)) {
            let tree = tree_from(&keys);
            for lookup in lookups {
                prop_assert_eq!(tree.depth_recursive(lookup), tree.depth_iterative(lookup));
                prop_assert_eq!(tree.depth_iterative(lookup).is_some(), keys.contains(&lookup));
            }
        }

        #[test]
        fn sum_evens_matches_filter(keys in prop::collection::vec(any::<i64>(), 0..100)) {
            let tree = tree_from(&keys.iter().map(|k| k / 16).collect::<Vec<_>>());
            let mut distinct: Vec<Key> = keys.iter().map(|k| k / 16).collect();
            distinct.sort_unstable();
            distinct.dedup();
            let expected: i128 = distinct.iter().filter(|k| *k % 2 == 0).map(|&k| i128::from(k)).sum();
            prop_assert_eq!(tree.sum_evens(), expected);
        }
    }
}

use super::LinkedTree;
use crate::raw::RawLinkedTree;

impl<V> LinkedTree<V> {
    /// Creates an empty tree with room for at least `capacity` distinct keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_tree::LinkedTree;
    ///
    /// let tree: LinkedTree<&str> = LinkedTree::with_capacity(32);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        LinkedTree {
            raw: RawLinkedTree::with_capacity(capacity),
        }
    }

    /// Returns how many distinct keys the tree can hold before reallocating.
    ///
    /// Payloads stored under an existing key do not count against this.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more distinct keys.
    ///
    /// Slots freed by earlier deletions count toward the reservation.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Releases unused node storage.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}

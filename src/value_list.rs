use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// The ordered list of payloads stored under a single key.
///
/// A tree creates the list with one item when a key is first inserted; every later
/// insert of the same key adds its payload at the front, so the list reads newest
/// first. Most keys only ever hold a single payload, which is kept inline.
///
/// # Examples
///
/// ```
/// use linked_tree::ValueList;
///
/// let mut list = ValueList::with_item("b");
/// list.add_item("a", 0).unwrap();
/// list.add_item("c", 2).unwrap();
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
/// assert!(list.add_item("z", 9).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ValueList<V> {
    items: SmallVec<[V; 1]>,
}

impl<V> ValueList<V> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self { items: SmallVec::new() }
    }

    /// Creates a list holding just `value`.
    #[must_use]
    pub fn with_item(value: V) -> Self {
        let mut items = SmallVec::new();
        items.push(value);
        Self { items }
    }

    /// Inserts `value` so that it ends up at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index > self.len()`; the list is
    /// left unchanged.
    pub fn add_item(&mut self, value: V, index: usize) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, value);
        Ok(())
    }

    /// Removes and returns the payload at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= self.len()`.
    pub fn remove_item(&mut self, index: usize) -> Result<V> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&V> {
        self.items.get(index)
    }

    /// The most recently inserted payload.
    #[must_use]
    pub fn first(&self) -> Option<&V> {
        self.items.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates payloads front to back.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.items.iter(),
        }
    }

    pub(crate) fn push_front(&mut self, value: V) {
        self.items.insert(0, value);
    }
}

impl<V> Default for ValueList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for ValueList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<V> FromIterator<V> for ValueList<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Borrowing iterator over a [`ValueList`].
#[derive(Clone)]
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// Owning iterator over a [`ValueList`].
pub struct IntoIter<V> {
    inner: smallvec::IntoIter<[V; 1]>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for ValueList<V> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            inner: self.items.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a ValueList<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node slot in the arena.
///
/// Stored off-by-one in a `NonZero` so `Option<Handle>` costs nothing extra. Every
/// `left`, `right` and `parent` link in the tree is one of these.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest slot index a handle can address.
    pub(crate) const MAX: usize = RawHandle::MAX as usize - 1;

    /// Encodes slot `index`.
    ///
    /// # Panics
    ///
    /// If `index > Handle::MAX`.
    pub(crate) fn from_index(index: usize) -> Self {
        index
            .checked_add(1)
            .and_then(|slot| RawHandle::try_from(slot).ok())
            .and_then(NonZero::new)
            .map_or_else(|| panic!("`Handle::from_index()` - slot {index} is past `Handle::MAX`!"), Self)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

/// Trace output names the slot, not the encoded value.
impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

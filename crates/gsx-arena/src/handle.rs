//! Mixture handles.
//!
//! A [`MixtureHandle`] names one slot of a [`RecycleBin`](crate::RecycleBin).
//! It is generation-scoped: the `generation` field allows O(1) staleness
//! checks without a lookup table.

use std::fmt;

/// Location of a mixture inside a recycle bin.
///
/// Handles are cheap to copy and carry no borrow, so the engine can hold
/// one while mutating other parts of its cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct MixtureHandle {
    /// Bin generation when this mixture was stored.
    pub(crate) generation: u32,
    /// Slot index within that generation.
    pub(crate) index: u32,
}

impl MixtureHandle {
    pub(crate) fn new(generation: u32, index: u32) -> Self {
        Self { generation, index }
    }

    /// The bin generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Slot index within the generation.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for MixtureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MixtureHandle(gen={}, idx={})", self.generation, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trip() {
        let h = MixtureHandle::new(42, 7);
        assert_eq!(h.generation(), 42);
        assert_eq!(h.index(), 7);
    }

    #[test]
    fn display_includes_generation() {
        let h = MixtureHandle::new(3, 1);
        assert_eq!(h.to_string(), "MixtureHandle(gen=3, idx=1)");
    }
}

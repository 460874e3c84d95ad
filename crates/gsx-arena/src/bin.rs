//! The append-only mixture arena.

use gsx_core::MultiComponentState;

use crate::config::RecycleBinConfig;
use crate::error::ArenaError;
use crate::handle::MixtureHandle;

/// Append-only store of intermediate mixtures for one extrapolation call.
///
/// Mixtures are moved in with [`push`](Self::push) and addressed by the
/// returned [`MixtureHandle`]. Nothing is removed individually; the whole
/// bin is emptied by [`clear`](Self::clear), which also bumps the
/// generation so that every outstanding handle becomes stale. The backing
/// `Vec` is reused across calls.
#[derive(Debug)]
pub struct RecycleBin {
    slots: Vec<MultiComponentState>,
    generation: u32,
}

impl RecycleBin {
    /// Create an empty bin with the configured reserved capacity.
    pub fn new(config: &RecycleBinConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            generation: 0,
        }
    }

    /// Store a mixture and return its handle.
    pub fn push(&mut self, state: MultiComponentState) -> MixtureHandle {
        let index = self.slots.len() as u32;
        self.slots.push(state);
        MixtureHandle::new(self.generation, index)
    }

    /// Resolve a handle.
    pub fn get(&self, handle: MixtureHandle) -> Result<&MultiComponentState, ArenaError> {
        if handle.generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: handle.generation,
                current: self.generation,
            });
        }
        self.slots
            .get(handle.index as usize)
            .ok_or(ArenaError::OutOfRange {
                index: handle.index,
                len: self.slots.len(),
            })
    }

    /// The most recently stored mixture.
    pub fn last(&self) -> Option<&MultiComponentState> {
        self.slots.last()
    }

    /// Drop every stored mixture and invalidate all handles.
    ///
    /// Keeps the backing allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of stored mixtures.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the bin holds nothing.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current generation.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Reserved slot capacity.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}

impl Default for RecycleBin {
    fn default() -> Self {
        Self::new(&RecycleBinConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsx_core::{SurfaceId, TrackParameters, Vector3};
    use proptest::prelude::*;

    fn state(x: f64) -> MultiComponentState {
        MultiComponentState::single(
            TrackParameters::new(
                Vector3::new(x, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                1.0,
                SurfaceId(0),
            )
            .unwrap(),
        )
    }

    #[test]
    fn push_then_get() {
        let mut bin = RecycleBin::default();
        let a = bin.push(state(1.0));
        let b = bin.push(state(2.0));
        assert_eq!(bin.get(a).unwrap().leading().unwrap().position().x, 1.0);
        assert_eq!(bin.get(b).unwrap().leading().unwrap().position().x, 2.0);
        assert_eq!(bin.len(), 2);
    }

    #[test]
    fn earlier_handles_survive_later_pushes() {
        let mut bin = RecycleBin::default();
        let first = bin.push(state(1.0));
        for i in 0..100 {
            let _ = bin.push(state(i as f64));
        }
        assert_eq!(bin.get(first).unwrap().leading().unwrap().position().x, 1.0);
    }

    #[test]
    fn clear_makes_handles_stale() {
        let mut bin = RecycleBin::default();
        let h = bin.push(state(1.0));
        bin.clear();
        assert!(bin.is_empty());
        assert_eq!(
            bin.get(h),
            Err(ArenaError::StaleHandle {
                handle_generation: 0,
                current: 1
            })
        );
    }

    #[test]
    fn stale_handle_not_confused_with_new_slot() {
        let mut bin = RecycleBin::default();
        let old = bin.push(state(1.0));
        bin.clear();
        let new = bin.push(state(2.0));
        assert_eq!(old.index(), new.index());
        assert!(bin.get(old).is_err());
        assert!(bin.get(new).is_ok());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut bin = RecycleBin::new(&RecycleBinConfig {
            initial_capacity: 4,
        });
        for i in 0..32 {
            let _ = bin.push(state(i as f64));
        }
        let cap = bin.capacity();
        bin.clear();
        assert_eq!(bin.capacity(), cap);
    }

    proptest! {
        #[test]
        fn handles_resolve_to_their_own_state(n in 1usize..64) {
            let mut bin = RecycleBin::default();
            let handles: Vec<_> = (0..n).map(|i| bin.push(state(i as f64))).collect();
            for (i, h) in handles.iter().enumerate() {
                let x = bin.get(*h).unwrap().leading().unwrap().position().x;
                prop_assert_eq!(x, i as f64);
            }
        }
    }
}

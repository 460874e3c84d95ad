//! Caller-owned scratch memory for material updates.
//!
//! The engine's cache owns one [`MaterialEffectsScratch`] and hands it to
//! the material updater on every call. The updater resets the bump
//! pointer at the start of each update, so nothing persists between
//! layers.

/// Bump-allocated `f64` scratch region.
///
/// Grows on demand and never shrinks, so steady-state updates do no heap
/// allocation.
#[derive(Debug)]
pub struct MaterialEffectsScratch {
    buf: Vec<f64>,
    offset: usize,
}

impl MaterialEffectsScratch {
    /// Default capacity in `f64` slots: room for per-component factors of a
    /// 12-component mixture with headroom.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a scratch region with `capacity` `f64` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity],
            offset: 0,
        }
    }

    /// Allocate `count` contiguous zeroed slots.
    ///
    /// Returns `None` only if the length computation overflows.
    pub fn alloc(&mut self, count: usize) -> Option<&mut [f64]> {
        let new_offset = self.offset.checked_add(count)?;
        if new_offset > self.buf.len() {
            let new_cap = self
                .buf
                .len()
                .max(Self::DEFAULT_CAPACITY)
                .max(new_offset)
                .checked_mul(2)
                .unwrap_or(new_offset);
            self.buf.resize(new_cap, 0.0);
        }
        let start = self.offset;
        self.offset = new_offset;
        let slice = &mut self.buf[start..new_offset];
        slice.fill(0.0);
        Some(slice)
    }

    /// Reset the bump pointer.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Total capacity in `f64` slots.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Slots used since the last reset.
    pub fn used(&self) -> usize {
        self.offset
    }
}

impl Default for MaterialEffectsScratch {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_zeroed_slice() {
        let mut s = MaterialEffectsScratch::new(16);
        let a = s.alloc(4).unwrap();
        assert_eq!(a.len(), 4);
        assert!(a.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn reset_clears_stale_values() {
        let mut s = MaterialEffectsScratch::new(16);
        s.alloc(4).unwrap().fill(7.0);
        s.reset();
        assert_eq!(s.used(), 0);
        assert!(s.alloc(4).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn grows_beyond_initial_capacity() {
        let mut s = MaterialEffectsScratch::new(2);
        let a = s.alloc(100).unwrap();
        assert_eq!(a.len(), 100);
        assert!(s.capacity() >= 100);
    }

    #[test]
    fn sequential_allocs_advance() {
        let mut s = MaterialEffectsScratch::new(16);
        s.alloc(3).unwrap();
        s.alloc(5).unwrap();
        assert_eq!(s.used(), 8);
    }

    mod proptests {
        use crate::scratch::MaterialEffectsScratch;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn used_tracks_every_alloc(
                initial in 0usize..64,
                sizes in prop::collection::vec(0usize..200, 0..12),
            ) {
                let mut s = MaterialEffectsScratch::new(initial);
                let mut total = 0;
                for &n in &sizes {
                    let slice = s.alloc(n).unwrap();
                    prop_assert_eq!(slice.len(), n);
                    prop_assert!(slice.iter().all(|&v| v == 0.0));
                    slice.fill(1.0);
                    total += n;
                    prop_assert_eq!(s.used(), total);
                    prop_assert!(s.capacity() >= total);
                }
                s.reset();
                prop_assert_eq!(s.used(), 0);
            }
        }
    }
}

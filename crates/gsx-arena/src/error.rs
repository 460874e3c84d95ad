//! Recycle-bin error types.

use thiserror::Error;

/// Errors from resolving a [`MixtureHandle`](crate::MixtureHandle).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The handle was issued before the bin was last cleared.
    #[error("stale handle: generation {handle_generation}, current {current}")]
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: u32,
        /// The bin's current generation.
        current: u32,
    },
    /// The handle's index is beyond the bin's length.
    ///
    /// Only reachable with a handle from a different bin.
    #[error("handle index {index} out of range for bin of length {len}")]
    OutOfRange {
        /// The requested slot.
        index: u32,
        /// Number of stored mixtures.
        len: usize,
    },
}

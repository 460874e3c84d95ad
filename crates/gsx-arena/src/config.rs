//! Recycle-bin configuration.

/// Sizing for a [`RecycleBin`](crate::RecycleBin).
#[derive(Clone, Debug)]
pub struct RecycleBinConfig {
    /// Number of mixture slots reserved up front.
    ///
    /// Default: 16, enough for a barrel-to-calorimeter extrapolation
    /// (a handful of boundary steps, each storing at most three states)
    /// without reallocating.
    pub initial_capacity: usize,
}

impl RecycleBinConfig {
    /// Default reserved slot count.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
}

impl Default for RecycleBinConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
        }
    }
}

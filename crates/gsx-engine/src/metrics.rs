//! Per-cache extrapolation counters.
//!
//! [`ExtrapolationMetrics`] lives in the [`Cache`](crate::Cache) and
//! accumulates over every call made with that cache until
//! [`Cache::reset_metrics`](crate::Cache::reset_metrics).

/// Cumulative counters for one cache.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtrapolationMetrics {
    /// Calls that entered the navigated path.
    pub navigated_calls: u64,
    /// Calls answered by direct propagation without navigation
    /// (non-interacting particles).
    pub direct_calls: u64,
    /// Navigated calls that fell back to direct propagation.
    pub fallbacks: u64,
    /// Volume boundaries crossed.
    pub boundary_steps: u64,
    /// Propagations onto intermediate material layers.
    pub intermediate_layer_steps: u64,
    /// Material updates that changed the state.
    pub material_updates: u64,
    /// Boundary walks abandoned because the volumes oscillated.
    pub oscillation_aborts: u64,
    /// Boundary walks abandoned because the distance to the destination grew.
    pub distance_aborts: u64,
    /// Boundary walks abandoned at `max_volume_steps` crossings.
    pub step_limit_aborts: u64,
    /// Layer walks stopped by the visited-layer guard.
    pub cycle_breaks: u64,
    /// Volume or layer lookups answered by the recall entry.
    pub recall_hits: u64,
}

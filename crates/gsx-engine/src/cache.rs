//! Caller-owned, call-scoped extrapolation state.

use gsx_arena::{ArenaError, MixtureHandle, RecycleBin, RecycleBinConfig};
use gsx_core::{LayerId, MultiComponentState, SurfaceId, TrackParameters, VolumeId};
use gsx_propagator::MaterialEffectsScratch;

use crate::metrics::ExtrapolationMetrics;

/// One-entry memo of the last destination lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recall {
    /// The destination surface.
    pub surface: SurfaceId,
    /// The layer associated with it.
    pub layer: LayerId,
    /// The volume the destination was reached in.
    pub volume: VolumeId,
}

/// Result of the most recent boundary step.
#[derive(Clone, Debug, Default)]
pub(crate) struct BoundaryState {
    /// Mixture reached by the step; `None` means the step's input.
    pub(crate) state_at_boundary: Option<MixtureHandle>,
    /// Parameters on the crossed boundary, material included.
    pub(crate) navigation_parameters: Option<TrackParameters>,
    /// The volume beyond the boundary.
    pub(crate) tracking_volume: Option<VolumeId>,
}

/// Mutable scratch handed to the walking steps, borrowed out of a
/// [`Cache`] alongside its recycle bin.
pub(crate) struct StepContext<'a> {
    pub(crate) material: &'a mut MaterialEffectsScratch,
    pub(crate) metrics: &'a mut ExtrapolationMetrics,
}

/// Scratch state for [`Extrapolator::extrapolate`](crate::Extrapolator::extrapolate).
///
/// A cache is owned by one caller (typically one per thread) and passed to
/// every navigated call. Within a call it holds the intermediate mixtures
/// produced at volume boundaries, the last boundary crossing and the
/// material scratch region. All of that is cleared when the call returns;
/// only the recall entry and the metrics survive between calls.
///
/// ```
/// use gsx_engine::Cache;
///
/// let mut cache = Cache::new();
/// assert!(cache.recall().is_none());
/// assert_eq!(cache.recycled_states(), 0);
/// cache.reset_recall();
/// ```
#[derive(Debug)]
pub struct Cache {
    pub(crate) recycle_bin: RecycleBin,
    pub(crate) boundary: BoundaryState,
    pub(crate) recall: Option<Recall>,
    pub(crate) material: MaterialEffectsScratch,
    pub(crate) metrics: ExtrapolationMetrics,
}

impl Cache {
    /// A fresh cache with default arena sizing.
    pub fn new() -> Self {
        Self::with_config(&RecycleBinConfig::default())
    }

    /// A fresh cache with explicit arena sizing.
    pub fn with_config(config: &RecycleBinConfig) -> Self {
        Self {
            recycle_bin: RecycleBin::new(config),
            boundary: BoundaryState::default(),
            recall: None,
            material: MaterialEffectsScratch::default(),
            metrics: ExtrapolationMetrics::default(),
        }
    }

    /// The recall entry, if one is held.
    pub fn recall(&self) -> Option<Recall> {
        self.recall
    }

    /// Forget the recall entry.
    pub fn reset_recall(&mut self) {
        self.recall = None;
    }

    /// Counters accumulated since creation or the last reset.
    pub fn metrics(&self) -> &ExtrapolationMetrics {
        &self.metrics
    }

    /// Zero all counters.
    pub fn reset_metrics(&mut self) {
        self.metrics = ExtrapolationMetrics::default();
    }

    /// Mixtures currently held in the recycle bin. Zero between calls.
    pub fn recycled_states(&self) -> usize {
        self.recycle_bin.len()
    }

    /// The volume found beyond the last boundary. `None` between calls.
    pub fn boundary_volume(&self) -> Option<VolumeId> {
        self.boundary.tracking_volume
    }

    /// Drop all call-scoped state, keeping the recall entry and metrics.
    pub(crate) fn clear_call_state(&mut self) {
        self.recycle_bin.clear();
        self.boundary = BoundaryState::default();
        self.material.reset();
    }

    /// Split into the recycle bin and the step context.
    pub(crate) fn parts(&mut self) -> (&mut RecycleBin, StepContext<'_>) {
        (
            &mut self.recycle_bin,
            StepContext {
                material: &mut self.material,
                metrics: &mut self.metrics,
            },
        )
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

/// The mixture a step works on: the call's input or a binned
/// intermediate.
pub(crate) fn resolve<'a>(
    bin: &'a RecycleBin,
    input: &'a MultiComponentState,
    slot: Option<MixtureHandle>,
) -> Result<&'a MultiComponentState, ArenaError> {
    match slot {
        Some(handle) => bin.get(handle),
        None => Ok(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsx_core::Vector3;

    fn state() -> MultiComponentState {
        MultiComponentState::single(
            TrackParameters::new(Vector3::zeros(), Vector3::x(), 1.0, SurfaceId(1)).unwrap(),
        )
    }

    #[test]
    fn clear_keeps_recall_and_metrics() {
        let mut cache = Cache::new();
        let _ = cache.recycle_bin.push(state());
        cache.recall = Some(Recall {
            surface: SurfaceId(1),
            layer: LayerId(2),
            volume: VolumeId(3),
        });
        cache.metrics.navigated_calls = 4;
        cache.boundary.tracking_volume = Some(VolumeId(5));
        cache.clear_call_state();
        assert_eq!(cache.recycled_states(), 0);
        assert_eq!(cache.boundary_volume(), None);
        assert!(cache.recall().is_some());
        assert_eq!(cache.metrics().navigated_calls, 4);
        cache.reset_metrics();
        assert_eq!(cache.metrics().navigated_calls, 0);
    }

    #[test]
    fn resolve_reads_input_or_bin() {
        let mut cache = Cache::new();
        let input = state();
        let mut binned = state();
        binned.clear();
        let handle = cache.recycle_bin.push(binned);
        assert_eq!(resolve(&cache.recycle_bin, &input, None).unwrap(), &input);
        assert!(resolve(&cache.recycle_bin, &input, Some(handle))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn handles_go_stale_after_clear() {
        let mut cache = Cache::new();
        let input = state();
        let handle = cache.recycle_bin.push(state());
        cache.clear_call_state();
        assert!(matches!(
            resolve(&cache.recycle_bin, &input, Some(handle)),
            Err(ArenaError::StaleHandle { .. })
        ));
    }
}

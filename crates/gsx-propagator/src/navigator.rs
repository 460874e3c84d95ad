//! The [`Navigator`] trait and its result type.

use gsx_core::{PropDirection, TrackParameters, Vector3, VolumeId};

use crate::field::FieldProperties;
use crate::propagator::Propagator;

/// Outcome of a boundary search.
///
/// Both fields are `None` when the track leaves the world or the boundary
/// cannot be reached.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationCell {
    /// The volume on the far side of the crossed boundary.
    pub next_volume: Option<VolumeId>,
    /// Parameters on the crossed boundary surface.
    pub parameters_on_boundary: Option<TrackParameters>,
}

impl NavigationCell {
    /// A cell for a successful crossing.
    pub fn new(next_volume: VolumeId, parameters_on_boundary: TrackParameters) -> Self {
        Self {
            next_volume: Some(next_volume),
            parameters_on_boundary: Some(parameters_on_boundary),
        }
    }

    /// The dead-end cell.
    pub fn dead_end() -> Self {
        Self::default()
    }
}

/// Finds volumes by position and the next volume across a boundary.
pub trait Navigator: Send + Sync {
    /// The innermost volume containing `position` (global search).
    fn volume(&self, position: &Vector3) -> Option<VolumeId>;

    /// The world volume.
    fn highest_volume(&self) -> Option<VolumeId>;

    /// Cross the nearest boundary of `current` in `direction`, using
    /// `propagator` to reach it.
    fn next_tracking_volume(
        &self,
        propagator: &dyn Propagator,
        parameters: &TrackParameters,
        direction: PropDirection,
        current: VolumeId,
        field: &FieldProperties,
    ) -> NavigationCell;
}

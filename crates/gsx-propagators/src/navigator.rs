//! Boundary navigation through nested cylindrical volumes.

use std::sync::Arc;

use gsx_core::{
    BoundaryCheck, ParticleHypothesis, PropDirection, SurfaceId, TrackParameters,
    TrackingGeometry, Vector3, VolumeId,
};
use gsx_geometry::Geometry;
use gsx_propagator::{FieldProperties, NavigationCell, Navigator, Propagator};
use tracing::trace;

/// Minimum path to a boundary so the surface just crossed is not found
/// again.
const MIN_BOUNDARY_PATH: f64 = 1e-6;

/// Step past a crossing used to look up the volume on the far side.
const VOLUME_PROBE_STEP: f64 = 1e-4;

/// Navigator over a [`Geometry`].
///
/// From a volume, the candidate boundaries are the volume's own covers and
/// the covers of its directly nested volumes. The nearest crossing in the
/// requested direction wins; [`PropDirection::Any`] navigates forward.
#[derive(Clone, Debug)]
pub struct BoundaryNavigator {
    geometry: Arc<Geometry>,
}

impl BoundaryNavigator {
    /// A navigator over `geometry`.
    pub fn new(geometry: Arc<Geometry>) -> Self {
        Self { geometry }
    }

    fn candidates(&self, volume: VolumeId) -> Vec<SurfaceId> {
        let mut out = self.geometry.boundary_surfaces(volume).to_vec();
        if let Some(v) = self.geometry.volume(volume) {
            for &child in v.children() {
                out.extend_from_slice(self.geometry.boundary_surfaces(child));
            }
        }
        out
    }

    /// The nearest boundary of `volume` ahead of `position`.
    fn nearest_boundary(
        &self,
        volume: VolumeId,
        position: &Vector3,
        direction: &Vector3,
        sense: PropDirection,
    ) -> Option<SurfaceId> {
        self.candidates(volume)
            .into_iter()
            .filter_map(|s| {
                self.geometry
                    .intersect(s, position, direction, sense, MIN_BOUNDARY_PATH, true)
                    .map(|hit| (s, hit.path_length.abs()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| s)
    }
}

impl Navigator for BoundaryNavigator {
    fn volume(&self, position: &Vector3) -> Option<VolumeId> {
        self.geometry.volume_at(position)
    }

    fn highest_volume(&self) -> Option<VolumeId> {
        self.geometry.highest_volume()
    }

    fn next_tracking_volume(
        &self,
        propagator: &dyn Propagator,
        parameters: &TrackParameters,
        direction: PropDirection,
        current: VolumeId,
        field: &FieldProperties,
    ) -> NavigationCell {
        let sense = if direction.is_resolved() {
            direction
        } else {
            PropDirection::Along
        };
        let dir = parameters.direction();
        let Some(boundary) = self.nearest_boundary(current, parameters.position(), &dir, sense)
        else {
            trace!(volume = %current, "no boundary ahead");
            return NavigationCell::dead_end();
        };
        let Some(on_boundary) = propagator.propagate_parameters(
            parameters,
            boundary,
            sense,
            BoundaryCheck::Checked,
            field,
            ParticleHypothesis::NonInteracting,
        ) else {
            trace!(volume = %current, surface = %boundary, "boundary unreachable");
            return NavigationCell::dead_end();
        };
        let probe = on_boundary.position() + dir * (sense.sign() * VOLUME_PROBE_STEP);
        match self.geometry.volume_at(&probe) {
            Some(next) => {
                trace!(from = %current, to = %next, surface = %boundary, "boundary crossed");
                NavigationCell::new(next, on_boundary)
            }
            None => {
                trace!(volume = %current, "left the world");
                NavigationCell::dead_end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StraightLinePropagator;
    use gsx_geometry::{GeometryBuilder, VolumeSpec};

    struct Setup {
        nav: BoundaryNavigator,
        prop: StraightLinePropagator,
        world: VolumeId,
        inner: VolumeId,
        shell: VolumeId,
    }

    fn setup() -> Setup {
        let mut b = GeometryBuilder::new();
        let world = b
            .add_volume(VolumeSpec::tube("world", 0.0, 1000.0, -1000.0, 1000.0))
            .unwrap();
        let inner = b
            .add_volume(VolumeSpec::tube("inner", 0.0, 100.0, -200.0, 200.0).inside(world))
            .unwrap();
        let shell = b
            .add_volume(VolumeSpec::tube("shell", 100.0, 300.0, -200.0, 200.0).inside(world))
            .unwrap();
        let g = Arc::new(b.build().unwrap());
        Setup {
            nav: BoundaryNavigator::new(Arc::clone(&g)),
            prop: StraightLinePropagator::new(g),
            world,
            inner,
            shell,
        }
    }

    fn params(x: f64, px: f64) -> TrackParameters {
        TrackParameters::new(
            Vector3::new(x, 0.0, 0.0),
            Vector3::new(px, 0.0, 0.0),
            1.0,
            SurfaceId(u32::MAX),
        )
        .unwrap()
    }

    #[test]
    fn crosses_from_inner_into_shell() {
        let s = setup();
        let cell = s.nav.next_tracking_volume(
            &s.prop,
            &params(10.0, 1.0),
            PropDirection::Along,
            s.inner,
            &FieldProperties::default(),
        );
        assert_eq!(cell.next_volume, Some(s.shell));
        let on = cell.parameters_on_boundary.unwrap();
        assert!((on.perp() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn shell_exits_into_world_then_world_exits() {
        let s = setup();
        let field = FieldProperties::default();
        let cell = s.nav.next_tracking_volume(
            &s.prop,
            &params(150.0, 1.0),
            PropDirection::Along,
            s.shell,
            &field,
        );
        assert_eq!(cell.next_volume, Some(s.world));
        let on = cell.parameters_on_boundary.unwrap();
        let out = s
            .nav
            .next_tracking_volume(&s.prop, &on, PropDirection::Along, s.world, &field);
        assert_eq!(out, NavigationCell::dead_end());
    }

    #[test]
    fn opposite_walks_inwards() {
        let s = setup();
        let cell = s.nav.next_tracking_volume(
            &s.prop,
            &params(150.0, 1.0),
            PropDirection::Opposite,
            s.shell,
            &FieldProperties::default(),
        );
        assert_eq!(cell.next_volume, Some(s.inner));
    }

    #[test]
    fn world_sees_nested_boundaries() {
        let s = setup();
        let cell = s.nav.next_tracking_volume(
            &s.prop,
            &params(500.0, -1.0),
            PropDirection::Along,
            s.world,
            &FieldProperties::default(),
        );
        assert_eq!(cell.next_volume, Some(s.shell));
        assert_eq!(s.nav.volume(&Vector3::new(50.0, 0.0, 0.0)), Some(s.inner));
        assert_eq!(s.nav.highest_volume(), Some(s.world));
    }
}

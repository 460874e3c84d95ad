//! Field-free straight-line transport.

use std::sync::Arc;

use gsx_core::{BoundaryCheck, ParticleHypothesis, PropDirection, SurfaceId, TrackParameters};
use gsx_geometry::Geometry;
use gsx_propagator::{FieldProperties, Propagator};

/// Numerical slack for a start point that already lies on the target.
const ON_SURFACE_SLACK: f64 = 1e-9;

/// Minimum path to leave the surface the parameters are expressed on.
const LEAVE_SURFACE_PATH: f64 = 1e-6;

/// Moves parameters along a straight line through the momentum direction.
///
/// Ignores the field configuration and the particle hypothesis. Momentum
/// and covariance are carried over unchanged. With
/// [`PropDirection::Along`] the track moves forward along its momentum,
/// with [`Opposite`](PropDirection::Opposite) backward, and with
/// [`Any`](PropDirection::Any) to the nearest crossing either way.
///
/// When the parameters are already expressed on the target surface, a
/// directed propagation looks for the *next* crossing of that surface
/// (a chord through a cylinder) rather than returning the start point.
#[derive(Clone, Debug)]
pub struct StraightLinePropagator {
    geometry: Arc<Geometry>,
}

impl StraightLinePropagator {
    /// A propagator over `geometry`.
    pub fn new(geometry: Arc<Geometry>) -> Self {
        Self { geometry }
    }
}

impl Propagator for StraightLinePropagator {
    fn name(&self) -> &str {
        "straight_line"
    }

    fn propagate_parameters(
        &self,
        parameters: &TrackParameters,
        surface: SurfaceId,
        direction: PropDirection,
        boundary_check: BoundaryCheck,
        _field: &FieldProperties,
        _particle: ParticleHypothesis,
    ) -> Option<TrackParameters> {
        let min_path = if parameters.associated_surface() == surface {
            LEAVE_SURFACE_PATH
        } else {
            -ON_SURFACE_SLACK
        };
        let hit = self.geometry.intersect(
            surface,
            parameters.position(),
            &parameters.direction(),
            direction,
            min_path,
            boundary_check.enabled(),
        )?;
        Some(parameters.on_surface(hit.position, surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsx_core::{TrackingGeometry, Vector3};
    use gsx_geometry::{GeometryBuilder, VolumeSpec};

    fn setup() -> (StraightLinePropagator, Arc<Geometry>, Vec<SurfaceId>) {
        let mut b = GeometryBuilder::new();
        let world = b
            .add_volume(VolumeSpec::tube("world", 0.0, 100.0, -100.0, 100.0))
            .unwrap();
        let layers: Vec<_> = [20.0, 40.0]
            .into_iter()
            .map(|r| b.add_cylinder_layer(world, r, 1.0, None).unwrap())
            .collect();
        let g = Arc::new(b.build().unwrap());
        let surfaces = layers
            .iter()
            .map(|&l| g.layer_surface(l).unwrap())
            .collect();
        (StraightLinePropagator::new(Arc::clone(&g)), g, surfaces)
    }

    fn params_at(x: f64, surface: SurfaceId) -> TrackParameters {
        TrackParameters::new(
            Vector3::new(x, 0.0, 0.0),
            Vector3::new(1000.0, 0.0, 0.0),
            -1.0,
            surface,
        )
        .unwrap()
    }

    fn run(
        p: &StraightLinePropagator,
        params: &TrackParameters,
        target: SurfaceId,
        dir: PropDirection,
    ) -> Option<TrackParameters> {
        p.propagate_parameters(
            params,
            target,
            dir,
            BoundaryCheck::Checked,
            &FieldProperties::default(),
            ParticleHypothesis::Electron,
        )
    }

    #[test]
    fn along_reaches_outer_layer() {
        let (p, _, s) = setup();
        let out = run(&p, &params_at(20.0, s[0]), s[1], PropDirection::Along).unwrap();
        assert_eq!(out.associated_surface(), s[1]);
        assert!((out.position().x - 40.0).abs() < 1e-9);
        assert_eq!(out.p(), 1000.0);
    }

    #[test]
    fn opposite_moves_backwards() {
        let (p, _, s) = setup();
        let out = run(&p, &params_at(40.0, s[1]), s[0], PropDirection::Opposite).unwrap();
        assert!((out.position().x - 20.0).abs() < 1e-9);
        assert!(run(&p, &params_at(40.0, s[1]), s[0], PropDirection::Along).is_none());
    }

    #[test]
    fn along_rejects_crossings_behind() {
        let (p, _, s) = setup();
        let start = params_at(30.0, SurfaceId(999));
        assert!(run(&p, &start, s[0], PropDirection::Along).is_none());
        let back = run(&p, &start, s[0], PropDirection::Opposite).unwrap();
        assert!((back.position().x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn own_surface_finds_the_far_crossing() {
        let (p, _, s) = setup();
        let out = run(&p, &params_at(-20.0, s[0]), s[0], PropDirection::Along).unwrap();
        assert!((out.position().x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn any_takes_nearest_crossing() {
        let (p, _, s) = setup();
        let out = run(&p, &params_at(25.0, SurfaceId(999)), s[0], PropDirection::Any).unwrap();
        assert!((out.position().x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn already_on_target_stays_with_any() {
        let (p, _, s) = setup();
        let start = params_at(20.0, s[0]);
        let out = run(&p, &start, s[0], PropDirection::Any).unwrap();
        assert_eq!(out.position(), start.position());
    }
}

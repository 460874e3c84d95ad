//! The [`Propagator`] trait.

use gsx_core::{
    BoundaryCheck, Component, MultiComponentState, ParticleHypothesis, PropDirection, SurfaceId,
    TrackParameters,
};

use crate::field::FieldProperties;

/// Moves track parameters onto a target surface.
///
/// # Contract
///
/// - Results are expressed on exactly the requested `surface`.
/// - Failure is `None` (single) or an empty mixture (multi), never a panic.
/// - `&self`: propagators are stateless and shared between threads.
///
/// # Examples
///
/// A propagator that "teleports" parameters to the surface origin:
///
/// ```
/// use gsx_core::{BoundaryCheck, ParticleHypothesis, PropDirection, SurfaceId, TrackParameters, Vector3};
/// use gsx_propagator::{FieldProperties, Propagator};
///
/// struct Teleport;
///
/// impl Propagator for Teleport {
///     fn name(&self) -> &str { "teleport" }
///
///     fn propagate_parameters(
///         &self,
///         parameters: &TrackParameters,
///         surface: SurfaceId,
///         _direction: PropDirection,
///         _boundary_check: BoundaryCheck,
///         _field: &FieldProperties,
///         _particle: ParticleHypothesis,
///     ) -> Option<TrackParameters> {
///         Some(parameters.on_surface(Vector3::zeros(), surface))
///     }
/// }
///
/// let start = TrackParameters::new(Vector3::x(), Vector3::x(), 1.0, SurfaceId(0)).unwrap();
/// let end = Teleport
///     .propagate_parameters(
///         &start,
///         SurfaceId(5),
///         PropDirection::Along,
///         BoundaryCheck::Checked,
///         &FieldProperties::default(),
///         ParticleHypothesis::Electron,
///     )
///     .unwrap();
/// assert_eq!(end.associated_surface(), SurfaceId(5));
/// ```
pub trait Propagator: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Propagate a single parameter set onto `surface`.
    fn propagate_parameters(
        &self,
        parameters: &TrackParameters,
        surface: SurfaceId,
        direction: PropDirection,
        boundary_check: BoundaryCheck,
        field: &FieldProperties,
        particle: ParticleHypothesis,
    ) -> Option<TrackParameters>;

    /// Propagate every component of a mixture onto `surface`.
    ///
    /// Default: components are propagated independently; those that fail
    /// are dropped and the survivors are rescaled to the input's total
    /// weight. Returns an empty mixture if no component survives.
    fn multi_state_propagate(
        &self,
        state: &MultiComponentState,
        surface: SurfaceId,
        field: &FieldProperties,
        direction: PropDirection,
        boundary_check: BoundaryCheck,
        particle: ParticleHypothesis,
    ) -> MultiComponentState {
        let mut out: MultiComponentState = state
            .iter()
            .filter_map(|c| {
                self.propagate_parameters(
                    &c.parameters,
                    surface,
                    direction,
                    boundary_check,
                    field,
                    particle,
                )
                .map(|p| Component::new(p, c.weight))
            })
            .collect();
        if !out.is_empty() && out.len() != state.len() {
            out.renormalise(state.total_weight());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsx_core::Vector3;

    /// Fails for components whose x position is negative.
    struct RejectNegativeX;

    impl Propagator for RejectNegativeX {
        fn name(&self) -> &str {
            "reject_negative_x"
        }

        fn propagate_parameters(
            &self,
            parameters: &TrackParameters,
            surface: SurfaceId,
            _direction: PropDirection,
            _boundary_check: BoundaryCheck,
            _field: &FieldProperties,
            _particle: ParticleHypothesis,
        ) -> Option<TrackParameters> {
            (parameters.position().x >= 0.0)
                .then(|| parameters.on_surface(*parameters.position(), surface))
        }
    }

    fn component(x: f64, weight: f64) -> Component {
        Component::new(
            TrackParameters::new(Vector3::new(x, 0.0, 0.0), Vector3::x(), 1.0, SurfaceId(0))
                .unwrap(),
            weight,
        )
    }

    fn propagate(state: &MultiComponentState) -> MultiComponentState {
        RejectNegativeX.multi_state_propagate(
            state,
            SurfaceId(1),
            &FieldProperties::default(),
            PropDirection::Along,
            BoundaryCheck::Checked,
            ParticleHypothesis::Electron,
        )
    }

    #[test]
    fn all_components_reach_surface() {
        let state: MultiComponentState = [component(1.0, 0.25), component(2.0, 0.75)]
            .into_iter()
            .collect();
        let out = propagate(&state);
        assert!(out.is_on_surface(SurfaceId(1)));
        assert_eq!(out.weights(), vec![0.25, 0.75]);
    }

    #[test]
    fn failed_components_are_dropped_and_weight_restored() {
        let state: MultiComponentState = [component(-1.0, 0.5), component(2.0, 0.25)]
            .into_iter()
            .collect();
        let out = propagate(&state);
        assert_eq!(out.len(), 1);
        assert!((out.total_weight() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn total_failure_is_empty() {
        let state: MultiComponentState = [component(-1.0, 1.0)].into_iter().collect();
        assert!(propagate(&state).is_empty());
    }
}

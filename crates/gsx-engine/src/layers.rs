//! Layer-to-layer walking inside one volume.

use gsx_core::{
    perp, BoundaryCheck, LayerId, MaterialUpdateMode, MultiComponentState, PropDirection,
    TrackParameters, VolumeId, TUBE_INNER_COVER,
};
use smallvec::SmallVec;
use tracing::trace;

use crate::cache::StepContext;
use crate::extrapolator::{Extrapolator, Request};

/// Distance assumed to the inner cover when it cannot be reached.
const UNREACHABLE_DISTANCE: f64 = 1e11;

/// Outcome of [`Extrapolator::walk_layers`].
#[derive(Debug)]
pub(crate) enum LayerWalk {
    /// At least one material layer was applied.
    Updated(MultiComponentState),
    /// No material layer was crossed; the input stands.
    Unchanged,
    /// The requested destination layer was never reached.
    Lost,
}

/// Sign of the radial motion of the leading component: `-1` inbound,
/// `1` outbound (or undetermined).
pub(crate) fn radial_direction(state: &MultiComponentState, direction: PropDirection) -> i32 {
    let Some(leading) = state.leading() else {
        return 1;
    };
    let r = leading.perp();
    let stepped =
        leading.position() + leading.direction() * (direction.geometric_sign() * 0.5 * r);
    if r > perp(&stepped) {
        -1
    } else {
        1
    }
}

/// Where a mixture stands relative to the layers of its volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StartLayer {
    /// On this layer, within half its thickness.
    On(LayerId),
    /// Not on a layer; this is the first one ahead.
    Ahead(LayerId),
}

impl StartLayer {
    /// The layer a walk starts from. Neither kind is updated on its own.
    pub(crate) fn layer(self) -> LayerId {
        match self {
            StartLayer::On(layer) | StartLayer::Ahead(layer) => layer,
        }
    }

    /// The layer the mixture already sits on, if any.
    pub(crate) fn on(self) -> Option<LayerId> {
        match self {
            StartLayer::On(layer) => Some(layer),
            StartLayer::Ahead(_) => None,
        }
    }
}

impl Extrapolator {
    /// The layer of `volume` that `parameters` sit on, else the first one
    /// ahead in the direction of travel.
    pub(crate) fn locate_layer(
        &self,
        volume: VolumeId,
        parameters: &TrackParameters,
        request: Request,
    ) -> Option<StartLayer> {
        if let Some(layer) = self.geometry.associated_layer(volume, parameters.position()) {
            return Some(StartLayer::On(layer));
        }
        self.geometry
            .next_layer_in_volume(volume, parameters.position(), &request.travel(parameters))
            .map(StartLayer::Ahead)
    }

    /// Walk from `start` through its neighbours, applying full material at
    /// every material layer, until `destination` (exclusive) or the end of
    /// the chain.
    ///
    /// A layer seen twice ends the walk. With a destination, ending anywhere
    /// other than at it is [`LayerWalk::Lost`].
    pub(crate) fn walk_layers(
        &self,
        ctx: &mut StepContext<'_>,
        state: &MultiComponentState,
        volume: VolumeId,
        start: LayerId,
        destination: Option<LayerId>,
        request: Request,
    ) -> LayerWalk {
        let Some(leading) = state.leading() else {
            return LayerWalk::Unchanged;
        };
        let mut visited: SmallVec<[LayerId; 8]> = SmallVec::new();
        visited.push(start);

        let mut current: Option<MultiComponentState> = None;
        let mut position = *leading.position();
        let mut travel = request.travel(leading);
        let mut next = self.geometry.next_layer(start, &position, &travel);
        let mut reached = destination.is_none();

        while let Some(layer) = next {
            if Some(layer) == destination {
                reached = true;
                break;
            }
            if visited.contains(&layer) {
                trace!(%layer, "layer chain cycles, walk stopped");
                ctx.metrics.cycle_breaks += 1;
                break;
            }
            visited.push(layer);

            if self.geometry.layer_has_material(layer) {
                let from = current.as_ref().unwrap_or(state);
                let updated =
                    self.extrapolate_to_intermediate_layer(ctx, from, volume, layer, request);
                if !updated.is_empty() {
                    current = Some(updated);
                }
            }

            let here = current.as_ref().unwrap_or(state);
            if let Some(parameters) = here.leading() {
                position = *parameters.position();
                travel = request.travel(parameters);
            }
            next = self.geometry.next_layer(layer, &position, &travel);
        }

        match (reached, current) {
            (false, _) => LayerWalk::Lost,
            (true, Some(updated)) => LayerWalk::Updated(updated),
            (true, None) => LayerWalk::Unchanged,
        }
    }

    /// Propagate onto an intermediate layer and apply its full material.
    ///
    /// Empty when the layer cannot be reached or the radial check rejects
    /// the crossing.
    pub(crate) fn extrapolate_to_intermediate_layer(
        &self,
        ctx: &mut StepContext<'_>,
        state: &MultiComponentState,
        volume: VolumeId,
        layer: LayerId,
        request: Request,
    ) -> MultiComponentState {
        let Some(surface) = self.geometry.layer_surface(layer) else {
            return MultiComponentState::new();
        };
        let propagated = self.propagator.multi_state_propagate(
            state,
            surface,
            &self.field,
            request.direction,
            BoundaryCheck::Checked,
            request.particle,
        );
        if propagated.is_empty() {
            return propagated;
        }

        if self.config.radial_check
            && radial_direction(state, request.direction)
                != radial_direction(&propagated, request.direction)
            && !self.radial_direction_check(state, &propagated, volume, request)
        {
            trace!(%layer, "radial direction flip rejected");
            return MultiComponentState::new();
        }

        let updated = self.material.update(
            ctx.material,
            &propagated,
            layer,
            request.direction,
            request.particle,
            MaterialUpdateMode::Full,
        );
        ctx.metrics.intermediate_layer_steps += 1;
        if updated.is_empty() {
            propagated
        } else {
            ctx.metrics.material_updates += 1;
            updated
        }
    }

    /// Whether a crossing that flipped radial direction is plausible: the
    /// layer must be closer than the volume's inner cover.
    ///
    /// Only tube volumes (four boundaries) are checked. This heuristic may
    /// reject valid crossings in geometries whose layer surfaces are proxy
    /// shapes.
    fn radial_direction_check(
        &self,
        start: &MultiComponentState,
        on_layer: &MultiComponentState,
        volume: VolumeId,
        request: Request,
    ) -> bool {
        let (Some(from), Some(to)) = (start.leading(), on_layer.leading()) else {
            return true;
        };
        let distance_to_layer = (from.position() - to.position()).norm();

        let boundaries = self.geometry.boundary_surfaces(volume);
        if boundaries.len() != TUBE_INNER_COVER + 1 {
            return true;
        }
        let distance_inside = self
            .propagator
            .propagate_parameters(
                from,
                boundaries[TUBE_INNER_COVER],
                request.direction,
                BoundaryCheck::Checked,
                &self.field,
                request.particle,
            )
            .map_or(UNREACHABLE_DISTANCE, |p| (from.position() - p.position()).norm());
        distance_to_layer < distance_inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsx_core::{SurfaceId, Vector3};

    fn at(position: Vector3, momentum: Vector3) -> MultiComponentState {
        MultiComponentState::single(
            TrackParameters::new(position, momentum, -1.0, SurfaceId(0)).unwrap(),
        )
    }

    #[test]
    fn outbound_track_is_positive() {
        let s = at(Vector3::new(10.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(radial_direction(&s, PropDirection::Along), 1);
    }

    #[test]
    fn inbound_track_is_negative() {
        let s = at(Vector3::new(10.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(radial_direction(&s, PropDirection::Along), -1);
    }

    #[test]
    fn opposite_reverses_the_sense() {
        let s = at(Vector3::new(10.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(radial_direction(&s, PropDirection::Opposite), -1);
    }

    #[test]
    fn tangential_track_counts_as_outbound() {
        let s = at(Vector3::new(10.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(radial_direction(&s, PropDirection::Along), 1);
    }

    #[test]
    fn empty_state_counts_as_outbound() {
        assert_eq!(
            radial_direction(&MultiComponentState::new(), PropDirection::Along),
            1
        );
    }
}

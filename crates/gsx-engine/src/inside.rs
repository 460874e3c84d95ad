//! The final step: from inside the destination volume onto the
//! destination surface.

use gsx_arena::MixtureHandle;
use gsx_core::{LayerId, MultiComponentState, PropDirection, VolumeId};
use tracing::trace;

use crate::cache::{resolve, Cache, Recall, StepContext};
use crate::extrapolator::{Abort, Extrapolator, Request};
use crate::layers::{LayerWalk, StartLayer};

impl Extrapolator {
    /// Carry the mixture in `slot` from inside `volume` onto the request's
    /// destination surface, applying material on the way.
    ///
    /// When the destination has a layer in this volume the mixture is
    /// walked layer by layer and the recall entry is refreshed; otherwise
    /// it is propagated straight onto the surface and the recall entry is
    /// dropped. A mixture on no layer walks from the first layer ahead
    /// without updating it, and that layer never suppresses the
    /// destination's pre-surface update. A walk that never meets the
    /// destination layer is an error;
    /// a final propagation that misses the surface is an empty `Ok`.
    pub(crate) fn extrapolate_inside_volume(
        &self,
        cache: &mut Cache,
        input: &MultiComponentState,
        slot: Option<MixtureHandle>,
        layer: Option<LayerId>,
        volume: VolumeId,
        request: Request,
    ) -> Result<MultiComponentState, Abort> {
        let destination_layer = match self.geometry.surface_layer(request.surface) {
            Some(layer) => Some(layer),
            None => match cache.recall {
                Some(recall) if recall.surface == request.surface => {
                    cache.metrics.recall_hits += 1;
                    Some(recall.layer)
                }
                _ => self
                    .geometry
                    .surface_reference_point(request.surface)
                    .and_then(|p| self.geometry.associated_layer(volume, &p)),
            },
        };

        let (bin, mut ctx) = cache.parts();
        let start = resolve(bin, input, slot)?;
        let leading = start.leading().ok_or(Abort::EmptyState)?;

        let mut owned: Option<MultiComponentState> = None;
        let start_layer = match layer {
            None if destination_layer.is_none() => None,
            None => self.locate_layer(volume, leading, request),
            Some(layer) => {
                if Some(layer) != destination_layer
                    && self.geometry.has_confined_layers(volume)
                    && self.geometry.layer_has_material(layer)
                {
                    let updated = self.material.post_update(
                        ctx.material,
                        start,
                        layer,
                        request.direction,
                        request.particle,
                    );
                    if !updated.is_empty() {
                        ctx.metrics.material_updates += 1;
                        owned = Some(updated);
                    }
                }
                Some(StartLayer::On(layer))
            }
        };

        let Some(destination_layer) = destination_layer else {
            let from = owned.as_ref().unwrap_or(start);
            let out = self.propagator.multi_state_propagate(
                from,
                request.surface,
                &self.field,
                request.direction,
                request.boundary_check,
                request.particle,
            );
            cache.recall = None;
            return Ok(out);
        };

        if let Some(associated) = start_layer
            .map(StartLayer::layer)
            .filter(|&l| l != destination_layer)
        {
            let from = owned.as_ref().unwrap_or(start);
            match self.walk_layers(
                &mut ctx,
                from,
                volume,
                associated,
                Some(destination_layer),
                request,
            ) {
                LayerWalk::Updated(updated) => owned = Some(updated),
                LayerWalk::Unchanged => {}
                LayerWalk::Lost => return Err(Abort::LayerNotReached(destination_layer)),
            }
        }

        let from = owned.as_ref().unwrap_or(start);
        let out = self.extrapolate_to_destination_layer(
            &mut ctx,
            from,
            destination_layer,
            start_layer.and_then(StartLayer::on),
            request,
        );
        cache.recall = Some(Recall {
            surface: request.surface,
            layer: destination_layer,
            volume,
        });
        Ok(out)
    }

    /// Propagate onto the destination surface and apply the pre-surface
    /// share of `layer`'s material.
    ///
    /// A mixture already on the layer (within half its thickness) that
    /// fails to reach the surface in the requested direction is retried in
    /// either direction. Starting on the destination layer itself applies
    /// no material, and neither does a layer without any.
    fn extrapolate_to_destination_layer(
        &self,
        ctx: &mut StepContext<'_>,
        state: &MultiComponentState,
        layer: LayerId,
        start_layer: Option<LayerId>,
        request: Request,
    ) -> MultiComponentState {
        let mut out = self.propagator.multi_state_propagate(
            state,
            request.surface,
            &self.field,
            request.direction,
            request.boundary_check,
            request.particle,
        );
        if out.is_empty() {
            let tolerance = 0.5 * self.geometry.layer_thickness(layer);
            let on_layer = state.leading().is_some_and(|p| {
                self.geometry
                    .is_on_surface(request.surface, p.position(), tolerance)
            });
            if on_layer {
                trace!(%layer, "retrying destination in either direction");
                out = self.propagator.multi_state_propagate(
                    state,
                    request.surface,
                    &self.field,
                    PropDirection::Any,
                    request.boundary_check,
                    request.particle,
                );
            }
        }
        if out.is_empty()
            || start_layer == Some(layer)
            || !self.geometry.layer_has_material(layer)
        {
            return out;
        }

        let updated = self.material.pre_update(
            ctx.material,
            &out,
            layer,
            request.direction,
            request.particle,
        );
        if updated.is_empty() {
            out
        } else {
            ctx.metrics.material_updates += 1;
            updated
        }
    }
}

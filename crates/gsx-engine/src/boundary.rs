//! One step from inside a volume to its exit boundary.

use gsx_arena::MixtureHandle;
use gsx_core::{BoundaryCheck, LayerId, MultiComponentState, VolumeId};
use tracing::trace;

use crate::cache::{resolve, BoundaryState, Cache};
use crate::extrapolator::{Abort, Extrapolator, Request};
use crate::layers::{LayerWalk, StartLayer};

impl Extrapolator {
    /// Carry the mixture in `slot` through the remaining layers of
    /// `volume` and across its exit boundary.
    ///
    /// `layer` is the layer the mixture starts on, if known; it is treated
    /// as already crossed and only its post-surface material is applied.
    /// Without it the walk starts from the layer under or ahead of the
    /// mixture, with no update there.
    ///
    /// On return `cache.boundary` holds the mixture at the boundary, the
    /// parameters on it and the volume beyond. A dead end forgets the
    /// cache's recall entry.
    pub(crate) fn extrapolate_to_volume_boundary(
        &self,
        cache: &mut Cache,
        input: &MultiComponentState,
        slot: Option<MixtureHandle>,
        layer: Option<LayerId>,
        volume: VolumeId,
        request: Request,
    ) -> Result<(), Abort> {
        let mut slot = slot;
        let (bin, mut ctx) = cache.parts();

        let start = resolve(bin, input, slot)?;
        let leading = start.leading().ok_or(Abort::EmptyState)?;
        let layer = match layer {
            Some(layer) => {
                if self.geometry.has_confined_layers(volume)
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
                        slot = Some(bin.push(updated));
                    }
                }
                Some(layer)
            }
            None => self
                .locate_layer(volume, leading, request)
                .map(StartLayer::layer),
        };

        if let Some(layer) = layer {
            let current = resolve(bin, input, slot)?;
            match self.walk_layers(&mut ctx, current, volume, layer, None, request) {
                LayerWalk::Updated(updated) => slot = Some(bin.push(updated)),
                LayerWalk::Unchanged | LayerWalk::Lost => {}
            }
        }

        let current = resolve(bin, input, slot)?;
        let leading = current.leading().ok_or(Abort::EmptyState)?;
        let cell = self.navigator.next_tracking_volume(
            &*self.propagator,
            leading,
            request.direction,
            volume,
            &self.field,
        );
        let mut navigation_parameters = cell.parameters_on_boundary;

        if self.config.boundary_material_update && cell.next_volume.is_some() {
            let boundary_layer = navigation_parameters.as_ref().and_then(|p| {
                self.geometry
                    .surface_material_layer(p.associated_surface())
                    .filter(|&l| self.geometry.layer_has_material(l))
                    .map(|l| (p.associated_surface(), l))
            });
            if let Some((surface, boundary_layer)) = boundary_layer {
                let on_boundary = self.propagator.multi_state_propagate(
                    current,
                    surface,
                    &self.field,
                    request.direction,
                    BoundaryCheck::Unchecked,
                    request.particle,
                );
                if !on_boundary.is_empty() {
                    let updated = self.material.post_update(
                        ctx.material,
                        &on_boundary,
                        boundary_layer,
                        request.direction,
                        request.particle,
                    );
                    let stored = if updated.is_empty() {
                        on_boundary
                    } else {
                        ctx.metrics.material_updates += 1;
                        updated
                    };
                    trace!(%surface, layer = %boundary_layer, "boundary material applied");
                    navigation_parameters = stored.leading().cloned();
                    slot = Some(bin.push(stored));
                }
            }
        }

        if cell.next_volume.is_none() {
            cache.recall = None;
        }
        cache.boundary = BoundaryState {
            state_at_boundary: slot,
            navigation_parameters,
            tracking_volume: cell.next_volume,
        };
        Ok(())
    }
}

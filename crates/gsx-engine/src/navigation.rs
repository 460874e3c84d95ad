//! Start and destination resolution.

use gsx_core::{
    BoundaryCheck, LayerId, MultiComponentState, PropDirection, TrackParameters, VolumeId,
};
use tracing::{debug, trace};

use crate::cache::Cache;
use crate::extrapolator::{Abort, Extrapolator, Request};

/// Where a navigated call starts and where it must end.
#[derive(Debug)]
pub(crate) struct NavigationStart {
    pub(crate) volume: VolumeId,
    pub(crate) layer: Option<LayerId>,
    pub(crate) destination: VolumeId,
    /// Always resolved to along or opposite.
    pub(crate) direction: PropDirection,
    /// Trial parameters on the destination surface, if computed.
    pub(crate) reference: Option<TrackParameters>,
}

impl Extrapolator {
    /// Trial propagation of the leading parameters onto the destination,
    /// without bounds.
    fn trial_parameters(
        &self,
        leading: &TrackParameters,
        request: Request,
        direction: PropDirection,
    ) -> Option<TrackParameters> {
        self.propagator.propagate_parameters(
            leading,
            request.surface,
            direction,
            BoundaryCheck::Unchecked,
            &self.field,
            request.particle,
        )
    }

    /// Resolve the start volume and layer, the propagation direction and
    /// the destination volume.
    ///
    /// Volumes are looked up by surface association first, then through
    /// the cache's recall entry, then by a global position search. A failed
    /// recall on the start side forgets the recall entry.
    pub(crate) fn initialise_navigation(
        &self,
        cache: &mut Cache,
        input: &MultiComponentState,
        request: Request,
    ) -> Result<NavigationStart, Abort> {
        let leading = input.leading().ok_or(Abort::EmptyState)?;
        let associated = leading.associated_surface();

        let mut layer = self.geometry.surface_layer(associated);
        let mut volume = layer.and_then(|l| self.geometry.enclosing_volume(l));
        if volume.is_none() {
            match cache.recall {
                Some(recall) if recall.surface == associated => {
                    trace!(surface = %associated, "start volume from recall");
                    cache.metrics.recall_hits += 1;
                    volume = Some(recall.volume);
                    layer = Some(recall.layer);
                }
                _ => {
                    cache.recall = None;
                    volume = self.navigator.volume(leading.position());
                    layer = volume
                        .and_then(|v| self.geometry.associated_layer(v, leading.position()));
                }
            }
        }
        let volume = volume.ok_or(Abort::NoStartVolume)?;

        let mut direction = request.direction;
        let mut reference = None;
        if !direction.is_resolved() {
            reference = self.trial_parameters(leading, request, direction);
            if let Some(trial) = &reference {
                let displacement = trial.position() - leading.position();
                direction = if displacement.dot(leading.momentum()) > 0.0 {
                    PropDirection::Along
                } else {
                    PropDirection::Opposite
                };
                debug!(?direction, "direction resolved by trial propagation");
            }
        }
        if !direction.is_resolved() {
            return Err(Abort::UnresolvedDirection);
        }

        let associated_destination = self
            .geometry
            .surface_layer(request.surface)
            .and_then(|l| self.geometry.enclosing_volume(l));
        let destination = match associated_destination {
            Some(v) => v,
            None => {
                if reference.is_none() {
                    reference = self.trial_parameters(leading, request, direction);
                }
                match cache.recall {
                    Some(recall) if recall.surface == request.surface => {
                        trace!(surface = %request.surface, "destination volume from recall");
                        cache.metrics.recall_hits += 1;
                        recall.volume
                    }
                    _ => {
                        let probe = match &reference {
                            Some(trial) => Some(*trial.position()),
                            None => self.geometry.surface_reference_point(request.surface),
                        };
                        probe
                            .and_then(|p| self.navigator.volume(&p))
                            .ok_or(Abort::NoDestinationVolume)?
                    }
                }
            }
        };

        trace!(start = %volume, %destination, ?layer, "navigation initialised");
        Ok(NavigationStart {
            volume,
            layer,
            destination,
            direction,
            reference,
        })
    }
}

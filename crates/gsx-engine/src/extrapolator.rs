//! The [`Extrapolator`] and its entry points.

use std::sync::Arc;

use gsx_arena::{ArenaError, MixtureHandle};
use gsx_core::{
    BoundaryCheck, LayerId, MultiComponentState, ParticleHypothesis, PropDirection, SurfaceId,
    TrackParameters, TrackingGeometry, Vector3, VolumeId,
};
use gsx_propagator::{FieldProperties, MaterialUpdater, Navigator, Propagator};
use tracing::{debug, warn};

use crate::cache::{resolve, Cache};
use crate::config::{ConfigError, ExtrapolatorConfig};

/// Why a navigated call gave up and fell back to direct propagation.
///
/// None of these are errors to the caller; they select the fallback.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Abort {
    #[error("start volume not found")]
    NoStartVolume,
    #[error("destination volume not found")]
    NoDestinationVolume,
    #[error("propagation direction could not be resolved")]
    UnresolvedDirection,
    #[error("no volume beyond the boundary of {0}")]
    DeadEnd(VolumeId),
    #[error("navigator returned the current volume {0}")]
    SameVolume(VolumeId),
    #[error("volumes oscillated {0} times")]
    Oscillation(u32),
    #[error("distance to destination grew from {reference} to {revised}")]
    DistanceIncreased { reference: f64, revised: f64 },
    #[error("boundary step limit of {0} reached")]
    StepLimit(u32),
    #[error("layer walk ended before destination layer {0}")]
    LayerNotReached(LayerId),
    #[error("destination surface not reached")]
    DestinationMissed,
    #[error("mixture has no components")]
    EmptyState,
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

/// The fixed part of one extrapolation request.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Request {
    pub(crate) surface: SurfaceId,
    pub(crate) direction: PropDirection,
    pub(crate) boundary_check: BoundaryCheck,
    pub(crate) particle: ParticleHypothesis,
}

impl Request {
    /// Unit direction of travel for `parameters` under this request.
    pub(crate) fn travel(&self, parameters: &TrackParameters) -> Vector3 {
        parameters.direction() * self.direction.geometric_sign()
    }
}

/// Moves Gaussian-sum track states through a tracking geometry.
///
/// The extrapolator is immutable and shareable across threads; all mutable
/// per-call state lives in the caller's [`Cache`].
///
/// A navigated call first resolves the start and destination volumes, then
/// crosses volume boundaries one at a time (applying material at the layers
/// on the way) until the destination volume is reached, and finally walks
/// layer to layer onto the destination surface. Whenever navigation cannot
/// make progress, the original input is propagated directly to the
/// destination instead; the caller always gets a mixture back, empty only
/// if even direct propagation fails.
pub struct Extrapolator {
    pub(crate) geometry: Arc<dyn TrackingGeometry>,
    pub(crate) propagator: Arc<dyn Propagator>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) material: Arc<dyn MaterialUpdater>,
    pub(crate) config: ExtrapolatorConfig,
    pub(crate) field: FieldProperties,
}

impl Extrapolator {
    /// Assemble an extrapolator from its collaborators.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in `config`.
    pub fn new(
        geometry: Arc<dyn TrackingGeometry>,
        propagator: Arc<dyn Propagator>,
        navigator: Arc<dyn Navigator>,
        material: Arc<dyn MaterialUpdater>,
        config: ExtrapolatorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = FieldProperties::from_fast_flag(config.fast_field);
        Ok(Self {
            geometry,
            propagator,
            navigator,
            material,
            config,
            field,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtrapolatorConfig {
        &self.config
    }

    /// Field model handed to the propagator.
    pub fn field(&self) -> &FieldProperties {
        &self.field
    }

    /// Navigated extrapolation of `state` onto `surface`.
    ///
    /// Returns an empty mixture for an empty input. Every component of a
    /// non-empty result is expressed on `surface`. The cache's call-scoped
    /// state is cleared before returning.
    pub fn extrapolate(
        &self,
        cache: &mut Cache,
        state: &MultiComponentState,
        surface: SurfaceId,
        direction: PropDirection,
        boundary_check: BoundaryCheck,
        particle: ParticleHypothesis,
    ) -> MultiComponentState {
        if state.is_empty() {
            return MultiComponentState::new();
        }
        if !particle.interacts() {
            cache.metrics.direct_calls += 1;
            return self.propagate_directly(state, surface, direction, boundary_check, particle);
        }

        let span = tracing::debug_span!(
            "extrapolate",
            %surface,
            ?direction,
            components = state.len()
        );
        let _enter = span.enter();

        cache.metrics.navigated_calls += 1;
        cache.clear_call_state();
        let request = Request {
            surface,
            direction,
            boundary_check,
            particle,
        };
        let result = match self.navigate(cache, state, request) {
            Ok(out) => out,
            Err(reason) => {
                debug!(%reason, "navigation abandoned, propagating directly");
                cache.metrics.fallbacks += 1;
                self.propagate_directly(
                    state,
                    surface,
                    PropDirection::Any,
                    boundary_check,
                    particle,
                )
            }
        };
        cache.clear_call_state();
        result
    }

    /// Unnavigated propagation of `state` onto `surface`.
    ///
    /// No material is applied and no cache is used. Returns an empty
    /// mixture when the input is empty or the navigator knows no world
    /// volume.
    pub fn extrapolate_directly(
        &self,
        state: &MultiComponentState,
        surface: SurfaceId,
        direction: PropDirection,
        boundary_check: BoundaryCheck,
        particle: ParticleHypothesis,
    ) -> MultiComponentState {
        if state.is_empty() {
            return MultiComponentState::new();
        }
        if self.navigator.highest_volume().is_none() {
            warn!(%surface, "no world volume, direct extrapolation impossible");
            return MultiComponentState::new();
        }
        self.propagate_directly(state, surface, direction, boundary_check, particle)
    }

    pub(crate) fn propagate_directly(
        &self,
        state: &MultiComponentState,
        surface: SurfaceId,
        direction: PropDirection,
        boundary_check: BoundaryCheck,
        particle: ParticleHypothesis,
    ) -> MultiComponentState {
        self.propagator.multi_state_propagate(
            state,
            surface,
            &self.field,
            direction,
            boundary_check,
            particle,
        )
    }

    /// The navigated path; any `Err` selects the fallback.
    fn navigate(
        &self,
        cache: &mut Cache,
        input: &MultiComponentState,
        request: Request,
    ) -> Result<MultiComponentState, Abort> {
        let start = self.initialise_navigation(cache, input, request)?;
        let request = Request {
            direction: start.direction,
            ..request
        };
        let leading = input.leading().ok_or(Abort::EmptyState)?;
        let mut reference_distance = match &start.reference {
            Some(reference) => (reference.position() - leading.position()).norm(),
            None => self
                .geometry
                .surface_reference_point(request.surface)
                .map_or(f64::INFINITY, |p| (p - leading.position()).norm()),
        };

        let mut current_volume = start.volume;
        let mut previous_volume = None;
        let mut layer: Option<LayerId> = start.layer;
        let mut slot = None;
        let mut oscillations = 0u32;
        let mut steps = 0u32;

        while current_volume != start.destination {
            steps += 1;
            if steps > self.config.max_volume_steps {
                cache.metrics.step_limit_aborts += 1;
                return Err(Abort::StepLimit(self.config.max_volume_steps));
            }
            self.extrapolate_to_volume_boundary(
                cache,
                input,
                slot,
                layer,
                current_volume,
                request,
            )?;
            cache.metrics.boundary_steps += 1;
            slot = cache.boundary.state_at_boundary;

            let next = match cache.boundary.tracking_volume {
                None => return Err(Abort::DeadEnd(current_volume)),
                Some(v) if v == current_volume => return Err(Abort::SameVolume(v)),
                Some(v) => v,
            };
            if previous_volume == Some(next) {
                oscillations += 1;
            }
            if oscillations > self.config.max_oscillations {
                cache.metrics.oscillation_aborts += 1;
                return Err(Abort::Oscillation(oscillations));
            }

            if let Some(revised) = self.distance_after_boundary(cache, input, slot, request)? {
                if revised > reference_distance
                    && revised - reference_distance > self.config.distance_tolerance
                {
                    cache.metrics.distance_aborts += 1;
                    return Err(Abort::DistanceIncreased {
                        reference: reference_distance,
                        revised,
                    });
                }
                reference_distance = revised;
            }

            debug!(from = %current_volume, to = %next, "volume boundary crossed");
            previous_volume = Some(current_volume);
            current_volume = next;
            layer = None;
        }

        let out =
            self.extrapolate_inside_volume(cache, input, slot, layer, current_volume, request)?;
        if out.is_empty() || !out.is_on_surface(request.surface) {
            return Err(Abort::DestinationMissed);
        }
        Ok(out)
    }

    /// Distance from the last boundary crossing to the destination, as seen
    /// from the mixture at the boundary. `None` when either end is unknown.
    fn distance_after_boundary(
        &self,
        cache: &Cache,
        input: &MultiComponentState,
        slot: Option<MixtureHandle>,
        request: Request,
    ) -> Result<Option<f64>, Abort> {
        let Some(navigation) = cache.boundary.navigation_parameters.as_ref() else {
            return Ok(None);
        };
        let at_boundary = resolve(&cache.recycle_bin, input, slot)?;
        let leading = at_boundary.leading().ok_or(Abort::EmptyState)?;
        let target = self
            .propagator
            .propagate_parameters(
                leading,
                request.surface,
                request.direction,
                BoundaryCheck::Unchecked,
                &self.field,
                request.particle,
            )
            .map(|p| *p.position())
            .or_else(|| self.geometry.surface_reference_point(request.surface));
        Ok(target.map(|t| (navigation.position() - t).norm()))
    }
}

impl std::fmt::Debug for Extrapolator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extrapolator")
            .field("propagator", &self.propagator.name())
            .field("config", &self.config)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

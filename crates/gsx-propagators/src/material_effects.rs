//! Energy loss and multiple scattering through layer material.

use std::sync::Arc;

use gsx_core::{
    Component, LayerId, MaterialUpdateMode, MultiComponentState, ParticleHypothesis,
    PropDirection, TrackParameters,
};
use gsx_geometry::{Geometry, MaterialProperties};
use gsx_propagator::{MaterialEffectsScratch, MaterialUpdater};

/// Covariance index of the azimuthal angle.
const PHI: usize = 2;
/// Covariance index of the polar angle.
const THETA: usize = 3;

/// Incidence cosines below this are clamped to keep path lengths finite.
const MIN_COS_INCIDENCE: f64 = 0.01;

/// Momentum floor after energy loss, MeV.
const MIN_MOMENTUM: f64 = 1.0;

/// Which effects the [`MaterialEffectsUpdater`] applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialEffectsConfig {
    /// Apply mean ionisation energy loss.
    pub energy_loss: bool,
    /// Inflate angular covariance with Highland multiple scattering.
    pub multiple_scattering: bool,
}

impl Default for MaterialEffectsConfig {
    fn default() -> Self {
        Self {
            energy_loss: true,
            multiple_scattering: true,
        }
    }
}

/// Share of a layer's material crossed by a `mode` update travelling in
/// `direction`.
///
/// The pre-share of a forward traversal is the post-share of a backward
/// one, so `Pre` then `Post` always sums to the full material either way.
pub fn material_fraction(
    material: &MaterialProperties,
    mode: MaterialUpdateMode,
    direction: PropDirection,
) -> f64 {
    let front = match direction {
        PropDirection::Opposite => 1.0 - material.pre_factor,
        PropDirection::Along | PropDirection::Any => material.pre_factor,
    };
    match mode {
        MaterialUpdateMode::Pre => front,
        MaterialUpdateMode::Post => 1.0 - front,
        MaterialUpdateMode::Full => 1.0,
    }
}

/// Highland width of the projected scattering angle for a path of `t`
/// radiation lengths.
pub fn highland_theta0(p: f64, mass: f64, charge: f64, t: f64) -> f64 {
    if t <= 0.0 || p <= 0.0 {
        return 0.0;
    }
    let e = p.hypot(mass);
    let beta = p / e;
    let z = charge.abs().max(1.0);
    let log_term = (1.0 + 0.038 * (t * z * z / (beta * beta)).ln()).max(0.0);
    13.6 / (beta * p) * z * t.sqrt() * log_term
}

/// Reference material updater over a [`Geometry`].
///
/// Weights and surfaces are never changed. Returns an empty mixture when
/// the layer carries no effective material or the particle does not
/// interact.
#[derive(Clone, Debug)]
pub struct MaterialEffectsUpdater {
    geometry: Arc<Geometry>,
    config: MaterialEffectsConfig,
}

impl MaterialEffectsUpdater {
    /// An updater with the default configuration.
    pub fn new(geometry: Arc<Geometry>) -> Self {
        Self::with_config(geometry, MaterialEffectsConfig::default())
    }

    /// An updater with explicit configuration.
    pub fn with_config(geometry: Arc<Geometry>, config: MaterialEffectsConfig) -> Self {
        Self { geometry, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &MaterialEffectsConfig {
        &self.config
    }

    /// Path-length correction `1 / |cos(incidence)|` at the parameters'
    /// position on the layer surface.
    fn path_correction(&self, layer: LayerId, parameters: &TrackParameters) -> f64 {
        let normal = self
            .geometry
            .layer(layer)
            .and_then(|l| self.geometry.surface(l.surface()))
            .map(|s| s.normal_at(parameters.position()));
        match normal {
            Some(n) => 1.0 / n.dot(&parameters.direction()).abs().max(MIN_COS_INCIDENCE),
            None => 1.0,
        }
    }
}

impl MaterialUpdater for MaterialEffectsUpdater {
    fn update(
        &self,
        scratch: &mut MaterialEffectsScratch,
        state: &MultiComponentState,
        layer: LayerId,
        direction: PropDirection,
        particle: ParticleHypothesis,
        mode: MaterialUpdateMode,
    ) -> MultiComponentState {
        if !particle.interacts() || state.is_empty() {
            return MultiComponentState::new();
        }
        let Some(material) = self
            .geometry
            .layer(layer)
            .and_then(|l| l.material().copied())
            .filter(MaterialProperties::is_effective)
        else {
            return MultiComponentState::new();
        };
        let fraction = material_fraction(&material, mode, direction);
        if fraction <= 0.0 {
            return MultiComponentState::new();
        }

        // Per component: new momentum magnitude, then theta0 squared.
        scratch.reset();
        let n = state.len();
        let Some(buf) = scratch.alloc(2 * n) else {
            return MultiComponentState::new();
        };
        let mass = particle.mass();
        // Backward transport recovers the energy lost forward.
        let loss_sign = match direction {
            PropDirection::Opposite => -1.0,
            PropDirection::Along | PropDirection::Any => 1.0,
        };
        for (i, c) in state.iter().enumerate() {
            let params = &c.parameters;
            let path = fraction * self.path_correction(layer, params);
            let p = params.p();
            buf[i] = if self.config.energy_loss {
                let e = p.hypot(mass) - loss_sign * path * material.thickness * material.de_dx;
                (e * e - mass * mass).max(0.0).sqrt().max(MIN_MOMENTUM)
            } else {
                p
            };
            buf[n + i] = if self.config.multiple_scattering {
                highland_theta0(p, mass, params.charge(), path * material.thickness_in_x0()).powi(2)
            } else {
                0.0
            };
        }

        state
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let scale = buf[i] / c.parameters.p();
                let mut params = c
                    .parameters
                    .clone()
                    .with_momentum(c.parameters.momentum() * scale);
                if let Some(cov) = params.covariance_mut() {
                    cov[(PHI, PHI)] += buf[n + i];
                    cov[(THETA, THETA)] += buf[n + i];
                }
                Component::new(params, c.weight)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsx_core::{Covariance, SurfaceId, TrackingGeometry, Vector3};
    use gsx_geometry::{GeometryBuilder, VolumeSpec};

    struct Setup {
        updater: MaterialEffectsUpdater,
        dense: LayerId,
        empty: LayerId,
        surface: SurfaceId,
    }

    fn setup(config: MaterialEffectsConfig) -> Setup {
        let mut b = GeometryBuilder::new();
        let world = b
            .add_volume(VolumeSpec::tube("world", 0.0, 100.0, -100.0, 100.0))
            .unwrap();
        let dense = b
            .add_cylinder_layer(
                world,
                20.0,
                2.0,
                Some(MaterialProperties::silicon(2.0).with_pre_factor(0.25)),
            )
            .unwrap();
        let empty = b.add_cylinder_layer(world, 40.0, 1.0, None).unwrap();
        let g = Arc::new(b.build().unwrap());
        let surface = g.layer_surface(dense).unwrap();
        Setup {
            updater: MaterialEffectsUpdater::with_config(g, config),
            dense,
            empty,
            surface,
        }
    }

    fn state(surface: SurfaceId) -> MultiComponentState {
        [(1000.0, 0.7), (500.0, 0.3)]
            .into_iter()
            .map(|(p, w)| {
                let params = TrackParameters::new(
                    Vector3::new(20.0, 0.0, 0.0),
                    Vector3::new(p, 0.0, 0.0),
                    -1.0,
                    surface,
                )
                .unwrap()
                .with_covariance(Covariance::identity() * 1e-6);
                Component::new(params, w)
            })
            .collect()
    }

    fn run(
        s: &Setup,
        layer: LayerId,
        mode: MaterialUpdateMode,
        dir: PropDirection,
    ) -> MultiComponentState {
        let mut scratch = MaterialEffectsScratch::default();
        s.updater.update(
            &mut scratch,
            &state(s.surface),
            layer,
            dir,
            ParticleHypothesis::Electron,
            mode,
        )
    }

    #[test]
    fn fractions_swap_with_direction() {
        let m = MaterialProperties::silicon(1.0).with_pre_factor(0.25);
        use MaterialUpdateMode::*;
        assert_eq!(material_fraction(&m, Pre, PropDirection::Along), 0.25);
        assert_eq!(material_fraction(&m, Post, PropDirection::Along), 0.75);
        assert_eq!(material_fraction(&m, Pre, PropDirection::Opposite), 0.75);
        assert_eq!(material_fraction(&m, Post, PropDirection::Opposite), 0.25);
        assert_eq!(material_fraction(&m, Full, PropDirection::Opposite), 1.0);
    }

    #[test]
    fn loses_energy_keeps_weights_and_surface() {
        let s = setup(MaterialEffectsConfig::default());
        let out = run(&s, s.dense, MaterialUpdateMode::Full, PropDirection::Along);
        assert_eq!(out.len(), 2);
        assert_eq!(out.weights(), vec![0.7, 0.3]);
        assert!(out.is_on_surface(s.surface));
        let before = state(s.surface);
        for (a, b) in before.iter().zip(out.iter()) {
            assert!(b.parameters.p() < a.parameters.p());
            let cov_a = a.parameters.covariance().unwrap();
            let cov_b = b.parameters.covariance().unwrap();
            assert!(cov_b[(THETA, THETA)] > cov_a[(THETA, THETA)]);
            assert_eq!(cov_b[(0, 0)], cov_a[(0, 0)]);
        }
    }

    #[test]
    fn backward_update_gains_energy() {
        let s = setup(MaterialEffectsConfig::default());
        let out = run(&s, s.dense, MaterialUpdateMode::Full, PropDirection::Opposite);
        assert!(out.leading().unwrap().p() > 1000.0);
    }

    #[test]
    fn pre_plus_post_matches_full_energy_loss() {
        let s = setup(MaterialEffectsConfig {
            energy_loss: true,
            multiple_scattering: false,
        });
        let full = run(&s, s.dense, MaterialUpdateMode::Full, PropDirection::Along);
        let pre = run(&s, s.dense, MaterialUpdateMode::Pre, PropDirection::Along);
        let mut scratch = MaterialEffectsScratch::default();
        let both = s.updater.post_update(
            &mut scratch,
            &pre,
            s.dense,
            PropDirection::Along,
            ParticleHypothesis::Electron,
        );
        let (a, b) = (full.leading().unwrap().p(), both.leading().unwrap().p());
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
    }

    #[test]
    fn no_material_or_no_interaction_is_empty() {
        let s = setup(MaterialEffectsConfig::default());
        assert!(run(&s, s.empty, MaterialUpdateMode::Full, PropDirection::Along).is_empty());
        let mut scratch = MaterialEffectsScratch::default();
        let out = s.updater.update(
            &mut scratch,
            &state(s.surface),
            s.dense,
            PropDirection::Along,
            ParticleHypothesis::NonInteracting,
            MaterialUpdateMode::Full,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn highland_grows_with_thickness() {
        let thin = highland_theta0(1000.0, 0.511, -1.0, 0.01);
        let thick = highland_theta0(1000.0, 0.511, -1.0, 0.04);
        assert!(thick > thin && thin > 0.0);
        assert_eq!(highland_theta0(1000.0, 0.511, -1.0, 0.0), 0.0);
    }
}

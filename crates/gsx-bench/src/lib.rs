//! Benchmark detectors and track samples for the gsx extrapolation engine.
//!
//! - [`reference_detector`]: pixel and strip barrels with ten material layers
//! - [`stress_detector`]: the same envelope with forty layers
//! - [`generate_tracks`]: seeded electron mixtures leaving the beam spot

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f64::consts::PI;
use std::sync::Arc;

use gsx_core::{
    Component, MultiComponentState, SurfaceId, TrackParameters, TrackingGeometry, Vector3,
};
use gsx_engine::{ConfigError, Extrapolator, ExtrapolatorConfig};
use gsx_geometry::{
    BoundaryFace, Geometry, GeometryBuilder, GeometryError, MaterialProperties, SurfaceShape,
    VolumeSpec,
};
use gsx_propagators::{BoundaryNavigator, MaterialEffectsUpdater, StraightLinePropagator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A built benchmark detector and the surfaces tracks are sent to.
pub struct BenchDetector {
    /// The geometry.
    pub geometry: Arc<Geometry>,
    /// Transverse plane through the origin; tracks start here.
    pub beam_spot: SurfaceId,
    /// Outermost strip layer.
    pub last_strip: SurfaceId,
    /// Free cylinder just inside the world's outer cover.
    pub calo_face: SurfaceId,
}

impl BenchDetector {
    /// An extrapolator with the reference propagator, navigator and
    /// material updater.
    pub fn extrapolator(&self, config: ExtrapolatorConfig) -> Result<Extrapolator, ConfigError> {
        Extrapolator::new(
            self.geometry.clone(),
            Arc::new(StraightLinePropagator::new(Arc::clone(&self.geometry))),
            Arc::new(BoundaryNavigator::new(Arc::clone(&self.geometry))),
            Arc::new(MaterialEffectsUpdater::new(Arc::clone(&self.geometry))),
            config,
        )
    }
}

/// Evenly spaced radii strictly inside `(r_min, r_max)`.
fn radii(r_min: f64, r_max: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = (r_max - r_min) / (n as f64 + 1.0);
    (1..=n).map(move |i| r_min + step * i as f64)
}

fn build(pixel_layers: usize, strip_layers: usize) -> Result<BenchDetector, GeometryError> {
    let mut b = GeometryBuilder::new();
    let world = b.add_volume(VolumeSpec::tube("world", 0.0, 1000.0, -1500.0, 1500.0))?;
    let pixel = b.add_volume(VolumeSpec::tube("pixel", 0.0, 150.0, -600.0, 600.0).inside(world))?;
    let strip =
        b.add_volume(VolumeSpec::tube("strip", 150.0, 600.0, -1000.0, 1000.0).inside(world))?;

    for r in radii(0.0, 150.0, pixel_layers) {
        b.add_cylinder_layer(pixel, r, 0.5, Some(MaterialProperties::silicon(0.15)))?;
    }
    let mut last = None;
    for r in radii(150.0, 600.0, strip_layers) {
        last = Some(b.add_cylinder_layer(strip, r, 1.0, Some(MaterialProperties::silicon(0.3)))?);
    }
    b.set_boundary_material(strip, BoundaryFace::OuterCover, MaterialProperties::silicon(1.0))?;

    let beam_spot = b.add_surface(SurfaceShape::Plane {
        center: Vector3::zeros(),
        normal: Vector3::z(),
        half_extent: 10.0,
    })?;
    let calo_face = b.add_surface(SurfaceShape::Cylinder {
        radius: 950.0,
        center_z: 0.0,
        half_z: 1400.0,
    })?;

    let geometry = Arc::new(b.build()?);
    let last_strip = last
        .and_then(|l| geometry.layer_surface(l))
        .ok_or(GeometryError::Empty)?;
    Ok(BenchDetector {
        geometry,
        beam_spot,
        last_strip,
        calo_face,
    })
}

/// Reference detector: four pixel layers and six strip layers.
pub fn reference_detector() -> Result<BenchDetector, GeometryError> {
    build(4, 6)
}

/// Stress detector: ten pixel layers and thirty strip layers.
pub fn stress_detector() -> Result<BenchDetector, GeometryError> {
    build(10, 30)
}

/// Generate `count` deterministic electron mixtures of `components`
/// components each, starting at the origin on `surface`.
///
/// Directions cover the full azimuth and `|eta| < 1`; momenta range from
/// 1 to 50 GeV. Component momenta spread over the lower 20% of the
/// leading momentum and weights are normalised.
pub fn generate_tracks(
    seed: u64,
    count: usize,
    components: usize,
    surface: SurfaceId,
) -> Vec<MultiComponentState> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let phi = rng.random_range(-PI..PI);
            let eta: f64 = rng.random_range(-1.0..1.0);
            let p = rng.random_range(1_000.0..50_000.0);
            let theta = 2.0 * (-eta).exp().atan();
            let dir = Vector3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());

            let raw: Vec<(f64, f64)> = (0..components.max(1))
                .map(|i| {
                    let scale = if i == 0 {
                        1.0
                    } else {
                        rng.random_range(0.8..1.0)
                    };
                    (scale, rng.random::<f64>() + 0.05)
                })
                .collect();
            let total: f64 = raw.iter().map(|(_, w)| w).sum();
            raw.into_iter()
                .filter_map(|(scale, w)| {
                    TrackParameters::new(Vector3::zeros(), dir * (p * scale), -1.0, surface)
                        .ok()
                        .map(|params| Component::new(params, w / total))
                })
                .collect()
        })
        .collect()
}

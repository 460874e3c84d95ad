//! A small cylindrical detector built from the real geometry.
//!
//! ```text
//!  r (mm)
//!  1000 ┬──────────────────────── world ─────────────────────────
//!   800 │        ┌─ outer plane (x = 800, free)
//!   600 ┼────────┴──── strip: layers 250 / 400 / 550 ───────────
//!       │                         └ module plane at x = 400
//!   150 ┼────────────── pixel: layers 40 / 80 / 120 ────────────
//!     0 ┴────────────────────────────────────────────────────────
//! ```
//!
//! Every layer carries silicon; the strip volume's outer cover carries
//! boundary material.

use std::sync::Arc;

use gsx_core::{
    LayerId, MultiComponentState, SurfaceId, TrackParameters, TrackingGeometry, Vector3, VolumeId,
};
use gsx_geometry::{
    BoundaryFace, Geometry, GeometryBuilder, GeometryError, MaterialProperties, SurfaceShape,
    VolumeSpec,
};
use gsx_propagators::{BoundaryNavigator, MaterialEffectsUpdater, StraightLinePropagator};

pub const PIXEL_RADII: [f64; 3] = [40.0, 80.0, 120.0];
pub const STRIP_RADII: [f64; 3] = [250.0, 400.0, 550.0];
pub const LAYER_THICKNESS: f64 = 2.0;

/// The two-volume barrel detector and handles into it.
pub struct Detector {
    pub geometry: Arc<Geometry>,
    pub world: VolumeId,
    pub pixel: VolumeId,
    pub strip: VolumeId,
    pub pixel_layers: Vec<LayerId>,
    pub strip_layers: Vec<LayerId>,
    /// Plane module on the middle strip layer.
    pub module: SurfaceId,
    /// Free plane in the world volume beyond the strip volume.
    pub outer_plane: SurfaceId,
    /// Free transverse plane through the origin, for starting tracks.
    pub beam_spot: SurfaceId,
    /// Material layer on the strip volume's outer cover.
    pub strip_boundary_material: LayerId,
}

fn build() -> Result<Detector, GeometryError> {
    let mut b = GeometryBuilder::new();
    let world = b.add_volume(VolumeSpec::tube("world", 0.0, 1000.0, -1000.0, 1000.0))?;
    let pixel = b.add_volume(VolumeSpec::tube("pixel", 0.0, 150.0, -500.0, 500.0).inside(world))?;
    let strip =
        b.add_volume(VolumeSpec::tube("strip", 150.0, 600.0, -800.0, 800.0).inside(world))?;

    let silicon = MaterialProperties::silicon(0.3);
    let pixel_layers = PIXEL_RADII
        .iter()
        .map(|&r| b.add_cylinder_layer(pixel, r, LAYER_THICKNESS, Some(silicon)))
        .collect::<Result<Vec<_>, _>>()?;
    let strip_layers = STRIP_RADII
        .iter()
        .map(|&r| b.add_cylinder_layer(strip, r, LAYER_THICKNESS, Some(silicon)))
        .collect::<Result<Vec<_>, _>>()?;

    let module = b.add_module_surface(
        strip_layers[1],
        SurfaceShape::Plane {
            center: Vector3::new(STRIP_RADII[1], 0.0, 0.0),
            normal: Vector3::x(),
            half_extent: 50.0,
        },
    )?;
    let outer_plane = b.add_surface(SurfaceShape::Plane {
        center: Vector3::new(800.0, 0.0, 0.0),
        normal: Vector3::x(),
        half_extent: 100.0,
    })?;
    let beam_spot = b.add_surface(SurfaceShape::Plane {
        center: Vector3::zeros(),
        normal: Vector3::z(),
        half_extent: 10.0,
    })?;
    let strip_boundary_material =
        b.set_boundary_material(strip, BoundaryFace::OuterCover, MaterialProperties::silicon(0.5))?;

    Ok(Detector {
        geometry: Arc::new(b.build()?),
        world,
        pixel,
        strip,
        pixel_layers,
        strip_layers,
        module,
        outer_plane,
        beam_spot,
        strip_boundary_material,
    })
}

impl Detector {
    /// Build the detector.
    ///
    /// # Panics
    ///
    /// If the fixture description itself is inconsistent.
    pub fn new() -> Self {
        match build() {
            Ok(d) => d,
            Err(e) => panic!("detector fixture is invalid: {e}"),
        }
    }

    pub fn propagator(&self) -> StraightLinePropagator {
        StraightLinePropagator::new(Arc::clone(&self.geometry))
    }

    pub fn navigator(&self) -> BoundaryNavigator {
        BoundaryNavigator::new(Arc::clone(&self.geometry))
    }

    pub fn material(&self) -> MaterialEffectsUpdater {
        MaterialEffectsUpdater::new(Arc::clone(&self.geometry))
    }

    /// Surface of `layer`.
    pub fn surface_of(&self, layer: LayerId) -> SurfaceId {
        match self.geometry.layer_surface(layer) {
            Some(s) => s,
            None => panic!("unknown fixture layer {layer}"),
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

/// A radially outgoing electron at the origin, expressed on `surface`
/// (normally [`Detector::beam_spot`]).
///
/// `momentum` is in MeV; `phi` and `eta` set the direction.
pub fn electron_from_origin(
    surface: SurfaceId,
    momentum: f64,
    phi: f64,
    eta: f64,
) -> MultiComponentState {
    let theta = 2.0 * (-eta).exp().atan();
    let dir = Vector3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
    TrackParameters::new(Vector3::zeros(), dir * momentum, -1.0, surface)
        .map(MultiComponentState::single)
        .unwrap_or_default()
}

/// A single electron at `position` with `momentum` on `surface`.
pub fn electron(position: Vector3, momentum: Vector3, surface: SurfaceId) -> MultiComponentState {
    TrackParameters::new(position, momentum, -1.0, surface)
        .map(MultiComponentState::single)
        .unwrap_or_default()
}

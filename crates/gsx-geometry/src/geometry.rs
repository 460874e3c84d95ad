//! The immutable geometry and its [`TrackingGeometry`] implementation.

use gsx_core::{LayerId, PropDirection, SurfaceId, TrackingGeometry, Vector3, VolumeId};
use indexmap::IndexMap;

use crate::layer::Layer;
use crate::surface::{Intersection, Surface};
use crate::volume::{LayerBinning, Volume};

/// Smallest half-thickness used when associating a point with a layer.
const MIN_LAYER_TOLERANCE: f64 = 1e-4;

/// Path a layer search must advance before a crossing counts, so that a
/// point sitting on a layer finds the next one.
const NEXT_LAYER_MIN_PATH: f64 = 1e-6;

/// A built, read-only tracking geometry.
///
/// Created by [`GeometryBuilder::build`](crate::GeometryBuilder::build).
#[derive(Clone, Debug)]
pub struct Geometry {
    pub(crate) surfaces: Vec<Surface>,
    pub(crate) layers: Vec<Layer>,
    pub(crate) volumes: Vec<Volume>,
    pub(crate) names: IndexMap<String, VolumeId>,
    pub(crate) world: VolumeId,
}

impl Geometry {
    /// Surface by id.
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0 as usize)
    }

    /// Layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0 as usize)
    }

    /// Volume by id.
    pub fn volume(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes.get(id.0 as usize)
    }

    /// Volume by name.
    pub fn volume_by_name(&self, name: &str) -> Option<&Volume> {
        self.names.get(name).and_then(|&id| self.volume(id))
    }

    /// All volumes in insertion order.
    pub fn volumes(&self) -> impl Iterator<Item = &Volume> {
        self.volumes.iter()
    }

    /// The world volume.
    pub fn world(&self) -> VolumeId {
        self.world
    }

    /// Number of surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Straight-line intersection with surface `id`; see
    /// [`Surface::intersect`].
    pub fn intersect(
        &self,
        id: SurfaceId,
        position: &Vector3,
        direction: &Vector3,
        sense: PropDirection,
        min_path: f64,
        bounded: bool,
    ) -> Option<Intersection> {
        self.surface(id)?
            .intersect(position, direction, sense, min_path, bounded)
    }

    fn layer_surface_ref(&self, layer: LayerId) -> Option<&Surface> {
        self.layer(layer).and_then(|l| self.surface(l.surface))
    }
}

impl TrackingGeometry for Geometry {
    fn highest_volume(&self) -> Option<VolumeId> {
        Some(self.world)
    }

    fn volume_at(&self, position: &Vector3) -> Option<VolumeId> {
        let mut current = self.volume(self.world)?;
        if !current.bounds.contains(position) {
            return None;
        }
        loop {
            let inner = current
                .children
                .iter()
                .filter_map(|&child| self.volume(child))
                .find(|v| v.bounds.contains(position));
            match inner {
                Some(v) => current = v,
                None => return Some(current.id),
            }
        }
    }

    fn associated_layer(&self, volume: VolumeId, position: &Vector3) -> Option<LayerId> {
        self.volume(volume)?.layers.iter().copied().find(|&id| {
            self.layer(id).is_some_and(|l| {
                let tolerance = (0.5 * l.thickness).max(MIN_LAYER_TOLERANCE);
                self.surface(l.surface)
                    .is_some_and(|s| s.is_on_surface(position, tolerance))
            })
        })
    }

    fn next_layer_in_volume(
        &self,
        volume: VolumeId,
        position: &Vector3,
        direction: &Vector3,
    ) -> Option<LayerId> {
        let dir = direction.normalize();
        self.volume(volume)?
            .layers
            .iter()
            .filter_map(|&id| {
                let hit = self.layer_surface_ref(id)?.intersect(
                    position,
                    &dir,
                    PropDirection::Along,
                    NEXT_LAYER_MIN_PATH,
                    true,
                )?;
                Some((id, hit.path_length))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn next_layer(
        &self,
        layer: LayerId,
        position: &Vector3,
        direction: &Vector3,
    ) -> Option<LayerId> {
        let volume = self.volume(self.layer(layer)?.volume)?;
        let index = volume.layers.iter().position(|&l| l == layer)?;
        let outward = match volume.binning? {
            LayerBinning::Radial => position.x * direction.x + position.y * direction.y >= 0.0,
            LayerBinning::Z => direction.z >= 0.0,
        };
        if outward {
            volume.layers.get(index + 1).copied()
        } else {
            index.checked_sub(1).and_then(|i| volume.layers.get(i).copied())
        }
    }

    fn has_confined_layers(&self, volume: VolumeId) -> bool {
        self.volume(volume).is_some_and(|v| !v.layers.is_empty())
    }

    fn boundary_surfaces(&self, volume: VolumeId) -> &[SurfaceId] {
        self.volume(volume)
            .map(|v| v.boundaries.as_slice())
            .unwrap_or(&[])
    }

    fn enclosing_volume(&self, layer: LayerId) -> Option<VolumeId> {
        self.layer(layer).map(|l| l.volume)
    }

    fn surface_layer(&self, surface: SurfaceId) -> Option<LayerId> {
        self.surface(surface)?.layer
    }

    fn surface_material_layer(&self, surface: SurfaceId) -> Option<LayerId> {
        self.surface(surface)?.material_layer
    }

    fn layer_surface(&self, layer: LayerId) -> Option<SurfaceId> {
        self.layer(layer).map(|l| l.surface)
    }

    fn layer_has_material(&self, layer: LayerId) -> bool {
        self.layer(layer).is_some_and(Layer::has_material)
    }

    fn layer_thickness(&self, layer: LayerId) -> f64 {
        self.layer(layer).map_or(0.0, |l| l.thickness)
    }

    fn surface_reference_point(&self, surface: SurfaceId) -> Option<Vector3> {
        self.surface(surface).map(Surface::reference_point)
    }

    fn is_on_surface(&self, surface: SurfaceId, position: &Vector3, tolerance: f64) -> bool {
        self.surface(surface)
            .is_some_and(|s| s.is_on_surface(position, tolerance))
    }
}

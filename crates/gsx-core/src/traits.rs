//! Read-only geometry queries consumed by the extrapolation engine.

use crate::id::{LayerId, SurfaceId, VolumeId};
use crate::math::Vector3;

/// Index of the inner cylinder cover in a tube volume's boundary list.
///
/// Cylindrical volumes list their boundaries as
/// `[negative disc, positive disc, outer cover, inner cover]`; a full
/// cylinder (no inner radius) has only the first three.
pub const TUBE_INNER_COVER: usize = 3;

/// Read-only view of a tracking geometry.
///
/// The geometry is a tree of nested volumes, each bounded by boundary
/// surfaces and confining zero or more layers. Implementations must be
/// immutable once built: the engine queries the same geometry from many
/// threads, each with its own cache.
///
/// # Cycles
///
/// Nothing here promises that [`next_layer`](Self::next_layer) chains are
/// acyclic. Callers walking layer chains must keep a visited set.
///
/// # Object safety
///
/// This trait is object-safe; the engine stores the geometry as
/// `Arc<dyn TrackingGeometry>`.
pub trait TrackingGeometry: Send + Sync {
    /// The outermost (world) volume, if the geometry is non-empty.
    fn highest_volume(&self) -> Option<VolumeId>;

    /// The innermost volume containing `position`.
    fn volume_at(&self, position: &Vector3) -> Option<VolumeId>;

    /// The layer of `volume` that `position` lies on (within half the
    /// layer thickness).
    fn associated_layer(&self, volume: VolumeId, position: &Vector3) -> Option<LayerId>;

    /// The first layer of `volume` hit moving from `position` along
    /// `direction`.
    fn next_layer_in_volume(
        &self,
        volume: VolumeId,
        position: &Vector3,
        direction: &Vector3,
    ) -> Option<LayerId>;

    /// The neighbour of `layer` in its volume in the sense of `direction`
    /// at `position`.
    fn next_layer(&self, layer: LayerId, position: &Vector3, direction: &Vector3)
        -> Option<LayerId>;

    /// Whether `volume` confines any layers.
    fn has_confined_layers(&self, volume: VolumeId) -> bool;

    /// Boundary surfaces of `volume`; see [`TUBE_INNER_COVER`] for the
    /// ordering convention of cylindrical volumes.
    fn boundary_surfaces(&self, volume: VolumeId) -> &[SurfaceId];

    /// The volume confining `layer`.
    fn enclosing_volume(&self, layer: LayerId) -> Option<VolumeId>;

    /// The layer that `surface` represents, if any.
    fn surface_layer(&self, surface: SurfaceId) -> Option<LayerId>;

    /// Material layer attached to a boundary surface, if any.
    fn surface_material_layer(&self, surface: SurfaceId) -> Option<LayerId>;

    /// The surface representing `layer`.
    fn layer_surface(&self, layer: LayerId) -> Option<SurfaceId>;

    /// Whether crossing `layer` requires a material update.
    fn layer_has_material(&self, layer: LayerId) -> bool;

    /// Thickness of `layer` in mm (0 for unknown layers).
    fn layer_thickness(&self, layer: LayerId) -> f64;

    /// A representative global point of `surface`.
    fn surface_reference_point(&self, surface: SurfaceId) -> Option<Vector3>;

    /// Whether `position` lies within `tolerance` of `surface`, inside its
    /// bounds.
    fn is_on_surface(&self, surface: SurfaceId, position: &Vector3, tolerance: f64) -> bool;
}

//! Layers: surfaces that may carry material.

use gsx_core::{LayerId, SurfaceId, VolumeId};

use crate::material::MaterialProperties;

/// Whether a layer is confined inside a volume or sits on its boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// One of the ordered layers confined by a volume.
    Confined,
    /// A material layer attached to a volume boundary surface.
    Boundary,
}

/// A layer of the tracking geometry.
#[derive(Clone, Debug)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub(crate) surface: SurfaceId,
    pub(crate) thickness: f64,
    pub(crate) material: Option<MaterialProperties>,
    pub(crate) volume: VolumeId,
    pub(crate) kind: LayerKind,
}

impl Layer {
    /// This layer's id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The representing surface.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Envelope thickness in mm.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Material, if any.
    pub fn material(&self) -> Option<&MaterialProperties> {
        self.material.as_ref()
    }

    /// The volume confining (or bounded by) this layer.
    pub fn volume(&self) -> VolumeId {
        self.volume
    }

    /// Confined or boundary.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Whether crossing this layer changes the track state.
    pub fn has_material(&self) -> bool {
        self.material.is_some_and(|m| m.is_effective())
    }
}

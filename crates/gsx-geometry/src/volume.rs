//! Cylindrical tracking volumes.

use gsx_core::{perp, LayerId, SurfaceId, Vector3, VolumeId};
use smallvec::SmallVec;

/// Extent of a cylindrical (tube) volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeBounds {
    /// Inner radius; zero for a full cylinder.
    pub r_min: f64,
    /// Outer radius.
    pub r_max: f64,
    /// Lower z bound.
    pub z_min: f64,
    /// Upper z bound.
    pub z_max: f64,
}

impl VolumeBounds {
    /// Whether `position` is inside (boundaries inclusive).
    pub fn contains(&self, position: &Vector3) -> bool {
        let r = perp(position);
        r >= self.r_min && r <= self.r_max && position.z >= self.z_min && position.z <= self.z_max
    }

    /// Whether `other` fits entirely inside `self`.
    pub fn encloses(&self, other: &VolumeBounds) -> bool {
        other.r_min >= self.r_min
            && other.r_max <= self.r_max
            && other.z_min >= self.z_min
            && other.z_max <= self.z_max
    }

    /// Whether the interiors of `self` and `other` intersect.
    pub fn overlaps(&self, other: &VolumeBounds) -> bool {
        self.r_min < other.r_max
            && other.r_min < self.r_max
            && self.z_min < other.z_max
            && other.z_min < self.z_max
    }

    /// Half length along z.
    pub fn half_z(&self) -> f64 {
        0.5 * (self.z_max - self.z_min)
    }

    /// z of the centre.
    pub fn center_z(&self) -> f64 {
        0.5 * (self.z_max + self.z_min)
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.r_min, self.r_max, self.z_min, self.z_max]
            .iter()
            .all(|v| v.is_finite())
            && self.r_min >= 0.0
            && self.r_max > self.r_min
            && self.z_max > self.z_min
    }
}

/// How the confined layers of a volume are ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerBinning {
    /// Barrel: cylinder layers ordered by radius.
    Radial,
    /// End-cap: disc layers ordered by z.
    Z,
}

/// A tracking volume.
#[derive(Clone, Debug)]
pub struct Volume {
    pub(crate) id: VolumeId,
    pub(crate) name: String,
    pub(crate) bounds: VolumeBounds,
    /// `[negative disc, positive disc, outer cover, (inner cover)]`.
    pub(crate) boundaries: SmallVec<[SurfaceId; 4]>,
    /// Confined layers in binning order.
    pub(crate) layers: Vec<LayerId>,
    pub(crate) binning: Option<LayerBinning>,
    pub(crate) mother: Option<VolumeId>,
    pub(crate) depth: u32,
    pub(crate) children: Vec<VolumeId>,
}

impl Volume {
    /// This volume's id.
    pub fn id(&self) -> VolumeId {
        self.id
    }

    /// The unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cylindrical extent.
    pub fn bounds(&self) -> &VolumeBounds {
        &self.bounds
    }

    /// Boundary surfaces in tube order.
    pub fn boundaries(&self) -> &[SurfaceId] {
        &self.boundaries
    }

    /// Confined layers in binning order.
    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    /// Layer ordering, `None` without layers.
    pub fn binning(&self) -> Option<LayerBinning> {
        self.binning
    }

    /// The enclosing volume; `None` for the world.
    pub fn mother(&self) -> Option<VolumeId> {
        self.mother
    }

    /// Nesting depth; the world is 0.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Directly nested volumes.
    pub fn children(&self) -> &[VolumeId] {
        &self.children
    }
}

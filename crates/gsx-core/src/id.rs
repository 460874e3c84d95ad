//! Strongly-typed identifiers for geometry objects.
//!
//! The engine never holds references into the geometry; every volume,
//! layer and surface is addressed by one of these ids and resolved
//! through [`TrackingGeometry`](crate::TrackingGeometry).

use std::fmt;

/// Identifies a tracking volume within a geometry.
///
/// Volumes are registered with the geometry builder and assigned
/// sequential IDs. `VolumeId(n)` is the n-th registered volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(pub u32);

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl From<u32> for VolumeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a layer confined in a tracking volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<u32> for LayerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a surface: a layer representation, a volume boundary, or a
/// free-standing destination surface.
///
/// Track parameters are always expressed on exactly one surface; two
/// parameter sets are "on the same surface" iff their `SurfaceId`s are
/// equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

impl From<u32> for SurfaceId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

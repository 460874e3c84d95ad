//! Errors raised while building a geometry.

use gsx_core::{LayerId, VolumeId};

/// Errors from [`GeometryBuilder`](crate::GeometryBuilder).
///
/// A built [`Geometry`](crate::Geometry) never fails: unknown ids in
/// queries return `None` or empty slices.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The builder holds no volumes.
    #[error("geometry has no volumes")]
    Empty,
    /// A volume id does not exist in this builder.
    #[error("unknown volume {0}")]
    UnknownVolume(VolumeId),
    /// A layer id does not exist in this builder.
    #[error("unknown layer {0}")]
    UnknownLayer(LayerId),
    /// Two volumes share a name.
    #[error("duplicate volume name '{0}'")]
    DuplicateName(String),
    /// A second top-level volume was added.
    #[error("volume '{name}' has no mother but '{world}' is already the world volume")]
    MultipleWorlds {
        /// The rejected volume.
        name: String,
        /// The existing world volume.
        world: String,
    },
    /// A dimension is non-finite, negative, or inverted.
    #[error("invalid dimension for {what}: {reason}")]
    InvalidDimension {
        /// The object being described.
        what: String,
        /// Human-readable reason.
        reason: &'static str,
    },
    /// A volume does not fit inside its mother.
    #[error("volume '{child}' is not contained in its mother '{mother}'")]
    NotContained {
        /// The child volume.
        child: String,
        /// The mother volume.
        mother: String,
    },
    /// Two sibling volumes overlap.
    #[error("sibling volumes '{a}' and '{b}' overlap")]
    Overlap {
        /// First volume.
        a: String,
        /// Second volume.
        b: String,
    },
    /// A layer lies outside the volume confining it.
    #[error("layer at {position} lies outside volume '{volume}'")]
    LayerOutsideVolume {
        /// The volume.
        volume: String,
        /// Radius or z of the rejected layer.
        position: f64,
    },
    /// Cylinder and disc layers were mixed in one volume.
    #[error("volume '{0}' mixes cylinder and disc layers")]
    MixedBinning(String),
    /// The requested boundary face does not exist (no inner cover).
    #[error("volume '{0}' has no inner cover")]
    NoSuchBoundary(String),
}

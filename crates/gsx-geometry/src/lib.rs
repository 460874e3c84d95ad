//! In-memory cylindrical tracking geometry.
//!
//! This crate provides a concrete, immutable implementation of
//! [`TrackingGeometry`](gsx_core::TrackingGeometry): nested cylindrical
//! volumes bounded by discs and cylinder covers, each confining an ordered
//! stack of cylinder or disc layers that may carry material.
//!
//! # Construction
//!
//! Geometries are assembled with [`GeometryBuilder`] and validated once in
//! [`GeometryBuilder::build`]; the resulting [`Geometry`] is read-only and
//! `Send + Sync`.
//!
//! ```
//! use gsx_geometry::{GeometryBuilder, MaterialProperties, VolumeSpec};
//! use gsx_core::TrackingGeometry;
//!
//! let mut b = GeometryBuilder::new();
//! let world = b.add_volume(VolumeSpec::tube("world", 0.0, 1000.0, -2000.0, 2000.0)).unwrap();
//! let pixel = b
//!     .add_volume(VolumeSpec::tube("pixel", 0.0, 150.0, -500.0, 500.0).inside(world))
//!     .unwrap();
//! b.add_cylinder_layer(pixel, 50.0, 1.0, Some(MaterialProperties::silicon(0.3))).unwrap();
//! let geometry = b.build().unwrap();
//! assert_eq!(geometry.highest_volume(), Some(world));
//! assert!(geometry.has_confined_layers(pixel));
//! ```
//!
//! # Boundary ordering
//!
//! Every volume owns its own boundary surfaces, created in
//! the order `[negative disc, positive disc, outer cover, inner cover]`;
//! volumes with `r_min == 0` have no inner cover.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod material;
pub mod surface;
pub mod volume;

pub use builder::{BoundaryFace, GeometryBuilder, VolumeSpec};
pub use error::GeometryError;
pub use geometry::Geometry;
pub use layer::{Layer, LayerKind};
pub use material::MaterialProperties;
pub use surface::{Intersection, Surface, SurfaceShape};
pub use volume::{LayerBinning, Volume, VolumeBounds};

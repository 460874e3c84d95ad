//! gsx: Gaussian-sum track state extrapolation.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! gsx sub-crates. For most users, adding `gsx` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use gsx::prelude::*;
//!
//! // A world with one pixel volume holding a single silicon layer.
//! let mut b = GeometryBuilder::new();
//! let world = b
//!     .add_volume(VolumeSpec::tube("world", 0.0, 1000.0, -1000.0, 1000.0))
//!     .unwrap();
//! let pixel = b
//!     .add_volume(VolumeSpec::tube("pixel", 0.0, 150.0, -500.0, 500.0).inside(world))
//!     .unwrap();
//! let layer = b
//!     .add_cylinder_layer(pixel, 50.0, 1.0, Some(MaterialProperties::silicon(0.3)))
//!     .unwrap();
//! let beam_spot = b
//!     .add_surface(SurfaceShape::Plane {
//!         center: Vector3::zeros(),
//!         normal: Vector3::z(),
//!         half_extent: 10.0,
//!     })
//!     .unwrap();
//! let geometry = Arc::new(b.build().unwrap());
//! let target = geometry.layer_surface(layer).unwrap();
//!
//! let extrapolator = Extrapolator::new(
//!     geometry.clone(),
//!     Arc::new(StraightLinePropagator::new(geometry.clone())),
//!     Arc::new(BoundaryNavigator::new(geometry.clone())),
//!     Arc::new(MaterialEffectsUpdater::new(geometry.clone())),
//!     ExtrapolatorConfig::default(),
//! )
//! .unwrap();
//!
//! let electron = TrackParameters::new(
//!     Vector3::zeros(),
//!     Vector3::new(1000.0, 0.0, 0.0),
//!     -1.0,
//!     beam_spot,
//! )
//! .unwrap();
//! let mut cache = Cache::new();
//! let out = extrapolator.extrapolate(
//!     &mut cache,
//!     &MultiComponentState::single(electron),
//!     target,
//!     PropDirection::Along,
//!     BoundaryCheck::Checked,
//!     ParticleHypothesis::Electron,
//! );
//! assert!(out.is_on_surface(target));
//! // The pre-surface half of the layer's silicon was crossed.
//! assert!(out.leading().unwrap().p() < 1000.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gsx-core` | IDs, track parameters, mixtures, the geometry trait |
//! | [`arena`] | `gsx-arena` | Per-call recycle bin and mixture handles |
//! | [`geometry`] | `gsx-geometry` | Cylindrical volumes, layers, surfaces and material |
//! | [`propagator`] | `gsx-propagator` | Propagator, navigator and material-updater traits |
//! | [`propagators`] | `gsx-propagators` | Straight-line propagator, boundary navigator, material effects |
//! | [`engine`] | `gsx-engine` | The extrapolator, its cache and configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`gsx-core`).
///
/// Contains [`types::TrackParameters`], [`types::MultiComponentState`],
/// the direction enums and the [`types::TrackingGeometry`] trait.
pub use gsx_core as types;

/// Per-call recycle bin (`gsx-arena`).
pub use gsx_arena as arena;

/// In-memory cylindrical tracking geometry (`gsx-geometry`).
///
/// Build one with [`geometry::GeometryBuilder`].
pub use gsx_geometry as geometry;

/// Collaborator traits (`gsx-propagator`).
///
/// [`propagator::Propagator`], [`propagator::Navigator`] and
/// [`propagator::MaterialUpdater`] are the extension points for custom
/// transport, navigation and material models.
pub use gsx_propagator as propagator;

/// Reference collaborator implementations (`gsx-propagators`).
pub use gsx_propagators as propagators;

/// The extrapolation engine (`gsx-engine`).
///
/// [`engine::Extrapolator`] is shared across threads; each thread owns an
/// [`engine::Cache`].
pub use gsx_engine as engine;

/// Common imports for typical gsx usage.
///
/// ```rust
/// use gsx::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use gsx_core::{
        BoundaryCheck, Component, Covariance, LayerId, MaterialUpdateMode, MultiComponentState,
        ParticleHypothesis, PropDirection, SurfaceId, TrackParameters, TrackingGeometry, Vector3,
        VolumeId,
    };

    // Geometry
    pub use gsx_geometry::{
        BoundaryFace, Geometry, GeometryBuilder, MaterialProperties, SurfaceShape, VolumeSpec,
    };

    // Collaborators
    pub use gsx_propagator::{FieldProperties, MaterialUpdater, Navigator, Propagator};
    pub use gsx_propagators::{BoundaryNavigator, MaterialEffectsUpdater, StraightLinePropagator};

    // Engine
    pub use gsx_engine::{Cache, ExtrapolationMetrics, Extrapolator, ExtrapolatorConfig};
}

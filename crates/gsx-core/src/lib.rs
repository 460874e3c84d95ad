//! Core types and traits for gsx track extrapolation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the gsx workspace:
//! geometry identifiers, track parameters, weighted mixtures of track
//! hypotheses, propagation enums, error types, and the read-only
//! [`TrackingGeometry`] query trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod id;
pub mod math;
pub mod mixture;
pub mod params;
pub mod traits;

pub use direction::{BoundaryCheck, MaterialUpdateMode, ParticleHypothesis, PropDirection};
pub use error::ParameterError;
pub use id::{LayerId, SurfaceId, VolumeId};
pub use math::{perp, Covariance, Vector3};
pub use mixture::{Component, MultiComponentState};
pub use params::TrackParameters;
pub use traits::{TrackingGeometry, TUBE_INNER_COVER};

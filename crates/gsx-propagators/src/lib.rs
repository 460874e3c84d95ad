//! Reference collaborators for the gsx extrapolation engine.
//!
//! Everything here works on a [`gsx_geometry::Geometry`] shared through an
//! `Arc`:
//!
//! - [`StraightLinePropagator`]: field-free transport along the momentum
//!   direction, covariance carried unchanged.
//! - [`BoundaryNavigator`]: finds the nearest boundary crossing of the
//!   current volume (its own covers and those of nested volumes) and the
//!   volume on the far side.
//! - [`MaterialEffectsUpdater`]: mean energy loss and Highland multiple
//!   scattering, split into pre/post shares around the layer surface.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod material_effects;
pub mod navigator;
pub mod straight_line;

pub use material_effects::{MaterialEffectsConfig, MaterialEffectsUpdater};
pub use navigator::BoundaryNavigator;
pub use straight_line::StraightLinePropagator;

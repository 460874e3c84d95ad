//! Gaussian-sum state extrapolation engine.
//!
//! Provides the [`Extrapolator`], which moves a [`MultiComponentState`]
//! onto a destination surface through a volume/layer geometry, applying
//! material effects at every layer crossed, and the per-caller [`Cache`]
//! that holds its call-scoped scratch state.
//!
//! Two entry points:
//!
//! - [`Extrapolator::extrapolate`]: navigated, material-aware. Falls back
//!   to direct propagation whenever navigation cannot make progress.
//! - [`Extrapolator::extrapolate_directly`]: plain propagation, no
//!   material, no cache.
//!
//! Navigation is bounded: oscillation between volumes, a growing distance
//! to the destination, a hard cap on boundary steps and cycles in layer
//! chains all end the navigated path.
//!
//! [`MultiComponentState`]: gsx_core::MultiComponentState

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod boundary;
pub mod cache;
pub mod config;
pub mod extrapolator;
mod inside;
mod layers;
pub mod metrics;
mod navigation;

pub use cache::{Cache, Recall};
pub use config::{ConfigError, ExtrapolatorConfig};
pub use extrapolator::Extrapolator;
pub use metrics::ExtrapolationMetrics;

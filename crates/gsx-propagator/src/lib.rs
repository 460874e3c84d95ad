//! Collaborator contracts for gsx extrapolation.
//!
//! The extrapolation engine orchestrates three external capabilities:
//!
//! - [`Propagator`] moves parameters onto a target surface.
//! - [`Navigator`] finds the next volume across a boundary.
//! - [`MaterialUpdater`] applies scattering and energy loss at a layer.
//!
//! All three are `&self` and `Send + Sync`: one instance serves every
//! thread, and any per-call state travels in caller-owned scratch
//! ([`MaterialEffectsScratch`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod field;
pub mod material;
pub mod navigator;
pub mod propagator;
pub mod scratch;

pub use field::{FieldMode, FieldProperties};
pub use material::MaterialUpdater;
pub use navigator::{NavigationCell, Navigator};
pub use propagator::Propagator;
pub use scratch::MaterialEffectsScratch;

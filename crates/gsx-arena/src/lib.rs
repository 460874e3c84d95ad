//! Per-call recycle bin for intermediate mixtures.
//!
//! An extrapolation call produces a chain of intermediate mixtures (after
//! each boundary step, after each material update). Later steps need to
//! refer back to "the state at the last boundary" while the engine keeps
//! producing new states. Rather than sharing ownership of each
//! intermediate, the engine appends them to a [`RecycleBin`] and hands out
//! [`MixtureHandle`]s.
//!
//! # Lifetime
//!
//! ```text
//! extrapolate() ──► bin.clear()        (generation g → g+1)
//!      │             push() → handle{g+1, 0}
//!      │             push() → handle{g+1, 1}
//!      │             get(handle) ✓      (valid until the next clear)
//!      └──────────► bin.clear()        (generation g+1 → g+2)
//!                    get(handle{g+1,…}) → ArenaError::StaleHandle
//! ```
//!
//! A handle is valid for the remainder of one top-level call and never
//! afterwards; staleness is detected in O(1) from the generation stamp.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bin;
pub mod config;
pub mod error;
pub mod handle;

pub use bin::RecycleBin;
pub use config::RecycleBinConfig;
pub use error::ArenaError;
pub use handle::MixtureHandle;

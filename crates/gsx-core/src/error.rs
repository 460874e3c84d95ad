//! Error types for core value construction.

use thiserror::Error;

/// Errors from [`TrackParameters`](crate::TrackParameters) construction.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParameterError {
    /// Position or momentum contains NaN or infinity.
    #[error("non-finite {quantity}")]
    NonFinite {
        /// Which quantity was non-finite.
        quantity: &'static str,
    },
    /// Momentum vector has zero magnitude, so no direction exists.
    #[error("momentum has zero magnitude")]
    ZeroMomentum,
    /// Charge is neither -1, 0 nor +1 (in units of e).
    #[error("unsupported charge {charge}")]
    InvalidCharge {
        /// The rejected charge.
        charge: f64,
    },
}

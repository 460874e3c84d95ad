//! Linear-algebra aliases shared across the workspace.

/// Global 3D position or momentum, in mm and MeV respectively.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Covariance of the five local track parameters
/// `(loc1, loc2, phi, theta, q/p)`.
pub type Covariance = nalgebra::Matrix5<f64>;

/// Transverse distance of `v` from the beam (z) axis.
pub fn perp(v: &Vector3) -> f64 {
    v.x.hypot(v.y)
}

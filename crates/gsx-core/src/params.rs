//! Single-hypothesis track parameters bound to a surface.

use crate::error::ParameterError;
use crate::id::SurfaceId;
use crate::math::{perp, Covariance, Vector3};

/// Track parameters expressed on one surface.
///
/// Global position (mm) and momentum (MeV) plus an optional covariance of
/// the five local parameters. Parameters are immutable values; every
/// transport or material update produces a new instance.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackParameters {
    position: Vector3,
    momentum: Vector3,
    charge: f64,
    covariance: Option<Covariance>,
    surface: SurfaceId,
}

impl TrackParameters {
    /// Create parameters on `surface`.
    ///
    /// Rejects non-finite vectors, zero momentum, and charges other
    /// than -1, 0 or +1.
    pub fn new(
        position: Vector3,
        momentum: Vector3,
        charge: f64,
        surface: SurfaceId,
    ) -> Result<Self, ParameterError> {
        if !position.iter().all(|v| v.is_finite()) {
            return Err(ParameterError::NonFinite {
                quantity: "position",
            });
        }
        if !momentum.iter().all(|v| v.is_finite()) {
            return Err(ParameterError::NonFinite {
                quantity: "momentum",
            });
        }
        if momentum.norm_squared() == 0.0 {
            return Err(ParameterError::ZeroMomentum);
        }
        if charge != -1.0 && charge != 0.0 && charge != 1.0 {
            return Err(ParameterError::InvalidCharge { charge });
        }
        Ok(Self {
            position,
            momentum,
            charge,
            covariance: None,
            surface,
        })
    }

    /// Attach a covariance matrix.
    pub fn with_covariance(mut self, covariance: Covariance) -> Self {
        self.covariance = Some(covariance);
        self
    }

    /// Replace the momentum, keeping position and surface.
    ///
    /// Used by material updates, which change momentum magnitude but never
    /// the surface. A zero or non-finite momentum is ignored.
    pub fn with_momentum(mut self, momentum: Vector3) -> Self {
        if momentum.iter().all(|v| v.is_finite()) && momentum.norm_squared() > 0.0 {
            self.momentum = momentum;
        }
        self
    }

    /// Parameters transported to `position` on `surface`, keeping momentum,
    /// charge and covariance.
    pub fn on_surface(&self, position: Vector3, surface: SurfaceId) -> Self {
        Self {
            position,
            surface,
            ..self.clone()
        }
    }

    /// Global position in mm.
    pub fn position(&self) -> &Vector3 {
        &self.position
    }

    /// Global momentum in MeV.
    pub fn momentum(&self) -> &Vector3 {
        &self.momentum
    }

    /// Unit momentum direction.
    pub fn direction(&self) -> Vector3 {
        self.momentum.normalize()
    }

    /// Momentum magnitude in MeV.
    pub fn p(&self) -> f64 {
        self.momentum.norm()
    }

    /// Charge in units of e.
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Covariance of the local parameters, if known.
    pub fn covariance(&self) -> Option<&Covariance> {
        self.covariance.as_ref()
    }

    /// Mutable covariance, for material updates.
    pub fn covariance_mut(&mut self) -> Option<&mut Covariance> {
        self.covariance.as_mut()
    }

    /// The surface these parameters are expressed on.
    pub fn associated_surface(&self) -> SurfaceId {
        self.surface
    }

    /// Transverse radius of the position.
    pub fn perp(&self) -> f64 {
        perp(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TrackParameters {
        TrackParameters::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1000.0, 0.0, 0.0),
            -1.0,
            SurfaceId(0),
        )
        .unwrap()
    }

    #[test]
    fn rejects_zero_momentum() {
        let err = TrackParameters::new(Vector3::zeros(), Vector3::zeros(), 1.0, SurfaceId(0));
        assert_eq!(err, Err(ParameterError::ZeroMomentum));
    }

    #[test]
    fn rejects_nan_position() {
        let err = TrackParameters::new(
            Vector3::new(f64::NAN, 0.0, 0.0),
            Vector3::x(),
            1.0,
            SurfaceId(0),
        );
        assert!(matches!(err, Err(ParameterError::NonFinite { .. })));
    }

    #[test]
    fn rejects_fractional_charge() {
        let err = TrackParameters::new(Vector3::zeros(), Vector3::x(), 0.5, SurfaceId(0));
        assert_eq!(err, Err(ParameterError::InvalidCharge { charge: 0.5 }));
    }

    #[test]
    fn on_surface_keeps_momentum() {
        let p = params();
        let moved = p.on_surface(Vector3::new(5.0, 0.0, 0.0), SurfaceId(9));
        assert_eq!(moved.associated_surface(), SurfaceId(9));
        assert_eq!(moved.momentum(), p.momentum());
        assert_eq!(moved.perp(), 5.0);
    }

    #[test]
    fn with_momentum_ignores_zero() {
        let p = params().with_momentum(Vector3::zeros());
        assert_eq!(p.p(), 1000.0);
        let q = params().with_momentum(Vector3::new(900.0, 0.0, 0.0));
        assert_eq!(q.p(), 900.0);
        assert_eq!(q.associated_surface(), SurfaceId(0));
    }
}

//! Extrapolator configuration and validation.

/// Errors detected while validating an [`ExtrapolatorConfig`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `distance_tolerance` is negative or not finite.
    #[error("distance tolerance must be finite and non-negative, got {value}")]
    InvalidDistanceTolerance {
        /// The rejected value.
        value: f64,
    },
    /// `max_volume_steps` is zero.
    #[error("max_volume_steps must be at least 1")]
    ZeroVolumeSteps,
    /// The oscillation bound can never trigger before the step cap.
    #[error("max_oscillations ({oscillations}) must be below max_volume_steps ({steps})")]
    OscillationBoundUnreachable {
        /// Configured oscillation bound.
        oscillations: u32,
        /// Configured step cap.
        steps: u32,
    },
}

/// Tuning knobs for [`Extrapolator`](crate::Extrapolator).
///
/// The defaults reproduce the reference behaviour: abort the boundary walk
/// after more than 10 oscillations or when the distance to the destination
/// grows by more than 0.01 mm, and apply boundary material.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtrapolatorConfig {
    /// Use the fast (approximate) field model instead of the full one.
    pub fast_field: bool,
    /// Oscillations tolerated before the boundary walk is abandoned.
    pub max_oscillations: u32,
    /// Allowed growth of the distance to the destination per boundary
    /// step, in mm.
    pub distance_tolerance: f64,
    /// Hard cap on boundary steps per call.
    pub max_volume_steps: u32,
    /// Apply material attached to crossed boundary surfaces.
    pub boundary_material_update: bool,
    /// Reject layer intersections that reverse the radial direction
    /// through the inner cover of a tube volume.
    pub radial_check: bool,
}

/// Default oscillation bound.
pub const DEFAULT_MAX_OSCILLATIONS: u32 = 10;
/// Default distance tolerance in mm.
pub const DEFAULT_DISTANCE_TOLERANCE: f64 = 0.01;
/// Default boundary step cap.
pub const DEFAULT_MAX_VOLUME_STEPS: u32 = 256;

impl Default for ExtrapolatorConfig {
    fn default() -> Self {
        Self {
            fast_field: false,
            max_oscillations: DEFAULT_MAX_OSCILLATIONS,
            distance_tolerance: DEFAULT_DISTANCE_TOLERANCE,
            max_volume_steps: DEFAULT_MAX_VOLUME_STEPS,
            boundary_material_update: true,
            radial_check: true,
        }
    }
}

impl ExtrapolatorConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.distance_tolerance.is_finite() || self.distance_tolerance < 0.0 {
            return Err(ConfigError::InvalidDistanceTolerance {
                value: self.distance_tolerance,
            });
        }
        if self.max_volume_steps == 0 {
            return Err(ConfigError::ZeroVolumeSteps);
        }
        if self.max_oscillations >= self.max_volume_steps {
            return Err(ConfigError::OscillationBoundUnreachable {
                oscillations: self.max_oscillations,
                steps: self.max_volume_steps,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(ExtrapolatorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let cfg = ExtrapolatorConfig {
            distance_tolerance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDistanceTolerance { .. })
        ));
    }

    #[test]
    fn nan_tolerance_rejected() {
        let cfg = ExtrapolatorConfig {
            distance_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_steps_rejected() {
        let cfg = ExtrapolatorConfig {
            max_volume_steps: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroVolumeSteps));
    }

    #[test]
    fn oscillation_bound_must_fit_under_step_cap() {
        let cfg = ExtrapolatorConfig {
            max_oscillations: 20,
            max_volume_steps: 20,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OscillationBoundUnreachable { .. })
        ));
    }
}

//! Propagation direction, boundary-check policy, particle hypothesis and
//! material-update mode.

/// Direction of propagation relative to the track momentum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PropDirection {
    /// Propagate along the momentum vector.
    Along,
    /// Propagate against the momentum vector.
    Opposite,
    /// Either sense; the nearest solution wins.
    #[default]
    Any,
}

impl PropDirection {
    /// Signed multiplier applied to the momentum direction:
    /// `+1` along, `-1` opposite, `0` for any.
    pub fn sign(self) -> f64 {
        match self {
            Self::Along => 1.0,
            Self::Opposite => -1.0,
            Self::Any => 0.0,
        }
    }

    /// Whether a concrete sense has been chosen.
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Any)
    }

    /// Direction used for geometry queries: `Any` behaves like `Along`.
    pub fn geometric_sign(self) -> f64 {
        match self {
            Self::Opposite => -1.0,
            Self::Along | Self::Any => 1.0,
        }
    }
}

/// Whether an intersection must fall inside the surface bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BoundaryCheck {
    /// Reject intersections outside the surface bounds.
    #[default]
    Checked,
    /// Accept any intersection with the unbounded surface.
    Unchecked,
}

impl BoundaryCheck {
    /// `true` for [`BoundaryCheck::Checked`].
    pub fn enabled(self) -> bool {
        matches!(self, Self::Checked)
    }
}

impl From<bool> for BoundaryCheck {
    fn from(v: bool) -> Self {
        if v {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

/// Particle species assumed when applying material effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ParticleHypothesis {
    /// Geantino-like: no material interaction at all.
    NonInteracting,
    /// Electron (the default Gaussian-sum use case).
    #[default]
    Electron,
    /// Muon.
    Muon,
    /// Charged pion.
    Pion,
    /// Charged kaon.
    Kaon,
    /// Proton.
    Proton,
}

impl ParticleHypothesis {
    /// Rest mass in MeV.
    pub fn mass(self) -> f64 {
        match self {
            Self::NonInteracting => 0.0,
            Self::Electron => 0.510_998_95,
            Self::Muon => 105.658_375_5,
            Self::Pion => 139.570_39,
            Self::Kaon => 493.677,
            Self::Proton => 938.272_088,
        }
    }

    /// Whether material effects apply to this hypothesis.
    pub fn interacts(self) -> bool {
        !matches!(self, Self::NonInteracting)
    }
}

/// Which share of a layer's material an update applies.
///
/// Crossing a layer is split in two halves: the part "before" the layer
/// surface and the part "after" it. A full crossing applies both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialUpdateMode {
    /// About to cross the layer: apply the pre-surface share.
    Pre,
    /// Just crossed the layer: apply the post-surface share.
    Post,
    /// Apply the whole layer.
    Full,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_signs() {
        assert_eq!(PropDirection::Along.sign(), 1.0);
        assert_eq!(PropDirection::Opposite.sign(), -1.0);
        assert_eq!(PropDirection::Any.sign(), 0.0);
        assert!(!PropDirection::Any.is_resolved());
        assert_eq!(PropDirection::Any.geometric_sign(), 1.0);
    }

    #[test]
    fn non_interacting_has_no_material() {
        assert!(!ParticleHypothesis::NonInteracting.interacts());
        assert!(ParticleHypothesis::Electron.interacts());
        assert!(ParticleHypothesis::Muon.mass() > ParticleHypothesis::Electron.mass());
    }

    #[test]
    fn boundary_check_from_bool() {
        assert_eq!(BoundaryCheck::from(true), BoundaryCheck::Checked);
        assert!(!BoundaryCheck::from(false).enabled());
    }
}

//! Layer material description.

/// Radiation length of silicon in mm.
const SILICON_X0: f64 = 93.7;

/// Most probable ionisation loss in silicon, MeV per mm.
const SILICON_DE_DX: f64 = 0.39;

/// Homogeneous slab material attached to a layer.
///
/// `pre_factor` is the share of the material placed in front of the layer
/// surface when travelling along the layer normal; the remaining
/// `1 - pre_factor` sits behind it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialProperties {
    /// Slab thickness in mm.
    pub thickness: f64,
    /// Radiation length in mm.
    pub x0: f64,
    /// Mean energy loss per mm, MeV.
    pub de_dx: f64,
    /// Share of the material in front of the surface, in `[0, 1]`.
    pub pre_factor: f64,
}

impl MaterialProperties {
    /// A silicon slab of `thickness` mm, split evenly around the surface.
    pub fn silicon(thickness: f64) -> Self {
        Self {
            thickness,
            x0: SILICON_X0,
            de_dx: SILICON_DE_DX,
            pre_factor: 0.5,
        }
    }

    /// Set the pre/post split.
    pub fn with_pre_factor(mut self, pre_factor: f64) -> Self {
        self.pre_factor = pre_factor;
        self
    }

    /// Thickness in radiation lengths.
    pub fn thickness_in_x0(&self) -> f64 {
        if self.x0 > 0.0 {
            self.thickness / self.x0
        } else {
            0.0
        }
    }

    /// Whether the material has a measurable effect.
    pub fn is_effective(&self) -> bool {
        self.thickness > 0.0 && (self.x0 > 0.0 || self.de_dx > 0.0)
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.thickness.is_finite()
            && self.x0.is_finite()
            && self.de_dx.is_finite()
            && self.thickness >= 0.0
            && self.x0 >= 0.0
            && self.de_dx >= 0.0
            && (0.0..=1.0).contains(&self.pre_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silicon_thickness_in_x0() {
        let m = MaterialProperties::silicon(0.937);
        assert!((m.thickness_in_x0() - 0.01).abs() < 1e-12);
        assert!(m.is_effective());
        assert!(m.is_valid());
    }

    #[test]
    fn pre_factor_out_of_range_is_invalid() {
        assert!(!MaterialProperties::silicon(1.0).with_pre_factor(1.5).is_valid());
    }

    #[test]
    fn zero_thickness_is_ineffective() {
        assert!(!MaterialProperties::silicon(0.0).is_effective());
    }
}

//! Magnetic-field model selection.

/// Which field model a propagator should integrate in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FieldMode {
    /// No field: straight lines.
    NoField,
    /// Cached, interpolated field map.
    FastField,
    /// Full field evaluation.
    #[default]
    FullField,
}

/// Field properties passed to every propagation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FieldProperties {
    /// The field model.
    pub mode: FieldMode,
}

impl FieldProperties {
    /// Properties for the given mode.
    pub fn new(mode: FieldMode) -> Self {
        Self { mode }
    }

    /// Fast or full field, as selected by a boolean switch.
    pub fn from_fast_flag(fast: bool) -> Self {
        Self::new(if fast {
            FieldMode::FastField
        } else {
            FieldMode::FullField
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_flag_selects_mode() {
        assert_eq!(FieldProperties::from_fast_flag(true).mode, FieldMode::FastField);
        assert_eq!(FieldProperties::from_fast_flag(false).mode, FieldMode::FullField);
    }
}

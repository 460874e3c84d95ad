//! Weighted mixtures of track-parameter hypotheses.
//!
//! A [`MultiComponentState`] is the Gaussian-sum representation of a track:
//! an ordered list of [`Component`]s, each a full parameter set with a
//! weight. The order carries no physics but is kept stable so that two runs
//! over the same input produce bit-identical output.

use smallvec::SmallVec;

use crate::id::SurfaceId;
use crate::params::TrackParameters;

/// One weighted track-parameter hypothesis.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// The hypothesis.
    pub parameters: TrackParameters,
    /// Mixture weight. Non-negative; weights need not sum to one.
    pub weight: f64,
}

impl Component {
    /// Create a component.
    pub fn new(parameters: TrackParameters, weight: f64) -> Self {
        Self { parameters, weight }
    }
}

/// Ordered mixture of components.
///
/// Uses `SmallVec<[Component; 6]>` to keep typical electron mixtures
/// inline; larger mixtures spill to the heap transparently.
///
/// An empty mixture is the "no result" value used throughout the
/// extrapolation engine in place of errors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiComponentState {
    components: SmallVec<[Component; 6]>,
}

impl MultiComponentState {
    /// The empty mixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// A one-component mixture with unit weight.
    pub fn single(parameters: TrackParameters) -> Self {
        let mut state = Self::new();
        state.push(Component::new(parameters, 1.0));
        state
    }

    /// Append a component.
    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// `true` for the "no result" mixture.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Drop all components.
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// The components, in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Iterate over components.
    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    /// Iterate mutably over components.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Component> {
        self.components.iter_mut()
    }

    /// Parameters of the first component.
    ///
    /// All geometry decisions (which volume, which layer, which way) are
    /// taken on the leading component.
    pub fn leading(&self) -> Option<&TrackParameters> {
        self.components.first().map(|c| &c.parameters)
    }

    /// The surface shared by every component, or `None` if the mixture is
    /// empty or its components disagree.
    pub fn surface(&self) -> Option<SurfaceId> {
        let first = self.leading()?.associated_surface();
        self.components
            .iter()
            .all(|c| c.parameters.associated_surface() == first)
            .then_some(first)
    }

    /// Whether the mixture is non-empty and entirely on `surface`.
    pub fn is_on_surface(&self, surface: SurfaceId) -> bool {
        self.surface() == Some(surface)
    }

    /// Sum of component weights.
    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(|c| c.weight).sum()
    }

    /// Component weights in order.
    pub fn weights(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.weight).collect()
    }

    /// Rescale the weights so that they sum to `total`.
    ///
    /// No-op when the current sum is zero.
    pub fn renormalise(&mut self, total: f64) {
        let sum = self.total_weight();
        if sum <= 0.0 {
            return;
        }
        let scale = total / sum;
        for c in &mut self.components {
            c.weight *= scale;
        }
    }
}

impl FromIterator<Component> for MultiComponentState {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MultiComponentState {
    type Item = Component;
    type IntoIter = smallvec::IntoIter<[Component; 6]>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.into_iter()
    }
}

impl<'a> IntoIterator for &'a MultiComponentState {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use proptest::prelude::*;

    fn params_on(surface: u32) -> TrackParameters {
        TrackParameters::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1000.0, 0.0),
            1.0,
            SurfaceId(surface),
        )
        .unwrap()
    }

    #[test]
    fn empty_has_no_surface() {
        let s = MultiComponentState::new();
        assert!(s.is_empty());
        assert_eq!(s.surface(), None);
        assert!(s.leading().is_none());
    }

    #[test]
    fn mixed_surfaces_report_none() {
        let s: MultiComponentState = [
            Component::new(params_on(1), 0.5),
            Component::new(params_on(2), 0.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(s.surface(), None);
        assert!(!s.is_on_surface(SurfaceId(1)));
    }

    #[test]
    fn single_is_on_its_surface() {
        let s = MultiComponentState::single(params_on(4));
        assert!(s.is_on_surface(SurfaceId(4)));
        assert_eq!(s.total_weight(), 1.0);
    }

    #[test]
    fn renormalise_zero_sum_is_noop() {
        let mut s: MultiComponentState = [Component::new(params_on(1), 0.0)].into_iter().collect();
        s.renormalise(1.0);
        assert_eq!(s.weights(), vec![0.0]);
    }

    proptest! {
        #[test]
        fn renormalise_preserves_ratios(weights in prop::collection::vec(0.01f64..10.0, 1..12)) {
            let mut s: MultiComponentState = weights
                .iter()
                .map(|&w| Component::new(params_on(0), w))
                .collect();
            s.renormalise(1.0);
            prop_assert!((s.total_weight() - 1.0).abs() < 1e-9);
            let after = s.weights();
            for i in 1..weights.len() {
                let before_ratio = weights[i] / weights[0];
                let after_ratio = after[i] / after[0];
                prop_assert!((before_ratio - after_ratio).abs() < 1e-9 * before_ratio.max(1.0));
            }
        }
    }
}

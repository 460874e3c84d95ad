//! The [`MaterialUpdater`] trait.

use gsx_core::{LayerId, MaterialUpdateMode, MultiComponentState, ParticleHypothesis, PropDirection};

use crate::scratch::MaterialEffectsScratch;

/// Applies a layer's material effects to a mixture.
///
/// # Contract
///
/// - The returned mixture is on the same surface as the input.
/// - An empty return means "no change" (the layer has no material, or the
///   update was not possible); callers keep the input.
/// - Any per-call working memory comes from `scratch`, which the caller
///   owns exclusively for the duration of the call.
pub trait MaterialUpdater: Send + Sync {
    /// Apply the `mode` share of `layer`'s material.
    fn update(
        &self,
        scratch: &mut MaterialEffectsScratch,
        state: &MultiComponentState,
        layer: LayerId,
        direction: PropDirection,
        particle: ParticleHypothesis,
        mode: MaterialUpdateMode,
    ) -> MultiComponentState;

    /// Apply the share of material in front of the layer surface.
    fn pre_update(
        &self,
        scratch: &mut MaterialEffectsScratch,
        state: &MultiComponentState,
        layer: LayerId,
        direction: PropDirection,
        particle: ParticleHypothesis,
    ) -> MultiComponentState {
        self.update(
            scratch,
            state,
            layer,
            direction,
            particle,
            MaterialUpdateMode::Pre,
        )
    }

    /// Apply the share of material behind the layer surface.
    fn post_update(
        &self,
        scratch: &mut MaterialEffectsScratch,
        state: &MultiComponentState,
        layer: LayerId,
        direction: PropDirection,
        particle: ParticleHypothesis,
    ) -> MultiComponentState {
        self.update(
            scratch,
            state,
            layer,
            direction,
            particle,
            MaterialUpdateMode::Post,
        )
    }
}

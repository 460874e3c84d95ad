//! Integration test: the radial-direction check on layer crossings.
//!
//! The check is a heuristic. It only runs in tube volumes (four boundary
//! surfaces) and, when a crossing flips the radial sense of the track,
//! compares the distance to the layer with the distance to the inner
//! cover. It may reject valid geometries with proxy shapes: a track that
//! legitimately passes the axis and then reaches a layer on the far side
//! crosses that layer without its material.
//!
//! Along the chain geometry's x axis the radius is `|x|`, so a track at
//! negative x moving towards +x is inbound until it passes the origin.

use std::sync::Arc;

use gsx_core::{
    BoundaryCheck, LayerId, MaterialUpdateMode, ParticleHypothesis, PropDirection, SurfaceId,
    TrackingGeometry,
};
use gsx_engine::{Cache, Extrapolator, ExtrapolatorConfig};
use gsx_test_utils::{
    state_at, ChainGeometry, RecordingMaterialUpdater, ScriptedNavigator, TeleportPropagator,
};

struct Tube {
    geometry: Arc<ChainGeometry>,
    start: LayerId,
    far: LayerId,
    destination: LayerId,
}

/// One volume `[-100, 100)`: a bare start layer at -60, a material layer
/// at 40 beyond the axis and the destination at 80. With `inner_cover`
/// the volume has four boundaries and its inner cover sits at -20.
fn tube(inner_cover: bool) -> Tube {
    let mut g = ChainGeometry::new();
    let v = if inner_cover {
        g.add_tube_volume(-100.0, 100.0, -20.0)
    } else {
        g.add_volume(-100.0, 100.0)
    };
    let start = g.add_layer(v, -60.0, false);
    let far = g.add_layer(v, 40.0, true);
    let destination = g.add_layer(v, 80.0, true);
    Tube {
        geometry: Arc::new(g),
        start,
        far,
        destination,
    }
}

impl Tube {
    fn surface(&self, layer: LayerId) -> SurfaceId {
        self.geometry.layer_surface(layer).unwrap()
    }

    fn run(
        &self,
        from: LayerId,
        radial_check: bool,
    ) -> (Vec<(LayerId, MaterialUpdateMode)>, Cache) {
        let material = Arc::new(RecordingMaterialUpdater::new());
        let ex = Extrapolator::new(
            self.geometry.clone(),
            Arc::new(TeleportPropagator::new(self.geometry.clone())),
            Arc::new(ScriptedNavigator::new(self.geometry.clone())),
            material.clone(),
            ExtrapolatorConfig {
                radial_check,
                ..ExtrapolatorConfig::default()
            },
        )
        .unwrap();
        let x = self.geometry.surface_x(self.surface(from)).unwrap();
        let target = self.surface(self.destination);
        let mut cache = Cache::new();
        let out = ex.extrapolate(
            &mut cache,
            &state_at(x, true, self.surface(from)),
            target,
            PropDirection::Along,
            BoundaryCheck::Checked,
            ParticleHypothesis::Electron,
        );
        assert!(out.is_on_surface(target));
        (material.log(), cache)
    }
}

#[test]
fn radial_check_may_reject_valid_geometries_with_proxy_shapes() {
    let t = tube(true);
    let (log, cache) = t.run(t.start, true);

    // The layer at 40 is 100 away; the inner cover only 40. The crossing is
    // rejected and the walk goes on from the unchanged state.
    assert_eq!(log, vec![(t.destination, MaterialUpdateMode::Pre)]);
    let m = cache.metrics();
    assert_eq!(m.intermediate_layer_steps, 0);
    assert_eq!(m.fallbacks, 0);
    assert_eq!(m.material_updates, 1);
}

#[test]
fn disabling_the_radial_check_accepts_the_crossing() {
    let t = tube(true);
    let (log, cache) = t.run(t.start, false);
    assert_eq!(
        log,
        vec![
            (t.far, MaterialUpdateMode::Full),
            (t.destination, MaterialUpdateMode::Pre),
        ]
    );
    assert_eq!(cache.metrics().intermediate_layer_steps, 1);
    assert_eq!(cache.metrics().material_updates, 2);
}

#[test]
fn volumes_without_four_boundaries_are_never_checked() {
    let t = tube(false);
    let (log, cache) = t.run(t.start, true);
    assert_eq!(
        log,
        vec![
            (t.far, MaterialUpdateMode::Full),
            (t.destination, MaterialUpdateMode::Pre),
        ]
    );
    assert_eq!(cache.metrics().intermediate_layer_steps, 1);
}

#[test]
fn crossings_that_keep_their_radial_sense_are_never_checked() {
    let mut g = ChainGeometry::new();
    let v = g.add_tube_volume(-100.0, 100.0, -20.0);
    let start = g.add_layer(v, 10.0, false);
    let far = g.add_layer(v, 40.0, true);
    let destination = g.add_layer(v, 80.0, true);
    let t = Tube {
        geometry: Arc::new(g),
        start,
        far,
        destination,
    };
    let (log, _) = t.run(t.start, true);
    assert_eq!(
        log,
        vec![
            (t.far, MaterialUpdateMode::Full),
            (t.destination, MaterialUpdateMode::Pre),
        ]
    );
}

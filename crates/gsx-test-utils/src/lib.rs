//! Test utilities and mock collaborators for gsx development.
//!
//! Provides a scriptable one-dimensional geometry ([`ChainGeometry`]) with
//! matching [`TeleportPropagator`] and [`ScriptedNavigator`], a
//! [`RecordingMaterialUpdater`] that logs every update it is asked for,
//! and in [`fixtures`] a small cylindrical detector built from the real
//! geometry and reference collaborators.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gsx_core::{
    BoundaryCheck, Component, LayerId, MaterialUpdateMode, MultiComponentState,
    ParticleHypothesis, PropDirection, SurfaceId, TrackParameters, TrackingGeometry, Vector3,
    VolumeId,
};
use gsx_propagator::{
    FieldProperties, MaterialEffectsScratch, MaterialUpdater, NavigationCell, Navigator,
    Propagator,
};

/// Thickness of every chain layer.
pub const CHAIN_LAYER_THICKNESS: f64 = 1.0;

struct ChainVolume {
    x_min: f64,
    x_max: f64,
    boundaries: Vec<SurfaceId>,
    layers: Vec<LayerId>,
}

struct ChainLayer {
    surface: SurfaceId,
    volume: VolumeId,
    material: bool,
}

struct ChainSurface {
    x: f64,
    layer: Option<LayerId>,
    material_layer: Option<LayerId>,
}

/// A geometry laid out along the x axis.
///
/// Volumes are intervals `[x_min, x_max)`, each with two boundary surfaces
/// (planes at its ends); layers are planes at fixed x. Layer neighbours
/// default to x order inside the volume, but any link can be overridden
/// with [`link`](ChainGeometry::link), including into cycles.
pub struct ChainGeometry {
    volumes: Vec<ChainVolume>,
    layers: Vec<ChainLayer>,
    surfaces: Vec<ChainSurface>,
    links: HashMap<(LayerId, bool), Option<LayerId>>,
}

impl ChainGeometry {
    pub fn new() -> Self {
        Self {
            volumes: Vec::new(),
            layers: Vec::new(),
            surfaces: Vec::new(),
            links: HashMap::new(),
        }
    }

    fn push_surface(&mut self, x: f64, layer: Option<LayerId>) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(ChainSurface {
            x,
            layer,
            material_layer: None,
        });
        id
    }

    /// Add the volume `[x_min, x_max)` with boundary planes at both ends.
    pub fn add_volume(&mut self, x_min: f64, x_max: f64) -> VolumeId {
        let id = VolumeId(self.volumes.len() as u32);
        let low = self.push_surface(x_min, None);
        let high = self.push_surface(x_max, None);
        self.volumes.push(ChainVolume {
            x_min,
            x_max,
            boundaries: vec![low, high],
            layers: Vec::new(),
        });
        id
    }

    /// Add the volume `[x_min, x_max)` shaped like a tube: four boundaries
    /// in the order negative end, positive end, outer cover (the positive
    /// end again) and an inner cover plane at `inner_x`.
    pub fn add_tube_volume(&mut self, x_min: f64, x_max: f64, inner_x: f64) -> VolumeId {
        let id = self.add_volume(x_min, x_max);
        let inner = self.push_surface(inner_x, None);
        let boundaries = &mut self.volumes[id.0 as usize].boundaries;
        let high = boundaries[1];
        boundaries.extend([high, inner]);
        id
    }

    /// Add a layer plane at `x` inside `volume`.
    pub fn add_layer(&mut self, volume: VolumeId, x: f64, material: bool) -> LayerId {
        let id = LayerId(self.layers.len() as u32);
        let surface = self.push_surface(x, Some(id));
        self.layers.push(ChainLayer {
            surface,
            volume,
            material,
        });
        let layers = &mut self.volumes[volume.0 as usize].layers;
        layers.push(id);
        let surfaces = &self.surfaces;
        let all = &self.layers;
        layers.sort_by(|a, b| {
            let xa = surfaces[all[a.0 as usize].surface.0 as usize].x;
            let xb = surfaces[all[b.0 as usize].surface.0 as usize].x;
            xa.total_cmp(&xb)
        });
        id
    }

    /// Add a free plane at `x` with no layer.
    pub fn add_surface(&mut self, x: f64) -> SurfaceId {
        self.push_surface(x, None)
    }

    /// Attach a material layer to a boundary surface.
    pub fn set_boundary_material(&mut self, volume: VolumeId, surface: SurfaceId) -> LayerId {
        let id = LayerId(self.layers.len() as u32);
        self.layers.push(ChainLayer {
            surface,
            volume,
            material: true,
        });
        self.surfaces[surface.0 as usize].material_layer = Some(id);
        id
    }

    /// Override the neighbour of `from` when moving towards +x
    /// (`outward`) or -x.
    pub fn link(&mut self, from: LayerId, outward: bool, to: Option<LayerId>) {
        self.links.insert((from, outward), to);
    }

    /// The x position of `surface`.
    pub fn surface_x(&self, surface: SurfaceId) -> Option<f64> {
        self.surfaces.get(surface.0 as usize).map(|s| s.x)
    }

    fn layer_x(&self, layer: LayerId) -> Option<f64> {
        let l = self.layers.get(layer.0 as usize)?;
        self.surface_x(l.surface)
    }
}

impl Default for ChainGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingGeometry for ChainGeometry {
    fn highest_volume(&self) -> Option<VolumeId> {
        (!self.volumes.is_empty()).then_some(VolumeId(0))
    }

    fn volume_at(&self, position: &Vector3) -> Option<VolumeId> {
        self.volumes
            .iter()
            .position(|v| position.x >= v.x_min && position.x < v.x_max)
            .map(|i| VolumeId(i as u32))
    }

    fn associated_layer(&self, volume: VolumeId, position: &Vector3) -> Option<LayerId> {
        let v = self.volumes.get(volume.0 as usize)?;
        v.layers.iter().copied().find(|&l| {
            self.layer_x(l)
                .is_some_and(|x| (x - position.x).abs() <= 0.5 * CHAIN_LAYER_THICKNESS)
        })
    }

    fn next_layer_in_volume(
        &self,
        volume: VolumeId,
        position: &Vector3,
        direction: &Vector3,
    ) -> Option<LayerId> {
        let v = self.volumes.get(volume.0 as usize)?;
        let sign = if direction.x >= 0.0 { 1.0 } else { -1.0 };
        v.layers
            .iter()
            .filter_map(|&l| self.layer_x(l).map(|x| (l, (x - position.x) * sign)))
            .filter(|&(_, d)| d > 1e-9)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(l, _)| l)
    }

    fn next_layer(
        &self,
        layer: LayerId,
        _position: &Vector3,
        direction: &Vector3,
    ) -> Option<LayerId> {
        let outward = direction.x >= 0.0;
        if let Some(&scripted) = self.links.get(&(layer, outward)) {
            return scripted;
        }
        let l = self.layers.get(layer.0 as usize)?;
        let order = &self.volumes.get(l.volume.0 as usize)?.layers;
        let i = order.iter().position(|&o| o == layer)?;
        if outward {
            order.get(i + 1).copied()
        } else {
            i.checked_sub(1).and_then(|j| order.get(j).copied())
        }
    }

    fn has_confined_layers(&self, volume: VolumeId) -> bool {
        self.volumes
            .get(volume.0 as usize)
            .is_some_and(|v| !v.layers.is_empty())
    }

    fn boundary_surfaces(&self, volume: VolumeId) -> &[SurfaceId] {
        self.volumes
            .get(volume.0 as usize)
            .map(|v| v.boundaries.as_slice())
            .unwrap_or(&[])
    }

    fn enclosing_volume(&self, layer: LayerId) -> Option<VolumeId> {
        self.layers.get(layer.0 as usize).map(|l| l.volume)
    }

    fn surface_layer(&self, surface: SurfaceId) -> Option<LayerId> {
        self.surfaces.get(surface.0 as usize)?.layer
    }

    fn surface_material_layer(&self, surface: SurfaceId) -> Option<LayerId> {
        self.surfaces.get(surface.0 as usize)?.material_layer
    }

    fn layer_surface(&self, layer: LayerId) -> Option<SurfaceId> {
        self.layers.get(layer.0 as usize).map(|l| l.surface)
    }

    fn layer_has_material(&self, layer: LayerId) -> bool {
        self.layers
            .get(layer.0 as usize)
            .is_some_and(|l| l.material)
    }

    fn layer_thickness(&self, layer: LayerId) -> f64 {
        if (layer.0 as usize) < self.layers.len() {
            CHAIN_LAYER_THICKNESS
        } else {
            0.0
        }
    }

    fn surface_reference_point(&self, surface: SurfaceId) -> Option<Vector3> {
        self.surface_x(surface).map(|x| Vector3::new(x, 0.0, 0.0))
    }

    fn is_on_surface(&self, surface: SurfaceId, position: &Vector3, tolerance: f64) -> bool {
        self.surface_x(surface)
            .is_some_and(|x| (position.x - x).abs() <= tolerance)
    }
}

/// Moves parameters along x onto the target plane of a [`ChainGeometry`].
///
/// Honours the propagation sense against the sign of the momentum's x
/// component. Parameters already on the target only "move" with
/// [`PropDirection::Any`]. Surfaces marked with
/// [`fail_on`](TeleportPropagator::fail_on) are unreachable.
pub struct TeleportPropagator {
    geometry: Arc<ChainGeometry>,
    failing: HashSet<SurfaceId>,
    calls: AtomicUsize,
}

impl TeleportPropagator {
    pub fn new(geometry: Arc<ChainGeometry>) -> Self {
        Self {
            geometry,
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make `surface` unreachable.
    pub fn fail_on(mut self, surface: SurfaceId) -> Self {
        self.failing.insert(surface);
        self
    }

    /// Number of single-parameter propagations performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Propagator for TeleportPropagator {
    fn name(&self) -> &str {
        "teleport"
    }

    fn propagate_parameters(
        &self,
        parameters: &TrackParameters,
        surface: SurfaceId,
        direction: PropDirection,
        _boundary_check: BoundaryCheck,
        _field: &FieldProperties,
        _particle: ParticleHypothesis,
    ) -> Option<TrackParameters> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(&surface) {
            return None;
        }
        let target = self.geometry.surface_x(surface)?;
        let delta = (target - parameters.position().x) * parameters.momentum().x.signum();
        let on_target = parameters.associated_surface() == surface;
        let admissible = match direction {
            PropDirection::Along => delta > 1e-9 || (!on_target && delta >= -1e-9),
            PropDirection::Opposite => delta < -1e-9 || (!on_target && delta <= 1e-9),
            PropDirection::Any => true,
        };
        admissible.then(|| {
            let p = parameters.position();
            parameters.on_surface(Vector3::new(target, p.y, p.z), surface)
        })
    }
}

/// Navigator over a [`ChainGeometry`].
///
/// By default a volume is left through the boundary plane in the direction
/// of travel, into whichever volume lies just beyond it. Scripted
/// [`route`](ScriptedNavigator::route)s replace that for single volumes.
pub struct ScriptedNavigator {
    geometry: Arc<ChainGeometry>,
    routes: HashMap<VolumeId, Option<(SurfaceId, VolumeId)>>,
    world: Option<VolumeId>,
    crossings: AtomicUsize,
}

impl ScriptedNavigator {
    pub fn new(geometry: Arc<ChainGeometry>) -> Self {
        let world = geometry.highest_volume();
        Self {
            geometry,
            routes: HashMap::new(),
            world,
            crossings: AtomicUsize::new(0),
        }
    }

    /// Leave `from` through `via` into `to`.
    pub fn route(mut self, from: VolumeId, via: SurfaceId, to: VolumeId) -> Self {
        self.routes.insert(from, Some((via, to)));
        self
    }

    /// Make `from` a dead end.
    pub fn dead_end(mut self, from: VolumeId) -> Self {
        self.routes.insert(from, None);
        self
    }

    /// Pretend there is no world volume.
    pub fn without_world(mut self) -> Self {
        self.world = None;
        self
    }

    /// Number of `next_tracking_volume` calls answered.
    pub fn crossings(&self) -> usize {
        self.crossings.load(Ordering::Relaxed)
    }

    fn default_route(
        &self,
        parameters: &TrackParameters,
        direction: PropDirection,
        current: VolumeId,
    ) -> Option<(SurfaceId, VolumeId)> {
        let forward = parameters.momentum().x * direction.geometric_sign() >= 0.0;
        let boundaries = self.geometry.boundary_surfaces(current);
        let via = *boundaries.get(if forward { 1 } else { 0 })?;
        let x = self.geometry.surface_x(via)?;
        let probe = if forward { x + 1e-6 } else { x - 1e-6 };
        let to = self.geometry.volume_at(&Vector3::new(probe, 0.0, 0.0))?;
        Some((via, to))
    }
}

impl Navigator for ScriptedNavigator {
    fn volume(&self, position: &Vector3) -> Option<VolumeId> {
        self.geometry.volume_at(position)
    }

    fn highest_volume(&self) -> Option<VolumeId> {
        self.world
    }

    fn next_tracking_volume(
        &self,
        propagator: &dyn Propagator,
        parameters: &TrackParameters,
        direction: PropDirection,
        current: VolumeId,
        field: &FieldProperties,
    ) -> NavigationCell {
        self.crossings.fetch_add(1, Ordering::Relaxed);
        let route = match self.routes.get(&current) {
            Some(scripted) => *scripted,
            None => self.default_route(parameters, direction, current),
        };
        let Some((via, to)) = route else {
            return NavigationCell::dead_end();
        };
        match propagator.propagate_parameters(
            parameters,
            via,
            PropDirection::Any,
            BoundaryCheck::Checked,
            field,
            ParticleHypothesis::NonInteracting,
        ) {
            Some(on_boundary) => NavigationCell::new(to, on_boundary),
            None => NavigationCell::dead_end(),
        }
    }
}

/// Fractional momentum loss applied by [`RecordingMaterialUpdater`] for a
/// full layer.
pub const RECORDED_LOSS: f64 = 0.01;

/// Material updater that logs every call and scales momentum by a fixed
/// loss (half of it for pre and post updates).
pub struct RecordingMaterialUpdater {
    log: Mutex<Vec<(LayerId, MaterialUpdateMode)>>,
    inert: HashSet<LayerId>,
}

impl RecordingMaterialUpdater {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            inert: HashSet::new(),
        }
    }

    /// Return the empty mixture for `layer`.
    pub fn inert(mut self, layer: LayerId) -> Self {
        self.inert.insert(layer);
        self
    }

    /// Every update requested so far, in order.
    pub fn log(&self) -> Vec<(LayerId, MaterialUpdateMode)> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Updates requested for `layer`.
    pub fn updates_for(&self, layer: LayerId) -> Vec<MaterialUpdateMode> {
        self.log()
            .into_iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut l) = self.log.lock() {
            l.clear();
        }
    }
}

impl Default for RecordingMaterialUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialUpdater for RecordingMaterialUpdater {
    fn update(
        &self,
        _scratch: &mut MaterialEffectsScratch,
        state: &MultiComponentState,
        layer: LayerId,
        _direction: PropDirection,
        _particle: ParticleHypothesis,
        mode: MaterialUpdateMode,
    ) -> MultiComponentState {
        if let Ok(mut l) = self.log.lock() {
            l.push((layer, mode));
        }
        if self.inert.contains(&layer) {
            return MultiComponentState::new();
        }
        let share = match mode {
            MaterialUpdateMode::Full => 1.0,
            MaterialUpdateMode::Pre | MaterialUpdateMode::Post => 0.5,
        };
        state
            .iter()
            .map(|c| {
                let momentum = c.parameters.momentum() * (1.0 - RECORDED_LOSS * share);
                Component::new(c.parameters.clone().with_momentum(momentum), c.weight)
            })
            .collect()
    }
}

/// A single-component state at `x` on the axis, moving towards +x
/// (`forward`) or -x, expressed on `surface`.
pub fn state_at(x: f64, forward: bool, surface: SurfaceId) -> MultiComponentState {
    let px = if forward { 1000.0 } else { -1000.0 };
    TrackParameters::new(Vector3::new(x, 0.0, 0.0), Vector3::new(px, 0.0, 0.0), -1.0, surface)
        .map(MultiComponentState::single)
        .unwrap_or_default()
}

/// A mixture of `weights.len()` components around `parameters`, each with
/// slightly different momentum magnitude.
pub fn mixture_around(parameters: &TrackParameters, weights: &[f64]) -> MultiComponentState {
    weights
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let scale = 1.0 - 0.02 * i as f64;
            Component::new(
                parameters
                    .clone()
                    .with_momentum(parameters.momentum() * scale),
                w,
            )
        })
        .collect()
}

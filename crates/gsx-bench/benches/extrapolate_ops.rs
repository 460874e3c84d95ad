//! Criterion benchmarks for navigated and direct extrapolation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use gsx_bench::{generate_tracks, reference_detector, stress_detector, BenchDetector};
use gsx_core::{BoundaryCheck, MultiComponentState, ParticleHypothesis, PropDirection, SurfaceId};
use gsx_engine::{Cache, Extrapolator, ExtrapolatorConfig};

const TRACKS: usize = 200;
const SEED: u64 = 42;

fn setup(detector: &BenchDetector, components: usize) -> (Extrapolator, Vec<MultiComponentState>) {
    let ex = detector.extrapolator(ExtrapolatorConfig::default()).unwrap();
    let tracks = generate_tracks(SEED, TRACKS, components, detector.beam_spot);
    (ex, tracks)
}

fn navigated(
    ex: &Extrapolator,
    cache: &mut Cache,
    tracks: &[MultiComponentState],
    target: SurfaceId,
) {
    for track in tracks {
        let out = ex.extrapolate(
            cache,
            track,
            target,
            PropDirection::Along,
            BoundaryCheck::Checked,
            ParticleHypothesis::Electron,
        );
        black_box(&out);
    }
}

/// Benchmark: 200 single-component electrons to the calorimeter face.
fn bench_navigated_single_component(c: &mut Criterion) {
    let d = reference_detector().unwrap();
    let (ex, tracks) = setup(&d, 1);
    let mut cache = Cache::new();
    c.bench_function("navigated_1c_calo_200", |b| {
        b.iter(|| navigated(&ex, &mut cache, &tracks, d.calo_face));
    });
}

/// Benchmark: 200 six-component mixtures to the calorimeter face.
fn bench_navigated_mixture(c: &mut Criterion) {
    let d = reference_detector().unwrap();
    let (ex, tracks) = setup(&d, 6);
    let mut cache = Cache::new();
    c.bench_function("navigated_6c_calo_200", |b| {
        b.iter(|| navigated(&ex, &mut cache, &tracks, d.calo_face));
    });
}

/// Benchmark: 200 six-component mixtures to the last strip layer.
fn bench_navigated_to_layer(c: &mut Criterion) {
    let d = reference_detector().unwrap();
    let (ex, tracks) = setup(&d, 6);
    let mut cache = Cache::new();
    c.bench_function("navigated_6c_last_strip_200", |b| {
        b.iter(|| navigated(&ex, &mut cache, &tracks, d.last_strip));
    });
}

/// Benchmark: the same mixtures propagated directly, without material.
fn bench_direct_mixture(c: &mut Criterion) {
    let d = reference_detector().unwrap();
    let (ex, tracks) = setup(&d, 6);
    c.bench_function("direct_6c_calo_200", |b| {
        b.iter(|| {
            for track in &tracks {
                let out = ex.extrapolate_directly(
                    track,
                    d.calo_face,
                    PropDirection::Along,
                    BoundaryCheck::Checked,
                    ParticleHypothesis::Electron,
                );
                black_box(&out);
            }
        });
    });
}

/// Benchmark: six-component mixtures through forty material layers.
fn bench_navigated_stress(c: &mut Criterion) {
    let d = stress_detector().unwrap();
    let (ex, tracks) = setup(&d, 6);
    let mut cache = Cache::new();
    c.bench_function("navigated_6c_stress_200", |b| {
        b.iter(|| navigated(&ex, &mut cache, &tracks, d.calo_face));
    });
}

criterion_group!(
    benches,
    bench_navigated_single_component,
    bench_navigated_mixture,
    bench_navigated_to_layer,
    bench_direct_mixture,
    bench_navigated_stress
);
criterion_main!(benches);

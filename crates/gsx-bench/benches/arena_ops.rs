//! Criterion micro-benchmarks for the per-call recycle bin.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use gsx_arena::{RecycleBin, RecycleBinConfig};
use gsx_bench::{generate_tracks, reference_detector};

/// Benchmark: one call's worth of pushes and lookups, then a clear.
fn bench_push_get_clear(c: &mut Criterion) {
    let d = reference_detector().unwrap();
    let states = generate_tracks(9, 12, 6, d.beam_spot);
    let mut bin = RecycleBin::new(&RecycleBinConfig::default());

    c.bench_function("recycle_bin_12x6c", |b| {
        b.iter(|| {
            let handles: Vec<_> = states.iter().map(|s| bin.push(s.clone())).collect();
            for h in &handles {
                black_box(bin.get(*h).unwrap());
            }
            bin.clear();
        });
    });
}

/// Benchmark: stale-handle detection after many generations.
fn bench_stale_lookup(c: &mut Criterion) {
    let d = reference_detector().unwrap();
    let state = generate_tracks(1, 1, 6, d.beam_spot).remove(0);
    let mut bin = RecycleBin::new(&RecycleBinConfig::default());
    let stale = bin.push(state.clone());
    bin.clear();
    bin.push(state);

    c.bench_function("recycle_bin_stale_lookup", |b| {
        b.iter(|| black_box(bin.get(stale).is_err()));
    });
}

criterion_group!(benches, bench_push_get_clear, bench_stale_lookup);
criterion_main!(benches);

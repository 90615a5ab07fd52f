//! Criterion benchmarks for mintage-core critical operations.
//!
//! Covers: per-cycle decay, projected emission, and a full scheduler
//! evaluation against an in-memory store.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mintage_core::{FixedParams, MemoryStore, Minter, Params, Schedule};

fn bench_cycle_amount(c: &mut Criterion) {
    let schedule = Schedule::new(&Params::default()).expect("default params are valid");

    // Cycle 200 at 90% still has a non-zero amount, so every step runs.
    c.bench_function("cycle_amount_200", |b| {
        b.iter(|| schedule.cycle_amount(black_box(200)))
    });

    // Far past exhaustion: exercises the early exit.
    c.bench_function("cycle_amount_exhausted", |b| {
        b.iter(|| schedule.cycle_amount(black_box(u64::MAX)))
    });
}

fn bench_projected_emission(c: &mut Criterion) {
    let schedule = Schedule::new(&Params::default()).expect("default params are valid");

    c.bench_function("projected_emission_max_height", |b| {
        b.iter(|| schedule.projected_emission(black_box(u64::MAX)))
    });
}

fn bench_compute_emission(c: &mut Criterion) {
    let params = Params::default();
    let fixed = FixedParams::new(params.clone()).expect("default params are valid");
    let mut minter = Minter::new(MemoryStore::new(), fixed);
    let mut height = 0u64;

    c.bench_function("compute_emission", |b| {
        b.iter(|| {
            height += 1;
            minter
                .compute_emission(black_box(height), &params)
                .expect("in-memory evaluation")
        })
    });
}

criterion_group!(
    benches,
    bench_cycle_amount,
    bench_projected_emission,
    bench_compute_emission,
);
criterion_main!(benches);

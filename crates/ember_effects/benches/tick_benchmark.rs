//! # Particle Tick Benchmark
//!
//! Measures spawn and tick cost with a state-only recording host, so the
//! numbers are dominated by kinematics and host dispatch.
//!
//! Run with: `cargo bench --package ember_effects`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ember_effects::{EffectsConfig, ParticleSystem, RecordingHost};
use ember_shared::{Color, Vec2};

const FRAME_DT: f32 = 1.0 / 60.0;

fn system() -> ParticleSystem<RecordingHost> {
    ParticleSystem::new(EffectsConfig::default().with_seed(0xE3BE), RecordingHost::state_only())
        .expect("default config is valid")
}

/// Benchmark: spawn one explosion batch of varying size.
fn bench_spawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_explosion");

    for count in [16u32, 256, 4_096] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut fx = system();
                black_box(fx.spawn_explosion(Vec2::ZERO, Color::RED, 100.0, count))
            });
        });
    }

    group.finish();
}

/// Benchmark: one frame over many live particles, half explosion half implosion.
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for batches in [1usize, 16, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(batches), &batches, |b, &batches| {
            let mut fx = system();
            for i in 0..batches {
                #[allow(clippy::cast_precision_loss)]
                let origin = Vec2::new(i as f32, 0.0);
                if i % 2 == 0 {
                    fx.spawn_explosion(origin, Color::ORANGE, 80.0, 64);
                } else {
                    fx.spawn_implosion(origin, Color::BLUE, 80.0, 64);
                }
            }
            // Zero-length frames keep the batches alive for the whole run.
            b.iter(|| black_box(fx.tick(black_box(0.0))));
        });
    }

    group.finish();
}

/// Benchmark: a full explosion lifetime at 60 FPS.
fn bench_explosion_lifetime(c: &mut Criterion) {
    c.bench_function("explosion_lifetime_256", |b| {
        b.iter(|| {
            let mut fx = system();
            fx.spawn_explosion(Vec2::ZERO, Color::RED, 100.0, 256);
            while fx.batch_count() > 0 {
                fx.tick(FRAME_DT);
            }
            black_box(fx.stats())
        });
    });
}

criterion_group!(benches, bench_spawn, bench_tick, bench_explosion_lifetime);
criterion_main!(benches);

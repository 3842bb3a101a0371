//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use casimir::particles::ParticleField;
use casimir::plates::PlatePair;
use casimir::{DemoConfig, Scene, Stage};

fn bench_particle_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_step");

    for count in [2_000u32, 20_000, 200_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = SmallRng::seed_from_u64(1);
            let plates = PlatePair::initial();
            let mut field = ParticleField::spawn(count, &plates, &mut rng);
            b.iter(|| {
                field.step(&plates, &mut rng);
                black_box(field.visible_count())
            })
        });
    }

    group.finish();
}

fn bench_scene_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_frame");

    group.bench_function("idle", |b| {
        let mut scene = Scene::new(&DemoConfig {
            seed: Some(1),
            ..DemoConfig::default()
        });
        b.iter(|| {
            scene.update(Duration::from_millis(16));
            black_box(scene.solid_batches().len())
        })
    });

    group.bench_function("transition", |b| {
        let mut scene = Scene::new(&DemoConfig {
            seed: Some(1),
            ..DemoConfig::default()
        });
        b.iter(|| {
            if !scene.is_busy() {
                scene.reset();
                scene.demonstrate(Stage::Contact);
            }
            scene.update(Duration::from_millis(16));
            black_box(scene.separation())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_particle_step, bench_scene_frame);
criterion_main!(benches);

mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use metaball_field::prelude::{
    compute_frame, FieldAnimator, FieldConfig, FieldScene, PerlinNoise, RecordingEngine,
    SimplexNoise,
};

const GENERATOR_COUNTS: [usize; 5] = [1, 5, 25, 100, 400];

fn compute_frame_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("animator/compute_frame");
    let simplex = SimplexNoise::new(42);
    let perlin = PerlinNoise::new(42);

    for &count in &GENERATOR_COUNTS {
        let config = FieldConfig::new(count);
        group.throughput(common::generators_per_frame(count));

        group.bench_with_input(BenchmarkId::new("simplex", count), &count, |b, _| {
            let mut frame = 0;
            b.iter(|| {
                frame += 1;
                let t = common::frame_time(frame);
                black_box(compute_frame(black_box(t), &config, &simplex));
            });
        });

        group.bench_with_input(BenchmarkId::new("perlin", count), &count, |b, _| {
            let mut frame = 0;
            b.iter(|| {
                frame += 1;
                let t = common::frame_time(frame);
                black_box(compute_frame(black_box(t), &config, &perlin));
            });
        });
    }

    group.finish();
}

fn advance_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("animator/advance");

    for &count in &GENERATOR_COUNTS {
        group.throughput(common::generators_per_frame(count));

        group.bench_with_input(BenchmarkId::new("animator", count), &count, |b, &count| {
            let mut animator = FieldAnimator::new(FieldConfig::new(count), SimplexNoise::new(7));
            let mut frame = 0;
            b.iter(|| {
                frame += 1;
                black_box(animator.advance(black_box(common::frame_time(frame))).len());
            });
        });

        group.bench_with_input(BenchmarkId::new("scene_tick", count), &count, |b, &count| {
            let mut scene = FieldScene::try_new(
                FieldConfig::new(count),
                SimplexNoise::new(7),
                RecordingEngine::new(),
            )
            .expect("default config is valid");
            let mut frame = 0;
            b.iter(|| {
                frame += 1;
                black_box(scene.tick(black_box(common::frame_time(frame))));
                scene.engine_mut().clear();
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::frame_criterion();
    targets = compute_frame_benches, advance_benches
}
criterion_main!(benches);

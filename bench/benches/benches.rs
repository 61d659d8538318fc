use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use topo::{ContourConfig, SegmentBuffer, contour, draw_contours, generate, render_image};

const SEED: u64 = 2025;

fn bench_generate_grid(c: &mut Criterion) {
    let config = ContourConfig::default();
    c.bench_function("generate 480×800 grid (stride 4)", |b| {
        b.iter(|| generate(black_box(&config), black_box(SEED)).unwrap())
    });
}

fn bench_single_level(c: &mut Criterion) {
    let config = ContourConfig::default();
    let state = generate(&config, SEED).unwrap();
    c.bench_function("marching squares, one level", |b| {
        b.iter(|| contour(black_box(&state.grid), black_box(0.5)).count())
    });
}

fn bench_all_levels(c: &mut Criterion) {
    let config = ContourConfig::default();
    let state = generate(&config, SEED).unwrap();
    c.bench_function("marching squares, all levels into buffer", |b| {
        b.iter(|| {
            let mut buffer = SegmentBuffer::new();
            draw_contours(&state, &config, &mut buffer).unwrap();
            buffer.segment_count()
        })
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let config = ContourConfig::default();
    c.bench_function("generate + render raster", |b| {
        b.iter(|| {
            let state = generate(&config, SEED).unwrap();
            render_image(&state, &config).unwrap()
        })
    });
}

criterion_group!(
    contour_benchmarks,
    bench_generate_grid,
    bench_single_level,
    bench_all_levels,
    bench_full_pipeline
);
criterion_main!(contour_benchmarks);

//! Benchmarks for cineflow-core hot paths.
//!
//! Run with: cargo bench -p cineflow-core

use cineflow_core::{
    format_time, parse_time, position_to_time, screen_to_logical, time_to_position,
    CanvasTransform, Rect, Vec2,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_time_formatting(c: &mut Criterion) {
    c.bench_function("format_time", |bencher| {
        bencher.iter(|| format_time(black_box(754.56)));
    });

    c.bench_function("parse_time", |bencher| {
        bencher.iter(|| parse_time(black_box("12:34.56")));
    });
}

fn bench_time_mapping(c: &mut Criterion) {
    c.bench_function("time_position_round_trip", |bencher| {
        bencher.iter(|| {
            let x = time_to_position(black_box(12.5), black_box(30.0), black_box(1280.0));
            position_to_time(x, 30.0, 1280.0)
        });
    });
}

fn bench_coordinates(c: &mut Criterion) {
    let container = Rect::new(40.0, 60.0, 960.0, 540.0);
    let transform = CanvasTransform::new(12.0, -8.0, 1.75);

    c.bench_function("screen_to_logical", |bencher| {
        bencher.iter(|| {
            screen_to_logical(
                black_box(Vec2::new(500.0, 300.0)),
                black_box(container),
                black_box(&transform),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_time_formatting,
    bench_time_mapping,
    bench_coordinates,
);
criterion_main!(benches);

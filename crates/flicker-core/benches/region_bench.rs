//! Benchmarks for the region algebra.
//!
//! Run with: cargo bench -p flicker-core

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flicker_core::{Rect, Region};
use std::hint::black_box;

/// A staggered grid of `n` overlapping tiles.
fn make_tiles(n: i32) -> Vec<Rect> {
    (0..n)
        .map(|i| Rect::new((i % 16) * 60, (i / 16) * 90, 80, 120))
        .collect()
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("region/canonicalize");

    for n in [4, 16, 64, 128] {
        let tiles = make_tiles(n);
        group.bench_with_input(BenchmarkId::new("tiles", n), &tiles, |b, tiles| {
            b.iter(|| black_box(Region::from_rects(tiles.iter().copied())))
        });
    }

    group.finish();
}

fn bench_covers_exactly(c: &mut Criterion) {
    let mut group = c.benchmark_group("region/covers_exactly");
    let display = Region::from_rect(Rect::new(0, 0, 1080, 2400)).expect("valid display");

    for splits in [2, 8, 32] {
        let width = 1080 / splits;
        let parts: Vec<Region> = (0..splits)
            .map(|i| {
                let w = if i == splits - 1 { 1080 - width * i } else { width };
                Region::from_rect(Rect::new(width * i, 0, w, 2400)).expect("valid part")
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("splits", splits), &parts, |b, parts| {
            b.iter(|| {
                let union = parts.iter().fold(Region::new(), |acc, p| acc.plus(p));
                black_box(union.covers_exactly(&display))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_canonicalize, bench_covers_exactly);
criterion_main!(benches);

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use trellis_index::{Aabb2D, Backend, FlatVec, HitIndex, HitTestable, RTree};

struct Block;

impl HitTestable for Block {}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        ((x >> 11) as f64) / ((1_u64 << 53) as f64)
    }
}

/// Blocks scattered over a 4000x4000 world, sized like diagram nodes.
fn gen_blocks(count: usize) -> Vec<(u32, Aabb2D)> {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    (0..count)
        .map(|i| {
            let x = rng.next_f64() * 4000.0;
            let y = rng.next_f64() * 4000.0;
            (i as u32, Aabb2D::new(x, y, x + 120.0, y + 60.0))
        })
        .collect()
}

fn bench_bulk_load(c: &mut Criterion) {
    fn run<B: Backend>(records: &[(u32, Aabb2D)]) -> HitIndex<u32, B> {
        let mut index = HitIndex::<u32, B>::default();
        index.load(records.iter().copied());
        index
    }

    let mut group = c.benchmark_group("hit_index_bulk_load");
    for &n in &[250_usize, 2_000, 10_000] {
        let records = gen_blocks(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("RTree", n), &records, |b, r| {
            b.iter(|| black_box(run::<RTree>(r)));
        });
        group.bench_with_input(BenchmarkId::new("FlatVec", n), &records, |b, r| {
            b.iter(|| black_box(run::<FlatVec>(r)));
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    fn build<B: Backend>(records: &[(u32, Aabb2D)]) -> HitIndex<u32, B> {
        let mut index = HitIndex::<u32, B>::default();
        index.load(records.iter().copied());
        index
    }

    let block = Block;
    let mut group = c.benchmark_group("hit_index_query");
    for &n in &[2_000_usize, 10_000] {
        let records = gen_blocks(n);
        let rtree = build::<RTree>(&records);
        let flat = build::<FlatVec>(&records);
        let pt = Point::new(2000.0, 2000.0);
        let window = Rect::new(1500.0, 1500.0, 2500.0, 2100.0);

        group.bench_function(BenchmarkId::new("point/RTree", n), |b| {
            b.iter(|| black_box(rtree.query_point(black_box(pt), |_| Some(&block))));
        });
        group.bench_function(BenchmarkId::new("point/FlatVec", n), |b| {
            b.iter(|| black_box(flat.query_point(black_box(pt), |_| Some(&block))));
        });
        group.bench_function(BenchmarkId::new("box/RTree", n), |b| {
            b.iter(|| black_box(rtree.query_box(black_box(window), |_| Some(&block))));
        });
        group.bench_function(BenchmarkId::new("box/FlatVec", n), |b| {
            b.iter(|| black_box(flat.query_box(black_box(window), |_| Some(&block))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bulk_load, bench_queries);
criterion_main!(benches);

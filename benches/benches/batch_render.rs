// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{BezPath, Rect, Shape};
use peniko::color::palette;
use trellis_batch::{BatchItem, BatchParams, BatchRenderer, DrawSurface, PathStyle};

struct Port(Rect);

impl BatchItem for Port {
    fn append_path(&self, path: &mut BezPath) {
        path.extend(self.0.path_elements(0.1));
    }

    fn style(&self) -> PathStyle {
        PathStyle::fill(palette::css::DARK_SLATE_GRAY)
    }
}

/// Counts calls without storing paths.
#[derive(Default)]
struct CountingSurface {
    calls: usize,
}

impl DrawSurface for CountingSurface {
    fn set_style(&mut self, _: &PathStyle) {
        self.calls += 1;
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.calls += path.elements().len();
    }

    fn stroke_path(&mut self, path: &BezPath) {
        self.calls += path.elements().len();
    }
}

fn build(n: u32, styles: u64) -> BatchRenderer<u32, Port> {
    let mut batch = BatchRenderer::new();
    for i in 0..n {
        let x = f64::from(i % 100) * 12.0;
        let y = f64::from(i / 100) * 12.0;
        let params = BatchParams::new(0, u64::from(i) % styles);
        batch.add(i, Port(Rect::new(x, y, x + 8.0, y + 8.0)), params);
    }
    batch
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_render");
    for &n in &[1_000_u32, 10_000] {
        group.throughput(Throughput::Elements(u64::from(n)));
        let mut batch = build(n, 4);
        group.bench_function(BenchmarkId::new("cached", n), |b| {
            b.iter(|| {
                let mut surface = CountingSurface::default();
                black_box(batch.render(&mut surface))
            });
        });
        group.bench_function(BenchmarkId::new("all_dirty", n), |b| {
            b.iter(|| {
                batch.mark_all_dirty();
                let mut surface = CountingSurface::default();
                black_box(batch.render(&mut surface))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);

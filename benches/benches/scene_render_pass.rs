// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use trellis_scene::{NodeState, Renderable, SceneTree};

#[derive(Default)]
struct Node {
    culled: bool,
    order: u32,
}

impl Renderable for Node {
    fn iterate(&mut self, state: &NodeState) -> bool {
        self.order = state.render_order;
        !self.culled
    }
}

/// A root with `blocks` children of four ports each, spread over three z-layers.
fn build(blocks: u32, culled_every: u32) -> SceneTree<Node> {
    let mut tree = SceneTree::new(Node::default());
    let root = tree.root();
    for b in 0..blocks {
        let node = Node {
            culled: culled_every > 0 && b % culled_every == 0,
            order: 0,
        };
        let Some(id) = tree.append(root, u64::from(b), node) else {
            continue;
        };
        tree.update_z_index(id, (b % 3) as i32);
        for p in 0..4_u64 {
            tree.append(id, p, Node::default());
        }
    }
    tree
}

fn bench_render_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_render_pass");
    for &n in &[500_u32, 5_000] {
        group.throughput(Throughput::Elements(u64::from(n) * 5));
        group.bench_function(BenchmarkId::new("all_visible", n), |b| {
            b.iter_batched(
                || build(n, 0),
                |mut tree| black_box(tree.render_pass()),
                BatchSize::LargeInput,
            );
        });
        group.bench_function(BenchmarkId::new("half_culled", n), |b| {
            b.iter_batched(
                || build(n, 2),
                |mut tree| black_box(tree.render_pass()),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_regroup(c: &mut Criterion) {
    let mut tree = build(5_000, 0);
    let root = tree.root();
    let ids: Vec<_> = tree.children(root).to_vec();
    let mut z = 0;
    c.bench_function("scene_regroup_then_pass", |b| {
        b.iter(|| {
            z = (z + 1) % 7;
            for id in ids.iter().step_by(50) {
                tree.update_z_index(*id, z);
            }
            black_box(tree.tick())
        });
    });
}

criterion_group!(benches, bench_render_pass, bench_regroup);
criterion_main!(benches);

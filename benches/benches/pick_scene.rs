// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_pick::glam::{DAffine3, DVec3};
use understory_pick::kurbo::{Point, Size};
use understory_pick::intersect::intersect;
use understory_pick::{Camera, CullFace, PickRay, ShapeDescriptor, TriangleMesh};
use understory_responder::GestureState;
use understory_responder::types::{PointerButton, PointerSample};
use understory_scene_tree::{LocalNode, Tree};

const VIEWPORT: f64 = 800.0;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// An `n`×`n` grid of boxes filling the viewport, each at a different depth.
fn grid_scene(n: usize, camera: Camera, depth_buffer: bool) -> Tree {
    let mut tree = Tree::new();
    tree.set_viewport_size(Size::new(VIEWPORT, VIEWPORT));
    tree.set_camera(camera);
    tree.set_depth_buffer(depth_buffer);
    let root = tree.insert(None, LocalNode::default());
    let cell = VIEWPORT / n as f64;
    for y in 0..n {
        for x in 0..n {
            let center = DVec3::new(
                (x as f64 + 0.5) * cell,
                (y as f64 + 0.5) * cell,
                ((x + y) % 7) as f64 * 10.0,
            );
            let _ = tree.insert(
                Some(root),
                LocalNode {
                    // Slightly oversized so neighbors overlap and depth matters.
                    shape: ShapeDescriptor::cuboid(cell * 1.5, cell * 1.5, cell),
                    local_transform: DAffine3::from_translation(center),
                    ..Default::default()
                },
            );
        }
    }
    let _ = tree.commit();
    tree
}

fn query_points(count: usize) -> Vec<Point> {
    let mut rng = Rng::new(0x5eed_cafe);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * VIEWPORT, rng.next_f64() * VIEWPORT))
        .collect()
}

fn bench_pick_grid(c: &mut Criterion) {
    let points = query_points(256);
    for (name, camera) in [
        ("parallel", Camera::parallel()),
        ("perspective", Camera::perspective(30.0)),
    ] {
        let mut group = c.benchmark_group(format!("pick_grid_{name}"));
        group.throughput(Throughput::Elements(points.len() as u64));
        for &n in &[8usize, 16, 32] {
            for depth_buffer in [false, true] {
                let tree = grid_scene(n, camera, depth_buffer);
                let mode = if depth_buffer { "depth" } else { "painter" };
                group.bench_function(format!("{mode}_n{n}"), |b| {
                    b.iter(|| {
                        let mut found = 0_usize;
                        for &p in &points {
                            found += usize::from(tree.pick(p).node.is_some());
                        }
                        black_box(found)
                    });
                });
            }
        }
        group.finish();
    }
}

fn bench_intersectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersect");
    let ray = PickRay::new(DVec3::new(10.0, 40.0, -1000.0), DVec3::Z);
    let sphere = ShapeDescriptor::Sphere { radius: 100.0 };
    group.bench_function("sphere", |b| {
        b.iter(|| black_box(intersect(black_box(&sphere), &ray, CullFace::Back)));
    });
    let cylinder = ShapeDescriptor::Cylinder {
        radius: 100.0,
        height: 200.0,
    };
    group.bench_function("cylinder", |b| {
        b.iter(|| black_box(intersect(black_box(&cylinder), &ray, CullFace::Back)));
    });

    // A 64×64 quad grid in the z = 0 plane.
    let n = 64_u32;
    let mut points = Vec::new();
    for y in 0..=n {
        for x in 0..=n {
            points.extend([x as f32 * 4.0 - 128.0, y as f32 * 4.0 - 128.0, 0.0]);
        }
    }
    let mut faces = Vec::new();
    for y in 0..n {
        for x in 0..n {
            let i = y * (n + 1) + x;
            faces.extend([i, 0, i + 1, 0, i + n + 1, 0]);
            faces.extend([i + 1, 0, i + n + 2, 0, i + n + 1, 0]);
        }
    }
    if let Ok(mesh) = TriangleMesh::from_flat(&points, &[0.0, 0.0], &faces) {
        let mesh = ShapeDescriptor::Mesh(mesh.into());
        group.throughput(Throughput::Elements(u64::from(2 * n * n)));
        group.bench_function("mesh_8192_triangles", |b| {
            b.iter(|| black_box(intersect(black_box(&mesh), &ray, CullFace::None)));
        });
    }
    group.finish();
}

fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture");
    let tree = grid_scene(16, Camera::parallel(), true);
    let points = query_points(64);
    group.throughput(Throughput::Elements(points.len() as u64 + 2));
    group.bench_function("press_drag_release", |b| {
        b.iter_batched(
            GestureState::new,
            |mut g| {
                let mut t = Duration::ZERO;
                let step = Duration::from_millis(8);
                let mut events = g
                    .process(&tree, PointerSample::pressed(points[0], t, PointerButton::Primary))
                    .len();
                for &p in &points {
                    t += step;
                    events += g
                        .process(&tree, PointerSample::dragged(p, t, PointerButton::Primary))
                        .len();
                }
                events += g
                    .process(
                        &tree,
                        PointerSample::released(points[0], t + step, PointerButton::Primary),
                    )
                    .len();
                black_box(events)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_pick_grid, bench_intersectors, bench_gesture);
criterion_main!(benches);

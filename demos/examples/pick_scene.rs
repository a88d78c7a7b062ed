// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking a small 3D scene through a perspective camera.
//!
//! The scene mixes a box, a sphere, a capped cylinder, a two-triangle mesh and
//! an extruded star outline. The same pointer positions are picked with and
//! without a depth buffer to show nearest-wins versus painter's order.
//!
//! Run:
//! - `cargo run -p understory_demos --example pick_scene`

use std::collections::HashMap;
use std::f64::consts::PI;

use understory_pick::glam::{DAffine3, DVec3};
use understory_pick::kurbo::{BezPath, Point, Size};
use understory_pick::{Camera, PlanarShape, ShapeDescriptor, TriangleMesh};
use understory_scene_tree::{LocalNode, NodeId, Tree};

fn star(outer: f64, inner: f64) -> BezPath {
    let mut path = BezPath::new();
    for i in 0..10 {
        let r = if i % 2 == 0 { outer } else { inner };
        let a = f64::from(i) * PI / 5.0 - PI / 2.0;
        let p = Point::new(r * a.cos(), r * a.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

fn at(x: f64, y: f64, z: f64) -> DAffine3 {
    DAffine3::from_translation(DVec3::new(x, y, z))
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tree = Tree::new();
    tree.set_viewport_size(Size::new(800.0, 600.0));
    tree.set_camera(Camera::perspective(30.0));

    let mut names: HashMap<NodeId, &str> = HashMap::new();
    let root = tree.insert(None, LocalNode::default());
    names.insert(root, "root");

    let mut add = |tree: &mut Tree, name, shape, transform| {
        let id = tree.insert(
            Some(root),
            LocalNode {
                shape,
                local_transform: transform,
                ..Default::default()
            },
        );
        names.insert(id, name);
        id
    };

    // Behind in stacking order but nearest to the camera.
    add(
        &mut tree,
        "box",
        ShapeDescriptor::cuboid(200.0, 200.0, 200.0),
        at(300.0, 300.0, -150.0),
    );
    add(
        &mut tree,
        "sphere",
        ShapeDescriptor::Sphere { radius: 120.0 },
        at(400.0, 300.0, 100.0),
    );
    add(
        &mut tree,
        "cylinder",
        ShapeDescriptor::Cylinder {
            radius: 60.0,
            height: 240.0,
        },
        at(620.0, 300.0, 0.0),
    );
    match TriangleMesh::from_flat(
        &[0.0, 0.0, 0.0, 160.0, 0.0, 0.0, 0.0, 120.0, 0.0, 160.0, 120.0, 0.0],
        &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        &[0, 0, 1, 1, 2, 2, 1, 1, 3, 3, 2, 2],
    ) {
        Ok(mesh) => {
            add(
                &mut tree,
                "mesh",
                ShapeDescriptor::Mesh(mesh.into()),
                at(60.0, 440.0, 50.0),
            );
        }
        Err(err) => tracing::warn!(%err, "skipping mesh"),
    }
    add(
        &mut tree,
        "star",
        ShapeDescriptor::Planar(PlanarShape::extruded(star(70.0, 30.0), 40.0)),
        at(160.0, 140.0, 0.0),
    );
    let _ = tree.commit();

    let samples = [
        Point::new(300.0, 300.0),
        Point::new(420.0, 300.0),
        Point::new(620.0, 200.0),
        Point::new(120.0, 500.0),
        Point::new(160.0, 140.0),
        Point::new(10.0, 10.0),
    ];

    for depth_buffer in [true, false] {
        tree.set_depth_buffer(depth_buffer);
        let _ = tree.commit();
        println!(
            "== {} ==",
            if depth_buffer {
                "depth buffer: nearest wins"
            } else {
                "no depth buffer: topmost wins"
            }
        );
        for p in samples {
            let hit = tree.pick(p);
            let name = hit.node.and_then(|n| names.get(&n).copied()).unwrap_or("background");
            print!(
                "  ({:>5.1}, {:>5.1}) -> {name:<10} distance {:>8.2} local ({:.1}, {:.1}, {:.1})",
                p.x, p.y, hit.distance, hit.point.x, hit.point.y, hit.point.z
            );
            if let Some(tc) = hit.tex_coord {
                print!(" tex ({:.3}, {:.3})", tc.x, tc.y);
            }
            if let Some(face) = hit.face {
                print!(" face {face}");
            }
            println!();
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene traversal and depth resolution.
//!
//! [`pick`] casts the camera ray through a pointer position, walks the tree
//! topmost-first and returns a single [`HitResult`]:
//!
//! - A node is skipped with its whole subtree if it is stale, invisible for
//!   input, input-disabled, or has a non-invertible transform.
//! - Children are visited before the node's own shape, last child first, since
//!   later children paint above earlier ones and above their parent.
//! - Candidates go through a [`PickChooser`]: nearest wins with a depth buffer,
//!   first wins without one.
//! - If nothing is hit the result is the scene background, located on the
//!   camera's projection plane under the pointer.
//!
//! Distances are measured along the normalized scene ray, so they are in scene
//! units no matter how deep the winning node is.

use alloc::vec::Vec;

use glam::DVec3;
use kurbo::Point;

use crate::chooser::PickChooser;
use crate::hit::{HitResult, LocalHit};
use crate::intersect::{intersect, intersect_bounds, intersect_plane_rect};
use crate::ray::PickRay;
use crate::shape::{Aabb3, ShapeDescriptor, SubScene};
use crate::source::PickSource;

/// Build the scene-space pick ray for `point` using the source's camera and viewport.
pub fn pick_ray<S: PickSource + ?Sized>(source: &S, point: Point) -> PickRay {
    source
        .active_camera()
        .compute_pick_ray(point, source.viewport_size())
}

/// Pick the scene at a pointer position.
pub fn pick<S: PickSource + ?Sized>(source: &S, point: Point) -> HitResult<S::Node> {
    pick_with_ray(source, &pick_ray(source, point), source.has_depth_buffer())
}

/// Root→`node` path, empty when `node` is stale.
pub fn hit_path<S: PickSource + ?Sized>(source: &S, node: S::Node) -> Vec<S::Node> {
    source.path_to(node)
}

/// Map a scene-space point into `node`'s local space; NaN when the chain is not invertible.
pub fn scene_to_local<S: PickSource + ?Sized>(source: &S, node: S::Node, point: DVec3) -> DVec3 {
    source.scene_to_local(node, point)
}

/// The scene-space position of a hit: `hit.point` mapped out of the picked node.
///
/// Background hits are already in scene space.
pub fn hit_scene_point<S: PickSource + ?Sized>(source: &S, hit: &HitResult<S::Node>) -> DVec3 {
    match hit.node {
        Some(node) => source.local_to_scene(node).transform_point3(hit.point),
        None => hit.point,
    }
}

/// Pick the scene along an arbitrary scene-space ray.
///
/// The background result lies at parameter 1 of `ray`, which for camera rays
/// is the projection plane.
pub fn pick_with_ray<S: PickSource + ?Sized>(
    source: &S,
    ray: &PickRay,
    depth_test: bool,
) -> HitResult<S::Node> {
    let (unit, mag) = ray.normalized();
    if !unit.is_valid() {
        return HitResult::unavailable();
    }
    let mut chooser = PickChooser::new(depth_test);
    if let Some(root) = source.root() {
        pick_node(source, root, &unit, &mut chooser);
    }
    chooser.into_result_or(HitResult::background(unit.point_at(mag), mag))
}

/// Offer `node` and its subtree to `chooser`. `ray` is in the parent's space.
pub fn pick_node<S: PickSource + ?Sized>(
    source: &S,
    node: S::Node,
    ray: &PickRay,
    chooser: &mut PickChooser<S::Node>,
) {
    if !source.is_alive(node)
        || !source.is_visible_for_input(node)
        || source.is_input_disabled(node)
    {
        return;
    }
    let Some(local) = ray.to_local(&source.local_to_parent(node)) else {
        tracing::debug!(?node, "excluding subtree with a non-invertible transform");
        return;
    };

    let shape = source.local_shape(node);
    if let ShapeDescriptor::SubScene(sub) = shape {
        pick_sub_scene(source, node, sub, &local, chooser);
        return;
    }

    for &child in source.children(node).iter().rev() {
        if chooser.is_closed() {
            return;
        }
        pick_node(source, child, &local, chooser);
    }
    if chooser.is_closed() {
        return;
    }

    let hit = if source.pick_on_bounds(node) {
        let bounds = if shape.is_group() {
            children_bounds(source, node)
        } else {
            shape.local_bounds()
        };
        intersect_bounds(&bounds, &local)
    } else {
        intersect(shape, &local, source.cull_face(node))
    };
    if let Some(hit) = hit {
        chooser.offer(node, hit);
    }
}

/// Pick the content of an embedded viewport.
///
/// The viewport rectangle is hit first; the local hit point then becomes the
/// pointer position for the sub-scene's own camera. Inner hits are reported at
/// the outer distance so they rank against the rest of the outer scene.
fn pick_sub_scene<S: PickSource + ?Sized>(
    source: &S,
    node: S::Node,
    sub: &SubScene,
    ray: &PickRay,
    chooser: &mut PickChooser<S::Node>,
) {
    let Some(outer) = intersect_plane_rect(sub.size, ray) else {
        return;
    };
    if chooser.depth_test() && !chooser.is_closer(outer.distance) {
        return;
    }

    let inner_ray = sub
        .camera
        .compute_pick_ray(Point::new(outer.point.x, outer.point.y), sub.size);
    let (inner_ray, _) = inner_ray.normalized();
    let mut inner = PickChooser::new(sub.depth_buffer);
    if inner_ray.is_valid() {
        for &child in source.children(node).iter().rev() {
            if inner.is_closed() {
                break;
            }
            pick_node(source, child, &inner_ray, &mut inner);
        }
    }

    if let Some(found) = inner.result()
        && let Some(inner_node) = found.node
    {
        chooser.offer(
            inner_node,
            LocalHit {
                distance: outer.distance,
                point: found.point,
                face: found.face,
                tex_coord: found.tex_coord,
            },
        );
    } else if sub.opaque_fill || source.pick_on_bounds(node) {
        chooser.offer(node, outer);
    }
}

/// Union of the visible children's bounds, in `node`'s space.
fn children_bounds<S: PickSource + ?Sized>(source: &S, node: S::Node) -> Aabb3 {
    source
        .children(node)
        .iter()
        .filter(|&&c| source.is_alive(c) && source.is_visible_for_input(c))
        .fold(Aabb3::EMPTY, |acc, &c| {
            acc.union(&subtree_bounds(source, c).transformed(&source.local_to_parent(c)))
        })
}

/// Bounds of `node`'s own shape and its visible descendants, in `node`'s space.
pub fn subtree_bounds<S: PickSource + ?Sized>(source: &S, node: S::Node) -> Aabb3 {
    source
        .local_shape(node)
        .local_bounds()
        .union(&children_bounds(source, node))
}

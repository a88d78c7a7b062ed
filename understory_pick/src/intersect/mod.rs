// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray/shape intersectors.
//!
//! Every intersector takes a ray expressed in the shape's local space and
//! returns at most one [`LocalHit`]. The returned `distance` is the ray
//! parameter, so hits from different nodes are directly comparable as long as
//! their rays were all derived from the same scene ray.
//!
//! ## Front and back roots
//!
//! Closed solids yield an entry root `t0` and an exit root `t1`. Selection follows
//! the node's [`CullFace`]:
//!
//! - The entry root is reported when it lies in the clip range and front faces
//!   are not culled.
//! - Otherwise the exit root is reported when it lies in the clip range and
//!   back faces are not culled (this is how a ray starting inside a solid, or a
//!   solid that only shows its inside, is picked).
//! - Anything else is a miss.

mod bounds;
mod box_shape;
mod cylinder;
mod mesh;
mod planar;
mod sphere;

pub use bounds::intersect_bounds;
pub use box_shape::intersect_box;
pub use cylinder::intersect_cylinder;
pub use mesh::intersect_mesh;
pub use planar::{intersect_planar, intersect_plane_rect};
pub use sphere::intersect_sphere;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use glam::DVec3;

use crate::hit::LocalHit;
use crate::ray::PickRay;
use crate::shape::{CullFace, ShapeDescriptor};

/// Intersect `ray` with `shape`, honoring `cull`.
///
/// Groups have no geometry and always miss. A sub-scene reports the hit on its
/// viewport rectangle; picking its content is the resolver's job.
pub fn intersect(shape: &ShapeDescriptor, ray: &PickRay, cull: CullFace) -> Option<LocalHit> {
    if !ray.is_valid() {
        return None;
    }
    match shape {
        ShapeDescriptor::Group => None,
        ShapeDescriptor::Box {
            width,
            height,
            depth,
        } => intersect_box(DVec3::new(*width, *height, *depth), ray, cull),
        ShapeDescriptor::Sphere { radius } => intersect_sphere(*radius, ray, cull),
        ShapeDescriptor::Cylinder { radius, height } => {
            intersect_cylinder(*radius, *height, ray, cull)
        }
        ShapeDescriptor::Mesh(mesh) => intersect_mesh(mesh, ray, cull),
        ShapeDescriptor::Planar(planar) => intersect_planar(planar, ray, cull),
        ShapeDescriptor::SubScene(sub) => intersect_plane_rect(sub.size, ray),
    }
}

/// Pick between the entry and exit roots of a closed solid.
///
/// Returns the selected root and whether it is the exit root.
pub(crate) fn select_root(t0: f64, t1: f64, ray: &PickRay, cull: CullFace) -> Option<(f64, bool)> {
    if t0 > ray.far_clip() {
        return None;
    }
    let selected = if t0 < ray.near_clip() || cull == CullFace::Front {
        if ray.in_range(t1) && cull != CullFace::Back {
            (t1, true)
        } else {
            return None;
        }
    } else {
        (t0, false)
    };
    selected.0.is_finite().then_some(selected)
}

/// Solve `a t² + b t + c = 0` for real roots, smallest first.
///
/// Uses the cancellation-free form `q = -(b ± √D) / 2`.
pub(crate) fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let q = if b < 0.0 {
        (-b + root) / 2.0
    } else {
        (-b - root) / 2.0
    };
    if q == 0.0 {
        return Some((0.0, 0.0));
    }
    let (t0, t1) = (q / a, c / q);
    Some(if t0 > t1 { (t1, t0) } else { (t0, t1) })
}

/// Longitude texture coordinate around the y axis, in `[0, 1]`.
///
/// Measured from +z, increasing towards -x.
pub(crate) fn longitude(point: DVec3) -> f64 {
    let around = DVec3::new(point.x, 0.0, point.z);
    if around.length_squared() == 0.0 {
        return 1.0;
    }
    let mut angle = around.angle_between(DVec3::Z).to_degrees();
    if point.x < 0.0 {
        angle = 360.0 - angle;
    }
    1.0 - angle / 360.0
}

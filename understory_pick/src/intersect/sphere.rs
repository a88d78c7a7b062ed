// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::DVec2;

use super::{longitude, select_root, solve_quadratic};
use crate::hit::LocalHit;
use crate::ray::PickRay;
use crate::shape::CullFace;

/// Intersect a sphere of `radius` centered on the origin.
///
/// Texture coordinates are longitude (around y, starting at +z) and latitude.
pub fn intersect_sphere(radius: f64, ray: &PickRay, cull: CullFace) -> Option<LocalHit> {
    let o = ray.origin();
    let d = ray.direction();
    let (t0, t1) = solve_quadratic(d.dot(d), 2.0 * d.dot(o), o.dot(o) - radius * radius)?;
    if t1 < ray.near_clip() {
        return None;
    }
    let (t, _) = select_root(t0, t1, ray, cull)?;
    let point = ray.point_at(t);
    Some(LocalHit {
        distance: t,
        point,
        face: None,
        tex_coord: Some(DVec2::new(
            longitude(point),
            0.5 + point.y / (2.0 * radius),
        )),
    })
}

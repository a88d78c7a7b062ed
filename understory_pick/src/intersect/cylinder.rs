// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DVec2, DVec3};

use super::{longitude, solve_quadratic};
use crate::hit::LocalHit;
use crate::ray::PickRay;
use crate::shape::CullFace;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Surface {
    Lateral,
    /// The cap at `y = -height / 2`.
    Top,
    /// The cap at `y = +height / 2`.
    Bottom,
}

/// Intersect a capped cylinder centered on the origin with its axis along y.
pub fn intersect_cylinder(
    radius: f64,
    height: f64,
    ray: &PickRay,
    cull: CullFace,
) -> Option<LocalHit> {
    let o = ray.origin();
    let d = ray.direction();
    let half = height / 2.0;
    let within_height = |t: f64| {
        let y = o.y + t * d.y;
        (-half..=half).contains(&y)
    };
    let within_radius = |t: f64| {
        let x = o.x + t * d.x;
        let z = o.z + t * d.z;
        x * x + z * z <= radius * radius
    };

    let mut best: Option<(f64, Surface)> = None;

    // Lateral surface of the infinite cylinder, clipped to the height.
    if d.x != 0.0 || d.z != 0.0 {
        let a = d.x * d.x + d.z * d.z;
        let b = 2.0 * (d.x * o.x + d.z * o.z);
        let c = o.x * o.x + o.z * o.z - radius * radius;
        if let Some((t0, t1)) = solve_quadratic(a, b, c) {
            let front_usable =
                t0 >= ray.near_clip() && within_height(t0) && cull != CullFace::Front;
            if front_usable {
                if t0 <= ray.far_clip() {
                    best = Some((t0, Surface::Lateral));
                }
            } else if ray.in_range(t1) && within_height(t1) && cull != CullFace::Back {
                best = Some((t1, Surface::Lateral));
            }
        }
    }

    // Caps. A cap only replaces the lateral candidate when it is nearer.
    if d.y != 0.0 {
        let t_bottom = (half - o.y) / d.y;
        let t_top = (-half - o.y) / d.y;
        let ((t0, s0), (t1, s1)) = if t_bottom < t_top {
            ((t_bottom, Surface::Bottom), (t_top, Surface::Top))
        } else {
            ((t_top, Surface::Top), (t_bottom, Surface::Bottom))
        };
        let nearer = |t: f64, best: Option<(f64, Surface)>| best.is_none_or(|(b, _)| t < b);
        if ray.in_range(t0) && nearer(t0, best) && cull != CullFace::Front && within_radius(t0) {
            best = Some((t0, s0));
        }
        if ray.in_range(t1) && nearer(t1, best) && cull != CullFace::Back && within_radius(t1) {
            best = Some((t1, s1));
        }
    }

    let (t, surface) = best?;
    if !t.is_finite() {
        return None;
    }
    let point: DVec3 = ray.point_at(t);
    let tex_coord = match surface {
        Surface::Lateral => DVec2::new(longitude(point), 0.5 + point.y / height),
        Surface::Top => DVec2::new(
            0.5 + point.x / (2.0 * radius),
            0.5 + point.z / (2.0 * radius),
        ),
        Surface::Bottom => DVec2::new(
            0.5 + point.x / (2.0 * radius),
            0.5 - point.z / (2.0 * radius),
        ),
    };
    Some(LocalHit {
        distance: t,
        point,
        face: None,
        tex_coord: Some(tex_coord),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn lateral_front_hit() {
        let ray = PickRay::new(DVec3::new(10.0, 20.0, -1000.0), DVec3::Z);
        let hit = intersect_cylinder(50.0, 200.0, &ray, CullFace::Back).unwrap();
        assert!(close(hit.point.z, -48.98979), "z = {}", hit.point.z);
        assert!(close(hit.distance, 951.0102), "distance = {}", hit.distance);
        let uv = hit.tex_coord.unwrap();
        assert!(close(uv.x, 0.532048), "u = {}", uv.x);
        assert!(close(uv.y, 0.6), "v = {}", uv.y);
    }

    #[test]
    fn lateral_miss_above_height() {
        let ray = PickRay::new(DVec3::new(10.0, 150.0, -1000.0), DVec3::Z);
        assert!(intersect_cylinder(50.0, 200.0, &ray, CullFace::None).is_none());
    }

    #[test]
    fn top_cap_from_above() {
        // Looking down +y onto the cap at y = -100.
        let ray = PickRay::new(DVec3::new(10.0, -1000.0, 20.0), DVec3::Y);
        let hit = intersect_cylinder(50.0, 200.0, &ray, CullFace::Back).unwrap();
        assert_eq!(hit.point, DVec3::new(10.0, -100.0, 20.0));
        assert_eq!(hit.distance, 900.0);
        let uv = hit.tex_coord.unwrap();
        assert!(close(uv.x, 0.6) && close(uv.y, 0.7), "uv = {uv:?}");
    }

    #[test]
    fn bottom_cap_from_inside() {
        let ray = PickRay::new(DVec3::new(10.0, -1000.0, 20.0), DVec3::Y);
        let hit = intersect_cylinder(50.0, 200.0, &ray, CullFace::Front).unwrap();
        assert_eq!(hit.point, DVec3::new(10.0, 100.0, 20.0));
        let uv = hit.tex_coord.unwrap();
        assert!(close(uv.x, 0.6) && close(uv.y, 0.3), "uv = {uv:?}");
    }

    #[test]
    fn oblique_ray_through_cap_edge_picks_nearest() {
        let ray = PickRay::new(DVec3::new(0.0, -1000.0, -1000.0), DVec3::new(0.0, 1.0, 1.0));
        let hit = intersect_cylinder(50.0, 200.0, &ray, CullFace::Back).unwrap();
        // The lateral surface at z = -50 has y = -50 (inside the height).
        assert!(close(hit.point.z, -50.0), "point = {:?}", hit.point);
        assert!(close(hit.point.y, -50.0), "point = {:?}", hit.point);
    }
}

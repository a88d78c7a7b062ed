// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DVec2, DVec3};
use kurbo::{Line, Point, Rect, Shape as _, Size};

use super::select_root;
use crate::hit::LocalHit;
use crate::ray::PickRay;
use crate::shape::{CullFace, PlanarShape};

/// Rays whose z direction is this small relative to their length are treated
/// as parallel to the `z = 0` plane.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Intersect a planar outline, flat or extruded.
///
/// Flat outlines are double-sided and ignore `cull`. Extruded outlines are
/// treated as a closed solid: the nearest surface crossing is the entry root
/// and the farthest is the exit root, selected per `cull` like any other solid.
///
/// Texture coordinates are the hit position normalized to the outline's bounds.
pub fn intersect_planar(shape: &PlanarShape, ray: &PickRay, cull: CullFace) -> Option<LocalHit> {
    let bounds = shape.outline.bounding_box();
    let (t, point) = if shape.depth > 0.0 {
        let (t0, t1) = prism_roots(shape, bounds, ray)?;
        let (t, _) = select_root(t0, t1, ray, cull)?;
        (t, ray.point_at(t))
    } else {
        let t = plane_parameter(ray, 0.0)?;
        if !ray.in_range(t) {
            return None;
        }
        let point = ray.point_at(t);
        if !shape.outline.contains(Point::new(point.x, point.y)) {
            return None;
        }
        (t, DVec3::new(point.x, point.y, 0.0))
    };
    Some(LocalHit {
        distance: t,
        point,
        face: None,
        tex_coord: Some(normalized_in(bounds, point)),
    })
}

/// Intersect the rectangle `[0, width] × [0, height]` in the `z = 0` plane.
///
/// This is the hit area of an embedded viewport.
pub fn intersect_plane_rect(size: Size, ray: &PickRay) -> Option<LocalHit> {
    let t = plane_parameter(ray, 0.0)?;
    if !ray.in_range(t) {
        return None;
    }
    let point = ray.point_at(t);
    let rect = size.to_rect();
    if point.x < rect.x0 || point.x > rect.x1 || point.y < rect.y0 || point.y > rect.y1 {
        return None;
    }
    let point = DVec3::new(point.x, point.y, 0.0);
    Some(LocalHit {
        distance: t,
        point,
        face: None,
        tex_coord: Some(normalized_in(rect, point)),
    })
}

/// Ray parameter where the ray crosses the plane `z = z`.
fn plane_parameter(ray: &PickRay, z: f64) -> Option<f64> {
    let dir = ray.direction();
    if dir.z.abs() <= PARALLEL_EPSILON * dir.length() {
        return None;
    }
    Some((z - ray.origin().z) / dir.z)
}

fn normalized_in(bounds: Rect, point: DVec3) -> DVec2 {
    let w = bounds.width();
    let h = bounds.height();
    DVec2::new(
        if w > 0.0 { (point.x - bounds.x0) / w } else { 0.0 },
        if h > 0.0 { (point.y - bounds.y0) / h } else { 0.0 },
    )
}

/// First and last surface crossings of an extruded outline.
fn prism_roots(shape: &PlanarShape, bounds: Rect, ray: &PickRay) -> Option<(f64, f64)> {
    let half = shape.depth / 2.0;
    let inside_xy = |t: f64| {
        let p = ray.point_at(t);
        shape.outline.contains(Point::new(p.x, p.y))
    };
    let within_depth = |t: f64| {
        let z = ray.point_at(t).z;
        (-half..=half).contains(&z)
    };

    let mut first = f64::INFINITY;
    let mut last = f64::NEG_INFINITY;
    let mut record = |t: f64| {
        first = first.min(t);
        last = last.max(t);
    };

    for cap in [-half, half] {
        if let Some(t) = plane_parameter(ray, cap)
            && inside_xy(t)
        {
            record(t);
        }
    }

    // Side walls: sweep the ray's xy projection over the part of the ray that
    // can reach the outline's bounds, and intersect it with every segment.
    if let Some((t_lo, t_hi)) = xy_span(bounds, ray) {
        let a = ray.point_at(t_lo);
        let b = ray.point_at(t_hi);
        let sweep = Line::new(Point::new(a.x, a.y), Point::new(b.x, b.y));
        if sweep.p0 != sweep.p1 {
            for seg in shape.outline.segments() {
                for hit in seg.intersect_line(sweep) {
                    let t = t_lo + hit.line_t * (t_hi - t_lo);
                    if within_depth(t) {
                        record(t);
                    }
                }
            }
        }
    }

    (first <= last).then_some((first, last))
}

/// Range of ray parameters whose xy projection lies within `bounds`, slightly padded.
///
/// `None` when the projection never enters the bounds or does not move in xy.
fn xy_span(bounds: Rect, ray: &PickRay) -> Option<(f64, f64)> {
    let o = ray.origin();
    let d = ray.direction();
    if d.x == 0.0 && d.y == 0.0 {
        return None;
    }
    let mut lo = f64::NEG_INFINITY;
    let mut hi = f64::INFINITY;
    for (o, d, min, max) in [(o.x, d.x, bounds.x0, bounds.x1), (o.y, d.y, bounds.y0, bounds.y1)] {
        if d == 0.0 {
            if o < min || o > max {
                return None;
            }
            continue;
        }
        let (a, b) = ((min - o) / d, (max - o) / d);
        lo = lo.max(a.min(b));
        hi = hi.min(a.max(b));
    }
    if lo > hi || !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    // Pad so crossings exactly on the bounds are not lost to endpoint tolerance.
    let pad = (hi - lo).max(1.0) * 0.01;
    Some((lo - pad, hi + pad))
}

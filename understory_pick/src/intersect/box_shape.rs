// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DVec2, DVec3};

use super::select_root;
use crate::hit::LocalHit;
use crate::ray::PickRay;
use crate::shape::{Aabb3, CullFace};

/// One of the six faces of an axis-aligned box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BoxSide {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

/// Entry and exit of a ray through an axis-aligned box.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Slab {
    pub(crate) t0: f64,
    pub(crate) side0: Option<BoxSide>,
    pub(crate) t1: f64,
    pub(crate) side1: Option<BoxSide>,
}

/// Classic slab test. `None` when the line misses the box entirely.
///
/// An axis the ray is parallel to constrains nothing as long as the origin is
/// within that axis's extent; in that case no side is recorded for it.
pub(crate) fn slab(bounds: &Aabb3, ray: &PickRay) -> Option<Slab> {
    let origin = ray.origin();
    let dir = ray.direction();
    let mut out = Slab {
        t0: f64::NEG_INFINITY,
        side0: None,
        t1: f64::INFINITY,
        side1: None,
    };
    let axes = [
        (origin.x, dir.x, bounds.min.x, bounds.max.x, BoxSide::NegX, BoxSide::PosX),
        (origin.y, dir.y, bounds.min.y, bounds.max.y, BoxSide::NegY, BoxSide::PosY),
        (origin.z, dir.z, bounds.min.z, bounds.max.z, BoxSide::NegZ, BoxSide::PosZ),
    ];
    for (o, d, lo, hi, neg, pos) in axes {
        if d == 0.0 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (near, far, near_side, far_side) = if inv < 0.0 {
            ((hi - o) * inv, (lo - o) * inv, pos, neg)
        } else {
            ((lo - o) * inv, (hi - o) * inv, neg, pos)
        };
        if out.t0 > far || near > out.t1 {
            return None;
        }
        if near > out.t0 {
            out.t0 = near;
            out.side0 = Some(near_side);
        }
        if far < out.t1 {
            out.t1 = far;
            out.side1 = Some(far_side);
        }
    }
    Some(out)
}

/// Intersect a box of full `extents` centered on the origin.
///
/// Texture coordinates map each face onto `[0, 1]²` as seen from outside the box.
pub fn intersect_box(extents: DVec3, ray: &PickRay, cull: CullFace) -> Option<LocalHit> {
    let s = slab(&Aabb3::centered(extents), ray)?;
    let (t, exit) = select_root(s.t0, s.t1, ray, cull)?;
    let side = if exit { s.side1 } else { s.side0 };
    let point = ray.point_at(t);
    let (w, h, d) = (extents.x, extents.y, extents.z);
    let tex_coord = side.map(|side| match side {
        BoxSide::NegX => DVec2::new(0.5 - point.z / d, 0.5 + point.y / h),
        BoxSide::PosX => DVec2::new(0.5 + point.z / d, 0.5 + point.y / h),
        BoxSide::NegY => DVec2::new(0.5 + point.x / w, 0.5 - point.z / d),
        BoxSide::PosY => DVec2::new(0.5 + point.x / w, 0.5 + point.z / d),
        BoxSide::NegZ => DVec2::new(0.5 + point.x / w, 0.5 + point.y / h),
        BoxSide::PosZ => DVec2::new(0.5 - point.x / w, 0.5 + point.y / h),
    });
    Some(LocalHit {
        distance: t,
        point,
        face: None,
        tex_coord,
    })
}

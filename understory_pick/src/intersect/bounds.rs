// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::box_shape::slab;
use super::select_root;
use crate::hit::LocalHit;
use crate::ray::PickRay;
use crate::shape::{Aabb3, CullFace};

/// Intersect a node's local bounds instead of its exact geometry.
///
/// Both sides are pickable, so a ray starting inside the bounds reports where
/// it leaves them. Bounds hits never carry a face or a texture coordinate.
pub fn intersect_bounds(bounds: &Aabb3, ray: &PickRay) -> Option<LocalHit> {
    if bounds.is_empty() || !ray.is_valid() {
        return None;
    }
    let s = slab(bounds, ray)?;
    let (t, _) = select_root(s.t0, s.t1, ray, CullFace::None)?;
    Some(LocalHit::bare(t, ray.point_at(t)))
}

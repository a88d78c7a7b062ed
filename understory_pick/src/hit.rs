// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit records produced by intersectors and the resolver.

use glam::{DVec2, DVec3};

/// A hit against a single shape, in that shape's local space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalHit {
    /// Ray parameter of the hit. Comparable across spaces the same ray was mapped into.
    pub distance: f64,
    /// Hit point in local space.
    pub point: DVec3,
    /// Triangle index for mesh hits.
    pub face: Option<usize>,
    /// Texture coordinate, absent for bounds-only hits.
    pub tex_coord: Option<DVec2>,
}

impl LocalHit {
    /// A hit with no face and no texture coordinate.
    pub fn bare(distance: f64, point: DVec3) -> Self {
        Self {
            distance,
            point,
            face: None,
            tex_coord: None,
        }
    }
}

/// The outcome of picking a scene at one pointer position.
///
/// `node == None` means the pointer is over the scene background. In that case
/// `point` lies on the camera's projection plane and `distance` is the distance
/// from the ray origin to it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitResult<K> {
    /// Picked node, or `None` for the scene background.
    pub node: Option<K>,
    /// Intersection point in the picked node's local space.
    pub point: DVec3,
    /// Scene-space distance along the pick ray. `f64::INFINITY` when unavailable.
    pub distance: f64,
    /// Triangle index for mesh hits.
    pub face: Option<usize>,
    /// Texture coordinate for exact-geometry hits that have one.
    pub tex_coord: Option<DVec2>,
}

impl<K> HitResult<K> {
    /// A background result.
    pub fn background(point: DVec3, distance: f64) -> Self {
        Self {
            node: None,
            point,
            distance,
            face: None,
            tex_coord: None,
        }
    }

    /// The result of picking with a ray that cannot hit anything.
    pub fn unavailable() -> Self {
        Self::background(DVec3::NAN, f64::INFINITY)
    }

    /// Attach a node to a local hit.
    pub fn from_local(node: K, hit: LocalHit) -> Self {
        Self {
            node: Some(node),
            point: hit.point,
            distance: hit.distance,
            face: hit.face,
            tex_coord: hit.tex_coord,
        }
    }

    /// Whether this is a background result.
    pub fn is_background(&self) -> bool {
        self.node.is_none()
    }
}

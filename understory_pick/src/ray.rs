// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pick rays.
//!
//! A [`PickRay`] is an origin, a (not necessarily unit) direction, and the
//! `[near_clip, far_clip]` range of the ray parameter `t` that counts as a hit.
//! Rays are immutable: descending into a node produces a new ray expressed in
//! that node's local space via [`PickRay::to_local`].
//!
//! Because affine maps preserve the parameter along a line, a `t` computed
//! against a local-space ray is directly comparable with a `t` computed in any
//! other space the same ray was mapped into.

use glam::{DAffine3, DVec3};

/// A ray cast from a camera through a pointer position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PickRay {
    origin: DVec3,
    direction: DVec3,
    near_clip: f64,
    far_clip: f64,
    valid: bool,
}

impl PickRay {
    /// Create a ray with an unbounded clip range `[0, ∞)`.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self::with_clips(origin, direction, 0.0, f64::INFINITY)
    }

    /// Create a ray that only reports hits with `near_clip <= t <= far_clip`.
    pub fn with_clips(origin: DVec3, direction: DVec3, near_clip: f64, far_clip: f64) -> Self {
        Self {
            origin,
            direction,
            near_clip,
            far_clip,
            valid: true,
        }
    }

    /// A ray that hits nothing; produced when the camera cannot be inverted.
    pub fn invalid() -> Self {
        Self {
            origin: DVec3::NAN,
            direction: DVec3::NAN,
            near_clip: 0.0,
            far_clip: 0.0,
            valid: false,
        }
    }

    /// Ray origin.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Ray direction. Not normalized.
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Smallest accepted ray parameter.
    pub fn near_clip(&self) -> f64 {
        self.near_clip
    }

    /// Largest accepted ray parameter.
    pub fn far_clip(&self) -> f64 {
        self.far_clip
    }

    /// Whether this ray can hit anything at all.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether `t` lies within the clip range.
    #[inline]
    pub fn in_range(&self, t: f64) -> bool {
        t >= self.near_clip && t <= self.far_clip
    }

    /// Point at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Return the same ray with a unit-length direction, and the original length.
    ///
    /// The clip range is rescaled so that it covers the same segment of space.
    /// A zero-length direction yields an invalid ray.
    pub fn normalized(&self) -> (Self, f64) {
        let mag = self.direction.length();
        if !self.valid || mag == 0.0 || !mag.is_finite() {
            return (Self::invalid(), mag);
        }
        (
            Self {
                origin: self.origin,
                direction: self.direction / mag,
                near_clip: self.near_clip * mag,
                far_clip: self.far_clip * mag,
                valid: true,
            },
            mag,
        )
    }

    /// Map this ray forward by `transform` (for example camera space to scene space).
    pub fn transformed(&self, transform: &DAffine3) -> Self {
        Self {
            origin: transform.transform_point3(self.origin),
            direction: transform.transform_vector3(self.direction),
            ..*self
        }
    }

    /// Express this ray in the local space of a node whose local-to-parent
    /// transform is `local_to_parent`.
    ///
    /// Returns `None` if the transform is not invertible.
    pub fn to_local(&self, local_to_parent: &DAffine3) -> Option<Self> {
        let inverse = invert(local_to_parent)?;
        Some(self.transformed(&inverse))
    }
}

/// Invert an affine transform, or `None` if it is singular or not finite.
pub fn invert(transform: &DAffine3) -> Option<DAffine3> {
    let det = transform.matrix3.determinant();
    if det == 0.0 || !det.is_finite() || !transform.is_finite() {
        return None;
    }
    let inverse = transform.inverse();
    inverse.is_finite().then_some(inverse)
}

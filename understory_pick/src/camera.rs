// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cameras and pick ray construction.
//!
//! A [`Camera`] maps a 2D pointer position in a viewport of a given [`Size`]
//! to a [`PickRay`] in scene space. Two projections are supported:
//!
//! - [`Projection::Parallel`]: the ray starts at the pointer position on a plane
//!   in front of the scene and looks straight down +z.
//! - [`Projection::Perspective`]: the ray starts at the eye and passes through the
//!   pointer position on the projection plane `z = 0`.
//!
//! In both cases the camera's [`transform`](Camera::transform) is applied last.
//! The returned ray's clip range is expressed in ray parameter units, so that
//! after [`PickRay::normalized`] it measures scene distance from the origin.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use glam::{DAffine3, DVec3};
use kurbo::{Point, Size};

use crate::ray::{PickRay, invert};

/// Half angle used to place a parallel camera's viewing plane in front of the scene.
const PARALLEL_HALF_ANGLE_DEGREES: f64 = 15.0;

/// Camera projection model.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Projection {
    /// Orthographic projection along +z.
    Parallel,
    /// Perspective projection.
    Perspective {
        /// Full field of view in degrees.
        field_of_view_degrees: f64,
        /// Whether `field_of_view_degrees` spans the viewport height (otherwise the width).
        vertical_field_of_view: bool,
        /// Place the eye at the camera-space origin instead of in front of the viewport center.
        fixed_eye: bool,
    },
}

/// The active camera of a scene.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    /// Projection model.
    pub projection: Projection,
    /// Camera-to-scene transform.
    pub transform: DAffine3,
    /// Near clip, relative to the projection distance.
    pub near_clip: f64,
    /// Far clip, relative to the projection distance.
    pub far_clip: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::parallel()
    }
}

impl Camera {
    /// Default near clip.
    pub const DEFAULT_NEAR_CLIP: f64 = 0.1;
    /// Default far clip.
    pub const DEFAULT_FAR_CLIP: f64 = 100.0;
    /// Default perspective field of view in degrees.
    pub const DEFAULT_FIELD_OF_VIEW: f64 = 30.0;

    /// A parallel camera with default clips and an identity transform.
    pub fn parallel() -> Self {
        Self {
            projection: Projection::Parallel,
            transform: DAffine3::IDENTITY,
            near_clip: Self::DEFAULT_NEAR_CLIP,
            far_clip: Self::DEFAULT_FAR_CLIP,
        }
    }

    /// A perspective camera with a vertical field of view of `field_of_view_degrees`.
    pub fn perspective(field_of_view_degrees: f64) -> Self {
        Self {
            projection: Projection::Perspective {
                field_of_view_degrees,
                vertical_field_of_view: true,
                fixed_eye: false,
            },
            ..Self::parallel()
        }
    }

    /// Replace the camera-to-scene transform.
    pub fn with_transform(mut self, transform: DAffine3) -> Self {
        self.transform = transform;
        self
    }

    /// Replace both clip planes.
    pub fn with_clips(mut self, near_clip: f64, far_clip: f64) -> Self {
        self.near_clip = near_clip;
        self.far_clip = far_clip;
        self
    }

    /// Distance from the eye to the projection plane for a viewport of `viewport` size.
    pub fn projection_distance(&self, viewport: Size) -> f64 {
        match self.projection {
            Projection::Parallel => {
                (viewport.height / 2.0) / PARALLEL_HALF_ANGLE_DEGREES.to_radians().tan()
            }
            Projection::Perspective {
                field_of_view_degrees,
                vertical_field_of_view,
                ..
            } => {
                let span = if vertical_field_of_view {
                    viewport.height
                } else {
                    viewport.width
                };
                (span / 2.0) / (field_of_view_degrees.to_radians() / 2.0).tan()
            }
        }
    }

    /// Build the scene-space pick ray through `point` in a viewport of `viewport` size.
    ///
    /// Returns [`PickRay::invalid`] when the camera transform is not invertible.
    pub fn compute_pick_ray(&self, point: Point, viewport: Size) -> PickRay {
        if invert(&self.transform).is_none() {
            return PickRay::invalid();
        }
        let distance = self.projection_distance(viewport);
        let ray = match self.projection {
            Projection::Parallel => PickRay::with_clips(
                DVec3::new(point.x, point.y, -distance),
                DVec3::new(0.0, 0.0, distance),
                self.near_clip,
                self.far_clip,
            ),
            Projection::Perspective { fixed_eye, .. } => {
                let direction = DVec3::new(
                    point.x - viewport.width / 2.0,
                    point.y - viewport.height / 2.0,
                    distance,
                );
                let (origin, scale) = if fixed_eye {
                    (DVec3::ZERO, 1.0 / distance)
                } else {
                    (
                        DVec3::new(viewport.width / 2.0, viewport.height / 2.0, -distance),
                        1.0,
                    )
                };
                PickRay::with_clips(
                    origin,
                    direction,
                    self.near_clip * scale,
                    self.far_clip * scale,
                )
            }
        };
        ray.transformed(&self.transform)
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pick --heading-base-level=0

//! Understory Pick: ray picking for retained-mode scene graphs.
//!
//! Given a pointer position, this crate answers "which node is under the pointer,
//! where exactly, and how far away", for scenes that mix flat 2D outlines with 3D
//! solids and meshes.
//!
//! ## Pipeline
//!
//! 1) [`Camera::compute_pick_ray`] turns a viewport position into a scene-space
//!    [`PickRay`] (parallel or perspective projection, with clip planes).
//! 2) [`resolve::pick`] walks a [`PickSource`] topmost-first, mapping the ray
//!    into each node's local space and running the matching intersector from
//!    [`intersect`].
//! 3) A [`PickChooser`] selects the winner: the nearest hit when the scene has a
//!    depth buffer, the first hit (painter's order) when it does not.
//!
//! The result is a [`HitResult`]: the node (or `None` for the scene background),
//! the local hit point, the distance along the ray, and for some shapes a face
//! index and texture coordinate.
//!
//! ## Shapes
//!
//! [`ShapeDescriptor`] is a closed set of local geometries: boxes, spheres,
//! capped cylinders, indexed triangle meshes, planar outlines (flat or extruded),
//! and embedded sub-scenes with their own camera. Any node can opt into picking
//! by its bounds instead, in which case no texture coordinate is reported.
//!
//! ## Not a scene graph
//!
//! This crate owns no nodes. Implement [`PickSource`] over your tree, or use
//! `understory_scene_tree`, which provides one.
//!
//! ## Example
//!
//! ```
//! use understory_pick::{Camera, CullFace, PickRay, ShapeDescriptor, intersect::intersect};
//! use glam::DVec3;
//!
//! let shape = ShapeDescriptor::cuboid(100.0, 200.0, 400.0);
//! let ray = PickRay::new(DVec3::new(10.0, 40.0, -1000.0), DVec3::Z);
//! let hit = intersect(&shape, &ray, CullFace::Back).unwrap();
//! assert_eq!(hit.point, DVec3::new(10.0, 40.0, -200.0));
//! assert_eq!(hit.distance, 800.0);
//!
//! // Looking from inside reports the far face instead.
//! let hit = intersect(&shape, &ray, CullFace::Front).unwrap();
//! assert_eq!(hit.point.z, 200.0);
//! # let _ = Camera::default();
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature for
//! floating point math on targets without `std`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod camera;
pub mod chooser;
pub mod hit;
pub mod intersect;
pub mod ray;
pub mod resolve;
pub mod shape;
pub mod source;

pub use camera::{Camera, Projection};
pub use chooser::PickChooser;
pub use hit::{HitResult, LocalHit};
pub use ray::PickRay;
pub use resolve::pick;
pub use shape::{
    Aabb3, CullFace, MeshError, MeshFace, PlanarShape, ShapeDescriptor, SubScene, TriangleMesh,
};
pub use source::PickSource;

// Re-exported so downstream crates use the same math types without pinning versions.
pub use glam;
pub use kurbo;

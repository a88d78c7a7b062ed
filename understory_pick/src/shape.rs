// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape descriptors: the local geometry a node exposes for picking.
//!
//! Shapes are a closed set of variants dispatched by
//! [`intersect`](crate::intersect::intersect). All shapes are expressed in the
//! node's local space. Solid shapes (box, sphere, cylinder) are centered on
//! the origin; planar outlines and sub-scenes live in the `z = 0` plane.

use alloc::sync::Arc;
use alloc::vec::Vec;

use glam::{DVec2, DVec3};
use kurbo::{BezPath, Shape as _, Size};

use crate::camera::Camera;

/// Which side of a surface is hidden from picking.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CullFace {
    /// Hide back faces; only front faces are pickable.
    #[default]
    Back,
    /// Hide front faces; only back faces are pickable (looking from inside).
    Front,
    /// Both sides are pickable.
    None,
}

/// Axis-aligned 3D bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb3 {
    /// The empty box; the identity for [`Aabb3::union`].
    pub const EMPTY: Self = Self {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    /// Create a box from two corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// A box of the given full extents centered on the origin.
    pub fn centered(extents: DVec3) -> Self {
        let half = extents * 0.5;
        Self::new(-half, half)
    }

    /// Whether the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Center point.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Bounding box of this box's eight corners under `transform`.
    pub fn transformed(&self, transform: &glam::DAffine3) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::EMPTY;
        for i in 0..8 {
            let corner = DVec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = transform.transform_point3(corner);
            out = out.union(&Self::new(p, p));
        }
        out
    }
}

/// Errors raised when building a [`TriangleMesh`] from flat buffers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The position buffer is not a whole number of `xyz` triples.
    #[error("point buffer length {0} is not a multiple of 3")]
    PointStride(usize),
    /// The texture coordinate buffer is not a whole number of `uv` pairs.
    #[error("texture coordinate buffer length {0} is not a multiple of 2")]
    TexCoordStride(usize),
    /// The face buffer is not a whole number of `p0 t0 p1 t1 p2 t2` records.
    #[error("face buffer length {0} is not a multiple of 6")]
    FaceStride(usize),
}

/// One triangle of a [`TriangleMesh`]: point indices and texture coordinate indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshFace {
    /// Indices into [`TriangleMesh::positions`], in winding order.
    pub points: [u32; 3],
    /// Indices into [`TriangleMesh::tex_coords`], matching `points`.
    pub tex_coords: [u32; 3],
}

/// An indexed triangle mesh.
///
/// Indices are not validated on construction; triangles that reference
/// missing vertices are skipped during intersection, and hits on triangles
/// with missing texture coordinates carry none.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<DVec3>,
    /// Texture coordinates.
    pub tex_coords: Vec<DVec2>,
    /// Triangles.
    pub faces: Vec<MeshFace>,
}

impl TriangleMesh {
    /// Build a mesh from flat buffers.
    ///
    /// - `points`: `x y z` triples.
    /// - `tex_coords`: `u v` pairs.
    /// - `faces`: `p0 t0 p1 t1 p2 t2` records, one per triangle.
    pub fn from_flat(points: &[f32], tex_coords: &[f32], faces: &[u32]) -> Result<Self, MeshError> {
        if points.len() % 3 != 0 {
            return Err(MeshError::PointStride(points.len()));
        }
        if tex_coords.len() % 2 != 0 {
            return Err(MeshError::TexCoordStride(tex_coords.len()));
        }
        if faces.len() % 6 != 0 {
            return Err(MeshError::FaceStride(faces.len()));
        }
        Ok(Self {
            positions: points
                .chunks_exact(3)
                .map(|p| DVec3::new(p[0].into(), p[1].into(), p[2].into()))
                .collect(),
            tex_coords: tex_coords
                .chunks_exact(2)
                .map(|t| DVec2::new(t[0].into(), t[1].into()))
                .collect(),
            faces: faces
                .chunks_exact(6)
                .map(|f| MeshFace {
                    points: [f[0], f[2], f[4]],
                    tex_coords: [f[1], f[3], f[5]],
                })
                .collect(),
        })
    }

    /// Bounds of all referenced and unreferenced vertices.
    pub fn bounds(&self) -> Aabb3 {
        self.positions
            .iter()
            .fold(Aabb3::EMPTY, |acc, &p| acc.union(&Aabb3::new(p, p)))
    }
}

/// A 2D outline in the `z = 0` plane, optionally extruded symmetrically along z.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarShape {
    /// Closed outline; filled with the non-zero rule.
    pub outline: BezPath,
    /// Extrusion depth. Zero means a flat, double-sided shape.
    pub depth: f64,
}

impl PlanarShape {
    /// A flat shape.
    pub fn flat(outline: BezPath) -> Self {
        Self {
            outline,
            depth: 0.0,
        }
    }

    /// A shape extruded over `z ∈ [-depth/2, depth/2]`.
    pub fn extruded(outline: BezPath, depth: f64) -> Self {
        Self {
            outline,
            depth: depth.max(0.0),
        }
    }
}

/// An embedded viewport with its own camera.
///
/// The sub-scene occupies `[0, width] × [0, height]` in its node's `z = 0`
/// plane; the node's children are its content and are picked through
/// [`camera`](Self::camera).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubScene {
    /// Viewport size.
    pub size: Size,
    /// Camera used to pick the content.
    pub camera: Camera,
    /// Whether the content is picked with depth testing.
    pub depth_buffer: bool,
    /// Whether the background is filled; an opaque sub-scene is hit even where no content is.
    pub opaque_fill: bool,
}

/// Local geometry of a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ShapeDescriptor {
    /// No geometry of its own; only children are pickable.
    #[default]
    Group,
    /// Box centered on the origin.
    Box {
        /// Extent along x.
        width: f64,
        /// Extent along y.
        height: f64,
        /// Extent along z.
        depth: f64,
    },
    /// Sphere centered on the origin.
    Sphere {
        /// Radius.
        radius: f64,
    },
    /// Capped cylinder centered on the origin with its axis along y.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Extent along y.
        height: f64,
    },
    /// Indexed triangle mesh.
    Mesh(Arc<TriangleMesh>),
    /// Planar 2D outline.
    Planar(PlanarShape),
    /// Nested viewport.
    SubScene(SubScene),
}

impl ShapeDescriptor {
    /// Convenience constructor for [`ShapeDescriptor::Box`].
    pub fn cuboid(width: f64, height: f64, depth: f64) -> Self {
        Self::Box {
            width,
            height,
            depth,
        }
    }

    /// Whether this shape has geometry of its own.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Local axis-aligned bounds. Empty for a group.
    pub fn local_bounds(&self) -> Aabb3 {
        match self {
            Self::Group => Aabb3::EMPTY,
            Self::Box {
                width,
                height,
                depth,
            } => Aabb3::centered(DVec3::new(*width, *height, *depth)),
            Self::Sphere { radius } => Aabb3::centered(DVec3::splat(2.0 * radius)),
            Self::Cylinder { radius, height } => {
                Aabb3::centered(DVec3::new(2.0 * radius, *height, 2.0 * radius))
            }
            Self::Mesh(mesh) => mesh.bounds(),
            Self::Planar(planar) => {
                let r = planar.outline.bounding_box();
                let half = planar.depth * 0.5;
                Aabb3::new(DVec3::new(r.x0, r.y0, -half), DVec3::new(r.x1, r.y1, half))
            }
            Self::SubScene(sub) => Aabb3::new(
                DVec3::ZERO,
                DVec3::new(sub.size.width, sub.size.height, 0.0),
            ),
        }
    }
}

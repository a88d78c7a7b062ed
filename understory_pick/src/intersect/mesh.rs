// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DVec2, DVec3};

use crate::hit::LocalHit;
use crate::ray::PickRay;
use crate::shape::{CullFace, MeshFace, TriangleMesh};

/// Intersect an indexed triangle mesh.
///
/// Triangles are tested in order with the Möller–Trumbore algorithm and the
/// nearest in-range hit wins. The reported face is the triangle index and the
/// texture coordinate is interpolated barycentrically.
///
/// A triangle's front side is the one its winding `(v1 - v0) × (v2 - v0)` points
/// towards. Triangles that reference missing vertices and zero-area triangles
/// are skipped. A triangle whose texture indices are out of range is still
/// picked, without a texture coordinate.
pub fn intersect_mesh(mesh: &TriangleMesh, ray: &PickRay, cull: CullFace) -> Option<LocalHit> {
    let mut best: Option<LocalHit> = None;
    for (index, face) in mesh.faces.iter().enumerate() {
        let Some(hit) = intersect_face(mesh, index, face, ray, cull) else {
            continue;
        };
        if best.is_none_or(|b| hit.distance < b.distance) {
            best = Some(hit);
        }
    }
    best
}

fn vertex(mesh: &TriangleMesh, index: u32) -> Option<DVec3> {
    mesh.positions.get(usize::try_from(index).ok()?).copied()
}

fn tex_coord(mesh: &TriangleMesh, index: u32) -> Option<DVec2> {
    mesh.tex_coords.get(usize::try_from(index).ok()?).copied()
}

fn intersect_face(
    mesh: &TriangleMesh,
    index: usize,
    face: &MeshFace,
    ray: &PickRay,
    cull: CullFace,
) -> Option<LocalHit> {
    let (Some(v0), Some(v1), Some(v2)) = (
        vertex(mesh, face.points[0]),
        vertex(mesh, face.points[1]),
        vertex(mesh, face.points[2]),
    ) else {
        tracing::trace!(face = index, "skipping triangle with out-of-range point index");
        return None;
    };
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let normal = e1.cross(e2);
    if normal.length_squared() == 0.0 {
        tracing::trace!(face = index, "skipping degenerate triangle");
        return None;
    }

    let dir = ray.direction();
    let h = dir.cross(e2);
    let a = e1.dot(h);
    if a == 0.0 {
        // Parallel to the triangle plane.
        return None;
    }
    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = f * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * e2.dot(q);
    if !ray.in_range(t) {
        return None;
    }

    // Positive when the triangle faces the ray origin.
    let facing = normal.dot(-dir);
    let culled = match cull {
        CullFace::Back => facing <= 0.0,
        CullFace::Front => facing >= 0.0,
        CullFace::None => false,
    };
    if culled {
        return None;
    }

    let uv = match (
        tex_coord(mesh, face.tex_coords[0]),
        tex_coord(mesh, face.tex_coords[1]),
        tex_coord(mesh, face.tex_coords[2]),
    ) {
        (Some(uv0), Some(uv1), Some(uv2)) => Some(uv0 * (1.0 - u - v) + uv1 * u + uv2 * v),
        _ => {
            tracing::trace!(face = index, "texture index out of range");
            None
        }
    };

    Some(LocalHit {
        distance: t,
        point: ray.point_at(t),
        face: Some(index),
        tex_coord: uv,
    })
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow view of a scene tree that picking needs.

use alloc::vec::Vec;

use glam::{DAffine3, DVec3};
use kurbo::Size;

use crate::camera::Camera;
use crate::ray::invert;
use crate::shape::{CullFace, ShapeDescriptor};

/// A scene that can be picked.
///
/// Implementations own the node tree; picking only reads it. Every method
/// must tolerate stale handles: `is_alive` returns `false` for them and the
/// other methods may return any harmless default.
pub trait PickSource {
    /// Node handle.
    type Node: Copy + Eq + core::fmt::Debug;

    /// The root node of the scene, if any.
    fn root(&self) -> Option<Self::Node>;

    /// Children of `node` in stacking order, bottom-most first.
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Parent of `node`, or `None` for the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Whether `node` still refers to a live node.
    fn is_alive(&self, node: Self::Node) -> bool;

    /// Whether `node` is visible and not transparent to input.
    fn is_visible_for_input(&self, node: Self::Node) -> bool;

    /// Whether `node` has input disabled.
    fn is_input_disabled(&self, node: Self::Node) -> bool;

    /// Local geometry.
    fn local_shape(&self, node: Self::Node) -> &ShapeDescriptor;

    /// Local-to-parent transform; may be non-invertible.
    fn local_to_parent(&self, node: Self::Node) -> DAffine3;

    /// Culling policy for the node's shape.
    fn cull_face(&self, node: Self::Node) -> CullFace;

    /// Whether the node is picked on its bounds instead of its exact geometry.
    fn pick_on_bounds(&self, node: Self::Node) -> bool;

    /// Camera of the scene.
    fn active_camera(&self) -> &Camera;

    /// Whether the scene ranks hits by depth.
    fn has_depth_buffer(&self) -> bool;

    /// Size of the scene viewport.
    fn viewport_size(&self) -> Size;

    /// Whether `node` and all its ancestors accept input.
    fn accepts_input_in_chain(&self, node: Self::Node) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if !self.is_alive(n) || !self.is_visible_for_input(n) || self.is_input_disabled(n) {
                return false;
            }
            cur = self.parent(n);
        }
        true
    }

    /// Root→`node` path (inclusive). Empty for a stale node.
    fn path_to(&self, node: Self::Node) -> Vec<Self::Node> {
        if !self.is_alive(node) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut cur = Some(node);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent(n);
        }
        out.reverse();
        out
    }

    /// Composite local-to-scene transform of `node`.
    fn local_to_scene(&self, node: Self::Node) -> DAffine3 {
        let mut tf = DAffine3::IDENTITY;
        let mut cur = Some(node);
        while let Some(n) = cur {
            tf = self.local_to_parent(n) * tf;
            cur = self.parent(n);
        }
        tf
    }

    /// Map a scene-space point into `node`'s local space.
    ///
    /// Returns NaN coordinates when the transform chain is not invertible.
    fn scene_to_local(&self, node: Self::Node, point: DVec3) -> DVec3 {
        invert(&self.local_to_scene(node)).map_or(DVec3::NAN, |inv| inv.transform_point3(point))
    }
}

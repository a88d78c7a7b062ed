// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scene_tree --heading-base-level=0

//! Understory Scene Tree: a generational scene tree that can be picked.
//!
//! - Represents a hierarchy of nodes with local 3D transforms, shapes, z-order, and input flags.
//! - Holds the scene-wide picking settings: camera, viewport size, and whether a depth buffer is used.
//! - Implements [`PickSource`], so [`understory_pick::pick`] and the gesture machine in
//!   `understory_responder` work on it directly.
//!
//! ## Not a renderer
//!
//! This crate stores exactly what picking needs and nothing else. Upstream code
//! mirrors its scene into the tree (shapes, transforms, visibility) and calls
//! [`Tree::commit`] after a batch of changes; a `true` result means pointer state
//! derived from the old tree should be refreshed.
//!
//! ## API overview
//!
//! - [`Tree`]: node storage plus scene settings.
//! - [`LocalNode`]: per-node local data (shape, transform, cull face, z, flags).
//! - [`NodeFlags`]: visibility, pickability, enabled state, and pick-on-bounds.
//! - [`NodeId`]: generational handle of a node. Handles to removed nodes stay
//!   detectably stale even after their slot is reused.
//!
//! Children are kept in stacking order: ascending `z_index`, then insertion order.
//! Later children are on top.
//!
//! ## Example
//!
//! ```
//! use understory_scene_tree::{LocalNode, Tree};
//! use understory_pick::{Camera, ShapeDescriptor};
//! use understory_pick::glam::{DAffine3, DVec3};
//! use understory_pick::kurbo::{Point, Size};
//!
//! let mut tree = Tree::new();
//! tree.set_viewport_size(Size::new(400.0, 400.0));
//! tree.set_camera(Camera::parallel());
//!
//! let root = tree.insert(None, LocalNode::default());
//! let square = tree.insert(
//!     Some(root),
//!     LocalNode {
//!         shape: ShapeDescriptor::cuboid(100.0, 100.0, 0.0),
//!         local_transform: DAffine3::from_translation(DVec3::new(200.0, 200.0, 0.0)),
//!         ..Default::default()
//!     },
//! );
//! assert!(tree.commit());
//!
//! let hit = tree.pick(Point::new(210.0, 190.0));
//! assert_eq!(hit.node, Some(square));
//! assert!(tree.pick(Point::new(10.0, 10.0)).node.is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use bitflags::bitflags;
use glam::DAffine3;
use kurbo::{Point, Size};
use understory_pick::{Camera, CullFace, HitResult, PickSource, ShapeDescriptor};

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Node flags controlling visibility and input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible. Invisible nodes and their subtrees are never picked.
        const VISIBLE        = 0b0000_0001;
        /// Node takes part in picking. Clear it to make a node transparent to input.
        const PICKABLE       = 0b0000_0010;
        /// Node accepts input. Disabled nodes and their subtrees are never picked.
        const ENABLED        = 0b0000_0100;
        /// Pick the node on its bounds rather than its exact shape.
        const PICK_ON_BOUNDS = 0b0000_1000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE | Self::ENABLED
    }
}

/// Local data for a node.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local geometry.
    pub shape: ShapeDescriptor,
    /// Local transform relative to parent space. May be singular; such nodes are not picked.
    pub local_transform: DAffine3,
    /// Which side of the shape is hidden from picking.
    pub cull_face: CullFace,
    /// Z-order within the parent. Higher is on top.
    pub z_index: i32,
    /// Visibility and input flags.
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            shape: ShapeDescriptor::Group,
            local_transform: DAffine3::IDENTITY,
            cull_face: CullFace::default(),
            z_index: 0,
            flags: NodeFlags::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    /// Insertion sequence; breaks z-index ties in stacking order.
    seq: u64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
}

/// A generational slot. The generation outlives the node so reused slots hand out fresh ids.
#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
    /// The full pick result.
    pub result: HitResult<NodeId>,
}

static GROUP: ShapeDescriptor = ShapeDescriptor::Group;

/// A scene tree plus its picking settings.
pub struct Tree {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    root: Option<NodeId>,
    next_seq: u64,
    epoch: u64,
    changed: bool,
    camera: Camera,
    viewport: Size,
    depth_buffer: bool,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|s| s.node.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("epoch", &self.epoch)
            .field("camera", &self.camera)
            .field("viewport", &self.viewport)
            .field("depth_buffer", &self.depth_buffer)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree with a parallel camera, an empty viewport, and no depth buffer.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            root: None,
            next_seq: 0,
            epoch: 0,
            changed: false,
            camera: Camera::parallel(),
            viewport: Size::ZERO,
            depth_buffer: false,
        }
    }

    /// Insert a new node on top of its z band under `parent`.
    ///
    /// With `parent == None` the node becomes the scene root if there is none
    /// yet; otherwise it stays detached until reparented. A stale `parent` also
    /// leaves the node detached.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let node = Node {
            seq,
            parent: None,
            children: Vec::new(),
            local,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            self.slots.push(Slot::default());
            self.slots.len() - 1
        };
        let slot = &mut self.slots[idx];
        slot.generation = slot.generation.wrapping_add(1);
        slot.node = Some(node);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, slot.generation);
        match parent {
            Some(p) if self.is_alive(p) => self.link_parent(id, p),
            Some(p) => tracing::debug!(?p, "inserting under a stale parent; node left detached"),
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        self.changed = true;
        id
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
        if self.root.is_some_and(|r| !self.is_alive(r)) {
            self.root = None;
        }
        self.changed = true;
    }

    /// Reparent `id` under `new_parent`, on top of its z band.
    ///
    /// With `None` the node becomes detached (or the root, if there is none).
    /// Moving a node under its own descendant is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.path_to_root(p).contains(&id))
        {
            return;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            self.unlink_parent(id, parent);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(n) = self.node_mut(id) {
            n.seq = seq;
        }
        match new_parent {
            Some(p) => self.link_parent(id, p),
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        self.changed = true;
    }

    /// Make `id` the scene root. Returns `false` if `id` is stale or has a parent.
    pub fn set_root(&mut self, id: NodeId) -> bool {
        match self.node(id) {
            Some(n) if n.parent.is_none() => {
                self.root = Some(id);
                self.changed = true;
                true
            }
            _ => false,
        }
    }

    /// Update the shape.
    pub fn set_shape(&mut self, id: NodeId, shape: ShapeDescriptor) {
        if let Some(node) = self.node_mut(id) {
            node.local.shape = shape;
            self.changed = true;
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, transform: DAffine3) {
        if let Some(node) = self.node_mut(id) {
            node.local.local_transform = transform;
            self.changed = true;
        }
    }

    /// Update the cull face.
    pub fn set_cull_face(&mut self, id: NodeId, cull_face: CullFace) {
        if let Some(node) = self.node_mut(id) {
            node.local.cull_face = cull_face;
            self.changed = true;
        }
    }

    /// Update z index, restacking the node within its parent.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.local.z_index = z;
        let parent = node.parent;
        if let Some(p) = parent {
            self.unlink_parent(id, p);
            self.link_parent(id, p);
        }
        self.changed = true;
    }

    /// Update flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(node) = self.node_mut(id) {
            node.local.flags = flags;
            self.changed = true;
        }
    }

    /// Set the scene camera.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.changed = true;
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
        self.changed = true;
    }

    /// Enable or disable depth-buffered picking.
    pub fn set_depth_buffer(&mut self, depth_buffer: bool) {
        self.depth_buffer = depth_buffer;
        self.changed = true;
    }

    /// Close the current batch of changes.
    ///
    /// Returns whether anything changed since the previous commit. When it did,
    /// hover and capture state derived from the previous tree should be refreshed.
    pub fn commit(&mut self) -> bool {
        let changed = core::mem::take(&mut self.changed);
        if changed {
            self.epoch = self.epoch.wrapping_add(1);
            tracing::trace!(epoch = self.epoch, "scene tree committed");
        }
        changed
    }

    /// Number of commits that carried changes.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The scene root.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Local data of a node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node(id).map(|n| &n.local)
    }

    /// Children of a node in stacking order, bottom-most first.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| &n.children)
    }

    /// Parent of a node.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Pick the scene at a viewport position.
    pub fn pick(&self, pt: Point) -> HitResult<NodeId> {
        understory_pick::pick(self, pt)
    }

    /// Pick the scene and return the winning node with its root path, if any.
    pub fn hit_test_point(&self, pt: Point) -> Option<Hit> {
        let result = self.pick(pt);
        let node = result.node?;
        Some(Hit {
            node,
            path: self.path_to_root(node),
            result,
        })
    }

    /// Path from the topmost ancestor to `id` (inclusive). Empty for a stale id.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur.filter(|&n| self.is_alive(n)) {
            out.push(n);
            cur = self.parent_of(n);
        }
        out.reverse();
        out
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    fn stacking_key(&self, id: NodeId) -> (i32, u64) {
        self.node(id).map_or((0, 0), |n| (n.local.z_index, n.seq))
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let key = self.stacking_key(id);
        let pos = self
            .node(parent)
            .map_or(0, |p| p.children.partition_point(|&c| self.stacking_key(c) <= key));
        if let Some(p) = self.node_mut(parent) {
            p.children.insert(pos, id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.slots.get_mut(id.idx()).and_then(|s| s.node.take()) else {
            return;
        };
        self.free_list.push(id.idx());
        for child in node.children {
            self.free_subtree(child);
        }
    }
}

impl PickSource for Tree {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.children_of(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn is_alive(&self, node: NodeId) -> bool {
        Self::is_alive(self, node)
    }

    fn is_visible_for_input(&self, node: NodeId) -> bool {
        self.local(node)
            .is_some_and(|l| l.flags.contains(NodeFlags::VISIBLE | NodeFlags::PICKABLE))
    }

    fn is_input_disabled(&self, node: NodeId) -> bool {
        self.local(node)
            .is_none_or(|l| !l.flags.contains(NodeFlags::ENABLED))
    }

    fn local_shape(&self, node: NodeId) -> &ShapeDescriptor {
        self.local(node).map_or(&GROUP, |l| &l.shape)
    }

    fn local_to_parent(&self, node: NodeId) -> DAffine3 {
        self.local(node).map_or(DAffine3::IDENTITY, |l| l.local_transform)
    }

    fn cull_face(&self, node: NodeId) -> CullFace {
        self.local(node).map_or(CullFace::default(), |l| l.cull_face)
    }

    fn pick_on_bounds(&self, node: NodeId) -> bool {
        self.local(node)
            .is_some_and(|l| l.flags.contains(NodeFlags::PICK_ON_BOUNDS))
    }

    fn active_camera(&self) -> &Camera {
        &self.camera
    }

    fn has_depth_buffer(&self) -> bool {
        self.depth_buffer
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}

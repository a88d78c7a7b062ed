// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state helper: compute enter/leave transitions from path changes.
//!
//! The gesture machine keeps one [`HoverChain`] for the hovered chain and another
//! for the full-drag chain. Both are driven by root→target paths taken from
//! [`PickSource::path_to`](understory_pick::PickSource::path_to).
//!
//! ## Minimal example
//!
//! ```
//! use understory_responder::hover::{HoverChain, HoverEvent};
//! let mut h: HoverChain<u32> = HoverChain::new();
//! assert_eq!(h.update_path(&[1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update_path(&[1, 3]), vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]);
//! ```

use alloc::vec::Vec;

/// A simple hover state machine over root→target paths.
///
/// Tracks the current hovered path (root→target) and, when updated with a new
/// path, computes the minimal sequence of leave and enter transitions to move
/// from the old state to the new state.
///
/// Ordering semantics:
/// - Leave events are emitted from inner-most to outer-most.
/// - Enter events are emitted from outer-most to inner-most.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverChain<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// Pointer enters the given node (in order from outer→inner).
    Enter(K),
    /// Pointer leaves the given node (in order from inner→outer).
    Leave(K),
}

impl<K: Copy + Eq> HoverChain<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// Return the current root→target path (if any).
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// The inner-most hovered node.
    pub fn target(&self) -> Option<K> {
        self.current.last().copied()
    }

    /// Clear the current hover path, returning the corresponding leave events
    /// from inner-most to outer-most.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        let out = self.current.iter().rev().map(|&k| HoverEvent::Leave(k)).collect();
        self.current.clear();
        out
    }

    /// Forget the current path without producing transitions.
    pub fn reset(&mut self) {
        self.current.clear();
    }

    /// Cut the path at the first node for which `keep` returns false.
    ///
    /// Used after structural changes: a dropped node's descendants in the path
    /// are dropped with it, and no transitions are produced for any of them.
    /// Returns the number of nodes removed.
    pub fn truncate_where_not(&mut self, mut keep: impl FnMut(&[K], K) -> bool) -> usize {
        let cut = (0..self.current.len())
            .find(|&i| !keep(&self.current[..i], self.current[i]))
            .unwrap_or(self.current.len());
        let removed = self.current.len() - cut;
        self.current.truncate(cut);
        removed
    }

    /// Drop stale nodes (and everything below them) without producing transitions.
    pub fn retain_alive(&mut self, mut is_alive: impl FnMut(K) -> bool) -> usize {
        self.truncate_where_not(|_, k| is_alive(k))
    }

    /// Update the hover path and return the enter/leave events required to
    /// transition from the previous path to `new_path`.
    ///
    /// Leaves are emitted from inner-most to outer-most, then enters from
    /// outer-most to inner-most.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        // Length of the shared ancestry, i.e. the depth of the lowest common ancestor.
        let lca = common_prefix_len(&self.current, new_path);

        let mut out = Vec::new();
        // Leaves: from old tail back to the LCA (exclusive), inner→outer.
        for &k in self.current[lca..].iter().rev() {
            out.push(HoverEvent::Leave(k));
        }

        // Enters: from LCA down to new tail, outer→inner.
        for &k in &new_path[lca..] {
            out.push(HoverEvent::Enter(k));
        }

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

/// Length of the shared prefix of two root→target paths.
pub fn common_prefix_len<K: PartialEq>(a: &[K], b: &[K]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

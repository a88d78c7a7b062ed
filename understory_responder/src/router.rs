// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Reconstructs the responder path for an event's target and emits dispatch steps.
//! Produces a capture → target → bubble sequence over `[Scene, root, …, target]`.
//!
//! ## Crossing events
//!
//! `Entered`/`Exited` (and their full-drag counterparts) are about one node only.
//! They reach the target in the [`Target`](Phase::Target) phase; ancestors observe
//! them through [`Capture`](Phase::Capture) and [`Bubble`](Phase::Bubble), which
//! is how a container learns that a child was entered or exited. All other kinds
//! also deliver the target in the capture and bubble phases.
//!
//! ## Stale targets
//!
//! An event whose target node no longer exists routes to nothing.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use understory_pick::PickSource;

use crate::types::{Dispatch, DispatchTarget, Phase, PointerEvent};

/// Deterministic responder chain router.
///
/// ## Usage
///
/// - Construct with [`Router::new`].
/// - Optionally call [`Router::set_scope`] to skip nodes that never handle
///   pointer input in the capture and bubble phases.
/// - Call [`Router::route`] for each event produced by
///   [`GestureState`](crate::gesture::GestureState).
pub struct Router<K> {
    pub(crate) scope: Option<fn(&K) -> bool>,
}

impl<K> Debug for Router<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("scoped", &self.scope.is_some())
            .finish_non_exhaustive()
    }
}

impl<K> Default for Router<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Router<K> {
    /// Create a router that visits every node on the path.
    pub fn new() -> Self {
        Self { scope: None }
    }

    /// Set an optional scope filter for the capture and bubble phases.
    ///
    /// The event target always receives its [`Target`](Phase::Target) step, and
    /// the scene is always included.
    pub fn set_scope(&mut self, scope: Option<fn(&K) -> bool>) {
        self.scope = scope;
    }
}

impl<K: Copy + Eq + Debug> Router<K> {
    /// Produce the propagation sequence for `event`.
    pub fn route<S>(&self, source: &S, event: &PointerEvent<K>) -> Vec<Dispatch<K>>
    where
        S: PickSource<Node = K> + ?Sized,
    {
        let mut path = vec![DispatchTarget::Scene];
        if let Some(target) = event.target {
            let nodes = source.path_to(target);
            if nodes.is_empty() {
                tracing::debug!(?target, kind = ?event.kind, "dropping event for stale target");
                return Vec::new();
            }
            path.extend(nodes.into_iter().map(DispatchTarget::Node));
        }
        self.emit_path(&path, event)
    }

    fn in_scope(&self, target: &DispatchTarget<K>) -> bool {
        match (target, self.scope) {
            (DispatchTarget::Node(k), Some(f)) => f(k),
            _ => true,
        }
    }

    fn emit_path(&self, path: &[DispatchTarget<K>], event: &PointerEvent<K>) -> Vec<Dispatch<K>> {
        let Some((&target, ancestors)) = path.split_last() else {
            return Vec::new();
        };
        // Crossing events stop short of the target in capture and bubble.
        let outer = if event.kind.is_crossing() {
            ancestors
        } else {
            path
        };
        let make = |phase, target| Dispatch {
            phase,
            target,
            event: *event,
        };

        let mut out = Vec::with_capacity(outer.len() * 2 + 1);
        // Capture: scene→target
        for &n in outer.iter().filter(|n| self.in_scope(n)) {
            out.push(make(Phase::Capture, n));
        }
        // Target
        out.push(make(Phase::Target, target));
        // Bubble: target→scene
        for &n in outer.iter().rev().filter(|n| self.in_scope(n)) {
            out.push(make(Phase::Bubble, n));
        }
        out
    }
}

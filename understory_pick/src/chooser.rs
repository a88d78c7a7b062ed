// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Winner selection across candidate hits.
//!
//! The resolver visits nodes topmost-first and offers every hit it finds to a
//! [`PickChooser`]. With depth testing the nearest offer wins regardless of
//! visiting order. Without it the first accepted offer wins and the chooser
//! closes, so the traversal can stop early (painter's order).

use crate::hit::{HitResult, LocalHit};

/// Accumulates the winning hit of one pick.
#[derive(Clone, Debug)]
pub struct PickChooser<K> {
    depth_test: bool,
    closed: bool,
    best: Option<HitResult<K>>,
}

impl<K: Copy> PickChooser<K> {
    /// Create a chooser. With `depth_test`, distance decides; otherwise visiting order does.
    pub fn new(depth_test: bool) -> Self {
        Self {
            depth_test,
            closed: false,
            best: None,
        }
    }

    /// Whether distance ranks candidates.
    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// Whether no further offers can be accepted.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    /// Distance of the current winner, `f64::INFINITY` when empty.
    pub fn distance(&self) -> f64 {
        self.best.map_or(f64::INFINITY, |b| b.distance)
    }

    /// Whether a hit at `distance` would beat the current winner on distance alone.
    pub fn is_closer(&self, distance: f64) -> bool {
        self.best.is_none_or(|b| distance < b.distance)
    }

    /// Offer a candidate. Returns whether it became the winner.
    pub fn offer(&mut self, node: K, hit: LocalHit) -> bool {
        if self.depth_test {
            if !self.is_closer(hit.distance) {
                return false;
            }
        } else if self.closed {
            return false;
        } else {
            self.closed = true;
        }
        self.best = Some(HitResult::from_local(node, hit));
        true
    }

    /// The winner, if any.
    pub fn result(&self) -> Option<HitResult<K>> {
        self.best
    }

    /// Consume the chooser and return the winner or `fallback`.
    pub fn into_result_or(self, fallback: HitResult<K>) -> HitResult<K> {
        self.best.unwrap_or(fallback)
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_responder --heading-base-level=0

//! Understory Responder: pointer gestures and deterministic event routing.
//!
//! ## Overview
//!
//! This crate turns raw pointer samples into the events a retained-mode toolkit
//! delivers: hover enter/exit, press, drag, release, click with multi-click
//! counts, and full press-drag-release gestures. It then builds the responder
//! chain sequence (capture → target → bubble) for each event.
//!
//! Hit testing is delegated to [`understory_pick`]: every sample is re-picked
//! through a [`PickSource`](understory_pick::PickSource), so the same machine
//! works over flat 2D scenes and 3D scenes with depth buffers.
//!
//! ## Workflow
//!
//! 1) Feed each [`PointerSample`](crate::types::PointerSample) to
//!    [`GestureState::process`](crate::gesture::GestureState::process). It returns
//!    the [`PointerEvent`](crate::types::PointerEvent)s for that sample in
//!    delivery order: exits, then enters, then the primary event.
//! 2) Route each event with [`Router::route`](crate::router::Router::route) to get a
//!    capture → target → bubble sequence over `[Scene, root, …, target]`.
//! 3) After mutating the scene, call
//!    [`GestureState::tree_changed`](crate::gesture::GestureState::tree_changed) so
//!    hover and capture follow the new structure.
//!
//! ## Pointer capture
//!
//! The node under a press receives every drag and the release of that gesture,
//! wherever the pointer goes. A click is reported only when the release lands on
//! the same node. If the captured node is removed or stops accepting input, the
//! rest of the gesture is delivered to nobody and does not click.
//!
//! ## Dispatcher sketch
//!
//! The snippet below shows how a higher‑level layer could walk the router’s sequence and honor stop/cancel rules.
//! It groups contiguous entries by phase and allows a handler to stop within a phase or stop‑and‑consume the event entirely.
//!
//! ```no_run
//! use understory_responder::types::{Dispatch, Outcome};
//!
//! /// Deliver a single dispatch item to your toolkit and return
//! /// whether to continue propagation or stop.
//! fn deliver<K>(_d: &Dispatch<K>) -> Outcome {
//!     Outcome::Continue
//! }
//!
//! /// Walk the dispatch sequence produced by the router.
//! /// Returns true if the event was consumed (e.g., default prevented).
//! fn run_dispatch<K>(seq: &[Dispatch<K>]) -> bool {
//!     let mut i = 0;
//!     while i < seq.len() {
//!         let phase = seq[i].phase;
//!         // Process contiguous entries for the same phase.
//!         while i < seq.len() && seq[i].phase == phase {
//!             match deliver(&seq[i]) {
//!                 Outcome::Continue => {}
//!                 Outcome::Stop => {
//!                     // Skip remaining entries in this phase.
//!                     while i + 1 < seq.len() && seq[i + 1].phase == phase {
//!                         i += 1;
//!                     }
//!                 }
//!                 Outcome::StopAndConsume => return true,
//!             }
//!             i += 1;
//!         }
//!     }
//!     false
//! }
//!
//! # fn _example<K>(seq: &[Dispatch<K>]) { let _ = run_dispatch(seq); }
//! ```
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use understory_pick::ShapeDescriptor;
//! use understory_pick::glam::{DAffine3, DVec3};
//! use understory_pick::kurbo::Size;
//! use understory_responder::gesture::GestureState;
//! use understory_responder::router::Router;
//! use understory_responder::types::{EventKind, PointerButton, PointerSample};
//! use understory_scene_tree::{LocalNode, Tree};
//!
//! let mut tree = Tree::new();
//! tree.set_viewport_size(Size::new(400.0, 400.0));
//! let root = tree.insert(None, LocalNode::default());
//! let button = tree.insert(
//!     Some(root),
//!     LocalNode {
//!         shape: ShapeDescriptor::cuboid(80.0, 30.0, 0.0),
//!         local_transform: DAffine3::from_translation(DVec3::new(200.0, 200.0, 0.0)),
//!         ..Default::default()
//!     },
//! );
//!
//! let mut gestures = GestureState::new();
//! let t = Duration::from_millis(16);
//! gestures.process(&tree, PointerSample::pressed((205.0, 198.0), t, PointerButton::Primary));
//! let events = gestures.process(&tree, PointerSample::released((206.0, 198.0), t * 2, PointerButton::Primary));
//!
//! let click = events.iter().find(|e| e.kind == EventKind::Clicked).unwrap();
//! assert_eq!(click.target, Some(button));
//! assert_eq!(click.click_count, Some(1));
//!
//! let steps = Router::new().route(&tree, click);
//! assert_eq!(steps.len(), 7, "scene, root and button in capture and bubble, plus the target");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
pub mod config;
pub mod gesture;
pub mod hover;
pub mod router;
pub mod types;

pub use config::{ConfigError, GestureConfig};
pub use gesture::{GesturePhase, GestureState};
pub use router::Router;

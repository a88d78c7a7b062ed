// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the responder: pointer samples, synthesized events, and dispatch steps.
//!
//! ## Overview
//!
//! A host feeds [`PointerSample`]s into the [`gesture`](crate::gesture) machine,
//! which yields [`PointerEvent`]s. The [`router`](crate::router) turns each event
//! into a capture → target → bubble sequence of [`Dispatch`] steps.

use core::time::Duration;

use glam::DVec3;
use kurbo::Point;
use understory_pick::HitResult;

/// Phases of event propagation.
///
/// Appears on each [`Dispatch`] item produced by
/// [`Router::route`](crate::router::Router::route).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Parent-to-target traversal.
    Capture,
    /// Target node.
    Target,
    /// Target-to-parent traversal.
    Bubble,
}

/// Handler outcome controlling propagation.
///
/// A higher‑level dispatcher (see crate docs) can use this as the return
/// value from per‑node handlers to decide whether to continue within a phase
/// or abort remaining phases.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Continue within the current phase.
    Continue,
    /// Stop propagation within the current phase.
    Stop,
    /// Stop and mark consumed (for higher-level policies).
    StopAndConsume,
}

/// A pointer button.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the wheel button.
    Middle,
    /// Browser-back button.
    Back,
    /// Browser-forward button.
    Forward,
}

/// What a raw pointer sample reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerKind {
    /// Moved with no button held.
    Moved,
    /// A button went down.
    Pressed,
    /// Moved with a button held.
    Dragged,
    /// A button went up.
    Released,
}

/// A raw pointer sample from the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Position in viewport coordinates.
    pub position: Point,
    /// Sample kind.
    pub kind: PointerKind,
    /// Time on a host-supplied monotonic clock.
    pub timestamp: Duration,
    /// Button involved, if any.
    pub button: Option<PointerButton>,
}

impl PointerSample {
    /// A move with no button held.
    pub fn moved(position: impl Into<Point>, timestamp: Duration) -> Self {
        Self {
            position: position.into(),
            kind: PointerKind::Moved,
            timestamp,
            button: None,
        }
    }

    /// A button press.
    pub fn pressed(position: impl Into<Point>, timestamp: Duration, button: PointerButton) -> Self {
        Self {
            position: position.into(),
            kind: PointerKind::Pressed,
            timestamp,
            button: Some(button),
        }
    }

    /// A move with `button` held.
    pub fn dragged(position: impl Into<Point>, timestamp: Duration, button: PointerButton) -> Self {
        Self {
            position: position.into(),
            kind: PointerKind::Dragged,
            timestamp,
            button: Some(button),
        }
    }

    /// A button release.
    pub fn released(
        position: impl Into<Point>,
        timestamp: Duration,
        button: PointerButton,
    ) -> Self {
        Self {
            position: position.into(),
            kind: PointerKind::Released,
            timestamp,
            button: Some(button),
        }
    }
}

/// Kinds of synthesized events.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Pointer moved over the target with no button held.
    Moved,
    /// Pointer entered the target (sent outer → inner).
    Entered,
    /// Pointer left the target (sent inner → outer).
    Exited,
    /// A button went down over the target.
    Pressed,
    /// Pointer moved with a button held; sent to the capture target.
    Dragged,
    /// A button went up; sent to the capture target.
    Released,
    /// Press and release landed on the same target.
    Clicked,
    /// Full drag: pointer is over the target.
    DragOver,
    /// Full drag: pointer entered the target.
    DragEntered,
    /// Full drag: pointer left the target.
    DragExited,
    /// Full drag: button released over the target.
    DragReleased,
}

impl EventKind {
    /// Whether this is one of the enter/exit notifications that ancestors only observe.
    pub fn is_crossing(self) -> bool {
        matches!(
            self,
            Self::Entered | Self::Exited | Self::DragEntered | Self::DragExited
        )
    }
}

/// A synthesized pointer event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent<K> {
    /// Event kind.
    pub kind: EventKind,
    /// Target node; `None` targets the scene itself.
    pub target: Option<K>,
    /// The pick result the event was resolved against.
    pub hit: HitResult<K>,
    /// Viewport position of the sample.
    pub position: Point,
    /// Position in the target's local space; NaN when the target's transforms are not invertible.
    pub local: DVec3,
    /// Button involved, if any.
    pub button: Option<PointerButton>,
    /// Click count, for press, drag, release and click events.
    pub click_count: Option<u32>,
    /// Whether the pointer stayed near its press position, for events inside a gesture.
    pub still_since_press: Option<bool>,
    /// The node that started the full drag, for full-drag events.
    pub gesture_source: Option<K>,
}

/// Where a dispatch step is delivered.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DispatchTarget<K> {
    /// The scene itself, outermost in every path.
    Scene,
    /// A node.
    Node(K),
}

/// A single dispatch item.
///
/// Produced by [`Router::route`](crate::router::Router::route), and typically fed
/// into a higher‑level dispatcher that invokes handlers in [`Capture`](Phase::Capture), then
/// [`Target`](Phase::Target), then [`Bubble`](Phase::Bubble) phases.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dispatch<K> {
    /// Propagation phase for this step.
    pub phase: Phase,
    /// Receiver of this step.
    pub target: DispatchTarget<K>,
    /// The event being delivered.
    pub event: PointerEvent<K>,
}

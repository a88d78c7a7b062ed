// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pointer gesture state machine.
//!
//! [`GestureState`] consumes raw [`PointerSample`]s, re-picks the scene for each
//! one, and produces the [`PointerEvent`]s a toolkit delivers to its nodes:
//!
//! - Hover tracking: `Entered`/`Exited` along the root→target chain. Exits go
//!   inner→outer and come before enters, which go outer→inner. All of them
//!   precede the primary event for the same sample.
//! - Press capture: the node under a press receives every `Dragged` and the
//!   `Released` of that gesture, wherever the pointer goes. While the button is
//!   held, hover is restricted to the part of the current chain shared with the
//!   pressed chain.
//! - Clicks: a release over the capture target produces `Clicked` with a
//!   multi-click count from [`ClickCounter`].
//! - Full drag: after [`GestureState::start_full_drag`], nodes under the pointer
//!   additionally receive `DragEntered`/`DragExited`/`DragOver`/`DragReleased`.
//!
//! The machine never stores borrowed scene data. After any structural change
//! the host calls [`GestureState::tree_changed`] so stale nodes are dropped and
//! hover is recomputed.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use glam::DVec3;
use kurbo::Point;
use understory_pick::resolve::hit_scene_point;
use understory_pick::{HitResult, PickSource, pick};

use crate::click::ClickCounter;
use crate::config::{ConfigError, GestureConfig};
use crate::hover::{HoverChain, HoverEvent, common_prefix_len};
use crate::types::{EventKind, PointerButton, PointerEvent, PointerKind, PointerSample};

/// Coarse gesture phase, as reported by [`GestureState::phase`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GesturePhase {
    /// No button held.
    Idle,
    /// A button is down and the pointer has not moved since.
    Pressed,
    /// A button is down and the pointer has moved.
    Dragging,
}

#[derive(Clone, Debug)]
struct Capture<K> {
    target: Option<K>,
    /// Root→target chain at press time, used to restrict hover.
    path: Vec<K>,
    /// The capture node went away; the rest of the gesture delivers nothing to it.
    lost: bool,
    origin: Point,
    still: bool,
}

#[derive(Clone, Debug)]
enum State<K> {
    Idle,
    Pressed(Capture<K>),
    Dragging(Capture<K>),
}

#[derive(Clone, Debug)]
struct FullDrag<K: Copy + Eq> {
    source: Option<K>,
    chain: HoverChain<K>,
}

/// Everything needed to build events for one pick.
struct Frame<'a, S: PickSource + ?Sized> {
    source: &'a S,
    hit: HitResult<S::Node>,
    scene_point: DVec3,
    position: Point,
    button: Option<PointerButton>,
}

impl<'a, S: PickSource + ?Sized> Frame<'a, S> {
    fn pick(source: &'a S, position: Point, button: Option<PointerButton>) -> Self {
        let hit = pick(source, position);
        Self {
            source,
            hit,
            scene_point: hit_scene_point(source, &hit),
            position,
            button,
        }
    }

    /// Path from the root to the picked node; empty over the background.
    fn chain(&self) -> Vec<S::Node> {
        self.hit
            .node
            .map(|n| self.source.path_to(n))
            .unwrap_or_default()
    }

    fn event(&self, kind: EventKind, target: Option<S::Node>) -> PointerEvent<S::Node> {
        let local = match target {
            Some(t) if self.hit.node == Some(t) => self.hit.point,
            Some(t) => self.source.scene_to_local(t, self.scene_point),
            None => self.scene_point,
        };
        PointerEvent {
            kind,
            target,
            hit: self.hit,
            position: self.position,
            local,
            button: self.button,
            click_count: None,
            still_since_press: None,
            gesture_source: None,
        }
    }
}

/// Pointer gesture state for one pointer over one scene.
#[derive(Clone, Debug)]
pub struct GestureState<K: Copy + Eq> {
    config: GestureConfig,
    state: State<K>,
    hover: HoverChain<K>,
    clicks: ClickCounter<K>,
    full_drag: Option<FullDrag<K>>,
    last_position: Option<Point>,
}

impl<K: Copy + Eq + Debug> Default for GestureState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Debug> GestureState<K> {
    /// Create an idle machine with default thresholds.
    pub fn new() -> Self {
        Self::from_valid_config(GestureConfig::default())
    }

    /// Create an idle machine with custom thresholds.
    pub fn with_config(config: GestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GestureConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            hover: HoverChain::new(),
            clicks: ClickCounter::new(config),
            full_drag: None,
            last_position: None,
        }
    }

    /// Active thresholds.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> GesturePhase {
        match self.state {
            State::Idle => GesturePhase::Idle,
            State::Pressed(_) => GesturePhase::Pressed,
            State::Dragging(_) => GesturePhase::Dragging,
        }
    }

    /// The hovered root→target chain.
    pub fn hovered_path(&self) -> &[K] {
        self.hover.current_path()
    }

    /// The capture node of the current gesture.
    ///
    /// `None` when idle, when the press landed on the background, or when the
    /// capture node was removed.
    pub fn capture_target(&self) -> Option<K> {
        match &self.state {
            State::Idle => None,
            State::Pressed(c) | State::Dragging(c) => c.target,
        }
    }

    /// Whether a full drag is in progress.
    pub fn is_full_drag(&self) -> bool {
        self.full_drag.is_some()
    }

    /// Feed one pointer sample and return the resulting events, in delivery order.
    ///
    /// Every (phase, sample kind) pair is handled:
    /// - a press during a gesture first releases the old gesture without a click;
    /// - a drag or release while idle is treated as a move.
    ///
    /// A press sample without a button counts as [`PointerButton::Primary`].
    pub fn process<S>(&mut self, source: &S, sample: PointerSample) -> Vec<PointerEvent<K>>
    where
        S: PickSource<Node = K> + ?Sized,
    {
        let frame = Frame::pick(source, sample.position, sample.button);
        tracing::trace!(
            kind = ?sample.kind,
            phase = ?self.phase(),
            target = ?frame.hit.node,
            "pointer sample"
        );
        self.last_position = Some(sample.position);
        let mut out = Vec::new();
        let idle = matches!(self.state, State::Idle);
        match sample.kind {
            PointerKind::Moved => self.on_moved(&frame, &mut out),
            PointerKind::Pressed => {
                if !idle {
                    tracing::trace!("press during an active gesture; ending the old one");
                    self.on_released(&frame, false, &mut out);
                }
                self.on_pressed(&frame, &sample, &mut out);
            }
            PointerKind::Dragged if idle => self.on_moved(&frame, &mut out),
            PointerKind::Dragged => self.on_dragged(&frame, &mut out),
            PointerKind::Released if idle => self.on_moved(&frame, &mut out),
            PointerKind::Released => self.on_released(&frame, true, &mut out),
        }
        out
    }

    /// Turn the current gesture into a full drag.
    ///
    /// `gesture_source` defaults to the capture target. Returns `false`, and does
    /// nothing, when no button is held.
    pub fn start_full_drag(&mut self, gesture_source: Option<K>) -> bool {
        let capture = match &self.state {
            State::Idle => return false,
            State::Pressed(c) | State::Dragging(c) => c.target,
        };
        self.full_drag = Some(FullDrag {
            source: gesture_source.or(capture),
            chain: HoverChain::new(),
        });
        true
    }

    /// React to a structural change in the scene.
    ///
    /// Stale nodes leave the hover and full-drag chains without events. A capture
    /// target that is stale or no longer accepts input is dropped, and the pressed
    /// chain is cut back to the ancestors that still accept input. Hover is then
    /// recomputed at the last pointer position, producing `Exited` for nodes no
    /// longer under the pointer and `Entered` for the new chain.
    pub fn tree_changed<S>(&mut self, source: &S) -> Vec<PointerEvent<K>>
    where
        S: PickSource<Node = K> + ?Sized,
    {
        let pruned = self.hover.retain_alive(|k| source.is_alive(k));
        if pruned > 0 {
            tracing::debug!(pruned, "dropped stale hover nodes");
        }
        if let Some(fd) = self.full_drag.as_mut() {
            fd.chain.retain_alive(|k| source.is_alive(k));
            if fd.source.is_some_and(|s| !source.is_alive(s)) {
                fd.source = None;
            }
        }
        if let State::Pressed(c) | State::Dragging(c) = &mut self.state {
            if let Some(t) = c.target
                && !source.accepts_input_in_chain(t)
            {
                tracing::debug!(target = ?t, "capture target no longer accepts input");
                c.target = None;
                c.lost = true;
            }
            // Ancestors that still take input keep restricting hover.
            let keep = c
                .path
                .iter()
                .take_while(|&&k| {
                    source.is_alive(k)
                        && source.is_visible_for_input(k)
                        && !source.is_input_disabled(k)
                })
                .count();
            c.path.truncate(keep);
        }

        let mut out = Vec::new();
        let Some(position) = self.last_position else {
            return out;
        };
        let frame = Frame::pick(source, position, None);
        let path = frame.chain();
        let keep = self.restricted_len(&path);
        self.update_hover(&frame, &path[..keep], &mut out);
        out
    }

    /// Silently return to idle, forgetting hover, clicks and any full drag.
    ///
    /// For when the window loses focus mid-gesture: nothing is delivered for the
    /// abandoned gesture.
    pub fn window_deactivated(&mut self) {
        tracing::trace!(phase = ?self.phase(), "window deactivated");
        self.state = State::Idle;
        self.hover.reset();
        self.clicks.reset();
        self.full_drag = None;
        self.last_position = None;
    }

    /// The pointer left the scene: exit the hover chain and the full-drag chain.
    ///
    /// A held button keeps its capture; the gesture continues if the pointer returns.
    pub fn pointer_left_scene(&mut self) -> Vec<PointerEvent<K>> {
        let position = self
            .last_position
            .take()
            .unwrap_or(Point::new(f64::NAN, f64::NAN));
        let detached = |kind, target| PointerEvent {
            kind,
            target: Some(target),
            hit: HitResult::unavailable(),
            position,
            local: DVec3::NAN,
            button: None,
            click_count: None,
            still_since_press: None,
            gesture_source: None,
        };
        let mut out: Vec<PointerEvent<K>> = self
            .hover
            .clear()
            .into_iter()
            .map(|ev| match ev {
                HoverEvent::Leave(k) | HoverEvent::Enter(k) => detached(EventKind::Exited, k),
            })
            .collect();
        if let Some(fd) = self.full_drag.as_mut() {
            for ev in fd.chain.clear() {
                if let HoverEvent::Leave(k) = ev {
                    out.push(PointerEvent {
                        gesture_source: fd.source,
                        ..detached(EventKind::DragExited, k)
                    });
                }
            }
        }
        out
    }

    /// Length of the prefix of `path` that hover may follow in the current phase.
    fn restricted_len(&self, path: &[K]) -> usize {
        match &self.state {
            State::Idle => path.len(),
            State::Pressed(c) | State::Dragging(c) => common_prefix_len(path, &c.path),
        }
    }

    fn update_hover<S>(&mut self, frame: &Frame<'_, S>, path: &[K], out: &mut Vec<PointerEvent<K>>)
    where
        S: PickSource<Node = K> + ?Sized,
    {
        for ev in self.hover.update_path(path) {
            out.push(match ev {
                HoverEvent::Leave(k) => frame.event(EventKind::Exited, Some(k)),
                HoverEvent::Enter(k) => frame.event(EventKind::Entered, Some(k)),
            });
        }
    }

    /// Diff the full-drag chain against `path` and finish with `last` at the
    /// node under the pointer. Does nothing outside a full drag.
    fn update_full_drag<S>(
        &mut self,
        frame: &Frame<'_, S>,
        path: &[K],
        last: EventKind,
        out: &mut Vec<PointerEvent<K>>,
    ) where
        S: PickSource<Node = K> + ?Sized,
    {
        let Some(fd) = self.full_drag.as_mut() else {
            return;
        };
        for ev in fd.chain.update_path(path) {
            let (kind, k) = match ev {
                HoverEvent::Leave(k) => (EventKind::DragExited, k),
                HoverEvent::Enter(k) => (EventKind::DragEntered, k),
            };
            out.push(PointerEvent {
                gesture_source: fd.source,
                ..frame.event(kind, Some(k))
            });
        }
        out.push(PointerEvent {
            gesture_source: fd.source,
            ..frame.event(last, frame.hit.node)
        });
    }

    fn on_moved<S>(&mut self, frame: &Frame<'_, S>, out: &mut Vec<PointerEvent<K>>)
    where
        S: PickSource<Node = K> + ?Sized,
    {
        let path = frame.chain();
        self.update_hover(frame, &path, out);
        out.push(frame.event(EventKind::Moved, frame.hit.node));
    }

    fn on_pressed<S>(
        &mut self,
        frame: &Frame<'_, S>,
        sample: &PointerSample,
        out: &mut Vec<PointerEvent<K>>,
    ) where
        S: PickSource<Node = K> + ?Sized,
    {
        let path = frame.chain();
        self.update_hover(frame, &path, out);

        let target = frame.hit.node;
        let button = sample.button.unwrap_or(PointerButton::Primary);
        let count = self
            .clicks
            .press(target, button, sample.position, sample.timestamp);
        self.state = State::Pressed(Capture {
            target,
            path,
            lost: false,
            origin: sample.position,
            still: true,
        });
        out.push(PointerEvent {
            button: Some(button),
            click_count: Some(count),
            still_since_press: Some(true),
            ..frame.event(EventKind::Pressed, target)
        });
    }

    fn on_dragged<S>(&mut self, frame: &Frame<'_, S>, out: &mut Vec<PointerEvent<K>>)
    where
        S: PickSource<Node = K> + ?Sized,
    {
        let mut capture = match mem::replace(&mut self.state, State::Idle) {
            State::Pressed(c) | State::Dragging(c) => c,
            State::Idle => return self.on_moved(frame, out),
        };
        let delta = frame.position - capture.origin;
        capture.still &= self.config.within_distance(delta.x, delta.y);
        self.clicks.moved(frame.position);

        let path = frame.chain();
        let keep = common_prefix_len(&path, &capture.path);
        self.update_hover(frame, &path[..keep], out);
        if self.full_drag.is_some() {
            self.update_full_drag(frame, &path, EventKind::DragOver, out);
        }
        if !capture.lost {
            out.push(PointerEvent {
                click_count: Some(self.clicks.count()),
                still_since_press: Some(capture.still),
                ..frame.event(EventKind::Dragged, capture.target)
            });
        }
        self.state = State::Dragging(capture);
    }

    fn on_released<S>(
        &mut self,
        frame: &Frame<'_, S>,
        allow_click: bool,
        out: &mut Vec<PointerEvent<K>>,
    ) where
        S: PickSource<Node = K> + ?Sized,
    {
        let capture = match mem::replace(&mut self.state, State::Idle) {
            State::Pressed(c) | State::Dragging(c) => c,
            State::Idle => return self.on_moved(frame, out),
        };

        let path = frame.chain();
        let keep = common_prefix_len(&path, &capture.path);
        self.update_hover(frame, &path[..keep], out);
        if self.full_drag.is_some() {
            self.update_full_drag(frame, &path, EventKind::DragReleased, out);
        }

        let count = self.clicks.count();
        let clicked = allow_click && !capture.lost && frame.hit.node == capture.target;
        if !capture.lost {
            out.push(PointerEvent {
                click_count: Some(count),
                still_since_press: Some(capture.still),
                ..frame.event(EventKind::Released, capture.target)
            });
        }
        if clicked {
            out.push(PointerEvent {
                click_count: Some(count),
                still_since_press: Some(capture.still),
                ..frame.event(EventKind::Clicked, capture.target)
            });
        } else {
            self.clicks.reset();
        }

        if let Some(mut fd) = self.full_drag.take() {
            for ev in fd.chain.clear() {
                if let HoverEvent::Leave(k) = ev {
                    out.push(PointerEvent {
                        gesture_source: fd.source,
                        ..frame.event(EventKind::DragExited, Some(k))
                    });
                }
            }
        }

        // Back to idle: hover follows the pointer again.
        self.update_hover(frame, &path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::time::Duration;
    use kurbo::Size;
    use understory_pick::ShapeDescriptor;
    use understory_pick::glam::DAffine3;
    use understory_scene_tree::{LocalNode, NodeFlags, NodeId, Tree};

    const B: PointerButton = PointerButton::Primary;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn square(x: f64, y: f64, size: f64) -> LocalNode {
        LocalNode {
            shape: ShapeDescriptor::cuboid(size, size, 0.0),
            local_transform: DAffine3::from_translation(DVec3::new(x, y, 0.0)),
            ..Default::default()
        }
    }

    struct Scene {
        tree: Tree,
        root: NodeId,
        outer: NodeId,
        inner: NodeId,
        other: NodeId,
    }

    // root
    // ├── outer (150..350)
    // │   └── inner (225..275)
    // └── other (75..125)
    fn scene() -> Scene {
        let mut tree = Tree::new();
        tree.set_viewport_size(Size::new(500.0, 500.0));
        let root = tree.insert(None, LocalNode::default());
        let outer = tree.insert(Some(root), square(250.0, 250.0, 200.0));
        let inner = tree.insert(Some(outer), square(0.0, 0.0, 50.0));
        let other = tree.insert(Some(root), square(100.0, 100.0, 50.0));
        let _ = tree.commit();
        Scene {
            tree,
            root,
            outer,
            inner,
            other,
        }
    }

    fn kinds(events: &[PointerEvent<NodeId>]) -> Vec<(EventKind, Option<NodeId>)> {
        events.iter().map(|e| (e.kind, e.target)).collect()
    }

    fn count_of(events: &[PointerEvent<NodeId>], kind: EventKind) -> usize {
        events.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn move_onto_node_then_background() {
        let s = scene();
        let mut g = GestureState::new();
        let ev = g.process(&s.tree, PointerSample::moved((250.0, 250.0), ms(0)));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Entered, Some(s.root)),
                (EventKind::Entered, Some(s.outer)),
                (EventKind::Entered, Some(s.inner)),
                (EventKind::Moved, Some(s.inner)),
            ]
        );
        assert!(ev[3].click_count.is_none() && ev[3].still_since_press.is_none());

        let ev = g.process(&s.tree, PointerSample::moved((10.0, 10.0), ms(10)));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(s.inner)),
                (EventKind::Exited, Some(s.outer)),
                (EventKind::Exited, Some(s.root)),
                (EventKind::Moved, None),
            ],
            "background has no chain, so nothing is entered"
        );
        assert!(ev[3].hit.is_background());
        assert!(g.hovered_path().is_empty());
    }

    #[test]
    fn press_release_clicks_once() {
        let s = scene();
        let mut g = GestureState::new();
        let ev = g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        let pressed = ev.last().unwrap();
        assert_eq!((pressed.kind, pressed.target), (EventKind::Pressed, Some(s.inner)));
        assert_eq!(pressed.click_count, Some(1));
        assert_eq!(pressed.still_since_press, Some(true));
        assert_eq!(g.phase(), GesturePhase::Pressed);
        assert_eq!(g.capture_target(), Some(s.inner));

        let ev = g.process(&s.tree, PointerSample::released((251.0, 250.0), ms(80), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Released, Some(s.inner)),
                (EventKind::Clicked, Some(s.inner)),
            ]
        );
        assert_eq!(ev[1].click_count, Some(1));
        assert_eq!(count_of(&ev, EventKind::Clicked), 1);
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn multi_click_counts_and_resets() {
        let s = scene();
        let mut g = GestureState::new();
        let p = (250.0, 250.0);
        let click = |g: &mut GestureState<NodeId>, at: u64| {
            g.process(&s.tree, PointerSample::pressed(p, ms(at), B));
            let ev = g.process(&s.tree, PointerSample::released(p, ms(at + 20), B));
            ev.iter()
                .find(|e| e.kind == EventKind::Clicked)
                .and_then(|e| e.click_count)
        };
        assert_eq!(click(&mut g, 0), Some(1));
        assert_eq!(click(&mut g, 200), Some(2));
        assert_eq!(click(&mut g, 400), Some(3));
        assert_eq!(click(&mut g, 1400), Some(1), "too slow, sequence restarts");
    }

    #[test]
    fn moving_away_between_presses_restarts_count() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        g.process(&s.tree, PointerSample::released((250.0, 250.0), ms(10), B));
        g.process(&s.tree, PointerSample::moved((262.0, 250.0), ms(20)));
        let ev = g.process(&s.tree, PointerSample::pressed((262.0, 250.0), ms(30), B));
        assert_eq!(ev.last().unwrap().click_count, Some(1));
    }

    #[test]
    fn release_off_target_does_not_click() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        let ev = g.process(&s.tree, PointerSample::dragged((320.0, 250.0), ms(10), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(s.inner)),
                (EventKind::Dragged, Some(s.inner)),
            ]
        );
        assert_eq!(ev[1].still_since_press, Some(false));
        let ev = g.process(&s.tree, PointerSample::released((320.0, 250.0), ms(20), B));
        assert_eq!(kinds(&ev), vec![(EventKind::Released, Some(s.inner))]);
        // A fresh press back on the node starts a new sequence.
        let ev = g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(30), B));
        assert_eq!(ev.last().unwrap().click_count, Some(1));
    }

    #[test]
    fn capture_is_sticky_and_hover_is_restricted() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        let ev = g.process(&s.tree, PointerSample::dragged((100.0, 100.0), ms(10), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(s.inner)),
                (EventKind::Exited, Some(s.outer)),
                (EventKind::Dragged, Some(s.inner)),
            ],
            "nodes outside the pressed chain are not entered while dragging"
        );
        assert_eq!(ev[2].hit.node, Some(s.other));
        assert_eq!(g.hovered_path(), &[s.root]);

        let ev = g.process(&s.tree, PointerSample::dragged((250.0, 250.0), ms(20), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Entered, Some(s.outer)),
                (EventKind::Entered, Some(s.inner)),
                (EventKind::Dragged, Some(s.inner)),
            ]
        );
        assert_eq!(ev[2].still_since_press, Some(false), "stillness never comes back");

        let ev = g.process(&s.tree, PointerSample::released((250.0, 250.0), ms(30), B));
        assert_eq!(count_of(&ev, EventKind::Clicked), 1);
    }

    #[test]
    fn release_over_other_node_reenters_hover() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        g.process(&s.tree, PointerSample::dragged((100.0, 100.0), ms(10), B));
        let ev = g.process(&s.tree, PointerSample::released((100.0, 100.0), ms(20), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Released, Some(s.inner)),
                (EventKind::Entered, Some(s.other)),
            ]
        );
        assert_eq!(g.hovered_path(), &[s.root, s.other]);
    }

    #[test]
    fn small_drag_stays_still() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        let ev = g.process(&s.tree, PointerSample::dragged((253.0, 247.0), ms(10), B));
        let dragged = ev.last().unwrap();
        assert_eq!(dragged.kind, EventKind::Dragged);
        assert_eq!(dragged.still_since_press, Some(true));
        assert_eq!(g.phase(), GesturePhase::Dragging);
        let ev = g.process(&s.tree, PointerSample::released((253.0, 247.0), ms(20), B));
        assert_eq!(ev[1].kind, EventKind::Clicked);
        assert_eq!(ev[1].still_since_press, Some(true));
    }

    #[test]
    fn full_drag_events() {
        let s = scene();
        let mut g = GestureState::new();
        assert!(!g.start_full_drag(None), "no gesture to promote while idle");
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        assert!(g.start_full_drag(None));
        assert!(g.is_full_drag());

        let ev = g.process(&s.tree, PointerSample::dragged((100.0, 100.0), ms(10), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(s.inner)),
                (EventKind::Exited, Some(s.outer)),
                (EventKind::DragEntered, Some(s.root)),
                (EventKind::DragEntered, Some(s.other)),
                (EventKind::DragOver, Some(s.other)),
                (EventKind::Dragged, Some(s.inner)),
            ]
        );
        for e in &ev[2..5] {
            assert_eq!(e.gesture_source, Some(s.inner), "source defaults to the capture");
        }

        let ev = g.process(&s.tree, PointerSample::released((100.0, 100.0), ms(20), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::DragReleased, Some(s.other)),
                (EventKind::Released, Some(s.inner)),
                (EventKind::DragExited, Some(s.other)),
                (EventKind::DragExited, Some(s.root)),
                (EventKind::Entered, Some(s.other)),
            ]
        );
        assert!(!g.is_full_drag());
    }

    #[test]
    fn removal_prunes_hover_silently() {
        let mut s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::moved((250.0, 250.0), ms(0)));
        s.tree.remove(s.inner);
        assert!(s.tree.commit());
        let ev = g.tree_changed(&s.tree);
        assert!(ev.is_empty(), "outer is still under the pointer: {ev:?}");
        assert_eq!(g.hovered_path(), &[s.root, s.outer]);
    }

    #[test]
    fn hiding_hover_target_exits_and_enters_below() {
        let mut s = scene();
        let top = s.tree.insert(Some(s.root), square(100.0, 100.0, 50.0));
        let _ = s.tree.commit();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::moved((100.0, 100.0), ms(0)));
        assert_eq!(g.hovered_path(), &[s.root, top]);

        s.tree.set_flags(top, NodeFlags::PICKABLE | NodeFlags::ENABLED);
        let _ = s.tree.commit();
        let ev = g.tree_changed(&s.tree);
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(top)),
                (EventKind::Entered, Some(s.other)),
            ]
        );
    }

    #[test]
    fn removed_capture_gets_nothing() {
        let mut s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        s.tree.remove(s.inner);
        let _ = s.tree.commit();
        let ev = g.tree_changed(&s.tree);
        assert!(ev.is_empty(), "ancestors are still under the pointer: {ev:?}");
        assert_eq!(g.capture_target(), None);
        assert_eq!(g.hovered_path(), &[s.root, s.outer]);
        let ev = g.process(&s.tree, PointerSample::dragged((252.0, 250.0), ms(10), B));
        assert!(ev.is_empty(), "nothing to deliver: {ev:?}");
        let ev = g.process(&s.tree, PointerSample::released((252.0, 250.0), ms(20), B));
        assert_eq!(count_of(&ev, EventKind::Released), 0);
        assert_eq!(count_of(&ev, EventKind::Clicked), 0);
        assert_eq!(count_of(&ev, EventKind::Entered), 0);
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert_eq!(g.hovered_path(), &[s.root, s.outer]);
    }

    #[test]
    fn disabled_capture_only_exits_itself() {
        let mut s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        s.tree.set_flags(s.inner, NodeFlags::VISIBLE | NodeFlags::PICKABLE);
        let _ = s.tree.commit();
        let ev = g.tree_changed(&s.tree);
        assert_eq!(kinds(&ev), vec![(EventKind::Exited, Some(s.inner))]);
        assert_eq!(g.capture_target(), None);

        // Hover stays restricted to the surviving part of the pressed chain.
        let ev = g.process(&s.tree, PointerSample::dragged((100.0, 100.0), ms(10), B));
        assert_eq!(kinds(&ev), vec![(EventKind::Exited, Some(s.outer))]);
        let ev = g.process(&s.tree, PointerSample::released((100.0, 100.0), ms(20), B));
        assert_eq!(kinds(&ev), vec![(EventKind::Entered, Some(s.other))]);
    }

    #[test]
    fn tree_change_while_pressed_keeps_hover_restricted() {
        let mut s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        let cover = s.tree.insert(Some(s.root), square(250.0, 250.0, 100.0));
        let _ = s.tree.commit();

        let ev = g.tree_changed(&s.tree);
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(s.inner)),
                (EventKind::Exited, Some(s.outer)),
            ]
        );
        assert_eq!(g.hovered_path(), &[s.root]);
        assert_eq!(g.capture_target(), Some(s.inner));

        let ev = g.process(&s.tree, PointerSample::released((250.0, 250.0), ms(10), B));
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Released, Some(s.inner)),
                (EventKind::Entered, Some(cover)),
            ]
        );
    }

    #[test]
    fn removal_prunes_full_drag_chain() {
        let mut s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        assert!(g.start_full_drag(None));
        let ev = g.process(&s.tree, PointerSample::dragged((100.0, 100.0), ms(10), B));
        assert_eq!(count_of(&ev, EventKind::DragEntered), 2);

        s.tree.remove(s.other);
        let _ = s.tree.commit();
        let mut ev = g.tree_changed(&s.tree);
        assert_eq!(kinds(&ev), vec![(EventKind::Exited, Some(s.root))]);

        ev.extend(g.process(&s.tree, PointerSample::dragged((101.0, 100.0), ms(20), B)));
        ev.extend(g.process(&s.tree, PointerSample::released((101.0, 100.0), ms(30), B)));
        assert!(
            ev.iter().all(|e| e.target != Some(s.other)),
            "removed node gets no drag events: {ev:?}"
        );
        assert_eq!(
            kinds(&ev)
                .into_iter()
                .filter(|(k, _)| *k == EventKind::DragExited)
                .collect::<Vec<_>>(),
            vec![(EventKind::DragExited, Some(s.root))]
        );
        assert!(!g.is_full_drag());
    }

    #[test]
    fn window_deactivation_resets_silently() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        g.window_deactivated();
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert!(g.hovered_path().is_empty());
        // The orphaned release behaves like a move.
        let ev = g.process(&s.tree, PointerSample::released((250.0, 250.0), ms(10), B));
        assert_eq!(count_of(&ev, EventKind::Released), 0);
        assert_eq!(count_of(&ev, EventKind::Clicked), 0);
        assert_eq!(count_of(&ev, EventKind::Entered), 3);
        assert_eq!(ev.last().unwrap().kind, EventKind::Moved);
    }

    #[test]
    fn press_during_press_ends_old_gesture() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::pressed((250.0, 250.0), ms(0), B));
        let ev = g.process(
            &s.tree,
            PointerSample::pressed((250.0, 250.0), ms(10), PointerButton::Secondary),
        );
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Released, Some(s.inner)),
                (EventKind::Pressed, Some(s.inner)),
            ]
        );
        assert_eq!(ev[1].button, Some(PointerButton::Secondary));
        assert_eq!(ev[1].click_count, Some(1));
    }

    #[test]
    fn pointer_leaving_scene_exits_chain() {
        let s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::moved((250.0, 250.0), ms(0)));
        let ev = g.pointer_left_scene();
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(s.inner)),
                (EventKind::Exited, Some(s.outer)),
                (EventKind::Exited, Some(s.root)),
            ]
        );
        assert!(g.tree_changed(&s.tree).is_empty(), "no position to re-pick at");
    }

    #[test]
    fn local_coordinates() {
        let mut s = scene();
        let mut g = GestureState::new();
        let ev = g.process(&s.tree, PointerSample::moved((260.0, 240.0), ms(0)));
        let moved = ev.last().unwrap();
        assert!((moved.local.x - 10.0).abs() < 1e-9);
        assert!((moved.local.y + 10.0).abs() < 1e-9);
        let outer_entered = &ev[1];
        assert_eq!(outer_entered.target, Some(s.outer));
        assert!(
            (outer_entered.local.x - 10.0).abs() < 1e-9,
            "inner sits at the origin of outer"
        );

        // A collapsed ancestor makes the captured node's space unreachable.
        g.process(&s.tree, PointerSample::pressed((260.0, 240.0), ms(10), B));
        s.tree
            .set_local_transform(s.outer, DAffine3::from_scale(DVec3::new(1.0, 1.0, 0.0)));
        let ev = g.process(&s.tree, PointerSample::dragged((262.0, 240.0), ms(20), B));
        let dragged = ev.last().unwrap();
        assert_eq!(dragged.target, Some(s.inner));
        assert!(dragged.local.x.is_nan() && dragged.local.y.is_nan());
    }

    #[test]
    fn hover_exits_under_collapsed_ancestor_have_nan_local() {
        let mut s = scene();
        let mut g = GestureState::new();
        g.process(&s.tree, PointerSample::moved((260.0, 240.0), ms(0)));
        s.tree
            .set_local_transform(s.outer, DAffine3::from_scale(DVec3::new(1.0, 1.0, 0.0)));
        let _ = s.tree.commit();

        let ev = g.tree_changed(&s.tree);
        assert_eq!(
            kinds(&ev),
            vec![
                (EventKind::Exited, Some(s.inner)),
                (EventKind::Exited, Some(s.outer)),
                (EventKind::Exited, Some(s.root)),
            ]
        );
        for e in &ev[..2] {
            assert!(e.local.x.is_nan() && e.local.y.is_nan(), "{e:?}");
        }
        assert!(ev[2].local.is_finite(), "root keeps an identity transform");
    }

    #[test]
    fn rejects_invalid_config() {
        let bad = GestureConfig {
            multi_click_max_x: f64::INFINITY,
            ..GestureConfig::default()
        };
        assert!(GestureState::<NodeId>::with_config(bad).is_err());
        let ok = GestureState::<NodeId>::with_config(GestureConfig {
            multi_click_time: ms(250),
            ..GestureConfig::default()
        });
        assert_eq!(ok.unwrap().config().multi_click_time, ms(250));
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gestures over a scene tree, routed through the responder chain.
//!
//! A scripted pointer hovers a toolbar, double-clicks a button, then starts a
//! full drag from the button onto a drop zone. Every event is printed with its
//! routing sequence. Gesture transitions are logged at TRACE.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_events`

use std::collections::HashMap;
use std::time::Duration;

use understory_pick::ShapeDescriptor;
use understory_pick::glam::{DAffine3, DVec3};
use understory_pick::kurbo::Size;
use understory_responder::types::{
    DispatchTarget, EventKind, Phase, PointerButton, PointerEvent, PointerSample,
};
use understory_responder::{GestureState, Router};
use understory_scene_tree::{LocalNode, NodeId, Tree};

fn rect(x: f64, y: f64, w: f64, h: f64) -> LocalNode {
    LocalNode {
        shape: ShapeDescriptor::cuboid(w, h, 0.0),
        local_transform: DAffine3::from_translation(DVec3::new(x, y, 0.0)),
        ..Default::default()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut tree = Tree::new();
    tree.set_viewport_size(Size::new(400.0, 300.0));
    let root = tree.insert(None, LocalNode::default());
    let toolbar = tree.insert(Some(root), rect(200.0, 40.0, 380.0, 60.0));
    let button = tree.insert(Some(toolbar), rect(-120.0, 0.0, 80.0, 40.0));
    let drop_zone = tree.insert(Some(root), rect(200.0, 200.0, 200.0, 120.0));
    let _ = tree.commit();

    let names: HashMap<NodeId, &str> = [
        (root, "root"),
        (toolbar, "toolbar"),
        (button, "button"),
        (drop_zone, "drop-zone"),
    ]
    .into_iter()
    .collect();
    let label = |t: Option<NodeId>| t.and_then(|n| names.get(&n).copied()).unwrap_or("scene");

    let mut gestures = GestureState::new();
    let router = Router::new();
    let mut now = Duration::ZERO;
    let mut tick = || {
        now += Duration::from_millis(40);
        now
    };

    let primary = PointerButton::Primary;
    let script = [
        PointerSample::moved((20.0, 150.0), tick()),
        PointerSample::moved((80.0, 40.0), tick()),
        PointerSample::pressed((80.0, 40.0), tick(), primary),
        PointerSample::released((81.0, 40.0), tick(), primary),
        PointerSample::pressed((81.0, 41.0), tick(), primary),
        PointerSample::released((81.0, 41.0), tick(), primary),
        PointerSample::pressed((80.0, 40.0), tick(), primary),
        PointerSample::dragged((90.0, 60.0), tick(), primary),
    ];

    let print = |tree: &Tree, events: &[PointerEvent<NodeId>]| {
        for ev in events {
            print!("  {:<12} -> {:<9}", format!("{:?}", ev.kind), label(ev.target));
            if let Some(n) = ev.click_count {
                print!(" clicks={n}");
            }
            if let Some(src) = ev.gesture_source {
                print!(" source={}", label(Some(src)));
            }
            if ev.kind == EventKind::Clicked {
                let chain: Vec<String> = router
                    .route(tree, ev)
                    .iter()
                    .filter(|d| d.phase != Phase::Target)
                    .map(|d| match d.target {
                        DispatchTarget::Scene => "scene".to_string(),
                        DispatchTarget::Node(n) => label(Some(n)).to_string(),
                    })
                    .collect();
                print!(" route=[{}]", chain.join(" "));
            }
            println!();
        }
    };

    for sample in script {
        println!("{:?} at ({}, {})", sample.kind, sample.position.x, sample.position.y);
        print(&tree, &gestures.process(&tree, sample));
    }

    // The button decided this is a drag-and-drop gesture.
    gestures.start_full_drag(Some(button));
    for sample in [
        PointerSample::dragged((150.0, 180.0), tick(), primary),
        PointerSample::dragged((200.0, 200.0), tick(), primary),
        PointerSample::released((200.0, 200.0), tick(), primary),
    ] {
        println!("{:?} at ({}, {})", sample.kind, sample.position.x, sample.position.y);
        print(&tree, &gestures.process(&tree, sample));
    }

    // The removed node leaves hover silently; the root exits because nothing is under the pointer.
    tree.remove(drop_zone);
    if tree.commit() {
        println!("tree changed");
        print(&tree, &gestures.tree_changed(&tree));
    }
}

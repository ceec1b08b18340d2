// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reflow animations and the settling phase.
//!
//! With animations enabled, every item displaced by a swap slides from its old
//! position to its new one. While an item is sliding it cannot be swapped with,
//! and a release during a slide waits for the slide to finish before reporting.
//!
//! Run:
//! - `cargo run -p understory_sortable_demos --example sortable_animated`

use std::time::Duration;

use kurbo::Vec2;
use understory_sortable::doc::{Document, Element, ElementId};
use understory_sortable::easing::Easing;
use understory_sortable::gesture::Gesture;
use understory_sortable::{AnimationTiming, DragState, OrderChange, Sortable, SortableConfig};

const FRAME: Duration = Duration::from_millis(16);

fn print_rows(doc: &Document, rows: &[ElementId]) {
    let ys: Vec<String> = rows
        .iter()
        .map(|r| format!("{:.1}", doc.element_rect(*r).y0))
        .collect();
    println!("  y: [{}]", ys.join(", "));
}

fn main() {
    let timing: AnimationTiming = AnimationTiming::new(
        Duration::from_millis(200),
        "cubic-bezier(0.2, 0, 0, 1)".parse().unwrap_or(Easing::EaseOut),
    );
    println!("timing: {:?} {}", timing.duration, timing.easing);

    let mut doc = Document::new();
    let list = doc.append(doc.root_id(), Element::new("ul").size(200.0, 120.0));
    let rows: Vec<_> = (0..3)
        .map(|_| doc.append(list, Element::new("li").size(200.0, 40.0)))
        .collect();

    let mut sortable = Sortable::new(SortableConfig::default().with_animation(timing));
    sortable.on_gesture(&mut doc, Gesture::Start { target: rows[0] });

    println!("== Swap: row 1 slides up ==");
    sortable.on_gesture(
        &mut doc,
        Gesture::Move {
            delta: Vec2::new(0.0, 45.0),
        },
    );
    print_rows(&doc, &rows);
    assert!(sortable.is_animating(&rows[1]));

    println!("== Release mid-slide ==");
    sortable.on_gesture(&mut doc, Gesture::End);
    assert_eq!(sortable.state(), DragState::Settling);
    assert!(doc.order_changes().is_empty());

    let mut frames = 0;
    while sortable.state() == DragState::Settling {
        frames += 1;
        for ticket in doc.tick(FRAME) {
            if let Some(change) = sortable.animation_finished(&mut doc, ticket) {
                println!("  committed after {} frames: {:?}", frames, change);
            }
        }
        print_rows(&doc, &rows);
    }
    assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
}

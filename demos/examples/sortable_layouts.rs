// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles, horizontal rows and external host containers.
//!
//! - A handle selector restricts where a drag may begin.
//! - A horizontal orientation ignores vertical pointer movement.
//! - An external host scopes the engine to one container of a larger document.
//!
//! Run:
//! - `cargo run -p understory_sortable_demos --example sortable_layouts`

use kurbo::Vec2;
use understory_sortable::doc::{Document, Element};
use understory_sortable::gesture::Gesture;
use understory_sortable::{Handled, Orientation, OrderChange, Sortable, SortableConfig};

fn main() {
    let mut doc = Document::new();
    let root = doc.root_id();
    let toolbar = doc.append(root, Element::new("nav").size(300.0, 40.0).row());
    let board = doc.append(root, Element::new("div").size(300.0, 60.0).row());
    let cards: Vec<_> = ["todo", "doing", "done"]
        .iter()
        .map(|name| {
            let card = doc.append(
                board,
                Element::new("section").class("card").class(name).size(100.0, 60.0),
            );
            doc.append(card, Element::new("span").class("grip").size(100.0, 10.0));
            doc.append(card, Element::new("p").size(100.0, 50.0));
            card
        })
        .collect();
    let tool = doc.append(toolbar, Element::new("section").class("card").size(50.0, 40.0));
    let tool_grip = doc.append(tool, Element::new("span").class("grip").size(50.0, 10.0));

    let config = SortableConfig::default()
        .with_item_selector(".card")
        .with_handle_selector(".grip")
        .with_orientation("horizontal".parse().unwrap_or(Orientation::Horizontal))
        .with_external_host(board);
    let mut sortable = Sortable::new(config);

    println!("== Press on a card body (not the grip) ==");
    let body = doc.children(cards[2])[1];
    let handled = sortable.on_gesture(&mut doc, Gesture::Start { target: body });
    println!("  {:?}", handled);
    assert_eq!(handled, Handled::Ignored);

    println!("== Press on a card outside the board ==");
    let handled = sortable.on_gesture(&mut doc, Gesture::Start { target: tool_grip });
    println!("  {:?}", handled);
    assert_eq!(handled, Handled::Ignored);

    println!("== Drag 'done' by its grip to the front ==");
    let grip = doc.children(cards[2])[0];
    assert_eq!(
        sortable.on_gesture(&mut doc, Gesture::Start { target: grip }),
        Handled::Consumed
    );
    sortable.on_gesture(
        &mut doc,
        Gesture::Move {
            delta: Vec2::new(-190.0, 120.0),
        },
    );
    if let Some(session) = sortable.session() {
        println!("  clone translation: {:?}", session.translation());
    }
    sortable.on_gesture(&mut doc, Gesture::End);
    println!("  {:?}", doc.order_changes());
    assert_eq!(doc.order_changes(), &[OrderChange::new(2, 0)]);
    assert_eq!(doc.children(board), &[cards[2], cards[0], cards[1]]);
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reorder a list with pointer events and keep the data in sync.
//!
//! A data owner holds a `Vec` of names and renders one `li` per name. The engine
//! reports each completed drag; the owner applies it, tells the engine its items
//! changed, and re-renders.
//!
//! Run:
//! - `cargo run -p understory_sortable_demos --example sortable_basics`

use kurbo::Point;
use understory_sortable::doc::{Document, Element, ElementId};
use understory_sortable::gesture::PointerEvent;
use understory_sortable::{Sortable, SortableConfig};

const ROW: f64 = 40.0;

struct Owner {
    names: Vec<&'static str>,
    rows: Vec<ElementId>,
    list: ElementId,
}

impl Owner {
    fn mount(doc: &mut Document, names: Vec<&'static str>) -> Self {
        let list = doc.append(
            doc.root_id(),
            Element::new("ul").size(240.0, ROW * names.len() as f64),
        );
        let rows = names
            .iter()
            .map(|_| doc.append(list, Element::new("li").size(240.0, ROW)))
            .collect();
        Self { names, rows, list }
    }

    /// Apply pending order changes, then re-render rows in data order.
    fn sync(&mut self, doc: &mut Document, sortable: &mut Sortable<ElementId>) {
        let changes = doc.take_order_changes();
        if changes.is_empty() {
            return;
        }
        for change in changes {
            println!("  order change: {:?}", change);
            change.apply(&mut self.names);
            change.apply(&mut self.rows);
        }
        sortable.items_changed(doc);
        doc.replace_children(self.list, &self.rows);
    }

    fn print(&self, doc: &Document) {
        for (name, row) in self.names.iter().zip(doc.children(self.list)) {
            println!("  {:>6} @ y={}", name, doc.element_rect(*row).y0);
        }
    }
}

fn drag(
    doc: &mut Document,
    sortable: &mut Sortable<ElementId>,
    target: ElementId,
    from: Point,
    to: Point,
) {
    sortable.on_pointer(doc, PointerEvent::down(target, from));
    let steps = 8;
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        sortable.on_pointer(doc, PointerEvent::moved(target, from.lerp(to, t)));
    }
    sortable.on_pointer(doc, PointerEvent::up(target, to));
}

fn main() {
    let mut doc = Document::new();
    let mut owner = Owner::mount(&mut doc, vec!["ada", "grace", "linus", "barbara"]);
    let mut sortable = Sortable::new(SortableConfig::default());
    sortable.connect(&mut doc);

    println!("== Initial ==");
    owner.print(&doc);

    println!("== Drag 'ada' below 'grace' ==");
    let first = owner.rows[0];
    drag(
        &mut doc,
        &mut sortable,
        first,
        Point::new(100.0, 20.0),
        Point::new(100.0, 65.0),
    );
    owner.sync(&mut doc, &mut sortable);
    owner.print(&doc);
    assert_eq!(owner.names, ["grace", "ada", "linus", "barbara"]);

    println!("== Drag 'barbara' to the top ==");
    let last = owner.rows[3];
    drag(
        &mut doc,
        &mut sortable,
        last,
        Point::new(100.0, 140.0),
        Point::new(100.0, 25.0),
    );
    owner.sync(&mut doc, &mut sortable);
    owner.print(&doc);
    assert_eq!(owner.names, ["barbara", "grace", "ada", "linus"]);

    println!("== Click without dragging ==");
    drag(
        &mut doc,
        &mut sortable,
        owner.rows[1],
        Point::new(100.0, 60.0),
        Point::new(101.0, 61.0),
    );
    owner.sync(&mut doc, &mut sortable);
    assert_eq!(owner.names, ["barbara", "grace", "ada", "linus"]);
    println!("  no change");
}

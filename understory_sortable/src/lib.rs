// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sortable --heading-base-level=0

//! Understory Sortable: a headless drag-to-reorder engine.
//!
//! Users reorder sibling items (list rows, table rows, cards) by dragging one of them.
//! The engine tracks the gesture, moves a clone of the dragged item with the pointer,
//! swaps the item into place as the clone passes over its neighbors, optionally
//! animates the displaced neighbors, and finally reports a single
//! `(source_index, target_index)` pair to whoever owns the data.
//!
//! The engine never owns application data and never decides the final order. It works
//! against a document through the [`SortableHost`] trait; an in-memory implementation,
//! [`doc::Document`], is included for tests, demos and headless use.
//!
//! ## Pieces
//!
//! - [`gesture`]: raw pointer events to `Start` / `Move` / `End` gestures.
//! - [`sortable`]: the drag state machine (`Idle`, `Dragging`, `Settling`).
//! - [`geometry`]: center-point hit testing.
//! - [`reflow`]: FLIP-style reflow bookkeeping, with [`easing`] curves for hosts that
//!   render animations themselves.
//! - [`report`]: the [`OrderChange`] notification and a helper to apply it to data.
//! - [`config`]: per-instance options.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_sortable::doc::{Document, Element};
//! use understory_sortable::gesture::PointerEvent;
//! use understory_sortable::{OrderChange, Sortable, SortableConfig};
//!
//! let mut doc = Document::new();
//! let list = doc.append(doc.root_id(), Element::new("ul").size(200.0, 120.0));
//! let rows: Vec<_> = (0..3)
//!     .map(|_| doc.append(list, Element::new("li").size(200.0, 40.0)))
//!     .collect();
//! let mut names = vec!["ada", "grace", "linus"];
//!
//! let mut sortable = Sortable::new(SortableConfig::default());
//! sortable.connect(&mut doc);
//!
//! // Press on the first row and drag it down past the middle of the second.
//! sortable.on_pointer(&mut doc, PointerEvent::down(rows[0], Point::new(100.0, 20.0)));
//! for y in [30.0, 65.0] {
//!     sortable.on_pointer(&mut doc, PointerEvent::moved(rows[0], Point::new(100.0, y)));
//! }
//! sortable.on_pointer(&mut doc, PointerEvent::up(rows[0], Point::new(100.0, 65.0)));
//!
//! // The data owner applies the reported change and re-renders.
//! for change in doc.take_order_changes() {
//!     assert_eq!(change, OrderChange::new(0, 1));
//!     change.apply(&mut names);
//! }
//! sortable.items_changed(&mut doc);
//! assert_eq!(names, ["grace", "ada", "linus"]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` targets.
//! - `tracing`: log session lifecycle events (start, swaps, settle, commit, rollback)
//!   through the `tracing` crate.
//! - `serde`: `Serialize`/`Deserialize` for configuration values and [`OrderChange`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod doc;
pub mod easing;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod reflow;
pub mod report;
pub mod session;
pub mod sortable;

mod trace;

pub use config::{AnimationTiming, Orientation, SortableConfig};
pub use host::SortableHost;
pub use report::OrderChange;
pub use session::DragState;
pub use sortable::{Handled, Sortable};

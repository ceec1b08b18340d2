// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Order-change reporting.
//!
//! A committed drag produces exactly one [`OrderChange`], delivered through
//! [`SortableHost::emit_order_change`](crate::host::SortableHost::emit_order_change).
//! The engine never touches application data; the owner applies the change to its
//! backing collection, typically with [`OrderChange::apply`], and re-renders.
//!
//! ```
//! use understory_sortable::report::OrderChange;
//!
//! let mut users = vec!["ada", "grace", "linus", "barbara"];
//! // The last row was dragged to the top.
//! let change = OrderChange::new(3, 0);
//! assert!(change.apply(&mut users));
//! assert_eq!(users, ["barbara", "ada", "grace", "linus"]);
//! ```

/// Indices describing a completed reorder.
///
/// `source_index` is the dragged item's position in the candidate set snapshotted when
/// the drag started; `target_index` is its position in document order when the drag
/// ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OrderChange {
    /// Position before the drag.
    pub source_index: usize,
    /// Position after the drag.
    pub target_index: usize,
}

impl OrderChange {
    /// Create an order change.
    pub const fn new(source_index: usize, target_index: usize) -> Self {
        Self {
            source_index,
            target_index,
        }
    }

    /// Locate `node` in the order before and after a drag.
    ///
    /// Returns `None` if `node` is missing from either sequence.
    pub fn between<N: PartialEq>(before: &[N], after: &[N], node: &N) -> Option<Self> {
        let source_index = before.iter().position(|n| n == node)?;
        let target_index = after.iter().position(|n| n == node)?;
        Some(Self::new(source_index, target_index))
    }

    /// Whether the item ended where it started.
    pub const fn is_noop(&self) -> bool {
        self.source_index == self.target_index
    }

    /// Move the element at `source_index` to `target_index`, shifting the elements in
    /// between by one.
    ///
    /// Returns `false` and leaves `items` untouched if either index is out of bounds.
    pub fn apply<T>(&self, items: &mut [T]) -> bool {
        let (from, to) = (self.source_index, self.target_index);
        if from >= items.len() || to >= items.len() {
            return false;
        }
        if from < to {
            items[from..=to].rotate_left(1);
        } else if to < from {
            items[to..=from].rotate_right(1);
        }
        true
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host capability: document operations the engine needs.
//!
//! ## Overview
//!
//! The engine does not own a document. A toolkit (a DOM binding, a retained widget tree,
//! or the in-memory [`Document`](crate::doc::Document)) implements [`SortableHost`] and
//! passes itself to each [`Sortable`](crate::sortable::Sortable) call. Nodes are opaque,
//! cheaply cloneable handles compared by identity.
//!
//! ## Coordinates
//!
//! - [`SortableHost::bounding_rect`] is in viewport space and includes any transform
//!   currently applied to the node (including the clone's translation).
//! - [`SortableHost::offset`] is the node's layout position relative to its parent,
//!   ignoring transforms. It positions the clone and measures reflow displacement.
//!
//! ## Stale references
//!
//! Between gestures the host may re-render. Implementations should treat operations on
//! nodes that no longer exist as no-ops, and a reference sibling that is no longer a
//! child of the node's parent as "append".

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use kurbo::{Point, Rect, Vec2};

use crate::config::AnimationTiming;
use crate::reflow::AnimationTicket;
use crate::report::OrderChange;

/// Document operations used by the drag-reorder engine.
pub trait SortableHost {
    /// Handle to an element.
    type Node: Clone + Eq + Debug;

    /// The container the engine is attached to, used unless
    /// [`SortableConfig::external_host`](crate::config::SortableConfig::external_host) is set.
    fn root(&self) -> Self::Node;

    /// The nearest inclusive ancestor of `node` matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// All descendants of `root` matching `selector`, in document order.
    fn query_all(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// The next element sibling of `node`.
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Position of `a` relative to `b` in document order.
    ///
    /// [`Ordering::Less`] means `a` precedes `b`.
    fn document_order(&self, a: &Self::Node, b: &Self::Node) -> Ordering;

    /// Move `node` within its parent so it sits immediately before `reference`, or last
    /// when `reference` is `None`.
    fn insert_before(&mut self, node: &Self::Node, reference: Option<&Self::Node>);

    /// Viewport-space bounding rectangle, including transforms.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Layout offset relative to the parent, excluding transforms.
    fn offset(&self, node: &Self::Node) -> Point;

    /// Current viewport scroll position.
    ///
    /// The engine compensates clone movement for scrolling that happens mid-drag.
    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Deep-clone `node`, position the copy absolutely at `at` (parent space), add
    /// `class`, and append it as the last child of `node`'s parent.
    fn create_clone(&mut self, node: &Self::Node, at: Point, class: &str) -> Self::Node;

    /// Detach `node` and its subtree. Used to discard the clone.
    fn remove(&mut self, node: &Self::Node);

    /// Set the translation transform of `node`. Used to move the clone.
    fn translate(&mut self, node: &Self::Node, by: Vec2);

    /// Add a marker class.
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Remove a marker class.
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Attach (`true`) or detach (`false`) the pointer listeners feeding the engine.
    fn set_listening(&mut self, listening: bool) {
        let _ = listening;
    }

    /// Play a reflow: translate `node` by `from`, then transition to no transform.
    ///
    /// Report completion with
    /// [`Sortable::animation_finished`](crate::sortable::Sortable::animation_finished)
    /// and the given `ticket`. Return `false` if the host cannot animate; the swap then
    /// stands without a transition. The default cannot animate.
    fn play_reflow(
        &mut self,
        node: &Self::Node,
        from: Vec2,
        timing: &AnimationTiming,
        ticket: AnimationTicket,
    ) -> bool {
        let _ = (node, from, timing, ticket);
        false
    }

    /// Deliver a committed order change to the data owner.
    ///
    /// The notification must reach ancestors that manage the underlying collection,
    /// regardless of nesting.
    fn emit_order_change(&mut self, change: OrderChange);
}

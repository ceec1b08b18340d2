// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session state.
//!
//! A [`DragSession`] exists from a successful drag start until the drag commits or rolls
//! back. It is owned by [`Sortable`](crate::sortable::Sortable) and exposed read-only.

use alloc::vec::Vec;

use kurbo::Vec2;

use crate::config::Axes;
use crate::report::OrderChange;

/// Observable state of the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    /// No session.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging,
    /// The pointer was released with a pending reorder; waiting for reflow animations.
    Settling,
}

/// Phase of a live session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Following the pointer.
    Dragging,
    /// Released; `change` is emitted when the last live animation finishes.
    Settling {
        /// The reorder to report.
        change: OrderChange,
    },
}

/// One in-progress drag.
#[derive(Clone, Debug)]
pub struct DragSession<N> {
    pub(crate) source: N,
    pub(crate) clone: N,
    pub(crate) candidates: Vec<N>,
    pub(crate) origin: Option<N>,
    pub(crate) container: N,
    pub(crate) axes: Axes,
    pub(crate) scroll_origin: Vec2,
    pub(crate) translation: Vec2,
    pub(crate) swaps: usize,
    pub(crate) phase: SessionPhase,
}

impl<N> DragSession<N> {
    /// The item being dragged.
    pub fn source(&self) -> &N {
        &self.source
    }

    /// The visual copy following the pointer.
    pub fn clone_node(&self) -> &N {
        &self.clone
    }

    /// Items matching the item selector when the drag started, in document order.
    pub fn candidates(&self) -> &[N] {
        &self.candidates
    }

    /// The sibling that followed the source when the drag started; `None` if it was last.
    pub fn origin_sibling(&self) -> Option<&N> {
        self.origin.as_ref()
    }

    /// Container whose items are being reordered.
    pub fn container(&self) -> &N {
        &self.container
    }

    /// Axes the clone may move along.
    pub fn axes(&self) -> Axes {
        self.axes
    }

    /// Current clone translation.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Number of swaps performed so far.
    pub fn swaps(&self) -> usize {
        self.swaps
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The projection of [`DragSession::phase`] onto [`DragState`].
    pub fn state(&self) -> DragState {
        match self.phase {
            SessionPhase::Dragging => DragState::Dragging,
            SessionPhase::Settling { .. } => DragState::Settling,
        }
    }

    pub(crate) fn restore_point(&self) -> RestorePoint<N>
    where
        N: Clone,
    {
        RestorePoint {
            source: self.source.clone(),
            origin: self.origin.clone(),
        }
    }
}

/// Where a committed source item came from.
///
/// Kept after a commit until the data owner pushes new items, so the document can be put
/// back into its pre-drag order before the owner re-renders from reordered data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestorePoint<N> {
    /// The item that was dragged.
    pub source: N,
    /// Its next sibling before the drag; `None` if it was last.
    pub origin: Option<N>,
}

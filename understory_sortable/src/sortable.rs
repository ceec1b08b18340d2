// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag state machine.
//!
//! ## Overview
//!
//! [`Sortable`] owns at most one [`DragSession`] and moves between three states:
//!
//! - `Idle → Dragging` when a drag starts on an item (and on its handle, if configured).
//!   The engine snapshots the candidate items, remembers the source's next sibling,
//!   asks the host for a clone that follows the pointer, and marks the source.
//! - `Dragging` on every move: the clone is translated, its rectangle is hit tested
//!   against the candidates, and on a hit the source is moved next to the hit item.
//!   Items with a live reflow animation are not hit targets.
//! - `Dragging → Idle` when the drag ends where it began (rollback), or when the
//!   reorder can be reported right away (commit).
//! - `Dragging → Settling → Idle` when the drag ends while reflow animations are still
//!   running; the reorder is reported when the last one finishes.
//!
//! Rollback puts the source back before its original sibling, removes the clone and the
//! marker class, and reports nothing. Commit removes the clone and the marker and emits
//! exactly one [`OrderChange`].
//!
//! ## Driving the engine
//!
//! Feed raw pointer events to [`Sortable::on_pointer`], or already-normalized gestures
//! to [`Sortable::on_gesture`]. Report reflow completions with
//! [`Sortable::animation_finished`] and new data with [`Sortable::items_changed`].
//!
//! ```
//! use kurbo::Vec2;
//! use understory_sortable::doc::{Document, Element};
//! use understory_sortable::gesture::Gesture;
//! use understory_sortable::report::OrderChange;
//! use understory_sortable::sortable::Sortable;
//!
//! let mut doc = Document::new();
//! let list = doc.append(doc.root_id(), Element::new("ul").size(200.0, 120.0));
//! let rows: Vec<_> = (0..3)
//!     .map(|_| doc.append(list, Element::new("li").size(200.0, 40.0)))
//!     .collect();
//!
//! let mut sortable = Sortable::new(Default::default());
//! sortable.on_gesture(&mut doc, Gesture::Start { target: rows[0] });
//! sortable.on_gesture(&mut doc, Gesture::Move { delta: Vec2::new(0.0, 45.0) });
//! sortable.on_gesture(&mut doc, Gesture::End);
//!
//! assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
//! assert_eq!(doc.children(list), &[rows[1], rows[0], rows[2]]);
//! ```

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use kurbo::Vec2;

use crate::config::SortableConfig;
use crate::geometry;
use crate::gesture::{Gesture, GestureTracker, PointerEvent};
use crate::host::SortableHost;
use crate::reflow::{AnimationTicket, FlipSnapshot, ReflowAnimator};
use crate::report::OrderChange;
use crate::session::{DragSession, DragState, RestorePoint, SessionPhase};
use crate::trace::{debug, trace};

/// Whether the engine acted on an input.
///
/// Hosts suppress default gesture handling (text selection, scrolling) for
/// [`Handled::Consumed`] inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Handled {
    /// The input did not concern the engine.
    Ignored,
    /// The input was part of a drag session.
    Consumed,
}

/// Drag-to-reorder engine for one container.
#[derive(Clone, Debug)]
pub struct Sortable<N> {
    config: SortableConfig<N>,
    tracker: GestureTracker<N>,
    animator: ReflowAnimator<N>,
    session: Option<DragSession<N>>,
    restore: Option<RestorePoint<N>>,
}

impl<N: Clone + Eq + Debug> Sortable<N> {
    /// Create an idle engine with dragging enabled.
    pub fn new(config: SortableConfig<N>) -> Self {
        Self {
            config,
            tracker: GestureTracker::new(),
            animator: ReflowAnimator::new(),
            session: None,
            restore: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SortableConfig<N> {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.session
            .as_ref()
            .map_or(DragState::Idle, DragSession::state)
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&DragSession<N>> {
        self.session.as_ref()
    }

    /// The reflow animation bookkeeping.
    pub fn animator(&self) -> &ReflowAnimator<N> {
        &self.animator
    }

    /// Whether `node` has a live reflow animation.
    pub fn is_animating(&self, node: &N) -> bool {
        self.animator.is_animating(node)
    }

    /// Whether a committed drag is waiting for the data owner to push new items.
    pub fn has_pending_restore(&self) -> bool {
        self.restore.is_some()
    }

    /// Whether drag gestures are accepted.
    pub fn dragging_enabled(&self) -> bool {
        self.tracker.is_attached()
    }

    /// Set the distance a pointer must travel before [`Sortable::on_pointer`] starts a drag.
    pub fn set_track_threshold(&mut self, threshold: f64) {
        self.tracker.track_threshold = threshold;
    }

    /// Call when the engine is attached to `host`.
    pub fn connect<H: SortableHost<Node = N>>(&mut self, host: &mut H) {
        host.set_listening(self.dragging_enabled());
    }

    /// Call when the engine is detached from `host`. Rolls back any session.
    pub fn disconnect<H: SortableHost<Node = N>>(&mut self, host: &mut H) {
        self.tracker.cancel();
        self.reset(host);
        host.set_listening(false);
    }

    /// Enable or disable dragging. Takes effect immediately.
    ///
    /// Disabling rolls back a session in progress.
    pub fn set_dragging_enabled<H: SortableHost<Node = N>>(
        &mut self,
        host: &mut H,
        enabled: bool,
    ) {
        if enabled {
            if self.tracker.attach() {
                host.set_listening(true);
            }
            return;
        }
        if self.tracker.detach() {
            host.set_listening(false);
        }
        if self.abort_session(host) {
            debug!("dragging disabled mid-session, rolled back");
        }
    }

    /// Feed a raw pointer event.
    pub fn on_pointer<H: SortableHost<Node = N>>(
        &mut self,
        host: &mut H,
        event: PointerEvent<N>,
    ) -> Handled {
        let Some(gesture) = self.tracker.on_pointer(event) else {
            return if self.state() == DragState::Dragging {
                Handled::Consumed
            } else {
                Handled::Ignored
            };
        };
        let started = matches!(gesture, Gesture::Start { .. });
        let handled = self.on_gesture(host, gesture);
        if started && handled == Handled::Consumed {
            // The event that crossed the threshold also moves the clone.
            if let Some(delta) = self.tracker.delta() {
                self.on_gesture(host, Gesture::Move { delta });
            }
        }
        handled
    }

    /// Feed a normalized gesture.
    pub fn on_gesture<H: SortableHost<Node = N>>(
        &mut self,
        host: &mut H,
        gesture: Gesture<N>,
    ) -> Handled {
        if !self.dragging_enabled() {
            return Handled::Ignored;
        }
        match gesture {
            Gesture::Start { target } => self.start(host, &target),
            Gesture::Move { delta } => self.drag_to(host, delta),
            Gesture::End => self.end(host),
        }
    }

    /// Report that the reflow animation for `ticket` completed.
    ///
    /// Returns the reported change if this completion ended a settling session.
    /// Unknown tickets are ignored.
    pub fn animation_finished<H: SortableHost<Node = N>>(
        &mut self,
        host: &mut H,
        ticket: AnimationTicket,
    ) -> Option<OrderChange> {
        self.animator.finish(ticket)?;
        trace!(ticket = ticket.get(), "reflow finished");
        let SessionPhase::Settling { change } = self.session.as_ref()?.phase else {
            return None;
        };
        if !self.animator.is_idle() {
            return None;
        }
        self.commit(host, change);
        Some(change)
    }

    /// Tell the engine the data owner pushed a new item collection.
    ///
    /// A session in progress is rolled back without reporting. After a commit, the source
    /// is moved back before its original sibling so the owner re-renders from the
    /// pre-drag document order. Returns `true` if the document was touched.
    pub fn items_changed<H: SortableHost<Node = N>>(&mut self, host: &mut H) -> bool {
        self.reset(host)
    }

    /// Roll back to the pre-drag document state.
    ///
    /// Idempotent. Returns `true` if a session or a restore point was undone.
    pub fn reset<H: SortableHost<Node = N>>(&mut self, host: &mut H) -> bool {
        if self.abort_session(host) {
            debug!("session rolled back");
            self.restore = None;
            return true;
        }
        let Some(point) = self.restore.take() else {
            return false;
        };
        trace!(source = ?point.source, "restoring pre-drag order");
        host.insert_before(&point.source, point.origin.as_ref());
        true
    }

    fn container<H: SortableHost<Node = N>>(&self, host: &H) -> N {
        self.config
            .external_host
            .clone()
            .unwrap_or_else(|| host.root())
    }

    fn start<H: SortableHost<Node = N>>(&mut self, host: &mut H, target: &N) -> Handled {
        if self.session.is_some() {
            trace!("start ignored, session already active");
            return Handled::Ignored;
        }
        if let Some(handle) = &self.config.handle_selector {
            if host.closest(target, handle).is_none() {
                return Handled::Ignored;
            }
        }
        let Some(source) = host.closest(target, &self.config.item_selector) else {
            return Handled::Ignored;
        };
        let container = self.container(host);
        if !host.contains(&container, &source) {
            return Handled::Ignored;
        }

        self.restore = None;
        let candidates = host.query_all(&container, &self.config.item_selector);
        let origin = host.next_sibling(&source);
        let at = host.offset(&source);
        let clone = host.create_clone(&source, at, &self.config.clone_class);
        host.add_class(&source, &self.config.dragged_class);
        self.animator.clear();

        debug!(source = ?source, candidates = candidates.len(), "drag started");
        self.session = Some(DragSession {
            source,
            clone,
            candidates,
            origin,
            container,
            axes: self.config.orientation.axes(),
            scroll_origin: host.scroll_offset(),
            translation: Vec2::ZERO,
            swaps: 0,
            phase: SessionPhase::Dragging,
        });
        Handled::Consumed
    }

    fn drag_to<H: SortableHost<Node = N>>(&mut self, host: &mut H, delta: Vec2) -> Handled {
        let Some(session) = self.session.as_mut() else {
            return Handled::Ignored;
        };
        if session.phase != SessionPhase::Dragging {
            return Handled::Ignored;
        }

        // Scroll compensation applies on both axes, after the orientation mask.
        let scrolled = host.scroll_offset() - session.scroll_origin;
        session.translation = session.axes.constrain(delta) + scrolled;
        host.translate(&session.clone, session.translation);

        let probe = host.bounding_rect(&session.clone);
        let animator = &self.animator;
        let hit = geometry::first_hit(
            probe,
            session
                .candidates
                .iter()
                .filter(|c| **c != session.source && !animator.is_animating(c))
                .map(|c| (c, host.bounding_rect(c))),
        )
        .cloned();
        let Some(target) = hit else {
            return Handled::Consumed;
        };

        let before = self
            .config
            .animation_enabled
            .then(|| FlipSnapshot::capture(host, &session.candidates));
        let reference = match host.document_order(&session.source, &target) {
            Ordering::Less => host.next_sibling(&target),
            _ => Some(target.clone()),
        };
        host.insert_before(&session.source, reference.as_ref());
        session.swaps += 1;
        trace!(target = ?target, swaps = session.swaps, "swapped");

        if let Some(before) = before {
            self.animator.play_displaced(
                host,
                &session.candidates,
                &before,
                &self.config.animation_timing,
            );
        }
        Handled::Consumed
    }

    fn end<H: SortableHost<Node = N>>(&mut self, host: &mut H) -> Handled {
        let Some(session) = self.session.as_ref() else {
            return Handled::Ignored;
        };
        if session.phase != SessionPhase::Dragging {
            return Handled::Ignored;
        }

        let current: Vec<N> = host
            .query_all(&session.container, &self.config.item_selector)
            .into_iter()
            .filter(|n| *n != session.clone)
            .collect();
        let change = OrderChange::between(&session.candidates, &current, &session.source)
            .filter(|c| !c.is_noop());

        match change {
            None => {
                self.abort_session(host);
                debug!("drag ended at its origin, rolled back");
            }
            Some(change) if self.animator.is_idle() => self.commit(host, change),
            Some(change) => {
                debug!(
                    live = self.animator.live_count(),
                    "drag ended, settling reflow animations"
                );
                if let Some(session) = self.session.as_mut() {
                    session.phase = SessionPhase::Settling { change };
                }
            }
        }
        Handled::Consumed
    }

    fn commit<H: SortableHost<Node = N>>(&mut self, host: &mut H, change: OrderChange) {
        let Some(session) = self.session.take() else {
            return;
        };
        host.remove(&session.clone);
        host.remove_class(&session.source, &self.config.dragged_class);
        self.animator.clear();
        self.restore = Some(session.restore_point());
        debug!(
            source_index = change.source_index,
            target_index = change.target_index,
            "order change committed"
        );
        host.emit_order_change(change);
    }

    fn abort_session<H: SortableHost<Node = N>>(&mut self, host: &mut H) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        host.remove(&session.clone);
        host.insert_before(&session.source, session.origin.as_ref());
        host.remove_class(&session.source, &self.config.dragged_class);
        self.animator.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::time::Duration;

    use kurbo::Point;

    use super::*;
    use crate::config::{AnimationTiming, Orientation};
    use crate::doc::{Document, Element, ElementId};
    use crate::easing::Easing;

    fn list(n: usize) -> (Document, ElementId, Vec<ElementId>) {
        let mut doc = Document::new();
        let ul = doc.append(
            doc.root_id(),
            Element::new("ul").size(200.0, 40.0 * n as f64),
        );
        let items = (0..n)
            .map(|_| doc.append(ul, Element::new("li").size(200.0, 40.0)))
            .collect();
        (doc, ul, items)
    }

    fn down(s: &mut Sortable<ElementId>, doc: &mut Document, target: ElementId) -> Handled {
        s.on_gesture(doc, Gesture::Start { target })
    }

    fn move_y(s: &mut Sortable<ElementId>, doc: &mut Document, dy: f64) -> Handled {
        s.on_gesture(
            doc,
            Gesture::Move {
                delta: Vec2::new(0.0, dy),
            },
        )
    }

    fn animated() -> SortableConfig<ElementId> {
        SortableConfig::default().with_animation(AnimationTiming::new(
            Duration::from_millis(200),
            Easing::EaseOut,
        ))
    }

    fn finish_animations(s: &mut Sortable<ElementId>, doc: &mut Document) -> Vec<OrderChange> {
        let mut committed = Vec::new();
        for ticket in doc.finish_all() {
            committed.extend(s.animation_finished(doc, ticket));
        }
        committed
    }

    #[test]
    fn drag_first_into_second_reports_once() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());

        assert_eq!(down(&mut s, &mut doc, items[0]), Handled::Consumed);
        assert_eq!(s.state(), DragState::Dragging);
        assert!(doc.has_class(items[0], "dragged"));
        let clone = *s.session().unwrap().clone_node();
        assert!(doc.has_class(clone, "clone"));
        assert_eq!(doc.children(ul).len(), 4);

        assert_eq!(move_y(&mut s, &mut doc, 45.0), Handled::Consumed);
        assert_eq!(&doc.children(ul)[..3], &[items[1], items[0], items[2]]);
        assert!(doc.order_changes().is_empty());

        assert_eq!(s.on_gesture(&mut doc, Gesture::End), Handled::Consumed);
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
        assert_eq!(doc.children(ul), &[items[1], items[0], items[2]]);
        assert!(!doc.is_alive(clone));
        assert!(!doc.has_class(items[0], "dragged"));
    }

    #[test]
    fn drag_last_above_first() {
        let (mut doc, ul, items) = list(4);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[3]);
        move_y(&mut s, &mut doc, -115.0);
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(doc.order_changes(), &[OrderChange::new(3, 0)]);
        assert_eq!(doc.children(ul), &[items[3], items[0], items[1], items[2]]);
    }

    #[test]
    fn drag_to_the_end_lands_after_last_item() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        move_y(&mut s, &mut doc, 85.0);
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(doc.order_changes(), &[OrderChange::new(0, 2)]);
        assert_eq!(doc.children(ul), &[items[1], items[2], items[0]]);
    }

    #[test]
    fn pointer_down_outside_handle_does_nothing() {
        let mut doc = Document::new();
        let ul = doc.append(doc.root_id(), Element::new("ul").size(200.0, 80.0));
        let a = doc.append(ul, Element::new("li").size(200.0, 40.0));
        let grip = doc.append(a, Element::new("span").class("handle").size(20.0, 40.0));
        doc.append(ul, Element::new("li").size(200.0, 40.0));

        let mut s = Sortable::new(SortableConfig::default().with_handle_selector(".handle"));
        assert_eq!(down(&mut s, &mut doc, a), Handled::Ignored);
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.children(ul).len(), 2);
        assert!(!doc.has_class(a, "dragged"));

        assert_eq!(down(&mut s, &mut doc, grip), Handled::Consumed);
        assert_eq!(s.session().map(|s| *s.source()), Some(a));
    }

    #[test]
    fn start_outside_any_item_is_ignored() {
        let (mut doc, ul, _) = list(2);
        let mut s = Sortable::new(SortableConfig::default());
        assert_eq!(down(&mut s, &mut doc, ul), Handled::Ignored);
        assert_eq!(move_y(&mut s, &mut doc, 45.0), Handled::Ignored);
        assert_eq!(s.on_gesture(&mut doc, Gesture::End), Handled::Ignored);
        assert!(doc.order_changes().is_empty());
    }

    #[test]
    fn items_changed_mid_drag_rolls_back_silently() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        assert_eq!(&doc.children(ul)[..3], &[items[1], items[0], items[2]]);

        assert!(s.items_changed(&mut doc));
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.children(ul), &items[..]);
        assert!(!doc.has_class(items[0], "dragged"));
        assert!(doc.order_changes().is_empty());
        // The pointer is still down, but the session is gone.
        assert_eq!(s.on_gesture(&mut doc, Gesture::End), Handled::Ignored);
        assert!(doc.order_changes().is_empty());
    }

    #[test]
    fn returning_to_origin_rolls_back() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        move_y(&mut s, &mut doc, 0.0);
        assert_eq!(s.session().map(DragSession::swaps), Some(2));
        s.on_gesture(&mut doc, Gesture::End);
        assert!(doc.order_changes().is_empty());
        assert_eq!(doc.children(ul), &items[..]);
        assert!(!doc.has_class(items[0], "dragged"));
        assert!(!s.has_pending_restore());
        // Resetting again is harmless.
        assert!(!s.reset(&mut doc));
    }

    #[test]
    fn drag_of_last_item_rolls_back_to_the_end() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[2]);
        assert_eq!(s.session().and_then(DragSession::origin_sibling), None);
        move_y(&mut s, &mut doc, -45.0);
        assert_eq!(&doc.children(ul)[..3], &[items[0], items[2], items[1]]);
        assert!(s.reset(&mut doc));
        assert_eq!(doc.children(ul), &items[..]);
    }

    #[test]
    fn disabling_mid_session_rolls_back() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        s.connect(&mut doc);
        assert!(doc.listening());

        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        s.set_dragging_enabled(&mut doc, false);
        assert!(!s.dragging_enabled());
        assert!(!doc.listening());
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.children(ul), &items[..]);
        assert!(!doc.has_class(items[0], "dragged"));

        assert_eq!(down(&mut s, &mut doc, items[1]), Handled::Ignored);
        s.set_dragging_enabled(&mut doc, true);
        assert!(doc.listening());
        assert_eq!(down(&mut s, &mut doc, items[1]), Handled::Consumed);
    }

    #[test]
    fn second_start_is_ignored() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[0]);
        assert_eq!(down(&mut s, &mut doc, items[1]), Handled::Ignored);
        assert_eq!(s.session().map(|s| *s.source()), Some(items[0]));
        assert_eq!(doc.children(ul).len(), 4);
    }

    #[test]
    fn animating_items_are_not_hit() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(animated());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        assert_eq!(&doc.children(ul)[..3], &[items[1], items[0], items[2]]);
        assert!(s.is_animating(&items[1]));

        // B is still drawn at its old slot, under the clone, but cannot be hit.
        move_y(&mut s, &mut doc, 46.0);
        assert_eq!(&doc.children(ul)[..3], &[items[1], items[0], items[2]]);

        assert!(finish_animations(&mut s, &mut doc).is_empty());
        assert!(s.animator().is_idle());
        move_y(&mut s, &mut doc, 10.0);
        assert_eq!(&doc.children(ul)[..3], &items[..]);
    }

    #[test]
    fn release_during_reflow_settles_then_commits() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(animated());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        s.on_gesture(&mut doc, Gesture::End);

        assert_eq!(s.state(), DragState::Settling);
        assert!(doc.order_changes().is_empty());
        // Further gestures do not disturb a settling session.
        assert_eq!(move_y(&mut s, &mut doc, 90.0), Handled::Ignored);
        assert_eq!(down(&mut s, &mut doc, items[2]), Handled::Ignored);

        assert_eq!(
            finish_animations(&mut s, &mut doc),
            vec![OrderChange::new(0, 1)]
        );
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
        assert_eq!(doc.children(ul), &[items[1], items[0], items[2]]);
    }

    #[test]
    fn disabling_while_settling_rolls_back() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(animated());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(s.state(), DragState::Settling);

        s.set_dragging_enabled(&mut doc, false);
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.children(ul), &items[..]);
        assert!(!doc.has_class(items[0], "dragged"));
        // Late completions from the cancelled session report nothing.
        assert!(finish_animations(&mut s, &mut doc).is_empty());
        assert!(doc.order_changes().is_empty());
    }

    #[test]
    fn items_changed_while_settling_rolls_back() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(animated());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(s.state(), DragState::Settling);

        assert!(s.items_changed(&mut doc));
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.children(ul), &items[..]);
        assert!(!s.has_pending_restore());
        assert!(finish_animations(&mut s, &mut doc).is_empty());
        assert!(doc.order_changes().is_empty());
    }

    #[test]
    fn animations_advance_with_time() {
        let (mut doc, _, items) = list(3);
        let mut s = Sortable::new(animated());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        // B moved up by 40 and starts drawn at its old position.
        assert_eq!(doc.element_rect(items[1]).y0, 40.0);
        assert!(doc.tick(Duration::from_millis(100)).is_empty());
        let mid = doc.element_rect(items[1]).y0;
        assert!(mid > 0.0 && mid < 40.0);
        let done = doc.tick(Duration::from_millis(100));
        assert_eq!(done.len(), 2);
        for ticket in done {
            s.animation_finished(&mut doc, ticket);
        }
        assert_eq!(doc.element_rect(items[1]).y0, 0.0);
        assert!(!s.is_animating(&items[1]));
    }

    #[test]
    fn host_without_animation_still_swaps() {
        let (mut doc, ul, items) = list(3);
        doc.set_animations_supported(false);
        let mut s = Sortable::new(animated());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        assert!(s.animator().is_idle());
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
        assert_eq!(doc.children(ul), &[items[1], items[0], items[2]]);
    }

    #[test]
    fn scroll_during_drag_is_compensated() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[0]);
        doc.set_scroll(Vec2::new(0.0, 10.0));
        move_y(&mut s, &mut doc, 35.0);
        assert_eq!(
            s.session().map(DragSession::translation),
            Some(Vec2::new(0.0, 45.0))
        );
        assert_eq!(&doc.children(ul)[..3], &[items[1], items[0], items[2]]);
    }

    #[test]
    fn scroll_is_compensated_on_a_locked_axis() {
        let mut doc = Document::new();
        let row = doc.append(doc.root_id(), Element::new("div").size(300.0, 50.0).row());
        let cards: Vec<_> = (0..3)
            .map(|_| doc.append(row, Element::new("div").class("card").size(100.0, 50.0)))
            .collect();
        let mut s = Sortable::new(
            SortableConfig::default()
                .with_item_selector(".card")
                .with_orientation(Orientation::Horizontal),
        );
        down(&mut s, &mut doc, cards[0]);
        doc.set_scroll(Vec2::new(0.0, 30.0));
        s.on_gesture(
            &mut doc,
            Gesture::Move {
                delta: Vec2::new(10.0, 0.0),
            },
        );
        assert_eq!(
            s.session().map(DragSession::translation),
            Some(Vec2::new(10.0, 30.0))
        );
        // The clone stays under the pointer in the viewport.
        let clone = *s.session().unwrap().clone_node();
        assert_eq!(doc.element_rect(clone).y0, 0.0);
        assert_eq!(doc.children(row)[..3], cards[..]);
    }

    #[test]
    fn vertical_orientation_drops_horizontal_movement() {
        let (mut doc, _, items) = list(3);
        let mut s =
            Sortable::new(SortableConfig::default().with_orientation(Orientation::Vertical));
        down(&mut s, &mut doc, items[0]);
        s.on_gesture(
            &mut doc,
            Gesture::Move {
                delta: Vec2::new(300.0, 45.0),
            },
        );
        assert_eq!(
            s.session().map(DragSession::translation),
            Some(Vec2::new(0.0, 45.0))
        );
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
    }

    #[test]
    fn horizontal_row_reorders() {
        let mut doc = Document::new();
        let row = doc.append(doc.root_id(), Element::new("div").size(300.0, 50.0).row());
        let cards: Vec<_> = (0..3)
            .map(|_| doc.append(row, Element::new("div").class("card").size(100.0, 50.0)))
            .collect();
        let mut s = Sortable::new(
            SortableConfig::default()
                .with_item_selector(".card")
                .with_orientation(Orientation::Horizontal),
        );
        down(&mut s, &mut doc, cards[2]);
        s.on_gesture(
            &mut doc,
            Gesture::Move {
                delta: Vec2::new(-190.0, 80.0),
            },
        );
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(doc.order_changes(), &[OrderChange::new(2, 0)]);
        assert_eq!(doc.children(row), &[cards[2], cards[0], cards[1]]);
    }

    #[test]
    fn external_host_scopes_items() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let outside = doc.append(root, Element::new("ul").size(200.0, 40.0));
        let stray = doc.append(outside, Element::new("li").size(200.0, 40.0));
        let hosted = doc.append(root, Element::new("ul").size(200.0, 80.0));
        let a = doc.append(hosted, Element::new("li").size(200.0, 40.0));
        let b = doc.append(hosted, Element::new("li").size(200.0, 40.0));

        let mut s = Sortable::new(SortableConfig::default().with_external_host(hosted));
        assert_eq!(down(&mut s, &mut doc, stray), Handled::Ignored);
        assert_eq!(down(&mut s, &mut doc, a), Handled::Consumed);
        assert_eq!(s.session().map(|s| s.candidates().len()), Some(2));
        move_y(&mut s, &mut doc, 45.0);
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
        assert_eq!(doc.children(hosted), &[b, a]);
    }

    #[test]
    fn items_changed_after_commit_restores_document_order() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        s.on_gesture(&mut doc, Gesture::End);
        assert!(s.has_pending_restore());

        assert!(s.items_changed(&mut doc));
        assert!(!s.has_pending_restore());
        assert_eq!(doc.children(ul), &items[..]);
        assert!(!s.items_changed(&mut doc));
        assert_eq!(doc.order_changes().len(), 1);
    }

    #[test]
    fn new_drag_drops_pending_restore() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        down(&mut s, &mut doc, items[0]);
        move_y(&mut s, &mut doc, 45.0);
        s.on_gesture(&mut doc, Gesture::End);

        down(&mut s, &mut doc, items[2]);
        assert!(!s.has_pending_restore());
        s.on_gesture(&mut doc, Gesture::End);
        assert_eq!(doc.children(ul), &[items[1], items[0], items[2]]);
    }

    #[test]
    fn pointer_events_drive_a_full_drag() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        let at = |y| Point::new(100.0, y);

        assert_eq!(
            s.on_pointer(&mut doc, PointerEvent::down(items[0], at(20.0))),
            Handled::Ignored
        );
        assert_eq!(
            s.on_pointer(&mut doc, PointerEvent::moved(items[0], at(24.0))),
            Handled::Ignored
        );
        assert_eq!(
            s.on_pointer(&mut doc, PointerEvent::moved(items[0], at(30.0))),
            Handled::Consumed
        );
        assert_eq!(
            s.session().map(DragSession::translation),
            Some(Vec2::new(0.0, 10.0))
        );
        s.on_pointer(&mut doc, PointerEvent::moved(items[0], at(65.0)));
        assert_eq!(
            s.on_pointer(&mut doc, PointerEvent::up(items[0], at(65.0))),
            Handled::Consumed
        );
        assert_eq!(doc.order_changes(), &[OrderChange::new(0, 1)]);
        assert_eq!(doc.children(ul), &[items[1], items[0], items[2]]);
    }

    #[test]
    fn click_does_not_start_a_drag() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        s.on_pointer(&mut doc, PointerEvent::down(items[1], Point::new(10.0, 50.0)));
        s.on_pointer(&mut doc, PointerEvent::up(items[1], Point::new(11.0, 51.0)));
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(doc.children(ul), &items[..]);
    }

    #[test]
    fn disconnect_rolls_back_and_stops_listening() {
        let (mut doc, ul, items) = list(3);
        let mut s = Sortable::new(SortableConfig::default());
        s.connect(&mut doc);
        down(&mut s, &mut doc, items[1]);
        move_y(&mut s, &mut doc, 45.0);
        s.disconnect(&mut doc);
        assert!(!doc.listening());
        assert_eq!(doc.children(ul), &items[..]);
        assert_eq!(s.state(), DragState::Idle);
    }
}

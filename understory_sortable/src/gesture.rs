// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture tracking: raw pointer events to a normalized three-phase drag gesture.
//!
//! ## Overview
//!
//! [`GestureTracker`] consumes [`PointerEvent`]s and produces [`Gesture`]s for the drag
//! state machine:
//!
//! - `Start { target }` once the pointer has travelled [`GestureTracker::track_threshold`]
//!   from where it went down. `target` is the element the pointer went down on.
//! - `Move { delta }` for each later move, with `delta` cumulative from the down position.
//!   Moves that do not change the delta are dropped.
//! - `End` when the pointer is released or cancelled after `Start`.
//!
//! A press that is released before crossing the threshold is a click and yields nothing.
//! Only one pointer is tracked at a time; other pointers are ignored until it is released.
//!
//! ## Attach and detach
//!
//! Listening is a togglable capability. A detached tracker ignores every event, and
//! detaching drops any press in progress, so re-attaching never replays buffered input.
//! Both operations are idempotent.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_sortable::gesture::{Gesture, GestureTracker, PointerEvent};
//!
//! let mut t: GestureTracker<&str> = GestureTracker::new();
//! assert_eq!(t.on_pointer(PointerEvent::down("row", Point::new(10.0, 10.0))), None);
//! // Below the threshold: still a potential click.
//! assert_eq!(t.on_pointer(PointerEvent::moved("row", Point::new(12.0, 11.0))), None);
//! assert_eq!(
//!     t.on_pointer(PointerEvent::moved("row", Point::new(10.0, 20.0))),
//!     Some(Gesture::Start { target: "row" })
//! );
//! assert_eq!(
//!     t.on_pointer(PointerEvent::moved("row", Point::new(10.0, 30.0))),
//!     Some(Gesture::Move { delta: Vec2::new(0.0, 20.0) })
//! );
//! assert_eq!(t.on_pointer(PointerEvent::up("row", Point::new(10.0, 30.0))), Some(Gesture::End));
//! ```

use core::num::NonZeroU64;

use kurbo::{Point, Vec2};

/// Pointer identifier for telling concurrent pointers apart.
pub type PointerId = NonZeroU64;

/// Pointer used when an event carries no identifier.
pub const PRIMARY_POINTER: PointerId = NonZeroU64::MIN;

/// Default distance, in pixels, a pointer must travel before a drag starts.
pub const DEFAULT_TRACK_THRESHOLD: f64 = 5.0;

/// Kind of raw pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerKind {
    /// Pointer pressed (mouse down, touch start).
    Down,
    /// Pointer moved.
    Move,
    /// Pointer released.
    Up,
    /// The platform took the pointer away (touch cancel, lost capture).
    Cancel,
}

/// A raw pointer event in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<N> {
    /// What happened.
    pub kind: PointerKind,
    /// Which pointer; `None` means [`PRIMARY_POINTER`].
    pub pointer: Option<PointerId>,
    /// Pointer position.
    pub position: Point,
    /// Innermost element under the pointer.
    pub target: N,
}

impl<N> PointerEvent<N> {
    /// A primary-pointer event.
    pub fn new(kind: PointerKind, target: N, position: Point) -> Self {
        Self {
            kind,
            pointer: None,
            position,
            target,
        }
    }

    /// A primary-pointer press.
    pub fn down(target: N, position: Point) -> Self {
        Self::new(PointerKind::Down, target, position)
    }

    /// A primary-pointer move.
    pub fn moved(target: N, position: Point) -> Self {
        Self::new(PointerKind::Move, target, position)
    }

    /// A primary-pointer release.
    pub fn up(target: N, position: Point) -> Self {
        Self::new(PointerKind::Up, target, position)
    }

    /// The same event attributed to `pointer`.
    pub fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = Some(pointer);
        self
    }
}

/// Normalized drag gesture consumed by [`Sortable::on_gesture`](crate::sortable::Sortable::on_gesture).
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture<N> {
    /// A drag began on `target` (the element the pointer went down on).
    Start {
        /// Gesture origin.
        target: N,
    },
    /// The pointer is `delta` away from where the drag began.
    Move {
        /// Cumulative displacement.
        delta: Vec2,
    },
    /// The drag ended.
    End,
}

#[derive(Clone, Debug)]
struct Press<N> {
    pointer: PointerId,
    origin: Point,
    target: N,
    tracking: bool,
    last_delta: Vec2,
}

/// Turns a pointer event stream into [`Gesture`]s.
#[derive(Clone, Debug)]
pub struct GestureTracker<N> {
    attached: bool,
    press: Option<Press<N>>,
    /// Distance a pointer must travel from its down position before `Start` fires.
    pub track_threshold: f64,
}

impl<N: Clone> Default for GestureTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone> GestureTracker<N> {
    /// Create an attached tracker with the default threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_TRACK_THRESHOLD)
    }

    /// Create an attached tracker with a custom threshold.
    pub fn with_threshold(track_threshold: f64) -> Self {
        Self {
            attached: true,
            press: None,
            track_threshold,
        }
    }

    /// Whether the tracker is listening.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a drag gesture has started and not yet ended.
    pub fn is_tracking(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.tracking)
    }

    /// Cumulative delta of the gesture in progress, once it has started.
    pub fn delta(&self) -> Option<Vec2> {
        self.press
            .as_ref()
            .filter(|p| p.tracking)
            .map(|p| p.last_delta)
    }

    /// Start listening. Returns `true` if the tracker was detached.
    pub fn attach(&mut self) -> bool {
        let changed = !self.attached;
        self.attached = true;
        changed
    }

    /// Stop listening and drop any press in progress. Returns `true` if the tracker was
    /// attached.
    pub fn detach(&mut self) -> bool {
        let changed = self.attached;
        self.attached = false;
        self.press = None;
        changed
    }

    /// Forget any press in progress without detaching.
    pub fn cancel(&mut self) {
        self.press = None;
    }

    /// Feed one pointer event, returning the gesture it completes, if any.
    pub fn on_pointer(&mut self, ev: PointerEvent<N>) -> Option<Gesture<N>> {
        if !self.attached {
            return None;
        }
        let pointer = ev.pointer.unwrap_or(PRIMARY_POINTER);
        match ev.kind {
            PointerKind::Down => {
                match &self.press {
                    // A second pointer, or a repeated down while dragging: keep the current press.
                    Some(p) if p.pointer != pointer || p.tracking => {}
                    _ => {
                        self.press = Some(Press {
                            pointer,
                            origin: ev.position,
                            target: ev.target,
                            tracking: false,
                            last_delta: Vec2::ZERO,
                        });
                    }
                }
                None
            }
            PointerKind::Move => {
                let threshold = self.track_threshold;
                let press = self.press.as_mut().filter(|p| p.pointer == pointer)?;
                let delta = ev.position - press.origin;
                if !press.tracking {
                    if delta.hypot2() < threshold * threshold {
                        return None;
                    }
                    press.tracking = true;
                    press.last_delta = delta;
                    return Some(Gesture::Start {
                        target: press.target.clone(),
                    });
                }
                if delta == press.last_delta {
                    return None;
                }
                press.last_delta = delta;
                Some(Gesture::Move { delta })
            }
            PointerKind::Up | PointerKind::Cancel => {
                if self.press.as_ref().is_none_or(|p| p.pointer != pointer) {
                    return None;
                }
                let press = self.press.take()?;
                press.tracking.then_some(Gesture::End)
            }
        }
    }
}

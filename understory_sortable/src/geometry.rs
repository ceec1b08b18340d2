// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers and the center-point hit test used to pick swap targets.
//!
//! ## Overview
//!
//! The engine probes with the dragged clone's bounding rectangle. The probe is reduced to
//! its center point, and a candidate is hit when its rectangle contains that point.
//! Edges are inclusive, so a probe centered exactly on the boundary between two adjacent
//! rows hits both.
//!
//! ## Tie-break
//!
//! When several candidates contain the probe center (overlapping or irregular layouts),
//! [`first_hit`] returns the first one in candidate order. This is a deterministic
//! simplification, not a geometric guarantee: it does not pick the "nearest" or
//! "largest overlap" candidate. Uniform lists and grids never overlap, so the rule only
//! matters for custom layouts.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use understory_sortable::geometry::{first_hit, hit_test};
//!
//! let rows = [
//!     ("a", Rect::new(0.0, 0.0, 100.0, 40.0)),
//!     ("b", Rect::new(0.0, 40.0, 100.0, 80.0)),
//! ];
//! // A probe whose center sits at y = 60 lands in `b`.
//! let probe = Rect::new(0.0, 40.0, 100.0, 80.0);
//! assert_eq!(hit_test(probe, rows), vec!["b"]);
//!
//! // Centered on the shared edge: both contain it, the first wins.
//! let edge = Rect::new(0.0, 20.0, 100.0, 60.0);
//! assert_eq!(first_hit(edge, rows), Some("a"));
//! ```

use alloc::vec::Vec;
use kurbo::{Point, Rect};

/// The point a probe rectangle is tested with: its center.
#[inline]
pub fn probe_point(probe: Rect) -> Point {
    probe.center()
}

/// Whether `rect` contains `pt`, counting all four edges as inside.
///
/// Unlike [`Rect::contains`], which is half-open, this treats the right and bottom
/// edges as inside too. Rectangles with negative width or height are normalized first.
#[inline]
pub fn contains_inclusive(rect: Rect, pt: Point) -> bool {
    let r = rect.abs();
    !(pt.x < r.x0 || pt.x > r.x1 || pt.y < r.y0 || pt.y > r.y1)
}

/// Return every candidate whose rectangle contains the center of `probe`, in candidate order.
///
/// Pure and `O(n)` in the number of candidates.
pub fn hit_test<K, I>(probe: Rect, candidates: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, Rect)>,
{
    let pt = probe_point(probe);
    candidates
        .into_iter()
        .filter(|(_, rect)| contains_inclusive(*rect, pt))
        .map(|(key, _)| key)
        .collect()
}

/// Return the first candidate whose rectangle contains the center of `probe`.
///
/// Equivalent to `hit_test(probe, candidates).first()` without collecting.
/// See the [module docs](self) for the tie-break caveat.
pub fn first_hit<K, I>(probe: Rect, candidates: I) -> Option<K>
where
    I: IntoIterator<Item = (K, Rect)>,
{
    let pt = probe_point(probe);
    candidates
        .into_iter()
        .find(|(_, rect)| contains_inclusive(*rect, pt))
        .map(|(key, _)| key)
}

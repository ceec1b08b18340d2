// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves for reflow animations.
//!
//! The curves are the CSS timing functions: the named keywords are fixed cubic Béziers
//! and [`Easing::CubicBezier`] takes explicit control points. Hosts that hand the
//! animation to a compositor can pass the curve on as a string via the
//! [`Display`](core::fmt::Display) impl; hosts that render frames themselves can call
//! [`Easing::sample`].
//!
//! ```
//! use understory_sortable::easing::Easing;
//!
//! let e: Easing = "ease-out".parse().unwrap();
//! assert_eq!(e, Easing::EaseOut);
//! assert_eq!(e.sample(0.0), 0.0);
//! assert_eq!(e.sample(1.0), 1.0);
//! // Ease-out front-loads progress.
//! assert!(e.sample(0.5) > 0.5);
//!
//! let custom: Easing = "cubic-bezier(0.4, 0, 0.2, 1)".parse().unwrap();
//! assert_eq!(custom.to_string(), "cubic-bezier(0.4, 0, 0.2, 1)");
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// A timing function mapping linear progress in `[0, 1]` to eased progress.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    /// Identity.
    Linear,
    /// CSS `ease`: `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    Ease,
    /// CSS `ease-in`: `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`: `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`: `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Cubic Bézier from `(0, 0)` to `(1, 1)` with control points `(x1, y1)` and `(x2, y2)`.
    ///
    /// `x1` and `x2` must lie in `[0, 1]` so the curve is a function of time.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Control points `(x1, y1, x2, y2)` of the curve, or `None` for [`Easing::Linear`].
    pub fn control_points(self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Linear => None,
            Self::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Self::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
        }
    }

    /// Map linear progress `t` to eased progress.
    ///
    /// `t` is clamped to `[0, 1]`, and the endpoints map exactly to `0.0` and `1.0`.
    pub fn sample(self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => {
                let s = solve_for_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

/// One coordinate of the unit cubic Bézier with `P0 = 0` and `P3 = 1`.
fn bezier(t: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

const EPSILON: f64 = 1e-7;

/// Find the curve parameter whose x coordinate is `x`.
///
/// Newton's method converges in a handful of steps for well-behaved curves; flat
/// regions fall back to bisection, which always converges since x(t) is monotonic
/// for control points in `[0, 1]`.
fn solve_for_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut t = x;
    for _ in 0..8 {
        let err = bezier(t, x1, x2) - x;
        if abs(err) < EPSILON {
            return t;
        }
        let slope = bezier_slope(t, x1, x2);
        if abs(slope) < 1e-6 {
            break;
        }
        t -= err / slope;
        if !(0.0..=1.0).contains(&t) {
            break;
        }
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..64 {
        let v = bezier(t, x1, x2);
        if abs(v - x) < EPSILON {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }
    t
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// Error returned when parsing an [`Easing`] from a CSS-style string fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseEasingError {
    /// Not a known keyword or `cubic-bezier(..)` expression.
    #[error("unknown easing `{0}`")]
    Unknown(String),
    /// `cubic-bezier(..)` with the wrong number of arguments.
    #[error("cubic-bezier takes 4 numbers, got {0}")]
    Arity(usize),
    /// An argument of `cubic-bezier(..)` is not a finite number.
    #[error("invalid number `{0}` in cubic-bezier")]
    Number(String),
    /// An x control point lies outside `[0, 1]`.
    #[error("cubic-bezier x control points must lie in [0, 1]")]
    OutOfRange,
}

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        for (name, easing) in [
            ("linear", Self::Linear),
            ("ease", Self::Ease),
            ("ease-in", Self::EaseIn),
            ("ease-out", Self::EaseOut),
            ("ease-in-out", Self::EaseInOut),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(easing);
            }
        }

        let args = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParseEasingError::Unknown(s.to_string()))?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ParseEasingError::Arity(parts.len()));
        }
        let mut v = [0.0_f64; 4];
        for (slot, part) in v.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| ParseEasingError::Number(part.to_string()))?;
        }
        if !(0.0..=1.0).contains(&v[0]) || !(0.0..=1.0).contains(&v[2]) {
            return Err(ParseEasingError::OutOfRange);
        }
        Ok(Self::CubicBezier(v[0], v[1], v[2], v[3]))
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration: selectors, axis constraint, animation timing, and marker classes.
//!
//! A [`SortableConfig`] is applied once per [`Sortable`](crate::sortable::Sortable)
//! instance. Selectors and class names are opaque strings; the host interprets them
//! (see [`SortableHost::closest`](crate::host::SortableHost::closest)).
//!
//! ```
//! use core::time::Duration;
//! use understory_sortable::config::{AnimationTiming, Orientation, SortableConfig};
//! use understory_sortable::easing::Easing;
//!
//! let config: SortableConfig<u32> = SortableConfig::default()
//!     .with_item_selector("tr")
//!     .with_handle_selector(".grip")
//!     .with_orientation("vertical".parse().unwrap())
//!     .with_animation(AnimationTiming::new(Duration::from_millis(150), Easing::EaseInOut));
//!
//! assert_eq!(config.orientation, Orientation::Vertical);
//! assert!(config.animation_enabled);
//! assert_eq!(config.dragged_class, "dragged");
//! ```

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use kurbo::Vec2;

use crate::easing::Easing;

bitflags::bitflags! {
    /// Axes along which the dragged clone may move.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Axes: u8 {
        /// Horizontal movement.
        const X = 0b0000_0001;
        /// Vertical movement.
        const Y = 0b0000_0010;
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::all()
    }
}

impl Axes {
    /// Zero the components of `v` along disallowed axes.
    #[inline]
    pub fn constrain(self, v: Vec2) -> Vec2 {
        Vec2::new(
            if self.contains(Self::X) { v.x } else { 0.0 },
            if self.contains(Self::Y) { v.y } else { 0.0 },
        )
    }
}

/// Orientation constraint for dragging.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Orientation {
    /// Unconstrained: the clone follows the pointer on both axes.
    #[default]
    Free,
    /// Horizontal only: vertical pointer movement is ignored.
    Horizontal,
    /// Vertical only: horizontal pointer movement is ignored.
    Vertical,
}

impl Orientation {
    /// The axes this orientation allows.
    pub fn axes(self) -> Axes {
        match self {
            Self::Free => Axes::all(),
            Self::Horizontal => Axes::X,
            Self::Vertical => Axes::Y,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Free => "none",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// Error returned when parsing an [`Orientation`] fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown orientation `{0}`, expected `none`, `horizontal` or `vertical`")]
pub struct ParseOrientationError(pub String);

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    /// Accepts `none` (or an empty string), `horizontal` and `vertical`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("free") {
            Ok(Self::Free)
        } else if s.eq_ignore_ascii_case("horizontal") {
            Ok(Self::Horizontal)
        } else if s.eq_ignore_ascii_case("vertical") {
            Ok(Self::Vertical)
        } else {
            Err(ParseOrientationError(s.to_string()))
        }
    }
}

/// Duration, delay and easing of a reflow animation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationTiming {
    /// Length of the transition once it starts.
    pub duration: Duration,
    /// Time before the transition starts; the item holds its start offset meanwhile.
    pub delay: Duration,
    /// Easing curve applied to progress.
    pub easing: Easing,
}

impl Default for AnimationTiming {
    /// 200ms, `ease-out`, no delay.
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(200),
            delay: Duration::ZERO,
            easing: Easing::EaseOut,
        }
    }
}

impl AnimationTiming {
    /// Timing with the given duration and easing and no delay.
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    /// Set the start delay.
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Total time from start to completion.
    pub fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Eased progress in `[0, 1]` after `elapsed`.
    ///
    /// A zero duration completes as soon as the delay has passed.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = active.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.sample(t)
    }
}

/// Per-instance engine configuration.
///
/// `N` is the host's node handle type; it only appears in [`SortableConfig::external_host`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SortableConfig<N> {
    /// Selector identifying draggable items. Defaults to `"li"`.
    pub item_selector: String,
    /// Selector for the region of an item that may start a drag.
    ///
    /// `None` makes the whole item a handle.
    pub handle_selector: Option<String>,
    /// Axis constraint applied to clone movement.
    pub orientation: Orientation,
    /// Play reflow animations for items displaced by a swap.
    pub animation_enabled: bool,
    /// Timing of reflow animations.
    pub animation_timing: AnimationTiming,
    /// Class added to the source item for the duration of a session.
    pub dragged_class: String,
    /// Class added to the clone that follows the pointer.
    pub clone_class: String,
    /// Container to operate on instead of the host's own root.
    ///
    /// Item queries and re-parenting run against this node; the session lifecycle is
    /// unchanged.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub external_host: Option<N>,
}

impl<N> Default for SortableConfig<N> {
    fn default() -> Self {
        Self {
            item_selector: String::from("li"),
            handle_selector: None,
            orientation: Orientation::Free,
            animation_enabled: false,
            animation_timing: AnimationTiming::default(),
            dragged_class: String::from("dragged"),
            clone_class: String::from("clone"),
            external_host: None,
        }
    }
}

impl<N> SortableConfig<N> {
    /// Set the item selector.
    pub fn with_item_selector(mut self, selector: &str) -> Self {
        self.item_selector = selector.to_string();
        self
    }

    /// Restrict drag starts to regions matching `selector`.
    pub fn with_handle_selector(mut self, selector: &str) -> Self {
        self.handle_selector = Some(selector.to_string());
        self
    }

    /// Set the orientation constraint.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Enable reflow animations with `timing`.
    pub fn with_animation(mut self, timing: AnimationTiming) -> Self {
        self.animation_enabled = true;
        self.animation_timing = timing;
        self
    }

    /// Set the marker classes for the dragged item and its clone.
    pub fn with_marker_classes(mut self, dragged: &str, clone: &str) -> Self {
        self.dragged_class = dragged.to_string();
        self.clone_class = clone.to_string();
        self
    }

    /// Operate on `node` instead of the host's own root.
    pub fn with_external_host(mut self, node: N) -> Self {
        self.external_host = Some(node);
        self
    }
}

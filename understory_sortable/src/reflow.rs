// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! FLIP-style reflow animation bookkeeping.
//!
//! ## Overview
//!
//! A swap is a discrete document move. To make it look continuous, the engine captures
//! the layout offset of every candidate before the move ([`FlipSnapshot::capture`]),
//! performs the move, and for each candidate that changed position asks the host to play
//! a transition from the old position (expressed as a translation relative to the new
//! one) back to no transform.
//!
//! ## Live set
//!
//! Each started animation is recorded in the [`ReflowAnimator`]'s live set under a unique
//! [`AnimationTicket`]. While an item has any live record it is excluded from hit
//! testing, so a swap cannot be triggered against an item that is still visually in
//! transit. Completion is tracked per ticket: an item animated twice stays excluded until
//! both tickets finish.
//!
//! ```
//! use kurbo::Vec2;
//! use understory_sortable::reflow::ReflowAnimator;
//!
//! let mut anim: ReflowAnimator<u32> = ReflowAnimator::new();
//! let first = anim.register(7, Vec2::new(0.0, 40.0));
//! let second = anim.register(7, Vec2::new(0.0, -40.0));
//! assert!(anim.is_animating(&7));
//!
//! assert!(anim.finish(first).is_some());
//! assert!(anim.is_animating(&7));
//! assert!(anim.finish(second).is_some());
//! assert!(anim.is_idle());
//! ```

use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Point, Vec2};

use crate::config::AnimationTiming;
use crate::host::SortableHost;

/// Identifies one started reflow animation.
///
/// Tickets are unique per [`ReflowAnimator`] and never reused, so a completion that
/// arrives after its session ended cannot be mistaken for a live animation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationTicket(u64);

impl AnimationTicket {
    /// The raw serial number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A live animation: an item and the offset it animates from.
#[derive(Clone, Debug, PartialEq)]
pub struct ReflowRecord<N> {
    /// The displaced item.
    pub node: N,
    /// Translation at the start of the animation (old position minus new position).
    pub from: Vec2,
    /// Ticket reported back on completion.
    pub ticket: AnimationTicket,
}

impl<N> ReflowRecord<N> {
    /// The compensating translation `elapsed` into the animation.
    ///
    /// Starts at [`ReflowRecord::from`] and reaches zero when the timing completes.
    pub fn offset_at(&self, elapsed: Duration, timing: &AnimationTiming) -> Vec2 {
        self.from * (1.0 - timing.progress(elapsed))
    }
}

/// Layout offsets captured before a swap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlipSnapshot {
    offsets: Vec<Point>,
}

impl FlipSnapshot {
    /// Record the current layout offset of each node.
    pub fn capture<H: SortableHost>(host: &H, nodes: &[H::Node]) -> Self {
        Self {
            offsets: nodes.iter().map(|n| host.offset(n)).collect(),
        }
    }

    /// The captured offsets, parallel to the captured nodes.
    pub fn offsets(&self) -> &[Point] {
        &self.offsets
    }
}

/// Tracks in-flight reflow animations.
#[derive(Clone, Debug)]
pub struct ReflowAnimator<N> {
    live: Vec<ReflowRecord<N>>,
    next_ticket: u64,
}

impl<N> Default for ReflowAnimator<N> {
    fn default() -> Self {
        Self {
            live: Vec::new(),
            next_ticket: 1,
        }
    }
}

impl<N: Clone + PartialEq> ReflowAnimator<N> {
    /// Create an animator with an empty live set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live animation for `node` without involving a host.
    pub fn register(&mut self, node: N, from: Vec2) -> AnimationTicket {
        let ticket = AnimationTicket(self.next_ticket);
        self.next_ticket += 1;
        self.live.push(ReflowRecord { node, from, ticket });
        ticket
    }

    /// Ask the host to play a reflow for `node` from `from`, and record it if it started.
    ///
    /// Returns `None` for a zero offset, or when the host cannot animate.
    pub fn start<H>(
        &mut self,
        host: &mut H,
        node: &N,
        from: Vec2,
        timing: &AnimationTiming,
    ) -> Option<AnimationTicket>
    where
        H: SortableHost<Node = N>,
    {
        if from == Vec2::ZERO {
            return None;
        }
        let ticket = AnimationTicket(self.next_ticket);
        if !host.play_reflow(node, from, timing, ticket) {
            return None;
        }
        Some(self.register(node.clone(), from))
    }

    /// Start a reflow for every node whose offset differs from `before`.
    ///
    /// `nodes` must be the sequence `before` was captured from.
    pub fn play_displaced<H>(
        &mut self,
        host: &mut H,
        nodes: &[N],
        before: &FlipSnapshot,
        timing: &AnimationTiming,
    ) where
        H: SortableHost<Node = N>,
    {
        for (node, old) in nodes.iter().zip(before.offsets()) {
            let from = *old - host.offset(node);
            self.start(host, node, from, timing);
        }
    }

    /// Remove the record for `ticket`, returning it if it was live.
    pub fn finish(&mut self, ticket: AnimationTicket) -> Option<ReflowRecord<N>> {
        let i = self.live.iter().position(|r| r.ticket == ticket)?;
        Some(self.live.remove(i))
    }

    /// Whether `node` has any live animation.
    pub fn is_animating(&self, node: &N) -> bool {
        self.live.iter().any(|r| r.node == *node)
    }

    /// Whether no animation is live.
    pub fn is_idle(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of live animations.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live records, oldest first.
    pub fn records(&self) -> &[ReflowRecord<N>] {
        &self.live
    }

    /// Forget all live animations. Their tickets become unknown.
    pub fn clear(&mut self) {
        self.live.clear();
    }
}

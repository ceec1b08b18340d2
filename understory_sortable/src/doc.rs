// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory element tree implementing [`SortableHost`].
//!
//! ## Overview
//!
//! [`Document`] is a small retained tree for tests, demos and headless use. Elements have
//! a tag, classes, a fixed size, and a flow direction for their children:
//!
//! - In-flow children stack along the parent's [`Flow`] axis, in child order.
//! - Absolutely positioned children (clones) sit at an explicit offset and do not take
//!   space.
//! - An element's viewport position is its parent's position plus its offset, its
//!   translation, and the current offset of any reflow animation playing on it, minus
//!   the document scroll.
//!
//! Selectors are comma-separated lists of `tag`, `.class`, `tag.class` (any number of
//! classes) or `*`.
//!
//! Reflow animations are played on a virtual clock advanced with [`Document::tick`];
//! finished tickets are returned to the caller, who reports them to the engine.
//!
//! ## Identifiers
//!
//! [`ElementId`] is generational: removing an element frees
//! its slot, and a stale id never aliases a new element. Host operations on stale ids are
//! no-ops.
//!
//! ```
//! use understory_sortable::doc::{Document, Element};
//! use understory_sortable::host::SortableHost;
//!
//! let mut doc = Document::new();
//! let ul = doc.append(doc.root_id(), Element::new("ul").size(100.0, 60.0));
//! let a = doc.append(ul, Element::new("li").class("row").size(100.0, 30.0));
//! let b = doc.append(ul, Element::new("li").class("row").size(100.0, 30.0));
//!
//! assert_eq!(doc.query_all(&ul, "li.row"), vec![a, b]);
//! assert_eq!(doc.element_rect(b).y0, 30.0);
//!
//! doc.insert_before(&b, Some(&a));
//! assert_eq!(doc.children(ul), &[b, a]);
//! assert_eq!(doc.element_rect(a).y0, 30.0);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::AnimationTiming;
use crate::host::SortableHost;
use crate::reflow::{AnimationTicket, ReflowRecord};
use crate::report::OrderChange;

/// Identifier for an element in a [`Document`] (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(u32, u32);

impl ElementId {
    fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Direction in which an element lays out its in-flow children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Top to bottom.
    #[default]
    Column,
    /// Left to right.
    Row,
}

/// Description of an element to append.
#[derive(Clone, Debug)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    size: Size,
    flow: Flow,
}

impl Element {
    /// An element with `tag`, no classes and zero size.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            size: Size::ZERO,
            flow: Flow::Column,
        }
    }

    /// Add a class.
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Set the size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set the flow direction for children.
    pub fn flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    /// Lay children out left to right.
    pub fn row(self) -> Self {
        self.flow(Flow::Row)
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    tag: String,
    classes: Vec<String>,
    size: Size,
    flow: Flow,
    /// Explicit offset for absolutely positioned elements.
    position: Option<Point>,
    translation: Vec2,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            tag: element.tag,
            classes: element.classes,
            size: element.size,
            flow: element.flow,
            position: None,
            translation: Vec2::ZERO,
        }
    }

    fn matches(&self, selector: &str) -> bool {
        selector.split(',').any(|part| self.matches_simple(part.trim()))
    }

    fn matches_simple(&self, selector: &str) -> bool {
        if selector.is_empty() {
            return false;
        }
        let mut parts = selector.split('.');
        let tag = parts.next().unwrap_or_default();
        if !(tag.is_empty() || tag == "*" || tag.eq_ignore_ascii_case(&self.tag)) {
            return false;
        }
        parts.all(|class| !class.is_empty() && self.classes.iter().any(|c| c == class))
    }
}

#[derive(Clone, Debug)]
struct Playing {
    record: ReflowRecord<ElementId>,
    timing: AnimationTiming,
    elapsed: Duration,
}

/// A retained element tree with stacked layout.
pub struct Document {
    nodes: Vec<Option<Node>>, // generational slots
    free_list: Vec<(usize, u32)>, // slot and the generation it last held
    root: ElementId,
    host: Option<ElementId>,
    scroll: Vec2,
    animations_supported: bool,
    playing: Vec<Playing>,
    listening: bool,
    order_changes: Vec<OrderChange>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("scroll", &self.scroll)
            .field("reflows_in_flight", &self.playing.len())
            .field("order_changes", &self.order_changes)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document containing only a root `body` element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            root: ElementId::new(0, 1),
            host: None,
            scroll: Vec2::ZERO,
            animations_supported: true,
            playing: Vec::new(),
            listening: false,
            order_changes: Vec::new(),
        };
        doc.root = doc.alloc(Element::new("body"));
        doc
    }

    /// The root element.
    pub fn root_id(&self) -> ElementId {
        self.root
    }

    /// Append a new element as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` has been removed.
    pub fn append(&mut self, parent: ElementId, element: Element) -> ElementId {
        assert!(self.is_alive(parent), "append to a removed element");
        let id = self.alloc(element);
        self.link_parent(id, parent);
        id
    }

    /// Whether `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Children of `id` in order, including absolutely positioned ones.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Parent of `id`.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id)?.parent
    }

    /// Whether `id` carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Viewport rectangle of `id`; [`Rect::ZERO`] for removed elements.
    pub fn element_rect(&self, id: ElementId) -> Rect {
        match self.node_opt(id) {
            Some(n) => Rect::from_origin_size(self.viewport_origin(id), n.size),
            None => Rect::ZERO,
        }
    }

    /// Make `host` the element returned by [`SortableHost::root`], or the document root
    /// when `None`.
    pub fn set_host(&mut self, host: Option<ElementId>) {
        self.host = host;
    }

    /// Scroll the viewport.
    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }

    /// Whether [`SortableHost::play_reflow`] starts animations. Defaults to `true`.
    pub fn set_animations_supported(&mut self, supported: bool) {
        self.animations_supported = supported;
    }

    /// Whether the engine asked for pointer input.
    pub fn listening(&self) -> bool {
        self.listening
    }

    /// Order changes emitted so far.
    pub fn order_changes(&self) -> &[OrderChange] {
        &self.order_changes
    }

    /// Take the emitted order changes, leaving none.
    pub fn take_order_changes(&mut self) -> Vec<OrderChange> {
        core::mem::take(&mut self.order_changes)
    }

    /// Number of reflow animations in flight.
    pub fn reflows_in_flight(&self) -> usize {
        self.playing.len()
    }

    /// Reorder the children of `parent` to follow `order`, the way a data owner
    /// re-renders a list.
    ///
    /// Elements in `order` that are not children of `parent` are skipped; children not
    /// listed keep their relative order after the listed ones.
    pub fn replace_children(&mut self, parent: ElementId, order: &[ElementId]) {
        let Some(node) = self.node_opt(parent) else {
            return;
        };
        let current = node.children.clone();
        let mut next: Vec<ElementId> = Vec::with_capacity(current.len());
        for id in order {
            if current.contains(id) && !next.contains(id) {
                next.push(*id);
            }
        }
        for id in current {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        self.node_mut(parent).children = next;
    }

    /// Advance reflow animations by `dt`, returning the tickets that finished.
    pub fn tick(&mut self, dt: Duration) -> Vec<AnimationTicket> {
        let mut done = Vec::new();
        self.playing.retain_mut(|p| {
            p.elapsed += dt;
            if p.elapsed >= p.timing.total() {
                done.push(p.record.ticket);
                false
            } else {
                true
            }
        });
        done
    }

    /// Finish every reflow animation in flight, returning their tickets.
    pub fn finish_all(&mut self) -> Vec<AnimationTicket> {
        self.playing.drain(..).map(|p| p.record.ticket).collect()
    }

    // --- internals ---

    fn alloc(&mut self, element: Element) -> ElementId {
        if let Some((idx, last)) = self.free_list.pop() {
            let generation = last + 1;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices."
            )]
            ElementId::new(idx as u32, generation)
        } else {
            self.nodes.push(Some(Node::new(1, element)));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices."
            )]
            ElementId::new((self.nodes.len() - 1) as u32, 1)
        }
    }

    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn path_to_root(&self, mut id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push((id.idx(), id.1));
    }

    fn copy_subtree(&mut self, id: ElementId, parent: ElementId) -> ElementId {
        let src = self.node(id);
        let element = Element {
            tag: src.tag.clone(),
            classes: src.classes.clone(),
            size: src.size,
            flow: src.flow,
        };
        let children = src.children.clone();
        let copy = self.alloc(element);
        self.link_parent(copy, parent);
        for child in children {
            self.copy_subtree(child, copy);
        }
        copy
    }

    /// Layout offset of `id` within its parent.
    fn layout_offset(&self, id: ElementId) -> Point {
        let node = self.node(id);
        if let Some(position) = node.position {
            return position;
        }
        let Some(parent) = node.parent else {
            return Point::ZERO;
        };
        let parent = self.node(parent);
        let mut along = 0.0;
        for sibling in &parent.children {
            if *sibling == id {
                break;
            }
            let s = self.node(*sibling);
            if s.position.is_some() {
                continue;
            }
            along += match parent.flow {
                Flow::Column => s.size.height,
                Flow::Row => s.size.width,
            };
        }
        match parent.flow {
            Flow::Column => Point::new(0.0, along),
            Flow::Row => Point::new(along, 0.0),
        }
    }

    fn reflow_offset(&self, id: ElementId) -> Vec2 {
        self.playing
            .iter()
            .filter(|p| p.record.node == id)
            .map(|p| p.record.offset_at(p.elapsed, &p.timing))
            .fold(Vec2::ZERO, |acc, v| acc + v)
    }

    fn viewport_origin(&self, id: ElementId) -> Point {
        let node = self.node(id);
        let base = match node.parent {
            Some(parent) => self.viewport_origin(parent),
            None => Point::ZERO - self.scroll,
        };
        base + self.layout_offset(id).to_vec2() + node.translation + self.reflow_offset(id)
    }
}

impl SortableHost for Document {
    type Node = ElementId;

    fn root(&self) -> ElementId {
        self.host.filter(|h| self.is_alive(*h)).unwrap_or(self.root)
    }

    fn closest(&self, node: &ElementId, selector: &str) -> Option<ElementId> {
        let mut cur = Some(*node);
        while let Some(id) = cur {
            let n = self.node_opt(id)?;
            if n.matches(selector) {
                return Some(id);
            }
            cur = n.parent;
        }
        None
    }

    fn query_all(&self, root: &ElementId, selector: &str) -> Vec<ElementId> {
        let mut out = Vec::new();
        let Some(node) = self.node_opt(*root) else {
            return out;
        };
        let mut stack: Vec<ElementId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let n = self.node(id);
            if n.matches(selector) {
                out.push(id);
            }
            stack.extend(n.children.iter().rev().copied());
        }
        out
    }

    fn contains(&self, ancestor: &ElementId, node: &ElementId) -> bool {
        let mut cur = Some(*node);
        while let Some(id) = cur {
            if id == *ancestor {
                return true;
            }
            cur = self.node_opt(id).and_then(|n| n.parent);
        }
        false
    }

    fn next_sibling(&self, node: &ElementId) -> Option<ElementId> {
        let parent = self.node_opt(*node)?.parent?;
        let siblings = &self.node(parent).children;
        let i = siblings.iter().position(|c| c == node)?;
        siblings.get(i + 1).copied()
    }

    fn document_order(&self, a: &ElementId, b: &ElementId) -> Ordering {
        if a == b || !self.is_alive(*a) || !self.is_alive(*b) {
            return Ordering::Equal;
        }
        let pa = self.path_to_root(*a);
        let pb = self.path_to_root(*b);
        let common = pa.iter().zip(&pb).take_while(|(x, y)| x == y).count();
        match (pa.get(common), pb.get(common)) {
            // `a` is an ancestor of `b`, or the reverse.
            (None, _) => Ordering::Less,
            (_, None) => Ordering::Greater,
            (Some(x), Some(y)) => {
                if common == 0 {
                    // Disconnected trees.
                    return x.idx().cmp(&y.idx());
                }
                let siblings = &self.node(pa[common - 1]).children;
                let ix = siblings.iter().position(|c| c == x);
                let iy = siblings.iter().position(|c| c == y);
                ix.cmp(&iy)
            }
        }
    }

    fn insert_before(&mut self, node: &ElementId, reference: Option<&ElementId>) {
        if reference == Some(node) {
            return;
        }
        let Some(parent) = self.node_opt(*node).and_then(|n| n.parent) else {
            return;
        };
        self.unlink_parent(*node, parent);
        let at = reference.and_then(|r| {
            self.node(parent)
                .children
                .iter()
                .position(|c| c == r)
        });
        let siblings = &mut self.node_mut(parent).children;
        match at {
            Some(i) => siblings.insert(i, *node),
            None => siblings.push(*node),
        }
        self.node_mut(*node).parent = Some(parent);
    }

    fn bounding_rect(&self, node: &ElementId) -> Rect {
        self.element_rect(*node)
    }

    fn offset(&self, node: &ElementId) -> Point {
        if !self.is_alive(*node) {
            return Point::ZERO;
        }
        self.layout_offset(*node)
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }

    fn create_clone(&mut self, node: &ElementId, at: Point, class: &str) -> ElementId {
        let parent = self.parent(*node).unwrap_or(self.root);
        if !self.is_alive(*node) {
            return self.append(parent, Element::new("div").class(class));
        }
        let copy = self.copy_subtree(*node, parent);
        let n = self.node_mut(copy);
        n.position = Some(at);
        if !n.classes.iter().any(|c| c == class) {
            n.classes.push(class.to_string());
        }
        copy
    }

    fn remove(&mut self, node: &ElementId) {
        if !self.is_alive(*node) || *node == self.root {
            return;
        }
        if let Some(parent) = self.node(*node).parent {
            self.unlink_parent(*node, parent);
        }
        self.free_subtree(*node);
    }

    fn translate(&mut self, node: &ElementId, by: Vec2) {
        if let Some(n) = self.node_opt_mut(*node) {
            n.translation = by;
        }
    }

    fn add_class(&mut self, node: &ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(*node) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: &ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(*node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn set_listening(&mut self, listening: bool) {
        self.listening = listening;
    }

    fn play_reflow(
        &mut self,
        node: &ElementId,
        from: Vec2,
        timing: &AnimationTiming,
        ticket: AnimationTicket,
    ) -> bool {
        if !self.animations_supported || !self.is_alive(*node) {
            return false;
        }
        self.playing.push(Playing {
            record: ReflowRecord {
                node: *node,
                from,
                ticket,
            },
            timing: *timing,
            elapsed: Duration::ZERO,
        });
        true
    }

    fn emit_order_change(&mut self, change: OrderChange) {
        self.order_changes.push(change);
    }
}

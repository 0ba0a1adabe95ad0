//! Position/size algebra.
//!
//! A widget's position and size are declarations (`Coord`/`Extent` per
//! axis) evaluated lazily on every read against the current tree. Results
//! are memoized per (frame, generation) stamp: the host advances the frame
//! once per tick, and every layout-affecting mutation bumps the generation,
//! so reads within one frame are stable while mutations are visible
//! immediately.
//!
//! Relative declarations (`Before`, `After`, `Aligned`, `Relative`) read the
//! other widget's *current* value in a single pass; there is no ordering
//! solver. Declarations that would make a quantity depend on itself are
//! rejected when they are made (see `Screen::set_position`).

use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use super::geometry::{Axis, Dimension, Point};
use super::{Screen, WidgetId};
use crate::error::{GuiError, Result};

/// Zero-argument integer supplier for dynamic coordinates and extents.
pub type Supplier = Rc<dyn Fn() -> i32>;

/// One coordinate of a position, relative to the parent's origin.
#[derive(Clone)]
pub enum Coord {
    /// Literal offset.
    Fixed(i32),
    /// Parent's leading padding + spacing (left/top aligned).
    Start(i32),
    /// Parent extent − own extent − parent's trailing padding − spacing
    /// (right/bottom aligned).
    End(i32),
    /// Centered in the parent's inner area, + offset. Horizontal centering
    /// truncates the half; vertical centering rounds it up.
    Center(i32),
    /// Immediately before `other` (left of / above), separated by `spacing`.
    Before { other: WidgetId, spacing: i32 },
    /// Immediately after `other` (right of / below), separated by `spacing`.
    After { other: WidgetId, spacing: i32 },
    /// Same coordinate as `other`, + offset.
    Aligned { other: WidgetId, offset: i32 },
    /// Host-supplied function, re-evaluated once per frame.
    Dynamic(Supplier),
}

impl Coord {
    pub fn dynamic<F: Fn() -> i32 + 'static>(f: F) -> Coord {
        Coord::Dynamic(Rc::new(f))
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Fixed(v) => write!(f, "Fixed({v})"),
            Coord::Start(s) => write!(f, "Start({s})"),
            Coord::End(s) => write!(f, "End({s})"),
            Coord::Center(o) => write!(f, "Center({o})"),
            Coord::Before { other, spacing } => write!(f, "Before({other:?}, {spacing})"),
            Coord::After { other, spacing } => write!(f, "After({other:?}, {spacing})"),
            Coord::Aligned { other, offset } => write!(f, "Aligned({other:?}, {offset})"),
            Coord::Dynamic(_) => write!(f, "Dynamic"),
        }
    }
}

/// One extent (width or height) of a size.
#[derive(Clone)]
pub enum Extent {
    /// Literal extent.
    Fixed(i32),
    /// `fraction` of the parent's inner extent, + offset.
    Parent { fraction: f32, offset: i32 },
    /// `fraction` of `other`'s extent, + offset.
    Relative {
        other: WidgetId,
        fraction: f32,
        offset: i32,
    },
    /// Extent of the visible children's bounds, + own padding, + offset.
    Content { offset: i32 },
    /// Host-supplied function, re-evaluated once per frame.
    Dynamic(Supplier),
}

impl Extent {
    pub fn dynamic<F: Fn() -> i32 + 'static>(f: F) -> Extent {
        Extent::Dynamic(Rc::new(f))
    }

    /// Whole parent inner extent.
    pub fn fill() -> Extent {
        Extent::Parent {
            fraction: 1.0,
            offset: 0,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Extent::Content { .. })
    }
}

impl fmt::Debug for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Fixed(v) => write!(f, "Fixed({v})"),
            Extent::Parent { fraction, offset } => write!(f, "Parent({fraction}, {offset})"),
            Extent::Relative {
                other,
                fraction,
                offset,
            } => write!(f, "Relative({other:?}, {fraction}, {offset})"),
            Extent::Content { offset } => write!(f, "Content({offset})"),
            Extent::Dynamic(_) => write!(f, "Dynamic"),
        }
    }
}

/// Position declaration.
#[derive(Debug, Clone)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    /// Shared origin declaration; resolves without touching the cache.
    pub const ZERO: Position = Position {
        x: Coord::Fixed(0),
        y: Coord::Fixed(0),
    };

    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub fn fixed(x: i32, y: i32) -> Self {
        if x == 0 && y == 0 {
            return Position::ZERO;
        }
        Self::new(Coord::Fixed(x), Coord::Fixed(y))
    }

    pub fn builder() -> PositionBuilder {
        PositionBuilder::default()
    }

    pub fn is_zero(&self) -> bool {
        matches!((&self.x, &self.y), (Coord::Fixed(0), Coord::Fixed(0)))
    }

    pub(crate) fn coord(&self, axis: Axis) -> &Coord {
        match axis {
            Axis::Horizontal => &self.x,
            Axis::Vertical => &self.y,
        }
    }
}

/// Size declaration.
#[derive(Debug, Clone)]
pub struct Size {
    pub width: Extent,
    pub height: Extent,
}

impl Size {
    pub const ZERO: Size = Size {
        width: Extent::Fixed(0),
        height: Extent::Fixed(0),
    };

    pub fn new(width: Extent, height: Extent) -> Self {
        Self { width, height }
    }

    pub fn fixed(width: i32, height: i32) -> Self {
        if width == 0 && height == 0 {
            return Size::ZERO;
        }
        Self::new(Extent::Fixed(width), Extent::Fixed(height))
    }

    /// Sized to children's bounds on both axes.
    pub fn content() -> Self {
        Self::new(Extent::Content { offset: 0 }, Extent::Content { offset: 0 })
    }

    pub fn builder() -> SizeBuilder {
        SizeBuilder::default()
    }

    pub fn is_zero(&self) -> bool {
        matches!(
            (&self.width, &self.height),
            (Extent::Fixed(0), Extent::Fixed(0))
        )
    }

    pub fn is_content(&self) -> bool {
        self.width.is_content() || self.height.is_content()
    }

    pub(crate) fn extent(&self, axis: Axis) -> &Extent {
        match axis {
            Axis::Horizontal => &self.width,
            Axis::Vertical => &self.height,
        }
    }
}

/// Builder for [`Position`]. At least one axis must be given.
#[derive(Debug, Default)]
pub struct PositionBuilder {
    x: Option<Coord>,
    y: Option<Coord>,
}

impl PositionBuilder {
    pub fn x(mut self, x: Coord) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: Coord) -> Self {
        self.y = Some(y);
        self
    }

    pub fn left_aligned(self, spacing: i32) -> Self {
        self.x(Coord::Start(spacing))
    }

    pub fn right_aligned(self, spacing: i32) -> Self {
        self.x(Coord::End(spacing))
    }

    pub fn centered(self, offset: i32) -> Self {
        self.x(Coord::Center(offset))
    }

    pub fn top_aligned(self, spacing: i32) -> Self {
        self.y(Coord::Start(spacing))
    }

    pub fn bottom_aligned(self, spacing: i32) -> Self {
        self.y(Coord::End(spacing))
    }

    pub fn middle_aligned(self, offset: i32) -> Self {
        self.y(Coord::Center(offset))
    }

    pub fn left_of(self, other: WidgetId, spacing: i32) -> Self {
        self.x(Coord::Before { other, spacing })
    }

    pub fn right_of(self, other: WidgetId, spacing: i32) -> Self {
        self.x(Coord::After { other, spacing })
    }

    pub fn above(self, other: WidgetId, spacing: i32) -> Self {
        self.y(Coord::Before { other, spacing })
    }

    pub fn below(self, other: WidgetId, spacing: i32) -> Self {
        self.y(Coord::After { other, spacing })
    }

    pub fn build(self) -> Result<Position> {
        match (self.x, self.y) {
            (None, None) => Err(GuiError::MissingDimension {
                descriptor: "position",
            }),
            (x, y) => Ok(Position::new(
                x.unwrap_or(Coord::Fixed(0)),
                y.unwrap_or(Coord::Fixed(0)),
            )),
        }
    }
}

/// Builder for [`Size`]. At least one axis must be given.
#[derive(Debug, Default)]
pub struct SizeBuilder {
    width: Option<Extent>,
    height: Option<Extent>,
}

impl SizeBuilder {
    pub fn width(mut self, width: Extent) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: Extent) -> Self {
        self.height = Some(height);
        self
    }

    pub fn build(self) -> Result<Size> {
        match (self.width, self.height) {
            (None, None) => Err(GuiError::MissingDimension { descriptor: "size" }),
            (w, h) => Ok(Size::new(
                w.unwrap_or(Extent::Fixed(0)),
                h.unwrap_or(Extent::Fixed(0)),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-frame memoization
// ---------------------------------------------------------------------------

/// Cache key: host frame counter plus the tree's mutation generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stamp {
    pub frame: u64,
    pub generation: u64,
}

/// Single memoized value, valid for one stamp.
#[derive(Debug, Default)]
pub(crate) struct FrameCache<T: Copy + Default> {
    stamp: Cell<Option<Stamp>>,
    value: Cell<T>,
}

impl<T: Copy + Default> FrameCache<T> {
    pub fn get_or_compute(&self, stamp: Stamp, compute: impl FnOnce() -> T) -> T {
        if self.stamp.get() == Some(stamp) {
            return self.value.get();
        }
        let value = compute();
        self.value.set(value);
        self.stamp.set(Some(stamp));
        value
    }
}

/// Memoized geometry of one widget.
#[derive(Debug, Default)]
pub(crate) struct LayoutCache {
    pub position: FrameCache<Point>,
    pub size: FrameCache<Dimension>,
    pub screen_position: FrameCache<Point>,
    pub content: FrameCache<Dimension>,
}

// ---------------------------------------------------------------------------
// Dependency graph (cycle rejection)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Quantity {
    Position,
    Size,
}

impl Quantity {
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Position => "position",
            Quantity::Size => "size",
        }
    }
}

pub(crate) type LayoutRef = (WidgetId, Quantity);

type Deps = SmallVec<[LayoutRef; 8]>;

/// Half of `remaining` for centering. Horizontal truncates, vertical rounds up.
fn half(remaining: i32, axis: Axis) -> i32 {
    match axis {
        Axis::Horizontal => remaining / 2,
        Axis::Vertical => (remaining + 1).div_euclid(2),
    }
}

impl Screen {
    pub(crate) fn stamp(&self) -> Stamp {
        Stamp {
            frame: self.frame,
            generation: self.generation,
        }
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Local position relative to the parent's origin. 0,0 for unknown ids.
    pub fn position(&self, id: WidgetId) -> Point {
        let Some(node) = self.arena.get(id) else {
            return Point::ZERO;
        };
        if node.position.is_zero() {
            return Point::ZERO;
        }
        node.cache.position.get_or_compute(self.stamp(), || {
            Point::new(
                self.eval_coord(id, Axis::Horizontal, &node.position.x),
                self.eval_coord(id, Axis::Vertical, &node.position.y),
            )
        })
    }

    /// Outer size. 0x0 for unknown ids.
    pub fn size(&self, id: WidgetId) -> Dimension {
        let Some(node) = self.arena.get(id) else {
            return Dimension::ZERO;
        };
        if node.size.is_zero() {
            return Dimension::ZERO;
        }
        node.cache.size.get_or_compute(self.stamp(), || {
            Dimension::new(
                self.eval_extent(id, Axis::Horizontal, &node.size.width),
                self.eval_extent(id, Axis::Vertical, &node.size.height),
            )
        })
    }

    /// Size minus padding minus the thickness of any visible scrollbar.
    pub fn inner_size(&self, id: WidgetId) -> Dimension {
        let Some(node) = self.arena.get(id) else {
            return Dimension::ZERO;
        };
        let size = self.size(id);
        let reserved = self.scrollbar_reservation(id);
        Dimension::new(
            size.width - node.padding.horizontal() - reserved.width,
            size.height - node.padding.vertical() - reserved.height,
        )
    }

    /// Bounds of the visible ordinary children, measured from the inner
    /// origin (far edges minus leading padding). Controls never count.
    pub fn content_size(&self, id: WidgetId) -> Dimension {
        let Some(node) = self.arena.get(id) else {
            return Dimension::ZERO;
        };
        node.cache.content.get_or_compute(self.stamp(), || {
            let mut far_x = 0;
            let mut far_y = 0;
            for &child in &node.children {
                let Some(child_node) = self.arena.get(child) else {
                    continue;
                };
                if !child_node.visible {
                    continue;
                }
                let pos = self.position(child);
                let size = self.size(child);
                far_x = far_x.max(pos.x + size.width);
                far_y = far_y.max(pos.y + size.height);
            }
            Dimension::new(
                (far_x - node.padding.left).max(0),
                (far_y - node.padding.top).max(0),
            )
        })
    }

    /// Absolute position: local + parent's screen position + parent's scroll
    /// translation (unless this widget is fixed).
    pub fn screen_position(&self, id: WidgetId) -> Point {
        let Some(node) = self.arena.get(id) else {
            return Point::ZERO;
        };
        node.cache.screen_position.get_or_compute(self.stamp(), || {
            let local = self.position(id);
            let Some(parent) = node.parent else {
                return local;
            };
            let mut pos = self.screen_position(parent).plus(local);
            if !node.fixed {
                pos = pos.plus(self.scroll_translation(parent));
            }
            pos
        })
    }

    fn eval_coord(&self, id: WidgetId, axis: Axis, coord: &Coord) -> i32 {
        let parent = self.arena.get(id).and_then(|n| n.parent);
        match coord {
            Coord::Fixed(v) => *v,
            Coord::Start(spacing) => parent
                .and_then(|p| self.arena.get(p))
                .map_or(0, |p| p.padding.start(axis) + spacing),
            Coord::End(spacing) => parent.map_or(0, |p| {
                let pad = self.arena.get(p).map_or(0, |n| n.padding.end(axis));
                self.size(p).along(axis) - self.size(id).along(axis) - pad - spacing
            }),
            Coord::Center(offset) => parent.map_or(0, |p| {
                let pad = self.arena.get(p).map_or(0, |n| n.padding.start(axis));
                let remaining = self.inner_size(p).along(axis) - self.size(id).along(axis);
                pad + half(remaining, axis) + offset
            }),
            Coord::Before { other, spacing } => {
                if !self.arena.contains_key(*other) {
                    return 0;
                }
                self.position(*other).along(axis) - self.size(id).along(axis) - spacing
            }
            Coord::After { other, spacing } => {
                if !self.arena.contains_key(*other) {
                    return 0;
                }
                self.position(*other).along(axis) + self.size(*other).along(axis) + spacing
            }
            Coord::Aligned { other, offset } => {
                if !self.arena.contains_key(*other) {
                    return 0;
                }
                self.position(*other).along(axis) + offset
            }
            Coord::Dynamic(supplier) => supplier(),
        }
    }

    fn eval_extent(&self, id: WidgetId, axis: Axis, extent: &Extent) -> i32 {
        match extent {
            Extent::Fixed(v) => *v,
            Extent::Parent { fraction, offset } => {
                let parent = self.arena.get(id).and_then(|n| n.parent);
                parent.map_or(0, |p| {
                    (self.inner_size(p).along(axis) as f32 * fraction) as i32 + offset
                })
            }
            Extent::Relative {
                other,
                fraction,
                offset,
            } => {
                if !self.arena.contains_key(*other) {
                    return 0;
                }
                (self.size(*other).along(axis) as f32 * fraction) as i32 + offset
            }
            Extent::Content { offset } => {
                let pad = self.arena.get(id).map_or(0, |n| n.padding.total(axis));
                self.content_size(id).along(axis) + pad + offset
            }
            Extent::Dynamic(supplier) => supplier(),
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Replace a widget's position declaration.
    ///
    /// Fails with `CyclicLayout` (keeping the previous declaration) if the
    /// new one would make the position depend on itself. Both axes are
    /// evaluated and cached together, so dependencies are tracked per widget:
    /// `a.x` after `b` plus `b.y` after `a` is a cycle even though no single
    /// axis reads itself.
    pub fn set_position(&mut self, id: WidgetId, position: Position) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        let previous = std::mem::replace(&mut node.position, position);
        if self.creates_cycle((id, Quantity::Position)) {
            if let Some(node) = self.arena.get_mut(id) {
                node.position = previous;
            }
            log::warn!("rejected cyclic position for {:?}", id);
            return Err(GuiError::CyclicLayout {
                id,
                quantity: Quantity::Position.name(),
            });
        }
        self.geometry_changed(id);
        Ok(())
    }

    /// Replace a widget's size declaration.
    ///
    /// Posts `SpaceChange` first; returns `Ok(false)` if a listener cancelled
    /// it, in which case the previous declaration is kept.
    pub fn set_size(&mut self, id: WidgetId, size: Size) -> Result<bool> {
        let old = self.size(id);
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        let previous = std::mem::replace(&mut node.size, size);
        if self.creates_cycle((id, Quantity::Size)) {
            if let Some(node) = self.arena.get_mut(id) {
                node.size = previous;
            }
            log::warn!("rejected cyclic size for {:?}", id);
            return Err(GuiError::CyclicLayout {
                id,
                quantity: Quantity::Size.name(),
            });
        }
        self.generation += 1;
        let new = self.size(id);
        if !self.post(id, super::events::ComponentEvent::SpaceChange { old, new }) {
            if let Some(node) = self.arena.get_mut(id) {
                node.size = previous;
            }
            self.generation += 1;
            return Ok(false);
        }
        self.geometry_changed(id);
        self.refresh_scrollbars(id);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Dependency graph
    // ------------------------------------------------------------------

    /// Quantities `of` reads when evaluated. Dynamic suppliers are opaque
    /// and contribute nothing.
    pub(crate) fn layout_deps(&self, of: LayoutRef) -> Deps {
        let mut deps = Deps::new();
        let (id, quantity) = of;
        let Some(node) = self.arena.get(id) else {
            return deps;
        };
        match quantity {
            Quantity::Position => {
                for axis in [Axis::Horizontal, Axis::Vertical] {
                    match node.position.coord(axis) {
                        Coord::Fixed(_) | Coord::Start(_) | Coord::Dynamic(_) => {}
                        Coord::End(_) | Coord::Center(_) => {
                            if let Some(p) = node.parent {
                                deps.push((p, Quantity::Size));
                            }
                            deps.push((id, Quantity::Size));
                        }
                        Coord::Before { other, .. } => {
                            deps.push((*other, Quantity::Position));
                            deps.push((id, Quantity::Size));
                        }
                        Coord::After { other, .. } => {
                            deps.push((*other, Quantity::Position));
                            deps.push((*other, Quantity::Size));
                        }
                        Coord::Aligned { other, .. } => deps.push((*other, Quantity::Position)),
                    }
                }
            }
            Quantity::Size => {
                for axis in [Axis::Horizontal, Axis::Vertical] {
                    match node.size.extent(axis) {
                        Extent::Fixed(_) | Extent::Dynamic(_) => {}
                        Extent::Parent { .. } => {
                            if let Some(p) = node.parent {
                                deps.push((p, Quantity::Size));
                            }
                        }
                        Extent::Relative { other, .. } => deps.push((*other, Quantity::Size)),
                        Extent::Content { .. } => {
                            for &child in &node.children {
                                deps.push((child, Quantity::Position));
                                deps.push((child, Quantity::Size));
                            }
                        }
                    }
                }
            }
        }
        deps
    }

    /// True if `start` is reachable from its own dependencies.
    pub(crate) fn creates_cycle(&self, start: LayoutRef) -> bool {
        let mut visited: HashSet<LayoutRef> = HashSet::new();
        let mut stack: Vec<LayoutRef> = self.layout_deps(start).into_vec();
        while let Some(current) = stack.pop() {
            if current == start {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.extend(self.layout_deps(current));
        }
        false
    }

    /// Widgets whose declarations reference ids no longer in the tree.
    pub(crate) fn dangling_references(&self) -> Vec<WidgetId> {
        self.arena
            .keys()
            .filter(|&id| {
                [Quantity::Position, Quantity::Size].into_iter().any(|q| {
                    self.layout_deps((id, q))
                        .iter()
                        .any(|(dep, _)| !self.arena.contains_key(*dep))
                })
            })
            .collect()
    }
}

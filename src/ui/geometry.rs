//! Integer geometry primitives: points, dimensions, padding and clip areas.
//!
//! All coordinates are screen pixels. `ClipArea` carries two sentinel
//! states (`NoClip`, `FullClip`) so downstream code never has to
//! special-case empty or unbounded rectangles.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A resolved (x, y) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Shared origin. `plus`/`minus` short-circuit on it.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn plus(self, other: Point) -> Point {
        if other == Point::ZERO {
            return self;
        }
        if self == Point::ZERO {
            return other;
        }
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn minus(self, other: Point) -> Point {
        if other == Point::ZERO {
            return self;
        }
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Coordinate along one axis.
    pub fn along(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.plus(rhs)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.minus(rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// A resolved (width, height) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn plus(self, other: Dimension) -> Dimension {
        if other == Dimension::ZERO {
            return self;
        }
        Dimension::new(self.width + other.width, self.height + other.height)
    }

    pub fn minus(self, other: Dimension) -> Dimension {
        if other == Dimension::ZERO {
            return self;
        }
        Dimension::new(self.width - other.width, self.height - other.height)
    }

    /// Extent along one axis.
    pub fn along(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Four-sided inset (left, top, right, bottom).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Padding {
    pub const ZERO: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn all(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    pub const fn symmetric(horizontal: i32, vertical: i32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Leading inset along an axis (left or top).
    pub fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Trailing inset along an axis (right or bottom).
    pub fn end(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    pub fn total(&self, axis: Axis) -> i32 {
        self.start(axis) + self.end(axis)
    }
}

/// Screen rectangle outside of which rendering and hit-testing are suppressed.
///
/// `Area` is only ever constructed through [`ClipArea::new`], which collapses
/// any rectangle without strictly positive width and height to `FullClip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipArea {
    /// Content is not clipped at all.
    NoClip,
    /// Nothing is visible.
    FullClip,
    /// Half-open rectangle `[x, x2) × [y, y2)`.
    Area { x: i32, y: i32, x2: i32, y2: i32 },
}

impl ClipArea {
    pub fn new(x: i32, y: i32, x2: i32, y2: i32) -> ClipArea {
        if x2 - x <= 0 || y2 - y <= 0 {
            return ClipArea::FullClip;
        }
        ClipArea::Area { x, y, x2, y2 }
    }

    /// Rectangle from an origin and a dimension.
    pub fn from_origin(origin: Point, size: Dimension) -> ClipArea {
        ClipArea::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    /// Intersect two areas. `NoClip` is the identity, `FullClip` absorbs.
    pub fn intersect(self, other: ClipArea) -> ClipArea {
        match (self, other) {
            (ClipArea::FullClip, _) | (_, ClipArea::FullClip) => ClipArea::FullClip,
            (ClipArea::NoClip, o) => o,
            (s, ClipArea::NoClip) => s,
            (
                ClipArea::Area { x, y, x2, y2 },
                ClipArea::Area {
                    x: ox,
                    y: oy,
                    x2: ox2,
                    y2: oy2,
                },
            ) => ClipArea::new(x.max(ox), y.max(oy), x2.min(ox2), y2.min(oy2)),
        }
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        match *self {
            ClipArea::NoClip => true,
            ClipArea::FullClip => false,
            ClipArea::Area { x, y, x2, y2 } => px >= x && px < x2 && py >= y && py < y2,
        }
    }

    /// True if `self` lies entirely within `other`.
    pub fn is_within(&self, other: &ClipArea) -> bool {
        match (*self, *other) {
            (ClipArea::FullClip, _) | (_, ClipArea::NoClip) => true,
            (ClipArea::NoClip, _) | (_, ClipArea::FullClip) => false,
            (
                ClipArea::Area { x, y, x2, y2 },
                ClipArea::Area {
                    x: ox,
                    y: oy,
                    x2: ox2,
                    y2: oy2,
                },
            ) => x >= ox && y >= oy && x2 <= ox2 && y2 <= oy2,
        }
    }

    pub fn is_full_clip(&self) -> bool {
        matches!(self, ClipArea::FullClip)
    }

    pub fn is_no_clip(&self) -> bool {
        matches!(self, ClipArea::NoClip)
    }
}

//! Rectangle math for comment placement.
//!
//! Edge comparisons here are deliberately asymmetric: [`intersects`] treats
//! touching edges as overlapping, while [`contains`] requires the inner
//! rectangle to sit strictly inside on all four sides.

use serde::{Deserialize, Serialize};

/// A point on the canvas, in canvas (not screen) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset by a delta.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle stored by its edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// Per-side padding added around a bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margin {
    pub const fn new(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

impl From<f64> for Margin {
    fn from(v: f64) -> Self {
        Margin::uniform(v)
    }
}

/// Union rectangle of a set of members, already expanded by a margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub rect: Rect,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn left(&self) -> f64 {
        self.rect.left
    }

    pub fn top(&self) -> f64 {
        self.rect.top
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }
}

/// True unless `b` is disjoint from `a` on either axis. Touching edges count.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    !(b.left > a.right || b.right < a.left || b.top > a.bottom || b.bottom < a.top)
}

/// True iff `b` lies strictly inside `a`. An exact fit is not contained.
pub fn contains(a: &Rect, b: &Rect) -> bool {
    b.left > a.left && b.right < a.right && b.top > a.top && b.bottom < a.bottom
}

/// Union of `rects` expanded by `margin`, or `None` for an empty input.
pub fn bounding_box<I>(rects: I, margin: impl Into<Margin>) -> Option<BoundingBox>
where
    I: IntoIterator<Item = Rect>,
{
    let margin = margin.into();
    let mut iter = rects.into_iter();
    let first = iter.next()?;
    let union = iter.fold(first, |acc, r| {
        Rect::new(
            acc.left.min(r.left),
            acc.top.min(r.top),
            acc.right.max(r.right),
            acc.bottom.max(r.bottom),
        )
    });

    let rect = Rect::new(
        union.left - margin.left,
        union.top - margin.top,
        union.right + margin.right,
        union.bottom + margin.bottom,
    );
    Some(BoundingBox {
        rect,
        width: (rect.right - rect.left).abs(),
        height: (rect.bottom - rect.top).abs(),
    })
}

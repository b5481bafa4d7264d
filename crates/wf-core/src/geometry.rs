//! Canvas geometry.

use crate::error::{CoreError, CoreResult};

/// Point on the canvas (or on screen, depending on context).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Reject NaN/inf coordinates before they reach the graph.
    pub fn ensure_finite(self) -> CoreResult<Self> {
        for (what, value) in [("x", self.x), ("y", self.y)] {
            if !value.is_finite() {
                return Err(CoreError::NonFinite { what, value });
            }
        }
        Ok(self)
    }
}

/// Rendered size of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Position,
    pub max: Position,
}

impl Rect {
    pub fn from_origin_size(origin: Position, size: Size) -> Self {
        Self {
            min: origin,
            max: origin.translate(size.width, size.height),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn union(self, other: Rect) -> Rect {
        Rect {
            min: Position::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Position::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn expand(self, padding: f64) -> Rect {
        Rect {
            min: self.min.translate(-padding, -padding),
            max: self.max.translate(padding, padding),
        }
    }

    /// Smallest rectangle containing all given rectangles.
    pub fn bounding<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
        rects.into_iter().reduce(Rect::union)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn union_contains_both(
            ax in -1e6_f64..1e6, ay in -1e6_f64..1e6,
            bx in -1e6_f64..1e6, by in -1e6_f64..1e6,
            w in 0.0_f64..500.0, h in 0.0_f64..500.0,
        ) {
            let a = Rect::from_origin_size(Position::new(ax, ay), Size::new(w, h));
            let b = Rect::from_origin_size(Position::new(bx, by), Size::new(h, w));
            let u = a.union(b);
            prop_assert!(u.min.x <= a.min.x && u.min.x <= b.min.x);
            prop_assert!(u.max.y >= a.max.y && u.max.y >= b.max.y);
        }
    }
}

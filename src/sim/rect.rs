//! Axis-aligned rectangle shared by every entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in logical playfield coordinates.
///
/// `pos` is the top-left corner; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Shrink the box by `amount` on every side.
    ///
    /// Boxes smaller than `2 * amount` come out with negative extents, which
    /// never overlap anything.
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            pos: self.pos + Vec2::splat(amount),
            size: self.size - Vec2::splat(2.0 * amount),
        }
    }

    /// Strict overlap on both axes; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

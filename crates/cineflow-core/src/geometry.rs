//! Geometric primitives for the canvas.

use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector / point.
pub type Vec2 = GlamVec2;

/// Width and height in pixels or logical units. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size, clamping negative or NaN components to zero.
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Area of the size.
    #[inline]
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// Whether either dimension is zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width divided by height, or `None` for an empty size.
    pub fn aspect(self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.width / self.height)
        }
    }

    /// Size as a vector.
    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

fn non_negative(v: f32) -> f32 {
    if v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner (bottom-right).
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Size of the rectangle.
    #[inline]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Center a rectangle of `size` inside this one.
    pub fn centered(self, size: Size) -> Self {
        Self::new(
            self.x + (self.width - size.width) * 0.5,
            self.y + (self.height - size.height) * 0.5,
            size.width,
            size.height,
        )
    }
}

//! Geometry and color value types shared by the model, reflow engine, and hit testing.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as edges, matching the persisted `{left,top,right,bottom}` shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Grows the right/bottom edges so the rectangle is at least `min_w` by `min_h`.
    pub fn clamped_min(self, min_w: f32, min_h: f32) -> Self {
        Self {
            right: self.right.max(self.left + min_w),
            bottom: self.bottom.max(self.top + min_h),
            ..self
        }
    }

    /// Inclusive containment test, matching pointer hit testing on zone and icon edges.
    pub fn contains(&self, point: PointerPosition) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Returns this rectangle translated from zone-local to absolute coordinates.
    pub fn to_absolute(self, origin: &Rect) -> Self {
        self.offset(origin.left, origin.top)
    }

    /// Returns a square of side `size` centered on `(cx, cy)`.
    pub fn centered_square(cx: f32, cy: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(cx - half, cy - half, cx + half, cy + half)
    }
}

/// RGBA color with float channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `true` when the alpha channel disables the color entirely.
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Clamps every channel into `0.0..=1.0`; non-finite channels become `0.0`.
    pub fn clamped(self) -> Self {
        fn channel(value: f32) -> f32 {
            if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: channel(self.a),
        }
    }
}

/// Pointer position in the overlay window's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

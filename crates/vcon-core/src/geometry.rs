#![forbid(unsafe_code)]

//! Pixel-space geometry.
//!
//! Surfaces scroll, so rectangles are routinely positioned at negative
//! coordinates or partly outside the surface they are drawn into. [`PixelRect`]
//! therefore uses signed origins, and clipping against a concrete surface is
//! an explicit step ([`PixelRect::clip`]).

/// A rectangle in signed pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The part of a [`PixelRect`] that lands inside a surface.
///
/// Bounds are half-open: `x0..x1`, `y0..y1`, all within the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl ClipBox {
    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> u64 {
        (self.x1 - self.x0) as u64 * (self.y1 - self.y0) as u64
    }
}

impl PixelRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive), widened so it cannot overflow.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive), widened so it cannot overflow.
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && (x as i64) < self.right() && y >= self.y && (y as i64) < self.bottom()
    }

    /// Move the rectangle, saturating at the `i32` range.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Intersect with a `width` x `height` surface anchored at the origin.
    ///
    /// Returns `None` when nothing of the rectangle is visible there.
    pub fn clip(&self, width: u32, height: u32) -> Option<ClipBox> {
        let x0 = i64::from(self.x).max(0);
        let y0 = i64::from(self.y).max(0);
        let x1 = self.right().min(i64::from(width));
        let y1 = self.bottom().min(i64::from(height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        // All four values are now within 0..=u32::MAX.
        Some(ClipBox {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }
}

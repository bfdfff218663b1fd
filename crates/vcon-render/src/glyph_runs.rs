#![forbid(unsafe_code)]

//! Bitmap → rectangle-run encoder.
//!
//! Glyphs are painted as a handful of filled rectangles instead of per-pixel
//! writes. The decomposition is greedy, not a minimal tiling:
//!
//! 1. Find the first lit pixel scanning rows top-to-bottom and columns from
//!    the least-significant bit up.
//! 2. Extend it right while pixels stay lit, giving the run width.
//! 3. Extend that exact column mask down while the next row contains all of
//!    it, clearing the mask from every consumed row (the seed row included).
//! 4. Emit `(left, top, width, height)`, shifted left by `scale`.
//! 5. Restart from the top until a full scan finds nothing.
//!
//! Cleared pixels can never seed another rectangle, so the output never
//! overlaps and covers exactly the lit pixels. Scan order makes the output
//! deterministic.

use crate::bitmap::GlyphBitmap;

/// Largest supported coordinate shift.
pub const MAX_SCALE: u32 = 8;

/// One filled rectangle of a glyph run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl RunRect {
    #[inline]
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Every coordinate shifted left by `scale`.
    #[inline]
    #[must_use]
    pub const fn scaled(self, scale: u32) -> Self {
        Self {
            left: self.left << scale,
            top: self.top << scale,
            width: self.width << scale,
            height: self.height << scale,
        }
    }

    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }

    #[inline]
    pub const fn area(&self) -> u32 {
        self.width * self.height
    }
}

/// Encoder output for one bitmap, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GlyphRun {
    rects: Vec<RunRect>,
}

impl GlyphRun {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_rects(rects: Vec<RunRect>) -> Self {
        Self { rects }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RunRect> {
        self.rects.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[RunRect] {
        &self.rects
    }

    #[must_use]
    pub fn into_rects(self) -> Vec<RunRect> {
        self.rects
    }

    /// Total pixels covered (rectangles never overlap).
    #[must_use]
    pub fn area(&self) -> u32 {
        self.rects.iter().map(RunRect::area).sum()
    }
}

impl<'a> IntoIterator for &'a GlyphRun {
    type Item = &'a RunRect;
    type IntoIter = std::slice::Iter<'a, RunRect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

/// Encode `bitmap` into a fresh run.
///
/// # Panics
///
/// Panics if `scale > MAX_SCALE`.
#[must_use]
pub fn encode(bitmap: &GlyphBitmap, scale: u32) -> GlyphRun {
    let mut rects = Vec::new();
    encode_into(bitmap, scale, &mut rects);
    GlyphRun { rects }
}

/// Append the run for `bitmap` to `out`, letting hot callers reuse one buffer.
///
/// # Panics
///
/// Panics if `scale > MAX_SCALE`.
pub fn encode_into(bitmap: &GlyphBitmap, scale: u32, out: &mut Vec<RunRect>) {
    assert!(
        scale <= MAX_SCALE,
        "glyph scale {scale} exceeds MAX_SCALE ({MAX_SCALE})"
    );
    let n = bitmap.size().pixels();
    let mut work = [0u16; 16];
    work[..n].copy_from_slice(bitmap.rows());
    let work = &mut work[..n];

    while let Some((top, left)) = first_lit(work) {
        let seed = work[top];
        let mut width = 1;
        while left + width < n && seed & (1 << (left + width)) != 0 {
            width += 1;
        }

        let mask = column_mask(left, width);
        work[top] &= !mask;
        let mut height = 1;
        while top + height < n && work[top + height] & mask == mask {
            work[top + height] &= !mask;
            height += 1;
        }

        out.push(RunRect::new(left as u32, top as u32, width as u32, height as u32).scaled(scale));
    }
}

/// First lit pixel as `(row, col)`.
#[inline]
fn first_lit(rows: &[u16]) -> Option<(usize, usize)> {
    rows.iter()
        .position(|bits| *bits != 0)
        .map(|row| (row, rows[row].trailing_zeros() as usize))
}

/// Bits `left..left + width`.
#[inline]
fn column_mask(left: usize, width: usize) -> u16 {
    (((1u32 << width) - 1) << left) as u16
}

#![forbid(unsafe_code)]

//! Fixed-size 1-bit glyph bitmaps.
//!
//! A bitmap is N rows of N pixels, N in {8, 16}. Each row is stored as an
//! integer whose bit `i` is the pixel in column `i`: the least-significant bit
//! is the **leftmost** column. So `0x0f` lights the four left pixels of a row.

use std::fmt;

/// Supported glyph edge lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphSize {
    Eight,
    Sixteen,
}

impl GlyphSize {
    /// Edge length in pixels.
    #[inline]
    pub const fn pixels(self) -> usize {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    /// Row bits that may be set.
    #[inline]
    pub const fn row_mask(self) -> u16 {
        match self {
            Self::Eight => 0x00FF,
            Self::Sixteen => 0xFFFF,
        }
    }

    #[must_use]
    pub const fn from_pixels(pixels: usize) -> Option<Self> {
        match pixels {
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }
}

/// An immutable N x N 1-bit bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphBitmap {
    size: GlyphSize,
    rows: [u16; 16],
}

impl GlyphBitmap {
    /// Build a bitmap from exactly `size` rows.
    pub fn new(size: GlyphSize, rows: &[u16]) -> Result<Self, BitmapError> {
        let n = size.pixels();
        if rows.len() != n {
            return Err(BitmapError::RowCount {
                expected: n,
                actual: rows.len(),
            });
        }
        let mask = size.row_mask();
        if let Some((row, &bits)) = rows.iter().enumerate().find(|(_, bits)| **bits & !mask != 0) {
            return Err(BitmapError::StrayBits { row, bits });
        }
        let mut stored = [0u16; 16];
        stored[..n].copy_from_slice(rows);
        Ok(Self { size, rows: stored })
    }

    /// Build an 8x8 bitmap; byte rows cannot carry stray bits.
    #[must_use]
    pub const fn from_rows8(rows: [u8; 8]) -> Self {
        let mut stored = [0u16; 16];
        let mut i = 0;
        while i < 8 {
            stored[i] = rows[i] as u16;
            i += 1;
        }
        Self {
            size: GlyphSize::Eight,
            rows: stored,
        }
    }

    /// Build a 16x16 bitmap; every `u16` row is in range.
    #[must_use]
    pub const fn from_rows16(rows: [u16; 16]) -> Self {
        Self {
            size: GlyphSize::Sixteen,
            rows,
        }
    }

    #[inline]
    pub const fn size(&self) -> GlyphSize {
        self.size
    }

    /// The `size` rows, top to bottom.
    #[inline]
    pub fn rows(&self) -> &[u16] {
        &self.rows[..self.size.pixels()]
    }

    /// Pixel at `(col, row)`; out-of-range reads are unset.
    #[inline]
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        let n = self.size.pixels();
        col < n && row < n && self.rows[row] & (1 << col) != 0
    }

    /// Number of lit pixels.
    #[must_use]
    pub fn filled(&self) -> u32 {
        self.rows().iter().map(|row| row.count_ones()).sum()
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.rows().iter().all(|row| *row == 0)
    }
}

/// Malformed bitmap input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    /// Row count differs from the glyph size.
    RowCount { expected: usize, actual: usize },
    /// A row has bits set at or beyond the glyph width.
    StrayBits { row: usize, bits: u16 },
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowCount { expected, actual } => {
                write!(f, "bitmap needs {expected} rows, got {actual}")
            }
            Self::StrayBits { row, bits } => {
                write!(f, "row {row} has bits outside the glyph: {bits:#06x}")
            }
        }
    }
}

impl std::error::Error for BitmapError {}

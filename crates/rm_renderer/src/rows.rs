//! Row-based work distribution.
//!
//! Workers pull row indices from a shared counter until the image is
//! exhausted, so threads that land on cheap rows (mostly sky) simply take
//! more of them. Each worker keeps its finished rows locally; they are
//! merged into the output image after every worker has returned.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::{Image, Rgb8};

/// Shared source of row indices for one render.
#[derive(Debug)]
pub struct RowQueue {
    next: AtomicU32,
    height: u32,
}

impl RowQueue {
    /// Create a queue handing out rows `0..height`.
    pub fn new(height: u32) -> Self {
        Self {
            next: AtomicU32::new(0),
            height,
        }
    }

    /// Claim the next unrendered row, or `None` once all rows are taken.
    ///
    /// Every row is returned exactly once across all callers.
    pub fn next_row(&self) -> Option<u32> {
        let row = self.next.fetch_add(1, Ordering::Relaxed);
        (row < self.height).then_some(row)
    }
}

/// A finished row, tagged with its position in the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult {
    /// Row index, 0 = top
    pub y: u32,
    /// Tone-mapped pixels, left to right
    pub pixels: Vec<Rgb8>,
}

impl RowResult {
    /// Create a new row result.
    pub fn new(y: u32, pixels: Vec<Rgb8>) -> Self {
        Self { y, pixels }
    }
}

/// Merge finished rows into a fresh image.
///
/// Rows may arrive in any order; rows never produced stay black.
pub fn assemble(width: u32, height: u32, rows: impl IntoIterator<Item = RowResult>) -> Image {
    let mut image = Image::new(width, height);
    for row in rows {
        image.write_row(row.y, &row.pixels);
    }
    image
}

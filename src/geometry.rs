//! Mapping between screen pixels and grid cells.
//!
//! Cell (row, col) covers the pixel rectangle whose top-left corner is
//! `(origin_x + col * cell_width, origin_y + row * cell_height)`.

use crate::error::PuzzleError;
use crate::grid::{MAX_ACROSS, MAX_DOWN};

/// Pixel placement of the grid on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub origin_x: i32,
    pub origin_y: i32,
    pub cell_width: u8,
    pub cell_height: u8,
}

impl Geometry {
    /// Creates a geometry, rejecting zero-sized cells.
    ///
    /// The origin must leave room for a full 32x32 grid of cells plus one
    /// cell of travel, so every pixel the engine computes fits in `i32`.
    pub fn new(origin_x: i32, origin_y: i32, cell_width: u8, cell_height: u8) -> Result<Self, PuzzleError> {
        if cell_width == 0 || cell_height == 0 {
            return Err(PuzzleError::BadGeometry {
                width: cell_width,
                height: cell_height,
            });
        }
        let fits = |origin: i32, cells: usize, size: u8| {
            origin.checked_add(cells as i32 * i32::from(size)).is_some()
        };
        if !fits(origin_x, MAX_ACROSS, cell_width) || !fits(origin_y, MAX_DOWN, cell_height) {
            return Err(PuzzleError::OriginOutOfRange {
                x: origin_x,
                y: origin_y,
            });
        }
        Ok(Self {
            origin_x,
            origin_y,
            cell_width,
            cell_height,
        })
    }

    /// Resolves a pixel to the (row, col) it falls in.
    ///
    /// Returns `None` left of or above the origin, or past `across`/`down`.
    pub fn cell_at_pixel(&self, x: i32, y: i32, across: usize, down: usize) -> Option<(usize, usize)> {
        let dx = x.checked_sub(self.origin_x)?;
        let dy = y.checked_sub(self.origin_y)?;
        if dx < 0 || dy < 0 {
            return None;
        }
        let col = (dx / i32::from(self.cell_width)) as usize;
        let row = (dy / i32::from(self.cell_height)) as usize;
        (col < across && row < down).then_some((row, col))
    }

    /// Top-left pixel of a cell.
    #[inline]
    pub fn cell_origin(&self, row: usize, col: usize) -> (i32, i32) {
        (
            self.origin_x
                .saturating_add(col as i32 * i32::from(self.cell_width)),
            self.origin_y
                .saturating_add(row as i32 * i32::from(self.cell_height)),
        )
    }
}

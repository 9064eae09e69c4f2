//! Display space ↔ cell space.
//!
//! Display space: pixels, origin top-left, `+Y` down.
//! Cell space: cells, origin bottom-left, `+Y` up.

use crate::error::{LifeError, Result};
use crate::grid::GridSize;

/// Visible output size in display pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ViewSize {
    pub width: u32,
    pub height: u32,
}

impl ViewSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Grid size for `scale` display pixels per cell.
    ///
    /// Rejects zero sizes and views not evenly divisible by `scale`.
    pub fn grid_size(self, scale: u32) -> Result<GridSize> {
        let invalid = LifeError::InvalidDimensions {
            view_width: self.width,
            view_height: self.height,
            scale,
        };
        if scale == 0 || self.width == 0 || self.height == 0 {
            return Err(invalid);
        }
        if self.width % scale != 0 || self.height % scale != 0 {
            return Err(invalid);
        }
        Ok(GridSize::new(self.width / scale, self.height / scale))
    }
}

/// A cell coordinate that may lie outside the grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

/// Maps display positions onto cells for a fixed grid and scale.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CellMapper {
    scale: u32,
    grid: GridSize,
}

impl CellMapper {
    pub fn new(grid: GridSize, scale: u32) -> Self {
        Self {
            scale: scale.max(1),
            grid,
        }
    }

    /// Floors `px / scale` and flips the vertical axis.
    ///
    /// Positions left of or above the view yield negative coordinates; the
    /// result is not clamped.
    pub fn display_to_cell(&self, px: f32, py: f32) -> CellCoord {
        let scale = self.scale as i32;
        let view_height = (self.grid.height * self.scale) as i32;
        let px = px.floor() as i32;
        let py = py.floor() as i32;
        CellCoord {
            x: px.div_euclid(scale),
            y: (view_height - 1 - py).div_euclid(scale),
        }
    }
}

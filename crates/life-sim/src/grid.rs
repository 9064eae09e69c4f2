use crate::error::{LifeError, Result};

/// Grid dimensions in cells.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Row-major index of an in-range cell.
    #[inline]
    pub fn index(self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Validates a signed coordinate and returns it unsigned.
    pub fn check(self, x: i32, y: i32) -> Result<(u32, u32)> {
        if self.contains(x, y) {
            Ok((x as u32, y as u32))
        } else {
            Err(LifeError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Maps any signed coordinate onto the torus.
    #[inline]
    pub fn wrap(self, x: i64, y: i64) -> (u32, u32) {
        (
            x.rem_euclid(self.width as i64) as u32,
            y.rem_euclid(self.height as i64) as u32,
        )
    }

    pub(crate) fn expect_len(self, actual: usize) -> Result<()> {
        let expected = self.cell_count();
        if actual == expected {
            Ok(())
        } else {
            Err(LifeError::SizeMismatch { expected, actual })
        }
    }
}

/// Dense cell storage, one byte per cell (`0` dead, `1` alive).
///
/// Row-major with row `y = 0` first. The display places row 0 at the bottom.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates an all-dead grid.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![0; size.cell_count()],
        }
    }

    /// Builds a grid from bytes; any nonzero byte is alive.
    pub fn from_cells(size: GridSize, cells: &[u8]) -> Result<Self> {
        let mut grid = Self::new(size);
        grid.load(cells)?;
        Ok(grid)
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.cells[self.size.index(x, y)] != 0
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, alive: bool) {
        let i = self.size.index(x, y);
        self.cells[i] = alive as u8;
    }

    /// Reads a cell with toroidal wraparound.
    #[inline]
    pub fn get_wrapped(&self, x: i64, y: i64) -> bool {
        let (x, y) = self.size.wrap(x, y);
        self.get(x, y)
    }

    /// Overwrites every cell. Length must match the cell count.
    pub fn load(&mut self, cells: &[u8]) -> Result<()> {
        self.size.expect_len(cells.len())?;
        for (dst, &src) in self.cells.iter_mut().zip(cells) {
            *dst = (src != 0) as u8;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let s = GridSize::new(4, 3);
        assert!(s.contains(0, 0));
        assert!(s.contains(3, 2));
        assert!(!s.contains(4, 0));
        assert!(!s.contains(0, 3));
        assert!(!s.contains(-1, 0));
    }

    #[test]
    fn wrap_folds_negative_and_overflowing_coords() {
        let s = GridSize::new(4, 3);
        assert_eq!(s.wrap(-1, -1), (3, 2));
        assert_eq!(s.wrap(4, 3), (0, 0));
        assert_eq!(s.wrap(9, -4), (1, 2));
    }

    #[test]
    fn load_normalizes_pixel_values() {
        let g = Grid::from_cells(GridSize::new(2, 2), &[0, 255, 1, 0]).unwrap();
        assert_eq!(g.cells(), &[0, 1, 1, 0]);
        assert!(g.get(1, 0));
        assert!(g.get(0, 1));
    }

    #[test]
    fn load_rejects_wrong_length() {
        let mut g = Grid::new(GridSize::new(2, 2));
        let err = g.load(&[1, 1, 1]).unwrap_err();
        assert_eq!(err, LifeError::SizeMismatch { expected: 4, actual: 3 });
        assert_eq!(g.live_count(), 0);
    }
}

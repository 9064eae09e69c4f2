//! Rendering-backend seam.
//!
//! A backend owns the programs that act on cell surfaces: it allocates them,
//! moves cells in and out, runs the step program from one surface into the
//! other, and runs the copy program from a surface into a display target.
//! The state machine decides *which* surface each call touches.

use crate::error::Result;
use crate::grid::{Grid, GridSize};
use crate::rule;

/// Program runner used by [`StateMachine`](crate::StateMachine).
///
/// Cell data crosses this boundary as one byte per cell (`0`/`1`), row-major,
/// row `y = 0` first.
pub trait SurfaceBackend {
    /// Storage for one grid of cells.
    type Surface;

    /// Visible output that [`present`](Self::present) draws into.
    type Target<'t>;

    /// Allocates a dead surface. Failure is reported as `BackendUnavailable`.
    fn create_surface(&mut self, size: GridSize) -> Result<Self::Surface>;

    /// Replaces all cells of `surface`. `cells.len()` equals the cell count.
    fn upload(&mut self, surface: &mut Self::Surface, cells: &[u8]);

    /// Writes a single in-range cell.
    fn write_cell(&mut self, surface: &mut Self::Surface, x: u32, y: u32, alive: bool);

    /// Reads all cells back. A failed readback is `BackendUnavailable`.
    fn download(&mut self, surface: &Self::Surface) -> Result<Vec<u8>>;

    /// Runs the step program: reads `current` only, writes every cell of `next`.
    fn run_step(&mut self, current: &Self::Surface, next: &mut Self::Surface);

    /// Runs the copy program: each cell becomes a `scale x scale` block.
    fn present(&mut self, current: &Self::Surface, scale: u32, target: &mut Self::Target<'_>);
}

/// RGBA8 display buffer, top-left origin, `+Y` down.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    pub const ALIVE: [u8; 4] = [255, 255, 255, 255];
    pub const DEAD: [u8; 4] = [0, 0, 0, 255];

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Self::DEAD; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Reference backend: surfaces are [`Grid`]s and programs are CPU loops.
#[derive(Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SurfaceBackend for CpuBackend {
    type Surface = Grid;
    type Target<'t> = PixelBuffer;

    fn create_surface(&mut self, size: GridSize) -> Result<Grid> {
        Ok(Grid::new(size))
    }

    fn upload(&mut self, surface: &mut Grid, cells: &[u8]) {
        // Lengths are validated by the state machine.
        if let Err(e) = surface.load(cells) {
            log::error!("CpuBackend: upload rejected: {e}");
        }
    }

    fn write_cell(&mut self, surface: &mut Grid, x: u32, y: u32, alive: bool) {
        surface.set(x, y, alive);
    }

    fn download(&mut self, surface: &Grid) -> Result<Vec<u8>> {
        Ok(surface.cells().to_vec())
    }

    fn run_step(&mut self, current: &Grid, next: &mut Grid) {
        rule::step_into(current, next);
    }

    fn present(&mut self, current: &Grid, scale: u32, target: &mut PixelBuffer) {
        let size = current.size();
        let scale = scale.max(1);
        for py in 0..target.height {
            let row = py / scale;
            for px in 0..target.width {
                let col = px / scale;
                let alive = row < size.height
                    && col < size.width
                    && current.get(col, size.height - 1 - row);
                let i = py as usize * target.width as usize + px as usize;
                target.pixels[i] = if alive { PixelBuffer::ALIVE } else { PixelBuffer::DEAD };
            }
        }
    }
}

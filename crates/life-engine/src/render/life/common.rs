//! GPU-side types shared by the step and copy programs.

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

// ── quad vertex ───────────────────────────────────────────────────────────

/// Full-target quad corner in `0..1`; the vertex shaders map it to NDC.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub corner: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── present uniform ───────────────────────────────────────────────────────

/// Mirrors `Present` in `copy.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct PresentUniform {
    pub alive: [f32; 4],
    pub dead: [f32; 4],
    /// Physical pixels per cell edge.
    pub cell_px: f32,
    pub _pad: [f32; 3], // 16-byte alignment
}

/// Colors the copy program paints live and dead cells with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellPalette {
    pub alive: Color,
    pub dead: Color,
}

impl Default for CellPalette {
    fn default() -> Self {
        Self {
            alive: Color::WHITE,
            dead: Color::BLACK,
        }
    }
}

impl CellPalette {
    pub(super) fn uniform(&self, cell_px: f32) -> PresentUniform {
        let c = |c: Color| [c.r, c.g, c.b, c.a];
        PresentUniform {
            alive: c(self.alive),
            dead: c(self.dead),
            cell_px: cell_px.max(1.0),
            _pad: [0.0; 3],
        }
    }
}

// ── cell encoding ─────────────────────────────────────────────────────────

/// `0`/`1` cells to opaque RGBA8 texels (`0` or `255` per channel).
pub(super) fn cells_to_texels(cells: &[u8]) -> Vec<u8> {
    cells
        .iter()
        .flat_map(|&c| {
            let v = if c != 0 { 255 } else { 0 };
            [v, v, v, 255]
        })
        .collect()
}

/// Reads the red channel of tightly packed RGBA8 rows back into `0`/`1` cells.
pub(super) fn texels_to_cells(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Vec<u8> {
    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height as usize {
        let start = row * bytes_per_row as usize;
        let texels = &data[start..start + width as usize * 4];
        cells.extend(texels.chunks_exact(4).map(|t| (t[0] >= 128) as u8));
    }
    cells
}

/// Rounds a row stride up to wgpu's buffer-copy alignment.
pub(super) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_uniform_is_48_bytes() {
        assert_eq!(std::mem::size_of::<PresentUniform>(), 48);
    }

    #[test]
    fn texels_round_trip_through_padded_rows() {
        let cells = [1u8, 0, 1, 0, 0, 1];
        let texels = cells_to_texels(&cells);
        assert_eq!(&texels[..4], &[255, 255, 255, 255]);

        // Lay the 3x2 grid out with a 256-byte stride, as a buffer copy would.
        let stride = padded_bytes_per_row(3);
        assert_eq!(stride, 256);
        let mut padded = vec![0u8; stride as usize * 2];
        for row in 0..2 {
            let src = &texels[row * 12..row * 12 + 12];
            padded[row * 256..row * 256 + 12].copy_from_slice(src);
        }
        assert_eq!(texels_to_cells(&padded, 3, 2, stride), cells.to_vec());
    }

    #[test]
    fn cell_px_is_at_least_one() {
        assert_eq!(CellPalette::default().uniform(0.25).cell_px, 1.0);
    }
}

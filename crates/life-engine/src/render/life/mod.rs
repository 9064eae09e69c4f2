//! GPU backend for the Game of Life state machine.
//!
//! Cell surfaces are `Rgba8Unorm` textures. The step program is a full-target
//! quad rendered from the current texture into the other one; the copy program
//! is a full-screen quad that upscales the current texture onto the swapchain.

mod backend;
mod common;

pub use backend::{GpuBackend, GpuSurface};
pub use common::CellPalette;

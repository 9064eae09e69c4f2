//! GPU device + surface management.
//!
//! Creates the wgpu instance/adapter/device/queue, configures the window's
//! swapchain surface and hands out per-frame encoders.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};

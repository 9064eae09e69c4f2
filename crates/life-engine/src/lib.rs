//! Life engine crate.
//!
//! Owns the platform + GPU runtime pieces: the winit window loop, the wgpu
//! device and swapchain, platform-agnostic input, and [`render::life::GpuBackend`],
//! the GPU implementation of `life_sim::SurfaceBackend`.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;

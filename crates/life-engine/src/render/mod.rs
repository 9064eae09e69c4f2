//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, textures) and record
//! into the frame's [`RenderTarget`].
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Fragment programs work in physical pixels via `@builtin(position)`.

mod ctx;
pub mod life;

pub use ctx::{RenderCtx, RenderTarget};

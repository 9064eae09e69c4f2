//! Color model shared by renderers.

pub mod color;

pub use color::Color;

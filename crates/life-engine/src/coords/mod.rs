//! Coordinate types shared by the runtime and renderers.
//!
//! Canonical CPU space is logical pixels (DPI-aware), origin top-left,
//! `+X` right, `+Y` down. Cell space lives in `life_sim::coords`.

mod viewport;

pub use viewport::Viewport;

//! Double-buffered Conway's Game of Life.
//!
//! | module         | role                                                      |
//! |----------------|-----------------------------------------------------------|
//! | [`grid`]       | cell storage and toroidal addressing                      |
//! | [`rule`]       | the B3/S23 neighbor rule and a CPU step                   |
//! | [`surface`]    | current/other surface pair flipped by a selector          |
//! | [`backend`]    | program-runner seam, plus the CPU reference backend       |
//! | [`machine`]    | [`StateMachine`]: step, draw, fills, queries, animation   |
//! | [`controller`] | [`InteractionController`]: input commands and undo slot   |
//! | [`coords`]     | display pixels to cells                                   |
//! | [`pack`]       | 8 cells per byte                                          |
//! | [`snapshot`]   | saved grids and the save-file format                      |
//!
//! The GPU backend lives in `life-engine`.

pub mod animation;
pub mod backend;
pub mod controller;
pub mod coords;
pub mod error;
pub mod fps;
pub mod grid;
pub mod machine;
pub mod pack;
pub mod rule;
pub mod snapshot;
pub mod surface;

pub use animation::{Animation, DEFAULT_TICK_INTERVAL};
pub use backend::{CpuBackend, PixelBuffer, SurfaceBackend};
pub use controller::{ControlError, ControlEvent, InteractionController};
pub use coords::{CellCoord, CellMapper, ViewSize};
pub use error::{LifeError, Result};
pub use fps::{FpsCounter, FpsSink};
pub use grid::{Grid, GridSize};
pub use machine::{LifeConfig, StateMachine, DEFAULT_PROBABILITY};
pub use pack::{compact, expand};
pub use snapshot::{CellEncoding, SaveHeader, Snapshot, SnapshotFileError, SnapshotSlot};
pub use surface::{Slot, SurfacePair};

use thiserror::Error;

/// Errors raised by the state machine and its backends.
///
/// Every variant is reported synchronously to the caller of the offending
/// operation. Operations that fail leave the grid untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifeError {
    /// The rendering backend could not be acquired. Fatal to construction.
    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Non-positive view size or scale, or a view not evenly divisible by the scale.
    #[error("invalid dimensions: {view_width}x{view_height} view at scale {scale}")]
    InvalidDimensions {
        view_width: u32,
        view_height: u32,
        scale: u32,
    },

    /// Cell coordinate outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// Input cell count (or snapshot dimensions) does not match the grid.
    #[error("size mismatch: expected {expected} cells, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Live probability outside `[0, 1]`.
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

pub type Result<T> = std::result::Result<T, LifeError>;

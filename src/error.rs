//! Error types shared by the generation and export pipeline.

use thiserror::Error;

/// Errors raised while building, rendering, or exporting a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// A grid was accessed outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A render or statistics pass was requested before `generate()`.
    #[error("map layers have not been generated; call generate() first")]
    NotGenerated,

    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid scale {0}: must be finite and greater than zero")]
    InvalidScale(f64),

    #[error("layer '{0}' needs at least one octave")]
    InvalidOctaves(&'static str),

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by the simulation core.
#[derive(Debug, Error)]
pub enum Error {
    /// Matrix operands have incompatible shapes
    #[error("dimension mismatch in {op}: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A particle needs at least two points to sweep its outline
    #[error("invalid point count {0}, a particle needs at least 2 points")]
    InvalidPointCount(usize),

    /// Render surface has no usable size
    #[error("invalid render surface {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for raster operations.

use thiserror::Error;

/// Error type for raster operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Kernel has the wrong shape, zero weights, or an out-of-bounds
    /// weight sum after a normalization attempt.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Resize factor is zero.
    #[error("invalid resize factor: {0}")]
    InvalidFactor(f64),

    /// Operation is an explicit scope limitation, not silently
    /// approximated.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Error propagated from a buffer operation.
    #[error(transparent)]
    Core(#[from] raster_core::Error),
}

/// Result type for raster operations.
pub type OpsResult<T> = Result<T, OpsError>;

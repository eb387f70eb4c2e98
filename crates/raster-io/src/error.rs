//! Error types for I/O operations.
//!
//! Provides unified error handling for decoding, encoding and the
//! external boundaries.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unrecognized magic number or file type.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Binary RGB data declares a max value with no rescale path.
    #[error("unsupported max value: {0}")]
    UnsupportedMaxValue(u32),

    /// Malformed header or pixel data.
    #[error("parse error: {0}")]
    Parse(String),

    /// Pixel data ends before the declared dimensions are filled.
    #[error("truncated data: {0}")]
    TruncatedData(String),

    /// Value cannot be represented in the requested format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Error propagated from a buffer operation.
    #[error(transparent)]
    Core(#[from] raster_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

//! Error types for raster-core operations.
//!
//! All buffer and region operations fail fast: errors are raised at the
//! point of detection and never retried or silently recovered.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! ```

use crate::layout::PixelLayout;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during buffer and region operations.
///
/// # Categories
///
/// - **Construction**: [`DimensionMismatch`](Error::DimensionMismatch)
/// - **Addressing**: [`OutOfBounds`](Error::OutOfBounds)
/// - **Clipping**: [`NoOverlap`](Error::NoOverlap)
/// - **Layout**: [`PixelFormatMismatch`](Error::PixelFormatMismatch)
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer length does not match the declared dimensions.
    ///
    /// Returned by constructors taking an existing buffer when
    /// `buffer.len() != height * row_stride`.
    #[error("buffer of {actual} bytes does not match {width}x{height} ({expected} bytes)")]
    DimensionMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        actual: usize,
    },

    /// Position or region lies outside the buffer bounds.
    #[error("position ({x}, {y}) out of bounds for {width}x{height}")]
    OutOfBounds {
        /// X coordinate (column) that was accessed.
        x: i64,
        /// Y coordinate (row) that was accessed.
        y: i64,
        /// Buffer width.
        width: u32,
        /// Buffer height.
        height: u32,
    },

    /// A clipping operation produced a zero-area intersection.
    #[error("region ({x}, {y}, {w}x{h}) does not overlap {width}x{height}")]
    NoOverlap {
        /// Requested region X origin.
        x: i64,
        /// Requested region Y origin.
        y: i64,
        /// Requested region width.
        w: u32,
        /// Requested region height.
        h: u32,
        /// Buffer width.
        width: u32,
        /// Buffer height.
        height: u32,
    },

    /// Operand pixel layouts differ where they must match.
    #[error("pixel format mismatch: expected {expected}, got {got}")]
    PixelFormatMismatch {
        /// Layout required by the operation.
        expected: PixelLayout,
        /// Layout that was supplied.
        got: PixelLayout,
    },

    /// Generic error with custom message.
    ///
    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(width: u32, height: u32, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            width,
            height,
            expected,
            actual,
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: impl Into<i64>, y: impl Into<i64>, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x: x.into(),
            y: y.into(),
            width,
            height,
        }
    }

    /// Creates an [`Error::NoOverlap`] error.
    #[inline]
    pub fn no_overlap(x: i64, y: i64, w: u32, h: u32, width: u32, height: u32) -> Self {
        Self::NoOverlap {
            x,
            y,
            w,
            h,
            width,
            height,
        }
    }

    /// Creates an [`Error::PixelFormatMismatch`] error.
    #[inline]
    pub fn format_mismatch(expected: PixelLayout, got: PixelLayout) -> Self {
        Self::PixelFormatMismatch { expected, got }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::NoOverlap { .. })
    }
}

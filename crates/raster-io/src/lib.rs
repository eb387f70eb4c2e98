//! # raster-io
//!
//! I/O layer of the raster-rs workspace.
//!
//! This crate owns the codec for the portable PBM/PGM/PPM family and the
//! seams toward external collaborators:
//!
//! - [`pnm`] - Portable-format lexer, decoder and encoder (P1-P6)
//! - [`PixelCodec`] - Boundary trait for standard container formats
//! - [`exec`] - External process boundary (stdout + exit code)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raster_io::{read, write};
//! use raster_io::pnm::PnmFormat;
//!
//! let value = read("mask.pbm")?;
//! write("mask-copy.pbm", &value, PnmFormat::BinaryBitmap)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod exec;
pub mod pnm;
mod traits;

pub use error::{IoError, IoResult};
pub use pnm::{Pnm, PnmFormat};
pub use traits::PixelCodec;

use std::path::Path;

/// Reads a portable-format file.
///
/// The family member is selected by the magic number in the file.
///
/// # Errors
///
/// File errors surface as [`IoError::Io`]; malformed content as the
/// corresponding decode error.
pub fn read(path: impl AsRef<Path>) -> IoResult<Pnm> {
    let bytes = std::fs::read(path)?;
    pnm::decode(&bytes)
}

/// Writes a value to a portable-format file.
///
/// # Errors
///
/// [`IoError::Encode`] when the value's pixel class does not match
/// `format`; file errors surface as [`IoError::Io`].
pub fn write(path: impl AsRef<Path>, value: &Pnm, format: PnmFormat) -> IoResult<()> {
    let bytes = pnm::encode(value, format)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

//! # raster-core
//!
//! Core types for in-memory raster processing.
//!
//! This crate provides the foundational value types used throughout the
//! raster-rs workspace:
//!
//! - [`PixelLayout`], [`Color`] - Pixel layout tags and compact color values
//! - [`Image`] - Byte-packed pixel buffer with region operations
//! - [`Bitmap`] - Bit-packed buffer with MSB-first row-padded storage
//! - [`Rect`] - Integer rectangle for intersection-based clipping
//! - [`Error`], [`Result`] - Unified error handling
//!
//! ## Design Philosophy
//!
//! Images and bitmaps are **immutable values**: every "set" operation
//! returns a new value assembled from the old buffer plus a patch, and no
//! operation mutates a buffer in place. Buffers live behind an
//! [`Arc`](std::sync::Arc) so cloning a value and sharing it across worker
//! threads is cheap and lock-free.
//!
//! ```ignore
//! let img = Image::filled(4, 4, PixelLayout::Gray, Color::gray(0))?;
//! let img2 = img.set_pixel(1, 1, Color::gray(255))?; // img untouched
//! ```
//!
//! ## Crate Structure
//!
//! This crate is the foundation of raster-rs and has no internal
//! dependencies. The other workspace crates build on it:
//!
//! ```text
//! raster-core (this crate)
//!    ^
//!    |
//!    +-- raster-ops (convolution, resize, parallel map)
//!    +-- raster-io  (PNM codec, external boundaries)
//!    +-- raster-cli (command-line tool)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bitmap;
pub mod compose;
pub mod error;
pub mod image;
pub mod layout;
pub mod rect;
pub mod sample;

// Re-exports for convenience
pub use bitmap::Bitmap;
pub use compose::{alpha_blend, bitmap_alpha, matte, BlendMode};
pub use error::{Error, Result};
pub use image::Image;
pub use layout::{Color, PixelLayout};
pub use rect::Rect;
pub use sample::{Interp, WrapMode};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use raster_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bitmap::Bitmap;
    pub use crate::compose::{alpha_blend, bitmap_alpha, matte, BlendMode};
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::layout::{Color, PixelLayout};
    pub use crate::rect::Rect;
    pub use crate::sample::{Interp, WrapMode};
}

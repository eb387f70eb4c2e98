//! # raster-ops
//!
//! Windowed and whole-image operations for raster buffers.
//!
//! This crate provides the processing layer of the raster-rs workspace,
//! built on the value types from [`raster_core`].
//!
//! # Modules
//!
//! - [`kernel`] - Convolution kernels with validation and normalization
//! - [`convolve`] - Sliding-window convolution engine
//! - [`localop`] - Pluggable measure/threshold/decision/expand pipelines
//! - [`resize`] - Integer-factor scaling
//! - [`pmap`] - Chunked parallel map coordinator
//! - [`parallel`] - Rayon fast paths (feature `parallel`, on by default)
//!
//! # Example
//!
//! ```rust
//! use raster_core::{Color, Image, PixelLayout};
//! use raster_ops::{kernel::Kernel, convolve::map_kernel};
//!
//! let img = Image::filled(16, 16, PixelLayout::Rgb, Color::rgb(80, 90, 100)).unwrap();
//! let blurred = map_kernel(&img, &Kernel::box_blur(3)).unwrap();
//! // A normalized kernel leaves a uniform image unchanged
//! assert_eq!(blurred, img);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod convolve;
pub mod kernel;
pub mod localop;
pub mod pmap;
pub mod resize;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use convolve::{map_convolve, map_kernel, Window};
pub use error::{OpsError, OpsResult};
pub use kernel::Kernel;
pub use localop::LocalOp;
pub use pmap::{pmap_pixels, PmapOutcome};
pub use resize::resize;

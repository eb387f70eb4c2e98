//! Codec boundary for standard container formats.
//!
//! The engine decodes its own portable family ([`pnm`](crate::pnm));
//! everything else (PNG, BMP, TGA, TIFF, ...) lives behind this seam and
//! is supplied by a collaborator crate or application. The core only
//! needs the two capabilities below.

use crate::IoResult;
use raster_core::Image;

/// Decode/encode capability for an external pixel container format.
///
/// Implementations translate between raw container bytes and the
/// engine's [`Image`] value (width, height, pixel layout, buffer).
///
/// # Example
///
/// ```rust,ignore
/// struct PngCodec;
///
/// impl PixelCodec for PngCodec {
///     fn decode(&self, bytes: &[u8]) -> IoResult<Image> { /* ... */ }
///     fn encode(&self, image: &Image) -> IoResult<Vec<u8>> { /* ... */ }
/// }
/// ```
pub trait PixelCodec {
    /// Decodes container bytes into an image.
    fn decode(&self, bytes: &[u8]) -> IoResult<Image>;

    /// Encodes an image into container bytes.
    fn encode(&self, image: &Image) -> IoResult<Vec<u8>>;
}

//! Per-pixel combinators over matched image/bitmap operands.
//!
//! Each combinator walks its operands row-synchronously, decoding one
//! source pixel or bit at a time and appending one output pixel; no
//! intermediate per-pixel list is materialized.
//!
//! # Operations
//!
//! - [`bitmap_alpha`] - Attach a bitmap as the alpha channel of an image
//! - [`matte`] - Select between two images through a bitmap
//! - [`alpha_blend`] - Blend one image over another using its alpha
//!
//! # Example
//!
//! ```rust
//! use raster_core::{bitmap_alpha, Bitmap, Color, Image, PixelLayout};
//!
//! let mask = Bitmap::from_fn(2, 1, |x, _| x == 0);
//! let img = Image::filled(2, 1, PixelLayout::Rgb, Color::rgb(9, 9, 9)).unwrap();
//! let out = bitmap_alpha(&mask, &img, PixelLayout::Rgba).unwrap();
//! assert_eq!(out.data(), &[9, 9, 9, 255, 9, 9, 9, 0]);
//! ```

use crate::{Bitmap, Color, Error, Image, PixelLayout, Result};

/// Blend mode for [`alpha_blend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source over destination, weighted by source alpha.
    #[default]
    Over,
    /// Saturating per-channel addition.
    Add,
    /// Per-channel multiplication (darken).
    Multiply,
}

/// Checks that two operands have identical dimensions.
#[inline]
fn check_dims(aw: u32, ah: u32, bw: u32, bh: u32) -> Result<()> {
    if aw != bw || ah != bh {
        return Err(Error::other(format!(
            "operand size mismatch: {aw}x{ah} vs {bw}x{bh}"
        )));
    }
    Ok(())
}

/// Attaches a bitmap as the alpha channel of an image.
///
/// Set bits become opaque (255), clear bits transparent (0). Color
/// components are carried over as raw copies into `out_layout`.
///
/// # Errors
///
/// Fails if the dimensions differ or `out_layout` has no alpha channel.
pub fn bitmap_alpha(mask: &Bitmap, image: &Image, out_layout: PixelLayout) -> Result<Image> {
    check_dims(mask.width(), mask.height(), image.width(), image.height())?;
    if !out_layout.has_alpha() {
        return Err(Error::format_mismatch(PixelLayout::Rgba, out_layout));
    }
    let layout = image.layout();
    let mut data = Vec::with_capacity(
        image.width() as usize * image.height() as usize * out_layout.channels(),
    );
    for y in 0..image.height() {
        for x in 0..image.width() {
            let mut rgba = image.pixel(x, y)?.to_rgba(layout);
            rgba[3] = if mask.bit(x, y)? { 255 } else { 0 };
            data.extend_from_slice(Color::from_rgba(rgba, out_layout).as_slice());
        }
    }
    Image::from_data(image.width(), image.height(), out_layout, data)
}

/// Selects between foreground and background through a bitmap: set bits
/// take the foreground pixel, clear bits the background pixel.
///
/// # Errors
///
/// Fails if the dimensions differ, or with
/// [`Error::PixelFormatMismatch`] if the image layouts differ.
pub fn matte(mask: &Bitmap, fg: &Image, bg: &Image) -> Result<Image> {
    check_dims(mask.width(), mask.height(), fg.width(), fg.height())?;
    check_dims(fg.width(), fg.height(), bg.width(), bg.height())?;
    if fg.layout() != bg.layout() {
        return Err(Error::format_mismatch(fg.layout(), bg.layout()));
    }
    let mut data = Vec::with_capacity(fg.data().len());
    for y in 0..fg.height() {
        for x in 0..fg.width() {
            let px = if mask.bit(x, y)? {
                fg.pixel(x, y)?
            } else {
                bg.pixel(x, y)?
            };
            data.extend_from_slice(px.as_slice());
        }
    }
    Image::from_data(fg.width(), fg.height(), fg.layout(), data)
}

/// Blends one pixel over another in canonical RGBA form.
#[inline]
fn blend_rgba(src: [u8; 4], dst: [u8; 4], mode: BlendMode) -> [u8; 4] {
    match mode {
        BlendMode::Over => {
            let a = src[3] as f32 / 255.0;
            let mut out = [0u8; 4];
            for c in 0..3 {
                let v = src[c] as f32 * a + dst[c] as f32 * (1.0 - a);
                out[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            out[3] = src[3].max(dst[3]);
            out
        }
        BlendMode::Add => [
            src[0].saturating_add(dst[0]),
            src[1].saturating_add(dst[1]),
            src[2].saturating_add(dst[2]),
            src[3].max(dst[3]),
        ],
        BlendMode::Multiply => {
            let mut out = [0u8; 4];
            for c in 0..3 {
                out[c] = ((src[c] as u16 * dst[c] as u16) / 255) as u8;
            }
            out[3] = src[3].max(dst[3]);
            out
        }
    }
}

/// Blends `src` over `dst`, producing an image in `dst`'s layout.
///
/// [`BlendMode::Over`] weights by the source alpha (opaque where the
/// source layout has none); the other modes combine channels directly.
///
/// # Errors
///
/// Fails if the dimensions differ.
pub fn alpha_blend(src: &Image, dst: &Image, mode: BlendMode) -> Result<Image> {
    check_dims(src.width(), src.height(), dst.width(), dst.height())?;
    let src_layout = src.layout();
    let dst_layout = dst.layout();
    let mut data = Vec::with_capacity(dst.data().len());
    for y in 0..src.height() {
        for x in 0..src.width() {
            let s = src.pixel(x, y)?.to_rgba(src_layout);
            let d = dst.pixel(x, y)?.to_rgba(dst_layout);
            let out = blend_rgba(s, d, mode);
            data.extend_from_slice(Color::from_rgba(out, dst_layout).as_slice());
        }
    }
    Image::from_data(dst.width(), dst.height(), dst_layout, data)
}

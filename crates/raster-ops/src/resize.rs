//! Integer-factor scaling.
//!
//! - Positive factor `k > 1`: upsize by pixel replication - each pixel is
//!   repeated `k` times horizontally and each resulting row `k` times
//!   vertically (nearest-neighbor expansion).
//! - Negative factor `-k` (`k > 1`): downsize by decimation - every
//!   `k`-th column and row is kept; fractional leftovers of both are
//!   dropped.
//! - `1` and `-1` are the identity.
//!
//! Fractional factors are an explicit scope limitation and fail with
//! [`OpsError::NotImplemented`] rather than being silently approximated.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{Image, PixelLayout};
//! use raster_ops::resize::resize;
//!
//! let img = Image::new(4, 4, PixelLayout::Rgb);
//! let up = resize(&img, 2.0).unwrap();
//! assert_eq!((up.width(), up.height()), (8, 8));
//! assert_eq!(resize(&up, -2.0).unwrap(), img);
//! ```

use crate::{OpsError, OpsResult};
use raster_core::Image;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Scales an image by an integer factor; see the [module docs](self).
///
/// # Errors
///
/// [`OpsError::InvalidFactor`] for zero; [`OpsError::NotImplemented`]
/// for fractional factors.
pub fn resize(img: &Image, factor: f64) -> OpsResult<Image> {
    trace!(width = img.width(), height = img.height(), factor, "resize");
    if factor == 0.0 {
        return Err(OpsError::InvalidFactor(factor));
    }
    if factor.fract() != 0.0 || !factor.is_finite() {
        return Err(OpsError::NotImplemented(format!(
            "fractional resize factor {factor}"
        )));
    }
    let f = factor as i64;
    match f {
        1 | -1 => Ok(img.clone()),
        f if f > 1 => upsize(img, f as u32),
        f => downsize(img, (-f) as u32),
    }
}

/// Replicates each pixel `k` times in both directions.
fn upsize(img: &Image, k: u32) -> OpsResult<Image> {
    let c = img.channels();
    let out_w = img.width() * k;
    let mut data = Vec::with_capacity(out_w as usize * img.height() as usize * k as usize * c);
    for y in 0..img.height() {
        let row_start = data.len();
        for x in 0..img.width() {
            let off = y as usize * img.row_stride() + x as usize * c;
            let px = &img.data()[off..off + c];
            for _ in 0..k {
                data.extend_from_slice(px);
            }
        }
        let row_end = data.len();
        for _ in 1..k {
            data.extend_from_within(row_start..row_end);
        }
    }
    Ok(Image::from_data(out_w, img.height() * k, img.layout(), data)?)
}

/// Keeps every `k`-th column and row, dropping fractional leftovers.
fn downsize(img: &Image, k: u32) -> OpsResult<Image> {
    let c = img.channels();
    let out_w = img.width() / k;
    let out_h = img.height() / k;
    let mut data = Vec::with_capacity(out_w as usize * out_h as usize * c);
    for y in 0..out_h {
        let sy = y * k;
        for x in 0..out_w {
            let off = sy as usize * img.row_stride() + (x * k) as usize * c;
            data.extend_from_slice(&img.data()[off..off + c]);
        }
    }
    Ok(Image::from_data(out_w, out_h, img.layout(), data)?)
}

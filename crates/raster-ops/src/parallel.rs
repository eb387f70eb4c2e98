//! Rayon fast paths for the convolution sweep.
//!
//! These produce results identical to the sequential engine in
//! [`convolve`](crate::convolve): rows are computed independently, each
//! with its own window and its own border cache, so nothing is shared
//! across the worker pool.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{Color, Image, PixelLayout};
//! use raster_ops::{kernel::Kernel, parallel};
//!
//! let img = Image::filled(64, 64, PixelLayout::Rgb, Color::rgb(1, 2, 3)).unwrap();
//! let out = parallel::map_kernel(&img, &Kernel::gaussian(5, 1.5)).unwrap();
//! assert_eq!(out, img);
//! ```

use crate::convolve::{convolve_row, kernel_tile, BorderCache, Window};
use crate::{Kernel, OpsError, OpsResult};
use raster_core::{Color, Image};
use rayon::prelude::*;

/// Row-parallel version of [`convolve::map_convolve`](crate::convolve::map_convolve).
///
/// # Errors
///
/// [`OpsError::InvalidKernel`] unless `n` is odd.
pub fn map_convolve<F>(img: &Image, n: usize, tile: F) -> OpsResult<Image>
where
    F: Fn(&Window<'_>) -> Color + Sync,
{
    if n == 0 || n % 2 == 0 {
        return Err(OpsError::InvalidKernel(format!(
            "window side {n} must be odd"
        )));
    }
    if img.is_empty() {
        return Ok(img.clone());
    }
    let rows: Vec<Vec<u8>> = (0..img.height() as i64)
        .into_par_iter()
        .map(|j| {
            let mut cache = BorderCache::new();
            convolve_row(img, j, n, &tile, &mut cache)
        })
        .collect();
    let mut data = Vec::with_capacity(img.data().len());
    for row in rows {
        data.extend_from_slice(&row);
    }
    Ok(Image::from_data(img.width(), img.height(), img.layout(), data)?)
}

/// Row-parallel version of [`convolve::map_kernel`](crate::convolve::map_kernel).
///
/// # Errors
///
/// [`OpsError::InvalidKernel`] if the kernel fails
/// [`Kernel::ensure_bounds`].
pub fn map_kernel(img: &Image, kernel: &Kernel) -> OpsResult<Image> {
    kernel.ensure_bounds()?;
    map_convolve(img, kernel.side(), kernel_tile(kernel, img.channels()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convolve;
    use raster_core::PixelLayout;

    fn noise() -> Image {
        let data: Vec<u8> = (0..32u32 * 32 * 3).map(|i| (i * 37 % 251) as u8).collect();
        Image::from_data(32, 32, PixelLayout::Rgb, data).unwrap()
    }

    #[test]
    fn test_matches_sequential() {
        let img = noise();
        for kernel in [Kernel::box_blur(3), Kernel::gaussian(5, 1.2)] {
            let seq = convolve::map_kernel(&img, &kernel).unwrap();
            let par = map_kernel(&img, &kernel).unwrap();
            assert_eq!(par, seq);
        }
    }

    #[test]
    fn test_even_window_rejected() {
        let img = noise();
        assert!(map_convolve(&img, 2, |_| Color::rgb(0, 0, 0)).is_err());
    }
}

//! Sliding-window convolution engine.
//!
//! [`map_convolve`] slides an `n x n` window (`n = 2k + 1`) over every
//! pixel and hands it to a tile function; [`map_kernel`] is the weighted
//! sum tile built from a [`Kernel`].
//!
//! # Algorithm
//!
//! The window is kept as `n` column vectors of `n` float colors, in
//! column-major order. Advancing one pixel to the right drops the
//! leftmost column and appends one freshly fetched column, so each
//! horizontal step costs O(n) fetches instead of O(n^2).
//!
//! All out-of-range fetches clamp to the nearest edge pixel. Because edge
//! pixels are revisited O(n) times and corner pixels O(n^2) times during
//! a sweep, a small position-to-color cache is kept for border pixels
//! only; caching interior pixels would grow the cache to the whole image
//! for no benefit. The cache is private to a single call.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{Color, Image, PixelLayout};
//! use raster_ops::convolve::{map_kernel};
//! use raster_ops::kernel::Kernel;
//!
//! let img = Image::filled(8, 8, PixelLayout::Gray, Color::gray(77)).unwrap();
//! let out = map_kernel(&img, &Kernel::gaussian(5, 1.2)).unwrap();
//! assert_eq!(out, img);
//! ```

use crate::{Kernel, OpsError, OpsResult};
use raster_core::{Color, Image};
use std::collections::{HashMap, VecDeque};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// One pixel's channels widened to `f32`, in the 0..255 domain.
pub type FloatColor = [f32; 4];

/// A `(weight, color)` pair awaiting a [`blend`] step.
pub type WeightedColor = (f32, FloatColor);

/// Position-to-color cache for border pixels, scoped to one call.
pub(crate) type BorderCache = HashMap<(u32, u32), FloatColor>;

/// The `n x n` neighborhood handed to a tile function.
///
/// Cells are addressed `(col, row)` with `(0, 0)` the top-left of the
/// window; [`cells`](Self::cells) walks them column-major.
pub struct Window<'a> {
    cols: &'a VecDeque<Vec<FloatColor>>,
}

impl Window<'_> {
    /// Returns the window side length.
    #[inline]
    pub fn side(&self) -> usize {
        self.cols.len()
    }

    /// Returns the cell at window column `col`, row `row`.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> FloatColor {
        self.cols[col][row]
    }

    /// Iterates over all cells in column-major order.
    pub fn cells(&self) -> impl Iterator<Item = FloatColor> + '_ {
        self.cols.iter().flat_map(|col| col.iter().copied())
    }
}

/// Fetches pixel (x, y) clamped to the image edges, caching border hits.
#[inline]
fn fetch(img: &Image, x: i64, y: i64, cache: &mut BorderCache) -> FloatColor {
    let cx = x.clamp(0, img.width() as i64 - 1) as u32;
    let cy = y.clamp(0, img.height() as i64 - 1) as u32;
    let border =
        cx == 0 || cx == img.width() - 1 || cy == 0 || cy == img.height() - 1;
    if border {
        *cache
            .entry((cx, cy))
            .or_insert_with(|| img.pixel_clamped(cx as i64, cy as i64).to_float())
    } else {
        img.pixel_clamped(cx as i64, cy as i64).to_float()
    }
}

/// Builds the window column at horizontal position `i` for center row `j`.
fn column(img: &Image, i: i64, j: i64, k: i64, cache: &mut BorderCache) -> Vec<FloatColor> {
    (-k..=k).map(|dy| fetch(img, i, j + dy, cache)).collect()
}

/// Produces one output row of the sweep.
///
/// The window is primed with columns `-k-1 ..= k-1` (one extra pre-fetch
/// before the first real column), then each step drops the leftmost
/// column and appends the next.
pub(crate) fn convolve_row<F>(img: &Image, j: i64, n: usize, tile: &F, cache: &mut BorderCache) -> Vec<u8>
where
    F: Fn(&Window<'_>) -> Color,
{
    let k = (n / 2) as i64;
    let mut cols: VecDeque<Vec<FloatColor>> = VecDeque::with_capacity(n);
    for i in (-k - 1)..k {
        cols.push_back(column(img, i, j, k, cache));
    }
    let mut row = Vec::with_capacity(img.row_stride());
    for x in 0..img.width() as i64 {
        cols.pop_front();
        cols.push_back(column(img, x + k, j, k, cache));
        let out = tile(&Window { cols: &cols });
        debug_assert_eq!(out.channels(), img.channels(), "tile changed channel count");
        row.extend_from_slice(out.as_slice());
    }
    row
}

/// Slides an `n x n` window over every pixel and maps it through `tile`.
///
/// `tile` receives the clamp-to-edge neighborhood of each pixel and must
/// return a color in the image's own layout.
///
/// # Errors
///
/// [`OpsError::InvalidKernel`] unless `n` is odd.
pub fn map_convolve<F>(img: &Image, n: usize, tile: F) -> OpsResult<Image>
where
    F: Fn(&Window<'_>) -> Color,
{
    if n == 0 || n % 2 == 0 {
        return Err(OpsError::InvalidKernel(format!(
            "window side {n} must be odd"
        )));
    }
    trace!(width = img.width(), height = img.height(), n, "map_convolve");
    if img.is_empty() {
        return Ok(img.clone());
    }
    let mut cache = BorderCache::new();
    let mut data = Vec::with_capacity(img.data().len());
    for j in 0..img.height() as i64 {
        data.extend_from_slice(&convolve_row(img, j, n, &tile, &mut cache));
    }
    Ok(Image::from_data(img.width(), img.height(), img.layout(), data)?)
}

/// Computes the weighted sum of a [`WeightedColor`] list and clamps each
/// channel to byte range.
pub fn blend(weighted: &[WeightedColor], channels: usize) -> Color {
    let mut acc = [0.0f32; 4];
    for (weight, color) in weighted {
        for c in 0..channels {
            acc[c] += weight * color[c];
        }
    }
    Color::from_float_clamped(acc, channels)
}

/// The weighted-sum tile function of a kernel.
pub(crate) fn kernel_tile<'a>(
    kernel: &'a Kernel,
    channels: usize,
) -> impl Fn(&Window<'_>) -> Color + 'a {
    let n = kernel.side();
    move |win| {
        let mut weighted: Vec<WeightedColor> = Vec::with_capacity(n * n);
        for col in 0..n {
            for row in 0..n {
                weighted.push((kernel.weight(col, row), win.get(col, row)));
            }
        }
        blend(&weighted, channels)
    }
}

/// Convolves the image with a kernel.
///
/// Each window cell contributes `weight * color` to a weighted-color
/// list, which is then blended (summed and clamped to byte range).
///
/// # Errors
///
/// [`OpsError::InvalidKernel`] if the kernel fails
/// [`Kernel::ensure_bounds`].
pub fn map_kernel(img: &Image, kernel: &Kernel) -> OpsResult<Image> {
    kernel.ensure_bounds()?;
    map_convolve(img, kernel.side(), kernel_tile(kernel, img.channels()))
}

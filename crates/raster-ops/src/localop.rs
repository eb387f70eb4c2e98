//! Pluggable windowed local operations.
//!
//! A [`LocalOp`] generalizes convolution into a four-stage pipeline run
//! over every window of the sweep:
//!
//! 1. **measure**: color -> scalar projection applied per cell
//! 2. **threshold**: scalar buffer -> discrete-symbol buffer
//! 3. **decision**: symbol buffer -> single outcome
//! 4. **expand**: outcome -> output color
//!
//! Each stage is an independently substitutable pure function: new
//! cellular-style operators (erosion, dilation, contouring, rule tables)
//! are built by swapping stages, not by writing new window-management
//! code. The window handling itself is
//! [`map_convolve`](crate::convolve::map_convolve).
//!
//! # Example
//!
//! ```rust
//! use raster_core::{Color, Image, PixelLayout};
//! use raster_ops::localop::dilate;
//!
//! let img = Image::new(5, 5, PixelLayout::Gray)
//!     .set_pixel(2, 2, Color::gray(255)).unwrap();
//! let grown = dilate(&img, 3).unwrap();
//! assert_eq!(grown.pixel(1, 1).unwrap(), Color::gray(255));
//! assert_eq!(grown.pixel(0, 0).unwrap(), Color::gray(0));
//! ```

use crate::convolve::{map_convolve, FloatColor};
use crate::OpsResult;
use raster_core::{Color, Image};

/// Rec. 709 luma weights for the r, g, b channels.
pub const REC709_LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Luma projection of an rgb-ordered float color.
#[inline]
pub fn luma_rgb(px: FloatColor) -> f32 {
    px[0] * REC709_LUMA[0] + px[1] * REC709_LUMA[1] + px[2] * REC709_LUMA[2]
}

/// A four-stage windowed operation; see the [module docs](self).
pub struct LocalOp<M, T, D, E> {
    /// Per-cell color -> scalar projection.
    pub measure: M,
    /// Scalar buffer -> discrete-symbol buffer.
    pub threshold: T,
    /// Symbol buffer -> single outcome.
    pub decision: D,
    /// Outcome -> output color.
    pub expand: E,
}

impl<M, T, D, E> LocalOp<M, T, D, E>
where
    M: Fn(FloatColor) -> f32,
    T: Fn(&[f32]) -> Vec<u8>,
    D: Fn(&[u8]) -> u8,
    E: Fn(u8) -> Color,
{
    /// Runs the pipeline over every `n x n` window of the image.
    ///
    /// # Errors
    ///
    /// Propagates [`map_convolve`] errors (even window side).
    pub fn apply(&self, img: &Image, n: usize) -> OpsResult<Image> {
        map_convolve(img, n, |win| {
            let measures: Vec<f32> = win.cells().map(|c| (self.measure)(c)).collect();
            let symbols = (self.threshold)(&measures);
            let outcome = (self.decision)(&symbols);
            (self.expand)(outcome)
        })
    }
}

/// Measure averaging the first `channels` float lanes.
pub fn mean_measure(channels: usize) -> impl Fn(FloatColor) -> f32 {
    move |px| px[..channels].iter().sum::<f32>() / channels as f32
}

/// Threshold classifying each scalar against `level` into 0/1 symbols.
pub fn threshold_at(level: f32) -> impl Fn(&[f32]) -> Vec<u8> {
    move |measures| measures.iter().map(|m| u8::from(*m > level)).collect()
}

/// Majority-vote decision over 0/1 symbols.
pub fn majority(symbols: &[u8]) -> u8 {
    let ones = symbols.iter().filter(|s| **s != 0).count();
    u8::from(ones * 2 > symbols.len())
}

/// Expand mapping symbol 0 to black and anything else to white, broadcast
/// over `channels` channels.
pub fn expand_binary(channels: usize) -> impl Fn(u8) -> Color {
    move |sym| Color::splat(if sym == 0 { 0 } else { 255 }, channels)
}

/// Morphological erosion: a pixel stays set only if its whole window is
/// set. Shrinks bright regions.
///
/// # Errors
///
/// Propagates [`map_convolve`] errors (even window side).
pub fn erode(img: &Image, n: usize) -> OpsResult<Image> {
    let channels = img.channels();
    LocalOp {
        measure: mean_measure(channels),
        threshold: threshold_at(127.5),
        decision: |symbols: &[u8]| symbols.iter().copied().min().unwrap_or(0),
        expand: expand_binary(channels),
    }
    .apply(img, n)
}

/// Morphological dilation: a pixel becomes set if any cell of its window
/// is set. Expands bright regions.
///
/// # Errors
///
/// Propagates [`map_convolve`] errors (even window side).
pub fn dilate(img: &Image, n: usize) -> OpsResult<Image> {
    let channels = img.channels();
    LocalOp {
        measure: mean_measure(channels),
        threshold: threshold_at(127.5),
        decision: |symbols: &[u8]| symbols.iter().copied().max().unwrap_or(0),
        expand: expand_binary(channels),
    }
    .apply(img, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_core::PixelLayout;

    fn dot() -> Image {
        Image::new(5, 5, PixelLayout::Gray)
            .set_pixel(2, 2, Color::gray(255))
            .unwrap()
    }

    #[test]
    fn test_dilate_grows_dot() {
        let grown = dilate(&dot(), 3).unwrap();
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(grown.pixel(x, y).unwrap(), Color::gray(255));
            }
        }
        assert_eq!(grown.pixel(0, 0).unwrap(), Color::gray(0));
        assert_eq!(grown.pixel(4, 2).unwrap(), Color::gray(0));
    }

    #[test]
    fn test_erode_removes_dot() {
        let shrunk = erode(&dot(), 3).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(shrunk.pixel(x, y).unwrap(), Color::gray(0));
            }
        }
    }

    #[test]
    fn test_erode_dilate_on_solid() {
        let solid = Image::filled(6, 6, PixelLayout::Gray, raster_core::Color::gray(255)).unwrap();
        // Clamp-to-edge keeps a solid block solid through both ops
        assert_eq!(erode(&solid, 3).unwrap(), solid);
        assert_eq!(dilate(&solid, 3).unwrap(), solid);
    }

    #[test]
    fn test_majority() {
        assert_eq!(majority(&[1, 1, 0]), 1);
        assert_eq!(majority(&[1, 0, 0]), 0);
        assert_eq!(majority(&[]), 0);
    }

    #[test]
    fn test_custom_pipeline_contour() {
        // Contour: set pixels whose window is mixed (both symbols present)
        let square = Image::from_data(
            4,
            4,
            PixelLayout::Gray,
            vec![
                0, 0, 0, 0, //
                0, 255, 255, 0, //
                0, 255, 255, 0, //
                0, 0, 0, 0,
            ],
        )
        .unwrap();
        let op = LocalOp {
            measure: mean_measure(1),
            threshold: threshold_at(127.5),
            decision: |s: &[u8]| {
                let ones = s.iter().filter(|v| **v != 0).count();
                u8::from(ones != 0 && ones != s.len())
            },
            expand: expand_binary(1),
        };
        let edges = op.apply(&square, 3).unwrap();
        // Every pixel touches the boundary in a 4x4 square, except none:
        // the whole ring around the 2x2 core is mixed
        assert_eq!(edges.pixel(1, 1).unwrap(), Color::gray(255));
        assert_eq!(edges.pixel(0, 0).unwrap(), Color::gray(255));
    }

    #[test]
    fn test_luma_weights() {
        let white = luma_rgb([255.0, 255.0, 255.0, 0.0]);
        assert!((white - 255.0).abs() < 0.1);
        assert!(luma_rgb([0.0, 255.0, 0.0, 0.0]) > luma_rgb([255.0, 0.0, 0.0, 0.0]));
    }
}

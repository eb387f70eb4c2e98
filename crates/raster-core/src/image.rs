//! Byte-packed pixel buffer with region operations.
//!
//! # Memory Layout
//!
//! Pixels are stored row-major, top-to-bottom, with no alignment padding:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//! ```
//!
//! `row_stride = width * channels` bytes; pixel (i, j) starts at
//! `i * channels + j * row_stride`.
//!
//! # Value Semantics
//!
//! An [`Image`] is immutable: every "set" operation returns a new image
//! built from the old buffer plus a patch. Patches are assembled from a
//! small ordered list of byte-range segments (prefix, replaced span,
//! suffix; or per-row spans for block transfers) concatenated once, never
//! from a per-pixel copy loop. The buffer lives behind an `Arc`, so clones
//! and cross-thread sharing are cheap.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Color, Image, PixelLayout};
//!
//! let img = Image::new(4, 4, PixelLayout::Rgb);
//! let img = img.set_pixel(1, 2, Color::rgb(255, 0, 0)).unwrap();
//! assert_eq!(img.pixel(1, 2).unwrap(), Color::rgb(255, 0, 0));
//! ```

use crate::{Color, Error, PixelLayout, Rect, Result};
use std::sync::Arc;

/// Owned byte-packed image buffer.
///
/// See the [module documentation](self) for layout and value semantics.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel data buffer (Arc for cheap cloning).
    data: Arc<Vec<u8>>,
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
    /// Channel order and count tag.
    layout: PixelLayout,
}

impl Image {
    /// Creates a new zero-filled image.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Self {
        let len = width as usize * height as usize * layout.channels();
        Self {
            data: Arc::new(vec![0u8; len]),
            width,
            height,
            layout,
        }
    }

    /// Creates an image filled with a constant color.
    ///
    /// # Errors
    ///
    /// Fails if the color's channel count does not match the layout.
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::{Color, Image, PixelLayout};
    ///
    /// let img = Image::filled(8, 8, PixelLayout::Rgb, Color::rgb(10, 20, 30)).unwrap();
    /// assert_eq!(img.pixel(7, 7).unwrap(), Color::rgb(10, 20, 30));
    /// ```
    pub fn filled(width: u32, height: u32, layout: PixelLayout, color: Color) -> Result<Self> {
        if color.channels() != layout.channels() {
            return Err(Error::other(format!(
                "fill color has {} channels, layout {} expects {}",
                color.channels(),
                layout,
                layout.channels()
            )));
        }
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * layout.channels());
        for _ in 0..count {
            data.extend_from_slice(color.as_slice());
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            layout,
        })
    }

    /// Creates an image from an existing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless
    /// `data.len() == height * width * channels`.
    pub fn from_data(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(Error::dimension_mismatch(width, height, expected, data.len()));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            layout,
        })
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel layout tag.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Returns the number of byte channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Returns the byte length of one row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    /// Returns a rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns a reference to the raw pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte offset of pixel (x, y). Caller guarantees bounds.
    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.row_stride() + x as usize * self.channels()
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] unless `x < width` and `y < height`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Result<Color> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let off = self.pixel_offset(x, y);
        Ok(Color::from_slice(&self.data[off..off + self.channels()]))
    }

    /// Returns the pixel nearest to (x, y), clamping both coordinates to
    /// the image edges (clamp-to-edge boundary policy).
    ///
    /// # Panics
    ///
    /// Panics if the image is empty.
    #[inline]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Color {
        assert!(!self.is_empty(), "pixel_clamped on empty image");
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        let off = self.pixel_offset(cx, cy);
        Color::from_slice(&self.data[off..off + self.channels()])
    }

    /// Returns a new image with the pixel at (x, y) replaced.
    ///
    /// The result buffer is assembled from three segments of the source
    /// (prefix, new pixel, suffix); the rest of the buffer is never
    /// rescanned element by element.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] for positions outside the image; an error if
    /// the color's channel count does not match the layout.
    pub fn set_pixel(&self, x: u32, y: u32, color: Color) -> Result<Image> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        if color.channels() != self.channels() {
            return Err(Error::other(format!(
                "color has {} channels, layout {} expects {}",
                color.channels(),
                self.layout,
                self.channels()
            )));
        }
        let off = self.pixel_offset(x, y);
        let mut data = Vec::with_capacity(self.data.len());
        data.extend_from_slice(&self.data[..off]);
        data.extend_from_slice(color.as_slice());
        data.extend_from_slice(&self.data[off + self.channels()..]);
        Ok(Self {
            data: Arc::new(data),
            ..*self
        })
    }

    /// Copies the rows of a fully in-bounds region into a new image.
    fn copy_region(&self, x: u32, y: u32, w: u32, h: u32) -> Image {
        let c = self.channels();
        let seg = w as usize * c;
        let mut data = Vec::with_capacity(seg * h as usize);
        for row in y..y + h {
            let start = self.pixel_offset(x, row);
            data.extend_from_slice(&self.data[start..start + seg]);
        }
        Self {
            data: Arc::new(data),
            width: w,
            height: h,
            layout: self.layout,
        }
    }

    /// Returns the subimage covered by the intersection of `rect` with the
    /// image bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoOverlap`] if the intersection is empty.
    pub fn crop(&self, rect: Rect) -> Result<Image> {
        let Some(r) = self.bounds().intersect(&rect) else {
            return Err(Error::no_overlap(
                rect.x as i64,
                rect.y as i64,
                rect.width,
                rect.height,
                self.width,
                self.height,
            ));
        };
        Ok(self.copy_region(r.x, r.y, r.width, r.height))
    }

    /// Returns the part of the requested `w`x`h` rectangle at (x, y) that
    /// overlaps the image (clipping variant).
    ///
    /// The result may be smaller than requested when the overlap is
    /// partial. Negative origins are clipped like any other overflow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoOverlap`] only when there is zero overlap.
    pub fn subimage(&self, x: i64, y: i64, w: u32, h: u32) -> Result<Image> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i64).min(self.width as i64);
        let y1 = (y + h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return Err(Error::no_overlap(x, y, w, h, self.width, self.height));
        }
        Ok(self.copy_region(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    /// Returns the `w`x`h` subimage at (x, y) (strict variant).
    ///
    /// The output always has exactly the requested dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] unless the entire rectangle lies
    /// inside the image.
    pub fn subimage_strict(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Image> {
        if x as u64 + w as u64 > self.width as u64 || y as u64 + h as u64 > self.height as u64 {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.copy_region(x, y, w, h))
    }

    /// Block-transfers `sub` rows into a copy of `self` at (dx, dy).
    ///
    /// The output is one ordered concatenation of segments: prefix, then
    /// per row the transferred span followed by the skip to the next row,
    /// then the suffix.
    fn splice(&self, dx: u32, dy: u32, sub: &Image, sx: u32, sy: u32, w: u32, h: u32) -> Image {
        let c = self.channels();
        let seg = w as usize * c;
        let mut data = Vec::with_capacity(self.data.len());
        data.extend_from_slice(&self.data[..self.pixel_offset(dx, dy)]);
        for row in 0..h {
            let s_off = sub.pixel_offset(sx, sy + row);
            data.extend_from_slice(&sub.data[s_off..s_off + seg]);
            let end = self.pixel_offset(dx, dy + row) + seg;
            if row + 1 < h {
                data.extend_from_slice(&self.data[end..self.pixel_offset(dx, dy + row + 1)]);
            } else {
                data.extend_from_slice(&self.data[end..]);
            }
        }
        Self {
            data: Arc::new(data),
            ..*self
        }
    }

    /// Returns a new image with `sub` written at (x, y), clipped to the
    /// target (clipping variant).
    ///
    /// When `sub` partially overflows the target, it is translated and
    /// re-clipped so only the overlapping region is written.
    ///
    /// # Errors
    ///
    /// [`Error::PixelFormatMismatch`] if the layouts differ;
    /// [`Error::NoOverlap`] when no part of `sub` lands inside the target.
    pub fn set_subimage(&self, x: i64, y: i64, sub: &Image) -> Result<Image> {
        if sub.layout != self.layout {
            return Err(Error::format_mismatch(self.layout, sub.layout));
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + sub.width as i64).min(self.width as i64);
        let y1 = (y + sub.height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return Err(Error::no_overlap(
                x,
                y,
                sub.width,
                sub.height,
                self.width,
                self.height,
            ));
        }
        Ok(self.splice(
            x0 as u32,
            y0 as u32,
            sub,
            (x0 - x) as u32,
            (y0 - y) as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }

    /// Returns a new image with `sub` written at (x, y) (strict variant).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if any part of `sub` would fall outside the
    /// target; [`Error::PixelFormatMismatch`] if the layouts differ.
    pub fn set_subimage_strict(&self, x: u32, y: u32, sub: &Image) -> Result<Image> {
        if sub.layout != self.layout {
            return Err(Error::format_mismatch(self.layout, sub.layout));
        }
        if x as u64 + sub.width as u64 > self.width as u64
            || y as u64 + sub.height as u64 > self.height as u64
        {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.splice(x, y, sub, 0, 0, sub.width, sub.height))
    }

    /// Returns the image with its row order reversed (flip top-bottom).
    pub fn reflect_y(&self) -> Image {
        let stride = self.row_stride();
        let mut data = Vec::with_capacity(self.data.len());
        for y in (0..self.height).rev() {
            let start = y as usize * stride;
            data.extend_from_slice(&self.data[start..start + stride]);
        }
        Self {
            data: Arc::new(data),
            ..*self
        }
    }

    /// Returns the image with each row's pixel order reversed (mirror
    /// left-right).
    pub fn reflect_x(&self) -> Image {
        let c = self.channels();
        let mut data = Vec::with_capacity(self.data.len());
        for y in 0..self.height {
            for x in (0..self.width).rev() {
                let off = self.pixel_offset(x, y);
                data.extend_from_slice(&self.data[off..off + c]);
            }
        }
        Self {
            data: Arc::new(data),
            ..*self
        }
    }

    /// Rotates 90 degrees clockwise. Output dimensions are (height, width).
    ///
    /// Each output row is a source column read bottom-to-top: the
    /// transpose re-slices the row list column-major, reversing the
    /// assembled rows for the clockwise direction.
    pub fn rotate_90(&self) -> Image {
        let c = self.channels();
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.width {
            for row in (0..self.height).rev() {
                let off = self.pixel_offset(col, row);
                data.extend_from_slice(&self.data[off..off + c]);
            }
        }
        Self {
            data: Arc::new(data),
            width: self.height,
            height: self.width,
            layout: self.layout,
        }
    }

    /// Rotates 180 degrees: row reversal followed by in-row reversal.
    pub fn rotate_180(&self) -> Image {
        self.reflect_y().reflect_x()
    }

    /// Rotates 90 degrees counter-clockwise. Output dimensions are
    /// (height, width).
    pub fn rotate_270(&self) -> Image {
        let c = self.channels();
        let mut data = Vec::with_capacity(self.data.len());
        for col in (0..self.width).rev() {
            for row in 0..self.height {
                let off = self.pixel_offset(col, row);
                data.extend_from_slice(&self.data[off..off + c]);
            }
        }
        Self {
            data: Arc::new(data),
            width: self.height,
            height: self.width,
            layout: self.layout,
        }
    }

    /// Partitions the image into row-aligned chunks of roughly
    /// `chunk_bytes` each. The last chunk absorbs any remainder rows.
    ///
    /// Chunks share no mutable state with the source; row order is
    /// preserved so that [`merge`](Self::merge) reassembles the original.
    pub fn split(&self, chunk_bytes: usize) -> Vec<Image> {
        let stride = self.row_stride();
        if self.height == 0 || stride == 0 {
            return vec![self.clone()];
        }
        let rows_per = ((chunk_bytes / stride).max(1) as u64).min(self.height as u64) as u32;
        let chunks = self.height / rows_per;
        let mut out = Vec::with_capacity(chunks as usize);
        let mut y = 0;
        for i in 0..chunks {
            let rows = if i + 1 == chunks {
                self.height - y
            } else {
                rows_per
            };
            out.push(self.copy_region(0, y, self.width, rows));
            y += rows;
        }
        out
    }

    /// Partitions the image into `n` row-aligned chunks by computing a
    /// target chunk byte size and delegating to [`split`](Self::split).
    pub fn split_n(&self, n: usize) -> Vec<Image> {
        let n = n.max(1);
        self.split(self.data.len() / n)
    }

    /// Concatenates images vertically.
    ///
    /// # Errors
    ///
    /// All parts must share width and pixel layout (and therefore row
    /// stride); the list must be non-empty.
    pub fn merge(parts: &[Image]) -> Result<Image> {
        let Some(first) = parts.first() else {
            return Err(Error::other("merge: no images given"));
        };
        let mut data = Vec::with_capacity(parts.iter().map(|p| p.data.len()).sum());
        let mut height: u32 = 0;
        for part in parts {
            if part.layout != first.layout {
                return Err(Error::format_mismatch(first.layout, part.layout));
            }
            if part.width != first.width {
                return Err(Error::other(format!(
                    "merge: width {} does not match {}",
                    part.width, first.width
                )));
            }
            data.extend_from_slice(&part.data);
            height += part.height;
        }
        Ok(Self {
            data: Arc::new(data),
            width: first.width,
            height,
            layout: first.layout,
        })
    }

    /// Applies a pure color function to every pixel, preserving layout.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `f` changes the channel count; use
    /// [`map_pixels_as`](Self::map_pixels_as) for layout-changing maps.
    pub fn map_pixels<F>(&self, f: F) -> Image
    where
        F: Fn(Color) -> Color,
    {
        let c = self.channels();
        let mut data = Vec::with_capacity(self.data.len());
        for chunk in self.data.chunks_exact(c) {
            let out = f(Color::from_slice(chunk));
            debug_assert_eq!(out.channels(), c, "map_pixels must preserve channel count");
            data.extend_from_slice(out.as_slice());
        }
        Self {
            data: Arc::new(data),
            ..*self
        }
    }

    /// Applies a layout-changing color function to every pixel.
    ///
    /// The buffer is read under `src` (e.g. [`PixelLayout::Index`] for
    /// palette lookups) and the results are written under `dst`.
    ///
    /// # Errors
    ///
    /// [`Error::PixelFormatMismatch`] if `src` has a different channel
    /// count than the image's own layout; an error if `f` produces colors
    /// not matching `dst`.
    pub fn map_pixels_as<F>(&self, src: PixelLayout, dst: PixelLayout, f: F) -> Result<Image>
    where
        F: Fn(Color) -> Color,
    {
        if src.channels() != self.channels() {
            return Err(Error::format_mismatch(self.layout, src));
        }
        let sc = src.channels();
        let dc = dst.channels();
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * dc);
        for chunk in self.data.chunks_exact(sc) {
            let out = f(Color::from_slice(chunk));
            if out.channels() != dc {
                return Err(Error::other(format!(
                    "mapped color has {} channels, layout {} expects {}",
                    out.channels(),
                    dst,
                    dc
                )));
            }
            data.extend_from_slice(out.as_slice());
        }
        Ok(Self {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
            layout: dst,
        })
    }

    /// Ordered left fold over pixels in row-major order.
    pub fn reduce_pixels<A, F>(&self, init: A, f: F) -> A
    where
        F: Fn(A, Color) -> A,
    {
        let c = self.channels();
        let mut acc = init;
        for chunk in self.data.chunks_exact(c) {
            acc = f(acc, Color::from_slice(chunk));
        }
        acc
    }

    /// Builds a 256-bucket frequency table over one channel's byte values.
    ///
    /// # Errors
    ///
    /// Fails if `channel` is not less than the layout's channel count.
    pub fn histogram(&self, channel: usize) -> Result<Box<[u64; 256]>> {
        if channel >= self.channels() {
            return Err(Error::other(format!(
                "channel {channel} out of range for layout {}",
                self.layout
            )));
        }
        Ok(self.reduce_pixels(Box::new([0u64; 256]), |mut acc, px| {
            acc[px.as_slice()[channel] as usize] += 1;
            acc
        }))
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 gray gradient: pixel (x, y) = 10*y + x.
    fn gradient() -> Image {
        let data: Vec<u8> = (0..4).flat_map(|y| (0..4).map(move |x| 10 * y + x)).collect();
        Image::from_data(4, 4, PixelLayout::Gray, data).unwrap()
    }

    #[test]
    fn test_buffer_length_invariant() {
        let img = Image::new(5, 3, PixelLayout::Rgba);
        assert_eq!(img.data().len(), 5 * 3 * 4);
        assert_eq!(img.row_stride(), 20);
    }

    #[test]
    fn test_from_data_wrong_size() {
        let result = Image::from_data(4, 4, PixelLayout::Rgb, vec![0u8; 10]);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_set_get_pixel() {
        let img = Image::new(4, 4, PixelLayout::Rgb);
        let img2 = img.set_pixel(2, 1, Color::rgb(9, 8, 7)).unwrap();
        assert_eq!(img2.pixel(2, 1).unwrap(), Color::rgb(9, 8, 7));
        // Source value untouched
        assert_eq!(img.pixel(2, 1).unwrap(), Color::rgb(0, 0, 0));
        // Neighbors untouched
        assert_eq!(img2.pixel(1, 1).unwrap(), Color::rgb(0, 0, 0));
        assert_eq!(img2.pixel(3, 1).unwrap(), Color::rgb(0, 0, 0));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let img = Image::new(4, 4, PixelLayout::Gray);
        assert!(img.pixel(4, 0).is_err());
        assert!(img.pixel(0, 4).is_err());
        assert!(img.set_pixel(0, 9, Color::gray(1)).is_err());
    }

    #[test]
    fn test_pixel_clamped() {
        let img = gradient();
        assert_eq!(img.pixel_clamped(-3, -3), Color::gray(0));
        assert_eq!(img.pixel_clamped(10, 1), Color::gray(13));
        assert_eq!(img.pixel_clamped(2, 2), Color::gray(22));
    }

    #[test]
    fn test_crop() {
        let img = gradient();
        let c = img.crop(Rect::new(1, 1, 2, 2)).unwrap();
        assert_eq!(c.width(), 2);
        assert_eq!(c.data(), &[11, 12, 21, 22]);

        // Overflowing rect is intersected
        let c = img.crop(Rect::new(3, 3, 10, 10)).unwrap();
        assert_eq!((c.width(), c.height()), (1, 1));
        assert_eq!(c.data(), &[33]);

        assert!(matches!(
            img.crop(Rect::new(8, 8, 2, 2)),
            Err(Error::NoOverlap { .. })
        ));
    }

    #[test]
    fn test_subimage_clipping() {
        let img = gradient();
        // Negative origin clips to the top-left quadrant
        let s = img.subimage(-2, -2, 4, 4).unwrap();
        assert_eq!((s.width(), s.height()), (2, 2));
        assert_eq!(s.data(), &[0, 1, 10, 11]);

        // Fully outside
        assert!(img.subimage(10, 0, 2, 2).is_err());
    }

    #[test]
    fn test_subimage_strict() {
        let img = gradient();
        let s = img.subimage_strict(2, 2, 2, 2).unwrap();
        assert_eq!(s.data(), &[22, 23, 32, 33]);
        assert!(matches!(
            img.subimage_strict(3, 3, 2, 2),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_set_subimage_strict() {
        let img = gradient();
        let sub = Image::filled(2, 2, PixelLayout::Gray, Color::gray(99)).unwrap();
        let out = img.set_subimage_strict(1, 1, &sub).unwrap();
        assert_eq!(
            out.data(),
            &[0, 1, 2, 3, 10, 99, 99, 13, 20, 99, 99, 23, 30, 31, 32, 33]
        );
        assert!(img.set_subimage_strict(3, 3, &sub).is_err());
    }

    #[test]
    fn test_set_subimage_clips() {
        let img = gradient();
        let sub = Image::filled(2, 2, PixelLayout::Gray, Color::gray(99)).unwrap();
        // Overflows bottom-right corner: only (3,3) written
        let out = img.set_subimage(3, 3, &sub).unwrap();
        assert_eq!(out.pixel(3, 3).unwrap(), Color::gray(99));
        assert_eq!(out.pixel(2, 3).unwrap(), Color::gray(32));

        // Overflows top-left: sub is translated and re-clipped
        let out = img.set_subimage(-1, -1, &sub).unwrap();
        assert_eq!(out.pixel(0, 0).unwrap(), Color::gray(99));
        assert_eq!(out.pixel(1, 0).unwrap(), Color::gray(1));

        assert!(matches!(
            img.set_subimage(100, 100, &sub),
            Err(Error::NoOverlap { .. })
        ));
    }

    #[test]
    fn test_set_subimage_format_mismatch() {
        let img = Image::new(4, 4, PixelLayout::Rgb);
        let sub = Image::new(2, 2, PixelLayout::Bgr);
        assert!(matches!(
            img.set_subimage_strict(0, 0, &sub),
            Err(Error::PixelFormatMismatch { .. })
        ));
    }

    #[test]
    fn test_reflect_involutions() {
        let img = gradient();
        assert_eq!(img.reflect_x().reflect_x(), img);
        assert_eq!(img.reflect_y().reflect_y(), img);
        assert_eq!(img.reflect_y().pixel(0, 0).unwrap(), Color::gray(30));
        assert_eq!(img.reflect_x().pixel(0, 0).unwrap(), Color::gray(3));
    }

    #[test]
    fn test_rotate_laws() {
        let img = gradient();
        assert_eq!(img.rotate_180().rotate_180(), img);
        assert_eq!(img.rotate_90().rotate_90().rotate_90().rotate_90(), img);
        assert_eq!(img.rotate_90().rotate_270(), img);
    }

    #[test]
    fn test_rotate_90_rect() {
        // 2x1 gray [1, 2] rotated CW -> 1x2, top = 1 (bottom-left goes up)
        let img = Image::from_data(2, 1, PixelLayout::Gray, vec![1, 2]).unwrap();
        let r = img.rotate_90();
        assert_eq!((r.width(), r.height()), (1, 2));
        assert_eq!(r.data(), &[1, 2]);

        let r = img.rotate_270();
        assert_eq!(r.data(), &[2, 1]);
    }

    #[test]
    fn test_split_merge_roundtrip() {
        let img = gradient();
        for n in 1..img.height() as usize {
            let parts = img.split_n(n);
            assert_eq!(Image::merge(&parts).unwrap(), img, "n = {n}");
        }
    }

    #[test]
    fn test_split_last_absorbs_remainder() {
        let img = gradient(); // 4 rows, stride 4
        let parts = img.split(4 * 3); // 3 rows per chunk
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].height(), 4);

        let parts = img.split(4); // 1 row per chunk
        assert_eq!(parts.len(), 4);
    }

    #[test]
    fn test_merge_rejects_mixed() {
        let a = Image::new(4, 2, PixelLayout::Gray);
        let b = Image::new(5, 2, PixelLayout::Gray);
        assert!(Image::merge(&[a.clone(), b]).is_err());
        let c = Image::new(4, 2, PixelLayout::Index);
        assert!(matches!(
            Image::merge(&[a, c]),
            Err(Error::PixelFormatMismatch { .. })
        ));
    }

    #[test]
    fn test_map_pixels() {
        let img = gradient();
        let out = img.map_pixels(|c| Color::gray(c.as_slice()[0].saturating_add(100)));
        assert_eq!(out.pixel(3, 3).unwrap(), Color::gray(133));
    }

    #[test]
    fn test_map_pixels_as_palette() {
        // Index image expanded to rgb through a palette
        let palette = [Color::rgb(0, 0, 0), Color::rgb(255, 0, 0)];
        let img = Image::from_data(2, 1, PixelLayout::Index, vec![0, 1]).unwrap();
        let rgb = img
            .map_pixels_as(PixelLayout::Index, PixelLayout::Rgb, |c| {
                palette[c.as_slice()[0] as usize]
            })
            .unwrap();
        assert_eq!(rgb.layout(), PixelLayout::Rgb);
        assert_eq!(rgb.data(), &[0, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn test_reduce_ordered() {
        let img = gradient();
        // Row-major order: first pixel folded first
        let first = img.reduce_pixels(None, |acc, px| acc.or(Some(px)));
        assert_eq!(first, Some(Color::gray(0)));
        let sum = img.reduce_pixels(0u64, |acc, px| acc + px.as_slice()[0] as u64);
        assert_eq!(sum, (0u64..4).map(|y| (0..4).map(|x| 10 * y + x).sum::<u64>()).sum());
    }

    #[test]
    fn test_histogram() {
        let img = Image::filled(4, 4, PixelLayout::Rgb, Color::rgb(5, 6, 7)).unwrap();
        let h = img.histogram(1).unwrap();
        assert_eq!(h[6], 16);
        assert_eq!(h[5], 0);
        assert!(img.histogram(3).is_err());
    }
}

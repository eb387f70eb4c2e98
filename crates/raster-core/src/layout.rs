//! Pixel layout tags and compact color values.
//!
//! A [`PixelLayout`] names the channel order and count of a byte-packed
//! pixel; a [`Color`] holds the bytes of one pixel. Layouts form a closed
//! set, and every layout-dependent decision goes through the lookup methods
//! here rather than ad-hoc matching at call sites.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Color, PixelLayout};
//!
//! let px = Color::rgb(200, 100, 50);
//! assert_eq!(px.channels(), 3);
//!
//! // Reorder into another layout through the canonical RGBA form
//! let rgba = px.to_rgba(PixelLayout::Rgb);
//! let bgr = Color::from_rgba(rgba, PixelLayout::Bgr);
//! assert_eq!(bgr.as_slice(), &[50, 100, 200]);
//! ```

/// Channel order and count of a byte-packed pixel.
///
/// The set is closed: operations dispatch on the tag via the lookup
/// methods ([`channels`](Self::channels), [`has_alpha`](Self::has_alpha),
/// [`rgba_offsets`](Self::rgba_offsets)). Layout-changing operations take
/// source and destination tags explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single gray channel.
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Blue, green, red.
    Bgr,
    /// Blue, green, red, alpha.
    Bgra,
    /// Alpha, red, green, blue.
    Argb,
    /// Alpha, blue, green, red.
    Abgr,
    /// Single palette-index channel.
    Index,
}

impl PixelLayout {
    /// Returns the number of byte channels per pixel (1, 3 or 4).
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray | Self::Index => 1,
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra | Self::Argb | Self::Abgr => 4,
        }
    }

    /// Returns `true` if the layout carries an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba | Self::Bgra | Self::Argb | Self::Abgr)
    }

    /// Byte offsets of the R, G, B, A components within a pixel.
    ///
    /// For layouts without alpha the fourth entry is `None`; for the
    /// single-channel layouts all color components read channel 0.
    #[inline]
    pub const fn rgba_offsets(self) -> [Option<usize>; 4] {
        match self {
            Self::Gray | Self::Index => [Some(0), Some(0), Some(0), None],
            Self::Rgb => [Some(0), Some(1), Some(2), None],
            Self::Bgr => [Some(2), Some(1), Some(0), None],
            Self::Rgba => [Some(0), Some(1), Some(2), Some(3)],
            Self::Bgra => [Some(2), Some(1), Some(0), Some(3)],
            Self::Argb => [Some(1), Some(2), Some(3), Some(0)],
            Self::Abgr => [Some(3), Some(2), Some(1), Some(0)],
        }
    }

    /// Returns the layout's lowercase tag name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Bgr => "bgr",
            Self::Bgra => "bgra",
            Self::Argb => "argb",
            Self::Abgr => "abgr",
            Self::Index => "index",
        }
    }
}

impl std::fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One pixel's bytes, at most four channels.
///
/// `Color` is a compact inline value; the active channel count follows the
/// layout it was built for. Channel meaning is carried by the
/// [`PixelLayout`] of the surrounding buffer, not by the color itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    data: [u8; 4],
    len: u8,
}

impl Color {
    /// Creates a single-channel color.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self {
            data: [v, 0, 0, 0],
            len: 1,
        }
    }

    /// Creates a three-channel color in buffer order.
    #[inline]
    pub const fn rgb(c0: u8, c1: u8, c2: u8) -> Self {
        Self {
            data: [c0, c1, c2, 0],
            len: 3,
        }
    }

    /// Creates a four-channel color in buffer order.
    #[inline]
    pub const fn rgba(c0: u8, c1: u8, c2: u8, c3: u8) -> Self {
        Self {
            data: [c0, c1, c2, c3],
            len: 4,
        }
    }

    /// Creates a color with `channels` channels all set to `v`.
    #[inline]
    pub fn splat(v: u8, channels: usize) -> Self {
        debug_assert!((1..=4).contains(&channels));
        let mut data = [0u8; 4];
        data[..channels].fill(v);
        Self {
            data,
            len: channels as u8,
        }
    }

    /// Creates a color from a 1-4 byte slice in buffer order.
    ///
    /// # Panics
    ///
    /// Panics if the slice is empty or longer than four bytes.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Self {
        assert!(
            !bytes.is_empty() && bytes.len() <= 4,
            "color must have 1-4 channels"
        );
        let mut data = [0u8; 4];
        data[..bytes.len()].copy_from_slice(bytes);
        Self {
            data,
            len: bytes.len() as u8,
        }
    }

    /// Returns the active channel bytes in buffer order.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Returns the number of active channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.len as usize
    }

    /// Reorders this color into canonical `[r, g, b, a]` form.
    ///
    /// `layout` names the buffer order the color was read under. Missing
    /// alpha reads as 255 (opaque).
    #[inline]
    pub fn to_rgba(self, layout: PixelLayout) -> [u8; 4] {
        let offsets = layout.rgba_offsets();
        let mut rgba = [0u8; 4];
        for (i, off) in offsets.iter().enumerate() {
            rgba[i] = match off {
                Some(o) => self.data[*o],
                None => 255,
            };
        }
        rgba
    }

    /// Builds a color in `layout` buffer order from canonical `[r, g, b, a]`.
    ///
    /// Components with no slot in the layout are dropped; the
    /// single-channel layouts take the red component as-is (raw component
    /// copy, no color-space math).
    #[inline]
    pub fn from_rgba(rgba: [u8; 4], layout: PixelLayout) -> Self {
        let channels = layout.channels();
        let mut data = [0u8; 4];
        for (i, off) in layout.rgba_offsets().iter().enumerate() {
            if let Some(o) = off {
                data[*o] = rgba[i];
            }
        }
        Self {
            data,
            len: channels as u8,
        }
    }

    /// Returns the channels widened to `f32`, unused lanes zero.
    #[inline]
    pub fn to_float(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        for (i, b) in self.as_slice().iter().enumerate() {
            out[i] = *b as f32;
        }
        out
    }

    /// Builds a color by rounding and clamping float channels to byte range.
    #[inline]
    pub fn from_float_clamped(values: [f32; 4], channels: usize) -> Self {
        debug_assert!((1..=4).contains(&channels));
        let mut data = [0u8; 4];
        for (d, v) in data[..channels].iter_mut().zip(values.iter()) {
            *d = v.round().clamp(0.0, 255.0) as u8;
        }
        Self {
            data,
            len: channels as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_channels() {
        assert_eq!(PixelLayout::Gray.channels(), 1);
        assert_eq!(PixelLayout::Index.channels(), 1);
        assert_eq!(PixelLayout::Rgb.channels(), 3);
        assert_eq!(PixelLayout::Bgr.channels(), 3);
        assert_eq!(PixelLayout::Rgba.channels(), 4);
        assert_eq!(PixelLayout::Abgr.channels(), 4);
    }

    #[test]
    fn test_layout_alpha() {
        assert!(!PixelLayout::Rgb.has_alpha());
        assert!(PixelLayout::Argb.has_alpha());
        assert!(PixelLayout::Bgra.has_alpha());
    }

    #[test]
    fn test_color_slice_roundtrip() {
        let c = Color::from_slice(&[1, 2, 3]);
        assert_eq!(c.as_slice(), &[1, 2, 3]);
        assert_eq!(c.channels(), 3);
        assert_eq!(c, Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_to_rgba_orders() {
        let bgra = Color::rgba(10, 20, 30, 40); // b=10 g=20 r=30 a=40
        assert_eq!(bgra.to_rgba(PixelLayout::Bgra), [30, 20, 10, 40]);

        let argb = Color::rgba(40, 30, 20, 10); // a=40 r=30 g=20 b=10
        assert_eq!(argb.to_rgba(PixelLayout::Argb), [30, 20, 10, 40]);

        // Missing alpha reads opaque
        assert_eq!(Color::rgb(1, 2, 3).to_rgba(PixelLayout::Rgb), [1, 2, 3, 255]);
        assert_eq!(Color::gray(7).to_rgba(PixelLayout::Gray), [7, 7, 7, 255]);
    }

    #[test]
    fn test_from_rgba_inverse() {
        let rgba = [30, 20, 10, 40];
        for layout in [
            PixelLayout::Rgba,
            PixelLayout::Bgra,
            PixelLayout::Argb,
            PixelLayout::Abgr,
        ] {
            let c = Color::from_rgba(rgba, layout);
            assert_eq!(c.to_rgba(layout), rgba, "layout {layout}");
        }
    }

    #[test]
    fn test_from_float_clamped() {
        let c = Color::from_float_clamped([300.0, -5.0, 127.4, 127.6], 4);
        assert_eq!(c.as_slice(), &[255, 0, 127, 128]);
    }

    #[test]
    fn test_splat() {
        let c = Color::splat(9, 3);
        assert_eq!(c.as_slice(), &[9, 9, 9]);
    }
}

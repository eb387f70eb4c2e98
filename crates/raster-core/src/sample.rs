//! Point sampling with wrap policies and interpolation.
//!
//! Positions may be given in pixel space or normalized to `[0, 1]`. A
//! [`WrapMode`] forces the unit coordinate into range before it is scaled
//! back to pixel space, then an [`Interp`] picks either the nearest pixel
//! or a bilinear blend of the surrounding 2x2 box.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Color, Image, Interp, PixelLayout, WrapMode};
//!
//! let img = Image::filled(4, 4, PixelLayout::Gray, Color::gray(80)).unwrap();
//! let px = img.sample(0.5, 0.5, false, WrapMode::ClampEdge, Interp::Nearest);
//! assert_eq!(px, Color::gray(80));
//! ```

use crate::{Color, Image};

/// Policy forcing an out-of-range unit coordinate into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Take the fractional part (tiles the image).
    Repeat,
    /// Triangle-wave fractional part (tiles with alternating mirroring).
    RepeatMirror,
    /// Saturate to `[0, 1]`.
    #[default]
    ClampEdge,
}

impl WrapMode {
    /// Applies the policy to a unit coordinate.
    #[inline]
    pub fn apply(self, u: f64) -> f64 {
        match self {
            Self::Repeat => u - u.floor(),
            Self::RepeatMirror => {
                let t = u.rem_euclid(2.0);
                if t > 1.0 { 2.0 - t } else { t }
            }
            Self::ClampEdge => u.clamp(0.0, 1.0),
        }
    }
}

/// Interpolation mode for [`Image::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interp {
    /// Nearest pixel (floor of the pixel-space position, clamped).
    #[default]
    Nearest,
    /// Bilinear blend of the surrounding 2x2 box.
    Bilinear,
}

impl Image {
    /// Samples the image at an arbitrary position.
    ///
    /// When `normalized` is true, `(x, y)` are unit coordinates; otherwise
    /// they are divided by the image dimensions first. The wrap policy
    /// forces the unit coordinate into `[0, 1]` before scaling back to
    /// pixel space.
    ///
    /// # Panics
    ///
    /// Panics if the image is empty.
    pub fn sample(&self, x: f64, y: f64, normalized: bool, wrap: WrapMode, interp: Interp) -> Color {
        assert!(!self.is_empty(), "sample on empty image");
        let w = self.width() as f64;
        let h = self.height() as f64;
        let (u, v) = if normalized { (x, y) } else { (x / w, y / h) };
        let px = wrap.apply(u) * w;
        let py = wrap.apply(v) * h;
        match interp {
            Interp::Nearest => {
                let ix = (px.floor() as i64).clamp(0, self.width() as i64 - 1);
                let iy = (py.floor() as i64).clamp(0, self.height() as i64 - 1);
                self.pixel_clamped(ix, iy)
            }
            Interp::Bilinear => self.sample_bilinear(px, py),
        }
    }

    /// Bilinear blend at a pixel-space position.
    ///
    /// The 2x2 sample box around `(x, y)` is `i1 = floor(x - 0.5)` and
    /// `i2 = clamp(0, floor(x + 0.5), w - 1)` (likewise for `j`), with
    /// fractional weights taken from `x - 0.5`. The four corner weights
    /// sum to 1; at the image edges the box degenerates so the corner
    /// pixel is weighted repeatedly.
    pub(crate) fn sample_bilinear(&self, x: f64, y: f64) -> Color {
        let w = self.width() as i64;
        let h = self.height() as i64;
        let i1 = ((x - 0.5).floor() as i64).max(0);
        let i2 = ((x + 0.5).floor() as i64).clamp(0, w - 1);
        let j1 = ((y - 0.5).floor() as i64).max(0);
        let j2 = ((y + 0.5).floor() as i64).clamp(0, h - 1);
        debug_assert!(i1 <= i2 && i2 < w, "sample box out of bounds");
        debug_assert!(j1 <= j2 && j2 < h, "sample box out of bounds");

        let xf = (x - 0.5) - (x - 0.5).floor();
        let yf = (y - 0.5) - (y - 0.5).floor();
        let weights = [
            ((1.0 - xf) * (1.0 - yf), i1, j1),
            ((1.0 - xf) * yf, i1, j2),
            (xf * (1.0 - yf), i2, j1),
            (xf * yf, i2, j2),
        ];

        let channels = self.channels();
        let mut acc = [0.0f32; 4];
        for (weight, ix, jy) in weights {
            let corner = self.pixel_clamped(ix, jy).to_float();
            for c in 0..channels {
                acc[c] += weight as f32 * corner[c];
            }
        }
        Color::from_float_clamped(acc, channels)
    }
}

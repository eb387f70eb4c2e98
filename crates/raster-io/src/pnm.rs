//! Portable-format (PBM/PGM/PPM) codec.
//!
//! The portable family is selected by a two-character magic number:
//!
//! | Magic | Pixel class | Encoding |
//! |-------|-------------|----------|
//! | P1 | 1-bit mask | ASCII `'0'`/`'1'` tokens |
//! | P2 | 1-byte gray | ASCII decimal integers |
//! | P3 | 3-byte rgb | ASCII decimal integers |
//! | P4 | 1-bit mask | raw binary, row-padded to byte |
//! | P5 | 1-byte gray | raw binary bytes |
//! | P6 | 3-byte rgb | raw binary byte triples |
//!
//! The header lexer skips ASCII whitespace, treats `#` as a comment
//! running to end-of-line, and reads width, height and (for the gray/rgb
//! classes) a declared max value.
//!
//! # Max-value correction
//!
//! Declared max values 256, 128, 64, 32 and 16 are taken to mean "the
//! bit width implies the max" and are corrected to 255, 127, 63, 31 and
//! 15. Any other declared value passes through unchanged. The table is
//! deliberately not generalized further.
//!
//! # Example
//!
//! ```rust
//! use raster_io::pnm::{decode, Pnm};
//!
//! let bytes = b"P2\n2 2\n255\n0 10 20 30\n";
//! let Pnm::Pixels(img) = decode(bytes).unwrap() else { panic!() };
//! assert_eq!(img.data(), &[0, 10, 20, 30]);
//! ```

use crate::{IoError, IoResult};
use raster_core::{Bitmap, Image, PixelLayout};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// The six members of the portable format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnmFormat {
    /// P1: ASCII 1-bit mask.
    AsciiBitmap,
    /// P2: ASCII 1-byte gray.
    AsciiGray,
    /// P3: ASCII 3-byte rgb.
    AsciiRgb,
    /// P4: binary 1-bit mask.
    BinaryBitmap,
    /// P5: binary 1-byte gray.
    BinaryGray,
    /// P6: binary 3-byte rgb.
    BinaryRgb,
}

impl PnmFormat {
    /// Returns the two-character magic of this format.
    pub const fn magic(self) -> &'static [u8; 2] {
        match self {
            Self::AsciiBitmap => b"P1",
            Self::AsciiGray => b"P2",
            Self::AsciiRgb => b"P3",
            Self::BinaryBitmap => b"P4",
            Self::BinaryGray => b"P5",
            Self::BinaryRgb => b"P6",
        }
    }

    /// Looks a format up by its magic.
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"P1" => Some(Self::AsciiBitmap),
            b"P2" => Some(Self::AsciiGray),
            b"P3" => Some(Self::AsciiRgb),
            b"P4" => Some(Self::BinaryBitmap),
            b"P5" => Some(Self::BinaryGray),
            b"P6" => Some(Self::BinaryRgb),
            _ => None,
        }
    }

    /// Returns `true` for the 1-bit mask class.
    pub const fn is_bitmap(self) -> bool {
        matches!(self, Self::AsciiBitmap | Self::BinaryBitmap)
    }
}

/// A decoded portable-format value: a bit mask or a pixel image.
#[derive(Debug, Clone, PartialEq)]
pub enum Pnm {
    /// 1-bit mask (P1/P4).
    Bits(Bitmap),
    /// Gray or rgb pixels (P2/P3/P5/P6).
    Pixels(Image),
}

impl Pnm {
    /// Returns the width in cells.
    pub fn width(&self) -> u32 {
        match self {
            Self::Bits(b) => b.width(),
            Self::Pixels(i) => i.width(),
        }
    }

    /// Returns the height in cells.
    pub fn height(&self) -> u32 {
        match self {
            Self::Bits(b) => b.height(),
            Self::Pixels(i) => i.height(),
        }
    }

    /// The binary format matching this value's pixel class.
    pub fn binary_format(&self) -> PnmFormat {
        match self {
            Self::Bits(_) => PnmFormat::BinaryBitmap,
            Self::Pixels(i) if i.channels() == 1 => PnmFormat::BinaryGray,
            Self::Pixels(_) => PnmFormat::BinaryRgb,
        }
    }
}

/// Maps "bit-width implies max" declarations to the real max value.
#[inline]
fn correct_maxval(declared: u32) -> u32 {
    match declared {
        256 => 255,
        128 => 127,
        64 => 63,
        32 => 31,
        16 => 15,
        other => other,
    }
}

/// Rescales a clamped sample to byte range.
#[inline]
fn rescale(v: u32, maxval: u32) -> u8 {
    if maxval == 255 {
        v as u8
    } else {
        (255.0 * v as f64 / maxval as f64).round() as u8
    }
}

/// Header lexer over the raw byte stream.
struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Skips whitespace and `#` comments running to end-of-line.
    fn skip_space(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while let Some(c) = self.bump() {
                    if c == b'\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Reads one ASCII decimal token.
    fn next_int(&mut self) -> IoResult<u32> {
        self.skip_space();
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.peek() {
                None => IoError::TruncatedData("expected integer, found end of input".into()),
                Some(b) => IoError::Parse(format!("expected integer, found byte 0x{b:02x}")),
            });
        }
        // Digits only; overflow is the one way this can fail
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IoError::Parse("integer overflow in header".into()))
    }

    /// Consumes the single whitespace byte separating a binary header
    /// from its pixel data.
    fn skip_single_space(&mut self) {
        if matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Returns the unconsumed remainder of the stream.
    fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }
}

/// Decodes a portable-format byte stream.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for an unknown magic,
/// [`IoError::UnsupportedMaxValue`] for binary rgb with a max value other
/// than 255, and parse/truncation errors for malformed data.
pub fn decode(bytes: &[u8]) -> IoResult<Pnm> {
    let Some(magic) = bytes.get(..2) else {
        return Err(IoError::UnsupportedFormat("missing magic number".into()));
    };
    let Some(format) = PnmFormat::from_magic(magic) else {
        return Err(IoError::UnsupportedFormat(format!(
            "unknown magic {:?}",
            String::from_utf8_lossy(magic)
        )));
    };
    let mut lex = Lexer::new(&bytes[2..]);
    let width = lex.next_int()?;
    let height = lex.next_int()?;
    trace!(?format, width, height, "pnm decode");

    match format {
        PnmFormat::AsciiBitmap => Ok(Pnm::Bits(decode_ascii_bits(&mut lex, width, height)?)),
        PnmFormat::BinaryBitmap => {
            lex.skip_single_space();
            let stride = (width as usize).div_ceil(8);
            let needed = stride * height as usize;
            let data = take(lex.rest(), needed, "bitmap rows")?;
            Ok(Pnm::Bits(Bitmap::from_data(width, height, data.to_vec())?))
        }
        PnmFormat::AsciiGray | PnmFormat::AsciiRgb => {
            let maxval = read_maxval(&mut lex)?;
            let (layout, channels) = class_of(format);
            let data = decode_ascii_samples(&mut lex, width, height, channels, maxval)?;
            Ok(Pnm::Pixels(Image::from_data(width, height, layout, data)?))
        }
        PnmFormat::BinaryGray => {
            let maxval = read_maxval(&mut lex)?;
            lex.skip_single_space();
            let needed = width as usize * height as usize;
            let raw = take(lex.rest(), needed, "gray samples")?;
            let data = if maxval == 255 {
                raw.to_vec()
            } else {
                // Out-of-range source bytes clamp to maxval before rescale
                raw.iter()
                    .map(|b| rescale((*b as u32).min(maxval), maxval))
                    .collect()
            };
            Ok(Pnm::Pixels(Image::from_data(
                width,
                height,
                PixelLayout::Gray,
                data,
            )?))
        }
        PnmFormat::BinaryRgb => {
            let maxval = read_maxval(&mut lex)?;
            if maxval != 255 {
                // No rescale path exists for 3-byte binary data
                return Err(IoError::UnsupportedMaxValue(maxval));
            }
            lex.skip_single_space();
            let needed = width as usize * height as usize * 3;
            let raw = take(lex.rest(), needed, "rgb samples")?;
            Ok(Pnm::Pixels(Image::from_data(
                width,
                height,
                PixelLayout::Rgb,
                raw.to_vec(),
            )?))
        }
    }
}

/// Pixel layout and channel count of a gray/rgb format.
fn class_of(format: PnmFormat) -> (PixelLayout, usize) {
    match format {
        PnmFormat::AsciiGray | PnmFormat::BinaryGray => (PixelLayout::Gray, 1),
        _ => (PixelLayout::Rgb, 3),
    }
}

/// Reads and corrects the declared max value.
fn read_maxval(lex: &mut Lexer<'_>) -> IoResult<u32> {
    let maxval = correct_maxval(lex.next_int()?);
    if maxval == 0 {
        return Err(IoError::Parse("max value must be positive".into()));
    }
    Ok(maxval)
}

/// Slices exactly `needed` bytes off the front of `data`.
fn take<'a>(data: &'a [u8], needed: usize, what: &str) -> IoResult<&'a [u8]> {
    data.get(..needed).ok_or_else(|| {
        IoError::TruncatedData(format!("{what}: need {needed} bytes, have {}", data.len()))
    })
}

/// Decodes P1 pixel data.
///
/// Each `'0'`/`'1'` appends one bit to the current row; a newline flushes
/// the accumulated row, padding it to a byte boundary; trailing content
/// without a final newline is flushed at end-of-input. Other whitespace
/// is a separator only.
fn decode_ascii_bits(lex: &mut Lexer<'_>, width: u32, height: u32) -> IoResult<Bitmap> {
    let stride = (width as usize).div_ceil(8);
    let mut data = Vec::with_capacity(stride * height as usize);
    let mut acc = 0u8;
    let mut used = 0u8;
    let mut row_bits = 0u64;

    let flush = |data: &mut Vec<u8>, acc: &mut u8, used: &mut u8, row_bits: &mut u64| {
        if *row_bits == 0 {
            return;
        }
        if *used > 0 {
            data.push(*acc << (8 - *used));
            *acc = 0;
            *used = 0;
        }
        *row_bits = 0;
    };

    while let Some(b) = lex.bump() {
        match b {
            b'0' | b'1' => {
                acc = (acc << 1) | (b - b'0');
                used += 1;
                row_bits += 1;
                if used == 8 {
                    data.push(acc);
                    acc = 0;
                    used = 0;
                }
            }
            b'\n' => flush(&mut data, &mut acc, &mut used, &mut row_bits),
            b if b.is_ascii_whitespace() => {}
            other => {
                return Err(IoError::Parse(format!(
                    "expected '0' or '1', found byte 0x{other:02x}"
                )));
            }
        }
    }
    flush(&mut data, &mut acc, &mut used, &mut row_bits);
    Ok(Bitmap::from_data(width, height, data)?)
}

/// Decodes P2/P3 pixel data: whitespace-delimited decimal samples,
/// clamped to the max value and rescaled to byte range.
fn decode_ascii_samples(
    lex: &mut Lexer<'_>,
    width: u32,
    height: u32,
    channels: usize,
    maxval: u32,
) -> IoResult<Vec<u8>> {
    let count = width as usize * height as usize * channels;
    let mut data = Vec::with_capacity(count);
    for _ in 0..count {
        let v = lex.next_int()?;
        data.push(rescale(v.min(maxval), maxval));
    }
    Ok(data)
}

/// Encodes a value into one of the portable formats.
///
/// Exact inverse of [`decode`] for matching pixel classes with max value
/// 255.
///
/// # Errors
///
/// [`IoError::Encode`] when the value's pixel class does not match the
/// requested format (a bitmap in a gray format, a gray image in an rgb
/// format, and so on).
pub fn encode(value: &Pnm, format: PnmFormat) -> IoResult<Vec<u8>> {
    match (value, format) {
        (Pnm::Bits(bits), PnmFormat::AsciiBitmap) => {
            let mut out = header(format, bits.width(), bits.height(), None);
            for y in 0..bits.height() {
                for x in 0..bits.width() {
                    out.push(if bits.bit(x, y)? { b'1' } else { b'0' });
                }
                out.push(b'\n');
            }
            Ok(out)
        }
        (Pnm::Bits(bits), PnmFormat::BinaryBitmap) => {
            let mut out = header(format, bits.width(), bits.height(), None);
            out.extend_from_slice(bits.data());
            Ok(out)
        }
        (Pnm::Pixels(img), PnmFormat::AsciiGray | PnmFormat::AsciiRgb) => {
            check_class(img, format)?;
            let mut out = header(format, img.width(), img.height(), Some(255));
            for row in img.data().chunks_exact(img.row_stride().max(1)) {
                let mut first = true;
                for sample in row {
                    if !first {
                        out.push(b' ');
                    }
                    out.extend_from_slice(sample.to_string().as_bytes());
                    first = false;
                }
                out.push(b'\n');
            }
            Ok(out)
        }
        (Pnm::Pixels(img), PnmFormat::BinaryGray | PnmFormat::BinaryRgb) => {
            check_class(img, format)?;
            let mut out = header(format, img.width(), img.height(), Some(255));
            out.extend_from_slice(img.data());
            Ok(out)
        }
        (value, format) => Err(IoError::Encode(format!(
            "{} value cannot be written as {:?}",
            match value {
                Pnm::Bits(_) => "bitmap",
                Pnm::Pixels(_) => "pixel",
            },
            format
        ))),
    }
}

/// Builds a PNM header.
fn header(format: PnmFormat, width: u32, height: u32, maxval: Option<u32>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format.magic());
    out.extend_from_slice(format!("\n{width} {height}\n").as_bytes());
    if let Some(maxval) = maxval {
        out.extend_from_slice(format!("{maxval}\n").as_bytes());
    }
    out
}

/// Checks that an image's layout matches a gray/rgb format.
fn check_class(img: &Image, format: PnmFormat) -> IoResult<()> {
    let (layout, _) = class_of(format);
    if img.layout() != layout {
        return Err(IoError::Encode(format!(
            "layout {} cannot be written as {:?}",
            img.layout(),
            format
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii_gray_vector() {
        let bytes = b"P2\n4 4\n255\n1 2 3 4 11 12 13 14 21 22 23 24 31 32 33 34\n";
        let Pnm::Pixels(img) = decode(bytes).unwrap() else {
            panic!("expected pixels");
        };
        assert_eq!(img.layout(), PixelLayout::Gray);
        assert_eq!((img.width(), img.height()), (4, 4));
        assert_eq!(
            img.data(),
            &[1, 2, 3, 4, 11, 12, 13, 14, 21, 22, 23, 24, 31, 32, 33, 34]
        );
    }

    #[test]
    fn test_decode_ascii_bitmap_vector() {
        let bytes = b"P1\n4 4\n0 1 0 1\n1 0 1 0\n0 1 0 1\n1 0 1 0\n";
        let Pnm::Bits(bits) = decode(bytes).unwrap() else {
            panic!("expected bits");
        };
        assert_eq!(bits.row_stride(), 1);
        assert_eq!(bits.data(), &[0x50, 0xA0, 0x50, 0xA0]);
    }

    #[test]
    fn test_decode_p1_adjacent_bits_and_missing_final_newline() {
        let bytes = b"P1\n4 2\n0101\n1010";
        let Pnm::Bits(bits) = decode(bytes).unwrap() else {
            panic!("expected bits");
        };
        assert_eq!(bits.data(), &[0x50, 0xA0]);
    }

    #[test]
    fn test_decode_header_comments() {
        let bytes = b"P2 # portable graymap\n# size\n2 1\n255\n7 9\n";
        let Pnm::Pixels(img) = decode(bytes).unwrap() else {
            panic!("expected pixels");
        };
        assert_eq!(img.data(), &[7, 9]);
    }

    #[test]
    fn test_unknown_magic() {
        assert!(matches!(
            decode(b"P9\n1 1\n255\n0\n"),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(decode(b"P").is_err());
    }

    #[test]
    fn test_maxval_correction_table() {
        // 256 -> 255: values pass through
        let Pnm::Pixels(img) = decode(b"P2\n2 1\n256\n255 64\n").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[255, 64]);

        // 64 -> 63: full scale maps to 255
        let Pnm::Pixels(img) = decode(b"P2\n2 1\n64\n63 0\n").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[255, 0]);

        // Non-entry 100 passes through and rescales linearly
        let Pnm::Pixels(img) = decode(b"P2\n1 1\n100\n50\n").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[128]); // round(255 * 50/100)
    }

    #[test]
    fn test_ascii_samples_clamped() {
        let Pnm::Pixels(img) = decode(b"P2\n2 1\n100\n100 900\n").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[255, 255]);
    }

    #[test]
    fn test_decode_p3() {
        let Pnm::Pixels(img) = decode(b"P3\n2 1\n255\n255 0 0 0 0 255\n").unwrap() else {
            panic!()
        };
        assert_eq!(img.layout(), PixelLayout::Rgb);
        assert_eq!(img.data(), &[255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_decode_p4_raw_rows() {
        let bytes = b"P4\n12 2\n\x12\x30\x45\x60";
        let Pnm::Bits(bits) = decode(bytes).unwrap() else {
            panic!()
        };
        assert_eq!(bits.row_stride(), 2);
        assert_eq!(bits.data(), &[0x12, 0x30, 0x45, 0x60]);
    }

    #[test]
    fn test_decode_p5_passthrough_and_rescale() {
        let Pnm::Pixels(img) = decode(b"P5\n2 1\n255\n\x07\xFF").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[7, 255]);

        // Declared 16 corrects to 15; byte 200 clamps to 15 then rescales
        let Pnm::Pixels(img) = decode(b"P5\n2 1\n16\n\x0F\xC8").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[255, 255]);

        let Pnm::Pixels(img) = decode(b"P5\n1 1\n16\n\x05").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[85]); // round(255 * 5/15)
    }

    #[test]
    fn test_decode_p6_requires_255() {
        assert!(matches!(
            decode(b"P6\n1 1\n128\nabc"),
            Err(IoError::UnsupportedMaxValue(127))
        ));
        let Pnm::Pixels(img) = decode(b"P6\n1 1\n255\n\x01\x02\x03").unwrap() else {
            panic!()
        };
        assert_eq!(img.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_data() {
        assert!(matches!(
            decode(b"P5\n4 4\n255\n\x00\x01"),
            Err(IoError::TruncatedData(_))
        ));
        assert!(matches!(
            decode(b"P2\n4 4\n255\n1 2 3\n"),
            Err(IoError::TruncatedData(_))
        ));
    }

    #[test]
    fn test_p1_rejects_garbage() {
        assert!(matches!(
            decode(b"P1\n2 1\n0 2\n"),
            Err(IoError::Parse(_))
        ));
    }

    #[test]
    fn test_encode_decode_roundtrips() {
        let img = Image::from_data(3, 2, PixelLayout::Gray, vec![0, 60, 120, 180, 240, 255])
            .unwrap();
        let value = Pnm::Pixels(img);
        for format in [PnmFormat::AsciiGray, PnmFormat::BinaryGray] {
            let bytes = encode(&value, format).unwrap();
            assert_eq!(decode(&bytes).unwrap(), value, "{format:?}");
        }

        let rgb = Image::from_data(2, 1, PixelLayout::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let value = Pnm::Pixels(rgb);
        for format in [PnmFormat::AsciiRgb, PnmFormat::BinaryRgb] {
            let bytes = encode(&value, format).unwrap();
            assert_eq!(decode(&bytes).unwrap(), value, "{format:?}");
        }

        let bits = Bitmap::from_fn(12, 3, |x, y| (x * y) % 3 == 1);
        let value = Pnm::Bits(bits);
        for format in [PnmFormat::AsciiBitmap, PnmFormat::BinaryBitmap] {
            let bytes = encode(&value, format).unwrap();
            assert_eq!(decode(&bytes).unwrap(), value, "{format:?}");
        }
    }

    #[test]
    fn test_encode_class_mismatch() {
        let gray = Pnm::Pixels(Image::new(2, 2, PixelLayout::Gray));
        assert!(matches!(
            encode(&gray, PnmFormat::BinaryRgb),
            Err(IoError::Encode(_))
        ));
        let bits = Pnm::Bits(Bitmap::new(2, 2));
        assert!(matches!(
            encode(&bits, PnmFormat::AsciiGray),
            Err(IoError::Encode(_))
        ));
    }
}

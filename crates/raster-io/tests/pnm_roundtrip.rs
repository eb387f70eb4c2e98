//! File-level round trips through the portable-format codec.

use raster_core::{Bitmap, Image, PixelLayout};
use raster_io::pnm::PnmFormat;
use raster_io::{read, write, Pnm};

fn noise_gray(width: u32, height: u32) -> Image {
    let data: Vec<u8> = (0..width as usize * height as usize)
        .map(|i| (i * 131 % 251) as u8)
        .collect();
    Image::from_data(width, height, PixelLayout::Gray, data).unwrap()
}

#[test]
fn file_roundtrip_binary_gray() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.pgm");
    let value = Pnm::Pixels(noise_gray(17, 9));

    write(&path, &value, PnmFormat::BinaryGray).unwrap();
    assert_eq!(read(&path).unwrap(), value);
}

#[test]
fn file_roundtrip_ascii_bitmap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.pbm");
    let value = Pnm::Bits(Bitmap::from_fn(13, 5, |x, y| (x ^ y) & 1 == 0));

    write(&path, &value, PnmFormat::AsciiBitmap).unwrap();
    assert_eq!(read(&path).unwrap(), value);
}

#[test]
fn file_roundtrip_binary_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pix.ppm");
    let data: Vec<u8> = (0..5u32 * 4 * 3).map(|i| (i * 53 % 256) as u8).collect();
    let value = Pnm::Pixels(Image::from_data(5, 4, PixelLayout::Rgb, data).unwrap());

    write(&path, &value, PnmFormat::BinaryRgb).unwrap();
    assert_eq!(read(&path).unwrap(), value);
}

#[test]
fn read_missing_file_is_io_error() {
    let err = read("/no/such/raster/file.pgm").unwrap_err();
    assert!(matches!(err, raster_io::IoError::Io(_)));
}

#[test]
fn decoded_file_feeds_ops() {
    // Decode, transform, re-encode: the full data path
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grad.pgm");
    let value = Pnm::Pixels(noise_gray(8, 8));
    write(&path, &value, PnmFormat::BinaryGray).unwrap();

    let Pnm::Pixels(img) = read(&path).unwrap() else {
        panic!("expected pixels");
    };
    let flipped = img.reflect_y().reflect_y();
    assert_eq!(Pnm::Pixels(flipped), value);
}

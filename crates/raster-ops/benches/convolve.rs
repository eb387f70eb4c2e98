use criterion::{criterion_group, criterion_main, Criterion};
use raster_core::{Image, PixelLayout};
use raster_ops::convolve::map_kernel;
use raster_ops::kernel::Kernel;

fn noise(width: u32, height: u32) -> Image {
    let data: Vec<u8> = (0..width as usize * height as usize * 3)
        .map(|i| (i * 37 % 251) as u8)
        .collect();
    Image::from_data(width, height, PixelLayout::Rgb, data).unwrap()
}

fn bench_convolve(c: &mut Criterion) {
    let img = noise(256, 256);
    let gauss = Kernel::gaussian(5, 1.5);
    c.bench_function("map_kernel gaussian 5x5 256x256 rgb", |b| {
        b.iter(|| map_kernel(&img, &gauss).unwrap())
    });

    let boxk = Kernel::box_blur(3);
    c.bench_function("map_kernel box 3x3 256x256 rgb", |b| {
        b.iter(|| map_kernel(&img, &boxk).unwrap())
    });

    #[cfg(feature = "parallel")]
    c.bench_function("parallel map_kernel gaussian 5x5 256x256 rgb", |b| {
        b.iter(|| raster_ops::parallel::map_kernel(&img, &gauss).unwrap())
    });
}

criterion_group!(benches, bench_convolve);
criterion_main!(benches);

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ik_core::{MultiBand, PixelBuffer};
use ik_math::{add_gaussian, average_band, diff_abs, fill_uniform, multiply_bounded};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn build_noise_u8(width: usize, height: usize, seed: u64) -> PixelBuffer<u8> {
    let img = PixelBuffer::new(width, height).expect("valid image");
    let mut rng = StdRng::seed_from_u64(seed);
    fill_uniform(&img, &mut rng, 0, 256).expect("valid range");
    img
}

fn bench_scalar_ops_u8(c: &mut Criterion) {
    let img = build_noise_u8(1280, 1024, 1);
    let out = PixelBuffer::new(1280, 1024).expect("valid image");

    c.bench_function("multiply_bounded_u8_1280x1024", |b| {
        b.iter(|| {
            multiply_bounded(black_box(&img), black_box(1.7), 0, 255, &out).expect("same shape");
        });
    });
}

fn bench_diff_abs_u8(c: &mut Criterion) {
    let a = build_noise_u8(1280, 1024, 2);
    let b = build_noise_u8(1280, 1024, 3);
    let out = PixelBuffer::new(1280, 1024).expect("valid image");

    c.bench_function("diff_abs_u8_1280x1024", |bench| {
        bench.iter(|| {
            diff_abs(black_box(&a), black_box(&b), &out).expect("same shape");
        });
    });
}

fn bench_average_band_u8(c: &mut Criterion) {
    let bands = (0..3)
        .map(|i| build_noise_u8(1280, 1024, 10 + i))
        .collect::<Vec<_>>();
    let mb = MultiBand::from_bands(bands).expect("same shape bands");
    let out = PixelBuffer::new(1280, 1024).expect("valid image");

    c.bench_function("average_band_u8x3_1280x1024", |b| {
        b.iter(|| {
            average_band(black_box(&mb), &out).expect("same shape");
        });
    });
}

fn bench_add_gaussian_f32(c: &mut Criterion) {
    let img = PixelBuffer::new_fill(640, 480, 0.5f32).expect("valid image");
    let mut rng = StdRng::seed_from_u64(4);

    c.bench_function("add_gaussian_f32_640x480", |b| {
        b.iter(|| {
            add_gaussian(black_box(&img), &mut rng, 0.01, 0.0, 1.0).expect("valid arguments");
        });
    });
}

criterion_group!(
    benches,
    bench_scalar_ops_u8,
    bench_diff_abs_u8,
    bench_average_band_u8,
    bench_add_gaussian_f32
);
criterion_main!(benches);

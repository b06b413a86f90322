use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ik_core::PixelBuffer;
use ik_distort::{rotate, scale};
use ik_interp::{Bicubic, Bilinear, NearestNeighbor};

fn build_pattern_u8(width: usize, height: usize) -> PixelBuffer<u8> {
    let mut data = Vec::with_capacity(width * height);
    for i in 0..(width * height) {
        data.push((i % 251) as u8);
    }
    PixelBuffer::from_vec(width, height, data).expect("valid image")
}

fn bench_scale_u8(c: &mut Criterion) {
    let input = build_pattern_u8(640, 512);
    let output = PixelBuffer::new(1280, 1024).expect("valid image");

    c.bench_function("scale_nearest_u8_640x512_to_1280x1024", |b| {
        let mut interp = NearestNeighbor::new();
        b.iter(|| {
            let stats = scale(black_box(&input), &output, &mut interp).expect("shaped input");
            black_box(stats.written);
        });
    });

    c.bench_function("scale_bilinear_u8_640x512_to_1280x1024", |b| {
        let mut interp = Bilinear::new();
        b.iter(|| {
            let stats = scale(black_box(&input), &output, &mut interp).expect("shaped input");
            black_box(stats.written);
        });
    });
}

fn bench_rotate_f32(c: &mut Criterion) {
    let data = (0..(1280 * 1024)).map(|i| (i % 97) as f32).collect();
    let input = PixelBuffer::from_vec(1280, 1024, data).expect("valid image");
    let output = PixelBuffer::new(1280, 1024).expect("valid image");

    c.bench_function("rotate_bicubic_f32_1280x1024", |b| {
        let mut interp = Bicubic::new();
        b.iter(|| {
            let stats =
                rotate(black_box(&input), &output, &mut interp, black_box(0.3)).expect("shaped input");
            black_box(stats.skipped);
        });
    });
}

criterion_group!(benches, bench_scale_u8, bench_rotate_f32);
criterion_main!(benches);

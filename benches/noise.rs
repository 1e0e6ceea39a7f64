//! Benches the noise families against each other.
#![expect(
    missing_docs,
    reason = "Its a benchmark and criterion macros don't add docs."
)]

use bevy_math::Vec2;
use criterion::*;
use tilenoise::{
    cellular::{cellular_noise, metaballs},
    fbm::Fbm,
    gradient::gradient_noise,
    hex::hexagonal_noise,
    perlin::perlin_noise,
    value::value_noise,
    voronoi::voronoi,
};

criterion_main!(benches);
criterion_group!(benches, noise_benches);

const SIZE: u32 = 512;

#[inline]
fn bench_2d(mut noise: impl FnMut(Vec2) -> f32) -> f32 {
    let mut res = 0.0;
    for x in 0..SIZE {
        for y in 0..SIZE {
            res += noise(Vec2::new(x as f32, y as f32) / SIZE as f32);
        }
    }
    res
}

fn noise_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("tilenoise");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(4));
    let scale = Vec2::splat(8.0);

    group.bench_function("value", |bencher| {
        bencher.iter(|| bench_2d(|p| value_noise(p, scale, 0.0)));
    });
    group.bench_function("gradient", |bencher| {
        bencher.iter(|| bench_2d(|p| gradient_noise(p, scale, 0.0)));
    });
    group.bench_function("perlin", |bencher| {
        bencher.iter(|| bench_2d(|p| perlin_noise(p, scale, 0.0)));
    });
    group.bench_function("cellular", |bencher| {
        bencher.iter(|| bench_2d(|p| cellular_noise(p, scale, 1.0, 0.0).x));
    });
    group.bench_function("metaballs", |bencher| {
        bencher.iter(|| bench_2d(|p| metaballs(p, scale, 1.0, 0.0)));
    });
    group.bench_function("voronoi", |bencher| {
        bencher.iter(|| bench_2d(|p| voronoi(p, scale, 1.0, 0.0, 0.0).x));
    });
    group.bench_function("hexagonal", |bencher| {
        bencher.iter(|| bench_2d(|p| hexagonal_noise(p, scale, 1.0, Vec2::ONE, false, false)));
    });

    for octaves in [2, 4, 8] {
        group.bench_function(format!("fbm value {octaves} octaves"), |bencher| {
            let spectrum = Fbm {
                octaves,
                ..Fbm::default()
            };
            bencher.iter(|| bench_2d(|p| spectrum.sample(p, scale, 0.0, value_noise)));
        });
    }
}

//! Perlin surflet noise: normalized corner gradients windowed by
//! `(1 - |d|²)³` surflets instead of multilinear blending.
//!
//! Based on Modifications to Classic Perlin Noise by Brian Sharpe.

use bevy_math::{Vec2, Vec4, ops};

use crate::{
    WithGradient,
    cells::LatticeCell2,
    lanes::inv_sqrt4,
    rng::multi_hash_cell_xy,
};

/// Normalization bringing the summed surflets to `[-1, 1]`: `1 / 0.75³`.
const SURFLET_NORM: f32 = 2.370_370_4;

/// 2D Perlin surflet noise.
///
/// `scale` is the tile count per axis and must be an integer for tileable
/// results. Returns a value in `[-1, 1]`.
pub fn perlin_noise(pos: Vec2, scale: Vec2, seed: f32) -> f32 {
    let cell = LatticeCell2::at(pos, scale, seed);
    let f = cell.signed_offsets();

    // grid gradients, recentered so no corner degenerates to zero length
    let (hash_x, hash_y) = multi_hash_cell_xy(cell.corners);
    let gradient_x = hash_x - 0.49999;
    let gradient_y = hash_y - 0.49999;

    let gradients = inv_sqrt4(gradient_x * gradient_x + gradient_y * gradient_y)
        * (gradient_x * Vec4::new(f.x, f.z, f.x, f.z) + gradient_y * Vec4::new(f.y, f.y, f.w, f.w))
        * SURFLET_NORM;
    let length_sq = f * f;
    let length_sq = Vec4::new(length_sq.x, length_sq.z, length_sq.x, length_sq.z)
        + Vec4::new(length_sq.y, length_sq.y, length_sq.w, length_sq.w);
    let x_sq = Vec4::ONE - length_sq.min(Vec4::ONE);
    let x_sq = x_sq * x_sq * x_sq;
    x_sq.dot(gradients)
}

/// 2D Perlin surflet noise with its analytic derivative.
pub fn perlin_noise_d(pos: Vec2, scale: Vec2, seed: f32) -> WithGradient<Vec2> {
    let cell = LatticeCell2::at(pos, scale, seed);
    let f = cell.signed_offsets();

    let (hash_x, hash_y) = multi_hash_cell_xy(cell.corners);
    let gradient_x = hash_x - 0.49999;
    let gradient_y = hash_y - 0.49999;

    let gradients = inv_sqrt4(gradient_x * gradient_x + gradient_y * gradient_y)
        * (gradient_x * Vec4::new(f.x, f.z, f.x, f.z) + gradient_y * Vec4::new(f.y, f.y, f.w, f.w));
    let m = f * f;
    let m = Vec4::new(m.x, m.z, m.x, m.z) + Vec4::new(m.y, m.y, m.w, m.w);
    let m = (Vec4::ONE - m).max(Vec4::ZERO);
    let m2 = m * m;
    let m3 = m * m2;
    // derivative of the windowed surflet sum
    let m2_gradients = m2 * -6.0 * gradients;
    let grad = Vec2::new(
        m2_gradients.dot(Vec4::new(f.x, f.z, f.x, f.z)),
        m2_gradients.dot(Vec4::new(f.y, f.y, f.w, f.w)),
    ) + Vec2::new(m3.dot(gradient_x), m3.dot(gradient_y));

    WithGradient {
        value: m3.dot(gradients) * SURFLET_NORM,
        gradient: grad * SURFLET_NORM,
    }
}

/// Organic-looking noise from two Perlin frequencies.
///
/// `density` blends the second frequency toward `scale - 1`, `contrast` and
/// `highlights` shape the tone curve, `shift` rotates which channel carries
/// the highlights. Returns a value in `[0, 1]`.
pub fn organic_noise(
    pos: Vec2,
    scale: Vec2,
    density: f32,
    phase: Vec2,
    contrast: f32,
    highlights: f32,
    shift: f32,
    seed: f32,
) -> f32 {
    let s = Vec2::ONE.lerp(scale - 1.0, density);
    let nx = perlin_noise(pos + phase, scale, seed);
    let ny = perlin_noise(pos, s, seed);

    let n = (Vec2::new(nx, ny) * Vec2::new(2.0, 0.0).lerp(Vec2::new(0.0, 2.0), shift)).length();
    let n = ops::powf(n, 1.0 + 8.0 * contrast) + (0.15 * highlights) / n;
    n * 0.5
}

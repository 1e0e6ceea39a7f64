//! Gradient noise: signed hash channels as lattice gradients, dotted with the
//! corner offsets and blended by the quintic kernel.

use bevy_math::{Mat2, Vec2, Vec4, ops};
use core::f32::consts::SQRT_2;

use crate::{
    WithGradient,
    cells::LatticeCell2,
    curves::{mix, quintic2, quintic_d2},
    rng::{multi_hash_cell_xy, smulti_hash_cell_xy},
};

/// Per-corner dot products of the gradients with the corner offsets, packed
/// in the same lane order as the hashes.
#[inline]
fn corner_dots(hash_x: Vec4, hash_y: Vec4, f: Vec4) -> Vec4 {
    hash_x * Vec4::new(f.x, f.z, f.x, f.z) + hash_y * Vec4::new(f.y, f.y, f.w, f.w)
}

/// Quintic bilinear blend of the corner dot products, normalized by √2 to
/// land approximately in `[-1, 1]`.
#[inline]
fn blend(gradients: Vec4, f: Vec4) -> f32 {
    let u = quintic2(Vec2::new(f.x, f.y));
    let g = Vec2::new(
        mix(gradients.x, gradients.y, u.x),
        mix(gradients.z, gradients.w, u.x),
    );
    SQRT_2 * mix(g.x, g.y, u.y)
}

/// Applies a 2×2 transform to all four corner gradients at once.
#[inline]
fn transform_gradients(transform: Mat2, hash_x: Vec4, hash_y: Vec4) -> (Vec4, Vec4) {
    (
        hash_x * transform.x_axis.x + hash_y * transform.y_axis.x,
        hash_x * transform.x_axis.y + hash_y * transform.y_axis.y,
    )
}

/// 2D gradient noise.
///
/// `scale` is the tile count per axis and must be an integer for tileable
/// results. Returns a value in `[-1, 1]`.
pub fn gradient_noise(pos: Vec2, scale: Vec2, seed: f32) -> f32 {
    let cell = LatticeCell2::at(pos, scale, seed);
    let f = cell.signed_offsets();
    let (hash_x, hash_y) = smulti_hash_cell_xy(cell.corners);
    blend(corner_dots(hash_x, hash_y, f), f)
}

/// 2D gradient noise with a 2×2 transform applied to the gradients.
///
/// Shearing or rotating the gradients animates flow without moving the
/// lattice. Returns `[-1, 1]`.
pub fn gradient_noise_transformed(pos: Vec2, scale: Vec2, transform: Mat2, seed: f32) -> f32 {
    let cell = LatticeCell2::at(pos, scale, seed);
    let f = cell.signed_offsets();
    let (hash_x, hash_y) = smulti_hash_cell_xy(cell.corners);
    let (hash_x, hash_y) = transform_gradients(transform, hash_x, hash_y);
    blend(corner_dots(hash_x, hash_y, f), f)
}

/// [`gradient_noise_transformed`] with a rotation angle in radians.
pub fn gradient_noise_rotated(pos: Vec2, scale: Vec2, rotation: f32, seed: f32) -> f32 {
    let (sin, cos) = (ops::sin(rotation), ops::cos(rotation));
    gradient_noise_transformed(
        pos,
        scale,
        Mat2::from_cols(Vec2::new(cos, sin), Vec2::new(sin, cos)),
        seed,
    )
}

/// Shared derivative path, after Inigo Quilez.
#[inline]
fn blend_d(hash_x: Vec4, hash_y: Vec4, f: Vec4) -> WithGradient<Vec2> {
    let a = Vec2::new(hash_x.x, hash_y.x);
    let b = Vec2::new(hash_x.y, hash_y.y);
    let c = Vec2::new(hash_x.z, hash_y.z);
    let d = Vec2::new(hash_x.w, hash_y.w);

    let gradients = corner_dots(hash_x, hash_y, f);
    let (u, du) = quintic_d2(Vec2::new(f.x, f.y));
    let g = Vec2::new(
        mix(gradients.x, gradients.y, u.x),
        mix(gradients.z, gradients.w, u.x),
    );

    let mut dxdy = a + (b - a) * u.x + (c - a) * u.y + (a - b - c + d) * (u.x * u.y);
    dxdy += du
        * (Vec2::new(u.y, u.x) * (gradients.x - gradients.y - gradients.z + gradients.w)
            + Vec2::new(gradients.y, gradients.z)
            - gradients.x);
    WithGradient {
        value: mix(g.x, g.y, u.y) * SQRT_2,
        // the value is normalized by √2, so the gradient scales with it
        gradient: dxdy * SQRT_2,
    }
}

/// 2D gradient noise with its analytic derivative.
pub fn gradient_noise_d(pos: Vec2, scale: Vec2, seed: f32) -> WithGradient<Vec2> {
    let cell = LatticeCell2::at(pos, scale, seed);
    let f = cell.signed_offsets();
    let (hash_x, hash_y) = smulti_hash_cell_xy(cell.corners);
    blend_d(hash_x, hash_y, f)
}

/// [`gradient_noise_transformed`] with its analytic derivative.
pub fn gradient_noise_transformed_d(
    pos: Vec2,
    scale: Vec2,
    transform: Mat2,
    seed: f32,
) -> WithGradient<Vec2> {
    let cell = LatticeCell2::at(pos, scale, seed);
    let f = cell.signed_offsets();
    let (hash_x, hash_y) = smulti_hash_cell_xy(cell.corners);
    let (hash_x, hash_y) = transform_gradients(transform, hash_x, hash_y);
    blend_d(hash_x, hash_y, f)
}

/// [`gradient_noise_rotated`] with its analytic derivative.
pub fn gradient_noise_rotated_d(
    pos: Vec2,
    scale: Vec2,
    rotation: f32,
    seed: f32,
) -> WithGradient<Vec2> {
    let (sin, cos) = (ops::sin(rotation), ops::cos(rotation));
    gradient_noise_transformed_d(
        pos,
        scale,
        Mat2::from_cols(Vec2::new(cos, sin), Vec2::new(sin, cos)),
        seed,
    )
}

/// Gradient noise with shortened, disordered gradients.
///
/// `disorder` in `[0, 1]` scales the unsigned hash before the signed remap;
/// at 1.0 this matches [`gradient_noise`]'s distribution. Returns `[-1, 1]`.
pub fn gradient_noise_disordered(pos: Vec2, scale: Vec2, disorder: f32, seed: f32) -> f32 {
    let cell = LatticeCell2::at(pos, scale, seed);
    let f = cell.signed_offsets();
    let (hash_x, hash_y) = multi_hash_cell_xy(cell.corners);
    let hash_x = (hash_x * disorder) * 2.0 - 1.0;
    let hash_y = (hash_y * disorder) * 2.0 - 1.0;
    blend(corner_dots(hash_x, hash_y, f), f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_matches_plain() {
        let pos = Vec2::new(0.13, 0.57);
        let scale = Vec2::splat(4.0);
        let plain = gradient_noise(pos, scale, 3.0);
        let transformed = gradient_noise_transformed(pos, scale, Mat2::IDENTITY, 3.0);
        assert_eq!(plain, transformed);
    }
}

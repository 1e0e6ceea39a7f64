//! Closed-form periodic patterns: checkerboards, waves, crosses, and stairs.
//! Deterministic and hash-free, anti-aliased by box-filtering a triangular
//! signal.

use bevy_math::{Mat2, Vec2, Vec3, ops};
use core::f32::consts::{FRAC_1_SQRT_2, PI, SQRT_2};

use crate::{
    cells::wrap2,
    curves::{mix, smoothstep},
    lanes::{fract1, fract2},
};

/// Box-filtered XOR of the two axes' triangular signals.
#[inline]
fn filtered_checker(p: Vec2, w: Vec2) -> f32 {
    // based on filtering the checkerboard by Inigo Quilez
    let s1 = (fract2((p - w * 0.5) / 2.0) - 0.5).abs();
    let s2 = (fract2((p + w * 0.5) / 2.0) - 0.5).abs();
    let i = ((s1 - s2) * 2.0) / w;
    0.5 - 0.5 * i.x * i.y
}

/// Anti-aliased checkerboard.
///
/// `smoothness` is the filter width per axis. Returns `(value, tile id)`.
pub fn checkerboard(pos: Vec2, scale: Vec2, smoothness: Vec2) -> Vec3 {
    let num_tiles = scale.floor();
    let p = pos * num_tiles * 2.0;
    let tile = wrap2(p.floor(), num_tiles * 2.0);

    let w = smoothness.max(Vec2::splat(0.00001));
    let d = filtered_checker(p, w);
    Vec3::new(d, tile.x, tile.y)
}

/// [`checkerboard`] rotated 45 degrees.
pub fn checkerboard45(pos: Vec2, scale: Vec2, smoothness: Vec2) -> Vec3 {
    let num_tiles = scale.floor();
    let p = pos * num_tiles * 2.0;

    let rotate45 = Mat2::from_cols(
        Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    );
    let p = p * (1.0 / SQRT_2);
    let p = rotate45 * Vec2::new(p.x + SQRT_2 * 0.5, p.y);

    let w = smoothness.max(Vec2::splat(0.001));
    let d = filtered_checker(p, w);
    let tile = wrap2(p.floor(), num_tiles);
    Vec3::new(d, tile.x, tile.y)
}

/// A `[-1, 1]` triangular wave with the period of `sin`.
pub fn triangle_wave(x: f32) -> f32 {
    let t = x / (PI * 2.0) + PI / 4.0;
    (fract1(t) * 2.0 - 1.0).abs() * 2.0 - 1.0
}

/// Horizontal wave stripes.
///
/// `amplitude` sets the wave height, `interpolate` blends the profile from
/// triangular (0) to sinusoidal (1). Returns `[0, 1]`.
pub fn wave_pattern(
    pos: Vec2,
    scale: Vec2,
    width: f32,
    smoothness: f32,
    amplitude: f32,
    interpolate: f32,
) -> f32 {
    let scale = scale.floor();
    let p = Vec2::new(pos.x * PI * scale.x, pos.y * scale.y);

    let sy = p.y + amplitude * mix(triangle_wave(p.x), ops::sin(p.x), interpolate);
    let t = triangle_wave(sy * scale.y * PI * 0.25);

    1.0 - smoothstep((width - smoothness).max(0.0), width, t * 0.5 + 0.5)
}

/// A grid of crosses.
///
/// `smoothness` is the filter width per axis. Returns `[0, 1]`.
pub fn cross_pattern(pos: Vec2, scale: Vec2, smoothness: Vec2) -> f32 {
    let scale = scale.floor();
    let p = pos * scale;

    const N: f32 = 3.0;
    let w = smoothness.max(Vec2::splat(0.001));
    let half_w = w * 0.5;
    let a = p + half_w;
    let b = p - half_w;

    let x = a.floor() + (fract2(a) * N).min(Vec2::ONE) - b.floor() - (fract2(b) * N).min(Vec2::ONE);
    let i = x / (w * N);
    1.0 - i.x - i.y + 2.0 * i.x * i.y
}

/// Interlocking stair steps.
///
/// `distance` blends the ramp toward a folded distance profile. Returns
/// `[0, 1]`.
pub fn stairs_pattern(pos: Vec2, scale: Vec2, width: f32, smoothness: f32, distance: f32) -> f32 {
    let p = pos * scale;
    let f = fract2(p);

    let m = wrap2(p, Vec2::splat(2.0)).floor();
    let d = mix(f.x, f.y, (m.x - m.y).abs());
    let d = mix(d, (d * 2.0 - 1.0).abs(), distance);

    1.0 - smoothstep((width - smoothness).max(0.0), width, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        // hard edges: adjacent tile centers take opposite values
        let scale = Vec2::splat(2.0);
        let smooth = Vec2::ZERO;
        let a = checkerboard(Vec2::new(0.125, 0.125), scale, smooth).x;
        let b = checkerboard(Vec2::new(0.375, 0.125), scale, smooth).x;
        assert!((a - b).abs() > 0.9);
    }

    #[test]
    fn triangle_wave_stays_bounded() {
        for k in -32..32 {
            let t = triangle_wave(k as f32 * 0.37);
            assert!((-1.0..=1.0).contains(&t));
        }
    }
}

//! Value noise: hashed lattice corners blended by the quintic kernel, plus
//! the pattern generators built directly on top of it.

use bevy_math::{Vec2, Vec3, Vec4, ops};
use core::f32::consts::TAU;

use crate::{
    WithGradient,
    cells::{LatticeCell2, LatticeCell3, scale4, wrap4},
    curves::{mix, quintic, quintic2, quintic3, quintic4, quintic_d2, quintic_d3, smoothstep},
    lanes::{fract1, pow2, sin4},
    rng::{hash11, hash23, hash24, multi_hash_cell, multi_hash_cell3},
};

/// Bilinear blend of four corner hashes by the smoothed fraction.
#[inline]
fn corner_mix(hash: Vec4, u: Vec2) -> f32 {
    let (a, b, c, d) = (hash.x, hash.y, hash.z, hash.w);
    mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

/// Bilinear blend with the analytic derivative, after Inigo Quilez.
#[inline]
fn corner_mix_d(hash: Vec4, frac: Vec2) -> WithGradient<Vec2> {
    let (a, b, c, d) = (hash.x, hash.y, hash.z, hash.w);
    let (u, du) = quintic_d2(frac);
    let abcd = a - b - c + d;
    let value = a + (b - a) * u.x + (c - a) * u.y + abcd * u.x * u.y;
    let gradient = du * (Vec2::new(u.y, u.x) * abcd + Vec2::new(b, c) - a);
    WithGradient {
        value: value * 2.0 - 1.0,
        // the value is remapped to [-1, 1], so the gradient doubles with it
        gradient: gradient * 2.0,
    }
}

/// 1D value noise.
///
/// `scale` is the tile count and must be an integer for tileable results.
/// Returns a value in `[-1, 1]`.
pub fn value_noise_1d(pos: f32, scale: f32, seed: f32) -> f32 {
    let pos = pos * scale;
    let cell = ops::floor(pos);
    let i = Vec2::new(cell, cell + 1.0);
    let f = pos - cell;
    let i = i - scale * (i / scale).floor() + seed;

    let u = quintic(f);
    mix(hash11(i.x), hash11(i.y), u) * 2.0 - 1.0
}

/// 2D value noise.
///
/// `scale` is the tile count per axis and must be an integer for tileable
/// results. Returns a value in `[-1, 1]`.
pub fn value_noise(pos: Vec2, scale: Vec2, seed: f32) -> f32 {
    let cell = LatticeCell2::at(pos, scale, seed);
    let hash = multi_hash_cell(cell.corners);
    corner_mix(hash, quintic2(cell.frac)) * 2.0 - 1.0
}

/// 2D value noise with the corner hashes rotated through a phase.
///
/// `phase` spins each corner's value through `sin(h·2π + phase)`, which
/// animates the field without moving the lattice. Returns `[-1, 1]`.
pub fn value_noise_phased(pos: Vec2, scale: Vec2, phase: f32, seed: f32) -> f32 {
    let cell = LatticeCell2::at(pos, scale, seed);
    let hash = sin4(multi_hash_cell(cell.corners) * TAU + phase) * 0.5 + 0.5;
    corner_mix(hash, quintic2(cell.frac)) * 2.0 - 1.0
}

/// 2D value noise with its analytic derivative.
pub fn value_noise_d(pos: Vec2, scale: Vec2, seed: f32) -> WithGradient<Vec2> {
    let cell = LatticeCell2::at(pos, scale, seed);
    let hash = multi_hash_cell(cell.corners);
    corner_mix_d(hash, cell.frac)
}

/// [`value_noise_phased`] with its analytic derivative.
pub fn value_noise_phased_d(pos: Vec2, scale: Vec2, phase: f32, seed: f32) -> WithGradient<Vec2> {
    let cell = LatticeCell2::at(pos, scale, seed);
    let hash = sin4(multi_hash_cell(cell.corners) * TAU + phase) * 0.5 + 0.5;
    corner_mix_d(hash, cell.frac)
}

/// 3D value noise over a 2D position and a `height` axis, tileable on XY.
///
/// The height axis is unwrapped, so sweeping it animates the field. Returns
/// `[-1, 1]`.
pub fn value_noise_3d(pos: Vec2, scale: Vec2, height: f32, seed: f32) -> f32 {
    let cell = LatticeCell3::at(pos, scale, height, seed);
    let (hash_low, hash_high) = multi_hash_cell3(cell.cell, cell.cell_plus_one);

    let u = quintic3(cell.frac);
    let r = hash_low.lerp(hash_high, u.z);
    let rx = mix(r.x, r.z, u.y);
    let ry = mix(r.y, r.w, u.y);
    mix(rx, ry, u.x) * 2.0 - 1.0
}

/// [`value_noise_3d`] with its analytic derivative over all three axes.
///
/// Derivative identities after Brian Sharpe's analytical noise derivatives.
pub fn value_noise_3d_d(pos: Vec2, scale: Vec2, height: f32, seed: f32) -> WithGradient<Vec3> {
    let cell = LatticeCell3::at(pos, scale, height, seed);
    let (hash_low, hash_high) = multi_hash_cell3(cell.cell, cell.cell_plus_one);

    let (u, du) = quintic_d3(cell.frac);
    let res0 = hash_low.lerp(hash_high, u.z);
    let res1 = Vec4::new(
        mix(res0.x, res0.z, u.y),
        mix(res0.y, res0.w, u.y),
        mix(res0.x, res0.y, u.x),
        mix(res0.z, res0.w, u.x),
    );
    let res2 = Vec4::new(hash_low.x, hash_low.y, hash_high.x, hash_high.y).lerp(
        Vec4::new(hash_low.z, hash_low.w, hash_high.z, hash_high.w),
        u.y,
    );
    let res3 = Vec2::new(mix(res2.x, res2.y, u.x), mix(res2.z, res2.w, u.x));
    let results = Vec4::new(res1.x, 0.0, 0.0, 0.0)
        + (Vec4::new(res1.y, res1.y, res1.w, res3.y) - Vec4::new(res1.x, res1.x, res1.z, res3.x))
            * Vec4::new(u.x, du.x, du.y, du.z);

    WithGradient {
        value: results.x * 2.0 - 1.0,
        gradient: Vec3::new(results.y, results.z, results.w) * 2.0,
    }
}

/// Two phased value noise samples in one batch.
///
/// `pos` packs two sample positions as `(x0, y0, x1, y1)`; the two lanes of
/// `seed` decorrelate the channels. Returns two values in `[-1, 1]`.
pub fn multi_value_noise(pos: Vec4, scale: Vec4, phase: f32, seed: Vec2) -> Vec2 {
    let pos = pos * scale;
    let i = pos.floor();
    let f = pos - i;
    let wrap_by = Vec4::new(scale.x, scale.y, scale.x, scale.y);
    let i0 = wrap4(Vec4::new(i.x, i.y, i.x + 1.0, i.y + 1.0), wrap_by) + seed.x;
    let i1 = wrap4(Vec4::new(i.z, i.w, i.z + 1.0, i.w + 1.0), wrap_by) + seed.y;

    let hash0 = sin4(multi_hash_cell(i0) * TAU + phase) * 0.5 + 0.5;
    let hash1 = sin4(multi_hash_cell(i1) * TAU + phase) * 0.5 + 0.5;
    let a = Vec2::new(hash0.x, hash1.x);
    let b = Vec2::new(hash0.y, hash1.y);
    let c = Vec2::new(hash0.z, hash1.z);
    let d = Vec2::new(hash0.w, hash1.w);

    let u = quintic4(f);
    let ux = Vec2::new(u.x, u.z);
    let uy = Vec2::new(u.y, u.w);
    let value = Vec2::new(mix(a.x, b.x, ux.x), mix(a.y, b.y, ux.y))
        + (c - a) * uy * (Vec2::ONE - ux)
        + (d - b) * ux * uy;
    value * 2.0 - 1.0
}

/// Ridge-like value noise built by multiplying translated channels.
///
/// `translate` offsets the extra channels, `intensity` is the contrast in
/// `[0, 1]`, `time` phases the hash. Returns `[0, 1]`.
pub fn grid_noise_translated(
    pos: Vec2,
    scale: Vec2,
    translate: Vec3,
    intensity: f32,
    time: f32,
    seed: f32,
) -> f32 {
    let wrap_by = scale4(scale);
    let seed2 = Vec2::splat(seed);
    let n0 = multi_value_noise(
        Vec4::new(pos.x, pos.y, pos.x + translate.x, pos.y + translate.x),
        wrap_by,
        time,
        seed2,
    );
    let n1 = multi_value_noise(
        Vec4::new(
            pos.x + translate.y,
            pos.y + translate.y,
            pos.x + translate.z,
            pos.y + translate.z,
        ),
        wrap_by,
        time,
        seed2,
    );

    let t = ((n0.x * n1.x) * (n0.y * n1.y)).abs();
    ops::powf(t, mix(0.5, 0.1, intensity))
}

/// [`grid_noise_translated`] with hash-driven translation offsets.
pub fn grid_noise(pos: Vec2, scale: Vec2, intensity: f32, time: f32, seed: f32) -> f32 {
    let trans0 = (hash23(Vec2::splat(seed)) * 2.0 - 1.0) * Vec3::new(scale.x, scale.y, scale.x);
    let translate = Vec4::new(0.0, trans0.x, trans0.y, trans0.z);

    let wrap_by = scale4(scale);
    let seed2 = Vec2::splat(seed);
    let n0 = multi_value_noise(
        Vec4::new(
            pos.x + translate.x,
            pos.y + translate.x,
            pos.x + translate.y,
            pos.y + translate.y,
        ),
        wrap_by,
        time,
        seed2,
    );
    let n1 = multi_value_noise(
        Vec4::new(
            pos.x + translate.z,
            pos.y + translate.z,
            pos.x + translate.w,
            pos.y + translate.w,
        ),
        wrap_by,
        time,
        seed2,
    );

    let t = ((n0.x * n1.x) * (n0.y * n1.y)).abs();
    ops::powf(t, mix(0.5, 0.1, intensity))
}

/// Random dots with hash-driven luminance and size.
///
/// `density` in `[0, 1]` controls how many cells carry a dot, `size` the dot
/// radius, `size_variation` its spread, and `roundness` blends between square
/// and round dots. Returns `(value, luminance, radius)`, each in `[0, 1]`.
pub fn dots_noise(
    pos: Vec2,
    scale: Vec2,
    density: f32,
    size: f32,
    size_variation: f32,
    roundness: f32,
    seed: f32,
) -> Vec3 {
    let pos = pos * scale;
    let posf = pos.floor();
    let i = Vec4::new(posf.x, posf.y, posf.x + 1.0, posf.y + 1.0);
    let f = pos - posf;
    let i = wrap4(i, scale4(scale));

    let hash = hash24(Vec2::new(i.x, i.y) + seed);
    if hash.w > density {
        return Vec3::ZERO;
    }

    let radius = (size + (hash.z * 2.0 - 1.0) * size_variation * 0.5).clamp(0.0, 1.0);
    let value = radius / size;
    let radius = 2.0 / radius;
    let f = f * radius - (radius - 1.0);
    let f = f + Vec2::new(hash.x, hash.y) * (radius - 2.0);
    let f = pow2(f.abs(), mix(20.0, 1.0, ops::sqrt(roundness)));

    let u = 1.0 - f.dot(f).min(1.0);
    Vec3::new((u * u * u * value).clamp(0.0, 1.0), hash.w, hash.z)
}

/// Jittered horizontal lines.
///
/// `count` sets the line density, `jitter` bends the lines by value noise
/// (zero gives straight lines), `smoothness` softens both edges. Returns
/// `(value, line id)` with the value in `[0, 1]`.
pub fn random_lines(
    pos: Vec2,
    scale: Vec2,
    count: f32,
    width: f32,
    jitter: f32,
    smoothness: Vec2,
    phase: f32,
    seed: f32,
) -> Vec2 {
    let strength = jitter * 1.25;
    let wrap_by = scale4(scale);
    let seed2 = Vec2::splat(seed);

    // gradient of the warped field by central differences
    // TODO: compute the gradient analytically from multi_value_noise
    let offsets = Vec3::new(1.0, 0.0, -1.0) / 1024.0;
    let p = Vec4::new(pos.x, pos.y, pos.x, pos.y)
        + Vec4::new(offsets.x, offsets.y, offsets.z, offsets.y);
    let nv = (multi_value_noise(p, wrap_by, phase, seed2) * strength + Vec2::new(p.y, p.w)) * count;
    let grad_x = nv.x - nv.y;
    let p = Vec4::new(pos.x, pos.y, pos.x, pos.y)
        + Vec4::new(offsets.y, offsets.x, offsets.y, offsets.z);
    let nv = (multi_value_noise(p, wrap_by, phase, seed2) * strength + Vec2::new(p.y, p.w)) * count;
    let grad = Vec2::new(grad_x, nv.x - nv.y);

    let v = count * (value_noise_phased(pos, scale, phase, seed) * strength + pos.y);
    let w = fract1(v) / (grad / (2.0 * offsets.x)).length();
    let width = width * 0.1;
    let smoothness = smoothness * width + grad.x.abs().max(grad.y.abs()) * 0.02;

    let d = smoothstep(0.0, smoothness.x, w) - smoothstep((width - smoothness.y).max(0.0), width, w);
    Vec2::new(d, ops::floor(v) % count)
}

/// [`random_lines`] with a hashed color per line.
///
/// `color_variation` in `[0, 1]` sets how many lines get a chromatic color
/// instead of a gray. Returns `(rgb, value)`.
pub fn random_lines_colored(
    pos: Vec2,
    scale: Vec2,
    count: f32,
    width: f32,
    jitter: f32,
    smoothness: Vec2,
    phase: f32,
    color_variation: f32,
    seed: f32,
) -> Vec4 {
    let l = random_lines(pos, scale, count, width, jitter, smoothness, phase, seed);
    let r = hash23(Vec2::new(l.y, l.y) + seed);
    let color = if r.x <= color_variation {
        r
    } else {
        Vec3::splat(r.x)
    };
    let color = color * l.x;
    Vec4::new(color.x, color.y, color.z, l.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_dimensional_tiles() {
        for k in 0..16 {
            let p = k as f32 / 16.0;
            let a = value_noise_1d(p, 4.0, 0.0);
            let b = value_noise_1d(p + 1.0, 4.0, 0.0);
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_cells_yield_no_dots() {
        // density 0 rejects every cell
        let d = dots_noise(Vec2::new(0.3, 0.4), Vec2::splat(4.0), 0.0, 0.5, 0.75, 1.0, 0.0);
        assert_eq!(d, Vec3::ZERO);
    }
}

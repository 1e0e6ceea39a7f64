//! Voronoi fields: nearest feature point and distance to the cell edges.
//!
//! Voronoi based on Inigo Quilez's edge-distance formulation; the first pass
//! finds the owning feature, the second measures the perpendicular distance
//! to every neighboring bisector.

use bevy_math::{IVec2, Vec2, Vec3, Vec3Swizzles, Vec4, Vec4Swizzles};
use core::f32::consts::TAU;

use crate::{
    cells::{scale4, wrap2, wrap4},
    lanes::{sin2, sin4, sqrt2},
    rng::{hash21, hash23, multi_hash2, multi_hash_pair},
};

/// Voronoi with the distance from the cell edges.
///
/// `jitter` in `[0, 1]` displaces the feature points (zero gives a square
/// grid), `phase` rotates them. Returns `(edge distance, tile position)` with
/// the position in `[0, 1]` feature space.
pub fn voronoi(pos: Vec2, scale: Vec2, jitter: f32, phase: f32, seed: f32) -> Vec3 {
    let pos = pos * scale;
    let i = pos.floor();
    let f = pos - i;
    let i4 = Vec4::new(i.x, i.y, i.x, i.y);
    let wrap_by = scale4(scale);

    // first pass: the owning feature point, two candidate cells per step
    let mut min_pos = Vec2::ZERO;
    let mut tile_pos = Vec2::ZERO;
    let mut min_distance = 1e5_f32;
    for k in (0..8).step_by(2) {
        let k1 = IVec2::new(k, k + 1);
        let ky = k1 / 3;
        let kx = k1 - ky * 3;
        let n = Vec4::new(kx.x as f32, ky.x as f32, kx.y as f32, ky.y as f32) - 1.0;

        let ni = wrap4(i4 + n, wrap_by) + seed;
        let c_pos = multi_hash_pair(ni.xy(), ni.zw()) * jitter;
        let c_pos = sin4(c_pos * TAU + phase) * 0.5 + 0.5;
        let r_pos = n + c_pos - Vec4::new(f.x, f.y, f.x, f.y);

        let sq = r_pos * r_pos;
        let da = sq.x + sq.y;
        let db = sq.z + sq.w;
        let (d, candidate) = if da < db {
            (da, Vec4::new(r_pos.x, r_pos.y, c_pos.x, c_pos.y))
        } else {
            (db, Vec4::new(r_pos.z, r_pos.w, c_pos.z, c_pos.w))
        };
        if d < min_distance {
            min_distance = d;
            min_pos = candidate.xy();
            tile_pos = candidate.zw();
        }
    }
    // the remaining (1, 1) neighbor
    {
        let n = Vec2::ONE;
        let ni = wrap2(i + n, scale) + seed;
        let c_pos = multi_hash2(ni) * jitter;
        let c_pos = sin2(c_pos * TAU + phase) * 0.5 + 0.5;
        let r_pos = n + c_pos - f;

        let d = r_pos.dot(r_pos);
        if d < min_distance {
            min_pos = r_pos;
            tile_pos = c_pos;
        }
    }

    // second pass: perpendicular distance to the edges
    let mut min_edge = 1e5_f32;
    for y in -2i32..=2 {
        for x in (-2i32..=2).step_by(2) {
            let n = Vec4::new(x as f32, y as f32, (x + 1) as f32, y as f32);
            let ni = wrap4(i4 + n, wrap_by) + seed;
            let c_pos = multi_hash_pair(ni.xy(), ni.zw()) * jitter;
            let c_pos = sin4(c_pos * TAU + phase) * 0.5 + 0.5;
            let r_pos = n + c_pos - Vec4::new(f.x, f.y, f.x, f.y);

            let m4 = Vec4::new(min_pos.x, min_pos.y, min_pos.x, min_pos.y);
            let diff = m4 - r_pos;
            let diff = diff * diff;
            let l = Vec2::new(diff.x, diff.z) + Vec2::new(diff.y, diff.w);

            let a = m4 * 0.5 + r_pos;
            let b = r_pos - m4;
            let sq = b * b;
            let len = sqrt2(Vec2::new(sq.x, sq.z) + Vec2::new(sq.y, sq.w));
            let b = b / Vec4::new(len.x, len.x, len.y, len.y);

            let along = a * b;
            let d = Vec2::new(along.x, along.z) + Vec2::new(along.y, along.w);
            if l.x > 1e-5 {
                min_edge = min_edge.min(d.x);
            }
            if l.y > 1e-5 {
                min_edge = min_edge.min(d.y);
            }
        }
    }

    Vec3::new(min_edge, tile_pos.x, tile_pos.y)
}

/// Voronoi with the owning feature position and its squared distance.
///
/// Returns `(tile position, distance)`.
pub fn voronoi_position(pos: Vec2, scale: Vec2, jitter: f32, phase: f32, seed: f32) -> Vec3 {
    let pos = pos * scale;
    let i = pos.floor();
    let f = pos - i;
    let i4 = Vec4::new(i.x, i.y, i.x, i.y);
    let wrap_by = scale4(scale);

    let mut tile_pos = Vec2::ZERO;
    let mut min_distance = 1e5_f32;
    for k in (0..8).step_by(2) {
        let k1 = IVec2::new(k, k + 1);
        let ky = k1 / 3;
        let kx = k1 - ky * 3;
        let n = Vec4::new(kx.x as f32, ky.x as f32, kx.y as f32, ky.y as f32) - 1.0;

        let ni = wrap4(i4 + n, wrap_by) + seed;
        let c_pos = multi_hash_pair(ni.xy(), ni.zw()) * jitter;
        let c_pos = sin4(c_pos * TAU + phase) * 0.5 + 0.5;
        let r_pos = n + c_pos - Vec4::new(f.x, f.y, f.x, f.y);

        let sq = r_pos * r_pos;
        let da = sq.x + sq.y;
        let db = sq.z + sq.w;
        let (d, candidate) = if da < db {
            (da, c_pos.xy())
        } else {
            (db, c_pos.zw())
        };
        if d < min_distance {
            min_distance = d;
            tile_pos = candidate;
        }
    }
    {
        let n = Vec2::ONE;
        let ni = wrap2(i + n, scale) + seed;
        let c_pos = multi_hash2(ni) * jitter;
        let c_pos = sin2(c_pos * TAU + phase) * 0.5 + 0.5;
        let r_pos = n + c_pos - f;

        let d = r_pos.dot(r_pos);
        if d < min_distance {
            min_distance = d;
            tile_pos = c_pos;
        }
    }
    Vec3::new(tile_pos.x, tile_pos.y, min_distance)
}

/// Per-cell colors keyed by the owning feature position.
///
/// `variance` in `[0, 1]` sets how many cells get a chromatic color instead
/// of a gray, `factor` rescales the position before hashing. Returns an RGB
/// color in `[0, 1]`.
pub fn voronoi_pattern(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    variance: f32,
    factor: f32,
    seed: f32,
) -> Vec3 {
    let tile_pos = voronoi_position(pos, scale, jitter, 0.0, seed).xy();
    let rand = hash21(tile_pos * factor + seed).abs();
    if rand < variance {
        hash23(tile_pos + seed)
    } else {
        Vec3::splat(rand)
    }
}

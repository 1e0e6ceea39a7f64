//! Cellular (Worley) noise: jittered feature points in a 3×3 neighborhood,
//! reduced to the two nearest distances by a fixed min/max shuffle network,
//! plus the metaballs and crystal fields built on the same neighborhood.

use bevy_math::{Vec2, Vec4, ops};
use core::f32::consts::TAU;

use crate::{
    WithGradient,
    cells::CellNeighborhood,
    lanes::{sin2, sin4, sqrt2},
    lengths::DistanceMetric,
    rng::multi_hash2,
};

/// Normalization bringing the distances to `[0, 1]`: `0.75² * 2.0 == 1.125`.
const CELL_NORM: f32 = 1.0 / 1.125;

/// The jittered deltas from the sample to every neighbor feature point, their
/// distances, and the center cell's feature delta.
struct NeighborField {
    dx0: Vec4,
    dy0: Vec4,
    dx1: Vec4,
    dy1: Vec4,
    d0: Vec4,
    d1: Vec4,
    center: Vec2,
}

fn neighbor_field(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    phase: Option<f32>,
    metric: DistanceMetric,
    seed: f32,
) -> NeighborField {
    let n = CellNeighborhood::at(pos, scale, seed);
    let (mut hx0, mut hy0, mut hx1, mut hy1) = n.hash_neighbors();
    let mut center_hash = multi_hash2(n.center);
    if let Some(phase) = phase {
        hx0 = sin4(hx0 * TAU + phase) * 0.5 + 0.5;
        hy0 = sin4(hy0 * TAU + phase) * 0.5 + 0.5;
        hx1 = sin4(hx1 * TAU + phase) * 0.5 + 0.5;
        hy1 = sin4(hy1 * TAU + phase) * 0.5 + 0.5;
        center_hash = sin2(center_hash * TAU + phase) * 0.5 + 0.5;
    }

    let dx0 = CellNeighborhood::OFFSETS_X0 + hx0 * jitter - Vec4::splat(n.frac.x);
    let dy0 = CellNeighborhood::OFFSETS_Y0 + hy0 * jitter - Vec4::splat(n.frac.y);
    let dx1 = CellNeighborhood::OFFSETS_X1 + hx1 * jitter - Vec4::splat(n.frac.x);
    let dy1 = CellNeighborhood::OFFSETS_Y1 + hy1 * jitter - Vec4::splat(n.frac.y);
    NeighborField {
        dx0,
        dy0,
        dx1,
        dy1,
        d0: metric.distance4(dx0, dy0),
        d1: metric.distance4(dx1, dy1),
        center: center_hash * jitter - n.frac,
    }
}

/// Shuffles the four smallest of the eight neighbor distances into the two
/// smallest, refining the lanes sequentially.
#[inline]
fn two_smallest_seq(d0: Vec4, d1: Vec4) -> Vec2 {
    let f0 = d0.max(d1);
    let f = d0.min(d1);
    let f = f.min(Vec4::new(f0.w, f0.z, f0.y, f0.x));
    let fx = f.x.min(f.z).min(f.y.max(f.w));
    let fy = f.y.min(f.w).min(fx.max(f.z));
    Vec2::new(fx, fy)
}

/// Pairwise formulation of [`two_smallest_seq`], as the phased variant of the
/// original shader surface did it.
#[inline]
fn two_smallest_pairwise(d0: Vec4, d1: Vec4) -> Vec2 {
    let f = d0.min(d1);
    let f0 = d0.max(d1);
    let f = f.min(Vec4::new(f0.w, f0.z, f0.y, f0.x));
    let fmax = Vec2::new(f.x.max(f.z), f.y.max(f.w));
    Vec2::new(f.x, f.y)
        .min(Vec2::new(f.z, f.w))
        .min(Vec2::new(fmax.y, fmax.x))
}

/// Folds the center cell's distance into the running pair and orders it.
#[inline]
fn merge_center(f: Vec2, d_center: f32) -> Vec2 {
    let (z, w) = (d_center, 1e5);
    let fmax = Vec2::new(f.x.max(z), f.y.max(w));
    let r = Vec2::new(f.x.min(z), f.y.min(w)).min(Vec2::new(fmax.y, fmax.x));
    Vec2::new(r.x.min(r.y), r.x.max(r.y))
}

/// Classic 3×3 cellular noise.
///
/// `jitter` in `[0, 1]` displaces the feature points; zero yields a square
/// grid. Returns `(F1, F2)`, the nearest and second-nearest distances, each
/// in `[0, 1]`.
pub fn cellular_noise(pos: Vec2, scale: Vec2, jitter: f32, seed: f32) -> Vec2 {
    let nf = neighbor_field(pos, scale, jitter, None, DistanceMetric::SquaredEuclidean, seed);
    let f = two_smallest_seq(nf.d0, nf.d1);
    let f12 = merge_center(f, nf.center.dot(nf.center));
    sqrt2(f12) * CELL_NORM
}

/// [`cellular_noise`] with the feature points rotated through a phase.
pub fn cellular_noise_phased(pos: Vec2, scale: Vec2, jitter: f32, phase: f32, seed: f32) -> Vec2 {
    let nf = neighbor_field(
        pos,
        scale,
        jitter,
        Some(phase),
        DistanceMetric::SquaredEuclidean,
        seed,
    );
    let f = two_smallest_pairwise(nf.d0, nf.d1);
    let f12 = merge_center(f, nf.center.dot(nf.center));
    sqrt2(f12) * CELL_NORM
}

/// [`cellular_noise_phased`] with a selectable [`DistanceMetric`].
///
/// Only the squared-euclidean metric takes a square root before returning;
/// the other metrics return the raw folded distance.
pub fn cellular_noise_metric(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    phase: f32,
    metric: DistanceMetric,
    seed: f32,
) -> Vec2 {
    let nf = neighbor_field(pos, scale, jitter, Some(phase), metric, seed);
    let f = two_smallest_seq(nf.d0, nf.d1);
    let f12 = merge_center(f, metric.distance(nf.center));
    let f12 = if metric == DistanceMetric::SquaredEuclidean {
        sqrt2(f12)
    } else {
        f12
    };
    f12 * CELL_NORM
}

/// Selects F1 and the delta toward its feature point.
#[inline]
fn nearest_with_delta(nf: &NeighborField) -> (f32, Vec2) {
    let d_center = nf.center.dot(nf.center);
    let d = nf.d0.min(nf.d1);
    let nearer1 = nf.d1.cmple(nf.d0);
    let dx = Vec4::select(nearer1, nf.dx1, nf.dx0);
    let dy = Vec4::select(nearer1, nf.dy1, nf.dy0);

    let (t1, t1d) = if d.x < d.y {
        (d.x, Vec2::new(dx.x, dy.x))
    } else {
        (d.y, Vec2::new(dx.y, dy.y))
    };
    let (t2, t2d) = if d.z < d.w {
        (d.z, Vec2::new(dx.z, dy.z))
    } else {
        (d.w, Vec2::new(dx.w, dy.w))
    };
    let (t2, t2d) = if t2 < d_center {
        (t2, t2d)
    } else {
        (d_center, nf.center)
    };
    if t1 < t2 { (t1, t1d) } else { (t2, t2d) }
}

/// Cellular F1 with the direction toward the nearest feature point.
///
/// The gradient lanes are the (scaled) delta to the feature, which is the
/// derivative of the squared distance; they point which way the nearest
/// feature lies.
pub fn cellular_noise_d(pos: Vec2, scale: Vec2, jitter: f32, seed: f32) -> WithGradient<Vec2> {
    let nf = neighbor_field(pos, scale, jitter, None, DistanceMetric::SquaredEuclidean, seed);
    let (t, delta) = nearest_with_delta(&nf);
    WithGradient {
        value: ops::sqrt(t) * CELL_NORM,
        gradient: delta * (-2.0 * CELL_NORM),
    }
}

/// [`cellular_noise_d`] with the feature points rotated through a phase.
pub fn cellular_noise_phased_d(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    phase: f32,
    seed: f32,
) -> WithGradient<Vec2> {
    let nf = neighbor_field(
        pos,
        scale,
        jitter,
        Some(phase),
        DistanceMetric::SquaredEuclidean,
        seed,
    );
    let (t, delta) = nearest_with_delta(&nf);
    WithGradient {
        value: ops::sqrt(t) * CELL_NORM,
        gradient: delta * (-2.0 * CELL_NORM),
    }
}

/// Product-accumulated smooth minimum over the neighborhood distances.
#[inline]
fn metaballs_field(nf: &NeighborField, center_distance: f32) -> f32 {
    let mut d = center_distance.min(1.0);
    d = d.min(d * nf.d0.x);
    d = d.min(d * nf.d0.y);
    d = d.min(d * nf.d0.z);
    d = d.min(d * nf.d0.w);
    d = d.min(d * nf.d1.x);
    d = d.min(d * nf.d1.y);
    d = d.min(d * nf.d1.z);
    d = d.min(d * nf.d1.w);
    d
}

/// Metaballs: a smooth continuous field instead of discrete F1/F2.
///
/// Returns the blended distance from the cell features, in `[0, 1]`.
pub fn metaballs(pos: Vec2, scale: Vec2, jitter: f32, seed: f32) -> f32 {
    let nf = neighbor_field(pos, scale, jitter, None, DistanceMetric::SquaredEuclidean, seed);
    ops::sqrt(metaballs_field(&nf, nf.center.dot(nf.center)))
}

/// [`metaballs`] mapped through a soft threshold.
///
/// `width` places the threshold, `smoothness` widens it.
pub fn metaballs_soft(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    width: f32,
    smoothness: f32,
    seed: f32,
) -> f32 {
    let d = metaballs(pos, scale, jitter, seed);
    crate::curves::smoothstep(width, width + smoothness, d)
}

/// [`metaballs`] with the feature points rotated through a phase.
pub fn metaballs_phased(pos: Vec2, scale: Vec2, jitter: f32, phase: f32, seed: f32) -> f32 {
    let nf = neighbor_field(
        pos,
        scale,
        jitter,
        Some(phase),
        DistanceMetric::SquaredEuclidean,
        seed,
    );
    ops::sqrt(metaballs_field(&nf, nf.center.dot(nf.center)))
}

/// [`metaballs_phased`] mapped through a soft threshold.
pub fn metaballs_soft_phased(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    phase: f32,
    width: f32,
    smoothness: f32,
    seed: f32,
) -> f32 {
    let d = metaballs_phased(pos, scale, jitter, phase, seed);
    crate::curves::smoothstep(width, width + smoothness, d)
}

/// [`metaballs_phased`] with a selectable [`DistanceMetric`].
///
/// As with [`cellular_noise_metric`], only the squared-euclidean metric takes
/// a square root before returning.
pub fn metaballs_metric(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    phase: f32,
    metric: DistanceMetric,
    seed: f32,
) -> f32 {
    let nf = neighbor_field(pos, scale, jitter, Some(phase), metric, seed);
    let d = metaballs_field(&nf, metric.distance(nf.center));
    if metric == DistanceMetric::SquaredEuclidean {
        ops::sqrt(d)
    } else {
        d
    }
}

/// [`metaballs_metric`] mapped through a soft threshold.
pub fn metaballs_soft_metric(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    phase: f32,
    width: f32,
    smoothness: f32,
    metric: DistanceMetric,
    seed: f32,
) -> f32 {
    let d = metaballs_metric(pos, scale, jitter, phase, metric, seed);
    crate::curves::smoothstep(width, width + smoothness, d)
}

/// Crystal-like shards from the difference of two independently seeded
/// cellular fields.
///
/// Returns `(value, F2 difference)`.
pub fn crystals(
    pos: Vec2,
    scale: Vec2,
    jitter: f32,
    phase: f32,
    metric: DistanceMetric,
) -> Vec2 {
    let c0 = cellular_noise_metric(pos, scale, jitter, phase, metric, 0.0);
    let c1 = cellular_noise_metric(pos, scale, jitter, phase, metric, 23.0);
    let a = Vec2::new(1.0 - c0.x, c0.y);
    let b = Vec2::new(1.0 - c1.x, c1.y);
    let (a, b) = if a.x > b.x { (b, a) } else { (a, b) };
    Vec2::new(b.x - a.x, a.y - b.y)
}

/// [`crystals`] with the feature direction difference as gradient.
pub fn crystals_d(pos: Vec2, scale: Vec2, jitter: f32, phase: f32) -> WithGradient<Vec2> {
    let c0 = cellular_noise_phased_d(pos, scale, jitter, phase, 0.0);
    let c1 = cellular_noise_phased_d(pos, scale, jitter, phase, 23.0);
    let a = WithGradient {
        value: 1.0 - c0.value,
        gradient: c0.gradient,
    };
    let b = WithGradient {
        value: 1.0 - c1.value,
        gradient: c1.gradient,
    };
    let (a, b) = if a.value > b.value { (b, a) } else { (a, b) };
    WithGradient {
        value: b.value - a.value,
        gradient: a.gradient - b.gradient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f1_never_exceeds_f2() {
        for k in 0..64 {
            let p = Vec2::new(
                crate::rng::hash11(k as f32),
                crate::rng::hash11(k as f32 + 100.0),
            );
            let f = cellular_noise(p, Vec2::splat(4.0), 1.0, 0.0);
            assert!(f.x <= f.y, "F1 {} > F2 {}", f.x, f.y);
        }
    }

    #[test]
    fn zero_jitter_centers_the_grid() {
        // with no jitter every feature sits at its cell origin, and a sample
        // in the middle of a cell is equidistant from all four of them
        let f = cellular_noise(Vec2::new(0.125, 0.125), Vec2::splat(4.0), 0.0, 0.0);
        let expected = ops::sqrt(0.5f32) * CELL_NORM;
        assert!((f.x - expected).abs() < 1e-6);
        assert!((f.y - expected).abs() < 1e-6);
    }
}

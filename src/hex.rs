//! Hexagonal tiling and noise: the plane partitioned into hexagons through a
//! skewed basis, with a 6-way angular fold for the signed boundary distance.

use bevy_math::{Vec2, Vec4, ops};

use crate::{
    curves::quintic,
    lanes::fract4,
    rng::{FIXED_POINT, multi_hash_quad},
};

const SQRT_THREE: f32 = 1.732_050_8;
const HALF_SQRT_THREE: f32 = 0.866_025_4;
const INV_SQRT_THREE: f32 = 0.577_350_26;

/// 60 degrees, the tangent-derived sector scale, and half of 60 degrees.
const ANGLES: Vec2 = Vec2::new(1.047_198, 0.954_929_25);
const HALF_ANGLE: f32 = 0.523_599;

/// Signed distance from `pos` to the boundary of a hexagon of `radius`.
///
/// Negative inside. `vertical` flips the hexagon's orientation.
pub fn hexagon_sdf(pos: Vec2, radius: f32, vertical: bool) -> f32 {
    // fold into one 60 degree sector, then measure against the flat side
    let pos = if vertical { pos } else { Vec2::new(-pos.y, -pos.x) };

    let sector = Vec2::new(radius, ops::atan2(pos.y, pos.x)) * Vec2::new(HALF_ANGLE, ANGLES.y)
        + Vec2::new(0.0, 0.5);
    let angle = ANGLES.x * ops::floor(sector.y);
    let rotation = Vec2::new(ops::sin(angle), ops::cos(angle));
    let pos = Vec2::new(rotation.y, rotation.x) * pos.x * Vec2::new(1.0, -1.0) + rotation * pos.y;

    let he = sector.x;
    let offset = Vec2::new(radius, pos.y.clamp(-he, he));
    (pos - offset).length() * (pos.x - radius).signum()
}

/// The hexagon radii for a tile count: `xy` the side radius, `zw` the
/// diagonal radius.
pub fn hex_tile_radii(scale: Vec2, vertical: bool) -> Vec4 {
    let tile_size = Vec2::splat(1.0 / 3.0) / scale;
    let radii = if vertical {
        Vec4::new(tile_size.y, tile_size.y, tile_size.y, tile_size.x)
    } else {
        Vec4::new(tile_size.x, tile_size.x, tile_size.x, tile_size.y)
    };
    radii * Vec4::new(1.0, 0.0, 0.5, 1.5)
}

#[inline]
fn hex_basis(vertical: bool) -> (Vec4, Vec4) {
    let hex_scale = Vec4::new(1.0, SQRT_THREE, 1.0, INV_SQRT_THREE);
    let r = Vec4::new(1.0, HALF_SQRT_THREE, 0.5, INV_SQRT_THREE);
    if vertical {
        (hex_scale, r)
    } else {
        (
            Vec4::new(hex_scale.y, hex_scale.x, hex_scale.w, hex_scale.z),
            Vec4::new(r.y, r.x, r.w, r.z),
        )
    }
}

/// Hexagonal grid tiling.
///
/// `scale` is the tile count and must be an integer for tileable results.
/// Returns `xy` = normalized UV within the hexagon and `zw` = the hexagon
/// center in UV space.
pub fn hex_tiles(pos: Vec2, scale: Vec2, vertical: bool) -> Vec4 {
    let (hex_scale, r) = hex_basis(vertical);

    let pos = pos * scale * Vec2::new(hex_scale.x, hex_scale.y);
    let p4 = Vec4::new(pos.x, pos.y, pos.x, pos.y);
    // two candidate centers on the interleaved lattices
    let center = (p4 * Vec4::new(hex_scale.z, hex_scale.w, hex_scale.z, hex_scale.w)
        + Vec4::new(0.0, 0.0, -r.z, -r.w))
    .floor()
        + 0.5;
    let uv = p4 - center * Vec4::new(hex_scale.x, hex_scale.y, hex_scale.x, hex_scale.y)
        + Vec4::new(0.0, 0.0, -0.5 * hex_scale.x, -0.5 * hex_scale.y);
    let sq = uv * uv;
    let uv_center = if sq.x + sq.y < sq.z + sq.w {
        Vec4::new(uv.x, uv.y, center.x, center.y)
    } else {
        Vec4::new(uv.z, uv.w, center.z, center.w + 0.5)
    };
    uv_center * Vec4::new(r.x, r.y, 1.0 / scale.x, 1.0 / scale.y) + Vec4::new(0.5, 0.5, 0.0, 0.0)
}

/// [`hex_tiles`] plus the normalized distance from the hexagon edge.
pub fn hex_tiles_with_edge(pos: Vec2, scale: Vec2, vertical: bool) -> (Vec4, f32) {
    let (hex_scale, r) = hex_basis(vertical);
    let inv_scale = Vec2::ONE / scale;

    let p = pos * scale * Vec2::new(hex_scale.x, hex_scale.y);
    let p4 = Vec4::new(p.x, p.y, p.x, p.y);
    let center = (p4 * Vec4::new(hex_scale.z, hex_scale.w, hex_scale.z, hex_scale.w)
        + Vec4::new(0.0, 0.0, -r.z, -r.w))
    .floor()
        + 0.5;
    let uv = p4 - center * Vec4::new(hex_scale.x, hex_scale.y, hex_scale.x, hex_scale.y)
        + Vec4::new(0.0, 0.0, -0.5 * hex_scale.x, -0.5 * hex_scale.y);
    let sq = uv * uv;
    let uv_center = if sq.x + sq.y < sq.z + sq.w {
        Vec4::new(uv.x, uv.y, center.x, center.y)
    } else {
        Vec4::new(uv.z, uv.w, center.z, center.w + 0.5)
    };
    let uv_center = uv_center * Vec4::new(r.x, r.y, inv_scale.x, inv_scale.y)
        + Vec4::new(0.5, 0.5, 0.0, 0.0);

    let size = if vertical { inv_scale.x } else { inv_scale.y };
    let p = (pos - Vec2::new(uv_center.z, uv_center.w))
        * scale
        * Vec2::new(hex_scale.x, hex_scale.y)
        * size;
    let p = if vertical { p } else { Vec2::new(-p.y, -p.x) };
    let radius = size * 0.5;
    let sector = Vec2::new(radius, ops::atan2(p.y, p.x)) * Vec2::new(HALF_ANGLE, ANGLES.y)
        + Vec2::new(0.0, 0.5);
    let angle = ANGLES.x * ops::floor(sector.y);
    let rotation = Vec2::new(ops::sin(angle), ops::cos(angle));
    let p = Vec2::new(rotation.y, rotation.x) * p.x * Vec2::new(1.0, -1.0) + rotation * p.y;

    let offset = Vec2::new(radius, p.y.clamp(-sector.x, sector.x));
    let edge_distance = (p - offset).length() / radius;
    (uv_center, edge_distance)
}

/// Unpacks a batched vertex-hash pair into the two signed channel vectors the
/// hex noise jitters with.
#[inline]
fn signed_vertex_hashes(hash0: Vec4, hash1: Vec4) -> (Vec4, Vec4) {
    (
        Vec4::new(hash0.x, hash1.x, hash0.y, hash1.y) * 2.0 - 1.0,
        Vec4::new(hash0.z, hash1.z, hash0.w, hash1.w) * 2.0 - 1.0,
    )
}

/// Gradient-style noise over a hexagonal grid.
///
/// `size` scales the radial falloff, `jitter` displaces the hex vertices per
/// axis, `use_center` adds the cell center as a feature. Returns `[0, 1]`.
pub fn hexagonal_noise(
    pos: Vec2,
    scale: Vec2,
    size: f32,
    jitter: Vec2,
    vertical: bool,
    use_center: bool,
) -> f32 {
    let inv_scale = Vec2::ONE / scale;

    // nearest hex center, in UV space
    let center = {
        let (hex_scale, r) = hex_basis(vertical);
        let p = pos * scale * Vec2::new(hex_scale.x, hex_scale.y);
        let p4 = Vec4::new(p.x, p.y, p.x, p.y);
        let c = (p4 * Vec4::new(hex_scale.z, hex_scale.w, hex_scale.z, hex_scale.w)
            + Vec4::new(0.0, 0.0, -r.z, -r.w))
        .floor()
            + 0.5;
        let uv = p4 - c * Vec4::new(hex_scale.x, hex_scale.y, hex_scale.x, hex_scale.y)
            + Vec4::new(0.0, 0.0, -0.5 * hex_scale.x, -0.5 * hex_scale.y);
        let sq = uv * uv;
        let center = if sq.x + sq.y < sq.z + sq.w {
            Vec2::new(c.x, c.y)
        } else {
            Vec2::new(c.z, c.w) + 0.5
        };
        center * inv_scale
    };

    // the side and diagonal radii around that center
    let radii = if vertical {
        Vec4::new(inv_scale.y, inv_scale.y, inv_scale.x, inv_scale.y)
            * Vec4::new(0.0, 1.0 / 3.0, 0.5, 1.0 / 6.0)
    } else {
        Vec4::new(inv_scale.x, inv_scale.x, inv_scale.x, inv_scale.y)
            * Vec4::new(1.0 / 3.0, 0.0, 1.0 / 6.0, 0.5)
    };
    let radius = if vertical {
        radii.y.min(radii.z)
    } else {
        radii.x.min(radii.w)
    };

    let jitter = jitter * 0.5 * radius;
    let jitter4 = Vec4::new(jitter.x, jitter.y, jitter.x, jitter.y);
    let center4 = Vec4::new(center.x, center.y, center.x, center.y);
    let pos4 = Vec4::new(pos.x, pos.y, pos.x, pos.y);

    // opposing vertex pairs along the radii
    let p0 = center4 - radii;
    let p1 = center4 + radii;
    let (hash0, hash1) = multi_hash_quad(fract4(p0) * FIXED_POINT, fract4(p1) * FIXED_POINT);
    let (hash0, hash1) = signed_vertex_hashes(hash0, hash1);

    let delta = pos4 - p0 + hash0 * jitter4;
    let delta = delta * delta;
    let mut dc = Vec4::new(delta.x + delta.y, delta.z + delta.w, 0.0, 0.0);
    let delta = pos4 - p1 + hash1 * jitter4;
    let delta = delta * delta;
    dc.z = delta.x + delta.y;
    dc.w = delta.z + delta.w;

    let near = Vec2::new(dc.x, dc.y).min(Vec2::new(dc.z, dc.w));
    dc.x = near.x;
    dc.y = near.y;

    // the diagonal vertex pair, batched with the center cell
    let p0 = center4 + Vec4::new(radii.z, radii.w, radii.z, radii.w) * Vec4::new(-1.0, 1.0, 1.0, -1.0);
    let (hash0, hash1) = multi_hash_quad(
        fract4(p0) * FIXED_POINT,
        fract4(center4) * FIXED_POINT,
    );
    let (hash0, hash1) = signed_vertex_hashes(hash0, hash1);

    let delta = pos4 - p0 + hash0 * jitter4;
    let delta = delta * delta;
    dc.z = delta.x + delta.y;
    dc.w = delta.z + delta.w;

    let near = Vec2::new(dc.x, dc.y).min(Vec2::new(dc.z, dc.w));
    let mut d = near.x.min(near.y);
    if use_center {
        let delta = pos - center + Vec2::new(hash1.x, hash1.y) * jitter * 0.5;
        d = d.min(delta.dot(delta));
    }
    let radius = radius * size;

    let d = ops::sqrt(d) - radius;
    quintic(-d / radius).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdf_sign_flips_across_the_boundary() {
        let inside = hexagon_sdf(Vec2::ZERO, 0.5, false);
        let outside = hexagon_sdf(Vec2::new(2.0, 0.0), 0.5, false);
        assert!(inside < 0.0);
        assert!(outside > 0.0);
    }

    #[test]
    fn tiles_assign_a_center_to_every_sample() {
        let t = hex_tiles(Vec2::new(0.3, 0.6), Vec2::splat(3.0), false);
        // normalized UV stays in range
        assert!(t.x > -0.5 && t.x < 1.5);
        assert!(t.y > -0.5 && t.y < 1.5);
    }
}

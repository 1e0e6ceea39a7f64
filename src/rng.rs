//! Hashing primitives for the noise engine.
//! This does not use the `rand` crate to enable more control and performance optimizations.
//!
//! Two families live here. The integer hashes (`ihash1d`, `ihash2d`, `ihash4d`)
//! are multiply-xorshift-multiply avalanche mixes over wrapping `u32`
//! arithmetic. The float hashes fix-point their input by [`FIXED_POINT`] and
//! run a PCG-style mix, normalizing to `[0, 1)`. The `multi_hash_*` functions
//! batch several lattice corners or hash channels into one call so the lattice
//! samplers can hash a whole cell in a single pass; the lanes are mixed
//! independently, so batching changes throughput, never the numeric result.

use bevy_math::{UVec2, UVec4, Vec2, Vec3, Vec4};
use core::sync::atomic::{AtomicU32, Ordering};

/// Normalizer mapping a full-range `u32` into `[0, 1)`.
const INV_U32_MAX: f32 = 1.0 / u32::MAX as f32;

/// Fixed-point factor applied to float coordinates before integer hashing.
pub const FIXED_POINT: f32 = 8192.0;

/// Secondary mix deriving an extra decorrelated channel from a primary hash.
#[inline(always)]
const fn channel_mix(h: u32) -> u32 {
    (h.wrapping_mul(1_933_247).wrapping_add(!h)) ^ 230_123
}

/// Truncates toward zero with two's-complement wrap, so negative coordinates
/// hash instead of saturating.
#[inline(always)]
fn bits(x: f32) -> u32 {
    x as i32 as u32
}

#[inline(always)]
fn normalize(h: u32) -> f32 {
    h as f32 * INV_U32_MAX
}

#[inline(always)]
fn normalize4(h: [u32; 4]) -> Vec4 {
    Vec4::new(h[0] as f32, h[1] as f32, h[2] as f32, h[3] as f32) * INV_U32_MAX
}

/// Integer avalanche hash of a single coordinate.
#[inline]
pub fn ihash1d(q: u32) -> u32 {
    // hash by Hugo Elias
    let q = q.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let q = (q << 13) ^ q;
    q.wrapping_mul(q.wrapping_mul(q).wrapping_mul(15731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589)
}

/// Integer avalanche hash of two coordinates at once, lane-wise.
#[inline]
pub fn ihash2d(q: UVec2) -> UVec2 {
    UVec2::new(ihash1d(q.x), ihash1d(q.y))
}

/// Integer avalanche hash of four coordinates at once, lane-wise.
#[inline]
pub fn ihash4d(q: UVec4) -> UVec4 {
    UVec4::new(ihash1d(q.x), ihash1d(q.y), ihash1d(q.z), ihash1d(q.w))
}

/// The shared lattice-corner mix: fold each `y` into its hashed `x`, then
/// avalanche the sum.
#[inline(always)]
fn corner_hash(x: [u32; 4], y: [u32; 4]) -> [u32; 4] {
    [
        ihash1d(ihash1d(x[0]).wrapping_add(y[0])),
        ihash1d(ihash1d(x[1]).wrapping_add(y[1])),
        ihash1d(ihash1d(x[2]).wrapping_add(y[2])),
        ihash1d(ihash1d(x[3]).wrapping_add(y[3])),
    ]
}

/// Hashes a 1D float coordinate to one value in `[0, 1)`.
#[inline]
pub fn hash11(x: f32) -> f32 {
    // based on: pcg by Mark Jarzynski: http://www.jcgt.org/published/0009/03/02/
    let state = bits(x * FIXED_POINT)
        .wrapping_mul(747_796_405)
        .wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    normalize((word >> 22) ^ word)
}

/// Hashes a 2D float coordinate to one value in `[0, 1)`.
#[inline]
pub fn hash21(x: Vec2) -> f32 {
    // hash by Inigo Quilez, Integer Hash - III, 2017
    let q = [bits(x.x * FIXED_POINT), bits(x.y * FIXED_POINT)];
    let qx = ((q[0] >> 1) ^ q[1]).wrapping_mul(1_103_515_245);
    let qy = ((q[1] >> 1) ^ q[0]).wrapping_mul(1_103_515_245);
    normalize(1_103_515_245u32.wrapping_mul(qx ^ (qy >> 3)))
}

/// The pcg3d lane mix without the final feedback round.
#[inline(always)]
fn pcg3_core(v: [u32; 3]) -> [u32; 3] {
    // based on: pcg3 by Mark Jarzynski: http://www.jcgt.org/published/0009/03/02/
    let v = v.map(|l| l.wrapping_mul(1_664_525).wrapping_add(1_013_904_223));
    let v = [
        v[0].wrapping_add(v[1].wrapping_mul(v[2])),
        v[1].wrapping_add(v[2].wrapping_mul(v[0])),
        v[2].wrapping_add(v[0].wrapping_mul(v[1])),
    ];
    v.map(|l| l ^ (l >> 16))
}

/// Hashes a 3D float coordinate to one value in `[0, 1)`.
#[inline]
pub fn hash31(x: Vec3) -> f32 {
    let v = pcg3_core([
        bits(x.x * FIXED_POINT),
        bits(x.y * FIXED_POINT),
        bits(x.z * FIXED_POINT),
    ]);
    normalize(v[0].wrapping_add(v[1].wrapping_mul(v[2])))
}

/// Hashes a 2D float coordinate to two values in `[0, 1)`.
#[inline]
pub fn hash22(x: Vec2) -> Vec2 {
    // based on: Inigo Quilez, Integer Hash - III, 2017
    let y = [bits(x.x * FIXED_POINT), bits(x.y * FIXED_POINT)];
    let q = [
        y[0],
        y[1],
        y[1].wrapping_add(3_115_245),
        y[0].wrapping_add(3_115_245),
    ];
    let q = [
        ((q[0] >> 1) ^ q[1]).wrapping_mul(1_103_515_245),
        ((q[1] >> 1) ^ q[0]).wrapping_mul(1_103_515_245),
        ((q[2] >> 1) ^ q[3]).wrapping_mul(1_103_515_245),
        ((q[3] >> 1) ^ q[2]).wrapping_mul(1_103_515_245),
    ];
    let n = [
        (q[0] ^ (q[1] >> 3)).wrapping_mul(1_103_515_245),
        (q[2] ^ (q[3] >> 3)).wrapping_mul(1_103_515_245),
    ];
    Vec2::new(normalize(n[0]), normalize(n[1]))
}

/// The sequential feedback round finishing the pcg3d mix.
#[inline(always)]
fn pcg3_feedback(v: [u32; 3]) -> [u32; 3] {
    let x = v[0].wrapping_add(v[1].wrapping_mul(v[2]));
    let y = v[1].wrapping_add(v[2].wrapping_mul(x));
    let z = v[2].wrapping_add(x.wrapping_mul(y));
    [x, y, z]
}

/// Hashes a 2D float coordinate to three values in `[0, 1)`.
#[inline]
pub fn hash23(x: Vec2) -> Vec3 {
    let v = pcg3_feedback(pcg3_core([
        bits(x.x * FIXED_POINT),
        bits(x.y * FIXED_POINT),
        bits(x.x * FIXED_POINT),
    ]));
    Vec3::new(normalize(v[0]), normalize(v[1]), normalize(v[2]))
}

/// Hashes a 3D float coordinate to three values in `[0, 1)`.
#[inline]
pub fn hash33(x: Vec3) -> Vec3 {
    let v = pcg3_feedback(pcg3_core([
        bits(x.x * FIXED_POINT),
        bits(x.y * FIXED_POINT),
        bits(x.z * FIXED_POINT),
    ]));
    Vec3::new(normalize(v[0]), normalize(v[1]), normalize(v[2]))
}

/// The pcg4d mix: one vector round, a sequential feedback round and a half,
/// then a double xorshift.
#[inline(always)]
fn pcg4(v: [u32; 4], full_second_round: bool) -> [u32; 4] {
    // based on: pcg4 by Mark Jarzynski: http://www.jcgt.org/published/0009/03/02/
    let v = v.map(|l| l.wrapping_mul(1_664_525).wrapping_add(1_013_904_223));
    let v = [
        v[0].wrapping_add(v[1].wrapping_mul(v[3])),
        v[1].wrapping_add(v[2].wrapping_mul(v[0])),
        v[2].wrapping_add(v[0].wrapping_mul(v[1])),
        v[3].wrapping_add(v[1].wrapping_mul(v[2])),
    ];
    let x = v[0].wrapping_add(v[1].wrapping_mul(v[3]));
    let y = v[1].wrapping_add(v[2].wrapping_mul(x));
    let z = v[2].wrapping_add(x.wrapping_mul(y));
    let w = v[3].wrapping_add(y.wrapping_mul(z));
    let (x, y, z, w) = if full_second_round {
        let x1 = x.wrapping_add(y.wrapping_mul(w));
        let y1 = y.wrapping_add(z.wrapping_mul(x1));
        let z1 = z.wrapping_add(x1.wrapping_mul(y1));
        let w1 = w.wrapping_add(y1.wrapping_mul(z1));
        (x1, y1, z1, w1)
    } else {
        let x1 = x.wrapping_add(y.wrapping_mul(w));
        let w1 = w.wrapping_add(y.wrapping_mul(z));
        (x1, y, z, w1)
    };
    let v = [x, y, z, w].map(|l| l ^ (l >> 16));
    v.map(|l| l ^ (l >> 16))
}

/// Hashes a 2D float coordinate to four values in `[0, 1)`.
#[inline]
pub fn hash24(x: Vec2) -> Vec4 {
    normalize4(pcg4(
        [
            bits(x.x * FIXED_POINT),
            bits(x.y * FIXED_POINT),
            bits(x.y * FIXED_POINT),
            bits(x.x * FIXED_POINT),
        ],
        false,
    ))
}

/// Hashes a 4D float coordinate to four values in `[0, 1)`.
#[inline]
pub fn hash44(x: Vec4) -> Vec4 {
    normalize4(pcg4(
        [
            bits(x.x * FIXED_POINT),
            bits(x.y * FIXED_POINT),
            bits(x.z * FIXED_POINT),
            bits(x.w * FIXED_POINT),
        ],
        true,
    ))
}

/// Generates two decorrelated values in `[0, 1)` for one lattice coordinate.
///
/// Unlike the `hash*` family this truncates the (already integral) coordinate
/// directly, without fixed-pointing.
#[inline]
pub fn multi_hash2(x: Vec2) -> Vec2 {
    let h0 = ihash1d(ihash1d(bits(x.x)).wrapping_add(bits(x.y)));
    let h1 = channel_mix(h0);
    Vec2::new(normalize(h0), normalize(h1))
}

/// Generates one value in `[0, 1)` for each corner of a packed cell
/// `(x0, y0, x1, y1)`, in lane order `(x0,y0) (x1,y0) (x0,y1) (x1,y1)`.
#[inline]
pub fn multi_hash_cell(cell: Vec4) -> Vec4 {
    let (x0, y0, x1, y1) = (bits(cell.x), bits(cell.y), bits(cell.z), bits(cell.w));
    normalize4(corner_hash([x0, x1, x0, x1], [y0, y0, y1, y1]))
}

/// Generates two values in `[0, 1)` for each corner of a packed cell
/// `(x0, y0, x1, y1)`, the second channel re-hashed from the first.
#[inline]
pub fn multi_hash_cell_xy(cell: Vec4) -> (Vec4, Vec4) {
    let (x0, y0, x1, y1) = (bits(cell.x), bits(cell.y), bits(cell.z), bits(cell.w));
    let hash0 = corner_hash([x0, x1, x0, x1], [y0, y0, y1, y1]);
    let hash1 = hash0.map(|h| ihash1d(h ^ 1_933_247));
    (normalize4(hash0), normalize4(hash1))
}

/// [`multi_hash_cell_xy`] remapped to `[-1, 1)`, for gradient channels.
#[inline]
pub fn smulti_hash_cell_xy(cell: Vec4) -> (Vec4, Vec4) {
    let (hash_x, hash_y) = multi_hash_cell_xy(cell);
    (hash_x * 2.0 - 1.0, hash_y * 2.0 - 1.0)
}

/// Generates two values in `[0, 1)` for each of two lattice coordinates,
/// packed `(h0(c0), h1(c0), h0(c1), h1(c1))`.
#[inline]
pub fn multi_hash_pair(coords0: Vec2, coords1: Vec2) -> Vec4 {
    let h0 = ihash1d(ihash1d(bits(coords0.x)).wrapping_add(bits(coords0.y)));
    let h1 = ihash1d(ihash1d(bits(coords1.x)).wrapping_add(bits(coords1.y)));
    normalize4([h0, channel_mix(h0), h1, channel_mix(h1)])
}

/// Generates two values in `[0, 1)` for each of four lattice coordinates,
/// packed as `(c0.xy, c0.zw, c1.xy, c1.zw)`.
#[inline]
pub fn multi_hash_quad(coords0: Vec4, coords1: Vec4) -> (Vec4, Vec4) {
    let hash0 = corner_hash(
        [
            bits(coords0.x),
            bits(coords0.z),
            bits(coords1.x),
            bits(coords1.z),
        ],
        [
            bits(coords0.y),
            bits(coords0.w),
            bits(coords1.y),
            bits(coords1.w),
        ],
    );
    let hash1 = hash0.map(channel_mix);
    (normalize4(hash0), normalize4(hash1))
}

/// Generates one value in `[0, 1)` for each of the 8 corners of a 3D cell,
/// as the `z = cell.z` row and the `z = cell_plus_one.z` row.
#[inline]
pub fn multi_hash_cell3(cell: Vec3, cell_plus_one: Vec3) -> (Vec4, Vec4) {
    let (x0, y0) = (bits(cell.x), bits(cell.y));
    let (x1, y1) = (bits(cell_plus_one.x), bits(cell_plus_one.y));
    let hash = corner_hash([x0, x1, x0, x1], [y0, y0, y1, y1]);
    let (z0, z1) = (bits(cell.z), bits(cell_plus_one.z));
    let low = hash.map(|h| ihash1d(h.wrapping_add(z0)));
    let high = hash.map(|h| ihash1d(h.wrapping_add(z1)));
    (normalize4(low), normalize4(high))
}

/// The process-wide default seed, stored as `f32` bits. Written once by
/// [`set_seed`], read by [`default_seed`]; noise functions never touch it.
static DEFAULT_SEED: AtomicU32 = AtomicU32::new(0);

/// Installs the process-wide default seed, returning the derived offset.
///
/// Call this once at initialization, before sampling concurrently. The noise
/// functions take their seed explicitly; pass [`default_seed`] at the call
/// site to use this value.
pub fn set_seed(seed: u32) -> f32 {
    let offset = (ihash1d(seed) % 100_000) as f32;
    DEFAULT_SEED.store(offset.to_bits(), Ordering::Relaxed);
    offset
}

/// Reads the process-wide default seed installed by [`set_seed`] (0.0 if
/// never set).
pub fn default_seed() -> f32 {
    f32::from_bits(DEFAULT_SEED.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_mix_decorrelates() {
        let h = ihash1d(99);
        assert_ne!(channel_mix(h), h);
    }

    #[test]
    fn negative_coordinates_hash() {
        let v = hash21(Vec2::new(-3.7, -12.1));
        assert!((0.0..1.0).contains(&v));
        let m = multi_hash2(Vec2::new(-5.0, -9.0));
        assert!((0.0..1.0).contains(&m.x));
    }
}

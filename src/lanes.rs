//! Per-lane float helpers for the 4-wide batches that glam doesn't provide
//! directly in `no_std` builds.

use bevy_math::{Vec2, Vec4, ops};

#[inline(always)]
pub(crate) fn sin2(v: Vec2) -> Vec2 {
    Vec2::new(ops::sin(v.x), ops::sin(v.y))
}

#[inline(always)]
pub(crate) fn sin4(v: Vec4) -> Vec4 {
    Vec4::new(ops::sin(v.x), ops::sin(v.y), ops::sin(v.z), ops::sin(v.w))
}

#[inline(always)]
pub(crate) fn sqrt2(v: Vec2) -> Vec2 {
    Vec2::new(ops::sqrt(v.x), ops::sqrt(v.y))
}

#[inline(always)]
pub(crate) fn inv_sqrt4(v: Vec4) -> Vec4 {
    Vec4::new(
        1.0 / ops::sqrt(v.x),
        1.0 / ops::sqrt(v.y),
        1.0 / ops::sqrt(v.z),
        1.0 / ops::sqrt(v.w),
    )
}

#[inline(always)]
pub(crate) fn pow2(v: Vec2, exponent: f32) -> Vec2 {
    Vec2::new(ops::powf(v.x, exponent), ops::powf(v.y, exponent))
}

/// GLSL `fract`: `x - floor(x)`, non-negative even for negative inputs.
#[inline(always)]
pub(crate) fn fract1(x: f32) -> f32 {
    x - ops::floor(x)
}

/// GLSL `fract` per lane.
#[inline(always)]
pub(crate) fn fract2(v: Vec2) -> Vec2 {
    v - v.floor()
}

/// GLSL `fract` per lane.
#[inline(always)]
pub(crate) fn fract4(v: Vec4) -> Vec4 {
    v - v.floor()
}

//! Interpolation kernels used to blend hashed lattice values.

use bevy_math::{
    Curve, Vec2, Vec3, Vec4, WithDerivative,
    curve::{Interval, derivatives::SampleDerivative},
};

/// The quintic fade kernel `6t^5 - 15t^4 + 10t^3`.
///
/// C2-continuous with zero first and second derivative at `t = 0` and `t = 1`,
/// which is what keeps lattice noise seamless across cell boundaries.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "bevy_reflect", derive(bevy_reflect::Reflect))]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct Quintic;

impl Curve<f32> for Quintic {
    #[inline]
    fn domain(&self) -> Interval {
        Interval::UNIT
    }

    #[inline]
    fn sample_unchecked(&self, t: f32) -> f32 {
        quintic(t)
    }
}

impl SampleDerivative<f32> for Quintic {
    #[inline]
    fn sample_with_derivative_unchecked(&self, t: f32) -> WithDerivative<f32> {
        let (value, derivative) = quintic_d(t);
        WithDerivative { value, derivative }
    }
}

/// The quintic kernel as a free function.
#[inline]
pub fn quintic(x: f32) -> f32 {
    let x2 = x * x;
    x2 * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// [`quintic`] applied per lane.
#[inline]
pub fn quintic2(x: Vec2) -> Vec2 {
    let x2 = x * x;
    x2 * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// [`quintic`] applied per lane.
#[inline]
pub fn quintic3(x: Vec3) -> Vec3 {
    let x2 = x * x;
    x2 * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// [`quintic`] applied per lane.
#[inline]
pub fn quintic4(x: Vec4) -> Vec4 {
    let x2 = x * x;
    x2 * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// The quintic kernel and its analytic derivative `30t^2(t - 1)^2`.
#[inline]
pub fn quintic_d(x: f32) -> (f32, f32) {
    let x2 = x * x;
    let u = x2 * x * (x * (x * 6.0 - 15.0) + 10.0);
    let du = 30.0 * x2 * (x * (x - 2.0) + 1.0);
    (u, du)
}

/// [`quintic_d`] applied per lane.
#[inline]
pub fn quintic_d2(x: Vec2) -> (Vec2, Vec2) {
    let x2 = x * x;
    let u = x2 * x * (x * (x * 6.0 - 15.0) + 10.0);
    let du = x2 * 30.0 * (x * (x - 2.0) + 1.0);
    (u, du)
}

/// [`quintic_d`] applied per lane.
#[inline]
pub fn quintic_d3(x: Vec3) -> (Vec3, Vec3) {
    let x2 = x * x;
    let u = x2 * x * (x * (x * 6.0 - 15.0) + 10.0);
    let du = x2 * 30.0 * (x * (x - 2.0) + 1.0);
    (u, du)
}

/// Cubic Hermite threshold between `edge0` and `edge1`.
///
/// Total over its domain like everything else here: `edge1 == edge0` divides
/// by zero and propagates the IEEE result.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend, the GLSL `mix`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#![no_std]
#![allow(
    clippy::doc_markdown,
    reason = "These rules should not apply to the readme."
)]
#![doc = include_str!("../README.md")]

pub mod cells;
pub mod cellular;
pub mod curves;
pub mod fbm;
pub mod gradient;
pub mod hex;
mod lanes;
pub mod lengths;
pub mod patterns;
pub mod perlin;
pub mod prelude;
pub mod rng;
pub mod value;
pub mod voronoi;

/// A sampled noise value paired with its analytic gradient.
///
/// The gradient is taken with respect to the scaled (lattice) coordinate, the
/// same frame the noise algorithms interpolate in. To get the gradient with
/// respect to the raw sample position, multiply by the tile scale per axis.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "bevy_reflect", derive(bevy_reflect::Reflect))]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct WithGradient<G> {
    /// The sampled value.
    pub value: f32,
    /// The gradient of the value.
    pub gradient: G,
}

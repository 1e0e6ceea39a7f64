//! Contains common imports

pub use crate::{
    WithGradient,
    cellular::{
        cellular_noise, cellular_noise_d, cellular_noise_metric, metaballs, metaballs_soft,
    },
    curves::{Quintic, smoothstep},
    fbm::{Fbm, fbm, fbm_d},
    gradient::{gradient_noise, gradient_noise_d, gradient_noise_rotated},
    hex::{hex_tiles, hexagonal_noise},
    lengths::DistanceMetric,
    patterns::{checkerboard, cross_pattern, stairs_pattern, wave_pattern},
    perlin::{perlin_noise, perlin_noise_d},
    rng::{default_seed, set_seed},
    value::{value_noise, value_noise_3d, value_noise_d},
    voronoi::voronoi,
};

//! Fractal Brownian motion: octaves of any base noise at rising frequency
//! and falling amplitude, normalized into a weighted average.

use bevy_math::{Vec2, Vec4, ops};

use crate::{
    WithGradient,
    cells::scale4,
    cellular::metaballs_soft,
    value::{grid_noise, multi_value_noise, value_noise_3d, value_noise_d},
    voronoi::voronoi,
};

/// Spectral controls for fractal Brownian motion, generic over the base
/// noise through the `sample*` methods.
///
/// Tileability of the base survives the composition as long as `lacunarity`
/// keeps the per-octave scales integral and `shift` is zero.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "bevy_reflect", derive(bevy_reflect::Reflect))]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct Fbm {
    /// How many octaves to accumulate. Defaults to 4.
    pub octaves: u32,
    /// Amplitude multiplier per octave. A good default is 0.5.
    pub gain: f32,
    /// Frequency multiplier per octave; integer values preserve tileability.
    /// A good default is 2.
    pub lacunarity: f32,
    /// Domain shift added to the position before each later octave. Non-zero
    /// values warp the field and trade away exact wraparound.
    pub shift: f32,
    /// Shapes the amplitude falloff exponent, range `[-1, 1]`; zero keeps
    /// plain geometric falloff.
    pub octave_factor: f32,
}

impl Default for Fbm {
    fn default() -> Self {
        Self {
            octaves: 4,
            gain: 0.5,
            lacunarity: 2.0,
            shift: 0.0,
            octave_factor: 0.0,
        }
    }
}

impl Fbm {
    /// Accumulates `octaves` samples of `noise`, each octave at
    /// `lacunarity` times the previous scale and `gain` times the previous
    /// amplitude, re-seeded per octave. The result is normalized by the
    /// total weight, so a base in `[-1, 1]` stays in `[-1, 1]`.
    pub fn sample(
        &self,
        pos: Vec2,
        scale: Vec2,
        seed: f32,
        mut noise: impl FnMut(Vec2, Vec2, f32) -> f32,
    ) -> f32 {
        let exponent = 1.0 + self.octave_factor * 0.12;
        let mut amplitude = self.gain;
        let mut frequency = scale;
        let mut p = pos;
        let mut seed = seed;
        let mut total = 0.0;
        let mut total_weight = 0.0;
        for _ in 0..self.octaves {
            total += amplitude * noise(p, frequency, seed);
            total_weight += amplitude;

            p += Vec2::splat(self.shift);
            frequency *= self.lacunarity;
            amplitude = ops::powf(amplitude * self.gain, exponent);
            seed += 1.0;
        }
        total / total_weight
    }

    /// Derivative-aware accumulation: the running gradient damps the
    /// contribution of later octaves by `1 / (1 + slopeness * |∇|)`, which
    /// approximates erosion on steep slopes.
    pub fn sample_with_gradient(
        &self,
        pos: Vec2,
        scale: Vec2,
        slopeness: f32,
        seed: f32,
        mut noise: impl FnMut(Vec2, Vec2, f32) -> WithGradient<Vec2>,
    ) -> WithGradient<Vec2> {
        let exponent = 1.0 + self.octave_factor * 0.12;
        let mut amplitude = self.gain;
        let mut frequency = scale;
        let mut p = pos;
        let mut seed = seed;
        let mut total = 0.0;
        let mut total_weight = 0.0;
        let mut running_gradient = Vec2::ZERO;
        for _ in 0..self.octaves {
            let octave = noise(p, frequency, seed);
            running_gradient += octave.gradient * amplitude;
            let contribution = 1.0 / (1.0 + running_gradient.length() * slopeness);
            total += amplitude * octave.value * contribution;
            total_weight += amplitude;

            p += Vec2::splat(self.shift);
            frequency *= self.lacunarity;
            amplitude = ops::powf(amplitude * self.gain, exponent);
            seed += 1.0;
        }
        WithGradient {
            value: total / total_weight,
            gradient: running_gradient,
        }
    }
}

/// Fractal value noise with a height phase per octave.
///
/// `time_shift` advances the height axis between octaves. Returns `[-1, 1]`.
pub fn fbm(
    pos: Vec2,
    scale: Vec2,
    octaves: u32,
    shift: f32,
    time_shift: f32,
    gain: f32,
    lacunarity: f32,
    octave_factor: f32,
    seed: f32,
) -> f32 {
    let spectrum = Fbm {
        octaves,
        gain,
        lacunarity,
        shift,
        octave_factor,
    };
    let mut time = 0.0;
    spectrum.sample(pos, scale, seed, |p, s, seed| {
        let n = value_noise_3d(p, s, time, seed);
        time += time_shift;
        n
    })
}

/// Fractal value noise with derivative-damped accumulation.
///
/// `slopeness` in `[0, 1]` controls how strongly steep running slopes mute
/// later octaves.
pub fn fbm_d(
    pos: Vec2,
    scale: Vec2,
    octaves: u32,
    shift: f32,
    gain: f32,
    lacunarity: f32,
    slopeness: f32,
    octave_factor: f32,
    seed: f32,
) -> WithGradient<Vec2> {
    let spectrum = Fbm {
        octaves,
        gain,
        lacunarity,
        shift,
        octave_factor,
    };
    spectrum.sample_with_gradient(pos, scale, slopeness, seed, value_noise_d)
}

/// Fractal Voronoi edge distances. Returns the accumulated field remapped to
/// `[-1, 1]`-ish range.
pub fn fbm_voronoi(
    pos: Vec2,
    scale: Vec2,
    octaves: u32,
    shift: f32,
    gain: f32,
    lacunarity: f32,
    octave_factor: f32,
    jitter: f32,
    phase: f32,
    seed: f32,
) -> f32 {
    let spectrum = Fbm {
        octaves,
        gain,
        lacunarity,
        shift,
        octave_factor,
    };
    spectrum.sample(pos, scale, seed, |p, s, seed| {
        voronoi(p, s, jitter, phase, seed).x * 2.0 - 1.0
    })
}

/// Fractal metaballs through the soft threshold.
pub fn fbm_metaballs(
    pos: Vec2,
    scale: Vec2,
    octaves: u32,
    shift: f32,
    gain: f32,
    lacunarity: f32,
    octave_factor: f32,
    jitter: f32,
    width: f32,
    smoothness: f32,
    seed: f32,
) -> f32 {
    let spectrum = Fbm {
        octaves,
        gain,
        lacunarity,
        shift,
        octave_factor,
    };
    spectrum.sample(pos, scale, seed, |p, s, seed| {
        metaballs_soft(p, s, jitter, width, smoothness, seed)
    })
}

/// Fractal grid noise where each octave warps the next.
///
/// `warp_strength` feeds every octave's value back as a positional offset
/// for the one after it.
pub fn fbm_grid(
    pos: Vec2,
    scale: Vec2,
    octaves: u32,
    shift: f32,
    time_shift: f32,
    gain: f32,
    lacunarity: f32,
    warp_strength: f32,
    octave_factor: f32,
    seed: f32,
) -> f32 {
    let spectrum = Fbm {
        octaves,
        gain,
        lacunarity,
        shift,
        octave_factor,
    };
    let mut time = 0.0;
    let mut warp = 0.0;
    spectrum.sample(pos, scale, seed, |p, s, seed| {
        let n = grid_noise(p + Vec2::splat(warp), s, 0.75, time, seed);
        time += time_shift;
        warp = n * warp_strength;
        n * 2.0 - 1.0
    })
}

/// Two decorrelated fractal value noise channels in one pass.
pub fn fbm_multi(
    pos: Vec2,
    scale: Vec2,
    lacunarity: f32,
    octaves: u32,
    phase: f32,
    seed: f32,
) -> Vec2 {
    let gain = 0.5f32;
    let mut amplitude = gain;
    let mut frequency = scale;
    let mut seed = Vec2::new(seed, seed + 23.0);
    let mut total = Vec2::ZERO;
    let mut total_weight = 0.0;
    for _ in 0..octaves {
        let n = multi_value_noise(
            Vec4::new(pos.x, pos.y, pos.x, pos.y),
            scale4(frequency),
            phase,
            seed,
        );
        total += n * amplitude;
        total_weight += amplitude;

        frequency *= lacunarity;
        amplitude *= gain;
        seed += 1.0;
    }
    total / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::value_noise;

    #[test]
    fn single_octave_matches_base() {
        let spectrum = Fbm {
            octaves: 1,
            ..Fbm::default()
        };
        let pos = Vec2::new(0.21, 0.83);
        let scale = Vec2::splat(4.0);
        let composed = spectrum.sample(pos, scale, 0.0, value_noise);
        let base = value_noise(pos, scale, 0.0);
        assert_eq!(composed, base);
    }

    #[test]
    fn normalization_keeps_range() {
        for k in 0..128 {
            let p = Vec2::new(
                crate::rng::hash11(k as f32),
                crate::rng::hash11(k as f32 + 512.0),
            );
            let v = fbm(p, Vec2::splat(4.0), 6, 0.0, 0.0, 0.5, 2.0, 0.0, 0.0);
            assert!((-1.05..=1.05).contains(&v));
        }
    }
}

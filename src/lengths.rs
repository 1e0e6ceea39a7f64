//! Distance metrics for the cellular and metaballs fields.

use bevy_math::{Vec2, Vec4};

/// Selects how cellular noise measures the distance to a feature point.
///
/// The numeric discriminants are the wire values of the original shader
/// surface; anything out of range falls through to [`Self::Triangular`].
#[derive(Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "bevy_reflect", derive(bevy_reflect::Reflect))]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "debug", derive(Debug))]
#[repr(u32)]
pub enum DistanceMetric {
    /// Squared euclidean distance. The only metric the cellular fields take a
    /// square root of before returning.
    #[default]
    SquaredEuclidean = 0,
    /// Sum of absolute components; traces a diamond.
    Manhattan = 1,
    /// Maximum absolute component; traces a square.
    Chebyshev = 2,
    /// A 60-degree folded distance; traces a triangle.
    Triangular = 3,
}

impl DistanceMetric {
    /// Maps a raw selector to a metric; out-of-range selectors fall through
    /// to [`Self::Triangular`].
    #[inline]
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Self::SquaredEuclidean,
            1 => Self::Manhattan,
            2 => Self::Chebyshev,
            _ => Self::Triangular,
        }
    }

    /// Distance of `pos` from the origin under this metric.
    #[inline]
    pub fn distance(self, pos: Vec2) -> f32 {
        match self {
            Self::SquaredEuclidean => pos.dot(pos),
            Self::Manhattan => pos.abs().dot(Vec2::ONE),
            Self::Chebyshev => pos.x.abs().max(pos.y.abs()),
            Self::Triangular => (pos.x.abs() * 0.866025 + pos.y * 0.5).max(-pos.y),
        }
    }

    /// Four distances at a time, for the batched neighborhood deltas.
    #[inline]
    pub fn distance4(self, px: Vec4, py: Vec4) -> Vec4 {
        match self {
            Self::SquaredEuclidean => px * px + py * py,
            Self::Manhattan => px.abs() + py.abs(),
            Self::Chebyshev => px.abs().max(py.abs()),
            Self::Triangular => (px.abs() * 0.866025 + py * 0.5).max(py * -1.0),
        }
    }
}

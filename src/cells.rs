//! Lattice and cell samplers: the wrapping arithmetic that makes every noise
//! field periodic, and the packed cell shapes the hash batches consume.

use bevy_math::{Vec2, Vec3, Vec4};

/// Floored modulo (GLSL `mod`): `x - scale * floor(x / scale)`.
///
/// Hash inputs at coordinate `0` and coordinate `scale` are identical, which
/// is exactly the tileability guarantee: with an integer `scale`, the lattice
/// repeats with period `scale`.
#[inline]
pub fn wrap2(x: Vec2, scale: Vec2) -> Vec2 {
    x - scale * (x / scale).floor()
}

/// [`wrap2`] for packed pairs of coordinates.
#[inline]
pub fn wrap4(x: Vec4, scale: Vec4) -> Vec4 {
    x - scale * (x / scale).floor()
}

/// Broadcasts a per-axis scale onto a packed pair of coordinates.
#[inline]
pub fn scale4(scale: Vec2) -> Vec4 {
    Vec4::new(scale.x, scale.y, scale.x, scale.y)
}

/// The square lattice cell enclosing a scaled sample position.
///
/// `corners` packs the wrapped, seed-offset corner coordinates as
/// `(x0, y0, x1, y1)`, ready for the `multi_hash_cell*` batches; `frac` is the
/// fractional offset of the sample within the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeCell2 {
    /// Packed wrapped corner coordinates `(x0, y0, x1, y1)`.
    pub corners: Vec4,
    /// Fractional position within the cell, each lane in `[0, 1)`.
    pub frac: Vec2,
}

impl LatticeCell2 {
    /// Builds the cell for `pos` at `scale`, wrapping the corners modulo
    /// `scale` and offsetting them by `seed`.
    #[inline]
    pub fn at(pos: Vec2, scale: Vec2, seed: f32) -> Self {
        let pos = pos * scale;
        let i0 = pos.floor();
        let corners = Vec4::new(i0.x, i0.y, i0.x + 1.0, i0.y + 1.0);
        Self {
            corners: wrap4(corners, scale4(scale)) + seed,
            frac: pos - i0,
        }
    }

    /// Offsets from each corner to the sample, packed so that
    /// `(x, y) (z, y) (x, w) (z, w)` are the four corner deltas.
    #[inline]
    pub fn signed_offsets(&self) -> Vec4 {
        Vec4::new(self.frac.x, self.frac.y, self.frac.x - 1.0, self.frac.y - 1.0)
    }
}

/// The 3D lattice cell for height-extended noise, tileable on the XY axes
/// only; the two rows feed [`multi_hash_cell3`](crate::rng::multi_hash_cell3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeCell3 {
    /// The wrapped, seed-offset lesser corner.
    pub cell: Vec3,
    /// The wrapped, seed-offset greater corner.
    pub cell_plus_one: Vec3,
    /// Fractional position within the cell.
    pub frac: Vec3,
}

impl LatticeCell3 {
    /// Builds the cell for `pos` at `scale` with a third `height` axis.
    #[inline]
    pub fn at(pos: Vec2, scale: Vec2, height: f32, seed: f32) -> Self {
        let pos = pos * scale;
        let p = Vec3::new(pos.x, pos.y, height);
        let i = p.floor();
        let ip1 = i + 1.0;
        let mi = wrap4(Vec4::new(i.x, i.y, ip1.x, ip1.y), scale4(scale));
        Self {
            cell: Vec3::new(mi.x, mi.y, i.z) + seed,
            cell_plus_one: Vec3::new(mi.z, mi.w, ip1.z) + seed,
            frac: p - i,
        }
    }
}

/// The 3×3 cell neighborhood cellular noise walks: the wrapped corner cells,
/// the wrapped center cell, and the fractional position within it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellNeighborhood {
    /// Wrapped `(x-1, y-1, x+1, y+1)` neighbor coordinates, seed-offset.
    pub cells: Vec4,
    /// Wrapped center cell coordinate, seed-offset.
    pub center: Vec2,
    /// Fractional position within the center cell.
    pub frac: Vec2,
}

impl CellNeighborhood {
    /// Integer offsets of the first hash batch: the cells left of and below
    /// the center row.
    pub const OFFSETS_X0: Vec4 = Vec4::new(-1.0, 0.0, 1.0, -1.0);
    /// Paired y offsets for [`Self::OFFSETS_X0`].
    pub const OFFSETS_Y0: Vec4 = Vec4::new(-1.0, -1.0, -1.0, 0.0);
    /// Integer offsets of the second hash batch: the remaining neighbors.
    pub const OFFSETS_X1: Vec4 = Vec4::new(1.0, 1.0, -1.0, 0.0);
    /// Paired y offsets for [`Self::OFFSETS_X1`].
    pub const OFFSETS_Y1: Vec4 = Vec4::new(1.0, 0.0, 1.0, 1.0);

    /// Builds the neighborhood for `pos` at `scale`, wrapped and seed-offset.
    #[inline]
    pub fn at(pos: Vec2, scale: Vec2, seed: f32) -> Self {
        let pos = pos * scale;
        let i = pos.floor();
        let cells = wrap4(
            Vec4::new(i.x, i.y, i.x, i.y) + Vec4::new(-1.0, -1.0, 1.0, 1.0),
            scale4(scale),
        ) + seed;
        Self {
            cells,
            center: wrap2(i, scale) + seed,
            frac: pos - i,
        }
    }

    /// Hashes two feature-point channels for all eight neighbor cells in two
    /// batched passes, lane order matching [`Self::OFFSETS_X0`] and
    /// [`Self::OFFSETS_X1`].
    #[inline]
    pub fn hash_neighbors(&self) -> (Vec4, Vec4, Vec4, Vec4) {
        let (dx0, dy0) = crate::rng::multi_hash_quad(
            Vec4::new(self.cells.x, self.cells.y, self.center.x, self.cells.y),
            Vec4::new(self.cells.z, self.cells.y, self.cells.x, self.center.y),
        );
        let (dx1, dy1) = crate::rng::multi_hash_quad(
            Vec4::new(self.cells.z, self.cells.w, self.cells.z, self.center.y),
            Vec4::new(self.cells.x, self.cells.w, self.center.x, self.cells.w),
        );
        (dx0, dy0, dx1, dy1)
    }
}

use core::{fmt, ops};

use euclid::vec2;

use crate::math::{GridCoordinate, GridVector};

// -------------------------------------------------------------------------------------------------

/// Identifies one of the eight wedges around a cell, bounded by the axes and the diagonals.
///
/// Each variant is named by the compass directions it spans, primary direction first;
/// for example, [`Octant::Nne`] contains the cells north of the origin that lean east,
/// up to and including the north-east diagonal.
///
/// Shadowcasting is written once for a canonical wedge and reused for every octant through
/// [`Octant::transform()`]. In canonical coordinates, the scan proceeds in rows
/// `dy = -distance` with `dx` running from `-distance` (the diagonal) to `0` (the axis).
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Eq, Hash, PartialEq, exhaust::Exhaust)]
#[repr(u8)]
pub enum Octant {
    /// North, leaning west. This is the canonical octant.
    Nnw = 0,
    /// North, leaning east.
    Nne = 1,
    /// South, leaning west.
    Ssw = 2,
    /// South, leaning east.
    Sse = 3,
    /// West, leaning north.
    Wnw = 4,
    /// West, leaning south.
    Wsw = 5,
    /// East, leaning north.
    Ene = 6,
    /// East, leaning south.
    Ese = 7,
}

impl Octant {
    /// All values of the enum.
    pub const ALL: [Self; 8] = [
        Self::Nnw,
        Self::Nne,
        Self::Ssw,
        Self::Sse,
        Self::Wnw,
        Self::Wsw,
        Self::Ene,
        Self::Ese,
    ];

    /// Returns the matrix `[xx, xy, yx, yy]` that maps canonical offsets to world offsets,
    /// as `world = (dx * xx + dy * xy, dx * yx + dy * yy)`.
    #[inline]
    pub const fn matrix(self) -> [GridCoordinate; 4] {
        match self {
            Self::Nnw => [1, 0, 0, 1],
            Self::Nne => [-1, 0, 0, 1],
            Self::Ssw => [1, 0, 0, -1],
            Self::Sse => [-1, 0, 0, -1],
            Self::Wnw => [0, 1, 1, 0],
            Self::Wsw => [0, 1, -1, 0],
            Self::Ene => [0, -1, 1, 0],
            Self::Ese => [0, -1, -1, 0],
        }
    }

    /// Maps an offset in canonical coordinates to the corresponding world offset.
    #[inline(always)] // hot in shadowcasting
    pub fn transform(self, dx: GridCoordinate, dy: GridCoordinate) -> GridVector {
        let [xx, xy, yx, yy] = self.matrix();
        vec2(dx * xx + dy * xy, dx * yx + dy * yy)
    }

    /// Returns the quadrant that this octant lies in.
    ///
    /// Cells on the octant's axis are shared with a neighboring quadrant; this is the quadrant
    /// of the octant's interior.
    #[inline]
    pub const fn quadrant(self) -> Quadrant {
        let [xx, xy, yx, yy] = self.matrix();
        // Sign of the world offset of the canonical cell (-1, -1).
        Quadrant::from_signs(-xx - xy, -yx - yy)
    }
}

impl fmt::Debug for Octant {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nnw => "NNW",
            Self::Nne => "NNE",
            Self::Ssw => "SSW",
            Self::Sse => "SSE",
            Self::Wnw => "WNW",
            Self::Wsw => "WSW",
            Self::Ene => "ENE",
            Self::Ese => "ESE",
        })
    }
}

// -------------------------------------------------------------------------------------------------

/// Identifies one of the four diagonal directions from a cell, or equivalently the quarter-plane
/// of cells lying in that direction.
///
/// North is `-y` and east is `+x`.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Eq, Hash, PartialEq, exhaust::Exhaust)]
#[repr(u8)]
pub enum Quadrant {
    /// `+x, -y`.
    Ne = 0,
    /// `-x, -y`.
    Nw = 1,
    /// `+x, +y`.
    Se = 2,
    /// `-x, +y`.
    Sw = 3,
}

impl Quadrant {
    /// All values of the enum.
    //---
    // Note: `QuadrantMap::iter()` depends on the ordering of this.
    pub const ALL: [Self; 4] = [Self::Ne, Self::Nw, Self::Se, Self::Sw];

    /// Returns the quadrant containing offsets with the given signs.
    ///
    /// Zero counts as positive.
    #[inline]
    pub const fn from_signs(x: GridCoordinate, y: GridCoordinate) -> Self {
        match (x >= 0, y >= 0) {
            (true, false) => Self::Ne,
            (false, false) => Self::Nw,
            (true, true) => Self::Se,
            (false, true) => Self::Sw,
        }
    }

    /// Returns the offset of the diagonal neighbor in this direction.
    #[inline]
    pub fn diagonal_step(self) -> GridVector {
        match self {
            Self::Ne => vec2(1, -1),
            Self::Nw => vec2(-1, -1),
            Self::Se => vec2(1, 1),
            Self::Sw => vec2(-1, 1),
        }
    }

    /// Returns the quadrant in the opposite direction.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Ne => Self::Sw,
            Self::Nw => Self::Se,
            Self::Se => Self::Nw,
            Self::Sw => Self::Ne,
        }
    }

    const fn to_index(self) -> usize {
        self as usize
    }
}

impl fmt::Debug for Quadrant {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ne => "NE",
            Self::Nw => "NW",
            Self::Se => "SE",
            Self::Sw => "SW",
        })
    }
}

// -------------------------------------------------------------------------------------------------

/// A container of one `T` for each [`Quadrant`].
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct QuadrantMap<T>([T; 4]);

impl<T> QuadrantMap<T> {
    /// Constructs a [`QuadrantMap`] by using the provided function to compute
    /// a value for each quadrant.
    #[inline]
    #[must_use]
    pub fn from_fn(mut function: impl FnMut(Quadrant) -> T) -> Self {
        Self(Quadrant::ALL.map(&mut function))
    }

    /// Constructs a [`QuadrantMap`] by copying the provided value.
    #[inline]
    #[must_use]
    pub const fn repeat(value: T) -> Self
    where
        T: Copy,
    {
        Self([value; 4])
    }

    /// Returns an iterator over all elements by reference, and their quadrants.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &T)> + '_ {
        Quadrant::ALL.into_iter().zip(self.0.iter())
    }

    /// Returns an iterator over all elements by reference.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for QuadrantMap<T> {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("QuadrantMap");
        for quadrant in Quadrant::ALL {
            s.field(&format!("{quadrant:?}"), &self[quadrant]);
        }
        s.finish()
    }
}

impl<T> ops::Index<Quadrant> for QuadrantMap<T> {
    type Output = T;
    #[inline]
    fn index(&self, quadrant: Quadrant) -> &Self::Output {
        &self.0[quadrant.to_index()]
    }
}
impl<T> ops::IndexMut<Quadrant> for QuadrantMap<T> {
    #[inline]
    fn index_mut(&mut self, quadrant: Quadrant) -> &mut Self::Output {
        &mut self.0[quadrant.to_index()]
    }
}

// -------------------------------------------------------------------------------------------------

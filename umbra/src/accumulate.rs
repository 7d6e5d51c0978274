//! How result cells combine the contributions that reach them.

use crate::math::{Grid, GridRect, Quadrant, QuadrantMap};

/// A per-cell result of casting, updated with each contribution that reaches the cell.
///
/// Contributions are combined by taking the maximum, so that casting is idempotent and the
/// order in which octants are scanned does not matter. A cell on an axis or diagonal is
/// reached from two octants; a maximum counts it once.
pub trait Accumulate: Copy + Default {
    /// Records a contribution of `value`, arriving from the origin through `quadrant`.
    ///
    /// `quadrant` is the quadrant of the octant being scanned, which is the direction from
    /// the origin towards the cell.
    fn accumulate(&mut self, quadrant: Quadrant, value: f32);

    /// Returns the overall value of this cell, which is the largest contribution recorded.
    fn read(&self) -> f32;
}

impl Accumulate for f32 {
    #[inline]
    fn accumulate(&mut self, _: Quadrant, value: f32) {
        if value > *self {
            *self = value;
        }
    }

    #[inline]
    fn read(&self) -> f32 {
        *self
    }
}

/// A result cell that keeps a separate maximum for each direction light arrived from.
///
/// A renderer can use this to light only the faces of a wall that are turned toward the
/// source, rather than lighting the wall from every side.
pub type FourQuadrants = QuadrantMap<f32>;

impl Accumulate for FourQuadrants {
    #[inline]
    fn accumulate(&mut self, quadrant: Quadrant, value: f32) {
        self[quadrant].accumulate(quadrant, value);
    }

    #[inline]
    fn read(&self) -> f32 {
        self.values().copied().fold(0.0, f32::max)
    }
}

/// Allocates a result field covering `bounds` with every cell at its initial value.
pub fn new_field<A: Accumulate>(bounds: GridRect) -> Grid<Box<[A]>> {
    Grid::repeat(bounds, A::default())
}

/// Reduces a result field to one scalar per cell, using [`Accumulate::read()`].
pub fn read_field<A: Accumulate>(field: &Grid<Box<[A]>>) -> Grid<Box<[f32]>> {
    Grid::from_fn(field.bounds(), |cell| field[cell].read())
}

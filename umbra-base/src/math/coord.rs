//! Numeric types used for coordinates and related quantities.

use euclid::{Point2D, Point3D, Size2D, Vector2D};

/// Unit of distance on the cell grid.
///
/// This type is uninhabited; it is used only as the unit parameter of [`euclid`] types,
/// so that grid positions cannot be mixed up with other coordinate systems by accident.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug)]
pub enum Cell {}

/// Coordinates that are locked to the cell grid.
pub type GridCoordinate = i32;

/// Numeric type in a [`GridSize`].
pub type GridSizeCoord = u32;

/// Positions of cells on one level.
///
/// `+x` is east and `+y` is south, so that row 0 is the northernmost row of a grid.
pub type GridPoint = Point2D<GridCoordinate, Cell>;

/// Offsets between cells on one level.
pub type GridVector = Vector2D<GridCoordinate, Cell>;

/// Sizes of grid-aligned rectangles.
pub type GridSize = Size2D<GridSizeCoord, Cell>;

/// Positions of cells in a stack of levels.
///
/// `x` and `y` are as in [`GridPoint`]; `z` is the level index, increasing upward.
pub type LevelPoint = Point3D<GridCoordinate, Cell>;

/// Chebyshev distance: the number of king moves between two cells.
#[inline]
pub fn chebyshev_length(offset: GridVector) -> GridCoordinate {
    offset.x.abs().max(offset.y.abs())
}

/// Euclidean distance rounded to the nearest whole number of cells.
///
/// Uses only integer arithmetic, so the result is identical on every platform.
#[inline]
pub fn rounded_euclidean_length(offset: GridVector) -> GridCoordinate {
    rounded_euclidean_length_3d(offset, 0)
}

/// Same as [`rounded_euclidean_length`], extended by a vertical component.
#[inline]
pub fn rounded_euclidean_length_3d(offset: GridVector, dz: GridCoordinate) -> GridCoordinate {
    let squared =
        i128::from(offset.x).pow(2) + i128::from(offset.y).pow(2) + i128::from(dz).pow(2);
    // round(sqrt(s)) is the n for which (n - 0.5)² <= s < (n + 0.5)²,
    // that is, 4n² - 4n + 1 <= 4s < 4n² + 4n + 1.
    let mut n = squared.isqrt();
    if 4 * squared >= 4 * n * n + 4 * n + 1 {
        n += 1;
    }
    GridCoordinate::try_from(n).unwrap_or(GridCoordinate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn chebyshev() {
        assert_eq!(chebyshev_length(vec2(0, 0)), 0);
        assert_eq!(chebyshev_length(vec2(3, -7)), 7);
        assert_eq!(chebyshev_length(vec2(-5, 5)), 5);
    }

    #[test]
    fn euclidean_rounding() {
        assert_eq!(rounded_euclidean_length(vec2(0, 0)), 0);
        assert_eq!(rounded_euclidean_length(vec2(3, 4)), 5);
        // sqrt(2) = 1.414
        assert_eq!(rounded_euclidean_length(vec2(1, 1)), 1);
        // sqrt(8) = 2.83
        assert_eq!(rounded_euclidean_length(vec2(-2, 2)), 3);
        // sqrt(60² + 60²) = 84.85
        assert_eq!(rounded_euclidean_length(vec2(60, -60)), 85);
    }

    #[test]
    fn euclidean_extremes() {
        let max = GridCoordinate::MAX;
        let min = GridCoordinate::MIN;
        assert_eq!(rounded_euclidean_length(vec2(max, 0)), max);
        assert_eq!(rounded_euclidean_length(vec2(0, min)), max);
        assert_eq!(rounded_euclidean_length_3d(vec2(max, min), max), max);
    }

    #[test]
    fn euclidean_is_nearest_integer() {
        for x in -70..=70 {
            for y in -70..=70 {
                let n = i64::from(rounded_euclidean_length(vec2(x, y)));
                let four_s = 4 * i64::from(x * x + y * y);
                assert!(
                    (2 * n - 1).pow(2) <= four_s || n == 0,
                    "({x}, {y}) rounded up too far to {n}"
                );
                assert!(four_s < (2 * n + 1).pow(2), "({x}, {y}) rounded down to {n}");
            }
        }
    }

    #[test]
    fn euclidean_3d() {
        assert_eq!(rounded_euclidean_length_3d(vec2(2, 3), 6), 7);
        assert_eq!(
            rounded_euclidean_length_3d(vec2(5, -4), 0),
            rounded_euclidean_length(vec2(5, -4))
        );
    }
}

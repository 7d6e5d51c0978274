//! Axis-aligned integer-coordinate rectangles ([`GridRect`]) and iteration over their cells.

use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;

use crate::math::{GridCoordinate, GridPoint, GridSize, GridSizeCoord};

/// An axis-aligned rectangle of whole cells, with half-open bounds.
///
/// Every [`Grid`](crate::math::Grid) has one of these describing which cells it holds data for.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct GridRect {
    lower_bounds: GridPoint,
    /// Constructor checks ensure this is not smaller than `lower_bounds`.
    upper_bounds: GridPoint,
}

impl GridRect {
    /// Rectangle of zero size at `[0, 0]`.
    pub const ORIGIN_EMPTY: GridRect = GridRect {
        lower_bounds: GridPoint::new(0, 0),
        upper_bounds: GridPoint::new(0, 0),
    };

    /// Constructs a [`GridRect`] from coordinate lower bounds and sizes.
    ///
    /// For example, if on one axis the lower bound is 5 and the size is 10,
    /// then the cells on that axis are numbered 5 through 14 (inclusive).
    ///
    /// Panics if the resulting upper bound would overflow [`GridCoordinate`].
    /// Use [`GridRect::checked_from_lower_size()`] to get an error instead.
    #[track_caller]
    #[inline]
    pub fn from_lower_size(lower_bounds: impl Into<GridPoint>, size: impl Into<GridSize>) -> Self {
        match Self::checked_from_lower_size(lower_bounds.into(), size.into()) {
            Ok(rect) => rect,
            Err(error) => panic!("{error}"),
        }
    }

    /// Constructs a [`GridRect`] from coordinate lower bounds and sizes,
    /// or returns an error if the upper bounds would overflow.
    #[inline]
    pub fn checked_from_lower_size(
        lower_bounds: impl Into<GridPoint>,
        size: impl Into<GridSize>,
    ) -> Result<Self, GridOverflowError> {
        let lower_bounds = lower_bounds.into();
        let size = size.into();
        let add = |lower: GridCoordinate, size: GridSizeCoord| lower.checked_add_unsigned(size);
        match (
            add(lower_bounds.x, size.width),
            add(lower_bounds.y, size.height),
        ) {
            (Some(x), Some(y)) => Ok(Self {
                lower_bounds,
                upper_bounds: GridPoint::new(x, y),
            }),
            _ => Err(GridOverflowError { lower_bounds, size }),
        }
    }

    /// Constructs a [`GridRect`] from inclusive lower bounds and exclusive upper bounds.
    ///
    /// Panics if any upper bound is less than the corresponding lower bound.
    #[track_caller]
    #[inline]
    pub fn from_lower_upper(
        lower_bounds: impl Into<GridPoint>,
        upper_bounds: impl Into<GridPoint>,
    ) -> Self {
        let lower_bounds = lower_bounds.into();
        let upper_bounds = upper_bounds.into();
        assert!(
            lower_bounds.x <= upper_bounds.x && lower_bounds.y <= upper_bounds.y,
            "GridRect's lower bounds {lower_bounds:?} were greater than upper bounds {upper_bounds:?}"
        );
        Self {
            lower_bounds,
            upper_bounds,
        }
    }

    /// Inclusive lower bounds on cell coordinates.
    #[inline]
    pub fn lower_bounds(&self) -> GridPoint {
        self.lower_bounds
    }

    /// Exclusive upper bounds on cell coordinates.
    #[inline]
    pub fn upper_bounds(&self) -> GridPoint {
        self.upper_bounds
    }

    /// Size of the rectangle in each axis; equivalent to
    /// `self.upper_bounds() - self.lower_bounds()`, except that the result is unsigned.
    #[inline]
    pub fn size(&self) -> GridSize {
        GridSize::new(
            self.upper_bounds.x.abs_diff(self.lower_bounds.x),
            self.upper_bounds.y.abs_diff(self.lower_bounds.y),
        )
    }

    /// Computes the number of cells, or [`None`] if it would not fit in [`usize`].
    #[inline]
    pub fn area(&self) -> Option<usize> {
        let size = self.size();
        usize::try_from(size.width)
            .ok()?
            .checked_mul(usize::try_from(size.height).ok()?)
    }

    /// Returns whether the rectangle contains no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower_bounds.x == self.upper_bounds.x || self.lower_bounds.y == self.upper_bounds.y
    }

    /// Returns whether the rectangle includes the cell at `point`.
    #[inline]
    pub fn contains_cell(&self, point: GridPoint) -> bool {
        self.x_range().contains(&point.x) && self.y_range().contains(&point.y)
    }

    /// The range of X coordinates of cells.
    #[inline]
    pub fn x_range(&self) -> Range<GridCoordinate> {
        self.lower_bounds.x..self.upper_bounds.x
    }

    /// The range of Y coordinates of cells.
    #[inline]
    pub fn y_range(&self) -> Range<GridCoordinate> {
        self.lower_bounds.y..self.upper_bounds.y
    }

    /// Iterates over every cell, in the same order as elements of a [`Grid`](crate::math::Grid)
    /// with these bounds are stored.
    #[inline]
    pub fn iter_cells(self) -> GridIter {
        GridIter::new(self)
    }
}

impl fmt::Debug for GridRect {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GridRect")
            .field(&RangeWithLength(self.x_range()))
            .field(&RangeWithLength(self.y_range()))
            .finish()
    }
}

/// Prints a range as `start..end (length)`.
struct RangeWithLength(Range<GridCoordinate>);
impl fmt::Debug for RangeWithLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = &self.0;
        write!(f, "{range:?} ({})", range.end.abs_diff(range.start))
    }
}

/// Error when a [`GridRect`] cannot be constructed because its upper bounds would overflow.
#[derive(Clone, Copy, Debug, Eq, PartialEq, displaydoc::Display)]
#[displaydoc("GridRect's size {size:?} plus lower bounds {lower_bounds:?} overflows")]
pub struct GridOverflowError {
    lower_bounds: GridPoint,
    size: GridSize,
}

impl core::error::Error for GridOverflowError {}

// -------------------------------------------------------------------------------------------------

/// Iterator produced by [`GridRect::iter_cells()`].
///
/// Yields cells with X as the outer loop and Y as the inner loop.
#[derive(Clone, Debug)]
pub struct GridIter {
    x_range: Range<GridCoordinate>,
    y_range: Range<GridCoordinate>,
    cell: GridPoint,
}

impl GridIter {
    #[inline]
    fn new(bounds: GridRect) -> Self {
        Self {
            x_range: bounds.x_range(),
            y_range: bounds.y_range(),
            cell: if bounds.is_empty() {
                // next() assumes that an in-range x means a cell is pending,
                // which holds only when nonempty.
                bounds.upper_bounds()
            } else {
                bounds.lower_bounds()
            },
        }
    }
}

impl Iterator for GridIter {
    type Item = GridPoint;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if !self.x_range.contains(&self.cell.x) {
            return None;
        }
        let result = self.cell;
        self.cell.y += 1;
        if !self.y_range.contains(&self.cell.y) {
            self.cell.y = self.y_range.start;
            self.cell.x += 1;
        }
        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.x_range.contains(&self.cell.x) {
            let height = self.y_range.end.abs_diff(self.y_range.start) as usize;
            let full_columns = self.x_range.end.abs_diff(self.cell.x) as usize - 1;
            let this_column = self.y_range.end.abs_diff(self.cell.y) as usize;
            full_columns * height + this_column
        } else {
            0
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter {}
impl FusedIterator for GridIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", GridRect::from_lower_size([1, -2], [3, 4])),
            "GridRect(1..4 (3), -2..2 (4))"
        );
    }

    #[test]
    fn area_and_emptiness() {
        let rect = GridRect::from_lower_size([0, 0], [132, 132]);
        assert_eq!(rect.area(), Some(132 * 132));
        assert!(!rect.is_empty());
        assert!(GridRect::ORIGIN_EMPTY.is_empty());
        assert!(GridRect::from_lower_size([0, 0], [0, 5]).is_empty());
    }

    #[test]
    fn contains_cell_is_half_open() {
        let rect = GridRect::from_lower_size([10, 20], [2, 3]);
        assert!(rect.contains_cell(GridPoint::new(10, 20)));
        assert!(rect.contains_cell(GridPoint::new(11, 22)));
        assert!(!rect.contains_cell(GridPoint::new(12, 22)));
        assert!(!rect.contains_cell(GridPoint::new(11, 23)));
        assert!(!rect.contains_cell(GridPoint::new(9, 20)));
    }

    #[test]
    fn overflow_is_an_error() {
        let error = GridRect::checked_from_lower_size([GridCoordinate::MAX - 1, 0], [2, 1])
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "GridRect's size 2x1 plus lower bounds (2147483646, 0) overflows"
        );
        assert!(GridRect::checked_from_lower_size([GridCoordinate::MAX - 1, 0], [1, 1]).is_ok());
    }

    #[test]
    #[should_panic = "GridRect's lower bounds"]
    fn inverted_panics() {
        let _ = GridRect::from_lower_upper([5, 0], [4, 1]);
    }

    #[test]
    fn iter_order_and_len() {
        let rect = GridRect::from_lower_size([0, 5], [2, 3]);
        let mut iter = rect.iter_cells();
        assert_eq!(iter.len(), 6);
        iter.next();
        assert_eq!(iter.len(), 5);
        let rest: Vec<[i32; 2]> = iter.map(<[i32; 2]>::from).collect();
        assert_eq!(rest, vec![[0, 6], [0, 7], [1, 5], [1, 6], [1, 7]]);
    }

    #[test]
    fn iter_empty() {
        assert_eq!(GridRect::from_lower_size([3, 3], [4, 0]).iter_cells().count(), 0);
        assert_eq!(GridRect::from_lower_size([3, 3], [0, 4]).iter_cells().len(), 0);
    }
}

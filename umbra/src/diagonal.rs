//! Precomputation of diagonal steps that are pinched shut by two opaque cells.
//!
//! Two opaque cells that touch only at a corner, such as
//!
//! ```text
//! . #
//! # .
//! ```
//!
//! leave no gap between them that anything could fit through, but a scan that only looks
//! at the cells themselves would happily see through the shared corner. Before casting,
//! each cell is marked with which of its upward diagonals are closed off in this way, and
//! the scan treats a cell entered through such a corner as opaque.

#[cfg(feature = "threads")]
use rayon::{
    iter::IndexedParallelIterator as _, iter::ParallelIterator as _, slice::ParallelSliceMut as _,
};

use crate::math::{Grid, GridPoint, Quadrant};
use crate::transmittance::is_transparent;

/// Which of the two northward diagonal neighbors of a cell are cut off from it.
///
/// The southward diagonals need not be stored, since they are the northward diagonals of
/// the cell diagonally south, viewed from the other end.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct DiagonalBlocks {
    /// The north and east neighbors are both opaque, closing the step to the north-east.
    pub ne: bool,
    /// The north and west neighbors are both opaque, closing the step to the north-west.
    pub nw: bool,
}

impl DiagonalBlocks {
    /// No diagonal is blocked.
    pub const NONE: Self = Self {
        ne: false,
        nw: false,
    };
}

/// Computes [`DiagonalBlocks`] for every cell of `transparency`.
///
/// Neighbors outside the grid count as opaque.
pub fn derive_diagonal_blocks(transparency: Grid<&[f32]>) -> Grid<Box<[DiagonalBlocks]>> {
    let mut output = Grid::repeat(transparency.bounds(), DiagonalBlocks::NONE);
    derive_diagonal_blocks_into(output.as_mut(), transparency);
    output
}

/// Same as [`derive_diagonal_blocks()`], but overwrites an existing grid instead of
/// allocating a new one.
///
/// Panics if the bounds of `output` and `transparency` differ.
#[track_caller]
pub fn derive_diagonal_blocks_into(
    mut output: Grid<&mut [DiagonalBlocks]>,
    transparency: Grid<&[f32]>,
) {
    assert_eq!(
        output.bounds(),
        transparency.bounds(),
        "diagonal blocks must have the same bounds as the transparency grid"
    );

    fill(output.as_linear_mut(), transparency);
}

#[cfg(feature = "threads")]
fn fill(output: &mut [DiagonalBlocks], transparency: Grid<&[f32]>) {
    // Columns (fixed x) are contiguous, so they are the unit of work.
    let height = (transparency.bounds().size().height as usize).max(1);
    output
        .par_chunks_mut(height)
        .enumerate()
        .for_each(|(column, cells)| {
            let first = column * height;
            for (i, blocks) in cells.iter_mut().enumerate() {
                *blocks = blocks_at(transparency, transparency.cell_at_index(first + i));
            }
        });
}

#[cfg(not(feature = "threads"))]
fn fill(output: &mut [DiagonalBlocks], transparency: Grid<&[f32]>) {
    for (index, blocks) in output.iter_mut().enumerate() {
        *blocks = blocks_at(transparency, transparency.cell_at_index(index));
    }
}

fn blocks_at(transparency: Grid<&[f32]>, cell: GridPoint) -> DiagonalBlocks {
    let opaque = |x: i32, y: i32| {
        transparency
            .get(cell + euclid::vec2(x, y))
            .is_none_or(|&t| !is_transparent(t))
    };
    let north = opaque(0, -1);
    DiagonalBlocks {
        ne: north && opaque(1, 0),
        nw: north && opaque(-1, 0),
    }
}

/// Returns whether `cell`, being scanned outward from the origin in `quadrant`, is closed
/// off from its predecessor one diagonal step back toward the origin.
///
/// If that predecessor is outside the grid, the step is not considered blocked.
#[inline]
pub fn step_blocked(blocks: Grid<&[DiagonalBlocks]>, cell: GridPoint, quadrant: Quadrant) -> bool {
    let from = cell - quadrant.diagonal_step();
    match quadrant {
        // Stepping north-east from `from` crosses its NE corner.
        Quadrant::Ne => blocks.get(from).is_some_and(|b| b.ne),
        Quadrant::Nw => blocks.get(from).is_some_and(|b| b.nw),
        // Stepping south-west into `cell` crosses the corner which `cell` sees to the NE.
        Quadrant::Sw if blocks.bounds().contains_cell(from) => {
            blocks.get(cell).is_some_and(|b| b.ne)
        }
        Quadrant::Se if blocks.bounds().contains_cell(from) => {
            blocks.get(cell).is_some_and(|b| b.nw)
        }
        Quadrant::Sw | Quadrant::Se => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::GridRect;
    use pretty_assertions::assert_eq;

    const O: f32 = 1.0;
    const X: f32 = 0.0;

    fn blocks_of<const W: usize, const H: usize>(
        rows: [[f32; W]; H],
    ) -> Grid<Box<[DiagonalBlocks]>> {
        let transparency = Grid::<Box<[f32]>>::from_row_arrays([0, 0], rows);
        derive_diagonal_blocks(transparency.as_ref())
    }

    #[test]
    fn pinched_corner() {
        let blocks = blocks_of([
            [O, X, O], //
            [O, O, X],
            [O, O, O],
        ]);
        // (1, 1) has opaque north (1, 0) and east (2, 1).
        assert_eq!(
            blocks[[1, 1]],
            DiagonalBlocks {
                ne: true,
                nw: false
            }
        );
        assert_eq!(blocks[[0, 1]], DiagonalBlocks::NONE);
        assert_eq!(blocks[[1, 2]], DiagonalBlocks::NONE);
    }

    #[test]
    fn outside_counts_as_opaque() {
        let blocks = blocks_of([[O, O, O], [O, O, O]]);
        // Top row: north is outside.
        assert_eq!(
            blocks[[0, 0]],
            DiagonalBlocks { ne: false, nw: true }
        );
        assert_eq!(blocks[[1, 0]], DiagonalBlocks::NONE);
        assert_eq!(
            blocks[[2, 0]],
            DiagonalBlocks { ne: true, nw: false }
        );
        assert_eq!(blocks[[0, 1]], DiagonalBlocks::NONE);
    }

    #[test]
    fn partial_transparency_is_not_opaque() {
        let blocks = blocks_of([[O, 0.5, O], [O, O, 0.5], [O, O, O]]);
        assert_eq!(blocks[[1, 1]], DiagonalBlocks::NONE);
    }

    #[test]
    fn into_overwrites() {
        let transparency = Grid::<Box<[f32]>>::from_row_arrays([0, 0], [[X, O], [O, X]]);
        let mut output = Grid::repeat(
            GridRect::from_lower_size([0, 0], [2, 2]),
            DiagonalBlocks { ne: true, nw: true },
        );
        derive_diagonal_blocks_into(output.as_mut(), transparency.as_ref());
        assert_eq!(output, derive_diagonal_blocks(transparency.as_ref()));
    }

    #[test]
    #[should_panic = "diagonal blocks must have the same bounds"]
    fn into_mismatched_bounds() {
        let transparency = Grid::<Box<[f32]>>::from_row_arrays([0, 0], [[O, O]]);
        let mut output: Grid<Box<[DiagonalBlocks]>> = Grid::repeat(
            GridRect::from_lower_size([0, 0], [1, 2]),
            DiagonalBlocks::NONE,
        );
        derive_diagonal_blocks_into(output.as_mut(), transparency.as_ref());
    }

    /// Each step across the pinched corner between (1, 0) and (2, 1) is blocked in both
    /// directions, and nothing else is.
    #[test]
    fn step_blocked_both_ways() {
        let blocks = blocks_of([
            [O, X, O], //
            [O, O, X],
            [O, O, O],
        ]);
        let blocks = blocks.as_ref();
        assert!(step_blocked(blocks, GridPoint::new(2, 0), Quadrant::Ne));
        assert!(step_blocked(blocks, GridPoint::new(1, 1), Quadrant::Sw));
        assert!(!step_blocked(blocks, GridPoint::new(0, 0), Quadrant::Nw));
        assert!(!step_blocked(blocks, GridPoint::new(2, 2), Quadrant::Se));
        assert!(!step_blocked(blocks, GridPoint::new(1, 2), Quadrant::Sw));
    }
}

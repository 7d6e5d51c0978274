//! Recursive shadowcasting over a single planar grid.
//!
//! Each [`Octant`] is scanned independently, row by row outward from the origin. Within the
//! octant, directions are described by *slopes*: the ratio of the sideways offset to the
//! forward distance, from `1.0` along the diagonal to `0.0` along the axis. A scan keeps
//! the range of slopes which is still unobstructed; each time the transparency changes
//! along a row, the run of cells just finished is handed to a recursive scan of the
//! narrower range behind it, and the current scan continues with what remains.

use exhaust::Exhaust as _;

use crate::accumulate::Accumulate;
use crate::diagonal::{DiagonalBlocks, step_blocked};
use crate::math::{Grid, GridCoordinate, GridPoint, GridRect, Octant, Quadrant};
use crate::params::CastParams;
use crate::transmittance::{Attenuation, LIGHT_TRANSPARENCY_SOLID};


/// The obstructions on one planar grid, as read by a cast.
///
/// This pairs the transparency of each cell with the [`DiagonalBlocks`] derived from it.
/// Both are borrowed, so that they can be computed once and shared by many casts.
#[derive(Clone, Copy, Debug)]
pub struct Plane<'a> {
    transparency: Grid<&'a [f32]>,
    blocks: Grid<&'a [DiagonalBlocks]>,
}

impl<'a> Plane<'a> {
    /// Panics if `transparency` and `blocks` have different bounds.
    #[track_caller]
    pub fn new(transparency: Grid<&'a [f32]>, blocks: Grid<&'a [DiagonalBlocks]>) -> Self {
        assert_eq!(
            transparency.bounds(),
            blocks.bounds(),
            "diagonal blocks must have the same bounds as the transparency grid"
        );
        Self {
            transparency,
            blocks,
        }
    }

    /// The cells this plane has data for.
    pub fn bounds(&self) -> GridRect {
        self.transparency.bounds()
    }

    /// The transparency of each cell.
    pub fn transparency(&self) -> Grid<&'a [f32]> {
        self.transparency
    }

    /// The diagonal blocking flags of each cell.
    pub fn blocks(&self) -> Grid<&'a [DiagonalBlocks]> {
        self.blocks
    }

    /// Transparency of `cell` as seen by a scan in `quadrant`: the stored value, or
    /// [`LIGHT_TRANSPARENCY_SOLID`] if the cell is reached through a pinched corner.
    ///
    /// Returns [`None`] if the cell is outside the grid.
    #[inline]
    pub(crate) fn effective_transparency(
        &self,
        cell: GridPoint,
        quadrant: Quadrant,
    ) -> Option<f32> {
        let &sample = self.transparency.get_ref(cell)?;
        Some(if step_blocked(self.blocks, cell, quadrant) {
            LIGHT_TRANSPARENCY_SOLID
        } else {
            sample
        })
    }
}

/// Where a scan of one octant starts: the first row, and the range of slopes still open.
///
/// [`OctantScan::FULL`] scans the whole octant. Other values describe the recursive scans
/// that shadowcasting performs internally, and are accepted so that a caller can resume or
/// restrict a cast.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct OctantScan {
    /// Distance of the first row to scan. Row 0 is the origin, which is never scanned.
    pub row: GridCoordinate,
    /// Greatest slope still open (toward the diagonal).
    pub start: f32,
    /// Least slope still open (toward the axis).
    pub end: f32,
    /// Cumulative transparency of everything between the origin and `row`.
    pub cumulative: f32,
}

impl OctantScan {
    /// Scan of an entire octant.
    pub const FULL: Self = Self {
        row: 1,
        start: 1.0,
        end: 0.0,
        cumulative: 1.0,
    };
}

/// Casts from `origin` into all eight octants, accumulating into `output`.
///
/// `output` is not cleared first; each cell reached is combined with the value already
/// there according to [`Accumulate`]. The origin cell itself is never written.
///
/// Panics if `origin` is outside the bounds of `plane`, or if `output` has different
/// bounds than `plane`.
#[track_caller]
pub fn cast_light_all<A: Accumulate, M: Attenuation>(
    mut output: Grid<&mut [A]>,
    plane: Plane<'_>,
    origin: GridPoint,
    params: CastParams,
    model: M,
) {
    check_preconditions(output.bounds(), plane, origin);
    for octant in Octant::exhaust() {
        cast_unchecked(output.as_mut(), plane, origin, octant, OctantScan::FULL, params, model);
    }
}

/// Casts from `origin` into a single octant, starting as specified by `scan`.
///
/// Panics under the same conditions as [`cast_light_all()`].
#[track_caller]
pub fn cast_octant<A: Accumulate, M: Attenuation>(
    output: Grid<&mut [A]>,
    plane: Plane<'_>,
    origin: GridPoint,
    octant: Octant,
    scan: OctantScan,
    params: CastParams,
    model: M,
) {
    check_preconditions(output.bounds(), plane, origin);
    cast_unchecked(output, plane, origin, octant, scan, params, model);
}

#[track_caller]
fn check_preconditions(output_bounds: GridRect, plane: Plane<'_>, origin: GridPoint) {
    assert_eq!(
        output_bounds,
        plane.bounds(),
        "output must have the same bounds as the transparency grid"
    );
    assert!(
        plane.bounds().contains_cell(origin),
        "origin {origin:?} is outside the grid {:?}",
        plane.bounds()
    );
}

fn cast_unchecked<A: Accumulate, M: Attenuation>(
    output: Grid<&mut [A]>,
    plane: Plane<'_>,
    origin: GridPoint,
    octant: Octant,
    scan: OctantScan,
    params: CastParams,
    model: M,
) {
    let mut caster = OctantCaster {
        output,
        plane,
        origin,
        octant,
        quadrant: octant.quadrant(),
        params,
        radius: params.radius(),
        model,
    };
    caster.cast(scan.row, scan.start, scan.end, scan.cumulative);
}

struct OctantCaster<'o, 'p, A, M> {
    output: Grid<&'o mut [A]>,
    plane: Plane<'p>,
    origin: GridPoint,
    octant: Octant,
    quadrant: Quadrant,
    params: CastParams,
    radius: GridCoordinate,
    model: M,
}

impl<A: Accumulate, M: Attenuation> OctantCaster<'_, '_, A, M> {
    /// Scans rows from `row` outward over slopes `end..=start`.
    fn cast(&mut self, row: GridCoordinate, mut start: f32, end: f32, mut cumulative: f32) {
        if start < end {
            return;
        }
        let model = self.model;
        let numerator = self.params.source_intensity;

        // Leading edge of the most recent cell scanned, which becomes the new start if the
        // run it belongs to turns out to be opaque.
        let mut new_start = 0.0;
        let mut last_intensity = 0.0;

        for distance in row..=self.radius {
            let dy = -distance;
            let mut started_row = false;
            // A row with no cells in the grid ends the scan.
            let mut current_transparency = LIGHT_TRANSPARENCY_SOLID;

            for dx in -distance..=0 {
                // Slopes of the far and near corners of the cell, as seen from the origin.
                let trailing_edge = (dx as f32 - 0.5) / (dy as f32 + 0.5);
                let leading_edge = (dx as f32 + 0.5) / (dy as f32 - 0.5);

                let offset = self.octant.transform(dx, dy);
                let cell = self.origin + offset;
                let Some(new_transparency) = self.plane.effective_transparency(cell, self.quadrant)
                else {
                    continue;
                };
                if start < leading_edge {
                    continue;
                } else if end > trailing_edge {
                    break;
                }

                let cell_distance = self.params.distance(offset, 0);
                last_intensity = model.intensity(numerator, cumulative, cell_distance);
                if self.params.in_range(cell_distance) {
                    self.output[cell].accumulate(self.quadrant, last_intensity);
                }

                if !started_row {
                    started_row = true;
                    current_transparency = new_transparency;
                }

                if new_transparency == current_transparency {
                    new_start = leading_edge;
                    continue;
                }

                // The run of `current_transparency` has ended; whatever it lets through is
                // scanned separately, beyond this row.
                if model.propagates(current_transparency, last_intensity) {
                    self.cast(
                        distance + 1,
                        start,
                        trailing_edge,
                        model.transmit(cumulative, current_transparency),
                    );
                    start = trailing_edge;
                } else {
                    start = new_start;
                }
                if start < end {
                    return;
                }
                current_transparency = new_transparency;
                new_start = leading_edge;
            }

            if !model.propagates(current_transparency, last_intensity) {
                break;
            }
            cumulative = model.transmit(cumulative, current_transparency);
        }
    }
}

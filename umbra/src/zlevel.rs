//! Shadowcasting through a vertical stack of levels.
//!
//! Each level is a planar grid, and between each pair of adjacent levels is a floor which
//! either lets light through at a given cell or does not. The origin's own level is cast
//! exactly as [`cast_light_all()`] would; everything above and below it is reached by
//! casts whose slopes span two dimensions at once.
//!
//! Those casts come in two kinds. *Horizontal* ones advance one column of cells at a time
//! away from the origin through an [`Octant`], covering everything that rises or falls no
//! more steeply than the diagonal. *Vertical* ones advance one level at a time straight up
//! or down through a [`Quadrant`], covering everything steeper.
//!
//! In either kind, a row is divided along each of its two axes into *bands*. A band either
//! lies within one cell, or straddles the boundary where the cells on either side overlap
//! in slope. Light passing through a straddling band must get through both cells, and for
//! a band that straddles two levels, also through the floor between them.

use std::fmt;
use std::ops::{DerefMut, RangeInclusive};

use euclid::vec2;
use exhaust::Exhaust as _;

use crate::accumulate::Accumulate;
use crate::math::{
    Grid, GridCoordinate, GridPoint, GridRect, GridVector, LevelPoint, Octant, Quadrant,
};
use crate::params::CastParams;
use crate::shadowcast::{Plane, cast_light_all};
use crate::transmittance::{Attenuation, LIGHT_TRANSPARENCY_SOLID, is_transparent};


/// An inclusive range of level indices (z coordinates).
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct LevelRange {
    min: GridCoordinate,
    max: GridCoordinate,
}

impl LevelRange {
    /// Ten levels above and ten below level 0.
    pub const DEFAULT: Self = Self { min: -10, max: 10 };

    /// Panics if `min > max`.
    #[track_caller]
    pub const fn new(min: GridCoordinate, max: GridCoordinate) -> Self {
        assert!(min <= max, "LevelRange minimum must not exceed maximum");
        Self { min, max }
    }

    /// Lowest level.
    pub const fn min(self) -> GridCoordinate {
        self.min
    }

    /// Highest level.
    pub const fn max(self) -> GridCoordinate {
        self.max
    }

    /// Number of levels; never zero.
    pub fn count(self) -> usize {
        self.max.abs_diff(self.min) as usize + 1
    }

    /// Returns whether `z` is one of these levels.
    pub fn contains(self, z: GridCoordinate) -> bool {
        (self.min..=self.max).contains(&z)
    }

    /// Position of level `z` in a slice with one entry per level, lowest first.
    pub fn index(self, z: GridCoordinate) -> Option<usize> {
        if self.contains(z) {
            Some(z.abs_diff(self.min) as usize)
        } else {
            None
        }
    }

    /// Iterates over the levels, lowest first.
    pub fn iter(self) -> RangeInclusive<GridCoordinate> {
        self.min..=self.max
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for LevelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelRange({}..={})", self.min, self.max)
    }
}

/// The obstructions of every level in a stack, as read by [`cast_zlight()`].
///
/// For each level, lowest first, this holds its [`Plane`] and its *floor grid*: `true`
/// where the floor of that level, separating it from the level below, lets light through.
#[derive(Clone, Copy, Debug)]
pub struct LevelCaches<'a> {
    levels: LevelRange,
    bounds: GridRect,
    planes: &'a [Plane<'a>],
    floors: &'a [Grid<&'a [bool]>],
}

impl<'a> LevelCaches<'a> {
    /// Checks that there is one plane and one floor grid per level, all with the same
    /// bounds.
    pub fn new(
        levels: LevelRange,
        planes: &'a [Plane<'a>],
        floors: &'a [Grid<&'a [bool]>],
    ) -> Result<Self, LevelStackError> {
        let expected = levels.count();
        if planes.len() != expected || floors.len() != expected {
            return Err(LevelStackError::WrongLevelCount {
                expected,
                planes: planes.len(),
                floors: floors.len(),
            });
        }
        let bounds = planes.first().map_or(GridRect::ORIGIN_EMPTY, Plane::bounds);
        for ((z, plane), floor) in levels.iter().zip(planes).zip(floors) {
            for actual in [plane.bounds(), floor.bounds()] {
                if actual != bounds {
                    return Err(LevelStackError::MismatchedBounds {
                        level: z,
                        expected: bounds,
                        actual,
                    });
                }
            }
        }
        Ok(Self {
            levels,
            bounds,
            planes,
            floors,
        })
    }

    /// The levels described.
    pub fn levels(&self) -> LevelRange {
        self.levels
    }

    /// Bounds shared by every level.
    pub fn bounds(&self) -> GridRect {
        self.bounds
    }

    /// Returns the obstructions of level `z`, if it is in the stack.
    pub fn plane(&self, z: GridCoordinate) -> Option<Plane<'a>> {
        self.planes.get(self.levels.index(z)?).copied()
    }

    /// Returns whether the floor of the upper of two adjacent levels lets light through
    /// at `cell`. Floors outside the stack or the grid are closed.
    fn floor_open_between(&self, a: GridCoordinate, b: GridCoordinate, cell: GridPoint) -> bool {
        self.levels
            .index(a.max(b))
            .and_then(|i| self.floors.get(i))
            .and_then(|floor| floor.get_ref(cell))
            .is_some_and(|&open| open)
    }
}

/// Error from [`LevelCaches::new()`] when the supplied grids do not describe the stack.
#[derive(Clone, Debug, Eq, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum LevelStackError {
    /// The number of planes or floor grids differs from the number of levels.
    #[displaydoc("expected {expected} levels but got {planes} planes and {floors} floor grids")]
    WrongLevelCount {
        /// Number of levels in the [`LevelRange`].
        expected: usize,
        /// Number of planes supplied.
        planes: usize,
        /// Number of floor grids supplied.
        floors: usize,
    },
    /// A grid's bounds differ from those of the lowest level's plane.
    #[displaydoc("level {level} has a grid with bounds {actual:?} instead of {expected:?}")]
    MismatchedBounds {
        /// The level whose grid has the wrong bounds.
        level: GridCoordinate,
        /// Bounds of the lowest level's plane.
        expected: GridRect,
        /// Bounds of the offending grid.
        actual: GridRect,
    },
}

impl std::error::Error for LevelStackError {}

/// Casts from `origin` through every level of `caches`, accumulating into `output`, which
/// must have one grid per level, lowest first, each with the same bounds as `caches`.
///
/// On the origin's level this records exactly what [`cast_light_all()`] does. The origin
/// cell is never written.
///
/// Panics if `origin` is outside the grid or the stack, or if `output` does not match
/// `caches`.
#[track_caller]
pub fn cast_zlight<A, C, M>(
    output: &mut [Grid<C>],
    caches: LevelCaches<'_>,
    origin: LevelPoint,
    params: CastParams,
    model: M,
) where
    A: Accumulate,
    C: DerefMut<Target = [A]>,
    M: Attenuation,
{
    let levels = caches.levels();
    assert_eq!(
        output.len(),
        levels.count(),
        "output must have one grid per level"
    );
    for field in output.iter() {
        assert_eq!(
            field.bounds(),
            caches.bounds(),
            "output must have the same bounds as the transparency grids"
        );
    }
    let (Some(origin_index), Some(origin_plane)) =
        (levels.index(origin.z), caches.plane(origin.z))
    else {
        panic!("origin level {} is outside {levels:?}", origin.z);
    };

    cast_light_all(
        output[origin_index].as_mut(),
        origin_plane,
        origin.xy(),
        params,
        model,
    );

    let mut cast_segment = |primary: Primary, quadrant: Quadrant, dz: GridCoordinate| {
        Segment {
            output: &mut *output,
            caches,
            origin,
            primary,
            quadrant,
            dz,
            params,
            radius: params.radius(),
            model,
        }
        .cast(1, Frustum::FULL, 1.0);
    };
    for dz in [1, -1] {
        for octant in Octant::exhaust() {
            cast_segment(Primary::Horizontal(octant), octant.quadrant(), dz);
        }
        for quadrant in Quadrant::exhaust() {
            cast_segment(Primary::Vertical(quadrant), quadrant, dz);
        }
    }
}

/// Which way a [`Segment`] advances, and how its two transverse axes `u` and `v` map
/// onto the stack.
#[derive(Clone, Copy, Debug)]
enum Primary {
    /// Advances horizontally through an octant. `u` counts levels away from the origin's
    /// and `v` is the sideways offset within the octant.
    Horizontal(Octant),
    /// Advances one level at a time. `u` and `v` are the x and y offsets, with signs
    /// given by the quadrant.
    Vertical(Quadrant),
}

/// A range of slopes along one axis, `low..=high`. Empty if `low > high`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Slopes {
    low: f32,
    high: f32,
}

impl Slopes {
    const FULL: Self = Self {
        low: 0.0,
        high: 1.0,
    };

    /// Slopes covered by band `k` of a row at `distance`.
    ///
    /// Even bands lie within cell `k / 2`; odd bands straddle cells `k / 2` and
    /// `k / 2 + 1`.
    fn band(distance: GridCoordinate, k: GridCoordinate) -> Self {
        let (first, last) = band_cells(k);
        let n = first as f32;
        let d = distance as f32;
        if first == last {
            Self {
                low: (n - 0.5) / (d - 0.5),
                high: (n + 0.5) / (d + 0.5),
            }
        } else {
            Self {
                low: (n + 0.5) / (d + 0.5),
                high: (n + 0.5) / (d - 0.5),
            }
        }
    }

    /// Slopes covered by bands `first..=last` together.
    fn bands(distance: GridCoordinate, first: GridCoordinate, last: GridCoordinate) -> Self {
        Self {
            low: Self::band(distance, first).low,
            high: Self::band(distance, last).high,
        }
    }

    #[must_use]
    fn clip(self, other: Self) -> Self {
        Self {
            low: self.low.max(other.low),
            high: self.high.min(other.high),
        }
    }

    fn is_empty(self) -> bool {
        self.low > self.high
    }
}

/// Cells overlapped by band `k`, as `(first, last)`.
fn band_cells(k: GridCoordinate) -> (GridCoordinate, GridCoordinate) {
    (k / 2, (k + 1) / 2)
}

/// Returns the bands of a row at `distance` which `slopes` passes through.
///
/// A band counts only if the overlap has positive width, unless `slopes` is itself a
/// single slope, in which case touching is enough.
fn bands_within(
    distance: GridCoordinate,
    slopes: Slopes,
) -> Option<RangeInclusive<GridCoordinate>> {
    let single = slopes.low == slopes.high;
    let mut found: Option<(GridCoordinate, GridCoordinate)> = None;
    let mut k = 0;
    loop {
        let band = Slopes::band(distance, k);
        if band.low > slopes.high {
            break;
        }
        let overlap = band.clip(slopes);
        if overlap.low < overlap.high || (single && !overlap.is_empty()) {
            found = Some((found.map_or(k, |(first, _)| first), k));
        }
        k += 1;
    }
    found.map(|(first, last)| first..=last)
}

/// The range of slopes in both transverse axes still being scanned.
#[derive(Clone, Copy, Debug)]
struct Frustum {
    u: Slopes,
    v: Slopes,
}

impl Frustum {
    const FULL: Self = Self {
        u: Slopes::FULL,
        v: Slopes::FULL,
    };
}

/// One of the 24 scans which together cover everything off the origin's level.
struct Segment<'o, 'c, C, M> {
    output: &'o mut [Grid<C>],
    caches: LevelCaches<'c>,
    origin: LevelPoint,
    primary: Primary,
    quadrant: Quadrant,
    /// `1` when scanning upward, `-1` when downward.
    dz: GridCoordinate,
    params: CastParams,
    radius: GridCoordinate,
    model: M,
}

impl<A, C, M> Segment<'_, '_, C, M>
where
    A: Accumulate,
    C: DerefMut<Target = [A]>,
    M: Attenuation,
{
    fn cast(&mut self, row: GridCoordinate, frustum: Frustum, mut cumulative: f32) {
        if frustum.u.is_empty() || frustum.v.is_empty() {
            return;
        }
        let model = self.model;

        for distance in row..=self.radius {
            let (Some(us), Some(vs)) = (
                bands_within(distance, frustum.u),
                bands_within(distance, frustum.v),
            ) else {
                return;
            };

            for ku in us.clone() {
                for kv in vs.clone() {
                    self.light_tile(distance, ku, kv, cumulative);
                }
            }

            let (first_u, last_u) = (*us.start(), *us.end());
            let mut group_end = self.group_end(distance, first_u, last_u, vs.clone());
            if group_end == last_u
                && let Some(transparency) =
                    self.uniform_transparency(distance, first_u, vs.clone())
            {
                if !model.propagates(transparency, self.row_intensity(distance, cumulative)) {
                    return;
                }
                cumulative = model.transmit(cumulative, transparency);
                continue;
            }

            // The row is not uniform, so each distinct part continues separately.
            let mut group_start = first_u;
            loop {
                let u = Slopes::bands(distance, group_start, group_end).clip(frustum.u);
                self.split_group(distance, group_start, u, frustum.v, vs.clone(), cumulative);
                if group_end == last_u {
                    break;
                }
                group_start = group_end + 1;
                group_end = self.group_end(distance, group_start, last_u, vs.clone());
            }
            return;
        }
    }

    /// Divides a group of `u` bands, all alike, into runs of equal transparency along `v`
    /// and continues each run that lets light through. `ku` is any band of the group.
    fn split_group(
        &mut self,
        distance: GridCoordinate,
        ku: GridCoordinate,
        u: Slopes,
        v_frustum: Slopes,
        vs: RangeInclusive<GridCoordinate>,
        cumulative: f32,
    ) {
        let (first, last) = (*vs.start(), *vs.end());
        let mut run_start = first;
        let mut current = self.tile_transparency(distance, ku, first);
        for kv in first + 1..=last {
            let transparency = self.tile_transparency(distance, ku, kv);
            if transparency != current {
                let v = Slopes::bands(distance, run_start, kv - 1).clip(v_frustum);
                self.continue_run(distance, Frustum { u, v }, current, cumulative);
                run_start = kv;
                current = transparency;
            }
        }
        let v = Slopes::bands(distance, run_start, last).clip(v_frustum);
        self.continue_run(distance, Frustum { u, v }, current, cumulative);
    }

    fn continue_run(
        &mut self,
        distance: GridCoordinate,
        frustum: Frustum,
        transparency: f32,
        cumulative: f32,
    ) {
        let model = self.model;
        if model.propagates(transparency, self.row_intensity(distance, cumulative)) {
            self.cast(
                distance + 1,
                frustum,
                model.transmit(cumulative, transparency),
            );
        }
    }

    /// Last band of the group of bands starting at `first`: consecutive `u` bands whose
    /// tiles have identical transparency all along `v`.
    fn group_end(
        &self,
        distance: GridCoordinate,
        first: GridCoordinate,
        last: GridCoordinate,
        vs: RangeInclusive<GridCoordinate>,
    ) -> GridCoordinate {
        let mut end = first;
        while end < last
            && vs.clone().all(|kv| {
                self.tile_transparency(distance, end, kv)
                    == self.tile_transparency(distance, end + 1, kv)
            })
        {
            end += 1;
        }
        end
    }

    /// If every tile in band `ku` has the same transparency, returns it.
    fn uniform_transparency(
        &self,
        distance: GridCoordinate,
        ku: GridCoordinate,
        mut vs: RangeInclusive<GridCoordinate>,
    ) -> Option<f32> {
        let first = self.tile_transparency(distance, ku, vs.next()?);
        vs.all(|kv| self.tile_transparency(distance, ku, kv) == first)
            .then_some(first)
    }

    /// Intensity used to decide whether light continues past a row.
    fn row_intensity(&self, distance: GridCoordinate, cumulative: f32) -> f32 {
        self.model.intensity(
            self.params.source_intensity,
            cumulative,
            self.params.distance(GridVector::zero(), distance),
        )
    }

    /// Returns the vertical offset in levels, and the horizontal offset, of the cell at
    /// transverse position `(u, v)` in the row at `distance`.
    #[inline]
    fn locate(
        &self,
        distance: GridCoordinate,
        u: GridCoordinate,
        v: GridCoordinate,
    ) -> (GridCoordinate, GridVector) {
        match self.primary {
            Primary::Horizontal(octant) => (self.dz * u, octant.transform(-v, -distance)),
            Primary::Vertical(quadrant) => {
                let step = quadrant.diagonal_step();
                (self.dz * distance, vec2(step.x * u, step.y * v))
            }
        }
    }

    /// Whether light can get into the cell at all. A vertical scan enters each row
    /// through its floor (or ceiling), directly below (or above) the cell.
    fn entered(&self, rise: GridCoordinate, cell: GridPoint) -> bool {
        match self.primary {
            Primary::Horizontal(_) => true,
            Primary::Vertical(_) => {
                let level = self.origin.z + rise;
                self.caches.floor_open_between(level - self.dz, level, cell)
            }
        }
    }

    /// Transparency of one cell, treating cells outside the grid or stack, and cells
    /// which cannot be entered, as solid.
    fn sample(&self, distance: GridCoordinate, u: GridCoordinate, v: GridCoordinate) -> f32 {
        let (rise, offset) = self.locate(distance, u, v);
        let cell = self.origin.xy() + offset;
        if !self.entered(rise, cell) {
            return LIGHT_TRANSPARENCY_SOLID;
        }
        let Some(plane) = self.caches.plane(self.origin.z + rise) else {
            return LIGHT_TRANSPARENCY_SOLID;
        };
        let sample = match self.primary {
            Primary::Horizontal(_) => plane.effective_transparency(cell, self.quadrant),
            // Entered through the floor, not across a corner on this level.
            Primary::Vertical(_) => plane.transparency().get_ref(cell).copied(),
        };
        sample.unwrap_or(LIGHT_TRANSPARENCY_SOLID)
    }

    /// Whether the floor between `u` and `u + 1` is open, in a horizontal scan where
    /// those are different levels. In a vertical scan they are neighbors on one level.
    fn u_link_open(&self, distance: GridCoordinate, u: GridCoordinate, v: GridCoordinate) -> bool {
        match self.primary {
            Primary::Horizontal(_) => {
                let (rise, offset) = self.locate(distance, u, v);
                let level = self.origin.z + rise;
                self.caches.floor_open_between(
                    level,
                    level + self.dz,
                    self.origin.xy() + offset,
                )
            }
            Primary::Vertical(_) => true,
        }
    }

    /// Transparency of the tile where band `ku` crosses band `kv`: the least transparent
    /// of the cells it overlaps, or solid if it straddles a closed floor.
    fn tile_transparency(
        &self,
        distance: GridCoordinate,
        ku: GridCoordinate,
        kv: GridCoordinate,
    ) -> f32 {
        let (u0, u1) = band_cells(ku);
        let (v0, v1) = band_cells(kv);
        let mut transparency = f32::INFINITY;
        for u in u0..=u1 {
            for v in v0..=v1 {
                transparency = transparency.min(self.sample(distance, u, v));
            }
        }
        if u1 > u0 && !(v0..=v1).all(|v| self.u_link_open(distance, u0, v)) {
            return LIGHT_TRANSPARENCY_SOLID;
        }
        transparency
    }

    /// Records light in the cells of a tile.
    ///
    /// In a horizontal scan, a tile straddling two levels reaches the farther level only
    /// through the nearer cell and the floor between them.
    fn light_tile(
        &mut self,
        distance: GridCoordinate,
        ku: GridCoordinate,
        kv: GridCoordinate,
        cumulative: f32,
    ) {
        let (u0, u1) = band_cells(ku);
        let (v0, v1) = band_cells(kv);
        for v in v0..=v1 {
            self.light_cell(distance, u0, v, cumulative);
            if u1 > u0 {
                let through = match self.primary {
                    Primary::Horizontal(_) => {
                        is_transparent(self.sample(distance, u0, v))
                            && self.u_link_open(distance, u0, v)
                    }
                    Primary::Vertical(_) => true,
                };
                if through {
                    self.light_cell(distance, u1, v, cumulative);
                }
            }
        }
    }

    fn light_cell(
        &mut self,
        distance: GridCoordinate,
        u: GridCoordinate,
        v: GridCoordinate,
        cumulative: f32,
    ) {
        let (rise, offset) = self.locate(distance, u, v);
        if rise == 0 {
            // The origin's level belongs to the planar cast.
            return;
        }
        let cell = self.origin.xy() + offset;
        if !self.entered(rise, cell) {
            return;
        }
        let Some(index) = self.caches.levels().index(self.origin.z + rise) else {
            return;
        };
        let cell_distance = self.params.distance(offset, rise);
        if !self.params.in_range(cell_distance) {
            return;
        }
        let intensity =
            self.model
                .intensity(self.params.source_intensity, cumulative, cell_distance);
        if let Some(value) = self.output.get_mut(index).and_then(|grid| grid.get_mut(cell)) {
            value.accumulate(self.quadrant, intensity);
        }
    }
}

//! The interface through which a host world supplies obstructions, and the caches built
//! from it.
//!
//! Casting never reads a [`TransparencyMap`] directly; instead, the relevant part of the
//! world is first captured into grids, which are then shared by every cast until the
//! world changes.

use crate::diagonal::{DiagonalBlocks, derive_diagonal_blocks_into};
use crate::math::{Grid, GridCoordinate, GridRect, LevelPoint};
use crate::shadowcast::Plane;
use crate::transmittance::{LIGHT_TRANSPARENCY_OPEN_AIR, LIGHT_TRANSPARENCY_SOLID};
use crate::zlevel::LevelRange;

/// A world whose cells may be read for their obstructions.
///
/// Points outside the world are not errors: they should report
/// [`LIGHT_TRANSPARENCY_SOLID`] and an impassable floor.
pub trait TransparencyMap {
    /// Transparency of the cell at `point`, from [`LIGHT_TRANSPARENCY_SOLID`] to
    /// [`LIGHT_TRANSPARENCY_OPEN_AIR`].
    fn transparency(&self, point: LevelPoint) -> f32;

    /// Whether light passes through the floor of the cell at `point`, that is, between
    /// it and the cell directly below.
    fn floor_passable(&self, point: LevelPoint) -> bool;
}

impl<M: TransparencyMap + ?Sized> TransparencyMap for &M {
    fn transparency(&self, point: LevelPoint) -> f32 {
        (**self).transparency(point)
    }

    fn floor_passable(&self, point: LevelPoint) -> bool {
        (**self).floor_passable(point)
    }
}

/// Captures the transparency of level `z` of `map` over `bounds`.
pub fn transparency_grid<M: TransparencyMap + ?Sized>(
    map: &M,
    bounds: GridRect,
    z: GridCoordinate,
) -> Grid<Box<[f32]>> {
    let mut grid = Grid::repeat(bounds, LIGHT_TRANSPARENCY_SOLID);
    transparency_grid_into(map, grid.as_mut(), z);
    grid
}

/// Same as [`transparency_grid()`], but overwrites an existing grid, whose bounds
/// determine what is read.
///
/// Values outside `SOLID..=OPEN_AIR` are clamped into that range, and NaN is treated as
/// solid.
pub fn transparency_grid_into<M: TransparencyMap + ?Sized>(
    map: &M,
    mut output: Grid<&mut [f32]>,
    z: GridCoordinate,
) {
    let mut clamped: usize = 0;
    for (cell, value) in output.iter_mut() {
        let raw = map.transparency(cell.extend(z));
        let sanitized = sanitize_transparency(raw);
        if sanitized.to_bits() != raw.to_bits() {
            clamped += 1;
        }
        *value = sanitized;
    }
    if clamped > 0 {
        log::debug!("clamped {clamped} out-of-range transparency values on level {z}");
    }
}

fn sanitize_transparency(value: f32) -> f32 {
    if value.is_nan() {
        LIGHT_TRANSPARENCY_SOLID
    } else {
        value.clamp(LIGHT_TRANSPARENCY_SOLID, LIGHT_TRANSPARENCY_OPEN_AIR)
    }
}

/// Captures the floor passability of level `z` of `map` over `bounds`.
pub fn floor_grid<M: TransparencyMap + ?Sized>(
    map: &M,
    bounds: GridRect,
    z: GridCoordinate,
) -> Grid<Box<[bool]>> {
    let mut grid = Grid::repeat(bounds, false);
    floor_grid_into(map, grid.as_mut(), z);
    grid
}

/// Same as [`floor_grid()`], but overwrites an existing grid, whose bounds determine what
/// is read.
pub fn floor_grid_into<M: TransparencyMap + ?Sized>(
    map: &M,
    mut output: Grid<&mut [bool]>,
    z: GridCoordinate,
) {
    for (cell, value) in output.iter_mut() {
        *value = map.floor_passable(cell.extend(z));
    }
}

/// Owned caches of every level of a stack, captured from a [`TransparencyMap`].
///
/// Borrow them as [`Plane`]s and floor grids to construct
/// [`LevelCaches`](crate::zlevel::LevelCaches):
///
/// ```
/// use umbra::map::{LevelGrids, TransparencyMap};
/// use umbra::math::{GridRect, LevelPoint};
/// use umbra::zlevel::{LevelCaches, LevelRange};
///
/// struct OpenAir;
/// impl TransparencyMap for OpenAir {
///     fn transparency(&self, _: LevelPoint) -> f32 { 1.0 }
///     fn floor_passable(&self, _: LevelPoint) -> bool { true }
/// }
///
/// let grids = LevelGrids::capture(
///     &OpenAir,
///     GridRect::from_lower_size([0, 0], [10, 10]),
///     LevelRange::new(-1, 1),
/// );
/// let planes = grids.planes();
/// let floors = grids.floors();
/// let caches = LevelCaches::new(grids.levels(), &planes, &floors).unwrap();
/// assert_eq!(caches.bounds(), grids.bounds());
/// ```
#[derive(Clone, Debug)]
pub struct LevelGrids {
    levels: LevelRange,
    bounds: GridRect,
    transparency: Vec<Grid<Box<[f32]>>>,
    blocks: Vec<Grid<Box<[DiagonalBlocks]>>>,
    floors: Vec<Grid<Box<[bool]>>>,
}

impl LevelGrids {
    /// Captures `levels` of `map` over `bounds`.
    pub fn capture<M: TransparencyMap + ?Sized>(
        map: &M,
        bounds: GridRect,
        levels: LevelRange,
    ) -> Self {
        let count = levels.count();
        let mut grids = Self {
            levels,
            bounds,
            transparency: vec![Grid::repeat(bounds, LIGHT_TRANSPARENCY_SOLID); count],
            blocks: vec![Grid::repeat(bounds, DiagonalBlocks::NONE); count],
            floors: vec![Grid::repeat(bounds, false); count],
        };
        grids.refresh(map);
        grids
    }

    /// Reads `map` again, reusing the existing storage.
    pub fn refresh<M: TransparencyMap + ?Sized>(&mut self, map: &M) {
        for (((z, transparency), blocks), floor) in self
            .levels
            .iter()
            .zip(&mut self.transparency)
            .zip(&mut self.blocks)
            .zip(&mut self.floors)
        {
            transparency_grid_into(map, transparency.as_mut(), z);
            derive_diagonal_blocks_into(blocks.as_mut(), transparency.as_ref());
            floor_grid_into(map, floor.as_mut(), z);
        }
        log::trace!(
            "captured {} levels over {:?}",
            self.levels.count(),
            self.bounds
        );
    }

    /// The levels captured.
    pub fn levels(&self) -> LevelRange {
        self.levels
    }

    /// The cells captured on each level.
    pub fn bounds(&self) -> GridRect {
        self.bounds
    }

    /// Returns the obstructions of level `z`, if it was captured.
    pub fn plane(&self, z: GridCoordinate) -> Option<Plane<'_>> {
        let i = self.levels.index(z)?;
        Some(Plane::new(
            self.transparency[i].as_ref(),
            self.blocks[i].as_ref(),
        ))
    }

    /// Borrows every level's obstructions, lowest first.
    pub fn planes(&self) -> Vec<Plane<'_>> {
        self.transparency
            .iter()
            .zip(&self.blocks)
            .map(|(transparency, blocks)| Plane::new(transparency.as_ref(), blocks.as_ref()))
            .collect()
    }

    /// Borrows every level's floor grid, lowest first.
    pub fn floors(&self) -> Vec<Grid<&[bool]>> {
        self.floors.iter().map(Grid::as_ref).collect()
    }
}

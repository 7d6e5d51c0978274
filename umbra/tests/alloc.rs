//! Tests of memory allocation behavior.
//!
//! In a separate test crate to avoid modifying the global allocator elsewhere.

use allocation_counter::measure;
use euclid::point3;

use umbra::accumulate::{FourQuadrants, new_field};
use umbra::diagonal::derive_diagonal_blocks;
use umbra::math::{Grid, GridPoint, GridRect};
use umbra::params::CastParams;
use umbra::shadowcast::{Plane, cast_light_all};
use umbra::transmittance::{Lighting, Sight};
use umbra::zlevel::{LevelCaches, LevelRange, cast_zlight};

fn bounds() -> GridRect {
    GridRect::from_lower_size([0, 0], [64, 64])
}

/// Open air with a scattering of pillars, so that casts recurse.
fn transparency() -> Grid<Box<[f32]>> {
    Grid::from_fn(bounds(), |p| {
        if p.x % 7 == 3 && p.y % 5 == 1 {
            0.0
        } else {
            1.0
        }
    })
}

/// Casting into a field that already exists allocates nothing.
#[test]
fn cast_into_existing_field() {
    let transparency = transparency();
    let blocks = derive_diagonal_blocks(transparency.as_ref());
    let plane = Plane::new(transparency.as_ref(), blocks.as_ref());
    let mut scalar = new_field::<f32>(bounds());
    let mut quadrants = new_field::<FourQuadrants>(bounds());
    let origin = GridPoint::new(30, 30);

    let info = measure(|| {
        cast_light_all(scalar.as_mut(), plane, origin, CastParams::default(), Sight);
        cast_light_all(
            quadrants.as_mut(),
            plane,
            origin,
            CastParams::default().with_source_intensity(100.0),
            Lighting,
        );
    });
    assert_eq!(info.count_total, 0, "{info:?}");
    assert!(scalar[origin + euclid::vec2(1, 1)] > 0.0);
}

#[test]
fn zlight_into_existing_fields() {
    let levels = LevelRange::new(-2, 2);
    let transparency = transparency();
    let blocks = derive_diagonal_blocks(transparency.as_ref());
    let plane = Plane::new(transparency.as_ref(), blocks.as_ref());
    let floor: Grid<Box<[bool]>> = Grid::from_fn(bounds(), |p| p.x % 2 == 0);
    let planes = vec![plane; levels.count()];
    let floors = vec![floor.as_ref(); levels.count()];
    let caches = LevelCaches::new(levels, &planes, &floors).unwrap();
    let mut output: Vec<Grid<Box<[f32]>>> = levels.iter().map(|_| new_field(bounds())).collect();

    let info = measure(|| {
        cast_zlight(
            &mut output,
            caches,
            point3(30, 30, 0),
            CastParams::default().with_maximum_distance(20),
            Sight,
        );
    });
    assert_eq!(info.count_total, 0, "{info:?}");
}

/// Without threads, refreshing diagonal blocks in place allocates nothing.
#[cfg(not(feature = "threads"))]
#[test]
fn derive_blocks_into_existing_grid() {
    use umbra::diagonal::{DiagonalBlocks, derive_diagonal_blocks_into};

    let transparency = transparency();
    let mut blocks = Grid::repeat(bounds(), DiagonalBlocks::NONE);
    let info = measure(|| {
        derive_diagonal_blocks_into(blocks.as_mut(), transparency.as_ref());
    });
    assert_eq!(info.count_total, 0, "{info:?}");
    assert_eq!(blocks, derive_diagonal_blocks(transparency.as_ref()));
}

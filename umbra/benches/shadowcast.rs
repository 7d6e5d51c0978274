//! Time budgets, per iteration on one desktop-class core in the `bench` profile:
//!
//! | benchmark | budget |
//! |---|---|
//! | `planar/derive blocks` | 100 µs |
//! | `planar/scalar` | 150 µs |
//! | `planar/four quadrants` | 250 µs |
//! | `stack/zlight` | 3000 µs |
//!
//! The planar casts are full radius (60 cells) from the middle of a 132×132 grid. A cast
//! exceeding its budget is a regression.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use euclid::point3;
use rand::{Rng as _, SeedableRng as _};

use umbra::accumulate::{FourQuadrants, new_field};
use umbra::diagonal::derive_diagonal_blocks;
use umbra::math::{Grid, GridPoint, GridRect};
use umbra::params::CastParams;
use umbra::shadowcast::{Plane, cast_light_all};
use umbra::transmittance::Sight;
use umbra::zlevel::{LevelCaches, LevelRange, cast_zlight};

fn bounds() -> GridRect {
    GridRect::from_lower_size([0, 0], [132, 132])
}

const ORIGIN: GridPoint = GridPoint::new(65, 65);

/// Open air with one cell in ten opaque.
fn scattered(seed: u64) -> Grid<Box<[f32]>> {
    let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(seed);
    Grid::from_fn(bounds(), |cell| {
        if cell != ORIGIN && rng.random_range(0..10) == 0 {
            0.0
        } else {
            1.0
        }
    })
}

pub fn planar_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("planar");
    let transparency = scattered(0);
    let blocks = derive_diagonal_blocks(transparency.as_ref());
    let plane = Plane::new(transparency.as_ref(), blocks.as_ref());

    group.bench_function("derive blocks", |b| {
        b.iter_with_large_drop(|| derive_diagonal_blocks(transparency.as_ref()));
    });

    group.bench_function("scalar", |b| {
        b.iter_batched_ref(
            || new_field::<f32>(bounds()),
            |field| cast_light_all(field.as_mut(), plane, ORIGIN, CastParams::default(), Sight),
            BatchSize::LargeInput,
        );
    });

    group.bench_function("four quadrants", |b| {
        b.iter_batched_ref(
            || new_field::<FourQuadrants>(bounds()),
            |field| cast_light_all(field.as_mut(), plane, ORIGIN, CastParams::default(), Sight),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

pub fn stack_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack");
    group.sample_size(10);

    let levels = LevelRange::new(-3, 3);
    let transparency: Vec<Grid<Box<[f32]>>> = levels
        .iter()
        .map(|z| scattered(z.unsigned_abs().into()))
        .collect();
    let blocks: Vec<_> = transparency
        .iter()
        .map(|t| derive_diagonal_blocks(t.as_ref()))
        .collect();
    let planes: Vec<Plane<'_>> = transparency
        .iter()
        .zip(&blocks)
        .map(|(t, b)| Plane::new(t.as_ref(), b.as_ref()))
        .collect();
    let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(1);
    let floor: Grid<Box<[bool]>> = Grid::from_fn(bounds(), |_| rng.random_bool(0.5));
    let floors = vec![floor.as_ref(); levels.count()];
    let caches = LevelCaches::new(levels, &planes, &floors).unwrap();

    group.bench_function("zlight", |b| {
        b.iter_batched_ref(
            || -> Vec<Grid<Box<[f32]>>> { levels.iter().map(|_| new_field(bounds())).collect() },
            |output| {
                cast_zlight(
                    output,
                    caches,
                    point3(ORIGIN.x, ORIGIN.y, 0),
                    CastParams::default().with_maximum_distance(30),
                    Sight,
                );
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, planar_bench, stack_bench);
criterion_main!(benches);

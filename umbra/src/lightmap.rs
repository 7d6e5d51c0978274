//! Combining the light of many sources into one field.

#[cfg(feature = "threads")]
use rayon::iter::{IntoParallelRefIterator as _, ParallelIterator as _};

use crate::accumulate::new_field;
use crate::math::{Grid, GridPoint, GridVector};
use crate::params::CastParams;
use crate::shadowcast::{Plane, cast_light_all};
use crate::transmittance::{Attenuation as _, Lighting};

/// A point which emits light.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "save", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct LightSource {
    /// Cell containing the source.
    pub position: GridPoint,
    /// Brightness at the source, used as [`CastParams::source_intensity`].
    pub intensity: f32,
}

/// How the light of several sources reaching the same cell is combined.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "save", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SourceCombine {
    /// The brightest source wins.
    #[default]
    Max,
    /// Sources add together.
    Sum,
}

impl SourceCombine {
    fn combine(self, existing: &mut f32, incoming: f32) {
        match self {
            Self::Max => *existing = existing.max(incoming),
            Self::Sum => *existing += incoming,
        }
    }
}

/// Casts light from each of `sources` over `plane` and combines it into `output`.
///
/// `output` is not cleared first. Unlike a bare cast, each source's own cell is lit at the
/// source's full intensity. Sources outside the grid are skipped.
///
/// `params.source_intensity` is ignored in favor of each source's
/// [`LightSource::intensity`].
///
/// Panics if `output` has different bounds than `plane`.
#[track_caller]
pub fn apply_light_sources(
    mut output: Grid<&mut [f32]>,
    plane: Plane<'_>,
    sources: &[LightSource],
    params: CastParams,
    combine: SourceCombine,
) {
    assert_eq!(
        output.bounds(),
        plane.bounds(),
        "output must have the same bounds as the transparency grid"
    );

    let bounds = plane.bounds();
    let accepted: Vec<LightSource> = sources
        .iter()
        .copied()
        .filter(|source| {
            let inside = bounds.contains_cell(source.position);
            if !inside {
                log::debug!(
                    "light source at {:?} is outside {bounds:?}; skipped",
                    source.position
                );
            }
            inside
        })
        .collect();

    cast_each(output.as_mut(), plane, &accepted, params, combine);

    log::trace!(
        "applied {} light sources ({} skipped)",
        accepted.len(),
        sources.len() - accepted.len()
    );
}

/// Light from one source alone, including its own cell.
fn cast_source(
    plane: Plane<'_>,
    source: LightSource,
    params: CastParams,
    field: &mut Grid<Box<[f32]>>,
) {
    let params = params.with_source_intensity(source.intensity);
    field.fill(0.0);
    cast_light_all(field.as_mut(), plane, source.position, params, Lighting);
    field[source.position] = Lighting.intensity(
        source.intensity,
        1.0,
        params.distance(GridVector::zero(), 0),
    );
}

fn combine_into(output: &mut Grid<&mut [f32]>, field: &Grid<Box<[f32]>>, combine: SourceCombine) {
    for (existing, &incoming) in output.as_linear_mut().iter_mut().zip(field.as_linear()) {
        combine.combine(existing, incoming);
    }
}

#[cfg(feature = "threads")]
fn cast_each(
    mut output: Grid<&mut [f32]>,
    plane: Plane<'_>,
    sources: &[LightSource],
    params: CastParams,
    combine: SourceCombine,
) {
    // Each source gets its own field, combined afterward in order so that sums come out
    // the same as when single-threaded.
    let fields: Vec<Grid<Box<[f32]>>> = sources
        .par_iter()
        .map(|&source| {
            let mut field = new_field(plane.bounds());
            cast_source(plane, source, params, &mut field);
            field
        })
        .collect();
    for field in &fields {
        combine_into(&mut output, field, combine);
    }
}

#[cfg(not(feature = "threads"))]
fn cast_each(
    mut output: Grid<&mut [f32]>,
    plane: Plane<'_>,
    sources: &[LightSource],
    params: CastParams,
    combine: SourceCombine,
) {
    let mut field = new_field(plane.bounds());
    for &source in sources {
        cast_source(plane, source, params, &mut field);
        combine_into(&mut output, &field, combine);
    }
}

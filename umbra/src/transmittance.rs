//! Transparency values, and the attenuation models that turn accumulated transparency
//! into visibility or light intensity.
//!
//! A *transparency* is the fraction of light a cell lets through, between
//! [`LIGHT_TRANSPARENCY_SOLID`] and [`LIGHT_TRANSPARENCY_OPEN_AIR`]. Along a ray, the
//! transparencies of the cells passed through are multiplied into a *cumulative
//! transparency*, which together with the distance travelled determines the intensity
//! recorded at each cell.

use std::fmt;

use crate::math::GridCoordinate;

/// Transparency of a cell that blocks all light.
pub const LIGHT_TRANSPARENCY_SOLID: f32 = 0.0;

/// Transparency of a cell of unobstructed air.
pub const LIGHT_TRANSPARENCY_OPEN_AIR: f32 = 1.0;

/// Exponential decay coefficient per cell of distance travelled.
///
/// Light at 60 cells is attenuated by this alone to 10% of its initial intensity.
pub const AIR_ATTENUATION: f32 = 0.038_376_418;

/// The visibility recorded for a cell seen through nothing but air from zero distance.
pub const VISIBILITY_FULL: f32 = 1.0;

/// [`Sight`] stops propagating once visibility falls to this.
pub const SIGHT_NEGLIGIBLE: f32 = 0.01;

/// [`Lighting`] stops propagating once intensity falls to this, since dimmer light would
/// not be distinguishable from the ambient light level.
pub const LIGHT_AMBIENT_LOW: f32 = 3.5;

/// Returns whether a transparency value lets any light through.
#[inline]
pub fn is_transparent(transparency: f32) -> bool {
    transparency > LIGHT_TRANSPARENCY_SOLID
}

/// A rule for how intensity diminishes with distance and obstruction, and when it has
/// become too small to be worth following further.
///
/// Implementations are expected to be cheap, stateless values; the casting routines take
/// them by value and call them for every cell they visit.
pub trait Attenuation: Copy + fmt::Debug {
    /// Computes the intensity reaching a cell at `distance` from the origin.
    ///
    /// `numerator` is the intensity at the origin and `cumulative` is the product of the
    /// transparencies passed through on the way.
    fn intensity(&self, numerator: f32, cumulative: f32, distance: GridCoordinate) -> f32;

    /// Returns whether light continues past a run of cells of the given `transparency`,
    /// having reached them at the given `intensity`.
    fn propagates(&self, transparency: f32, intensity: f32) -> bool;

    /// Combines the cumulative transparency before a run of cells with the transparency of
    /// that run.
    #[inline]
    fn transmit(&self, cumulative: f32, transparency: f32) -> f32 {
        cumulative * transparency / LIGHT_TRANSPARENCY_OPEN_AIR
    }
}

/// Line of sight: intensity decays exponentially with distance, and nothing else.
///
/// With a numerator of [`VISIBILITY_FULL`], the recorded values are in `0.0..=1.0` and may
/// be read as "how clearly this cell can be seen".
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct Sight;

impl Attenuation for Sight {
    #[inline]
    fn intensity(&self, numerator: f32, cumulative: f32, distance: GridCoordinate) -> f32 {
        numerator * cumulative * (-AIR_ATTENUATION * distance as f32).exp()
    }

    #[inline]
    fn propagates(&self, transparency: f32, intensity: f32) -> bool {
        is_transparent(transparency) && intensity > SIGHT_NEGLIGIBLE
    }
}

/// Light from a source: as [`Sight`], but additionally spread out inversely with distance.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct Lighting;

impl Attenuation for Lighting {
    #[inline]
    fn intensity(&self, numerator: f32, cumulative: f32, distance: GridCoordinate) -> f32 {
        // Distance 0 would be the source itself; treat it as 1 rather than dividing by zero.
        let spread = distance.max(1) as f32;
        numerator * cumulative * (-AIR_ATTENUATION * distance as f32).exp() / spread
    }

    #[inline]
    fn propagates(&self, transparency: f32, intensity: f32) -> bool {
        is_transparent(transparency) && intensity > LIGHT_AMBIENT_LOW
    }
}

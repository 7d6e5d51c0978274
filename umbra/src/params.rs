//! Configuration of a cast.

use crate::math::{
    GridCoordinate, GridVector, chebyshev_length, rounded_euclidean_length,
    rounded_euclidean_length_3d,
};

/// Parameters shared by every casting function.
///
/// Construct with [`CastParams::default()`] and adjust with the `with_*` methods:
///
/// ```
/// use umbra::params::{CastParams, DistanceMetric};
///
/// let params = CastParams::default()
///     .with_maximum_distance(20)
///     .with_metric(DistanceMetric::Euclidean);
/// assert_eq!(params.maximum_distance, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "save", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "save", serde(default))]
#[non_exhaustive]
pub struct CastParams {
    /// The greatest distance from the origin, as measured by [`CastParams::metric`], at
    /// which any cell is recorded.
    pub maximum_distance: u8,
    /// How distance is measured for the purposes of attenuation and
    /// [`CastParams::maximum_distance`].
    pub metric: DistanceMetric,
    /// Intensity at the origin. For sight this is normally
    /// [`VISIBILITY_FULL`](crate::transmittance::VISIBILITY_FULL); for light, it is the
    /// brightness of the source.
    pub source_intensity: f32,
    /// Distance already travelled before reaching the origin, which is added to every
    /// distance and correspondingly shortens the reach of the cast.
    ///
    /// This allows continuing a cast from a point partway along, such as the far side of
    /// a portal.
    pub offset_distance: u8,
}

impl CastParams {
    pub(crate) const DEFAULT: Self = Self {
        maximum_distance: 60,
        metric: DistanceMetric::Chebyshev,
        source_intensity: 1.0,
        offset_distance: 0,
    };

    /// Returns a copy with [`CastParams::maximum_distance`] replaced.
    #[must_use]
    pub const fn with_maximum_distance(mut self, maximum_distance: u8) -> Self {
        self.maximum_distance = maximum_distance;
        self
    }

    /// Returns a copy with [`CastParams::metric`] replaced.
    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns a copy with [`CastParams::source_intensity`] replaced.
    #[must_use]
    pub const fn with_source_intensity(mut self, source_intensity: f32) -> Self {
        self.source_intensity = source_intensity;
        self
    }

    /// Returns a copy with [`CastParams::offset_distance`] replaced.
    #[must_use]
    pub const fn with_offset_distance(mut self, offset_distance: u8) -> Self {
        self.offset_distance = offset_distance;
        self
    }

    /// Number of rows to scan outward from the origin.
    ///
    /// This is zero if the offset already uses up the whole maximum distance.
    pub(crate) fn radius(&self) -> GridCoordinate {
        GridCoordinate::from(self.maximum_distance.saturating_sub(self.offset_distance))
    }

    /// Distance of a cell at `offset` from the origin, including the offset distance.
    #[inline]
    pub(crate) fn distance(&self, offset: GridVector, dz: GridCoordinate) -> GridCoordinate {
        self.metric.length_3d(offset, dz) + GridCoordinate::from(self.offset_distance)
    }

    /// Whether a cell at the given [`CastParams::distance()`] should be recorded.
    #[inline]
    pub(crate) fn in_range(&self, distance: GridCoordinate) -> bool {
        distance <= GridCoordinate::from(self.maximum_distance)
    }
}

impl Default for CastParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How to measure the distance between two cells.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "save", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DistanceMetric {
    /// The greatest difference along any one axis. The area within a given distance is a
    /// square, and every row scanned is at the same distance.
    Chebyshev,
    /// Straight-line distance, rounded to the nearest whole cell. The area within a given
    /// distance is a circle.
    Euclidean,
}

impl DistanceMetric {
    /// Measures a planar offset.
    #[inline]
    pub fn length(self, offset: GridVector) -> GridCoordinate {
        match self {
            Self::Chebyshev => chebyshev_length(offset),
            Self::Euclidean => rounded_euclidean_length(offset),
        }
    }

    /// Measures an offset which additionally spans `dz` levels.
    #[inline]
    pub fn length_3d(self, offset: GridVector, dz: GridCoordinate) -> GridCoordinate {
        match self {
            Self::Chebyshev => chebyshev_length(offset).max(dz.abs()),
            Self::Euclidean => rounded_euclidean_length_3d(offset, dz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let params = CastParams::default();
        assert_eq!(params.maximum_distance, 60);
        assert_eq!(params.metric, DistanceMetric::Chebyshev);
        assert_eq!(params.source_intensity, 1.0);
        assert_eq!(params.offset_distance, 0);
        assert_eq!(params.radius(), 60);
    }

    #[test]
    fn offset_shortens_radius() {
        let params = CastParams::default().with_offset_distance(10);
        assert_eq!(params.radius(), 50);
        assert_eq!(params.distance(vec2(3, -2), 0), 13);
        assert!(params.in_range(60));
        assert!(!params.in_range(61));

        assert_eq!(
            CastParams::default()
                .with_maximum_distance(5)
                .with_offset_distance(9)
                .radius(),
            0
        );
    }

    #[test]
    fn metrics() {
        let v = vec2(3, -4);
        assert_eq!(DistanceMetric::Chebyshev.length(v), 4);
        assert_eq!(DistanceMetric::Euclidean.length(v), 5);
        assert_eq!(DistanceMetric::Chebyshev.length_3d(v, -6), 6);
        assert_eq!(DistanceMetric::Euclidean.length_3d(vec2(2, 3), 6), 7);
    }

    #[cfg(feature = "save")]
    #[test]
    fn serde_fills_in_defaults() {
        let params: CastParams =
            serde_json::from_str(r#"{"maximum_distance": 30, "metric": "Euclidean"}"#).unwrap();
        assert_eq!(
            params,
            CastParams::default()
                .with_maximum_distance(30)
                .with_metric(DistanceMetric::Euclidean)
        );
        let round_trip: CastParams =
            serde_json::from_str(&serde_json::to_string(&params).unwrap()).unwrap();
        assert_eq!(round_trip, params);
    }
}

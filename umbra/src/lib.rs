//! Umbra computes what can be seen, and how brightly things are lit, from a point on a grid
//! of cells.
//!
//! It uses *recursive shadowcasting*: the area around the origin is divided into eight
//! [`Octant`]s, each of which is scanned outward row by row while a set of angular spans
//! ("slopes") tracks which directions are still unobstructed. Cells may be partially
//! transparent, in which case light passing through them is attenuated rather than stopped.
//!
//! ## Capabilities
//!
//! * [`shadowcast`] casts over a single planar grid. The same routine serves both
//!   line-of-sight and lighting by way of the [`Attenuation`] models [`Sight`] and
//!   [`Lighting`].
//! * [`zlevel`] extends the cast to a vertical stack of levels separated by floors which
//!   may or may not let light through.
//! * [`diagonal`] precomputes which diagonal steps are pinched shut between two opaque
//!   cells, so that vision does not leak through the corners of walls.
//! * [`accumulate`] defines how a result cell combines contributions that reach it from
//!   more than one octant: either a single maximum, or one maximum per [`Quadrant`].
//! * [`lightmap`] combines the light cast from many [`LightSource`]s into one field.
//! * [`map`] is the interface through which a host world supplies transparency and floor
//!   data, and helpers for capturing that data into grids.
//!
//! ## Coordinate system
//!
//! Grids are addressed by [`GridPoint`]s where `+x` is east and `+y` is south.
//! Levels of a stack are addressed by the `z` coordinate of a [`LevelPoint`], increasing
//! upward.
//!
//! ## Crate features
//!
//! This crate, `umbra`, defines the following feature flags:
//!
//! * `save`:
//!   Enable [`serde`] serialization of [`CastParams`].
//! * `threads`:
//!   Enable use of threads for parallel processing, via [`rayon`]’s global thread pool.
//!   This feature does not affect the public API, only performance and dependencies.
//!
//! ## Dependencies and global state
//!
//! `umbra` has no global state. However, it does write log messages using the [`log`] crate
//! and is therefore subject to that global configuration.
//!
//! `umbra` depends on and re-exports [`euclid`] for vector math (as `umbra::euclid`).
//!
//! [`Attenuation`]: crate::transmittance::Attenuation
//! [`CastParams`]: crate::params::CastParams
//! [`GridPoint`]: crate::math::GridPoint
//! [`LevelPoint`]: crate::math::LevelPoint
//! [`Lighting`]: crate::transmittance::Lighting
//! [`LightSource`]: crate::lightmap::LightSource
//! [`Octant`]: crate::math::Octant
//! [`Quadrant`]: crate::math::Quadrant
//! [`Sight`]: crate::transmittance::Sight
#![cfg_attr(not(feature = "save"), doc = "[`serde`]: https://docs.rs/serde/")]
#![cfg_attr(not(feature = "threads"), doc = "[`rayon`]: https://docs.rs/rayon/")]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]
// Lenience for tests.
#![cfg_attr(test,
    allow(clippy::float_cmp), // deterministic tests
)]

/// Geometry and containers for grids of cells.
///
/// These types are defined in the helper crate `umbra-base` and re-exported here.
pub mod math {
    pub use umbra_base::math::*;
}

pub mod accumulate;
pub mod diagonal;
pub mod lightmap;
pub mod map;
pub mod params;
pub mod shadowcast;
pub mod transmittance;
pub mod zlevel;

pub use euclid;

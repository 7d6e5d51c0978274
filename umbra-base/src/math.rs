//! Planar integer geometry: coordinates, rectangles, dense grids, and the octant table.

mod coord;
pub use coord::*;
mod grid;
pub use grid::*;
mod grid_rect;
pub use grid_rect::*;
mod octant;
pub use octant::*;

// We make an assumption in several places that `usize` is at least 32 bits.
// It's likely that compilation would not succeed anyway, but let's make it explicit.
#[cfg(target_pointer_width = "16")]
compile_error!("umbra does not support platforms with less than 32-bit `usize`");

//! This library is an internal component of [`umbra`],
//! which defines the planar grid types the visibility engine is written against.
//! Do not depend on this library; use only [`umbra`] instead.
//!
//! [`umbra`]: https://crates.io/crates/umbra/

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
#![warn(clippy::missing_inline_in_public_items)]

#[cfg(any(feature = "std", test))]
#[cfg_attr(test, macro_use)]
extern crate std;
#[macro_use]
extern crate alloc;

/// Do not use this module directly; its contents are re-exported from `umbra`.
pub mod math;

// reexport for convenience of our tests
#[doc(hidden)]
pub use euclid;

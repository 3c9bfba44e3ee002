//! Smoothing model math.
//!
//! Pure state/recursion code lives here; parameter estimation is `crate::fit`.

pub mod holt_winters;

pub use holt_winters::*;

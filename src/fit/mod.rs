//! Smoothing-parameter estimation.
//!
//! Responsibilities:
//!
//! - generate candidate grids over the active smoothing parameters
//! - evaluate each candidate's one-step-ahead SSE (parallel)
//! - select the best candidate deterministically

pub mod fitter;
pub mod grid;

pub use fitter::*;
pub use grid::*;

//! Data preparation: monthly aggregation and synthetic sample generation.

pub mod monthly;
pub mod sample;

pub use monthly::*;
pub use sample::*;

//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - parsed-table memoization (`cache`)
//! - forecast exports (xlsx/JSON) (`export`)

pub mod cache;
pub mod export;
pub mod ingest;

pub use cache::*;
pub use export::*;
pub use ingest::*;

//! Input/output helpers.
//!
//! - report directory scan + normalization (`ingest`)
//! - report archival, listings, and stats exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;

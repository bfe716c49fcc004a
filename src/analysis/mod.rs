//! Aggregation and descriptive statistics over loaded reports.
//!
//! - single-pass fold of reports into daily/monthly/product series (`aggregate`)
//! - summary statistics and rankings over those series (`stats`)

pub mod aggregate;
pub mod stats;

pub use aggregate::*;
pub use stats::*;

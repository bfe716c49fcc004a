//! Presentation of aggregated results: statistics text, per-day summaries,
//! and the numeric series handed to charting.

pub mod format;

pub use format::*;

//! Shared analysis pipeline used by both the CLI and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> normalize -> aggregate -> summarize
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! A run never fails: missing directories and unreadable files degrade to
//! "no data", which every consumer renders explicitly.

use std::path::Path;

use crate::analysis;
use crate::domain::{Aggregate, ChartSeries, ProductCount, Summary};
use crate::io::{LoadOutcome, load_reports};
use crate::report;

/// All computed outputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub load: LoadOutcome,
    pub aggregate: Aggregate,
    /// `None` when no reports were loaded at all.
    pub summary: Option<Summary>,
}

impl AnalysisOutput {
    pub fn chart_series(&self) -> ChartSeries {
        report::chart_series(&self.aggregate)
    }

    pub fn top_products(&self, n: usize) -> Vec<ProductCount> {
        analysis::top_by_units(&self.aggregate.products, n)
    }
}

/// Execute the full analysis over the reports in `dir`.
///
/// A full directory scan and recomputation every time; no caching between
/// invocations.
pub fn run_analysis(dir: &Path) -> AnalysisOutput {
    let load = load_reports(dir);
    let aggregate = analysis::aggregate(&load.reports);
    let summary = analysis::summarize(&aggregate);

    AnalysisOutput {
        load,
        aggregate,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_on_missing_directory_degrades_to_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_analysis(&dir.path().join("missing"));
        assert!(!output.load.directory_found);
        assert!(output.summary.is_none());
        assert!(output.chart_series().daily.is_empty());
    }

    #[test]
    fn run_aggregates_valid_files_and_skips_corrupt_ones() {
        let dir = tempfile::tempdir().unwrap();
        let report = json!({
            "fecha": "2024-10-05",
            "total_ventas": 1,
            "total_dia": 1500,
            "ventas": [{"numero": 1, "codigo": "01", "producto": "Lapicero", "valor": 1500}]
        });
        std::fs::write(
            dir.path().join("reporte_2024-10-05_120000.json"),
            serde_json::to_string(&report).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), b"{").unwrap();

        let output = run_analysis(dir.path());
        assert_eq!(output.load.reports.len(), 1);
        assert_eq!(output.load.skipped.len(), 1);

        assert_eq!(output.top_products(1)[0].name, "Lapicero");
        let summary = output.summary.unwrap();
        assert_eq!(summary.days, 1);
        assert_eq!(summary.total, 1500.0);
    }
}

//! Report ingest and normalization.
//!
//! This module is responsible for turning a directory of device-written JSON
//! files into a clean set of [`Report`] records that are safe to aggregate.
//!
//! Design goals:
//! - **Tolerant loading**: a file that cannot be read or parsed is skipped,
//!   never fatal (the device writes over WiFi and partial files happen)
//! - **Explicit skip accounting**: every skipped file is recorded with a
//!   reason, so callers can distinguish "directory empty" from "every file
//!   failed to parse" even though both aggregate to zero reports
//! - **Total normalization**: a missing or wrong-typed field degrades to its
//!   default instead of failing the record
//! - **Deterministic behavior** (directory entries are processed in sorted
//!   name order; no hidden randomness)

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{LineItem, Report};

/// Why a file was left out of the load.
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// The file could not be opened or read.
    Unreadable(String),
    /// The contents were not valid JSON.
    InvalidJson(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            SkipReason::InvalidJson(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

/// A file-level skip encountered during the load.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Load output: normalized reports + per-file skips.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub reports: Vec<Report>,
    pub skipped: Vec<SkippedFile>,
    /// `false` when the directory itself was absent (a legitimate first-run
    /// state, not an error).
    pub directory_found: bool,
}

impl LoadOutcome {
    pub fn files_seen(&self) -> usize {
        self.reports.len() + self.skipped.len()
    }
}

/// Scan `dir` (non-recursive) for `*.json` report files and normalize each.
///
/// A missing directory yields an empty outcome with `directory_found = false`.
/// No ordering of the returned reports is guaranteed; date ordering is the
/// aggregator's responsibility.
pub fn load_reports(dir: &Path) -> LoadOutcome {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            return LoadOutcome {
                directory_found: false,
                ..LoadOutcome::default()
            };
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut outcome = LoadOutcome {
        directory_found: true,
        ..LoadOutcome::default()
    };

    for path in paths {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                outcome.skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::Unreadable(e.to_string()),
                });
                continue;
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => outcome.reports.push(normalize_report(&value)),
            Err(e) => outcome.skipped.push(SkippedFile {
                path,
                reason: SkipReason::InvalidJson(e.to_string()),
            }),
        }
    }

    outcome
}

/// Map one raw report JSON value to the canonical [`Report`] shape.
///
/// Never fails: absent and wrong-typed fields degrade to their defaults. The
/// producing device is untrusted and partial records are normal.
pub fn normalize_report(value: &Value) -> Report {
    Report {
        date: get_string(value, "fecha", ""),
        sale_count: get_u64(value, "total_ventas", 0),
        day_total: get_f64(value, "total_dia", 0.0),
        sales: value
            .get("ventas")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(normalize_line_item).collect())
            .unwrap_or_default(),
    }
}

/// Missing product names collapse to a single sentinel so that frequency and
/// unit tallies group them together.
pub const UNKNOWN_PRODUCT: &str = "Desconocido";

fn normalize_line_item(value: &Value) -> LineItem {
    LineItem {
        number: value.get("numero").and_then(Value::as_i64).unwrap_or(0),
        code: get_string(value, "codigo", ""),
        product: get_string(value, "producto", UNKNOWN_PRODUCT),
        description: get_string(value, "descripcion", ""),
        value: get_f64(value, "valor", 0.0),
        quantity: get_u64(value, "cantidad", 1),
        timestamp: get_string(value, "timestamp", ""),
    }
}

fn get_string(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn get_f64(value: &Value, key: &str, default: f64) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn get_u64(value: &Value, key: &str, default: u64) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write as _;

    #[test]
    fn normalize_full_record() {
        let value = json!({
            "fecha": "2024-10-05",
            "total_ventas": 2,
            "total_dia": 2300,
            "ventas": [
                {
                    "numero": 1,
                    "codigo": "01",
                    "producto": "Lapicero",
                    "descripcion": "Lapicero tinta azul/negra",
                    "valor": 1500,
                    "timestamp": "2024-10-05 10:15:00"
                },
                {
                    "numero": 2,
                    "codigo": "02",
                    "producto": "Lapiz",
                    "valor": 800,
                    "cantidad": 3
                }
            ]
        });

        let report = normalize_report(&value);
        assert_eq!(report.date, "2024-10-05");
        assert_eq!(report.sale_count, 2);
        assert!((report.day_total - 2300.0).abs() < 1e-9);
        assert_eq!(report.sales.len(), 2);
        assert_eq!(report.sales[0].quantity, 1);
        assert_eq!(report.sales[1].quantity, 3);
    }

    #[test]
    fn normalize_defaults_missing_fields() {
        let report = normalize_report(&json!({}));
        assert_eq!(report.date, "");
        assert_eq!(report.sale_count, 0);
        assert_eq!(report.day_total, 0.0);
        assert!(report.sales.is_empty());
    }

    #[test]
    fn normalize_degrades_wrong_types() {
        let value = json!({
            "fecha": 20241005,
            "total_ventas": "three",
            "total_dia": -5,
            "ventas": [{"producto": 42, "valor": "1500"}]
        });

        let report = normalize_report(&value);
        assert_eq!(report.date, "");
        assert_eq!(report.sale_count, 0);
        // -5 is still a number; negative values are not rejected.
        assert!((report.day_total + 5.0).abs() < 1e-9);
        assert_eq!(report.sales[0].product, UNKNOWN_PRODUCT);
        assert_eq!(report.sales[0].value, 0.0);
    }

    #[test]
    fn load_missing_directory_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");

        let outcome = load_reports(&missing);
        assert!(!outcome.directory_found);
        assert!(outcome.reports.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn load_skips_corrupt_files_and_keeps_valid_ones() {
        let dir = tempfile::tempdir().unwrap();

        let valid = json!({"fecha": "2024-10-05", "total_ventas": 1, "total_dia": 1500, "ventas": []});
        std::fs::write(
            dir.path().join("reporte_2024-10-05_120000.json"),
            serde_json::to_string(&valid).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("reporte_2024-10-06_120000.json"),
            serde_json::to_string(&json!({"fecha": "2024-10-06", "total_dia": 2000})).unwrap(),
        )
        .unwrap();

        let mut corrupt = std::fs::File::create(dir.path().join("reporte_bad.json")).unwrap();
        corrupt.write_all(b"{\"fecha\": \"2024-").unwrap();

        // Non-JSON files are ignored entirely, not reported as skips.
        std::fs::write(dir.path().join("notes.txt"), b"not a report").unwrap();

        let outcome = load_reports(dir.path());
        assert!(outcome.directory_found);
        assert_eq!(outcome.reports.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.files_seen(), 3);
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::InvalidJson(_)
        ));
    }

    #[test]
    fn load_empty_directory_is_distinguishable_from_missing() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_reports(dir.path());
        assert!(outcome.directory_found);
        assert_eq!(outcome.files_seen(), 0);
    }
}

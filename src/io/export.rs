//! Report archival and JSON exports.
//!
//! - `save_report` writes one fetched report under the timestamped filename
//!   scheme the rest of the tooling expects (`reporte_<date>_<HHMMSS>.json`)
//! - `write_stats_json` exports computed statistics for downstream scripts
//! - `list_reports` enumerates the archive for display

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::Value;

use crate::domain::{ProductCount, StatsFile, Summary};
use crate::error::AppError;

/// Write one raw report payload to `dir`, creating the directory if needed.
///
/// The filename embeds the report's own date when the payload carries one and
/// the retrieval time (`now`), so repeated fetches for the same day coexist as
/// separate files. Returns the written path.
pub fn save_report(dir: &Path, payload: &Value, now: NaiveDateTime) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create reports directory '{}': {e}", dir.display()),
        )
    })?;

    let date = payload
        .get("fecha")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| now.date().format("%Y-%m-%d").to_string());

    let path = dir.join(format!("reporte_{date}_{}.json", now.format("%H%M%S")));
    let file = File::create(&path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create report file '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, payload)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(path)
}

/// Write the computed statistics as JSON.
pub fn write_stats_json(
    path: &Path,
    summary: &Summary,
    top_products: &[ProductCount],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create stats JSON '{}': {e}", path.display()),
        )
    })?;

    let stats = StatsFile {
        tool: "finbox".to_string(),
        summary: summary.clone(),
        top_products: top_products.to_vec(),
    };

    serde_json::to_writer_pretty(file, &stats)
        .map_err(|e| AppError::new(2, format!("Failed to write stats JSON: {e}")))?;

    Ok(())
}

/// One archived report file, for listings.
#[derive(Debug, Clone)]
pub struct ReportFileInfo {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

/// List the `*.json` files in the reports directory, sorted by name (the
/// filename scheme makes that chronological). A missing directory is an empty
/// listing, consistent with the store.
pub fn list_reports(dir: &Path) -> Vec<ReportFileInfo> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<ReportFileInfo> = entries
        .flatten()
        .filter(|entry| {
            let path = entry.path();
            path.is_file() && path.extension().is_some_and(|ext| ext == "json")
        })
        .map(|entry| {
            let metadata = entry.metadata().ok();
            ReportFileInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                size: metadata.as_ref().map(|m| m.len()).unwrap_or(0),
                modified: metadata
                    .and_then(|m| m.modified().ok())
                    .map(DateTime::<Local>::from),
            }
        })
        .collect();

    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

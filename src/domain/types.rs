//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to JSON
//! - reloaded later for charting or chat-context building
//!
//! The wire field names (`fecha`, `ventas`, ...) are fixed by the device
//! firmware and preserved via `serde(rename)`; the Rust-side names are what the
//! rest of the crate speaks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Month bucket used when a report's date is missing or too short to carry a
/// "YYYY-MM" prefix.
pub const DEFAULT_MONTH_BUCKET: &str = "2000-01";

/// One sale within a day's report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based position within the day (informational only).
    #[serde(rename = "numero")]
    pub number: i64,
    /// Product code as printed by the device.
    #[serde(rename = "codigo")]
    pub code: String,
    /// Product display name; the grouping key for frequency/mode statistics.
    #[serde(rename = "producto")]
    pub product: String,
    /// Free-text description, not used in aggregation.
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Monetary value of this line.
    #[serde(rename = "valor")]
    pub value: f64,
    /// Unit quantity; backs the units-sold ranking (distinct from the
    /// count-of-line-items ranking).
    #[serde(rename = "cantidad", default = "default_quantity")]
    pub quantity: u64,
    /// "YYYY-MM-DD HH:MM:SS", informational only.
    #[serde(rename = "timestamp", default)]
    pub timestamp: String,
}

fn default_quantity() -> u64 {
    1
}

/// One calendar day's sales summary (one JSON file on disk).
///
/// `sale_count` and `day_total` are trusted as the device reported them and
/// never re-derived from `sales`, even when inconsistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// "YYYY-MM-DD"; the aggregation and sort key.
    #[serde(rename = "fecha")]
    pub date: String,
    /// Count of line items as reported by the device.
    #[serde(rename = "total_ventas")]
    pub sale_count: u64,
    /// Sum of line-item values as reported by the device.
    #[serde(rename = "total_dia")]
    pub day_total: f64,
    /// The individual sales, in device order.
    #[serde(rename = "ventas")]
    pub sales: Vec<LineItem>,
}

impl Report {
    /// Calendar-month key ("YYYY-MM") for monthly aggregation.
    ///
    /// Takes the first 7 bytes of the date string; anything too short (or cut
    /// mid-character) falls into [`DEFAULT_MONTH_BUCKET`] instead of being
    /// dropped. Reports with malformed dates still count toward the totals.
    pub fn month_key(&self) -> String {
        self.date
            .get(0..7)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_MONTH_BUCKET.to_string())
    }
}

/// One point of the time-ordered daily revenue series.
///
/// Duplicate dates stay as separate points (two files for the same day are two
/// entries, not one merged entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: String,
    pub revenue: f64,
}

/// Per-month revenue and transaction-count sums.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub revenue: f64,
    pub sale_count: u64,
}

/// Per-product tallies accumulated over all line items.
///
/// `count` counts line items mentioning the product (one per occurrence);
/// `units` sums quantities. These back two distinct rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTally {
    pub name: String,
    pub count: u64,
    pub units: u64,
}

/// The output of one full aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Daily revenue, ordered by ascending date string (lexical order on
    /// "YYYY-MM-DD" coincides with chronological order).
    pub daily: Vec<DailyPoint>,
    /// Month key → summed totals, in month order.
    pub monthly: BTreeMap<String, MonthTotals>,
    /// Product tallies in first-encounter order; that order is the tie-break
    /// for mode and top-N rankings.
    pub products: Vec<ProductTally>,
}

/// A (product, count) pair produced by mode and ranking queries.
///
/// `count` is a line-item count or a unit count depending on the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCount {
    pub name: String,
    pub count: u64,
}

/// Descriptive statistics over the daily revenue series.
///
/// Only produced for a non-empty series; "no data" is `Option::None` at the
/// call sites, never a struct full of NaNs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of daily entries (reports), not distinct calendar days.
    pub days: usize,
    pub total: f64,
    pub mean: f64,
    /// Average of the two middle values for even-length series.
    pub median: f64,
    /// Population standard deviation (divide by N).
    pub std_dev: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub min: f64,
    pub max: f64,
    /// Mean of the monthly revenue sums.
    pub monthly_mean: f64,
    /// Most frequent product by line-item count; `("N/A", 0)` when no line
    /// items exist at all.
    pub mode_product: ProductCount,
}

/// The numeric series a charting collaborator consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Daily revenue in date order.
    pub daily: Vec<DailyPoint>,
    /// (month, revenue) in month order.
    pub monthly: Vec<(String, f64)>,
    /// Top products by units sold, descending.
    pub top_products: Vec<ProductCount>,
}

/// A saved statistics file (JSON export).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsFile {
    pub tool: String,
    pub summary: Summary,
    pub top_products: Vec<ProductCount>,
}

/// Response shape of the device's `GET /status` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatus {
    /// Sales registered on the device since its last reset.
    #[serde(rename = "ventas", default)]
    pub sale_count: u64,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_date(date: &str) -> Report {
        Report {
            date: date.to_string(),
            sale_count: 0,
            day_total: 0.0,
            sales: Vec::new(),
        }
    }

    #[test]
    fn month_key_takes_year_month_prefix() {
        assert_eq!(report_with_date("2024-10-05").month_key(), "2024-10");
        assert_eq!(report_with_date("2024-10").month_key(), "2024-10");
    }

    #[test]
    fn month_key_defaults_for_short_dates() {
        assert_eq!(report_with_date("").month_key(), DEFAULT_MONTH_BUCKET);
        assert_eq!(report_with_date("2024").month_key(), DEFAULT_MONTH_BUCKET);
    }

    #[test]
    fn line_item_quantity_defaults_to_one() {
        let item: LineItem = serde_json::from_str(
            r#"{"numero": 1, "codigo": "01", "producto": "Lapicero", "valor": 1500}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.description, "");
    }
}

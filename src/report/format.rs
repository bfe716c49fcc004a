//! Formatted terminal output for statistics and reports.
//!
//! We keep formatting code in one place so:
//! - the aggregation/statistics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! No new computation happens here; everything is derived from the aggregate
//! and summary passed in.

use crate::analysis::top_by_units;
use crate::domain::{Aggregate, ChartSeries, Report, Summary};

/// Rendered instead of the statistics block when there are no reports at all.
pub const NO_DATA_MESSAGE: &str = "No report data available.";

/// Format the full statistics summary.
///
/// Every statistic is labeled and currency-formatted with thousands separators
/// and zero decimal places. A `None` summary renders the no-data message.
pub fn format_statistics(agg: &Aggregate, summary: Option<&Summary>) -> String {
    let Some(stats) = summary else {
        return format!("{NO_DATA_MESSAGE}\n");
    };

    let mut out = String::new();

    out.push_str("=== Sales statistics ===\n");
    let first = agg.daily.first().map(|p| p.date.as_str()).unwrap_or("-");
    let last = agg.daily.last().map(|p| p.date.as_str()).unwrap_or("-");
    out.push_str(&format!(
        "Reports: {} | period: {first} .. {last}\n\n",
        stats.days
    ));

    out.push_str("Central tendency:\n");
    out.push_str(&stat_line("Mean:", &fmt_cop(stats.mean)));
    out.push_str(&stat_line("Median:", &fmt_cop(stats.median)));
    out.push_str(&stat_line(
        "Mode (product):",
        &format!(
            "{} ({} line items)",
            truncate(&stats.mode_product.name, 25),
            stats.mode_product.count
        ),
    ));
    out.push('\n');

    out.push_str("Percentiles:\n");
    out.push_str(&stat_line("P25 (Q1):", &fmt_cop(stats.p25)));
    out.push_str(&stat_line("P50 (Q2):", &fmt_cop(stats.p50)));
    out.push_str(&stat_line("P75 (Q3):", &fmt_cop(stats.p75)));
    out.push('\n');

    out.push_str("Averages:\n");
    out.push_str(&stat_line("Per day:", &fmt_cop(stats.mean)));
    out.push_str(&stat_line("Per month:", &fmt_cop(stats.monthly_mean)));
    out.push('\n');

    out.push_str("Dispersion:\n");
    out.push_str(&stat_line("Std deviation:", &fmt_cop(stats.std_dev)));
    out.push('\n');

    out.push_str("Extremes:\n");
    out.push_str(&stat_line("Best day:", &fmt_cop(stats.max)));
    out.push_str(&stat_line("Worst day:", &fmt_cop(stats.min)));
    out.push_str(&stat_line("Period total:", &fmt_cop(stats.total)));
    out.push('\n');

    out.push_str("Top products (units):\n");
    let top = top_by_units(&agg.products, 5);
    if top.is_empty() {
        out.push_str("  (none)\n");
    }
    for product in &top {
        out.push_str(&format!(
            "  {:<26}{:>6} units\n",
            truncate(&product.name, 25),
            product.count
        ));
    }

    out
}

/// Format one report's day summary (used by `fetch`, `show`, and the chat
/// context).
pub fn format_report_summary(report: &Report) -> String {
    let mut out = String::new();

    let date = if report.date.is_empty() {
        "N/A"
    } else {
        report.date.as_str()
    };
    out.push_str(&format!("=== Report {date} ===\n"));
    out.push_str(&format!(
        "Sales: {} | day total: {}\n",
        report.sale_count,
        fmt_cop(report.day_total)
    ));

    if report.sales.is_empty() {
        out.push_str("\nNo sales recorded.\n");
        return out;
    }

    out.push('\n');
    for item in &report.sales {
        let timestamp = if item.timestamp.is_empty() {
            "N/A"
        } else {
            item.timestamp.as_str()
        };
        out.push_str(&format!(
            "  {:>2}. {:<15} {:>16}  [{timestamp}]\n",
            item.number,
            truncate(&item.product, 15),
            fmt_cop(item.value),
        ));
    }

    out
}

/// Build the numeric series a charting collaborator needs: daily revenue in
/// date order, monthly revenue in month order, top-5 products by units.
pub fn chart_series(agg: &Aggregate) -> ChartSeries {
    ChartSeries {
        daily: agg.daily.clone(),
        monthly: agg
            .monthly
            .iter()
            .map(|(month, totals)| (month.clone(), totals.revenue))
            .collect(),
        top_products: top_by_units(&agg.products, 5),
    }
}

/// Currency formatting: rounded to whole pesos, comma thousands separators.
pub fn fmt_cop(value: f64) -> String {
    format!("$ {} COP", fmt_thousands(value))
}

/// Format a number with comma thousands separators (rounded, no decimals).
pub fn fmt_thousands(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{}", grouped.chars().rev().collect::<String>())
}

fn stat_line(label: &str, value: &str) -> String {
    format!("  {label:<18}{value:>22}\n")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate, summarize};
    use crate::domain::{LineItem, Report};

    fn report(date: &str, day_total: f64, products: &[(&str, u64)]) -> Report {
        Report {
            date: date.to_string(),
            sale_count: products.len() as u64,
            day_total,
            sales: products
                .iter()
                .map(|(name, qty)| LineItem {
                    number: 1,
                    code: "01".to_string(),
                    product: name.to_string(),
                    description: String::new(),
                    value: 1500.0,
                    quantity: *qty,
                    timestamp: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn thousands_grouping_and_rounding() {
        assert_eq!(fmt_thousands(0.0), "0");
        assert_eq!(fmt_thousands(999.0), "999");
        assert_eq!(fmt_thousands(1000.0), "1,000");
        assert_eq!(fmt_thousands(1_234_567.6), "1,234,568");
        assert_eq!(fmt_thousands(-45_000.0), "-45,000");
    }

    #[test]
    fn empty_aggregate_renders_no_data_message() {
        let agg = aggregate(&[]);
        let text = format_statistics(&agg, summarize(&agg).as_ref());
        assert_eq!(text.trim_end(), NO_DATA_MESSAGE);
    }

    #[test]
    fn statistics_text_contains_labeled_values() {
        let reports = vec![
            report("2024-10-05", 1000.0, &[("Lapicero", 1)]),
            report("2024-10-17", 2000.0, &[("Lapicero", 2), ("Borrador", 1)]),
        ];
        let agg = aggregate(&reports);
        let summary = summarize(&agg).unwrap();
        let text = format_statistics(&agg, Some(&summary));

        assert!(text.contains("Reports: 2 | period: 2024-10-05 .. 2024-10-17"));
        assert!(text.contains("Mean:"));
        assert!(text.contains("$ 1,500 COP"));
        assert!(text.contains("Lapicero (2 line items)"));
        assert!(text.contains("Period total:"));
        assert!(text.contains("$ 3,000 COP"));
        assert!(text.contains("Top products (units):"));
    }

    #[test]
    fn report_summary_lists_line_items() {
        let r = report("2024-10-05", 4500.0, &[("Cuaderno", 1)]);
        let text = format_report_summary(&r);
        assert!(text.contains("=== Report 2024-10-05 ==="));
        assert!(text.contains("Cuaderno"));
        assert!(text.contains("[N/A]"));
    }

    #[test]
    fn report_summary_handles_no_sales() {
        let r = report("2024-10-05", 0.0, &[]);
        assert!(format_report_summary(&r).contains("No sales recorded."));
    }

    #[test]
    fn chart_series_orders_months_and_ranks_by_units() {
        let reports = vec![
            report("2024-11-02", 500.0, &[("A", 3)]),
            report("2024-10-05", 1000.0, &[("B", 5)]),
        ];
        let series = chart_series(&aggregate(&reports));

        let months: Vec<&str> = series.monthly.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(months, vec!["2024-10", "2024-11"]);
        assert_eq!(series.daily[0].date, "2024-10-05");
        assert_eq!(series.top_products[0].name, "B");
        assert_eq!(series.top_products[0].count, 5);
    }
}

//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - daily revenue points: `o`
//! - best / worst day highlights: `B` / `W`
//! - bar charts: `#` runs scaled to the largest value

use crate::domain::{ChartSeries, DailyPoint, ProductCount};
use crate::report::fmt_thousands;

const NO_DATA_LINE: &str = "(no data)";

/// Render the full terminal dashboard: daily scatter, monthly bars, and the
/// top-product ranking.
pub fn render_dashboard(series: &ChartSeries, width: usize, height: usize) -> String {
    let mut out = String::new();

    out.push_str("=== Daily revenue ===\n");
    out.push_str(&render_daily_chart(&series.daily, width, height));
    out.push('\n');

    out.push_str("=== Monthly revenue ===\n");
    out.push_str(&render_monthly_bars(&series.monthly, width));
    out.push('\n');

    out.push_str("=== Top products (units) ===\n");
    out.push_str(&render_product_bars(&series.top_products, width));

    out
}

/// Scatter the daily revenue series over a fixed grid, highlighting the best
/// (`B`) and worst (`W`) days.
pub fn render_daily_chart(daily: &[DailyPoint], width: usize, height: usize) -> String {
    if daily.is_empty() {
        return format!("{NO_DATA_LINE}\n");
    }

    let width = width.max(10);
    let height = height.max(5);

    let revenues: Vec<f64> = daily.iter().map(|p| p.revenue).collect();
    let y_min = revenues.iter().cloned().fold(f64::INFINITY, f64::min);
    let y_max = revenues.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    // First occurrence wins for ties, matching the stable tie-break used by
    // the rankings.
    let best = max_index(&revenues);
    let worst = min_index(&revenues);

    let mut grid = vec![vec![' '; width]; height];
    let x_max = (daily.len() - 1).max(1) as f64;

    for (i, point) in daily.iter().enumerate() {
        let x = map_x(i as f64, 0.0, x_max, width);
        let y = map_y(point.revenue, y_min, y_max, height);
        let ch = if i == best {
            'B'
        } else if i == worst {
            'W'
        } else {
            'o'
        };
        // Best/worst markers win the cell over plain points.
        if grid[y][x] == ' ' || ch != 'o' {
            grid[y][x] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "n={} | revenue=[{}, {}] COP\n",
        daily.len(),
        fmt_thousands(revenues[worst]),
        fmt_thousands(revenues[best]),
    ));
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} .. {}\n",
        daily.first().map(|p| p.date.as_str()).unwrap_or("-"),
        daily.last().map(|p| p.date.as_str()).unwrap_or("-"),
    ));

    out
}

/// Horizontal bars of revenue per month, in month order.
pub fn render_monthly_bars(monthly: &[(String, f64)], width: usize) -> String {
    if monthly.is_empty() {
        return format!("{NO_DATA_LINE}\n");
    }

    let scale = monthly.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let max_len = bar_width(width);
    let mut out = String::new();
    for (month, revenue) in monthly {
        out.push_str(&format!(
            "{month:<8} {:<max_len$} {}\n",
            bar(*revenue, scale, max_len),
            fmt_thousands(*revenue),
            max_len = max_len,
        ));
    }
    out
}

/// Horizontal bars for the top-product ranking.
pub fn render_product_bars(top: &[ProductCount], width: usize) -> String {
    if top.is_empty() {
        return format!("{NO_DATA_LINE}\n");
    }

    let scale = top.iter().map(|p| p.count as f64).fold(0.0_f64, f64::max);
    let max_len = bar_width(width);
    let mut out = String::new();
    for product in top {
        out.push_str(&format!(
            "{:<16} {:<max_len$} {}\n",
            truncate(&product.name, 16),
            bar(product.count as f64, scale, max_len),
            product.count,
            max_len = max_len,
        ));
    }
    out
}

fn bar_width(width: usize) -> usize {
    // Leave room for the label and the trailing value.
    width.max(40).saturating_sub(30)
}

fn bar(value: f64, scale: f64, max_len: usize) -> String {
    if !(scale > 0.0) || value <= 0.0 {
        return String::new();
    }
    let len = ((value / scale) * max_len as f64).round() as usize;
    "#".repeat(len.clamp(1, max_len))
}

fn max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn min_index(values: &[f64]) -> usize {
    let mut worst = 0;
    for (i, v) in values.iter().enumerate() {
        if *v < values[worst] {
            worst = i;
        }
    }
    worst
}

fn pad_range(y_min: f64, y_max: f64, frac: f64) -> (f64, f64) {
    if !(y_min.is_finite() && y_max.is_finite()) {
        return (0.0, 1.0);
    }
    if (y_max - y_min).abs() < 1e-9 {
        return (y_min - 1.0, y_max + 1.0);
    }
    let pad = (y_max - y_min) * frac;
    (y_min - pad, y_max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    if t_max <= t_min {
        return 0;
    }
    let u = (t - t_min) / (t_max - t_min);
    ((u * (width - 1) as f64).round() as usize).min(width - 1)
}

fn map_y(v: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((v - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    (((1.0 - u) * (height - 1) as f64).round() as usize).min(height - 1)
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

    fn daily(points: &[(&str, f64)]) -> Vec<DailyPoint> {
        points
            .iter()
            .map(|(date, revenue)| DailyPoint {
                date: date.to_string(),
                revenue: *revenue,
            })
            .collect()
    }

    #[test]
    fn daily_chart_marks_best_and_worst() {
        let series = daily(&[
            ("2024-10-01", 1000.0),
            ("2024-10-02", 3000.0),
            ("2024-10-03", 500.0),
        ]);
        let plot = render_daily_chart(&series, 40, 10);
        assert!(plot.contains('B'));
        assert!(plot.contains('W'));
        assert!(plot.contains("2024-10-01 .. 2024-10-03"));
    }

    #[test]
    fn daily_chart_handles_empty_and_single_point() {
        assert!(render_daily_chart(&[], 40, 10).contains(NO_DATA_LINE));
        // One point is both best and worst; must not panic on a flat range.
        let plot = render_daily_chart(&daily(&[("2024-10-01", 1000.0)]), 40, 10);
        assert!(plot.contains('B'));
    }

    #[test]
    fn monthly_bars_scale_to_largest_value() {
        let monthly = vec![
            ("2024-10".to_string(), 1000.0),
            ("2024-11".to_string(), 2000.0),
        ];
        let bars = render_monthly_bars(&monthly, 60);
        let lines: Vec<&str> = bars.lines().collect();
        let count = |line: &str| line.matches('#').count();
        assert!(count(lines[0]) < count(lines[1]));
        assert!(bars.contains("2,000"));
    }

    #[test]
    fn product_bars_render_counts() {
        let top = vec![
            ProductCount {
                name: "Cuaderno universitario grande".to_string(),
                count: 12,
            },
            ProductCount {
                name: "Lapiz".to_string(),
                count: 3,
            },
        ];
        let bars = render_product_bars(&top, 60);
        assert!(bars.contains("Cuaderno univer."));
        assert!(bars.contains("12"));
    }
}

//! Single-pass report aggregation.
//!
//! Folds the normalized reports into the three series everything downstream
//! consumes: the date-ordered daily revenue series, per-month totals, and
//! per-product tallies. One pass, no re-reads, deterministic given its input.

use std::collections::HashMap;

use crate::domain::{Aggregate, DailyPoint, ProductTally, Report};

/// Fold `reports` into an [`Aggregate`].
///
/// - daily: one entry per report, stably sorted by ascending date string, so
///   duplicate days stay as separate points in submission order
/// - monthly: totals summed under the report's month key (malformed dates land
///   in the default bucket rather than being dropped)
/// - products: tallies in first-encounter order; that order is what mode and
///   top-N tie-breaks rely on
pub fn aggregate(reports: &[Report]) -> Aggregate {
    let mut agg = Aggregate::default();
    let mut product_index: HashMap<String, usize> = HashMap::new();

    for report in reports {
        agg.daily.push(DailyPoint {
            date: report.date.clone(),
            revenue: report.day_total,
        });

        let month = agg.monthly.entry(report.month_key()).or_default();
        month.revenue += report.day_total;
        month.sale_count += report.sale_count;

        for item in &report.sales {
            let idx = match product_index.get(&item.product) {
                Some(&idx) => idx,
                None => {
                    agg.products.push(ProductTally {
                        name: item.product.clone(),
                        count: 0,
                        units: 0,
                    });
                    let idx = agg.products.len() - 1;
                    product_index.insert(item.product.clone(), idx);
                    idx
                }
            };
            agg.products[idx].count += 1;
            agg.products[idx].units += item.quantity;
        }
    }

    agg.daily.sort_by(|a, b| a.date.cmp(&b.date));
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_MONTH_BUCKET, LineItem};

    fn report(date: &str, day_total: f64, sale_count: u64) -> Report {
        Report {
            date: date.to_string(),
            sale_count,
            day_total,
            sales: Vec::new(),
        }
    }

    fn line_item(product: &str, quantity: u64) -> LineItem {
        LineItem {
            number: 0,
            code: String::new(),
            product: product.to_string(),
            description: String::new(),
            value: 100.0,
            quantity,
            timestamp: String::new(),
        }
    }

    #[test]
    fn daily_series_is_date_ordered_with_duplicates_kept() {
        let reports = vec![
            report("2024-10-17", 2000.0, 2),
            report("2024-10-05", 1000.0, 1),
            report("2024-10-05", 500.0, 1),
        ];

        let agg = aggregate(&reports);
        let dates: Vec<&str> = agg.daily.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-10-05", "2024-10-05", "2024-10-17"]);
        // Stable sort keeps the duplicate day's entries in submission order.
        assert_eq!(agg.daily[0].revenue, 1000.0);
        assert_eq!(agg.daily[1].revenue, 500.0);
    }

    #[test]
    fn monthly_totals_sum_revenue_and_sale_counts() {
        let reports = vec![
            report("2024-10-05", 1000.0, 3),
            report("2024-10-17", 2000.0, 5),
            report("2024-11-01", 700.0, 1),
        ];

        let agg = aggregate(&reports);
        let october = &agg.monthly["2024-10"];
        assert_eq!(october.revenue, 3000.0);
        assert_eq!(october.sale_count, 8);
        assert_eq!(agg.monthly["2024-11"].revenue, 700.0);
    }

    #[test]
    fn malformed_dates_fall_into_default_month_bucket() {
        let reports = vec![report("", 100.0, 1), report("2024", 200.0, 1)];

        let agg = aggregate(&reports);
        assert_eq!(agg.monthly.len(), 1);
        assert_eq!(agg.monthly[DEFAULT_MONTH_BUCKET].revenue, 300.0);
    }

    #[test]
    fn product_tallies_track_count_and_units_in_first_encounter_order() {
        let mut r1 = report("2024-10-05", 0.0, 0);
        r1.sales = vec![line_item("A", 3), line_item("B", 5)];
        let mut r2 = report("2024-10-06", 0.0, 0);
        r2.sales = vec![line_item("A", 2), line_item("C", 1)];

        let agg = aggregate(&[r1, r2]);
        let names: Vec<&str> = agg.products.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(agg.products[0].count, 2);
        assert_eq!(agg.products[0].units, 5);
        assert_eq!(agg.products[1].units, 5);
    }
}

//! Descriptive statistics over the aggregated series.
//!
//! Every function here is total over the empty case: an empty series yields
//! `None` (or the documented sentinel), never a panic or a NaN; the store
//! legitimately returns zero reports on first run.

use crate::domain::{Aggregate, ProductCount, ProductTally, Summary};

/// Arithmetic mean. `None` on an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Statistical median: the middle value, or the average of the two middle
/// values for even-length input. `None` on an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(values)?;
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Population standard deviation (sum of squared deviations over N, not N-1).
/// `None` on an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Linear-interpolation percentile over the sorted values.
///
/// The conventional "linear" method: the rank `p/100 * (n-1)` is interpolated
/// between the two bracketing sorted values, so `percentile(values, 50.0)`
/// equals `median(values)` for any non-empty input.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let sorted = sorted_copy(values)?;
    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_copy(values: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(sorted)
}

/// Sentinel product name reported when no line items exist at all.
pub const NO_PRODUCT: &str = "N/A";

/// Most frequent product by line-item count.
///
/// Ties break toward the first-encountered product (the tallies are in
/// first-encounter order and only a strictly greater count displaces the
/// current winner).
pub fn mode_product(products: &[ProductTally]) -> ProductCount {
    let mut best = ProductCount {
        name: NO_PRODUCT.to_string(),
        count: 0,
    };
    for tally in products {
        if tally.count > best.count {
            best = ProductCount {
                name: tally.name.clone(),
                count: tally.count,
            };
        }
    }
    best
}

/// Top `n` products by units sold, descending; stable ties.
pub fn top_by_units(products: &[ProductTally], n: usize) -> Vec<ProductCount> {
    top_by(products, n, |t| t.units)
}

/// Top `n` products by line-item count, descending; stable ties.
pub fn top_by_count(products: &[ProductTally], n: usize) -> Vec<ProductCount> {
    top_by(products, n, |t| t.count)
}

fn top_by(
    products: &[ProductTally],
    n: usize,
    key: impl Fn(&ProductTally) -> u64,
) -> Vec<ProductCount> {
    let mut ranked: Vec<&ProductTally> = products.iter().collect();
    // Stable sort: equal keys keep first-encounter order.
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked
        .into_iter()
        .take(n)
        .map(|t| ProductCount {
            name: t.name.clone(),
            count: key(t),
        })
        .collect()
}

/// Compute the full [`Summary`] over an aggregate.
///
/// `None` exactly when the daily series is empty ("no data").
pub fn summarize(agg: &Aggregate) -> Option<Summary> {
    let values: Vec<f64> = agg.daily.iter().map(|p| p.revenue).collect();
    let mean_daily = mean(&values)?;

    let monthly_revenue: Vec<f64> = agg.monthly.values().map(|m| m.revenue).collect();

    Some(Summary {
        days: values.len(),
        total: values.iter().sum(),
        mean: mean_daily,
        median: median(&values)?,
        std_dev: std_dev(&values)?,
        p25: percentile(&values, 25.0)?,
        p50: percentile(&values, 50.0)?,
        p75: percentile(&values, 75.0)?,
        min: values.iter().cloned().fold(f64::INFINITY, f64::min),
        max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        monthly_mean: mean(&monthly_revenue).unwrap_or(0.0),
        mode_product: mode_product(&agg.products),
    })
}

//! Synthetic report generation.
//!
//! Produces a month of plausible stationery-shop reports so the statistics,
//! charts, and chat context can be exercised without the physical device.
//! Generation is fully deterministic for a given (year, month, seed) triple.

use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{LineItem, Report};
use crate::error::AppError;

/// The shop's catalog: (code, product, description, list price in COP).
const CATALOG: [(&str, &str, &str, f64); 20] = [
    ("01", "Lapicero", "Lapicero tinta azul/negra", 1500.0),
    ("02", "Lapiz", "Lapiz de grafito HB", 800.0),
    ("03", "Borrador", "Borrador blanco o de nata", 600.0),
    ("04", "Sacapuntas", "Sacapuntas metalico o plastico", 1200.0),
    ("05", "Marcador", "Marcador permanente o de pizarra", 2500.0),
    ("06", "Cuaderno", "Cuaderno universitario o pequeno", 4500.0),
    ("07", "Carpeta", "Carpeta plastica o de anillas", 3800.0),
    ("08", "Hojas sueltas", "Resma o paquete de hojas blancas", 2800.0),
    ("09", "Papel cuadriculado", "Hojas cuadriculadas o rayadas", 3200.0),
    ("10", "Cartulina", "Cartulina blanca o de color", 800.0),
    ("11", "Impresion B/N", "Impresion laser o inyeccion B/N", 300.0),
    ("12", "Impresion color", "Impresion a color", 1500.0),
    ("13", "Fotocopia", "Copia en blanco y negro", 200.0),
    ("14", "Escaneo", "Escaneo de documentos o fotos", 500.0),
    ("15", "Plastificado", "Plastificado de hojas o carnets", 2000.0),
    ("16", "Tijeras", "Tijeras escolares o de oficina", 3500.0),
    ("17", "Regla", "Regla de 30 cm o flexible", 1800.0),
    ("18", "Pegante", "Pegante en barra o liquido", 2200.0),
    ("19", "Cinta adhesiva", "Cinta transparente o masking tape", 1600.0),
    ("20", "Grapadora", "Grapadora mediana o mini", 4200.0),
];

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub year: i32,
    pub month: u32,
    pub seed: u64,
}

/// Generate one report file per day of the configured month and write them
/// under `dir`. Returns the written paths in date order.
pub fn generate_month(dir: &Path, config: &SampleConfig) -> Result<Vec<PathBuf>, AppError> {
    let first = NaiveDate::from_ymd_opt(config.year, config.month, 1).ok_or_else(|| {
        AppError::new(
            2,
            format!("Invalid year/month: {}-{:02}.", config.year, config.month),
        )
    })?;

    fs::create_dir_all(dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create reports directory '{}': {e}", dir.display()),
        )
    })?;

    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let mut paths = Vec::new();

    let mut date = first;
    while date.month() == config.month {
        let report = generate_day_report(&mut rng, &date.format("%Y-%m-%d").to_string())?;

        let path = dir.join(format!("reporte_{}_120000.json", report.date));
        let file = File::create(&path).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to create sample report '{}': {e}", path.display()),
            )
        })?;
        serde_json::to_writer_pretty(file, &report)
            .map_err(|e| AppError::new(2, format!("Failed to write sample report: {e}")))?;
        paths.push(path);

        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    Ok(paths)
}

/// Generate a single day's report: 1-10 sales drawn from the catalog with a
/// small normal jitter on the list price.
pub fn generate_day_report(rng: &mut StdRng, date: &str) -> Result<Report, AppError> {
    let price_noise = Normal::new(0.0, 0.05)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let sale_count = rng.gen_range(1..=10);
    let mut sales = Vec::with_capacity(sale_count);
    let mut day_total = 0.0;

    for i in 0..sale_count {
        let (code, product, description, list_price) = CATALOG[rng.gen_range(0..CATALOG.len())];

        // Jittered price, rounded to the 50-peso coin like the register does.
        let jitter: f64 = price_noise.sample(rng);
        let value = ((list_price * (1.0 + jitter)) / 50.0).round() * 50.0;
        let value = value.max(50.0);

        let hour = rng.gen_range(8..=20);
        let minute = rng.gen_range(0..60);

        sales.push(LineItem {
            number: (i + 1) as i64,
            code: code.to_string(),
            product: product.to_string(),
            description: description.to_string(),
            value,
            quantity: rng.gen_range(1..=3),
            timestamp: format!("{date} {hour:02}:{minute:02}:00"),
        });
        day_total += value;
    }

    Ok(Report {
        date: date.to_string(),
        sale_count: sale_count as u64,
        day_total,
        sales,
    })
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.year.hash(&mut hasher);
    config.month.hash(&mut hasher);
    config.seed.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::load_reports;

    #[test]
    fn day_report_totals_are_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        let report = generate_day_report(&mut rng, "2024-10-05").unwrap();

        assert_eq!(report.sale_count as usize, report.sales.len());
        let sum: f64 = report.sales.iter().map(|s| s.value).sum();
        assert!((report.day_total - sum).abs() < 1e-9);
        assert!(report.sales.iter().all(|s| s.value >= 50.0));
        assert!(report.sales.iter().all(|s| (1..=3).contains(&s.quantity)));
    }

    #[test]
    fn generate_month_writes_one_file_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let config = SampleConfig {
            year: 2024,
            month: 10,
            seed: 42,
        };

        let paths = generate_month(dir.path(), &config).unwrap();
        assert_eq!(paths.len(), 31);

        // The generated files round-trip through the store.
        let outcome = load_reports(dir.path());
        assert_eq!(outcome.reports.len(), 31);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let mut a = StdRng::seed_from_u64(sample_seed(&SampleConfig {
            year: 2024,
            month: 10,
            seed: 1,
        }));
        let mut b = StdRng::seed_from_u64(sample_seed(&SampleConfig {
            year: 2024,
            month: 10,
            seed: 1,
        }));

        let ra = generate_day_report(&mut a, "2024-10-01").unwrap();
        let rb = generate_day_report(&mut b, "2024-10-01").unwrap();
        assert_eq!(ra, rb);
    }

    #[test]
    fn invalid_month_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = SampleConfig {
            year: 2024,
            month: 13,
            seed: 42,
        };
        assert!(generate_month(dir.path(), &config).is_err());
    }
}

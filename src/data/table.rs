use chrono::{DateTime, Utc};

use crate::{
    config::{NormalizerConfig, SheetLayout},
    domain::metrics::{KpiReading, KpiUnit, MetricSample, RawMetric, WeatherCondition},
    scene::normalize::{kpi_ratio, normalize, parse_number},
};

use super::FetchError;

/// Rectangular grid of raw string cells as the sheet returns them.
///
/// Rows may be ragged; a cell past the end of its row reads as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricTable {
    rows: Vec<Vec<String>>,
}

impl MetricTable {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .filter(|cell| !cell.trim().is_empty())
    }

    /// First configured KPI row whose label matches one of `labels`.
    #[must_use]
    pub fn kpi(&self, layout: &SheetLayout, labels: &[String]) -> Option<KpiReading> {
        let wanted: Vec<String> = labels.iter().map(|label| normalize_label(label)).collect();
        layout.kpi_rows.iter().find_map(|&row| {
            let label = normalize_label(self.cell(row, layout.label_col)?);
            if !wanted.contains(&label) {
                return None;
            }
            Some(KpiReading {
                label,
                value: RawMetric::from(self.cell(row, layout.value_col)),
                green_at: self.threshold(row, layout.green_col),
                red_at: self.threshold(row, layout.red_col),
                unit: self
                    .cell(row, layout.unit_col)
                    .map_or(KpiUnit::Plain, KpiUnit::from_token),
            })
        })
    }

    fn threshold(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col)
            .and_then(|cell| parse_number(&RawMetric::from(cell)))
    }
}

impl From<Vec<Vec<String>>> for MetricTable {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Lowercase with runs of whitespace collapsed to one space.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Builds a sample from a fetched table. Unparsable cells fall back to the
/// configured ratio; a table with no recognisable KPI row at all is an error so
/// the caller keeps its previous scene.
pub fn sample_from_table(
    table: &MetricTable,
    layout: &SheetLayout,
    weather: (WeatherCondition, f64),
    normalizer: &NormalizerConfig,
    captured_at: DateTime<Utc>,
) -> Result<MetricSample, FetchError> {
    let sales = table.kpi(layout, &layout.sales_labels);
    let labor = table.kpi(layout, &layout.labor_labels);
    if sales.is_none() && labor.is_none() {
        return Err(FetchError::NoKpiRows);
    }

    let fallback = normalizer.fallback_ratio;
    let sales_ratio = kpi_ratio(sales.as_ref(), true, fallback);
    let labor_ratio = labor
        .as_ref()
        .map_or(fallback, |reading| normalize(&reading.value, fallback));
    let (condition, intensity) = weather;

    Ok(MetricSample::new(
        sales_ratio,
        labor_ratio,
        condition,
        intensity,
        captured_at,
    ))
}

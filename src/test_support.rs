use std::{collections::VecDeque, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    config::{NormalizerConfig, SheetLayout},
    data::{
        FetchError, MetricSource,
        table::{MetricTable, sample_from_table},
    },
    domain::metrics::{DEFAULT_WEATHER, MetricSample, WeatherCondition},
};

pub(crate) fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 12, 10, 0, 0)
        .single()
        .expect("valid time fixture")
}

pub(crate) fn sample(sales: f64, labor: f64, intensity: f64) -> MetricSample {
    MetricSample::new(sales, labor, WeatherCondition::Cloudy, intensity, fixed_instant())
}

/// Replays queued results in order, then keeps failing.
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Result<MetricSample, FetchError>>>,
}

impl ScriptedSource {
    pub(crate) fn new(script: impl IntoIterator<Item = Result<MetricSample, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

impl MetricSource for ScriptedSource {
    async fn fetch_sample(
        &self,
        _layout: &SheetLayout,
        _normalizer: &NormalizerConfig,
    ) -> Result<MetricSample, FetchError> {
        let next = self
            .script
            .lock()
            .expect("script lock")
            .pop_front();
        next.unwrap_or(Err(FetchError::NoKpiRows))
    }
}

/// Extracts every sample from the same sheet using the caller's layout.
pub(crate) struct TableSource {
    table: MetricTable,
}

impl TableSource {
    pub(crate) fn new(rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect::<Vec<Vec<String>>>();
        Self {
            table: MetricTable::new(rows),
        }
    }
}

impl MetricSource for TableSource {
    async fn fetch_sample(
        &self,
        layout: &SheetLayout,
        normalizer: &NormalizerConfig,
    ) -> Result<MetricSample, FetchError> {
        sample_from_table(&self.table, layout, DEFAULT_WEATHER, normalizer, fixed_instant())
    }
}

#![allow(dead_code)]

use std::{collections::VecDeque, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};
use harborlight::{
    app::{
        clock::FixedClock,
        state::{OrchestratorOptions, SceneOrchestrator},
    },
    config::{NormalizerConfig, SceneConfig, SheetLayout},
    data::{FetchError, MetricSource},
    domain::metrics::{MetricSample, WeatherCondition},
    scene::SceneRng,
};

pub fn captured_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 12, 10, 0, 0)
        .single()
        .expect("valid time fixture")
}

pub fn sample(sales: f64, labor: f64) -> MetricSample {
    MetricSample::new(sales, labor, WeatherCondition::Rain, 0.6, captured_at())
}

/// Hands out queued results in order; an empty script reports a missing table.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<MetricSample, FetchError>>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Result<MetricSample, FetchError>>) -> Self {
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
        let next = self.script.lock().expect("script lock").pop_front();
        next.unwrap_or(Err(FetchError::NoKpiRows))
    }
}

pub fn orchestrator_at(hour: f64, source: ScriptedSource) -> SceneOrchestrator<ScriptedSource> {
    SceneOrchestrator::new(
        source,
        SceneConfig::builtin(),
        OrchestratorOptions::default(),
        SceneRng::seeded(2026),
    )
    .with_clock(FixedClock(hour))
}

pub fn sheet_body(rows: &[&[&str]]) -> String {
    let values: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect();
    serde_json::json!({ "range": "KPIs!A1:F11", "values": values }).to_string()
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resilience::freshness::{FreshnessState, FreshnessThresholds, evaluate_freshness};

mod conditions;

pub use conditions::{DEFAULT_WEATHER, weather_code_to_condition, weather_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Thunder,
    Fog,
}

/// One normalized snapshot of the signals driving the scene.
///
/// Ratios are clamped to `[0, 1]` on construction; a NaN collapses to `0`.
/// A new sample always replaces the previous one as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    sales_ratio: f64,
    labor_ratio: f64,
    weather_condition: WeatherCondition,
    weather_intensity: f64,
    captured_at: DateTime<Utc>,
}

impl MetricSample {
    #[must_use]
    pub fn new(
        sales_ratio: f64,
        labor_ratio: f64,
        weather_condition: WeatherCondition,
        weather_intensity: f64,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sales_ratio: clamp01(sales_ratio),
            labor_ratio: clamp01(labor_ratio),
            weather_condition,
            weather_intensity: clamp01(weather_intensity),
            captured_at,
        }
    }

    #[must_use]
    pub fn sales_ratio(&self) -> f64 {
        self.sales_ratio
    }

    #[must_use]
    pub fn labor_ratio(&self) -> f64 {
        self.labor_ratio
    }

    #[must_use]
    pub fn weather_condition(&self) -> WeatherCondition {
        self.weather_condition
    }

    #[must_use]
    pub fn weather_intensity(&self) -> f64 {
        self.weather_intensity
    }

    #[must_use]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// A raw cell value as it arrives from the metric source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawMetric {
    #[default]
    Missing,
    Number(f64),
    Text(String),
}

impl From<&str> for RawMetric {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawMetric {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<&str>> for RawMetric {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Self::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KpiUnit {
    Currency,
    Percent,
    #[default]
    Plain,
}

impl KpiUnit {
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "$" | "usd" | "dollar" => Self::Currency,
            "%" => Self::Percent,
            _ => Self::Plain,
        }
    }
}

/// One KPI row: the value plus its optional green/red thresholds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KpiReading {
    pub label: String,
    pub value: RawMetric,
    pub green_at: Option<f64>,
    pub red_at: Option<f64>,
    pub unit: KpiUnit,
}

#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Fetch bookkeeping behind the health indicator.
#[derive(Debug, Clone)]
pub struct RefreshHealth {
    pub last_success: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub state: FreshnessState,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl Default for RefreshHealth {
    fn default() -> Self {
        Self {
            last_success: None,
            last_attempt: None,
            state: FreshnessState::Stale,
            consecutive_failures: 0,
            last_error: None,
        }
    }
}

impl RefreshHealth {
    pub fn mark_attempt(&mut self) {
        self.last_attempt = Some(Utc::now());
    }

    pub fn mark_success(&mut self) {
        let now = Utc::now();
        self.last_attempt = Some(now);
        self.last_success = Some(now);
        self.consecutive_failures = 0;
        self.last_error = None;
        self.state = FreshnessState::Fresh;
    }

    pub fn mark_failure(&mut self, error: String, thresholds: &FreshnessThresholds) {
        self.last_attempt = Some(Utc::now());
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error);
        self.reevaluate(thresholds);
    }

    pub fn reevaluate(&mut self, thresholds: &FreshnessThresholds) {
        self.state = evaluate_freshness(self.last_success, self.consecutive_failures, thresholds);
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.state == FreshnessState::Fresh
    }
}

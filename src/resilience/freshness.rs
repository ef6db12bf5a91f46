use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessState {
    Fresh,
    Stale,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessThresholds {
    pub stale_after_minutes: i64,
    pub offline_after_minutes: i64,
    pub stale_after_failures: u32,
    pub offline_after_failures: u32,
}

impl Default for FreshnessThresholds {
    fn default() -> Self {
        Self {
            stale_after_minutes: 10,
            offline_after_minutes: 30,
            stale_after_failures: 1,
            offline_after_failures: 3,
        }
    }
}

#[must_use]
pub fn evaluate_freshness(
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    thresholds: &FreshnessThresholds,
) -> FreshnessState {
    evaluate_freshness_at(Utc::now(), last_success, consecutive_failures, thresholds)
}

#[must_use]
pub fn evaluate_freshness_at(
    now: DateTime<Utc>,
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    thresholds: &FreshnessThresholds,
) -> FreshnessState {
    let offline_by_failures = consecutive_failures >= thresholds.offline_after_failures;
    let Some(last_success) = last_success else {
        return if offline_by_failures {
            FreshnessState::Offline
        } else {
            FreshnessState::Stale
        };
    };

    let age = now - last_success;
    if age > Duration::minutes(thresholds.offline_after_minutes) || offline_by_failures {
        FreshnessState::Offline
    } else if age > Duration::minutes(thresholds.stale_after_minutes)
        || consecutive_failures >= thresholds.stale_after_failures
    {
        FreshnessState::Stale
    } else {
        FreshnessState::Fresh
    }
}

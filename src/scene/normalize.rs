use std::sync::LazyLock;

use regex::Regex;

use crate::{
    config::NormalizerConfig,
    domain::metrics::{KpiReading, KpiUnit, RawMetric, clamp01},
};

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.\-]").expect("static pattern compiles"));

/// Strips currency symbols, separators and percent signs, then parses.
#[must_use]
pub fn parse_number(raw: &RawMetric) -> Option<f64> {
    let value = match raw {
        RawMetric::Missing => return None,
        RawMetric::Number(value) => *value,
        RawMetric::Text(text) => NON_NUMERIC.replace_all(text, "").parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Maps a plain number onto `[0, 1]`, reading magnitudes above 1 as percentages.
#[must_use]
pub fn ratio_from_number(value: f64) -> f64 {
    if value.abs() > 1.0 {
        clamp01(value / 100.0)
    } else {
        clamp01(value)
    }
}

/// Never fails: unparsable or missing input yields `fallback` (itself clamped).
#[must_use]
pub fn normalize(raw: &RawMetric, fallback: f64) -> f64 {
    parse_number(raw).map_or_else(|| clamp01(fallback), ratio_from_number)
}

/// Three-part labor ramp: lead-in, eased climb, saturation.
///
/// Output is exactly `0.0` for a zero (or negative) input and never decreases
/// as the input grows.
#[must_use]
pub fn normalize_labor(ratio: f64, config: &NormalizerConfig) -> f64 {
    let ratio = clamp01(ratio);
    if ratio <= 0.0 {
        return 0.0;
    }

    let activation = config.activation_threshold.clamp(f64::EPSILON, 1.0);
    let saturation = config.saturation_threshold.clamp(activation, 1.0);
    let lead_in = clamp01(config.lead_in_ceiling);

    if ratio < activation {
        let exponent = config.lead_in_exponent.max(1.0);
        return lead_in * (ratio / activation).powf(exponent);
    }
    if ratio >= saturation {
        return 1.0;
    }

    let progress = (ratio - activation) / (saturation - activation);
    let eased = progress.powf(config.ease_exponent.max(f64::MIN_POSITIVE));
    clamp01(lead_in + (1.0 - lead_in) * eased)
}

/// KPI health score in `[0, 100]`.
///
/// With distinct green/red thresholds the value is placed linearly between
/// them. Without thresholds a percent value scores itself; anything else scores
/// 75 when positive and 25 otherwise. A missing value scores 0.
#[must_use]
pub fn kpi_score(
    value: Option<f64>,
    green_at: Option<f64>,
    red_at: Option<f64>,
    unit: KpiUnit,
    higher_is_better: bool,
) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    if let (Some(green), Some(red)) = (green_at, red_at)
        && (green - red).abs() > f64::EPSILON
    {
        let position = if higher_is_better {
            (value - red) / (green - red)
        } else {
            (red - value) / (red - green)
        };
        return clamp_score(position * 100.0);
    }

    match unit {
        KpiUnit::Percent if higher_is_better => clamp_score(value),
        KpiUnit::Percent => clamp_score(100.0 - value),
        KpiUnit::Currency | KpiUnit::Plain if value > 0.0 => 75.0,
        KpiUnit::Currency | KpiUnit::Plain => 25.0,
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.round().clamp(0.0, 100.0)
    }
}

/// Ratio for a KPI row: its threshold score when both thresholds exist,
/// otherwise the normalized raw value.
#[must_use]
pub fn kpi_ratio(reading: Option<&KpiReading>, higher_is_better: bool, fallback: f64) -> f64 {
    let Some(reading) = reading else {
        return clamp01(fallback);
    };
    let Some(value) = parse_number(&reading.value) else {
        return clamp01(fallback);
    };

    match (reading.green_at, reading.red_at) {
        (Some(green), Some(red)) if (green - red).abs() > f64::EPSILON => {
            kpi_score(Some(value), Some(green), Some(red), reading.unit, higher_is_better) / 100.0
        }
        _ => ratio_from_number(value),
    }
}

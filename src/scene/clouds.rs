use crate::{
    config::{CloudConfig, PercentRange},
    domain::{metrics::clamp01, scene::CloudSpec},
};

use super::SceneRng;

#[must_use]
pub fn cloud_count(intensity: f64, config: &CloudConfig) -> u32 {
    if clamp01(intensity) > config.high_intensity_threshold {
        3
    } else {
        2
    }
}

/// Horizontal slots in draw order: left, mid, and (heavy weather only) right.
#[must_use]
pub fn cloud_regions(config: &CloudConfig) -> [PercentRange; 3] {
    let right = PercentRange::new(config.right.lo, config.right.hi.min(config.right_edge_cap));
    [config.left, config.mid, right]
}

/// Smallest horizontal gap between `x` and anything already placed.
#[must_use]
pub fn min_spacing(x: f64, placed: &[f64]) -> f64 {
    placed
        .iter()
        .map(|other| (x - other).abs())
        .fold(f64::INFINITY, f64::min)
}

pub fn generate_clouds(intensity: f64, config: &CloudConfig, rng: &mut SceneRng) -> Vec<CloudSpec> {
    let intensity = clamp01(intensity);
    let count = cloud_count(intensity, config) as usize;
    let regions = cloud_regions(config);
    let mut placed: Vec<f64> = Vec::with_capacity(count);

    regions
        .iter()
        .take(count)
        .zip(0_u32..)
        .map(|(region, cloud_id)| {
            let x_percent = place_with_spacing(region, &placed, config, rng);
            placed.push(x_percent);

            let y_px = rng.range(config.y_min_px, config.y_max_px);
            let scale = config.base_scale
                + config.intensity_scale_gain * intensity
                + rng.jitter(config.scale_jitter);
            let drift_sec = (config.base_drift_sec - config.intensity_speedup_sec * intensity
                + rng.jitter(config.drift_variance_sec / 2.0))
            .max(config.min_drift_sec);
            let delay_sec = -rng.range(0.0, drift_sec);

            CloudSpec {
                cloud_id,
                x_percent,
                y_px,
                scale,
                drift_sec,
                delay_sec,
            }
        })
        .collect()
}

/// Draws inside `region` and nudges away from neighbours; after the attempt
/// budget the widest-gap candidate wins, so the result always lies in `region`.
fn place_with_spacing(
    region: &PercentRange,
    placed: &[f64],
    config: &CloudConfig,
    rng: &mut SceneRng,
) -> f64 {
    let mut candidate = rng.range(region.lo, region.hi);
    if placed.is_empty() {
        return candidate;
    }

    let mut best = candidate;
    let mut best_gap = min_spacing(candidate, placed);
    for _ in 0..config.max_attempts.max(1) {
        let gap = min_spacing(candidate, placed);
        if gap > best_gap {
            best = candidate;
            best_gap = gap;
        }
        if gap >= config.min_dx {
            return candidate;
        }
        candidate = nudge(candidate, region, placed, config, rng);
    }

    if min_spacing(candidate, placed) > best_gap {
        candidate
    } else {
        best
    }
}

fn nudge(
    x: f64,
    region: &PercentRange,
    placed: &[f64],
    config: &CloudConfig,
    rng: &mut SceneRng,
) -> f64 {
    let Some(nearest) = placed
        .iter()
        .copied()
        .min_by(|a, b| (x - a).abs().total_cmp(&(x - b).abs()))
    else {
        return x;
    };
    let push = config.min_dx + rng.range(0.0, 2.0);
    let (toward, away) = if x >= nearest {
        (nearest - push, nearest + push)
    } else {
        (nearest + push, nearest - push)
    };

    if region.contains(away) {
        away
    } else if region.contains(toward) {
        toward
    } else {
        region.clamp(away)
    }
}

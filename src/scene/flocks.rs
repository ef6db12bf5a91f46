#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::{
    config::FlockConfig,
    domain::{
        metrics::clamp01,
        scene::{BirdSpec, FlockDirection, FlockSpec, Silhouette},
    },
};

use super::SceneRng;

const HARD_FLOCK_CAP: u32 = 3;
const ODD_ROW_STAGGER_PX: f64 = 3.0;

/// `round(activity^exponent * 3)` clamped to `[0, 3]`; exactly `0` at zero activity.
#[must_use]
pub fn flock_count(activity: f64, config: &FlockConfig) -> u32 {
    let activity = clamp01(activity);
    if activity <= 0.0 {
        return 0;
    }
    let raw = (activity.powf(config.count_exponent) * f64::from(HARD_FLOCK_CAP)).round();
    (raw.max(0.0) as u32).min(config.max_flocks.min(HARD_FLOCK_CAP))
}

#[must_use]
pub fn birds_per_flock(activity: f64, config: &FlockConfig) -> u32 {
    let min = config.min_birds.min(config.max_birds);
    let max = config.max_birds.max(min);
    let extra = (clamp01(activity) * f64::from(max - min)).round() as u32;
    (min + extra).min(max)
}

/// Two staggered rows once a flock outgrows a single short line.
#[must_use]
pub fn grid_for(bird_count: u32) -> (u32, u32) {
    let rows = if bird_count > 3 { 2 } else { 1 };
    let cols = bird_count.div_ceil(rows).max(1);
    (rows, cols)
}

/// Horizontal extent a flock may occupy at this viewport width.
#[must_use]
pub fn horizontal_spread(viewport_width_px: u32, config: &FlockConfig) -> f64 {
    (f64::from(viewport_width_px) * config.spread_ratio).min(config.max_spread_px).max(0.0)
}

#[must_use]
pub fn flock_period(index: u32, activity: f64, config: &FlockConfig) -> f64 {
    let period = config.base_period_sec + f64::from(index) * config.period_step_sec
        - clamp01(activity) * config.activity_speedup_sec;
    period.max(config.min_period_sec)
}

/// Flock layouts for one labor activity level (already ramped).
pub fn generate_flocks(
    activity: f64,
    viewport_width_px: u32,
    config: &FlockConfig,
    rng: &mut SceneRng,
) -> Vec<FlockSpec> {
    let activity = clamp01(activity);
    let count = flock_count(activity, config);
    let bird_count = birds_per_flock(activity, config);
    let (row_count, col_count) = grid_for(bird_count);
    let spread = horizontal_spread(viewport_width_px, config);
    let top_step = config.top_percent_span / f64::from(count.saturating_sub(1).max(1));
    let size_base = config.base_size_px + (activity * config.size_gain_px).round();

    (0..count)
        .map(|index| {
            let top_percent = config.top_percent_min
                + f64::from(index) * top_step
                + rng.range(0.0, config.top_percent_jitter);
            let period_sec = flock_period(index, activity, config);
            let delay_sec = -rng.range(0.0, period_sec);
            let direction = if rng.chance(config.reverse_probability) {
                FlockDirection::Reverse
            } else {
                FlockDirection::Forward
            };
            let vertical_band_px =
                config.vertical_band_px + f64::from(index) * config.vertical_band_step_px;
            let grid = FlockGrid {
                bird_count,
                rows: row_count,
                cols: col_count,
                spread,
                vertical_band_px,
                direction,
            };

            FlockSpec {
                flock_id: index,
                bird_count,
                size_px: size_base + f64::from(index % 2),
                period_sec,
                delay_sec,
                direction,
                row_count,
                col_count,
                vertical_band_px,
                top_percent,
                horizontal_spread_px: spread,
                birds: layout_birds(&grid, config, rng),
            }
        })
        .collect()
}

struct FlockGrid {
    bird_count: u32,
    rows: u32,
    cols: u32,
    spread: f64,
    vertical_band_px: f64,
    direction: FlockDirection,
}

fn layout_birds(grid: &FlockGrid, config: &FlockConfig, rng: &mut SceneRng) -> Vec<BirdSpec> {
    let col_span = f64::from(grid.cols.saturating_sub(1).max(1));
    let row_span = f64::from(grid.rows.saturating_sub(1).max(1));
    let base_tilt = match grid.direction {
        FlockDirection::Forward => -8.0,
        FlockDirection::Reverse => 8.0,
    };

    (0..grid.bird_count)
        .map(|idx| {
            let row = idx / grid.cols;
            let col = idx % grid.cols;
            let (r, c) = (f64::from(row), f64::from(col));
            let stagger = if row % 2 == 1 { ODD_ROW_STAGGER_PX } else { 0.0 };

            let x_px = (c / col_span * grid.spread + rng.jitter(config.position_jitter_px))
                .clamp(0.0, grid.spread);
            let y_px = (r / row_span * grid.vertical_band_px
                + stagger
                + rng.jitter(config.position_jitter_px * 0.5))
            .max(0.0);
            let phase_sec = r * 0.08 + c * 0.05 + rng.range(0.0, config.phase_jitter_sec);
            let tilt_deg = base_tilt
                + (r - f64::from(grid.rows) / 2.0) * 2.0
                + rng.jitter(config.tilt_jitter_deg);
            let silhouette = if rng.chance(config.glyph_probability) {
                Silhouette::Glyph
            } else {
                Silhouette::VMark
            };

            BirdSpec {
                x_px,
                y_px,
                phase_sec,
                bob_sec: 0.9 + (r + c) * 0.02,
                tilt_deg,
                silhouette,
            }
        })
        .collect()
}

/// Stretches existing flocks to a new viewport without redrawing any jitter.
#[must_use]
pub fn rescale_flocks(flocks: &[FlockSpec], viewport_width_px: u32, config: &FlockConfig) -> Vec<FlockSpec> {
    let spread = horizontal_spread(viewport_width_px, config);
    flocks
        .iter()
        .map(|flock| {
            let factor = if flock.horizontal_spread_px > 0.0 {
                spread / flock.horizontal_spread_px
            } else {
                0.0
            };
            let birds = flock
                .birds
                .iter()
                .map(|bird| BirdSpec {
                    x_px: bird.x_px * factor,
                    ..*bird
                })
                .collect();
            FlockSpec {
                horizontal_spread_px: spread,
                birds,
                ..flock.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;

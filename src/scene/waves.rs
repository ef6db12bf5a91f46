use crate::{
    config::{WaveConfig, WaveLayerConfig},
    domain::{
        metrics::clamp01,
        scene::{WaveLayerSpec, WaveSpecs},
    },
};

use super::lerp;

/// Both wave layers for one sales ratio.
#[must_use]
pub fn generate_waves(sales_ratio: f64, config: &WaveConfig, viewport_width_px: u32) -> WaveSpecs {
    WaveSpecs {
        back: wave_layer(sales_ratio, &config.back, viewport_width_px),
        front: wave_layer(sales_ratio, &config.front, viewport_width_px),
    }
}

/// One layer. The crest (baseline + amplitude + margin) never leaves the band,
/// however high the configured waterline is.
#[must_use]
pub fn wave_layer(sales_ratio: f64, layer: &WaveLayerConfig, viewport_width_px: u32) -> WaveLayerSpec {
    let r = clamp01(sales_ratio);
    let band = layer.band_height_px.max(0.0);
    let margin = layer.safety_margin_px.max(0.0);
    let room = (band - margin).max(0.0);

    let amplitude_px = lerp(layer.low_amplitude_px, layer.high_amplitude_px, r)
        .min(room)
        .max(0.0);
    let baseline_px = lerp(layer.low_baseline_px, layer.target_waterline_px, r)
        .min(room - amplitude_px)
        .max(0.0);
    let period_sec = (layer.base_period_sec - r * layer.speed_gain_sec).max(layer.min_period_sec);

    WaveLayerSpec {
        amplitude_px,
        baseline_px,
        period_sec,
        band_height_px: band,
        parallax_offset_px: layer.parallax_offset_px,
        safety_margin_px: margin,
        scroll_width_px: scroll_width(viewport_width_px),
    }
}

/// Strip width for seamless tiling: two viewports side by side.
#[must_use]
pub fn scroll_width(viewport_width_px: u32) -> f64 {
    f64::from(viewport_width_px) * 2.0
}

use crate::{
    config::SceneConfig,
    domain::{
        metrics::MetricSample,
        scene::{SceneDescriptor, ScenePhase, WaveLayerSpec, WaveSpecs},
    },
};

use super::{
    SceneRng,
    beacon::beacon_sweep,
    clouds::generate_clouds,
    flocks::{generate_flocks, rescale_flocks},
    normalize::normalize_labor,
    waves::{generate_waves, scroll_width},
};

/// One complete descriptor from one sample. Every generator sees the same
/// sample, so the result is internally consistent by construction.
#[must_use]
pub fn assemble_scene(
    sample: &MetricSample,
    phase: ScenePhase,
    viewport_width_px: u32,
    version: u64,
    config: &SceneConfig,
    rng: &mut SceneRng,
) -> SceneDescriptor {
    let activity = normalize_labor(sample.labor_ratio(), &config.normalizer);

    SceneDescriptor {
        version,
        phase,
        waves: generate_waves(sample.sales_ratio(), &config.waves, viewport_width_px),
        flocks: generate_flocks(activity, viewport_width_px, &config.flocks, rng),
        clouds: generate_clouds(sample.weather_intensity(), &config.clouds, rng),
        beacon: beacon_sweep(&config.beacon),
        generated_from: *sample,
        viewport_width_px,
    }
}

/// Copy of `descriptor` fitted to a new width. Only pixel extents change;
/// metric-derived values and jitter are carried over untouched.
#[must_use]
pub fn rescale_for_viewport(
    descriptor: &SceneDescriptor,
    viewport_width_px: u32,
    version: u64,
    config: &SceneConfig,
) -> SceneDescriptor {
    let scroll_width_px = scroll_width(viewport_width_px);
    let waves = WaveSpecs {
        back: WaveLayerSpec {
            scroll_width_px,
            ..descriptor.waves.back
        },
        front: WaveLayerSpec {
            scroll_width_px,
            ..descriptor.waves.front
        },
    };

    SceneDescriptor {
        version,
        waves,
        flocks: rescale_flocks(&descriptor.flocks, viewport_width_px, &config.flocks),
        beacon: beacon_sweep(&config.beacon),
        viewport_width_px,
        ..descriptor.clone()
    }
}

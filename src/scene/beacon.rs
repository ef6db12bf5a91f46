use crate::{
    config::BeaconConfig,
    domain::scene::{BeaconSweepSpec, Point},
    geometry::{beacon_angle, rect_center, sweep_window},
};

/// Lantern position derived from the landmark's offsets inside the scene.
#[must_use]
pub fn beacon_origin(config: &BeaconConfig) -> Point {
    let x = config.left_offset_px + config.height_px * config.lantern_x_ratio;
    let lantern_above_floor = config.bottom_offset_px + config.height_px - config.lantern_drop_px;
    Point::new(x, config.scene_height_px - lantern_above_floor)
}

/// Built fresh from the config on every call; nothing here is cached.
#[must_use]
pub fn beacon_sweep(config: &BeaconConfig) -> BeaconSweepSpec {
    let origin_point = beacon_origin(config);
    let target_point = rect_center(&config.highlight);
    let angle_deg = beacon_angle(origin_point, target_point);
    let (sweep_from_deg, sweep_to_deg) = sweep_window(angle_deg, config.sweep_span_deg);

    BeaconSweepSpec {
        origin_point,
        target_point,
        angle_deg,
        sweep_span_deg: config.sweep_span_deg,
        sweep_from_deg,
        sweep_to_deg,
        duration_ms: config.duration_ms,
    }
}

//! Plane geometry in screen coordinates (x right, y down).

use crate::{config::HighlightRect, domain::scene::Point};

/// Aim angle from `origin` to `target` in degrees; `0` points right and
/// positive angles turn clockwise on screen.
#[must_use]
pub fn beacon_angle(origin: Point, target: Point) -> f64 {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    dy.atan2(dx).to_degrees()
}

/// Symmetric window of width `span_deg` around `angle_deg`.
#[must_use]
pub fn sweep_window(angle_deg: f64, span_deg: f64) -> (f64, f64) {
    let half = span_deg / 2.0;
    (angle_deg - half, angle_deg + half)
}

#[must_use]
pub fn rect_center(rect: &HighlightRect) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

use serde::{Deserialize, Serialize};

use super::metrics::MetricSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenePhase {
    Day,
    Sunset,
    Dusk,
    Night,
}

impl ScenePhase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Sunset => "sunset",
            Self::Dusk => "dusk",
            Self::Night => "night",
        }
    }
}

/// Scene coordinates in pixels, origin top-left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveLayerSpec {
    pub amplitude_px: f64,
    pub baseline_px: f64,
    pub period_sec: f64,
    pub band_height_px: f64,
    pub parallax_offset_px: f64,
    pub safety_margin_px: f64,
    pub scroll_width_px: f64,
}

impl WaveLayerSpec {
    /// Highest point of the crest measured from the band bottom, margin included.
    #[must_use]
    pub fn crest_px(&self) -> f64 {
        self.baseline_px + self.amplitude_px + self.safety_margin_px
    }

    /// Tolerates float rounding only, far below a device pixel.
    #[must_use]
    pub fn fits_band(&self) -> bool {
        self.crest_px() <= self.band_height_px + 1e-9
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveSpecs {
    pub back: WaveLayerSpec,
    pub front: WaveLayerSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlockDirection {
    /// Left to right.
    Forward,
    /// Right to left.
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Silhouette {
    Glyph,
    #[serde(rename = "vmark")]
    VMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdSpec {
    pub x_px: f64,
    pub y_px: f64,
    pub phase_sec: f64,
    pub bob_sec: f64,
    pub tilt_deg: f64,
    pub silhouette: Silhouette,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlockSpec {
    pub flock_id: u32,
    pub bird_count: u32,
    pub size_px: f64,
    pub period_sec: f64,
    pub delay_sec: f64,
    pub direction: FlockDirection,
    pub row_count: u32,
    pub col_count: u32,
    pub vertical_band_px: f64,
    pub top_percent: f64,
    pub horizontal_spread_px: f64,
    pub birds: Vec<BirdSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSpec {
    pub cloud_id: u32,
    pub x_percent: f64,
    pub y_px: f64,
    pub scale: f64,
    pub drift_sec: f64,
    pub delay_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconSweepSpec {
    pub origin_point: Point,
    pub target_point: Point,
    pub angle_deg: f64,
    pub sweep_span_deg: f64,
    pub sweep_from_deg: f64,
    pub sweep_to_deg: f64,
    pub duration_ms: u64,
}

/// Everything the render layer needs for one recompute cycle.
///
/// Produced whole by the assembler and replaced whole by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescriptor {
    pub version: u64,
    pub phase: ScenePhase,
    pub waves: WaveSpecs,
    pub flocks: Vec<FlockSpec>,
    pub clouds: Vec<CloudSpec>,
    pub beacon: BeaconSweepSpec,
    pub generated_from: MetricSample,
    pub viewport_width_px: u32,
}

impl SceneDescriptor {
    #[must_use]
    pub fn bird_total(&self) -> u32 {
        self.flocks.iter().map(|flock| flock.bird_count).sum()
    }
}

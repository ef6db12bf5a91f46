//! Canonical tuning surface for the scene generators.
//!
//! Every knob the generators read lives here, with its default. Generators take
//! the relevant section as a plain argument on every call, so a reloaded config
//! takes effect on the next recompute.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resilience::freshness::FreshnessThresholds;

pub const CONFIG_ENV_VAR: &str = "HARBORLIGHT_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub normalizer: NormalizerConfig,
    pub phase: PhaseConfig,
    pub waves: WaveConfig,
    pub flocks: FlockConfig,
    pub clouds: CloudConfig,
    pub beacon: BeaconConfig,
    pub refresh: RefreshConfig,
    pub sheet: SheetLayout,
}

/// Ratio parsing and the labor ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Ratio used when a raw value is missing or unparsable. Range `[0, 1]`.
    pub fallback_ratio: f64,
    /// Labor ratio where the ramp leaves its lead-in. Range `(0, saturation)`.
    pub activation_threshold: f64,
    /// Labor ratio at and above which the ramp outputs `1`. Range `(activation, 1]`.
    pub saturation_threshold: f64,
    /// Ramp output reached exactly at the activation threshold. Range `[0, 1)`.
    pub lead_in_ceiling: f64,
    /// Shape of the lead-in below activation; above `1` starts slow. Range `>= 1`.
    pub lead_in_exponent: f64,
    /// Easing exponent between activation and saturation. Range `1.1..=1.2`.
    pub ease_exponent: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            fallback_ratio: 0.0,
            activation_threshold: 0.35,
            saturation_threshold: 0.75,
            lead_in_ceiling: 0.10,
            lead_in_exponent: 1.5,
            ease_exponent: 1.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Local hour, `[0, 24)`.
    pub sunrise_hour: f64,
    /// Local hour, `(sunrise, 24)`.
    pub sunset_hour: f64,
    /// Width of the sunset and dusk windows in hours. Must stay under half the day span.
    pub twilight_buffer_hours: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            twilight_buffer_hours: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveLayerConfig {
    /// Amplitude at a sales ratio of 0.
    pub low_amplitude_px: f64,
    /// Amplitude at a sales ratio of 1.
    pub high_amplitude_px: f64,
    /// Waterline height above the band bottom at a sales ratio of 0.
    pub low_baseline_px: f64,
    /// Waterline the layer rises to at a sales ratio of 1, before band clamping.
    pub target_waterline_px: f64,
    pub band_height_px: f64,
    /// Clearance kept between the crest and the band top.
    pub safety_margin_px: f64,
    pub parallax_offset_px: f64,
    /// Scroll period at a sales ratio of 0.
    pub base_period_sec: f64,
    /// Seconds shaved off the period at a sales ratio of 1.
    pub speed_gain_sec: f64,
    pub min_period_sec: f64,
}

/// Each layer fills unnamed fields from its own defaults, never the other layer's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WaveConfigPatch")]
pub struct WaveConfig {
    pub back: WaveLayerConfig,
    pub front: WaveLayerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaveConfigPatch {
    back: WaveLayerPatch,
    front: WaveLayerPatch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaveLayerPatch {
    low_amplitude_px: Option<f64>,
    high_amplitude_px: Option<f64>,
    low_baseline_px: Option<f64>,
    target_waterline_px: Option<f64>,
    band_height_px: Option<f64>,
    safety_margin_px: Option<f64>,
    parallax_offset_px: Option<f64>,
    base_period_sec: Option<f64>,
    speed_gain_sec: Option<f64>,
    min_period_sec: Option<f64>,
}

impl WaveLayerPatch {
    fn apply(self, base: WaveLayerConfig) -> WaveLayerConfig {
        WaveLayerConfig {
            low_amplitude_px: self.low_amplitude_px.unwrap_or(base.low_amplitude_px),
            high_amplitude_px: self.high_amplitude_px.unwrap_or(base.high_amplitude_px),
            low_baseline_px: self.low_baseline_px.unwrap_or(base.low_baseline_px),
            target_waterline_px: self.target_waterline_px.unwrap_or(base.target_waterline_px),
            band_height_px: self.band_height_px.unwrap_or(base.band_height_px),
            safety_margin_px: self.safety_margin_px.unwrap_or(base.safety_margin_px),
            parallax_offset_px: self.parallax_offset_px.unwrap_or(base.parallax_offset_px),
            base_period_sec: self.base_period_sec.unwrap_or(base.base_period_sec),
            speed_gain_sec: self.speed_gain_sec.unwrap_or(base.speed_gain_sec),
            min_period_sec: self.min_period_sec.unwrap_or(base.min_period_sec),
        }
    }
}

impl From<WaveConfigPatch> for WaveConfig {
    fn from(patch: WaveConfigPatch) -> Self {
        let defaults = Self::default();
        Self {
            back: patch.back.apply(defaults.back),
            front: patch.front.apply(defaults.front),
        }
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            back: WaveLayerConfig {
                low_amplitude_px: 3.0,
                high_amplitude_px: 22.0,
                low_baseline_px: 16.0,
                target_waterline_px: 30.0,
                band_height_px: 64.0,
                safety_margin_px: 4.0,
                parallax_offset_px: 4.0,
                base_period_sec: 16.0,
                speed_gain_sec: 5.0,
                min_period_sec: 8.0,
            },
            front: WaveLayerConfig {
                low_amplitude_px: 4.0,
                high_amplitude_px: 28.0,
                low_baseline_px: 10.0,
                target_waterline_px: 34.0,
                band_height_px: 64.0,
                safety_margin_px: 4.0,
                parallax_offset_px: 0.0,
                base_period_sec: 12.0,
                speed_gain_sec: 5.0,
                min_period_sec: 6.0,
            },
        }
    }
}

impl WaveLayerConfig {
    /// Tallest amplitude the layer can actually reach once clamped to its band.
    #[must_use]
    pub fn reachable_high_amplitude_px(&self) -> f64 {
        let room = (self.band_height_px.max(0.0) - self.safety_margin_px.max(0.0)).max(0.0);
        self.high_amplitude_px.min(room).max(0.0)
    }

    #[must_use]
    pub fn reachable_low_amplitude_px(&self) -> f64 {
        let room = (self.band_height_px.max(0.0) - self.safety_margin_px.max(0.0)).max(0.0);
        self.low_amplitude_px.min(room).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    /// Upper bound on flocks. Range `0..=3`.
    pub max_flocks: u32,
    pub count_exponent: f64,
    pub min_birds: u32,
    pub max_birds: u32,
    pub base_size_px: f64,
    pub size_gain_px: f64,
    pub base_period_sec: f64,
    /// Extra seconds per flock index so flocks do not move in lockstep.
    pub period_step_sec: f64,
    /// Seconds shaved off the period at full activity.
    pub activity_speedup_sec: f64,
    pub min_period_sec: f64,
    /// Probability of right-to-left traversal. Range `[0, 1]`.
    pub reverse_probability: f64,
    /// Probability of the curved glyph silhouette over the V mark. Range `[0, 1]`.
    pub glyph_probability: f64,
    pub max_spread_px: f64,
    /// Share of the viewport width a flock may spread over. Range `(0, 1]`.
    pub spread_ratio: f64,
    pub vertical_band_px: f64,
    pub vertical_band_step_px: f64,
    pub top_percent_min: f64,
    pub top_percent_span: f64,
    pub top_percent_jitter: f64,
    pub position_jitter_px: f64,
    pub phase_jitter_sec: f64,
    pub tilt_jitter_deg: f64,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            max_flocks: 3,
            count_exponent: 1.1,
            min_birds: 2,
            max_birds: 6,
            base_size_px: 7.0,
            size_gain_px: 5.0,
            base_period_sec: 11.0,
            period_step_sec: 1.4,
            activity_speedup_sec: 3.0,
            min_period_sec: 7.0,
            reverse_probability: 0.4,
            glyph_probability: 0.55,
            max_spread_px: 280.0,
            spread_ratio: 0.65,
            vertical_band_px: 16.0,
            vertical_band_step_px: 2.0,
            top_percent_min: 22.0,
            top_percent_span: 22.0,
            top_percent_jitter: 6.0,
            position_jitter_px: 3.0,
            phase_jitter_sec: 0.1,
            tilt_jitter_deg: 3.0,
        }
    }
}

/// Closed range of horizontal positions, in percent of the scene width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRange {
    pub lo: f64,
    pub hi: f64,
}

impl PercentRange {
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lo && x <= self.hi
    }

    #[must_use]
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.lo, self.hi)
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.lo.is_finite()
            && self.hi.is_finite()
            && self.lo >= 0.0
            && self.lo <= self.hi
            && self.hi <= 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Reserved region over the landmark; always receives one cloud.
    pub left: PercentRange,
    pub mid: PercentRange,
    pub right: PercentRange,
    /// Right-region samples never go past this percentage.
    pub right_edge_cap: f64,
    /// Preferred minimum horizontal gap between clouds, in percent.
    pub min_dx: f64,
    /// Intensity above which a third cloud is placed.
    pub high_intensity_threshold: f64,
    /// Placement attempts per cloud before the best candidate is accepted.
    pub max_attempts: u32,
    pub y_min_px: f64,
    pub y_max_px: f64,
    pub base_scale: f64,
    pub intensity_scale_gain: f64,
    pub scale_jitter: f64,
    pub base_drift_sec: f64,
    pub drift_variance_sec: f64,
    pub intensity_speedup_sec: f64,
    pub min_drift_sec: f64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            left: PercentRange::new(6.0, 22.0),
            mid: PercentRange::new(35.0, 60.0),
            right: PercentRange::new(62.0, 90.0),
            right_edge_cap: 80.0,
            min_dx: 18.0,
            high_intensity_threshold: 0.75,
            max_attempts: 4,
            y_min_px: 14.0,
            y_max_px: 26.0,
            base_scale: 1.0,
            intensity_scale_gain: 0.5,
            scale_jitter: 0.08,
            base_drift_sec: 26.0,
            drift_variance_sec: 8.0,
            intensity_speedup_sec: 8.0,
            min_drift_sec: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    pub left_offset_px: f64,
    pub bottom_offset_px: f64,
    pub height_px: f64,
    /// Lantern position across the landmark width, as a share of its height.
    pub lantern_x_ratio: f64,
    /// Lantern distance below the landmark top.
    pub lantern_drop_px: f64,
    pub scene_height_px: f64,
    /// Area the beam aims at; its center is the target point.
    pub highlight: HighlightRect,
    pub sweep_span_deg: f64,
    pub duration_ms: u64,
    /// Delay between arming a flash and it becoming active.
    pub flash_delay_ms: u64,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            left_offset_px: 14.0,
            bottom_offset_px: 6.0,
            height_px: 72.0,
            lantern_x_ratio: 0.28,
            lantern_drop_px: 22.0,
            scene_height_px: 130.0,
            highlight: HighlightRect {
                x: 150.0,
                y: 45.0,
                width: 60.0,
                height: 40.0,
            },
            sweep_span_deg: 52.0,
            duration_ms: 1200,
            flash_delay_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    pub retry_base_secs: u64,
    pub retry_max_secs: u64,
    pub stale_after_minutes: i64,
    pub offline_after_minutes: i64,
    pub stale_after_failures: u32,
    pub offline_after_failures: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 600,
            retry_base_secs: 10,
            retry_max_secs: 300,
            stale_after_minutes: 10,
            offline_after_minutes: 30,
            stale_after_failures: 1,
            offline_after_failures: 3,
        }
    }
}

impl RefreshConfig {
    #[must_use]
    pub fn freshness(&self) -> FreshnessThresholds {
        FreshnessThresholds {
            stale_after_minutes: self.stale_after_minutes,
            offline_after_minutes: self.offline_after_minutes,
            stale_after_failures: self.stale_after_failures,
            offline_after_failures: self.offline_after_failures,
        }
    }
}

/// Where the KPI rows sit in the fetched table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub kpi_rows: Vec<usize>,
    pub label_col: usize,
    pub value_col: usize,
    pub green_col: usize,
    pub red_col: usize,
    pub unit_col: usize,
    pub sales_labels: Vec<String>,
    pub labor_labels: Vec<String>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            kpi_rows: vec![0, 1, 2, 3, 4, 5, 8, 9, 10],
            label_col: 0,
            value_col: 1,
            green_col: 2,
            red_col: 3,
            unit_col: 5,
            sales_labels: vec!["sales".to_string()],
            labor_labels: vec!["labor".to_string(), "labour".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("twilight buffer {buffer}h leaves no daytime in a {span}h day")]
    TwilightTooWide { buffer: f64, span: f64 },
    #[error("sunset hour {sunset} must come after sunrise hour {sunrise}")]
    SunsetBeforeSunrise { sunrise: f64, sunset: f64 },
    #[error("activation threshold {activation} must be below saturation threshold {saturation}")]
    RampOutOfOrder { activation: f64, saturation: f64 },
    #[error("front wave amplitude must exceed back wave amplitude at both ends of the range")]
    FrontWaveNotDominant,
    #[error("cloud region `{0}` is not a valid percentage range")]
    InvalidRegion(&'static str),
    #[error("sweep span {0} must lie in (0, 360]")]
    InvalidSweepSpan(f64),
    #[error("flock count cap {0} exceeds 3")]
    TooManyFlocks(u32),
}

impl SceneConfig {
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {} failed", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {} failed", path.display()))?;
        config
            .validate()
            .with_context(|| format!("config {} rejected", path.display()))?;
        Ok(config)
    }

    /// Checks the assumptions the generators make about their inputs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_phase()?;
        let n = &self.normalizer;
        if n.activation_threshold >= n.saturation_threshold {
            return Err(ConfigError::RampOutOfOrder {
                activation: n.activation_threshold,
                saturation: n.saturation_threshold,
            });
        }
        let waves = &self.waves;
        let (front, back) = (&waves.front, &waves.back);
        if front.reachable_low_amplitude_px() <= back.reachable_low_amplitude_px()
            || front.reachable_high_amplitude_px() <= back.reachable_high_amplitude_px()
        {
            return Err(ConfigError::FrontWaveNotDominant);
        }
        self.validate_clouds()?;
        let span = self.beacon.sweep_span_deg;
        if !(span > 0.0 && span <= 360.0) {
            return Err(ConfigError::InvalidSweepSpan(span));
        }
        if self.flocks.max_flocks > 3 {
            return Err(ConfigError::TooManyFlocks(self.flocks.max_flocks));
        }
        Ok(())
    }

    fn validate_phase(&self) -> Result<(), ConfigError> {
        let phase = &self.phase;
        let span = phase.sunset_hour - phase.sunrise_hour;
        if span <= 0.0 {
            return Err(ConfigError::SunsetBeforeSunrise {
                sunrise: phase.sunrise_hour,
                sunset: phase.sunset_hour,
            });
        }
        if phase.twilight_buffer_hours * 2.0 >= span {
            return Err(ConfigError::TwilightTooWide {
                buffer: phase.twilight_buffer_hours,
                span,
            });
        }
        Ok(())
    }

    fn validate_clouds(&self) -> Result<(), ConfigError> {
        let clouds = &self.clouds;
        let regions = [
            ("left", clouds.left),
            ("mid", clouds.mid),
            ("right", clouds.right),
        ];
        for (name, region) in regions {
            if !region.is_well_formed() {
                return Err(ConfigError::InvalidRegion(name));
            }
        }
        if clouds.right_edge_cap < clouds.right.lo {
            return Err(ConfigError::InvalidRegion("right"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Builtin,
}

/// Resolves the config from an explicit path, then `HARBORLIGHT_CONFIG`, then builtins.
///
/// A file that cannot be used is logged and skipped; startup never fails here.
pub fn load_config(explicit: Option<&Path>) -> (SceneConfig, ConfigSource) {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    if let Some(path) = candidate {
        match SceneConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "harborlight::config",
                    path = %path.display(),
                    "scene_config.loaded=file"
                );
                return (config, ConfigSource::File(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "harborlight::config",
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "scene_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "harborlight::config", "scene_config.loaded=builtin");
    (SceneConfig::builtin(), ConfigSource::Builtin)
}

use std::future::Future;

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    config::{NormalizerConfig, SheetLayout},
    domain::metrics::{DEFAULT_WEATHER, MetricSample, WeatherCondition, weather_label},
};

use super::{
    FetchError,
    sheets::SheetsClient,
    table::sample_from_table,
    weather::{Coordinates, WeatherClient},
};

/// Anything that can produce a fresh [`MetricSample`] on demand.
///
/// The caller passes the layout and normalizer from its current config on
/// every fetch, so a reloaded config applies to the next sample.
pub trait MetricSource: Send + Sync + 'static {
    fn fetch_sample(
        &self,
        layout: &SheetLayout,
        normalizer: &NormalizerConfig,
    ) -> impl Future<Output = Result<MetricSample, FetchError>> + Send;
}

/// Sheet KPIs combined with current weather at an optional location.
#[derive(Debug, Clone)]
pub struct LiveMetricSource {
    sheets: SheetsClient,
    weather: Option<(WeatherClient, Coordinates)>,
}

impl LiveMetricSource {
    #[must_use]
    pub fn new(sheets: SheetsClient) -> Self {
        Self {
            sheets,
            weather: None,
        }
    }

    #[must_use]
    pub fn with_weather(mut self, client: WeatherClient, at: Coordinates) -> Self {
        self.weather = Some((client, at));
        self
    }

    /// Weather is decoration: any failure degrades to the default reading.
    async fn current_weather(&self) -> (WeatherCondition, f64) {
        let Some((client, at)) = &self.weather else {
            return DEFAULT_WEATHER;
        };
        match client.fetch_current(*at).await {
            Ok((condition, intensity)) => {
                debug!(
                    target: "harborlight::data",
                    condition = weather_label(condition),
                    intensity,
                    "weather.fetch=ok"
                );
                (condition, intensity)
            }
            Err(err) => {
                warn!(target: "harborlight::data", error = %err, "weather.fetch=failed fallback=default");
                DEFAULT_WEATHER
            }
        }
    }
}

impl MetricSource for LiveMetricSource {
    async fn fetch_sample(
        &self,
        layout: &SheetLayout,
        normalizer: &NormalizerConfig,
    ) -> Result<MetricSample, FetchError> {
        let (table, weather) = tokio::join!(self.sheets.fetch_table(), self.current_weather());
        sample_from_table(&table?, layout, weather, normalizer, Utc::now())
    }
}

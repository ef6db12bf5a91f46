use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::domain::metrics::{WeatherCondition, weather_code_to_condition};

use super::{FetchError, ensure_success};

pub const WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
const SERVICE: &str = "weather";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }

    /// Current condition bucket and intensity at `at`.
    pub async fn fetch_current(&self, at: Coordinates) -> Result<(WeatherCondition, f64), FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .map_err(FetchError::transport(SERVICE))?;
        let payload: CurrentWeatherResponse = ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(FetchError::decode(SERVICE))?;

        Ok(weather_code_to_condition(payload.current_weather.weathercode))
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weathercode: u8,
}

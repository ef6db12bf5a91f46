use super::WeatherCondition;

/// Condition and intensity used when no weather reading is available.
pub const DEFAULT_WEATHER: (WeatherCondition, f64) = (WeatherCondition::Clear, 0.6);

/// Maps an Open-Meteo weather code onto the scene's condition buckets.
#[must_use]
pub fn weather_code_to_condition(code: u8) -> (WeatherCondition, f64) {
    match code {
        0 => DEFAULT_WEATHER,
        1 | 2 => (WeatherCondition::Cloudy, 0.5),
        3 => (WeatherCondition::Cloudy, 0.8),
        45 => (WeatherCondition::Fog, 0.5),
        48 => (WeatherCondition::Fog, 0.8),
        65 | 67 | 82 => (WeatherCondition::Rain, 0.9),
        51..=57 | 61..=67 | 80..=82 => (WeatherCondition::Rain, 0.6),
        95 => (WeatherCondition::Thunder, 0.7),
        96 | 99 => (WeatherCondition::Thunder, 0.9),
        _ => (WeatherCondition::Cloudy, 0.5),
    }
}

#[must_use]
pub fn weather_label(condition: WeatherCondition) -> &'static str {
    match condition {
        WeatherCondition::Clear => "Clear",
        WeatherCondition::Cloudy => "Cloudy",
        WeatherCondition::Rain => "Rain",
        WeatherCondition::Thunder => "Thunderstorm",
        WeatherCondition::Fog => "Fog",
    }
}

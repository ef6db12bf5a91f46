#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::Parser;

use crate::data::weather::{Coordinates, WEATHER_URL};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "harborlight",
    version,
    about = "Turns live KPI metrics into an animated harbor scene descriptor stream"
)]
pub struct Cli {
    /// Scene config JSON (falls back to $HARBORLIGHT_CONFIG, then builtins)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Values endpoint of the KPI sheet
    #[arg(long)]
    pub sheet_url: String,

    /// Weather API base URL
    #[arg(long, default_value = WEATHER_URL)]
    pub weather_url: String,

    /// Store latitude for weather (requires --lon)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Store longitude for weather (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Initial viewport width in pixels
    #[arg(long, default_value_t = 390, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Fixed layout seed (reproducible scenes)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Refresh interval in seconds
    #[arg(long, default_value_t = 600)]
    pub refresh_interval: u64,

    /// Fetch once, print one descriptor and exit
    #[arg(long)]
    pub one_shot: bool,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            (Some(lat), Some(lon))
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) =>
            {
                anyhow::bail!("coordinates out of range: {lat}, {lon}")
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;
    use crate::data::weather::WEATHER_URL;

    const SHEET: &str = "http://sheet.test/values";

    #[test]
    fn defaults_match_mobile_viewport() {
        let cli = Cli::parse_from(["harborlight", "--sheet-url", SHEET]);
        assert_eq!(cli.width, 390);
        assert_eq!(cli.refresh_interval, 600);
        assert!(!cli.one_shot);
        assert!(cli.coordinates().is_none());
        assert_eq!(cli.weather_url, WEATHER_URL);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn sheet_url_is_required() {
        assert!(Cli::try_parse_from(["harborlight"]).is_err());
    }

    #[test]
    fn rejects_lat_without_lon() {
        let cli = Cli::parse_from(["harborlight", "--sheet-url", SHEET, "--lat", "59.3"]);
        let err = cli.validate().expect_err("lat alone");
        assert!(err.to_string().contains("--lat and --lon"));
    }

    #[test]
    fn accepts_negative_coordinates() {
        let cli = Cli::parse_from([
            "harborlight",
            "--sheet-url",
            SHEET,
            "--lat",
            "-33.9",
            "--lon",
            "151.2",
        ]);
        assert!(cli.validate().is_ok());
        let at = cli.coordinates().expect("coordinates");
        assert_eq!(at.latitude, -33.9);
    }

    #[test]
    fn rejects_zero_width() {
        assert!(Cli::try_parse_from(["harborlight", "--sheet-url", SHEET, "--width", "0"]).is_err());
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let cli = Cli::parse_from([
            "harborlight",
            "--sheet-url",
            SHEET,
            "--lat",
            "91",
            "--lon",
            "0",
        ]);
        assert!(cli.validate().is_err());
    }
}

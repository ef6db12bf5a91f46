use chrono::Timelike;

use crate::{config::PhaseConfig, domain::scene::ScenePhase};

/// Resolves the phase with ordered half-open interval tests.
///
/// `day` is `[sunrise + buffer, sunset - buffer)`, `sunset` is
/// `[sunset - buffer, sunset)`, `dusk` is `[sunset, sunset + buffer]`, and
/// everything else, the early morning included, is `night`.
#[must_use]
pub fn resolve_phase(hour: f64, config: &PhaseConfig) -> ScenePhase {
    let sunrise = config.sunrise_hour;
    let sunset = config.sunset_hour;
    let buffer = config.twilight_buffer_hours;

    if hour >= sunrise + buffer && hour < sunset - buffer {
        ScenePhase::Day
    } else if hour >= sunset - buffer && hour < sunset {
        ScenePhase::Sunset
    } else if hour >= sunset && hour <= sunset + buffer {
        ScenePhase::Dusk
    } else {
        ScenePhase::Night
    }
}

/// Fractional hour of day, e.g. `17:30` is `17.5`.
#[must_use]
pub fn local_hour<T: Timelike>(time: &T) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0 + f64::from(time.second()) / 3600.0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn cfg() -> PhaseConfig {
        PhaseConfig {
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            twilight_buffer_hours: 1.2,
        }
    }

    #[test]
    fn reference_hours_resolve_as_documented() {
        assert_eq!(resolve_phase(12.0, &cfg()), ScenePhase::Day);
        assert_eq!(resolve_phase(17.5, &cfg()), ScenePhase::Sunset);
        assert_eq!(resolve_phase(18.0, &cfg()), ScenePhase::Dusk);
        assert_eq!(resolve_phase(2.0, &cfg()), ScenePhase::Night);
    }

    #[test]
    fn boundaries_land_on_the_stated_side() {
        let c = cfg();
        let day_start = c.sunrise_hour + c.twilight_buffer_hours;
        let sunset_start = c.sunset_hour - c.twilight_buffer_hours;
        let dusk_end = c.sunset_hour + c.twilight_buffer_hours;

        assert_eq!(resolve_phase(day_start, &c), ScenePhase::Day);
        assert_eq!(resolve_phase(sunset_start, &c), ScenePhase::Sunset);
        assert_eq!(resolve_phase(c.sunset_hour, &c), ScenePhase::Dusk);
        assert_eq!(resolve_phase(dusk_end, &c), ScenePhase::Dusk);
        assert_eq!(resolve_phase(dusk_end + 0.001, &c), ScenePhase::Night);
    }

    #[test]
    fn early_morning_twilight_is_night() {
        assert_eq!(resolve_phase(6.5, &cfg()), ScenePhase::Night);
        assert_eq!(resolve_phase(7.3, &cfg()), ScenePhase::Day);
    }

    #[test]
    fn over_wide_buffer_removes_day() {
        let c = PhaseConfig {
            twilight_buffer_hours: 7.0,
            ..cfg()
        };
        for hour in 0..24 {
            assert_ne!(resolve_phase(f64::from(hour), &c), ScenePhase::Day);
        }
    }

    #[test]
    fn local_hour_includes_minutes_and_seconds() {
        let time = NaiveTime::from_hms_opt(17, 30, 0).unwrap();
        assert_eq!(local_hour(&time), 17.5);
        let time = NaiveTime::from_hms_opt(6, 15, 0).unwrap();
        assert_eq!(local_hour(&time), 6.25);
        let time = NaiveTime::from_hms_opt(0, 0, 36).unwrap();
        assert!((local_hour(&time) - 0.01).abs() < 1e-12);
    }
}

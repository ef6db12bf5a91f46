use harborlight::{
    config::{CloudConfig, FlockConfig, NormalizerConfig, WaveConfig},
    domain::metrics::RawMetric,
    scene::{
        SceneRng,
        clouds::generate_clouds,
        flocks::{flock_count, generate_flocks},
        normalize, normalize_labor,
        waves::generate_waves,
    },
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_stays_in_unit_range(text in ".{0,16}", number in proptest::num::f64::ANY, fallback in -5.0f64..5.0) {
        for raw in [RawMetric::Text(text.clone()), RawMetric::Number(number), RawMetric::Missing] {
            let ratio = normalize(&raw, fallback);
            prop_assert!((0.0..=1.0).contains(&ratio), "{raw:?} -> {ratio}");
        }
    }

    #[test]
    fn labor_ramp_never_decreases(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let config = NormalizerConfig::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(normalize_labor(lo, &config) <= normalize_labor(hi, &config));
        prop_assert!((0.0..=1.0).contains(&normalize_labor(hi, &config)));
    }

    #[test]
    fn front_wave_dominates_and_crests_fit(r in 0.0f64..=1.0, width in 1u32..4000) {
        let waves = generate_waves(r, &WaveConfig::default(), width);
        prop_assert!(waves.front.amplitude_px > waves.back.amplitude_px);
        prop_assert!(waves.front.fits_band());
        prop_assert!(waves.back.fits_band());
    }

    #[test]
    fn flock_count_is_bounded(activity in 0.0f64..=1.0, seed in any::<u64>()) {
        let config = FlockConfig::default();
        let count = flock_count(activity, &config);
        prop_assert!(count <= 3);
        let flocks = generate_flocks(activity, 390, &config, &mut SceneRng::seeded(seed));
        prop_assert_eq!(flocks.len(), count as usize);
    }

    #[test]
    fn some_cloud_always_lands_left(intensity in 0.0f64..=1.0, seed in any::<u64>()) {
        let config = CloudConfig::default();
        let clouds = generate_clouds(intensity, &config, &mut SceneRng::seeded(seed));
        prop_assert!(clouds.iter().any(|cloud| config.left.contains(cloud.x_percent)));
    }
}

#[test]
fn zero_labor_is_exactly_zero() {
    assert_eq!(normalize_labor(0.0, &NormalizerConfig::default()), 0.0);
}

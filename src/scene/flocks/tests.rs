use super::*;
use crate::scene::SceneRng;

fn cfg() -> FlockConfig {
    FlockConfig::default()
}

#[test]
fn zero_activity_means_no_flocks() {
    assert_eq!(flock_count(0.0, &cfg()), 0);
    let mut rng = SceneRng::seeded(1);
    assert!(generate_flocks(0.0, 390, &cfg(), &mut rng).is_empty());
}

#[test]
fn full_activity_means_three_flocks() {
    assert_eq!(flock_count(1.0, &cfg()), 3);
}

#[test]
fn count_follows_rounded_power_curve() {
    assert_eq!(flock_count(0.1, &cfg()), 0);
    assert_eq!(flock_count(0.25, &cfg()), 1);
    assert_eq!(flock_count(0.6, &cfg()), 2);
    assert_eq!(flock_count(0.9, &cfg()), 3);
}

#[test]
fn count_respects_configured_cap() {
    let config = FlockConfig {
        max_flocks: 1,
        ..cfg()
    };
    assert_eq!(flock_count(1.0, &config), 1);
    let config = FlockConfig {
        max_flocks: 9,
        ..cfg()
    };
    assert_eq!(flock_count(1.0, &config), 3);
}

#[test]
fn bird_count_spans_two_to_six() {
    assert_eq!(birds_per_flock(0.0, &cfg()), 2);
    assert_eq!(birds_per_flock(0.5, &cfg()), 4);
    assert_eq!(birds_per_flock(1.0, &cfg()), 6);
}

#[test]
fn grid_holds_every_bird() {
    for birds in 1..=6 {
        let (rows, cols) = grid_for(birds);
        assert!(rows * cols >= birds);
        assert!(rows <= 2);
    }
    assert_eq!(grid_for(3), (1, 3));
    assert_eq!(grid_for(5), (2, 3));
}

#[test]
fn busier_means_faster_but_floored() {
    assert!(flock_period(0, 1.0, &cfg()) < flock_period(0, 0.2, &cfg()));
    assert_eq!(flock_period(0, 1.0, &cfg()), 8.0);
    let config = FlockConfig {
        activity_speedup_sec: 30.0,
        ..cfg()
    };
    assert_eq!(flock_period(0, 1.0, &config), 7.0);
}

#[test]
fn flocks_are_reproducible_for_a_seed() {
    let a = generate_flocks(0.8, 390, &cfg(), &mut SceneRng::seeded(42));
    let b = generate_flocks(0.8, 390, &cfg(), &mut SceneRng::seeded(42));
    assert_eq!(a, b);
    let c = generate_flocks(0.8, 390, &cfg(), &mut SceneRng::seeded(43));
    assert_ne!(a, c);
}

#[test]
fn birds_stay_inside_their_spread() {
    let mut rng = SceneRng::seeded(9);
    for _ in 0..50 {
        for flock in generate_flocks(1.0, 390, &cfg(), &mut rng) {
            assert_eq!(flock.birds.len(), flock.bird_count as usize);
            for bird in &flock.birds {
                assert!(bird.x_px >= 0.0 && bird.x_px <= flock.horizontal_spread_px);
                assert!(bird.y_px >= 0.0);
            }
        }
    }
}

#[test]
fn reverse_direction_shows_up_about_forty_percent() {
    let mut rng = SceneRng::seeded(2024);
    let mut reverse = 0;
    let mut total = 0;
    for _ in 0..400 {
        for flock in generate_flocks(1.0, 390, &cfg(), &mut rng) {
            total += 1;
            if flock.direction == FlockDirection::Reverse {
                reverse += 1;
            }
        }
    }
    let share = f64::from(reverse) / f64::from(total);
    assert!((0.33..0.47).contains(&share), "reverse share {share}");
}

#[test]
fn spread_is_capped_for_wide_viewports() {
    assert_eq!(horizontal_spread(200, &cfg()), 130.0);
    assert_eq!(horizontal_spread(1200, &cfg()), 280.0);
}

#[test]
fn rescale_keeps_jitter_and_stretches_x() {
    let flocks = generate_flocks(1.0, 200, &cfg(), &mut SceneRng::seeded(8));
    let wider = rescale_flocks(&flocks, 400, &cfg());
    assert_eq!(wider.len(), flocks.len());
    for (before, after) in flocks.iter().zip(&wider) {
        assert_eq!(after.horizontal_spread_px, 260.0);
        assert_eq!(after.period_sec, before.period_sec);
        assert_eq!(after.direction, before.direction);
        for (b, a) in before.birds.iter().zip(&after.birds) {
            assert!((a.x_px - b.x_px * 2.0).abs() < 1e-9);
            assert_eq!(a.y_px, b.y_px);
            assert_eq!(a.silhouette, b.silhouette);
        }
    }
}

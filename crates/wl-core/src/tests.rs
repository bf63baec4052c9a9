//! Unit tests for wl-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LocationId, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = LocationId(4);
        assert_eq!(id.index(), 4);
        assert_eq!(LocationId::try_from(4usize).unwrap(), id);
    }

    #[test]
    fn oversized_index_rejected() {
        assert!(ZoneId::try_from(usize::MAX).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(LocationId(7).to_string(), "LocationId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Displacement, Point};

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(2.0, 2.0);
        let b = Point::new(5.0, 6.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rounded_to_one_decimal() {
        let p = Point::new(3.14159, -2.71828).rounded();
        assert_eq!(p, Point::new(3.1, -2.7));
    }

    #[test]
    fn offset_applies_displacement() {
        let p = Point::ORIGIN.offset(Displacement { dx: 1.5, dz: -0.5 });
        assert_eq!(p, Point::new(1.5, -0.5));
    }

    #[test]
    fn non_finite_detected() {
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(Point::new(1000.0, -1000.0).is_finite());
    }
}

#[cfg(test)]
mod time {
    use chrono::{TimeZone, Utc};

    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn clock_maps_ticks_to_wall_time() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap();
        let mut clock = SimClock::new(start, 500);
        assert_eq!(clock.now(), start);
        clock.advance();
        clock.advance();
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
        assert_eq!(clock.elapsed_millis(), 1_000);
    }

    #[test]
    fn delta_secs_matches_tick_length() {
        let clock = SimClock::new(Utc::now(), 16);
        assert!((clock.delta_secs() - 0.016).abs() < 1e-12);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(Utc::now(), 16);
        assert_eq!(clock.ticks_for_secs(30.0), 1_875);
        assert_eq!(clock.ticks_for_secs(0.001), 1);
        assert_eq!(clock.ticks_for_secs(0.0), 1);
    }

    #[test]
    fn display_shows_elapsed() {
        let mut clock = SimClock::new(Utc::now(), 1_000);
        for _ in 0..3_661 {
            clock.advance();
        }
        assert_eq!(clock.to_string(), "T3661 (+01:01:01)");
    }

    #[test]
    fn config_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.end_tick(), None);
        assert_eq!(config.sample_interval_ticks(), 1_875);
    }

    #[test]
    fn config_rejects_zero_tick() {
        let config = SimConfig { tick_millis: 0, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_deserializes_partial_json() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "seed": 9, "total_ticks": 120 }"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.end_tick(), Some(Tick(120)));
        assert_eq!(config.tick_millis, 16);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentRng, RandomSource, ScriptedRng};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = AgentRng::new(42);
        let mut b = AgentRng::new(42);
        let xs: Vec<usize> = (0..32).map(|_| a.pick(7)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.pick(7)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&i| i < 7));
    }

    #[test]
    fn scripted_replays_and_cycles() {
        let mut rng = ScriptedRng::new(vec![1, 0, 5]);
        assert_eq!(rng.pick(3), 1);
        assert_eq!(rng.pick(3), 0);
        assert_eq!(rng.pick(3), 2); // 5 % 3
        assert_eq!(rng.pick(3), 1); // wraps
        assert_eq!(rng.picks(), 4);
    }

    #[test]
    fn empty_script_picks_zero() {
        let mut rng = ScriptedRng::new(Vec::new());
        assert_eq!(rng.pick(4), 0);
    }
}

//! Unit tests for wl-brain.

use std::io::Cursor;

use wl_core::{AgentRng, LocationId, Point, ScriptedRng};

use crate::{
    load_catalog_reader, Brain, BrainError, Location, LocationCatalog, MotionConfig, Phase,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f64 = 0.016;

/// Workspace (5,5) and Ideas (15,5), one activity each.
fn two_spot_catalog() -> LocationCatalog {
    LocationCatalog::new(vec![
        Location::new("Workspace", 5.0, 5.0, &["working"], 15.0),
        Location::new("Ideas", 15.0, 5.0, &["dreaming"], 10.0),
    ])
    .unwrap()
}

fn brain(catalog: LocationCatalog) -> Brain {
    Brain::new(catalog, MotionConfig::default()).unwrap()
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog {
    use super::*;

    #[test]
    fn builtin_catalogs_are_valid() {
        assert_eq!(LocationCatalog::city().len(), 7);
        assert_eq!(LocationCatalog::studio().len(), 5);
        let city: Vec<Location> = LocationCatalog::city().into();
        assert!(LocationCatalog::new(city).is_ok());
    }

    #[test]
    fn single_entry_rejected() {
        let err = LocationCatalog::new(vec![Location::new("Only", 0.0, 0.0, &["x"], 1.0)]).unwrap_err();
        assert!(matches!(err, BrainError::CatalogTooSmall(1)));
        assert!(matches!(LocationCatalog::new(Vec::new()), Err(BrainError::CatalogTooSmall(0))));
    }

    #[test]
    fn malformed_entries_rejected() {
        let ok = Location::new("A", 0.0, 0.0, &["a"], 1.0);
        let cases = [
            Location::new("", 1.0, 1.0, &["a"], 1.0),
            Location::new("B", f64::NAN, 1.0, &["a"], 1.0),
            Location::new("B", 1.0, 1.0, &[], 1.0),
            Location::new("B", 1.0, 1.0, &["  "], 1.0),
            Location::new("B", 1.0, 1.0, &["a"], 0.0),
            Location::new("B", 1.0, 1.0, &["a"], f64::INFINITY),
        ];
        for bad in cases {
            let err = LocationCatalog::new(vec![ok.clone(), bad.clone()]).unwrap_err();
            assert!(
                matches!(err, BrainError::InvalidLocation { index: 1, .. }),
                "{bad:?} gave {err}"
            );
        }
    }

    #[test]
    fn find_by_name() {
        let c = LocationCatalog::city();
        assert_eq!(c.find("Old Town"), Some(LocationId(6)));
        assert_eq!(c.find("Atlantis"), None);
        assert_eq!(c.location(LocationId(1)).position(), Point::new(30.0, 0.0));
    }

    #[test]
    fn json_goes_through_validation() {
        let one = r#"[{ "name": "Solo", "x": 0, "z": 0, "activities": ["a"], "duration": 5 }]"#;
        assert!(serde_json::from_str::<LocationCatalog>(one).is_err());

        let two = r#"[
            { "name": "A", "x": 0, "z": 0, "activities": ["a"], "duration": 5 },
            { "name": "B", "x": 3, "z": 4, "activities": ["b", "c"], "duration": 2.5 }
        ]"#;
        let c: LocationCatalog = serde_json::from_str(two).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.location(LocationId(1)).activities, vec!["b", "c"]);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    #[test]
    fn loads_pipe_separated_activities() {
        let csv = "name,x,z,activities,duration\n\
                   Workspace,5,5,working|thinking,15\n\
                   Ideas, 15 ,5,brainstorming | dreaming,10\n";
        let c = load_catalog_reader(Cursor::new(csv)).unwrap();
        assert_eq!(c.len(), 2);
        let ideas = c.location(LocationId(1));
        assert_eq!(ideas.name, "Ideas");
        assert_eq!(ideas.x, 15.0);
        assert_eq!(ideas.activities, vec!["brainstorming", "dreaming"]);
    }

    #[test]
    fn bad_number_is_parse_error() {
        let csv = "name,x,z,activities,duration\nA,zero,0,a,1\nB,1,1,b,1\n";
        assert!(matches!(load_catalog_reader(Cursor::new(csv)), Err(BrainError::Parse(_))));
    }

    #[test]
    fn single_row_is_config_error() {
        let csv = "name,x,z,activities,duration\nA,0,0,a,1\n";
        assert!(matches!(load_catalog_reader(Cursor::new(csv)), Err(BrainError::CatalogTooSmall(1))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = crate::load_catalog_csv(std::path::Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, BrainError::Io(_)));
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn rejects_bad_motion() {
        let bad = MotionConfig { speed: 0.0, ..MotionConfig::default() };
        assert!(matches!(Brain::new(two_spot_catalog(), bad), Err(BrainError::Motion(_))));
        let bad = MotionConfig { arrival_threshold: -1.0, ..MotionConfig::default() };
        assert!(Brain::new(two_spot_catalog(), bad).is_err());
    }

    #[test]
    fn first_update_chooses_and_moves() {
        let mut b = brain(two_spot_catalog());
        let mut rng = ScriptedRng::new([0]);
        assert_eq!(b.phase(), Phase::Idle);
        assert_eq!(b.current_thought(), "Exploring...");

        let step = b.update(DT, Point::new(2.0, 2.0), &mut rng);
        assert!(step.moving);
        assert_eq!(step.headed_for.as_ref().unwrap().location, LocationId(0));
        assert_eq!(b.phase(), Phase::Traveling);
        assert_eq!(b.current_thought(), "Heading to Workspace to working");

        // Direction is toward (5,5), magnitude speed * dt.
        let d = step.displacement;
        assert!((d.magnitude() - 3.0 * DT).abs() < 1e-12);
        assert!((d.dx - d.dz).abs() < 1e-12 && d.dx > 0.0);
    }

    #[test]
    fn step_never_overshoots() {
        let motion = MotionConfig { speed: 100.0, arrival_threshold: 0.5 };
        let mut b = Brain::new(two_spot_catalog(), motion).unwrap();
        let mut rng = ScriptedRng::new([0]);
        let step = b.update(1.0, Point::new(2.0, 2.0), &mut rng);
        let landed = Point::new(2.0, 2.0).offset(step.displacement);
        assert!(landed.distance(Point::new(5.0, 5.0)) < 1e-9);
    }

    #[test]
    fn dwell_within_threshold_counts_down() {
        let mut b = brain(two_spot_catalog());
        let mut rng = ScriptedRng::new([0]);
        let at = Point::new(5.2, 5.1);

        let first = b.update(1.0, at, &mut rng);
        assert!(!first.moving);
        assert!(first.displacement.is_zero());
        assert_eq!(first.arrived.unwrap().activity, "working");
        assert_eq!(b.phase(), Phase::Dwelling);
        assert_eq!(b.current_thought(), "working at Workspace");

        let mut last = b.dwell_remaining();
        for _ in 0..13 {
            let step = b.update(1.0, at, &mut rng);
            assert!(!step.moving);
            assert!(step.arrived.is_none(), "arrival fires once");
            assert!(step.headed_for.is_none());
            assert!(b.dwell_remaining() < last);
            last = b.dwell_remaining();
        }
        // 15 s dwell: the 15th call hits zero and moves on to Ideas.
        let step = b.update(1.0, at, &mut rng);
        assert!(!step.moving);
        assert_eq!(step.headed_for.unwrap().location, LocationId(1));
        assert_eq!(b.dwell_remaining(), 10.0);
        assert_eq!(b.phase(), Phase::Traveling);
    }

    #[test]
    fn threshold_is_strict() {
        let mut b = brain(two_spot_catalog());
        let mut rng = ScriptedRng::new([0]);
        let step = b.update(DT, Point::new(5.5, 5.0), &mut rng);
        assert!(step.moving);
    }

    #[test]
    fn skips_current_location() {
        let mut b = brain(LocationCatalog::studio());
        // First pick: index 2 of 5 (Thinking Space), activity 0.
        let mut rng = ScriptedRng::new([2, 0, 2, 1]);
        b.update(1.0, Point::new(5.0, 15.0), &mut rng);
        assert_eq!(b.current(), Some(LocationId(2)));

        // Next pick draws 2 of the 4 remaining: slot 2 is skipped, so 3.
        let visit = b.choose_new_destination(&mut rng);
        assert_eq!(visit.location, LocationId(3));
        assert_eq!(visit.activity, "creating");
    }

    #[test]
    fn never_repeats_current_location() {
        let motion = MotionConfig { speed: 1_000.0, arrival_threshold: 0.5 };
        for seed in 0..8 {
            let mut b = Brain::new(LocationCatalog::city(), motion).unwrap();
            let mut rng = AgentRng::new(seed);
            let mut pos = Point::new(2.0, 2.0);
            let mut arrivals = Vec::new();
            for _ in 0..2_000 {
                let step = b.update(1.0, pos, &mut rng);
                if let Some(visit) = &step.headed_for {
                    assert_ne!(Some(visit.location), b.current());
                }
                if let Some(visit) = step.arrived {
                    arrivals.push(visit.location);
                }
                pos = pos.offset(step.displacement);
            }
            assert!(arrivals.len() > 50, "seed {seed}: only {} arrivals", arrivals.len());
            assert!(arrivals.windows(2).all(|w| w[0] != w[1]), "seed {seed}");
        }
    }

    #[test]
    fn two_spot_scenario() {
        let mut b = brain(two_spot_catalog());
        let mut rng = AgentRng::new(7);
        let mut pos = Point::new(2.0, 2.0);

        // Travel until the first stop.
        let mut ticks = 0;
        let first = loop {
            let step = b.update(DT, pos, &mut rng);
            pos = pos.offset(step.displacement);
            ticks += 1;
            assert!(ticks < 10_000, "never arrived");
            if !step.moving {
                break step.arrived.unwrap();
            }
        };
        let duration = b.location(first.location).duration;

        // Stay put for `duration` seconds, then head for the other spot.
        let mut still = 1;
        let next = loop {
            let step = b.update(DT, pos, &mut rng);
            assert!(!step.moving);
            still += 1;
            if let Some(next) = step.headed_for {
                break next;
            }
        };
        let dwelt = still as f64 * DT;
        assert!((dwelt - duration).abs() <= 2.0 * DT, "dwelt {dwelt}s, expected {duration}s");
        assert_ne!(next.location, first.location);

        let step = b.update(DT, pos, &mut rng);
        assert!(step.moving);
    }
}

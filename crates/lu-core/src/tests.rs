//! Unit tests for lu-core primitives.

#[cfg(test)]
mod ids {
    use crate::{HouseholdId, NodeId, ZoneId};

    #[test]
    fn index_and_get() {
        let id = HouseholdId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.get(), 42);
        assert_eq!(HouseholdId::from(42u32), id);
    }

    #[test]
    fn ordering() {
        assert!(ZoneId(0) < ZoneId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn display() {
        assert_eq!(HouseholdId(7).to_string(), "HouseholdId(7)");
    }

    #[test]
    fn serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&ZoneId(9)).unwrap(), "9");
    }
}

#[cfg(test)]
mod year {
    use crate::Year;

    #[test]
    fn arithmetic() {
        assert_eq!(Year(2010).next(), Year(2011));
        assert_eq!(Year(2010) + 3, Year(2013));
        assert_eq!(Year(2015).since(Year(2010)), 5);
        assert_eq!(Year(2010).since(Year(2015)), 0);
    }

    #[test]
    fn range_is_half_open() {
        let years: Vec<_> = Year::range(Year(2010), Year(2013)).collect();
        assert_eq!(years, vec![Year(2010), Year(2011), Year(2012)]);
    }
}

#[cfg(test)]
mod config {
    use crate::{Implementation, RunConfig, Year};

    fn base() -> RunConfig {
        RunConfig::new("test", Year(2010), Year(2015))
    }

    #[test]
    fn minimal_is_valid() {
        base().validate().unwrap();
    }

    #[test]
    fn end_before_start_rejected() {
        let cfg = RunConfig::new("bad", Year(2012), Year(2012));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_threads_rejected() {
        let mut cfg = base();
        cfg.number_of_threads = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn year_set_outside_period_rejected() {
        let mut cfg = base();
        cfg.skim_years.insert(Year(2030));
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("skim_years"), "{err}");
    }

    #[test]
    fn skim_refresh_never_on_start_year() {
        let mut cfg = base();
        cfg.skim_years.extend([Year(2010), Year(2012)]);
        for y in cfg.years() {
            let expected = cfg.skim_years.contains(&y) && y != cfg.start_year;
            assert_eq!(cfg.should_refresh_skims(y), expected, "year {y}");
        }
        assert!(!cfg.should_refresh_skims(Year(2010)));
        assert!(cfg.should_refresh_skims(Year(2012)));
    }

    #[test]
    fn scaling_and_transport_gates_are_membership() {
        let mut cfg = base();
        cfg.scaling_years.insert(Year(2011));
        cfg.transport_model_years.insert(Year(2010));
        assert!(cfg.should_scale(Year(2011)));
        assert!(!cfg.should_scale(Year(2012)));
        assert!(cfg.should_run_transport_model(Year(2010)));
        assert!(!cfg.should_run_transport_model(Year(2011)));
    }

    #[test]
    fn summary_interval() {
        let mut cfg = base();
        cfg.summary_interval_years = 2;
        assert!(cfg.should_write_summary(Year(2010)));
        assert!(!cfg.should_write_summary(Year(2011)));
        assert!(cfg.should_write_summary(Year(2012)));
        cfg.summary_interval_years = 0;
        assert!(!cfg.should_write_summary(Year(2010)));
    }

    #[test]
    fn parses_json_with_defaults() {
        let cfg = RunConfig::from_json_str(
            r#"{
                "scenario_name": "base",
                "implementation": "maryland",
                "base_year": 2010,
                "start_year": 2010,
                "end_year": 2012,
                "seed": 7,
                "number_of_threads": 2,
                "skim_years": [2011]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.implementation, Implementation::Maryland);
        assert!(!cfg.implementation.supports_av_switching());
        assert_eq!(cfg.seed, 7);
        assert!(cfg.scaling_years.is_empty());
        assert!(cfg.skim_years.contains(&Year(2011)));
        assert_eq!(cfg.summary_interval_years, 1);
    }

    #[test]
    fn json_validation_runs() {
        let err = RunConfig::from_json_str(
            r#"{"scenario_name":"x","base_year":2010,"start_year":2010,"end_year":2009}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(
            &path,
            r#"{"scenario_name":"f","base_year":2011,"start_year":2011,"end_year":2013}"#,
        )
        .unwrap();
        let cfg = RunConfig::from_json_path(&path).unwrap();
        assert_eq!(cfg.years().count(), 2);
    }
}

#[cfg(test)]
mod location {
    use crate::{GeoPoint, Location, ZoneId};

    #[test]
    fn zone_of_both_levels() {
        let z = Location::Zone(ZoneId(3));
        let p = Location::point(ZoneId(4), GeoPoint::new(48.1, 11.5));
        assert_eq!(z.zone(), ZoneId(3));
        assert_eq!(p.zone(), ZoneId(4));
        assert!(z.is_zone_level());
        assert!(!p.is_zone_level());
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }
}

#[cfg(test)]
mod mode {
    use crate::Period;

    #[test]
    fn periods() {
        assert_eq!(Period::from_seconds(8 * 3_600), Period::Peak);
        assert_eq!(Period::from_seconds(9 * 3_600), Period::OffPeak);
        assert_eq!(Period::from_seconds(17 * 3_600 + 59), Period::Peak);
        assert_eq!(Period::from_seconds(3 * 3_600), Period::OffPeak);
        assert_eq!(Period::from_seconds(86_400 + 7 * 3_600), Period::Peak);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        let xs: Vec<u64> = (0..16).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn children_are_deterministic_and_distinct() {
        let mut a = SimRng::new(5);
        let mut b = SimRng::new(5);
        let mut a1 = a.child(1);
        let mut b1 = b.child(1);
        assert_eq!(a1.random::<u64>(), b1.random::<u64>());
        let mut a2 = a.child(2);
        assert_ne!(a1.random::<u64>(), a2.random::<u64>());
    }

    #[test]
    fn gen_bool_clamps() {
        let mut r = SimRng::new(1);
        assert!(r.gen_bool(2.0));
        assert!(!r.gen_bool(-1.0));
    }
}

#[cfg(test)]
mod issues {
    use crate::{IssueKind, Issues, Year};

    #[test]
    fn counts_and_reset() {
        let mut issues = Issues::new();
        issues.reset_for_period(Year(2010));
        issues.increment(IssueKind::NoVacantJob, "person 1");
        issues.increment(IssueKind::NoVacantJob, "person 2");
        issues.increment(IssueKind::MissingRecord, "dwelling 9");
        assert_eq!(issues.count(IssueKind::NoVacantJob), 2);
        assert_eq!(issues.total(), 3);
        assert_eq!(issues.period(), Some(Year(2010)));

        issues.reset_for_period(Year(2011));
        assert!(issues.is_empty());
        assert_eq!(issues.total(), 0);
        assert_eq!(issues.period(), Some(Year(2011)));
    }

    #[test]
    fn examples_are_capped() {
        let mut issues = Issues::new();
        for i in 0..10 {
            issues.increment(IssueKind::ZeroProbability, i);
        }
        let summary = issues.summarize();
        assert_eq!(summary.total(), 10);
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].examples, vec!["0", "1", "2"]);
    }

    #[test]
    fn summary_is_ordered_by_kind() {
        let mut issues = Issues::new();
        issues.increment(IssueKind::Unreachable, "a");
        issues.increment(IssueKind::ZeroProbability, "b");
        let kinds: Vec<_> = issues.summarize().entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::ZeroProbability, IssueKind::Unreachable]);
    }
}

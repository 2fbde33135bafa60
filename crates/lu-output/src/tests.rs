//! Integration tests for lu-output.

#[cfg(test)]
mod fixture {
    use std::sync::Arc;

    use lu_core::{DwellingId, GeoPoint, HouseholdId, JobId, Location, PersonId, RegionId, Year, ZoneId};
    use lu_data::{
        DataContainer, Dwelling, DwellingType, DwellingUsage, Geography, Household, Job, Person, Role, Sex, Zone,
    };
    use lu_spatial::{DijkstraRouter, RoadNetworkBuilder};
    use lu_travel::{NetworkState, NetworkTravelTimes, ZoneSystem};

    pub const YEAR: Year = Year(2011);

    fn dwelling(id: u32, zone: u32, price: f64, point: Option<GeoPoint>) -> Dwelling {
        Dwelling {
            id:          DwellingId(id),
            zone:        ZoneId(zone),
            point,
            household:   None,
            kind:        DwellingType::Mf234,
            bedrooms:    2,
            quality:     2,
            price,
            restriction: 0.0,
            usage:       DwellingUsage::Rented,
            year_built:  1980,
        }
    }

    /// 2 zones; 3 households, 4 persons, 4 dwellings (one vacant), 2 jobs
    /// (one vacant).  Dwelling 1 and job 1 carry micro locations.
    pub fn population() -> DataContainer {
        let mut g = Geography::new();
        g.add_zone(Zone::new(ZoneId(1), RegionId(1), GeoPoint::new(0.0, 0.0), 2.0)).unwrap();
        g.add_zone(Zone::new(ZoneId(2), RegionId(1), GeoPoint::new(0.0, 0.01), 3.0)).unwrap();
        let mut data = DataContainer::new(g);

        data.add_dwelling(dwelling(1, 1, 1_000.0, Some(GeoPoint::new(0.001, 0.002)))).unwrap();
        data.add_dwelling(dwelling(2, 1, 800.0, None)).unwrap();
        data.add_dwelling(dwelling(3, 2, 700.0, None)).unwrap();
        data.add_dwelling(dwelling(4, 2, 500.0, None)).unwrap();
        data.add_job(Job {
            id:       JobId(1),
            location: Location::point(ZoneId(1), GeoPoint::new(0.003, 0.004)),
            worker:   None,
            sector:   "office".into(),
        })
        .unwrap();
        data.add_job(Job {
            id:       JobId(2),
            location: Location::Zone(ZoneId(2)),
            worker:   None,
            sector:   "retail".into(),
        })
        .unwrap();

        for hh in 1..=3 {
            let mut h = Household::new(HouseholdId(hh));
            h.autos = hh - 1;
            data.add_household(h).unwrap();
        }
        for (id, hh, age, sex, role, income) in [
            (1, 1, 35, Sex::Female, Role::Married, 50_000.0),
            (2, 1, 36, Sex::Male, Role::Married, 40_000.0),
            (3, 2, 24, Sex::Female, Role::Single, 30_000.0),
            (4, 3, 81, Sex::Male, Role::Single, 0.0),
        ] {
            let mut p = Person::new(PersonId(id), HouseholdId(hh), age, sex, role);
            p.income = income;
            p.license = age < 80;
            data.add_person(p).unwrap();
        }
        for (hh, d) in [(1, 1), (2, 2), (3, 3)] {
            data.move_household(HouseholdId(hh), DwellingId(d)).unwrap();
        }
        data.assign_job(PersonId(1), JobId(1)).unwrap();
        data.households.clear_updated();
        data
    }

    pub fn travel(data: &DataContainer) -> NetworkTravelTimes {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_road(n0, n1, 1_000.0, 60_000);
        let zones = ZoneSystem::from_geography(&data.geography);
        NetworkTravelTimes::new(zones, NetworkState::free_flow(Arc::new(b.build())), DijkstraRouter, 1).unwrap()
    }

    pub fn read(path: &std::path::Path) -> (Vec<String>, Vec<::csv::StringRecord>) {
        let mut rdr = ::csv::Reader::from_path(path).expect("open csv");
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }
}

#[cfg(test)]
mod rows {
    use lu_core::Year;

    use super::fixture::{YEAR, population};
    use crate::{DwellingRow, JobRow, SummaryRow};

    #[test]
    fn summary_counts_and_averages() {
        let row = SummaryRow::from_data(YEAR, &population());
        assert_eq!(row.year, 2011);
        assert_eq!(row.households, 3);
        assert_eq!(row.persons, 4);
        assert_eq!(row.dwellings, 4);
        assert_eq!(row.vacant_dwellings, 1);
        assert_eq!(row.jobs, 2);
        assert_eq!(row.vacant_jobs, 1);
        assert!((row.dwelling_vacancy - 0.25).abs() < 1e-12);
        assert!((row.job_vacancy - 0.5).abs() < 1e-12);
        assert!((row.avg_price - 750.0).abs() < 1e-9);
        assert!((row.avg_income - 40_000.0).abs() < 1e-9);
    }

    #[test]
    fn empty_population_has_zero_ratios() {
        let data = lu_data::DataContainer::new(lu_data::Geography::new());
        let row = SummaryRow::from_data(Year(2020), &data);
        assert_eq!(row.households, 0);
        assert_eq!(row.dwelling_vacancy, 0.0);
        assert_eq!(row.avg_price, 0.0);
        assert_eq!(row.avg_income, 0.0);
    }

    #[test]
    fn locations_split_into_optional_coordinates() {
        let data = population();
        let jobs: Vec<JobRow> = data.jobs.iter().map(JobRow::from).collect();
        assert_eq!((jobs[0].zone, jobs[0].lat, jobs[0].lon), (1, Some(0.003), Some(0.004)));
        assert_eq!((jobs[1].zone, jobs[1].lat, jobs[1].lon), (2, None, None));
        assert_eq!(jobs[0].worker, Some(1));
        assert_eq!(jobs[1].worker, None);

        let dwellings: Vec<DwellingRow> = data.dwellings.iter().map(DwellingRow::from).collect();
        assert_eq!(dwellings[0].lat, Some(0.001));
        assert_eq!(dwellings[3].household, None);
        assert_eq!(dwellings[0].usage, "rented");
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use lu_core::{DwellingId, HouseholdId, JobId, PersonId};

    use super::fixture::{YEAR, population, read};
    use crate::{CsvWriter, ExportWriter, IssueRow, OutputError, SummaryRow, TimerRow, YearRow};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        for (file, header) in [
            ("summaries.csv", SummaryRow::HEADER),
            ("years.csv", YearRow::HEADER),
            ("issues.csv", IssueRow::HEADER),
            ("timers.csv", TimerRow::HEADER),
        ] {
            let (headers, rows) = read(&dir.path().join(file));
            assert_eq!(headers, header, "{file}");
            assert!(rows.is_empty(), "{file}");
        }
    }

    #[test]
    fn output_dir_is_created() {
        let dir = tmp();
        let nested = dir.path().join("scenario").join("out");
        let w = CsvWriter::new(&nested).unwrap();
        assert_eq!(w.dir(), nested.as_path());
        assert!(nested.join("summaries.csv").exists());
    }

    #[test]
    fn summary_rows_written_in_order() {
        let dir = tmp();
        let data = population();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_summary(&SummaryRow::from_data(YEAR, &data)).unwrap();
        w.write_summary(&SummaryRow::from_data(YEAR.next(), &data)).unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir.path().join("summaries.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "2011");
        assert_eq!(&rows[0][1], "3"); // households
        assert_eq!(&rows[1][0], "2012");
    }

    #[test]
    fn finish_is_idempotent_and_closes_writer() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        let err = w.write_timers(&[TimerRow { step: "x".into(), secs: 1.0 }]).unwrap_err();
        assert!(matches!(err, OutputError::Finished));
    }

    #[test]
    fn population_export_loads_back() {
        let dir = tmp();
        let data = population();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_population(YEAR, &data).unwrap();
        w.finish().unwrap();
        assert_eq!(w.exported(), &[YEAR]);

        let export = w.population_dir(YEAR);
        assert!(export.ends_with("population_2011"));
        let loaded = lu_data::load_population_dir(&export).unwrap();

        assert_eq!(loaded.geography.zones.len(), 2);
        assert_eq!(loaded.households.len(), 3);
        assert_eq!(loaded.persons.len(), 4);
        assert_eq!(loaded.dwellings.len(), 4);
        assert_eq!(loaded.jobs.len(), 2);
        assert_eq!(loaded.households.get(HouseholdId(2)).unwrap().dwelling, Some(DwellingId(2)));
        assert_eq!(loaded.households.get(HouseholdId(3)).unwrap().autos, 2);
        assert!(loaded.dwellings.get(DwellingId(4)).unwrap().is_vacant());
        assert_eq!(loaded.jobs.get(JobId(1)).unwrap().worker, Some(PersonId(1)));
        assert_eq!(loaded.jobs.get(JobId(1)).unwrap().location, data.jobs.get(JobId(1)).unwrap().location);
        assert_eq!(loaded.persons.get(PersonId(4)).unwrap().age, 81);
        assert!(!loaded.persons.get(PersonId(4)).unwrap().license);
        loaded.check_invariants().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use std::time::Duration;

    use lu_core::{IssueEntry, IssueKind, IssueSummary, RunConfig, Year, YearSet};
    use lu_data::DataContainer;
    use lu_models::{ScalingReport, YearCounters};
    use lu_sim::{EventTally, ModelBuilder, ModelObserver, TimeTracker, YearReport};

    use super::fixture::{YEAR, population, read, travel};
    use crate::{
        CsvWriter, ExportWriter, IssueRow, ModelOutputObserver, OutputError, OutputResult, SummaryRow,
        TimerRow, YearRow,
    };

    /// Writer that records calls and fails every write after `fail_after`.
    #[derive(Default)]
    struct Flaky {
        calls:      Vec<&'static str>,
        fail_after: Option<usize>,
        finished:   usize,
    }

    impl Flaky {
        fn call(&mut self, name: &'static str) -> OutputResult<()> {
            self.calls.push(name);
            match self.fail_after {
                Some(n) if self.calls.len() > n => Err(OutputError::Io(std::io::Error::other(name))),
                _ => Ok(()),
            }
        }
    }

    impl ExportWriter for Flaky {
        fn write_summary(&mut self, _: &SummaryRow) -> OutputResult<()> {
            self.call("summary")
        }
        fn write_year(&mut self, _: &YearRow) -> OutputResult<()> {
            self.call("year")
        }
        fn write_issues(&mut self, _: &[IssueRow]) -> OutputResult<()> {
            self.call("issues")
        }
        fn write_population(&mut self, _: Year, _: &DataContainer) -> OutputResult<()> {
            self.call("population")
        }
        fn write_timers(&mut self, _: &[TimerRow]) -> OutputResult<()> {
            self.call("timers")
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn report(issues: Vec<IssueEntry>) -> YearReport {
        YearReport {
            year:     YEAR,
            events:   EventTally::default(),
            counters: YearCounters { car_changes: 2, av_switches: 1 },
            scaling:  Some(ScalingReport { added: 3, removed: 0 }),
            issues:   IssueSummary { period: Some(YEAR), entries: issues },
        }
    }

    #[test]
    fn year_row_from_report() {
        let row = YearRow::from(&report(Vec::new()));
        assert_eq!(row.year, 2011);
        assert_eq!((row.car_changes, row.av_switches), (2, 1));
        assert_eq!((row.households_added, row.households_removed), (3, 0));
        assert_eq!(row.issues, 0);
    }

    #[test]
    fn issues_written_only_when_present() {
        let mut obs = ModelOutputObserver::new(Flaky::default());
        obs.on_year_end(&report(Vec::new()));
        let entry = IssueEntry { kind: IssueKind::NoVacantDwelling, count: 4, examples: vec!["HouseholdId(9)".into()] };
        obs.on_year_end(&report(vec![entry]));
        assert_eq!(obs.writer().calls, ["year", "year", "issues"]);

        let rows = IssueRow::from_report(&report(vec![IssueEntry {
            kind:     IssueKind::NoVacantDwelling,
            count:    4,
            examples: Vec::new(),
        }]));
        assert_eq!(rows[0].kind, IssueKind::NoVacantDwelling.as_str());
        assert_eq!(rows[0].count, 4);
        assert_eq!(rows[0].example, "");
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = ModelOutputObserver::new(Flaky { fail_after: Some(1), ..Flaky::default() });
        let data = population();
        obs.on_summary(YEAR, &data);
        obs.on_population_export(YEAR, &data);
        obs.on_summary(YEAR, &data);

        let err = obs.take_error().expect("stored error");
        assert_eq!(err.to_string(), "I/O error: population");
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn run_end_writes_timers_and_finishes() {
        let mut timers = TimeTracker::new();
        timers.record("events", Duration::from_millis(30));
        timers.record_year(YEAR, Duration::from_millis(50));

        let mut obs = ModelOutputObserver::new(Flaky::default());
        obs.on_run_end(YEAR.next(), &timers);
        let writer = obs.into_writer();
        assert_eq!(writer.calls, ["timers"]);
        assert_eq!(writer.finished, 1);
    }

    #[test]
    fn full_run_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::new("output-test", YEAR, Year(2014));
        config.seed = 11;
        config.summary_interval_years = 2;
        config.write_synthetic_population = true;
        config.synthetic_population_years = YearSet::from([Year(2012)]);

        let data = population();
        let travel = travel(&data);
        let mut model = ModelBuilder::new(config, data, travel).default_event_models().build().unwrap();
        let mut obs = ModelOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let outcome = model.run(&mut obs).unwrap();
        assert!(outcome.is_completed());
        assert!(obs.take_error().is_none());

        let writer = obs.into_writer();
        assert_eq!(writer.exported(), &[Year(2012), Year(2014)]);

        let (_, years) = read(&dir.path().join("years.csv"));
        let simulated: Vec<&str> = years.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(simulated, ["2011", "2012", "2013"]);

        // Every second year from the base year, then the final state.
        let (_, summaries) = read(&dir.path().join("summaries.csv"));
        let summarized: Vec<&str> = summaries.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(summarized, ["2011", "2013", "2014"]);
        let final_households: usize = summaries[2][1].parse().unwrap();
        assert_eq!(final_households, model.data().households.len());

        let (_, timers) = read(&dir.path().join("timers.csv"));
        assert!(timers.iter().any(|r| &r[0] == "events"));
        assert_eq!(timers.last().map(|r| r[0].to_owned()), Some("total".to_owned()));

        let reloaded = lu_data::load_population_dir(&writer.population_dir(Year(2014))).unwrap();
        assert_eq!(reloaded.persons.len(), model.data().persons.len());
        assert_eq!(reloaded.dwellings.len(), model.data().dwellings.len());
    }
}

//! Unit tests for lu-data.

use lu_core::{DwellingId, GeoPoint, HouseholdId, JobId, Location, PersonId, RegionId, SchoolId, ZoneId};

use crate::{
    DataContainer, Dwelling, DwellingType, DwellingUsage, Geography, Household, Job, Person, Role,
    School, SchoolType, Sex, Zone,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn geography() -> Geography {
    let mut g = Geography::new();
    g.add_zone(Zone::new(ZoneId(1), RegionId(1), GeoPoint::new(48.10, 11.50), 2.0)).unwrap();
    g.add_zone(Zone::new(ZoneId(2), RegionId(1), GeoPoint::new(48.12, 11.52), 4.0)).unwrap();
    g
}

fn dwelling(id: u32, zone: u32, price: f64) -> Dwelling {
    Dwelling {
        id:          DwellingId(id),
        zone:        ZoneId(zone),
        point:       None,
        household:   None,
        kind:        DwellingType::Mf234,
        bedrooms:    2,
        quality:     3,
        price,
        restriction: 0.0,
        usage:       DwellingUsage::Default,
        year_built:  1990,
    }
}

fn job(id: u32, zone: u32) -> Job {
    Job { id: JobId(id), location: Location::Zone(ZoneId(zone)), worker: None, sector: "serv".into() }
}

/// Two dwellings, one job, one school, one household of two persons living
/// in dwelling 1.
fn small() -> DataContainer {
    let mut data = DataContainer::new(geography());
    data.add_dwelling(dwelling(1, 1, 800.0)).unwrap();
    data.add_dwelling(dwelling(2, 2, 1_000.0)).unwrap();
    data.add_job(job(1, 2)).unwrap();
    data.add_school(School {
        id:        SchoolId(1),
        kind:      SchoolType::Primary,
        capacity:  1,
        occupancy: 0,
        location:  Location::Zone(ZoneId(1)),
    })
    .unwrap();
    data.add_household(Household::new(HouseholdId(1))).unwrap();
    let mut adult = Person::new(PersonId(1), HouseholdId(1), 40, Sex::Female, Role::Single);
    adult.income = 30_000.0;
    data.add_person(adult).unwrap();
    data.add_person(Person::new(PersonId(2), HouseholdId(1), 8, Sex::Male, Role::Child)).unwrap();
    data.move_household(HouseholdId(1), DwellingId(1)).unwrap();
    data.households.clear_updated();
    data
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;
    use crate::{DataError, Registry};

    #[test]
    fn iteration_is_insertion_order() {
        let mut r: Registry<Household> = Registry::new();
        for id in [5, 1, 9, 3] {
            r.add(Household::new(HouseholdId(id))).unwrap();
        }
        assert_eq!(r.ids(), vec![HouseholdId(5), HouseholdId(1), HouseholdId(9), HouseholdId(3)]);
        r.remove(HouseholdId(1)).unwrap();
        assert_eq!(r.ids(), vec![HouseholdId(5), HouseholdId(9), HouseholdId(3)]);
    }

    #[test]
    fn unknown_lookup_and_removal_fail() {
        let mut r: Registry<Household> = Registry::new();
        assert!(matches!(r.get(HouseholdId(1)), Err(DataError::NotFound(_))));
        assert!(matches!(r.remove(HouseholdId(1)), Err(DataError::NotFound(_))));
        assert!(r.try_get(HouseholdId(1)).is_none());
    }

    #[test]
    fn duplicate_add_fails() {
        let mut r: Registry<Household> = Registry::new();
        r.add(Household::new(HouseholdId(1))).unwrap();
        assert!(matches!(r.add(Household::new(HouseholdId(1))), Err(DataError::DuplicateId(_))));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn next_id_exceeds_every_id_seen() {
        let mut r: Registry<Household> = Registry::new();
        assert_eq!(r.next_id(), HouseholdId(1));
        r.add(Household::new(HouseholdId(7))).unwrap();
        r.add(Household::new(HouseholdId(3))).unwrap();
        r.remove(HouseholdId(7)).unwrap();
        assert_eq!(r.next_id(), HouseholdId(8));
    }

    #[test]
    fn compaction_preserves_order() {
        let mut r: Registry<Household> = Registry::new();
        for id in 0..300 {
            r.add(Household::new(HouseholdId(id))).unwrap();
        }
        for id in (0..300).filter(|i| i % 3 != 0) {
            r.remove(HouseholdId(id)).unwrap();
        }
        let expected: Vec<_> = (0..300).filter(|i| i % 3 == 0).map(HouseholdId).collect();
        assert_eq!(r.ids(), expected);
        assert_eq!(r.get(HouseholdId(297)).unwrap().id, HouseholdId(297));
    }

    #[test]
    fn updated_set_dedupes_and_clears() {
        let mut r: Registry<Household> = Registry::new();
        for id in 1..=3 {
            r.add(Household::new(HouseholdId(id))).unwrap();
        }
        r.mark_updated(HouseholdId(2)).unwrap();
        r.mark_updated(HouseholdId(1)).unwrap();
        r.mark_updated(HouseholdId(2)).unwrap();
        assert_eq!(r.updated(), &[HouseholdId(2), HouseholdId(1)]);
        assert!(r.mark_updated(HouseholdId(9)).is_err());

        let taken = r.take_updated();
        assert_eq!(taken, vec![HouseholdId(2), HouseholdId(1)]);
        assert!(r.updated().is_empty());

        r.mark_updated(HouseholdId(3)).unwrap();
        r.clear_updated();
        assert!(r.updated().is_empty());
    }

    #[test]
    fn removal_drops_from_updated_set() {
        let mut r: Registry<Household> = Registry::new();
        r.add(Household::new(HouseholdId(1))).unwrap();
        r.add(Household::new(HouseholdId(2))).unwrap();
        r.mark_updated(HouseholdId(1)).unwrap();
        r.mark_updated(HouseholdId(2)).unwrap();
        r.remove(HouseholdId(1)).unwrap();
        assert_eq!(r.updated(), &[HouseholdId(2)]);
    }
}

// ── DataContainer ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod container {
    use super::*;
    use crate::DataError;

    #[test]
    fn small_population_is_consistent() {
        let data = small();
        data.check_invariants().unwrap();
        assert_eq!(data.households.get(HouseholdId(1)).unwrap().members.len(), 2);
        assert!(!data.dwellings.get(DwellingId(1)).unwrap().is_vacant());
        assert_eq!(data.vacant_dwellings(), vec![DwellingId(2)]);
    }

    #[test]
    fn moving_vacates_previous_dwelling() {
        let mut data = small();
        data.move_household(HouseholdId(1), DwellingId(2)).unwrap();
        let old = data.dwellings.get(DwellingId(1)).unwrap();
        assert!(old.is_vacant());
        assert_eq!(old.usage, DwellingUsage::Vacant);
        assert_eq!(data.households.get(HouseholdId(1)).unwrap().dwelling, Some(DwellingId(2)));
        assert_eq!(data.households.updated(), &[HouseholdId(1)]);
        data.check_invariants().unwrap();
    }

    #[test]
    fn moving_into_occupied_dwelling_fails() {
        let mut data = small();
        data.add_household(Household::new(HouseholdId(2))).unwrap();
        let err = data.move_household(HouseholdId(2), DwellingId(1)).unwrap_err();
        assert!(matches!(err, DataError::DwellingOccupied { occupant: HouseholdId(1), .. }));
    }

    #[test]
    fn job_assignment_is_bidirectional() {
        let mut data = small();
        data.assign_job(PersonId(1), JobId(1)).unwrap();
        assert_eq!(data.jobs.get(JobId(1)).unwrap().worker, Some(PersonId(1)));
        assert_eq!(data.persons.get(PersonId(1)).unwrap().job, Some(JobId(1)));
        assert_eq!(data.households.updated(), &[HouseholdId(1)]);

        let err = data.assign_job(PersonId(2), JobId(1)).unwrap_err();
        assert!(matches!(err, DataError::JobOccupied { worker: PersonId(1), .. }));

        assert_eq!(data.release_job(PersonId(1)).unwrap(), Some(JobId(1)));
        assert!(data.jobs.get(JobId(1)).unwrap().is_vacant());
        data.check_invariants().unwrap();
    }

    #[test]
    fn school_capacity_is_hard() {
        let mut data = small();
        data.enrol(PersonId(2), SchoolId(1)).unwrap();
        assert!(matches!(data.enrol(PersonId(1), SchoolId(1)), Err(DataError::SchoolFull(_))));
        data.withdraw(PersonId(2)).unwrap();
        data.enrol(PersonId(1), SchoolId(1)).unwrap();
        data.check_invariants().unwrap();
    }

    #[test]
    fn removing_person_releases_attachments() {
        let mut data = small();
        data.assign_job(PersonId(1), JobId(1)).unwrap();
        data.enrol(PersonId(2), SchoolId(1)).unwrap();
        data.remove_person(PersonId(1)).unwrap();
        data.remove_person(PersonId(2)).unwrap();
        assert!(data.jobs.get(JobId(1)).unwrap().is_vacant());
        assert_eq!(data.schools.get(SchoolId(1)).unwrap().occupancy, 0);
        assert!(data.households.get(HouseholdId(1)).unwrap().members.is_empty());
        data.check_invariants().unwrap();
    }

    #[test]
    fn dissolving_household_frees_dwelling() {
        let mut data = small();
        data.assign_job(PersonId(1), JobId(1)).unwrap();
        data.dissolve_household(HouseholdId(1)).unwrap();
        assert!(data.households.is_empty());
        assert!(data.persons.is_empty());
        assert!(data.dwellings.get(DwellingId(1)).unwrap().is_vacant());
        assert!(data.households.updated().is_empty());
        data.check_invariants().unwrap();
    }

    #[test]
    fn unknown_zone_rejected() {
        let mut data = small();
        assert!(matches!(data.add_dwelling(dwelling(3, 99, 1.0)), Err(DataError::NotFound(_))));
    }

    #[test]
    fn occupied_dwelling_cannot_be_removed() {
        let mut data = small();
        assert!(data.remove_dwelling(DwellingId(1)).is_err());
        data.remove_dwelling(DwellingId(2)).unwrap();
    }

    #[test]
    fn corrupted_edge_detected() {
        let mut data = small();
        data.jobs.get_mut(JobId(1)).unwrap().worker = Some(PersonId(2));
        assert!(matches!(data.check_invariants(), Err(DataError::Inconsistent(_))));
    }

    #[test]
    fn household_income_sums_members() {
        let data = small();
        assert_eq!(data.household_income(HouseholdId(1)).unwrap(), 30_000.0);
    }
}

// ── Indicators ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod indicators {
    use super::*;

    #[test]
    fn vacancy_price_and_density() {
        let mut data = small();
        data.compute_indicators().unwrap();
        let ind = &data.indicators;
        assert_eq!(ind.dwelling_vacancy, 0.5);
        assert_eq!(ind.dwelling_vacancy_by_region[&RegionId(1)], 0.5);
        assert_eq!(ind.job_vacancy, 1.0);
        assert_eq!(ind.avg_price_by_region[&RegionId(1)], 900.0);
        // 800 * 12 / 30_000
        assert!((ind.rent_share_by_region[&RegionId(1)] - 0.32).abs() < 1e-9);
        assert_eq!(ind.job_density_by_zone[&ZoneId(2)], 0.25);
        assert_eq!(ind.job_density_by_zone[&ZoneId(1)], 0.0);

        data.assign_job(PersonId(1), JobId(1)).unwrap();
        data.update_job_vacancy().unwrap();
        assert_eq!(data.indicators.job_vacancy, 0.0);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{DataError, PopulationSources, load_population, load_population_dir};

    const ZONES: &str = "zone,region,lat,lon,area_km2\n1,1,48.10,11.50,2.0\n2,1,48.12,11.52,4.0\n";
    const DWELLINGS: &str = "id,zone,lat,lon,household,type,bedrooms,quality,price,restriction,year_built\n\
        1,1,48.101,11.501,1,sfd,3,3,900,0,1980\n\
        2,2,,,0,mf5plus,1,2,600,0.5,2001\n";
    const HOUSEHOLDS: &str = "id,dwelling,autos\n1,1,1\n";
    const PERSONS: &str = "id,household,age,sex,role,income,license,job,school\n\
        1,1,45,male,married,42000,true,1,0\n\
        2,1,43,female,married,38000,true,,\n\
        3,1,10,female,child,0,false,0,1\n";
    const JOBS: &str = "id,zone,lat,lon,worker,sector\n1,2,,,1,retl\n2,2,,,0,serv\n";
    const SCHOOLS: &str = "id,type,capacity,zone,lat,lon\n1,primary,100,1,,\n";

    fn sources<'a>(dwellings: &'a str, jobs: &'a str) -> PopulationSources<Cursor<&'a [u8]>> {
        PopulationSources {
            zones:      Cursor::new(ZONES.as_bytes()),
            dwellings:  Cursor::new(dwellings.as_bytes()),
            households: Cursor::new(HOUSEHOLDS.as_bytes()),
            persons:    Cursor::new(PERSONS.as_bytes()),
            jobs:       Cursor::new(jobs.as_bytes()),
            schools:    Some(Cursor::new(SCHOOLS.as_bytes())),
        }
    }

    #[test]
    fn loads_and_wires_relationships() {
        let data = load_population(sources(DWELLINGS, JOBS)).unwrap();
        data.check_invariants().unwrap();
        assert_eq!(data.households.len(), 1);
        assert_eq!(data.persons.len(), 3);
        assert_eq!(data.jobs.get(JobId(1)).unwrap().worker, Some(PersonId(1)));
        assert_eq!(data.schools.get(SchoolId(1)).unwrap().occupancy, 1);
        assert!(data.households.updated().is_empty(), "loading must not mark updates");

        let d1 = data.dwellings.get(DwellingId(1)).unwrap();
        assert!(matches!(d1.location(), Location::Point(_)));
        let d2 = data.dwellings.get(DwellingId(2)).unwrap();
        assert_eq!(d2.location(), Location::Zone(ZoneId(2)));
        assert_eq!(data.household_income(HouseholdId(1)).unwrap(), 80_000.0);
        assert_eq!(data.indicators.job_vacancy, 0.5);
    }

    #[test]
    fn disagreeing_occupant_rejected() {
        let bad = DWELLINGS.replace("1,1,48.101,11.501,1,", "1,1,48.101,11.501,0,");
        let err = load_population(sources(&bad, JOBS)).unwrap_err();
        assert!(matches!(err, DataError::Inconsistent(_)), "{err}");
    }

    #[test]
    fn disagreeing_worker_rejected() {
        let bad = JOBS.replace("2,2,,,0,serv", "2,2,,,2,serv");
        assert!(matches!(load_population(sources(DWELLINGS, &bad)), Err(DataError::Inconsistent(_))));
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let bad = DWELLINGS.replace("sfd", "castle");
        assert!(matches!(load_population(sources(&bad, JOBS)), Err(DataError::Parse(_))));
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("zones.csv", ZONES),
            ("dwellings.csv", DWELLINGS),
            ("households.csv", HOUSEHOLDS),
            ("persons.csv", PERSONS),
            ("jobs.csv", JOBS),
        ] {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let data = load_population_dir(dir.path()).unwrap();
        assert!(data.schools.is_empty());
        // Person 3's school reference cannot resolve without schools.csv.
        assert_eq!(data.persons.get(PersonId(3)).unwrap().school, None);
    }
}

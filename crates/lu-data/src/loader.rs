//! CSV synthetic-population loader.
//!
//! # Files
//!
//! | File             | Columns                                                                  |
//! |------------------|--------------------------------------------------------------------------|
//! | `zones.csv`      | `zone,region,lat,lon,area_km2`                                           |
//! | `dwellings.csv`  | `id,zone,lat,lon,household,type,bedrooms,quality,price,restriction,year_built` |
//! | `households.csv` | `id,dwelling,autos`                                                      |
//! | `persons.csv`    | `id,household,age,sex,role,income,license,job,school`                    |
//! | `jobs.csv`       | `id,zone,lat,lon,worker,sector`                                          |
//! | `schools.csv`    | `id,type,capacity,zone,lat,lon` (optional file)                          |
//!
//! Reference columns (`household`, `dwelling`, `job`, `school`, `worker`)
//! use `0` or an empty field for "none".  `lat`/`lon` may be empty, in which
//! case the entity is located at zone level.
//!
//! Relationships are declared on both sides in the input (a dwelling names
//! its occupant, a household names its dwelling).  The loader wires them from
//! the household/person side and then checks the other side agrees; any
//! disagreement is a [`DataError::Inconsistent`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use lu_core::{
    DwellingId, GeoPoint, HouseholdId, JobId, Location, PersonId, RegionId, SchoolId, ZoneId,
};

use crate::{
    DataContainer, DataError, DataResult, Dwelling, DwellingType, DwellingUsage, Geography,
    Household, Job, Person, Role, School, SchoolType, Sex, Zone,
};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ZoneRecord {
    zone:     u32,
    region:   u32,
    lat:      f32,
    lon:      f32,
    area_km2: f64,
}

#[derive(Deserialize)]
struct DwellingRecord {
    id:          u32,
    zone:        u32,
    lat:         Option<f32>,
    lon:         Option<f32>,
    household:   Option<u32>,
    #[serde(rename = "type")]
    kind:        DwellingType,
    bedrooms:    u32,
    quality:     u8,
    price:       f64,
    restriction: f32,
    year_built:  u32,
}

#[derive(Deserialize)]
struct HouseholdRecord {
    id:       u32,
    dwelling: Option<u32>,
    autos:    u32,
}

#[derive(Deserialize)]
struct PersonRecord {
    id:        u32,
    household: u32,
    age:       u32,
    sex:       Sex,
    role:      Role,
    income:    f64,
    license:   bool,
    job:       Option<u32>,
    school:    Option<u32>,
}

#[derive(Deserialize)]
struct JobRecord {
    id:     u32,
    zone:   u32,
    lat:    Option<f32>,
    lon:    Option<f32>,
    worker: Option<u32>,
    sector: String,
}

#[derive(Deserialize)]
struct SchoolRecord {
    id:       u32,
    #[serde(rename = "type")]
    kind:     SchoolType,
    capacity: u32,
    zone:     u32,
    lat:      Option<f32>,
    lon:      Option<f32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// CSV sources for one synthetic population.
pub struct PopulationSources<R: Read> {
    pub zones:      R,
    pub dwellings:  R,
    pub households: R,
    pub persons:    R,
    pub jobs:       R,
    pub schools:    Option<R>,
}

/// Load a synthetic population from the standard file names in `dir`.
pub fn load_population_dir(dir: &Path) -> DataResult<DataContainer> {
    let open = |name: &str| File::open(dir.join(name)).map_err(DataError::Io);
    let schools_path = dir.join("schools.csv");
    let sources = PopulationSources {
        zones:      open("zones.csv")?,
        dwellings:  open("dwellings.csv")?,
        households: open("households.csv")?,
        persons:    open("persons.csv")?,
        jobs:       open("jobs.csv")?,
        schools:    if schools_path.exists() { Some(File::open(schools_path)?) } else { None },
    };
    load_population(sources)
}

/// Like [`load_population_dir`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s).
pub fn load_population<R: Read>(sources: PopulationSources<R>) -> DataResult<DataContainer> {
    // ── Geography ─────────────────────────────────────────────────────────
    let mut geography = Geography::new();
    for z in read_records::<_, ZoneRecord>(sources.zones)? {
        geography.add_zone(Zone::new(
            ZoneId(z.zone),
            RegionId(z.region),
            GeoPoint::new(z.lat, z.lon),
            z.area_km2,
        ))?;
    }
    let mut data = DataContainer::new(geography);

    // ── Vacant supply: dwellings, jobs, schools ───────────────────────────
    let mut declared_occupant: BTreeMap<DwellingId, Option<HouseholdId>> = BTreeMap::new();
    for d in read_records::<_, DwellingRecord>(sources.dwellings)? {
        let id = DwellingId(d.id);
        declared_occupant.insert(id, reference(d.household).map(HouseholdId));
        data.add_dwelling(Dwelling {
            id,
            zone: ZoneId(d.zone),
            point: point(d.lat, d.lon),
            household: None,
            kind: d.kind,
            bedrooms: d.bedrooms,
            quality: d.quality,
            price: d.price,
            restriction: d.restriction,
            usage: DwellingUsage::Default,
            year_built: d.year_built,
        })?;
    }

    let mut declared_worker: BTreeMap<JobId, Option<PersonId>> = BTreeMap::new();
    for j in read_records::<_, JobRecord>(sources.jobs)? {
        let id = JobId(j.id);
        declared_worker.insert(id, reference(j.worker).map(PersonId));
        data.add_job(Job {
            id,
            location: location(ZoneId(j.zone), j.lat, j.lon),
            worker: None,
            sector: j.sector,
        })?;
    }

    if let Some(schools) = sources.schools {
        for s in read_records::<_, SchoolRecord>(schools)? {
            data.add_school(School {
                id: SchoolId(s.id),
                kind: s.kind,
                capacity: s.capacity,
                occupancy: 0,
                location: location(ZoneId(s.zone), s.lat, s.lon),
            })?;
        }
    }

    // ── Households and persons ────────────────────────────────────────────
    let households = read_records::<_, HouseholdRecord>(sources.households)?;
    for h in &households {
        let mut hh = Household::new(HouseholdId(h.id));
        hh.autos = h.autos;
        data.add_household(hh)?;
    }

    let persons = read_records::<_, PersonRecord>(sources.persons)?;
    for p in &persons {
        let mut person = Person::new(PersonId(p.id), HouseholdId(p.household), p.age, p.sex, p.role);
        person.income = p.income;
        person.license = p.license;
        data.add_person(person)?;
    }

    // ── Relationships ─────────────────────────────────────────────────────
    for h in &households {
        if let Some(d) = reference(h.dwelling) {
            data.move_household(HouseholdId(h.id), DwellingId(d))?;
        }
    }
    for p in &persons {
        if let Some(j) = reference(p.job) {
            data.assign_job(PersonId(p.id), JobId(j))?;
        }
        if let Some(s) = reference(p.school) {
            data.enrol(PersonId(p.id), SchoolId(s))?;
        }
    }

    for (dwelling, declared) in declared_occupant {
        let actual = data.dwellings.get(dwelling)?.household;
        if actual != declared {
            return Err(DataError::Inconsistent(format!(
                "{dwelling} lists occupant {declared:?} but households place {actual:?} there"
            )));
        }
    }
    for (job, declared) in declared_worker {
        let actual = data.jobs.get(job)?.worker;
        if actual != declared {
            return Err(DataError::Inconsistent(format!(
                "{job} lists worker {declared:?} but persons place {actual:?} there"
            )));
        }
    }

    // Loading is not an update.
    data.households.clear_updated();
    data.compute_indicators()?;

    info!(
        zones      = data.geography.zones.len(),
        households = data.households.len(),
        persons    = data.persons.len(),
        dwellings  = data.dwellings.len(),
        jobs       = data.jobs.len(),
        schools    = data.schools.len(),
        "synthetic population loaded",
    );
    Ok(data)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_records<R: Read, T: DeserializeOwned>(reader: R) -> DataResult<Vec<T>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<T>()
        .map(|row| row.map_err(|e| DataError::Parse(e.to_string())))
        .collect()
}

/// `0` and empty both mean "no reference".
fn reference(raw: Option<u32>) -> Option<u32> {
    raw.filter(|&id| id != 0)
}

fn point(lat: Option<f32>, lon: Option<f32>) -> Option<GeoPoint> {
    Some(GeoPoint::new(lat?, lon?))
}

fn location(zone: ZoneId, lat: Option<f32>, lon: Option<f32>) -> Location {
    match point(lat, lon) {
        Some(p) => Location::point(zone, p),
        None => Location::Zone(zone),
    }
}

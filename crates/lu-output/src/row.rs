//! Plain data row types written by output backends.
//!
//! Population rows use the column layout `lu_data::load_population_dir`
//! reads, so an exported year can be loaded back as a starting population.

use serde::Serialize;

use lu_core::{GeoPoint, Location, Year};
use lu_data::{
    DataContainer, Dwelling, DwellingType, Household, Job, Person, Role, School, SchoolType, Sex, Zone,
};
use lu_sim::YearReport;

// ── Run-level rows ────────────────────────────────────────────────────────────

/// Population and market totals at one point of the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryRow {
    pub year:             u32,
    pub households:       u64,
    pub persons:          u64,
    pub dwellings:        u64,
    pub vacant_dwellings: u64,
    pub jobs:             u64,
    pub vacant_jobs:      u64,
    pub dwelling_vacancy: f64,
    pub job_vacancy:      f64,
    /// Mean monthly dwelling price.
    pub avg_price:        f64,
    /// Mean annual household income.
    pub avg_income:       f64,
}

impl SummaryRow {
    pub const HEADER: &'static [&'static str] = &[
        "year", "households", "persons", "dwellings", "vacant_dwellings", "jobs", "vacant_jobs",
        "dwelling_vacancy", "job_vacancy", "avg_price", "avg_income",
    ];

    pub fn from_data(year: Year, data: &DataContainer) -> Self {
        let households = data.households.len() as u64;
        let dwellings = data.dwellings.len() as u64;
        let jobs = data.jobs.len() as u64;
        let vacant_dwellings = data.dwellings.iter().filter(|d| d.is_vacant()).count() as u64;
        let vacant_jobs = data.jobs.iter().filter(|j| j.is_vacant()).count() as u64;
        let total_price: f64 = data.dwellings.iter().map(|d| d.price).sum();
        let total_income: f64 = data.persons.iter().map(|p| p.income).sum();
        Self {
            year: year.0,
            households,
            persons: data.persons.len() as u64,
            dwellings,
            vacant_dwellings,
            jobs,
            vacant_jobs,
            dwelling_vacancy: ratio(vacant_dwellings as f64, dwellings),
            job_vacancy: ratio(vacant_jobs as f64, jobs),
            avg_price: ratio(total_price, dwellings),
            avg_income: ratio(total_income, households),
        }
    }
}

fn ratio(numerator: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { numerator / count as f64 }
}

/// What the annual loop did in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRow {
    pub year:               u32,
    pub events_generated:   u64,
    pub events_applied:     u64,
    pub car_changes:        u64,
    pub av_switches:        u64,
    pub households_added:   u64,
    pub households_removed: u64,
    pub issues:             u64,
}

impl YearRow {
    pub const HEADER: &'static [&'static str] = &[
        "year", "events_generated", "events_applied", "car_changes", "av_switches",
        "households_added", "households_removed", "issues",
    ];
}

impl From<&YearReport> for YearRow {
    fn from(report: &YearReport) -> Self {
        let (added, removed) = report.scaling.map_or((0, 0), |s| (s.added, s.removed));
        Self {
            year:               report.year.0,
            events_generated:   report.events.total_generated(),
            events_applied:     report.events.total_applied(),
            car_changes:        report.counters.car_changes,
            av_switches:        report.counters.av_switches,
            households_added:   added,
            households_removed: removed,
            issues:             report.issues.total(),
        }
    }
}

/// Count of one issue kind in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRow {
    pub year:    u32,
    pub kind:    &'static str,
    pub count:   u64,
    /// First recorded context, empty if none was kept.
    pub example: String,
}

impl IssueRow {
    pub const HEADER: &'static [&'static str] = &["year", "kind", "count", "example"];

    pub fn from_report(report: &YearReport) -> Vec<Self> {
        report
            .issues
            .entries
            .iter()
            .map(|e| IssueRow {
                year:    report.year.0,
                kind:    e.kind.as_str(),
                count:   e.count,
                example: e.examples.first().cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// Accumulated wall time of one named step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerRow {
    pub step: String,
    pub secs: f64,
}

impl TimerRow {
    pub const HEADER: &'static [&'static str] = &["step", "secs"];
}

// ── Population rows ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneRow {
    pub zone:     u32,
    pub region:   u32,
    pub lat:      f32,
    pub lon:      f32,
    pub area_km2: f64,
}

impl ZoneRow {
    pub const HEADER: &'static [&'static str] = &["zone", "region", "lat", "lon", "area_km2"];
}

impl From<&Zone> for ZoneRow {
    fn from(z: &Zone) -> Self {
        Self {
            zone:     z.id.get(),
            region:   z.region.get(),
            lat:      z.centroid.lat,
            lon:      z.centroid.lon,
            area_km2: z.area_km2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DwellingRow {
    pub id:          u32,
    pub zone:        u32,
    pub lat:         Option<f32>,
    pub lon:         Option<f32>,
    pub household:   Option<u32>,
    #[serde(rename = "type")]
    pub kind:        DwellingType,
    pub bedrooms:    u32,
    pub quality:     u8,
    pub price:       f64,
    pub restriction: f32,
    pub year_built:  u32,
    pub usage:       &'static str,
}

impl DwellingRow {
    pub const HEADER: &'static [&'static str] = &[
        "id", "zone", "lat", "lon", "household", "type", "bedrooms", "quality", "price",
        "restriction", "year_built", "usage",
    ];
}

impl From<&Dwelling> for DwellingRow {
    fn from(d: &Dwelling) -> Self {
        Self {
            id:          d.id.get(),
            zone:        d.zone.get(),
            lat:         d.point.map(|p| p.lat),
            lon:         d.point.map(|p| p.lon),
            household:   d.household.map(|h| h.get()),
            kind:        d.kind,
            bedrooms:    d.bedrooms,
            quality:     d.quality,
            price:       d.price,
            restriction: d.restriction,
            year_built:  d.year_built,
            usage:       d.usage.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HouseholdRow {
    pub id:         u32,
    pub dwelling:   Option<u32>,
    pub autos:      u32,
    pub autonomous: u32,
    pub size:       u32,
}

impl HouseholdRow {
    pub const HEADER: &'static [&'static str] = &["id", "dwelling", "autos", "autonomous", "size"];
}

impl From<&Household> for HouseholdRow {
    fn from(h: &Household) -> Self {
        Self {
            id:         h.id.get(),
            dwelling:   h.dwelling.map(|d| d.get()),
            autos:      h.autos,
            autonomous: h.autonomous,
            size:       h.size() as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersonRow {
    pub id:        u32,
    pub household: u32,
    pub age:       u32,
    pub sex:       Sex,
    pub role:      Role,
    pub income:    f64,
    pub license:   bool,
    pub job:       Option<u32>,
    pub school:    Option<u32>,
}

impl PersonRow {
    pub const HEADER: &'static [&'static str] =
        &["id", "household", "age", "sex", "role", "income", "license", "job", "school"];
}

impl From<&Person> for PersonRow {
    fn from(p: &Person) -> Self {
        Self {
            id:        p.id.get(),
            household: p.household.get(),
            age:       p.age,
            sex:       p.sex,
            role:      p.role,
            income:    p.income,
            license:   p.license,
            job:       p.job.map(|j| j.get()),
            school:    p.school.map(|s| s.get()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRow {
    pub id:     u32,
    pub zone:   u32,
    pub lat:    Option<f32>,
    pub lon:    Option<f32>,
    pub worker: Option<u32>,
    pub sector: String,
}

impl JobRow {
    pub const HEADER: &'static [&'static str] = &["id", "zone", "lat", "lon", "worker", "sector"];
}

impl From<&Job> for JobRow {
    fn from(j: &Job) -> Self {
        let (lat, lon) = coordinates(&j.location);
        Self {
            id:     j.id.get(),
            zone:   j.location.zone().get(),
            lat,
            lon,
            worker: j.worker.map(|p| p.get()),
            sector: j.sector.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SchoolRow {
    pub id:        u32,
    #[serde(rename = "type")]
    pub kind:      SchoolType,
    pub capacity:  u32,
    pub zone:      u32,
    pub lat:       Option<f32>,
    pub lon:       Option<f32>,
    pub occupancy: u32,
}

impl SchoolRow {
    pub const HEADER: &'static [&'static str] =
        &["id", "type", "capacity", "zone", "lat", "lon", "occupancy"];
}

impl From<&School> for SchoolRow {
    fn from(s: &School) -> Self {
        let (lat, lon) = coordinates(&s.location);
        Self {
            id:        s.id.get(),
            kind:      s.kind,
            capacity:  s.capacity,
            zone:      s.location.zone().get(),
            lat,
            lon,
            occupancy: s.occupancy,
        }
    }
}

fn coordinates(location: &Location) -> (Option<f32>, Option<f32>) {
    match location {
        Location::Zone(_) => (None, None),
        Location::Point(m) => {
            let GeoPoint { lat, lon } = m.point;
            (Some(lat), Some(lon))
        }
    }
}

//! Population entities.
//!
//! Entities reference each other by id only.  Fields that form two-sided
//! relationships (`Dwelling::household` ↔ `Household::dwelling`,
//! `Job::worker` ↔ `Person::job`, `Person::household` ↔
//! `Household::members`, `Person::school` ↔ `School::occupancy`) are `pub`
//! for reading, but should be changed through [`DataContainer`] so both
//! sides move together.
//!
//! [`DataContainer`]: crate::DataContainer

use serde::{Deserialize, Serialize};

use lu_core::{DwellingId, GeoPoint, HouseholdId, JobId, Location, PersonId, SchoolId, ZoneId};

use crate::Keyed;

// ── Household ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Household {
    pub id:         HouseholdId,
    /// The dwelling this household occupies.  `None` only transiently while
    /// a household is being created or dissolved.
    pub dwelling:   Option<DwellingId>,
    /// Number of conventional cars.
    pub autos:      u32,
    /// Number of autonomous vehicles.
    pub autonomous: u32,
    pub members:    Vec<PersonId>,
}

impl Household {
    pub fn new(id: HouseholdId) -> Self {
        Self { id, dwelling: None, autos: 0, autonomous: 0, members: Vec::new() }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }
}

impl Keyed for Household {
    type Id = HouseholdId;
    fn id(&self) -> HouseholdId {
        self.id
    }
}

// ── Person ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Position within the household.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Single,
    Married,
    Child,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id:        PersonId,
    pub household: HouseholdId,
    pub age:       u32,
    pub sex:       Sex,
    pub role:      Role,
    /// Annual income.
    pub income:    f64,
    pub license:   bool,
    pub job:       Option<JobId>,
    pub school:    Option<SchoolId>,
}

impl Person {
    pub fn new(id: PersonId, household: HouseholdId, age: u32, sex: Sex, role: Role) -> Self {
        Self {
            id,
            household,
            age,
            sex,
            role,
            income: 0.0,
            license: false,
            job: None,
            school: None,
        }
    }

    pub fn is_employed(&self) -> bool {
        self.job.is_some()
    }

    /// Working age, inclusive bounds.
    pub fn is_working_age(&self) -> bool {
        (16..=67).contains(&self.age)
    }
}

impl Keyed for Person {
    type Id = PersonId;
    fn id(&self) -> PersonId {
        self.id
    }
}

// ── Dwelling ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DwellingType {
    /// Single-family detached.
    Sfd,
    /// Single-family attached.
    Sfa,
    /// Multi-family, 2–4 units.
    Mf234,
    /// Multi-family, 5+ units.
    Mf5plus,
    /// Mobile home.
    Mh,
}

impl DwellingType {
    pub fn as_str(self) -> &'static str {
        match self {
            DwellingType::Sfd     => "sfd",
            DwellingType::Sfa     => "sfa",
            DwellingType::Mf234   => "mf234",
            DwellingType::Mf5plus => "mf5plus",
            DwellingType::Mh      => "mh",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DwellingUsage {
    #[default]
    Default,
    Owned,
    Rented,
    Vacant,
}

impl DwellingUsage {
    pub fn as_str(self) -> &'static str {
        match self {
            DwellingUsage::Default => "default",
            DwellingUsage::Owned   => "owned",
            DwellingUsage::Rented  => "rented",
            DwellingUsage::Vacant  => "vacant",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dwelling {
    pub id:          DwellingId,
    pub zone:        ZoneId,
    /// Micro location, when known.
    pub point:       Option<GeoPoint>,
    /// Occupant; `None` means vacant.
    pub household:   Option<HouseholdId>,
    pub kind:        DwellingType,
    pub bedrooms:    u32,
    /// Quality class, 1 (worst) to 4 (best).
    pub quality:     u8,
    /// Monthly price.
    pub price:       f64,
    /// Share of area median income this unit is restricted to; `0.0` means
    /// unrestricted.
    pub restriction: f32,
    pub usage:       DwellingUsage,
    pub year_built:  u32,
}

impl Dwelling {
    pub fn is_vacant(&self) -> bool {
        self.household.is_none()
    }

    pub fn location(&self) -> Location {
        match self.point {
            Some(point) => Location::point(self.zone, point),
            None => Location::Zone(self.zone),
        }
    }
}

impl Keyed for Dwelling {
    type Id = DwellingId;
    fn id(&self) -> DwellingId {
        self.id
    }
}

// ── Job ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    pub id:       JobId,
    pub location: Location,
    /// Worker; `None` means vacant.
    pub worker:   Option<PersonId>,
    pub sector:   String,
}

impl Job {
    pub fn is_vacant(&self) -> bool {
        self.worker.is_none()
    }
}

impl Keyed for Job {
    type Id = JobId;
    fn id(&self) -> JobId {
        self.id
    }
}

// ── School ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolType {
    Primary,
    Secondary,
    Tertiary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct School {
    pub id:        SchoolId,
    pub kind:      SchoolType,
    /// Hard upper bound on `occupancy`.
    pub capacity:  u32,
    pub occupancy: u32,
    pub location:  Location,
}

impl School {
    pub fn has_seat(&self) -> bool {
        self.occupancy < self.capacity
    }
}

impl Keyed for School {
    type Id = SchoolId;
    fn id(&self) -> SchoolId {
        self.id
    }
}

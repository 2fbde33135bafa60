//! Micro-event discriminants and instances.

use std::fmt;

use lu_core::{DwellingId, HouseholdId, JobId, PersonId};

use crate::{ModelError, ModelResult};

/// Discriminant used to register and dispatch event models.
///
/// Each type has at most one registered handler.  `Custom` covers event
/// kinds defined outside this crate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum EventType {
    Birthday,
    Birth,
    Death,
    Marriage,
    Divorce,
    LeaveParentalHousehold,
    DriversLicense,
    Education,
    Employment,
    Relocation,
    Construction,
    Renovation,
    Demolition,
    Custom(&'static str),
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Birthday               => "birthday",
            EventType::Birth                  => "birth",
            EventType::Death                  => "death",
            EventType::Marriage               => "marriage",
            EventType::Divorce                => "divorce",
            EventType::LeaveParentalHousehold => "leave_parental_household",
            EventType::DriversLicense         => "drivers_license",
            EventType::Education              => "education",
            EventType::Employment             => "employment",
            EventType::Relocation             => "relocation",
            EventType::Construction           => "construction",
            EventType::Renovation             => "renovation",
            EventType::Demolition             => "demolition",
            EventType::Custom(name)           => name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity an event will mutate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EventTarget {
    Person(PersonId),
    Household(HouseholdId),
    Dwelling(DwellingId),
    Job(JobId),
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTarget::Person(id)    => id.fmt(f),
            EventTarget::Household(id) => id.fmt(f),
            EventTarget::Dwelling(id)  => id.fmt(f),
            EventTarget::Job(id)       => id.fmt(f),
        }
    }
}

/// One queued micro-event.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Event {
    pub kind:   EventType,
    pub target: EventTarget,
}

impl Event {
    pub fn person(kind: EventType, id: PersonId) -> Self {
        Self { kind, target: EventTarget::Person(id) }
    }

    pub fn household(kind: EventType, id: HouseholdId) -> Self {
        Self { kind, target: EventTarget::Household(id) }
    }

    /// The targeted person, or a configuration error naming the mismatch.
    pub fn expect_person(&self) -> ModelResult<PersonId> {
        match self.target {
            EventTarget::Person(id) => Ok(id),
            other => Err(ModelError::Config(format!("{} event targets {other}, not a person", self.kind))),
        }
    }

    pub fn expect_household(&self) -> ModelResult<HouseholdId> {
        match self.target {
            EventTarget::Household(id) => Ok(id),
            other => Err(ModelError::Config(format!("{} event targets {other}, not a household", self.kind))),
        }
    }
}

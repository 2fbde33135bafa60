//! Data-integrity error type.
//!
//! Every variant is a broken invariant or an unresolvable reference; none is
//! recoverable by the simulation.  Expected sparsity goes to
//! [`lu_core::Issues`] instead.

use thiserror::Error;

use lu_core::{DwellingId, HouseholdId, JobId, PersonId, SchoolId};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    DuplicateId(String),

    #[error("{dwelling} is already occupied by {occupant}")]
    DwellingOccupied {
        dwelling: DwellingId,
        occupant: HouseholdId,
    },

    #[error("{job} is already filled by {worker}")]
    JobOccupied {
        job:    JobId,
        worker: PersonId,
    },

    #[error("{0} is at capacity")]
    SchoolFull(SchoolId),

    #[error("inconsistent population data: {0}")]
    Inconsistent(String),

    #[error("population parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DataResult<T> = Result<T, DataError>;

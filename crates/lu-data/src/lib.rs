//! `lu-data` — the population state store.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`registry`]    | `Registry<T>` (id-keyed, insertion-ordered), `Keyed`      |
//! | [`entities`]    | `Household`, `Person`, `Dwelling`, `Job`, `School`        |
//! | [`geography`]   | `Zone`, `Region`, `Geography`                             |
//! | [`container`]   | `DataContainer` — all registries + relationship methods   |
//! | [`indicators`]  | `Indicators` — vacancy, price, rent share, job density    |
//! | [`loader`]      | `load_population_dir`, `load_population`                  |
//! | [`error`]       | `DataError`, `DataResult<T>`                              |
//!
//! # Concurrency
//!
//! The store is single-writer.  Candidate generation may scan it through a
//! shared `&DataContainer` (from any number of threads); only the serialized
//! dispatch step holds `&mut`.

pub mod container;
pub mod entities;
pub mod error;
pub mod geography;
pub mod indicators;
pub mod loader;
pub mod registry;

#[cfg(test)]
mod tests;

pub use container::DataContainer;
pub use entities::{
    Dwelling, DwellingType, DwellingUsage, Household, Job, Person, Role, School, SchoolType, Sex,
};
pub use error::{DataError, DataResult};
pub use geography::{Geography, Region, Zone};
pub use indicators::Indicators;
pub use loader::{PopulationSources, load_population, load_population_dir};
pub use registry::{Keyed, Registry};

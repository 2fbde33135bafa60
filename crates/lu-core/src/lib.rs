//! `lu-core` — foundational types for the land-use microsimulation.
//!
//! This crate is a dependency of every other `lu-*` crate.  It has no `lu-*`
//! dependencies and keeps its external ones small (`rand`, `thiserror`,
//! `serde`/`serde_json` for configuration, `tracing` for the issue summary).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `HouseholdId`, `PersonId`, `DwellingId`, `JobId`, …       |
//! | [`year`]        | `Year`, `YearSet`                                         |
//! | [`config`]      | `RunConfig`, `Implementation`                             |
//! | [`location`]    | `GeoPoint`, `Location` (zone- or point-level)             |
//! | [`mode`]        | `Mode`, `Period`                                          |
//! | [`rng`]         | `SimRng` (process-wide deterministic random source)       |
//! | [`issues`]      | `Issues`, `IssueKind`: period-scoped soft diagnostics     |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |

pub mod config;
pub mod error;
pub mod ids;
pub mod issues;
pub mod location;
pub mod mode;
pub mod rng;
pub mod year;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Implementation, RunConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{DwellingId, EdgeId, HouseholdId, JobId, NodeId, PersonId, RegionId, SchoolId, ZoneId};
pub use issues::{IssueEntry, IssueKind, IssueSummary, Issues};
pub use location::{GeoPoint, Location, MicroLocation};
pub use mode::{Mode, Period};
pub use rng::SimRng;
pub use year::{Year, YearSet};

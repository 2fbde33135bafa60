//! `lu-output` — persistence for the land-use microsimulation.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`writer`]   | `ExportWriter` trait                                       |
//! | [`csv`]      | `CsvWriter` (summaries, year reports, issues, timers, population exports) |
//! | [`observer`] | `ModelOutputObserver`, implements `lu_sim::ModelObserver`  |
//! | [`row`]      | plain row types                                            |
//! | [`error`]    | `OutputError`, `OutputResult<T>`                           |
//!
//! # Usage
//!
//! ```rust,ignore
//! use lu_output::{CsvWriter, ModelOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = ModelOutputObserver::new(writer);
//! model.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ModelOutputObserver;
pub use row::{
    DwellingRow, HouseholdRow, IssueRow, JobRow, PersonRow, SchoolRow, SummaryRow, TimerRow, YearRow,
    ZoneRow,
};
pub use writer::ExportWriter;

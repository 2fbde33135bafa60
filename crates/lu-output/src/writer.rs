//! The `ExportWriter` trait implemented by output backends.

use lu_core::Year;
use lu_data::DataContainer;

use crate::{IssueRow, OutputResult, SummaryRow, TimerRow, YearRow};

/// Destination for everything a run persists.
///
/// Called through [`ModelOutputObserver`][crate::ModelOutputObserver], which
/// keeps the first error for the caller since observer hooks cannot fail.
pub trait ExportWriter {
    /// Append one population summary row.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Append the loop report of one simulated year.
    fn write_year(&mut self, row: &YearRow) -> OutputResult<()>;

    fn write_issues(&mut self, rows: &[IssueRow]) -> OutputResult<()>;

    /// Write the full synthetic population as it stands in `year`.
    fn write_population(&mut self, year: Year, data: &DataContainer) -> OutputResult<()>;

    fn write_timers(&mut self, rows: &[TimerRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

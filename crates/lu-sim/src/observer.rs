//! Run observer trait for progress reporting and output.

use lu_core::{IssueSummary, RunConfig, Year};
use lu_data::DataContainer;
use lu_models::{ScalingReport, YearCounters};

use crate::{EventTally, TimeTracker};

/// What happened in one simulated year.
#[derive(Clone, Debug, PartialEq)]
pub struct YearReport {
    pub year:     Year,
    pub events:   EventTally,
    pub counters: YearCounters,
    /// `Some` in scaling years.
    pub scaling:  Option<ScalingReport>,
    pub issues:   IssueSummary,
}

/// Callbacks invoked by [`LandUseModel::run`][crate::LandUseModel::run] at
/// key points of the annual loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers cannot fail the run; a
/// writer that hits an error keeps it for the caller to inspect afterwards.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl ModelObserver for Progress {
///     fn on_year_end(&mut self, report: &YearReport) {
///         println!("{}: {} events", report.year, report.events.total_applied());
///     }
/// }
/// ```
pub trait ModelObserver {
    /// Called once after setup, before the first simulated year.
    fn on_setup(&mut self, _config: &RunConfig, _data: &DataContainer) {}

    fn on_year_start(&mut self, _year: Year) {}

    /// Called in summary years (see `RunConfig::should_write_summary`) and
    /// once more at the end of the run.
    fn on_summary(&mut self, _year: Year, _data: &DataContainer) {}

    fn on_year_end(&mut self, _report: &YearReport) {}

    /// Called when the synthetic population should be written.
    fn on_population_export(&mut self, _year: Year, _data: &DataContainer) {}

    /// Called exactly once when the run ends, successfully or not.  Flush
    /// here.
    fn on_run_end(&mut self, _final_year: Year, _timers: &TimeTracker) {}
}

/// A [`ModelObserver`] that does nothing.
pub struct NoopObserver;

impl ModelObserver for NoopObserver {}

//! `ModelOutputObserver<W>` — bridges `ModelObserver` to an `ExportWriter`.

use tracing::warn;

use lu_core::{RunConfig, Year};
use lu_data::DataContainer;
use lu_sim::{ModelObserver, TimeTracker, YearReport};

use crate::row::{IssueRow, SummaryRow, TimerRow, YearRow};
use crate::writer::ExportWriter;
use crate::{OutputError, OutputResult};

/// A [`ModelObserver`] that persists summaries, year reports, issue counts,
/// timers and population exports through any [`ExportWriter`].
///
/// Errors from the writer are stored internally because `ModelObserver`
/// methods have no return value.  After `model.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct ModelOutputObserver<W: ExportWriter> {
    writer:     W,
    scenario:   Option<String>,
    last_error: Option<OutputError>,
}

impl<W: ExportWriter> ModelOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, scenario: None, last_error: None }
    }

    /// Take the stored write error (if any) after `model.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(scenario = ?self.scenario, error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: ExportWriter> ModelObserver for ModelOutputObserver<W> {
    fn on_setup(&mut self, config: &RunConfig, _data: &DataContainer) {
        self.scenario = Some(config.scenario_name.clone());
    }

    fn on_summary(&mut self, year: Year, data: &DataContainer) {
        let result = self.writer.write_summary(&SummaryRow::from_data(year, data));
        self.store_err(result);
    }

    fn on_year_end(&mut self, report: &YearReport) {
        let result = self.writer.write_year(&YearRow::from(report));
        self.store_err(result);

        let issues = IssueRow::from_report(report);
        if !issues.is_empty() {
            let result = self.writer.write_issues(&issues);
            self.store_err(result);
        }
    }

    fn on_population_export(&mut self, year: Year, data: &DataContainer) {
        let result = self.writer.write_population(year, data);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_year: Year, timers: &TimeTracker) {
        let rows: Vec<TimerRow> = timers
            .steps()
            .map(|(step, elapsed)| TimerRow { step: step.to_owned(), secs: elapsed.as_secs_f64() })
            .chain(std::iter::once(TimerRow { step: "total".into(), secs: timers.total().as_secs_f64() }))
            .collect();
        let result = self.writer.write_timers(&rows);
        self.store_err(result);

        let result = self.writer.finish();
        self.store_err(result);
    }
}

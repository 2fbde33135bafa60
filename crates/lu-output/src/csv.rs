//! CSV output backend.
//!
//! Files in the output directory:
//!
//! | File                          | One row per                           |
//! |-------------------------------|---------------------------------------|
//! | `summaries.csv`               | summary year (and the final state)    |
//! | `years.csv`                   | simulated year                        |
//! | `issues.csv`                  | issue kind recorded in a year         |
//! | `timers.csv`                  | named step, written at finish         |
//! | `population_<year>/*.csv`     | entity, one directory per export      |
//!
//! A `population_<year>` directory holds `zones.csv`, `dwellings.csv`,
//! `households.csv`, `persons.csv`, `jobs.csv` and `schools.csv` and can be
//! passed straight to `lu_data::load_population_dir`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use serde::Serialize;
use tracing::info;

use lu_core::Year;
use lu_data::DataContainer;

use crate::writer::ExportWriter;
use crate::{
    DwellingRow, HouseholdRow, IssueRow, JobRow, OutputError, OutputResult, PersonRow, SchoolRow,
    SummaryRow, TimerRow, YearRow, ZoneRow,
};

/// Writes run output as CSV files under one directory.
pub struct CsvWriter {
    dir:       PathBuf,
    summaries: Writer<File>,
    years:     Writer<File>,
    issues:    Writer<File>,
    timers:    Writer<File>,
    exported:  Vec<Year>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the run-level files and write their
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir:       dir.to_path_buf(),
            summaries: open(&dir.join("summaries.csv"), SummaryRow::HEADER)?,
            years:     open(&dir.join("years.csv"), YearRow::HEADER)?,
            issues:    open(&dir.join("issues.csv"), IssueRow::HEADER)?,
            timers:    open(&dir.join("timers.csv"), TimerRow::HEADER)?,
            exported:  Vec::new(),
            finished:  false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory a population export for `year` is written to.
    pub fn population_dir(&self, year: Year) -> PathBuf {
        self.dir.join(format!("population_{year}"))
    }

    /// Years exported so far, in write order.
    pub fn exported(&self) -> &[Year] {
        &self.exported
    }

    fn ensure_open(&self) -> OutputResult<()> {
        if self.finished { Err(OutputError::Finished) } else { Ok(()) }
    }
}

impl ExportWriter for CsvWriter {
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.ensure_open()?;
        self.summaries.serialize(row)?;
        Ok(())
    }

    fn write_year(&mut self, row: &YearRow) -> OutputResult<()> {
        self.ensure_open()?;
        self.years.serialize(row)?;
        Ok(())
    }

    fn write_issues(&mut self, rows: &[IssueRow]) -> OutputResult<()> {
        self.ensure_open()?;
        for row in rows {
            self.issues.serialize(row)?;
        }
        Ok(())
    }

    fn write_population(&mut self, year: Year, data: &DataContainer) -> OutputResult<()> {
        self.ensure_open()?;
        let dir = self.population_dir(year);
        fs::create_dir_all(&dir)?;

        write_table(&dir.join("zones.csv"), ZoneRow::HEADER, data.geography.zones.iter().map(ZoneRow::from))?;
        write_table(&dir.join("dwellings.csv"), DwellingRow::HEADER, data.dwellings.iter().map(DwellingRow::from))?;
        write_table(
            &dir.join("households.csv"),
            HouseholdRow::HEADER,
            data.households.iter().map(HouseholdRow::from),
        )?;
        write_table(&dir.join("persons.csv"), PersonRow::HEADER, data.persons.iter().map(PersonRow::from))?;
        write_table(&dir.join("jobs.csv"), JobRow::HEADER, data.jobs.iter().map(JobRow::from))?;
        write_table(&dir.join("schools.csv"), SchoolRow::HEADER, data.schools.iter().map(SchoolRow::from))?;

        self.exported.push(year);
        info!(
            %year,
            dir = %dir.display(),
            households = data.households.len(),
            persons = data.persons.len(),
            "synthetic population written",
        );
        Ok(())
    }

    fn write_timers(&mut self, rows: &[TimerRow]) -> OutputResult<()> {
        self.ensure_open()?;
        for row in rows {
            self.timers.serialize(row)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.years.flush()?;
        self.issues.flush()?;
        self.timers.flush()?;
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Open `path` and write `header`.  Rows are serialized without serde's own
/// header so empty tables still carry one.
fn open(path: &Path, header: &[&str]) -> OutputResult<Writer<File>> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    w.write_record(header)?;
    Ok(w)
}

fn write_table<R: Serialize>(path: &Path, header: &[&str], rows: impl Iterator<Item = R>) -> OutputResult<()> {
    let mut w = open(path, header)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

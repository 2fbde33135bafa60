//! Run configuration.
//!
//! `RunConfig` carries only the options the orchestration core consumes:
//! the simulated period, the random seed, the worker-pool size, and the year
//! sets that gate the expensive sub-steps.  Which years get which treatment
//! is data, not code.
//!
//! # JSON example
//!
//! ```json
//! {
//!   "scenario_name": "base",
//!   "implementation": "munich",
//!   "base_year": 2011,
//!   "start_year": 2011,
//!   "end_year": 2020,
//!   "seed": 42,
//!   "number_of_threads": 4,
//!   "skim_years": [2015],
//!   "transport_model_years": [2015, 2020]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, Year, YearSet};

// ── Implementation ────────────────────────────────────────────────────────────

/// Study-area implementation variant.  Selects optional sub-steps.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Implementation {
    #[default]
    Munich,
    Maryland,
    Msp,
    Perth,
    Kagawa,
    CapeTown,
    Austin,
}

impl Implementation {
    /// `true` if households in this implementation may switch to autonomous
    /// vehicles.
    pub fn supports_av_switching(self) -> bool {
        matches!(self, Implementation::Munich)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Implementation::Munich   => "munich",
            Implementation::Maryland => "maryland",
            Implementation::Msp      => "msp",
            Implementation::Perth    => "perth",
            Implementation::Kagawa   => "kagawa",
            Implementation::CapeTown => "cape_town",
            Implementation::Austin   => "austin",
        }
    }
}

impl std::fmt::Display for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// Name used to label outputs.
    pub scenario_name: String,

    #[serde(default)]
    pub implementation: Implementation,

    /// Year the input population describes.  Income adjustment and job
    /// vacancy recomputation are skipped in this year.
    pub base_year: Year,

    /// First simulated year (inclusive).  Usually equal to `base_year`;
    /// later when resuming from a snapshot.
    pub start_year: Year,

    /// Last year (exclusive): the loop runs `start_year..end_year` and the
    /// final state describes `end_year`.
    pub end_year: Year,

    /// Master RNG seed.  The same seed always produces identical results.
    #[serde(default)]
    pub seed: u64,

    /// Worker count for skim computation.
    #[serde(default = "default_threads")]
    pub number_of_threads: usize,

    /// Years in which the population is rescaled to control totals.
    #[serde(default)]
    pub scaling_years: YearSet,

    /// Years in which travel-time skims are refreshed.  The start year is
    /// never refreshed: setup already built the skims.
    #[serde(default)]
    pub skim_years: YearSet,

    /// Years in which the external transport model runs.
    #[serde(default)]
    pub transport_model_years: YearSet,

    /// Write a summary snapshot every N years (counted from `base_year`).
    /// `0` disables periodic summaries.
    #[serde(default = "default_summary_interval")]
    pub summary_interval_years: u32,

    /// Export the synthetic population at the end of the run.
    #[serde(default)]
    pub write_synthetic_population: bool,

    /// Additional years whose end-of-year population is exported.
    #[serde(default)]
    pub synthetic_population_years: YearSet,

    /// Operator stop file, checked once per simulated year.
    #[serde(default)]
    pub stopper_path: Option<PathBuf>,
}

fn default_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn default_summary_interval() -> u32 {
    1
}

impl RunConfig {
    /// A minimal valid configuration for `[start, end)` with no gated years.
    pub fn new(scenario_name: impl Into<String>, start_year: Year, end_year: Year) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            implementation: Implementation::default(),
            base_year: start_year,
            start_year,
            end_year,
            seed: 0,
            number_of_threads: 1,
            scaling_years: YearSet::new(),
            skim_years: YearSet::new(),
            transport_model_years: YearSet::new(),
            summary_interval_years: default_summary_interval(),
            write_synthetic_population: false,
            synthetic_population_years: YearSet::new(),
            stopper_path: None,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject configurations the control loop cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.end_year <= self.start_year {
            return Err(CoreError::Config(format!(
                "end year {} must be after start year {}",
                self.end_year, self.start_year
            )));
        }
        if self.start_year < self.base_year {
            return Err(CoreError::Config(format!(
                "start year {} precedes base year {}",
                self.start_year, self.base_year
            )));
        }
        if self.number_of_threads == 0 {
            return Err(CoreError::Config("number_of_threads must be at least 1".into()));
        }
        for (name, set) in [
            ("scaling_years", &self.scaling_years),
            ("skim_years", &self.skim_years),
            ("transport_model_years", &self.transport_model_years),
            ("synthetic_population_years", &self.synthetic_population_years),
        ] {
            if let Some(bad) = set.iter().find(|y| **y < self.base_year || **y > self.end_year) {
                return Err(CoreError::Config(format!(
                    "{name} contains {bad}, outside [{}, {}]",
                    self.base_year, self.end_year
                )));
            }
        }
        Ok(())
    }

    /// The simulated years, `start_year..end_year`.
    pub fn years(&self) -> impl Iterator<Item = Year> {
        Year::range(self.start_year, self.end_year)
    }

    // ── Gates ─────────────────────────────────────────────────────────────

    pub fn should_scale(&self, year: Year) -> bool {
        self.scaling_years.contains(&year)
    }

    pub fn should_refresh_skims(&self, year: Year) -> bool {
        self.skim_years.contains(&year) && year != self.start_year
    }

    pub fn should_run_transport_model(&self, year: Year) -> bool {
        self.transport_model_years.contains(&year)
    }

    pub fn should_write_summary(&self, year: Year) -> bool {
        let interval = self.summary_interval_years;
        interval > 0 && year.since(self.base_year) % interval == 0
    }

    pub fn should_export_population(&self, year: Year) -> bool {
        self.synthetic_population_years.contains(&year)
    }

    /// `true` for the year described by the input data.
    pub fn is_base_year(&self, year: Year) -> bool {
        year == self.base_year
    }
}

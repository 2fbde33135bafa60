//! The `LandUseModel` orchestrator and its annual loop.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{error, info, warn};

use lu_core::{Issues, RunConfig, SimRng, Year};
use lu_data::{DataContainer, Dwelling};
use lu_models::{AnnualModel, CarOwnershipModel, ModelContext, PopulationScaler, ScalingReport, YearCounters};
use lu_travel::TravelTimes;

use crate::{
    AnnualModelRegistry, EventScheduler, ModelObserver, SimError, SimResult, StopSignal, TimeTracker,
    YearReport,
};

// ── Run outcome ───────────────────────────────────────────────────────────────

/// How a run ended.  `last_year` is the last fully simulated year; the final
/// state describes the year after it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunOutcome {
    /// Every year in `[start_year, end_year)` was simulated.
    Completed { last_year: Year },
    /// The stop signal ended the run early.
    Stopped { last_year: Year },
}

impl RunOutcome {
    pub fn last_year(self) -> Year {
        match self {
            RunOutcome::Completed { last_year } | RunOutcome::Stopped { last_year } => last_year,
        }
    }

    /// The year the final state describes.
    pub fn final_year(self) -> Year {
        self.last_year().next()
    }

    pub fn is_completed(self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

// ── Mutable state ─────────────────────────────────────────────────────────────

/// Everything the models mutate, grouped so a [`ModelContext`] can borrow it
/// while the orchestrator's model tables are borrowed separately.
pub struct ModelState<T: TravelTimes> {
    pub data:   DataContainer,
    pub travel: T,
    pub issues: Issues,
    pub rng:    SimRng,
}

impl<T: TravelTimes> ModelState<T> {
    pub fn ctx(&mut self, year: Year) -> ModelContext<'_> {
        ModelContext::new(year, &mut self.data, &self.travel, &mut self.issues, &mut self.rng)
    }
}

/// The fixed household steps of the annual loop.
pub(crate) struct HouseholdSteps {
    pub income:        Box<dyn AnnualModel>,
    pub car_ownership: Box<dyn CarOwnershipModel>,
    pub av_switching:  Box<dyn CarOwnershipModel>,
    pub scaler:        Option<Box<dyn PopulationScaler>>,
}

// ── LandUseModel ──────────────────────────────────────────────────────────────

/// The annual land-use simulation.
///
/// ```text
/// setup:     issues reset · indicators · annual model setup (accessibility,
///            transport model for the start year)
/// for year in start_year..end_year:
///   ① scale to control totals            (scaling years)
///   ② job vacancy                        (not in the base year)
///   ③ dwelling overwrites for the year
///   ④ income adjustment                  (not in the base year)
///   ⑤ summary                            (summary years)
///   ⑥ micro-events, per type in registration order
///   ⑦ car ownership, then AV switching   (on households updated this year)
///   ⑧ annual models: skim refresh · transport model · accessibility ·
///      prices · user models               (each behind its gate)
///   ⑨ finish year · issue summary · stop check (not after the last year)
/// teardown:  final scaling (if end year scales) · export · summary · timers
/// ```
///
/// Any error aborts the run.  The observer's `on_run_end` is still called so
/// writers can flush, and the error is returned.
///
/// Create via [`ModelBuilder`][crate::ModelBuilder].
pub struct LandUseModel<T: TravelTimes> {
    pub config:    RunConfig,
    pub state:     ModelState<T>,
    pub scheduler: EventScheduler,
    pub registry:  AnnualModelRegistry,
    pub timers:    TimeTracker,

    pub(crate) household:  HouseholdSteps,
    pub(crate) overwrites: BTreeMap<Year, Vec<Dwelling>>,
    pub(crate) stop:       Box<dyn StopSignal>,

    /// Last year whose loop body completed.
    last_completed: Option<Year>,
    started:        bool,
}

impl<T: TravelTimes> LandUseModel<T> {
    pub(crate) fn new(
        config:     RunConfig,
        state:      ModelState<T>,
        scheduler:  EventScheduler,
        registry:   AnnualModelRegistry,
        household:  HouseholdSteps,
        overwrites: BTreeMap<Year, Vec<Dwelling>>,
        stop:       Box<dyn StopSignal>,
    ) -> Self {
        Self {
            config,
            state,
            scheduler,
            registry,
            timers: TimeTracker::new(),
            household,
            overwrites,
            stop,
            last_completed: None,
            started: false,
        }
    }

    pub fn data(&self) -> &DataContainer {
        &self.state.data
    }

    pub fn travel(&self) -> &T {
        &self.state.travel
    }

    pub fn issues(&self) -> &Issues {
        &self.state.issues
    }

    pub fn last_completed(&self) -> Option<Year> {
        self.last_completed
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run setup, every year from `start_year` to `end_year`, and teardown.
    ///
    /// A model can be run once.
    pub fn run<O: ModelObserver>(&mut self, observer: &mut O) -> SimResult<RunOutcome> {
        if self.started {
            return Err(SimError::Config("model has already been run".into()));
        }
        self.started = true;

        let result = self.run_inner(observer);
        let final_year = match &result {
            Ok(outcome) => outcome.final_year(),
            Err(e) => {
                error!(error = %e, last_completed = ?self.last_completed, "run failed");
                self.last_completed.map_or(self.config.start_year, Year::next)
            }
        };
        self.timers.log_report();
        observer.on_run_end(final_year, &self.timers);
        result
    }

    fn run_inner<O: ModelObserver>(&mut self, observer: &mut O) -> SimResult<RunOutcome> {
        self.setup(observer)?;

        let years: Vec<Year> = self.config.years().collect();
        let mut outcome = None;
        for year in years {
            self.simulate_year(year, observer)?;
            self.last_completed = Some(year);
            if year.next() < self.config.end_year && self.stop.should_stop() {
                warn!(%year, "stop requested, ending run after this year");
                outcome = Some(RunOutcome::Stopped { last_year: year });
                break;
            }
        }
        let outcome = match outcome {
            Some(o) => o,
            None => RunOutcome::Completed { last_year: Year(self.config.end_year.0 - 1) },
        };

        self.teardown(outcome, observer)?;
        Ok(outcome)
    }

    // ── Phases ────────────────────────────────────────────────────────────

    fn setup<O: ModelObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let start = self.config.start_year;
        info!(
            scenario = %self.config.scenario_name,
            implementation = %self.config.implementation,
            start = %start,
            end = %self.config.end_year,
            "setting up model",
        );
        let started = Instant::now();

        self.state.issues.reset();
        self.state.data.check_invariants()?;
        self.state.data.compute_indicators()?;
        self.registry.setup_all(&mut self.state.ctx(start))?;
        self.state.issues.log_summary();

        self.timers.record("setup", started.elapsed());
        observer.on_setup(&self.config, &self.state.data);
        Ok(())
    }

    fn simulate_year<O: ModelObserver>(&mut self, year: Year, observer: &mut O) -> SimResult<()> {
        let year_started = Instant::now();
        info!(%year, households = self.state.data.households.len(), "simulating year");
        self.state.issues.reset_for_period(year);
        observer.on_year_start(year);

        let scaling = if self.config.should_scale(year) { self.scale(year)? } else { None };

        let base = self.config.is_base_year(year);
        if !base {
            self.state.data.update_job_vacancy()?;
        }
        self.apply_overwrites(year)?;
        if !base {
            let started = Instant::now();
            self.household.income.run(&mut self.state.ctx(year))?;
            self.timers.record(self.household.income.name(), started.elapsed());
        }

        if self.config.should_write_summary(year) {
            observer.on_summary(year, &self.state.data);
        }

        let started = Instant::now();
        let events = self.scheduler.simulate(&mut self.state.ctx(year))?;
        self.timers.record("events", started.elapsed());

        let counters = match self.post_events(year) {
            Ok(counters) => counters,
            Err(e) => {
                self.scheduler.abandon_year();
                return Err(e);
            }
        };
        self.scheduler.finish_year(year, &counters, &self.state.data)?;

        self.state.issues.log_summary();
        if self.config.should_export_population(year) {
            observer.on_population_export(year, &self.state.data);
        }
        let report = YearReport {
            year,
            events,
            counters,
            scaling,
            issues: self.state.issues.summarize(),
        };
        observer.on_year_end(&report);

        let elapsed = year_started.elapsed();
        self.timers.record_year(year, elapsed);
        info!(
            %year,
            events = report.events.total_applied(),
            issues = report.issues.total(),
            secs = elapsed.as_secs_f64(),
            "year finished",
        );
        Ok(())
    }

    fn teardown<O: ModelObserver>(&mut self, outcome: RunOutcome, observer: &mut O) -> SimResult<()> {
        let final_year = outcome.final_year();
        self.state.issues.reset_for_period(final_year);

        if outcome.is_completed() && self.config.should_scale(final_year) {
            self.scale(final_year)?;
        }
        if self.config.write_synthetic_population || self.config.should_export_population(final_year) {
            observer.on_population_export(final_year, &self.state.data);
        }
        observer.on_summary(final_year, &self.state.data);
        self.state.issues.log_summary();

        info!(
            %final_year,
            households = self.state.data.households.len(),
            persons = self.state.data.persons.len(),
            "run finished",
        );
        Ok(())
    }

    // ── Steps ─────────────────────────────────────────────────────────────

    fn scale(&mut self, year: Year) -> SimResult<Option<ScalingReport>> {
        let Some(scaler) = self.household.scaler.as_mut() else {
            warn!(%year, "scaling year configured but no population scaler set");
            return Ok(None);
        };
        let started = Instant::now();
        let report = scaler.scale(&mut self.state.ctx(year))?;
        self.timers.record("scaling", started.elapsed());
        Ok(Some(report))
    }

    fn apply_overwrites(&mut self, year: Year) -> SimResult<()> {
        let Some(dwellings) = self.overwrites.remove(&year) else {
            return Ok(());
        };
        let n = dwellings.len();
        for dwelling in dwellings {
            self.state.data.add_dwelling(dwelling)?;
        }
        info!(%year, dwellings = n, "dwelling overwrites applied");
        Ok(())
    }

    /// Car ownership and AV switching for the households updated this year.
    /// The updated set is drained here, so it starts empty next year.
    /// Vehicle updates and the annual models, between dispatch and year end.
    fn post_events(&mut self, year: Year) -> SimResult<YearCounters> {
        let counters = self.update_vehicles(year)?;
        self.registry.run_all(&mut self.state.ctx(year), &self.config, &mut self.timers)?;
        Ok(counters)
    }

    fn update_vehicles(&mut self, year: Year) -> SimResult<YearCounters> {
        let updated = self.state.data.households.take_updated();

        let started = Instant::now();
        let car_changes = self.household.car_ownership.update(&updated, &mut self.state.ctx(year))?;
        self.timers.record(self.household.car_ownership.name(), started.elapsed());

        let av_switches = if self.config.implementation.supports_av_switching() {
            let started = Instant::now();
            let n = self.household.av_switching.update(&updated, &mut self.state.ctx(year))?;
            self.timers.record(self.household.av_switching.name(), started.elapsed());
            n
        } else {
            0
        };
        Ok(YearCounters { car_changes, av_switches })
    }
}

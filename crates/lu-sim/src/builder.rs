//! Fluent builder for constructing a [`LandUseModel`].

use std::collections::BTreeMap;

use tracing::warn;

use lu_core::{Issues, RunConfig, SimRng, Year};
use lu_data::{DataContainer, Dwelling};
use lu_models::{
    AnnualModel, AvSwitching, BirthModel, BirthdayModel, CarOwnershipModel, DeathModel, EmploymentModel,
    EventModel, EventType, HansenAccessibility, IncomeAdjustment, PopulationScaler, RelocationModel,
    RuleCarOwnership, SkimRefresh, TransportStep, VacancyPricing,
};
use lu_travel::{SkimSource, StaticSkimSource, TransportModel, TravelTimes};

use crate::model::{HouseholdSteps, ModelState};
use crate::{
    AnnualModelRegistry, EventScheduler, Gate, LandUseModel, NeverStop, SimError, SimResult, StopSignal,
    StopperFile,
};

/// Fluent builder for [`LandUseModel<T>`].
///
/// # Required inputs
///
/// - [`RunConfig`]: years, seed, gated year sets
/// - [`DataContainer`]: the loaded population
/// - `T: TravelTimes`: the travel-time provider, already built over the
///   study area's zones
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                                 |
/// |-----------------------------|-----------------------------------------|
/// | `.event_model(kind, m)`     | no event models                         |
/// | `.default_event_models()`   | birthday, birth, death, employment, relocation |
/// | `.annual_model(m, gate)`    | none (run after prices)                 |
/// | `.income(m)`                | `IncomeAdjustment`                      |
/// | `.car_ownership(m)`         | `RuleCarOwnership`                      |
/// | `.av_switching(m)`          | `AvSwitching` (Munich only)             |
/// | `.accessibility(m)`         | `HansenAccessibility`                   |
/// | `.pricing(m)`               | `VacancyPricing`                        |
/// | `.scaler(s)`                | none; scaling years are skipped         |
/// | `.skim_source(s)`           | `StaticSkimSource` (replays current state) |
/// | `.transport_model(m)`       | none; transport years are skipped       |
/// | `.dwelling_overwrite(y, d)` | none                                    |
/// | `.stop_signal(s)`           | `StopperFile` at `stopper_path`, else never |
///
/// # Example
///
/// ```rust,ignore
/// let travel = NetworkTravelTimes::new(zones, state, DijkstraRouter, config.number_of_threads)?;
/// let mut model = ModelBuilder::new(config, data, travel)
///     .default_event_models()
///     .scaler(Box::new(ControlTotalScaler::new(totals)))
///     .build()?;
/// model.run(&mut NoopObserver)?;
/// ```
pub struct ModelBuilder<T: TravelTimes> {
    config:          RunConfig,
    data:            DataContainer,
    travel:          T,
    event_models:    Vec<(EventType, Box<dyn EventModel>)>,
    annual_models:   Vec<(Box<dyn AnnualModel>, Gate)>,
    income:          Box<dyn AnnualModel>,
    car_ownership:   Box<dyn CarOwnershipModel>,
    av_switching:    Box<dyn CarOwnershipModel>,
    accessibility:   Box<dyn AnnualModel>,
    pricing:         Box<dyn AnnualModel>,
    scaler:          Option<Box<dyn PopulationScaler>>,
    skim_source:     Option<Box<dyn SkimSource>>,
    transport_model: Option<Box<dyn TransportModel>>,
    overwrites:      Vec<(Year, Dwelling)>,
    stop:            Option<Box<dyn StopSignal>>,
}

impl<T: TravelTimes> ModelBuilder<T> {
    /// Create a builder with all required inputs.
    pub fn new(config: RunConfig, data: DataContainer, travel: T) -> Self {
        Self {
            config,
            data,
            travel,
            event_models:    Vec::new(),
            annual_models:   Vec::new(),
            income:          Box::new(IncomeAdjustment::default()),
            car_ownership:   Box::new(RuleCarOwnership::default()),
            av_switching:    Box::new(AvSwitching::default()),
            accessibility:   Box::new(HansenAccessibility::default()),
            pricing:         Box::new(VacancyPricing::default()),
            scaler:          None,
            skim_source:     None,
            transport_model: None,
            overwrites:      Vec::new(),
            stop:            None,
        }
    }

    /// Register the handler for one event type.  Dispatch order is
    /// registration order.
    pub fn event_model(mut self, kind: EventType, model: Box<dyn EventModel>) -> Self {
        self.event_models.push((kind, model));
        self
    }

    /// Register the built-in rule-based event models.
    pub fn default_event_models(self) -> Self {
        self.event_model(EventType::Birthday, Box::new(BirthdayModel::default()))
            .event_model(EventType::Birth, Box::new(BirthModel::default()))
            .event_model(EventType::Death, Box::new(DeathModel::default()))
            .event_model(EventType::Employment, Box::new(EmploymentModel::default()))
            .event_model(EventType::Relocation, Box::new(RelocationModel::default()))
    }

    /// Add an annual model that runs after the price update.
    pub fn annual_model(mut self, model: Box<dyn AnnualModel>, gate: Gate) -> Self {
        self.annual_models.push((model, gate));
        self
    }

    pub fn income(mut self, model: Box<dyn AnnualModel>) -> Self {
        self.income = model;
        self
    }

    pub fn car_ownership(mut self, model: Box<dyn CarOwnershipModel>) -> Self {
        self.car_ownership = model;
        self
    }

    pub fn av_switching(mut self, model: Box<dyn CarOwnershipModel>) -> Self {
        self.av_switching = model;
        self
    }

    pub fn accessibility(mut self, model: Box<dyn AnnualModel>) -> Self {
        self.accessibility = model;
        self
    }

    pub fn pricing(mut self, model: Box<dyn AnnualModel>) -> Self {
        self.pricing = model;
        self
    }

    pub fn scaler(mut self, scaler: Box<dyn PopulationScaler>) -> Self {
        self.scaler = Some(scaler);
        self
    }

    pub fn skim_source(mut self, source: Box<dyn SkimSource>) -> Self {
        self.skim_source = Some(source);
        self
    }

    pub fn transport_model(mut self, model: Box<dyn TransportModel>) -> Self {
        self.transport_model = Some(model);
        self
    }

    /// Add `dwelling` to the stock at the start of `year`.
    pub fn dwelling_overwrite(mut self, year: Year, dwelling: Dwelling) -> Self {
        self.overwrites.push((year, dwelling));
        self
    }

    pub fn stop_signal(mut self, stop: Box<dyn StopSignal>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Validate inputs, assemble the event and annual model tables, and
    /// return a ready-to-run [`LandUseModel`].
    pub fn build(self) -> SimResult<LandUseModel<T>> {
        let config = self.config;
        config.validate()?;

        // ── Event models ──────────────────────────────────────────────────
        let mut scheduler = EventScheduler::new();
        for (kind, model) in self.event_models {
            scheduler.register_event_model(kind, model)?;
        }

        // ── Annual models, in loop order ──────────────────────────────────
        let mut registry = AnnualModelRegistry::new();
        let source = self.skim_source.unwrap_or_else(|| Box::new(StaticSkimSource::new()));
        registry.register(Box::new(SkimRefresh::new(source)), Gate::YearsExceptStart(config.skim_years.clone()));
        match self.transport_model {
            Some(model) => {
                let step = TransportStep::new(model)
                    .run_at_setup(config.should_run_transport_model(config.start_year));
                registry.register(Box::new(step), Gate::YearsExceptStart(config.transport_model_years.clone()));
            }
            None if !config.transport_model_years.is_empty() => {
                warn!("transport model years configured but no transport model set; skipping");
            }
            None => {}
        }
        registry.register(self.accessibility, Gate::Always);
        registry.register(self.pricing, Gate::Always);
        for (model, gate) in self.annual_models {
            registry.register(model, gate);
        }

        if self.scaler.is_none() && !config.scaling_years.is_empty() {
            warn!("scaling years configured but no population scaler set; skipping");
        }

        // ── Dwelling overwrites ───────────────────────────────────────────
        let mut overwrites: BTreeMap<Year, Vec<Dwelling>> = BTreeMap::new();
        for (year, dwelling) in self.overwrites {
            if year < config.start_year || year >= config.end_year {
                return Err(SimError::Config(format!(
                    "overwrite of {} in {year} is outside [{}, {})",
                    dwelling.id, config.start_year, config.end_year
                )));
            }
            overwrites.entry(year).or_default().push(dwelling);
        }

        let stop = match (self.stop, &config.stopper_path) {
            (Some(stop), _) => stop,
            (None, Some(path)) => Box::new(StopperFile::new(path.clone())) as Box<dyn StopSignal>,
            (None, None) => Box::new(NeverStop),
        };

        let state = ModelState {
            data:   self.data,
            travel: self.travel,
            issues: Issues::new(),
            rng:    SimRng::new(config.seed),
        };
        let household = HouseholdSteps {
            income:        self.income,
            car_ownership: self.car_ownership,
            av_switching:  self.av_switching,
            scaler:        self.scaler,
        };
        Ok(LandUseModel::new(config, state, scheduler, registry, household, overwrites, stop))
    }
}

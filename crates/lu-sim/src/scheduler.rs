//! Micro-event scheduler.
//!
//! # Year state machine
//!
//! ```text
//! Idle ──simulate──▶ Generating(y) ⇄ Dispatching(y) ──finish_year──▶ Finishing(y) ──▶ Idle
//! ```
//!
//! For each registered event type, in registration order, the scheduler
//! asks its model for the year's candidate events and then applies them in
//! list order.  Application is strictly sequential; the first `Err` aborts
//! the year and returns the scheduler to `Idle`.

use std::fmt;

use tracing::debug;

use lu_core::Year;
use lu_data::DataContainer;
use lu_models::{EventModel, EventType, ModelContext, YearCounters};

use crate::{SimError, SimResult};

/// Where the scheduler is within a simulated year.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Generating(Year),
    Dispatching(Year),
    Finishing(Year),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle           => f.write_str("idle"),
            Phase::Generating(y)  => write!(f, "generating {y}"),
            Phase::Dispatching(y) => write!(f, "dispatching {y}"),
            Phase::Finishing(y)   => write!(f, "finishing {y}"),
        }
    }
}

/// Per-type counts for one simulated year.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EventCount {
    pub kind:      EventType,
    pub generated: u64,
    /// Events whose handler reported a state change.
    pub applied:   u64,
}

/// Event counts for one year, in dispatch order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventTally {
    pub counts: Vec<EventCount>,
}

impl EventTally {
    pub fn applied(&self, kind: EventType) -> u64 {
        self.counts.iter().find(|c| c.kind == kind).map_or(0, |c| c.applied)
    }

    pub fn total_applied(&self) -> u64 {
        self.counts.iter().map(|c| c.applied).sum()
    }

    pub fn total_generated(&self) -> u64 {
        self.counts.iter().map(|c| c.generated).sum()
    }
}

/// Ordered table of event handlers, one per [`EventType`].
pub struct EventScheduler {
    models: Vec<(EventType, Box<dyn EventModel>)>,
    phase:  Phase,
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventScheduler {
    pub fn new() -> Self {
        Self { models: Vec::new(), phase: Phase::Idle }
    }

    /// Register the handler for `kind`.  Each type may be registered once.
    pub fn register_event_model(&mut self, kind: EventType, model: Box<dyn EventModel>) -> SimResult<()> {
        if self.models.iter().any(|(k, _)| *k == kind) {
            return Err(SimError::Config(format!("event type '{kind}' registered twice")));
        }
        self.models.push((kind, model));
        Ok(())
    }

    /// Registered types in dispatch order.
    pub fn event_types(&self) -> Vec<EventType> {
        self.models.iter().map(|(k, _)| *k).collect()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generate and apply every registered event type for `ctx.year`.
    ///
    /// The scheduler is left in `Dispatching` until [`finish_year`] closes
    /// the year.
    ///
    /// [`finish_year`]: EventScheduler::finish_year
    pub fn simulate(&mut self, ctx: &mut ModelContext<'_>) -> SimResult<EventTally> {
        if self.phase != Phase::Idle {
            return Err(SimError::Config(format!(
                "cannot simulate {} while {}",
                ctx.year, self.phase
            )));
        }
        let result = self.dispatch(ctx);
        if result.is_err() {
            self.phase = Phase::Idle;
        }
        result
    }

    fn dispatch(&mut self, ctx: &mut ModelContext<'_>) -> SimResult<EventTally> {
        let year = ctx.year;
        let mut tally = EventTally::default();
        for (kind, model) in &mut self.models {
            self.phase = Phase::Generating(year);
            let events = model.prepare_year(year, ctx.data, ctx.rng)?;

            self.phase = Phase::Dispatching(year);
            let mut count = EventCount { kind: *kind, generated: events.len() as u64, applied: 0 };
            for event in &events {
                if event.kind != *kind {
                    return Err(SimError::Config(format!(
                        "'{kind}' handler produced a '{}' event",
                        event.kind
                    )));
                }
                if model.apply(event, ctx)? {
                    count.applied += 1;
                }
            }
            debug!(%year, event = %kind, generated = count.generated, applied = count.applied, "events applied");
            tally.counts.push(count);
        }
        self.phase = Phase::Dispatching(year);
        Ok(tally)
    }

    /// Drop back to `Idle` after a failure between [`simulate`] and
    /// [`finish_year`].  Year-end hooks are not run.
    ///
    /// [`simulate`]: EventScheduler::simulate
    /// [`finish_year`]: EventScheduler::finish_year
    pub fn abandon_year(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Year-end bookkeeping for every registered model, in registration
    /// order.  Must follow a successful [`simulate`] for the same year.
    ///
    /// [`simulate`]: EventScheduler::simulate
    pub fn finish_year(&mut self, year: Year, counters: &YearCounters, data: &DataContainer) -> SimResult<()> {
        if self.phase != Phase::Dispatching(year) {
            return Err(SimError::Config(format!("cannot finish {year} while {}", self.phase)));
        }
        self.phase = Phase::Finishing(year);
        for (_, model) in &mut self.models {
            if let Err(e) = model.finish_year(year, counters, data) {
                self.phase = Phase::Idle;
                return Err(e.into());
            }
        }
        self.phase = Phase::Idle;
        Ok(())
    }
}

//! `lu-sim` — the annual control loop of the land-use microsimulation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`scheduler`] | `EventScheduler`, `Phase`, `EventTally`                    |
//! | [`registry`]  | `AnnualModelRegistry`, `Gate`                              |
//! | [`model`]     | `LandUseModel`, `ModelState`, `RunOutcome`                 |
//! | [`builder`]   | `ModelBuilder`                                             |
//! | [`observer`]  | `ModelObserver`, `NoopObserver`, `YearReport`              |
//! | [`stop`]      | `StopSignal`, `StopperFile`, `StopFlag`, `NeverStop`       |
//! | [`timer`]     | `TimeTracker`                                              |
//! | [`error`]     | `SimError`, `SimResult<T>`                                 |
//!
//! # Threading
//!
//! One thread drives the loop and applies every event, so a run is
//! reproducible from its seed.  Parallel work happens only inside the
//! travel-time provider while it computes skims.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lu_sim::{ModelBuilder, NoopObserver};
//!
//! let mut model = ModelBuilder::new(config, data, travel)
//!     .default_event_models()
//!     .build()?;
//! let outcome = model.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod model;
pub mod observer;
pub mod registry;
pub mod scheduler;
pub mod stop;
pub mod timer;


pub use builder::ModelBuilder;
pub use error::{SimError, SimResult};
pub use model::{LandUseModel, ModelState, RunOutcome};
pub use observer::{ModelObserver, NoopObserver, YearReport};
pub use registry::{AnnualModelRegistry, Gate};
pub use scheduler::{EventCount, EventScheduler, EventTally, Phase};
pub use stop::{NeverStop, StopFlag, StopSignal, StopperFile};
pub use timer::TimeTracker;

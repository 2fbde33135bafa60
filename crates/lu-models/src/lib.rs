//! `lu-models` — model extension points and the default rule-based models.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                    |
//! |-------------------|-------------------------------------------------------------|
//! | [`model`]         | `EventModel`, `AnnualModel`, `CarOwnershipModel`, `PopulationScaler` |
//! | [`context`]       | `ModelContext` — what a model may touch during a call       |
//! | [`event`]         | `EventType`, `EventTarget`, `Event`                         |
//! | [`choice`]        | `choose_weighted`                                           |
//! | [`demography`]    | `BirthdayModel`, `BirthModel`, `DeathModel`                 |
//! | [`employment`]    | `EmploymentModel`                                           |
//! | [`relocation`]    | `RelocationModel`                                           |
//! | [`household`]     | `IncomeAdjustment`, `RuleCarOwnership`, `AvSwitching`       |
//! | [`accessibility`] | `HansenAccessibility`                                       |
//! | [`pricing`]       | `VacancyPricing`                                            |
//! | [`scaling`]       | `ControlTotalScaler`                                        |
//! | [`steps`]         | `SkimRefresh`, `TransportStep`                              |
//! | [`noop`]          | `NoopModel`                                                 |
//! | [`error`]         | `ModelError`, `ModelResult<T>`                              |
//!
//! # Errors versus issues
//!
//! A model returns `Err` only for a broken invariant (an id that must exist
//! does not, a dwelling that must be vacant is occupied).  Expected sparsity,
//! such as no vacant dwelling or every alternative having zero weight, is
//! counted through `ctx.issues` and the event is skipped.

pub mod accessibility;
pub mod choice;
pub mod context;
pub mod demography;
pub mod employment;
pub mod error;
pub mod event;
pub mod household;
pub mod model;
pub mod noop;
pub mod pricing;
pub mod relocation;
pub mod scaling;
pub mod steps;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use accessibility::HansenAccessibility;
pub use choice::choose_weighted;
pub use context::ModelContext;
pub use demography::{BirthModel, BirthdayModel, DeathModel};
pub use employment::EmploymentModel;
pub use error::{ModelError, ModelResult};
pub use event::{Event, EventTarget, EventType};
pub use household::{AvSwitching, IncomeAdjustment, RuleCarOwnership};
pub use model::{AnnualModel, CarOwnershipModel, EventModel, PopulationScaler, ScalingReport, YearCounters};
pub use noop::NoopModel;
pub use pricing::VacancyPricing;
pub use relocation::RelocationModel;
pub use scaling::ControlTotalScaler;
pub use steps::{SkimRefresh, TransportStep};

//! `lu-travel` — the travel-time provider.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`skim`]       | `SkimMatrix` (dense zone×zone minutes), `ZoneSystem`        |
//! | [`partition`]  | `partition` — near-equal contiguous origin chunks           |
//! | [`provider`]   | `TravelTimes` trait, `NetworkState`, `NetworkTravelTimes`   |
//! | [`transport`]  | `SkimSource`, `TransportModel` + simple implementations     |
//! | [`error`]      | `TravelError`, `TravelResult<T>`                            |
//!
//! # Caching
//!
//! Skims are computed lazily per `(Mode, Period)` and then shared as
//! `Arc<SkimMatrix>`.  A cached skim is immutable; [`TravelTimes::update`]
//! swaps in a new network state and drops every cache under one write lock,
//! so a reader sees either the old state with its skims or the new state with
//! none.

pub mod error;
pub mod partition;
pub mod provider;
pub mod skim;
pub mod transport;


pub use error::{TravelError, TravelResult};
pub use partition::partition;
pub use provider::{NetworkState, NetworkTravelTimes, TravelTimes};
pub use skim::{SkimMatrix, ZoneSystem};
pub use transport::{CommuteCongestionModel, SkimSource, StaticSkimSource, TransportModel};

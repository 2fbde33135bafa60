//! `lu-spatial` — road network, congestion state and routing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`network`]    | `RoadNetwork` (CSR + R-tree), `Edge`, `RoadNetworkBuilder` |
//! | [`disutility`] | `Disutility`: per-edge peak congestion factors           |
//! | [`router`]     | `Router` trait, `Route`, `DijkstraRouter`                |
//! | [`loader`]     | `load_network`, `load_network_dir` (CSV node/edge lists) |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                       |

pub mod disutility;
pub mod error;
pub mod loader;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use disutility::Disutility;
pub use error::{SpatialError, SpatialResult};
pub use loader::{load_network, load_network_dir};
pub use network::{Edge, RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router, UNREACHABLE_MS};

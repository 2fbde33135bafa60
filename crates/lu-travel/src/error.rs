//! Travel-time error type.

use thiserror::Error;

use lu_core::{RegionId, ZoneId};
use lu_spatial::SpatialError;

/// Errors produced by `lu-travel`.
#[derive(Debug, Error)]
pub enum TravelError {
    /// A query mixed a zone-level and a point-level location.
    #[error("invalid travel-time query: {0}")]
    InvalidArgument(String),

    #[error("zone {0} is not part of the zone system")]
    UnknownZone(ZoneId),

    #[error("region {0} is not part of the zone system")]
    UnknownRegion(RegionId),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("transport model failed: {0}")]
    TransportModel(String),

    #[error("could not build skim worker pool: {0}")]
    ThreadPool(String),
}

pub type TravelResult<T> = Result<T, TravelError>;

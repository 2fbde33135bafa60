//! Geographic coordinates and the zone/point location sum type.
//!
//! Entities are located either at zone level (only the zone is known) or at
//! a micro location (a coordinate inside a zone).  Every consumer matches on
//! [`Location`] exhaustively; there is no fallback arm.

use serde::{Deserialize, Serialize};

use crate::ZoneId;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 coordinate stored as single-precision floats.
///
/// At the equator `f32` gives ~1 m precision, more than enough for snapping
/// a dwelling or job to the nearest road node.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f32 {
        const R: f32 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Location ──────────────────────────────────────────────────────────────────

/// A coordinate together with the zone that contains it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MicroLocation {
    pub zone:  ZoneId,
    pub point: GeoPoint,
}

/// Where an entity sits: a whole zone or a point within one.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Location {
    Zone(ZoneId),
    Point(MicroLocation),
}

impl Location {
    /// The containing zone, available at either resolution.
    #[inline]
    pub fn zone(&self) -> ZoneId {
        match self {
            Location::Zone(z) => *z,
            Location::Point(m) => m.zone,
        }
    }

    pub fn point(zone: ZoneId, point: GeoPoint) -> Self {
        Location::Point(MicroLocation { zone, point })
    }

    pub fn is_zone_level(&self) -> bool {
        matches!(self, Location::Zone(_))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Zone(z) => write!(f, "{z}"),
            Location::Point(m) => write!(f, "{}@{}", m.zone, m.point),
        }
    }
}

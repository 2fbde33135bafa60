//! Zones and regions.
//!
//! Geography is static within a year.  Only the aggregate attributes
//! (accessibility scores) change, written by the accessibility model.

use lu_core::{GeoPoint, RegionId, Year, ZoneId};

use crate::{DataError, DataResult, Keyed, Registry};

#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub id:                    ZoneId,
    pub region:                RegionId,
    pub centroid:              GeoPoint,
    pub area_km2:              f64,
    /// Car accessibility, scaled 0–100.
    pub car_accessibility:     f64,
    /// Transit accessibility, scaled 0–100.
    pub transit_accessibility: f64,
}

impl Zone {
    pub fn new(id: ZoneId, region: RegionId, centroid: GeoPoint, area_km2: f64) -> Self {
        Self {
            id,
            region,
            centroid,
            area_km2,
            car_accessibility: 0.0,
            transit_accessibility: 0.0,
        }
    }
}

impl Keyed for Zone {
    type Id = ZoneId;
    fn id(&self) -> ZoneId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id:            RegionId,
    /// Member zones in insertion order.
    pub zones:         Vec<ZoneId>,
    /// Population-weighted mean of member zones' car accessibility.
    pub accessibility: f64,
}

impl Keyed for Region {
    type Id = RegionId;
    fn id(&self) -> RegionId {
        self.id
    }
}

/// Zones, regions, and the year the accessibility scores describe.
#[derive(Debug, Default)]
pub struct Geography {
    pub zones:              Registry<Zone>,
    pub regions:            Registry<Region>,
    /// Year for which `car_accessibility` / `transit_accessibility` were last
    /// computed.  `None` until the first accessibility pass.
    pub accessibility_year: Option<Year>,
}

impl Geography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone, creating its region on first use.
    pub fn add_zone(&mut self, zone: Zone) -> DataResult<()> {
        let (zone_id, region_id) = (zone.id, zone.region);
        self.zones.add(zone)?;
        if !self.regions.contains(region_id) {
            self.regions.add(Region { id: region_id, zones: Vec::new(), accessibility: 0.0 })?;
        }
        self.regions.get_mut(region_id)?.zones.push(zone_id);
        Ok(())
    }

    pub fn region_of(&self, zone: ZoneId) -> DataResult<RegionId> {
        Ok(self.zones.get(zone)?.region)
    }

    /// Fail unless `zone` is known.
    pub fn require_zone(&self, zone: ZoneId) -> DataResult<()> {
        if self.zones.contains(zone) {
            Ok(())
        } else {
            Err(DataError::NotFound(zone.to_string()))
        }
    }
}

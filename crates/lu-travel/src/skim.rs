//! Zone system and dense skim matrices.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use lu_core::{GeoPoint, RegionId, ZoneId};
use lu_data::Geography;

use crate::{TravelError, TravelResult};

// ── ZoneSystem ────────────────────────────────────────────────────────────────

/// Dense numbering of the study-area zones, fixed for a run.
///
/// Skim row/column `i` is `zones()[i]`.  Zones are ordered by id, so the
/// layout does not depend on how the geography was loaded.
#[derive(Clone, Debug)]
pub struct ZoneSystem {
    zones:     Vec<ZoneId>,
    centroids: Vec<GeoPoint>,
    index:     FxHashMap<ZoneId, usize>,
    regions:   BTreeMap<RegionId, Vec<usize>>,
}

impl ZoneSystem {
    pub fn from_geography(geography: &Geography) -> Self {
        let mut zones: Vec<_> = geography.zones.iter().map(|z| (z.id, z.centroid, z.region)).collect();
        zones.sort_by_key(|(id, _, _)| *id);

        let mut system = Self {
            zones:     Vec::with_capacity(zones.len()),
            centroids: Vec::with_capacity(zones.len()),
            index:     FxHashMap::default(),
            regions:   BTreeMap::new(),
        };
        for (i, (id, centroid, region)) in zones.into_iter().enumerate() {
            system.zones.push(id);
            system.centroids.push(centroid);
            system.index.insert(id, i);
            system.regions.entry(region).or_default().push(i);
        }
        system
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    pub fn centroids(&self) -> &[GeoPoint] {
        &self.centroids
    }

    pub fn index_of(&self, zone: ZoneId) -> TravelResult<usize> {
        self.index.get(&zone).copied().ok_or(TravelError::UnknownZone(zone))
    }

    /// Matrix indices of the zones in `region`.
    pub fn region_members(&self, region: RegionId) -> TravelResult<&[usize]> {
        self.regions
            .get(&region)
            .map(Vec::as_slice)
            .ok_or(TravelError::UnknownRegion(region))
    }
}

// ── SkimMatrix ────────────────────────────────────────────────────────────────

/// Zone×zone travel times in minutes, row-major.  Unreachable pairs hold
/// `f32::INFINITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct SkimMatrix {
    size:   usize,
    values: Vec<f32>,
}

impl SkimMatrix {
    /// Build from row-major minutes.  `values.len()` must be `size²`.
    pub fn from_rows(size: usize, values: Vec<f32>) -> TravelResult<Self> {
        if values.len() != size * size {
            return Err(TravelError::InvalidArgument(format!(
                "{} values cannot fill a {size}×{size} skim",
                values.len()
            )));
        }
        Ok(Self { size, values })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Minutes from matrix row `origin` to column `destination`.
    #[inline]
    pub fn get(&self, origin: usize, destination: usize) -> f32 {
        self.values[origin * self.size + destination]
    }

    pub fn row(&self, origin: usize) -> &[f32] {
        &self.values[origin * self.size..(origin + 1) * self.size]
    }

    /// Mean over reachable off-diagonal cells; `0.0` if none.
    pub fn mean_minutes(&self) -> f64 {
        let (sum, n) = (0..self.size)
            .flat_map(|o| (0..self.size).filter(move |d| *d != o).map(move |d| (o, d)))
            .map(|(o, d)| self.get(o, d))
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0u64), |(s, n), v| (s + v as f64, n + 1));
        if n == 0 { 0.0 } else { sum / n as f64 }
    }
}

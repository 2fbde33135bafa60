//! Collaborators that produce new network states.
//!
//! * [`SkimSource`] supplies the network state for a skim-refresh year
//!   (typically congestion replayed from an earlier transport-model run).
//! * [`TransportModel`] runs a full assignment against the current
//!   population and returns the congested state it observed.
//!
//! The orchestrator feeds either result to [`TravelTimes::update`].

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::info;

use lu_core::{GeoPoint, Location, Mode, NodeId, Period, Year};
use lu_data::DataContainer;
use lu_spatial::{DijkstraRouter, Disutility, Router, SpatialError};

use crate::{NetworkState, TravelError, TravelResult, TravelTimes};

// ── SkimSource ────────────────────────────────────────────────────────────────

pub trait SkimSource: Send {
    /// Network state to serve from `year` on.
    fn state_for_year(&mut self, year: Year, current: &NetworkState) -> TravelResult<NetworkState>;
}

/// Congestion snapshots keyed by the year they were observed.  A refresh in
/// year `y` uses the latest snapshot at or before `y`, or keeps the current
/// state when there is none.
#[derive(Default)]
pub struct StaticSkimSource {
    snapshots: BTreeMap<Year, Disutility>,
}

impl StaticSkimSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, year: Year, disutility: Disutility) -> Self {
        self.snapshots.insert(year, disutility);
        self
    }
}

impl SkimSource for StaticSkimSource {
    fn state_for_year(&mut self, year: Year, current: &NetworkState) -> TravelResult<NetworkState> {
        match self.snapshots.range(..=year).next_back() {
            Some((_, d)) => current.with_disutility(d.clone()),
            None => Ok(current.clone()),
        }
    }
}

// ── TransportModel ────────────────────────────────────────────────────────────

/// External transport model.  Blocking; no timeout or retry is applied by
/// the caller, and any error is fatal to the run.
pub trait TransportModel: Send {
    fn run(
        &mut self,
        year: Year,
        data: &DataContainer,
        travel: &dyn TravelTimes,
    ) -> TravelResult<NetworkState>;
}

/// Peak car assignment of home→work commutes with BPR link delays.
///
/// Every employed person is routed by car over the free-flow network from
/// their dwelling to their job; each trip adds `vehicles_per_trip` to the
/// volume of every edge on its path.  The peak factor on an edge is
/// `1 + alpha · (volume / capacity)^beta`.
pub struct CommuteCongestionModel {
    pub capacity_vph:      f32,
    pub vehicles_per_trip: f32,
    pub alpha:             f32,
    pub beta:              i32,
}

impl Default for CommuteCongestionModel {
    fn default() -> Self {
        Self { capacity_vph: 1_800.0, vehicles_per_trip: 1.0, alpha: 0.15, beta: 4 }
    }
}

impl CommuteCongestionModel {
    fn point_of(data: &DataContainer, location: Location) -> TravelResult<GeoPoint> {
        match location {
            Location::Point(m) => Ok(m.point),
            Location::Zone(z) => data
                .geography
                .zones
                .get(z)
                .map(|zone| zone.centroid)
                .map_err(|e| TravelError::TransportModel(e.to_string())),
        }
    }

    /// (home node, work node) for each commuter, in person order.
    fn commutes(data: &DataContainer, state: &NetworkState) -> TravelResult<Vec<(NodeId, NodeId)>> {
        let lookup = |e: lu_data::DataError| TravelError::TransportModel(e.to_string());
        let mut trips = Vec::new();
        for person in data.persons.iter() {
            let Some(job) = person.job else { continue };
            let household = data.households.get(person.household).map_err(lookup)?;
            let Some(dwelling) = household.dwelling else { continue };
            let home = data.dwellings.get(dwelling).map_err(lookup)?.location();
            let work = data.jobs.get(job).map_err(lookup)?.location;
            let from = state.network.snap_to_node(Self::point_of(data, home)?)?;
            let to = state.network.snap_to_node(Self::point_of(data, work)?)?;
            trips.push((from, to));
        }
        Ok(trips)
    }
}

impl TransportModel for CommuteCongestionModel {
    fn run(
        &mut self,
        year: Year,
        data: &DataContainer,
        travel: &dyn TravelTimes,
    ) -> TravelResult<NetworkState> {
        let state = travel.network_state();
        let free_flow = Disutility::free_flow(&state.network);
        let trips = Self::commutes(data, &state)?;

        let mut volume = vec![0.0f32; state.network.edge_count()];
        let mut routes: FxHashMap<(NodeId, NodeId), Arc<Vec<usize>>> = FxHashMap::default();
        let mut unrouted = 0usize;
        for (from, to) in &trips {
            let edges = match routes.get(&(*from, *to)) {
                Some(r) => Arc::clone(r),
                None => {
                    let path = match DijkstraRouter.route(
                        &state.network,
                        &free_flow,
                        *from,
                        *to,
                        Mode::Car,
                        Period::OffPeak,
                    ) {
                        Ok(route) => route.edges.iter().map(|e| e.index()).collect(),
                        Err(SpatialError::NoRoute { .. }) => {
                            unrouted += 1;
                            Vec::new()
                        }
                        Err(e) => return Err(e.into()),
                    };
                    let path = Arc::new(path);
                    routes.insert((*from, *to), Arc::clone(&path));
                    path
                }
            };
            for &e in edges.iter() {
                volume[e] += self.vehicles_per_trip;
            }
        }

        let factors = volume
            .iter()
            .map(|v| 1.0 + self.alpha * (v / self.capacity_vph).powi(self.beta))
            .collect();
        let disutility = Disutility::from_factors(&state.network, factors)?;
        info!(
            %year,
            trips = trips.len(),
            unrouted,
            mean_factor = disutility.mean_factor(),
            "transport model assigned commutes",
        );
        state.with_disutility(disutility)
    }
}

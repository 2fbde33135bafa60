//! The `TravelTimes` trait and its network-backed implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use lu_core::{Location, Mode, NodeId, Period, RegionId, ZoneId};
use lu_spatial::{
    DijkstraRouter, Disutility, RoadNetwork, Router, SpatialError, UNREACHABLE_MS,
};

use crate::{SkimMatrix, TravelError, TravelResult, ZoneSystem, partition};

// ── TravelTimes trait ─────────────────────────────────────────────────────────

/// Origin–destination travel times for the models.
///
/// All times are in minutes; unreachable pairs yield `f64::INFINITY`.
///
/// # Thread safety
///
/// `Send + Sync`: a provider may be read from several threads while one
/// thread calls [`update`](Self::update).  Readers never observe a state
/// where the network has changed but an old skim is still served.
pub trait TravelTimes: Send + Sync {
    /// Travel time between two locations of the same level, departing
    /// `time_of_day_secs` after midnight.
    ///
    /// Zone pairs read the skim for the departure's [`Period`]; point pairs
    /// are routed on the network.  A zone/point mix fails with
    /// [`TravelError::InvalidArgument`].
    fn travel_time(
        &self,
        origin: Location,
        destination: Location,
        time_of_day_secs: u32,
        mode: Mode,
    ) -> TravelResult<f64>;

    /// Zone×zone skim for `mode` in `period`, computed on first use and
    /// shared until the next [`update`](Self::update).
    fn skim(&self, mode: Mode, period: Period) -> TravelResult<Arc<SkimMatrix>>;

    fn peak_skim(&self, mode: Mode) -> TravelResult<Arc<SkimMatrix>> {
        self.skim(mode, Period::Peak)
    }

    fn zone_system(&self) -> &ZoneSystem;

    /// The network state currently served.
    fn network_state(&self) -> Arc<NetworkState>;

    /// Swap in a new network state and drop every cached result.
    fn update(&self, state: NetworkState) -> TravelResult<()>;

    /// Shortest peak travel time from `origin` to any zone of `region`.
    fn travel_time_to_region(&self, origin: ZoneId, region: RegionId, mode: Mode) -> TravelResult<f64>;

    /// An independent provider over the same static data with empty caches.
    fn duplicate(&self) -> Self
    where
        Self: Sized;
}

// ── NetworkState ──────────────────────────────────────────────────────────────

/// A routable network plus the congestion it carries.  Immutable; replace
/// it as a whole through [`TravelTimes::update`].
#[derive(Clone)]
pub struct NetworkState {
    pub network:    Arc<RoadNetwork>,
    pub disutility: Arc<Disutility>,
}

impl NetworkState {
    pub fn free_flow(network: Arc<RoadNetwork>) -> Self {
        let disutility = Arc::new(Disutility::free_flow(&network));
        Self { network, disutility }
    }

    pub fn new(network: Arc<RoadNetwork>, disutility: Disutility) -> TravelResult<Self> {
        if disutility.edge_count() != network.edge_count() {
            return Err(SpatialError::EdgeCountMismatch {
                expected: network.edge_count(),
                actual:   disutility.edge_count(),
            }
            .into());
        }
        Ok(Self { network, disutility: Arc::new(disutility) })
    }

    /// Same network, new congestion.
    pub fn with_disutility(&self, disutility: Disutility) -> TravelResult<Self> {
        Self::new(Arc::clone(&self.network), disutility)
    }
}

// ── NetworkTravelTimes ────────────────────────────────────────────────────────

type SkimKey = (Mode, Period);

struct Inner {
    state:        Arc<NetworkState>,
    /// Road node each zone centroid snaps to, indexed like the skim.
    zone_nodes:   Arc<Vec<NodeId>>,
    /// Bumped by every `update`; a skim computed against an older
    /// generation is discarded.
    generation:   u64,
    skims:        HashMap<SkimKey, Arc<SkimMatrix>>,
    region_times: FxHashMap<(ZoneId, RegionId, Mode), f64>,
}

/// [`TravelTimes`] backed by a [`RoadNetwork`] and a pluggable [`Router`].
///
/// Skim rows are computed on a dedicated rayon pool: origins are split into
/// `number_of_threads` contiguous chunks (see [`partition`]), one task per
/// chunk, and the rows are joined in order before the matrix is published.
pub struct NetworkTravelTimes<R: Router = DijkstraRouter> {
    zones:   Arc<ZoneSystem>,
    router:  Arc<R>,
    pool:    Arc<rayon::ThreadPool>,
    threads: usize,
    inner:   RwLock<Inner>,
}

impl<R: Router> NetworkTravelTimes<R> {
    pub fn new(
        zones: ZoneSystem,
        state: NetworkState,
        router: R,
        number_of_threads: usize,
    ) -> TravelResult<Self> {
        let threads = number_of_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("skim-{i}"))
            .build()
            .map_err(|e| TravelError::ThreadPool(e.to_string()))?;
        let zone_nodes = snap_zones(&zones, &state.network)?;
        Ok(Self {
            zones: Arc::new(zones),
            router: Arc::new(router),
            pool: Arc::new(pool),
            threads,
            inner: RwLock::new(Inner {
                state:        Arc::new(state),
                zone_nodes:   Arc::new(zone_nodes),
                generation:   0,
                skims:        HashMap::new(),
                region_times: FxHashMap::default(),
            }),
        })
    }

    /// Number of `update` calls so far.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Like [`TravelTimes::duplicate`] but carrying over the skims computed
    /// so far.
    pub fn duplicate_with_skims(&self) -> Self {
        let copy = self.duplicate();
        {
            let src = self.read();
            let mut dst = copy.write();
            dst.skims = src.skims.clone();
            dst.region_times = src.region_times.clone();
        }
        copy
    }

    // Writers only replace whole fields, so a poisoned guard is still coherent.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn compute_skim(
        &self,
        state: &NetworkState,
        zone_nodes: &[NodeId],
        mode: Mode,
        period: Period,
    ) -> TravelResult<SkimMatrix> {
        let n = zone_nodes.len();
        let router = self.router.as_ref();
        let chunks = partition(n, self.threads);
        debug!(%mode, ?period, zones = n, chunks = chunks.len(), "computing skim");

        let rows: Vec<Vec<f32>> = self.pool.install(|| {
            chunks
                .into_par_iter()
                .map(|origins| {
                    let mut out = Vec::with_capacity(origins.len() * n);
                    for o in origins {
                        let tree = router.tree(
                            &state.network,
                            &state.disutility,
                            zone_nodes[o],
                            mode,
                            period,
                        )?;
                        out.extend(zone_nodes.iter().map(|d| match tree[d.index()] {
                            UNREACHABLE_MS => f32::INFINITY,
                            ms => ms as f32 / 60_000.0,
                        }));
                    }
                    Ok(out)
                })
                .collect::<TravelResult<Vec<_>>>()
        })?;

        SkimMatrix::from_rows(n, rows.concat())
    }
}

fn snap_zones(zones: &ZoneSystem, network: &RoadNetwork) -> TravelResult<Vec<NodeId>> {
    zones
        .centroids()
        .iter()
        .map(|c| network.snap_to_node(*c).map_err(TravelError::from))
        .collect()
}

impl<R: Router> TravelTimes for NetworkTravelTimes<R> {
    fn travel_time(
        &self,
        origin: Location,
        destination: Location,
        time_of_day_secs: u32,
        mode: Mode,
    ) -> TravelResult<f64> {
        let period = Period::from_seconds(time_of_day_secs);
        match (origin, destination) {
            (Location::Zone(o), Location::Zone(d)) => {
                let (o, d) = (self.zones.index_of(o)?, self.zones.index_of(d)?);
                Ok(self.skim(mode, period)?.get(o, d) as f64)
            }
            (Location::Point(o), Location::Point(d)) => {
                let state = self.network_state();
                let from = state.network.snap_to_node(o.point)?;
                let to = state.network.snap_to_node(d.point)?;
                match self.router.route(&state.network, &state.disutility, from, to, mode, period) {
                    Ok(route) => Ok(route.minutes()),
                    Err(SpatialError::NoRoute { .. }) => Ok(f64::INFINITY),
                    Err(e) => Err(e.into()),
                }
            }
            (o, d) => Err(TravelError::InvalidArgument(format!(
                "cannot mix zone-level and point-level locations ({o} → {d})"
            ))),
        }
    }

    fn skim(&self, mode: Mode, period: Period) -> TravelResult<Arc<SkimMatrix>> {
        loop {
            let (state, zone_nodes, generation) = {
                let inner = self.read();
                if let Some(skim) = inner.skims.get(&(mode, period)) {
                    return Ok(Arc::clone(skim));
                }
                (Arc::clone(&inner.state), Arc::clone(&inner.zone_nodes), inner.generation)
            };

            let computed = Arc::new(self.compute_skim(&state, &zone_nodes, mode, period)?);

            let mut inner = self.write();
            if inner.generation == generation {
                // A concurrent reader may have filled the slot first; keep
                // whichever landed so every caller shares one instance.
                let slot = inner.skims.entry((mode, period)).or_insert(computed);
                return Ok(Arc::clone(slot));
            }
            debug!(%mode, "network updated during skim computation; recomputing");
        }
    }

    fn zone_system(&self) -> &ZoneSystem {
        &self.zones
    }

    fn network_state(&self) -> Arc<NetworkState> {
        Arc::clone(&self.read().state)
    }

    fn update(&self, state: NetworkState) -> TravelResult<()> {
        let zone_nodes = snap_zones(&self.zones, &state.network)?;
        let mut inner = self.write();
        inner.state = Arc::new(state);
        inner.zone_nodes = Arc::new(zone_nodes);
        inner.generation += 1;
        inner.skims.clear();
        inner.region_times.clear();
        info!(generation = inner.generation, "travel times updated; skim caches cleared");
        Ok(())
    }

    fn travel_time_to_region(&self, origin: ZoneId, region: RegionId, mode: Mode) -> TravelResult<f64> {
        let key = (origin, region, mode);
        let generation = {
            let inner = self.read();
            if let Some(t) = inner.region_times.get(&key) {
                return Ok(*t);
            }
            inner.generation
        };

        let skim = self.peak_skim(mode)?;
        let o = self.zones.index_of(origin)?;
        let best = self
            .zones
            .region_members(region)?
            .iter()
            .map(|&d| skim.get(o, d) as f64)
            .fold(f64::INFINITY, f64::min);

        let mut inner = self.write();
        if inner.generation == generation {
            inner.region_times.insert(key, best);
        }
        Ok(best)
    }

    fn duplicate(&self) -> Self {
        let src = self.read();
        Self {
            zones:   Arc::clone(&self.zones),
            router:  Arc::clone(&self.router),
            pool:    Arc::clone(&self.pool),
            threads: self.threads,
            inner:   RwLock::new(Inner {
                state:        Arc::clone(&src.state),
                zone_nodes:   Arc::clone(&src.zone_nodes),
                generation:   src.generation,
                skims:        HashMap::new(),
                region_times: FxHashMap::default(),
            }),
        }
    }
}

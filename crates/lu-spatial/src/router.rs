//! Routing trait and default Dijkstra implementation.
//!
//! Two query shapes are offered: a point-to-point [`Route`] for micro-level
//! travel times, and a one-to-all [`Router::tree`] used to fill skim rows
//! (one tree per origin zone).
//!
//! All costs are in **milliseconds** (u32) internally.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use lu_core::{EdgeId, Mode, NodeId, Period};

use crate::{Disutility, RoadNetwork, SpatialError, SpatialResult};

/// Marker cost for nodes a tree could not reach.
pub const UNREACHABLE_MS: u32 = u32::MAX;

// ── Route ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Route {
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    pub total_travel_secs: f32,
}

impl Route {
    pub fn minutes(&self) -> f64 {
        self.total_travel_secs as f64 / 60.0
    }

    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync`: skim rows are computed on several
/// worker threads sharing one router.
pub trait Router: Send + Sync {
    fn route(
        &self,
        network: &RoadNetwork,
        disutility: &Disutility,
        from: NodeId,
        to: NodeId,
        mode: Mode,
        period: Period,
    ) -> SpatialResult<Route>;

    /// Cost in ms from `from` to every node; [`UNREACHABLE_MS`] where no path
    /// exists.
    fn tree(
        &self,
        network: &RoadNetwork,
        disutility: &Disutility,
        from: NodeId,
        mode: Mode,
        period: Period,
    ) -> SpatialResult<Vec<u32>>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR graph.
///
/// | Mode    | Edge cost                                  |
/// |---------|--------------------------------------------|
/// | Car     | free-flow time × peak congestion factor    |
/// | Transit | length / 8.3 m/s                           |
/// | Bike    | length / 4.2 m/s                           |
/// | Walk    | length / 1.4 m/s                           |
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        disutility: &Disutility,
        from: NodeId,
        to: NodeId,
        mode: Mode,
        period: Period,
    ) -> SpatialResult<Route> {
        network.require_node(from)?;
        network.require_node(to)?;
        if from == to {
            return Ok(Route { edges: vec![], total_travel_secs: 0.0 });
        }
        let search = Search::run(network, disutility, from, Some(to), mode, period);
        match search.dist[to.index()] {
            UNREACHABLE_MS => Err(SpatialError::NoRoute { from, to }),
            total_ms => Ok(search.reconstruct(network, to, total_ms)),
        }
    }

    fn tree(
        &self,
        network: &RoadNetwork,
        disutility: &Disutility,
        from: NodeId,
        mode: Mode,
        period: Period,
    ) -> SpatialResult<Vec<u32>> {
        network.require_node(from)?;
        Ok(Search::run(network, disutility, from, None, mode, period).dist)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn edge_cost_ms(
    network: &RoadNetwork,
    disutility: &Disutility,
    edge: EdgeId,
    mode: Mode,
    period: Period,
) -> u32 {
    let e = network.edge(edge);
    match mode {
        Mode::Car     => (e.free_flow_ms as f32 * disutility.factor(edge, mode, period)) as u32,
        Mode::Transit => (e.length_m / 8.3 * 1000.0) as u32,
        Mode::Bike    => (e.length_m / 4.2 * 1000.0) as u32,
        Mode::Walk    => (e.length_m / 1.4 * 1000.0) as u32,
    }
}

struct Search {
    dist:      Vec<u32>,
    prev_edge: Vec<EdgeId>,
}

impl Search {
    /// Run Dijkstra from `from`, stopping early once `target` is settled.
    fn run(
        network: &RoadNetwork,
        disutility: &Disutility,
        from: NodeId,
        target: Option<NodeId>,
        mode: Mode,
        period: Period,
    ) -> Self {
        let n = network.node_count();
        let mut dist      = vec![UNREACHABLE_MS; n];
        let mut prev_edge = vec![EdgeId::INVALID; n];
        dist[from.index()] = 0;

        // (cost, node): NodeId breaks ties deterministically.
        let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if Some(node) == target {
                break;
            }
            if cost > dist[node.index()] {
                continue;
            }
            for edge in network.out_edges(node) {
                let neighbor = network.edge(edge).to;
                let step = edge_cost_ms(network, disutility, edge, mode, period);
                // Stay strictly below the unreachable marker.
                let new_cost = cost.saturating_add(step).min(UNREACHABLE_MS - 1);
                if new_cost < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_cost;
                    prev_edge[neighbor.index()] = edge;
                    heap.push(Reverse((new_cost, neighbor)));
                }
            }
        }
        Self { dist, prev_edge }
    }

    fn reconstruct(&self, network: &RoadNetwork, to: NodeId, total_ms: u32) -> Route {
        let mut edges = Vec::new();
        let mut cur = to;
        loop {
            let e = self.prev_edge[cur.index()];
            if e == EdgeId::INVALID {
                break;
            }
            edges.push(e);
            cur = network.edge(e).from;
        }
        edges.reverse();
        Route { edges, total_travel_secs: total_ms as f32 / 1000.0 }
    }
}

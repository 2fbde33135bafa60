//! Road network representation and builder.
//!
//! # Data layout
//!
//! Links are kept in **Compressed Sparse Row (CSR)** form: sorted by source
//! node, so the outgoing links of node `n` are the `EdgeId` range
//! `first_out[n] .. first_out[n + 1]`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Micro
//! locations and zone centroids are snapped to road nodes through it.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use lu_core::{EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space; good enough for
    /// nearest-node queries within one study area.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// One directed road link.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub from:         NodeId,
    pub to:           NodeId,
    /// Physical length in metres.
    pub length_m:     f32,
    /// Free-flow car travel time in milliseconds.
    pub free_flow_ms: u32,
}

/// Directed road graph in CSR form plus a spatial index for snapping
/// dwellings, jobs and zone centroids to nodes.
///
/// Immutable once built; construct through [`RoadNetworkBuilder`].  Shared
/// between skim workers behind an `Arc`.
#[derive(Debug)]
pub struct RoadNetwork {
    nodes:     Vec<GeoPoint>,
    /// CSR row pointer, length `node_count + 1`.
    first_out: Vec<u32>,
    /// Sorted by source node, indexed by `EdgeId`.
    edges:     Vec<Edge>,
    index:     RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network with no nodes.  Every point-level query against it fails
    /// with [`SpatialError::EmptyNetwork`].
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position(&self, node: NodeId) -> SpatialResult<GeoPoint> {
        self.nodes.get(node.index()).copied().ok_or(SpatialError::NodeNotFound(node))
    }

    /// The edge behind `id`.  Ids come from this network, so indexing is
    /// direct.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let lo = self.first_out[node.index()];
        let hi = self.first_out[node.index() + 1];
        (lo..hi).map(EdgeId)
    }

    /// Fail unless `node` exists in this network.
    pub fn require_node(&self, node: NodeId) -> SpatialResult<()> {
        self.position(node).map(|_| ())
    }

    /// Nearest road node to `pos`.
    pub fn snap_to_node(&self, pos: GeoPoint) -> SpatialResult<NodeId> {
        self.index
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
            .ok_or(SpatialError::EmptyNetwork)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and links, then [`build`](Self::build)s the CSR graph.
///
/// # Example
///
/// ```
/// use lu_core::GeoPoint;
/// use lu_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(48.13, 11.57));
/// let c = b.add_node(GeoPoint::new(48.14, 11.58));
/// b.add_road(a, c, 1_200.0, 90_000);
/// let net = b.build();
/// assert_eq!(net.edge_count(), 2);
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes: Vec<GeoPoint>,
    edges: Vec<Edge>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; ids are handed out densely from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        self.nodes.push(pos);
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// Add a one-way link.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f32, free_flow_ms: u32) {
        self.edges.push(Edge { from, to, length_m, free_flow_ms });
    }

    /// Add a two-way road as a pair of links.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f32, free_flow_ms: u32) {
        self.add_directed_edge(a, b, length_m, free_flow_ms);
        self.add_directed_edge(b, a, length_m, free_flow_ms);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sort links by source node (stably, so `EdgeId`s follow insertion
    /// order within a node) and index them.
    pub fn build(mut self) -> RoadNetwork {
        self.edges.sort_by_key(|e| e.from);

        let mut first_out = vec![0u32; self.nodes.len() + 1];
        for e in &self.edges {
            first_out[e.from.index() + 1] += 1;
        }
        for i in 1..first_out.len() {
            first_out[i] += first_out[i - 1];
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .zip(0u32..)
            .map(|(pos, i)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i) })
            .collect();

        RoadNetwork {
            index: RTree::bulk_load(entries),
            nodes: self.nodes,
            first_out,
            edges: self.edges,
        }
    }
}

//! Unit tests for lu-spatial.
//!
//! All tests use hand-crafted networks.

#[cfg(test)]
mod helpers {
    use lu_core::{GeoPoint, NodeId};
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Small grid network.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Free flow 0→4: via 1,2 = 30 s; via 3 = 60 s.
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_road(n0, n1, 100.0, 10_000);
        b.add_road(n1, n2, 100.0, 10_000);
        b.add_road(n2, n4, 100.0, 10_000);
        b.add_road(n0, n3, 500.0, 50_000);
        b.add_road(n3, n4, 100.0, 10_000);

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use lu_core::{GeoPoint, NodeId};
    use crate::{RoadNetworkBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_degrees() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.edge_count(), 10);
        for n in [n0, n1, n2, n3, n4] {
            assert_eq!(net.out_edges(n).count(), 2);
            for e in net.out_edges(n) {
                assert_eq!(net.edge(e).from, n);
            }
        }
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 10_000);
        let net = b.build();
        assert_eq!(net.out_edges(a).count(), 1);
        assert_eq!(net.out_edges(c).count(), 0);
    }

    #[test]
    fn require_node_bounds() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert!(net.require_node(n0).is_ok());
        assert!(matches!(net.require_node(NodeId(99)), Err(SpatialError::NodeNotFound(_))));
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use lu_core::GeoPoint;
    use crate::{RoadNetwork, SpatialError};

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.0)).unwrap(), n0);
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.4)).unwrap(), n0);
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.6)).unwrap(), n1);
    }

    #[test]
    fn empty_network_cannot_snap() {
        let net = RoadNetwork::empty();
        assert!(matches!(net.snap_to_node(GeoPoint::new(0.0, 0.0)), Err(SpatialError::EmptyNetwork)));
    }
}

// ── Congestion ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod disutility {
    use lu_core::{EdgeId, Mode, Period};
    use crate::{Disutility, SpatialError};

    #[test]
    fn peak_applies_to_car_only() {
        let (net, _) = super::helpers::grid_network();
        let d = Disutility::uniform(&net, 2.0);
        assert_eq!(d.factor(EdgeId(0), Mode::Car, Period::Peak), 2.0);
        assert_eq!(d.factor(EdgeId(0), Mode::Car, Period::OffPeak), 1.0);
        assert_eq!(d.factor(EdgeId(0), Mode::Walk, Period::Peak), 1.0);
        assert_eq!(d.mean_factor(), 2.0);
    }

    #[test]
    fn factors_clamped_and_length_checked() {
        let (net, _) = super::helpers::grid_network();
        let d = Disutility::from_factors(&net, vec![0.5; 10]).unwrap();
        assert_eq!(d.factor(EdgeId(3), Mode::Car, Period::Peak), 1.0);
        assert!(matches!(
            Disutility::from_factors(&net, vec![1.0; 3]),
            Err(SpatialError::EdgeCountMismatch { expected: 10, actual: 3 })
        ));
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use lu_core::{GeoPoint, Mode, Period};
    use crate::{DijkstraRouter, Disutility, RoadNetworkBuilder, Router, SpatialError, UNREACHABLE_MS};

    const OFF: Period = Period::OffPeak;

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let d = Disutility::free_flow(&net);
        let r = DijkstraRouter.route(&net, &d, n0, n0, Mode::Car, OFF).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.minutes(), 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let d = Disutility::free_flow(&net);
        let route = DijkstraRouter.route(&net, &d, n0, n4, Mode::Car, OFF).unwrap();
        assert_eq!(route.total_travel_secs, 30.0);
        assert_eq!(route.minutes(), 0.5);
        assert_eq!(net.edge(route.edges[0]).to, n1);
        assert_eq!(net.edge(route.edges[1]).to, n2);
        assert_eq!(net.edge(route.edges[2]).to, n4);
    }

    #[test]
    fn peak_congestion_reroutes() {
        let (net, [n0, n1, _, n3, n4]) = super::helpers::grid_network();
        let factors = net
            .edges()
            .iter()
            .map(|e| if e.from == n0 && e.to == n1 { 10.0 } else { 1.0 })
            .collect();
        let d = Disutility::from_factors(&net, factors).unwrap();

        let peak = DijkstraRouter.route(&net, &d, n0, n4, Mode::Car, Period::Peak).unwrap();
        assert_eq!(peak.total_travel_secs, 60.0);
        assert_eq!(net.edge(peak.edges[0]).to, n3);

        let off = DijkstraRouter.route(&net, &d, n0, n4, Mode::Car, OFF).unwrap();
        assert_eq!(off.total_travel_secs, 30.0);
    }

    #[test]
    fn tree_reaches_every_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let d = Disutility::free_flow(&net);
        let tree = DijkstraRouter.tree(&net, &d, n0, Mode::Car, OFF).unwrap();
        assert_eq!(tree, vec![0, 10_000, 20_000, 40_000, 30_000]);
    }

    #[test]
    fn tree_marks_unreachable() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 10_000);
        let net = b.build();
        let d = Disutility::free_flow(&net);
        assert_eq!(DijkstraRouter.tree(&net, &d, c, Mode::Car, OFF).unwrap(), vec![UNREACHABLE_MS, 0]);
        assert!(matches!(
            DijkstraRouter.route(&net, &d, c, a, Mode::Car, OFF),
            Err(SpatialError::NoRoute { .. })
        ));
    }

    #[test]
    fn walk_slower_than_car() {
        let (net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let d = Disutility::free_flow(&net);
        let car  = DijkstraRouter.route(&net, &d, n0, n4, Mode::Car, OFF).unwrap();
        let walk = DijkstraRouter.route(&net, &d, n0, n4, Mode::Walk, OFF).unwrap();
        assert!(walk.total_travel_secs > car.total_travel_secs);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{SpatialError, load_network};

    const NODES: &str = "id,lat,lon\n100,48.10,11.50\n200,48.11,11.51\n300,48.12,11.52\n";

    #[test]
    fn renumbers_nodes_and_derives_times() {
        let edges = "from,to,length_m,speed_kmh,oneway\n100,200,1000,36,false\n200,300,500,18,true\n";
        let net = load_network(Cursor::new(NODES.as_bytes()), Cursor::new(edges.as_bytes())).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 3);
        // 1000 m at 10 m/s.
        assert!(net.edges().iter().any(|e| e.free_flow_ms == 100_000));
    }

    #[test]
    fn unknown_node_rejected() {
        let edges = "from,to,length_m,speed_kmh,oneway\n100,999,10,30,false\n";
        let err = load_network(Cursor::new(NODES.as_bytes()), Cursor::new(edges.as_bytes())).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(_)));
    }
}

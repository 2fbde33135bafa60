//! CSV road-network loader.
//!
//! | File        | Columns                                 |
//! |-------------|-----------------------------------------|
//! | `nodes.csv` | `id,lat,lon`                            |
//! | `edges.csv` | `from,to,length_m,speed_kmh,oneway`     |
//!
//! Node ids in the file are arbitrary integers; they are renumbered to dense
//! `NodeId`s in file order.  `oneway` defaults to `false`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::info;

use lu_core::{GeoPoint, NodeId};

use crate::{RoadNetwork, RoadNetworkBuilder, SpatialError, SpatialResult};

#[derive(Deserialize)]
struct NodeRecord {
    id:  u64,
    lat: f32,
    lon: f32,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:      u64,
    to:        u64,
    length_m:  f32,
    speed_kmh: f32,
    #[serde(default)]
    oneway:    bool,
}

/// Load `nodes.csv` and `edges.csv` from `dir`.
pub fn load_network_dir(dir: &Path) -> SpatialResult<RoadNetwork> {
    let nodes = File::open(dir.join("nodes.csv"))?;
    let edges = File::open(dir.join("edges.csv"))?;
    load_network(nodes, edges)
}

/// Like [`load_network_dir`] but accepts any `Read` sources.
pub fn load_network<R: Read>(nodes: R, edges: R) -> SpatialResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut index: FxHashMap<u64, NodeId> = FxHashMap::default();

    for row in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let n = row?;
        let id = builder.add_node(GeoPoint::new(n.lat, n.lon));
        if index.insert(n.id, id).is_some() {
            return Err(SpatialError::Parse(format!("duplicate node id {}", n.id)));
        }
    }

    for row in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let e = row?;
        let lookup = |raw: u64| {
            index
                .get(&raw)
                .copied()
                .ok_or_else(|| SpatialError::Parse(format!("edge references unknown node {raw}")))
        };
        let (from, to) = (lookup(e.from)?, lookup(e.to)?);
        if e.speed_kmh <= 0.0 || e.length_m < 0.0 {
            return Err(SpatialError::Parse(format!(
                "edge {}→{} has length {} m at {} km/h",
                e.from, e.to, e.length_m, e.speed_kmh
            )));
        }
        let travel_ms = (e.length_m / (e.speed_kmh / 3.6) * 1000.0) as u32;
        if e.oneway {
            builder.add_directed_edge(from, to, e.length_m, travel_ms);
        } else {
            builder.add_road(from, to, e.length_m, travel_ms);
        }
    }

    let network = builder.build();
    info!(nodes = network.node_count(), edges = network.edge_count(), "road network loaded");
    Ok(network)
}

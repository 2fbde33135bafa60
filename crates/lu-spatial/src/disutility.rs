//! Per-edge congestion state.
//!
//! The transport model reports how congested each edge was at peak; the
//! router multiplies free-flow car times by these factors for peak-period
//! queries.  Off-peak queries always use free flow.

use lu_core::{EdgeId, Mode, Period};

use crate::{RoadNetwork, SpatialError, SpatialResult};

/// Peak congestion multipliers, one per edge, each `>= 1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Disutility {
    congestion: Vec<f32>,
}

impl Disutility {
    /// No congestion anywhere.
    pub fn free_flow(network: &RoadNetwork) -> Self {
        Self { congestion: vec![1.0; network.edge_count()] }
    }

    /// The same factor on every edge.
    pub fn uniform(network: &RoadNetwork, factor: f32) -> Self {
        Self { congestion: vec![factor.max(1.0); network.edge_count()] }
    }

    /// Explicit factors, indexed by `EdgeId`.  Values below 1 are clamped.
    pub fn from_factors(network: &RoadNetwork, mut factors: Vec<f32>) -> SpatialResult<Self> {
        if factors.len() != network.edge_count() {
            return Err(SpatialError::EdgeCountMismatch {
                expected: network.edge_count(),
                actual:   factors.len(),
            });
        }
        for f in &mut factors {
            *f = f.max(1.0);
        }
        Ok(Self { congestion: factors })
    }

    pub fn edge_count(&self) -> usize {
        self.congestion.len()
    }

    /// Multiplier applied to `edge` for `mode` during `period`.
    ///
    /// Only cars queue on the road network; other modes run at fixed speeds.
    #[inline]
    pub fn factor(&self, edge: EdgeId, mode: Mode, period: Period) -> f32 {
        match (mode, period) {
            (Mode::Car, Period::Peak) => self.congestion.get(edge.index()).copied().unwrap_or(1.0),
            _ => 1.0,
        }
    }

    /// Mean peak factor over all edges; `1.0` for an empty network.
    pub fn mean_factor(&self) -> f32 {
        if self.congestion.is_empty() {
            1.0
        } else {
            self.congestion.iter().sum::<f32>() / self.congestion.len() as f32
        }
    }
}

//! Proximity graph builder.
//!
//! Each render tick the builder walks every unordered pair `(i, j)`,
//! `i < j`, in increasing `i` then increasing `j` order and connects the
//! pair when both endpoints still have spare degree and their distance is
//! below the threshold. The walk order is part of the contract: with the
//! degree cap binding, earlier-indexed pairs win, and identical input
//! always yields an identical edge list.
//!
//! The pass is O(M²). That is fine for a hundred or so points; thousands
//! would need a spatial grid, which this builder does not have.

use glam::Vec3;
use tracing::trace;

use crate::config::ConnectionConfig;

/// One connection between two snapshot slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    /// `1 - dist / min_distance`, in [0, 1].
    pub intensity: f32,
}

/// Builds the capped-degree proximity graph, reusing its storage between ticks.
#[derive(Clone, Debug)]
pub struct ProximityBuilder {
    min_distance: f32,
    max_per_body: u32,
    budget: Vec<u32>,
    edges: Vec<Edge>,
}

impl ProximityBuilder {
    pub fn new(min_distance: f32, max_per_body: u32) -> Self {
        Self {
            min_distance,
            max_per_body,
            budget: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self::new(config.min_distance, config.max_per_body)
    }

    /// Pre-size the internal storage for `point_count` points.
    pub fn with_capacity(mut self, point_count: usize) -> Self {
        self.budget.reserve(point_count);
        self.edges.reserve(max_edges(point_count, self.max_per_body));
        self
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    pub fn max_per_body(&self) -> u32 {
        self.max_per_body
    }

    /// Rebuild the graph for `positions` and return the edges in walk order.
    pub fn build(&mut self, positions: &[Vec3]) -> &[Edge] {
        self.budget.clear();
        self.budget.resize(positions.len(), 0);
        self.edges.clear();

        let cap = self.max_per_body;
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if self.budget[i] >= cap || self.budget[j] >= cap {
                    continue;
                }

                let dist = positions[i].distance(positions[j]);
                if dist < self.min_distance {
                    self.edges.push(Edge {
                        a: i,
                        b: j,
                        intensity: 1.0 - dist / self.min_distance,
                    });
                    self.budget[i] += 1;
                    self.budget[j] += 1;
                }
            }
        }

        trace!(points = positions.len(), edges = self.edges.len(), "proximity pass");
        &self.edges
    }

    /// Edges from the last [`build`](Self::build).
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of connected pairs from the last build.
    pub fn connected_count(&self) -> usize {
        self.edges.len()
    }

    /// Degree of every point after the last build.
    pub fn degrees(&self) -> &[u32] {
        &self.budget
    }
}

/// Most edges a pass over `point_count` points can emit with a degree cap.
///
/// Each edge uses two units of degree, so the cap bounds the total at
/// `floor(M * cap / 2)`, and it can never exceed the `M * (M - 1) / 2` pairs.
pub fn max_edges(point_count: usize, max_per_body: u32) -> usize {
    let pairs = point_count * point_count.saturating_sub(1) / 2;
    let capped = point_count * max_per_body as usize / 2;
    pairs.min(capped)
}

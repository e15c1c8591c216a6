//! Incremental HNSW construction.

use crate::config::HnswConfig;
use crate::error::HnswResult;
use crate::graph::{HnswGraph, HnswNode};
use crate::search::{search_layer_beam, search_layer_descent};
use crate::HnswIndex;
use proxima_core::{CoreError, Vector};
use rand::prelude::*;

/// Builder inserting points one at a time in dataset order.
///
/// Every insert descends from the entry point to the new node's top layer,
/// then links the node layer by layer against the candidates of a beam
/// search. Neighbor lists are hard-capped per layer with a drop-tail
/// policy: when an append would leave a list over its cap, the most recent
/// link is evicted again, on both of its endpoints. A saturated list
/// therefore keeps its established neighbors and rejects newcomers; no
/// distance-based reselection takes place.
pub struct HnswBuilder {
    config: HnswConfig,
    dim: usize,
    data: Vec<Vector>,
    graph: HnswGraph,
    entry_point: u32,
    max_layer: usize,
    rng: StdRng,
}

impl HnswBuilder {
    /// Create a builder for vectors of the given dimension.
    pub fn new(dim: usize, config: HnswConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            dim,
            data: Vec::new(),
            graph: HnswGraph::new(),
            entry_point: 0,
            max_layer: 0,
            rng,
        }
    }

    /// Number of points inserted so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Insert one point. Its id is its insertion position.
    pub fn insert(&mut self, vector: Vector) -> HnswResult<()> {
        if vector.len() != self.dim {
            return Err(CoreError::DimensionMismatch {
                expected: self.dim,
                got: vector.len(),
            }
            .into());
        }

        let id = self.data.len() as u32;
        let layer = self.random_layer();
        self.data.push(vector);
        self.graph.push_node(HnswNode::new(layer));

        if id == 0 {
            self.entry_point = 0;
            self.max_layer = layer;
            return Ok(());
        }

        let query = self.data[id as usize].clone();
        let mut entry_points = vec![self.entry_point];

        // Descend to the new node's top layer, threading the single best
        // point forward.
        for lc in (layer + 1..=self.max_layer).rev() {
            let found = search_layer_descent(
                &self.graph,
                &self.data,
                &query,
                &entry_points,
                lc,
                self.config.m,
            );
            if let Some(best) = found.first() {
                entry_points = vec![best.id];
            }
        }

        // Link into every layer the new node lives on.
        for lc in (0..=layer.min(self.max_layer)).rev() {
            let candidates = search_layer_beam(
                &self.graph,
                &self.data,
                &query,
                &entry_points,
                lc,
                self.config.ef_construction,
            );

            let cap = self.config.max_connections(lc);
            for candidate in &candidates {
                if self.graph.neighbors(id as usize, lc).len() >= cap {
                    break;
                }
                self.graph.append_neighbor(id as usize, lc, candidate.id);
                self.graph.append_neighbor(candidate.id as usize, lc, id);

                if self.graph.neighbors(candidate.id as usize, lc).len() > cap {
                    // Drop-tail: the link just made is the one evicted.
                    self.graph.pop_neighbor(candidate.id as usize, lc);
                    self.graph.pop_neighbor(id as usize, lc);
                }
            }

            entry_points = candidates.iter().map(|c| c.id).collect();
        }

        if layer > self.max_layer {
            self.max_layer = layer;
            self.entry_point = id;
        }

        if (id as usize + 1) % 5000 == 0 {
            tracing::debug!("indexed {} points", id as usize + 1);
        }

        Ok(())
    }

    /// Finalize and return the index.
    pub fn finish(self) -> HnswIndex {
        HnswIndex {
            config: self.config,
            dim: self.dim,
            data: self.data,
            graph: self.graph,
            entry_point: self.entry_point,
            max_layer: self.max_layer,
        }
    }

    /// Draw a layer from the exponential distribution `floor(-ln(U) * ml)`.
    fn random_layer(&mut self) -> usize {
        let u: f64 = self.rng.gen();
        (-u.ln() * self.config.ml).floor() as usize
    }
}

//! HNSW (Hierarchical Navigable Small World) graph index.
//!
//! An approximate k-NN index built as a layered proximity graph: layer 0
//! holds every point, each higher layer is an exponentially sparser set of
//! long-range shortcuts. Search enters at the top layer, greedily descends
//! to layer 1, then runs a beam search over layer 0.
//!
//! Reference: "Efficient and robust approximate nearest neighbor search
//! using Hierarchical Navigable Small World graphs" by Malkov & Yashunin.
//!
//! # Example
//!
//! ```
//! use proxima_core::{Dataset, Vector};
//! use proxima_hnsw::{HnswConfig, HnswIndex};
//!
//! let dataset: Dataset = (0..300)
//!     .map(|i| Vector::new(vec![i as f64, (i % 7) as f64]))
//!     .collect();
//!
//! let index = HnswIndex::build(&dataset, HnswConfig::default()).unwrap();
//! let distances = index.search_k_nearest(&Vector::new(vec![40.2, 5.0]), 5, 50).unwrap();
//! assert_eq!(distances.len(), 5);
//! ```

mod builder;
mod config;
mod error;
mod graph;
mod search;

pub use builder::HnswBuilder;
pub use config::HnswConfig;
pub use error::{HnswError, HnswResult};
pub use graph::{GraphStats, HnswGraph, HnswNode};

use proxima_core::{CoreError, Dataset, Vector};
use search::{search_layer_beam, search_layer_descent};

/// A built HNSW index.
///
/// Owns a copy of the indexed vectors alongside the graph; the source
/// dataset is not touched after [`build`](HnswIndex::build) returns. The
/// index is read-only: queries never mutate it.
pub struct HnswIndex {
    pub(crate) config: HnswConfig,
    pub(crate) dim: usize,
    pub(crate) data: Vec<Vector>,
    pub(crate) graph: HnswGraph,
    pub(crate) entry_point: u32,
    pub(crate) max_layer: usize,
}

impl HnswIndex {
    /// Build an index over a dataset, inserting points in dataset order.
    ///
    /// The dataset must be non-empty and of uniform dimension.
    pub fn build(dataset: &Dataset, config: HnswConfig) -> HnswResult<Self> {
        config.validate()?;
        let dim = dataset.check_uniform()?;

        tracing::info!(
            "building hnsw index over {} points (dim {}, M {})",
            dataset.len(),
            dim,
            config.m
        );

        let mut builder = HnswBuilder::new(dim, config);
        for vector in dataset.iter() {
            builder.insert(vector.clone())?;
        }
        let index = builder.finish();

        let stats = index.graph.stats();
        tracing::info!(
            "hnsw index built: {} nodes, {} edges, top layer {}",
            stats.num_nodes,
            stats.total_edges,
            stats.max_layer
        );
        Ok(index)
    }

    /// Return the distances to up to k near stored points, ascending.
    ///
    /// `ef` controls the beam width of the final layer-0 search and is
    /// raised to k when smaller. Results may miss true neighbors; that is
    /// the approximation this index trades for speed.
    pub fn search_k_nearest(&self, query: &Vector, k: usize, ef: usize) -> HnswResult<Vec<f64>> {
        if self.graph.is_empty() {
            return Err(HnswError::EmptyIndex);
        }
        if query.len() != self.dim {
            return Err(CoreError::DimensionMismatch {
                expected: self.dim,
                got: query.len(),
            }
            .into());
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut entry_points = vec![self.entry_point];
        for layer in (1..=self.max_layer).rev() {
            let found = search_layer_descent(
                &self.graph,
                &self.data,
                query,
                &entry_points,
                layer,
                self.config.m,
            );
            if let Some(best) = found.first() {
                entry_points = vec![best.id];
            }
        }

        let candidates = search_layer_beam(
            &self.graph,
            &self.data,
            query,
            &entry_points,
            0,
            ef.max(k),
        );

        Ok(candidates.into_iter().take(k).map(|c| c.dist).collect())
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if no points are indexed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimension of the indexed points.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The graph structure.
    pub fn graph(&self) -> &HnswGraph {
        &self.graph
    }

    /// The configuration the index was built with.
    pub fn config(&self) -> &HnswConfig {
        &self.config
    }

    /// Id of the entry point (the node with the highest layer).
    pub fn entry_point(&self) -> u32 {
        self.entry_point
    }

    /// Highest layer in the graph.
    pub fn max_layer(&self) -> usize {
        self.max_layer
    }
}

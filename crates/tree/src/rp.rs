//! Random-projection tree index: Gaussian-direction splits, heuristic search.

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::node::{build, Projector, TreeNode};
use crate::search::{drain_sorted, search_node};
use proxima_core::{CoreError, Dataset, Vector};
use rand::prelude::*;
use rand_distr::StandardNormal;
use std::collections::BinaryHeap;

/// Projection onto a random direction.
pub(crate) struct DirProjector {
    pub dir: Vector,
}

impl Projector for DirProjector {
    #[inline]
    fn project(&self, point: &Vector) -> f64 {
        point.dot(&self.dir)
    }
}

/// Approximate k-NN index over random-hyperplane median splits.
///
/// Each internal node draws a direction with independent standard-normal
/// components and splits its slice at the median projection. The directions
/// are kept at their raw length: `|proj - value|` then overstates the true
/// distance to the splitting hyperplane, so the traversal can prune
/// subtrees that still hold true neighbors. Results are a subset of real
/// point distances but not guaranteed to be the k nearest.
///
/// The direction generator is owned by the index and seeded from
/// [`TreeConfig::seed`], so construction is deterministic per instance.
pub struct RpTreeIndex {
    config: TreeConfig,
    root: Option<TreeNode<DirProjector>>,
    dim: usize,
    len: usize,
}

impl RpTreeIndex {
    /// Create an index with the given configuration. No tree is built yet.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            dim: 0,
            len: 0,
        }
    }

    /// Build the tree from a dataset.
    ///
    /// Rebuilding is allowed: any previously built tree is replaced, and
    /// the direction generator restarts from the configured seed.
    pub fn make_tree(&mut self, dataset: &Dataset) -> TreeResult<()> {
        self.config.validate()?;
        let dim = dataset.check_uniform()?;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let points = dataset.vectors().to_vec();
        let len = points.len();
        self.root = Some(build(points, self.config.leaf_cap, &mut |_slice| {
            let dir = Vector::new(
                (0..dim)
                    .map(|_| rng.sample::<f64, _>(StandardNormal))
                    .collect(),
            );
            DirProjector { dir }
        }));
        self.dim = dim;
        self.len = len;

        tracing::info!("built rp-tree over {} points (dim {})", len, dim);
        Ok(())
    }

    /// Return the distances to up to k near stored points, ascending.
    ///
    /// Same contract shape as the KD-tree; the result set is approximate.
    pub fn search_k_nearest(&self, query: &Vector, k: usize) -> TreeResult<Vec<f64>> {
        let root = self.root.as_ref().ok_or(TreeError::NotBuilt)?;
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

        let mut pq = BinaryHeap::new();
        search_node(root, query, k, &mut pq);
        Ok(drain_sorted(pq))
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no points are indexed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimension of the indexed points.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Default for RpTreeIndex {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

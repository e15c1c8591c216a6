//! KD-tree index: axis-aligned splits, exact search.

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::node::{build, Projector, TreeNode};
use crate::search::{drain_sorted, search_node};
use proxima_core::{CoreError, Dataset, Vector};
use std::collections::BinaryHeap;

/// Projection onto a single coordinate axis.
pub(crate) struct AxisProjector {
    pub dim: usize,
}

impl Projector for AxisProjector {
    #[inline]
    fn project(&self, point: &Vector) -> f64 {
        point[self.dim]
    }
}

/// Find the dimension with the largest spread (max - min) over `points`.
/// Ties go to the lowest index.
fn widest_dimension(points: &[Vector]) -> usize {
    let dim = points[0].len();
    let mut best = 0;
    let mut best_spread = f64::NEG_INFINITY;

    for d in 0..dim {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for point in points {
            let x = point[d];
            lo = lo.min(x);
            hi = hi.max(x);
        }
        let spread = hi - lo;
        if spread > best_spread {
            best_spread = spread;
            best = d;
        }
    }

    best
}

/// Exact k-NN index over axis-aligned median splits.
///
/// Each internal node splits its slice at the median of the dimension with
/// maximal spread; leaves bucket up to `leaf_cap` points. Search prunes a
/// subtree only when the query is provably farther from the splitting plane
/// than the current k-th best distance, so results match brute force.
///
/// The build copies the dataset's vectors; the caller's [`Dataset`] is left
/// untouched.
pub struct KdTreeIndex {
    config: TreeConfig,
    root: Option<TreeNode<AxisProjector>>,
    dim: usize,
    len: usize,
}

impl KdTreeIndex {
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
    /// Rebuilding is allowed: any previously built tree is replaced.
    pub fn make_tree(&mut self, dataset: &Dataset) -> TreeResult<()> {
        self.config.validate()?;
        let dim = dataset.check_uniform()?;

        let points = dataset.vectors().to_vec();
        let len = points.len();
        self.root = Some(build(points, self.config.leaf_cap, &mut |slice| {
            AxisProjector {
                dim: widest_dimension(slice),
            }
        }));
        self.dim = dim;
        self.len = len;

        tracing::info!("built kd-tree over {} points (dim {})", len, dim);
        Ok(())
    }

    /// Return the distances to the k nearest stored points, ascending.
    ///
    /// Returns fewer than k distances when the index holds fewer than k
    /// points, and an empty list for k = 0.
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

impl Default for KdTreeIndex {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn random_dataset(n: usize, dim: usize, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| Vector::new((0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()))
            .collect()
    }

    fn brute_force(dataset: &Dataset, query: &Vector, k: usize) -> Vec<f64> {
        let mut dists: Vec<f64> = dataset.iter().map(|p| query.dist(p)).collect();
        dists.sort_by(|a, b| a.total_cmp(b));
        dists.truncate(k);
        dists
    }

    #[test]
    fn test_basis_vectors() {
        // The 10 standard basis vectors of R^10; all are at distance 1 from
        // the origin.
        let dataset: Dataset = (0..10)
            .map(|i| {
                let mut components = vec![0.0; 10];
                components[i] = 1.0;
                Vector::new(components)
            })
            .collect();

        let mut index = KdTreeIndex::default();
        index.make_tree(&dataset).unwrap();

        let distances = index.search_k_nearest(&Vector::zeros(10), 3).unwrap();
        assert_eq!(distances.len(), 3);
        for d in distances {
            assert!((d - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_small_plane() {
        let dataset = Dataset::from_vectors(vec![
            Vector::new(vec![0.0, 0.0]),
            Vector::new(vec![1.0, 0.0]),
            Vector::new(vec![0.0, 1.0]),
            Vector::new(vec![1.0, 1.0]),
            Vector::new(vec![2.0, 2.0]),
        ]);

        let mut index = KdTreeIndex::default();
        index.make_tree(&dataset).unwrap();

        let distances = index
            .search_k_nearest(&Vector::new(vec![0.1, 0.1]), 2)
            .unwrap();
        assert_eq!(distances.len(), 2);
        // Nearest is (0, 0), second-nearest is (1, 0) (tied with (0, 1)).
        assert!((distances[0] - 0.02f64.sqrt()).abs() < 1e-12);
        assert!((distances[1] - 0.82f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_split_structure() {
        // 101 identical points: one more than the leaf cap, so the root
        // must be a single split over leaves of 50 and 51 points.
        let dataset =
            Dataset::from_vectors(vec![Vector::new(vec![7.0, 7.0, 7.0]); 101]);

        let mut index = KdTreeIndex::default();
        index.make_tree(&dataset).unwrap();

        let root = index.root.as_ref().unwrap();
        assert!(matches!(root, TreeNode::Split { .. }));
        let mut sizes = Vec::new();
        root.leaf_sizes(&mut sizes);
        assert_eq!(sizes, vec![50, 51]);

        let distances = index
            .search_k_nearest(&Vector::new(vec![7.0, 7.0, 7.0]), 10)
            .unwrap();
        assert_eq!(distances, vec![0.0; 10]);
    }

    #[test]
    fn test_leaves_partition_input() {
        let dataset = random_dataset(333, 4, 7);
        let mut index = KdTreeIndex::new(TreeConfig::new().with_leaf_cap(16));
        index.make_tree(&dataset).unwrap();

        let mut stored = Vec::new();
        index.root.as_ref().unwrap().collect_points(&mut stored);
        assert_eq!(stored.len(), dataset.len());

        // Compare as multisets of component lists.
        let mut stored: Vec<Vec<u64>> = stored
            .iter()
            .map(|v| v.iter().map(|x| x.to_bits()).collect())
            .collect();
        let mut input: Vec<Vec<u64>> = dataset
            .iter()
            .map(|v| v.iter().map(|x| x.to_bits()).collect())
            .collect();
        stored.sort();
        input.sort();
        assert_eq!(stored, input);
    }

    #[test]
    fn test_matches_brute_force() {
        let dataset = random_dataset(500, 6, 99);
        let mut index = KdTreeIndex::new(TreeConfig::new().with_leaf_cap(16));
        index.make_tree(&dataset).unwrap();

        let mut rng = StdRng::seed_from_u64(123);
        for _ in 0..20 {
            let query = Vector::new((0..6).map(|_| rng.gen_range(-1.0..1.0)).collect());
            let got = index.search_k_nearest(&query, 10).unwrap();
            let want = brute_force(&dataset, &query, 10);
            assert_eq!(got.len(), want.len());
            for (g, w) in got.iter().zip(want.iter()) {
                assert!((g - w).abs() < 1e-9, "kd {} vs brute {}", g, w);
            }
        }
    }

    #[test]
    fn test_sorted_output() {
        let dataset = random_dataset(250, 3, 5);
        let mut index = KdTreeIndex::new(TreeConfig::new().with_leaf_cap(32));
        index.make_tree(&dataset).unwrap();

        let distances = index
            .search_k_nearest(&Vector::zeros(3), 25)
            .unwrap();
        assert_eq!(distances.len(), 25);
        for pair in distances.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_singleton_dataset() {
        let point = Vector::new(vec![1.0, 2.0, 3.0]);
        let dataset = Dataset::from_vectors(vec![point.clone()]);
        let mut index = KdTreeIndex::default();
        index.make_tree(&dataset).unwrap();

        let query = Vector::new(vec![4.0, 6.0, 3.0]);
        let distances = index.search_k_nearest(&query, 10).unwrap();
        assert_eq!(distances.len(), 1);
        assert!((distances[0] - query.dist(&point)).abs() < 1e-12);
    }

    #[test]
    fn test_k_zero() {
        let dataset = random_dataset(50, 2, 1);
        let mut index = KdTreeIndex::default();
        index.make_tree(&dataset).unwrap();
        assert!(index
            .search_k_nearest(&Vector::zeros(2), 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let dataset = random_dataset(10, 4, 2);
        let mut index = KdTreeIndex::default();
        index.make_tree(&dataset).unwrap();

        let result = index.search_k_nearest(&Vector::zeros(3), 1);
        assert!(matches!(
            result,
            Err(TreeError::Core(CoreError::DimensionMismatch { expected: 4, got: 3 }))
        ));
    }

    #[test]
    fn test_search_before_build() {
        let index = KdTreeIndex::default();
        assert!(matches!(
            index.search_k_nearest(&Vector::zeros(2), 1),
            Err(TreeError::NotBuilt)
        ));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let mut index = KdTreeIndex::default();
        assert!(matches!(
            index.make_tree(&Dataset::new()),
            Err(TreeError::Core(CoreError::EmptyDataset))
        ));
    }

    #[test]
    fn test_ragged_dataset_rejected() {
        let dataset = Dataset::from_vectors(vec![
            Vector::new(vec![1.0, 2.0]),
            Vector::new(vec![1.0]),
        ]);
        let mut index = KdTreeIndex::default();
        assert!(matches!(
            index.make_tree(&dataset),
            Err(TreeError::Core(CoreError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_rebuild_replaces_tree() {
        let mut index = KdTreeIndex::default();
        index.make_tree(&random_dataset(200, 3, 11)).unwrap();
        assert_eq!(index.len(), 200);

        let small = Dataset::from_vectors(vec![Vector::new(vec![0.0, 0.0, 0.0]); 5]);
        index.make_tree(&small).unwrap();
        assert_eq!(index.len(), 5);

        let distances = index.search_k_nearest(&Vector::zeros(3), 10).unwrap();
        assert_eq!(distances, vec![0.0; 5]);
    }
}

//! Space-partitioning tree indexes for exact and approximate k-NN search.
//!
//! Two index types share one tree shell and one traversal:
//!
//! - [`KdTreeIndex`] splits on the axis of maximal spread at the median and
//!   answers queries exactly: the bounded-box pruning bound is the true
//!   distance from the query to the splitting plane.
//! - [`RpTreeIndex`] splits on random Gaussian directions at the median
//!   projection. Its pruning bound reuses the same comparison but the
//!   directions are not unit length, so the bound is a heuristic and the
//!   index is approximate.
//!
//! Both buckets up to [`TreeConfig::leaf_cap`] points per leaf and return
//! ascending Euclidean distances (no point identities).
//!
//! # Example
//!
//! ```
//! use proxima_core::{Dataset, Vector};
//! use proxima_tree::{KdTreeIndex, TreeConfig};
//!
//! let dataset = Dataset::from_vectors(vec![
//!     Vector::new(vec![0.0, 0.0]),
//!     Vector::new(vec![1.0, 1.0]),
//! ]);
//!
//! let mut index = KdTreeIndex::new(TreeConfig::default());
//! index.make_tree(&dataset).unwrap();
//!
//! let distances = index.search_k_nearest(&Vector::new(vec![0.0, 0.1]), 1).unwrap();
//! assert!((distances[0] - 0.1).abs() < 1e-12);
//! ```

mod config;
mod error;
mod kd;
mod node;
mod rp;
mod search;

pub use config::TreeConfig;
pub use error::{TreeError, TreeResult};
pub use kd::KdTreeIndex;
pub use rp::RpTreeIndex;

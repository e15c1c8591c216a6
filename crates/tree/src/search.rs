//! The k-NN traversal shared by both tree indexes.

use crate::node::{Projector, TreeNode};
use proxima_core::Vector;
use std::collections::BinaryHeap;

/// Heap key wrapping a distance, totally ordered via `total_cmp`.
///
/// A `BinaryHeap<OrderedDist>` is a max-heap whose top is the worst
/// distance currently kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OrderedDist(pub f64);

impl Eq for OrderedDist {}

impl PartialOrd for OrderedDist {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedDist {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Descend the tree, keeping the k smallest distances seen in `pq`.
///
/// The nearer child (the one on the query's side of the split) is always
/// visited; the farther child is visited only while fewer than k distances
/// are kept, or while the query's offset from the splitting plane is
/// smaller than the worst kept distance. For axis-aligned splits that
/// offset is the exact plane distance and the search is exact; for
/// unnormalized projection directions it is an overestimate and the search
/// may prune true neighbors.
pub(crate) fn search_node<P: Projector>(
    node: &TreeNode<P>,
    query: &Vector,
    k: usize,
    pq: &mut BinaryHeap<OrderedDist>,
) {
    match node {
        TreeNode::Leaf(points) => {
            for point in points {
                pq.push(OrderedDist(query.dist(point)));
                if pq.len() > k {
                    pq.pop();
                }
            }
        }
        TreeNode::Split {
            axis,
            value,
            left,
            right,
        } => {
            let s = axis.project(query);
            let (nearer, farther) = if s <= *value {
                (left, right)
            } else {
                (right, left)
            };

            search_node(nearer, query, k, pq);

            let explore_farther =
                pq.len() < k || pq.peek().map_or(true, |worst| (s - value).abs() < worst.0);
            if explore_farther {
                search_node(farther, query, k, pq);
            }
        }
    }
}

/// Drain the heap into ascending distances.
pub(crate) fn drain_sorted(pq: BinaryHeap<OrderedDist>) -> Vec<f64> {
    pq.into_sorted_vec().into_iter().map(|d| d.0).collect()
}

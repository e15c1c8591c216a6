//! Layer search routines.
//!
//! Both traversals walk one layer of the graph with two priority queues:
//! `candidates`, a min-queue by distance choosing the next node to expand,
//! and `nearest`, a max-queue holding the working result set with the worst
//! kept distance on top. `lower_bound` tracks the admission threshold and
//! the expansion loop stops as soon as the best remaining candidate is
//! farther than it.

use crate::graph::HnswGraph;
use proxima_core::Vector;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

/// A point id paired with its distance to the current query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub id: u32,
    pub dist: f64,
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.dist.total_cmp(&other.dist)
    }
}

/// Descent search: locate the neighborhood of `query` on one layer.
///
/// Admission keeps at most a soft target of `m` entries open; once `m` are
/// held, only strict improvements over the best distance seen are admitted.
/// Nothing is ever evicted, so the returned set can exceed `m`; callers use
/// it for its first (closest) element.
pub(crate) fn search_layer_descent(
    graph: &HnswGraph,
    data: &[Vector],
    query: &Vector,
    entry_points: &[u32],
    layer: usize,
    m: usize,
) -> Vec<Candidate> {
    let mut visited: HashSet<u32> = HashSet::new();
    let mut candidates: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    let mut nearest: BinaryHeap<Candidate> = BinaryHeap::new();
    let mut lower_bound = f64::INFINITY;

    for &ep in entry_points {
        let dist = query.dist(&data[ep as usize]);
        lower_bound = lower_bound.min(dist);
        candidates.push(Reverse(Candidate { id: ep, dist }));
        nearest.push(Candidate { id: ep, dist });
        visited.insert(ep);
    }

    while let Some(Reverse(curr)) = candidates.pop() {
        if curr.dist > lower_bound {
            break;
        }

        for &neighbor in graph.neighbors(curr.id as usize, layer) {
            if !visited.insert(neighbor) {
                continue;
            }
            let dist = query.dist(&data[neighbor as usize]);
            if dist < lower_bound || nearest.len() < m {
                candidates.push(Reverse(Candidate { id: neighbor, dist }));
                nearest.push(Candidate { id: neighbor, dist });
                lower_bound = lower_bound.min(dist);
            }
        }
    }

    // Ascending by distance: element 0 is the best.
    nearest.into_sorted_vec()
}

/// Beam search: collect up to `ef` near points on one layer.
///
/// Same admission rule as the descent with `ef` in place of `m`, but the
/// result set is hard-capped: pushing past `ef` evicts the current worst
/// and the admission threshold becomes the new worst kept distance.
pub(crate) fn search_layer_beam(
    graph: &HnswGraph,
    data: &[Vector],
    query: &Vector,
    entry_points: &[u32],
    layer: usize,
    ef: usize,
) -> Vec<Candidate> {
    let mut visited: HashSet<u32> = HashSet::new();
    let mut candidates: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    let mut nearest: BinaryHeap<Candidate> = BinaryHeap::new();
    let mut lower_bound = f64::INFINITY;

    for &ep in entry_points {
        let dist = query.dist(&data[ep as usize]);
        lower_bound = lower_bound.min(dist);
        candidates.push(Reverse(Candidate { id: ep, dist }));
        nearest.push(Candidate { id: ep, dist });
        visited.insert(ep);
    }

    while let Some(Reverse(curr)) = candidates.pop() {
        if curr.dist > lower_bound {
            break;
        }

        for &neighbor in graph.neighbors(curr.id as usize, layer) {
            if !visited.insert(neighbor) {
                continue;
            }
            let dist = query.dist(&data[neighbor as usize]);
            if dist < lower_bound || nearest.len() < ef {
                candidates.push(Reverse(Candidate { id: neighbor, dist }));
                nearest.push(Candidate { id: neighbor, dist });

                if nearest.len() > ef {
                    nearest.pop();
                    lower_bound = nearest.peek().map_or(f64::INFINITY, |worst| worst.dist);
                } else {
                    lower_bound = lower_bound.min(dist);
                }
            }
        }
    }

    nearest.into_sorted_vec()
}

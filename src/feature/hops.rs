//! Hop distances from the seed set over the undirected dependency graph.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::FileScore;
use crate::error::{FeatureLensError, Result};
use crate::graph::DependencyGraph;

/// Cooperative cancellation shared between a caller and a running analysis.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Breadth-first search from every seed at hop 0.
///
/// Seeds are enqueued in the order given and neighbours are visited in
/// lexical order, so the first visit of every file is reproducible. A file
/// reached at exactly `max_hops` is recorded but not expanded. Seeds that are
/// not in the graph are skipped.
pub fn compute_hops<'a>(
    graph: &'a DependencyGraph,
    seeds: &'a [String],
    max_hops: usize,
    cancel: Option<&CancelFlag>,
) -> Result<BTreeMap<String, usize>> {
    let mut hops: BTreeMap<String, usize> = BTreeMap::new();
    let mut queue: VecDeque<(&'a str, usize)> = VecDeque::new();

    for seed in seeds {
        if !graph.contains(seed) {
            warn!(seed = %seed, "seed is not among the analyzed files");
            continue;
        }
        if hops.contains_key(seed) {
            continue;
        }
        hops.insert(seed.clone(), 0);
        if max_hops > 0 {
            queue.push_back((seed.as_str(), 0));
        }
    }

    while let Some((path, depth)) = queue.pop_front() {
        if cancel.is_some_and(CancelFlag::is_cancelled) {
            debug!(visited = hops.len(), "hop search cancelled");
            return Err(FeatureLensError::Cancelled);
        }

        let next = depth + 1;
        for neighbor in graph.neighbors(path) {
            if hops.contains_key(neighbor) {
                continue;
            }
            hops.insert(neighbor.to_string(), next);
            if next < max_hops {
                queue.push_back((neighbor, next));
            }
        }
    }

    debug!(reached = hops.len(), max_hops, "hop search complete");
    Ok(hops)
}

/// Copy hop distances onto scores. Unreached files keep `None`.
pub fn apply_hops(scores: &mut [FileScore], hops: &BTreeMap<String, usize>) {
    for score in scores.iter_mut() {
        score.hops = hops.get(&score.path).copied();
    }
}

//! Balance-selecting cluster runner.
//!
//! Fits the clustering capability several times and keeps the run whose
//! label-count distribution scores best under the balance entropy.

use tracing::debug;

use crate::cluster::capability::{ClusteringCapability, FitOutcome};
use crate::error::{HierarchyError, Result};
use crate::points::Point;

/// A selected clustering run: labels, centroids, and per-label member counts.
#[derive(Debug, Clone)]
pub struct ClusterRun {
    /// Cluster label per input point, contiguous from 0.
    pub labels: Vec<usize>,
    /// Centroids indexed by label.
    pub centroids: Vec<Point>,
    /// Member count per label. Sums to the number of input points.
    pub counts: Vec<usize>,
}

impl ClusterRun {
    fn from_outcome(outcome: FitOutcome) -> Self {
        let mut counts = vec![0usize; outcome.centroids.len()];
        for &label in &outcome.labels {
            counts[label] += 1;
        }
        Self {
            labels: outcome.labels,
            centroids: outcome.centroids,
            counts,
        }
    }
}

/// Balance score of a run's label-count distribution.
///
/// Each cluster's member count is normalized by the number of distinct
/// labels present (not by the total record count), then scored with
/// `-sum(p * ln p)`. These "probabilities" do not generally sum to 1, so
/// this is not a true Shannon entropy, but among runs with the same total
/// and the same populated label count the perfectly balanced distribution
/// still scores highest. A run with a single populated label scores 0 by
/// definition.
pub fn balance_entropy(counts: &[usize]) -> f64 {
    let populated: Vec<usize> = counts.iter().copied().filter(|&c| c > 0).collect();
    if populated.len() <= 1 {
        return 0.0;
    }

    let n_labels = populated.len() as f64;
    populated
        .iter()
        .map(|&c| {
            let p = c as f64 / n_labels;
            -(p * p.ln())
        })
        .sum()
}

/// Fits `k` clusters `retries` times and returns the most balanced run.
///
/// A run replaces the incumbent only when its entropy is strictly greater,
/// so the earliest-found maximum wins ties. With `retries == 1` this is a
/// single capability invocation.
///
/// # Errors
///
/// Returns `InvalidClusterCount` when `k` is zero or exceeds the number of
/// points supplied.
pub fn best_run<C: ClusteringCapability>(
    capability: &mut C,
    points: &[Point],
    k: usize,
    retries: usize,
    weights: Option<&[f64]>,
) -> Result<ClusterRun> {
    if k == 0 || k > points.len() {
        return Err(HierarchyError::InvalidClusterCount {
            requested: k,
            available: points.len(),
        });
    }

    let mut best = ClusterRun::from_outcome(capability.fit(points, k, weights)?);
    let mut best_entropy = balance_entropy(&best.counts);
    debug!(k, run = 0, entropy = best_entropy, "initial clustering run");

    for run in 1..retries {
        let candidate = ClusterRun::from_outcome(capability.fit(points, k, weights)?);
        let entropy = balance_entropy(&candidate.counts);
        debug!(k, run, entropy, "clustering run");

        if entropy > best_entropy {
            best = candidate;
            best_entropy = entropy;
        }
    }

    Ok(best)
}

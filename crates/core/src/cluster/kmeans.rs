//! Weighted k-means clustering.
//!
//! Default implementation of the clustering capability: weighted k-means++
//! initialization followed by Lloyd iteration. The RNG is seedable so that
//! repeated runs are reproducible in tests.

use ordered_float::OrderedFloat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cluster::capability::{ClusteringCapability, FitOutcome};
use crate::error::{HierarchyError, Result};
use crate::points::Point;

/// Configuration for the weighted k-means capability.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansConfig {
    /// Maximum Lloyd iterations per fit.
    pub max_iterations: usize,

    /// Convergence threshold on the maximum centroid movement.
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Weighted k-means clusterer with a seedable RNG.
///
/// Each `fit` call draws fresh initial centroids from the RNG, so
/// successive calls yield independent runs of the same problem.
#[derive(Debug, Clone)]
pub struct WeightedKMeans {
    config: KMeansConfig,
    rng: ChaCha8Rng,
}

impl WeightedKMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a clusterer whose run sequence is reproducible.
    pub fn seeded(config: KMeansConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for WeightedKMeans {
    fn default() -> Self {
        Self::new(KMeansConfig::default())
    }
}

impl ClusteringCapability for WeightedKMeans {
    fn fit(&mut self, points: &[Point], k: usize, weights: Option<&[f64]>) -> Result<FitOutcome> {
        if k == 0 || k > points.len() {
            return Err(HierarchyError::InvalidClusterCount {
                requested: k,
                available: points.len(),
            });
        }

        let uniform;
        let weights = match weights {
            Some(w) => w,
            None => {
                uniform = vec![1.0; points.len()];
                &uniform
            }
        };

        let mut centroids = init_plus_plus(points, weights, k, &mut self.rng);
        let mut assignments = vec![0usize; points.len()];
        let mut converged = false;
        let mut iterations = 0;

        for iter in 0..self.config.max_iterations {
            iterations = iter + 1;

            assignments = points
                .par_iter()
                .map(|p| nearest_centroid(p, &centroids))
                .collect();

            fill_empty_clusters(points, &centroids, &mut assignments, k);

            let new_centroids = weighted_means(points, weights, &assignments, &centroids, k);

            let max_movement = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(old, new)| old.distance_squared(new).sqrt())
                .fold(0.0f64, f64::max);

            centroids = new_centroids;

            if max_movement < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                k,
                n = points.len(),
                iterations,
                "k-means hit the iteration cap before converging"
            );
        }
        debug!(
            k,
            n = points.len(),
            iterations,
            converged,
            "k-means fit finished"
        );

        Ok(FitOutcome {
            labels: assignments,
            centroids,
        })
    }
}

/// Weighted k-means++ initialization.
///
/// The first centroid is sampled proportional to point weight, each
/// subsequent one proportional to weight times the squared distance to the
/// nearest centroid chosen so far.
fn init_plus_plus(points: &[Point], weights: &[f64], k: usize, rng: &mut ChaCha8Rng) -> Vec<Point> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);

    let first = sample_index(rng, weights).unwrap_or(0);
    centroids.push(points[first]);

    let mut min_distances = vec![f64::MAX; n];

    while centroids.len() < k {
        let last = *centroids.last().unwrap();
        for (i, p) in points.iter().enumerate() {
            let d = p.distance_squared(&last);
            if d < min_distances[i] {
                min_distances[i] = d;
            }
        }

        let scores: Vec<f64> = min_distances
            .iter()
            .zip(weights)
            .map(|(d, w)| d * w)
            .collect();

        match sample_index(rng, &scores) {
            Some(idx) => centroids.push(points[idx]),
            // Every remaining point coincides with an existing centroid;
            // any pick keeps the invariant that k centroids exist.
            None => centroids.push(points[centroids.len() % n]),
        }
    }

    centroids
}

/// Samples an index proportional to the given non-negative weights.
/// Returns None when the total weight is zero.
fn sample_index(rng: &mut ChaCha8Rng, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let mut remaining = rng.gen::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        remaining -= w;
        if remaining <= 0.0 {
            return Some(i);
        }
    }
    Some(weights.len() - 1)
}

/// Index of the nearest centroid; the lowest label wins distance ties.
fn nearest_centroid(point: &Point, centroids: &[Point]) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| OrderedFloat(point.distance_squared(c)))
        .map(|(label, _)| label)
        .unwrap_or(0)
}

/// Reassigns the point furthest from its centroid into each empty cluster
/// so that every label in `0..k` keeps at least one member.
fn fill_empty_clusters(points: &[Point], centroids: &[Point], assignments: &mut [usize], k: usize) {
    let mut counts = vec![0usize; k];
    for &label in assignments.iter() {
        counts[label] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let candidate = assignments
            .iter()
            .enumerate()
            .filter(|(_, &label)| counts[label] > 1)
            .max_by_key(|(i, &label)| OrderedFloat(points[*i].distance_squared(&centroids[label])));

        if let Some((idx, _)) = candidate {
            let old = assignments[idx];
            counts[old] -= 1;
            assignments[idx] = empty;
            counts[empty] += 1;
        }
    }
}

/// Weighted mean of each cluster's members. Clusters whose total weight is
/// zero keep their previous centroid.
fn weighted_means(
    points: &[Point],
    weights: &[f64],
    assignments: &[usize],
    previous: &[Point],
    k: usize,
) -> Vec<Point> {
    let mut sums = vec![Point::default(); k];
    let mut totals = vec![0.0f64; k];

    for ((p, &w), &label) in points.iter().zip(weights).zip(assignments) {
        sums[label].lat += p.lat * w;
        sums[label].lon += p.lon * w;
        totals[label] += w;
    }

    sums.into_iter()
        .zip(totals)
        .enumerate()
        .map(|(label, (sum, total))| {
            if total > 0.0 {
                Point::new(sum.lat / total, sum.lon / total)
            } else {
                previous[label]
            }
        })
        .collect()
}

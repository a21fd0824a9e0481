//! Bottom-up hierarchy construction.
//!
//! Builds levels finest to coarsest: the target list is consumed in
//! reverse, and each level after the first merges the previous level's
//! centroids, weighted by member count, into fewer super-clusters. Points
//! are relabeled by composition through their previous centroid, never
//! re-clustered directly.

use tracing::debug;

use crate::cluster::capability::ClusteringCapability;
use crate::cluster::runner::best_run;
use crate::error::Result;
use crate::hierarchy::{ClusterLevel, Hierarchy};
use crate::params::Order;
use crate::points::PointSet;

/// Builds a bottom-up hierarchy over `points`.
///
/// `targets` are given coarsest first, exactly as for the top-down builder;
/// they are processed in reverse so the finest level is fitted first.
/// Member counts at every level count original points, so each level's
/// counts sum to the record total.
pub fn build_bottom_up<C: ClusteringCapability>(
    capability: &mut C,
    points: &PointSet,
    targets: &[usize],
    retries: usize,
) -> Result<Hierarchy> {
    let total_records = points.len();
    let mut levels: Vec<ClusterLevel> = Vec::with_capacity(targets.len());

    for (level_idx, &target) in targets.iter().rev().enumerate() {
        let level = if level_idx == 0 {
            let run = best_run(capability, points.as_slice(), target, retries, None)
                .map_err(|e| e.at_level(level_idx, target))?;
            ClusterLevel::from_assignments(run.labels, run.centroids)
        } else {
            let prev = levels.last().expect("previous level exists");
            merge_level(capability, prev, target, retries)
                .map_err(|e| e.at_level(level_idx, target))?
        };

        debug!(
            level = level_idx,
            clusters = level.num_clusters(),
            "built bottom-up level"
        );
        debug_assert_eq!(level.counts.iter().sum::<usize>(), total_records);
        levels.push(level);
    }

    Ok(Hierarchy::new(levels, Order::BottomUp))
}

/// Merges the previous level's centroids into `target` super-clusters.
fn merge_level<C: ClusteringCapability>(
    capability: &mut C,
    prev: &ClusterLevel,
    target: usize,
    retries: usize,
) -> Result<ClusterLevel> {
    let weights: Vec<f64> = prev.counts.iter().map(|&c| c as f64).collect();
    let run = best_run(
        capability,
        &prev.centroids,
        target,
        retries,
        Some(&weights),
    )?;

    // A point's merged label is the merged label of its previous centroid.
    let assignments: Vec<usize> = prev
        .assignments
        .iter()
        .map(|&label| run.labels[label])
        .collect();

    Ok(ClusterLevel::from_assignments(assignments, run.centroids))
}

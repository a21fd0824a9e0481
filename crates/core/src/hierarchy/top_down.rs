//! Top-down hierarchy construction.
//!
//! Builds levels coarsest to finest: each level re-clusters every parent
//! cluster into its allocated quota of sub-clusters.

use tracing::debug;

use crate::cluster::capability::ClusteringCapability;
use crate::cluster::runner::best_run;
use crate::error::Result;
use crate::hierarchy::quota::allocate_quotas;
use crate::hierarchy::{members_by_label, ClusterLevel, Hierarchy};
use crate::params::Order;
use crate::points::{Point, PointSet};

/// Builds a top-down hierarchy over `points`.
///
/// `targets` are the per-level cluster counts, coarsest first. Level 0
/// clusters the whole point set; each subsequent level partitions points by
/// their previous label, copies single-quota parents forward unchanged, and
/// splits the rest, remapping local labels onto a contiguous global range.
pub fn build_top_down<C: ClusteringCapability>(
    capability: &mut C,
    points: &PointSet,
    targets: &[usize],
    retries: usize,
) -> Result<Hierarchy> {
    let total_records = points.len();
    let mut levels: Vec<ClusterLevel> = Vec::with_capacity(targets.len());

    for (level_idx, &target) in targets.iter().enumerate() {
        let level = if level_idx == 0 {
            let run = best_run(capability, points.as_slice(), target, retries, None)
                .map_err(|e| e.at_level(level_idx, target))?;
            ClusterLevel::from_assignments(run.labels, run.centroids)
        } else {
            let prev = levels.last().expect("previous level exists");
            split_level(capability, points, prev, target, retries)
                .map_err(|e| e.at_level(level_idx, target))?
        };

        debug!(
            level = level_idx,
            clusters = level.num_clusters(),
            "built top-down level"
        );
        debug_assert_eq!(level.counts.iter().sum::<usize>(), total_records);
        levels.push(level);
    }

    Ok(Hierarchy::new(levels, Order::TopDown))
}

/// Splits every parent cluster of `prev` into its quota of sub-clusters.
fn split_level<C: ClusteringCapability>(
    capability: &mut C,
    points: &PointSet,
    prev: &ClusterLevel,
    target: usize,
    retries: usize,
) -> Result<ClusterLevel> {
    let quotas = allocate_quotas(&prev.counts, points.len(), target)?;
    let members = members_by_label(&prev.assignments, prev.num_clusters());

    let mut assignments = vec![0usize; points.len()];
    let mut centroids: Vec<Point> = Vec::with_capacity(target);
    let mut next_label = 0usize;

    for (parent, member_ids) in members.iter().enumerate() {
        let quota = quotas[parent];

        if quota <= 1 {
            // The parent survives unchanged under a fresh global label.
            for &id in member_ids {
                assignments[id] = next_label;
            }
            centroids.push(prev.centroids[parent]);
            next_label += 1;
        } else {
            let subset: Vec<Point> = member_ids.iter().map(|&id| points[id]).collect();
            let run = best_run(capability, &subset, quota, retries, None)?;

            for (&id, &local) in member_ids.iter().zip(&run.labels) {
                assignments[id] = next_label + local;
            }
            centroids.extend(run.centroids);
            next_label += quota;
        }
    }

    Ok(ClusterLevel::from_assignments(assignments, centroids))
}

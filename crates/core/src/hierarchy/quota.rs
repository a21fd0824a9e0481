//! Sub-cluster quota allocation.
//!
//! Computes how many children each parent cluster should split into (or how
//! many merge slots it gets) so that the next level's total cluster count
//! hits the configured target exactly.

use crate::error::{HierarchyError, Result};

/// Allocates a sub-cluster quota per parent label.
///
/// Seeds each quota with the parent's rounded proportional share of the
/// target (floored to 1), then rebalances one step at a time: while the sum
/// is short of the target the parent with the largest average cluster size
/// gains a slot; while it overshoots, the parent with the smallest average
/// size among those above 1 loses one. Average sizes are recomputed on
/// increment but updated additively on decrement; the additive update is a
/// deliberate approximation carried over from the original tool.
///
/// On success every quota is at least 1 and the quotas sum to
/// `target_total`.
///
/// # Errors
///
/// Returns `QuotaUnsatisfiable` when the sum exceeds the target but every
/// quota is already 1, which happens whenever `target_total` is smaller
/// than the number of parent labels.
pub fn allocate_quotas(
    parent_counts: &[usize],
    total_records: usize,
    target_total: usize,
) -> Result<Vec<usize>> {
    let mut quotas: Vec<usize> = Vec::with_capacity(parent_counts.len());
    let mut avg_sizes: Vec<f64> = Vec::with_capacity(parent_counts.len());

    for &count in parent_counts {
        let share = (count as f64 / total_records as f64) * target_total as f64;
        let quota = (share.round() as usize).max(1);
        quotas.push(quota);
        avg_sizes.push(count as f64 / quota as f64);
    }

    loop {
        let current: usize = quotas.iter().sum();
        if current == target_total {
            break;
        }

        if current < target_total {
            // Grow the parent whose clusters are currently the largest.
            let mut grow_label = 0;
            let mut grow_size = f64::NEG_INFINITY;
            for (label, &size) in avg_sizes.iter().enumerate() {
                if size > grow_size {
                    grow_size = size;
                    grow_label = label;
                }
            }

            quotas[grow_label] += 1;
            avg_sizes[grow_label] = parent_counts[grow_label] as f64 / quotas[grow_label] as f64;
        } else {
            // Shrink the parent whose clusters are currently the smallest,
            // never below one sub-cluster.
            let mut shrink_label = None;
            let mut shrink_size = total_records as f64;
            for (label, &size) in avg_sizes.iter().enumerate() {
                if size < shrink_size && quotas[label] > 1 {
                    shrink_size = size;
                    shrink_label = Some(label);
                }
            }

            let Some(label) = shrink_label else {
                return Err(HierarchyError::QuotaUnsatisfiable {
                    target: target_total,
                    parents: parent_counts.len(),
                });
            };

            quotas[label] -= 1;
            avg_sizes[label] += parent_counts[label] as f64 / quotas[label] as f64;
        }
    }

    Ok(quotas)
}

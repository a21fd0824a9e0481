//! Tests for the balance-selecting cluster runner.

use geohier_core::cluster::capability::{ClusteringCapability, FitOutcome};
use geohier_core::cluster::runner::best_run;
use geohier_core::error::HierarchyError;
use geohier_core::points::Point;
use geohier_core::Result;

/// Capability test double replaying a fixed sequence of fit outcomes.
struct ScriptedCapability {
    outcomes: Vec<FitOutcome>,
    calls: usize,
}

impl ScriptedCapability {
    fn new(outcomes: Vec<FitOutcome>) -> Self {
        Self { outcomes, calls: 0 }
    }
}

impl ClusteringCapability for ScriptedCapability {
    fn fit(&mut self, _points: &[Point], _k: usize, _weights: Option<&[f64]>) -> Result<FitOutcome> {
        let outcome = self.outcomes[self.calls].clone();
        self.calls += 1;
        Ok(outcome)
    }
}

fn outcome(labels: &[usize], k: usize) -> FitOutcome {
    FitOutcome {
        labels: labels.to_vec(),
        centroids: (0..k).map(|i| Point::new(i as f64, 0.0)).collect(),
    }
}

fn four_points() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 1.0),
    ]
}

// ============================================================================
// Selection rule
// ============================================================================

#[test]
fn test_more_balanced_later_run_wins() {
    let points = four_points();
    let skewed = outcome(&[0, 0, 0, 1], 2);
    let balanced = outcome(&[0, 0, 1, 1], 2);
    let mut cap = ScriptedCapability::new(vec![skewed, balanced]);

    let run = best_run(&mut cap, &points, 2, 2, None).unwrap();
    assert_eq!(run.labels, vec![0, 0, 1, 1]);
    assert_eq!(run.counts, vec![2, 2]);
    assert_eq!(cap.calls, 2);
}

#[test]
fn test_tie_retains_earliest_run() {
    // Both runs are perfectly balanced; the first invocation wins.
    let points = four_points();
    let first = outcome(&[0, 0, 1, 1], 2);
    let second = outcome(&[1, 1, 0, 0], 2);
    let mut cap = ScriptedCapability::new(vec![first, second]);

    let run = best_run(&mut cap, &points, 2, 2, None).unwrap();
    assert_eq!(run.labels, vec![0, 0, 1, 1]);
}

#[test]
fn test_best_score_tracks_replacement() {
    // After the balanced second run replaces the skewed first one, an
    // equally balanced third run must not displace it.
    let points = four_points();
    let skewed = outcome(&[0, 0, 0, 1], 2);
    let balanced_a = outcome(&[0, 0, 1, 1], 2);
    let balanced_b = outcome(&[0, 1, 0, 1], 2);
    let mut cap = ScriptedCapability::new(vec![skewed, balanced_a, balanced_b]);

    let run = best_run(&mut cap, &points, 2, 3, None).unwrap();
    assert_eq!(run.labels, vec![0, 0, 1, 1]);
    assert_eq!(cap.calls, 3);
}

#[test]
fn test_single_retry_is_a_single_invocation() {
    let points = four_points();
    let only = outcome(&[0, 1, 1, 1], 2);
    let mut cap = ScriptedCapability::new(vec![only]);

    let run = best_run(&mut cap, &points, 2, 1, None).unwrap();
    assert_eq!(cap.calls, 1);
    assert_eq!(run.labels, vec![0, 1, 1, 1]);
    assert_eq!(run.counts, vec![1, 3]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_zero_clusters_rejected() {
    let points = four_points();
    let mut cap = ScriptedCapability::new(vec![]);

    let err = best_run(&mut cap, &points, 0, 1, None).unwrap_err();
    assert!(matches!(
        err,
        HierarchyError::InvalidClusterCount {
            requested: 0,
            available: 4
        }
    ));
    assert_eq!(cap.calls, 0);
}

#[test]
fn test_more_clusters_than_points_rejected() {
    let points = four_points();
    let mut cap = ScriptedCapability::new(vec![]);

    let err = best_run(&mut cap, &points, 5, 3, None).unwrap_err();
    assert!(matches!(
        err,
        HierarchyError::InvalidClusterCount {
            requested: 5,
            available: 4
        }
    ));
    assert_eq!(cap.calls, 0);
}

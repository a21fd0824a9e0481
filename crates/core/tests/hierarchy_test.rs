//! End-to-end tests for hierarchy construction, top-down and bottom-up.

use geohier_core::error::HierarchyError;
use geohier_core::hierarchy::Hierarchy;
use geohier_core::points::{Point, PointSet};
use geohier_core::{
    assemble_rows, build_bottom_up, build_top_down, KMeansConfig, WeightedKMeans,
};

fn two_pair_points() -> PointSet {
    PointSet::new(vec![
        Point::new(0.0, 0.0),
        Point::new(0.1, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.1, 0.0),
    ])
}

fn kmeans(seed: u64) -> WeightedKMeans {
    WeightedKMeans::seeded(KMeansConfig::default(), seed)
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

/// Checks the structural invariants every built level must satisfy:
/// contiguous labels all populated, counts summing to the record total,
/// every point assigned exactly once.
fn assert_level_invariants(hierarchy: &Hierarchy, total_records: usize) {
    for level in &hierarchy.levels {
        assert_eq!(level.assignments.len(), total_records);
        assert_eq!(level.counts.len(), level.num_clusters());
        assert_eq!(level.counts.iter().sum::<usize>(), total_records);
        assert!(level.counts.iter().all(|&c| c > 0));
        assert!(level
            .assignments
            .iter()
            .all(|&label| label < level.num_clusters()));
    }
}

// ============================================================================
// Top-down
// ============================================================================

#[test]
fn test_top_down_single_level_recovers_groups() {
    let points = two_pair_points();
    let hierarchy = build_top_down(&mut kmeans(7), &points, &[2], 3).unwrap();

    assert_eq!(hierarchy.num_levels(), 1);
    assert_level_invariants(&hierarchy, 4);

    let level = &hierarchy.levels[0];
    assert_eq!(level.num_clusters(), 2);
    assert_eq!(level.assignments[0], level.assignments[1]);
    assert_eq!(level.assignments[2], level.assignments[3]);
    assert_ne!(level.assignments[0], level.assignments[2]);

    // Exactly two distinct centroids, each the mean of its pair.
    assert_close(level.centroid_of(0).lat, 0.05);
    assert_close(level.centroid_of(2).lat, 10.05);
}

#[test]
fn test_top_down_second_level_splits_each_parent() {
    let points = two_pair_points();
    let hierarchy = build_top_down(&mut kmeans(7), &points, &[2, 4], 3).unwrap();

    assert_eq!(hierarchy.num_levels(), 2);
    assert_level_invariants(&hierarchy, 4);

    // Quota {0:2, 1:2}: each 2-point parent splits into singletons.
    let fine = &hierarchy.levels[1];
    assert_eq!(fine.num_clusters(), 4);
    assert_eq!(fine.counts, vec![1, 1, 1, 1]);
    for id in 0..4 {
        assert_close(fine.centroid_of(id).lat, points[id].lat);
        assert_close(fine.centroid_of(id).lon, points[id].lon);
    }
}

#[test]
fn test_top_down_copies_single_quota_parents_forward() {
    // Target 3 over parents {2, 2}: one parent keeps quota 1 and its
    // centroid survives verbatim at the finer level.
    let points = two_pair_points();
    let hierarchy = build_top_down(&mut kmeans(13), &points, &[2, 3], 3).unwrap();

    assert_level_invariants(&hierarchy, 4);
    let coarse = &hierarchy.levels[0];
    let fine = &hierarchy.levels[1];
    assert_eq!(fine.num_clusters(), 3);

    let copied = fine
        .centroids
        .iter()
        .filter(|c| {
            coarse
                .centroids
                .iter()
                .any(|p| (p.lat - c.lat).abs() < 1e-12 && (p.lon - c.lon).abs() < 1e-12)
        })
        .count();
    assert_eq!(copied, 1);
}

#[test]
fn test_top_down_nested_levels_refine_parents() {
    // 8 points in 4 tight pairs; levels 2 then 4.
    let points = PointSet::new(vec![
        Point::new(0.0, 0.0),
        Point::new(0.1, 0.0),
        Point::new(0.0, 5.0),
        Point::new(0.1, 5.0),
        Point::new(10.0, 0.0),
        Point::new(10.1, 0.0),
        Point::new(10.0, 5.0),
        Point::new(10.1, 5.0),
    ]);
    let hierarchy = build_top_down(&mut kmeans(21), &points, &[2, 4], 5).unwrap();

    assert_level_invariants(&hierarchy, 8);
    assert_eq!(hierarchy.levels[0].num_clusters(), 2);
    assert_eq!(hierarchy.levels[1].num_clusters(), 4);

    // Children never straddle parents: points sharing a fine label share
    // their coarse label too.
    let coarse = &hierarchy.levels[0];
    let fine = &hierarchy.levels[1];
    for a in 0..8 {
        for b in 0..8 {
            if fine.assignments[a] == fine.assignments[b] {
                assert_eq!(coarse.assignments[a], coarse.assignments[b]);
            }
        }
    }
}

// ============================================================================
// Bottom-up
// ============================================================================

#[test]
fn test_bottom_up_merges_finest_level_centroids() {
    // Targets coarsest-first [2, 4]; consumed in reverse, so the finest
    // level (k=4) is fitted first and then merged into 2 super-clusters.
    let points = two_pair_points();
    let hierarchy = build_bottom_up(&mut kmeans(7), &points, &[2, 4], 3).unwrap();

    assert_eq!(hierarchy.num_levels(), 2);
    assert_level_invariants(&hierarchy, 4);

    let fine = &hierarchy.levels[0];
    let merged = &hierarchy.levels[1];
    assert_eq!(fine.num_clusters(), 4);
    assert_eq!(merged.num_clusters(), 2);

    // Relabeling is by composition: points sharing a fine label always
    // share the merged label.
    for a in 0..4 {
        for b in 0..4 {
            if fine.assignments[a] == fine.assignments[b] {
                assert_eq!(merged.assignments[a], merged.assignments[b]);
            }
        }
    }

    // The weighted merge of the four singleton centroids recovers the
    // two spatial groups.
    assert_eq!(merged.assignments[0], merged.assignments[1]);
    assert_eq!(merged.assignments[2], merged.assignments[3]);
    assert_ne!(merged.assignments[0], merged.assignments[2]);
    assert_eq!(merged.counts, vec![2, 2]);
}

#[test]
fn test_bottom_up_counts_are_point_counts_at_every_level() {
    let points = PointSet::new(vec![
        Point::new(0.0, 0.0),
        Point::new(0.1, 0.0),
        Point::new(0.2, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.1, 0.0),
        Point::new(20.0, 0.0),
    ]);
    let hierarchy = build_bottom_up(&mut kmeans(19), &points, &[2, 3, 6], 5).unwrap();

    assert_eq!(hierarchy.num_levels(), 3);
    assert_level_invariants(&hierarchy, 6);
    assert_eq!(hierarchy.levels[0].num_clusters(), 6);
    assert_eq!(hierarchy.levels[1].num_clusters(), 3);
    assert_eq!(hierarchy.levels[2].num_clusters(), 2);
}

// ============================================================================
// End-to-end rows
// ============================================================================

#[test]
fn test_single_level_rows_share_group_centroids() {
    // Two obvious 2-point groups, one level of 2 clusters: each row's
    // single centroid column is the centroid of its group, and exactly two
    // distinct centroid values appear across the four rows.
    let points = two_pair_points();
    let hierarchy = build_top_down(&mut kmeans(7), &points, &[2], 3).unwrap();

    let rows = assemble_rows(&points, &hierarchy, 3, "::");

    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row.len(), 3);
        assert_eq!(row[2], "*");
    }
    assert_eq!(rows[0][1], rows[1][1]);
    assert_eq!(rows[2][1], rows[3][1]);
    assert_ne!(rows[0][1], rows[2][1]);
    assert_eq!(rows[0][1], "0.050::0.000");
    assert_eq!(rows[2][1], "10.050::0.000");
}

// ============================================================================
// Failure propagation
// ============================================================================

#[test]
fn test_quota_failure_carries_level_context() {
    // Level 1 target (2) is below the parent cluster count (3).
    let points = PointSet::new(vec![
        Point::new(0.0, 0.0),
        Point::new(0.1, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.1, 0.0),
        Point::new(20.0, 0.0),
        Point::new(20.1, 0.0),
    ]);
    let err = build_top_down(&mut kmeans(5), &points, &[3, 2], 3).unwrap_err();

    match err {
        HierarchyError::Level { level, target, source } => {
            assert_eq!(level, 1);
            assert_eq!(target, 2);
            assert!(matches!(*source, HierarchyError::QuotaUnsatisfiable { .. }));
        }
        other => panic!("expected Level wrapper, got {:?}", other),
    }
}

#[test]
fn test_oversized_quota_fails_with_cluster_count_error() {
    // Target 5 over parents {2, 2} allocates a quota of 3 to a 2-point
    // parent; the sub-fit must reject it rather than invent clusters.
    let points = two_pair_points();
    let err = build_top_down(&mut kmeans(5), &points, &[2, 5], 3).unwrap_err();

    match err {
        HierarchyError::Level { level, source, .. } => {
            assert_eq!(level, 1);
            assert!(matches!(
                *source,
                HierarchyError::InvalidClusterCount { .. }
            ));
        }
        other => panic!("expected Level wrapper, got {:?}", other),
    }
}

#[test]
fn test_more_clusters_than_points_fails_at_level_zero() {
    let points = two_pair_points();
    let err = build_top_down(&mut kmeans(5), &points, &[9], 3).unwrap_err();

    match err {
        HierarchyError::Level { level, source, .. } => {
            assert_eq!(level, 0);
            assert!(matches!(
                *source,
                HierarchyError::InvalidClusterCount {
                    requested: 9,
                    available: 4
                }
            ));
        }
        other => panic!("expected Level wrapper, got {:?}", other),
    }
}

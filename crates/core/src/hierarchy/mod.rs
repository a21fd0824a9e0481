//! Multi-level cluster hierarchy data model and builders.

pub mod bottom_up;
pub mod quota;
pub mod top_down;

use crate::params::Order;
use crate::points::Point;

/// One clustering pass's complete result at a given granularity.
///
/// Immutable once constructed. Labels are contiguous from 0; every point id
/// of the originating point set appears exactly once in `assignments`.
#[derive(Debug, Clone)]
pub struct ClusterLevel {
    /// Cluster label per point id.
    pub assignments: Vec<usize>,
    /// Centroids indexed by label.
    pub centroids: Vec<Point>,
    /// Member count per label. Sums to the point count.
    pub counts: Vec<usize>,
}

impl ClusterLevel {
    /// Builds a level from per-point assignments, deriving member counts.
    ///
    /// # Panics
    ///
    /// Panics if any assignment references a label outside the centroid
    /// range; builders only produce labels they created centroids for.
    pub fn from_assignments(assignments: Vec<usize>, centroids: Vec<Point>) -> Self {
        let mut counts = vec![0usize; centroids.len()];
        for &label in &assignments {
            counts[label] += 1;
        }
        Self {
            assignments,
            centroids,
            counts,
        }
    }

    /// Number of clusters at this level.
    pub fn num_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Centroid assigned to the given point id.
    pub fn centroid_of(&self, point_id: usize) -> Point {
        self.centroids[self.assignments[point_id]]
    }
}

/// Ordered sequence of cluster levels plus the direction they were built in.
///
/// Top-down hierarchies store levels coarsest first; bottom-up hierarchies
/// store them finest first. Read-only once fully built.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub levels: Vec<ClusterLevel>,
    pub order: Order,
}

impl Hierarchy {
    pub fn new(levels: Vec<ClusterLevel>, order: Order) -> Self {
        Self { levels, order }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Walks levels from the finest granularity to the coarsest, regardless
    /// of build direction. This is the column order of assembled rows.
    pub fn levels_fine_to_coarse(&self) -> Box<dyn Iterator<Item = &ClusterLevel> + '_> {
        match self.order {
            Order::TopDown => Box::new(self.levels.iter().rev()),
            Order::BottomUp => Box::new(self.levels.iter()),
        }
    }
}

/// Groups point ids by their label at the given level.
///
/// Pure partitioning helper: member lists are ordered by point id, and the
/// outer vector is indexed by label.
pub fn members_by_label(assignments: &[usize], num_clusters: usize) -> Vec<Vec<usize>> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); num_clusters];
    for (point_id, &label) in assignments.iter().enumerate() {
        members[label].push(point_id);
    }
    members
}

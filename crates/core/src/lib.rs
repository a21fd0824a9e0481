//! geohier - multi-resolution clustering hierarchies for lat/lon points.
//!
//! Builds a tree-like, multi-column generalization per point by clustering
//! the input at several granularities, either top-down (recursive splitting)
//! or bottom-up (centroid merging).

pub mod assemble;
pub mod cluster;
pub mod error;
pub mod hierarchy;
pub mod params;
pub mod points;

pub use assemble::assemble_rows;
pub use cluster::capability::{ClusteringCapability, FitOutcome};
pub use cluster::kmeans::{KMeansConfig, WeightedKMeans};
pub use cluster::runner::best_run;
pub use hierarchy::bottom_up::build_bottom_up;
pub use hierarchy::top_down::build_top_down;
pub use hierarchy::{ClusterLevel, Hierarchy};
pub use params::{HierarchyParams, Order};
pub use points::{Point, PointSet};

pub use error::{HierarchyError, Result};

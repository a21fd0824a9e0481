//! Clustering primitives: the external capability boundary, the default
//! weighted k-means implementation, and the balance-selecting runner.

pub mod capability;
pub mod kmeans;
pub mod runner;

pub use capability::{ClusteringCapability, FitOutcome};
pub use kmeans::{KMeansConfig, WeightedKMeans};
pub use runner::{best_run, ClusterRun};

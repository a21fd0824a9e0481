//! The clustering capability boundary.
//!
//! The hierarchy engine consumes a clustering primitive through this trait
//! and never looks inside it. Implementations partition a (optionally
//! weighted) point slice into `k` groups.

use crate::error::Result;
use crate::points::Point;

/// One clustering fit: per-point labels and per-label centroids.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// Cluster label for each input point, aligned with the input slice.
    /// Labels are contiguous starting at 0.
    pub labels: Vec<usize>,

    /// Cluster centroids, indexed by label. Length is the requested `k`.
    pub centroids: Vec<Point>,
}

/// A clustering algorithm fitting `k` clusters over a weighted point set.
///
/// `fit` takes `&mut self` so implementations may advance internal state
/// (typically an RNG) between invocations; repeated calls with the same
/// arguments are expected to produce independent runs.
pub trait ClusteringCapability {
    /// Fits `k` clusters over `points`.
    ///
    /// `weights`, when given, must have the same length as `points`; a
    /// point's weight scales its influence on centroid placement.
    ///
    /// # Errors
    ///
    /// Returns `InvalidClusterCount` if `k` is zero or exceeds the number
    /// of points supplied.
    fn fit(&mut self, points: &[Point], k: usize, weights: Option<&[f64]>) -> Result<FitOutcome>;
}

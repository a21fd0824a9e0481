//! Hierarchy construction parameters.
//!
//! Contains HierarchyParams for controlling clustering and output formatting.

use crate::error::{HierarchyError, Result};

/// Direction in which the cluster tree is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Split clusters recursively, coarsest level first.
    TopDown,
    /// Merge centroids repeatedly, finest level first.
    BottomUp,
}

impl Order {
    /// Parses the protocol spelling of an order (`TD` or `BU`).
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "TD" => Ok(Order::TopDown),
            "BU" => Ok(Order::BottomUp),
            other => Err(HierarchyError::InvalidParameter {
                name: "Order",
                reason: format!("must be TD or BU, got {:?}", other),
            }),
        }
    }
}

/// Parameters for building and formatting a cluster hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyParams {
    /// Separator placed between latitude and longitude inside one column.
    pub separator: String,

    /// Number of digits after the decimal point in emitted coordinates.
    pub accuracy: usize,

    /// Build direction.
    pub order: Order,

    /// Target cluster count per level, coarsest first, ascending.
    pub targets: Vec<usize>,

    /// Number of clustering runs per level; the most balanced run wins.
    pub retries: usize,

    /// Core count handed through to the clustering capability's thread
    /// pool. Not interpreted by the hierarchy engine itself.
    pub cores: usize,
}

impl Default for HierarchyParams {
    fn default() -> Self {
        Self {
            separator: "::".to_string(),
            accuracy: 5,
            order: Order::TopDown,
            targets: vec![5, 10, 25, 50, 100],
            retries: 5,
            cores: 1,
        }
    }
}

impl HierarchyParams {
    /// Creates new parameters, validating the level targets and retry count.
    pub fn new(
        separator: String,
        accuracy: usize,
        order: Order,
        targets: Vec<usize>,
        retries: usize,
        cores: usize,
    ) -> Result<Self> {
        if targets.is_empty() {
            return Err(HierarchyError::InvalidParameter {
                name: "Preferred cluster amounts",
                reason: "at least one cluster amount is required".to_string(),
            });
        }
        if targets.contains(&0) {
            return Err(HierarchyError::InvalidParameter {
                name: "Preferred cluster amounts",
                reason: "cluster amounts must be positive".to_string(),
            });
        }
        if retries == 0 {
            return Err(HierarchyError::InvalidParameter {
                name: "best k means try",
                reason: "must be a positive integer".to_string(),
            });
        }

        Ok(Self {
            separator,
            accuracy,
            order,
            targets,
            retries,
            cores,
        })
    }
}

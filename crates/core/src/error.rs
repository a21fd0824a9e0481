//! Error types for the geohier clustering hierarchy library.

use thiserror::Error;

/// Primary error type for hierarchy construction.
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("invalid cluster count: requested {requested} clusters for {available} points")]
    InvalidClusterCount { requested: usize, available: usize },

    #[error(
        "cluster quota cannot reach target {target}: all {parents} parent \
         clusters are already at the minimum of one sub-cluster"
    )]
    QuotaUnsatisfiable { target: usize, parents: usize },

    #[error("level {level} (target {target}): {source}")]
    Level {
        level: usize,
        target: usize,
        #[source]
        source: Box<HierarchyError>,
    },

    #[error("missing parameter: {0}")]
    MissingParameter(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HierarchyError {
    /// Wraps an error with the hierarchy level it occurred at.
    pub fn at_level(self, level: usize, target: usize) -> Self {
        HierarchyError::Level {
            level,
            target,
            source: Box::new(self),
        }
    }
}

/// Convenience Result type alias for HierarchyError.
pub type Result<T> = std::result::Result<T, HierarchyError>;

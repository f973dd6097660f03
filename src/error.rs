use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for the reporting core.
///
/// `Load` and `MissingColumn` are startup errors and abort the session;
/// `EmptyInput` and `InvalidBound` are surfaced per render and leave the
/// loaded dataset untouched. Every operation is a pure computation over
/// in-memory data, so re-invoking after a failure is always safe.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The dataset file is missing, unreadable, or not parseable as CSV.
    #[error("failed to load dataset from {path:?}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An aggregation was requested over zero rows.
    #[error("aggregation requested over an empty dataset")]
    EmptyInput,

    /// A top-N bound below 1 was passed to the filter layer.
    #[error("top-N bound must be at least 1, got {0}")]
    InvalidBound(usize),

    /// A column named in the report configuration is absent from the
    /// loaded schema. Caught at startup, never at render time.
    #[error("column '{0}' is required by the report configuration but missing from the dataset")]
    MissingColumn(String),
}

impl ReportError {
    pub fn load(
        path: &std::path::Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ReportError::Load {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::analysis::compare::ComparisonKind;

// ---------------------------------------------------------------------------
// Loader errors – fatal at startup
// ---------------------------------------------------------------------------

/// The source table could not be turned into a [`CanonicalDataset`].
///
/// [`CanonicalDataset`]: crate::data::model::CanonicalDataset
#[derive(Debug, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Parquet error in {path}: {source}")]
    Parquet {
        path: PathBuf,
        source: parquet::errors::ParquetError,
    },

    #[error("Arrow error in {path}: {source}")]
    Arrow {
        path: PathBuf,
        source: arrow::error::ArrowError,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{path} is not a valid match table: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("{path} is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        path: PathBuf,
        columns: Vec<String>,
    },

    #[error("{path} contains no usable match rows")]
    Empty { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Comparison errors – recoverable, surfaced to the user
// ---------------------------------------------------------------------------

/// One or more selected identifiers do not exist in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} selection: {}", .identifiers.join(", "))]
pub struct UnknownEntityError {
    pub kind: ComparisonKind,
    pub identifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    #[error(transparent)]
    UnknownEntity(#[from] UnknownEntityError),

    #[error("select at least one {0} to analyze")]
    EmptySelection(ComparisonKind),
}

// ---------------------------------------------------------------------------
// Warnings – valid selection, nothing to show
// ---------------------------------------------------------------------------

/// A valid selection whose metric has no matching records
/// (e.g. two teams that never met). Rendered as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyResultWarning {
    /// Entity or entity pair the warning belongs to.
    pub scope: String,
    /// Metric that came back empty.
    pub metric: String,
    pub message: String,
}

impl EmptyResultWarning {
    pub fn new(scope: impl Into<String>, metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            metric: metric.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.scope, self.metric, self.message)
    }
}

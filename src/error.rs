//! Error types for the sales pipeline.
//!
//! Every stage returns `Result<_, PipelineError>`. Errors are never
//! recovered inside a stage; they surface once, at the top of `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the load, clean and analyze stages.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The data directory holds no file with a recognized tabular extension.
    #[error("No data files found in '{}'", dir.display())]
    NoDataFound { dir: PathBuf },

    /// The data directory itself could not be listed.
    #[error("Cannot read data directory '{}'", dir.display())]
    DataDirUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file could not be parsed as delimited text.
    #[error("Malformed file '{}': {reason}", path.display())]
    MalformedFile { path: PathBuf, reason: String },

    /// No source column maps to a required canonical column.
    #[error("Required column '{0}' not found in any data file")]
    MissingColumn(String),

    /// A price cell is not a finite number.
    #[error("Invalid price '{value}' in row {row}")]
    InvalidPriceFormat { row: usize, value: String },

    /// A date cell matches none of the accepted formats.
    #[error("Invalid date '{value}' in row {row}")]
    InvalidDateFormat { row: usize, value: String },

    /// Nothing survived cleaning, so no metric is defined.
    #[error("No valid sales records left after cleaning")]
    EmptyDataset,
}

impl PipelineError {
    /// Short stable code, used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDataFound { .. } => "NO_DATA_FOUND",
            Self::DataDirUnreadable { .. } => "DATA_DIR_UNREADABLE",
            Self::MalformedFile { .. } => "MALFORMED_FILE",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::InvalidPriceFormat { .. } => "INVALID_PRICE_FORMAT",
            Self::InvalidDateFormat { .. } => "INVALID_DATE_FORMAT",
            Self::EmptyDataset => "EMPTY_DATASET",
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

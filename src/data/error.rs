//! Errors raised while loading the sales table.
//!
//! Every variant is fatal for the dashboard: without a valid dataset there
//! is nothing to render. Filtering and aggregation never fail.

use std::path::PathBuf;

use thiserror::Error;

/// A `Time` cell that is not a strict `HH:MM:SS` time of day.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row}: time '{value}' does not match HH:MM:SS")]
pub struct ParseError {
    /// 1-based data row (header excluded).
    pub row: usize,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("invalid column range '{0}' (expected e.g. \"B:R\")")]
    InvalidColumnRange(String),

    #[error("spreadsheet error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("invalid source layout: {0}")]
    InvalidLayout(String),

    #[error("missing expected column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' value '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Time(#[from] ParseError),
}

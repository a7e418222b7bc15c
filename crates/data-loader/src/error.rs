//! Error types for the data-loader crate.
//!
//! Every variant carries enough context (file, record, row) to be shown to
//! the user as a fatal startup message.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting, loading or validating the
/// precomputed artifacts.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid JSON, or not the expected JSON shape
    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record in the movie table couldn't be used
    ///
    /// `record` is the zero-based row of the offending entry
    #[error("Parse error at record {record} in {file}: {reason}")]
    ParseError {
        file: String,
        record: usize,
        reason: String,
    },

    /// A similarity row has the wrong number of columns
    #[error("Similarity matrix is not square: row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Movie table and similarity matrix don't describe the same rows
    #[error("Movie table has {movies} rows but similarity matrix has dimension {dimension}")]
    AlignmentMismatch { movies: usize, dimension: usize },

    /// A required artifact is still absent after the extraction step
    #[error("Required data file is missing: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// Zip archive could not be read or unpacked
    #[error("Failed to extract archive {}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;

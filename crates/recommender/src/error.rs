//! Error types for recommendation lookups.

use data_loader::RowIndex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// No movie in the table carries this exact title
    #[error("Movie not found: {title}")]
    TitleNotFound { title: String },

    /// Row index is outside the movie table
    #[error("Row {row} is out of range for a table of {len} movies")]
    RowOutOfRange { row: RowIndex, len: usize },
}

pub type Result<T> = std::result::Result<T, RecommendError>;

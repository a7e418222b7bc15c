//! Parsers for the two precomputed artifacts.
//!
//! - movie table: JSON array of records, e.g. `[{"movie_id": 19995, "title": "Avatar"}, ...]`
//! - similarity matrix: JSON array of rows, e.g. `[[1.0, 0.2], [0.2, 1.0]]`
//!
//! The row index of a movie is its position in the array. Extra fields in a
//! record (tags, overview, ...) are ignored.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// One entry of the movie table as it appears on disk
#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    movie_id: Option<Value>,
}

/// Read a whole file, turning a missing file into `FileNotFound`
fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the movie table file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let bytes = read_file(path)?;
    parse_movies_slice(&bytes, &file_label(path))
}

/// Parse a movie table from memory; `file` is only used in error messages
pub fn parse_movies_slice(bytes: &[u8], file: &str) -> Result<Vec<Movie>> {
    let records: Vec<MovieRecord> =
        serde_json::from_slice(bytes).map_err(|source| DataLoadError::Json {
            file: file.to_string(),
            source,
        })?;

    let mut movies = Vec::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
        let title = match record.title {
            Some(Value::String(title)) if !title.trim().is_empty() => title,
            Some(Value::String(_)) => {
                return Err(DataLoadError::ParseError {
                    file: file.to_string(),
                    record: row,
                    reason: "Empty title".to_string(),
                });
            }
            Some(other) => {
                return Err(DataLoadError::ParseError {
                    file: file.to_string(),
                    record: row,
                    reason: format!("Title is not a string: {}", other),
                });
            }
            None => {
                return Err(DataLoadError::ParseError {
                    file: file.to_string(),
                    record: row,
                    reason: "Missing title".to_string(),
                });
            }
        };

        movies.push(Movie {
            row,
            movie_id: record.movie_id.as_ref().and_then(Value::as_u64),
            title,
        });
    }

    Ok(movies)
}

/// Parse the similarity matrix file
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let bytes = read_file(path)?;
    parse_similarity_slice(&bytes, &file_label(path))
}

/// Parse a similarity matrix from memory; `file` is only used in error messages
pub fn parse_similarity_slice(bytes: &[u8], file: &str) -> Result<SimilarityMatrix> {
    let rows: Vec<Vec<f64>> =
        serde_json::from_slice(bytes).map_err(|source| DataLoadError::Json {
            file: file.to_string(),
            source,
        })?;
    SimilarityMatrix::from_rows(rows)
}

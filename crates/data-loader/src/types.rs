//! Core domain types for the precomputed recommendation artifacts.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - `Movie`: one row of the movie table
//! - `SimilarityMatrix`: the square score matrix, aligned with the table by row
//! - `DataPaths`: where the artifacts (and their archives) live
//! - `Catalog`: the immutable context object that owns all of the above

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of a movie in the table, and of its row/column in the matrix
pub type RowIndex = usize;

// =============================================================================
// Movie Table
// =============================================================================

/// Represents one row of the movie table.
///
/// The row index is assigned by position when the table is loaded and is the
/// only link between a movie and its similarity row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub row: RowIndex,
    /// Upstream identifier kept from the precompute step, if the table has one
    pub movie_id: Option<u64>,
    pub title: String,
}

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Square matrix of similarity scores stored row-major.
///
/// Entry (i, j) is the similarity between movie i and movie j. Symmetry is a
/// convention of the precompute step and is not checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build a matrix from its rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> crate::Result<Self> {
        let dim = rows.len();
        let mut scores = Vec::with_capacity(dim * dim);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dim {
                return Err(crate::DataLoadError::NotSquare {
                    row,
                    expected: dim,
                    found: values.len(),
                });
            }
            scores.extend(values);
        }

        Ok(Self { dim, scores })
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Get the scores of one row, or `None` if `row` is out of range
    pub fn row(&self, row: RowIndex) -> Option<&[f64]> {
        if row >= self.dim {
            return None;
        }
        let start = row * self.dim;
        Some(&self.scores[start..start + self.dim])
    }

    /// Get a single score
    pub fn score(&self, row: RowIndex, col: RowIndex) -> Option<f64> {
        self.row(row).and_then(|r| r.get(col).copied())
    }

    /// All scores, row-major
    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }
}

// =============================================================================
// Artifact Locations
// =============================================================================

/// Where to find the two artifacts and the archives they may ship in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub movies_file: String,
    pub similarity_file: String,
    pub movies_archive: String,
    pub similarity_archive: String,
}

impl DataPaths {
    /// Default file names inside `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            movies_file: "movie_list.json".to_string(),
            similarity_file: "similarity.json".to_string(),
            movies_archive: "movie_list.zip".to_string(),
            similarity_archive: "similarity.zip".to_string(),
        }
    }

    pub fn movies_path(&self) -> PathBuf {
        self.data_dir.join(&self.movies_file)
    }

    pub fn similarity_path(&self) -> PathBuf {
        self.data_dir.join(&self.similarity_file)
    }

    pub fn movies_archive_path(&self) -> PathBuf {
        self.data_dir.join(&self.movies_archive)
    }

    pub fn similarity_archive_path(&self) -> PathBuf {
        self.data_dir.join(&self.similarity_archive)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

// =============================================================================
// Catalog - The Immutable Context Object
// =============================================================================

/// Movie table plus similarity matrix, loaded once and read by every request.
///
/// A `Catalog` is only handed out after its alignment has been validated
/// (see `index.rs`), so `movies[i]` always corresponds to `similarity.row(i)`.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    /// Title -> first row carrying that exact title
    pub(crate) title_index: HashMap<String, RowIndex>,
    pub(crate) similarity: SimilarityMatrix,
}

impl Catalog {
    /// Number of movies in the table
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Row of the first movie whose title equals `title` exactly (case-sensitive)
    pub fn row_of(&self, title: &str) -> Option<RowIndex> {
        self.title_index.get(title).copied()
    }

    /// Get a movie by row
    pub fn movie(&self, row: RowIndex) -> Option<&Movie> {
        self.movies.get(row)
    }

    /// All movies in row order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Titles in row order, as shown by a title selector
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    /// Similarity scores of one movie against every other movie
    pub fn similarity_row(&self, row: RowIndex) -> Option<&[f64]> {
        self.similarity.row(row)
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Case-insensitive substring search over titles, in row order
    pub fn search(&self, query: &str) -> Vec<&Movie> {
        let needle = query.to_lowercase();
        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .collect()
    }
}

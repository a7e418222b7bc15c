//! Catalog building and validation logic.
//!
//! Startup runs in a fixed order:
//! 1. Extract artifacts from their archives when the files are absent
//! 2. Parse the movie table and the similarity matrix (in parallel)
//! 3. Validate that the two line up
//! 4. Hand out the immutable `Catalog`

use crate::archive::{self, ExtractOutcome};
use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

impl Catalog {
    /// Extract, load and validate the artifacts described by `paths`
    ///
    /// A failed extraction is only logged: if the file turns out to be there
    /// anyway, startup continues. A file that is still missing afterwards is fatal.
    pub fn bootstrap(paths: &DataPaths) -> Result<Self> {
        info!("Loading recommendation data from {:?}", paths.data_dir());

        let movies_path = paths.movies_path();
        let similarity_path = paths.similarity_path();

        extract_if_needed(&movies_path, &paths.movies_archive_path());
        extract_if_needed(&similarity_path, &paths.similarity_archive_path());

        for required in [&movies_path, &similarity_path] {
            if !required.exists() {
                return Err(DataLoadError::MissingArtifact {
                    path: required.clone(),
                });
            }
        }

        // Rayon's `join` parses both files at the same time
        let (movies, similarity) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_similarity(&similarity_path),
        );
        let movies = movies?;
        let similarity = similarity?;

        info!(
            "Loaded {} movies and a {}x{} similarity matrix",
            movies.len(),
            similarity.dimension(),
            similarity.dimension()
        );

        let catalog = Self::from_parts(movies, similarity)?;
        info!("Catalog successfully built and validated!");
        Ok(catalog)
    }

    /// Build a catalog from already-parsed parts
    ///
    /// Rows are renumbered by position so that `movies[i].row == i`.
    pub fn from_parts(mut movies: Vec<Movie>, similarity: SimilarityMatrix) -> Result<Self> {
        for (row, movie) in movies.iter_mut().enumerate() {
            movie.row = row;
        }

        let mut title_index = HashMap::with_capacity(movies.len());
        for movie in &movies {
            // First row wins for duplicate titles
            title_index.entry(movie.title.clone()).or_insert(movie.row);
        }

        let catalog = Self {
            movies,
            title_index,
            similarity,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - The table is not empty
    /// - Row count of the table equals the matrix dimension
    /// - Every score is finite
    ///
    /// Rows whose own score is not the row maximum are only reported.
    pub fn validate(&self) -> Result<()> {
        if self.movies.is_empty() {
            return Err(DataLoadError::ValidationError(
                "Movie table is empty".to_string(),
            ));
        }

        let dimension = self.similarity.dimension();
        if self.movies.len() != dimension {
            return Err(DataLoadError::AlignmentMismatch {
                movies: self.movies.len(),
                dimension,
            });
        }

        if let Some(pos) = self
            .similarity
            .as_slice()
            .par_iter()
            .position_any(|score| !score.is_finite())
        {
            return Err(DataLoadError::InvalidValue {
                field: format!("similarity[{}][{}]", pos / dimension, pos % dimension),
                value: self.similarity.as_slice()[pos].to_string(),
            });
        }

        let off_diagonal = self.rows_without_self_maximum();
        if off_diagonal > 0 {
            warn!(
                "{} of {} similarity rows score another movie above the movie itself",
                off_diagonal, dimension
            );
        }

        Ok(())
    }

    /// Count rows where some other column outscores the diagonal
    pub fn rows_without_self_maximum(&self) -> usize {
        (0..self.similarity.dimension())
            .into_par_iter()
            .filter(|&row| match self.similarity.row(row) {
                Some(scores) => {
                    let own = scores[row];
                    scores.iter().any(|&s| s > own)
                }
                None => false,
            })
            .count()
    }
}

/// Run one extraction, logging instead of failing
fn extract_if_needed(target: &Path, archive_path: &Path) {
    match archive::ensure_extracted(target, archive_path) {
        Ok(ExtractOutcome::Extracted { entries }) => {
            info!(
                "Extracted {} file(s) from {}",
                entries,
                archive_path.display()
            );
        }
        Ok(ExtractOutcome::AlreadyPresent) | Ok(ExtractOutcome::ArchiveMissing) => {}
        Err(e) => {
            warn!("Extraction of {} failed: {}", archive_path.display(), e);
        }
    }
}

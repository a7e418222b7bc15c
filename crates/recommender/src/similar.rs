//! Similar-movie lookup over the precomputed similarity matrix.
//!
//! ## Algorithm
//! 1. Resolve the selected title to its row (first exact match)
//! 2. Pair every score in that row with its column index
//! 3. Sort descending by score; equal scores keep ascending index order
//! 4. Drop the query's own index
//! 5. Return the next `limit` entries (fewer if the table is small)

use crate::error::{RecommendError, Result};
use crate::types::ScoredMovie;
use data_loader::{Catalog, RowIndex};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of recommendations returned when no limit is configured
pub const DEFAULT_LIMIT: usize = 5;

/// Looks up the movies most similar to a selected one
#[derive(Debug, Clone)]
pub struct SimilarityRecommender {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,

    /// How many movies to return per lookup
    limit: usize,
}

impl SimilarityRecommender {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Configure the number of recommendations (default: 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Recommend movies similar to `title`
    #[instrument(skip(self))]
    pub fn recommend(&self, title: &str) -> Result<Vec<ScoredMovie>> {
        let row = self
            .catalog
            .row_of(title)
            .ok_or_else(|| RecommendError::TitleNotFound {
                title: title.to_string(),
            })?;
        debug!("Resolved '{}' to row {}", title, row);
        self.recommend_row(row)
    }

    /// Recommend movies similar to the movie at `row`
    pub fn recommend_row(&self, row: RowIndex) -> Result<Vec<ScoredMovie>> {
        let ranked = self.rank_row(row)?;

        let recommendations: Vec<ScoredMovie> = ranked
            .into_iter()
            .filter(|&(col, _)| col != row)
            .take(self.limit)
            .filter_map(|(col, score)| {
                let movie = self.catalog.movie(col)?;
                Some(ScoredMovie {
                    row: col,
                    movie_id: movie.movie_id,
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect();

        debug!(
            "Selected {} recommendations for row {}",
            recommendations.len(),
            row
        );
        Ok(recommendations)
    }

    /// Every column of `row` paired with its score, best first
    ///
    /// The query itself is included, so for a matrix with a maximal diagonal
    /// it comes first.
    pub fn rank_row(&self, row: RowIndex) -> Result<Vec<(RowIndex, f64)>> {
        let scores = self
            .catalog
            .similarity_row(row)
            .ok_or(RecommendError::RowOutOfRange {
                row,
                len: self.catalog.len(),
            })?;

        let mut ranked: Vec<(RowIndex, f64)> = scores.iter().copied().enumerate().collect();

        // `sort_by` is stable, so ties stay in index order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        Ok(ranked)
    }
}

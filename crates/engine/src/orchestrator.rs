//! # Recommendation Orchestrator
//!
//! This module runs one user interaction end to end:
//! 1. Look up the selected title's similar movies
//! 2. Fetch metadata for the selected movie
//! 3. Fetch metadata for each recommendation, in rank order
//! 4. Return everything the presentation layer needs to render
//!
//! Metadata lookups run one after another and each failure only affects its
//! own item. Nothing is cached: every call goes back to the metadata source.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::Result;
use data_loader::{Catalog, RowIndex};
use metadata_client::{MetadataSource, MovieMetadata};
use recommender::{ScoredMovie, SimilarityRecommender};

/// Outcome of one metadata lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLookup {
    Found(MovieMetadata),
    /// The source doesn't know this title
    Missing,
    /// Network, status or format failure; the reason is shown as a warning
    Failed { reason: String },
}

impl MetadataLookup {
    pub fn details(&self) -> Option<&MovieMetadata> {
        match self {
            MetadataLookup::Found(metadata) => Some(metadata),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MetadataLookup::Found(_))
    }
}

/// The movie the user picked
#[derive(Debug, Clone)]
pub struct SelectedMovie {
    pub row: RowIndex,
    pub title: String,
    pub metadata: MetadataLookup,
}

/// Final recommendation returned to the user
#[derive(Debug, Clone)]
pub struct MovieRecommendation {
    /// 1-based position in the list
    pub rank: usize,
    pub row: RowIndex,
    pub movie_id: Option<u64>,
    pub title: String,
    pub score: f64,
    pub metadata: MetadataLookup,
}

/// Everything produced for one selection
#[derive(Debug, Clone)]
pub struct RecommendationReport {
    pub selected: SelectedMovie,
    pub recommendations: Vec<MovieRecommendation>,
}

impl RecommendationReport {
    /// One message per metadata lookup that failed
    pub fn warnings(&self) -> Vec<String> {
        std::iter::once((&self.selected.title, &self.selected.metadata))
            .chain(
                self.recommendations
                    .iter()
                    .map(|rec| (&rec.title, &rec.metadata)),
            )
            .filter_map(|(title, lookup)| match lookup {
                MetadataLookup::Failed { reason } => {
                    Some(format!("Error fetching data for '{}': {}", title, reason))
                }
                _ => None,
            })
            .collect()
    }
}

/// Coordinates the recommender and the metadata source
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<Catalog>,
    recommender: SimilarityRecommender,
    metadata: Arc<dyn MetadataSource>,
}

impl RecommendationOrchestrator {
    /// # Arguments
    /// * `catalog` - Shared, already validated catalog
    /// * `metadata` - Where movie details come from
    /// * `limit` - Number of recommendations per selection
    pub fn new(catalog: Arc<Catalog>, metadata: Arc<dyn MetadataSource>, limit: usize) -> Self {
        let recommender = SimilarityRecommender::new(catalog.clone()).with_limit(limit);
        Self {
            catalog,
            recommender,
            metadata,
        }
    }

    /// Build an orchestrator with the metadata source and limit from `config`
    pub fn from_config(catalog: Arc<Catalog>, config: &Config) -> Result<Self> {
        let metadata = config.metadata_source()?;
        Ok(Self::new(catalog, metadata, config.recommendation_limit))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn recommender(&self) -> &SimilarityRecommender {
        &self.recommender
    }

    /// Main entry point: recommendations for `title`, decorated with metadata
    ///
    /// Fails only if `title` is not in the catalog.
    #[instrument(skip(self))]
    pub async fn recommend(&self, title: &str) -> Result<RecommendationReport> {
        let start_time = Instant::now();

        // Resolve first so an unknown title costs no network calls
        let row = self
            .catalog
            .row_of(title)
            .ok_or_else(|| recommender::RecommendError::TitleNotFound {
                title: title.to_string(),
            })?;
        let similar = self.recommender.recommend_row(row)?;
        info!("Found {} similar movies for '{}'", similar.len(), title);

        let selected = SelectedMovie {
            row,
            title: title.to_string(),
            metadata: self.details(title).await,
        };

        let mut recommendations = Vec::with_capacity(similar.len());
        for (i, scored) in similar.into_iter().enumerate() {
            recommendations.push(self.decorate(i + 1, scored).await);
        }

        let report = RecommendationReport {
            selected,
            recommendations,
        };
        info!(
            "Built {} recommendations for '{}' in {:.2?} ({} metadata warnings)",
            report.recommendations.len(),
            title,
            start_time.elapsed(),
            report.warnings().len()
        );
        Ok(report)
    }

    /// Look up metadata for one title, never failing
    pub async fn details(&self, title: &str) -> MetadataLookup {
        match self.metadata.fetch(title).await {
            Ok(Some(metadata)) => MetadataLookup::Found(metadata),
            Ok(None) => {
                info!("{} has no entry for '{}'", self.metadata.name(), title);
                MetadataLookup::Missing
            }
            Err(e) => {
                warn!("Metadata lookup for '{}' failed: {}", title, e);
                MetadataLookup::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn decorate(&self, rank: usize, scored: ScoredMovie) -> MovieRecommendation {
        let metadata = self.details(&scored.title).await;
        MovieRecommendation {
            rank,
            row: scored.row,
            movie_id: scored.movie_id,
            title: scored.title,
            score: scored.score,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use async_trait::async_trait;
    use data_loader::{Movie, SimilarityMatrix};
    use metadata_client::{MetadataError, NOT_AVAILABLE};
    use recommender::RecommendError;
    use std::collections::HashSet;
    use std::sync::Mutex;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    const TITLES: [&str; 7] = [
        "The Matrix",
        "The Matrix Reloaded",
        "Inception",
        "Dark City",
        "Equilibrium",
        "Ghost in the Shell",
        "Notting Hill",
    ];

    /// Seven movies; row 0 is most similar to rows 1, 2, 3, 4, 5 in that order
    fn build_test_catalog() -> Arc<Catalog> {
        let movies = TITLES
            .iter()
            .enumerate()
            .map(|(i, title)| Movie {
                row: i,
                movie_id: Some(i as u64 + 1),
                title: title.to_string(),
            })
            .collect();

        let first_row = vec![1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.1];
        let rows = (0..TITLES.len())
            .map(|i| {
                (0..TITLES.len())
                    .map(|j| match (i, j) {
                        (0, j) => first_row[j],
                        (i, 0) => first_row[i],
                        (i, j) if i == j => 1.0,
                        _ => 0.2,
                    })
                    .collect()
            })
            .collect();

        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        Arc::new(Catalog::from_parts(movies, matrix).unwrap())
    }

    // ============================================================================
    // Scripted Metadata Source
    // ============================================================================

    /// Answers from a fixed script and records every title it was asked for
    #[derive(Default)]
    struct ScriptedMetadata {
        failing: HashSet<String>,
        missing: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedMetadata {
        fn failing(titles: &[&str]) -> Self {
            Self {
                failing: titles.iter().map(|t| t.to_string()).collect(),
                ..Self::default()
            }
        }

        fn missing(titles: &[&str]) -> Self {
            Self {
                missing: titles.iter().map(|t| t.to_string()).collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetadataSource for ScriptedMetadata {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch(&self, title: &str) -> std::result::Result<Option<MovieMetadata>, MetadataError> {
            self.calls.lock().unwrap().push(title.to_string());

            if self.failing.contains(title) {
                return Err(MetadataError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            if self.missing.contains(title) {
                return Ok(None);
            }

            let body = format!(
                r#"{{"Response":"True","Year":"1999","Plot":"About {}","Poster":"N/A"}}"#,
                title
            );
            metadata_client::parse_response(&body)
        }
    }

    fn build_orchestrator(source: Arc<ScriptedMetadata>) -> RecommendationOrchestrator {
        RecommendationOrchestrator::new(build_test_catalog(), source, 5)
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_returns_ranked_decorated_movies() {
        let source = Arc::new(ScriptedMetadata::default());
        let orchestrator = build_orchestrator(source.clone());

        let report = orchestrator.recommend("The Matrix").await.unwrap();

        assert_eq!(report.selected.row, 0);
        assert!(report.selected.metadata.is_found());

        let titles: Vec<_> = report.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, &TITLES[1..6]);

        let ranks: Vec<_> = report.recommendations.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert_eq!(report.recommendations[0].score, 0.9);
        assert_eq!(report.recommendations[0].movie_id, Some(2));

        let details = report.recommendations[1].metadata.details().unwrap();
        assert_eq!(details.plot, "About Inception");
        assert_eq!(details.poster, NOT_AVAILABLE);
        assert!(report.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_fetched_sequentially_selected_first() {
        let source = Arc::new(ScriptedMetadata::default());
        let orchestrator = build_orchestrator(source.clone());

        orchestrator.recommend("The Matrix").await.unwrap();

        assert_eq!(source.calls(), &TITLES[0..6]);
    }

    #[tokio::test]
    async fn test_failed_lookup_does_not_abort_the_rest() {
        let source = Arc::new(ScriptedMetadata::failing(&["Inception"]));
        let orchestrator = build_orchestrator(source.clone());

        let report = orchestrator.recommend("The Matrix").await.unwrap();

        assert_eq!(report.recommendations.len(), 5);
        assert!(matches!(
            report.recommendations[1].metadata,
            MetadataLookup::Failed { .. }
        ));
        assert!(report.recommendations[2].metadata.is_found());
        assert!(report.recommendations[4].metadata.is_found());

        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Inception"));
    }

    #[tokio::test]
    async fn test_missing_lookup_is_not_a_warning() {
        let source = Arc::new(ScriptedMetadata::missing(&["The Matrix"]));
        let orchestrator = build_orchestrator(source);

        let report = orchestrator.recommend("The Matrix").await.unwrap();

        assert_eq!(report.selected.metadata, MetadataLookup::Missing);
        assert!(report.selected.metadata.details().is_none());
        assert!(report.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_title_is_not_found_without_network_calls() {
        let source = Arc::new(ScriptedMetadata::default());
        let orchestrator = build_orchestrator(source.clone());

        let err = orchestrator.recommend("Plan 9 from Outer Space").await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::Recommend(RecommendError::TitleNotFound { .. })
        ));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_requests_refetch_metadata() {
        let source = Arc::new(ScriptedMetadata::default());
        let orchestrator = build_orchestrator(source.clone());

        orchestrator.recommend("The Matrix").await.unwrap();
        orchestrator.recommend("The Matrix").await.unwrap();

        assert_eq!(source.calls().len(), 12);
    }

    #[tokio::test]
    async fn test_details_for_single_title() {
        let source = Arc::new(ScriptedMetadata::failing(&["Dark City"]));
        let orchestrator = build_orchestrator(source);

        assert!(orchestrator.details("Equilibrium").await.is_found());
        assert!(matches!(
            orchestrator.details("Dark City").await,
            MetadataLookup::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_from_config_without_key_still_recommends() {
        let orchestrator =
            RecommendationOrchestrator::from_config(build_test_catalog(), &Config::default())
                .unwrap();

        let report = orchestrator.recommend("Notting Hill").await.unwrap();

        assert_eq!(report.recommendations.len(), 5);
        assert_eq!(report.warnings().len(), 6);
    }
}

//! Engine crate tying the catalog, recommender and metadata client together.
//!
//! The presentation layer only talks to [`RecommendationOrchestrator`].

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::Config;
pub use error::{EngineError, Result};
pub use orchestrator::{
    MetadataLookup, MovieRecommendation, RecommendationOrchestrator, RecommendationReport,
    SelectedMovie,
};

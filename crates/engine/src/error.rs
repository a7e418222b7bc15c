use data_loader::DataLoadError;
use metadata_client::MetadataError;
use recommender::RecommendError;
use thiserror::Error;

/// Errors surfaced by the engine to the presentation layer
#[derive(Error, Debug)]
pub enum EngineError {
    /// Startup-fatal: artifacts missing or corrupt
    #[error("Failed to load recommendation data: {0}")]
    Data(#[from] DataLoadError),

    /// The selected title can't be looked up
    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error("Failed to set up metadata client: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

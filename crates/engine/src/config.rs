use crate::error::{EngineError, Result};
use data_loader::DataPaths;
use metadata_client::{DisabledMetadata, MetadataSource, OmdbClient, OmdbConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the artifacts and their archives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_movies_file")]
    pub movies_file: String,

    #[serde(default = "default_similarity_file")]
    pub similarity_file: String,

    #[serde(default = "default_movies_archive")]
    pub movies_archive: String,

    #[serde(default = "default_similarity_archive")]
    pub similarity_archive: String,

    /// OMDb API key; metadata lookups are disabled without one
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    #[serde(default = "default_omdb_timeout_secs")]
    pub omdb_timeout_secs: u64,

    /// Number of similar movies to show
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_movies_file() -> String {
    "movie_list.json".to_string()
}

fn default_similarity_file() -> String {
    "similarity.json".to_string()
}

fn default_movies_archive() -> String {
    "movie_list.zip".to_string()
}

fn default_similarity_archive() -> String {
    "similarity.zip".to_string()
}

fn default_omdb_api_url() -> String {
    metadata_client::DEFAULT_API_URL.to_string()
}

fn default_omdb_timeout_secs() -> u64 {
    metadata_client::DEFAULT_TIMEOUT.as_secs()
}

fn default_recommendation_limit() -> usize {
    recommender::DEFAULT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            movies_file: default_movies_file(),
            similarity_file: default_similarity_file(),
            movies_archive: default_movies_archive(),
            similarity_archive: default_similarity_archive(),
            omdb_api_key: None,
            omdb_api_url: default_omdb_api_url(),
            omdb_timeout_secs: default_omdb_timeout_secs(),
            recommendation_limit: default_recommendation_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map_err(|e| EngineError::Config(format!("Failed to load config: {}", e)))
    }

    /// Load configuration from explicit key/value pairs, using env var names
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(pairs)
            .map_err(|e| EngineError::Config(format!("Failed to load config: {}", e)))
    }

    /// Artifact locations derived from this config
    pub fn data_paths(&self) -> DataPaths {
        DataPaths {
            data_dir: self.data_dir.clone(),
            movies_file: self.movies_file.clone(),
            similarity_file: self.similarity_file.clone(),
            movies_archive: self.movies_archive.clone(),
            similarity_archive: self.similarity_archive.clone(),
        }
    }

    /// OMDb settings, or `None` when no usable API key is configured
    pub fn omdb_config(&self) -> Option<OmdbConfig> {
        let key = self.omdb_api_key.as_deref()?.trim();
        if key.is_empty() {
            return None;
        }
        Some(
            OmdbConfig::new(key)
                .with_api_url(self.omdb_api_url.clone())
                .with_timeout(Duration::from_secs(self.omdb_timeout_secs)),
        )
    }

    /// Build the metadata source this config describes
    pub fn metadata_source(&self) -> Result<Arc<dyn MetadataSource>> {
        match self.omdb_config() {
            Some(omdb) => Ok(Arc::new(OmdbClient::new(omdb)?)),
            None => {
                tracing::warn!("OMDB_API_KEY is not set; movie details will be unavailable");
                Ok(Arc::new(DisabledMetadata))
            }
        }
    }
}

//! Client for the OMDb movie metadata API.
//!
//! This crate decorates recommendations with data from a third-party movie
//! database. It handles:
//! - Building the GET request (`apikey`, `t`, `plot=short`, `r=json`)
//! - A fixed request timeout
//! - Mapping the JSON reply into [`MovieMetadata`]
//!
//! There is no retry and no caching: every call goes to the network.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

pub mod types;

pub use types::{MovieMetadata, NOT_AVAILABLE, parse_response};

/// Base URL of the public OMDb API
pub const DEFAULT_API_URL: &str = "http://www.omdbapi.com/";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("No OMDb API key configured")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Transport failure, including timeouts
    #[error("Request to metadata service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metadata service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from metadata service: {0}")]
    Malformed(String),
}

/// Anything that can look up metadata for a movie title
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Returns the name of this source (for logging)
    fn name(&self) -> &str;

    /// Look up one title
    ///
    /// `Ok(None)` means the source answered but does not know the title.
    async fn fetch(&self, title: &str) -> Result<Option<MovieMetadata>, MetadataError>;
}

/// Connection settings for [`OmdbClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmdbConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl OmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the OMDb API
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    config: OmdbConfig,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.trim().is_empty() {
            return Err(MetadataError::MissingApiKey);
        }

        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MetadataError::ClientBuild(e.to_string()))?;

        info!(
            "Metadata client for {} (timeout {:?})",
            config.api_url, config.timeout
        );
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Get the address of the API this client talks to.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }
}

#[async_trait]
impl MetadataSource for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn fetch(&self, title: &str) -> Result<Option<MovieMetadata>, MetadataError> {
        debug!("Fetching metadata for '{}'", title);

        let response = self
            .http_client
            .get(&self.config.api_url)
            .query(&[
                ("apikey", self.config.api_key.as_str()),
                ("t", title),
                ("plot", "short"),
                ("r", "json"),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Metadata request for '{}' failed: {}", title, e);
                MetadataError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Metadata service returned {} for '{}'", status, title);
            return Err(MetadataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Source used when no API key is configured: every lookup fails recoverably
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMetadata;

#[async_trait]
impl MetadataSource for DisabledMetadata {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn fetch(&self, _title: &str) -> Result<Option<MovieMetadata>, MetadataError> {
        Err(MetadataError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OmdbConfig::new("abc123");

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_builders() {
        let config = OmdbConfig::new("abc123")
            .with_api_url("http://127.0.0.1:9999/")
            .with_timeout(Duration::from_millis(250));

        assert_eq!(config.api_url, "http://127.0.0.1:9999/");
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = OmdbClient::new(OmdbConfig::new("  ")).unwrap_err();
        assert!(matches!(err, MetadataError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_disabled_source_fails_every_lookup() {
        let source = DisabledMetadata;

        let err = source.fetch("The Matrix").await.unwrap_err();
        assert!(matches!(err, MetadataError::MissingApiKey));
        assert_eq!(source.name(), "disabled");
    }
}

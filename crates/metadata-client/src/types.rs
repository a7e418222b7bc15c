//! Movie metadata as returned by the OMDb API, and the mapping from its JSON.

use crate::MetadataError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder OMDb uses (and we use) for a field with no data
pub const NOT_AVAILABLE: &str = "N/A";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Missing and `null` fields both become `NOT_AVAILABLE`
///
/// Numbers and booleans are kept as their text; arrays and objects have no
/// display form and also become `NOT_AVAILABLE`.
fn string_or_not_available<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => not_available(),
    })
}

/// Per-request metadata for one title. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMetadata {
    #[serde(rename = "Poster", default = "not_available", deserialize_with = "string_or_not_available")]
    pub poster: String,
    #[serde(rename = "Year", default = "not_available", deserialize_with = "string_or_not_available")]
    pub year: String,
    #[serde(rename = "Genre", default = "not_available", deserialize_with = "string_or_not_available")]
    pub genre: String,
    #[serde(rename = "Director", default = "not_available", deserialize_with = "string_or_not_available")]
    pub director: String,
    #[serde(rename = "Actors", default = "not_available", deserialize_with = "string_or_not_available")]
    pub actors: String,
    #[serde(rename = "imdbRating", default = "not_available", deserialize_with = "string_or_not_available")]
    pub imdb_rating: String,
    #[serde(rename = "Plot", default = "not_available", deserialize_with = "string_or_not_available")]
    pub plot: String,
    #[serde(rename = "Runtime", default = "not_available", deserialize_with = "string_or_not_available")]
    pub runtime: String,
}

impl MovieMetadata {
    /// Poster URL, or `None` when OMDb has no poster
    pub fn poster_url(&self) -> Option<&str> {
        match self.poster.as_str() {
            NOT_AVAILABLE | "" => None,
            url => Some(url),
        }
    }

    /// Plot cut to at most `max_chars` characters, with `...` appended when cut
    pub fn short_plot(&self, max_chars: usize) -> String {
        match self.plot.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &self.plot[..byte_idx]),
            None => self.plot.clone(),
        }
    }
}

/// Top-level shape of an OMDb reply
#[derive(Debug, Deserialize)]
struct OmdbEnvelope {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(flatten)]
    metadata: MovieMetadata,
}

/// Map an OMDb response body
///
/// - `Ok(Some(_))`: the title was found
/// - `Ok(None)`: OMDb answered, but `Response` was not `"True"`
/// - `Err(Malformed)`: the body isn't an OMDb JSON object
pub fn parse_response(body: &str) -> Result<Option<MovieMetadata>, MetadataError> {
    let envelope: OmdbEnvelope =
        serde_json::from_str(body).map_err(|e| MetadataError::Malformed(e.to_string()))?;

    if envelope.response.as_deref() != Some("True") {
        tracing::debug!(
            "OMDb reported no match: {}",
            envelope.error.as_deref().unwrap_or("no error message")
        );
        return Ok(None);
    }

    Ok(Some(envelope.metadata))
}

//! Integration tests for the OMDb client against a mock service.
//!
//! The mock binds to a random local port and answers according to the
//! requested title, so each failure mode can be triggered on demand.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use metadata_client::{MetadataError, MetadataSource, NOT_AVAILABLE, OmdbClient, OmdbConfig};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";

// ============================================================================
// Mock OMDb Service
// ============================================================================

async fn mock_omdb(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("apikey").map(String::as_str) != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"Response": "False", "Error": "Invalid API key!"})),
        )
            .into_response();
    }
    if params.get("plot").map(String::as_str) != Some("short")
        || params.get("r").map(String::as_str) != Some("json")
    {
        return (StatusCode::BAD_REQUEST, "unexpected query").into_response();
    }

    match params.get("t").map(String::as_str) {
        Some("The Matrix") => Json(json!({
            "Title": "The Matrix",
            "Year": "1999",
            "Runtime": "136 min",
            "Genre": "Action, Sci-Fi",
            "Director": "Lana Wachowski, Lilly Wachowski",
            "Actors": "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
            "Plot": "When a beautiful stranger leads computer hacker Neo to a forbidding underworld...",
            "Poster": "https://example.com/matrix.jpg",
            "imdbRating": "8.7",
            "Response": "True"
        }))
        .into_response(),
        Some("Obscure Film") => Json(json!({
            "Title": "Obscure Film",
            "Year": "1971",
            "Poster": "N/A",
            "Response": "True"
        }))
        .into_response(),
        Some("Broken") => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        Some("Garbage") => "definitely not json".into_response(),
        Some("Slow") => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"Response": "True", "Year": "2000"})).into_response()
        }
        _ => Json(json!({"Response": "False", "Error": "Movie not found!"})).into_response(),
    }
}

/// Start the mock service on a random port, returning its base URL
async fn start_mock_omdb() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock OMDb service");
    let addr = listener.local_addr().expect("Failed to get local address");

    let app = Router::new().route("/", get(mock_omdb));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Mock OMDb service failed");
    });

    (format!("http://{}/", addr), handle)
}

async fn build_client(timeout: Duration) -> (OmdbClient, tokio::task::JoinHandle<()>) {
    let (url, handle) = start_mock_omdb().await;
    let config = OmdbConfig::new(API_KEY)
        .with_api_url(url)
        .with_timeout(timeout);
    (OmdbClient::new(config).expect("Failed to build client"), handle)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_found_title() {
    let (client, handle) = build_client(Duration::from_secs(5)).await;

    let metadata = client
        .fetch("The Matrix")
        .await
        .expect("fetch failed")
        .expect("title should be found");

    assert_eq!(metadata.year, "1999");
    assert_eq!(metadata.director, "Lana Wachowski, Lilly Wachowski");
    assert_eq!(metadata.imdb_rating, "8.7");
    assert_eq!(metadata.poster_url(), Some("https://example.com/matrix.jpg"));

    handle.abort();
}

#[tokio::test]
async fn test_fetch_partial_record_uses_sentinel() {
    let (client, handle) = build_client(Duration::from_secs(5)).await;

    let metadata = client.fetch("Obscure Film").await.unwrap().unwrap();

    assert_eq!(metadata.year, "1971");
    assert_eq!(metadata.poster_url(), None);
    assert_eq!(metadata.genre, NOT_AVAILABLE);
    assert_eq!(metadata.runtime, NOT_AVAILABLE);

    handle.abort();
}

#[tokio::test]
async fn test_fetch_unknown_title_is_absent() {
    let (client, handle) = build_client(Duration::from_secs(5)).await;

    let result = client.fetch("No Such Movie").await.unwrap();
    assert!(result.is_none());

    handle.abort();
}

#[tokio::test]
async fn test_fetch_server_error() {
    let (client, handle) = build_client(Duration::from_secs(5)).await;

    let err = client.fetch("Broken").await.unwrap_err();
    match err {
        MetadataError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected error: {other}"),
    }

    handle.abort();
}

#[tokio::test]
async fn test_fetch_non_json_body() {
    let (client, handle) = build_client(Duration::from_secs(5)).await;

    let err = client.fetch("Garbage").await.unwrap_err();
    assert!(matches!(err, MetadataError::Malformed(_)));

    handle.abort();
}

#[tokio::test]
async fn test_fetch_times_out() {
    let (client, handle) = build_client(Duration::from_millis(200)).await;

    let err = client.fetch("Slow").await.unwrap_err();
    match err {
        MetadataError::Http(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }

    handle.abort();
}

#[tokio::test]
async fn test_fetch_with_wrong_key() {
    let (url, handle) = start_mock_omdb().await;
    let client = OmdbClient::new(OmdbConfig::new("wrong-key").with_api_url(url)).unwrap();

    let err = client.fetch("The Matrix").await.unwrap_err();
    assert!(matches!(err, MetadataError::Status { status: 401, .. }));

    handle.abort();
}

#[tokio::test]
async fn test_fetch_unreachable_service() {
    // Bind and drop a listener to get a port nothing is listening on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = OmdbClient::new(
        OmdbConfig::new(API_KEY)
            .with_api_url(format!("http://{}/", addr))
            .with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let err = client.fetch("The Matrix").await.unwrap_err();
    assert!(matches!(err, MetadataError::Http(_)));
}

use asimovies::adapters::http::{AppState, build_router};
use asimovies::adapters::omdb::OmdbAdapter;
use asimovies::adapters::persistence::SqliteRepo;
use asimovies::adapters::storage::FsPosterStore;
use asimovies::usecases::{AccountService, CatalogService, LookupService};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const API_KEY: &str = "test-key";

async fn app(omdb_url: String) -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(
        OmdbAdapter::new(omdb_url, API_KEY.to_string(), Duration::from_secs(5)).unwrap(),
    );
    let repo = Arc::new(SqliteRepo::connect(dir.path()).await.unwrap());
    let media_dir = dir.path().join("media");
    let posters = Arc::new(FsPosterStore::new(&media_dir, "http://test/media"));

    let state = AppState::new(
        LookupService::new(metadata.clone()),
        CatalogService::new(metadata, repo.clone(), posters, "/default.jpg".into(), 4),
        AccountService::new(repo.clone(), repo),
        media_dir,
        1024 * 1024,
    );
    (dir, build_router(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_missing_title_is_bad_request() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200);
        })
        .await;
    let (_dir, app) = app(server.url("/")).await;

    let (status, body) = get(app.clone(), "/api/omdb").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parameter \"title\" is required.");

    let (status, _) = get(app, "/api/omdb?title=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(upstream.hits_async().await, 0);
}

#[tokio::test]
async fn test_found_movie_maps_four_fields() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/")
                .query_param("apikey", API_KEY)
                .query_param("t", "The Matrix")
                .query_param("type", "movie");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "Title": "The Matrix",
                    "Year": "1999",
                    "Rated": "R",
                    "Plot": "A hacker learns the truth about reality.",
                    "Poster": "https://img.example/matrix.jpg",
                    "imdbRating": "8.7",
                    "imdbID": "tt0133093",
                    "Response": "True"
                }));
        })
        .await;
    let (_dir, app) = app(server.url("/")).await;

    let (status, body) = get(app, "/api/omdb?title=The%20Matrix").await;
    assert_eq!(status, StatusCode::OK);
    upstream.assert_async().await;
    assert_eq!(
        body,
        json!({
            "title": "The Matrix",
            "rating": "8.7",
            "plot": "A hacker learns the truth about reality.",
            "poster": "https://img.example/matrix.jpg"
        })
    );
}

#[tokio::test]
async fn test_upstream_not_found_is_404_with_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("t", "Nonexistent Film");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "Response": "False", "Error": "Movie not found!" }));
        })
        .await;
    let (_dir, app) = app(server.url("/")).await;

    let (status, body) = get(app, "/api/omdb?title=Nonexistent%20Film").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Movie not found!" }));
}

#[tokio::test]
async fn test_transport_failure_is_500() {
    // Nothing listens on port 1.
    let (_dir, app) = app("http://127.0.0.1:1/".to_string()).await;

    let (status, body) = get(app, "/api/omdb?title=Alien").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to query OMDb." }));
}

#[tokio::test]
async fn test_bad_upstream_status_or_body_is_500() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("t", "Alien");
            then.status(503).body("maintenance");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("t", "Heat");
            then.status(200).body("<html>not json</html>");
        })
        .await;
    let (_dir, app) = app(server.url("/")).await;

    let (status, body) = get(app.clone(), "/api/omdb?title=Alien").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to query OMDb.");

    let (status, _) = get(app, "/api/omdb?title=Heat").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

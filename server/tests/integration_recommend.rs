use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

const MOVIES_CSV: &str = r#"title,cast,crew,genres,overview
Avatar,"[{""name"": ""Sam Worthington""}]","[{""name"": ""James Cameron""}]","[{""name"": ""Science Fiction""}]",Marines on the moon Pandora.
Aliens,"[{""name"": ""Sigourney Weaver""}]","[{""name"": ""James Cameron""}]","[{""name"": ""Science Fiction""}]",Space marines fight aliens.
Titanic,"[{""name"": ""Kate Winslet""}]","[{""name"": ""James Cameron""}]","[{""name"": ""Romance""}]",Love aboard a doomed ship.
The Notebook,"[{""name"": ""Ryan Gosling""}]","[{""name"": ""Nick Cassavetes""}]","[{""name"": ""Romance""}]",An epic love story.
"#;

fn build_tiny_app(dir: &std::path::Path) -> Router {
    let dataset = dir.join("movies.csv");
    fs::write(&dataset, MOVIES_CSV).unwrap();
    server::build_app(dir.join("index"), &dataset).unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn recommend_returns_ranked_titles() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());

    let (status, json) = call(app, "/recommend?movie=Avatar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "Avatar");
    let recs: Vec<&str> = json["recommendations"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0], "Aliens");
    assert!(!recs.contains(&"Avatar"));
}

#[tokio::test]
async fn top_n_limits_results() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());
    let (status, json) = call(app, "/recommend?movie=titanic&top_n=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["recommendations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_movie_is_bad_request() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());
    let (status, json) = call(app.clone(), "/recommend").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, _) = call(app, "/recommend?movie=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_top_n_is_bad_request() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());
    let (status, _) = call(app, "/recommend?movie=Avatar&top_n=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_top_n_is_json_bad_request() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());
    let (status, json) = call(app, "/recommend?movie=Avatar&top_n=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("invalid query string"));
}

#[tokio::test]
async fn panics_become_json_internal_errors() {
    let app: Router = Router::new()
        .route("/boom", get(|| async { panic!("corrupt row") as () }))
        .layer(CatchPanicLayer::custom(server::panic_response));
    let (status, json) = call(app, "/boom").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal server error");
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());
    let (status, json) = call(app, "/recommend?movie=Nonexistent%20Movie%20Title%20Xyz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[test]
fn startup_fails_without_dataset_or_cache() {
    let dir = tempdir().unwrap();
    assert!(server::build_app(dir.path().join("index"), dir.path().join("movies.csv")).is_err());
}

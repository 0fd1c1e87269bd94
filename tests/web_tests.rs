//! HTTP API tests, driving the router directly without a listener

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use interlinear::web::server::{create_router, AppState, MAX_BODY_SIZE};
use interlinear::Corpus;

fn app(dir: &tempfile::TempDir) -> Router {
    create_router(Arc::new(AppState {
        corpus: Corpus::open(dir.path()),
    }))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}

async fn post_link(app: Router, body: String) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/link")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (
        status,
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
    )
}

#[tokio::test]
async fn test_datasets_listing() {
    let dir = common::corpus_dir();
    let (status, headers, json) = get(app(&dir), "/api/datasets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");

    let datasets = json["datasets"].as_array().unwrap();
    assert_eq!(datasets.len(), 3);
    assert_eq!(datasets[0]["id"], "bible");
    assert_eq!(datasets[1]["locale"], "de");
    assert_eq!(datasets[1]["books"][2]["slug"], "susanna");
}

#[tokio::test]
async fn test_passage() {
    let dir = common::corpus_dir();
    let (status, _, json) = get(app(&dir), "/api/passage/bible-bibel-latin/john/3:16-18").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["book"], "john");
    assert_eq!(json["columns"].as_array().unwrap().len(), 2);
    assert_eq!(json["notices"][0]["dataset"], "latin");
    assert_eq!(json["notices"][0]["kind"], "chapter_missing");
    assert_eq!(json["target"]["from"], 16);
}

#[tokio::test]
async fn test_passage_redirects_to_canonical_slug() {
    let dir = common::corpus_dir();
    let (status, headers, _) = get(app(&dir), "/api/passage/bibel/1-mo/1:1").await;

    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(headers[header::LOCATION], "/api/passage/bibel/1-mose/1:1");
}

#[tokio::test]
async fn test_passage_errors() {
    let dir = common::corpus_dir();

    let (status, _, json) = get(app(&dir), "/api/passage/bible/john/3:18-16").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_range");
    assert!(json["details"].is_null());

    let (status, _, json) = get(app(&dir), "/api/passage/bible/exodus/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_type"], "not_found");

    let (status, _, _) = get(app(&dir), "/api/passage/vulgate/john/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, json) = get(app(&dir), "/api/passage/bible/john").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_path");

    // catalog lists Genesis but its content file is absent
    let (status, _, _) = get(app(&dir), "/api/passage/bible/genesis/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link() {
    let dir = common::corpus_dir();
    let body = serde_json::json!({"dataset": "bibel", "text": "Siehe Joh 3:16 und 1 Mo 1:1."});
    let (status, json) = post_link(app(&dir), body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["matches"].as_array().unwrap().len(), 2);
    assert_eq!(json["matches"][1]["path"], "/bibel/1-mose/1:1");
    assert!(json["html"]
        .as_str()
        .unwrap()
        .contains(r#"<a class="scripture-ref" href="/bibel/johannes/3:16">Siehe Joh 3:16</a>"#));
}

#[tokio::test]
async fn test_link_rejects_bad_requests() {
    let dir = common::corpus_dir();

    let body = serde_json::json!({"dataset": "klingon", "text": "John 3:16"});
    let (status, _) = post_link(app(&dir), body.to_string()).await;
    assert!(status.is_client_error());

    let body = serde_json::json!({"dataset": "bible", "text": "x".repeat(MAX_BODY_SIZE)});
    let (status, _) = post_link(app(&dir), body.to_string()).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_resolve() {
    let dir = common::corpus_dir();

    let (status, _, json) = get(app(&dir), "/api/resolve/bible/Jn").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["route"]["status"], "redirect");
    assert_eq!(json["route"]["slug"], "john");
    assert_eq!(json["canonical_key"], "john");

    let (status, _, json) = get(app(&dir), "/api/resolve/latin/romans").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["route"]["status"], "not_found");

    let (status, _, _) = get(app(&dir), "/api/resolve/vulgate/john").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

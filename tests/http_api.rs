//! HTTP round trips through the full router with the in-memory store.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{error_code, memory_app, send, send_raw, BODY_LIMIT};
use serde_json::json;

#[tokio::test]
async fn crud_round_trip() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({ "title": "Emma", "author": "Jane Austen", "attributes": { "year": 1815 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().expect("id");
    assert_eq!(body["data"]["title"], "Emma");
    assert_eq!(body["data"]["attributes"]["year"], 1815);

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["author"], "Jane Austen");
    assert!(body.get("meta").is_none());

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/books/{id}"),
        Some(json!({ "id": id, "title": "Emma (Annotated)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Emma (Annotated)");
    assert!(body["data"].get("author").is_none());

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");
}

#[tokio::test]
async fn list_and_title_lookup() {
    let app = memory_app();
    for title in ["The Hobbit", "Dune", "The Hobbit"] {
        let (status, _) = send(&app, Method::POST, "/api/v1/books", Some(json!({ "title": title }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 3);
    assert_eq!(body["data"][1]["title"], "Dune");

    let (_, body) = send(&app, Method::GET, "/api/v1/books?title=The%20Hobbit", None).await;
    assert_eq!(body["meta"]["count"], 2);
    assert_eq!(body["data"][0]["id"], 1);
    assert_eq!(body["data"][1]["id"], 3);

    let (status, body) = send(&app, Method::GET, "/api/v1/books/title/Dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);

    let (status, body) = send(&app, Method::GET, "/api/v1/books/title/Nothing", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn update_errors() {
    let app = memory_app();
    send(&app, Method::POST, "/api/v1/books", Some(json!({ "title": "One" }))).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/books/1",
        Some(json!({ "id": 7, "title": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "id_mismatch");

    let (status, body) = send(&app, Method::PUT, "/api/v1/books/99", Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");
    assert!(body["error"]["message"].as_str().unwrap().contains("99"));

    let (status, body) = send(&app, Method::PUT, "/api/v1/books/1", Some(json!({ "title": "" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "validation_error");
}

#[tokio::test]
async fn delete_of_missing_book_is_not_found() {
    let app = memory_app();
    let (status, body) = send(&app, Method::DELETE, "/api/v1/books/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = memory_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "bad_request");

    let (status, _) = send(&app, Method::POST, "/api/v1/books", Some(json!(["not", "an", "object"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/v1/books", Some(json!({ "id": 4, "title": "T" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "bad_request");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = memory_app();
    let title = "x".repeat(BODY_LIMIT * 2);
    let (status, _) = send(&app, Method::POST, "/api/v1/books", Some(json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn service_routes_report_status() {
    let app = memory_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "ok");

    let (_, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(body["name"], "book-api");
    assert!(body["version"].is_string());

    let (status, body) = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["components"]["schemas"]["Book"].is_object());
}

//! Shared test harness for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use book_api::{app, AppState, Book, BookService, MemoryBookStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const BODY_LIMIT: usize = 16 * 1024;

pub fn memory_service() -> BookService {
    BookService::new(Arc::new(MemoryBookStore::new()))
}

pub fn memory_app() -> Router {
    app(AppState::new(Arc::new(MemoryBookStore::new())), BODY_LIMIT)
}

/// Service preloaded with `books` in order; returns the saved records.
pub async fn seeded_service(books: &[Book]) -> (BookService, Vec<Book>) {
    let svc = memory_service();
    let mut saved = Vec::new();
    for b in books {
        saved.push(svc.create_book(b.clone()).await.unwrap());
    }
    (svc, saved)
}

/// Send one request through the router. Empty bodies decode as `Value::Null`.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_raw(app, request).await
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or("")
}

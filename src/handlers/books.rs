//! Book CRUD handlers: list, create, read, update, delete, find by title.

use crate::error::AppError;
use crate::model::{Book, BookId, BookListQuery};
use crate::response::{created, listed, ok};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<BookId, AppError> {
    id_str
        .trim()
        .parse::<BookId>()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

/// Body must be a JSON object shaped like [`Book`].
fn parse_body(body: Result<Json<Value>, JsonRejection>) -> Result<Book, AppError> {
    let Json(value) = body.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::BadRequest(e.body_text())
        }
    })?;
    if !value.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("invalid book: {}", e)))
}

/// GET /books, or GET /books?title=... for an exact title match.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BookListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let books = match query.title {
        Some(title) => state.books.find_by_title(&title).await?,
        None => state.books.list_books().await?,
    };
    Ok(listed(books))
}

/// GET /books/title/:title
pub async fn find_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let books = state.books.find_by_title(&title).await?;
    Ok(listed(books))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let book = parse_body(body)?;
    let book = state.books.create_book(book).await?;
    Ok(created(book))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let book = state.books.get_book(id).await?;
    Ok(ok(book))
}

/// PUT /books/:id: full replacement. A body id must match the path id.
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let book = parse_body(body)?;
    let updated = state.books.update_book(id, book).await?;
    Ok(ok(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.books.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

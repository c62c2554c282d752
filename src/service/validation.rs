//! Request validation for book payloads.

use crate::error::AppError;
use crate::model::Book;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Upper bound, in characters, for `title` and `author`.
pub const MAX_TEXT_LEN: usize = 255;

/// Field names that attribute keys may not shadow.
const RESERVED_KEYS: &[&str] = &["id", "title", "author", "isbn", "attributes"];

fn isbn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").expect("static regex"))
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full book record. All required fields must be present.
    pub fn validate(book: &Book) -> Result<(), AppError> {
        if book.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        validate_len("title", &book.title)?;
        if let Some(author) = &book.author {
            validate_len("author", author)?;
        }
        if let Some(isbn) = &book.isbn {
            validate_isbn(isbn)?;
        }
        for (key, v) in &book.attributes {
            validate_attribute(key, v)?;
        }
        Ok(())
    }
}

fn validate_len(col: &str, s: &str) -> Result<(), AppError> {
    if s.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            col, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

/// Accepts ISBN-10 or ISBN-13; hyphens and spaces are ignored.
fn validate_isbn(isbn: &str) -> Result<(), AppError> {
    let compact: String = isbn
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    if !isbn_re().is_match(&compact) {
        return Err(AppError::Validation(
            "isbn must be 10 or 13 digits (ISBN-10 may end in X)".into(),
        ));
    }
    Ok(())
}

fn validate_attribute(key: &str, v: &Value) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::Validation("attribute names must not be empty".into()));
    }
    if RESERVED_KEYS.contains(&key) {
        return Err(AppError::Validation(format!(
            "attribute '{}' shadows a book field",
            key
        )));
    }
    if matches!(v, Value::Array(_) | Value::Object(_)) {
        return Err(AppError::Validation(format!(
            "attribute '{}' must be a string, number, boolean or null",
            key
        )));
    }
    Ok(())
}

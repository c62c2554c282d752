//! Typed errors and HTTP mapping.

use crate::model::BookId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Boxed underlying error carried as the cause of a domain error.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("invalid identifier for {var}: '{value}'")]
    InvalidIdentifier { var: &'static str, value: String },
}

/// Domain errors raised by the book service. Both kinds carry an optional
/// message and an optional underlying cause.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("book not found{}", suffix(.message))]
    NotFound {
        message: Option<String>,
        #[source]
        cause: Option<Cause>,
    },
    #[error("book id mismatch{}", suffix(.message))]
    IdMismatch {
        message: Option<String>,
        #[source]
        cause: Option<Cause>,
    },
}

fn suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

impl BookError {
    pub fn not_found() -> Self {
        BookError::NotFound {
            message: None,
            cause: None,
        }
    }

    pub fn id_mismatch() -> Self {
        BookError::IdMismatch {
            message: None,
            cause: None,
        }
    }

    /// Not-found error for a specific id.
    pub fn not_found_id(id: BookId) -> Self {
        Self::not_found().with_message(format!("no book with id {}", id))
    }

    /// Mismatch between the targeted id and the id carried in the payload.
    pub fn mismatch_ids(target: BookId, payload: BookId) -> Self {
        Self::id_mismatch().with_message(format!(
            "path id {} does not match body id {}",
            target, payload
        ))
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        match &mut self {
            BookError::NotFound { message, .. } | BookError::IdMismatch { message, .. } => {
                *message = Some(msg.into());
            }
        }
        self
    }

    pub fn with_cause<E>(mut self, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match &mut self {
            BookError::NotFound { cause, .. } | BookError::IdMismatch { cause, .. } => {
                *cause = Some(Box::new(err));
            }
        }
        self
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            BookError::NotFound { message, .. } | BookError::IdMismatch { message, .. } => {
                message.as_deref()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BookError::NotFound { .. })
    }

    pub fn is_id_mismatch(&self) -> bool {
        matches!(self, BookError::IdMismatch { .. })
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Book(#[from] BookError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Status and machine-readable code used in error responses.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Book(BookError::NotFound { .. }) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Book(BookError::IdMismatch { .. }) => (StatusCode::BAD_REQUEST, "id_mismatch"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        } else {
            tracing::warn!(error = %self, code, "request rejected");
        }
        let details = match &self {
            AppError::Book(err) => std::error::Error::source(err)
                .map(|cause| serde_json::json!({ "cause": cause.to_string() })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

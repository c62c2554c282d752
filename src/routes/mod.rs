//! Router assembly.

pub mod books;
pub mod common;

pub use books::book_routes;
pub use common::service_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: service routes at the root, book routes under `/api/v1`.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(service_routes(state.clone()))
        .nest("/api/v1", book_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}

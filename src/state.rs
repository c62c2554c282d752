//! Shared application state for all routes.

use crate::service::BookService;
use crate::store::BookStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        AppState {
            books: BookService::new(store),
        }
    }
}

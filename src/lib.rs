//! Book API: CRUD REST backend for book records over PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, StoreBackend};
pub use error::{AppError, BookError, ConfigError};
pub use migration::apply_migrations;
pub use model::{Book, BookId};
pub use response::{created, listed, ok};
pub use routes::{app, book_routes, service_routes};
pub use service::BookService;
pub use state::AppState;
pub use store::{ensure_database_exists, BookStore, MemoryBookStore, PgBookStore};

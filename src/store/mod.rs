//! Book persistence contract and its implementations.
//!
//! Absence is never an error at this layer: lookups return `Option` or an
//! empty `Vec`, and deleting a missing id is a no-op. Turning absence into
//! [`BookError::NotFound`](crate::error::BookError) is the service's job.

mod memory;
mod postgres;

pub use memory::MemoryBookStore;
pub use postgres::{ensure_database_exists, PgBookStore};

use crate::error::AppError;
use crate::model::{Book, BookId};
use async_trait::async_trait;

pub type StoreResult<T> = Result<T, AppError>;

/// Repository interface for book CRUD plus lookup by title.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert when `book.id` is `None`, otherwise replace the row with that id.
    /// A given id that is not stored yet is inserted with that id (upsert).
    async fn save(&self, book: Book) -> StoreResult<Book>;

    /// Replace the stored book at `id` in one step. `None` when `id` is not
    /// stored; never inserts.
    async fn update(&self, id: BookId, book: Book) -> StoreResult<Option<Book>>;

    async fn find_by_id(&self, id: BookId) -> StoreResult<Option<Book>>;

    /// All books in insertion (ascending id) order.
    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    /// Exact, case-sensitive title match in ascending id order.
    async fn find_by_title(&self, title: &str) -> StoreResult<Vec<Book>>;

    async fn delete_by_id(&self, id: BookId) -> StoreResult<()>;

    async fn exists_by_id(&self, id: BookId) -> StoreResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn count(&self) -> StoreResult<u64>;

    /// Backend round trip used by the `/ready` route.
    async fn ping(&self) -> StoreResult<()>;
}

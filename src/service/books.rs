//! Book orchestration: maps requests onto store calls and raises domain errors.

use crate::error::{AppError, BookError};
use crate::model::{Book, BookId};
use crate::service::RequestValidator;
use crate::store::BookStore;
use std::sync::Arc;

/// Cheap to clone; all clones share one store.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        BookService { store }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    /// Create a new book. The store assigns the id; a payload id is rejected.
    pub async fn create_book(&self, book: Book) -> Result<Book, AppError> {
        if let Some(id) = book.id {
            return Err(AppError::BadRequest(format!(
                "id {} must not be set on create",
                id
            )));
        }
        RequestValidator::validate(&book)?;
        let saved = self.store.save(book).await?;
        tracing::info!(id = ?saved.id, title = %saved.title, "book created");
        Ok(saved)
    }

    pub async fn get_book(&self, id: BookId) -> Result<Book, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookError::not_found_id(id).into())
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        self.store.find_all().await
    }

    /// Exact title match; an empty result is not an error.
    pub async fn find_by_title(&self, title: &str) -> Result<Vec<Book>, AppError> {
        self.store.find_by_title(title).await
    }

    /// Replace the book at `id` with `book`.
    ///
    /// Fails with [`BookError::IdMismatch`] when `book.id` is set and differs
    /// from `id` (checked before touching the store), and with
    /// [`BookError::NotFound`] when `id` is not stored at the time of the write.
    pub async fn update_book(&self, id: BookId, book: Book) -> Result<Book, AppError> {
        if let Some(body_id) = book.id {
            if body_id != id {
                return Err(BookError::mismatch_ids(id, body_id).into());
            }
        }
        RequestValidator::validate(&book)?;
        let updated = self
            .store
            .update(id, book)
            .await?
            .ok_or_else(|| BookError::not_found_id(id))?;
        tracing::info!(id, "book updated");
        Ok(updated)
    }

    /// Delete the book at `id`; fails with [`BookError::NotFound`] when it is not stored.
    pub async fn delete_book(&self, id: BookId) -> Result<(), AppError> {
        if !self.store.exists_by_id(id).await? {
            return Err(BookError::not_found_id(id).into());
        }
        self.store.delete_by_id(id).await?;
        tracing::info!(id, "book deleted");
        Ok(())
    }
}

//! In-process store backed by an ordered map.

use crate::error::AppError;
use crate::model::{Book, BookId};
use crate::store::{BookStore, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Inner {
    rows: BTreeMap<BookId, Book>,
    /// `None` once the id space is used up.
    next_id: Option<BookId>,
}

/// [`BookStore`] kept in memory. Ids start at 1 and follow the same
/// generator rules as the PostgreSQL identity column.
#[derive(Debug)]
pub struct MemoryBookStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        MemoryBookStore {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: Some(1),
            }),
        }
    }
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("book store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("book store lock poisoned".into()))
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn save(&self, mut book: Book) -> StoreResult<Book> {
        let mut inner = self.write()?;
        let (id, next_id) = match book.id {
            Some(id) => {
                let next = match (inner.next_id, id.checked_add(1)) {
                    (Some(current), Some(after)) => Some(current.max(after)),
                    _ => None,
                };
                (id, next)
            }
            None => {
                let id = inner
                    .next_id
                    .ok_or_else(|| AppError::Internal("book id space exhausted".into()))?;
                (id, id.checked_add(1))
            }
        };
        inner.next_id = next_id;
        book.id = Some(id);
        inner.rows.insert(id, book.clone());
        tracing::debug!(id, "saved book (memory)");
        Ok(book)
    }

    async fn update(&self, id: BookId, mut book: Book) -> StoreResult<Option<Book>> {
        let mut inner = self.write()?;
        let Some(slot) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        book.id = Some(id);
        *slot = book.clone();
        tracing::debug!(id, "updated book (memory)");
        Ok(Some(book))
    }

    async fn find_by_id(&self, id: BookId) -> StoreResult<Option<Book>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Vec<Book>> {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|b| b.title == title)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: BookId) -> StoreResult<()> {
        self.write()?.rows.remove(&id);
        Ok(())
    }

    async fn exists_by_id(&self, id: BookId) -> StoreResult<bool> {
        Ok(self.read()?.rows.contains_key(&id))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.read()?.rows.len() as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}

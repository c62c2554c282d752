//! Book entity as exposed over the API and persisted in the `books` table.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Primary key type of the `books` table (BIGINT identity).
pub type BookId = i64;

/// A book record. `id` is `None` until the store assigns one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub id: Option<BookId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Extra scalar fields (string, number, bool or null) keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub attributes: BTreeMap<String, Value>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Book {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// True once the record has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Query string for `GET /books`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BookListQuery {
    pub title: Option<String>,
}

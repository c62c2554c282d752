//! PostgreSQL-backed book store and database bootstrap.

use crate::error::{AppError, ConfigError};
use crate::model::{Book, BookId};
use crate::sql::BookSql;
use crate::store::{BookStore, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool, Row};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Book store over a shared connection pool. Tables must exist
/// (see [`apply_migrations`](crate::migration::apply_migrations)).
#[derive(Clone, Debug)]
pub struct PgBookStore {
    pool: PgPool,
    sql: BookSql,
}

impl PgBookStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgBookStore {
            pool,
            sql: BookSql::new(schema),
        }
    }

    async fn insert(&self, book: &Book) -> StoreResult<Book> {
        let sql = self.sql.insert();
        tracing::debug!(sql = %sql, title = %book.title, "query");
        let row = sqlx::query(&sql)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .bind(Json(&book.attributes))
            .fetch_one(&self.pool)
            .await?;
        row_to_book(&row)
    }

    /// Insert-or-replace by explicit id in one transaction, then keep the identity sequence ahead of it.
    async fn upsert(&self, id: BookId, book: &Book) -> StoreResult<Book> {
        let sql = self.sql.upsert();
        tracing::debug!(sql = %sql, id, title = %book.title, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .bind(Json(&book.attributes))
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query(&self.sql.sync_identity())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        row_to_book(&row)
    }

    async fn query_many(&self, sql: &str, title: Option<&str>) -> StoreResult<Vec<Book>> {
        tracing::debug!(sql = %sql, title = ?title, "query");
        let mut query = sqlx::query(sql);
        if let Some(t) = title {
            query = query.bind(t);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_book).collect()
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn save(&self, book: Book) -> StoreResult<Book> {
        match book.id {
            None => self.insert(&book).await,
            Some(id) => self.upsert(id, &book).await,
        }
    }

    async fn update(&self, id: BookId, book: Book) -> StoreResult<Option<Book>> {
        let sql = self.sql.update();
        tracing::debug!(sql = %sql, id, title = %book.title, "query");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .bind(Json(&book.attributes))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_book).transpose()
    }

    async fn find_by_id(&self, id: BookId) -> StoreResult<Option<Book>> {
        let sql = self.sql.select_by_id();
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_book).transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        self.query_many(&self.sql.select_all(), None).await
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Vec<Book>> {
        self.query_many(&self.sql.select_by_title(), Some(title)).await
    }

    async fn delete_by_id(&self, id: BookId) -> StoreResult<()> {
        let sql = self.sql.delete_by_id();
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            tracing::debug!(id, "delete matched no row");
        }
        Ok(())
    }

    async fn exists_by_id(&self, id: BookId) -> StoreResult<bool> {
        let sql = self.sql.exists_by_id();
        tracing::debug!(sql = %sql, id, "query");
        let (exists,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(exists)
    }

    async fn count(&self) -> StoreResult<u64> {
        let (n,): (i64,) = sqlx::query_as(&self.sql.count()).fetch_one(&self.pool).await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn row_to_book(row: &PgRow) -> StoreResult<Book> {
    let Json(attributes): Json<BTreeMap<String, Value>> = row.try_get("attributes")?;
    Ok(Book {
        id: Some(row.try_get("id")?),
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        isbn: row.try_get("isbn")?,
        attributes,
    })
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| invalid_url(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `postgres://host/db?opts` into (`postgres://host/postgres`, `db`).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| invalid_url("no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn invalid_url(reason: String) -> ConfigError {
    ConfigError::Invalid {
        var: "DATABASE_URL",
        reason,
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

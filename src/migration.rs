//! Apply book schema DDL: schema, `books` table, title index.
//! Every statement is idempotent so this runs on each start.

use crate::error::AppError;
use crate::sql::{qualified_table, quoted, BOOKS_TABLE};
use sqlx::PgPool;

/// DDL statements in dependency order for `schema`.
pub fn book_ddl(schema: &str) -> Vec<String> {
    let table = qualified_table(schema, BOOKS_TABLE);
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
  "id" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
  "title" TEXT NOT NULL,
  "author" TEXT,
  "isbn" TEXT,
  "attributes" JSONB NOT NULL DEFAULT '{{}}'::jsonb,
  "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#,
            table
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} USING btree ({})",
            quoted("books_title_idx"),
            table,
            quoted("title")
        ),
    ]
}

/// Create the schema and `books` table if missing.
pub async fn apply_migrations(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    for sql in book_ddl(schema) {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(schema, "book schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_is_idempotent_and_ordered() {
        let ddl = book_ddl("library");
        assert_eq!(ddl.len(), 3);
        assert_eq!(ddl[0], "CREATE SCHEMA IF NOT EXISTS \"library\"");
        assert!(ddl[1].starts_with("CREATE TABLE IF NOT EXISTS \"library\".\"books\""));
        assert!(ddl[1].contains("GENERATED BY DEFAULT AS IDENTITY"));
        assert!(ddl[1].contains("DEFAULT '{}'::jsonb"));
        assert!(ddl[2].starts_with("CREATE INDEX IF NOT EXISTS"));
    }
}

//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the `books` table.

/// Table name inside the configured schema.
pub const BOOKS_TABLE: &str = "books";

/// Columns returned by every SELECT and RETURNING clause, in row-mapping order.
const BOOK_COLUMNS: &str = "\"id\", \"title\", \"author\", \"isbn\", \"attributes\"";

/// Quote identifier for PostgreSQL (safe: only from config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// Statement set bound to one schema. Built once at store construction.
#[derive(Clone, Debug)]
pub struct BookSql {
    table: String,
}

impl BookSql {
    pub fn new(schema: &str) -> Self {
        BookSql {
            table: qualified_table(schema, BOOKS_TABLE),
        }
    }

    /// SELECT by primary key. Params: $1 id.
    pub fn select_by_id(&self) -> String {
        format!("SELECT {} FROM {} WHERE \"id\" = $1", BOOK_COLUMNS, self.table)
    }

    /// SELECT all rows in insertion order.
    pub fn select_all(&self) -> String {
        format!("SELECT {} FROM {} ORDER BY \"id\"", BOOK_COLUMNS, self.table)
    }

    /// SELECT by exact title. Params: $1 title.
    pub fn select_by_title(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE \"title\" = $1 ORDER BY \"id\"",
            BOOK_COLUMNS, self.table
        )
    }

    /// INSERT with a generated id. Params: $1 title, $2 author, $3 isbn, $4 attributes.
    pub fn insert(&self) -> String {
        format!(
            "INSERT INTO {} (\"title\", \"author\", \"isbn\", \"attributes\") VALUES ($1, $2, $3, $4) RETURNING {}",
            self.table, BOOK_COLUMNS
        )
    }

    /// INSERT with an explicit id, replacing the row when the id exists.
    /// Params: $1 id, $2 title, $3 author, $4 isbn, $5 attributes.
    pub fn upsert(&self) -> String {
        format!(
            "INSERT INTO {} (\"id\", \"title\", \"author\", \"isbn\", \"attributes\") VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (\"id\") DO UPDATE SET \
             \"title\" = EXCLUDED.\"title\", \
             \"author\" = EXCLUDED.\"author\", \
             \"isbn\" = EXCLUDED.\"isbn\", \
             \"attributes\" = EXCLUDED.\"attributes\", \
             \"updated_at\" = NOW() \
             RETURNING {}",
            self.table, BOOK_COLUMNS
        )
    }

    /// UPDATE an existing row only; matches nothing when the id is gone.
    /// Params: $1 id, $2 title, $3 author, $4 isbn, $5 attributes.
    pub fn update(&self) -> String {
        format!(
            "UPDATE {} SET \"title\" = $2, \"author\" = $3, \"isbn\" = $4, \"attributes\" = $5, \
             \"updated_at\" = NOW() WHERE \"id\" = $1 RETURNING {}",
            self.table, BOOK_COLUMNS
        )
    }

    /// Move the identity sequence past the highest stored id so generated ids never collide with explicit ones.
    /// Never moves the sequence backwards.
    pub fn sync_identity(&self) -> String {
        let seq = format!("pg_get_serial_sequence('{}', 'id')", self.table.replace('\'', "''"));
        format!(
            "SELECT setval({seq}, GREATEST((SELECT COALESCE(MAX(\"id\"), 0) FROM {table}), nextval({seq}) - 1, 1))",
            seq = seq,
            table = self.table
        )
    }

    /// DELETE by primary key. Params: $1 id.
    pub fn delete_by_id(&self) -> String {
        format!("DELETE FROM {} WHERE \"id\" = $1", self.table)
    }

    /// Params: $1 id.
    pub fn exists_by_id(&self) -> String {
        format!("SELECT EXISTS(SELECT 1 FROM {} WHERE \"id\" = $1)", self.table)
    }

    pub fn count(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.table)
    }
}

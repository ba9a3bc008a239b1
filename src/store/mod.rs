//! Document Storage
//! Mission: One shared SQLite connection backing actors, menu items and orders
//!
//! - `users`: actor records, credential digest and reset-token fields
//! - `menu_items`: items owned by a restaurant actor
//! - `orders`: customer/restaurant references plus the item id list as JSON

pub mod menu_items;
pub mod orders;

pub use menu_items::MenuItemStore;
pub use orders::OrderStore;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{types::Type, Connection, Row};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const SCHEMA_SQL: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    user_name TEXT NOT NULL,
    user_email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    is_restaurant INTEGER NOT NULL DEFAULT 0,
    user_gender TEXT,
    user_age INTEGER,
    user_city TEXT,
    user_country TEXT,
    user_profile_image_url TEXT,
    type_of_food TEXT NOT NULL DEFAULT '[]',
    reset_password_token TEXT,
    reset_password_expire TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_restaurant ON users(is_restaurant);
CREATE INDEX IF NOT EXISTS idx_users_reset ON users(reset_password_token);

CREATE TABLE IF NOT EXISTS menu_items (
    id TEXT PRIMARY KEY,
    choose_item_type TEXT NOT NULL,
    item_image_url TEXT NOT NULL,
    item_ingredients TEXT NOT NULL,
    item_price REAL NOT NULL,
    item_title TEXT NOT NULL,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_menu_items_user ON menu_items(user_id);

CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    status TEXT NOT NULL DEFAULT 'PENDING',
    total_price REAL NOT NULL,
    restaurant_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    item_list TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_restaurant ON orders(restaurant_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id, created_at DESC);
"#;

/// Shared handle to the backing store.
///
/// Cloning is cheap; every clone talks to the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .with_context(|| format!("Failed to open database at {}", path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply database schema")?;

        info!("📦 Document store ready at {}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock();
        f(&conn)
    }
}

/// Read a UUID stored as TEXT in column `idx`
pub(crate) fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read an RFC 3339 timestamp stored as TEXT in column `idx`
pub(crate) fn time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_time(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc))
}

/// Read a JSON-encoded string list stored as TEXT in column `idx`
pub(crate) fn list_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// True when `err` is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_in_memory_creates_tables() {
        let db = Database::open(":memory:").unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                     AND name IN ('users', 'menu_items', 'orders')",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_reopen_file_keeps_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("food.db");
        let path = path.to_str().unwrap();

        Database::open(path).unwrap();
        // Second open must not fail on existing tables
        Database::open(path).unwrap();
    }

    #[test]
    fn test_unique_violation_detected() {
        let db = Database::open(":memory:").unwrap();
        let insert = |db: &Database| {
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO users (id, user_name, user_email, password_hash, created_at, updated_at)
                     VALUES (?1, 'a', 'a@x.io', 'h', 'now', 'now')",
                    [uuid::Uuid::new_v4().to_string()],
                )?;
                Ok(())
            })
        };

        insert(&db).unwrap();
        let err = insert(&db).unwrap_err();
        assert!(is_unique_violation(&err));
        assert!(!is_unique_violation(&anyhow::anyhow!("other")));
    }
}

//! SQLite-backed record store
//!
//! Local implementation of the [`RecordStore`] gateway over a single
//! `records` table of JSON documents. The query surface is intentionally
//! held to the gateway contract: one equality predicate, no ordering.

use crate::error::{Error, Result};
use crate::store::{schema, Predicate, RecordStore};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Mutex;

/// Record store handle (single connection behind a mutex)
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrency with the companion UI process
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this store
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        schema::run_migrations(&conn)
    }

    fn json_path(field: &str) -> String {
        format!("$.{}", field)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn fetch_all(
        &self,
        collection: &str,
        predicate: &Predicate,
        limit: Option<usize>,
    ) -> Result<Vec<serde_json::Value>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = String::from(
            "SELECT data FROM records WHERE collection = ?1 AND json_extract(data, ?2) = ?3",
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![collection, Self::json_path(&predicate.field), predicate.equals],
            |row| row.get::<_, String>(0),
        )?;

        let mut documents = Vec::new();
        for row in rows {
            let raw = row?;
            documents.push(
                serde_json::from_str(&raw)
                    .map_err(|e| Error::schema(collection, format!("stored document: {}", e)))?,
            );
        }
        Ok(documents)
    }

    async fn upsert(&self, collection: &str, key: &str, record: serde_json::Value) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO records (collection, key, data, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(collection, key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
            params![collection, key, record.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    async fn upsert_when(
        &self,
        collection: &str,
        key: &str,
        record: serde_json::Value,
        guard_field: &str,
        expected: Option<&str>,
    ) -> Result<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let current: Option<Option<String>> = tx
            .query_row(
                "SELECT json_extract(data, ?1) FROM records WHERE collection = ?2 AND key = ?3",
                params![Self::json_path(guard_field), collection, key],
                |row| row.get(0),
            )
            .optional()?;

        // Missing document and null field both count as "no value".
        let matches = match (current.flatten(), expected) {
            (None, None) => true,
            (Some(stored), Some(want)) => stored == want,
            _ => false,
        };

        if !matches {
            return Ok(false);
        }

        tx.execute(
            r#"
            INSERT INTO records (collection, key, data, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(collection, key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
            params![collection, key, record.to_string(), Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        Ok(true)
    }
}

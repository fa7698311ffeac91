use crate::domain::ports::CacheBackend;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::require_sql_identifier;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

pub const DEFAULT_TABLE: &str = "geispoint_cache";

/// Row-per-key cache in an SQLite table `(key, value, updated_at)`.
pub struct TableCache {
    conn: Mutex<Connection>,
    table: String,
}

impl TableCache {
    /// Opens `dsn` (a file path or `:memory:`, optionally prefixed with
    /// `sqlite:`) and creates the table if it does not exist yet.
    pub fn open(dsn: &str, table: &str) -> Result<Self> {
        require_sql_identifier("cache_options.table", table)?;

        let target = dsn.strip_prefix("sqlite:").unwrap_or(dsn);
        let target = target.strip_prefix("//").unwrap_or(target);
        let conn = if target == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(target)?
        };

        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (
                    \"key\" TEXT PRIMARY KEY,
                    \"value\" TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                table
            ),
            [],
        )?;

        tracing::debug!("Opened table cache {} in {}", table, target);

        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Last write time of `key`, RFC 3339.
    pub async fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let updated = conn
            .query_row(
                &format!("SELECT updated_at FROM \"{}\" WHERE \"key\" = ?1", self.table),
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated)
    }
}

#[async_trait]
impl CacheBackend for TableCache {
    async fn exists(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let found: Option<i64> = conn
            .query_row(
                &format!("SELECT 1 FROM \"{}\" WHERE \"key\" = ?1", self.table),
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    async fn get(&self, key: &str) -> Result<String> {
        let conn = self.conn.lock().await;
        let value: Option<String> = conn
            .query_row(
                &format!("SELECT \"value\" FROM \"{}\" WHERE \"key\" = ?1", self.table),
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        value.ok_or_else(|| LookupError::CacheKeyNotFound {
            key: key.to_string(),
        })
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            &format!(
                "INSERT INTO \"{}\" (\"key\", \"value\", updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(\"key\") DO UPDATE SET \"value\" = excluded.\"value\", updated_at = excluded.updated_at",
                self.table
            ),
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

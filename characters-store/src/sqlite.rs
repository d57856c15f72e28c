//! SQLite-backed document table
//!
//! Each item is kept as a JSON text blob keyed by its id, which gives the
//! same whole-item put/get/delete semantics as a remote document table.

use crate::error::{StorageError, StorageResult};
use crate::table::DocumentTable;
use async_trait::async_trait;
use characters_core::Character;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};
use std::str::FromStr;
use tracing::{debug, info};

pub struct SqliteTable {
    pool: SqlitePool,
    table: String,
}

impl SqliteTable {
    /// Connect to `database_url` and make sure the table exists
    pub async fn connect(database_url: &str, table: &str) -> StorageResult<Self> {
        info!("🔗 Connecting to SQLite database: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::Config(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    info!("📁 Creating parent directory: {}", parent.display());
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StorageError::Config(format!("Failed to create directory: {}", e))
                    })?;
                }
            }
        }

        // An in-memory database lives and dies with its connection, so the
        // pool must hold exactly one and never recycle it.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StorageError::backend("connect", table, e.to_string()))?;

        Self::with_pool(pool, table).await
    }

    /// Use an existing pool, creating the table if needed
    pub async fn with_pool(pool: SqlitePool, table: &str) -> StorageResult<Self> {
        validate_table_name(table)?;
        let this = Self {
            pool,
            table: table.to_string(),
        };
        this.create_table().await?;
        Ok(this)
    }

    async fn create_table(&self) -> StorageResult<()> {
        debug!("📋 Creating table {}", self.table);
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, body TEXT NOT NULL)",
            self.quoted()
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| self.error("create_table", e))?;
        Ok(())
    }

    fn quoted(&self) -> String {
        format!("\"{}\"", self.table)
    }

    fn error(&self, operation: &'static str, e: sqlx::Error) -> StorageError {
        StorageError::backend(operation, &self.table, e.to_string())
    }
}

/// Table names are spliced into SQL, so only a conservative character set is allowed
fn validate_table_name(table: &str) -> StorageResult<()> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::Config(format!(
            "Invalid table name '{}': use letters, digits, '_', '-' or '.'",
            table
        )))
    }
}

fn decode_body(body: &str) -> StorageResult<Character> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl DocumentTable for SqliteTable {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn scan(&self) -> StorageResult<Vec<Character>> {
        let sql = format!("SELECT body FROM {}", self.quoted());
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.error("scan", e))?;

        rows.iter()
            .map(|row| {
                let body: String = row.try_get("body").map_err(|e| self.error("scan", e))?;
                decode_body(&body)
            })
            .collect()
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Character>> {
        let sql = format!("SELECT body FROM {} WHERE id = ?", self.quoted());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.error("get", e))?;

        match row {
            Some(row) => {
                let body: String = row.try_get("body").map_err(|e| self.error("get", e))?;
                Ok(Some(decode_body(&body)?))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, item: Character) -> StorageResult<()> {
        let id = item
            .id()
            .ok_or_else(|| StorageError::malformed("item has no string id"))?
            .to_string();
        let body = serde_json::to_string(&item)?;

        let sql = format!(
            "INSERT OR REPLACE INTO {} (id, body) VALUES (?, ?)",
            self.quoted()
        );
        sqlx::query(&sql)
            .bind(&id)
            .bind(&body)
            .execute(&self.pool)
            .await
            .map_err(|e| self.error("put", e))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.quoted());
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| self.error("delete", e))?;
        Ok(())
    }
}

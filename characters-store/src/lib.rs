//! Characters Store - document table access for character records
//!
//! [`DocumentTable`] abstracts the remote table (scan/get/put/delete by id);
//! [`CharacterRepository`] layers the record semantics on top: id generation
//! on create, id forcing on replace, idempotent delete.

pub mod dynamodb;
pub mod error;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod table;

pub use dynamodb::DynamoTable;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryTable;
pub use repository::CharacterRepository;
pub use sqlite::SqliteTable;
pub use table::DocumentTable;

use characters_core::{StorageBackend, StorageConfig};
use std::sync::Arc;
use tracing::info;

/// Open the document table selected by `config.backend`
pub async fn open_table(config: &StorageConfig) -> StorageResult<Arc<dyn DocumentTable>> {
    let table: Arc<dyn DocumentTable> = match config.backend {
        StorageBackend::DynamoDb => Arc::new(DynamoTable::connect(config).await?),
        StorageBackend::Sqlite => {
            Arc::new(SqliteTable::connect(&config.database_url, &config.table_name).await?)
        }
        StorageBackend::Memory => Arc::new(MemoryTable::new()),
    };

    info!("✅ Storage backend ready: {}", table.name());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_table() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        let table = open_table(&config).await.unwrap();
        assert_eq!(table.name(), "memory");
    }

    #[tokio::test]
    async fn test_open_sqlite_table() {
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            database_url: "sqlite::memory:".to_string(),
            ..StorageConfig::default()
        };
        let table = open_table(&config).await.unwrap();
        assert_eq!(table.name(), "sqlite");
        assert!(table.scan().await.unwrap().is_empty());
    }
}

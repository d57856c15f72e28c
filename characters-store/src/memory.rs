//! In-process document table, for tests and local development

use crate::error::{StorageError, StorageResult};
use crate::table::DocumentTable;
use async_trait::async_trait;
use characters_core::Character;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryTable {
    items: RwLock<HashMap<String, Character>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentTable for MemoryTable {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn scan(&self) -> StorageResult<Vec<Character>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Character>> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn put(&self, item: Character) -> StorageResult<()> {
        let id = item
            .id()
            .ok_or_else(|| StorageError::malformed("item has no string id"))?
            .to_string();
        self.items.write().await.insert(id, item);
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.items.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_requires_id() {
        let table = MemoryTable::new();
        let item = Character::try_from(json!({"name": "Hedwig"})).unwrap();
        assert!(matches!(
            table.put(item).await,
            Err(StorageError::MalformedItem { .. })
        ));
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let table = MemoryTable::new();
        table
            .put(Character::try_from(json!({"id": "1", "name": "Tom"})).unwrap())
            .await
            .unwrap();
        table
            .put(Character::try_from(json!({"id": "1"})).unwrap())
            .await
            .unwrap();

        let stored = table.get("1").await.unwrap().unwrap();
        assert!(stored.get("name").is_none());
        assert_eq!(table.scan().await.unwrap().len(), 1);
    }
}

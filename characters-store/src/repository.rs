//! Character record operations on top of a document table

use crate::error::StorageResult;
use crate::table::DocumentTable;
use characters_core::Character;
use std::sync::Arc;
use tracing::debug;

/// The five record operations the API exposes.
///
/// Cheap to clone; every clone shares the same table handle.
#[derive(Clone)]
pub struct CharacterRepository {
    table: Arc<dyn DocumentTable>,
}

impl CharacterRepository {
    pub fn new(table: Arc<dyn DocumentTable>) -> Self {
        Self { table }
    }

    pub fn backend_name(&self) -> &'static str {
        self.table.name()
    }

    /// Every record in the table, unordered
    pub async fn list_all(&self) -> StorageResult<Vec<Character>> {
        let characters = self.table.scan().await?;
        debug!("Scanned {} characters", characters.len());
        Ok(characters)
    }

    pub async fn get_by_id(&self, id: &str) -> StorageResult<Option<Character>> {
        self.table.get(id).await
    }

    /// Store a new record under a freshly generated id and return that id.
    ///
    /// Any `id` the caller supplied is discarded.
    pub async fn create(&self, mut character: Character) -> StorageResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        character.set_id(id.clone());
        self.table.put(character).await?;
        debug!("Created character {}", id);
        Ok(id)
    }

    /// Overwrite the record stored under `id` with `character`.
    ///
    /// This is a full replace: fields missing from `character` are gone
    /// afterwards.
    pub async fn replace(&self, mut character: Character, id: &str) -> StorageResult<String> {
        character.set_id(id);
        self.table.put(character).await?;
        debug!("Replaced character {}", id);
        Ok(id.to_string())
    }

    /// Succeeds whether or not a record existed
    pub async fn delete_by_id(&self, id: &str) -> StorageResult<()> {
        self.table.delete(id).await?;
        debug!("Deleted character {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::memory::MemoryTable;
    use async_trait::async_trait;
    use serde_json::json;

    fn character(value: serde_json::Value) -> Character {
        Character::try_from(value).unwrap()
    }

    fn repository() -> CharacterRepository {
        CharacterRepository::new(Arc::new(MemoryTable::new()))
    }

    struct BrokenTable;

    #[async_trait]
    impl DocumentTable for BrokenTable {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn scan(&self) -> StorageResult<Vec<Character>> {
            Err(StorageError::backend("scan", "characters", "connection reset"))
        }

        async fn get(&self, _id: &str) -> StorageResult<Option<Character>> {
            Err(StorageError::backend("get", "characters", "connection reset"))
        }

        async fn put(&self, _item: Character) -> StorageResult<()> {
            Err(StorageError::backend("put", "characters", "throttled"))
        }

        async fn delete(&self, _id: &str) -> StorageResult<()> {
            Err(StorageError::backend("delete", "characters", "access denied"))
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let repo = repository();
        let input = json!({"name": "Harry Potter", "wand": {"wood": "holly", "length": 11}});

        let id = repo.create(character(input.clone())).await.unwrap();
        let stored = repo.get_by_id(&id).await.unwrap().unwrap();

        let mut expected = input.as_object().unwrap().clone();
        expected.insert("id".to_string(), json!(id));
        assert_eq!(stored, Character::new(expected));
    }

    #[tokio::test]
    async fn test_create_ignores_client_id() {
        let repo = repository();
        let id = repo
            .create(character(json!({"id": "chosen-by-client", "name": "Draco"})))
            .await
            .unwrap();

        assert_ne!(id, "chosen-by-client");
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert!(repo.get_by_id("chosen-by-client").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let repo = repository();
        let a = repo.create(character(json!({"name": "Fred"}))).await.unwrap();
        let b = repo.create(character(json!({"name": "George"}))).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_is_full_overwrite() {
        let repo = repository();
        let id = repo
            .create(character(json!({"name": "Severus Snape", "house": "Slytherin"})))
            .await
            .unwrap();

        let returned = repo
            .replace(character(json!({"name": "Severus Snape", "alive": false})), &id)
            .await
            .unwrap();
        assert_eq!(returned, id);

        let stored = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.get("alive"), Some(&json!(false)));
        assert!(stored.get("house").is_none());
        assert_eq!(stored.id(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_replace_forces_path_id() {
        let repo = repository();
        repo.replace(character(json!({"id": "other", "name": "Ron"})), "ron")
            .await
            .unwrap();

        assert!(repo.get_by_id("other").await.unwrap().is_none());
        let stored = repo.get_by_id("ron").await.unwrap().unwrap();
        assert_eq!(stored.id(), Some("ron"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = repository();
        assert!(repo.get_by_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = repository();
        let id = repo.create(character(json!({"name": "Dobby"}))).await.unwrap();

        repo.delete_by_id(&id).await.unwrap();
        repo.delete_by_id(&id).await.unwrap();
        repo.delete_by_id("never-existed").await.unwrap();

        assert!(repo.get_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backend_errors_propagate() {
        let repo = CharacterRepository::new(Arc::new(BrokenTable));

        assert!(repo.list_all().await.is_err());
        assert!(repo.get_by_id("x").await.is_err());
        assert!(repo.create(Character::default()).await.is_err());
        assert!(repo.replace(Character::default(), "x").await.is_err());
        let err = repo.delete_by_id("x").await.unwrap_err();
        assert!(err.to_string().contains("access denied"));
        assert!(err.error_id().is_some());
    }
}

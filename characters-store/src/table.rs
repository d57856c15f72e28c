//! Document table abstraction
//!
//! The four primitives every backend offers, addressed by the `id` key.
//! Higher-level record semantics live in [`crate::CharacterRepository`].

use crate::error::StorageResult;
use async_trait::async_trait;
use characters_core::Character;

#[async_trait]
pub trait DocumentTable: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &'static str;

    /// Read every item in the table, in backend order
    async fn scan(&self) -> StorageResult<Vec<Character>>;

    /// Point lookup; `Ok(None)` when no item has this id
    async fn get(&self, id: &str) -> StorageResult<Option<Character>>;

    /// Write the item in full, replacing whatever was stored under its id.
    /// The item must carry a string `id`.
    async fn put(&self, item: Character) -> StorageResult<()>;

    /// Remove the item; succeeds when nothing is stored under the id
    async fn delete(&self, id: &str) -> StorageResult<()>;
}

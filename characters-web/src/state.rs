//! Application state shared by every request

use crate::{auth::TokenService, WebError, WebResult};
use characters_core::AppConfig;
use characters_store::{open_table, CharacterRepository, DocumentTable};
use std::sync::Arc;
use tracing::info;

/// Immutable after startup; clones share the config, keys and table handle
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub characters: CharacterRepository,
}

impl AppState {
    /// Validate the configuration and open the configured document table
    pub async fn new(config: AppConfig) -> WebResult<Self> {
        config.validate()?;

        let table = open_table(&config.storage).await?;
        let state = Self::with_table(config, table);

        info!("Application state initialized successfully");
        Ok(state)
    }

    /// Build state over an already-open table
    pub fn with_table(config: AppConfig, table: Arc<dyn DocumentTable>) -> Self {
        let tokens = TokenService::new(&config.auth);
        Self {
            config: Arc::new(config),
            tokens,
            characters: CharacterRepository::new(table),
        }
    }
}

impl From<characters_core::CharactersError> for WebError {
    fn from(e: characters_core::CharactersError) -> Self {
        e.log();
        WebError::Config(e.to_string())
    }
}

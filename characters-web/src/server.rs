//! Characters Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use characters_core::AppConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

pub struct CharactersServer {
    address: String,
    state: AppState,
}

impl CharactersServer {
    /// Build state (config validation, storage connection) for a new server
    pub async fn new(config: AppConfig) -> WebResult<Self> {
        let address = config.server.address();
        let state = AppState::new(config).await?;

        Ok(Self { address, state })
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> WebResult<()> {
        info!("🚀 Starting Characters API");
        info!(
            "🗄️  Storage: {} (table '{}')",
            self.state.characters.backend_name(),
            self.state.config.storage.table_name
        );

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&self.address)
            .await
            .map_err(WebError::Server)?;

        info!("✅ Running on: http://{}", self.address);
        info!("📖 Documentation on: http://{}/api-docs", self.address);

        if let Err(e) = serve(listener, app).await {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

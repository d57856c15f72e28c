//! Characters Web Server
//!
//! Token-protected CRUD API for character records.

use anyhow::Context;
use characters_core::{init_logging, AppConfig, StorageBackend};
use characters_web::CharactersServer;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Characters API server
#[derive(Parser, Debug)]
#[command(name = "characters-web")]
#[command(about = "A token-protected CRUD API for character records")]
#[command(version)]
struct Args {
    /// TOML configuration file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Storage backend (dynamodb, sqlite, memory)
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// Table holding the characters
    #[arg(long)]
    table_name: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(table_name) = self.table_name {
            config.storage.table_name = table_name;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

fn load_config(args: Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.apply_env()?;
    args.apply(&mut config);
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = load_config(args)?;
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!(e))?;

    info!("🔧 Configuration loaded: {:?}", config.storage);

    let server = CharactersServer::new(config).await?;
    server.start().await?;

    Ok(())
}

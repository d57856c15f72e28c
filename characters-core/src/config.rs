//! Configuration management
//!
//! One `AppConfig` is built at startup (defaults, then an optional TOML file,
//! then environment variables, then CLI flags) and handed by reference to the
//! token service and the storage backend.

use crate::error::{CharactersError, CharactersResult, ErrorContext};
use crate::logging::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Longest accepted token lifetime: one year
pub const MAX_TOKEN_TTL_MINUTES: i64 = 366 * 24 * 60;

/// Login credential pair and token signing settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Symmetric secret used to sign and verify tokens
    pub secret: String,
    pub username: String,
    pub password: String,
    /// Token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            username: String::new(),
            password: String::new(),
            token_ttl_minutes: 30,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

/// Which document table implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    DynamoDb,
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StorageBackend::DynamoDb),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::DynamoDb => "dynamodb",
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub table_name: String,
    /// AWS region; the SDK's default provider chain is used when unset
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Endpoint override, e.g. a local DynamoDB
    pub endpoint_url: Option<String>,
    /// SQLite connection string for the sqlite backend
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::DynamoDb,
            table_name: "characters".to_string(),
            region: None,
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
            database_url: "sqlite:characters.db".to_string(),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("table_name", &self.table_name)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("endpoint_url", &self.endpoint_url)
            .field("database_url", &self.database_url)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CharactersResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CharactersError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| CharactersError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> CharactersResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) -> CharactersResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> CharactersResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }

        if let Some(secret) = lookup("SECRET") {
            self.auth.secret = secret;
        }
        if let Some(username) = lookup("API_USER") {
            self.auth.username = username;
        }
        if let Some(password) = lookup("API_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_MINUTES") {
            self.auth.token_ttl_minutes = parse_var("TOKEN_TTL_MINUTES", &ttl)?;
        }

        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.storage.backend = parse_var("STORAGE_BACKEND", &backend)?;
        }
        if let Some(table_name) = lookup("TABLE_NAME") {
            self.storage.table_name = table_name;
        }
        if let Some(region) = lookup("AWS_DEFAULT_REGION") {
            self.storage.region = Some(region);
        }
        if let Some(key_id) = lookup("AWS_ACCESS_KEY_ID") {
            self.storage.access_key_id = Some(key_id);
        }
        if let Some(secret_key) = lookup("AWS_SECRET_ACCESS_KEY") {
            self.storage.secret_access_key = Some(secret_key);
        }
        if let Some(endpoint) = lookup("DYNAMODB_ENDPOINT") {
            self.storage.endpoint_url = Some(endpoint);
        }
        if let Some(database_url) = lookup("DATABASE_URL") {
            self.storage.database_url = database_url;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = parse_var::<LogFormat>("LOG_FORMAT", &format)?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> CharactersResult<()> {
        if self.auth.secret.is_empty() {
            return Err(CharactersError::config(
                "Token signing secret is empty",
                "Set SECRET or auth.secret",
            ));
        }

        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            return Err(CharactersError::config(
                "Login username and password must both be set",
                "Set API_USER and API_PASSWORD or auth.username and auth.password",
            ));
        }

        let ttl = self.auth.token_ttl_minutes;
        if ttl <= 0 || ttl > MAX_TOKEN_TTL_MINUTES {
            return Err(CharactersError::config(
                format!(
                    "Token TTL must be between 1 and {} minutes",
                    MAX_TOKEN_TTL_MINUTES
                ),
                "Set TOKEN_TTL_MINUTES or auth.token_ttl_minutes to a value in range",
            ));
        }

        if self.storage.table_name.is_empty() {
            return Err(CharactersError::config(
                "Table name is empty",
                "Set TABLE_NAME or storage.table_name",
            ));
        }

        if self.storage.access_key_id.is_some() != self.storage.secret_access_key.is_some() {
            return Err(CharactersError::config(
                "AWS access key id and secret access key must be set together",
                "Set both AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY, or neither",
            ));
        }

        Ok(())
    }
}

fn parse_var<T>(name: &str, raw: &str) -> CharactersResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|e| CharactersError::Validation {
        message: format!("Invalid value for {}: {}", name, e),
        field: Some(name.to_string()),
        context: ErrorContext::new("config")
            .with_operation("apply_env")
            .with_metadata("value", raw),
    })
}

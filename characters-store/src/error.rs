//! Storage errors

use characters_core::ErrorContext;
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Any fault raised while talking to the document table
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend rejected or failed the call (network, permissions, throttling)
    #[error("{operation} failed on table '{table}': {message}")]
    Backend {
        operation: &'static str,
        table: String,
        message: String,
        context: ErrorContext,
    },

    /// A stored item could not be converted to or from a record
    #[error("Malformed item: {message}")]
    MalformedItem {
        message: String,
        context: ErrorContext,
    },

    /// The backend could not be set up from the given configuration
    #[error("Storage configuration error: {0}")]
    Config(String),
}

impl StorageError {
    pub fn backend(operation: &'static str, table: &str, message: impl Into<String>) -> Self {
        StorageError::Backend {
            operation,
            table: table.to_string(),
            message: message.into(),
            context: ErrorContext::new("storage")
                .with_operation(operation)
                .with_metadata("table", table),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        StorageError::MalformedItem {
            message: message.into(),
            context: ErrorContext::new("storage").with_operation("convert"),
        }
    }

    /// Id under which this error is logged
    pub fn error_id(&self) -> Option<&str> {
        match self {
            StorageError::Backend { context, .. } | StorageError::MalformedItem { context, .. } => {
                Some(context.error_id.as_str())
            }
            StorageError::Config(_) => None,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::malformed(e.to_string())
    }
}

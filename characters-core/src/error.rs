//! Unified error handling
//!
//! Structured error types carrying a context with a unique id, so a failure
//! reported to a client can be matched against the server logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type CharactersResult<T> = Result<T, CharactersError>;

/// Where and when a failure happened. `error_id` is the handle shared
/// between the log line and any client-facing error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    pub error_id: String,
    pub timestamp: DateTime<Utc>,
    /// "config", "storage", ...
    pub component: String,
    pub operation: Option<String>,
    pub metadata: std::collections::HashMap<String, String>,
    /// Hints for the operator
    pub suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type shared by the characters crates
#[derive(Error, Debug)]
pub enum CharactersError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },
}

impl CharactersError {
    /// Shorthand for a configuration error without an underlying source
    pub fn config(message: impl Into<String>, suggestion: &str) -> Self {
        CharactersError::Config {
            message: message.into(),
            source: None,
            context: ErrorContext::new("config")
                .with_operation("validate")
                .with_suggestion(suggestion),
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            CharactersError::Config { context, .. } | CharactersError::Validation { context, .. } => {
                context
            }
        }
    }

    /// Configuration faults log at error, bad values at warn
    pub fn log(&self) {
        let context = self.context();
        match self {
            CharactersError::Config { .. } => {
                error!(error_id = %context.error_id, error = %self, "Configuration error");
            }
            CharactersError::Validation { .. } => {
                warn!(error_id = %context.error_id, error = %self, "Validation error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_builder() {
        let context = ErrorContext::new("storage")
            .with_operation("put")
            .with_metadata("table", "characters")
            .with_suggestion("Check the table exists");

        assert_eq!(context.component, "storage");
        assert_eq!(context.operation.as_deref(), Some("put"));
        assert_eq!(context.metadata.get("table").unwrap(), "characters");
        assert_eq!(context.suggestions.len(), 1);
        assert!(uuid::Uuid::parse_str(&context.error_id).is_ok());
    }

    #[test]
    fn test_config_error_has_context() {
        let err = CharactersError::config("secret is empty", "Set SECRET");
        assert!(err.to_string().contains("secret is empty"));
        assert_eq!(err.context().component, "config");
    }
}

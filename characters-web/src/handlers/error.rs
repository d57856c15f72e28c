//! Error responses for the character handlers

use super::types::{ErrorResponse, MessageResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use characters_store::StorageError;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Storage failed; `message` is what the client sees
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("character with id {0} not found")]
    NotFound(String),

    #[error("character must be a JSON object")]
    InvalidBody,
}

impl ApiError {
    pub fn storage(message: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| ApiError::Storage { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Backend detail stays in the log; the client only gets the id.
            ApiError::Storage { message, source } => {
                let error_id = source.error_id().map(str::to_string);
                error!(error_id = ?error_id, error = %source, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        message: message.to_string(),
                        error_id,
                    }),
                )
                    .into_response()
            }
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::new(self.to_string())),
            )
                .into_response(),
            ApiError::InvalidBody => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(self.to_string())),
            )
                .into_response(),
        }
    }
}

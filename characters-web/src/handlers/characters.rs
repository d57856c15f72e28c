//! Character CRUD handlers
//!
//! All of these sit behind [`crate::middleware::require_token`].

use super::error::ApiError;
use super::types::{CharacterRecord, ErrorResponse, MessageResponse};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use characters_core::Character;
use serde_json::Value;
use tracing::{debug, info};

/// Parse a request body as a JSON object, whatever the declared content type
fn character_from_body(body: &[u8]) -> Result<Character, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("Unparseable character body: {}", e);
        ApiError::InvalidBody
    })?;
    Character::try_from(value).map_err(|_| ApiError::InvalidBody)
}

/// List every character
#[utoipa::path(
    get,
    path = "/characters",
    tag = "Characters",
    summary = "Get all characters",
    description = "Returns every character in the table, in no particular order.",
    security(("bearer_auth" = []), ("access_token" = [])),
    responses(
        (status = 200, description = "All characters", body = Vec<CharacterRecord>),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_characters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Character>>, ApiError> {
    let characters = state
        .characters
        .list_all()
        .await
        .map_err(ApiError::storage("could not get characters"))?;
    Ok(Json(characters))
}

/// Get one character by id
#[utoipa::path(
    get,
    path = "/characters/{id}",
    tag = "Characters",
    summary = "Get character by id",
    params(("id" = String, Path, description = "Character id")),
    security(("bearer_auth" = []), ("access_token" = [])),
    responses(
        (status = 200, description = "The character", body = CharacterRecord),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "No character with this id", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Character>, ApiError> {
    state
        .characters
        .get_by_id(&id)
        .await
        .map_err(ApiError::storage("could not get character"))?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Add a character; the server assigns its id
#[utoipa::path(
    post,
    path = "/characters",
    tag = "Characters",
    summary = "Add a character",
    request_body = CharacterRecord,
    security(("bearer_auth" = []), ("access_token" = [])),
    responses(
        (status = 200, description = "Character added", body = MessageResponse),
        (status = 400, description = "Body is not valid JSON or not an object", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_character(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let character = character_from_body(&body)?;
    let id = state
        .characters
        .create(character)
        .await
        .map_err(ApiError::storage("could not add the character"))?;

    info!("Character added: {}", id);
    Ok(Json(MessageResponse::new(format!(
        "character added with id {}",
        id
    ))))
}

/// Replace a character entirely
#[utoipa::path(
    put,
    path = "/characters/{id}",
    tag = "Characters",
    summary = "Update a character",
    description = "Full replace: fields missing from the body are removed from the stored character.",
    params(("id" = String, Path, description = "Character id")),
    request_body = CharacterRecord,
    security(("bearer_auth" = []), ("access_token" = [])),
    responses(
        (status = 200, description = "Character replaced", body = MessageResponse),
        (status = 400, description = "Body is not valid JSON or not an object", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn replace_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let character = character_from_body(&body)?;
    let id = state
        .characters
        .replace(character, &id)
        .await
        .map_err(ApiError::storage("could not update the character"))?;

    info!("Character replaced: {}", id);
    Ok(Json(MessageResponse::new(format!(
        "the character with {} has been updated succesfully",
        id
    ))))
}

/// Delete a character; deleting a missing id also succeeds
#[utoipa::path(
    delete,
    path = "/characters/{id}",
    tag = "Characters",
    summary = "Delete a character",
    params(("id" = String, Path, description = "Character id")),
    security(("bearer_auth" = []), ("access_token" = [])),
    responses(
        (status = 200, description = "Character deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .characters
        .delete_by_id(&id)
        .await
        .map_err(ApiError::storage("could not delete the character"))?;

    info!("Character deleted: {}", id);
    Ok(Json(MessageResponse::new(format!(
        "The character with id {} has been deleted succesfully",
        id
    ))))
}

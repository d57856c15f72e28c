//! Request and response bodies

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login request, sent as JSON or as form fields
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "admin")]
    pub user: String,
    #[serde(default)]
    #[schema(example = "secret")]
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "You are logged in")]
    pub message: String,
    pub token: String,
}

/// Plain confirmation or rejection message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Server-side failure; `error_id` matches the server log entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "could not get characters")]
    pub message: String,
    pub error_id: Option<String>,
}

/// Wand details, as commonly stored on a character
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Wand {
    pub wood: Option<String>,
    pub core: Option<String>,
    pub length: Option<serde_json::Value>,
}

/// A character record.
///
/// Every field is optional and any other field is stored as sent. `id` is
/// assigned by the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Madame Maxime",
    "alternate_names": ["Olympe Maxime"],
    "species": "half-giant",
    "gender": "female",
    "house": "",
    "ancestry": "",
    "wizard": true,
    "hogwartsStudent": false,
    "hogwartsStaff": false,
    "actor": "Frances de la Tour",
    "alternate_actors": ["Ian Whyte"],
    "alive": true,
    "wand": {"wood": "", "core": "", "length": ""}
}))]
pub struct CharacterRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub alternate_names: Option<Vec<String>>,
    pub species: Option<String>,
    pub gender: Option<String>,
    pub house: Option<String>,
    pub ancestry: Option<String>,
    pub patronus: Option<String>,
    pub wizard: Option<bool>,
    #[serde(rename = "hogwartsStudent")]
    pub hogwarts_student: Option<bool>,
    #[serde(rename = "hogwartsStaff")]
    pub hogwarts_staff: Option<bool>,
    pub actor: Option<String>,
    pub alternate_actors: Option<Vec<String>>,
    pub alive: Option<bool>,
    pub wand: Option<Wand>,
}

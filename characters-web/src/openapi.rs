//! OpenAPI specification for the characters API

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{
    CharacterRecord, ErrorResponse, LoginRequest, LoginResponse, MessageResponse, Wand,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Character API",
        version = "1.0.0",
        description = "CRUD API for characters, protected by a bearer token obtained from /login",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::handlers::root,
        crate::auth::handlers::login,
        crate::handlers::list_characters,
        crate::handlers::get_character,
        crate::handlers::create_character,
        crate::handlers::replace_character,
        crate::handlers::delete_character,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ErrorResponse,
            CharacterRecord,
            Wand,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Log In", description = "Token issuing"),
        (name = "Characters", description = "Character records"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the two ways a token can be presented
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "access_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-access-token"))),
            );
        }
    }
}

/// Get the OpenAPI specification as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Get the OpenAPI specification as YAML
pub fn get_openapi_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}
